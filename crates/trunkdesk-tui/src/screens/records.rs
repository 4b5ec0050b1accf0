//! Entity table page. One instance per entity kind; columns come from the
//! kind's field table, so every kind renders through the same code.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use trunkdesk_core::{EntityKind, FieldKind, PageData, RecordView};

use crate::action::Action;
use crate::bridge::ControllerRequest;
use crate::component::Component;
use crate::theme;

const PAGE_STEP: isize = 10;

pub struct RecordsScreen {
    kind: EntityKind,
    focused: bool,
    can_edit: bool,
    rows: Vec<RecordView>,
    table_state: TableState,
}

impl RecordsScreen {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            focused: false,
            can_edit: false,
            rows: Vec::new(),
            table_state: TableState::default().with_selected(Some(0)),
        }
    }

    fn selected(&self) -> Option<&RecordView> {
        self.rows.get(self.table_state.selected().unwrap_or(0))
    }

    fn select(&mut self, index: usize) {
        let last = self.rows.len().saturating_sub(1);
        self.table_state.select(Some(index.min(last)));
    }

    fn move_selection(&mut self, delta: isize) {
        let current = self.table_state.selected().unwrap_or(0);
        self.select(current.saturating_add_signed(delta));
    }

    /// Request for the selected row, if editing is allowed and a row exists.
    fn on_selected(
        &self,
        request: impl FnOnce(&RecordView) -> ControllerRequest,
    ) -> Option<Action> {
        if !self.can_edit {
            return None;
        }
        self.selected().map(|row| Action::Request(request(row)))
    }

    fn render_hints(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled("  j/k ", theme::key_hint_key()),
            Span::styled("navigate  ", theme::key_hint()),
            Span::styled("r ", theme::key_hint_key()),
            Span::styled("reload", theme::key_hint()),
        ];
        if self.can_edit {
            spans.extend([
                Span::styled("  a ", theme::key_hint_key()),
                Span::styled("add  ", theme::key_hint()),
                Span::styled("e ", theme::key_hint_key()),
                Span::styled("edit  ", theme::key_hint()),
                Span::styled("d ", theme::key_hint_key()),
                Span::styled("delete", theme::key_hint()),
            ]);
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

fn cell_style(kind: FieldKind) -> Style {
    match kind {
        FieldKind::Choice(_) => Style::default().fg(theme::CORAL),
        FieldKind::Number | FieldKind::Text => Style::default(),
    }
}

impl Component for RecordsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(-1);
                None
            }
            KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.move_selection(PAGE_STEP);
                None
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.move_selection(-PAGE_STEP);
                None
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.select(0);
                None
            }
            KeyCode::Char('G') | KeyCode::End => {
                self.select(usize::MAX);
                None
            }
            KeyCode::Char('a') if self.can_edit => Some(ControllerRequest::OpenAdd.into()),
            KeyCode::Char('e') | KeyCode::Enter => {
                self.on_selected(|row| ControllerRequest::OpenEdit(row.id))
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                self.on_selected(|row| ControllerRequest::RequestDelete(row.id))
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        let Action::ViewUpdated(snapshot) = action else {
            return Ok(None);
        };
        self.can_edit = snapshot.can_edit();
        match &snapshot.data {
            PageData::Rows { kind, rows } if *kind == self.kind => {
                self.rows.clone_from(rows);
                let current = self.table_state.selected().unwrap_or(0);
                self.select(current);
            }
            PageData::Empty if snapshot.page().entity_kind() == Some(self.kind) => {
                self.rows.clear();
                self.select(0);
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" {} ({}) ", self.kind.label(), self.rows.len()))
            .title_style(theme::title())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);
        self.render_hints(frame, layout[1]);

        if self.rows.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!("No {} found", self.kind.label()),
                    theme::key_hint(),
                ))
                .alignment(Alignment::Center),
                layout[0],
            );
            return;
        }

        let fields = self.kind.fields();
        let header = Row::new(
            std::iter::once("ID")
                .chain(fields.iter().map(|f| f.label))
                .map(|label| Cell::from(label).style(theme::table_header())),
        );

        let rows = self.rows.iter().map(|row| {
            let cells = row
                .values
                .iter()
                .zip(fields)
                .map(|(value, spec)| Cell::from(value.clone()).style(cell_style(spec.kind)));
            Row::new(
                std::iter::once(
                    Cell::from(row.id.to_string()).style(Style::default().fg(theme::CYAN)),
                )
                .chain(cells),
            )
            .style(theme::table_row())
        });

        let widths = std::iter::once(Constraint::Length(9))
            .chain(fields.iter().map(|_| Constraint::Fill(1)));

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected())
            .highlight_symbol("▸");

        let mut state = self.table_state;
        frame.render_stateful_widget(table, layout[0], &mut state);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};
    use trunkdesk_core::{
        AuthenticatedView, Page, RecordId, Role, UserIdentity, ViewSnapshot, ViewState,
    };

    use super::*;

    fn snapshot(role: Role, rows: Vec<RecordView>) -> Box<ViewSnapshot> {
        Box::new(ViewSnapshot {
            state: ViewState::Authenticated(AuthenticatedView {
                user: UserIdentity {
                    username: "ops".into(),
                    role,
                },
                page: Page::Customers,
                modal: None,
                pending_delete: None,
            }),
            data: PageData::Rows {
                kind: EntityKind::Customer,
                rows,
            },
            banner: None,
        })
    }

    fn customer(id: u64, name: &str) -> RecordView {
        RecordView {
            id: RecordId(id),
            values: vec![name.into(), format!("{name}@example.test"), String::new()],
        }
    }

    fn loaded(role: Role) -> RecordsScreen {
        let mut screen = RecordsScreen::new(EntityKind::Customer);
        let rows = vec![customer(1, "acme"), customer(2, "globex"), customer(3, "initech")];
        screen
            .update(&Action::ViewUpdated(snapshot(role, rows)))
            .unwrap();
        screen
    }

    fn press(screen: &mut RecordsScreen, code: KeyCode) -> Option<Action> {
        screen
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    #[test]
    fn selection_is_clamped_to_rows() {
        let mut screen = loaded(Role::Admin);
        press(&mut screen, KeyCode::Char('G'));
        assert_eq!(screen.selected().unwrap().id, RecordId(3));
        press(&mut screen, KeyCode::Char('j'));
        assert_eq!(screen.selected().unwrap().id, RecordId(3));
        press(&mut screen, KeyCode::Char('g'));
        press(&mut screen, KeyCode::Char('k'));
        assert_eq!(screen.selected().unwrap().id, RecordId(1));
    }

    #[test]
    fn shrinking_list_keeps_selection_in_range() {
        let mut screen = loaded(Role::Admin);
        press(&mut screen, KeyCode::End);
        screen
            .update(&Action::ViewUpdated(snapshot(Role::Admin, vec![customer(1, "acme")])))
            .unwrap();
        assert_eq!(screen.table_state.selected(), Some(0));
    }

    #[test]
    fn admin_keys_issue_requests_for_selected_row() {
        let mut screen = loaded(Role::Admin);
        press(&mut screen, KeyCode::Down);

        assert!(matches!(
            press(&mut screen, KeyCode::Char('a')),
            Some(Action::Request(ControllerRequest::OpenAdd))
        ));
        assert!(matches!(
            press(&mut screen, KeyCode::Enter),
            Some(Action::Request(ControllerRequest::OpenEdit(RecordId(2))))
        ));
        assert!(matches!(
            press(&mut screen, KeyCode::Char('d')),
            Some(Action::Request(ControllerRequest::RequestDelete(RecordId(2))))
        ));
    }

    #[test]
    fn read_only_user_cannot_edit() {
        let mut screen = loaded(Role::User);
        assert!(press(&mut screen, KeyCode::Char('a')).is_none());
        assert!(press(&mut screen, KeyCode::Char('e')).is_none());
        assert!(press(&mut screen, KeyCode::Char('d')).is_none());
    }

    #[test]
    fn rows_for_other_kinds_are_ignored() {
        let mut screen = loaded(Role::Admin);
        let mut other = snapshot(Role::Admin, Vec::new());
        other.data = PageData::Rows {
            kind: EntityKind::Did,
            rows: Vec::new(),
        };
        screen.update(&Action::ViewUpdated(other)).unwrap();
        assert_eq!(screen.rows.len(), 3);
    }

    #[test]
    fn hides_edit_hints_for_read_only_user() {
        let render = |screen: &RecordsScreen| {
            let mut terminal = Terminal::new(TestBackend::new(100, 8)).unwrap();
            terminal.draw(|f| screen.render(f, f.area())).unwrap();
            format!("{:?}", terminal.backend().buffer())
        };

        let admin = render(&loaded(Role::Admin));
        assert!(admin.contains("Customers (3)"));
        assert!(admin.contains("globex"));
        assert!(admin.contains("delete"));

        let user = render(&loaded(Role::User));
        assert!(user.contains("initech"));
        assert!(!user.contains("delete"));
    }
}
