//! Add/edit modal.
//!
//! The overlay keeps its own copy of the form while it is open so typing
//! never waits on the controller task; every edit is also forwarded as a
//! `SetField` request, and the queue order guarantees the controller holds
//! the same values by the time `Save` reaches it.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use trunkdesk_core::{EditForm, FieldKind, FieldSpec, ViewSnapshot};

use crate::action::Action;
use crate::bridge::ControllerRequest;
use crate::theme;

use super::{centered, panel};

const LABEL_WIDTH: usize = 20;

#[derive(Debug, Default)]
pub struct FormOverlay {
    form: Option<EditForm>,
    focus: usize,
}

/// Step through `options` from `current`, wrapping at both ends.
fn cycle(options: &[&str], current: &str, forward: bool) -> String {
    let Some(last) = options.len().checked_sub(1) else {
        return current.to_owned();
    };
    let position = options.iter().position(|o| *o == current);
    let next = match (position, forward) {
        (None, _) => 0,
        (Some(i), true) if i == last => 0,
        (Some(i), true) => i + 1,
        (Some(0), false) => last,
        (Some(i), false) => i - 1,
    };
    options.get(next).map_or_else(|| current.to_owned(), |o| (*o).to_owned())
}

impl FormOverlay {
    pub fn is_open(&self) -> bool {
        self.form.is_some()
    }

    /// Follow the controller: open on a new modal, close when it is gone.
    pub fn sync(&mut self, snapshot: &ViewSnapshot) {
        let Some(modal) = snapshot.modal() else {
            self.form = None;
            return;
        };
        let same = self
            .form
            .as_ref()
            .is_some_and(|open| open.kind == modal.kind && open.target == modal.target);
        if !same {
            self.form = Some(modal.clone());
            self.focus = 0;
        }
    }

    fn field_count(&self) -> usize {
        self.form.as_ref().map_or(0, |f| f.values.len())
    }

    fn move_focus(&mut self, forward: bool) {
        let count = self.field_count();
        if count == 0 {
            return;
        }
        self.focus = if forward {
            (self.focus + 1) % count
        } else {
            (self.focus + count - 1) % count
        };
    }

    /// Apply `edit` to the focused value and forward the result.
    fn edit(&mut self, edit: impl FnOnce(&FieldSpec, &mut String)) -> Option<Action> {
        let index = self.focus;
        let form = self.form.as_mut()?;
        let spec = form.kind.fields().get(index)?;
        let value = form.values.get_mut(index)?;
        let before = value.clone();
        edit(spec, value);
        if *value == before {
            return None;
        }
        Some(
            ControllerRequest::SetField {
                index,
                value: value.clone(),
            }
            .into(),
        )
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => Some(ControllerRequest::CancelModal.into()),
            KeyCode::Enter => Some(ControllerRequest::Save.into()),
            KeyCode::Tab | KeyCode::Down => {
                self.move_focus(true);
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.move_focus(false);
                None
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') => {
                let forward = key.code != KeyCode::Left;
                self.edit(|spec, value| match spec.kind {
                    FieldKind::Choice(options) => *value = cycle(options, value, forward),
                    FieldKind::Text if key.code == KeyCode::Char(' ') => value.push(' '),
                    FieldKind::Text | FieldKind::Number => {}
                })
            }
            KeyCode::Backspace => self.edit(|spec, value| {
                if !matches!(spec.kind, FieldKind::Choice(_)) {
                    value.pop();
                }
            }),
            KeyCode::Char(c) => self.edit(|spec, value| match spec.kind {
                FieldKind::Text => value.push(c),
                FieldKind::Number if c.is_ascii_digit() => value.push(c),
                FieldKind::Number | FieldKind::Choice(_) => {}
            }),
            _ => None,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(form) = &self.form else {
            return;
        };

        let rows = u16::try_from(form.values.len()).unwrap_or(u16::MAX);
        let dialog = centered(area, 64, rows.saturating_add(5));
        let inner = panel(frame, dialog, &form.title(), theme::border_focused());

        let layout = Layout::vertical([
            Constraint::Length(rows),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .horizontal_margin(1)
        .split(inner);

        let lines: Vec<Line> = form
            .fields()
            .enumerate()
            .map(|(i, (spec, value))| {
                let active = i == self.focus;
                let label_style = if active {
                    Style::default().fg(theme::CYAN).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme::TEXT)
                };
                let shown = match spec.kind {
                    FieldKind::Choice(_) if active => format!("◂ {value} ▸"),
                    FieldKind::Choice(_) => value.to_owned(),
                    FieldKind::Text | FieldKind::Number if active => format!("{value}█"),
                    FieldKind::Text | FieldKind::Number => value.to_owned(),
                };
                Line::from(vec![
                    Span::styled(format!("{:<LABEL_WIDTH$}", spec.label), label_style),
                    Span::styled(shown, Style::default().fg(theme::CYAN)),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), layout[0]);

        let hints = Line::from(vec![
            Span::styled("Tab ", theme::key_hint_key()),
            Span::styled("next  ", theme::key_hint()),
            Span::styled("←/→ ", theme::key_hint_key()),
            Span::styled("choose  ", theme::key_hint()),
            Span::styled("Enter ", theme::key_hint_key()),
            Span::styled("save  ", theme::key_hint()),
            Span::styled("Esc ", theme::key_hint_key()),
            Span::styled("cancel", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[2]);
    }
}
