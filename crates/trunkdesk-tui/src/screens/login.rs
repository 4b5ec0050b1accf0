//! Full-screen login form shown while no session exists.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use secrecy::SecretString;
use throbber_widgets_tui::{Throbber, ThrobberState};

use crate::action::Action;
use crate::bridge::ControllerRequest;
use crate::component::Component;
use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Username,
    Password,
}

pub struct LoginScreen {
    server: String,
    username: String,
    password: String,
    field: Field,
    submitting: bool,
    error: Option<String>,
    throbber_state: ThrobberState,
}

impl LoginScreen {
    /// `username` pre-fills the form from the profile.
    pub fn new(server: impl Into<String>, username: Option<String>) -> Self {
        let username = username.unwrap_or_default();
        let field = if username.is_empty() {
            Field::Username
        } else {
            Field::Password
        };
        Self {
            server: server.into(),
            username,
            password: String::new(),
            field,
            submitting: false,
            error: None,
            throbber_state: ThrobberState::default(),
        }
    }

    fn active_input(&mut self) -> &mut String {
        match self.field {
            Field::Username => &mut self.username,
            Field::Password => &mut self.password,
        }
    }

    fn toggle_field(&mut self) {
        self.field = match self.field {
            Field::Username => Field::Password,
            Field::Password => Field::Username,
        };
    }

    fn submit(&mut self) -> Option<Action> {
        let username = self.username.trim();
        if username.is_empty() {
            self.field = Field::Username;
            return None;
        }
        if self.password.is_empty() {
            self.field = Field::Password;
            return None;
        }

        self.submitting = true;
        self.error = None;
        let password = SecretString::from(std::mem::take(&mut self.password));
        Some(
            ControllerRequest::Login {
                username: username.to_owned(),
                password,
            }
            .into(),
        )
    }

    fn render_input(frame: &mut Frame, area: Rect, label: &str, text: String, active: bool) {
        let layout = Layout::vertical([Constraint::Length(1), Constraint::Length(3)]).split(area);

        let label_style = if active {
            Style::default().fg(theme::CYAN)
        } else {
            Style::default().fg(theme::TEXT)
        };
        frame.render_widget(Paragraph::new(Span::styled(label, label_style)), layout[0]);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if active {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(layout[1]);
        frame.render_widget(block, layout[1]);

        let text = if active { format!("{text}█") } else { text };
        frame.render_widget(
            Paragraph::new(Span::styled(text, Style::default().fg(theme::CYAN))),
            inner,
        );
    }
}

impl Component for LoginScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.submitting {
            return Ok(None);
        }
        let action = match key.code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.toggle_field();
                None
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => {
                self.active_input().pop();
                None
            }
            KeyCode::Char(c) => {
                self.error = None;
                self.active_input().push(c);
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Tick if self.submitting => self.throbber_state.calc_next(),
            Action::ViewUpdated(snapshot) => {
                self.submitting = false;
                self.error.clone_from(&snapshot.banner);
                if snapshot.is_authenticated() {
                    self.password.clear();
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let width = 52u16.min(area.width.saturating_sub(4));
        let height = 16u16.min(area.height.saturating_sub(2));
        let panel = Rect::new(
            area.x + (area.width.saturating_sub(width)) / 2,
            area.y + (area.height.saturating_sub(height)) / 2,
            width,
            height,
        );

        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            panel,
        );
        let block = Block::default()
            .title(Span::styled(
                " trunkdesk ",
                Style::default()
                    .fg(theme::CYAN)
                    .add_modifier(Modifier::BOLD),
            ))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(panel);
        frame.render_widget(block, panel);

        let layout = Layout::vertical([
            Constraint::Length(1), // server
            Constraint::Length(1),
            Constraint::Length(4), // username
            Constraint::Length(4), // password
            Constraint::Length(1), // status
            Constraint::Min(0),
            Constraint::Length(1), // hints
        ])
        .horizontal_margin(2)
        .split(inner);

        frame.render_widget(
            Paragraph::new(Span::styled(self.server.as_str(), theme::key_hint()))
                .alignment(Alignment::Center),
            layout[0],
        );

        Self::render_input(
            frame,
            layout[2],
            "Username",
            self.username.clone(),
            self.field == Field::Username,
        );
        Self::render_input(
            frame,
            layout[3],
            "Password",
            "●".repeat(self.password.chars().count()),
            self.field == Field::Password,
        );

        if self.submitting {
            let throbber = Throbber::default()
                .label(" Signing in...")
                .style(Style::default().fg(theme::CYAN))
                .throbber_style(Style::default().fg(theme::ACCENT));
            frame.render_stateful_widget(throbber, layout[4], &mut self.throbber_state.clone());
        } else if let Some(error) = &self.error {
            frame.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled("✗ ", Style::default().fg(theme::RED)),
                    Span::styled(error.as_str(), Style::default().fg(theme::RED)),
                ])),
                layout[4],
            );
        }

        frame.render_widget(
            Paragraph::new(Span::styled(
                "Tab switch field  Enter sign in  Ctrl+C quit",
                theme::key_hint(),
            ))
            .alignment(Alignment::Center),
            layout[6],
        );
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;
    use trunkdesk_core::ViewSnapshot;

    use super::*;

    fn type_text(screen: &mut LoginScreen, text: &str) {
        for c in text.chars() {
            screen
                .handle_key_event(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
                .unwrap();
        }
    }

    fn press(screen: &mut LoginScreen, code: KeyCode) -> Option<Action> {
        screen
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap()
    }

    #[test]
    fn prefilled_username_focuses_password() {
        let mut screen = LoginScreen::new("http://localhost:5000", Some("admin".into()));
        type_text(&mut screen, "s3cret");

        match press(&mut screen, KeyCode::Enter) {
            Some(Action::Request(ControllerRequest::Login { username, password })) => {
                assert_eq!(username, "admin");
                assert_eq!(password.expose_secret(), "s3cret");
            }
            other => panic!("expected login request, got {other:?}"),
        }
        assert!(screen.submitting);
        assert!(screen.password.is_empty());
    }

    #[test]
    fn enter_with_missing_password_moves_focus() {
        let mut screen = LoginScreen::new("http://localhost:5000", None);
        type_text(&mut screen, "ops");
        assert!(press(&mut screen, KeyCode::Enter).is_none());
        assert_eq!(screen.field, Field::Password);
    }

    #[test]
    fn keys_are_ignored_while_submitting() {
        let mut screen = LoginScreen::new("http://localhost:5000", Some("admin".into()));
        type_text(&mut screen, "pw");
        press(&mut screen, KeyCode::Enter);
        type_text(&mut screen, "xyz");
        assert!(screen.password.is_empty());
    }

    #[test]
    fn failed_login_shows_banner() {
        let mut screen = LoginScreen::new("http://localhost:5000", Some("admin".into()));
        type_text(&mut screen, "pw");
        press(&mut screen, KeyCode::Enter);

        screen
            .update(&Action::ViewUpdated(Box::new(ViewSnapshot {
                banner: Some("Invalid credentials".into()),
                ..ViewSnapshot::default()
            })))
            .unwrap();

        assert!(!screen.submitting);
        assert_eq!(screen.error.as_deref(), Some("Invalid credentials"));
    }
}
