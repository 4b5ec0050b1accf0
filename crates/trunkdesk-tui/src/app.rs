//! Application core: event loop, page routing, overlays.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Tabs},
};
use strum::IntoEnumIterator;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use trunkdesk_core::{Page, ViewController, ViewSnapshot};

use crate::action::Action;
use crate::bridge::{self, ControllerRequest};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screens::{create_screens, login::LoginScreen};
use crate::theme;
use crate::tui::Tui;
use crate::widgets::{self, form::FormOverlay};

pub struct App {
    /// Last state published by the controller task.
    snapshot: ViewSnapshot,
    screens: HashMap<Page, Box<dyn Component>>,
    login: LoginScreen,
    form: FormOverlay,
    help_visible: bool,
    running: bool,
    /// One entry per unanswered request; `true` when it may hit the network.
    in_flight: VecDeque<bool>,
    /// "profile @ server", shown in the status bar.
    location: String,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    controller: Option<ViewController>,
    requests: Option<mpsc::UnboundedSender<ControllerRequest>>,
    cancel: CancellationToken,
}

impl App {
    pub fn new(controller: ViewController, login: LoginScreen, location: String) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Self {
            snapshot: ViewSnapshot::default(),
            screens: create_screens().into_iter().collect(),
            login,
            form: FormOverlay::default(),
            help_visible: false,
            running: true,
            in_flight: VecDeque::new(),
            location,
            action_tx,
            action_rx,
            controller: Some(controller),
            requests: None,
            cancel: CancellationToken::new(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        if let Some(controller) = self.controller.take() {
            self.requests = Some(bridge::spawn_controller(
                controller,
                self.action_tx.clone(),
                self.cancel.clone(),
            ));
        }
        self.send_request(ControllerRequest::Start);

        let mut events = EventReader::new(
            Duration::from_millis(250), // spinner tick
            Duration::from_millis(33),  // ~30 FPS
        );

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            let action = match event {
                Event::Key(key) => self.handle_key_event(key)?,
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                Event::Tick => Some(Action::Tick),
                Event::Render => Some(Action::Render),
            };
            if let Some(action) = action {
                self.action_tx.send(action)?;
            }

            while let Ok(action) = self.action_rx.try_recv() {
                let render = matches!(action, Action::Render);
                self.process_action(action)?;
                if render {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.cancel.cancel();
        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    fn loading(&self) -> bool {
        self.in_flight.iter().any(|remote| *remote)
    }

    fn send_request(&mut self, request: ControllerRequest) {
        let Some(requests) = &self.requests else {
            warn!(?request, "controller task not running; request dropped");
            return;
        };
        let remote = request.is_remote();
        if requests.send(request).is_err() {
            warn!("controller task has stopped");
            return;
        }
        self.in_flight.push_back(remote);
    }

    /// Global keys first, then overlays in stacking order, then the page.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if !self.snapshot.is_authenticated() {
            return self.login.handle_key_event(key);
        }

        if self.snapshot.pending_delete().is_some() {
            return Ok(match key.code {
                KeyCode::Char('y' | 'Y') => Some(ControllerRequest::ConfirmDelete.into()),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => {
                    Some(ControllerRequest::DeclineDelete.into())
                }
                _ => None,
            });
        }

        if self.form.is_open() {
            return Ok(self.form.handle_key_event(key));
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        let page = self.snapshot.page();
        let request = match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
            (_, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),
            (KeyModifiers::NONE, KeyCode::Char(c @ '1'..='9')) => c
                .to_digit(10)
                .and_then(|d| usize::try_from(d).ok())
                .and_then(|d| Page::from_index(d - 1))
                .map(ControllerRequest::Navigate),
            (KeyModifiers::NONE, KeyCode::Tab) => Some(ControllerRequest::Navigate(page.next())),
            (_, KeyCode::BackTab) => Some(ControllerRequest::Navigate(page.prev())),
            (KeyModifiers::NONE, KeyCode::Char('r')) => Some(ControllerRequest::Reload),
            (_, KeyCode::Char('L')) => Some(ControllerRequest::Logout),
            (KeyModifiers::NONE, KeyCode::Char('x') | KeyCode::Esc)
                if self.snapshot.banner.is_some() =>
            {
                Some(ControllerRequest::DismissBanner)
            }
            _ => None,
        };
        if let Some(request) = request {
            return Ok(Some(request.into()));
        }

        match self.screens.get_mut(&page) {
            Some(screen) => screen.handle_key_event(key),
            None => Ok(None),
        }
    }

    fn process_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,
            Action::ToggleHelp => self.help_visible = !self.help_visible,
            Action::Resize(w, h) => {
                debug!(w, h, "terminal resized");
                self.action_tx.send(Action::Render)?;
            }
            Action::Tick => {
                self.login.update(&Action::Tick)?;
            }
            Action::Request(request) => self.send_request(request),
            Action::ViewUpdated(snapshot) => self.apply_snapshot(snapshot)?,
            Action::Render => {}
        }
        Ok(())
    }

    fn apply_snapshot(&mut self, snapshot: Box<ViewSnapshot>) -> Result<()> {
        self.in_flight.pop_front();
        self.form.sync(&snapshot);
        if !snapshot.is_authenticated() {
            self.help_visible = false;
        }
        self.snapshot = (*snapshot).clone();

        let page = self.snapshot.page();
        let action = Action::ViewUpdated(snapshot);
        let mut follow_ups = Vec::new();
        follow_ups.extend(self.login.update(&action)?);
        for (screen_page, screen) in &mut self.screens {
            screen.set_focused(*screen_page == page);
            follow_ups.extend(screen.update(&action)?);
        }
        for follow_up in follow_ups {
            self.action_tx.send(follow_up)?;
        }
        Ok(())
    }

    // ── Rendering ───────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        if !self.snapshot.is_authenticated() {
            self.login.render(frame, area);
            return;
        }

        let layout = Layout::vertical([
            Constraint::Min(1),    // page
            Constraint::Length(1), // tabs
            Constraint::Length(1), // status
        ])
        .split(area);

        if let Some(screen) = self.screens.get(&self.snapshot.page()) {
            screen.render(frame, layout[0]);
        }
        self.render_tab_bar(frame, layout[1]);
        self.render_status_bar(frame, layout[2]);

        // Last drawn is topmost.
        if let Some(banner) = &self.snapshot.banner {
            widgets::render_banner(frame, area, banner);
        }
        self.form.render(frame, area);
        if let Some(pending) = self.snapshot.pending_delete() {
            widgets::render_confirm(frame, area, pending);
        }
        if self.help_visible {
            self.render_help(frame, area);
        }
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let active = self.snapshot.page();
        let titles: Vec<Line> = Page::iter()
            .map(|page| {
                let style = if page == active {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(
                    format!(" {} {} ", page.index() + 1, page.label()),
                    style,
                ))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(active.index());
        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let Some(view) = self.snapshot.authenticated() else {
            return;
        };
        let role_style = if view.user.is_admin() {
            Style::default().fg(theme::ACCENT)
        } else {
            Style::default().fg(theme::TEXT)
        };

        let mut spans = vec![
            Span::styled(" ● ", Style::default().fg(theme::GREEN)),
            Span::styled(view.user.username.as_str(), Style::default().fg(theme::CYAN)),
            Span::styled(format!(" ({})", view.user.role), role_style),
            Span::styled(format!(" @ {}", self.location), theme::key_hint()),
        ];
        if self.loading() {
            spans.push(Span::styled(" ◐ loading", Style::default().fg(theme::YELLOW)));
        }
        spans.push(Span::styled(
            " │ r reload  L logout  ? help  q quit",
            theme::key_hint(),
        ));
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_help(&self, frame: &mut Frame, area: Rect) {
        let entry = |keys: &'static str, what: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {keys:<10}"), theme::key_hint_key()),
                Span::styled(what, theme::key_hint()),
            ])
        };
        let heading = |text: &'static str| {
            Line::from(Span::styled(text, Style::default().fg(theme::CYAN)))
        };

        let mut lines = vec![
            heading("  Navigation"),
            entry("1-6", "Jump to page"),
            entry("Tab", "Next page"),
            entry("j/k ↑/↓", "Move selection"),
            entry("g/G", "Top / bottom"),
            entry("r", "Reload page"),
            Line::from(""),
        ];
        if self.snapshot.can_edit() {
            lines.extend([
                heading("  Records"),
                entry("a", "Add record"),
                entry("e Enter", "Edit selected"),
                entry("d", "Delete selected"),
                Line::from(""),
            ]);
        }
        lines.extend([
            heading("  Session"),
            entry("L", "Log out"),
            entry("x", "Dismiss error"),
            entry("q", "Quit"),
        ]);

        let height = u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_add(2);
        let dialog = widgets::centered(area, 44, height);
        let inner = widgets::panel(frame, dialog, "Keyboard Shortcuts", theme::border_focused());
        frame.render_widget(Paragraph::new(lines), inner);
    }
}
