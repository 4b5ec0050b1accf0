//! Overlays drawn on top of the active page.

pub mod form;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};

use trunkdesk_core::PendingDelete;

use crate::theme;

/// A `width` x `height` rect centered in `area`, shrunk to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    )
}

/// Clear `area` and draw a rounded panel; returns the inner rect.
pub fn panel(frame: &mut Frame, area: Rect, title: &str, border: Style) -> Rect {
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(format!(" {title} "))
        .title_style(theme::title())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border)
        .style(Style::default().bg(theme::BG_DARK));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    inner
}

pub fn confirm_message(pending: PendingDelete) -> String {
    format!(
        "Are you sure you want to delete {} {}?",
        pending.kind.singular(),
        pending.id
    )
}

pub fn render_confirm(frame: &mut Frame, area: Rect, pending: PendingDelete) {
    let dialog = centered(area, 54, 6);
    let inner = panel(frame, dialog, "Confirm", Style::default().fg(theme::YELLOW));

    let text = vec![
        Line::from(Span::styled(
            confirm_message(pending),
            Style::default().fg(theme::TEXT),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("y ", theme::key_hint_key()),
            Span::styled("delete    ", theme::key_hint()),
            Span::styled("n ", theme::key_hint_key()),
            Span::styled("keep", theme::key_hint()),
        ]),
    ];
    frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }), inner);
}

/// Error toast above the status bar.
pub fn render_banner(frame: &mut Frame, area: Rect, message: &str) {
    let text_width = u16::try_from(message.chars().count()).unwrap_or(u16::MAX);
    let width = text_width.saturating_add(18).clamp(24, area.width.max(24));
    let toast = Rect::new(
        area.x + area.width.saturating_sub(width + 1),
        area.y + area.height.saturating_sub(5),
        width.min(area.width),
        3.min(area.height),
    );

    frame.render_widget(Clear, toast);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme::RED))
        .style(Style::default().bg(theme::BG_DARK));
    let inner = block.inner(toast);
    frame.render_widget(block, toast);

    let line = Line::from(vec![
        Span::styled(" ✗ ", Style::default().fg(theme::RED)),
        Span::styled(message, Style::default().fg(theme::TEXT)),
        Span::styled("  x ", theme::key_hint_key()),
        Span::styled("dismiss", theme::key_hint()),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}
