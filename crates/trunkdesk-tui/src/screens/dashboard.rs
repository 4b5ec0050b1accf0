//! Dashboard page: channel utilization per area code plus record counts.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table};

use color_eyre::eyre::Result;
use trunkdesk_core::{DashboardStats, Page, PageData};

use crate::action::Action;
use crate::component::Component;
use crate::theme;

const BAR_WIDTH: u64 = 20;

pub struct DashboardScreen {
    focused: bool,
    stats: Option<DashboardStats>,
}

impl DashboardScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            stats: None,
        }
    }

    fn render_totals(frame: &mut Frame, area: Rect, stats: &DashboardStats) {
        let tile = |label: &'static str, value: u64| {
            vec![
                Span::styled(format!(" {label} "), Style::default().fg(theme::TEXT)),
                Span::styled(
                    value.to_string(),
                    Style::default()
                        .fg(theme::CYAN)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled("   │", theme::key_hint()),
            ]
        };

        let mut spans = tile("NSO trunks", stats.total_nso_trunks);
        spans.extend(tile("VNO trunks", stats.total_vno_trunks));
        spans.extend(tile("DIDs", stats.total_dids));
        spans.pop();
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_table(frame: &mut Frame, area: Rect, stats: &DashboardStats) {
        if stats.by_area_code.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("No NSO trunks yet", theme::key_hint()))
                    .alignment(Alignment::Center),
                area,
            );
            return;
        }

        let header = Row::new(
            ["Area Code", "Total", "Allocated", "Remaining", "Utilization"]
                .map(|h| Cell::from(h).style(theme::table_header())),
        );

        let rows = stats.by_area_code.iter().map(|(code, s)| {
            let color = theme::utilization(s.utilization);
            Row::new(vec![
                Cell::from(code.clone()).style(Style::default().fg(theme::CORAL)),
                Cell::from(s.total_channels.to_string()),
                Cell::from(s.allocated_channels.to_string()),
                Cell::from(s.remaining_channels.to_string()),
                Cell::from(Line::from(vec![
                    Span::styled(utilization_bar(s.utilization), Style::default().fg(color)),
                    Span::styled(
                        format!(" {:>3}%", s.utilization),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                ])),
            ])
            .style(theme::table_row())
        });

        let widths = [
            Constraint::Length(11),
            Constraint::Length(8),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Min(26),
        ];
        frame.render_widget(Table::new(rows, widths).header(header), area);
    }
}

/// Fixed-width bar; over-allocation renders full.
pub fn utilization_bar(percent: u64) -> String {
    let filled = (percent.min(100) * BAR_WIDTH).div_ceil(100);
    let empty = BAR_WIDTH - filled;
    let filled = usize::try_from(filled).unwrap_or(0);
    let empty = usize::try_from(empty).unwrap_or(0);
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

impl Component for DashboardScreen {
    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::ViewUpdated(snapshot) = action {
            match &snapshot.data {
                PageData::Dashboard(stats) => self.stats = Some(stats.clone()),
                _ if snapshot.page() == Page::Dashboard => self.stats = None,
                _ => {}
            }
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Dashboard ")
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

        let Some(stats) = &self.stats else {
            frame.render_widget(
                Paragraph::new(Span::styled("No data  (r to reload)", theme::key_hint()))
                    .alignment(Alignment::Center),
                inner,
            );
            return;
        };

        let layout = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(inner);
        Self::render_totals(frame, layout[0], stats);
        Self::render_table(frame, layout[2], stats);
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
