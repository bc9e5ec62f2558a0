//! Element pane: one bar per element, coloured by status

use crate::snapshot::Snapshot;
use crate::ui::theme::{status_color, DEFAULT_THEME};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};

/// Render the element bars of `snapshot`, or a placeholder
pub fn render_bars_pane(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    snapshot: Option<&Snapshot>,
    is_focused: bool,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(border_style);

    let snapshot = match snapshot {
        Some(s) if !s.elements.is_empty() => s,
        Some(_) => {
            let paragraph = Paragraph::new("(empty structure)")
                .block(block)
                .style(Style::default().fg(DEFAULT_THEME.comment));
            frame.render_widget(paragraph, area);
            return;
        }
        None => {
            let paragraph = Paragraph::new(Line::from(vec![
                Span::styled("Press ", Style::default().fg(DEFAULT_THEME.comment)),
                Span::styled("space", Style::default().fg(DEFAULT_THEME.fg)),
                Span::styled(" to start", Style::default().fg(DEFAULT_THEME.comment)),
            ]))
            .block(block);
            frame.render_widget(paragraph, area);
            return;
        }
    };

    // Bars need non-negative heights; shift everything above the minimum
    let min = snapshot.elements.iter().map(|e| e.value).min().unwrap_or(0).min(0);
    let bars: Vec<Bar> = snapshot
        .elements
        .iter()
        .map(|element| {
            let color = status_color(element.status);
            Bar::default()
                .value((element.value - min) as u64)
                .text_value(element.value.to_string())
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(ratatui::style::Color::Black).bg(color))
        })
        .collect();

    let inner_width = area.width.saturating_sub(2) as usize;
    let count = snapshot.elements.len().max(1);
    // one column of gap between bars
    let bar_width = (inner_width / count).saturating_sub(1).clamp(1, 6) as u16;

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1);
    frame.render_widget(chart, area);
}
