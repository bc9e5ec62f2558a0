//! One pane per race participant: live bars, counters and a comparison sparkline

use crate::race::{Participant, RunStats};
use crate::ui::panes::bars::render_bars_pane;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Sparkline},
    Frame,
};

fn state_label(stats: &RunStats) -> (String, ratatui::style::Color) {
    if let Some(failure) = &stats.failure {
        (format!("failed: {}", failure), DEFAULT_THEME.error)
    } else if let Some(rank) = stats.finish_rank {
        (format!("finished #{}", rank), DEFAULT_THEME.success)
    } else if stats.is_running {
        ("running".to_string(), DEFAULT_THEME.secondary)
    } else {
        ("stopped".to_string(), DEFAULT_THEME.comment)
    }
}

pub fn render_participant_pane(frame: &mut Frame, area: Rect, participant: &Participant) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(2),
        ])
        .split(area);

    let stats = participant.stats();
    let latest = participant.latest();
    render_bars_pane(
        frame,
        rows[0],
        participant.name(),
        latest.as_ref(),
        stats.finish_rank == Some(1),
    );

    let (label, color) = state_label(&stats);
    let counters = Line::from(vec![
        Span::styled(" cmp ", Style::default().fg(DEFAULT_THEME.variable)),
        Span::styled(
            stats.comparisons.to_string(),
            Style::default().fg(DEFAULT_THEME.value),
        ),
        Span::styled("  swp ", Style::default().fg(DEFAULT_THEME.variable)),
        Span::styled(stats.swaps.to_string(), Style::default().fg(DEFAULT_THEME.value)),
        Span::styled("  step ", Style::default().fg(DEFAULT_THEME.variable)),
        Span::styled(
            stats.current_step.to_string(),
            Style::default().fg(DEFAULT_THEME.value),
        ),
        Span::styled(format!("  {}", label), Style::default().fg(color)),
    ]);
    frame.render_widget(Paragraph::new(counters), rows[1]);

    let points: Vec<u64> = participant
        .series()
        .iter()
        .map(|p| p.comparisons as u64)
        .collect();
    // keep the most recent points that fit
    let width = rows[2].width as usize;
    let tail = &points[points.len().saturating_sub(width)..];
    let sparkline = Sparkline::default()
        .data(tail)
        .style(Style::default().fg(DEFAULT_THEME.primary));
    frame.render_widget(sparkline, rows[2]);
}
