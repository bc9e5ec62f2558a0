//! Status bar rendering with keybindings and state indicators

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Badge shown at the right end of the status bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    None,
    Playing,
    Paused,
    Start,
    End,
    Stopped,
}

impl Badge {
    fn label_and_color(self) -> Option<(&'static str, Color)> {
        match self {
            Badge::None => None,
            Badge::Playing => Some((" ▶ PLAYING ", DEFAULT_THEME.secondary)),
            Badge::Paused => Some((" ⏸ PAUSED ", DEFAULT_THEME.primary)),
            Badge::Start => Some((" START ", DEFAULT_THEME.success)),
            Badge::End => Some((" END ", DEFAULT_THEME.error)),
            Badge::Stopped => Some((" STOPPED ", DEFAULT_THEME.error)),
        }
    }
}

/// Everything the status bar shows
pub struct StatusLine<'a> {
    /// Left badge text, e.g. `Step 3/10` or `12s`
    pub position: String,
    pub message: &'a str,
    /// `(key, description)` pairs
    pub keys: &'a [(&'a str, &'a str)],
    pub badge: Badge,
}

/// Render the status bar at the bottom.
pub fn render_status_bar(frame: &mut Frame, area: Rect, status: &StatusLine) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let left_spans = vec![
        Span::styled(
            format!(" {} ", status.position),
            Style::default()
                .bg(DEFAULT_THEME.primary)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            " | ",
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(DEFAULT_THEME.comment),
        ),
        Span::styled(
            format!(" {} ", status.message),
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(DEFAULT_THEME.fg),
        ),
    ];

    let left_paragraph = Paragraph::new(Line::from(left_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Left);
    frame.render_widget(left_paragraph, layout[0]);

    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.fg);
    let sep_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.comment);

    let mut right_spans = Vec::new();
    for (i, (key, desc)) in status.keys.iter().enumerate() {
        if i > 0 {
            right_spans.push(Span::styled("│", sep_style));
            right_spans.push(Span::styled(" ", desc_style));
        }
        right_spans.push(Span::styled(format!(" {} ", key), key_style));
        right_spans.push(Span::styled(format!(" {} ", desc), desc_style));
    }

    if let Some((label, color)) = status.badge.label_and_color() {
        right_spans.push(Span::styled("│", sep_style));
        right_spans.push(Span::styled(
            label,
            Style::default()
                .bg(color)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let right_paragraph = Paragraph::new(Line::from(right_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Right);
    frame.render_widget(right_paragraph, layout[1]);
}
