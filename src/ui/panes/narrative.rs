//! Narrative pane: operation, explanation and variables of the current step

use crate::snapshot::Snapshot;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
    Frame,
};

pub fn render_narrative_pane(
    frame: &mut Frame,
    area: Rect,
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
        .title(" Step ")
        .borders(Borders::ALL)
        .border_style(border_style)
        .padding(Padding::new(1, 0, 0, 0));

    let Some(snapshot) = snapshot else {
        let paragraph = Paragraph::new("(nothing shown yet)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                snapshot.narrative.operation.clone(),
                Style::default()
                    .fg(DEFAULT_THEME.primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  [{}]", snapshot.event.kind),
                Style::default().fg(DEFAULT_THEME.comment),
            ),
        ]),
        Line::from(Span::styled(
            snapshot.narrative.explanation.clone(),
            Style::default().fg(DEFAULT_THEME.fg),
        )),
        Line::from(""),
    ];

    for (name, value) in snapshot.narrative.sorted_variables() {
        lines.push(Line::from(vec![
            Span::styled(format!("{} = ", name), Style::default().fg(DEFAULT_THEME.variable)),
            Span::styled(value.to_string(), Style::default().fg(DEFAULT_THEME.value)),
        ]));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
