// Status bar widget: app title, season picker, refresh indicator.

use puckpool_core::season::Season;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [title] [season picker] [busy label]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = vec![Span::styled(
        " NHL Pool ",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    spans.push(Span::styled("| Season ", Style::default().fg(Color::Gray)));
    spans.extend(season_spans(&state.season));

    if let Some(label) = &state.busy {
        spans.push(Span::styled(" | ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(
            label.clone(),
            Style::default().fg(Color::Yellow),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Picker spans: "[1:2023–2024] [2:2024–2025] [3:2025–2026]" with the
/// selected season highlighted.
pub fn season_spans(selected: &Season) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (i, season) in selected.picker_choices().iter().enumerate() {
        let style = if season == selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        spans.push(Span::styled(format!("[{}:{}]", i + 1, season.label()), style));
        spans.push(Span::raw(" "));
    }
    spans
}
