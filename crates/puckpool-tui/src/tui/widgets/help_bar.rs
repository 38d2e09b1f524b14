// Help bar widget: latest notice, or key hints.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::NoticeLevel;
use crate::tui::ViewState;

const KEY_HINTS: &[(&str, &str)] = &[
    ("Tab", "Focus"),
    ("Enter", "Add pick"),
    ("d", "Remove"),
    ("r/R", "Refresh"),
    ("1-3", "Season"),
    ("Esc", "Dismiss"),
    ("q", "Quit"),
];

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let line = match &state.notice {
        Some(notice) => {
            let color = match notice.level {
                NoticeLevel::Info => Color::Green,
                NoticeLevel::Error => Color::Red,
            };
            Line::from(Span::styled(
                format!(" {}", notice.text),
                Style::default().fg(color),
            ))
        }
        None => Line::from(hint_spans()),
    };
    frame.render_widget(
        Paragraph::new(line).style(Style::default().bg(Color::Black)),
        area,
    );
}

fn hint_spans() -> Vec<Span<'static>> {
    let mut spans = vec![Span::raw(" ")];
    for (key, action) in KEY_HINTS {
        spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        spans.push(Span::styled(
            format!(":{action}  "),
            Style::default().fg(Color::Gray),
        ));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Notice;
    use crate::tui::widgets::buffer_text;

    fn rendered(state: &ViewState) -> String {
        let backend = ratatui::backend::TestBackend::new(100, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), state))
            .unwrap();
        buffer_text(&terminal)
    }

    #[test]
    fn shows_hints_without_notice() {
        let text = rendered(&ViewState::default());
        assert!(text.contains("Tab:Focus"));
        assert!(text.contains("q:Quit"));
    }

    #[test]
    fn notice_replaces_hints() {
        let mut state = ViewState::default();
        state.notice = Some(Notice::error("Import failed: not a list"));
        let text = rendered(&state);
        assert!(text.contains("Import failed: not a list"));
        assert!(!text.contains("Tab:Focus"));
    }
}
