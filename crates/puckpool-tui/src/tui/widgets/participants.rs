// Participants widget: every participant with pick count and point total.

use puckpool_core::model::MAX_PICKS;
use puckpool_core::ranking::participant_total;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::tui::{Focus, ViewState};

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Participants ({})", state.participants.len()))
        .border_style(border_style(state.focus == Focus::Participants));

    if state.participants.is_empty() {
        let paragraph = Paragraph::new("  No participants yet. Press 'a' to add one.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = state
        .participants
        .iter()
        .map(|p| {
            ListItem::new(format!(
                " {}  ({}/{})  {} pts",
                p.name,
                p.picks.len(),
                MAX_PICKS,
                participant_total(p)
            ))
        })
        .collect();

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );
    let mut list_state = ListState::default().with_selected(Some(state.selected));
    frame.render_stateful_widget(list, area, &mut list_state);
}

pub(crate) fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::widgets::buffer_text;
    use puckpool_core::model::{Participant, Pick, PlayerStats};

    #[test]
    fn render_empty_shows_hint() {
        let backend = ratatui::backend::TestBackend::new(60, 6);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
        assert!(buffer_text(&terminal).contains("No participants yet"));
    }

    #[test]
    fn render_shows_pick_count_and_total() {
        let backend = ratatui::backend::TestBackend::new(60, 6);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut alice = Participant::new("Alice");
        let mut pick = Pick::new(1, "A");
        pick.stats = Some(PlayerStats {
            points: 17,
            ..PlayerStats::zeroed(1, "A")
        });
        alice.picks.push(pick);
        let mut state = ViewState::default();
        state.participants = vec![alice];
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
        assert!(buffer_text(&terminal).contains("Alice  (1/10)  17 pts"));
    }
}
