// Search results widget.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::protocol::SearchStatus;
use crate::tui::widgets::participants::border_style;
use crate::tui::{Focus, ViewState};

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let focused = state.focus == Focus::Results;
    let title = if state.search_query.is_empty() {
        "Search".to_string()
    } else {
        format!("Search: {}", state.search_query)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border_style(focused));

    let message = match &state.search {
        SearchStatus::Idle => Some(("  Press '/' to search players.", Color::DarkGray)),
        SearchStatus::Pending => Some(("  Searching...", Color::Yellow)),
        SearchStatus::NoResults => Some(("  No results", Color::DarkGray)),
        SearchStatus::Failed(_) => Some(("  Search failed", Color::Red)),
        SearchStatus::Results(_) => None,
    };
    if let Some((text, color)) = message {
        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(color))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = state
        .search_results()
        .iter()
        .map(|hit| ListItem::new(format!(" {}  ({})", hit.name, hit.id)))
        .collect();
    let list = List::new(items).block(block).highlight_style(if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    });
    let mut list_state = ListState::default().with_selected(Some(state.selected_result));
    frame.render_stateful_widget(list, area, &mut list_state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::widgets::buffer_text;
    use puckpool_core::model::SearchHit;

    fn rendered(status: SearchStatus) -> String {
        let backend = ratatui::backend::TestBackend::new(50, 6);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.search = status;
        state.search_query = "mcd".into();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
        buffer_text(&terminal)
    }

    #[test]
    fn shows_each_status() {
        assert!(rendered(SearchStatus::Idle).contains("Press '/'"));
        assert!(rendered(SearchStatus::Pending).contains("Searching..."));
        assert!(rendered(SearchStatus::NoResults).contains("No results"));
        assert!(rendered(SearchStatus::Failed("HTTP 502".into())).contains("Search failed"));
    }

    #[test]
    fn shows_results_with_ids() {
        let text = rendered(SearchStatus::Results(vec![SearchHit {
            id: 8478402,
            name: "Connor McDavid".into(),
        }]));
        assert!(text.contains("Search: mcd"));
        assert!(text.contains("Connor McDavid  (8478402)"));
    }
}
