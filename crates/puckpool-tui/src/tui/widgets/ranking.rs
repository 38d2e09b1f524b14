// Ranking widget: participants ordered by total points.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem};
use ratatui::Frame;

use puckpool_core::ranking::RankingEntry;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let items: Vec<ListItem> = state
        .ranking
        .iter()
        .enumerate()
        .map(|(i, entry)| ListItem::new(ranking_line(i + 1, entry)))
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Ranking"));
    frame.render_widget(list, area);
}

pub fn ranking_line(position: usize, entry: &RankingEntry) -> Line<'static> {
    let leader = position == 1 && entry.total > 0;
    let name_style = if leader {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::styled(format!("{position:>2}. "), Style::default().fg(Color::Gray)),
        Span::styled(entry.name.clone(), name_style),
        Span::raw("  "),
        Span::styled(format!("{} pts", entry.total), Style::default().fg(Color::Cyan)),
    ])
}
