// Picks widget: the selected participant's players with season stats.

use puckpool_core::model::{Participant, Pick, MAX_PICKS};
use puckpool_core::ranking::participant_total;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table, TableState};
use ratatui::Frame;

use crate::tui::widgets::participants::border_style;
use crate::tui::{Focus, ViewState};

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let focused = state.focus == Focus::Picks;
    let Some(participant) = state.selected_participant() else {
        let paragraph = Paragraph::new("  Select a participant.")
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Picks")
                    .border_style(border_style(focused)),
            );
        frame.render_widget(paragraph, area);
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title(participant))
        .border_style(border_style(focused));

    if participant.picks.is_empty() {
        let paragraph = Paragraph::new("  No picks yet. Press '/' to search for players.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec!["#", "Player", "GP", "G", "A", "P"]).style(
        Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::BOLD),
    );
    let rows: Vec<Row> = participant
        .picks
        .iter()
        .enumerate()
        .map(|(i, pick)| pick_row(i, pick))
        .collect();

    let widths = [
        Constraint::Length(3),
        Constraint::Min(16),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(4),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(if focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        });

    let mut table_state = TableState::default().with_selected(Some(state.selected_pick));
    frame.render_stateful_widget(table, area, &mut table_state);
}

/// "Alice (3/10) - 42 pts"
pub fn title(participant: &Participant) -> String {
    format!(
        "{} ({}/{}) - {} pts",
        participant.name,
        participant.picks.len(),
        MAX_PICKS,
        participant_total(participant)
    )
}

fn pick_row(index: usize, pick: &Pick) -> Row<'static> {
    let stats = pick.stats.as_ref();
    Row::new(vec![
        (index + 1).to_string(),
        pick.display_name().to_string(),
        format_stat(stats.map(|s| s.games)),
        format_stat(stats.map(|s| s.goals)),
        format_stat(stats.map(|s| s.assists)),
        format_stat(stats.map(|s| s.points)),
    ])
}

/// A stat cell; "-" until stats have been fetched.
pub fn format_stat(value: Option<u32>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
