// Screen layout: panel arrangement and sizing.
//
// +--------------------------------------------------+
// | Status Bar: season picker, busy indicator (1 row) |
// +------------------+-------------------------------+
// | Participants     | Picks of selected participant |
// | (35%, 60% tall)  | (65%, 60% tall)               |
// +------------------+-------------------------------+
// | Ranking          | Search results                |
// +------------------+-------------------------------+
// | Input line (3 rows)                               |
// +--------------------------------------------------+
// | Help Bar / notice (1 row)                         |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Resolved screen areas for each zone.
#[derive(Debug, Clone)]
pub struct AppLayout {
    pub status_bar: Rect,
    pub participants: Rect,
    pub ranking: Rect,
    pub picks: Rect,
    pub search: Rect,
    pub input: Rect,
    pub help_bar: Rect,
}

pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // status bar
            Constraint::Min(8),    // middle section
            Constraint::Length(3), // input line
            Constraint::Length(1), // help bar
        ])
        .split(area);

    let status_bar = vertical[0];
    let middle = vertical[1];
    let input = vertical[2];
    let help_bar = vertical[3];

    // Left column: pool overview | right column: selected participant
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(middle);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(columns[1]);

    AppLayout {
        status_bar,
        participants: left[0],
        ranking: left[1],
        picks: right[0],
        search: right[1],
        input,
        help_bar,
    }
}
