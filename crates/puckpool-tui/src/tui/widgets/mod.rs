// TUI widget modules for each screen panel.

pub mod help_bar;
pub mod input_line;
pub mod participants;
pub mod picks;
pub mod ranking;
pub mod search;
pub mod status_bar;

/// Flatten a rendered test buffer into one string for `contains` checks.
#[cfg(test)]
pub(crate) fn buffer_text(terminal: &ratatui::Terminal<ratatui::backend::TestBackend>) -> String {
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}
