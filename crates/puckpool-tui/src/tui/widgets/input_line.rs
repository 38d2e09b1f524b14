// Input line widget: the active text prompt, or a hint when idle.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let block = Block::default().borders(Borders::ALL);

    let paragraph = match &state.input {
        Some(input) => {
            let line = Line::from(vec![
                Span::styled(
                    format!("{}: ", input.kind.prompt()),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(input.buffer.clone()),
                Span::styled("_", Style::default().fg(Color::Yellow)),
            ]);
            Paragraph::new(line).block(block.border_style(Style::default().fg(Color::Cyan)))
        }
        None => Paragraph::new("a: add participant  /: search  i: import  e: export")
            .style(Style::default().fg(Color::DarkGray))
            .block(block),
    };
    frame.render_widget(paragraph, area);
}
