//! Field rendering for the demo forms

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_form_state::TextField;

/// Rows taken by one field (top border + content + bottom border)
pub const FIELD_HEIGHT: u16 = 3;

/// Text shown inside the input; secure entry is masked
pub fn display_value(binding: &TextField) -> String {
    if binding.hints.secure_entry {
        "•".repeat(binding.value.chars().count())
    } else {
        binding.value.clone()
    }
}

/// Draw a bound field. A visible error turns the border red and is shown
/// along the bottom edge.
pub fn draw_field(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    binding: &TextField,
    is_active: bool,
    is_disabled: bool,
    error: Option<&str>,
) {
    let accent = if error.is_some() {
        Color::Red
    } else if is_active {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    let style = if is_disabled {
        Style::default().fg(Color::DarkGray)
    } else if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let value = display_value(binding);
    let display_str = if value.is_empty() && !is_active {
        "(empty)".to_string()
    } else {
        value
    };

    let cursor = if is_active { "▌" } else { "" };

    let content = Paragraph::new(Line::from(vec![
        Span::styled(display_str, style),
        Span::styled(cursor, Style::default().fg(Color::Cyan)),
    ]));

    let title = if is_disabled {
        format!(" {label} (read-only) ")
    } else {
        format!(" {label} ")
    };

    let mut block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent));
    if let Some(message) = error {
        block = block.title_bottom(Span::styled(
            format!(" {message} "),
            Style::default().fg(Color::Red),
        ));
    }

    frame.render_widget(content.block(block), area);
}
