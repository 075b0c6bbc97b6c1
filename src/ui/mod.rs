//! UI module for rendering the TUI

mod button;
mod field_renderer;

use crate::app::{App, Owner};
use crate::platform::SUBMIT_SHORTCUT;
use button::{render_button, BUTTON_HEIGHT};
use field_renderer::{draw_field, FIELD_HEIGHT};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tui_form_state::FieldElement;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Percentage(35),
            Constraint::Percentage(30),
        ])
        .split(rows[0]);

    draw_form(frame, columns[0], app, Owner::Signup, " Sign up ");
    draw_form(frame, columns[1], app, Owner::Address, " Address ");
    draw_values(frame, columns[2], app);
    draw_status_bar(frame, rows[1], app);
}

fn draw_form(frame: &mut Frame, area: Rect, app: &App, owner: Owner, title: &str) {
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut y = inner.y;
    for (index, slot) in app.fields.iter().enumerate() {
        if slot.owner != owner {
            continue;
        }
        if y + FIELD_HEIGHT > inner.bottom() {
            break;
        }
        let field_area = Rect::new(inner.x, y, inner.width, FIELD_HEIGHT);
        let binding = app.binding(index);
        let error = if app.has_error(index) {
            app.error(index)
        } else {
            None
        };
        draw_field(
            frame,
            field_area,
            slot.label,
            &binding,
            app.focused == Some(index),
            slot.element.is_disabled(),
            error,
        );
        y += FIELD_HEIGHT;
    }

    if owner == Owner::Signup && y + BUTTON_HEIGHT <= inner.bottom() {
        let blocked = app.signup.was_submitted() && app.signup.errors().outstanding() > 0;
        render_button(
            frame,
            Rect::new(inner.x, y, inner.width, BUTTON_HEIGHT),
            &format!("Submit ({SUBMIT_SHORTCUT})"),
            app.focused.is_none(),
            blocked,
        );
    }
}

/// Live preview of the sign-up value tree
fn draw_values(frame: &mut Frame, area: Rect, app: &App) {
    let json = serde_json::to_string_pretty(app.signup.values()).unwrap_or_default();
    let block = Block::default()
        .title(" Values ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(
        Paragraph::new(json)
            .wrap(Wrap { trim: false })
            .block(block),
        area,
    );
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        format!(" Enter: next  Tab/Shift+Tab: move  {SUBMIT_SHORTCUT}: submit  Esc: quit"),
        Style::default().fg(Color::DarkGray),
    )];

    if let Some(msg) = &app.status_message {
        let color = if app.submission().is_some() && app.signup.errors().outstanding() == 0 {
            Color::Green
        } else {
            Color::Red
        };
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(color)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
