use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::{
    app::{AppState, LoginField},
    ui::{components::centered_box, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let card = centered_box(40, 9, area);

    frame.render_widget(Clear, card);
    let block = Block::default()
        .title(" accesso ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));
    let inner = block.inner(card);
    frame.render_widget(block, card);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let field_style = |field: LoginField| {
        if state.login.focus == field {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.text_muted)
        }
    };

    frame.render_widget(
        Paragraph::new(format!("Email: {}", state.login.email))
            .style(field_style(LoginField::Email)),
        rows[0],
    );
    let masked = "•".repeat(state.login.password.chars().count());
    frame.render_widget(
        Paragraph::new(format!("Password: {masked}")).style(field_style(LoginField::Password)),
        rows[1],
    );

    let hint = if state.login.busy {
        "Accesso in corso..."
    } else {
        "Invio accedi · Tab campo · Ctrl+N registrati"
    };
    frame.render_widget(
        Paragraph::new(Line::from(hint)).style(Style::default().fg(theme.text_muted)),
        rows[3],
    );

    if let Some(message) = &state.login.message {
        frame.render_widget(
            Paragraph::new(message.as_str()).style(Style::default().fg(theme.error)),
            rows[4],
        );
    }
}
