use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::{
    app::{AppState, SignupField},
    ui::{components::centered_box, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let card = centered_box(44, 11, area);

    frame.render_widget(Clear, card);
    let block = Block::default()
        .title(" nuovo account ")
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
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    let field_style = |field: SignupField| {
        if state.signup.focus == field {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.text_muted)
        }
    };

    frame.render_widget(
        Paragraph::new(format!("Nome: {}", state.signup.name))
            .style(field_style(SignupField::Name)),
        rows[0],
    );
    frame.render_widget(
        Paragraph::new(format!("Email: {}", state.signup.email))
            .style(field_style(SignupField::Email)),
        rows[1],
    );
    let masked = "•".repeat(state.signup.password.chars().count());
    frame.render_widget(
        Paragraph::new(format!("Password: {masked}")).style(field_style(SignupField::Password)),
        rows[2],
    );
    frame.render_widget(
        Paragraph::new(format!("Ruolo: {} (↑/↓ cambia)", state.signup.role.as_str()))
            .style(field_style(SignupField::Role)),
        rows[3],
    );

    frame.render_widget(
        Paragraph::new("Invio registra · Tab campo · Esc indietro")
            .style(Style::default().fg(theme.text_muted)),
        rows[5],
    );

    if let Some(message) = &state.signup.message {
        frame.render_widget(
            Paragraph::new(message.as_str()).style(Style::default().fg(theme.error)),
            rows[6],
        );
    }
}
