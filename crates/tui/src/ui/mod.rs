pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use engine::TapState;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{AppState, Screen, Section};

pub use terminal::{AppTerminal as Terminal, enter, leave};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let area = frame.area();
    match state.screen {
        Screen::Welcome => screens::welcome::render(frame, area),
        Screen::Login => screens::login::render(frame, area, state),
        Screen::Signup => screens::signup::render(frame, area, state),
        Screen::Dashboard => render_shell(frame, area, state),
    }
}

fn render_shell(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();

    // Main layout: info bar, content, bottom bar
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);

    match state.section {
        Section::Transactions => screens::dashboard::render_transactions(frame, layout[1], state),
        Section::Vehicles => screens::dashboard::render_vehicles(frame, layout[1], state),
        Section::Drivers => screens::dashboard::render_drivers(frame, layout[1], state),
    }

    render_bottom_bar(frame, layout[2], state, &theme);

    // Blocking modal while a confirmation is pending or a delete in flight.
    if let TapState::ConfirmPending { key } | TapState::Deleting { key } = state.tap.state() {
        let label = state
            .records
            .iter()
            .find(|record| record.key == key)
            .map(|record| record.label.as_str())
            .unwrap_or("movimento");
        components::render_confirm(frame, area, label);
    }

    components::render_toast(frame, area, state.toast.as_ref());
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let (user, role) = state
        .identity
        .as_ref()
        .map(|identity| (identity.name.as_str(), identity.role.as_str()))
        .unwrap_or(("-", "-"));
    let status = if state.loading { "..." } else { "OK" };

    let line = Line::from(vec![
        Span::styled("Utente", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {user} ({role})  ")),
        Span::styled("Sezione", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.section.label())),
        Span::styled("Netto", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.summary.net)),
        Span::styled(status, Style::default().fg(theme.accent)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mut parts: Vec<Span<'_>> = vec![
        Span::styled("t", Style::default().fg(theme.accent)),
        Span::raw(" movimenti  "),
        Span::styled("v", Style::default().fg(theme.accent)),
        Span::raw(" veicoli  "),
        Span::styled("d", Style::default().fg(theme.accent)),
        Span::raw(" autisti  "),
        Span::styled("r", Style::default().fg(theme.accent)),
        Span::raw(" aggiorna  "),
    ];

    if state.section == Section::Transactions {
        parts.extend([
            Span::styled("e/x/a/u", Style::default().fg(theme.accent)),
            Span::raw(" filtro  "),
            Span::styled("Invio×2", Style::default().fg(theme.accent)),
            Span::raw(" elimina  "),
        ]);
    }

    parts.extend([
        Span::styled("l", Style::default().fg(theme.accent)),
        Span::raw(" esci  "),
        Span::styled("q", Style::default().fg(theme.accent)),
        Span::raw(" chiudi"),
    ]);

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}
