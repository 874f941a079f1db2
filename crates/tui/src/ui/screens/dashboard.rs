use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::{app::AppState, ui::theme::Theme};

pub fn render_transactions(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();

    let filter_label = state
        .kind_filter
        .map(|kind| kind.as_str())
        .unwrap_or("tutti");
    let block = Block::default()
        .title(format!(" movimenti ({filter_label}) "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));

    let visible = state.visible();
    let mut lines: Vec<Line<'_>> = Vec::with_capacity(visible.len() + 2);

    lines.push(Line::from(Span::styled(
        format!(
            "entrate {}  uscite {}  netto {}  ({} movimenti)",
            state.summary.income, state.summary.expenses, state.summary.net, state.summary.count,
        ),
        Style::default().fg(theme.text_muted),
    )));
    lines.push(Line::default());

    if visible.is_empty() {
        lines.push(Line::from(Span::styled(
            "Nessun movimento.",
            Style::default().fg(theme.text_muted),
        )));
    }

    for (index, record) in visible.iter().enumerate() {
        let amount_style = if record.amount.is_negative() {
            Style::default().fg(theme.error)
        } else {
            Style::default().fg(theme.positive)
        };
        let row_style = if index == state.selected {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default().fg(theme.text)
        };

        let tag = record
            .tag
            .as_deref()
            .map(|tag| format!(" #{tag}"))
            .unwrap_or_default();
        lines.push(Line::from(vec![
            Span::styled(
                format!(
                    "{} {:10}  {:28}",
                    record.kind().glyph(),
                    record.occurred_at.format("%Y-%m-%d"),
                    format!("{}{tag}", record.label),
                ),
                row_style,
            ),
            Span::styled(format!("{:>12}", record.amount.to_string()), amount_style),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

pub fn render_vehicles(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let block = Block::default()
        .title(" veicoli ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));

    let mut lines: Vec<Line<'_>> = Vec::with_capacity(state.vehicles.len().max(1));
    if state.vehicles.is_empty() {
        lines.push(Line::from(Span::styled(
            "Nessun veicolo.",
            Style::default().fg(theme.text_muted),
        )));
    }
    for vehicle in &state.vehicles {
        let status = if vehicle.active { "attivo" } else { "fermo" };
        lines.push(Line::from(format!(
            "{:10}  {:20}  {status}",
            vehicle.plate,
            vehicle.model.as_deref().unwrap_or("-"),
        )));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

pub fn render_drivers(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let block = Block::default()
        .title(" autisti ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));

    let mut lines: Vec<Line<'_>> = Vec::with_capacity(state.drivers.len().max(1));
    if state.drivers.is_empty() {
        lines.push(Line::from(Span::styled(
            "Nessun autista.",
            Style::default().fg(theme.text_muted),
        )));
    }
    for driver in &state.drivers {
        let status = if driver.active { "attivo" } else { "sospeso" };
        lines.push(Line::from(format!(
            "{:20}  {:26}  {status}",
            driver.name,
            driver.email.as_deref().unwrap_or("-"),
        )));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
