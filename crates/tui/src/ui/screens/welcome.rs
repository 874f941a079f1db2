use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Style,
    text::Line,
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::ui::{components::centered_box, theme::Theme};

pub fn render(frame: &mut Frame<'_>, area: Rect) {
    let theme = Theme::default();
    let card = centered_box(46, 7, area);

    frame.render_widget(Clear, card);
    let block = Block::default()
        .title(" flotta ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.accent));

    let lines = vec![
        Line::from("Benvenuto nel gestore flotta."),
        Line::from(""),
        Line::from("Guadagni, spese e veicoli in un posto solo."),
        Line::from(""),
        Line::from("Premi un tasto per iniziare."),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.text))
            .block(block),
        card,
    );
}
