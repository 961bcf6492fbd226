//! Country detail screen rendering

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::cache::Storage;
use crate::data::{format_population, Country};

/// Renders the detail view for the country with alpha code `code`
pub fn render<S: Storage>(frame: &mut Frame, app: &App<S>, code: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(1)])
        .split(frame.area());

    match &app.detail {
        Some(country) => {
            let paragraph = Paragraph::new(detail_lines(country))
                .block(
                    Block::default()
                        .title(format!(" {} ", country.common_name()))
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Cyan)),
                )
                .wrap(Wrap { trim: false });
            frame.render_widget(paragraph, chunks[0]);
        }
        None => {
            let loading = Paragraph::new(format!("Loading {}...", code))
                .style(Style::default().fg(Color::Cyan))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(loading, chunks[0]);
        }
    }

    let footer = Paragraph::new(Span::styled(
        " Esc: back  q: quit  ?: help ",
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(footer, chunks[1]);
}

fn field(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("  {:<12}", label),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(value),
    ])
}

fn detail_lines(country: &Country) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            format!(
                "{} {}",
                country.flag().unwrap_or(""),
                country.official_name()
            ),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        field("Codes", format!("{} / {}", country.cca2(), country.cca3())),
        field(
            "Capital",
            if country.capitals().is_empty() {
                "-".to_string()
            } else {
                country.capitals().join(", ")
            },
        ),
        field("Region", country.region().to_string()),
    ];

    if let Some(subregion) = country.subregion() {
        lines.push(field("Subregion", subregion.to_string()));
    }
    lines.push(field("Population", format_population(country.population())));

    if let Some(languages) = country.get("languages").and_then(|v| v.as_object()) {
        let names: Vec<&str> = languages.values().filter_map(|v| v.as_str()).collect();
        if !names.is_empty() {
            lines.push(field("Languages", names.join(", ")));
        }
    }

    lines
}
