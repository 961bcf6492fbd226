//! Search page rendering
//!
//! Renders the page tabs, the search box (or region picker), the result table
//! and the status bar shared by the three search pages.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table, TableState, Tabs},
    Frame,
};

use crate::app::{App, Focus, SearchPage};
use crate::cache::Storage;
use crate::data::{format_population, Country, Region};

/// Style for a bordered block, highlighted when it has focus
fn block_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

/// Renders a search page
pub fn render<S: Storage>(frame: &mut Frame, app: &App<S>, page: SearchPage) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Length(3), // Search box
            Constraint::Min(5),    // Results
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_tabs(frame, chunks[0], page);
    if page == SearchPage::ByRegion {
        render_region_picker(frame, chunks[1], app);
    } else {
        render_search_box(frame, chunks[1], app, page);
    }
    render_results(frame, chunks[2], app, page);
    render_status_bar(frame, chunks[3], app);
}

fn render_tabs(frame: &mut Frame, area: Rect, page: SearchPage) {
    let titles: Vec<&str> = SearchPage::ALL.iter().map(|p| p.title()).collect();
    let selected = SearchPage::ALL.iter().position(|&p| p == page).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .title(" Countries ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

fn render_search_box<S: Storage>(frame: &mut Frame, area: Rect, app: &App<S>, page: SearchPage) {
    let focused = app.focus == Focus::Input;
    let placeholder = match page {
        SearchPage::ByCapital => "Search by capital",
        _ => "Search by country",
    };

    let line = if app.input.is_empty() && !focused {
        Line::from(Span::styled(placeholder, Style::default().fg(Color::DarkGray)))
    } else {
        let mut spans = vec![Span::raw(app.input.clone())];
        if focused {
            spans.push(Span::styled("_", Style::default().fg(Color::Cyan)));
        }
        Line::from(spans)
    };

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .title(format!(" {} ", placeholder))
            .borders(Borders::ALL)
            .border_style(block_style(focused)),
    );

    frame.render_widget(paragraph, area);
}

fn render_region_picker<S: Storage>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let focused = app.focus == Focus::Input;
    let selected = app.selected_region();

    let mut spans = Vec::new();
    for region in Region::ALL {
        let style = if region == selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        spans.push(Span::styled(format!(" {} ", region), style));
        spans.push(Span::raw(" "));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(" Region (←/→ to choose, Enter to search) ")
            .borders(Borders::ALL)
            .border_style(block_style(focused)),
    );

    frame.render_widget(paragraph, area);
}

/// Builds the table row for one country
fn country_row(country: &Country) -> Row<'static> {
    Row::new(vec![
        country.flag().unwrap_or_default().to_string(),
        country.common_name().to_string(),
        country.primary_capital().unwrap_or("-").to_string(),
        country.region().to_string(),
        format_population(country.population()),
    ])
}

fn render_results<S: Storage>(frame: &mut Frame, area: Rect, app: &App<S>, page: SearchPage) {
    let results = app.results_for(page);
    let focused = app.focus == Focus::Results;
    let block = Block::default()
        .title(format!(" Results ({}) ", results.len()))
        .borders(Borders::ALL)
        .border_style(block_style(focused));

    if results.is_empty() {
        let message = Paragraph::new(Span::styled(
            "No countries to show",
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        frame.render_widget(message, area);
        return;
    }

    let header = Row::new(vec!["", "Name", "Capital", "Region", "Population"]).style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );
    let rows: Vec<Row> = results.iter().map(country_row).collect();
    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Percentage(35),
            Constraint::Percentage(25),
            Constraint::Percentage(15),
            Constraint::Percentage(20),
        ],
    )
    .header(header)
    .block(block)
    .highlight_style(if focused {
        Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    })
    .highlight_symbol("▶ ");

    let mut state = TableState::default();
    if focused {
        state.select(Some(app.selected_index));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_status_bar<S: Storage>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let mut spans = vec![Span::styled(
        " Tab: page  Enter: search/open  ↑↓: move  ?: help  Esc: back ",
        Style::default().fg(Color::DarkGray),
    )];
    if let Some(status) = &app.status {
        spans.push(Span::styled(
            format!(" {}", status),
            Style::default().fg(Color::Yellow),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
