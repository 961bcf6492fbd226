//! Countries CLI - Search countries by name, capital, region or code
//!
//! A terminal UI (and a set of one-shot commands) for the REST Countries API
//! that remembers the last search of each kind between runs.

use std::fs::{self, File};
use std::io;
use std::panic;
use std::path::Path;
use std::process;
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use countries::app::{App, AppState};
use countries::cache::{MemoryStorage, Storage};
use countries::cli::{Cli, StartupConfig};
use countries::commands;
use countries::service::CountriesService;
use countries::ui;

/// Name of the log file the TUI writes to, inside the cache directory
const LOG_FILE: &str = "countries.log";

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Initializes tracing.
///
/// One-shot commands log to stderr so stdout stays clean for results. The TUI
/// owns the terminal, so it logs to a file in the cache directory, or nowhere
/// if there is no cache directory.
fn init_tracing(log_dir: Option<&Path>, tui: bool) {
    if !tui {
        tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_env_filter(env_filter())
            .init();
        return;
    }

    let log_file = log_dir.and_then(|dir| {
        fs::create_dir_all(dir).ok()?;
        File::options()
            .create(true)
            .append(true)
            .open(dir.join(LOG_FILE))
            .ok()
    });

    match log_file {
        Some(file) => tracing_subscriber::fmt()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(env_filter())
            .init(),
        None => tracing_subscriber::fmt()
            .with_writer(io::sink)
            .with_env_filter(env_filter())
            .init(),
    }
}

/// Renders the UI based on the current application state
fn render_ui<S: Storage>(frame: &mut ratatui::Frame, app: &App<S>) {
    match &app.state {
        AppState::Search(page) => ui::render_search_page(frame, app, *page),
        AppState::CountryDetail(code) => ui::render_country_detail(frame, app, code),
    }
    if app.show_help {
        ui::render_help_overlay(frame);
    }
}

/// Runs the interactive terminal UI until the user quits
async fn run_tui<S: Storage>(service: CountriesService<S>) -> Result<(), Box<dyn std::error::Error>> {
    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(service);

    // Main event loop
    loop {
        terminal.draw(|f| render_ui(f, &app))?;

        if app.pending.is_some() {
            app.status = Some("Searching...".to_string());
            terminal.draw(|f| render_ui(f, &app))?;
            app.run_pending().await;
            continue;
        }

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}

/// Runs the configured command, or the TUI if none was given
async fn run<S: Storage>(
    config: &StartupConfig,
    mut service: CountriesService<S>,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(query) = &config.query else {
        return run_tui(service).await;
    };

    let output = commands::execute(&mut service, query, config.json).await?;
    println!("{}", output.text);
    if !output.found {
        process::exit(1);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(2);
        }
    };

    let storage = config.file_storage();
    init_tracing(storage.as_ref().map(|s| s.dir()), config.query.is_none());

    let client = config.client()?;
    match storage {
        Some(storage) => run(&config, CountriesService::new(client, storage)).await,
        None => {
            warn!("no cache directory available, searches will not be remembered");
            run(&config, CountriesService::new(client, MemoryStorage::new())).await
        }
    }
}
