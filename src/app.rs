//! Application state management for the countries TUI
//!
//! This module contains the main application state: which page is shown,
//! the search input, key handling, and the searches the event loop should
//! run next. Search results are never copied into the app; each page reads
//! its slot of the service's cache store, so a page always shows the latest
//! search of its kind, including ones restored from a previous run.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::cache::Storage;
use crate::data::{Country, Region};
use crate::service::CountriesService;

/// The three search pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPage {
    ByCapital,
    ByCountry,
    ByRegion,
}

impl SearchPage {
    pub const ALL: [SearchPage; 3] = [
        SearchPage::ByCapital,
        SearchPage::ByCountry,
        SearchPage::ByRegion,
    ];

    /// Tab title for the page
    pub fn title(&self) -> &'static str {
        match self {
            SearchPage::ByCapital => "By Capital",
            SearchPage::ByCountry => "By Country",
            SearchPage::ByRegion => "By Region",
        }
    }

    fn next(self) -> Self {
        match self {
            SearchPage::ByCapital => SearchPage::ByCountry,
            SearchPage::ByCountry => SearchPage::ByRegion,
            SearchPage::ByRegion => SearchPage::ByCapital,
        }
    }

    fn previous(self) -> Self {
        match self {
            SearchPage::ByCapital => SearchPage::ByRegion,
            SearchPage::ByCountry => SearchPage::ByCapital,
            SearchPage::ByRegion => SearchPage::ByCountry,
        }
    }
}

/// Application state enum representing the current view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    /// One of the search pages
    Search(SearchPage),
    /// Detail view for the country with the given alpha code
    CountryDetail(String),
}

/// Which part of a search page receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    /// The search box (or region picker)
    Input,
    /// The result list
    Results,
}

/// Network work requested by a key press, run by the event loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingAction {
    /// Search on a page using the current input
    Search(SearchPage),
    /// Fetch one country for the detail view
    LoadCountry(String),
}

/// Main application struct managing state and data
pub struct App<S: Storage> {
    /// Current application state/view
    pub state: AppState,
    /// Search page to return to from the detail view
    pub last_page: SearchPage,
    /// Part of the search page that receives keys
    pub focus: Focus,
    /// Text in the search box
    pub input: String,
    /// Index into `Region::ALL` on the region page
    pub region_index: usize,
    /// Index of the highlighted result
    pub selected_index: usize,
    /// Country shown in the detail view, once loaded
    pub detail: Option<Country>,
    /// One-line message shown in the status bar
    pub status: Option<String>,
    /// Work for the event loop to run before the next key
    pub pending: Option<PendingAction>,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    service: CountriesService<S>,
}

impl<S: Storage> App<S> {
    /// Creates a new App on the default page, restored from the service's cache
    pub fn new(service: CountriesService<S>) -> Self {
        let mut app = Self {
            state: AppState::Search(SearchPage::ByCapital),
            last_page: SearchPage::ByCapital,
            focus: Focus::Input,
            input: String::new(),
            region_index: 0,
            selected_index: 0,
            detail: None,
            status: None,
            pending: None,
            show_help: false,
            should_quit: false,
            service,
        };
        app.enter_page(SearchPage::ByCapital);
        app
    }

    /// Returns the service backing this app
    pub fn service(&self) -> &CountriesService<S> {
        &self.service
    }

    /// Returns the search page being shown, if any
    pub fn current_page(&self) -> Option<SearchPage> {
        match self.state {
            AppState::Search(page) => Some(page),
            AppState::CountryDetail(_) => None,
        }
    }

    /// Returns the region highlighted in the region picker
    pub fn selected_region(&self) -> Region {
        Region::ALL[self.region_index % Region::ALL.len()]
    }

    /// Returns the cached results for a page
    pub fn results_for(&self, page: SearchPage) -> &[Country] {
        let store = self.service.cache_store();
        match page {
            SearchPage::ByCapital => &store.by_capital.countries,
            SearchPage::ByCountry => &store.by_countries.countries,
            SearchPage::ByRegion => &store.by_region.countries,
        }
    }

    /// Returns the results of the page being shown
    pub fn results(&self) -> &[Country] {
        self.current_page()
            .map(|page| self.results_for(page))
            .unwrap_or(&[])
    }

    /// Returns the highlighted result, if any
    pub fn selected_country(&self) -> Option<&Country> {
        self.results().get(self.selected_index)
    }

    /// Switches to a search page, restoring its last search from the cache
    pub fn enter_page(&mut self, page: SearchPage) {
        let store = self.service.cache_store();
        match page {
            SearchPage::ByCapital => self.input = store.by_capital.term.clone(),
            SearchPage::ByCountry => self.input = store.by_countries.term.clone(),
            SearchPage::ByRegion => {
                self.input.clear();
                self.region_index = store
                    .by_region
                    .region
                    .and_then(|r| Region::ALL.iter().position(|&candidate| candidate == r))
                    .unwrap_or(0);
            }
        }
        self.state = AppState::Search(page);
        self.last_page = page;
        self.focus = Focus::Input;
        self.selected_index = 0;
        self.detail = None;
    }

    /// Handles keyboard input and updates application state
    ///
    /// # Key bindings
    /// - `Ctrl+C`: Quit from anywhere
    /// - `Tab`/`Shift+Tab`: Next/previous search page
    /// - `Enter` (in input): Run the search
    /// - `Down` (in input): Move to the results
    /// - `Left`/`Right` (region page input): Choose region
    /// - `Up`/`k`, `Down`/`j` (in results): Move selection
    /// - `Enter` (in results): Open country details
    /// - `Esc`/`/` (in results): Back to the search box
    /// - `Esc` (in input): Quit
    /// - `Esc`/`Backspace` (in details): Back to the search page
    /// - `q`: Quit (outside the search box)
    /// - `?`: Toggle help (outside the search box)
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        if key_event.modifiers.contains(KeyModifiers::CONTROL)
            && key_event.code == KeyCode::Char('c')
        {
            self.should_quit = true;
            return;
        }

        // Handle help overlay - intercepts all keys when shown
        if self.show_help {
            if matches!(
                key_event.code,
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                self.show_help = false;
            }
            return;
        }

        // Ignore keys while a request is outstanding
        if self.pending.is_some() {
            return;
        }

        match self.state.clone() {
            AppState::Search(page) => match key_event.code {
                KeyCode::Tab => self.enter_page(page.next()),
                KeyCode::BackTab => self.enter_page(page.previous()),
                _ => match self.focus {
                    Focus::Input => self.handle_input_key(page, key_event.code),
                    Focus::Results => self.handle_results_key(key_event.code),
                },
            },
            AppState::CountryDetail(_) => match key_event.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                }
                KeyCode::Esc | KeyCode::Backspace => {
                    let page = self.last_page;
                    let selected = self.selected_index;
                    self.enter_page(page);
                    self.focus = Focus::Results;
                    self.selected_index = selected;
                }
                KeyCode::Char('?') => {
                    self.show_help = true;
                }
                _ => {}
            },
        }
    }

    fn handle_input_key(&mut self, page: SearchPage, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Enter => {
                if page == SearchPage::ByRegion || !self.input.trim().is_empty() {
                    self.pending = Some(PendingAction::Search(page));
                }
            }
            KeyCode::Down => {
                if !self.results().is_empty() {
                    self.focus = Focus::Results;
                }
            }
            KeyCode::Left if page == SearchPage::ByRegion => {
                self.region_index = (self.region_index + Region::ALL.len() - 1) % Region::ALL.len();
            }
            KeyCode::Right if page == SearchPage::ByRegion => {
                self.region_index = (self.region_index + 1) % Region::ALL.len();
            }
            KeyCode::Char('q') if page == SearchPage::ByRegion => {
                self.should_quit = true;
            }
            KeyCode::Char('?') if page == SearchPage::ByRegion => {
                self.show_help = true;
            }
            KeyCode::Char(c) if page != SearchPage::ByRegion => {
                self.input.push(c);
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            _ => {}
        }
    }

    fn handle_results_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Esc | KeyCode::Char('/') => {
                self.focus = Focus::Input;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_selection_up();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_selection_down();
            }
            KeyCode::Enter => {
                if let Some(country) = self.selected_country() {
                    let code = country.lookup_code().to_string();
                    if !code.is_empty() {
                        self.state = AppState::CountryDetail(code.clone());
                        self.detail = None;
                        self.pending = Some(PendingAction::LoadCountry(code));
                    }
                }
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            _ => {}
        }
    }

    /// Moves the selection up in the list, wrapping to bottom if at top
    fn move_selection_up(&mut self) {
        let count = self.results().len();
        if count == 0 {
            return;
        }
        self.selected_index = if self.selected_index == 0 {
            count - 1
        } else {
            self.selected_index - 1
        };
    }

    /// Moves the selection down in the list, wrapping to top if at bottom
    fn move_selection_down(&mut self) {
        let count = self.results().len();
        if count == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1) % count;
    }

    /// Runs the pending action, if any
    ///
    /// A search stores its results in the service's cache; a detail lookup
    /// that finds nothing sends the user back to the default page.
    pub async fn run_pending(&mut self) {
        let Some(action) = self.pending.take() else {
            return;
        };

        match action {
            PendingAction::Search(page) => {
                let count = match page {
                    SearchPage::ByCapital => {
                        let term = self.input.trim().to_string();
                        self.service.search_by_capital(&term).await.len()
                    }
                    SearchPage::ByCountry => {
                        let term = self.input.trim().to_string();
                        self.service.search_by_name(&term).await.len()
                    }
                    SearchPage::ByRegion => {
                        let region = self.selected_region();
                        self.service.search_by_region(region).await.len()
                    }
                };
                self.selected_index = 0;
                self.focus = if count > 0 { Focus::Results } else { Focus::Input };
                self.status = Some(match count {
                    0 => "No countries found".to_string(),
                    1 => "1 country found".to_string(),
                    n => format!("{} countries found", n),
                });
            }
            PendingAction::LoadCountry(code) => match self.service.search_by_code(&code).await {
                Some(country) => {
                    self.status = None;
                    self.detail = Some(country);
                }
                None => {
                    self.enter_page(SearchPage::ByCapital);
                    self.status = Some(format!("Country '{}' not found", code));
                }
            },
        }
    }
}
