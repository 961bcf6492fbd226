//! UI rendering module for the countries TUI
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod country_detail;
pub mod help_overlay;
pub mod search_page;

pub use country_detail::render as render_country_detail;
pub use help_overlay::render as render_help_overlay;
pub use search_page::render as render_search_page;
