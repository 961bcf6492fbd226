//! Command-line interface parsing for the countries CLI
//!
//! This module handles parsing of CLI arguments using clap. Without a
//! subcommand the interactive terminal UI starts; each subcommand runs a
//! single search and prints the result.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use thiserror::Error;

use crate::cache::FileStorage;
use crate::data::{CountriesClient, CountriesError, InvalidRegion, Region, DEFAULT_BASE_URL};

/// Error types for CLI argument handling
#[derive(Debug, Error)]
pub enum CliError {
    /// The region argument is not one of the searchable regions
    #[error(transparent)]
    InvalidRegion(#[from] InvalidRegion),

    /// The API base URL could not be used
    #[error(transparent)]
    Api(#[from] CountriesError),

    /// A search term was empty or only whitespace
    #[error("Search term must not be empty")]
    EmptyTerm,
}

/// Countries CLI - Search countries by name, capital, region or code
#[derive(Parser, Debug)]
#[command(name = "countries")]
#[command(about = "Search countries by name, capital, region or code")]
#[command(version)]
pub struct Cli {
    /// Base URL of the REST Countries API
    #[arg(long, env = "COUNTRIES_API_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Directory where the last searches are remembered
    #[arg(long, env = "COUNTRIES_CACHE_DIR", value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Print results as JSON instead of a table
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// One-shot searches
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Search countries by name
    Name { term: String },
    /// Search countries by capital city
    Capital { term: String },
    /// List the countries of a region (africa, americas, asia, europe, oceania)
    Region { region: String },
    /// Look up a single country by its alpha code
    Code { code: String },
    /// Show the remembered searches
    Cache,
}

/// A validated one-shot search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Name(String),
    Capital(String),
    Region(Region),
    Code(String),
    ShowCache,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// API base URL
    pub base_url: String,
    /// Explicit storage directory, if one was given
    pub cache_dir: Option<PathBuf>,
    /// Whether output should be JSON
    pub json: bool,
    /// The search to run; `None` starts the terminal UI
    pub query: Option<Query>,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_dir: None,
            json: false,
            query: None,
        }
    }
}

/// Trims a free-text term, rejecting empty input
fn parse_term(term: &str) -> Result<String, CliError> {
    let trimmed = term.trim();
    if trimmed.is_empty() {
        return Err(CliError::EmptyTerm);
    }
    Ok(trimmed.to_string())
}

/// Rejects a blank alpha code; anything else is looked up as typed
fn parse_code(code: &str) -> Result<String, CliError> {
    if code.trim().is_empty() {
        return Err(CliError::EmptyTerm);
    }
    Ok(code.to_string())
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if a region or term is invalid
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let query = match &cli.command {
            None => None,
            Some(Command::Name { term }) => Some(Query::Name(parse_term(term)?)),
            Some(Command::Capital { term }) => Some(Query::Capital(parse_term(term)?)),
            Some(Command::Region { region }) => Some(Query::Region(region.parse()?)),
            Some(Command::Code { code }) => Some(Query::Code(parse_code(code)?)),
            Some(Command::Cache) => Some(Query::ShowCache),
        };

        Ok(StartupConfig {
            base_url: cli.base_url.clone(),
            cache_dir: cli.cache_dir.clone(),
            json: cli.json,
            query,
        })
    }

    /// Builds the API client for the configured base URL
    pub fn client(&self) -> Result<CountriesClient, CliError> {
        Ok(CountriesClient::with_base_url(&self.base_url)?)
    }

    /// Returns the file storage to persist searches in
    ///
    /// Falls back to the XDG cache directory; `None` if neither is available.
    pub fn file_storage(&self) -> Option<FileStorage> {
        match &self.cache_dir {
            Some(dir) => Some(FileStorage::with_dir(dir.clone())),
            None => FileStorage::new(),
        }
    }
}
