//! One-shot commands run from the command line
//!
//! Each command runs a single search through the service (so list searches
//! are remembered exactly as they are in the TUI) and renders the outcome as
//! a text table or as JSON.

use serde::Serialize;
use std::fmt::Write;

use crate::cache::{CacheStore, Storage};
use crate::cli::Query;
use crate::data::{format_population, Country};
use crate::service::CountriesService;

/// Rendered result of a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Text to print on stdout
    pub text: String,
    /// False when a code lookup found nothing
    pub found: bool,
}

/// Render `data` as pretty JSON if `json` is true, otherwise call `human_fmt`.
fn output<T: Serialize>(
    data: &T,
    json: bool,
    human_fmt: impl FnOnce(&T) -> String,
) -> Result<String, serde_json::Error> {
    if json {
        serde_json::to_string_pretty(data)
    } else {
        Ok(human_fmt(data))
    }
}

/// Runs `query` against the service and renders the result
pub async fn execute<S: Storage>(
    service: &mut CountriesService<S>,
    query: &Query,
    json: bool,
) -> Result<CommandOutput, serde_json::Error> {
    let (text, found) = match query {
        Query::Name(term) => {
            let countries = service.search_by_name(term).await;
            (output(&countries, json, |c| format_table(c))?, true)
        }
        Query::Capital(term) => {
            let countries = service.search_by_capital(term).await;
            (output(&countries, json, |c| format_table(c))?, true)
        }
        Query::Region(region) => {
            let countries = service.search_by_region(*region).await;
            (output(&countries, json, |c| format_table(c))?, true)
        }
        Query::Code(code) => {
            let country = service.search_by_code(code).await;
            let found = country.is_some();
            let text = output(&country, json, |c| match c {
                Some(country) => format_country(country),
                None => format!("No country found for code '{}'", code),
            })?;
            (text, found)
        }
        Query::ShowCache => (output(service.cache_store(), json, format_cache_store)?, true),
    };

    Ok(CommandOutput { text, found })
}

/// Formats countries as an aligned table, one per line
pub fn format_table(countries: &[Country]) -> String {
    if countries.is_empty() {
        return "No countries found".to_string();
    }

    let name_width = countries
        .iter()
        .map(|c| c.common_name().chars().count())
        .max()
        .unwrap_or(0)
        .max(4);
    let capital_width = countries
        .iter()
        .map(|c| c.primary_capital().unwrap_or("-").chars().count())
        .max()
        .unwrap_or(0)
        .max(7);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<5} {:<name_width$}  {:<capital_width$}  {:<9} {:>15}",
        "CODE", "NAME", "CAPITAL", "REGION", "POPULATION"
    );
    for country in countries {
        let _ = writeln!(
            out,
            "{:<5} {:<name_width$}  {:<capital_width$}  {:<9} {:>15}",
            country.lookup_code(),
            country.common_name(),
            country.primary_capital().unwrap_or("-"),
            country.region(),
            format_population(country.population()),
        );
    }
    out.truncate(out.trim_end().len());
    out
}

/// Formats one country as labelled fields
pub fn format_country(country: &Country) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {}",
        country.flag().unwrap_or(""),
        country.common_name()
    );
    let _ = writeln!(out, "  Official:   {}", country.official_name());
    let _ = writeln!(out, "  Codes:      {} / {}", country.cca2(), country.cca3());
    let _ = writeln!(
        out,
        "  Capital:    {}",
        if country.capitals().is_empty() {
            "-".to_string()
        } else {
            country.capitals().join(", ")
        }
    );
    let _ = writeln!(out, "  Region:     {}", country.region());
    if let Some(subregion) = country.subregion() {
        let _ = writeln!(out, "  Subregion:  {}", subregion);
    }
    let _ = write!(
        out,
        "  Population: {}",
        format_population(country.population())
    );
    out
}

/// Formats the remembered searches
fn format_cache_store(store: &CacheStore) -> String {
    let describe = |label: &str, key: &str, countries: &[Country]| {
        if key.is_empty() {
            format!("{:<10} (never searched)", label)
        } else {
            format!("{:<10} '{}' -> {} result(s)", label, key, countries.len())
        }
    };
    let region = store
        .by_region
        .region
        .map(|r| r.as_str())
        .unwrap_or_default();

    [
        describe("Capital", &store.by_capital.term, &store.by_capital.countries),
        describe("Country", &store.by_countries.term, &store.by_countries.countries),
        describe("Region", region, &store.by_region.countries),
    ]
    .join("\n")
}
