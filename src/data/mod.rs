//! Core data models for the countries CLI
//!
//! This module contains the country record returned by the REST Countries API,
//! the closed set of regions that can be searched, and the HTTP client used to
//! query the API.

pub mod countries;

pub use countries::{CountriesClient, CountriesError, DEFAULT_BASE_URL};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A country record as returned by the data source
///
/// The record is kept exactly as the API sent it, so a cached record
/// serializes back to the same JSON it was parsed from. Accessors read the
/// fields the front-end renders and fall back to empty values when a field is
/// missing, null or of an unexpected type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Country(Value);

impl Country {
    /// Returns the raw field `key`, if present
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns the record as received
    pub fn as_json(&self) -> &Value {
        &self.0
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    fn name_part(&self, part: &str) -> &str {
        self.get("name")
            .and_then(|name| name.get(part))
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn common_name(&self) -> &str {
        self.name_part("common")
    }

    pub fn official_name(&self) -> &str {
        self.name_part("official")
    }

    /// ISO 3166-1 alpha-2 code
    pub fn cca2(&self) -> &str {
        self.str_field("cca2").unwrap_or_default()
    }

    /// ISO 3166-1 alpha-3 code
    pub fn cca3(&self) -> &str {
        self.str_field("cca3").unwrap_or_default()
    }

    /// Capital cities (some countries have several, some none)
    pub fn capitals(&self) -> Vec<&str> {
        self.get("capital")
            .and_then(Value::as_array)
            .map(|capitals| capitals.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Returns the first listed capital, if the country has one
    pub fn primary_capital(&self) -> Option<&str> {
        self.capitals().into_iter().next()
    }

    /// Region name as reported by the API
    pub fn region(&self) -> &str {
        self.str_field("region").unwrap_or_default()
    }

    pub fn subregion(&self) -> Option<&str> {
        self.str_field("subregion")
    }

    pub fn population(&self) -> u64 {
        self.get("population")
            .and_then(Value::as_u64)
            .unwrap_or_default()
    }

    /// Flag emoji
    pub fn flag(&self) -> Option<&str> {
        self.str_field("flag")
    }

    /// Returns the code used for detail lookups (alpha-3, falling back to alpha-2)
    pub fn lookup_code(&self) -> &str {
        match self.cca3() {
            "" => self.cca2(),
            cca3 => cca3,
        }
    }
}

impl From<Value> for Country {
    fn from(value: Value) -> Self {
        Country(value)
    }
}

/// Formats a population with thousands separators (e.g. 67391582 -> "67,391,582")
pub fn format_population(population: u64) -> String {
    let digits = population.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Error returned when a region name is not one of the searchable regions
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid region: '{0}'. Valid regions: africa, americas, asia, europe, oceania")]
pub struct InvalidRegion(pub String);

/// Regions accepted by the region search endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    Africa,
    Americas,
    Asia,
    Europe,
    Oceania,
}

impl Region {
    /// All searchable regions, in display order
    pub const ALL: [Region; 5] = [
        Region::Africa,
        Region::Americas,
        Region::Asia,
        Region::Europe,
        Region::Oceania,
    ];

    /// Returns the region name as the API spells it
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Africa => "Africa",
            Region::Americas => "Americas",
            Region::Asia => "Asia",
            Region::Europe => "Europe",
            Region::Oceania => "Oceania",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = InvalidRegion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Region::ALL
            .into_iter()
            .find(|region| region.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| InvalidRegion(s.to_string()))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use serde_json::json;

    /// Builds a country record shaped like a REST Countries response entry
    pub fn country(common: &str, cca2: &str, cca3: &str, capital: &str, region: &str) -> Country {
        Country::from(json!({
            "name": { "common": common, "official": format!("Official {}", common) },
            "cca2": cca2,
            "cca3": cca3,
            "capital": [capital],
            "region": region,
            "population": 1000,
            "flag": "🏳",
            "flags": { "png": format!("https://flagcdn.com/w320/{}.png", cca2.to_lowercase()) }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FRANCE: &str = r#"{
        "name": {
            "common": "France",
            "official": "French Republic",
            "nativeName": { "fra": { "official": "République française", "common": "France" } }
        },
        "tld": [".fr"],
        "cca2": "FR",
        "ccn3": "250",
        "cca3": "FRA",
        "independent": true,
        "capital": ["Paris"],
        "region": "Europe",
        "subregion": "Western Europe",
        "languages": { "fra": "French" },
        "population": 67391582,
        "flag": "🇫🇷",
        "flags": { "png": "https://flagcdn.com/w320/fr.png", "svg": "https://flagcdn.com/fr.svg" }
    }"#;

    #[test]
    fn test_country_reads_rendered_fields() {
        let country: Country = serde_json::from_str(FRANCE).expect("Failed to parse France");

        assert_eq!(country.common_name(), "France");
        assert_eq!(country.official_name(), "French Republic");
        assert_eq!(country.cca2(), "FR");
        assert_eq!(country.cca3(), "FRA");
        assert_eq!(country.capitals(), ["Paris"]);
        assert_eq!(country.primary_capital(), Some("Paris"));
        assert_eq!(country.region(), "Europe");
        assert_eq!(country.subregion(), Some("Western Europe"));
        assert_eq!(country.population(), 67391582);
        assert_eq!(country.flag(), Some("🇫🇷"));
    }

    #[test]
    fn test_country_serializes_back_unchanged() {
        let country: Country = serde_json::from_str(FRANCE).expect("Failed to parse France");

        assert_eq!(country.get("tld"), Some(&json!([".fr"])));
        assert_eq!(country.get("independent"), Some(&json!(true)));

        let reserialized = serde_json::to_value(&country).expect("Failed to serialize");
        let original: Value = serde_json::from_str(FRANCE).expect("Failed to parse raw JSON");
        assert_eq!(reserialized, original, "Passthrough fields should survive");
    }

    #[test]
    fn test_sparse_record_is_not_padded_with_defaults() {
        let raw = json!({
            "name": { "common": "A" },
            "subregion": null,
            "area": 1.5,
            "population": 10
        });
        let country: Country =
            serde_json::from_value(raw.clone()).expect("Sparse record should parse");

        assert_eq!(country.common_name(), "A");
        assert_eq!(country.official_name(), "");
        assert_eq!(country.cca2(), "");
        assert!(country.subregion().is_none());
        assert_eq!(serde_json::to_value(&country).unwrap(), raw);
    }

    #[test]
    fn test_odd_field_types_fall_back_to_empty() {
        let records: Vec<Country> = serde_json::from_value(json!([
            { "name": { "common": "A" }, "cca3": "AAA", "capital": ["Z"] },
            { "name": { "common": "B" }, "cca3": "BBB", "capital": null },
            { "cca3": "CCC", "population": "many", "region": 7 }
        ]))
        .expect("Odd records should not fail the whole array");

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].primary_capital(), Some("Z"));
        assert!(records[1].capitals().is_empty());
        assert_eq!(records[2].common_name(), "");
        assert_eq!(records[2].population(), 0);
        assert_eq!(records[2].region(), "");
        assert_eq!(records[2].lookup_code(), "CCC");
    }

    #[test]
    fn test_lookup_code_prefers_alpha3() {
        let peru = fixtures::country("Peru", "PE", "PER", "Lima", "Americas");
        assert_eq!(peru.lookup_code(), "PER");

        let alpha2_only = Country::from(json!({ "name": { "common": "Peru" }, "cca2": "PE" }));
        assert_eq!(alpha2_only.lookup_code(), "PE");
    }

    #[test]
    fn test_format_population() {
        assert_eq!(format_population(0), "0");
        assert_eq!(format_population(999), "999");
        assert_eq!(format_population(1000), "1,000");
        assert_eq!(format_population(67391582), "67,391,582");
    }

    #[test]
    fn test_region_parses_case_insensitively() {
        assert_eq!("europe".parse::<Region>(), Ok(Region::Europe));
        assert_eq!("AMERICAS".parse::<Region>(), Ok(Region::Americas));
        assert_eq!(" Oceania ".parse::<Region>(), Ok(Region::Oceania));
    }

    #[test]
    fn test_region_rejects_unknown_names() {
        let err = "atlantis".parse::<Region>().unwrap_err();
        assert!(err.to_string().contains("Invalid region"));
        assert!(err.to_string().contains("atlantis"));
    }

    #[test]
    fn test_region_display_matches_api_spelling() {
        let names: Vec<String> = Region::ALL.iter().map(|r| r.to_string()).collect();
        assert_eq!(names, ["Africa", "Americas", "Asia", "Europe", "Oceania"]);
    }
}
