//! In-memory record of the most recent search of each kind
//!
//! The store holds exactly three slots. Each search overwrites its own slot
//! in full; the whole store is what gets persisted.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::data::{Country, Region};

/// Storage key the serialized store is written under
pub const CACHE_STORE_KEY: &str = "cacheStore";

/// Last name or capital search: the term typed and what it returned
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TermSlot {
    pub term: String,
    pub countries: Vec<Country>,
}

/// Last region search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionSlot {
    /// `None` until a region has been searched; persisted as `""`
    #[serde(with = "region_or_empty")]
    pub region: Option<Region>,
    pub countries: Vec<Country>,
}

/// The three cached search results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStore {
    pub by_capital: TermSlot,
    pub by_countries: TermSlot,
    pub by_region: RegionSlot,
}

impl CacheStore {
    /// Replaces the capital slot
    pub fn set_capital(&mut self, term: &str, countries: Vec<Country>) {
        self.by_capital = TermSlot {
            term: term.to_string(),
            countries,
        };
    }

    /// Replaces the country-name slot
    pub fn set_countries(&mut self, term: &str, countries: Vec<Country>) {
        self.by_countries = TermSlot {
            term: term.to_string(),
            countries,
        };
    }

    /// Replaces the region slot
    pub fn set_region(&mut self, region: Region, countries: Vec<Country>) {
        self.by_region = RegionSlot {
            region: Some(region),
            countries,
        };
    }
}

mod region_or_empty {
    use super::*;

    pub fn serialize<S: Serializer>(region: &Option<Region>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(region.map(|r| r.as_str()).unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Region>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse().map(Some).map_err(serde::de::Error::custom)
    }
}
