//! Query cache service
//!
//! Runs searches against the countries API, turns every transport failure
//! into an empty (or absent) result, and keeps the `CacheStore` of the last
//! search of each kind persisted to durable storage.

use tracing::{debug, warn};

use crate::cache::{CacheStore, Storage, CACHE_STORE_KEY};
use crate::data::{CountriesClient, CountriesError, Country, Region};

/// Searches countries and remembers the latest result of each search kind
///
/// The service owns its `CacheStore`. Callers read it through
/// [`cache_store`](Self::cache_store) and change it only by searching, so every
/// slot always reflects the most recent completed search of its kind.
#[derive(Debug)]
pub struct CountriesService<S: Storage> {
    client: CountriesClient,
    storage: S,
    cache_store: CacheStore,
}

impl<S: Storage> CountriesService<S> {
    /// Creates the service, restoring any store previously persisted in `storage`
    pub fn new(client: CountriesClient, storage: S) -> Self {
        let cache_store = load_from_storage(&storage).unwrap_or_default();
        Self {
            client,
            storage,
            cache_store,
        }
    }

    /// Returns the current cached searches
    pub fn cache_store(&self) -> &CacheStore {
        &self.cache_store
    }

    /// Returns the storage the store is persisted to
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Looks up a single country by alpha code
    ///
    /// Returns the first match, or `None` when nothing matched or the request
    /// failed. Never reads or writes the cache store.
    pub async fn search_by_code(&self, code: &str) -> Option<Country> {
        let countries = recover(self.client.fetch_by_code(code).await, "alpha", code);
        countries.into_iter().next()
    }

    /// Searches countries by name and caches the result in the `byCountries` slot
    pub async fn search_by_name(&mut self, term: &str) -> Vec<Country> {
        let countries = recover(self.client.fetch_by_name(term).await, "name", term);
        self.cache_store.set_countries(term, countries.clone());
        self.save_to_storage();
        countries
    }

    /// Searches countries by capital and caches the result in the `byCapital` slot
    pub async fn search_by_capital(&mut self, term: &str) -> Vec<Country> {
        let countries = recover(self.client.fetch_by_capital(term).await, "capital", term);
        self.cache_store.set_capital(term, countries.clone());
        self.save_to_storage();
        countries
    }

    /// Lists the countries of a region and caches the result in the `byRegion` slot
    pub async fn search_by_region(&mut self, region: Region) -> Vec<Country> {
        let countries = recover(
            self.client.fetch_by_region(region).await,
            "region",
            region.as_str(),
        );
        self.cache_store.set_region(region, countries.clone());
        self.save_to_storage();
        countries
    }

    /// Writes the whole store to durable storage
    ///
    /// A failed write is logged; the in-memory store stays authoritative.
    fn save_to_storage(&self) {
        let json = match serde_json::to_string(&self.cache_store) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to serialize cache store");
                return;
            }
        };
        if let Err(e) = self.storage.set_item(CACHE_STORE_KEY, &json) {
            warn!(error = %e, "failed to persist cache store");
        }
    }
}

/// Reads the persisted store, if there is a usable one
///
/// Unreadable or malformed data is logged and ignored so the service starts
/// from empty slots; the next search overwrites the bad entry.
fn load_from_storage<S: Storage>(storage: &S) -> Option<CacheStore> {
    let raw = match storage.get_item(CACHE_STORE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(error = %e, "failed to read persisted cache store");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(store) => {
            debug!("restored cache store from storage");
            Some(store)
        }
        Err(e) => {
            warn!(error = %e, "ignoring malformed persisted cache store");
            None
        }
    }
}

/// Collapses a failed request into an empty result
fn recover(result: Result<Vec<Country>, CountriesError>, kind: &str, term: &str) -> Vec<Country> {
    result.unwrap_or_else(|e| {
        warn!(kind, term, error = %e, "search failed, returning no results");
        Vec::new()
    })
}
