//! Integration tests for searching and remembering searches across restarts
//!
//! Uses a mock API and on-disk storage in a temporary directory, the same
//! storage the binary uses.

use countries::cache::{CacheStore, FileStorage, Storage, CACHE_STORE_KEY};
use countries::data::{CountriesClient, Country, Region};
use countries::service::CountriesService;
use httpmock::prelude::*;
use tempfile::TempDir;

const FRANCE_RESPONSE: &str = r#"[{
    "name": { "common": "France", "official": "French Republic" },
    "cca2": "FR",
    "cca3": "FRA",
    "capital": ["Paris"],
    "region": "Europe",
    "population": 67391582,
    "flag": "🇫🇷",
    "timezones": ["UTC+01:00"]
}]"#;

fn open_service(server: &MockServer, dir: &TempDir) -> CountriesService<FileStorage> {
    let client = CountriesClient::with_base_url(&server.base_url()).unwrap();
    CountriesService::new(client, FileStorage::with_dir(dir.path().to_path_buf()))
}

#[tokio::test]
async fn test_fresh_service_has_empty_slots() {
    let server = MockServer::start_async().await;
    let dir = TempDir::new().unwrap();

    let service = open_service(&server, &dir);

    let store = service.cache_store();
    assert_eq!(store, &CacheStore::default());
    assert_eq!(store.by_capital.term, "");
    assert!(store.by_capital.countries.is_empty());
    assert_eq!(store.by_countries.term, "");
    assert!(store.by_region.region.is_none());
}

#[tokio::test]
async fn test_name_search_is_cached_and_persisted() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/name/france");
            then.status(200).body(FRANCE_RESPONSE);
        })
        .await;
    let dir = TempDir::new().unwrap();
    let mut service = open_service(&server, &dir);

    let result = service.search_by_name("france").await;

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].cca2(), "FR");
    assert_eq!(service.cache_store().by_countries.term, "france");
    assert_eq!(service.cache_store().by_countries.countries, result);

    let raw = service
        .storage()
        .get_item(CACHE_STORE_KEY)
        .unwrap()
        .expect("Store should be written");
    let persisted: CacheStore = serde_json::from_str(&raw).unwrap();
    assert_eq!(&persisted, service.cache_store());
}

#[tokio::test]
async fn test_searches_survive_restart() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/capital/paris");
            then.status(200).body(FRANCE_RESPONSE);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/region/Europe");
            then.status(200).body(FRANCE_RESPONSE);
        })
        .await;
    let dir = TempDir::new().unwrap();

    let before = {
        let mut first_run = open_service(&server, &dir);
        first_run.search_by_capital("paris").await;
        first_run.search_by_region(Region::Europe).await;
        first_run.search_by_name("nowhere").await; // unmocked path: 404
        first_run.cache_store().clone()
    };

    let second_run = open_service(&server, &dir);

    assert_eq!(second_run.cache_store(), &before);
    assert_eq!(second_run.cache_store().by_region.region, Some(Region::Europe));
    assert_eq!(second_run.cache_store().by_countries.term, "nowhere");
    assert!(second_run.cache_store().by_countries.countries.is_empty());
    assert_eq!(
        second_run.cache_store().by_capital.countries[0].as_json()["timezones"][0],
        "UTC+01:00",
        "Passthrough fields should survive persistence"
    );
}

#[tokio::test]
async fn test_corrupt_persisted_store_is_replaced_by_next_search() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/name/france");
            then.status(200).body(FRANCE_RESPONSE);
        })
        .await;
    let dir = TempDir::new().unwrap();
    FileStorage::with_dir(dir.path().to_path_buf())
        .set_item(CACHE_STORE_KEY, "{\"byCapital\": ")
        .unwrap();

    let mut service = open_service(&server, &dir);
    assert_eq!(service.cache_store(), &CacheStore::default());

    service.search_by_name("france").await;

    let restarted = open_service(&server, &dir);
    assert_eq!(restarted.cache_store().by_countries.term, "france");
}

#[tokio::test]
async fn test_code_lookup_leaves_store_untouched() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/alpha/FRA");
            then.status(200).body(FRANCE_RESPONSE);
        })
        .await;
    let dir = TempDir::new().unwrap();
    let service = open_service(&server, &dir);
    let before = service.cache_store().clone();

    let found = service.search_by_code("FRA").await;
    let missing = service.search_by_code("ZZ").await;

    assert_eq!(found.as_ref().map(Country::common_name), Some("France"));
    assert!(missing.is_none());
    assert_eq!(service.cache_store(), &before);
    assert!(service.storage().get_item(CACHE_STORE_KEY).unwrap().is_none());
}
