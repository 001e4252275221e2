mod common;

use chrono::{Duration, TimeZone, Utc};
use common::{json_response, FakeTransport};
use serde_json::json;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tempshop::api::{catalog, shopkeeper};
use tempshop::cache::{keys, product_detail, CacheNamespace, ResponseCache};
use tempshop::clock::ManualClock;
use tempshop::http::{AuthClient, FormData};
use tempshop::storage::{FilesystemStore, KeyValueStore, MemoryStore};

fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
    ))
}

fn memory_cache() -> (ResponseCache, Arc<ManualClock>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let clock = manual_clock();
    (ResponseCache::with_clock(store.clone(), clock.clone()), clock, store)
}

#[test]
fn test_store_then_lookup_returns_payload() {
    let (cache, _, _) = memory_cache();
    let payload = json!([{ "id": 1, "name": "Shirt" }]);

    cache.store(keys::PRODUCTS, &payload).unwrap();

    assert_eq!(cache.lookup(keys::PRODUCTS), Some(payload));
}

#[test]
fn test_expired_entry_is_absent_and_purged() {
    let (cache, clock, store) = memory_cache();
    cache.store(keys::CATEGORIES, &json!(["Hats"])).unwrap();

    clock.advance(Duration::minutes(30));

    assert_eq!(cache.lookup(keys::CATEGORIES), None);
    assert_eq!(store.get(keys::CATEGORIES).unwrap(), None);
    assert_eq!(cache.lookup(keys::CATEGORIES), None);
}

#[test]
fn test_store_overwrites_previous_payload() {
    let (cache, _, _) = memory_cache();

    cache.store("k", &json!("v1")).unwrap();
    cache.store("k", &json!("v2")).unwrap();

    assert_eq!(cache.lookup("k"), Some(json!("v2")));
}

#[test]
fn test_overwrite_restarts_ttl() {
    let (cache, clock, _) = memory_cache();
    cache.store("k", &json!("v1")).unwrap();
    clock.advance(Duration::minutes(20));
    cache.store("k", &json!("v2")).unwrap();
    clock.advance(Duration::minutes(20));

    assert_eq!(cache.lookup("k"), Some(json!("v2")));
}

#[test]
fn test_namespace_invalidation_removes_every_entry() {
    let store = Arc::new(MemoryStore::new());
    let cache = ResponseCache::with_clock(store.clone(), manual_clock()).with_namespace(
        CacheNamespace::new(vec!["A".to_string(), "B".to_string()], vec!["C_".to_string()]),
    );
    store.set("unrelated", "keep me").unwrap();

    cache.store("A", &json!(1)).unwrap();
    cache.store("B", &json!(2)).unwrap();
    cache.store("C_1", &json!(3)).unwrap();
    cache.invalidate(None).unwrap();

    assert_eq!(cache.lookup("A"), None);
    assert_eq!(cache.lookup("B"), None);
    assert_eq!(cache.lookup("C_1"), None);
    assert_eq!(store.get("unrelated").unwrap().as_deref(), Some("keep me"));
}

#[test]
fn test_single_key_invalidation_ignores_age() {
    let (cache, _, _) = memory_cache();
    cache.store(&product_detail(1), &json!({ "id": 1 })).unwrap();
    cache.store(&product_detail(2), &json!({ "id": 2 })).unwrap();

    cache.invalidate(Some(&product_detail(1))).unwrap();

    assert_eq!(cache.lookup(&product_detail(1)), None);
    assert_eq!(cache.lookup(&product_detail(2)), Some(json!({ "id": 2 })));
}

#[test]
fn test_cache_survives_on_disk() {
    let temp_dir = TempDir::new().unwrap();
    let clock = manual_clock();
    let payload = json!({ "id": 9, "name": "Scarf" });

    let first = ResponseCache::with_clock(Arc::new(FilesystemStore::new(temp_dir.path())), clock.clone());
    first.store(&product_detail(9), &payload).unwrap();

    let second = ResponseCache::with_clock(Arc::new(FilesystemStore::new(temp_dir.path())), clock);
    assert_eq!(second.lookup(&product_detail(9)), Some(payload));
}

#[test]
fn test_namespace_invalidation_survives_foreign_files() {
    let temp_dir = TempDir::new().unwrap();
    let cache = ResponseCache::with_clock(
        Arc::new(FilesystemStore::new(temp_dir.path())),
        manual_clock(),
    );
    cache.store(&product_detail(7), &json!({ "id": 7 })).unwrap();
    cache.store(keys::PRODUCTS, &json!([{ "id": 7 }])).unwrap();
    std::fs::write(temp_dir.path().join("stray%zz.entry"), "{}").unwrap();

    cache.invalidate(None).unwrap();

    assert_eq!(cache.lookup(&product_detail(7)), None);
    assert_eq!(cache.lookup(keys::PRODUCTS), None);
}

#[test]
fn test_entry_from_the_future_is_expired() {
    let (cache, clock, store) = memory_cache();
    cache.store(keys::PRODUCTS, &json!(["skewed"])).unwrap();

    // The entry was written by a clock running an hour ahead
    clock.advance(Duration::minutes(-60));

    assert_eq!(cache.lookup(keys::PRODUCTS), None);
    assert_eq!(store.get(keys::PRODUCTS).unwrap(), None);
}

#[tokio::test]
async fn test_products_served_from_cache_until_ttl() {
    let catalog_version = Arc::new(Mutex::new(json!([{ "id": 1, "name": "Shirt" }])));
    let served = catalog_version.clone();
    let transport = Arc::new(FakeTransport::new(move |request| {
        assert_eq!(request.path, "/products/");
        Ok(json_response(200, served.lock().unwrap().clone()))
    }));
    let store = Arc::new(MemoryStore::new());
    let client = AuthClient::customer_bearer(transport.clone(), store.clone());
    let clock = manual_clock();
    let cache = ResponseCache::with_clock(store, clock.clone());

    // t = 0: first read goes to the network and fills the cache
    let initial = catalog::get_all_products(&client, &cache).await.unwrap();
    assert_eq!(initial, json!([{ "id": 1, "name": "Shirt" }]));
    assert_eq!(transport.count("/products/"), 1);

    *catalog_version.lock().unwrap() =
        json!([{ "id": 1, "name": "Shirt" }, { "id": 2, "name": "Hat" }]);

    // t = 10 min: cached
    clock.advance(Duration::minutes(10));
    let cached = catalog::get_all_products(&client, &cache).await.unwrap();
    assert_eq!(cached, initial);
    assert_eq!(transport.count("/products/"), 1);

    // t = 35 min: expired, refetched and stored
    clock.advance(Duration::minutes(25));
    let refreshed = catalog::get_all_products(&client, &cache).await.unwrap();
    assert_eq!(
        refreshed,
        json!([{ "id": 1, "name": "Shirt" }, { "id": 2, "name": "Hat" }])
    );
    assert_eq!(transport.count("/products/"), 2);
    assert_eq!(cache.lookup(keys::PRODUCTS), Some(refreshed));
}

#[tokio::test]
async fn test_failed_fetch_is_not_cached() {
    let transport = Arc::new(FakeTransport::new(|_| {
        Ok(json_response(503, json!({ "detail": "maintenance" })))
    }));
    let store = Arc::new(MemoryStore::new());
    let client = AuthClient::customer_bearer(transport, store.clone());
    let cache = ResponseCache::with_clock(store, manual_clock());

    let err = catalog::get_all_categories(&client, &cache).await.unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert_eq!(cache.lookup(keys::CATEGORIES), None);
}

#[tokio::test]
async fn test_product_details_use_templated_key() {
    let transport = Arc::new(FakeTransport::new(|request| {
        Ok(json_response(200, json!({ "path": request.path })))
    }));
    let store = Arc::new(MemoryStore::new());
    let client = AuthClient::customer_bearer(transport.clone(), store.clone());
    let cache = ResponseCache::with_clock(store, manual_clock());

    catalog::get_product_details(&client, &cache, 5).await.unwrap();
    catalog::get_product_details(&client, &cache, 5).await.unwrap();

    assert_eq!(transport.count("/product/5/"), 1);
    assert_eq!(
        cache.lookup("tempshop_product_5"),
        Some(json!({ "path": "/product/5/" }))
    );
}

#[tokio::test]
async fn test_seller_product_write_invalidates_catalog() {
    let transport = Arc::new(FakeTransport::new(|_| Ok(json_response(201, json!({ "id": 3 })))));
    let store = Arc::new(MemoryStore::new());
    let client = AuthClient::shopkeeper(transport, store.clone());
    let cache = ResponseCache::with_clock(store, manual_clock());
    cache.store(keys::PRODUCTS, &json!([])).unwrap();
    cache.store(&product_detail(1), &json!({})).unwrap();

    shopkeeper::create_product(&client, &cache, FormData::new().text("name", "Hat"))
        .await
        .unwrap();

    assert_eq!(cache.lookup(keys::PRODUCTS), None);
    assert_eq!(cache.lookup(&product_detail(1)), None);
}
