use crate::cache::{keys, ResponseCache};
use crate::error::Result;
use crate::http::AuthClient;
use serde_json::Value;

pub async fn get_all_products(client: &AuthClient, cache: &ResponseCache) -> Result<Value> {
    cache
        .get_or_fetch(keys::PRODUCTS, || client.get("/products/"))
        .await
}

pub async fn get_product_details(
    client: &AuthClient,
    cache: &ResponseCache,
    id: u64,
) -> Result<Value> {
    let path = format!("/product/{}/", id);
    cache
        .get_or_fetch(&keys::product_detail(id), || client.get(&path))
        .await
}

pub async fn get_all_categories(client: &AuthClient, cache: &ResponseCache) -> Result<Value> {
    cache
        .get_or_fetch(keys::CATEGORIES, || client.get("/categories/"))
        .await
}

/// Drop every cached catalog response so the next read goes to the network.
pub fn invalidate(cache: &ResponseCache) -> Result<()> {
    cache.invalidate(None)
}
