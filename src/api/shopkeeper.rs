use super::auth::persist_tokens;
use crate::cache::ResponseCache;
use crate::error::Result;
use crate::http::{AuthClient, FormData};
use serde_json::{json, Value};
use tracing::warn;

pub async fn register(client: &AuthClient, seller: Value) -> Result<Value> {
    let data = client.post("/shopkeeper/register/", seller).await?;
    persist_tokens(client, &data)?;
    Ok(data)
}

pub async fn login(client: &AuthClient, credentials: Value) -> Result<Value> {
    let data = client.post("/shopkeeper/login/", credentials).await?;
    persist_tokens(client, &data)?;
    Ok(data)
}

/// Forget the seller's credentials. The backend keeps no seller session to end.
pub fn logout(client: &AuthClient) -> Result<()> {
    match client.tokens() {
        Some(tokens) => tokens.clear(),
        None => Ok(()),
    }
}

pub async fn profile(client: &AuthClient) -> Result<Value> {
    client.get("/shopkeeper/profile/").await
}

/// Profile fields plus an optional shop logo, sent as a form.
pub async fn update_profile(client: &AuthClient, profile: FormData) -> Result<Value> {
    client.put_form("/shopkeeper/profile/", profile).await
}

pub async fn products(client: &AuthClient) -> Result<Value> {
    client.get("/shopkeeper/products/").await
}

pub async fn create_product(
    client: &AuthClient,
    cache: &ResponseCache,
    product: FormData,
) -> Result<Value> {
    let created = client.post_form("/shopkeeper/products/", product).await?;
    invalidate_catalog(cache);
    Ok(created)
}

pub async fn update_product(
    client: &AuthClient,
    cache: &ResponseCache,
    id: u64,
    product: FormData,
) -> Result<Value> {
    let updated = client
        .put_form(&format!("/shopkeeper/products/{}/", id), product)
        .await?;
    invalidate_catalog(cache);
    Ok(updated)
}

pub async fn delete_product(client: &AuthClient, cache: &ResponseCache, id: u64) -> Result<Value> {
    let deleted = client
        .delete(&format!("/shopkeeper/products/{}/", id))
        .await?;
    invalidate_catalog(cache);
    Ok(deleted)
}

pub async fn orders(client: &AuthClient) -> Result<Value> {
    client.get("/shopkeeper/orders/").await
}

/// Orders placed by customers for this seller's products.
pub async fn customer_orders(client: &AuthClient) -> Result<Value> {
    client.get("/shopkeeper/customer-orders/").await
}

pub async fn update_order_status(client: &AuthClient, order_id: u64, status: &str) -> Result<Value> {
    client
        .put(
            &format!("/shopkeeper/orders/{}/", order_id),
            json!({ "status": status }),
        )
        .await
}

pub async fn documents(client: &AuthClient) -> Result<Value> {
    client.get("/shopkeeper/documents/").await
}

pub async fn upload_document(client: &AuthClient, document: FormData) -> Result<Value> {
    client.post_form("/shopkeeper/documents/", document).await
}

pub async fn reviews(client: &AuthClient) -> Result<Value> {
    client.get("/shopkeeper/reviews/").await
}

pub async fn dashboard(client: &AuthClient) -> Result<Value> {
    client.get("/shopkeeper/dashboard/").await
}

/// Failures are logged and swallowed.
fn invalidate_catalog(cache: &ResponseCache) {
    if let Err(e) = cache.invalidate(None) {
        warn!(error = %e, "failed to invalidate catalog cache");
    }
}
