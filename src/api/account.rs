use crate::error::Result;
use crate::http::AuthClient;
use serde_json::{json, Value};

// Addresses

pub async fn addresses(client: &AuthClient) -> Result<Value> {
    client.get("/auth/addresses/").await
}

pub async fn create_address(client: &AuthClient, address: Value) -> Result<Value> {
    client.post("/auth/addresses/", address).await
}

pub async fn update_address(client: &AuthClient, id: u64, changes: Value) -> Result<Value> {
    client.patch(&format!("/auth/addresses/{}/", id), changes).await
}

pub async fn delete_address(client: &AuthClient, id: u64) -> Result<()> {
    client.delete(&format!("/auth/addresses/{}/", id)).await?;
    Ok(())
}

// Wallet and payment methods

pub async fn wallet(client: &AuthClient) -> Result<Value> {
    client.get("/auth/wallet/").await
}

pub async fn payment_methods(client: &AuthClient) -> Result<Value> {
    client.get("/auth/payment-methods/").await
}

pub async fn create_payment_method(client: &AuthClient, method: Value) -> Result<Value> {
    client.post("/auth/payment-methods/", method).await
}

pub async fn delete_payment_method(client: &AuthClient, id: u64) -> Result<()> {
    client
        .delete(&format!("/auth/payment-methods/{}/", id))
        .await?;
    Ok(())
}

// Orders

pub async fn orders(client: &AuthClient) -> Result<Value> {
    client.get("/auth/orders/").await
}

pub async fn order_detail(client: &AuthClient, id: u64) -> Result<Value> {
    client.get(&format!("/auth/orders/{}/", id)).await
}

pub async fn create_order(client: &AuthClient, order: Value) -> Result<Value> {
    client.post("/auth/orders/", order).await
}

// Reviews

pub async fn reviews(client: &AuthClient) -> Result<Value> {
    client.get("/auth/reviews/").await
}

pub async fn create_review(client: &AuthClient, review: Value) -> Result<Value> {
    client.post("/auth/reviews/", review).await
}

pub async fn delete_review(client: &AuthClient, id: u64) -> Result<()> {
    client.delete(&format!("/auth/reviews/{}/", id)).await?;
    Ok(())
}

pub async fn product_reviews(client: &AuthClient, product_id: u64) -> Result<Value> {
    client
        .get(&format!("/auth/products/{}/reviews/", product_id))
        .await
}

// Wishlist

pub async fn wishlist(client: &AuthClient) -> Result<Value> {
    client.get("/auth/wishlist/").await
}

pub async fn wishlist_product_ids(client: &AuthClient) -> Result<Value> {
    client.get("/auth/wishlist/product-ids/").await
}

pub async fn add_to_wishlist(client: &AuthClient, product_id: u64) -> Result<Value> {
    client
        .post("/auth/wishlist/", json!({ "product_id": product_id }))
        .await
}

pub async fn remove_from_wishlist(client: &AuthClient, id: u64) -> Result<()> {
    client.delete(&format!("/auth/wishlist/{}/", id)).await?;
    Ok(())
}

pub async fn remove_from_wishlist_by_product(client: &AuthClient, product_id: u64) -> Result<()> {
    client
        .delete(&format!("/auth/wishlist/product/{}/", product_id))
        .await?;
    Ok(())
}

/// Add the product if it is not wishlisted, remove it if it is.
pub async fn toggle_wishlist(client: &AuthClient, product_id: u64, in_wishlist: bool) -> Result<()> {
    if in_wishlist {
        remove_from_wishlist_by_product(client, product_id).await
    } else {
        add_to_wishlist(client, product_id).await?;
        Ok(())
    }
}
