use crate::error::Result;
use crate::http::AuthClient;
use serde_json::{json, Value};

pub async fn get_cart(client: &AuthClient) -> Result<Value> {
    client.get("/cart/").await
}

pub async fn add_to_cart(client: &AuthClient, product_id: u64, quantity: u32) -> Result<Value> {
    client
        .post(&format!("/cart/{}/", product_id), json!({ "quantity": quantity }))
        .await
}

pub async fn update_quantity(client: &AuthClient, product_id: u64, quantity: u32) -> Result<Value> {
    client
        .patch(&format!("/cart/{}/", product_id), json!({ "quantity": quantity }))
        .await
}

pub async fn remove_from_cart(client: &AuthClient, product_id: u64) -> Result<Value> {
    client.delete(&format!("/cart/{}/", product_id)).await
}
