use crate::error::Result;
use crate::http::{AuthClient, FormData};
use serde_json::{json, Value};
use tracing::{debug, warn};

pub async fn login(client: &AuthClient, credentials: Value) -> Result<Value> {
    let data = client.post("/auth/login/", credentials).await?;
    persist_tokens(client, &data)?;
    Ok(data)
}

pub async fn register(client: &AuthClient, user: Value) -> Result<Value> {
    let data = client.post("/auth/register/", user).await?;
    persist_tokens(client, &data)?;
    Ok(data)
}

/// Log out on the server. Local tokens are dropped even if the server call fails.
pub async fn logout(client: &AuthClient) -> Result<Value> {
    let result = client.post("/auth/logout/", json!({})).await;
    if let Some(tokens) = client.tokens() {
        tokens.clear()?;
    }
    if let Err(e) = &result {
        warn!(error = %e, "server logout failed, local credentials cleared anyway");
    }
    result
}

pub async fn profile(client: &AuthClient) -> Result<Value> {
    client.get("/auth/profile/").await
}

/// Partial profile update; the form may carry a profile picture.
pub async fn update_profile(client: &AuthClient, profile: FormData) -> Result<Value> {
    client.patch_form("/auth/profile/", profile).await
}

/// Email a one-time code to the signed-in user.
pub async fn send_otp(client: &AuthClient) -> Result<Value> {
    client.post("/auth/send-otp/", json!({})).await
}

pub async fn verify_otp(client: &AuthClient, otp: &str) -> Result<Value> {
    client.post("/auth/verify-otp/", json!({ "otp": otp })).await
}

/// Confirm an email address from the token in a verification link.
pub async fn verify_email(client: &AuthClient, token: &str) -> Result<Value> {
    client.get(&format!("/auth/verify-email/{}/", token)).await
}

pub async fn verify_token(client: &AuthClient, token: &str) -> Result<Value> {
    client
        .post("/auth/token/verify/", json!({ "token": token }))
        .await
}

/// Make sure the CSRF cookie is present before the first mutating call.
pub async fn csrf(client: &AuthClient) -> Result<()> {
    client.ensure_csrf().await
}

/// Store the token pair a login/register response carries, for bearer clients.
///
/// Accepts both `{"tokens": {"access", "refresh"}}` and top-level `access`/`refresh`.
pub(crate) fn persist_tokens(client: &AuthClient, data: &Value) -> Result<()> {
    let Some(tokens) = client.tokens() else {
        return Ok(());
    };

    let source = data.get("tokens").unwrap_or(data);
    let access = source.get("access").and_then(Value::as_str);
    let refresh = source.get("refresh").and_then(Value::as_str);

    if let Some(access) = access {
        tokens.save_pair(access, refresh)?;
        debug!(client = %client.settings().name, "stored new token pair");
    }
    Ok(())
}
