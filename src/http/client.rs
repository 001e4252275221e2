use super::navigator::{LogNavigator, Navigator};
use super::refresh::{RefreshCoordinator, RefreshOutcome};
use super::request::{ApiRequest, ApiResponse, FormData};
use super::settings::{AuthMode, ClientSettings, CSRF_PATH};
use super::transport::Transport;
use crate::error::{ClientError, RefreshFailure, Result};
use crate::storage::{KeyValueStore, TokenKeys, TokenStore};
use reqwest::header::{HeaderName, HeaderValue, AUTHORIZATION};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Deserialize)]
struct TokenRefreshResponse {
    access: Option<String>,
    refresh: Option<String>,
}

/// HTTP client for one role.
///
/// Attaches that role's credential to every request and recovers once
/// from an expired credential: a 401 on an eligible path triggers a
/// single refresh (shared with any other request that hits 401 in the
/// meantime), after which the request is replayed exactly once.
/// Everything else passes through untouched.
pub struct AuthClient {
    transport: Arc<dyn Transport>,
    settings: ClientSettings,
    mode: AuthMode,
    refresh: RefreshCoordinator,
    navigator: Arc<dyn Navigator>,
}

impl AuthClient {
    pub fn new(transport: Arc<dyn Transport>, settings: ClientSettings, mode: AuthMode) -> Self {
        Self {
            transport,
            settings,
            mode,
            refresh: RefreshCoordinator::new(),
            navigator: Arc::new(LogNavigator),
        }
    }

    /// Customer client riding on the server session and CSRF cookies.
    pub fn customer_session(transport: Arc<dyn Transport>) -> Self {
        Self::new(
            transport,
            ClientSettings::customer_session(),
            AuthMode::cookie_session(),
        )
    }

    /// Customer client using the `access_token`/`refresh_token` pair.
    pub fn customer_bearer(transport: Arc<dyn Transport>, store: Arc<dyn KeyValueStore>) -> Self {
        Self::new(
            transport,
            ClientSettings::customer_bearer(),
            AuthMode::Bearer(TokenStore::new(store, TokenKeys::customer())),
        )
    }

    /// Seller client using the `shopkeeper_` token pair.
    pub fn shopkeeper(transport: Arc<dyn Transport>, store: Arc<dyn KeyValueStore>) -> Self {
        Self::new(
            transport,
            ClientSettings::shopkeeper(),
            AuthMode::Bearer(TokenStore::new(store, TokenKeys::shopkeeper())),
        )
    }

    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// The bearer token store, for bearer-mode clients.
    pub fn tokens(&self) -> Option<&TokenStore> {
        match &self.mode {
            AuthMode::Bearer(tokens) => Some(tokens),
            AuthMode::CookieSession { .. } => None,
        }
    }

    pub fn is_refreshing(&self) -> bool {
        self.refresh.is_refreshing()
    }

    /// Requests currently parked behind an in-flight refresh.
    pub fn queued_requests(&self) -> usize {
        self.refresh.queued()
    }

    /// Send `request`, recovering once from an expired credential.
    ///
    /// Non-2xx responses come back as [`ClientError::Api`].
    pub async fn request(&self, request: ApiRequest) -> Result<ApiResponse> {
        let generation = self.refresh.generation();
        let response = self.dispatch(&request).await?;

        if response.status != 401 || !self.should_refresh(&request) {
            return into_result(response);
        }

        debug!(
            client = %self.settings.name,
            path = %request.path,
            "unauthorized, waiting on token refresh"
        );
        self.refresh
            .run(generation, || self.perform_refresh())
            .await
            .map_err(ClientError::RefreshFailed)?;

        let retry = request.into_retry();
        let response = self.dispatch(&retry).await?;
        into_result(response)
    }

    /// [`request`](Self::request), returning the body as JSON.
    pub async fn send_json(&self, request: ApiRequest) -> Result<Value> {
        self.request(request).await?.value()
    }

    pub async fn get(&self, path: &str) -> Result<Value> {
        self.send_json(ApiRequest::get(path)).await
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<Value> {
        self.send_json(ApiRequest::post(path).json(body)).await
    }

    pub async fn put(&self, path: &str, body: Value) -> Result<Value> {
        self.send_json(ApiRequest::put(path).json(body)).await
    }

    pub async fn patch(&self, path: &str, body: Value) -> Result<Value> {
        self.send_json(ApiRequest::patch(path).json(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.send_json(ApiRequest::delete(path)).await
    }

    /// `multipart/form-data` POST, for file uploads.
    pub async fn post_form(&self, path: &str, form: FormData) -> Result<Value> {
        self.send_json(ApiRequest::post(path).multipart(form)).await
    }

    pub async fn put_form(&self, path: &str, form: FormData) -> Result<Value> {
        self.send_json(ApiRequest::put(path).multipart(form)).await
    }

    pub async fn patch_form(&self, path: &str, form: FormData) -> Result<Value> {
        self.send_json(ApiRequest::patch(path).multipart(form)).await
    }

    /// Fetch the CSRF cookie if the jar does not hold one yet.
    ///
    /// A no-op for bearer clients.
    pub async fn ensure_csrf(&self) -> Result<()> {
        let AuthMode::CookieSession { csrf_cookie, .. } = &self.mode else {
            return Ok(());
        };
        if self.transport.cookie(csrf_cookie).is_some() {
            return Ok(());
        }
        self.request(ApiRequest::get(CSRF_PATH)).await?;
        Ok(())
    }

    /// Only routes under the transport's base URL are ever refreshed.
    fn should_refresh(&self, request: &ApiRequest) -> bool {
        let Some(route) = request.route_within(self.transport.base_url()) else {
            return false;
        };
        !request.retried && !self.settings.is_excluded(route) && self.settings.is_protected(route)
    }

    /// Attach the credential and put the request on the wire.
    async fn dispatch(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let mut outgoing = request.clone();

        match &self.mode {
            AuthMode::CookieSession {
                csrf_cookie,
                csrf_header,
            } => {
                let header = HeaderName::from_bytes(csrf_header.as_bytes())
                    .map_err(|e| ClientError::InvalidHeader(e.to_string()))?;
                if outgoing.is_mutating() && !outgoing.headers.contains_key(&header) {
                    if let Some(token) = self.transport.cookie(csrf_cookie) {
                        let value = HeaderValue::from_str(&token)
                            .map_err(|e| ClientError::InvalidHeader(e.to_string()))?;
                        outgoing.headers.insert(header, value);
                    }
                }
            }
            AuthMode::Bearer(tokens) => {
                if !outgoing.headers.contains_key(AUTHORIZATION) {
                    if let Some(token) = tokens.access()? {
                        let value = HeaderValue::from_str(&format!("Bearer {}", token))
                            .map_err(|e| ClientError::InvalidHeader(e.to_string()))?;
                        outgoing.headers.insert(AUTHORIZATION, value);
                    }
                }
            }
        }

        self.transport.send(&outgoing).await
    }

    async fn perform_refresh(&self) -> RefreshOutcome {
        info!(client = %self.settings.name, "refreshing credentials");

        let outcome = match &self.mode {
            AuthMode::CookieSession { .. } => self.refresh_session().await,
            AuthMode::Bearer(tokens) => {
                // With nothing stored, the user was already sent to the login route
                let signed_in = tokens.has_credentials().unwrap_or(true);
                let outcome = self.refresh_bearer(tokens).await;
                if outcome.is_err() {
                    if let Err(e) = tokens.clear() {
                        warn!(client = %self.settings.name, error = %e, "failed to clear tokens");
                    }
                    if signed_in {
                        self.navigator.navigate(&self.settings.login_route);
                    } else {
                        debug!(client = %self.settings.name, "no stored credentials, not redirecting");
                    }
                }
                outcome
            }
        };

        match &outcome {
            Ok(()) => info!(client = %self.settings.name, "credentials refreshed"),
            Err(failure) => {
                warn!(client = %self.settings.name, error = %failure, "credential refresh failed")
            }
        }
        outcome
    }

    async fn refresh_session(&self) -> RefreshOutcome {
        let request = ApiRequest::post(&self.settings.refresh_path);
        let response = self
            .dispatch(&request)
            .await
            .map_err(|e| RefreshFailure::new(e.to_string()))?;

        if response.is_success() {
            Ok(())
        } else {
            Err(RefreshFailure::with_status(response.status, response.text()))
        }
    }

    async fn refresh_bearer(&self, tokens: &TokenStore) -> RefreshOutcome {
        let refresh_token = tokens
            .refresh()
            .map_err(|e| RefreshFailure::new(e.to_string()))?
            .ok_or_else(|| RefreshFailure::new("No refresh token available"))?;

        // Straight to the transport: the refresh call carries no access token
        let request =
            ApiRequest::post(&self.settings.refresh_path).json(json!({ "refresh": refresh_token }));
        let response = self
            .transport
            .send(&request)
            .await
            .map_err(|e| RefreshFailure::new(e.to_string()))?;

        if !response.is_success() {
            return Err(RefreshFailure::with_status(response.status, response.text()));
        }

        let body: TokenRefreshResponse = response
            .json()
            .map_err(|e| RefreshFailure::with_status(response.status, e.to_string()))?;
        let access = body.access.ok_or_else(|| {
            RefreshFailure::with_status(response.status, "Refresh response carried no access token")
        })?;

        let saved = match body.refresh.as_deref() {
            Some(rotated) => tokens.save_pair(&access, Some(rotated)),
            None => tokens.set_access(&access),
        };
        saved.map_err(|e| RefreshFailure::new(e.to_string()))
    }
}

fn into_result(response: ApiResponse) -> Result<ApiResponse> {
    if response.is_success() {
        Ok(response)
    } else {
        Err(ClientError::Api {
            status: response.status,
            body: response.text(),
        })
    }
}
