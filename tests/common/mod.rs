#![allow(dead_code)]

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tempshop::error::Result;
use tempshop::http::{ApiRequest, ApiResponse, Navigator, Transport};
use tokio::sync::Notify;

pub const REFRESH_PATH: &str = "/auth/token/refresh/";

type Handler = Box<dyn Fn(&ApiRequest) -> Result<ApiResponse> + Send + Sync>;

/// In-process stand-in for the backend. Every request is logged, then
/// answered by `handler`. Refresh calls can be held until a gate opens.
pub struct FakeTransport {
    handler: Handler,
    cookies: Mutex<HashMap<String, String>>,
    log: Mutex<Vec<ApiRequest>>,
    refresh_gate: Option<Arc<Notify>>,
    base_url: Option<String>,
}

impl FakeTransport {
    pub fn new(handler: impl Fn(&ApiRequest) -> Result<ApiResponse> + Send + Sync + 'static) -> Self {
        Self {
            handler: Box::new(handler),
            cookies: Mutex::new(HashMap::new()),
            log: Mutex::new(vec![]),
            refresh_gate: None,
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = Some(base_url.to_string());
        self
    }

    pub fn with_refresh_gate(mut self, gate: Arc<Notify>) -> Self {
        self.refresh_gate = Some(gate);
        self
    }

    pub fn with_cookie(self, name: &str, value: &str) -> Self {
        self.cookies
            .lock()
            .unwrap()
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.log.lock().unwrap().clone()
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests().iter().filter(|r| r.path == path).count()
    }

    pub fn refresh_calls(&self) -> usize {
        self.count(REFRESH_PATH)
    }

    /// Authorization header values seen on requests to `path`, in send order.
    pub fn bearer_tokens_for(&self, path: &str) -> Vec<Option<String>> {
        self.requests()
            .iter()
            .filter(|r| r.path == path)
            .map(|r| {
                r.headers
                    .get(AUTHORIZATION)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string)
            })
            .collect()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        self.log.lock().unwrap().push(request.clone());
        if request.path == REFRESH_PATH {
            if let Some(gate) = &self.refresh_gate {
                gate.notified().await;
            }
        }
        (self.handler)(request)
    }

    fn cookie(&self, name: &str) -> Option<String> {
        self.cookies.lock().unwrap().get(name).cloned()
    }

    fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }
}

pub fn json_response(status: u16, body: Value) -> ApiResponse {
    ApiResponse::new(status, body.to_string())
}

pub fn bearer_of(request: &ApiRequest) -> Option<&str> {
    request
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
}

#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        self.routes.lock().unwrap().push(route.to_string());
    }
}

/// Spin until `condition` holds, letting other futures on this task run.
pub async fn wait_until(condition: impl Fn() -> bool) {
    while !condition() {
        tokio::task::yield_now().await;
    }
}
