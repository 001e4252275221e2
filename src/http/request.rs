use crate::error::Result;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// One field of a `multipart/form-data` body.
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text(String),
    File {
        file_name: String,
        mime: Option<String>,
        data: Bytes,
    },
}

/// A `multipart/form-data` body, kept as plain data so a request can be
/// replayed after a token refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    parts: Vec<(String, FormPart)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text fields from the top level of a JSON object. Nulls are skipped,
    /// strings are sent as-is and everything else as its JSON text.
    pub fn from_json(fields: &Value) -> Self {
        let mut form = Self::new();
        if let Value::Object(map) = fields {
            for (name, value) in map {
                match value {
                    Value::Null => {}
                    Value::String(text) => form = form.text(name, text),
                    other => form = form.text(name, other.to_string()),
                }
            }
        }
        form
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push((name.into(), FormPart::Text(value.into())));
        self
    }

    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: Option<&str>,
        data: impl Into<Bytes>,
    ) -> Self {
        self.parts.push((
            name.into(),
            FormPart::File {
                file_name: file_name.into(),
                mime: mime.map(str::to_string),
                data: data.into(),
            },
        ));
        self
    }

    pub fn parts(&self) -> &[(String, FormPart)] {
        &self.parts
    }

    pub fn get(&self, name: &str) -> Option<&FormPart> {
        self.parts.iter().find(|(n, _)| n == name).map(|(_, part)| part)
    }
}

/// An outbound call, relative to the client's base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    /// Sent instead of `body` when present.
    pub form: Option<FormData>,
    pub headers: HeaderMap,
    /// Set once the request has been replayed after a token refresh.
    pub retried: bool,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            form: None,
            headers: HeaderMap::new(),
            retried: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self.form = None;
        self
    }

    pub fn multipart(mut self, form: FormData) -> Self {
        self.form = Some(form);
        self.body = None;
        self
    }

    /// Media type of the body, if there is one.
    pub fn content_type(&self) -> Option<&'static str> {
        if self.form.is_some() {
            Some("multipart/form-data")
        } else if self.body.is_some() {
            Some("application/json")
        } else {
            None
        }
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// POST, PUT, PATCH and DELETE change server state.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self.method,
            Method::POST | Method::PUT | Method::PATCH | Method::DELETE
        )
    }

    /// The path without any query string.
    pub fn route(&self) -> &str {
        self.path.split('?').next().unwrap_or(&self.path)
    }

    /// [`route`](Self::route) relative to `base_url`.
    ///
    /// An absolute URL under `base_url` is cut down to its relative route;
    /// one outside it (or with no base to compare against) gives `None`.
    pub fn route_within(&self, base_url: Option<&str>) -> Option<&str> {
        let route = self.route();
        if !is_absolute(route) {
            return Some(route);
        }
        let rest = route.strip_prefix(base_url?.trim_end_matches('/'))?;
        (rest.is_empty() || rest.starts_with('/')).then_some(rest)
    }

    pub(crate) fn into_retry(mut self) -> Self {
        self.retried = true;
        self
    }
}

pub(crate) fn is_absolute(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}

/// A response exactly as the server sent it.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// The body as JSON. An empty body (e.g. 204) is `null`.
    pub fn value(&self) -> Result<Value> {
        if self.body.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(Value::Null);
        }
        self.json()
    }
}
