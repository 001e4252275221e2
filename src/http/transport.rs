use super::request::{is_absolute, ApiRequest, ApiResponse, FormData, FormPart};
use crate::error::{ClientError, Result};
use async_trait::async_trait;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::Url;
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

/// Moves one request over the wire. Never retries and never interprets status codes.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse>;

    /// Current value of a cookie the server has set for the base URL.
    fn cookie(&self, name: &str) -> Option<String>;

    /// Absolute URL that relative request paths are joined onto.
    fn base_url(&self) -> Option<&str> {
        None
    }
}

/// reqwest-backed transport with a persistent cookie jar.
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Url,
    jar: Arc<Jar>,
}

impl ReqwestTransport {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::Config(format!("Invalid base URL {}: {}", base_url, e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let jar = Arc::new(Jar::default());
        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .cookie_provider(jar.clone());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
            jar,
        })
    }

    fn url_for(&self, path: &str) -> Result<Url> {
        if is_absolute(path) {
            return Url::parse(path)
                .map_err(|e| ClientError::Config(format!("Invalid URL {}: {}", path, e)));
        }
        let joined = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| ClientError::Config(format!("Invalid URL {}: {}", joined, e)))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let url = self.url_for(&request.path)?;
        trace!(method = %request.method, %url, "sending request");

        let mut builder = self
            .client
            .request(request.method.clone(), url)
            .headers(request.headers.clone());
        if let Some(form) = &request.form {
            builder = builder.multipart(to_multipart(form)?);
        } else if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }

    fn cookie(&self, name: &str) -> Option<String> {
        let header = self.jar.cookies(&self.base_url)?;
        let cookies = header.to_str().ok()?;
        find_cookie(cookies, name)
    }

    fn base_url(&self) -> Option<&str> {
        Some(self.base_url.as_str())
    }
}

fn to_multipart(form: &FormData) -> Result<Form> {
    let mut multipart = Form::new();
    for (name, part) in form.parts() {
        multipart = match part {
            FormPart::Text(value) => multipart.text(name.clone(), value.clone()),
            FormPart::File {
                file_name,
                mime,
                data,
            } => {
                let mut file = Part::bytes(data.to_vec()).file_name(file_name.clone());
                if let Some(mime) = mime {
                    file = file.mime_str(mime)?;
                }
                multipart.part(name.clone(), file)
            }
        };
    }
    Ok(multipart)
}

/// Pick `name` out of a `Cookie:` header value.
pub(crate) fn find_cookie(header: &str, name: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_cookie() {
        let header = "sessionid=abc; csrftoken=tok123; theme=dark";
        assert_eq!(find_cookie(header, "csrftoken").as_deref(), Some("tok123"));
        assert_eq!(find_cookie(header, "missing"), None);
    }

    #[test]
    fn test_url_joining() {
        let transport = ReqwestTransport::new("http://127.0.0.1:8000/api/", None).unwrap();
        assert_eq!(
            transport.url_for("/products/").unwrap().as_str(),
            "http://127.0.0.1:8000/api/products/"
        );
        assert_eq!(
            transport.url_for("http://other.test/x/").unwrap().as_str(),
            "http://other.test/x/"
        );
    }

    #[test]
    fn test_multipart_conversion() {
        let form = FormData::new()
            .text("title", "Licence")
            .file("file", "licence.pdf", Some("application/pdf"), &b"%PDF"[..]);
        let multipart = to_multipart(&form).unwrap();
        assert!(!multipart.boundary().is_empty());

        let bad = FormData::new().file("file", "x", Some("not a mime"), &b""[..]);
        assert!(to_multipart(&bad).is_err());
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            ReqwestTransport::new("not a url", None),
            Err(ClientError::Config(_))
        ));
    }
}
