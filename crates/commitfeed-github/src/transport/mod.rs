pub mod blocking;
pub mod mock;

use thiserror::Error;

pub use blocking::BlockingTransport;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP client init: {0}")]
    Init(String),

    #[error("{0}")]
    Request(String),

    #[error("read body: {0}")]
    Body(String),
}

/// A fully-read HTTP response.
///
/// The body is drained before the transport returns, so the underlying
/// connection is already released by the time a caller inspects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Status line as shown to users, e.g. `403 Forbidden`.
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        let status_text = match reqwest::StatusCode::from_u16(status) {
            Ok(code) => code.to_string(),
            Err(_) => status.to_string(),
        };
        Self {
            status,
            status_text,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    /// Case-insensitive header lookup; first match wins.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Blocking GET transport. One call, one fully-read response.
pub trait Transport {
    fn get(&self, url: &str, headers: &[(&str, String)]) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str, headers: &[(&str, String)]) -> Result<HttpResponse, TransportError> {
        (**self).get(url, headers)
    }
}

pub fn auth_header(token: &str) -> (&'static str, String) {
    ("Authorization", format!("token {token}"))
}
