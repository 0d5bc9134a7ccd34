use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use super::{HttpResponse, Transport, TransportError};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!("commitfeed/", env!("CARGO_PKG_VERSION"));

/// `reqwest` blocking client shared by every call in a run.
///
/// The timeout applies to page listing and PR lookups alike.
pub struct BlockingTransport {
    client: Client,
}

impl BlockingTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TransportError::Init(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Transport for BlockingTransport {
    fn get(&self, url: &str, headers: &[(&str, String)]) -> Result<HttpResponse, TransportError> {
        let mut builder = self.client.get(url);
        for (name, value) in headers {
            builder = builder.header(*name, value.as_str());
        }

        let resp = builder
            .send()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = resp.status();
        let headers = resp
            .headers()
            .iter()
            .filter_map(|(k, v)| {
                v.to_str()
                    .ok()
                    .map(|v| (k.as_str().to_string(), v.to_string()))
            })
            .collect();

        // Consumes the response; the connection goes back to the pool here
        // whether or not the read succeeds.
        let body = resp
            .text()
            .map_err(|e| TransportError::Body(e.to_string()))?;

        debug!("GET {url} -> {status} ({} bytes)", body.len());

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.to_string(),
            headers,
            body,
        })
    }
}
