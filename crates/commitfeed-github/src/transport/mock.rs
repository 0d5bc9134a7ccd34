use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use super::{HttpResponse, Transport, TransportError};

#[derive(Debug, Clone)]
enum Reply {
    Response(HttpResponse),
    Failure(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A canned-response transport for tests.
///
/// Each URL maps to a queue of replies served in order; the last one repeats
/// once the queue is down to it. Requests to unrouted URLs fail with a
/// transport error, which makes an unexpected extra page request visible
/// as a failed run. Every request is recorded in order.
#[derive(Debug, Default)]
pub struct MockTransport {
    routes: RefCell<HashMap<String, VecDeque<Reply>>>,
    requests: RefCell<Vec<RecordedRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, url: &str, response: HttpResponse) -> Self {
        self.with_responses(url, vec![response])
    }

    /// Serve `responses` for `url` one per request, repeating the last.
    pub fn with_responses(mut self, url: &str, responses: Vec<HttpResponse>) -> Self {
        self.routes.get_mut().insert(
            url.to_string(),
            responses.into_iter().map(Reply::Response).collect(),
        );
        self
    }

    /// 200 response with a generous rate-limit budget.
    pub fn with_json(self, url: &str, body: &str) -> Self {
        self.with_response(
            url,
            HttpResponse::new(200, body).with_header("X-RateLimit-Remaining", "4999"),
        )
    }

    pub fn with_failure(mut self, url: &str, message: &str) -> Self {
        self.routes.get_mut().insert(
            url.to_string(),
            VecDeque::from([Reply::Failure(message.to_string())]),
        );
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.borrow().clone()
    }

    pub fn request_urls(&self) -> Vec<String> {
        self.requests.borrow().iter().map(|r| r.url.clone()).collect()
    }

    pub fn count_requests(&self, url: &str) -> usize {
        self.requests.borrow().iter().filter(|r| r.url == url).count()
    }
}

impl Transport for MockTransport {
    fn get(&self, url: &str, headers: &[(&str, String)]) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(RecordedRequest {
            url: url.to_string(),
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        });

        let mut routes = self.routes.borrow_mut();
        let reply = match routes.get_mut(url) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };

        match reply {
            Some(Reply::Response(resp)) => Ok(resp),
            Some(Reply::Failure(msg)) => Err(TransportError::Request(msg)),
            None => Err(TransportError::Request(format!("no mock route for {url}"))),
        }
    }
}
