//! In-memory transport for unit tests.

use crate::upstream::transport::{Request, Response, Transport, TransportError};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

/// Canned responses by URL. Queued responses are served in order and the
/// last one repeats; a URL with nothing queued fails like a refused connection.
#[derive(Default)]
pub struct FakeTransport {
    responses: RefCell<HashMap<String, VecDeque<Response>>>,
    requests: RefCell<Vec<Request>>,
}

impl FakeTransport {
    pub fn respond(&self, url: &str, status: u16, body: &str) {
        self.responses
            .borrow_mut()
            .entry(url.to_string())
            .or_default()
            .push_back(Response {
                status,
                body: body.to_string(),
            });
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.borrow().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests.borrow().iter().map(|r| r.url.clone()).collect()
    }
}

impl Transport for FakeTransport {
    fn send(&self, request: &Request) -> Result<Response, TransportError> {
        self.requests.borrow_mut().push(request.clone());
        let mut responses = self.responses.borrow_mut();
        let queue = responses
            .get_mut(&request.url)
            .ok_or_else(|| TransportError::Connection("connection refused".into()))?;
        let response = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        response.ok_or_else(|| TransportError::Connection("connection refused".into()))
    }
}
