//! Canned-response transport for unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::api::error::{ApiError, Result};
use crate::api::{HttpRequest, HttpResponse, HttpTransport, TrelloClient};

#[derive(Default)]
struct MockState {
    responses: VecDeque<HttpResponse>,
    requests: Vec<HttpRequest>,
}

/// Replays queued responses in order and records every request.
#[derive(Default, Clone)]
pub(crate) struct MockTransport {
    state: Rc<RefCell<MockState>>,
}

impl MockTransport {
    pub(crate) fn new(responses: Vec<(u16, &str)>) -> Self {
        let transport = Self::default();
        transport.state.borrow_mut().responses = responses
            .into_iter()
            .map(|(status, body)| HttpResponse {
                status,
                body: body.to_string(),
            })
            .collect();
        transport
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.state.borrow().requests.clone()
    }
}

impl HttpTransport for MockTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let mut state = self.state.borrow_mut();
        state.requests.push(request.clone());
        state
            .responses
            .pop_front()
            .ok_or_else(|| ApiError::Transport("no canned response left".to_string()))
    }
}

/// A simple-auth client (key `key`, token `token`) over a mock transport.
pub(crate) fn mock_client(responses: Vec<(u16, &str)>) -> (TrelloClient, MockTransport) {
    let mock = MockTransport::new(responses);
    let client = TrelloClient::builder()
        .api_key("key")
        .token("token")
        .transport(mock.clone())
        .build()
        .expect("mock client");
    (client, mock)
}

/// An OAuth client over a mock transport.
pub(crate) fn mock_oauth_client(responses: Vec<(u16, &str)>) -> (TrelloClient, MockTransport) {
    let mock = MockTransport::new(responses);
    let client = TrelloClient::builder()
        .api_key("key")
        .token("token")
        .oauth_secrets("secret", "token_secret")
        .transport(mock.clone())
        .build()
        .expect("mock oauth client");
    (client, mock)
}
