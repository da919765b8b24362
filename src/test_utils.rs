use crate::bsky::Client;
use crate::bsky::service::Service;
use crate::conf::Credentials;
use crate::http::{HTTPError, HTTPPost, HTTPResult, Header};
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::fs;

pub fn load_data(file: &str) -> String {
    fs::read_to_string(format!("tests/data/{file}.json")).expect("could not find test data")
}

/// Turns off terminal colors so rendered output can be compared as plain text.
pub fn no_color() {
    colored::control::set_override(false);
}

/// A request captured by a [`TestService`].
pub type RecordedGet = (String, Vec<(String, String)>);

/// A Bluesky service that reads canned responses from `tests/data`.
///
/// GET requests for `app.bsky.feed.getAuthorFeed` are answered with
/// `getAuthorFeed_{suffix}.json`, or `getAuthorFeed_{suffix}_{cursor}.json`
/// when a cursor is sent.
#[derive(Debug)]
pub struct TestService<'a> {
    suffix: &'a str,
    session: &'a str,
    login_status: Option<StatusCode>,
    fail_after: Option<(usize, StatusCode)>,
    requests: RefCell<Vec<RecordedGet>>,
}

impl<'a> TestService<'a> {
    pub fn new(suffix: &'a str) -> Self {
        Self {
            suffix,
            session: "alice",
            login_status: None,
            fail_after: None,
            requests: RefCell::new(vec![]),
        }
    }

    /// Answers logins with `createSession_{session}.json`.
    pub fn session(self, session: &'a str) -> Self {
        Self { session, ..self }
    }

    /// Rejects logins with `status`.
    pub fn login_status(self, status: StatusCode) -> Self {
        Self {
            login_status: Some(status),
            ..self
        }
    }

    /// Answers every GET after the first `n` with `status`.
    pub fn fail_after(self, n: usize, status: StatusCode) -> Self {
        Self {
            fail_after: Some((n, status)),
            ..self
        }
    }

    /// GET requests made so far, as `(method, query)` pairs.
    pub fn requests(&self) -> Vec<RecordedGet> {
        self.requests.borrow().clone()
    }

    fn status(&self) -> Option<StatusCode> {
        let made = self.requests.borrow().len();
        match self.fail_after {
            Some((n, status)) if made > n => Some(status),
            _ => None,
        }
    }
}

impl<'a> Service for TestService<'a> {
    fn create_session(&self, _identifier: &str, _password: &str) -> HTTPResult<String> {
        match self.login_status {
            Some(status) => Err(HTTPError::Http(status)),
            None => Ok(load_data(&format!("createSession_{}", self.session))),
        }
    }

    fn get_resource(
        &self,
        method: &str,
        _token: &str,
        query: &[(&str, String)],
    ) -> HTTPResult<String> {
        let recorded = query
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        self.requests
            .borrow_mut()
            .push((method.to_string(), recorded));

        if let Some(status) = self.status() {
            return Err(HTTPError::Http(status));
        }

        let short = method.rsplit('.').next().unwrap_or(method);
        let cursor = query.iter().find(|(k, _)| *k == "cursor");
        let file = match cursor {
            Some((_, cursor)) => format!("{short}_{}_{cursor}", self.suffix),
            None => format!("{short}_{}", self.suffix),
        };
        Ok(load_data(&file))
    }
}

impl<'a> Client<TestService<'a>> {
    /// Returns a client logged in as alice, who has a profile, three posts,
    /// three followers across two pages, and two follows.
    pub fn test() -> Self {
        Self::login_with_service(&Credentials::new("alice", "pw"), TestService::new("alice"))
            .unwrap()
    }

    /// Returns a client whose lookups all find an account with no posts.
    pub fn test_empty() -> Self {
        Self::login_with_service(&Credentials::new("alice", "pw"), TestService::new("empty"))
            .unwrap()
    }

    /// Returns a client whose lookups all fail with `status`.
    pub fn test_failing(status: StatusCode) -> Self {
        let service = TestService::new("alice").fail_after(0, status);
        Self::login_with_service(&Credentials::new("alice", "pw"), service).unwrap()
    }
}

/// A POST request captured by a [`TestTransport`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub uri: String,
    pub headers: Vec<Header>,
    pub body: Value,
}

impl RecordedRequest {
    pub fn has_header(&self, name: &str, value: &str) -> bool {
        self.headers.iter().any(|(n, v)| *n == name && v == value)
    }
}

#[derive(Debug)]
enum Canned {
    Body(String),
    Unreachable(String),
    Status(StatusCode),
}

/// An AI provider transport that answers every request the same way.
#[derive(Debug)]
pub struct TestTransport {
    canned: Canned,
    calls: Cell<usize>,
    requests: RefCell<Vec<RecordedRequest>>,
}

impl TestTransport {
    fn new(canned: Canned) -> Self {
        Self {
            canned,
            calls: Cell::new(0),
            requests: RefCell::new(vec![]),
        }
    }

    /// Answers every request with `body`.
    pub fn ok(body: &str) -> Self {
        Self::new(Canned::Body(body.to_string()))
    }

    /// Fails every request with `error`. Only unreachable hosts and HTTP
    /// statuses can be simulated.
    pub fn err(error: HTTPError) -> Self {
        let canned = match error {
            HTTPError::Unreachable(reason) => Canned::Unreachable(reason),
            HTTPError::Http(status) => Canned::Status(status),
            other => panic!("cannot simulate {other:?}"),
        };
        Self::new(canned)
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.borrow().last().cloned()
    }
}

impl HTTPPost for TestTransport {
    fn post<D: Serialize + ?Sized>(
        &self,
        uri: &str,
        headers: &[Header],
        data: &D,
    ) -> HTTPResult<String> {
        self.calls.set(self.calls.get() + 1);
        self.requests.borrow_mut().push(RecordedRequest {
            uri: uri.to_string(),
            headers: headers.to_vec(),
            body: serde_json::to_value(data).expect("could not serialize request"),
        });

        match &self.canned {
            Canned::Body(body) => Ok(body.clone()),
            Canned::Unreachable(reason) => Err(HTTPError::Unreachable(reason.clone())),
            Canned::Status(status) => Err(HTTPError::Http(*status)),
        }
    }
}
