// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Services for communicating with APIs using HTTP.
//!
//! Every request made by the program goes through an [`HTTPClient`], which
//! blocks the calling thread until a response arrives or the request times
//! out. Consumers depend on the [`HTTPGet`] and [`HTTPPost`] traits rather
//! than the concrete client so that deterministic services can be swapped
//! in when testing.

use log::trace;
use reqwest::blocking::{Client, ClientBuilder, Response};
use reqwest::{StatusCode, header};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// A general service for making HTTP calls.
///
/// It might be a bit odd to refer to this trait as a "service", since
/// it appears to be more of a _client_ implementation, but think of
/// this as a proxy for a remote _service_ (even though a _client_ is used
/// to communicate with that remote service).
pub trait HTTPService {
    /// Default HTTP client that can be used to make HTTP requests.
    fn client() -> Client {
        ClientBuilder::new()
            .user_agent(Self::user_agent())
            .timeout(Self::timeout())
            .build()
            // According to the docs, build() only fails if a TLS backend
            // cannot be initialized, or if DNS resolution cannot be
            // initialized, and both of these are unrecoverable for us.
            .expect("could not create a new HTTP client")
    }

    /// An appropriate user agent to use when making HTTP requests.
    fn user_agent() -> String {
        format!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }

    /// How long to wait for a response before giving up.
    fn timeout() -> Duration {
        Duration::from_secs(60)
    }
}

/// An extra header sent along with a request, as a name-value pair.
pub type Header = (&'static str, String);

/// Sends GET requests and returns the raw body of the response.
pub trait HTTPGet {
    /// Sends a GET request to `uri` with the given query parameters.
    ///
    /// If `bearer` is given, it is sent as a bearer token in the
    /// `Authorization` header.
    fn get(&self, uri: &str, bearer: Option<&str>, query: &[(&str, String)]) -> HTTPResult<String>;
}

/// Sends POST requests with a JSON body and returns the raw body of the
/// response.
pub trait HTTPPost {
    /// Sends `data`, serialized as JSON, to `uri` along with any extra
    /// `headers`.
    fn post<D: Serialize + ?Sized>(
        &self,
        uri: &str,
        headers: &[Header],
        data: &D,
    ) -> HTTPResult<String>;
}

/// The result of an HTTP request.
pub type HTTPResult<T> = Result<T, HTTPError>;

/// Indicates an error has occurred when making an HTTP call.
#[derive(Debug, Error)]
pub enum HTTPError {
    /// The remote host could not be reached at all, either because the
    /// connection was refused or because the request timed out.
    #[error("Could not connect: {0}")]
    Unreachable(String),

    /// An error that occurred while making an HTTP request.
    #[error("Error while making HTTP request: {0}")]
    Request(reqwest::Error),

    /// An error retrieving the body of a response.
    #[error("Error retrieving body of HTTP response: {0}")]
    Body(reqwest::Error),

    /// An unsuccessful HTTP status code in an HTTP response.
    #[error("Request returned HTTP {0}")]
    Http(StatusCode),

    /// A missing Content-Type header in a response.
    #[error("Missing Content-Type header")]
    MissingContentType,

    /// An invalid Content-Type header.
    #[error("Invalid Content-Type header value: {0}")]
    InvalidContentType(#[from] header::ToStrError),

    /// A Content-Type that is not understood by the service.
    #[error("Unexpected content type: {0}")]
    UnexpectedContentType(String),
}

impl From<reqwest::Error> for HTTPError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() {
            HTTPError::Unreachable(error.to_string())
        } else if error.is_body() || error.is_decode() {
            HTTPError::Body(error)
        } else {
            HTTPError::Request(error)
        }
    }
}

/// A blocking HTTP client that speaks JSON.
///
/// This is the concrete service used by both the Bluesky API connector and
/// the AI provider adapter.
#[derive(Debug)]
pub struct HTTPClient {
    client: Client,
}

impl HTTPService for HTTPClient {}

impl Default for HTTPClient {
    fn default() -> Self {
        let client = Self::client();
        Self { client }
    }
}

impl HTTPClient {
    /// Checks the response status and Content-Type and returns its body.
    fn body(resp: Response) -> HTTPResult<String> {
        let status = resp.status();
        trace!("received HTTP {status} from {}", resp.url());

        if !status.is_success() {
            return Err(HTTPError::Http(status));
        }

        let content_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .ok_or(HTTPError::MissingContentType)?
            .to_str()?;
        if !content_type.starts_with("application/json") {
            return Err(HTTPError::UnexpectedContentType(content_type.to_string()));
        }

        resp.text().map_err(HTTPError::Body)
    }
}

impl HTTPGet for HTTPClient {
    fn get(&self, uri: &str, bearer: Option<&str>, query: &[(&str, String)]) -> HTTPResult<String> {
        trace!("GET {uri}");
        let mut req = self.client.get(uri).query(query);
        if let Some(token) = bearer {
            req = req.bearer_auth(token);
        }
        Self::body(req.send()?)
    }
}

impl HTTPPost for HTTPClient {
    fn post<D: Serialize + ?Sized>(
        &self,
        uri: &str,
        headers: &[Header],
        data: &D,
    ) -> HTTPResult<String> {
        trace!("POST {uri}");
        let mut req = self.client.post(uri).json(data);
        for (name, value) in headers {
            req = req.header(*name, value);
        }
        Self::body(req.send()?)
    }
}
