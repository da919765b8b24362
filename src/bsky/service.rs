// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! HTTPS connector for the Bluesky API.
//!
//! Service structures in this module provide a low-level way to interact
//! with Bluesky's XRPC endpoints, essentially a specialized HTTPS client
//! specifically for Bluesky. They return raw response bodies; parsing is
//! left to the [client](crate::bsky::client).

use crate::http::{HTTPClient, HTTPGet, HTTPPost, HTTPResult};
use serde::Serialize;

/// Base URL of the Bluesky XRPC API.
pub const BASE_URL: &str = "https://bsky.social/xrpc";

/// XRPC method used to log in.
pub const CREATE_SESSION: &str = "com.atproto.server.createSession";

/// A service for retrieving information from Bluesky.
///
/// Using this trait, clients can implement different ways of connecting
/// to the Bluesky API, such as an actual connector for production code,
/// and a mocked connector for testing purposes.
pub trait Service {
    /// Logs in with a handle (or email) and app password and returns the
    /// raw session response.
    fn create_session(&self, identifier: &str, password: &str) -> HTTPResult<String>;

    /// Performs an authenticated GET request to the XRPC `method` with the
    /// given query parameters and returns the raw response.
    fn get_resource(
        &self,
        method: &str,
        token: &str,
        query: &[(&str, String)],
    ) -> HTTPResult<String>;
}

/// A service that contacts the Bluesky API directly to retrieve information.
#[derive(Debug)]
pub struct BlueskyService {
    client: HTTPClient,
    base: String,
}

impl Default for BlueskyService {
    fn default() -> Self {
        Self::new(BASE_URL)
    }
}

#[derive(Serialize)]
struct SessionRequest<'a> {
    identifier: &'a str,
    password: &'a str,
}

impl BlueskyService {
    /// Creates a service that talks to the XRPC API rooted at `base`.
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        let client = HTTPClient::default();
        Self { client, base }
    }

    fn uri(&self, method: &str) -> String {
        format!("{}/{method}", self.base)
    }
}

impl Service for BlueskyService {
    fn create_session(&self, identifier: &str, password: &str) -> HTTPResult<String> {
        let body = SessionRequest {
            identifier,
            password,
        };
        self.client.post(&self.uri(CREATE_SESSION), &[], &body)
    }

    fn get_resource(
        &self,
        method: &str,
        token: &str,
        query: &[(&str, String)],
    ) -> HTTPResult<String> {
        self.client.get(&self.uri(method), Some(token), query)
    }
}
