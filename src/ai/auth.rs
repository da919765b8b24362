// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Authentication for AI services.

use crate::http::Header;
use std::fmt;

/// Manages authentication keys for AI service APIs.
#[derive(Clone)]
pub struct Auth {
    api_key: String,
}

impl Auth {
    /// Creates a new `Auth` structure using the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        Self { api_key }
    }

    /// The actual API key.
    ///
    /// # Examples
    ///
    /// ```
    /// use bluesky_cli::ai::Auth;
    /// let auth = Auth::new("ThisIsMyApiKey");
    /// assert_eq!(auth.api_key(), "ThisIsMyApiKey");
    /// ```
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The key as an `Authorization: Bearer` header, as OpenAI expects.
    pub fn bearer_header(&self) -> Header {
        ("Authorization", format!("Bearer {}", self.api_key))
    }

    /// The key as an `x-api-key` header, as Anthropic expects.
    pub fn api_key_header(&self) -> Header {
        ("x-api-key", self.api_key.clone())
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auth").field("api_key", &"<redacted>").finish()
    }
}
