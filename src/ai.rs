// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! AI services.
//!
//! Three interchangeable providers are supported: OpenAI, Anthropic, and a
//! local Ollama server. The active provider is chosen once at startup (see
//! [`ProviderConfig::select`]) and every completion goes through a
//! [`ProviderAdapter`], which hides each provider's request and response
//! format behind [`Complete::call`].

pub mod auth;
pub mod client;
pub mod provider;

pub use auth::Auth;
pub use client::{Complete, ProviderAdapter};
pub use provider::{ProviderConfig, ProviderName};

use reqwest::StatusCode;
use std::num::NonZeroU32;
use thiserror::Error;

/// A request for a text completion, independent of any provider.
///
/// Requests are immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct CompletionRequest {
    system_prompt: String,
    user_content: String,
    max_tokens: NonZeroU32,
}

impl CompletionRequest {
    /// Default upper bound on the length of a completion, in tokens.
    pub const DEFAULT_MAX_TOKENS: NonZeroU32 = NonZeroU32::new(1024).unwrap();

    /// Sampling temperature sent to every provider.
    pub const TEMPERATURE: f64 = 0.3;

    /// Creates a new request from instructions and the content they apply to.
    ///
    /// Returns [`Error::EmptyInput`] if `user_content` is blank.
    pub fn new(
        system_prompt: impl Into<String>,
        user_content: impl Into<String>,
    ) -> Result<Self, Error> {
        let user_content = user_content.into();
        if user_content.trim().is_empty() {
            return Err(Error::EmptyInput);
        }
        Ok(Self {
            system_prompt: system_prompt.into(),
            user_content,
            max_tokens: Self::DEFAULT_MAX_TOKENS,
        })
    }

    /// Returns a copy of this request with a different token limit.
    pub fn with_max_tokens(self, max_tokens: NonZeroU32) -> Self {
        Self { max_tokens, ..self }
    }

    /// Instructions describing how the model should respond.
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// The text the model should respond to.
    pub fn user_content(&self) -> &str {
        &self.user_content
    }

    /// Upper bound on the length of the completion, in tokens.
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens.get()
    }
}

/// Text generated by a provider.
#[derive(Clone, Debug, PartialEq)]
pub struct Completion {
    text: String,
}

impl Completion {
    /// Wraps generated text, trimming surrounding whitespace.
    pub fn new(text: &str) -> Self {
        let text = text.trim().to_string();
        Self { text }
    }

    /// The generated text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// The outcome of a single completion call.
pub type CompletionResult = Result<Completion, Error>;

/// An AI error.
#[derive(Debug, Error)]
pub enum Error {
    /// The provider needs an API key but none was configured.
    #[error("{provider} needs an API key. Set ${var} and try again.")]
    MissingCredential {
        /// The selected provider.
        provider: ProviderName,

        /// The environment variable that should hold the key.
        var: &'static str,
    },

    /// The provider's endpoint refused the connection or timed out.
    #[error("Could not reach {provider} at {endpoint}. Is the service running?")]
    ProviderUnreachable {
        /// The selected provider.
        provider: ProviderName,

        /// The endpoint that could not be reached.
        endpoint: String,
    },

    /// The provider answered, but not with the expected completion field.
    #[error("{provider} returned a response without any completion text")]
    UnexpectedResponseShape {
        /// The selected provider.
        provider: ProviderName,
    },

    /// The provider is rate limiting requests.
    #[error("{provider} is rate limiting requests. Wait a minute and try again.")]
    RateLimited {
        /// The selected provider.
        provider: ProviderName,
    },

    /// The provider answered with an unsuccessful HTTP status.
    #[error("{provider} returned HTTP {status}")]
    ProviderStatus {
        /// The selected provider.
        provider: ProviderName,

        /// The HTTP status returned.
        status: StatusCode,
    },

    /// Any other failure while talking to the provider.
    #[error("Network error while talking to {provider}: {source}")]
    Network {
        /// The selected provider.
        provider: ProviderName,

        /// The underlying HTTP error.
        source: crate::http::HTTPError,
    },

    /// There was nothing to send to the provider.
    #[error("There is no text to analyze")]
    EmptyInput,
}
