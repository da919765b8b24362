// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! API clients for various AI services.
//!
//! Each provider module knows how to build that provider's request body and
//! how to pull the completion text back out of its response. The
//! [`ProviderAdapter`] picks the right module for the active provider and
//! takes care of credentials and error handling.

pub mod anthropic;
pub mod ollama;
pub mod openai;

use crate::ai::provider::{ProviderConfig, ProviderName};
use crate::ai::{Auth, Completion, CompletionRequest, CompletionResult, Error};
use crate::http::{HTTPClient, HTTPError, HTTPPost, Header};
use log::{debug, info};
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Something that can turn a [`CompletionRequest`] into a completion.
pub trait Complete {
    /// Sends the request and returns the generated text.
    fn call(&self, request: &CompletionRequest) -> CompletionResult;
}

/// The request and response formats of a single provider.
pub trait Backend {
    /// Body sent to the provider.
    type Request: Serialize;

    /// Envelope returned by the provider.
    type Response: DeserializeOwned;

    /// Builds a provider-specific request body.
    fn request(model: &str, request: &CompletionRequest) -> Self::Request;

    /// Extra headers needed to authenticate the request.
    fn headers(auth: Option<&Auth>) -> Vec<Header>;

    /// The completion text in the response, if there is any.
    fn text(response: Self::Response) -> Option<String>;
}

/// Dispatches completion requests to the active provider.
///
/// The adapter makes exactly one HTTP request per call and never retries or
/// falls back to another provider.
#[derive(Debug)]
pub struct ProviderAdapter<P: HTTPPost = HTTPClient> {
    config: &'static ProviderConfig,
    endpoint: String,
    auth: Option<Auth>,
    service: P,
}

impl ProviderAdapter<HTTPClient> {
    /// Creates an adapter for `config` that talks to the provider over HTTP.
    pub fn new(config: &'static ProviderConfig, auth: Option<Auth>) -> Self {
        Self::new_with_service(config, auth, HTTPClient::default())
    }
}

impl<P: HTTPPost> ProviderAdapter<P> {
    /// Creates an adapter for `config` that sends requests through `service`.
    pub fn new_with_service(config: &'static ProviderConfig, auth: Option<Auth>, service: P) -> Self {
        let endpoint = config.endpoint().to_string();
        Self {
            config,
            endpoint,
            auth,
            service,
        }
    }

    /// Sends requests to `endpoint` instead of the provider's usual URL.
    pub fn endpoint(self, endpoint: impl Into<String>) -> Self {
        let endpoint = endpoint.into();
        Self { endpoint, ..self }
    }

    /// The active provider.
    pub fn config(&self) -> &'static ProviderConfig {
        self.config
    }

    /// The underlying HTTP service.
    pub fn service(&self) -> &P {
        &self.service
    }

    fn provider(&self) -> ProviderName {
        self.config.name()
    }

    /// Returns the API key, or an error if the provider needs one that was
    /// never configured.
    fn credential(&self) -> Result<Option<&Auth>, Error> {
        match (self.config.key(), &self.auth) {
            (Some(setting), None) => Err(Error::MissingCredential {
                provider: self.provider(),
                var: setting.env_var(),
            }),
            (_, auth) => Ok(auth.as_ref()),
        }
    }

    fn send<B: Backend>(&self, request: &CompletionRequest) -> CompletionResult {
        let auth = self.credential()?;
        let body = B::request(self.config.model(), request);
        let headers = B::headers(auth);

        info!(
            "requesting completion from {} ({})",
            self.provider(),
            self.config.model()
        );
        let raw = self
            .service
            .post(&self.endpoint, &headers, &body)
            .map_err(|err| self.classify(err))?;
        debug!("{} responded with {} bytes", self.provider(), raw.len());

        self.extract::<B>(&raw)
    }

    fn extract<B: Backend>(&self, raw: &str) -> CompletionResult {
        let shape_error = || Error::UnexpectedResponseShape {
            provider: self.provider(),
        };
        let response: B::Response = serde_json::from_str(raw).map_err(|err| {
            debug!("could not parse {} response: {err}", self.provider());
            shape_error()
        })?;
        let text = B::text(response).ok_or_else(shape_error)?;
        Ok(Completion::new(&text))
    }

    fn classify(&self, err: HTTPError) -> Error {
        let provider = self.provider();
        match err {
            HTTPError::Unreachable(reason) => {
                debug!("{provider} is unreachable: {reason}");
                Error::ProviderUnreachable {
                    provider,
                    endpoint: self.endpoint.clone(),
                }
            }
            HTTPError::Http(StatusCode::TOO_MANY_REQUESTS) => Error::RateLimited { provider },
            HTTPError::Http(status) => Error::ProviderStatus { provider, status },
            HTTPError::Body(_)
            | HTTPError::MissingContentType
            | HTTPError::InvalidContentType(_)
            | HTTPError::UnexpectedContentType(_) => Error::UnexpectedResponseShape { provider },
            source => Error::Network { provider, source },
        }
    }
}

impl<P: HTTPPost> Complete for ProviderAdapter<P> {
    fn call(&self, request: &CompletionRequest) -> CompletionResult {
        match self.provider() {
            ProviderName::OpenAI => self.send::<openai::OpenAI>(request),
            ProviderName::Anthropic => self.send::<anthropic::Anthropic>(request),
            ProviderName::Ollama => self.send::<ollama::Ollama>(request),
        }
    }
}
