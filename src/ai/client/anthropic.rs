// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Anthropic messages API.
//!
//! Requires an API key in `$ANTHROPIC_API_KEY` (or `anthropic_api_key` in the
//! config file). Usage is billed per token by Anthropic.

use crate::ai::client::Backend;
use crate::ai::{Auth, CompletionRequest};
use crate::http::Header;
use serde::{Deserialize, Serialize};

/// Version of the messages API this client speaks.
pub const API_VERSION: &str = "2023-06-01";

/// Request and response formats for Anthropic.
#[derive(Debug)]
pub struct Anthropic;

/// A body for an Anthropic messages request.
#[derive(Debug, Serialize)]
pub struct AnthropicRequest {
    model: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,

    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f64,
}

/// A single message in a conversation.
#[derive(Debug, Serialize)]
pub struct Message {
    role: &'static str,
    content: String,
}

/// The envelope returned by the messages API.
#[derive(Debug, Deserialize)]
pub struct AnthropicResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

/// A block of generated content. Only text blocks are of interest.
#[derive(Debug, Deserialize)]
pub struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

impl Backend for Anthropic {
    type Request = AnthropicRequest;
    type Response = AnthropicResponse;

    fn request(model: &str, request: &CompletionRequest) -> AnthropicRequest {
        let system = Some(request.system_prompt())
            .filter(|s| !s.is_empty())
            .map(String::from);
        let messages = vec![Message {
            role: "user",
            content: request.user_content().to_string(),
        }];

        AnthropicRequest {
            model: model.to_string(),
            system,
            messages,
            max_tokens: request.max_tokens(),
            temperature: CompletionRequest::TEMPERATURE,
        }
    }

    fn headers(auth: Option<&Auth>) -> Vec<Header> {
        let mut headers: Vec<Header> = auth.map(Auth::api_key_header).into_iter().collect();
        headers.push(("anthropic-version", API_VERSION.to_string()));
        headers
    }

    fn text(response: AnthropicResponse) -> Option<String> {
        response.content.into_iter().find_map(|block| block.text)
    }
}
