// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! OpenAI chat completions API.
//!
//! # Access
//!
//! You will need to set up an [OpenAI API account](https://platform.openai.com/docs/overview)
//! and generate your own authentication key to use OpenAI's API. Your key should be stored
//! under the `$OPENAI_API_KEY` environment variable or under `openai_api_key` in the config
//! file.
//!
//! **Note that you are solely responsible for paying the costs of OpenAI API access.**
//! Models are billed on a per-token basis; the default model, gpt-4o-mini, is one of the
//! least expensive. See OpenAI's [pricing](https://platform.openai.com/docs/pricing) docs.

use crate::ai::client::Backend;
use crate::ai::{Auth, CompletionRequest};
use crate::http::Header;
use serde::{Deserialize, Serialize};

/// Request and response formats for OpenAI.
#[derive(Debug)]
pub struct OpenAI;

/// A body for an OpenAI chat completions request.
#[derive(Debug, Deserialize, Serialize)]
pub struct OpenAIRequest {
    model: String,
    messages: Vec<Message>,
    max_tokens: u32,
    temperature: f64,
}

/// A single message in a chat.
#[derive(Debug, Deserialize, Serialize)]
pub struct Message {
    role: String,
    content: String,
}

impl Message {
    fn new(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: content.to_string(),
        }
    }
}

/// The envelope returned by the chat completions API.
#[derive(Debug, Deserialize)]
pub struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

/// One of the completions generated by OpenAI.
#[derive(Debug, Deserialize)]
pub struct Choice {
    message: ResponseMessage,
}

/// The message attached to a [`Choice`].
///
/// `content` is null when the model refuses or calls a tool.
#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    content: Option<String>,
}

impl Backend for OpenAI {
    type Request = OpenAIRequest;
    type Response = OpenAIResponse;

    fn request(model: &str, request: &CompletionRequest) -> OpenAIRequest {
        let mut messages = Vec::with_capacity(2);
        if !request.system_prompt().is_empty() {
            messages.push(Message::new("system", request.system_prompt()));
        }
        messages.push(Message::new("user", request.user_content()));

        OpenAIRequest {
            model: model.to_string(),
            messages,
            max_tokens: request.max_tokens(),
            temperature: CompletionRequest::TEMPERATURE,
        }
    }

    fn headers(auth: Option<&Auth>) -> Vec<Header> {
        auth.map(Auth::bearer_header).into_iter().collect()
    }

    fn text(response: OpenAIResponse) -> Option<String> {
        response.choices.into_iter().next()?.message.content
    }
}
