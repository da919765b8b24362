// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Ollama generate API.
//!
//! Ollama runs models locally and needs no API key, but it does need to be
//! running: start it with `ollama serve` and pull the model with
//! `ollama pull llama3.2` before using it.

use crate::ai::client::Backend;
use crate::ai::{Auth, CompletionRequest};
use crate::http::Header;
use serde::{Deserialize, Serialize};

/// Request and response formats for Ollama.
#[derive(Debug)]
pub struct Ollama;

/// A body for an Ollama `/api/generate` request.
#[derive(Debug, Serialize)]
pub struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: Options,
}

/// Generation options.
#[derive(Debug, Serialize)]
pub struct Options {
    temperature: f64,
    num_predict: u32,
}

/// The response to a non-streaming generate request.
#[derive(Debug, Deserialize)]
pub struct OllamaResponse {
    response: Option<String>,
}

impl Backend for Ollama {
    type Request = OllamaRequest;
    type Response = OllamaResponse;

    fn request(model: &str, request: &CompletionRequest) -> OllamaRequest {
        let prompt = if request.system_prompt().is_empty() {
            request.user_content().to_string()
        } else {
            format!("{}\n\n{}", request.system_prompt(), request.user_content())
        };

        OllamaRequest {
            model: model.to_string(),
            prompt,
            stream: false,
            options: Options {
                temperature: CompletionRequest::TEMPERATURE,
                num_predict: request.max_tokens(),
            },
        }
    }

    fn headers(_auth: Option<&Auth>) -> Vec<Header> {
        vec![]
    }

    fn text(response: OllamaResponse) -> Option<String> {
        response.response
    }
}
