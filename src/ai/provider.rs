// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! The fixed table of supported AI providers.
//!
//! | Provider  | Model                   | Endpoint                                     | Key                  |
//! |-----------|-------------------------|----------------------------------------------|----------------------|
//! | openai    | gpt-4o-mini             | https://api.openai.com/v1/chat/completions   | `$OPENAI_API_KEY`    |
//! | anthropic | claude-3-haiku-20240307 | https://api.anthropic.com/v1/messages        | `$ANTHROPIC_API_KEY` |
//! | ollama    | llama3.2                | http://localhost:11434/api/generate          | none                 |
//!
//! **You are solely responsible for the cost of your use of the OpenAI and
//! Anthropic APIs.** Ollama runs locally and costs nothing but electricity.

use crate::conf::Setting;
use log::warn;
use std::fmt;

/// Names of the supported providers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProviderName {
    /// OpenAI's chat completions API.
    #[default]
    OpenAI,

    /// Anthropic's messages API.
    Anthropic,

    /// A local Ollama server.
    Ollama,
}

impl ProviderName {
    /// Parses a provider name, ignoring case and surrounding whitespace.
    ///
    /// Returns `None` if the name is not recognized.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "openai" => Some(ProviderName::OpenAI),
            "anthropic" => Some(ProviderName::Anthropic),
            "ollama" => Some(ProviderName::Ollama),
            _ => None,
        }
    }

    /// The provider's identifier, as used in `$AI_PROVIDER`.
    pub fn id(&self) -> &'static str {
        match self {
            ProviderName::OpenAI => "openai",
            ProviderName::Anthropic => "anthropic",
            ProviderName::Ollama => "ollama",
        }
    }
}

impl fmt::Display for ProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderName::OpenAI => "OpenAI",
            ProviderName::Anthropic => "Anthropic",
            ProviderName::Ollama => "Ollama",
        };
        f.write_str(name)
    }
}

/// Static configuration for one provider.
#[derive(Debug, PartialEq)]
pub struct ProviderConfig {
    name: ProviderName,
    model: &'static str,
    endpoint: &'static str,
    key: Option<Setting>,
}

/// Every supported provider.
pub static PROVIDERS: [ProviderConfig; 3] = [
    ProviderConfig {
        name: ProviderName::OpenAI,
        model: "gpt-4o-mini",
        endpoint: "https://api.openai.com/v1/chat/completions",
        key: Some(Setting::OpenAIKey),
    },
    ProviderConfig {
        name: ProviderName::Anthropic,
        model: "claude-3-haiku-20240307",
        endpoint: "https://api.anthropic.com/v1/messages",
        key: Some(Setting::AnthropicKey),
    },
    ProviderConfig {
        name: ProviderName::Ollama,
        model: "llama3.2",
        endpoint: "http://localhost:11434/api/generate",
        key: None,
    },
];

impl ProviderConfig {
    /// Looks up the configuration for the named provider.
    pub fn lookup(name: ProviderName) -> &'static ProviderConfig {
        match name {
            ProviderName::OpenAI => &PROVIDERS[0],
            ProviderName::Anthropic => &PROVIDERS[1],
            ProviderName::Ollama => &PROVIDERS[2],
        }
    }

    /// Selects the active provider from a configured value such as the
    /// contents of `$AI_PROVIDER`.
    ///
    /// Unset or unrecognized values select the [default](ProviderName::default)
    /// provider, OpenAI.
    ///
    /// # Examples
    ///
    /// ```
    /// use bluesky_cli::ai::{ProviderConfig, ProviderName};
    /// assert_eq!(ProviderConfig::select(Some("Ollama")).name(), ProviderName::Ollama);
    /// assert_eq!(ProviderConfig::select(Some("gemini")).name(), ProviderName::OpenAI);
    /// assert_eq!(ProviderConfig::select(None).name(), ProviderName::OpenAI);
    /// ```
    pub fn select(value: Option<&str>) -> &'static ProviderConfig {
        let name = match value {
            Some(value) => ProviderName::parse(value).unwrap_or_else(|| {
                warn!("unknown AI provider {value:?}, using {}", ProviderName::default().id());
                ProviderName::default()
            }),
            None => ProviderName::default(),
        };
        Self::lookup(name)
    }

    /// The provider's name.
    pub fn name(&self) -> ProviderName {
        self.name
    }

    /// The model used for completions.
    pub fn model(&self) -> &'static str {
        self.model
    }

    /// The URL completions are requested from.
    pub fn endpoint(&self) -> &'static str {
        self.endpoint
    }

    /// The setting holding this provider's API key, if it needs one.
    pub fn key(&self) -> Option<Setting> {
        self.key
    }

    /// True if the provider cannot be used without an API key.
    pub fn requires_key(&self) -> bool {
        self.key.is_some()
    }
}
