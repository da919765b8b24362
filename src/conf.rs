// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Environment and configuration utilities.
//!
//! Settings can come from the environment or from a JSON config file at
//! `~/.config/bluesky-cli/config.json`. Sources are consulted in the order
//! given by [`PRECEDENCE`], so an environment variable always wins over the
//! same key in the config file. For example, this config file supplies
//! Bluesky credentials and selects Ollama as the AI provider:
//!
//! ```json
//! {
//!   "bsky_identifier": "alice.bsky.social",
//!   "bsky_password": "abcd-efgh-ijkl-mnop",
//!   "ai_provider": "ollama"
//! }
//! ```
//!
//! All settings are resolved exactly once, when the program starts, into a
//! [`Settings`] value that is handed to whatever needs it.

use crate::ai::Auth;
use crate::ai::provider::ProviderConfig;
use log::{debug, warn};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::{env, fs, io};
use thiserror::Error;

/// Name of the application, used to locate its configuration directory.
pub const APP_NAME: &str = "bluesky-cli";

/// Places a setting can be read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    /// The process environment.
    Environment,

    /// The user's JSON config file.
    ConfigFile,
}

/// The order in which sources are consulted. The first source with a
/// non-empty value for a setting wins.
pub const PRECEDENCE: [Source; 2] = [Source::Environment, Source::ConfigFile];

/// A single configurable value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Setting {
    /// Bluesky handle or email used to log in.
    BskyIdentifier,

    /// Bluesky app password.
    BskyPassword,

    /// API key for OpenAI.
    OpenAIKey,

    /// API key for Anthropic.
    AnthropicKey,

    /// Name of the AI provider to use.
    AIProvider,
}

impl Setting {
    /// Name of the environment variable holding this setting.
    pub fn env_var(&self) -> &'static str {
        match self {
            Setting::BskyIdentifier => "BSKY_IDENTIFIER",
            Setting::BskyPassword => "BSKY_PASSWORD",
            Setting::OpenAIKey => "OPENAI_API_KEY",
            Setting::AnthropicKey => "ANTHROPIC_API_KEY",
            Setting::AIProvider => "AI_PROVIDER",
        }
    }

    /// Key of this setting in the config file.
    pub fn file_key(&self) -> &'static str {
        match self {
            Setting::BskyIdentifier => "bsky_identifier",
            Setting::BskyPassword => "bsky_password",
            Setting::OpenAIKey => "openai_api_key",
            Setting::AnthropicKey => "anthropic_api_key",
            Setting::AIProvider => "ai_provider",
        }
    }
}

/// Returns the location of the user's config file.
///
/// Returns `None` if the user's home directory cannot be determined.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join(APP_NAME).join("config.json"))
}

/// The contents of a JSON config file.
#[derive(Debug, Default)]
pub struct ConfigFile {
    values: Map<String, Value>,
}

impl ConfigFile {
    /// Loads a config file from `path`.
    ///
    /// A missing file is treated as an empty config. So is a file that is
    /// not a JSON object, although a warning is logged in that case. Any
    /// other I/O error is returned.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("no config file at {}", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                let path = path.to_path_buf();
                return Err(Error::Read { path, source });
            }
        };
        Ok(Self::parse(&data).unwrap_or_else(|| {
            warn!("ignoring {}: not a JSON object", path.display());
            Self::default()
        }))
    }

    /// Parses the text of a config file, returning `None` if it is not a
    /// JSON object.
    pub fn parse(data: &str) -> Option<Self> {
        match serde_json::from_str(data) {
            Ok(Value::Object(values)) => Some(Self { values }),
            _ => None,
        }
    }

    /// The string value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }
}

/// Looks up settings by walking the sources in [`PRECEDENCE`] order.
#[derive(Debug, Default)]
pub struct Resolver {
    file: ConfigFile,
}

impl Resolver {
    /// Creates a resolver backed by the environment and the given config file.
    pub fn new(file: ConfigFile) -> Self {
        Self { file }
    }

    /// Resolves `setting`, returning the first non-empty value found.
    pub fn resolve(&self, setting: Setting) -> Option<String> {
        PRECEDENCE
            .iter()
            .find_map(|source| self.lookup(*source, setting))
    }

    fn lookup(&self, source: Source, setting: Setting) -> Option<String> {
        let value = match source {
            Source::Environment => env::var(setting.env_var()).ok(),
            Source::ConfigFile => self.file.get(setting.file_key()).map(String::from),
        };
        value.filter(|v| !v.trim().is_empty())
    }
}

/// Credentials used to log in to Bluesky.
#[derive(Clone)]
pub struct Credentials {
    identifier: String,
    password: String,
}

impl Credentials {
    /// Creates a new set of credentials.
    pub fn new(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        let identifier = identifier.into();
        let password = password.into();
        Self {
            identifier,
            password,
        }
    }

    /// The handle or email address of the account.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The account's app password.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Program settings, resolved once at startup.
#[derive(Debug)]
pub struct Settings {
    credentials: Credentials,
    provider: &'static ProviderConfig,
    ai_auth: Option<Auth>,
}

impl Settings {
    /// Resolves settings from the environment and the user's config file.
    pub fn load() -> Result<Self, Error> {
        let file = match config_path() {
            Some(path) => ConfigFile::load(&path)?,
            None => ConfigFile::default(),
        };
        Self::resolve(&Resolver::new(file))
    }

    /// Resolves settings using `resolver`.
    ///
    /// Fails if Bluesky credentials cannot be found. A missing AI provider
    /// key is not an error here: it is only reported when AI is actually
    /// used.
    pub fn resolve(resolver: &Resolver) -> Result<Self, Error> {
        let identifier = resolver.resolve(Setting::BskyIdentifier);
        let password = resolver.resolve(Setting::BskyPassword);
        let credentials = match (identifier, password) {
            (Some(identifier), Some(password)) => Credentials::new(identifier, password),
            _ => return Err(Error::MissingCredentials),
        };

        let provider = ProviderConfig::select(resolver.resolve(Setting::AIProvider).as_deref());
        let ai_auth = provider
            .key()
            .and_then(|setting| resolver.resolve(setting))
            .map(Auth::new);
        debug!(
            "using AI provider {} (key {})",
            provider.name(),
            if ai_auth.is_some() { "found" } else { "not found" }
        );

        Ok(Self {
            credentials,
            provider,
            ai_auth,
        })
    }

    /// Bluesky login credentials.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The active AI provider.
    pub fn provider(&self) -> &'static ProviderConfig {
        self.provider
    }

    /// The active AI provider's API key, if one was found.
    pub fn ai_auth(&self) -> Option<&Auth> {
        self.ai_auth.as_ref()
    }
}

/// A configuration error.
#[derive(Debug, Error)]
pub enum Error {
    /// Bluesky credentials could not be found in any source.
    #[error(
        "Bluesky credentials not found. Set BSKY_IDENTIFIER and BSKY_PASSWORD in the environment or in ~/.config/{APP_NAME}/config.json."
    )]
    MissingCredentials,

    /// The config file exists but could not be read.
    #[error("Could not read {}: {source}", .path.display())]
    Read {
        /// Location of the config file.
        path: PathBuf,

        /// The underlying I/O error.
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    mod config_file {
        use super::super::*;
        use std::io::Write;

        #[test]
        fn it_reads_string_values() {
            let file = ConfigFile::parse(r#"{"bsky_identifier": "alice.bsky.social"}"#).unwrap();
            assert_eq!(file.get("bsky_identifier"), Some("alice.bsky.social"));
            assert_eq!(file.get("bsky_password"), None);
        }

        #[test]
        fn it_ignores_values_that_are_not_strings() {
            let file = ConfigFile::parse(r#"{"bsky_identifier": 42}"#).unwrap();
            assert_eq!(file.get("bsky_identifier"), None);
        }

        #[test]
        fn it_rejects_json_that_is_not_an_object() {
            assert!(ConfigFile::parse("[1, 2, 3]").is_none());
            assert!(ConfigFile::parse("not json").is_none());
        }

        #[test]
        fn it_treats_a_missing_file_as_empty() {
            let dir = tempfile::tempdir().unwrap();
            let file = ConfigFile::load(&dir.path().join("config.json")).unwrap();
            assert_eq!(file.get("bsky_identifier"), None);
        }

        #[test]
        fn it_treats_a_malformed_file_as_empty() {
            let mut tmp = tempfile::NamedTempFile::new().unwrap();
            write!(tmp, "{{ this is not json").unwrap();
            let file = ConfigFile::load(tmp.path()).unwrap();
            assert_eq!(file.get("bsky_identifier"), None);
        }

        #[test]
        fn it_loads_a_file_from_disk() {
            let mut tmp = tempfile::NamedTempFile::new().unwrap();
            write!(tmp, r#"{{"bsky_password": "app-password"}}"#).unwrap();
            let file = ConfigFile::load(tmp.path()).unwrap();
            assert_eq!(file.get("bsky_password"), Some("app-password"));
        }
    }

    mod resolver {
        use super::super::*;
        use temp_env::{with_var, with_var_unset};

        fn resolver() -> Resolver {
            let file = ConfigFile::parse(r#"{"bsky_identifier": "from-file.bsky.social"}"#).unwrap();
            Resolver::new(file)
        }

        #[test]
        fn it_consults_the_environment_first() {
            assert_eq!(PRECEDENCE[0], Source::Environment);
            assert_eq!(PRECEDENCE[1], Source::ConfigFile);
        }

        #[test]
        fn it_prefers_the_environment_over_the_config_file() {
            with_var("BSKY_IDENTIFIER", Some("from-env.bsky.social"), || {
                let value = resolver().resolve(Setting::BskyIdentifier);
                assert_eq!(value.as_deref(), Some("from-env.bsky.social"));
            })
        }

        #[test]
        fn it_falls_back_to_the_config_file() {
            with_var_unset("BSKY_IDENTIFIER", || {
                let value = resolver().resolve(Setting::BskyIdentifier);
                assert_eq!(value.as_deref(), Some("from-file.bsky.social"));
            })
        }

        #[test]
        fn it_treats_empty_environment_variables_as_absent() {
            with_var("BSKY_IDENTIFIER", Some(""), || {
                let value = resolver().resolve(Setting::BskyIdentifier);
                assert_eq!(value.as_deref(), Some("from-file.bsky.social"));
            })
        }

        #[test]
        fn it_returns_none_when_no_source_has_a_value() {
            with_var_unset("BSKY_PASSWORD", || {
                assert!(resolver().resolve(Setting::BskyPassword).is_none());
            })
        }
    }

    mod settings {
        use super::super::*;
        use crate::ai::provider::ProviderName;
        use temp_env::with_vars;

        const ALL_VARS: [&str; 5] = [
            "BSKY_IDENTIFIER",
            "BSKY_PASSWORD",
            "OPENAI_API_KEY",
            "ANTHROPIC_API_KEY",
            "AI_PROVIDER",
        ];

        fn with_env<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
            let vars = ALL_VARS.iter().map(|name| {
                let value = vars.iter().find(|(k, _)| k == name).map(|(_, v)| *v);
                (*name, value)
            });
            with_vars(vars.collect::<Vec<_>>(), f)
        }

        #[test]
        fn it_requires_bluesky_credentials() {
            with_env(&[("BSKY_IDENTIFIER", "alice.bsky.social")], || {
                let settings = Settings::resolve(&Resolver::default());
                assert!(matches!(settings, Err(Error::MissingCredentials)));
            })
        }

        #[test]
        fn it_explains_how_to_supply_missing_credentials() {
            let message = Error::MissingCredentials.to_string();
            assert!(message.contains("BSKY_IDENTIFIER"));
            assert!(message.contains("BSKY_PASSWORD"));
        }

        #[test]
        fn it_resolves_credentials() {
            with_env(
                &[("BSKY_IDENTIFIER", "alice.bsky.social"), ("BSKY_PASSWORD", "secret")],
                || {
                    let settings = Settings::resolve(&Resolver::default()).unwrap();
                    assert_eq!(settings.credentials().identifier(), "alice.bsky.social");
                    assert_eq!(settings.credentials().password(), "secret");
                },
            )
        }

        #[test]
        fn it_does_not_leak_the_password_in_debug_output() {
            let credentials = Credentials::new("alice.bsky.social", "secret");
            assert!(!format!("{credentials:?}").contains("secret"));
        }

        #[test]
        fn it_defaults_to_openai() {
            with_env(
                &[("BSKY_IDENTIFIER", "alice"), ("BSKY_PASSWORD", "secret")],
                || {
                    let settings = Settings::resolve(&Resolver::default()).unwrap();
                    assert_eq!(settings.provider().name(), ProviderName::OpenAI);
                    assert!(settings.ai_auth().is_none());
                },
            )
        }

        #[test]
        fn it_falls_back_to_openai_for_unknown_providers() {
            with_env(
                &[
                    ("BSKY_IDENTIFIER", "alice"),
                    ("BSKY_PASSWORD", "secret"),
                    ("AI_PROVIDER", "gemini"),
                    ("OPENAI_API_KEY", "openai-key"),
                ],
                || {
                    let settings = Settings::resolve(&Resolver::default()).unwrap();
                    assert_eq!(settings.provider().name(), ProviderName::OpenAI);
                    assert_eq!(settings.ai_auth().unwrap().api_key(), "openai-key");
                },
            )
        }

        #[test]
        fn it_finds_the_key_for_the_selected_provider() {
            with_env(
                &[
                    ("BSKY_IDENTIFIER", "alice"),
                    ("BSKY_PASSWORD", "secret"),
                    ("AI_PROVIDER", "anthropic"),
                    ("OPENAI_API_KEY", "openai-key"),
                    ("ANTHROPIC_API_KEY", "anthropic-key"),
                ],
                || {
                    let settings = Settings::resolve(&Resolver::default()).unwrap();
                    assert_eq!(settings.provider().name(), ProviderName::Anthropic);
                    assert_eq!(settings.ai_auth().unwrap().api_key(), "anthropic-key");
                },
            )
        }

        #[test]
        fn it_never_needs_a_key_for_ollama() {
            with_env(
                &[
                    ("BSKY_IDENTIFIER", "alice"),
                    ("BSKY_PASSWORD", "secret"),
                    ("AI_PROVIDER", "ollama"),
                    ("OPENAI_API_KEY", "openai-key"),
                ],
                || {
                    let settings = Settings::resolve(&Resolver::default()).unwrap();
                    assert_eq!(settings.provider().name(), ProviderName::Ollama);
                    assert!(settings.ai_auth().is_none());
                },
            )
        }
    }
}
