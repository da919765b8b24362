// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! bsky is a command-line client for Bluesky. It logs in with an app
//! password, then lets you look up an account's profile, recent posts,
//! followers, and follows from an interactive menu. Follower listings can be
//! exported to CSV.
//!
//! It can also hand an account's recent posts to an AI model for a short
//! summary or a "vibe check": a read on the account's tone, interests, and
//! communication style.
//!
//! # Examples
//!
//! Start the menu:
//!
//! ```bash
//! bsky
//! ```
//!
//! Fetch only the 20 most recent posts for summaries and vibe checks:
//!
//! ```bash
//! bsky --limit 20
//! ```
//!
//! List every follower instead of stopping at the first 100:
//!
//! ```bash
//! bsky --max-results 0
//! ```
//!
//! Get usage and help for the tool:
//!
//! ```bash
//! bsky --help
//! ```
//!
//! # Bluesky Setup
//!
//! Create an [app password] and store it, along with your handle, in
//! `$BSKY_IDENTIFIER` and `$BSKY_PASSWORD`:
//!
//! ```bash
//! $ export BSKY_IDENTIFIER='alice.bsky.social'
//! $ export BSKY_PASSWORD='abcd-efgh-ijkl-mnop'
//! ```
//!
//! The same values can go in `~/.config/bluesky-cli/config.json` instead;
//! see the [`conf`] module.
//!
//! # AI Setup
//!
//! Summaries and vibe checks are performed by one of three providers,
//! chosen with `$AI_PROVIDER`:
//!
//! - `openai` (the default) needs `$OPENAI_API_KEY`.
//! - `anthropic` needs `$ANTHROPIC_API_KEY`.
//! - `ollama` needs a local [Ollama] server with the `llama3.2` model pulled.
//!
//! **You are solely responsible for the cost of your use of the OpenAI and
//! Anthropic APIs!** See the [provider table] for the models used.
//!
//! # License
//!
//! bsky is licensed under the terms of the [Apache License 2.0]. Please
//! see the LICENSE file accompanying this source code or visit the previous
//! link for more information on licensing.
//!
//! [Apache License 2.0]: https://www.apache.org/licenses/LICENSE-2.0
//! [app password]: https://bsky.app/settings/app-passwords
//! [Ollama]: https://ollama.com/
//! [provider table]: crate::ai::provider

pub mod ai;
pub mod bsky;
pub mod cli;
pub mod conf;
pub mod export;
pub mod http;
pub mod shell;
pub mod summary;
pub mod view;

#[cfg(test)]
mod test_utils;
