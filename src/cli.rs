// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Drives the command-line program.

use crate::ai::ProviderAdapter;
use crate::bsky::Client;
use crate::bsky::client::{DEFAULT_MAX_RESULTS, DEFAULT_POST_LIMIT, MAX_POST_LIMIT};
use crate::conf::Settings;
use crate::shell::{Shell, TerminalPrompter};
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use log::info;
use std::{io, process};

const AFTER_HELP: &str = "\
Credentials are read from BSKY_IDENTIFIER and BSKY_PASSWORD, or from
~/.config/bluesky-cli/config.json. Set AI_PROVIDER to openai (the default),
anthropic, or ollama to choose who performs summaries and vibe checks.

Direct subcommands such as `bsky profile <handle>` and
`bsky followers <handle> --export <file>` are planned. Until then, every
action is available from the interactive menu.";

/// Prints `message` to stderr and exits with `error_code`.
pub fn die(error_code: i32, message: &str) -> ! {
    eprintln!("{}", message);
    process::exit(error_code);
}

/// Program configuration.
#[derive(Debug, Parser)]
#[command(version)]
#[command(about = "Look up Bluesky accounts and ask an AI what their vibe is", long_about = None)]
#[command(after_help = AFTER_HELP)]
pub struct Config {
    #[command(flatten)]
    verbosity: Verbosity<WarnLevel>,

    /// Number of recent posts to fetch
    #[arg(
        short = 'n',
        long,
        default_value_t = DEFAULT_POST_LIMIT,
        value_parser = clap::value_parser!(u8).range(1..=MAX_POST_LIMIT as i64),
    )]
    limit: u8,

    /// Most accounts to list when viewing followers (0 for no limit)
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_RESULTS)]
    max_results: usize,
}

impl Config {
    /// How much logging the user asked for.
    pub fn verbosity(&self) -> Verbosity<WarnLevel> {
        self.verbosity
    }

    /// Number of recent posts to fetch.
    pub fn limit(&self) -> u8 {
        self.limit
    }

    /// Most accounts to list when viewing followers.
    pub fn max_results(&self) -> usize {
        self.max_results
    }
}

/// Runs the command-line program using the given `config`.
///
/// Missing credentials and failed logins end the program with exit code 1.
pub fn run(config: Config) {
    env_logger::Builder::new()
        .filter_level(config.verbosity().log_level_filter())
        .init();

    let settings = Settings::load().unwrap_or_else(|err| die(1, &err.to_string()));
    let client = Client::login(settings.credentials())
        .unwrap_or_else(|err| die(1, &format!("Could not log in to Bluesky: {err}")));

    let adapter = ProviderAdapter::new(settings.provider(), settings.ai_auth().cloned());
    let provider = adapter.config();
    info!("AI provider is {} ({})", provider.name(), provider.model());

    println!(
        "Logged in as @{}. Using {} ({}) for AI features.\n",
        client.session().handle(),
        provider.name(),
        provider.model()
    );

    let shell = Shell::new(client, adapter)
        .limit(config.limit())
        .max_results(config.max_results());
    if let Err(err) = shell.run(&mut TerminalPrompter::default(), &mut io::stdout()) {
        die(1, &err.to_string());
    }
}
