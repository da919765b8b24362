// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! The interactive menu.
//!
//! Each pass through the loop shows the menu, asks for a handle, performs
//! one action, and prints the result. An action that fails prints a
//! one-line error and the menu is shown again; only a broken terminal ends
//! the loop early.

use crate::ai::{self, Complete};
use crate::bsky::client::{DEFAULT_MAX_RESULTS, DEFAULT_POST_LIMIT};
use crate::bsky::service::{BlueskyService, Service};
use crate::bsky::thing::Actor;
use crate::bsky::{self, Client, normalize_handle};
use crate::export;
use crate::summary::{Analysis, Summarizer};
use crate::view::{Report, ViewOptions, Viewable};
use colored::Colorize;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use log::debug;
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;

/// Menu entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Show an account's profile.
    Profile,

    /// List an account's recent posts.
    Posts,

    /// Summarize an account's recent posts.
    Summary,

    /// Describe an account's vibe from its recent posts.
    VibeCheck,

    /// List an account's followers.
    Followers,

    /// List the accounts an account follows.
    Following,

    /// Leave the program.
    Exit,
}

impl Action {
    /// Every action, in menu order.
    pub const MENU: [Action; 7] = [
        Action::Profile,
        Action::Posts,
        Action::Summary,
        Action::VibeCheck,
        Action::Followers,
        Action::Following,
        Action::Exit,
    ];

    /// Text shown in the menu.
    pub fn label(&self) -> &'static str {
        match self {
            Action::Profile => "View user profile",
            Action::Posts => "Get recent posts",
            Action::Summary => "Get post summary",
            Action::VibeCheck => "Perform vibe check",
            Action::Followers => "View followers",
            Action::Following => "View following",
            Action::Exit => "Exit",
        }
    }
}

/// Asks the user questions.
pub trait Prompter {
    /// Asks the user to pick one of `items`, returning its index.
    fn select(&mut self, prompt: &str, items: &[&str]) -> io::Result<usize>;

    /// Asks the user for a line of text.
    fn input(&mut self, prompt: &str, default: Option<&str>) -> io::Result<String>;

    /// Asks the user a yes-or-no question. The default answer is no.
    fn confirm(&mut self, prompt: &str) -> io::Result<bool>;
}

/// Asks questions on the terminal.
#[derive(Default)]
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

fn terminal_error(err: dialoguer::Error) -> io::Error {
    match err {
        dialoguer::Error::IO(err) => err,
    }
}

impl Prompter for TerminalPrompter {
    fn select(&mut self, prompt: &str, items: &[&str]) -> io::Result<usize> {
        let choice = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact()
            .map_err(terminal_error)?;
        Ok(choice)
    }

    fn input(&mut self, prompt: &str, default: Option<&str>) -> io::Result<String> {
        let mut input = Input::<String>::with_theme(&self.theme).with_prompt(prompt);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        input.interact_text().map_err(terminal_error)
    }

    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        let answer = Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(terminal_error)?;
        Ok(answer)
    }
}

/// Runs menu actions against Bluesky and an AI provider.
pub struct Shell<C: Complete, S: Service = BlueskyService> {
    client: Client<S>,
    provider: C,
    opts: ViewOptions,
    limit: u8,
    max_results: usize,
}

impl<C: Complete, S: Service> Shell<C, S> {
    /// Creates a new shell.
    pub fn new(client: Client<S>, provider: C) -> Self {
        Self {
            client,
            provider,
            opts: ViewOptions::default(),
            limit: DEFAULT_POST_LIMIT,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Number of recent posts to fetch.
    pub fn limit(self, limit: u8) -> Self {
        Self { limit, ..self }
    }

    /// Most accounts to fetch for follower listings, or 0 for all of them.
    pub fn max_results(self, max_results: usize) -> Self {
        Self {
            max_results,
            ..self
        }
    }

    /// Options used to render output.
    pub fn view_options(self, opts: ViewOptions) -> Self {
        Self { opts, ..self }
    }

    /// Shows the menu until the user exits.
    ///
    /// Errors from individual actions are written to `out` and the menu is
    /// shown again. Only terminal I/O errors are returned.
    pub fn run(&self, prompter: &mut impl Prompter, out: &mut impl Write) -> io::Result<()> {
        let labels: Vec<&str> = Action::MENU.iter().map(Action::label).collect();

        loop {
            let choice = prompter.select("What would you like to do?", &labels)?;
            let action = Action::MENU.get(choice).copied().unwrap_or(Action::Exit);
            debug!("selected {action:?}");

            if action == Action::Exit {
                writeln!(out, "Goodbye!")?;
                return Ok(());
            }

            match self.perform(action, prompter, out) {
                Ok(()) => {}
                Err(Error::Io(err)) => return Err(err),
                Err(err) => writeln!(out, "{} {err}", "Error:".red().bold())?,
            }
            writeln!(out)?;
        }
    }

    /// Performs a single menu action.
    pub fn perform(
        &self,
        action: Action,
        prompter: &mut impl Prompter,
        out: &mut impl Write,
    ) -> Result<(), Error> {
        match action {
            Action::Profile => self.show_profile(prompter, out),
            Action::Posts => self.show_posts(prompter, out),
            Action::Summary => self.analyze(Analysis::Summary, prompter, out),
            Action::VibeCheck => self.analyze(Analysis::VibeCheck, prompter, out),
            Action::Followers => self.list_actors(Listing::Followers, prompter, out),
            Action::Following => self.list_actors(Listing::Following, prompter, out),
            Action::Exit => Ok(()),
        }
    }

    /// Asks for a handle exactly as the user typed it. The client
    /// normalizes it and rejects handles that normalize to nothing.
    fn ask_handle(&self, prompter: &mut impl Prompter) -> Result<String, Error> {
        Ok(prompter.input("Bluesky handle", None)?)
    }

    fn show_profile(&self, prompter: &mut impl Prompter, out: &mut impl Write) -> Result<(), Error> {
        let handle = self.ask_handle(prompter)?;
        let profile = self.client.profile(&handle)?;
        writeln!(out, "{}", profile.view(&self.opts))?;
        Ok(())
    }

    fn show_posts(&self, prompter: &mut impl Prompter, out: &mut impl Write) -> Result<(), Error> {
        let handle = self.ask_handle(prompter)?;
        let posts = self.client.posts(&handle, self.limit)?;
        let handle = normalize_handle(&handle);
        if posts.is_empty() {
            writeln!(out, "{handle} has no posts.")?;
        } else {
            writeln!(out, "{}", posts.view(&self.opts))?;
        }
        Ok(())
    }

    fn analyze(
        &self,
        analysis: Analysis,
        prompter: &mut impl Prompter,
        out: &mut impl Write,
    ) -> Result<(), Error> {
        let handle = self.ask_handle(prompter)?;
        let posts = self.client.posts(&handle, self.limit)?;
        let handle = normalize_handle(&handle);
        if posts.iter().all(|post| post.text().trim().is_empty()) {
            return Err(Error::NoPosts(handle));
        }

        writeln!(out, "Analyzing {} posts from {handle}...", posts.len())?;
        let completion = Summarizer::for_posts(&posts).analyze(analysis, &self.provider)?;
        writeln!(out, "{}", Report::new(analysis.title(), &completion).view(&self.opts))?;
        Ok(())
    }

    fn list_actors(
        &self,
        listing: Listing,
        prompter: &mut impl Prompter,
        out: &mut impl Write,
    ) -> Result<(), Error> {
        let handle = self.ask_handle(prompter)?;
        let actors = match listing {
            Listing::Followers => self.client.followers(&handle, self.max_results)?,
            Listing::Following => self.client.follows(&handle, self.max_results)?,
        };
        let handle = normalize_handle(&handle);

        if actors.is_empty() {
            writeln!(out, "{handle} {}.", listing.empty())?;
            return Ok(());
        }

        writeln!(out, "{}", actors.view(&self.opts))?;
        writeln!(out, "{} accounts", actors.len())?;
        self.offer_export(&handle, listing, &actors, prompter, out)
    }

    fn offer_export(
        &self,
        handle: &str,
        listing: Listing,
        actors: &[Actor],
        prompter: &mut impl Prompter,
        out: &mut impl Write,
    ) -> Result<(), Error> {
        if !prompter.confirm("Export to CSV?")? {
            return Ok(());
        }
        let default = format!("{handle}_{}.csv", listing.slug());
        let path = prompter.input("Save to", Some(&default))?;
        export::save_actors(Path::new(&path), actors)?;
        writeln!(out, "Saved {} accounts to {path}", actors.len())?;
        Ok(())
    }
}

#[derive(Clone, Copy, Debug)]
enum Listing {
    Followers,
    Following,
}

impl Listing {
    fn slug(&self) -> &'static str {
        match self {
            Listing::Followers => "followers",
            Listing::Following => "following",
        }
    }

    fn empty(&self) -> &'static str {
        match self {
            Listing::Followers => "has no followers",
            Listing::Following => "is not following anyone",
        }
    }
}

/// An error from a single menu action.
#[derive(Debug, Error)]
pub enum Error {
    /// Talking to Bluesky failed.
    #[error(transparent)]
    Bluesky(#[from] bsky::Error),

    /// Talking to the AI provider failed.
    #[error(transparent)]
    AI(#[from] ai::Error),

    /// Writing an export failed.
    #[error(transparent)]
    Export(#[from] export::Error),

    /// There was nothing to analyze.
    #[error("{0} has no posts to analyze")]
    NoPosts(String),

    /// The terminal could not be read from or written to.
    #[error(transparent)]
    Io(#[from] io::Error),
}
