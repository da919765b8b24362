// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! AI summarization.
//!
//! A [`Summarizer`] turns a Bluesky author feed into a bounded prompt and
//! hands it to whichever AI provider is active.

use crate::ai::{Complete, CompletionRequest, CompletionResult, Error};
use crate::bsky::thing::Post;
use log::debug;

/// Placed between post texts in the prompt.
pub const SEPARATOR: &str = "\n\n";

/// Default upper bound on the length of the post text sent to a provider,
/// in characters.
pub const DEFAULT_BUDGET: usize = 8000;

/// Joins `texts` with [`SEPARATOR`], keeping as many leading texts as fit
/// within `budget` characters.
///
/// Blank texts are skipped. Texts are only ever dropped from the end, so
/// for a newest-first feed the oldest posts go first. If even the first
/// text is too long, it is cut off at `budget` characters.
///
/// # Examples
///
/// ```
/// use bluesky_cli::summary::join_within_budget;
/// let joined = join_within_budget(["newest", "", "older", "oldest"], 15);
/// assert_eq!(joined, "newest\n\nolder");
/// ```
pub fn join_within_budget<'a>(texts: impl IntoIterator<Item = &'a str>, budget: usize) -> String {
    let separator_len = SEPARATOR.chars().count();
    let mut joined = String::new();
    let mut len = 0;

    for text in texts.into_iter().filter(|t| !t.trim().is_empty()) {
        let text_len = text.chars().count();
        if len == 0 {
            if text_len > budget {
                joined.extend(text.chars().take(budget));
                break;
            }
            joined.push_str(text);
            len = text_len;
        } else {
            if len + separator_len + text_len > budget {
                break;
            }
            joined.push_str(SEPARATOR);
            joined.push_str(text);
            len += separator_len + text_len;
        }
    }

    joined
}

/// The kinds of analysis that can be run over a feed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Analysis {
    /// Tone, interests, communication style, and notable patterns.
    VibeCheck,

    /// A concise summary of key themes.
    Summary,
}

impl Analysis {
    /// Heading shown above the result.
    pub fn title(&self) -> &'static str {
        match self {
            Analysis::VibeCheck => "Vibe Check",
            Analysis::Summary => "Summary",
        }
    }

    fn prompt(&self) -> &'static str {
        match self {
            Analysis::VibeCheck => include_str!("vibe_prompt.txt"),
            Analysis::Summary => include_str!("summary_prompt.txt"),
        }
    }
}

/// Summarizes an author's posts and provides a vibe check using AI.
#[derive(Debug)]
pub struct Summarizer<'a> {
    posts: &'a [Post],
    budget: usize,
}

impl<'a> Summarizer<'a> {
    /// Summarizes `posts`, which should be newest first.
    pub fn for_posts(posts: &'a [Post]) -> Self {
        Self {
            posts,
            budget: DEFAULT_BUDGET,
        }
    }

    /// Uses a different character budget for the post text.
    pub fn budget(self, budget: usize) -> Self {
        Self { budget, ..self }
    }

    /// Raw content that will be sent to an LLM.
    ///
    /// This is the text of the newest posts that fit within the budget. It
    /// does not include the instructions; see [`Summarizer::preamble()`].
    pub fn context(&self) -> String {
        join_within_budget(self.posts.iter().map(Post::text), self.budget)
    }

    /// The instructions sent along with the posts for the given `analysis`.
    pub fn preamble(&self, analysis: Analysis) -> String {
        analysis.prompt().trim_end().replace('\n', " ")
    }

    /// Builds the provider-independent request for `analysis`.
    ///
    /// Returns [`Error::EmptyInput`] if none of the posts have any text.
    pub fn request(&self, analysis: Analysis) -> Result<CompletionRequest, Error> {
        let context = self.context();
        debug!(
            "{} prompt carries {} characters from {} posts",
            analysis.title(),
            context.chars().count(),
            self.posts.len()
        );
        CompletionRequest::new(self.preamble(analysis), context)
    }

    /// Runs `analysis` over the posts using `provider`.
    pub fn analyze(&self, analysis: Analysis, provider: &impl Complete) -> CompletionResult {
        let request = self.request(analysis)?;
        provider.call(&request)
    }

    /// Describes the author's tone, interests, and style.
    pub fn vibe_check(&self, provider: &impl Complete) -> CompletionResult {
        self.analyze(Analysis::VibeCheck, provider)
    }

    /// Summarizes the posts' key themes.
    pub fn summarize(&self, provider: &impl Complete) -> CompletionResult {
        self.analyze(Analysis::Summary, provider)
    }
}
