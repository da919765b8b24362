// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Draws viewable objects into a terminal window.

use crate::ai::Completion;
use crate::bsky::thing::{Actor, Post, Profile};
use chrono::{DateTime, Utc};
use colored::Colorize;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use indoc::formatdoc;
use itertools::Itertools;
use textwrap::Options;

/// View renderer options.
#[derive(Debug)]
pub struct ViewOptions {
    width: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            width: textwrap::termwidth(),
        }
    }
}

impl ViewOptions {
    /// Incrementally builds a new set of view options.
    ///
    /// # Examples
    ///
    /// ```
    /// use bluesky_cli::view::ViewOptions;
    /// let opts = ViewOptions::build().width(72).build();
    /// assert_eq!(opts.width(), 72);
    /// ```
    pub fn build() -> ViewOptionsBuilder {
        ViewOptionsBuilder::default()
    }

    /// Maximum width of rendered output, in columns.
    pub fn width(&self) -> usize {
        self.width
    }
}

/// A builder for view options.
///
/// You probably don't want to use this directly; call [`ViewOptions::build()`]
/// and construct it incrementally instead.
#[derive(Debug, Default)]
#[must_use]
pub struct ViewOptionsBuilder {
    width: Option<usize>,
}

impl ViewOptionsBuilder {
    /// Sets the maximum width of rendered output.
    pub fn width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    /// Finalizes the [`ViewOptions`].
    pub fn build(self) -> ViewOptions {
        ViewOptions {
            width: self.width.unwrap_or_else(textwrap::termwidth),
        }
    }
}

/// Marks an item that can be converted into a string for display on a terminal.
pub trait Viewable {
    /// Converts the item into a string for display on a terminal.
    fn view(&self, opts: &ViewOptions) -> String;
}

fn format_date(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.format("%b %d, %Y").to_string())
        .unwrap_or_else(|| String::from("unknown"))
}

fn format_timestamp(date: Option<DateTime<Utc>>) -> String {
    date.map(|d| d.format("%b %d, %Y %H:%M UTC").to_string())
        .unwrap_or_else(|| String::from("unknown date"))
}

impl Viewable for Profile {
    fn view(&self, opts: &ViewOptions) -> String {
        let description = self
            .description()
            .map(|d| format!("\n{}\n", textwrap::fill(d, opts.width())))
            .unwrap_or_default();
        formatdoc! {"
            {} {}
            DID: {}
            {}
            Followers: {}
            Following: {}
            Posts: {}
            Joined: {}",
            self.display_name().bold(),
            format!("@{}", self.handle()).dimmed(),
            self.did(),
            description,
            self.followers_count(),
            self.follows_count(),
            self.posts_count(),
            format_date(self.created_at()),
        }
    }
}

impl Viewable for [Post] {
    fn view(&self, opts: &ViewOptions) -> String {
        let indent = "   ";
        let wrap = Options::new(opts.width().max(20))
            .initial_indent(indent)
            .subsequent_indent(indent);
        self.iter()
            .enumerate()
            .map(|(i, post)| {
                let number = format!("{}.", i + 1);
                formatdoc! {"
                    {} {}
                    {}
                    {indent}Likes: {} | Reposts: {} | Replies: {}",
                    number.bold(),
                    format_timestamp(post.created_at()).dimmed(),
                    textwrap::fill(post.text(), &wrap),
                    post.likes(),
                    post.reposts(),
                    post.replies(),
                }
            })
            .join("\n\n")
    }
}

impl Viewable for [Actor] {
    fn view(&self, opts: &ViewOptions) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_width(opts.width().min(u16::MAX as usize) as u16);
        table.set_header(vec![
            Cell::new("Handle").fg(Color::Cyan),
            Cell::new("Display Name").fg(Color::Cyan),
            Cell::new("Description").fg(Color::Cyan),
        ]);

        for actor in self {
            let description = actor
                .description()
                .map(|d| d.split_whitespace().join(" "))
                .unwrap_or_default();
            table.add_row(vec![
                Cell::new(actor.handle()),
                Cell::new(actor.display_name().unwrap_or("")),
                Cell::new(description),
            ]);
        }

        table.to_string()
    }
}

/// The result of an analysis, shown in a titled box.
#[derive(Debug)]
pub struct Report<'a> {
    title: &'a str,
    completion: &'a Completion,
}

impl<'a> Report<'a> {
    /// Creates a new report headed by `title`.
    pub fn new(title: &'a str, completion: &'a Completion) -> Self {
        Self { title, completion }
    }
}

impl Viewable for Report<'_> {
    fn view(&self, opts: &ViewOptions) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_width(opts.width().min(u16::MAX as usize) as u16);
        table.set_header(vec![Cell::new(self.title).fg(Color::Magenta)]);
        table.add_row(vec![Cell::new(self.completion.text())]);
        table.to_string()
    }
}
