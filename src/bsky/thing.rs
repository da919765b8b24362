// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Records returned by the Bluesky API.
//!
//! These structures mirror only the parts of the AT Protocol lexicon the
//! program actually displays. Unknown fields are ignored, and optional
//! fields that Bluesky omits for sparse accounts (no display name, no bio)
//! are deserialized as `None` or zero.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Parses an RFC 3339 timestamp, treating a missing or malformed value as
/// unknown.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
        .map(|date| date.with_timezone(&Utc)))
}

/// An authenticated session, as returned by `com.atproto.server.createSession`.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    did: String,
    handle: String,
    access_jwt: Option<String>,
}

impl Session {
    /// The account's decentralized identifier.
    pub fn did(&self) -> &str {
        &self.did
    }

    /// The account's handle.
    pub fn handle(&self) -> &str {
        &self.handle
    }

    /// The bearer token used to authenticate further requests.
    pub fn access_jwt(&self) -> Option<&str> {
        self.access_jwt.as_deref()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("did", &self.did)
            .field("handle", &self.handle)
            .field("access_jwt", &self.access_jwt.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// A detailed account profile from `app.bsky.actor.getProfile`.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    did: String,
    handle: String,
    display_name: Option<String>,
    description: Option<String>,
    #[serde(default)]
    followers_count: u64,
    #[serde(default)]
    follows_count: u64,
    #[serde(default)]
    posts_count: u64,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    created_at: Option<DateTime<Utc>>,
}

impl Profile {
    /// The account's decentralized identifier.
    pub fn did(&self) -> &str {
        &self.did
    }

    /// The account's handle.
    pub fn handle(&self) -> &str {
        &self.handle
    }

    /// The account's display name, falling back to the handle if it has
    /// none.
    pub fn display_name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.handle)
    }

    /// The account's bio.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }

    /// Number of accounts following this one.
    pub fn followers_count(&self) -> u64 {
        self.followers_count
    }

    /// Number of accounts this one follows.
    pub fn follows_count(&self) -> u64 {
        self.follows_count
    }

    /// Number of posts the account has made.
    pub fn posts_count(&self) -> u64 {
        self.posts_count
    }

    /// When the account was created.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

/// An account as it appears in follower and follow lists.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    handle: String,
    display_name: Option<String>,
    description: Option<String>,
}

impl Actor {
    /// The account's handle.
    pub fn handle(&self) -> &str {
        &self.handle
    }

    /// The account's display name, if it has set one.
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref().filter(|name| !name.is_empty())
    }

    /// The account's bio, if it has set one.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }
}

/// One page of a follower or follow listing.
///
/// `app.bsky.graph.getFollowers` puts its accounts under `followers`, and
/// `app.bsky.graph.getFollows` puts them under `follows`; either works.
#[derive(Debug, Deserialize)]
pub struct ActorPage {
    #[serde(rename = "followers", alias = "follows", default)]
    actors: Vec<Actor>,
    cursor: Option<String>,
}

impl ActorPage {
    /// Accounts on this page.
    pub fn into_actors(self) -> Vec<Actor> {
        self.actors
    }

    /// Token for the next page, absent on the last page.
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }
}

/// A post from an author feed.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    record: PostRecord,
    #[serde(default)]
    like_count: u64,
    #[serde(default)]
    repost_count: u64,
    #[serde(default)]
    reply_count: u64,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PostRecord {
    #[serde(default)]
    text: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    created_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Text of the post. May be empty for image-only posts.
    pub fn text(&self) -> &str {
        &self.record.text
    }

    /// When the author says the post was written.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.record.created_at
    }

    /// Number of likes.
    pub fn likes(&self) -> u64 {
        self.like_count
    }

    /// Number of reposts.
    pub fn reposts(&self) -> u64 {
        self.repost_count
    }

    /// Number of replies.
    pub fn replies(&self) -> u64 {
        self.reply_count
    }
}

/// An author feed from `app.bsky.feed.getAuthorFeed`, newest post first.
#[derive(Debug, Deserialize)]
pub struct Feed {
    #[serde(default)]
    feed: Vec<FeedItem>,
}

#[derive(Debug, Deserialize)]
struct FeedItem {
    post: Post,
}

impl Feed {
    /// The posts in the feed, in the order Bluesky returned them.
    pub fn into_posts(self) -> Vec<Post> {
        self.feed.into_iter().map(|item| item.post).collect()
    }
}
