// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Clients for reading data from the Bluesky API.

use crate::bsky::service::{BlueskyService, Service};
use crate::bsky::thing::{Actor, ActorPage, Feed, Post, Profile, Session};
use crate::conf::Credentials;
use crate::http::HTTPError;
use log::{debug, info};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Default number of posts to fetch from an author feed.
pub const DEFAULT_POST_LIMIT: u8 = 50;

/// Most posts Bluesky will return in one request.
pub const MAX_POST_LIMIT: u8 = 100;

/// Default cap on the number of accounts fetched for follower listings.
pub const DEFAULT_MAX_RESULTS: usize = 100;

/// Most accounts Bluesky will return in one page of a follower listing.
const PAGE_SIZE: usize = 100;

/// Normalizes a user-supplied handle.
///
/// A leading `@` is stripped, and a bare name without any dots is assumed to
/// live on `bsky.social`.
///
/// # Examples
///
/// ```
/// use bluesky_cli::bsky::normalize_handle;
/// assert_eq!(normalize_handle("@alice"), "alice.bsky.social");
/// assert_eq!(normalize_handle("bob.example.com"), "bob.example.com");
/// ```
pub fn normalize_handle(handle: &str) -> String {
    let handle = handle.trim();
    let handle = handle.strip_prefix('@').unwrap_or(handle);
    if handle.is_empty() || handle.contains('.') {
        handle.to_string()
    } else {
        format!("{handle}.bsky.social")
    }
}

/// An authenticated connection to Bluesky.
#[derive(Debug)]
pub struct Client<S: Service = BlueskyService> {
    service: S,
    session: Session,
    token: String,
}

impl Client<BlueskyService> {
    /// Logs in to Bluesky with the given `credentials`.
    ///
    /// Returns an [`enum@Error`] if the credentials are rejected or the
    /// server does not hand back an access token.
    pub fn login(credentials: &Credentials) -> Result<Self, Error> {
        Self::login_with_service(credentials, BlueskyService::default())
    }
}

impl<S: Service> Client<S> {
    /// Logs in to Bluesky with the given `credentials`, using `service` to
    /// talk to the API.
    pub fn login_with_service(credentials: &Credentials, service: S) -> Result<Self, Error> {
        info!("logging in as {}", credentials.identifier());
        let data = service.create_session(credentials.identifier(), credentials.password())?;
        let session: Session = serde_json::from_str(&data)?;
        let token = session.access_jwt().ok_or(Error::MissingToken)?.to_string();
        debug!("logged in as {} ({})", session.handle(), session.did());
        Ok(Self {
            service,
            session,
            token,
        })
    }

    /// The current session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The underlying service.
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Retrieves the profile for `handle`.
    pub fn profile(&self, handle: &str) -> Result<Profile, Error> {
        let actor = Self::actor(handle)?;
        self.fetch("app.bsky.actor.getProfile", &[("actor", actor)])
    }

    /// Retrieves up to `limit` of the most recent posts by `handle`, newest
    /// first.
    ///
    /// `limit` is clamped to the range Bluesky accepts, 1 to 100.
    pub fn posts(&self, handle: &str, limit: u8) -> Result<Vec<Post>, Error> {
        let actor = Self::actor(handle)?;
        let limit = limit.clamp(1, MAX_POST_LIMIT);
        let feed: Feed = self.fetch(
            "app.bsky.feed.getAuthorFeed",
            &[("actor", actor), ("limit", limit.to_string())],
        )?;
        Ok(feed.into_posts())
    }

    /// Retrieves up to `max` of the accounts following `handle`. A `max` of
    /// 0 retrieves every follower.
    pub fn followers(&self, handle: &str, max: usize) -> Result<Vec<Actor>, Error> {
        self.actors("app.bsky.graph.getFollowers", handle, max)
    }

    /// Retrieves up to `max` of the accounts `handle` follows. A `max` of 0
    /// retrieves every account.
    pub fn follows(&self, handle: &str, max: usize) -> Result<Vec<Actor>, Error> {
        self.actors("app.bsky.graph.getFollows", handle, max)
    }

    fn actors(&self, method: &str, handle: &str, max: usize) -> Result<Vec<Actor>, Error> {
        let actor = Self::actor(handle)?;
        let mut actors = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let batch = if max == 0 {
                PAGE_SIZE
            } else {
                PAGE_SIZE.min(max - actors.len())
            };
            let mut query = vec![("actor", actor.clone()), ("limit", batch.to_string())];
            if let Some(cursor) = cursor.take() {
                query.push(("cursor", cursor));
            }

            let page: ActorPage = self.fetch(method, &query)?;
            cursor = page.cursor().map(String::from);
            let fetched = page.into_actors();
            let empty = fetched.is_empty();
            actors.extend(fetched);
            debug!("fetched {} accounts so far from {method}", actors.len());

            let full = max > 0 && actors.len() >= max;
            if full || empty || cursor.is_none() {
                break;
            }
        }

        if max > 0 {
            actors.truncate(max);
        }
        Ok(actors)
    }

    fn fetch<T: DeserializeOwned>(&self, method: &str, query: &[(&str, String)]) -> Result<T, Error> {
        let data = self.service.get_resource(method, &self.token, query)?;
        Ok(serde_json::from_str(&data)?)
    }

    fn actor(handle: &str) -> Result<String, Error> {
        let actor = normalize_handle(handle);
        if actor.is_empty() {
            Err(Error::InvalidHandle(handle.to_string()))
        } else {
            Ok(actor)
        }
    }
}

/// A client error.
#[derive(Debug, Error)]
pub enum Error {
    /// Bluesky is rate limiting requests.
    #[error("Bluesky is rate limiting requests. Wait a few minutes before trying again.")]
    RateLimited,

    /// Bluesky answered with an unsuccessful HTTP status.
    #[error("Bluesky returned HTTP {0}")]
    SocialApi(StatusCode),

    /// An error from the underlying HTTP service.
    #[error("Service error: {0}")]
    Service(HTTPError),

    /// An error parsing data.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Login appeared to succeed but no access token was returned.
    #[error("Bluesky did not return an access token")]
    MissingToken,

    /// The handle was empty once normalized.
    #[error("Invalid handle: {0:?}")]
    InvalidHandle(String),
}

impl From<HTTPError> for Error {
    fn from(error: HTTPError) -> Self {
        match error {
            HTTPError::Http(StatusCode::TOO_MANY_REQUESTS) => Error::RateLimited,
            HTTPError::Http(status) => Error::SocialApi(status),
            error => Error::Service(error),
        }
    }
}

#[cfg(test)]
mod tests {
    mod normalize_handle {
        use super::super::*;

        #[test]
        fn it_strips_a_leading_at_sign() {
            assert_eq!(normalize_handle("@alice.bsky.social"), "alice.bsky.social");
        }

        #[test]
        fn it_appends_the_default_domain_to_bare_names() {
            assert_eq!(normalize_handle("alice"), "alice.bsky.social");
        }

        #[test]
        fn it_keeps_custom_domains() {
            assert_eq!(normalize_handle("  bob.example.com "), "bob.example.com");
        }

        #[test]
        fn it_leaves_empty_handles_empty() {
            assert_eq!(normalize_handle("@"), "");
        }
    }

    mod login {
        use super::super::*;
        use crate::test_utils::TestService;

        #[test]
        fn it_starts_a_session() {
            let client = Client::test();
            assert_eq!(client.session().handle(), "alice.bsky.social");
            assert_eq!(client.session().did(), "did:plc:alice123");
        }

        #[test]
        fn it_fails_when_the_password_is_rejected() {
            let service = TestService::new("alice").login_status(StatusCode::UNAUTHORIZED);
            let result = Client::login_with_service(&Credentials::new("alice", "bad"), service);
            assert!(matches!(
                result,
                Err(Error::SocialApi(StatusCode::UNAUTHORIZED))
            ));
        }

        #[test]
        fn it_fails_without_an_access_token() {
            let service = TestService::new("alice").session("notoken");
            let result = Client::login_with_service(&Credentials::new("alice", "pw"), service);
            assert!(matches!(result, Err(Error::MissingToken)));
        }
    }

    mod profile {
        use super::super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn it_retrieves_a_profile() {
            let profile = Client::test().profile("@alice").unwrap();
            assert_eq!(profile.handle(), "alice.bsky.social");
            assert_eq!(profile.display_name(), "Alice Example");
            assert_eq!(profile.followers_count(), 3);
            assert_eq!(profile.follows_count(), 2);
            assert_eq!(profile.posts_count(), 3);
        }

        #[test]
        fn it_sends_the_normalized_handle() {
            let client = Client::test();
            client.profile("@alice").unwrap();
            let requests = client.service().requests();
            assert_eq!(requests[0].0, "app.bsky.actor.getProfile");
            assert_eq!(
                requests[0].1,
                vec![(String::from("actor"), String::from("alice.bsky.social"))]
            );
        }

        #[test]
        fn it_rejects_empty_handles() {
            let client = Client::test();
            let result = client.profile(" @ ");
            assert!(matches!(result, Err(Error::InvalidHandle(_))));
            assert!(client.service().requests().is_empty());
        }
    }

    mod posts {
        use super::super::*;

        #[test]
        fn it_retrieves_posts_newest_first() {
            let posts = Client::test().posts("alice", DEFAULT_POST_LIMIT).unwrap();
            assert_eq!(posts.len(), 3);
            assert!(posts[0].created_at() > posts[1].created_at());
            assert!(posts[1].created_at() > posts[2].created_at());
        }

        #[test]
        fn it_retrieves_an_empty_feed() {
            let posts = Client::test_empty().posts("nobody", 10).unwrap();
            assert!(posts.is_empty());
        }

        #[test]
        fn it_clamps_the_limit() {
            let client = Client::test();
            client.posts("alice", 0).unwrap();
            client.posts("alice", 255).unwrap();
            let requests = client.service().requests();
            assert!(requests[0].1.contains(&(String::from("limit"), String::from("1"))));
            assert!(requests[1].1.contains(&(String::from("limit"), String::from("100"))));
        }

        #[test]
        fn it_reports_rate_limiting() {
            let err = Client::test_failing(StatusCode::TOO_MANY_REQUESTS)
                .posts("alice", 10)
                .unwrap_err();
            assert!(matches!(err, Error::RateLimited));
            assert!(err.to_string().contains("Wait"));
        }

        #[test]
        fn it_reports_other_statuses() {
            let err = Client::test_failing(StatusCode::BAD_REQUEST)
                .posts("alice", 10)
                .unwrap_err();
            assert!(matches!(err, Error::SocialApi(StatusCode::BAD_REQUEST)));
        }
    }

    mod followers {
        use super::super::*;
        use crate::test_utils::TestService;

        #[test]
        fn it_follows_the_cursor_until_it_runs_out() {
            let client = Client::test();
            let followers = client.followers("alice", 0).unwrap();
            let handles: Vec<_> = followers.iter().map(|a| a.handle()).collect();
            assert_eq!(
                handles,
                vec!["bob.bsky.social", "carol.example.com", "dave.bsky.social"]
            );

            let requests = client.service().requests();
            assert_eq!(requests.len(), 2);
            assert!(requests[1].1.contains(&(String::from("cursor"), String::from("page2"))));
        }

        #[test]
        fn it_stops_once_it_has_enough() {
            let client = Client::test();
            let followers = client.followers("alice", 2).unwrap();
            assert_eq!(followers.len(), 2);
            assert_eq!(client.service().requests().len(), 1);
        }

        #[test]
        fn it_asks_only_for_what_it_still_needs() {
            let client = Client::test();
            let followers = client.followers("alice", 3).unwrap();
            assert_eq!(followers.len(), 3);
            let requests = client.service().requests();
            assert!(requests[0].1.contains(&(String::from("limit"), String::from("3"))));
            assert!(requests[1].1.contains(&(String::from("limit"), String::from("1"))));
        }

        #[test]
        fn it_retrieves_follows() {
            let follows = Client::test().follows("alice", DEFAULT_MAX_RESULTS).unwrap();
            assert_eq!(follows.len(), 2);
            assert_eq!(follows[0].display_name(), Some("Erin"));
            assert!(follows[1].display_name().is_none());
        }

        #[test]
        fn it_propagates_errors_from_later_pages() {
            let service = TestService::new("alice").fail_after(1, StatusCode::BAD_GATEWAY);
            let client =
                Client::login_with_service(&Credentials::new("alice", "pw"), service).unwrap();
            let result = client.followers("alice", 0);
            assert!(matches!(result, Err(Error::SocialApi(StatusCode::BAD_GATEWAY))));
        }
    }
}
