// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Bluesky API clients and services for communicating with Bluesky over HTTP.

pub mod client;
pub mod service;
pub mod thing;

pub use client::{Client, Error, normalize_handle};
