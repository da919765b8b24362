// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

use bluesky_cli::cli::Config;
use clap::Parser;

fn main() {
    let config = Config::parse();
    bluesky_cli::cli::run(config)
}
