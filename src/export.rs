// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! CSV export of follower and follow listings.
//!
//! Exports have a header row of `handle,display_name,description` and one
//! row per account. Fields are quoted only when they contain a comma, a
//! quote, or a line break, so an export can always be read back into the
//! same records.

use crate::bsky::thing::Actor;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One row of an export.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct ActorRecord {
    /// The account's handle.
    pub handle: String,

    /// The account's display name, or empty if it has none.
    pub display_name: String,

    /// The account's bio, or empty if it has none.
    pub description: String,
}

impl From<&Actor> for ActorRecord {
    fn from(actor: &Actor) -> Self {
        Self {
            handle: actor.handle().to_string(),
            display_name: actor.display_name().unwrap_or_default().to_string(),
            description: actor.description().unwrap_or_default().to_string(),
        }
    }
}

/// Writes `records` as CSV to `writer`.
pub fn write_actors<W: Write>(writer: W, records: &[ActorRecord]) -> Result<(), Error> {
    let mut writer = csv::Writer::from_writer(writer);
    if records.is_empty() {
        // serde only writes the header alongside the first record.
        writer.write_record(["handle", "display_name", "description"])?;
    }
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads CSV written by [`write_actors`] back into records.
pub fn read_actors<R: Read>(reader: R) -> Result<Vec<ActorRecord>, Error> {
    let mut reader = csv::Reader::from_reader(reader);
    let records = reader.deserialize().collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

/// Saves `actors` as a CSV file at `path`, replacing anything already there.
pub fn save_actors(path: &Path, actors: &[Actor]) -> Result<(), Error> {
    let records: Vec<ActorRecord> = actors.iter().map(ActorRecord::from).collect();
    let file = File::create(path).map_err(|source| Error::Create {
        path: path.to_path_buf(),
        source,
    })?;
    write_actors(file, &records)?;
    info!("exported {} accounts to {}", records.len(), path.display());
    Ok(())
}

/// An export error.
#[derive(Debug, Error)]
pub enum Error {
    /// The export file could not be created.
    #[error("Could not create {}: {source}", .path.display())]
    Create {
        /// Where the export was going to be written.
        path: PathBuf,

        /// The underlying I/O error.
        source: io::Error,
    },

    /// The CSV could not be written or read.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The output could not be flushed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
