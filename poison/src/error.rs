// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unsupported announce specification: {0}")]
    UnsupportedSpecType(String),

    #[error("path does not end with home asn {home_asn}: {path:?}")]
    InvalidPathTerminator { home_asn: u32, path: String },

    #[error("prepend path needs at least two elements: {0:?}")]
    DegeneratePath(String),

    /// Classification produced a poisoned path without two distinct
    /// elements. This is a logic error, not bad input.
    #[error("poison path has fewer than two distinct elements: {0:?}")]
    InconsistentPoisonPath(String),

    #[error("empty as set in path: {0:?}")]
    EmptyAsSet(String),

    #[error("invalid path token in {text:?} at {at:?}")]
    InvalidToken { text: String, at: String },

    #[error("malformed prefix announce entry: {0:?}")]
    MalformedEntry(String),

    #[error("invalid mux name: {0:?}")]
    InvalidMuxName(String),

    #[error("prefix announce used as a key before close")]
    NotClosed,
}
