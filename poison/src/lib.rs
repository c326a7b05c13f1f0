// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Announcement states for BGP path poisoning measurements.
//!
//! An [`Announce`] describes what a single mux does to the AS path of a
//! prefix: withdraw it, announce it unmodified, prepend the home ASN, or
//! poison the path with other ASes. A [`PrefixAnnounce`] maps every mux to
//! its [`Announce`] for one prefix. Neither type is bound to an actual
//! prefix.

pub mod announce;
pub mod config;
pub mod error;
pub mod prefix;
mod token;

pub use announce::{Announce, AnnounceSpec, AsSet, PathElement, Status};
pub use config::Config;
pub use error::Error;
pub use prefix::PrefixAnnounce;

#[cfg(test)]
mod proptest;

/// The measurement operator's own AS number. Every prepend path ends with it.
pub const HOMEASN: u32 = 47065;

/// Text form of a withdrawn announcement.
pub const WITHDRAWN: &str = "withdrawn";

/// Text form of an announcement without AS path manipulation.
pub const NOPREPEND: &str = "noprepend";

/// Status name of a path made only of the home ASN.
pub const PREPENDED: &str = "prepended";

/// Status name of a path carrying poisoned ASes.
pub const POISONED: &str = "poisoned";
