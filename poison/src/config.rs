// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::announce::{Announce, AnnounceSpec};
use crate::error::Error;
use crate::prefix::PrefixAnnounce;
use crate::HOMEASN;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Deployment settings for building announcements.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema,
)]
#[serde(default)]
pub struct Config {
    /// The AS number that terminates every prepend path.
    pub home_asn: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self { home_asn: HOMEASN }
    }
}

impl Config {
    pub fn announce(
        &self,
        spec: impl Into<AnnounceSpec>,
    ) -> Result<Announce, Error> {
        Announce::with_home_asn(self.home_asn, spec)
    }

    pub fn prefix_announce(&self) -> PrefixAnnounce {
        PrefixAnnounce::with_home_asn(self.home_asn)
    }

    pub fn parse_prefix_announce(
        &self,
        s: &str,
    ) -> Result<PrefixAnnounce, Error> {
        PrefixAnnounce::parse_with_home_asn(s, self.home_asn)
    }
}
