// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::announce::{Announce, AnnounceSpec};
use crate::error::Error;
use crate::HOMEASN;
use schemars::JsonSchema;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Order independent snapshot of the entries of a closed [`PrefixAnnounce`].
pub type Identifier = BTreeSet<(String, Announce)>;

/// What every mux announces for one prefix.
///
/// Entries keep their insertion order for rendering. Identity is only
/// defined once the value has been [closed](PrefixAnnounce::close), and then
/// depends on the set of (mux, announce) pairs alone. Mutating a closed value
/// reopens it. Hashing or comparing an open value through `Hash` or
/// `PartialEq` panics; [`PrefixAnnounce::identifier`] and
/// [`PrefixAnnounce::try_eq`] report [`Error::NotClosed`] instead.
#[derive(Debug, Clone)]
pub struct PrefixAnnounce {
    entries: Vec<(String, Announce)>,
    identifier: Option<Identifier>,
    home_asn: u32,
}

impl Default for PrefixAnnounce {
    fn default() -> Self {
        Self::new()
    }
}

fn check_mux_name(mux: &str) -> Result<(), Error> {
    if mux.is_empty()
        || mux.trim() != mux
        || mux.contains(':')
        || mux.contains(';')
    {
        return Err(Error::InvalidMuxName(mux.to_string()));
    }
    Ok(())
}

impl PrefixAnnounce {
    pub fn new() -> Self {
        Self::with_home_asn(HOMEASN)
    }

    /// Announcements assigned from anything other than an [`Announce`] are
    /// validated against `home_asn`.
    pub fn with_home_asn(home_asn: u32) -> Self {
        Self {
            entries: Vec::new(),
            identifier: None,
            home_asn,
        }
    }

    pub fn home_asn(&self) -> u32 {
        self.home_asn
    }

    /// Assign the announcement of `mux`, replacing any earlier one. A
    /// replaced entry keeps its position.
    pub fn set(
        &mut self,
        mux: impl Into<String>,
        spec: impl Into<AnnounceSpec>,
    ) -> Result<(), Error> {
        let mux = mux.into();
        check_mux_name(&mux)?;
        let announce = Announce::with_home_asn(self.home_asn, spec)?;

        self.identifier = None;
        match self.entries.iter().position(|(m, _)| *m == mux) {
            Some(idx) => self.entries[idx].1 = announce,
            None => self.entries.push((mux, announce)),
        }
        Ok(())
    }

    pub fn get(&self, mux: &str) -> Option<&Announce> {
        self.entries.iter().find(|(m, _)| m == mux).map(|(_, a)| a)
    }

    pub fn remove(&mut self, mux: &str) -> Option<Announce> {
        let idx = self.entries.iter().position(|(m, _)| m == mux)?;
        self.identifier = None;
        Some(self.entries.remove(idx).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Announce)> {
        self.entries.iter().map(|(m, a)| (m.as_str(), a))
    }

    pub fn muxes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(m, _)| m.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when no mux announces the prefix.
    pub fn is_withdrawn(&self) -> bool {
        self.entries.iter().all(|(_, a)| !a.is_announced())
    }

    /// Snapshot the current entries as this value's identity. Closing again
    /// recomputes the snapshot.
    pub fn close(&mut self) {
        self.identifier = Some(self.entries.iter().cloned().collect());
    }

    pub fn is_closed(&self) -> bool {
        self.identifier.is_some()
    }

    pub fn identifier(&self) -> Result<&Identifier, Error> {
        self.identifier.as_ref().ok_or(Error::NotClosed)
    }

    pub fn try_eq(&self, other: &Self) -> Result<bool, Error> {
        Ok(self.identifier()? == other.identifier()?)
    }

    /// The mux to announcement text mapping. Insertion order is not kept.
    pub fn to_mux_map(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|(m, a)| (m.clone(), a.to_string()))
            .collect()
    }

    /// Build a closed value from a mux to announcement text mapping.
    pub fn from_mux_map<K, V>(
        map: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Self, Error>
    where
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut pfx = Self::new();
        for (mux, text) in map {
            pfx.set(mux, text.as_ref())?;
        }
        pfx.close();
        Ok(pfx)
    }

    /// Parse the `mux: announce; mux: announce` form, validating
    /// announcements against `home_asn`. The result is closed.
    pub fn parse_with_home_asn(s: &str, home_asn: u32) -> Result<Self, Error> {
        let mut pfx = Self::with_home_asn(home_asn);
        if !s.trim().is_empty() {
            for entry in s.split(';') {
                let (mux, text) = entry
                    .split_once(':')
                    .ok_or_else(|| Error::MalformedEntry(entry.trim().into()))?;
                let mux = mux.trim();
                if mux.is_empty() {
                    return Err(Error::MalformedEntry(entry.trim().into()));
                }
                pfx.set(mux, text.trim())?;
            }
        }
        pfx.close();
        Ok(pfx)
    }
}

impl Hash for PrefixAnnounce {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &self.identifier {
            Some(id) => id.hash(state),
            None => panic!("{}", Error::NotClosed),
        }
    }
}

impl PartialEq for PrefixAnnounce {
    fn eq(&self, other: &Self) -> bool {
        match self.try_eq(other) {
            Ok(eq) => eq,
            Err(e) => panic!("{e}"),
        }
    }
}

impl Eq for PrefixAnnounce {}

impl Display for PrefixAnnounce {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, (mux, announce)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{mux}: {announce}")?;
        }
        Ok(())
    }
}

impl FromStr for PrefixAnnounce {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with_home_asn(s, HOMEASN)
    }
}

impl Serialize for PrefixAnnounce {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PrefixAnnounce {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

impl JsonSchema for PrefixAnnounce {
    fn schema_name() -> String {
        "PrefixAnnounce".to_string()
    }

    fn json_schema(
        gen: &mut schemars::gen::SchemaGenerator,
    ) -> schemars::schema::Schema {
        String::json_schema(gen)
    }
}
