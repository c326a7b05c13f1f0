// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::error::Error;
use crate::token::parse_path;
use crate::{HOMEASN, NOPREPEND, POISONED, PREPENDED, WITHDRAWN};
use itertools::{Either, Itertools};
use schemars::JsonSchema;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// The four legal announcement states of a mux.
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Withdrawn,
    NoPrepend,
    Prepended,
    Poisoned,
}

impl Status {
    pub fn is_announced(&self) -> bool {
        !matches!(self, Status::Withdrawn)
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Status::Withdrawn => write!(f, "{WITHDRAWN}"),
            Status::NoPrepend => write!(f, "{NOPREPEND}"),
            Status::Prepended => write!(f, "{PREPENDED}"),
            Status::Poisoned => write!(f, "{POISONED}"),
        }
    }
}

/// An unordered set of AS numbers occupying one position of a path.
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(transparent)]
pub struct AsSet(BTreeSet<u32>);

impl AsSet {
    pub fn new(members: impl IntoIterator<Item = u32>) -> Self {
        members.into_iter().collect()
    }

    pub fn contains(&self, asn: u32) -> bool {
        self.0.contains(&asn)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Members in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<u32> for AsSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Display for AsSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.iter().join(" "))
    }
}

/// One position of a prepend path.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(untagged)]
pub enum PathElement {
    Asn(u32),
    Set(AsSet),
}

impl PathElement {
    /// Every AS number in this element.
    pub fn asns(&self) -> impl Iterator<Item = u32> + '_ {
        match self {
            PathElement::Asn(asn) => Either::Left(std::iter::once(*asn)),
            PathElement::Set(set) => Either::Right(set.iter()),
        }
    }
}

impl From<u32> for PathElement {
    fn from(value: u32) -> Self {
        PathElement::Asn(value)
    }
}

impl From<AsSet> for PathElement {
    fn from(value: AsSet) -> Self {
        PathElement::Set(value)
    }
}

impl Display for PathElement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PathElement::Asn(asn) => write!(f, "{asn}"),
            PathElement::Set(set) => write!(f, "{set}"),
        }
    }
}

fn render_path(path: &[PathElement]) -> String {
    path.iter().join(" ")
}

/// The ways an [`Announce`] can be specified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnounceSpec {
    Withdrawn,
    NoPrepend,
    /// A literal keyword or a textual prepend path.
    Text(String),
    /// A prepend path given element by element, skipping text parsing.
    Path(Vec<PathElement>),
    /// An already built announcement, taken as is.
    Announce(Announce),
}

impl From<&str> for AnnounceSpec {
    fn from(value: &str) -> Self {
        AnnounceSpec::Text(value.to_string())
    }
}

impl From<String> for AnnounceSpec {
    fn from(value: String) -> Self {
        AnnounceSpec::Text(value)
    }
}

impl From<Vec<PathElement>> for AnnounceSpec {
    fn from(value: Vec<PathElement>) -> Self {
        AnnounceSpec::Path(value)
    }
}

impl From<&[PathElement]> for AnnounceSpec {
    fn from(value: &[PathElement]) -> Self {
        AnnounceSpec::Path(value.to_vec())
    }
}

impl From<Vec<u32>> for AnnounceSpec {
    fn from(value: Vec<u32>) -> Self {
        AnnounceSpec::Path(value.into_iter().map(PathElement::Asn).collect())
    }
}

impl From<Announce> for AnnounceSpec {
    fn from(value: Announce) -> Self {
        AnnounceSpec::Announce(value)
    }
}

impl From<&Announce> for AnnounceSpec {
    fn from(value: &Announce) -> Self {
        AnnounceSpec::Announce(value.clone())
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

fn asn_from_json(value: &serde_json::Value) -> Result<u32, Error> {
    value
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| {
            Error::UnsupportedSpecType(format!(
                "{} {value} is not an as number",
                json_kind(value)
            ))
        })
}

fn element_from_json(value: &serde_json::Value) -> Result<PathElement, Error> {
    match value {
        serde_json::Value::Number(_) => asn_from_json(value).map(PathElement::Asn),
        serde_json::Value::Array(members) => Ok(PathElement::Set(
            members.iter().map(asn_from_json).collect::<Result<_, _>>()?,
        )),
        other => Err(Error::UnsupportedSpecType(format!(
            "{} is not a path element",
            json_kind(other)
        ))),
    }
}

/// Strings are keywords or textual paths, arrays are paths whose elements
/// are numbers or arrays of numbers. Nothing else is a specification.
impl TryFrom<serde_json::Value> for AnnounceSpec {
    type Error = Error;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::String(s) => Ok(AnnounceSpec::Text(s)),
            serde_json::Value::Array(elements) => Ok(AnnounceSpec::Path(
                elements
                    .iter()
                    .map(element_from_json)
                    .collect::<Result<_, _>>()?,
            )),
            other => Err(Error::UnsupportedSpecType(json_kind(&other).into())),
        }
    }
}

impl<'de> Deserialize<'de> for AnnounceSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        AnnounceSpec::try_from(value).map_err(D::Error::custom)
    }
}

/// What one mux announces for a prefix.
///
/// Identity is the pair of status and prepend path. The home ASN an
/// announcement was validated against is remembered so that
/// [`Announce::reassign`] checks new paths against the same terminator, but
/// it takes no part in comparison or hashing.
#[derive(Debug, Clone)]
pub struct Announce {
    status: Status,
    prepend: Vec<PathElement>,
    poisoned: BTreeSet<u32>,
    home_asn: u32,
}

impl Default for Announce {
    fn default() -> Self {
        Self::withdrawn()
    }
}

impl Announce {
    /// Build an announcement validated against [`HOMEASN`].
    pub fn new(spec: impl Into<AnnounceSpec>) -> Result<Self, Error> {
        Self::with_home_asn(HOMEASN, spec)
    }

    pub fn with_home_asn(
        home_asn: u32,
        spec: impl Into<AnnounceSpec>,
    ) -> Result<Self, Error> {
        Self::build(home_asn, spec.into())
    }

    pub fn withdrawn() -> Self {
        Self::bare(HOMEASN, Status::Withdrawn)
    }

    pub fn noprepend() -> Self {
        Self::bare(HOMEASN, Status::NoPrepend)
    }

    /// Replace this announcement entirely. On error `self` is untouched.
    pub fn reassign(
        &mut self,
        spec: impl Into<AnnounceSpec>,
    ) -> Result<(), Error> {
        *self = Self::build(self.home_asn, spec.into())?;
        Ok(())
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// The prepend path, present only for prepended and poisoned
    /// announcements. Always ends with the home ASN.
    pub fn prepend(&self) -> Option<&[PathElement]> {
        match self.status {
            Status::Withdrawn | Status::NoPrepend => None,
            Status::Prepended | Status::Poisoned => Some(&self.prepend),
        }
    }

    /// ASes poisoned by the prepend path. Non-empty exactly when the status
    /// is [`Status::Poisoned`].
    pub fn poisoned(&self) -> &BTreeSet<u32> {
        &self.poisoned
    }

    pub fn home_asn(&self) -> u32 {
        self.home_asn
    }

    pub fn is_announced(&self) -> bool {
        self.status.is_announced()
    }

    fn bare(home_asn: u32, status: Status) -> Self {
        Self {
            status,
            prepend: Vec::new(),
            poisoned: BTreeSet::new(),
            home_asn,
        }
    }

    fn build(home_asn: u32, spec: AnnounceSpec) -> Result<Self, Error> {
        match spec {
            AnnounceSpec::Withdrawn => Ok(Self::bare(home_asn, Status::Withdrawn)),
            AnnounceSpec::NoPrepend => Ok(Self::bare(home_asn, Status::NoPrepend)),
            AnnounceSpec::Text(text) => Self::from_text(home_asn, &text),
            AnnounceSpec::Path(path) => Self::from_path(home_asn, path),
            AnnounceSpec::Announce(announce) => Ok(announce),
        }
    }

    fn from_text(home_asn: u32, text: &str) -> Result<Self, Error> {
        let text = text.trim();
        if text.eq_ignore_ascii_case(WITHDRAWN) {
            return Ok(Self::bare(home_asn, Status::Withdrawn));
        }
        if text.eq_ignore_ascii_case(NOPREPEND) {
            return Ok(Self::bare(home_asn, Status::NoPrepend));
        }
        // A status name alone names no path, let alone a terminated one.
        if text.eq_ignore_ascii_case(PREPENDED)
            || text.eq_ignore_ascii_case(POISONED)
        {
            return Err(Error::InvalidPathTerminator {
                home_asn,
                path: text.to_string(),
            });
        }
        Self::from_path(home_asn, parse_path(text)?)
    }

    /// Validate and classify an ordered path. Both the textual and the
    /// element-wise specifications end up here.
    fn from_path(
        home_asn: u32,
        prepend: Vec<PathElement>,
    ) -> Result<Self, Error> {
        let terminator = PathElement::Asn(home_asn);
        if prepend.last() != Some(&terminator) {
            return Err(Error::InvalidPathTerminator {
                home_asn,
                path: render_path(&prepend),
            });
        }

        if prepend
            .iter()
            .any(|e| matches!(e, PathElement::Set(set) if set.is_empty()))
        {
            return Err(Error::EmptyAsSet(render_path(&prepend)));
        }

        // The home ASN inside a set is a poison like any other member; only
        // bare home ASN elements are prepends.
        let poisoned: BTreeSet<u32> = prepend
            .iter()
            .filter(|e| **e != terminator)
            .flat_map(PathElement::asns)
            .collect();

        let status = if poisoned.is_empty() {
            if prepend.len() < 2 {
                return Err(Error::DegeneratePath(render_path(&prepend)));
            }
            Status::Prepended
        } else {
            let distinct: BTreeSet<&PathElement> = prepend.iter().collect();
            if distinct.len() < 2 {
                return Err(Error::InconsistentPoisonPath(render_path(
                    &prepend,
                )));
            }
            Status::Poisoned
        };

        Ok(Self {
            status,
            prepend,
            poisoned,
            home_asn,
        })
    }
}

impl PartialEq for Announce {
    fn eq(&self, other: &Self) -> bool {
        self.status == other.status && self.prepend == other.prepend
    }
}

impl Eq for Announce {}

impl Hash for Announce {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.status.hash(state);
        self.prepend.hash(state);
    }
}

impl PartialOrd for Announce {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Announce {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.status != other.status {
            return self.status.cmp(&other.status);
        }
        self.prepend.cmp(&other.prepend)
    }
}

impl Display for Announce {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.status {
            Status::Withdrawn => write!(f, "{WITHDRAWN}"),
            Status::NoPrepend => write!(f, "{NOPREPEND}"),
            Status::Prepended | Status::Poisoned => {
                write!(f, "{}", render_path(&self.prepend))
            }
        }
    }
}

impl FromStr for Announce {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Announce::new(s)
    }
}

impl Serialize for Announce {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Announce {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let spec = AnnounceSpec::deserialize(deserializer)?;
        Announce::new(spec).map_err(D::Error::custom)
    }
}

impl JsonSchema for Announce {
    fn schema_name() -> String {
        "Announce".to_string()
    }

    fn json_schema(
        gen: &mut schemars::gen::SchemaGenerator,
    ) -> schemars::schema::Schema {
        String::json_schema(gen)
    }
}
