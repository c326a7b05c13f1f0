// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property-based tests for announcements using proptest
//!
//! These tests verify that the text forms of Announce and PrefixAnnounce
//! round-trip, and that identity ignores the things it should: AS set member
//! order, separator choice and mux order.

use crate::announce::{Announce, AsSet, PathElement, Status};
use crate::prefix::PrefixAnnounce;
use crate::HOMEASN;
use proptest::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut h = DefaultHasher::new();
    value.hash(&mut h);
    h.finish()
}

// Small AS numbers so that collisions with other elements, and with the
// home asn, actually happen.
fn asn_strategy() -> impl Strategy<Value = u32> {
    prop_oneof![1u32..16u32, Just(HOMEASN), any::<u32>()]
}

fn element_strategy() -> impl Strategy<Value = PathElement> {
    prop_oneof![
        3 => asn_strategy().prop_map(PathElement::Asn),
        1 => prop::collection::vec(asn_strategy(), 1..4)
            .prop_map(|members| PathElement::Set(AsSet::new(members))),
    ]
}

/// Valid prepend paths: at least one element ahead of the terminating home
/// asn, so that a path of home asns alone is never degenerate.
fn path_strategy() -> impl Strategy<Value = Vec<PathElement>> {
    prop::collection::vec(element_strategy(), 1..6).prop_map(|mut path| {
        path.push(PathElement::Asn(HOMEASN));
        path
    })
}

fn announce_strategy() -> impl Strategy<Value = Announce> {
    prop_oneof![
        1 => Just(Announce::withdrawn()),
        1 => Just(Announce::noprepend()),
        1 => (1usize..6).prop_map(|n| {
            Announce::new(vec![HOMEASN; n + 1]).unwrap()
        }),
        4 => path_strategy().prop_map(|path| Announce::new(path).unwrap()),
    ]
}

fn mux_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,8}"
}

fn entries_strategy() -> impl Strategy<Value = Vec<(String, Announce)>> {
    prop::collection::btree_map(mux_strategy(), announce_strategy(), 0..6)
        .prop_map(|m| m.into_iter().collect())
}

fn build(entries: &[(String, Announce)]) -> PrefixAnnounce {
    let mut pfx = PrefixAnnounce::new();
    for (mux, announce) in entries {
        pfx.set(mux.as_str(), announce).unwrap();
    }
    pfx.close();
    pfx
}

/// Render a path with set members in descending order and commas between
/// tokens, a form the canonical renderer never produces.
fn scrambled(path: &[PathElement]) -> String {
    path.iter()
        .map(|e| match e {
            PathElement::Asn(asn) => asn.to_string(),
            PathElement::Set(set) => {
                let mut members: Vec<String> =
                    set.iter().map(|m| m.to_string()).collect();
                members.reverse();
                format!("{{{}}}", members.join(","))
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

proptest! {
    /// Property: rendering then parsing an announcement gives it back
    #[test]
    fn prop_announce_round_trip(a in announce_strategy()) {
        let back: Announce = a.to_string().parse().unwrap();
        prop_assert_eq!(&back, &a);
        prop_assert_eq!(back.poisoned(), a.poisoned());
        prop_assert_eq!(hash_of(&back), hash_of(&a));
    }

    /// Property: set member order and separators do not change identity
    #[test]
    fn prop_announce_text_insensitive(path in path_strategy()) {
        let canonical = Announce::new(path.clone()).unwrap();
        let other = Announce::new(scrambled(&path)).unwrap();
        prop_assert_eq!(&other, &canonical);
        prop_assert_eq!(other.to_string(), canonical.to_string());
    }

    /// Property: classification matches the content of the path
    #[test]
    fn prop_announce_classification(path in path_strategy()) {
        let a = Announce::new(path.clone()).unwrap();
        let prepend = a.prepend().unwrap();
        prop_assert_eq!(prepend.last(), Some(&PathElement::Asn(HOMEASN)));

        let expected: BTreeSet<u32> = path
            .iter()
            .filter(|e| **e != PathElement::Asn(HOMEASN))
            .flat_map(PathElement::asns)
            .collect();
        prop_assert_eq!(a.poisoned(), &expected);

        if expected.is_empty() {
            prop_assert_eq!(a.status(), Status::Prepended);
            prop_assert!(prepend.len() >= 2);
        } else {
            prop_assert_eq!(a.status(), Status::Poisoned);
        }
    }

    /// Property: a path not ending in the bare home asn is always rejected
    #[test]
    fn prop_announce_requires_terminator(
        mut path in path_strategy(),
        last in element_strategy(),
    ) {
        prop_assume!(last != PathElement::Asn(HOMEASN));
        path.push(last);
        prop_assert!(Announce::new(path).is_err());
    }

    /// Property: rendering then parsing a prefix announcement gives it back
    #[test]
    fn prop_prefix_round_trip(entries in entries_strategy()) {
        let pfx = build(&entries);
        let s = pfx.to_string();
        let back: PrefixAnnounce = s.parse().unwrap();
        prop_assert_eq!(&back, &pfx);
        prop_assert_eq!(hash_of(&back), hash_of(&pfx));
        prop_assert_eq!(back.to_string(), s);
    }

    /// Property: mux insertion order does not change identity
    #[test]
    fn prop_prefix_order_independent(entries in entries_strategy()) {
        let forward = build(&entries);
        let reversed: Vec<_> = entries.iter().rev().cloned().collect();
        let backward = build(&reversed);
        prop_assert_eq!(&forward, &backward);
        prop_assert_eq!(hash_of(&forward), hash_of(&backward));
    }

    /// Property: the mux map form round-trips
    #[test]
    fn prop_prefix_mux_map(entries in entries_strategy()) {
        let pfx = build(&entries);
        let map: BTreeMap<String, String> = pfx.to_mux_map();
        prop_assert_eq!(map.len(), pfx.len());
        prop_assert_eq!(PrefixAnnounce::from_mux_map(map).unwrap(), pfx);
    }
}
