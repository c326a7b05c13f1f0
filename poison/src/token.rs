// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tokenizer for textual prepend paths such as `704 {34 35 36} 47065`.
//!
//! Tokens are bare AS numbers or brace delimited AS sets. Whitespace and
//! commas are interchangeable separators, both between tokens and between
//! the members of a set. Separators between tokens may be omitted where the
//! braces already delimit them, e.g. `704{34 35}47065`.

use crate::announce::{AsSet, PathElement};
use crate::error::Error;
use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, digit1},
    combinator::{all_consuming, map, map_res, opt, value},
    multi::many0,
    sequence::{delimited, preceded, terminated},
    IResult,
};

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == ','
}

fn separator(input: &str) -> IResult<&str, ()> {
    value((), take_while1(is_separator))(input)
}

fn asn(input: &str) -> IResult<&str, u32> {
    map_res(digit1, str::parse::<u32>)(input)
}

fn as_set(input: &str) -> IResult<&str, AsSet> {
    map(
        delimited(
            char('{'),
            terminated(many0(preceded(opt(separator), asn)), opt(separator)),
            char('}'),
        ),
        |members: Vec<u32>| members.into_iter().collect(),
    )(input)
}

fn element(input: &str) -> IResult<&str, PathElement> {
    alt((map(as_set, PathElement::Set), map(asn, PathElement::Asn)))(input)
}

fn path(input: &str) -> IResult<&str, Vec<PathElement>> {
    all_consuming(terminated(
        many0(preceded(opt(separator), element)),
        opt(separator),
    ))(input)
}

/// Split a textual path into its elements. No validation of the path as
/// a whole happens here.
pub(crate) fn parse_path(text: &str) -> Result<Vec<PathElement>, Error> {
    match path(text) {
        Ok((_, elements)) => Ok(elements),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            Err(Error::InvalidToken {
                text: text.trim().to_string(),
                at: e.input.trim().to_string(),
            })
        }
        Err(nom::Err::Incomplete(_)) => Err(Error::InvalidToken {
            text: text.trim().to_string(),
            at: String::new(),
        }),
    }
}

#[cfg(test)]
mod test {
    use super::parse_path;
    use crate::announce::{AsSet, PathElement};
    use crate::error::Error;
    use pretty_assertions::assert_eq;

    fn set(members: &[u32]) -> PathElement {
        PathElement::Set(members.iter().copied().collect::<AsSet>())
    }

    #[test]
    fn test_bare_tokens() {
        let expected = vec![PathElement::Asn(704), PathElement::Asn(47065)];
        assert_eq!(parse_path("704 47065").unwrap(), expected);
        assert_eq!(parse_path("704,47065").unwrap(), expected);
        assert_eq!(parse_path(" ,704 ,, 47065, ").unwrap(), expected);
        assert_eq!(parse_path("704\t\n47065").unwrap(), expected);
    }

    #[test]
    fn test_as_sets() {
        let got = parse_path("704 {34,35 36} 47065").unwrap();
        assert_eq!(
            got,
            vec![PathElement::Asn(704), set(&[34, 35, 36]), PathElement::Asn(47065)]
        );

        // duplicates collapse and member order is irrelevant
        let got = parse_path("{ 36, 35 35 34 }47065").unwrap();
        assert_eq!(got, vec![set(&[34, 35, 36]), PathElement::Asn(47065)]);

        // braces delimit tokens on their own
        let got = parse_path("704{34}{35}47065").unwrap();
        assert_eq!(
            got,
            vec![
                PathElement::Asn(704),
                set(&[34]),
                set(&[35]),
                PathElement::Asn(47065)
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_path("").unwrap(), vec![]);
        assert_eq!(parse_path(" , ").unwrap(), vec![]);
        assert_eq!(parse_path("{}").unwrap(), vec![set(&[])]);
    }

    #[test]
    fn test_invalid_tokens() {
        for bad in [
            "704 x 47065",
            "704 {34 35 47065",
            "704 34} 47065",
            "{34 {35}} 47065",
            "-704 47065",
            "99999999999 47065",
            "prepended",
        ] {
            match parse_path(bad) {
                Err(Error::InvalidToken { text, .. }) => {
                    assert_eq!(text, bad.trim())
                }
                other => panic!("{bad:?} parsed as {other:?}"),
            }
        }
    }
}
