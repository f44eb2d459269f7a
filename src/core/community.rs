//! Standard BGP community values and their `(asn,data)` text form.

use core::fmt;
use core::str::FromStr;

use thiserror::Error;

/// A `(AS, Data)` community pair as carried on a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Community {
    pub asn: u16,
    pub data: u16,
}

impl Community {
    pub const fn new(asn: u16, data: u16) -> Self {
        Self { asn, data }
    }
}

impl fmt::Display for Community {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.asn, self.data)
    }
}

/// Errors parsing a community tuple.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CommunityParseError {
    #[error("not a (asn,data) tuple")]
    Malformed,
    /// Digits were well formed but a half does not fit 16 bits.
    #[error("community half out of 16-bit range")]
    OutOfRange,
}

impl FromStr for Community {
    type Err = CommunityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s
            .trim()
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or(CommunityParseError::Malformed)?;
        let (asn, data) = inner.split_once(',').ok_or(CommunityParseError::Malformed)?;
        Ok(Community::new(parse_half(asn)?, parse_half(data)?))
    }
}

fn parse_half(digits: &str) -> Result<u16, CommunityParseError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CommunityParseError::Malformed);
    }
    digits.parse().map_err(|_| CommunityParseError::OutOfRange)
}

/// Finds every `(digits,digits)` tuple in free-form text, in order.
///
/// Parenthesised text of any other shape (extended or large communities,
/// prose) is passed over. Tuples of the right shape whose numbers exceed
/// 16 bits are yielded as `Err(OutOfRange)` so the caller can report them.
pub fn scan(text: &str) -> Scan<'_> {
    Scan { text, pos: 0 }
}

#[derive(Debug, Clone)]
pub struct Scan<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Iterator for Scan<'a> {
    type Item = Result<Community, CommunityParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.text.as_bytes();
        while let Some(offset) = self.text[self.pos..].find('(') {
            let open = self.pos + offset;
            self.pos = open + 1;
            let Some(len) = tuple_len(&bytes[open..]) else {
                continue;
            };
            self.pos = open + len;
            match self.text[open..open + len].parse::<Community>() {
                Ok(c) => return Some(Ok(c)),
                Err(CommunityParseError::OutOfRange) => {
                    return Some(Err(CommunityParseError::OutOfRange))
                }
                Err(CommunityParseError::Malformed) => continue,
            }
        }
        self.pos = self.text.len();
        None
    }
}

/// Length of a `(digits,digits)` run starting at `bytes[0] == b'('`.
fn tuple_len(bytes: &[u8]) -> Option<usize> {
    let mut i = 1;
    let digits = |i: &mut usize| {
        let start = *i;
        while bytes.get(*i).is_some_and(u8::is_ascii_digit) {
            *i += 1;
        }
        *i > start
    };
    if !digits(&mut i) || bytes.get(i) != Some(&b',') {
        return None;
    }
    i += 1;
    if !digits(&mut i) || bytes.get(i) != Some(&b')') {
        return None;
    }
    Some(i + 1)
}
