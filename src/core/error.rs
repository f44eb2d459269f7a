//! Errors raised while reading or building a game state from communities.

use core::fmt;

use thiserror::Error;

/// The two halves of a game state, each carried by one community.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fragment {
    Counter,
    Position,
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fragment::Counter => write!(f, "counter"),
            Fragment::Position => write!(f, "position"),
        }
    }
}

/// A `GameState` field, named for range errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    MoveCounter,
    X,
    Y,
    Outcome,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::MoveCounter => write!(f, "move counter"),
            Field::X => write!(f, "x"),
            Field::Y => write!(f, "y"),
            Field::Outcome => write!(f, "outcome"),
        }
    }
}

/// Errors produced by the community protocol.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// The same fragment type was advertised twice on the marker AS.
    #[error("duplicate {0} fragment in advertisement")]
    DuplicateFragment(Fragment),
    /// A marker community carried a type tag other than counter or position.
    #[error("invalid community type {0}")]
    InvalidType(u8),
    /// At least one fragment was missing after a full scan.
    #[error("incomplete state (counter seen: {counter}, position seen: {position})")]
    IncompleteState { counter: bool, position: bool },
    /// A field value does not fit its bit width.
    #[error("{field} value {value} does not fit in {width} bits")]
    FieldOutOfRange { field: Field, value: u16, width: u32 },
}

impl ProtocolError {
    /// Whether re-reading later may succeed: the peer simply has not
    /// advertised a full state yet.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProtocolError::IncompleteState { .. })
    }
}
