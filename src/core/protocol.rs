//! Encoding game state into, and recovering it from, marker communities.
//!
//! Two community types are defined on the marker AS:
//!
//! ```text
//! Type 1: move counter
//! +-------------------------------+
//! |T|T|Z|Z|Z|Z|Z|Z|Z|Z|Z|Z|Z|Z|Z|Z|
//! +-------------------------------+
//!
//! Type 2: attack position and outcome of the previous move
//! +-------------------------------+
//! |T|T|X|X|X|X|-|-|Y|Y|Y|Y|S|S|-|-|
//! +-------------------------------+
//! ```
//!
//! Any other type tag on the marker AS invalidates the whole read.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use super::bits::{self, BitsError, Layout};
use super::community::Community;
use super::config::{
    COORD_BITS, COUNTER_BITS, OUTCOME_BITS, PAD_BITS, TYPE_BITS, TYPE_COUNTER, TYPE_POSITION,
};
use super::error::{Fragment, ProtocolError};
use super::game::GameState;

const COUNTER_LAYOUT: Layout<2> = Layout::new([TYPE_BITS, COUNTER_BITS]);
const POSITION_LAYOUT: Layout<6> = Layout::new([
    TYPE_BITS,
    COORD_BITS,
    PAD_BITS,
    COORD_BITS,
    OUTCOME_BITS,
    PAD_BITS,
]);

#[inline]
fn type_tag(data: u16) -> u8 {
    // Every layout starts with the tag, so any of them can read it.
    COUNTER_LAYOUT.unpack(data)[0] as u8
}

/// Rebuilds the opponent's game state from the communities on its route.
///
/// Only communities tagged with `marker_as` are considered. Each fragment
/// type must appear exactly once; an unknown type tag aborts the scan.
pub fn decode_game_state<'a, I>(communities: I, marker_as: u16) -> Result<GameState, ProtocolError>
where
    I: IntoIterator<Item = &'a Community>,
{
    let mut counter: Option<u16> = None;
    let mut position: Option<(u8, u8, u8)> = None;

    for community in communities.into_iter().filter(|c| c.asn == marker_as) {
        match type_tag(community.data) {
            TYPE_COUNTER => {
                if counter.is_some() {
                    return Err(ProtocolError::DuplicateFragment(Fragment::Counter));
                }
                let [_, value] = COUNTER_LAYOUT.unpack(community.data);
                counter = Some(value);
            }
            TYPE_POSITION => {
                if position.is_some() {
                    return Err(ProtocolError::DuplicateFragment(Fragment::Position));
                }
                let [_, x, _, y, outcome, _] = POSITION_LAYOUT.unpack(community.data);
                position = Some((x as u8, y as u8, outcome as u8));
            }
            other => return Err(ProtocolError::InvalidType(other)),
        }
    }

    match (counter, position) {
        (Some(move_counter), Some((x, y, outcome))) => {
            Ok(GameState::new(move_counter, x, y, outcome))
        }
        (counter, position) => Err(ProtocolError::IncompleteState {
            counter: counter.is_some(),
            position: position.is_some(),
        }),
    }
}

/// Encodes a state as `(counter, position)` payloads. Fields wider than
/// their slot are truncated.
pub fn encode_game_state(state: &GameState) -> (u16, u16) {
    let counter = COUNTER_LAYOUT.pack([u16::from(TYPE_COUNTER), state.move_counter]);
    let position = POSITION_LAYOUT.pack([
        u16::from(TYPE_POSITION),
        u16::from(state.x),
        0,
        u16::from(state.y),
        u16::from(state.outcome),
        0,
    ]);
    (counter, position)
}

/// Encodes a state as marker-tagged communities, position first.
pub fn encode_communities(state: &GameState, marker_as: u16) -> [Community; 2] {
    let (counter, position) = encode_game_state(state);
    [
        Community::new(marker_as, position),
        Community::new(marker_as, counter),
    ]
}

/// A coordinate that did not survive an encode/decode cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch {
    pub sent: (u8, u8),
    pub got: (u8, u8),
}

/// Encodes every square of a `board_size`×`board_size` board and reads the
/// coordinates back with the streaming codec. Returns every square that
/// came back different.
pub fn self_test(board_size: u8) -> Result<Vec<Mismatch>, BitsError> {
    let mut mismatches = Vec::new();
    for x in 0..board_size {
        for y in 0..board_size {
            let (_, position) = encode_game_state(&GameState::new(1, x, y, 0));
            let mut reader = bits::BitReader::new(position);
            let tag = reader.read(TYPE_BITS)?;
            let got_x = reader.read(COORD_BITS)? as u8;
            reader.skip(PAD_BITS)?;
            let got_y = reader.read(COORD_BITS)? as u8;
            if tag != u16::from(TYPE_POSITION) || (got_x, got_y) != (x, y) {
                mismatches.push(Mismatch {
                    sent: (x, y),
                    got: (got_x, got_y),
                });
            }
        }
    }
    Ok(mismatches)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKER: u16 = 23456;

    fn tagged(data: u16) -> Community {
        Community::new(MARKER, data)
    }

    #[test]
    fn known_payloads() {
        // 01 00000000000001
        // 10 0011 00 0111 00 00
        let (counter, position) = encode_game_state(&GameState::new(1, 3, 7, 0));
        assert_eq!(counter, 0x4001);
        assert_eq!(position, 0b1000_1100_0111_0000);
    }

    #[test]
    fn decode_ignores_order_and_foreign_communities() {
        let state = GameState::new(42, 9, 2, 1);
        let (counter, position) = encode_game_state(&state);
        let communities = [
            tagged(position),
            Community::new(65000, 0),
            Community::new(65001, 0xffff),
            tagged(counter),
        ];
        assert_eq!(decode_game_state(&communities, MARKER), Ok(state));
    }

    #[test]
    fn padding_bits_are_ignored_on_decode() {
        let (counter, position) = encode_game_state(&GameState::new(5, 1, 2, 3));
        let dirty = position | 0b0000_0011_0000_0011;
        let decoded = decode_game_state(&[tagged(counter), tagged(dirty)], MARKER).unwrap();
        assert_eq!(decoded, GameState::new(5, 1, 2, 3));
    }

    #[test]
    fn duplicate_position_beats_missing_counter() {
        let (_, position) = encode_game_state(&GameState::default());
        assert_eq!(
            decode_game_state(&[tagged(position), tagged(position)], MARKER),
            Err(ProtocolError::DuplicateFragment(Fragment::Position))
        );
    }

    #[test]
    fn invalid_type_stops_scan_before_later_duplicates() {
        let (counter, _) = encode_game_state(&GameState::default());
        let communities = [tagged(0xc000), tagged(counter), tagged(counter)];
        assert_eq!(
            decode_game_state(&communities, MARKER),
            Err(ProtocolError::InvalidType(3))
        );
    }

    #[test]
    fn empty_input_is_incomplete() {
        assert_eq!(
            decode_game_state(&[] as &[Community], MARKER),
            Err(ProtocolError::IncompleteState {
                counter: false,
                position: false
            })
        );
    }

    #[test]
    fn communities_come_out_position_first() {
        let [first, second] = encode_communities(&GameState::new(1, 3, 7, 0), MARKER);
        assert_eq!(first, tagged(0b1000_1100_0111_0000));
        assert_eq!(second, tagged(0x4001));
    }

    #[test]
    fn self_test_is_clean_on_full_coordinate_range() {
        assert_eq!(self_test(16).unwrap(), Vec::new());
    }
}
