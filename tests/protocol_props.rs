use bgp_battleship::{
    decode_game_state, encode_communities, encode_game_state, Community, Fragment, GameState,
    ProtocolError, DEFAULT_MARKER_AS,
};
use proptest::prelude::*;

const MARKER: u16 = DEFAULT_MARKER_AS;

fn game_state() -> impl Strategy<Value = GameState> {
    (0u16..16384, 0u8..16, 0u8..16, 0u8..4)
        .prop_map(|(counter, x, y, outcome)| GameState::new(counter, x, y, outcome))
}

fn foreign_community() -> impl Strategy<Value = Community> {
    (any::<u16>().prop_filter("not the marker", |asn| *asn != MARKER), any::<u16>())
        .prop_map(|(asn, data)| Community::new(asn, data))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Encoding then decoding a state gives the same state back.
    #[test]
    fn state_survives_encode_decode(state in game_state()) {
        let (counter, position) = encode_game_state(&state);
        let communities = [Community::new(MARKER, counter), Community::new(MARKER, position)];
        prop_assert_eq!(decode_game_state(&communities, MARKER), Ok(state));
    }

    /// Communities on other AS numbers never change the result, wherever they sit.
    #[test]
    fn foreign_communities_are_ignored(
        state in game_state(),
        noise in proptest::collection::vec(foreign_community(), 0..8),
        split in 0usize..8,
    ) {
        let mut communities = noise.clone();
        let [position, counter] = encode_communities(&state, MARKER);
        communities.insert(split.min(communities.len()), position);
        communities.push(counter);
        prop_assert_eq!(decode_game_state(&communities, MARKER), Ok(state));
    }

    /// Two counter fragments fail regardless of their payload.
    #[test]
    fn two_counters_are_a_duplicate(a in 0u16..16384, b in 0u16..16384, state in game_state()) {
        let (_, position) = encode_game_state(&state);
        let counter = |v: u16| Community::new(MARKER, 0x4000 | v);
        let communities = [counter(a), Community::new(MARKER, position), counter(b)];
        prop_assert_eq!(
            decode_game_state(&communities, MARKER),
            Err(ProtocolError::DuplicateFragment(Fragment::Counter))
        );
    }

    /// Two position fragments fail regardless of their payload.
    #[test]
    fn two_positions_are_a_duplicate(a in 0u16..16384, b in 0u16..16384) {
        let position = |v: u16| Community::new(MARKER, 0x8000 | v);
        prop_assert_eq!(
            decode_game_state(&[position(a), position(b)], MARKER),
            Err(ProtocolError::DuplicateFragment(Fragment::Position))
        );
    }

    /// Type tags 0 and 3 are rejected outright.
    #[test]
    fn unknown_type_tags_fail(low in 0u16..16384, high_tag in any::<bool>(), state in game_state()) {
        let tag: u16 = if high_tag { 3 } else { 0 };
        let [position, counter] = encode_communities(&state, MARKER);
        let bad = Community::new(MARKER, (tag << 14) | low);
        prop_assert_eq!(
            decode_game_state(&[position, counter, bad], MARKER),
            Err(ProtocolError::InvalidType(tag as u8))
        );
    }

    /// A single fragment is never enough.
    #[test]
    fn single_fragment_is_incomplete(state in game_state()) {
        let [position, counter] = encode_communities(&state, MARKER);
        prop_assert_eq!(
            decode_game_state(&[counter], MARKER),
            Err(ProtocolError::IncompleteState { counter: true, position: false })
        );
        prop_assert_eq!(
            decode_game_state(&[position], MARKER),
            Err(ProtocolError::IncompleteState { counter: false, position: true })
        );
    }
}

#[test]
fn concrete_move_round_trips_next_to_unrelated_community() {
    let state = GameState::new(1, 3, 7, 0);
    let first = encode_game_state(&state);
    let second = encode_game_state(&state);
    assert_eq!(first, second);

    let (counter, position) = first;
    let communities = [
        Community::new(MARKER, counter),
        Community::new(65000, 0),
        Community::new(MARKER, position),
    ];
    assert_eq!(decode_game_state(&communities, MARKER), Ok(state));
}

#[test]
fn fragments_on_wrong_marker_do_not_count() {
    let [position, counter] = encode_communities(&GameState::new(9, 1, 1, 1), 65000);
    assert_eq!(
        decode_game_state(&[position, counter], MARKER),
        Err(ProtocolError::IncompleteState {
            counter: false,
            position: false
        })
    );
}

// Boundary behaviour: out-of-range values wrap into their bit width.
#[test]
fn oversized_fields_wrap_on_encode() {
    let zero = encode_game_state(&GameState::new(0, 0, 0, 0));
    assert_eq!(encode_game_state(&GameState::new(16384, 0, 0, 0)).0, zero.0);
    assert_eq!(encode_game_state(&GameState::new(0, 16, 0, 0)).1, zero.1);
    assert_eq!(encode_game_state(&GameState::new(0, 0, 16, 4)).1, zero.1);
}
