//! Wire constants for the community side-channel.

/// Marker AS both peers tag their protocol communities with.
pub const DEFAULT_MARKER_AS: u16 = 23456;
/// Prefix announced by the opposing peer.
pub const DEFAULT_PREFIX: &str = "1.1.1.0/24";

/// Board edge used by the self test. Coordinates on the wire may go up to 15.
pub const BOARD_SIZE: u8 = 10;

pub const TYPE_BITS: u32 = 2;
pub const COUNTER_BITS: u32 = 14;
pub const COORD_BITS: u32 = 4;
pub const OUTCOME_BITS: u32 = 2;
pub const PAD_BITS: u32 = 2;

/// Type tag of the move counter fragment.
pub const TYPE_COUNTER: u8 = 1;
/// Type tag of the position fragment.
pub const TYPE_POSITION: u8 = 2;
