//! Community side-channel codec (no_std compatible)
//!
//! Pure packing and validation logic with no I/O. Everything that talks to
//! the routing daemon lives behind the `std` feature.

pub mod bits;
pub mod community;
pub mod config;
pub mod error;
pub mod game;
pub mod protocol;

// Re-export commonly used types
pub use bits::{BitReader, BitWriter, BitsError, Layout};
pub use community::{Community, CommunityParseError};
pub use config::*;
pub use error::{Field, Fragment, ProtocolError};
pub use game::GameState;
pub use protocol::{decode_game_state, encode_communities, encode_game_state, self_test, Mismatch};
