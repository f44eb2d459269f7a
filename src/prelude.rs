//! Commonly used types and utilities for ease of import.

pub use crate::{
    decode_game_state, encode_communities, encode_game_state, Community, GameState,
    ProtocolError, SignalConfig, SignalError, SignalNode,
};

pub use crate::gateway::{in_memory::InMemoryGateway, AdvertisementGateway};
#[cfg(unix)]
pub use crate::gateway::bird::BirdGateway;
