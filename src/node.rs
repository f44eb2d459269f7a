#![cfg(feature = "std")]

use thiserror::Error;
use tokio::time::{sleep, Duration};

use crate::config::SignalConfig;
use crate::core::{decode_game_state, encode_game_state, GameState, ProtocolError};
use crate::gateway::AdvertisementGateway;

/// Failure reading or writing the side-channel.
#[derive(Debug, Error)]
pub enum SignalError {
    /// The advertisement was malformed, incomplete, or a state was out of range.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    /// The routing daemon could not be reached or refused the request.
    #[error("transport error: {0:#}")]
    Transport(anyhow::Error),
}

impl SignalError {
    /// `IncompleteState` and transport failures may clear up on their own;
    /// duplicate or unknown fragments point at a broken peer.
    pub fn is_retryable(&self) -> bool {
        match self {
            SignalError::Protocol(e) => e.is_retryable(),
            SignalError::Transport(_) => true,
        }
    }
}

/// One peer's end of the side-channel: reads the opponent's route and
/// publishes our own.
pub struct SignalNode {
    gateway: Box<dyn AdvertisementGateway>,
    config: SignalConfig,
}

impl SignalNode {
    pub fn new(gateway: Box<dyn AdvertisementGateway>, config: SignalConfig) -> Self {
        Self { gateway, config }
    }

    /// Fetches the opponent's communities and decodes them.
    pub async fn read_opponent(&mut self) -> Result<GameState, SignalError> {
        let communities = self
            .gateway
            .fetch_communities(&self.config.prefix)
            .await
            .map_err(SignalError::Transport)?;
        let state = decode_game_state(&communities, self.config.marker_as)?;
        log::debug!("opponent state on {}: {:?}", self.config.prefix, state);
        Ok(state)
    }

    /// Publishes `state`, truncating any field wider than its slot.
    pub async fn announce(&mut self, state: &GameState) -> Result<(), SignalError> {
        let (counter, position) = encode_game_state(state);
        self.gateway
            .publish(self.config.marker_as, counter, position)
            .await
            .map_err(SignalError::Transport)?;
        log::info!(
            "announced move {} at ({}, {}) outcome {}",
            state.move_counter,
            state.x,
            state.y,
            state.outcome
        );
        Ok(())
    }

    /// Publishes `state` only if every field fits; nothing is sent otherwise.
    pub async fn announce_checked(&mut self, state: &GameState) -> Result<(), SignalError> {
        state.validate()?;
        self.announce(state).await
    }

    /// Removes our protocol communities from the announcement.
    pub async fn reset(&mut self) -> Result<(), SignalError> {
        self.gateway.reset().await.map_err(SignalError::Transport)
    }

    /// Polls until the opponent shows a move counter other than `last_counter`.
    ///
    /// An incomplete advertisement counts as "no move yet". Every other
    /// error is returned immediately. There is no timeout; wrap the future in
    /// `tokio::time::timeout` to bound the wait.
    pub async fn wait_for_move(
        &mut self,
        last_counter: Option<u16>,
        poll: Duration,
    ) -> Result<GameState, SignalError> {
        loop {
            match self.read_opponent().await {
                Ok(state) if Some(state.move_counter) != last_counter => return Ok(state),
                Ok(_) => {}
                Err(SignalError::Protocol(ProtocolError::IncompleteState { .. })) => {
                    log::debug!("opponent has not advertised a full state yet");
                }
                Err(e) => return Err(e),
            }
            sleep(poll).await;
        }
    }
}
