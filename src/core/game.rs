//! The game state one peer advertises to the other.

use super::config::{COORD_BITS, COUNTER_BITS, OUTCOME_BITS};
use super::error::{Field, ProtocolError};

/// Opponent's last announced move, fully re-derived on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    /// Bumped by the announcing peer on every move.
    pub move_counter: u16,
    pub x: u8,
    pub y: u8,
    /// Result code for the previous move.
    pub outcome: u8,
}

impl GameState {
    /// Builds a state as given. Values too wide for their field are
    /// truncated when encoded.
    pub const fn new(move_counter: u16, x: u8, y: u8, outcome: u8) -> Self {
        Self {
            move_counter,
            x,
            y,
            outcome,
        }
    }

    /// Builds a state, rejecting any field that does not fit its width.
    pub fn checked(move_counter: u16, x: u8, y: u8, outcome: u8) -> Result<Self, ProtocolError> {
        let state = Self::new(move_counter, x, y, outcome);
        state.validate()?;
        Ok(state)
    }

    /// Returns the first field, in wire order, that would be truncated.
    pub fn validate(&self) -> Result<(), ProtocolError> {
        let fields = [
            (Field::MoveCounter, self.move_counter, COUNTER_BITS),
            (Field::X, u16::from(self.x), COORD_BITS),
            (Field::Y, u16::from(self.y), COORD_BITS),
            (Field::Outcome, u16::from(self.outcome), OUTCOME_BITS),
        ];
        for (field, value, width) in fields {
            if u32::from(value) >= 1u32 << width {
                return Err(ProtocolError::FieldOutOfRange {
                    field,
                    value,
                    width,
                });
            }
        }
        Ok(())
    }

    /// The state following this one: counter advanced (wrapping at 14 bits)
    /// with the new attack position and the outcome of the last move.
    pub fn next_move(&self, x: u8, y: u8, outcome: u8) -> Self {
        let counter = (u32::from(self.move_counter) + 1) % (1u32 << COUNTER_BITS);
        Self::new(counter as u16, x, y, outcome)
    }
}
