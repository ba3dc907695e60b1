//! Room operation errors.

use crate::store::StoreError;
use derive_more::{Display, Error};

/// Failure of a room operation. Local state is untouched when one is returned.
#[derive(Debug, Clone, Display, Error)]
pub enum RoomError {
    /// No readable record exists for the room.
    #[display("Room not found")]
    RoomNotFound,

    /// The guest slot is already taken.
    #[display("Room is full")]
    RoomFull,

    /// The room's active mark belongs to the other participant.
    #[display("Not your turn")]
    NotYourTurn,

    /// The game is over or the cell is taken.
    #[display("Invalid move")]
    InvalidMove,

    /// Only the room's creator may restart it.
    #[display("Only the host can restart the game")]
    OnlyHostCanRestart,

    /// This client holds no membership in the addressed room.
    #[display("Not in a room")]
    NotInRoom,

    /// The store rejected a write.
    #[display("{_0}")]
    Store(#[error(source)] StoreError),
}

impl From<StoreError> for RoomError {
    fn from(err: StoreError) -> Self {
        RoomError::Store(err)
    }
}
