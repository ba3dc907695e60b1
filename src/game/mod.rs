//! Local game state: one player's view of a game, against the computer or
//! mirrored from a shared room.

mod machine;
mod reply;
mod snapshot;

pub use machine::{GameStateMachine, MoveResult, ReplyToken};
pub use reply::{DEFAULT_COMPUTER_DELAY, SharedGame, schedule_computer_reply};
pub use snapshot::{GameMode, GameOptions, GameSnapshot, GameStatus};
