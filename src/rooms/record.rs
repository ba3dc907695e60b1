//! Persisted room record and its transitions.

use super::RoomError;
use derive_getters::Getters;
use neon_tictactoe::{Board, Mark, Outcome, Triple, evaluate_outcome, winning_triple};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Display name used when the host gives none.
pub const DEFAULT_HOST_NAME: &str = "Player 1";

/// Display name used when the guest gives none.
pub const DEFAULT_GUEST_NAME: &str = "Player 2";

/// Record shared by the two clients of a room.
///
/// Nothing guards concurrent writers: the last write wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct RoomRecord {
    board: Board,
    active_player_mark: Mark,
    host_mark: Mark,
    guest_mark: Mark,
    host_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    guest_name: Option<String>,
    is_active: bool,
    outcome: Option<Outcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    winning_triple: Option<Triple>,
    last_update_timestamp: i64,
}

/// Game part of a room record, as delivered to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    /// Board contents.
    pub board: Board,
    /// Mark due to move.
    pub active_mark: Mark,
    /// False once the game has an outcome.
    pub is_active: bool,
    /// Final result, if any.
    pub outcome: Option<Outcome>,
    /// Completed triple when the game was won.
    pub winning_triple: Option<Triple>,
}

impl RoomRecord {
    /// Fresh room with an empty board; the host holds the first-moving mark.
    #[instrument]
    pub fn new(host_name: &str, now: i64) -> Self {
        Self {
            board: Board::new(),
            active_player_mark: Mark::FIRST,
            host_mark: Mark::FIRST,
            guest_mark: Mark::FIRST.opponent(),
            host_name: display_name_or(host_name, DEFAULT_HOST_NAME),
            guest_name: None,
            is_active: true,
            outcome: None,
            winning_triple: None,
            last_update_timestamp: now,
        }
    }

    /// Fills the guest slot.
    ///
    /// # Errors
    ///
    /// Returns [`RoomError::RoomFull`] if a guest is already recorded.
    #[instrument(skip(self))]
    pub fn seat_guest(&mut self, guest_name: &str, now: i64) -> Result<(), RoomError> {
        if self.guest_name.is_some() {
            return Err(RoomError::RoomFull);
        }
        self.guest_name = Some(display_name_or(guest_name, DEFAULT_GUEST_NAME));
        self.touch(now);
        Ok(())
    }

    /// Empties the guest slot.
    pub fn clear_guest(&mut self, now: i64) {
        self.guest_name = None;
        self.touch(now);
    }

    /// Places `mark` at `index` on behalf of the participant holding `mark`.
    ///
    /// # Errors
    ///
    /// - [`RoomError::NotYourTurn`] if `mark` is not the active mark.
    /// - [`RoomError::InvalidMove`] if the game is over or the cell is not empty.
    #[instrument(skip(self), fields(active = %self.active_player_mark))]
    pub fn play(&mut self, index: usize, mark: Mark, now: i64) -> Result<(), RoomError> {
        if self.active_player_mark != mark {
            return Err(RoomError::NotYourTurn);
        }
        if !self.is_active || !self.board.place(index, mark) {
            return Err(RoomError::InvalidMove);
        }

        match evaluate_outcome(&self.board) {
            Some(outcome) => {
                debug!(%outcome, "Room game finished");
                self.is_active = false;
                self.outcome = Some(outcome);
                self.winning_triple = winning_triple(&self.board);
            }
            None => self.active_player_mark = mark.opponent(),
        }
        self.touch(now);
        Ok(())
    }

    /// Clears the board and outcome; the first-moving mark is due again.
    pub fn reset(&mut self, now: i64) {
        self.board = Board::new();
        self.active_player_mark = Mark::FIRST;
        self.is_active = true;
        self.outcome = None;
        self.winning_triple = None;
        self.touch(now);
    }

    /// Game part of the record.
    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            board: self.board,
            active_mark: self.active_player_mark,
            is_active: self.is_active,
            outcome: self.outcome,
            winning_triple: self.winning_triple,
        }
    }

    /// Stamps the record. The stamp always moves forward, even when the
    /// clock has not advanced since the previous write.
    fn touch(&mut self, now: i64) {
        self.last_update_timestamp = now.max(self.last_update_timestamp + 1);
    }
}

fn display_name_or(name: &str, fallback: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        fallback.to_string()
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_room_defaults() {
        let record = RoomRecord::new("  ", 100);
        assert_eq!(record.host_name(), DEFAULT_HOST_NAME);
        assert_eq!(*record.host_mark(), Mark::X);
        assert_eq!(*record.guest_mark(), Mark::O);
        assert_eq!(*record.active_player_mark(), Mark::X);
        assert!(record.guest_name().is_none());
        assert!(*record.is_active());
    }

    #[test]
    fn test_stamp_moves_forward_on_stalled_clock() {
        let mut record = RoomRecord::new("Ann", 100);
        record.seat_guest("Bob", 100).expect("seat");
        assert_eq!(*record.last_update_timestamp(), 101);
        record.play(4, Mark::X, 50).expect("play");
        assert_eq!(*record.last_update_timestamp(), 102);
        record.reset(500);
        assert_eq!(*record.last_update_timestamp(), 500);
    }

    #[test]
    fn test_second_guest_rejected() {
        let mut record = RoomRecord::new("Ann", 1);
        record.seat_guest("Bob", 2).expect("seat");
        assert!(matches!(record.seat_guest("Cid", 3), Err(RoomError::RoomFull)));
        assert_eq!(record.guest_name().as_deref(), Some("Bob"));
    }

    #[test]
    fn test_wrong_mark_leaves_record_untouched() {
        let mut record = RoomRecord::new("Ann", 1);
        let before = record.clone();
        assert!(matches!(record.play(0, Mark::O, 2), Err(RoomError::NotYourTurn)));
        assert_eq!(record, before);
    }

    #[test]
    fn test_win_finalizes_record() {
        let mut record = RoomRecord::new("Ann", 1);
        for (index, mark) in [(0, Mark::X), (3, Mark::O), (1, Mark::X), (4, Mark::O), (2, Mark::X)] {
            record.play(index, mark, 2).expect("legal move");
        }
        assert!(!*record.is_active());
        assert_eq!(*record.outcome(), Some(Outcome::Winner(Mark::X)));
        assert_eq!(*record.winning_triple(), Some([0, 1, 2]));
        assert_eq!(*record.active_player_mark(), Mark::X);
        assert!(matches!(record.play(5, Mark::X, 3), Err(RoomError::InvalidMove)));
    }

    #[test]
    fn test_record_json_shape() {
        let record = RoomRecord::new("Ann", 7);
        let json: serde_json::Value = serde_json::to_value(&record).expect("serialize");
        assert_eq!(json["activePlayerMark"], "X");
        assert_eq!(json["hostName"], "Ann");
        assert_eq!(json["lastUpdateTimestamp"], 7);
        assert!(json["outcome"].is_null());
        assert!(json.get("guestName").is_none());
        assert_eq!(json["board"].as_array().map(Vec::len), Some(9));
    }
}
