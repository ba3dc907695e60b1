//! Periodic room polling.

use super::{RoomError, RoomRecord, RoomSnapshot, room_key};
use crate::store::RoomStore;
use neon_tictactoe::Mark;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, instrument, warn};

/// Polling interval used when none is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Change observed by a poll tick.
#[derive(Debug, Clone)]
pub enum RoomUpdate {
    /// A guest took the empty slot (host side only).
    PlayerJoined {
        /// The guest's display name.
        opponent_name: String,
    },
    /// The guest slot was emptied (host side only).
    PlayerLeft,
    /// The record changed; carries the current game.
    StateUpdate {
        /// Game part of the record.
        snapshot: RoomSnapshot,
        /// Whether the record's active mark is this client's mark.
        is_my_turn: bool,
    },
    /// The record disappeared or became unreadable. Polling stops.
    Error(RoomError),
}

/// Participant side within a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Created the room; may restart and delete it.
    Host,
    /// Joined an existing room.
    Guest,
}

/// This client's seat in a room.
#[derive(Debug, Clone)]
pub(crate) struct Membership {
    pub(crate) room_id: String,
    pub(crate) role: Role,
    pub(crate) mark: Mark,
}

/// What this client has already seen of the room.
#[derive(Debug, Default)]
pub(crate) struct PollCursor {
    pub(crate) last_seen: i64,
    pub(crate) opponent_name: Option<String>,
}

pub(crate) type SharedCursor = Arc<Mutex<PollCursor>>;

/// Reads a record, treating missing, unreadable and unparsable records alike.
pub(crate) fn load_record(store: &dyn RoomStore, room_id: &str) -> Result<RoomRecord, RoomError> {
    let raw = match store.read(&room_key(room_id)) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Err(RoomError::RoomNotFound),
        Err(e) => {
            warn!(room_id, error = %e, "Room record unreadable");
            return Err(RoomError::RoomNotFound);
        }
    };
    serde_json::from_str(&raw).map_err(|e| {
        warn!(room_id, error = %e, "Room record malformed");
        RoomError::RoomNotFound
    })
}

/// Result of one poll tick.
#[derive(Debug, Default)]
pub(crate) struct Tick {
    pub(crate) updates: Vec<RoomUpdate>,
    pub(crate) stop: bool,
}

/// Reads the record once and reports what changed since the cursor.
#[instrument(level = "debug", skip(store, cursor), fields(room_id = %membership.room_id))]
pub(crate) fn poll_tick(
    store: &dyn RoomStore,
    membership: &Membership,
    cursor: &mut PollCursor,
) -> Tick {
    let record = match load_record(store, &membership.room_id) {
        Ok(record) => record,
        Err(e) => {
            info!("Room gone, polling stops");
            return Tick {
                updates: vec![RoomUpdate::Error(e)],
                stop: true,
            };
        }
    };

    let stamp = *record.last_update_timestamp();
    if stamp <= cursor.last_seen {
        return Tick::default();
    }
    cursor.last_seen = stamp;

    let mut updates = Vec::new();
    match membership.role {
        Role::Host => {
            let guest = record.guest_name().clone();
            if guest != cursor.opponent_name {
                match &guest {
                    Some(name) => {
                        info!(opponent = %name, "Guest joined");
                        updates.push(RoomUpdate::PlayerJoined {
                            opponent_name: name.clone(),
                        });
                    }
                    None => {
                        info!("Guest left");
                        updates.push(RoomUpdate::PlayerLeft);
                    }
                }
                cursor.opponent_name = guest;
            }
        }
        Role::Guest => {
            if cursor.opponent_name.is_none() {
                cursor.opponent_name = Some(record.host_name().clone());
            }
        }
    }

    let is_my_turn = *record.active_player_mark() == membership.mark;
    debug!(stamp, is_my_turn, "Room changed");
    updates.push(RoomUpdate::StateUpdate {
        snapshot: record.snapshot(),
        is_my_turn,
    });

    Tick {
        updates,
        stop: false,
    }
}

/// Handle to a running poll task bound to one room membership.
///
/// Stopping is idempotent and also happens on drop. A tick already running
/// when the handle stops may still deliver its updates.
#[derive(Debug)]
pub struct PollHandle {
    room_id: String,
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    /// Spawns the poll task. Must be called inside a Tokio runtime.
    pub(crate) fn spawn<F>(
        store: Arc<dyn RoomStore>,
        membership: Membership,
        cursor: SharedCursor,
        period: Duration,
        mut on_update: F,
    ) -> Self
    where
        F: FnMut(RoomUpdate) + Send + 'static,
    {
        let room_id = membership.room_id.clone();
        info!(room_id = %room_id, period_ms = period.as_millis() as u64, "Polling started");

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick fires immediately; the first read waits one period.
            interval.tick().await;

            loop {
                interval.tick().await;
                let tick = {
                    let mut cursor = cursor.lock().unwrap_or_else(PoisonError::into_inner);
                    poll_tick(store.as_ref(), &membership, &mut cursor)
                };
                for update in tick.updates {
                    on_update(update);
                }
                if tick.stop {
                    break;
                }
            }
        });

        Self {
            room_id,
            task: Some(task),
        }
    }

    /// Room this handle polls.
    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    /// True once the task has ended, either stopped or after the room vanished.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Cancels the task. Later calls do nothing.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            info!(room_id = %self.room_id, "Polling stopped");
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
