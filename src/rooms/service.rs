//! Client-side room synchronization over a shared store.

use super::poller::{Membership, PollCursor, SharedCursor, load_record, poll_tick};
use super::{
    PollHandle, Role, RoomError, RoomRecord, RoomSnapshot, RoomUpdate, generate_room_id,
    room_key, share_url,
};
use crate::store::RoomStore;
use derive_getters::Getters;
use neon_tictactoe::Mark;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Settings of a [`RoomSyncService`].
#[derive(Debug, Clone, Getters)]
pub struct SyncConfig {
    /// Period between poll ticks.
    poll_interval: Duration,
    /// Base URL used to build share links.
    share_base_url: String,
}

impl SyncConfig {
    /// Creates a configuration.
    pub fn new(poll_interval: Duration, share_base_url: impl Into<String>) -> Self {
        Self {
            poll_interval,
            share_base_url: share_base_url.into(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new(super::DEFAULT_POLL_INTERVAL, "http://localhost:3000")
    }
}

/// Returned to the host by [`RoomSyncService::create_room`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomInfo {
    /// Identifier of the new room.
    pub room_id: String,
    /// The host's mark.
    pub mark: Mark,
    /// Always true for a created room.
    pub is_host: bool,
    /// Link a guest can open to join.
    pub share_url: String,
}

/// Returned to the guest by [`RoomSyncService::join_room`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinInfo {
    /// Identifier of the joined room.
    pub room_id: String,
    /// The guest's mark.
    pub mark: Mark,
    /// Display name of the room's host.
    pub host_name: String,
    /// Game as it stood when the guest was seated.
    pub snapshot: RoomSnapshot,
}

/// One client's view of the shared rooms.
///
/// Each client owns its own service: the membership (room, role, mark) and
/// the poll cursor live here, while the room itself lives in the store
/// where any client may overwrite it.
#[derive(Debug)]
pub struct RoomSyncService {
    store: Arc<dyn RoomStore>,
    config: SyncConfig,
    rng: SmallRng,
    membership: Option<Membership>,
    cursor: SharedCursor,
    poller: Option<PollHandle>,
}

impl RoomSyncService {
    /// Creates a service over `store`.
    #[instrument(skip(store))]
    pub fn new(store: Arc<dyn RoomStore>, config: SyncConfig) -> Self {
        Self {
            store,
            config,
            rng: SmallRng::from_os_rng(),
            membership: None,
            cursor: Arc::new(Mutex::new(PollCursor::default())),
            poller: None,
        }
    }

    /// Replaces the random source used for room identifiers.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    /// Room this client belongs to, if any.
    pub fn room_id(&self) -> Option<&str> {
        self.membership.as_ref().map(|m| m.room_id.as_str())
    }

    /// This client's role in its room.
    pub fn role(&self) -> Option<Role> {
        self.membership.as_ref().map(|m| m.role)
    }

    /// True when this client created its room.
    pub fn is_host(&self) -> bool {
        self.role() == Some(Role::Host)
    }

    /// This client's mark in its room.
    pub fn mark(&self) -> Option<Mark> {
        self.membership.as_ref().map(|m| m.mark)
    }

    /// Opponent's display name as last observed.
    pub fn opponent_name(&self) -> Option<String> {
        self.cursor().opponent_name.clone()
    }

    /// True while a poll task is running.
    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(|p| !p.is_finished())
    }

    /// Creates a room with this client as host.
    ///
    /// Any previous membership is left after the new room is written.
    ///
    /// # Errors
    ///
    /// Returns [`RoomError::Store`] if the record cannot be written.
    #[instrument(skip(self))]
    pub fn create_room(&mut self, host_name: &str) -> Result<RoomInfo, RoomError> {
        let room_id = generate_room_id(&mut self.rng);
        let record = RoomRecord::new(host_name, now_millis());
        self.save(&room_id, &record)?;

        self.leave_previous();
        let mark = *record.host_mark();
        self.enter(
            Membership {
                room_id: room_id.clone(),
                role: Role::Host,
                mark,
            },
            PollCursor {
                last_seen: *record.last_update_timestamp(),
                opponent_name: None,
            },
        );

        info!(room_id = %room_id, host = %record.host_name(), "Room created");
        Ok(RoomInfo {
            share_url: share_url(self.config.share_base_url(), &room_id),
            room_id,
            mark,
            is_host: true,
        })
    }

    /// Joins an existing room as guest.
    ///
    /// Joining the room this client is already in writes nothing and reports
    /// the current seat, so a host cannot seat itself as its own guest.
    ///
    /// # Errors
    ///
    /// - [`RoomError::RoomNotFound`] if no readable record exists.
    /// - [`RoomError::RoomFull`] if a guest is already recorded.
    /// - [`RoomError::Store`] if the record cannot be written.
    #[instrument(skip(self))]
    pub fn join_room(&mut self, room_id: &str, guest_name: &str) -> Result<JoinInfo, RoomError> {
        if let Ok(membership) = self.member_of(room_id) {
            let mark = membership.mark;
            let record = load_record(self.store.as_ref(), room_id)?;
            debug!(room_id, %mark, "Already in this room");
            return Ok(JoinInfo {
                room_id: room_id.to_string(),
                mark,
                host_name: record.host_name().clone(),
                snapshot: record.snapshot(),
            });
        }

        let mut record = load_record(self.store.as_ref(), room_id)?;
        if let Err(e) = record.seat_guest(guest_name, now_millis()) {
            warn!(room_id, "Room already has a guest");
            return Err(e);
        }
        self.save(room_id, &record)?;

        self.leave_previous();
        let mark = *record.guest_mark();
        let host_name = record.host_name().clone();
        self.enter(
            Membership {
                room_id: room_id.to_string(),
                role: Role::Guest,
                mark,
            },
            PollCursor {
                last_seen: *record.last_update_timestamp(),
                opponent_name: Some(host_name.clone()),
            },
        );

        info!(room_id, host = %host_name, "Joined room");
        Ok(JoinInfo {
            room_id: room_id.to_string(),
            mark,
            host_name,
            snapshot: record.snapshot(),
        })
    }

    /// Plays this client's mark at `index`.
    ///
    /// Read-modify-write without any guard: a concurrent write by the other
    /// client between the read and the write is silently lost.
    ///
    /// # Errors
    ///
    /// - [`RoomError::NotInRoom`] if this client is not in `room_id`.
    /// - [`RoomError::RoomNotFound`] if the record is gone.
    /// - [`RoomError::NotYourTurn`] if the room's active mark is not ours.
    /// - [`RoomError::InvalidMove`] if the game is over or the cell is taken.
    /// - [`RoomError::Store`] if the record cannot be written.
    #[instrument(skip(self))]
    pub fn apply_move(&mut self, room_id: &str, index: usize) -> Result<RoomSnapshot, RoomError> {
        let mark = self.member_of(room_id)?.mark;
        let mut record = load_record(self.store.as_ref(), room_id)?;
        if let Err(e) = record.play(index, mark, now_millis()) {
            warn!(room_id, index, %mark, error = %e, "Move rejected");
            return Err(e);
        }
        self.save(room_id, &record)?;

        debug!(room_id, index, %mark, outcome = ?record.outcome(), "Move written");
        Ok(record.snapshot())
    }

    /// Starts a fresh game in the room. Host only.
    ///
    /// # Errors
    ///
    /// - [`RoomError::NotInRoom`] if this client is not in `room_id`.
    /// - [`RoomError::OnlyHostCanRestart`] if this client is the guest.
    /// - [`RoomError::RoomNotFound`] if the record is gone.
    /// - [`RoomError::Store`] if the record cannot be written.
    #[instrument(skip(self))]
    pub fn restart_room(&mut self, room_id: &str) -> Result<RoomSnapshot, RoomError> {
        if self.member_of(room_id)?.role != Role::Host {
            warn!(room_id, "Guest tried to restart");
            return Err(RoomError::OnlyHostCanRestart);
        }
        let mut record = load_record(self.store.as_ref(), room_id)?;
        record.reset(now_millis());
        self.save(room_id, &record)?;

        info!(room_id, "Room restarted");
        Ok(record.snapshot())
    }

    /// Leaves the room and stops polling.
    ///
    /// The host deletes the record, ending the room for both sides; the
    /// guest only empties its slot. Membership is dropped even when the
    /// store write fails.
    ///
    /// # Errors
    ///
    /// - [`RoomError::NotInRoom`] if this client is not in `room_id`.
    /// - [`RoomError::Store`] if the store write fails.
    #[instrument(skip(self))]
    pub fn leave_room(&mut self, room_id: &str) -> Result<(), RoomError> {
        self.member_of(room_id)?;
        self.stop_polling();
        let Some(membership) = self.membership.take() else {
            return Err(RoomError::NotInRoom);
        };
        *self.cursor() = PollCursor::default();

        match membership.role {
            Role::Host => {
                self.store.remove(&room_key(room_id))?;
                info!(room_id, "Room deleted");
            }
            Role::Guest => match load_record(self.store.as_ref(), room_id) {
                Ok(mut record) => {
                    record.clear_guest(now_millis());
                    self.save(room_id, &record)?;
                    info!(room_id, "Left room");
                }
                Err(_) => debug!(room_id, "Room already gone"),
            },
        }
        Ok(())
    }

    /// Starts polling the room every configured interval.
    ///
    /// Replaces any running poll task. `on_update` runs on the Tokio
    /// runtime; this must be called from within one.
    ///
    /// # Errors
    ///
    /// Returns [`RoomError::NotInRoom`] if this client is not in `room_id`.
    #[instrument(skip(self, on_update))]
    pub fn poll_for_updates<F>(&mut self, room_id: &str, on_update: F) -> Result<(), RoomError>
    where
        F: FnMut(RoomUpdate) + Send + 'static,
    {
        let membership = self.member_of(room_id)?.clone();
        self.stop_polling();
        self.poller = Some(PollHandle::spawn(
            Arc::clone(&self.store),
            membership,
            Arc::clone(&self.cursor),
            *self.config.poll_interval(),
            on_update,
        ));
        Ok(())
    }

    /// Runs one poll tick now and returns its updates.
    ///
    /// Shares the cursor with the background task, so an update is reported
    /// by whichever reads it first.
    ///
    /// # Errors
    ///
    /// Returns [`RoomError::NotInRoom`] if this client is in no room.
    pub fn poll_once(&mut self) -> Result<Vec<RoomUpdate>, RoomError> {
        let membership = self.membership.clone().ok_or(RoomError::NotInRoom)?;
        let tick = poll_tick(self.store.as_ref(), &membership, &mut self.cursor());
        if tick.stop {
            self.stop_polling();
        }
        Ok(tick.updates)
    }

    /// Stops the poll task, if one is running.
    pub fn stop_polling(&mut self) {
        if let Some(mut poller) = self.poller.take() {
            poller.stop();
        }
    }

    fn member_of(&self, room_id: &str) -> Result<&Membership, RoomError> {
        self.membership
            .as_ref()
            .filter(|m| m.room_id == room_id)
            .ok_or(RoomError::NotInRoom)
    }

    fn enter(&mut self, membership: Membership, cursor: PollCursor) {
        self.membership = Some(membership);
        *self.cursor() = cursor;
    }

    fn leave_previous(&mut self) {
        if let Some(previous) = self.membership.as_ref().map(|m| m.room_id.clone())
            && let Err(e) = self.leave_room(&previous)
        {
            warn!(room_id = %previous, error = %e, "Failed to leave previous room");
        }
    }

    fn save(&self, room_id: &str, record: &RoomRecord) -> Result<(), RoomError> {
        let json = serde_json::to_string(record)
            .map_err(|e| crate::store::StoreError::new(format!("Failed to encode room: {}", e)))?;
        self.store.write(&room_key(room_id), &json)?;
        Ok(())
    }

    fn cursor(&self) -> MutexGuard<'_, PollCursor> {
        self.cursor.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
