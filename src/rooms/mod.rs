//! Two-participant rooms replicated through a shared store.
//!
//! A room is a single [`RoomRecord`] under a namespaced key. Clients mutate
//! it with plain read-modify-write and learn about each other's writes by
//! polling: a tick reports a change whenever the record's timestamp is newer
//! than the last one the client observed. There is no push channel and no
//! lock, so two nearly simultaneous writes can lose one of them.

mod error;
mod link;
mod poller;
mod record;
mod service;

pub use error::RoomError;
pub use link::{
    ROOM_ID_ALPHABET, ROOM_ID_LENGTH, ROOM_KEY_PREFIX, generate_room_id, is_room_id,
    room_id_from_path, room_key, share_url,
};
pub use poller::{DEFAULT_POLL_INTERVAL, PollHandle, Role, RoomUpdate};
pub use record::{DEFAULT_GUEST_NAME, DEFAULT_HOST_NAME, RoomRecord, RoomSnapshot};
pub use service::{JoinInfo, RoomInfo, RoomSyncService, SyncConfig};
