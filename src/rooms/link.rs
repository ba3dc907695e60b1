//! Room identifiers, store keys and shareable links.

use rand::Rng;

/// Length of a generated room identifier.
pub const ROOM_ID_LENGTH: usize = 6;

/// Characters room identifiers are drawn from.
pub const ROOM_ID_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Namespace prepended to room ids to form store keys.
pub const ROOM_KEY_PREFIX: &str = "neon-ttt-room-";

/// Draws a random room identifier. Collisions with existing rooms are not
/// checked.
pub fn generate_room_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..ROOM_ID_LENGTH)
        .map(|_| char::from(ROOM_ID_ALPHABET[rng.random_range(0..ROOM_ID_ALPHABET.len())]))
        .collect()
}

/// Store key holding the record of `room_id`.
pub fn room_key(room_id: &str) -> String {
    format!("{ROOM_KEY_PREFIX}{room_id}")
}

/// Link a host hands to a guest.
pub fn share_url(base_url: &str, room_id: &str) -> String {
    format!("{}/room/{}", base_url.trim_end_matches('/'), room_id)
}

/// Extracts a room id from a link, a `/room/<id>` path, a `?room=<id>` query
/// or a bare id.
pub fn room_id_from_path(input: &str) -> Option<String> {
    let input = input.trim();
    let (path, query) = match input.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (input, None),
    };

    let mut segments = path.split('/').filter(|s| !s.is_empty());
    while let Some(segment) = segments.next() {
        if segment == "room"
            && let Some(id) = segments.next().filter(|id| is_room_id(id))
        {
            return Some(id.to_string());
        }
    }

    if let Some(query) = query {
        let from_query = query
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "room")
            .map(|(_, value)| value)
            .filter(|id| is_room_id(id));
        if let Some(id) = from_query {
            return Some(id.to_string());
        }
    }

    is_room_id(input).then(|| input.to_string())
}

/// True for non-empty ASCII alphanumeric strings.
pub fn is_room_id(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn test_generated_ids_use_alphabet() {
        let mut rng = SmallRng::seed_from_u64(11);
        for _ in 0..50 {
            let id = generate_room_id(&mut rng);
            assert_eq!(id.len(), ROOM_ID_LENGTH);
            assert!(id.bytes().all(|b| ROOM_ID_ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn test_share_url_round_trips_through_parser() {
        let url = share_url("http://localhost:3000/", "aB3dE9");
        assert_eq!(url, "http://localhost:3000/room/aB3dE9");
        assert_eq!(room_id_from_path(&url).as_deref(), Some("aB3dE9"));
    }

    #[test]
    fn test_room_id_from_query_and_bare_id() {
        assert_eq!(
            room_id_from_path("http://host/?room=Zz9Zz9").as_deref(),
            Some("Zz9Zz9")
        );
        assert_eq!(room_id_from_path("Qw3rty").as_deref(), Some("Qw3rty"));
        assert_eq!(room_id_from_path("/lobby"), None);
        assert_eq!(room_id_from_path("/room/"), None);
    }
}
