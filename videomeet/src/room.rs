//! Lobby form and the join transition

use crate::config::DEFAULT_ROOM_ID_LENGTH;
use crate::participant::SessionIdentity;
use rand::Rng;
use tracing::{debug, info};

const BASE36_DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a random base-36 room label of `length` characters, uppercased
pub fn generate_room_id(length: usize) -> String {
    let mut rng = rand::thread_rng();
    let token: String = (0..length)
        .map(|_| BASE36_DIGITS[rng.gen_range(0..BASE36_DIGITS.len())] as char)
        .collect();
    token.to_uppercase()
}

/// Name and room inputs collected before joining
#[derive(Debug, Clone)]
pub struct Lobby {
    name: String,
    room_id: String,
    room_id_length: usize,
}

impl Default for Lobby {
    fn default() -> Self {
        Self::new(DEFAULT_ROOM_ID_LENGTH)
    }
}

impl Lobby {
    /// Empty lobby generating room ids of `room_id_length` characters
    pub fn new(room_id_length: usize) -> Self {
        Self {
            name: String::new(),
            room_id: String::new(),
            room_id_length,
        }
    }

    /// Set the name as typed
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Set the room id; input is uppercased as it is typed
    pub fn set_room_id(&mut self, room_id: &str) {
        self.room_id = room_id.to_uppercase();
    }

    /// Name as typed
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Room id as typed (uppercased)
    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    /// Whether the join action is enabled
    pub fn can_join(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Whether joining will create a room rather than join an entered one
    pub fn creates_new_room(&self) -> bool {
        self.room_id.is_empty()
    }

    /// Resolve the identity to join with.
    ///
    /// Returns `None` without side effects when the trimmed name is empty.
    /// A blank room id is replaced by a generated one.
    pub fn join(&mut self) -> Option<SessionIdentity> {
        if !self.can_join() {
            debug!("Join ignored: name is empty");
            return None;
        }

        let requested = self.room_id.trim();
        let room_id = if requested.is_empty() {
            let generated = generate_room_id(self.room_id_length);
            debug!("Generated room id {}", generated);
            generated
        } else {
            requested.to_uppercase()
        };
        self.room_id = room_id.clone();

        let name = self.name.trim().to_string();
        info!("🚪 {} joining room {}", name, room_id);
        Some(SessionIdentity::new(name, room_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_room_token(id: &str, length: usize) -> bool {
        id.len() == length
            && id
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
    }

    #[test]
    fn test_generate_room_id_shape() {
        for _ in 0..200 {
            let id = generate_room_id(9);
            assert!(is_room_token(&id, 9), "bad room id {}", id);
        }
        assert!(is_room_token(&generate_room_id(4), 4));
    }

    #[test]
    fn test_room_input_is_uppercased() {
        let mut lobby = Lobby::default();
        lobby.set_room_id("abc123");
        assert_eq!(lobby.room_id(), "ABC123");
        assert!(!lobby.creates_new_room());
    }

    #[test]
    fn test_join_requires_name() {
        let mut lobby = Lobby::default();
        assert!(!lobby.can_join());
        assert!(lobby.join().is_none());

        lobby.set_name("   \t");
        assert!(!lobby.can_join());
        assert!(lobby.join().is_none());
        assert_eq!(lobby.room_id(), "");
    }

    #[test]
    fn test_join_keeps_user_room() {
        let mut lobby = Lobby::default();
        lobby.set_name("Bob");
        lobby.set_room_id("  abc123 ");

        let identity = lobby.join().unwrap();
        assert_eq!(identity.name(), "Bob");
        assert_eq!(identity.room_id(), "ABC123");
    }

    #[test]
    fn test_join_generates_room() {
        let mut lobby = Lobby::default();
        lobby.set_name("Alice");
        assert!(lobby.creates_new_room());

        let identity = lobby.join().unwrap();
        assert!(is_room_token(identity.room_id(), 9));
        assert_eq!(lobby.room_id(), identity.room_id());
    }

    #[test]
    fn test_whitespace_room_is_blank() {
        let mut lobby = Lobby::new(6);
        lobby.set_name("Carol");
        lobby.set_room_id("   ");

        let identity = lobby.join().unwrap();
        assert!(is_room_token(identity.room_id(), 6));
    }
}
