//! Local participant identity

use serde::{Deserialize, Serialize};

/// Name and room label the user joined with. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    name: String,
    room_id: String,
}

impl SessionIdentity {
    pub(crate) fn new(name: String, room_id: String) -> Self {
        Self { name, room_id }
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Uppercased room label
    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    /// Uppercased first character of the name, used for the avatar tile
    pub fn initial(&self) -> String {
        self.name
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial() {
        let identity = SessionIdentity::new("alice".to_string(), "ROOM1".to_string());
        assert_eq!(identity.initial(), "A");

        let identity = SessionIdentity::new("ørjan".to_string(), "ROOM1".to_string());
        assert_eq!(identity.initial(), "Ø");
    }
}
