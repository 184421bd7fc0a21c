//! Position registry: the id <-> position bijection

use hashbrown::HashMap;

use crate::errors::SpatialError;
use crate::position::Position;

/// Bidirectional map between room ids and lattice positions
///
/// Enforces one room per position and one position per room. Rooms are
/// never removed; the registry only grows as the dungeon is explored.
#[derive(Debug, Clone, Default)]
pub struct PositionRegistry {
    by_id: HashMap<String, Position>,
    by_position: HashMap<Position, String>,
}

impl PositionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a room at a position
    ///
    /// Re-adding an identical (id, position) pair is a no-op. Registering
    /// an occupied position under a new id, or a known id at a new
    /// position, is a fatal logic error: the convergence check upstream
    /// should have resolved to the existing room instead.
    pub fn add_room(&mut self, id: &str, position: Position) -> Result<(), SpatialError> {
        if let Some(existing) = self.by_id.get(id) {
            if *existing == position {
                return Ok(());
            }
            return Err(SpatialError::DuplicateId {
                id: id.to_string(),
                existing: *existing,
                requested: position,
            });
        }
        if let Some(occupant) = self.by_position.get(&position) {
            return Err(SpatialError::DuplicatePosition {
                id: id.to_string(),
                occupant: occupant.clone(),
                position,
            });
        }
        self.by_id.insert(id.to_string(), position);
        self.by_position.insert(position, id.to_string());
        Ok(())
    }

    /// Get the position of a room
    pub fn position_of(&self, id: &str) -> Option<Position> {
        self.by_id.get(id).copied()
    }

    /// Get the room at a position
    pub fn room_at(&self, position: Position) -> Option<&str> {
        self.by_position.get(&position).map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Iterate over all (id, position) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, Position)> {
        self.by_id.iter().map(|(id, pos)| (id.as_str(), *pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_lookup() {
        let mut reg = PositionRegistry::new();
        reg.add_room("start", Position::ORIGIN).unwrap();
        assert_eq!(reg.position_of("start"), Some(Position::ORIGIN));
        assert_eq!(reg.room_at(Position::ORIGIN), Some("start"));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_readd_identical_pair_is_noop() {
        let mut reg = PositionRegistry::new();
        reg.add_room("start", Position::ORIGIN).unwrap();
        reg.add_room("start", Position::ORIGIN).unwrap();
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_duplicate_position_rejected() {
        let mut reg = PositionRegistry::new();
        reg.add_room("start", Position::ORIGIN).unwrap();
        let err = reg.add_room("other", Position::ORIGIN).unwrap_err();
        assert!(matches!(err, SpatialError::DuplicatePosition { .. }));
        // Failed insert leaves no trace
        assert!(!reg.contains("other"));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut reg = PositionRegistry::new();
        reg.add_room("start", Position::ORIGIN).unwrap();
        let err = reg.add_room("start", Position::new(1, 0, 0)).unwrap_err();
        assert!(matches!(err, SpatialError::DuplicateId { .. }));
        assert_eq!(reg.position_of("start"), Some(Position::ORIGIN));
    }

    #[test]
    fn test_bijection_holds() {
        let mut reg = PositionRegistry::new();
        reg.add_room("start", Position::ORIGIN).unwrap();
        reg.add_room("n1", Position::new(0, 1, 0)).unwrap();
        reg.add_room("e1", Position::new(1, 0, 0)).unwrap();
        for (id, pos) in reg.iter() {
            assert_eq!(reg.room_at(pos), Some(id));
        }
    }
}
