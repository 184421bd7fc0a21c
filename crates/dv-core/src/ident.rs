//! Room identifier synthesis
//!
//! Ids encode the room's offset from the origin as direction-letter +
//! magnitude segments with no separators: two north and one east is
//! `"n2e1"`. The format is stable (external consumers display the
//! leading letter); anything needing more than the leading direction
//! should use the registry instead of parsing ids.

use crate::direction::Direction;
use crate::position::Position;

/// Synthesize a deterministic id for a position
///
/// Axis order is fixed: north/south, then east/west, then up/down. The
/// all-zero position degenerates to `"room_<depth>"`; past the origin
/// that never happens, since the origin cell is always occupied.
///
/// Pure function: callers are responsible for checking the registry for
/// an occupant first - synthesis is only invoked for genuinely new
/// positions.
pub fn synthesize_id(position: Position, depth: u32) -> String {
    let mut id = String::new();

    let mut push_axis = |magnitude: i32, positive: Direction, negative: Direction| {
        use core::fmt::Write;
        if magnitude > 0 {
            let _ = write!(id, "{}{}", positive.letter(), magnitude);
        } else if magnitude < 0 {
            let _ = write!(id, "{}{}", negative.letter(), magnitude.unsigned_abs());
        }
    };

    push_axis(position.y, Direction::North, Direction::South);
    push_axis(position.x, Direction::East, Direction::West);
    push_axis(position.z, Direction::Up, Direction::Down);

    if id.is_empty() {
        format!("room_{depth}")
    } else {
        id
    }
}

/// The leading direction letter of a synthesized id, if any
///
/// This is the sanctioned accessor for display callers that used to
/// parse the id string themselves. Fallback ids (`room_<depth>`) have no
/// leading direction.
pub fn leading_direction(id: &str) -> Option<Direction> {
    let first = id.chars().next()?;
    let dir = Direction::from_letter(first)?;
    // Require a magnitude digit so words like "start" don't parse as
    // south.
    match id.chars().nth(1) {
        Some(c) if c.is_ascii_digit() => Some(dir),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_order_and_format() {
        assert_eq!(synthesize_id(Position::new(1, 2, 0), 3), "n2e1");
        assert_eq!(synthesize_id(Position::new(-1, 0, 0), 1), "w1");
        assert_eq!(synthesize_id(Position::new(0, -3, 2), 5), "s3u2");
        assert_eq!(synthesize_id(Position::new(2, 1, -1), 4), "n1e2d1");
    }

    #[test]
    fn test_zero_offset_falls_back_to_depth() {
        assert_eq!(synthesize_id(Position::ORIGIN, 0), "room_0");
        assert_eq!(synthesize_id(Position::ORIGIN, 7), "room_7");
    }

    #[test]
    fn test_determinism() {
        let a = synthesize_id(Position::new(4, -2, 1), 9);
        let b = synthesize_id(Position::new(4, -2, 1), 9);
        assert_eq!(a, b);
    }

    #[test]
    fn test_leading_direction() {
        assert_eq!(leading_direction("n2e1"), Some(Direction::North));
        assert_eq!(leading_direction("w1"), Some(Direction::West));
        assert_eq!(leading_direction("d3"), Some(Direction::Down));
        assert_eq!(leading_direction("start"), None);
        assert_eq!(leading_direction("room_4"), None);
        assert_eq!(leading_direction(""), None);
    }
}
