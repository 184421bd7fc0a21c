//! ASCII map projection
//!
//! Renders a bounded 2D view of the explored graph, centered on the
//! player. The vertical axis is collapsed: rooms on different z layers
//! project onto the same cell (a deliberate simplification). Rendering
//! only reads the graph.

use crate::direction::Direction;
use crate::navigator::{Navigator, ORIGIN_ID};
use crate::position::Position;

/// Glyphs used by the projector
#[derive(Debug, Clone)]
pub struct MapStyle {
    pub player: char,
    pub origin: char,
    pub visited: char,
    pub unvisited: char,
    pub corridor_h: char,
    pub corridor_v: char,
    pub empty: char,
    pub title: String,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            player: '@',
            origin: 'S',
            visited: '■',
            unvisited: '?',
            corridor_h: '─',
            corridor_v: '│',
            empty: ' ',
            title: "DUNGEON MAP".to_string(),
        }
    }
}

// Cell precedence, low to high. Later passes only write over lower
// ranks, so z-stacked rooms and crossing corridors resolve the same way
// every render.
const RANK_EMPTY: u8 = 0;
const RANK_CORRIDOR: u8 = 1;
const RANK_UNVISITED: u8 = 2;
const RANK_VISITED: u8 = 3;
const RANK_ORIGIN: u8 = 4;
const RANK_PLAYER: u8 = 5;

/// Bounded, player-centered map renderer
#[derive(Debug, Clone, Default)]
pub struct MapProjector {
    style: MapStyle,
}

struct Grid {
    width: usize,
    height: usize,
    glyphs: Vec<char>,
    ranks: Vec<u8>,
}

impl Grid {
    fn new(width: usize, height: usize, empty: char) -> Self {
        Self {
            width,
            height,
            glyphs: vec![empty; width * height],
            ranks: vec![RANK_EMPTY; width * height],
        }
    }

    /// Write a glyph if the cell's current occupant ranks strictly lower
    fn put(&mut self, x: i64, y: i64, glyph: char, rank: u8) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        if self.ranks[idx] < rank {
            self.glyphs[idx] = glyph;
            self.ranks[idx] = rank;
        }
    }

    fn rank_at(&self, x: i64, y: i64) -> Option<u8> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(self.ranks[y as usize * self.width + x as usize])
    }

    fn row(&self, y: usize) -> String {
        self.glyphs[y * self.width..(y + 1) * self.width]
            .iter()
            .collect()
    }
}

impl MapProjector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(style: MapStyle) -> Self {
        Self { style }
    }

    /// Render a `width` x `height` view centered on `player`
    ///
    /// Unknown player ids fall back to an origin-centered view without a
    /// player marker.
    pub fn render(
        &self,
        nav: &Navigator,
        width: usize,
        height: usize,
        player: &str,
    ) -> String {
        let style = &self.style;
        let mut grid = Grid::new(width, height, style.empty);

        let center_x = (width / 2) as i64;
        let center_y = (height / 2) as i64;
        let player_pos = nav.position_of(player);
        let anchor = player_pos.unwrap_or(Position::ORIGIN);

        // Grid rows grow southward: +y (north) is up on screen
        let cell_of = |pos: Position| -> (i64, i64) {
            (
                center_x + i64::from(pos.x - anchor.x),
                center_y - i64::from(pos.y - anchor.y),
            )
        };

        // Rooms
        for (id, pos) in nav.rooms() {
            let (gx, gy) = cell_of(pos);
            let (glyph, rank) = if id == player && player_pos.is_some() {
                (style.player, RANK_PLAYER)
            } else if id == ORIGIN_ID {
                if nav.is_visited(id) {
                    (style.origin, RANK_ORIGIN)
                } else {
                    (style.unvisited, RANK_UNVISITED)
                }
            } else if nav.is_visited(id) {
                (style.visited, RANK_VISITED)
            } else {
                (style.unvisited, RANK_UNVISITED)
            };
            grid.put(gx, gy, glyph, rank);
        }

        // Corridors between visited neighbors, drawn only into empty
        // cells and never over a room or another corridor
        for (id, pos) in nav.rooms() {
            if !nav.is_visited(id) {
                continue;
            }
            let (gx, gy) = cell_of(pos);
            for (dir, to) in nav.connections_of(id) {
                if dir.is_vertical() || !nav.is_visited(to) {
                    continue;
                }
                let (dx, dy, _) = dir.delta();
                let (cx, cy) = (gx + i64::from(dx), gy - i64::from(dy));
                if grid.rank_at(cx, cy) == Some(RANK_EMPTY) {
                    let glyph = match dir {
                        Direction::East | Direction::West => style.corridor_h,
                        _ => style.corridor_v,
                    };
                    grid.put(cx, cy, glyph, RANK_CORRIDOR);
                }
            }
        }

        self.frame(&grid)
    }

    fn frame(&self, grid: &Grid) -> String {
        let style = &self.style;
        let inner = grid.width + 2;
        let border: String = "═".repeat(inner);

        let mut out = Vec::with_capacity(grid.height + 12);
        out.push(format!("╔{border}╗"));
        out.push(format!("║{}║", center_text(&style.title, inner)));
        out.push(format!("╠{border}╣"));
        for y in 0..grid.height {
            out.push(format!("║ {} ║", grid.row(y)));
        }
        out.push(format!("╚{border}╝"));

        out.push(String::new());
        out.push("LEGEND:".to_string());
        out.push(format!("  {} = You are here", style.player));
        out.push(format!("  {} = Starting room", style.origin));
        out.push(format!("  {} = Visited room", style.visited));
        out.push(format!("  {} = Known room", style.unvisited));
        out.push(format!(
            "  {}{} = Passages",
            style.corridor_h, style.corridor_v
        ));

        out.join("\n")
    }
}

fn center_text(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let left = (width - len) / 2;
    let right = width - len - left;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}
