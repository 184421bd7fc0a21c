//! Application state and main UI controller

use std::collections::HashMap;

use crossterm::event::{Event, KeyEventKind};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction as LayoutDirection, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use dv_core::{DelveRng, Direction, ExitPolicy, MapProjector, Navigator, ORIGIN_ID};

use crate::input::{key_to_command, Command};

/// Application state
pub struct App {
    nav: Navigator,
    projector: MapProjector,
    /// Room the player is in
    here: String,
    /// Direction the player last traveled
    came_from: Option<Direction>,
    /// Offered-but-not-yet-instantiated exits per room
    offered: HashMap<String, Vec<Direction>>,
    /// Most recent status message
    message: String,
    map_width: usize,
    map_height: usize,
    max_exits: u32,
    should_quit: bool,
}

impl App {
    pub fn new(seed: u64, map_width: usize, map_height: usize, max_exits: u32) -> Self {
        let mut nav = Navigator::with_policy(ExitPolicy::default(), DelveRng::new(seed));
        let mut offered = HashMap::new();
        let origin_exits = nav
            .generate_logical_exits(ORIGIN_ID, max_exits, None)
            .unwrap_or_default();
        offered.insert(ORIGIN_ID.to_string(), origin_exits);

        Self {
            nav,
            projector: MapProjector::new(),
            here: ORIGIN_ID.to_string(),
            came_from: None,
            offered,
            message: "You stand at the entrance. Passages wait in the dark.".to_string(),
            map_width,
            map_height,
            max_exits,
            should_quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Translate a terminal event into a command
    pub fn handle_event(&self, event: Event) -> Option<Command> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => key_to_command(key),
            _ => None,
        }
    }

    /// Apply a command to the world
    pub fn execute(&mut self, command: Command) {
        match command {
            Command::Move(dir) => self.try_move(dir),
            Command::Validate => {
                let report = self.nav.validate_connections();
                self.message = if report.is_clean() {
                    "The dungeon's geometry holds together.".to_string()
                } else {
                    format!("Validation found {} issue(s).", report.len())
                };
            }
            Command::Repair => {
                let installed = self.nav.fix_connections();
                self.message = format!("Repaired {installed} connection(s).");
            }
            Command::Quit => self.should_quit = true,
        }
    }

    fn try_move(&mut self, dir: Direction) {
        // An existing connection is always traversable
        if let Some(next) = self.nav.connection(&self.here, dir) {
            let next = next.to_string();
            self.enter(next, dir);
            return;
        }

        // An offered exit materializes on first use
        let is_offered = self
            .offered
            .get(&self.here)
            .is_some_and(|dirs| dirs.contains(&dir));
        if !is_offered {
            // Blocked moves are a normal outcome, not an error
            self.message = format!("You can't go {dir} from here.");
            return;
        }

        let depth = self.nav.depth_of(&self.here).unwrap_or(0) + 1;
        match self.nav.generate_connected_room(&self.here, dir, depth) {
            Ok(next) => {
                if let Some(dirs) = self.offered.get_mut(&self.here) {
                    dirs.retain(|d| *d != dir);
                }
                self.enter(next, dir);
            }
            Err(err) => {
                self.message = format!("The passage refuses to open: {err}");
            }
        }
    }

    fn enter(&mut self, next: String, dir: Direction) {
        let first_visit = !self.nav.is_visited(&next);
        let _ = self.nav.mark_visited(&next);
        self.here = next;
        self.came_from = Some(dir);

        if first_visit {
            let exits = self
                .nav
                .generate_logical_exits(&self.here, self.max_exits, Some(dir))
                .unwrap_or_default();
            self.offered.insert(self.here.clone(), exits);
        }

        let depth = self.nav.depth_of(&self.here).unwrap_or(0);
        self.message = format!("You move {dir}. Depth {depth}.");
    }

    /// Directions the player can take from here: real connections plus
    /// offered exits, in fixed order
    fn available_exits(&self) -> Vec<Direction> {
        let offered = self.offered.get(&self.here);
        Direction::ALL
            .into_iter()
            .filter(|d| {
                self.nav.connection(&self.here, *d).is_some()
                    || offered.is_some_and(|dirs| dirs.contains(d))
            })
            .collect()
    }

    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(LayoutDirection::Vertical)
            .constraints([
                Constraint::Min(10),
                Constraint::Length(4),
                Constraint::Length(3),
            ])
            .split(frame.area());

        let map = self
            .projector
            .render(&self.nav, self.map_width, self.map_height, &self.here);
        frame.render_widget(Paragraph::new(map), chunks[0]);

        let position = self
            .nav
            .position_of(&self.here)
            .map(|p| p.to_string())
            .unwrap_or_default();
        let exits: Vec<String> = self
            .available_exits()
            .iter()
            .map(ToString::to_string)
            .collect();
        let status = vec![
            Line::from(vec![
                Span::styled("Room: ", Style::default().fg(Color::DarkGray)),
                Span::raw(self.here.clone()),
                Span::styled("  Position: ", Style::default().fg(Color::DarkGray)),
                Span::raw(position),
                Span::styled("  Rooms known: ", Style::default().fg(Color::DarkGray)),
                Span::raw(self.nav.len().to_string()),
            ]),
            Line::from(vec![
                Span::styled("Exits: ", Style::default().fg(Color::DarkGray)),
                Span::raw(if exits.is_empty() {
                    "none".to_string()
                } else {
                    exits.join(", ")
                }),
            ]),
        ];
        frame.render_widget(
            Paragraph::new(status).block(Block::default().borders(Borders::ALL).title("Status")),
            chunks[1],
        );

        frame.render_widget(
            Paragraph::new(self.message.clone())
                .block(Block::default().borders(Borders::ALL).title("Messages")),
            chunks[2],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_app_starts_at_origin() {
        let app = App::new(42, 21, 15, 3);
        assert_eq!(app.here, ORIGIN_ID);
        assert!(!app.should_quit());
    }

    #[test]
    fn test_blocked_move_keeps_position() {
        // Origin exits are seeded from the policy; find a direction that
        // is neither connected nor offered
        let mut app = App::new(42, 21, 15, 3);
        let blocked = Direction::ALL
            .into_iter()
            .find(|d| !app.available_exits().contains(d));
        if let Some(dir) = blocked {
            app.execute(Command::Move(dir));
            assert_eq!(app.here, ORIGIN_ID);
            assert!(app.message.contains("can't go"));
        }
    }

    #[test]
    fn test_taking_an_offered_exit_moves_and_marks_visited() {
        let mut app = App::new(42, 21, 15, 3);
        let dir = app.available_exits()[0];
        app.execute(Command::Move(dir));
        assert_ne!(app.here, ORIGIN_ID);
        assert!(app.nav.is_visited(&app.here));
        // The way back exists immediately
        assert_eq!(
            app.nav.connection(&app.here, dir.opposite()),
            Some(ORIGIN_ID)
        );
    }

    #[test]
    fn test_backtracking_returns_to_origin() {
        let mut app = App::new(42, 21, 15, 3);
        let dir = app.available_exits()[0];
        app.execute(Command::Move(dir));
        app.execute(Command::Move(dir.opposite()));
        assert_eq!(app.here, ORIGIN_ID);
        assert_eq!(app.nav.len(), 2);
    }

    #[test]
    fn test_quit_command() {
        let mut app = App::new(42, 21, 15, 3);
        app.execute(Command::Quit);
        assert!(app.should_quit());
    }

    #[test]
    fn test_validate_reports_clean_world() {
        let mut app = App::new(42, 21, 15, 3);
        let dir = app.available_exits()[0];
        app.execute(Command::Move(dir));
        app.execute(Command::Validate);
        assert!(app.message.contains("holds together"));
    }
}
