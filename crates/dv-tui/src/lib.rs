//! dv-tui: terminal explorer for the delver dungeon engine
//!
//! A thin ratatui shell over `dv-core`: one navigator, one player,
//! movement keys. All spatial logic lives in the core crate.

pub mod app;
pub mod input;

pub use app::App;
pub use input::{key_to_command, Command};
