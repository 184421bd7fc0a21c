//! delver - explore an endless, self-consistent dungeon
//!
//! Main entry point for the terminal explorer.

use std::io;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event, execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use dv_tui::App;

/// Explore an endless, self-consistent dungeon
#[derive(Parser, Debug)]
#[command(name = "delver")]
#[command(author, version, about = "delver - explore the depths", long_about = None)]
struct Args {
    /// World seed (random if omitted)
    #[arg(long = "seed")]
    seed: Option<u64>,

    /// Map view width in cells
    #[arg(long = "width", default_value_t = 21)]
    width: usize,

    /// Map view height in cells
    #[arg(long = "height", default_value_t = 15)]
    height: usize,

    /// Maximum fresh exits offered per room
    #[arg(long = "max-exits", default_value_t = 3)]
    max_exits: u32,
}

fn main() -> io::Result<()> {
    let args = Args::parse();
    let seed = args
        .seed
        .unwrap_or_else(|| dv_rng::DelveRng::from_entropy().seed());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(seed, args.width, args.height, args.max_exits);

    // Main loop
    let result = loop {
        if let Err(e) = terminal.draw(|frame| app.render(frame)) {
            break Err(e);
        }

        match event::poll(Duration::from_millis(100)) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if let Some(command) = app.handle_event(ev) {
                        app.execute(command);
                    }
                }
                Err(e) => break Err(e),
            },
            Ok(false) => {}
            Err(e) => break Err(e),
        }

        if app.should_quit() {
            break Ok(());
        }
    };

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
