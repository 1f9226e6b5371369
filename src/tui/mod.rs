//! Terminal wizard for sprout
//!
//! A four-page ratatui front end over the install supervisor: pick
//! package groups, run the privileged installation while watching its
//! output, and advance only once the attempt has settled.

mod app;
mod event;
pub mod theme;
mod ui;

pub use app::{App, InputMode, Page};
pub use theme::Theme;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, prelude::CrosstermBackend};
use std::io::{self, Stdout};

use crate::config::SproutConfig;

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the wizard
pub fn run(config: SproutConfig) -> Result<()> {
    let mut terminal = init_terminal()?;
    let mut app = App::new(config);

    let result = run_app(&mut terminal, &mut app);

    // Always restore terminal, even if the wizard errored
    restore_terminal(&mut terminal)?;

    result
}

fn run_app(terminal: &mut Tui, app: &mut App) -> Result<()> {
    while app.running {
        terminal.draw(|frame| ui::render(frame, app))?;
        event::handle_events(app)?;

        // Drain supervisor events once per tick
        app.tick();
    }
    Ok(())
}
