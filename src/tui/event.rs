//! Event handling for the wizard

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;

use super::app::{App, InputMode, Page};

const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Handle all input events
pub fn handle_events(app: &mut App) -> Result<()> {
    if event::poll(POLL_TIMEOUT)? {
        match event::read()? {
            Event::Key(key) => handle_key_event(app, key),
            Event::Resize(_, _) => {} // Terminal will redraw automatically
            _ => {}
        }
    }
    Ok(())
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    // The password modal swallows everything
    if app.input_mode == InputMode::Password {
        handle_password_mode(app, key);
        return;
    }

    app.status = None;

    // Global keys
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.quit();
            return;
        }
        KeyCode::Char('t') if app.page != Page::Packages => {
            // On the packages page `t` belongs to the custom-entry field
            app.cycle_theme();
            return;
        }
        _ => {}
    }

    match app.page {
        Page::Welcome => handle_welcome(app, key),
        Page::Packages => handle_packages(app, key),
        Page::Install => handle_install(app, key),
        Page::Done => handle_done(app, key),
    }
}

fn handle_welcome(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('n') => app.next_page(),
        _ => {}
    }
}

fn handle_packages(app: &mut App, key: KeyEvent) {
    // Typing lands in the custom-entry field while the cursor is on it
    if app.on_custom_row() {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.custom_push(c);
                return;
            }
            KeyCode::Backspace => {
                app.custom_pop();
                return;
            }
            _ => {}
        }
    }

    match key.code {
        KeyCode::Esc => app.prev_page(),
        KeyCode::Char('q') => app.quit(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Char(' ') => app.toggle_selection(),
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('n') => app.next_page(),
        KeyCode::Left => app.prev_page(),
        _ => {}
    }
}

fn handle_install(app: &mut App, key: KeyEvent) {
    match key.code {
        // Esc cancels a running attempt, otherwise steps back
        KeyCode::Esc => {
            if app.is_installing() {
                app.cancel_install();
            } else {
                app.prev_page();
            }
        }
        KeyCode::Enter => {
            if app.supervisor.is_advance_allowed() && !app.is_installing() {
                app.next_page();
            } else {
                app.open_password_modal();
            }
        }
        KeyCode::Char('r') => {
            // Retry after a settled or dismissed attempt
            if app.can_start() {
                app.open_password_modal();
            }
        }
        KeyCode::Right | KeyCode::Char('n') => app.next_page(),
        KeyCode::Left => app.prev_page(),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_output_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_output_up(),
        KeyCode::Char('q') => app.quit(),
        _ => {}
    }
}

fn handle_done(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter | KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Left => app.prev_page(),
        _ => {}
    }
}

fn handle_password_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.dismiss_password(),
        KeyCode::Enter => app.submit_password(),
        KeyCode::Backspace => {
            app.password_input.pop();
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.dismiss_password()
        }
        KeyCode::Char(c) => app.password_input.push(c),
        _ => {}
    }
}
