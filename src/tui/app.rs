//! Application state for the wizard

use crate::catalog::Catalog;
use crate::config::SproutConfig;
use crate::credential::{Credential, ProvidedCredential};
use crate::supervisor::{InstallPhase, InstallSupervisor};

use super::theme::Theme;

/// Wizard pages, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Welcome,
    Packages,
    Install,
    Done,
}

/// Input focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// The password modal is open
    Password,
}

pub struct App {
    pub running: bool,
    pub page: Page,
    pub input_mode: InputMode,
    pub config: SproutConfig,
    pub catalog: Catalog,
    pub supervisor: InstallSupervisor,

    // Packages page
    /// Cursor over the group rows plus one trailing custom-entry row
    pub cursor: usize,
    pub checked: Vec<bool>,
    pub custom_input: String,

    // Install page
    pub password_input: String,
    pub transcript_scroll: usize,
    /// Stick to the newest output until the user scrolls up
    pub follow_output: bool,

    pub status: Option<String>,
}

impl App {
    pub fn new(config: SproutConfig) -> Self {
        let catalog = config.catalog();
        let checked = vec![false; catalog.groups().len()];
        let supervisor = InstallSupervisor::new(config.supervision.supervisor_config());
        App {
            running: true,
            page: Page::Welcome,
            input_mode: InputMode::Normal,
            config,
            catalog,
            supervisor,
            cursor: 0,
            checked,
            custom_input: String::new(),
            password_input: String::new(),
            transcript_scroll: 0,
            follow_output: true,
            status: None,
        }
    }

    pub fn quit(&mut self) {
        // Leaving mid-install counts as cancelling it
        self.supervisor.cancel();
        self.running = false;
    }

    /// Called once per event-loop tick
    pub fn tick(&mut self) {
        self.supervisor.pump();
    }

    pub fn theme(&self) -> Theme {
        self.config.tui.theme.theme()
    }

    pub fn cycle_theme(&mut self) {
        let next = self.config.tui.theme.next();
        self.config.set_theme(next);
        if let Err(e) = self.config.save() {
            self.status = Some(format!("Theme not saved: {e}"));
        } else {
            self.status = Some(format!("Theme: {}", next.theme().name));
        }
    }

    // ==================== Navigation ====================

    /// Forward navigation; the install page is gated
    pub fn next_page(&mut self) {
        self.page = match self.page {
            Page::Welcome => Page::Packages,
            Page::Packages => Page::Install,
            Page::Install => {
                if self.supervisor.is_advance_allowed() {
                    Page::Done
                } else {
                    self.status = Some("Run the installation first".to_string());
                    Page::Install
                }
            }
            Page::Done => {
                self.running = false;
                Page::Done
            }
        };
    }

    pub fn prev_page(&mut self) {
        // Going back mid-install is not offered; cancel first
        if self.page == Page::Install && self.supervisor.phase().is_in_flight() {
            self.status = Some("Cancel the installation first (Esc)".to_string());
            return;
        }
        self.page = match self.page {
            Page::Welcome => Page::Welcome,
            Page::Packages => Page::Welcome,
            Page::Install => Page::Packages,
            Page::Done => Page::Install,
        };
    }

    // ==================== Packages page ====================

    /// Group rows plus the custom-entry row
    pub fn package_rows(&self) -> usize {
        self.catalog.groups().len() + 1
    }

    /// True when the cursor sits on the custom-entry row
    pub fn on_custom_row(&self) -> bool {
        self.cursor == self.catalog.groups().len()
    }

    pub fn select_next(&mut self) {
        self.cursor = (self.cursor + 1) % self.package_rows();
    }

    pub fn select_prev(&mut self) {
        self.cursor = self.cursor.checked_sub(1).unwrap_or(self.package_rows() - 1);
    }

    pub fn toggle_selection(&mut self) {
        if let Some(flag) = self.checked.get_mut(self.cursor) {
            *flag = !*flag;
        }
    }

    pub fn custom_push(&mut self, c: char) {
        self.custom_input.push(c);
    }

    pub fn custom_pop(&mut self) {
        self.custom_input.pop();
    }

    /// The installation request: checked group ids, then custom entries
    pub fn selection(&self) -> Vec<String> {
        let mut selection: Vec<String> = self
            .catalog
            .groups()
            .iter()
            .zip(&self.checked)
            .filter(|(_, checked)| **checked)
            .map(|(group, _)| group.id.clone())
            .collect();
        selection.extend(
            self.custom_input
                .split([' ', ','])
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string()),
        );
        selection
    }

    pub fn selected_count(&self) -> usize {
        self.selection().len()
    }

    // ==================== Install page ====================

    /// True when Enter (or `r`) may begin an attempt
    pub fn can_start(&self) -> bool {
        !self.supervisor.phase().is_in_flight()
    }

    pub fn open_password_modal(&mut self) {
        if !self.can_start() {
            return;
        }
        // An empty request never needs a credential
        if self.selection().is_empty() {
            self.start_attempt(None);
            return;
        }
        self.password_input.clear();
        self.input_mode = InputMode::Password;
    }

    /// Submit the modal: start the attempt with the typed password
    pub fn submit_password(&mut self) {
        let secret = std::mem::take(&mut self.password_input);
        self.input_mode = InputMode::Normal;
        if secret.is_empty() {
            self.start_attempt(None);
        } else {
            self.start_attempt(Some(Credential::new(secret)));
        }
    }

    /// Dismiss the modal without a credential; the attempt is declined
    /// and stays retryable
    pub fn dismiss_password(&mut self) {
        self.password_input.clear();
        self.input_mode = InputMode::Normal;
        self.start_attempt(None);
    }

    fn start_attempt(&mut self, credential: Option<Credential>) {
        let mut prompt = match credential {
            Some(credential) => ProvidedCredential::new(credential),
            None => ProvidedCredential::declined(),
        };
        let selection = self.selection();
        self.supervisor.request_start(
            &selection,
            &self.catalog,
            &self.config.installer,
            &mut prompt,
        );
        self.transcript_scroll = 0;
        self.follow_output = true;
    }

    pub fn cancel_install(&mut self) {
        self.supervisor.cancel();
    }

    pub fn is_installing(&self) -> bool {
        self.supervisor.phase().is_in_flight()
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.supervisor.phase(), InstallPhase::Terminal(_))
    }

    /// Scroll positions are clamped at render time; `follow_output` pins
    /// the view to the newest line until the user scrolls up
    pub fn scroll_output_up(&mut self) {
        if self.follow_output {
            // Detach from the tail at the current bottom, not at a stale mark
            self.transcript_scroll = self.supervisor.transcript().len();
        }
        self.follow_output = false;
        self.transcript_scroll = self.transcript_scroll.saturating_sub(1);
    }

    pub fn scroll_output_down(&mut self) {
        self.transcript_scroll = self.transcript_scroll.saturating_add(1);
        if self.transcript_scroll >= self.supervisor.transcript().len() {
            self.follow_output = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(SproutConfig::default())
    }

    // ==================== Selection Tests ====================

    #[test]
    fn test_selection_empty_by_default() {
        let app = app();
        assert!(app.selection().is_empty());
    }

    #[test]
    fn test_selection_includes_checked_groups() {
        let mut app = app();
        app.checked[0] = true;
        app.checked[2] = true;
        let selection = app.selection();
        assert_eq!(selection.len(), 2);
        assert_eq!(selection[0], app.catalog.groups()[0].id);
    }

    #[test]
    fn test_selection_includes_custom_entries() {
        let mut app = app();
        app.custom_input = "neovim, ripgrep fd".to_string();
        assert_eq!(app.selection(), vec!["neovim", "ripgrep", "fd"]);
    }

    #[test]
    fn test_cursor_wraps_over_custom_row() {
        let mut app = app();
        let rows = app.package_rows();
        for _ in 0..rows - 1 {
            app.select_next();
        }
        assert!(app.on_custom_row());
        app.select_next();
        assert_eq!(app.cursor, 0);
        app.select_prev();
        assert!(app.on_custom_row());
    }

    #[test]
    fn test_toggle_ignores_custom_row() {
        let mut app = app();
        app.cursor = app.catalog.groups().len();
        app.toggle_selection();
        assert!(app.checked.iter().all(|c| !c));
    }

    // ==================== Navigation Tests ====================

    #[test]
    fn test_install_page_gated_until_attempt() {
        let mut app = app();
        app.page = Page::Install;
        app.next_page();
        assert_eq!(app.page, Page::Install);
    }

    #[test]
    fn test_empty_request_opens_gate_without_modal() {
        let mut app = app();
        app.page = Page::Install;
        app.open_password_modal();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.supervisor.is_advance_allowed());
        app.next_page();
        assert_eq!(app.page, Page::Done);
    }

    #[test]
    fn test_dismissed_modal_is_retryable() {
        let mut app = app();
        app.checked[0] = true;
        app.page = Page::Install;
        app.open_password_modal();
        assert_eq!(app.input_mode, InputMode::Password);
        app.dismiss_password();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(!app.supervisor.is_advance_allowed());
        assert!(app.can_start());
    }
}
