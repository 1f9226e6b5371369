//! UI rendering for the wizard

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Clear, List, ListItem, ListState, Paragraph, Scrollbar,
        ScrollbarOrientation, ScrollbarState, Wrap,
    },
};

use crate::supervisor::{AttemptOutcome, InstallPhase};
use crate::transcript::{LineKind, Severity};

use super::app::{App, InputMode, Page};
use super::theme::Theme;

/// Render the whole wizard frame
pub fn render(frame: &mut Frame, app: &App) {
    let theme = app.theme();
    let area = frame.area();

    frame.render_widget(
        Block::default().style(Style::default().bg(theme.base)),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(5),    // Page body
            Constraint::Length(2), // Footer
        ])
        .split(area);

    render_title(frame, app, &theme, chunks[0]);

    match app.page {
        Page::Welcome => render_welcome(frame, &theme, chunks[1]),
        Page::Packages => render_packages(frame, app, &theme, chunks[1]),
        Page::Install => render_install(frame, app, &theme, chunks[1]),
        Page::Done => render_done(frame, app, &theme, chunks[1]),
    }

    render_footer(frame, app, &theme, chunks[2]);

    if app.input_mode == InputMode::Password {
        render_password_modal(frame, app, &theme, area);
    }
}

fn render_title(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let steps = [
        (Page::Welcome, "Welcome"),
        (Page::Packages, "Packages"),
        (Page::Install, "Install"),
        (Page::Done, "Done"),
    ];

    let mut spans = vec![Span::styled(
        " sprout ",
        Style::default().fg(theme.mauve).add_modifier(Modifier::BOLD),
    )];
    for (page, label) in steps {
        spans.push(Span::styled("│ ", Style::default().fg(theme.surface1)));
        let style = if page == app.page {
            Style::default().fg(theme.blue).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.subtext0)
        };
        spans.push(Span::styled(format!("{label} "), style));
    }

    let title = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(theme.surface1)),
    );
    frame.render_widget(title, area);
}

fn render_welcome(frame: &mut Frame, theme: &Theme, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Welcome to your new system",
            Style::default().fg(theme.mauve).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "This wizard installs the software you pick, in one go,",
            Style::default().fg(theme.text),
        )),
        Line::from(Span::styled(
            "using your password only to run the system installer.",
            Style::default().fg(theme.text),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press Enter to continue",
            Style::default().fg(theme.subtext0),
        )),
    ];

    let welcome = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.surface1)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(welcome, pad(area, 4, 2));
}

fn render_packages(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(3)])
        .split(area);

    let items: Vec<ListItem> = app
        .catalog
        .groups()
        .iter()
        .enumerate()
        .map(|(i, group)| {
            let mark = if app.checked[i] { "[x]" } else { "[ ]" };
            let mark_style = if app.checked[i] {
                Style::default().fg(theme.green)
            } else {
                Style::default().fg(theme.subtext0)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {mark} "), mark_style),
                Span::styled(
                    format!("{:<12}", group.label),
                    Style::default().fg(theme.text),
                ),
                Span::styled(
                    group.description.clone(),
                    Style::default().fg(theme.subtext0),
                ),
            ]))
        })
        .collect();

    let mut state = ListState::default();
    if !app.on_custom_row() {
        state.select(Some(app.cursor));
    }

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.surface1))
                .title(Span::styled(
                    " Package groups ",
                    Style::default().fg(theme.mauve).add_modifier(Modifier::BOLD),
                )),
        )
        .highlight_style(Style::default().bg(theme.surface0));
    frame.render_stateful_widget(list, chunks[0], &mut state);

    // Custom-entry row doubles as a text field while selected
    let custom_style = if app.on_custom_row() {
        Style::default().fg(theme.yellow)
    } else {
        Style::default().fg(theme.surface1)
    };
    let cursor_mark = if app.on_custom_row() { "█" } else { "" };
    let custom = Paragraph::new(Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(app.custom_input.clone(), Style::default().fg(theme.text)),
        Span::styled(cursor_mark, Style::default().fg(theme.yellow)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(custom_style)
            .title(Span::styled(
                " Custom packages (space or comma separated) ",
                Style::default().fg(theme.subtext0),
            )),
    );
    frame.render_widget(custom, chunks[1]);
}

fn render_install(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(4)])
        .split(area);

    // Phase banner
    let (banner, banner_style) = match app.supervisor.phase() {
        InstallPhase::Idle => (
            format!(
                "{} item(s) selected — press Enter to install",
                app.selected_count()
            ),
            Style::default().fg(theme.text),
        ),
        InstallPhase::Prompting => (
            "Waiting for password...".to_string(),
            Style::default().fg(theme.yellow),
        ),
        InstallPhase::Starting => (
            "Starting installer...".to_string(),
            Style::default().fg(theme.yellow),
        ),
        InstallPhase::Running => (
            "Installing... (Esc cancels)".to_string(),
            Style::default().fg(theme.blue),
        ),
        InstallPhase::Finishing => (
            "Finishing...".to_string(),
            Style::default().fg(theme.blue),
        ),
        InstallPhase::Terminal(outcome) => match outcome {
            AttemptOutcome::Success => (
                "Installation finished — press Enter to continue".to_string(),
                Style::default().fg(theme.green).add_modifier(Modifier::BOLD),
            ),
            other => (
                format!("Installation {other} — press Enter to continue, r to retry"),
                Style::default().fg(theme.red).add_modifier(Modifier::BOLD),
            ),
        },
    };
    let banner = Paragraph::new(Line::from(Span::styled(banner, banner_style)))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.surface1)),
        );
    frame.render_widget(banner, chunks[0]);

    // Transcript pane
    let lines: Vec<Line> = app
        .supervisor
        .transcript()
        .lines()
        .iter()
        .map(|line| {
            let content_lower = line.text.to_lowercase();
            let looks_like_error = content_lower.contains("error")
                || content_lower.contains("failed")
                || content_lower.contains("not found");
            let style = match line.kind {
                LineKind::Stdout => Style::default().fg(theme.text),
                LineKind::Stderr if looks_like_error => Style::default().fg(theme.red),
                LineKind::Stderr => Style::default().fg(theme.subtext0),
                LineKind::Status(Severity::Info) => Style::default().fg(theme.blue),
                LineKind::Status(Severity::Success) => Style::default().fg(theme.green),
                LineKind::Status(Severity::Error) => Style::default().fg(theme.red),
            };
            Line::from(Span::styled(line.text.clone(), style))
        })
        .collect();

    let total = lines.len();
    let visible = chunks[1].height.saturating_sub(2) as usize;
    let max_scroll = total.saturating_sub(visible);
    let offset = if app.follow_output {
        max_scroll
    } else {
        app.transcript_scroll.min(max_scroll)
    };

    let output = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.surface1))
                .title(Span::styled(
                    " Installer output ",
                    Style::default().fg(theme.mauve).add_modifier(Modifier::BOLD),
                ))
                .style(Style::default().bg(theme.surface0)),
        )
        .scroll((offset as u16, 0));
    frame.render_widget(output, chunks[1]);

    if total > visible {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .track_style(Style::default().fg(theme.surface0))
            .thumb_style(Style::default().fg(theme.blue));
        let mut scrollbar_state = ScrollbarState::new(total).position(offset);
        frame.render_stateful_widget(
            scrollbar,
            chunks[1].inner(ratatui::layout::Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

fn render_done(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let (headline, style) = match app.supervisor.last_outcome() {
        Some(AttemptOutcome::Success) => (
            "✓ Setup complete".to_string(),
            Style::default().fg(theme.green).add_modifier(Modifier::BOLD),
        ),
        Some(other) => (
            format!("Installation {other}"),
            Style::default().fg(theme.red).add_modifier(Modifier::BOLD),
        ),
        None => (
            "Setup finished".to_string(),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(headline, style)),
        Line::from(""),
    ];
    if let Some(path) = app.supervisor.last_log_path() {
        lines.push(Line::from(Span::styled(
            format!("Install log: {}", path.display()),
            Style::default().fg(theme.subtext0),
        )));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        "Press Enter to close the wizard",
        Style::default().fg(theme.subtext0),
    )));

    let done = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.surface1)),
    );
    frame.render_widget(done, pad(area, 4, 2));
}

fn render_footer(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let hints: &[(&str, &str)] = match app.page {
        Page::Welcome => &[("Enter", "next"), ("t", "theme"), ("q", "quit")],
        Page::Packages => &[
            ("j/k", "move"),
            ("Space", "toggle"),
            ("Enter", "next"),
            ("Esc", "back"),
        ],
        Page::Install => &[
            ("Enter", "install/next"),
            ("r", "retry"),
            ("j/k", "scroll"),
            ("Esc", "cancel/back"),
        ],
        Page::Done => &[("Enter", "close")],
    };

    let mut spans = Vec::new();
    for (key, action) in hints {
        spans.push(Span::styled(
            format!(" {key} "),
            Style::default().fg(theme.blue),
        ));
        spans.push(Span::styled(
            format!("{action} "),
            Style::default().fg(theme.subtext0),
        ));
    }
    if let Some(status) = &app.status {
        spans.push(Span::styled(" │ ", Style::default().fg(theme.surface1)));
        spans.push(Span::styled(
            status.clone(),
            Style::default().fg(theme.yellow),
        ));
    }

    let footer = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(theme.surface1)),
    );
    frame.render_widget(footer, area);
}

fn render_password_modal(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let popup_area = centered_rect(50, 20, area);

    // The secret itself never renders; only a dot per typed character
    let masked = "•".repeat(app.password_input.chars().count());
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Your password is passed to the installer and not stored.",
            Style::default().fg(theme.subtext0),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("> ", Style::default().fg(theme.yellow)),
            Span::styled(masked, Style::default().fg(theme.text)),
            Span::styled("█", Style::default().fg(theme.yellow)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Enter to install · Esc to go back",
            Style::default().fg(theme.subtext0),
        )),
    ];

    let modal = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.yellow))
                .title(Span::styled(
                    " Password required ",
                    Style::default().fg(theme.yellow).add_modifier(Modifier::BOLD),
                ))
                .style(Style::default().bg(theme.base)),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(Clear, popup_area);
    frame.render_widget(modal, popup_area);
}

/// Helper to create a centered rect using percentages of the available area
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// Shrink a rect by a horizontal and vertical margin
fn pad(area: Rect, horizontal: u16, vertical: u16) -> Rect {
    area.inner(ratatui::layout::Margin {
        horizontal,
        vertical,
    })
}
