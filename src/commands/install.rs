//! Headless installation command
//!
//! Runs one supervised installation attempt without the wizard: confirm,
//! collect the password, pump the supervisor while relaying transcript
//! lines, and exit nonzero unless the attempt succeeded.

use std::thread;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use dialoguer::{Confirm, Password};
use indicatif::{ProgressBar, ProgressStyle};

use crate::command::build_install_command;
use crate::config::SproutConfig;
use crate::credential::{Credential, ProvidedCredential};
use crate::supervisor::{AttemptOutcome, InstallPhase, InstallSupervisor};
use crate::transcript::{LineKind, Severity};

const PUMP_INTERVAL: Duration = Duration::from_millis(25);

/// Run a headless installation attempt
pub fn cmd_install(
    config: &SproutConfig,
    groups: Vec<String>,
    packages: Vec<String>,
    yes: bool,
    dry_run: bool,
) -> Result<()> {
    let catalog = config.catalog();

    let mut selection = groups;
    selection.extend(packages);

    // Resolve up front so --dry-run and the confirmation can show the
    // exact command the attempt would run
    let command = build_install_command(&selection, &catalog, &config.installer)?;

    let Some(command) = command else {
        println!("{} Nothing to install", "!".yellow());
        return Ok(());
    };

    if dry_run {
        println!("{} {}", "$".dimmed(), command.display);
        println!(
            "{} Would install {} package(s)",
            ">".cyan(),
            command.packages.len()
        );
        return Ok(());
    }

    println!("{} {}", "$".dimmed(), command.display);
    if !yes {
        let proceed = Confirm::new()
            .with_prompt(format!("Install {} package(s)?", command.packages.len()))
            .default(true)
            .interact()?;
        if !proceed {
            println!("{} Cancelled", "!".yellow());
            return Ok(());
        }
    }

    let mut prompt = collect_password()?;

    let mut supervisor = InstallSupervisor::new(config.supervision.supervisor_config());
    supervisor.request_start(&selection, &catalog, &config.installer, &mut prompt);

    if supervisor.phase() == InstallPhase::Idle {
        // The password prompt was dismissed; nothing was launched
        println!("{} Password prompt dismissed", "!".yellow());
        anyhow::bail!("installation not started");
    }

    let outcome = pump_to_terminal(&mut supervisor);

    if let Some(path) = supervisor.last_log_path() {
        println!("{} Log: {}", ">".cyan(), path.display().to_string().dimmed());
    }

    match outcome {
        AttemptOutcome::Success => Ok(()),
        other => anyhow::bail!("installation {other}"),
    }
}

/// Collect the sudo password once, before the attempt starts
fn collect_password() -> Result<ProvidedCredential> {
    let secret = Password::new()
        .with_prompt("Password for privileged installation")
        .allow_empty_password(true)
        .interact()?;
    if secret.is_empty() {
        return Ok(ProvidedCredential::declined());
    }
    Ok(ProvidedCredential::new(Credential::new(secret)))
}

/// Pump the supervisor until the attempt settles, relaying transcript
/// lines through a spinner so partial progress stays visible
fn pump_to_terminal(supervisor: &mut InstallSupervisor) -> AttemptOutcome {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.set_message("Installing...");
    spinner.enable_steady_tick(Duration::from_millis(80));

    let mut mark = 0;
    let outcome = loop {
        supervisor.pump();

        for line in supervisor.transcript().lines_since(mark) {
            let rendered = match line.kind {
                LineKind::Stdout => line.text.normal(),
                LineKind::Stderr => line.text.dimmed(),
                LineKind::Status(Severity::Info) => line.text.cyan(),
                LineKind::Status(Severity::Success) => line.text.green(),
                LineKind::Status(Severity::Error) => line.text.red(),
            };
            spinner.println(rendered.to_string());
        }
        mark = supervisor.transcript().len();

        if let InstallPhase::Terminal(outcome) = supervisor.phase() {
            break outcome;
        }
        thread::sleep(PUMP_INTERVAL);
    };

    spinner.finish_and_clear();
    outcome
}
