//! Environment checks

use anyhow::Result;
use colored::Colorize;

use crate::config::{self, SproutConfig};

/// Check that the host can run a privileged installation
pub fn cmd_doctor(config: &SproutConfig) -> Result<()> {
    println!("{}", "Checking environment...".bold());
    println!();

    let mut issues = 0;

    // Check 1: privilege-escalation tool on PATH
    println!("{}", "Checking installer tools...".dimmed());
    if which::which(&config.installer.privilege_tool).is_ok() {
        println!(
            "  {} {} found",
            "✓".green(),
            config.installer.privilege_tool
        );
    } else {
        println!(
            "  {} {} not found on PATH",
            "✗".red(),
            config.installer.privilege_tool
        );
        issues += 1;
    }

    // Check 2: package manager on PATH
    if which::which(&config.installer.package_tool).is_ok() {
        println!("  {} {} found", "✓".green(), config.installer.package_tool);
    } else {
        println!(
            "  {} {} not found on PATH",
            "✗".red(),
            config.installer.package_tool
        );
        issues += 1;
    }

    // Check 3: config file
    println!("{}", "Checking configuration...".dimmed());
    match SproutConfig::config_path() {
        Ok(path) if path.exists() => {
            println!("  {} Config: {}", "✓".green(), path.display());
        }
        Ok(path) => {
            println!(
                "  {} No config file ({}), using defaults",
                "!".yellow(),
                path.display()
            );
        }
        Err(e) => {
            println!("  {} Could not resolve config path: {}", "✗".red(), e);
            issues += 1;
        }
    }

    // Check 4: log directory writability
    println!("{}", "Checking install log directory...".dimmed());
    if config.supervision.keep_logs {
        match config::log_dir() {
            Ok(dir) => match std::fs::create_dir_all(&dir) {
                Ok(()) => println!("  {} Logs: {}", "✓".green(), dir.display()),
                Err(e) => {
                    println!("  {} Cannot create {}: {}", "✗".red(), dir.display(), e);
                    issues += 1;
                }
            },
            Err(e) => {
                println!("  {} Could not resolve log directory: {}", "✗".red(), e);
                issues += 1;
            }
        }
    } else {
        println!("  {} Install logs disabled in config", "!".yellow());
    }

    // Check 5: package groups resolve to something
    println!("{}", "Checking package groups...".dimmed());
    let catalog = config.catalog();
    let empty: Vec<&str> = catalog
        .groups()
        .iter()
        .filter(|g| g.packages.is_empty())
        .map(|g| g.id.as_str())
        .collect();
    if empty.is_empty() {
        println!(
            "  {} {} groups, all with packages",
            "✓".green(),
            catalog.groups().len()
        );
    } else {
        println!(
            "  {} Groups with no packages: {}",
            "!".yellow(),
            empty.join(", ")
        );
    }

    println!();
    if issues == 0 {
        println!("{} {}", "✓".green().bold(), "Ready to install".green().bold());
    } else {
        println!("{} {} issue(s) found", "✗".red().bold(), issues);
        anyhow::bail!("environment is not ready");
    }

    Ok(())
}
