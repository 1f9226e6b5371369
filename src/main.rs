//! Sprout CLI - first-run setup wizard with a supervised privileged installer
//!
//! This file contains only CLI dispatch logic. All command implementations
//! are in the `commands/` module; the wizard lives in `tui/`.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;

use sprout::{Cli, Commands, SproutConfig, cmd_doctor, cmd_groups, cmd_install};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = SproutConfig::load()?;

    match cli.command {
        // ============================================
        // WIZARD (default)
        // ============================================
        None | Some(Commands::Wizard) => sprout::tui::run(config),

        // ============================================
        // HEADLESS COMMANDS
        // ============================================
        Some(Commands::Groups { format }) => cmd_groups(&config.catalog(), &format),

        Some(Commands::Install {
            groups,
            packages,
            yes,
            dry_run,
        }) => cmd_install(&config, groups, packages, yes, dry_run),

        Some(Commands::Doctor) => cmd_doctor(&config),

        // ============================================
        // COMPLETIONS
        // ============================================
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    }
}
