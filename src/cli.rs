use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "sprout")]
#[command(about = "First-run setup wizard that installs package groups through a supervised privileged installer")]
#[command(version)]
pub struct Cli {
    /// Launches the wizard when no subcommand is given
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the interactive setup wizard (the default)
    Wizard,

    /// List the selectable package groups
    Groups {
        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Install package groups without the wizard
    Install {
        /// Group ids or labels to install
        groups: Vec<String>,

        /// Extra package names to install alongside the groups
        #[arg(short, long = "package")]
        packages: Vec<String>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// Show the installer command and exit without running it
        #[arg(short, long)]
        dry_run: bool,
    },

    /// Check that the environment can run an installation
    Doctor,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}
