pub mod catalog;
pub mod cli;
pub mod command;
pub mod commands;
pub mod config;
pub mod credential;
pub mod supervisor;
pub mod transcript;
pub mod tui;

pub use catalog::{Catalog, PackageGroup};
pub use cli::{Cli, Commands};
pub use command::{
    CommandError, InstallCommand, build_install_command, sanitize_identifier, validate_token,
};
pub use config::{InstallerConfig, SproutConfig, SupervisionConfig, TuiTheme};
pub use credential::{Credential, CredentialPrompt, ProvidedCredential};
pub use supervisor::{AttemptOutcome, InstallPhase, InstallSupervisor, SupervisorConfig};
pub use transcript::{LineKind, LogLine, OutputChannel, Severity, Transcript};
pub use commands::{cmd_doctor, cmd_groups, cmd_install};
