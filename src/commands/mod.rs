//! Command implementations for the sprout CLI
//!
//! Each submodule handles one subcommand.

pub mod doctor;
pub mod groups;
pub mod install;

pub use doctor::cmd_doctor;
pub use groups::cmd_groups;
pub use install::cmd_install;
