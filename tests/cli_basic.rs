//! Basic CLI integration tests

use clap::{CommandFactory, Parser};

use sprout::{Cli, Commands};

// ==================== Argument Parsing Tests ====================

#[test]
fn test_cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn test_no_args_launches_wizard() {
    let cli = Cli::try_parse_from(["sprout"]).unwrap();
    assert!(cli.command.is_none());
}

#[test]
fn test_groups_defaults_to_table() {
    let cli = Cli::try_parse_from(["sprout", "groups"]).unwrap();
    match cli.command {
        Some(Commands::Groups { format }) => assert_eq!(format, "table"),
        _ => panic!("expected groups subcommand"),
    }
}

#[test]
fn test_groups_json_format() {
    let cli = Cli::try_parse_from(["sprout", "groups", "--format", "json"]).unwrap();
    match cli.command {
        Some(Commands::Groups { format }) => assert_eq!(format, "json"),
        _ => panic!("expected groups subcommand"),
    }
}

#[test]
fn test_install_arguments() {
    let cli = Cli::try_parse_from([
        "sprout",
        "install",
        "education",
        "programming",
        "-p",
        "neovim",
        "--package",
        "ripgrep",
        "--yes",
        "--dry-run",
    ])
    .unwrap();

    match cli.command {
        Some(Commands::Install {
            groups,
            packages,
            yes,
            dry_run,
        }) => {
            assert_eq!(groups, vec!["education", "programming"]);
            assert_eq!(packages, vec!["neovim", "ripgrep"]);
            assert!(yes);
            assert!(dry_run);
        }
        _ => panic!("expected install subcommand"),
    }
}

#[test]
fn test_install_without_selection_parses() {
    // An empty selection is legal at the CLI level; the command itself
    // reports there is nothing to install
    let cli = Cli::try_parse_from(["sprout", "install"]).unwrap();
    match cli.command {
        Some(Commands::Install { groups, packages, .. }) => {
            assert!(groups.is_empty());
            assert!(packages.is_empty());
        }
        _ => panic!("expected install subcommand"),
    }
}

#[test]
fn test_unknown_subcommand_is_rejected() {
    assert!(Cli::try_parse_from(["sprout", "bogus"]).is_err());
}

#[test]
fn test_completions_requires_shell() {
    assert!(Cli::try_parse_from(["sprout", "completions"]).is_err());
    assert!(Cli::try_parse_from(["sprout", "completions", "bash"]).is_ok());
}
