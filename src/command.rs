//! Installer command construction
//!
//! Pure functions turning a selection of identifiers into the single
//! privileged command an attempt will run. No shell is involved: the
//! command is an argument vector, and every token is sanitized before it
//! is embedded.

use thiserror::Error;

use crate::catalog::Catalog;
use crate::config::InstallerConfig;

/// Longest accepted package token, after sanitization
pub const MAX_TOKEN_LEN: usize = 200;

/// A token was unusable even after sanitization
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("package name '{raw}' contains no usable characters")]
    InvalidIdentifier { raw: String },
    #[error("package name '{raw}' is too long (max {max} characters)")]
    IdentifierTooLong { raw: String, max: usize },
    #[error("package name '{raw}' cannot contain '..'")]
    PathTraversal { raw: String },
}

/// The command one installation attempt will execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallCommand {
    /// The program to spawn (the privilege-escalation tool)
    pub program: String,
    /// Arguments to pass, package tokens included
    pub args: Vec<String>,
    /// Human-readable form for confirmation dialogs and the transcript
    pub display: String,
    /// Sanitized package tokens, in install order
    pub packages: Vec<String>,
}

impl std::fmt::Display for InstallCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display)
    }
}

/// Strip everything outside the allow-list (alphanumeric, `-`, `_`, `.`)
pub fn sanitize_identifier(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_' || *c == '.')
        .collect()
}

/// Sanitize one identifier into a package token, rejecting tokens that
/// cannot be made safe
pub fn validate_token(raw: &str) -> Result<String, CommandError> {
    let token = sanitize_identifier(raw);
    if token.is_empty() {
        return Err(CommandError::InvalidIdentifier {
            raw: raw.to_string(),
        });
    }
    if token.len() > MAX_TOKEN_LEN {
        return Err(CommandError::IdentifierTooLong {
            raw: raw.to_string(),
            max: MAX_TOKEN_LEN,
        });
    }
    if token.contains("..") {
        return Err(CommandError::PathTraversal {
            raw: raw.to_string(),
        });
    }
    Ok(token)
}

/// Build the installer command for a selection.
///
/// Returns `Ok(None)` when there is nothing to install (empty selection, or
/// every selected group resolved to an empty package list). Group
/// identifiers expand through the catalog; unknown identifiers are treated
/// as literal package names. Duplicate tokens keep their first position.
pub fn build_install_command(
    selection: &[String],
    catalog: &Catalog,
    installer: &InstallerConfig,
) -> Result<Option<InstallCommand>, CommandError> {
    if selection.is_empty() {
        return Ok(None);
    }

    let mut packages: Vec<String> = Vec::new();
    for identifier in selection {
        for raw in catalog.resolve(identifier) {
            let token = validate_token(&raw)?;
            if !packages.contains(&token) {
                packages.push(token);
            }
        }
    }

    if packages.is_empty() {
        return Ok(None);
    }

    let mut args: Vec<String> = installer.privilege_args.clone();
    args.push(installer.package_tool.clone());
    args.extend(installer.package_args.iter().cloned());
    args.extend(packages.iter().cloned());

    let display = format!(
        "{} {} {} {}",
        installer.privilege_tool,
        installer.package_tool,
        installer.package_args.join(" "),
        packages.join(" ")
    );

    Ok(Some(InstallCommand {
        program: installer.privilege_tool.clone(),
        args,
        display,
        packages,
    }))
}
