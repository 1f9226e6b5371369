//! Credential handling
//!
//! The secret lives exactly as long as one process start: it is handed to
//! the attempt worker, written once to the child's stdin, and wiped when
//! dropped. Nothing else may hold a copy.

use zeroize::Zeroizing;

/// An elevation secret for a single installation attempt
pub struct Credential(Zeroizing<String>);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Credential(Zeroizing::new(secret.into()))
    }

    /// Access the secret for the stdin write. Callers must not copy it out.
    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// The external prompt that obtains a credential, or `None` when the user
/// dismisses it
pub trait CredentialPrompt {
    fn request_credential(&mut self) -> Option<Credential>;
}

/// Adapter for front ends that collect the secret before starting the
/// attempt (a password modal, `dialoguer::Password`, a test fixture). The
/// credential can be taken once; a second prompt on the same adapter reads
/// as declined.
pub struct ProvidedCredential(Option<Credential>);

impl ProvidedCredential {
    pub fn new(credential: Credential) -> Self {
        ProvidedCredential(Some(credential))
    }

    pub fn declined() -> Self {
        ProvidedCredential(None)
    }
}

impl CredentialPrompt for ProvidedCredential {
    fn request_credential(&mut self) -> Option<Credential> {
        self.0.take()
    }
}
