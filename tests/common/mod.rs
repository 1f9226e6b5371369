//! Common test utilities

use std::time::{Duration, Instant};

use tempfile::TempDir;

use sprout::credential::{Credential, ProvidedCredential};
use sprout::supervisor::{AttemptOutcome, InstallPhase, InstallSupervisor, SupervisorConfig};
use sprout::{Catalog, InstallerConfig};

/// Test context that manages a supervisor writing logs into a temp dir
pub struct TestContext {
    pub supervisor: InstallSupervisor,
    pub log_dir: TempDir,
}

impl TestContext {
    /// Create a new test context with a short cancel grace and a fresh
    /// temporary log directory
    pub fn new() -> Self {
        let log_dir = TempDir::new().expect("Failed to create temp log dir");
        let supervisor = InstallSupervisor::new(SupervisorConfig {
            launch_timeout: Duration::from_secs(5),
            cancel_grace: Duration::from_millis(300),
            log_dir: Some(log_dir.path().to_path_buf()),
        });
        TestContext { supervisor, log_dir }
    }

    /// Start an attempt running `script` under `sh -c` with a credential
    pub fn start(&mut self, script: &str) -> bool {
        self.supervisor.request_start(
            &["pkg".to_string()],
            &Catalog::builtin(),
            &sh_installer(script),
            &mut provided("pw"),
        )
    }

    /// Pump until the attempt settles, failing the test on a hang
    pub fn run_to_terminal(&mut self) -> AttemptOutcome {
        let deadline = Instant::now() + Duration::from_secs(10);
        loop {
            self.supervisor.pump();
            if let InstallPhase::Terminal(outcome) = self.supervisor.phase() {
                return outcome;
            }
            assert!(
                Instant::now() < deadline,
                "no terminal phase, stuck in {:?}",
                self.supervisor.phase()
            );
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    /// Pump until the child process is confirmed alive
    pub fn wait_for_running(&mut self) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while self.supervisor.phase() == InstallPhase::Starting && Instant::now() < deadline {
            self.supervisor.pump();
            std::thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(self.supervisor.phase(), InstallPhase::Running);
    }

    /// Contents of the install log written for the latest attempt
    pub fn read_log(&self) -> String {
        let path = self
            .supervisor
            .last_log_path()
            .expect("no install log was written");
        std::fs::read_to_string(path).expect("Failed to read install log")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Installer that runs a shell script instead of a real package manager
pub fn sh_installer(script: &str) -> InstallerConfig {
    InstallerConfig {
        privilege_tool: "sh".to_string(),
        privilege_args: vec!["-c".to_string()],
        package_tool: script.to_string(),
        package_args: vec![],
    }
}

pub fn provided(secret: &str) -> ProvidedCredential {
    ProvidedCredential::new(Credential::new(secret))
}
