//! Installation process supervision
//!
//! One `InstallSupervisor` owns the whole lifecycle of a privileged
//! installation attempt: building the command, collecting the credential,
//! spawning the worker, draining its events into the transcript, and
//! classifying how the attempt ended. At most one process is ever alive.
//!
//! The supervisor is driven by polling: the UI calls [`InstallSupervisor::pump`]
//! once per tick, and every state change happens inside `request_start`,
//! `cancel` or `pump` on the calling thread.

mod signal;
mod worker;

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use chrono::Local;

use crate::catalog::Catalog;
use crate::command::{self, InstallCommand};
use crate::config::InstallerConfig;
use crate::credential::CredentialPrompt;
use crate::transcript::{LogLine, Severity, Transcript};

use worker::WorkerEvent;

/// Upper bound on events handled per `pump` call so a chatty installer
/// cannot starve input handling
const MAX_EVENTS_PER_TICK: usize = 20;

/// Lifecycle of the current installation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallPhase {
    /// No attempt in progress
    Idle,
    /// Waiting for the credential
    Prompting,
    /// Worker dispatched, process not yet confirmed alive
    Starting,
    /// Process alive, output streaming
    Running,
    /// Process exited, buffered output being flushed
    Finishing,
    /// Attempt over
    Terminal(AttemptOutcome),
}

impl InstallPhase {
    /// True while a worker owns (or may own) a live process
    pub fn is_in_flight(self) -> bool {
        matches!(
            self,
            InstallPhase::Starting | InstallPhase::Running | InstallPhase::Finishing
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, InstallPhase::Terminal(_))
    }
}

/// How an attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// Exit status zero, or an empty request
    Success,
    /// Nonzero exit code
    Failure(i32),
    /// Killed by a signal, or the exit report was lost
    Crashed,
    /// No process ever ran
    FailedToStart,
    /// Terminated because the user asked for it
    Cancelled,
}

impl AttemptOutcome {
    pub fn is_success(self) -> bool {
        matches!(self, AttemptOutcome::Success)
    }
}

impl std::fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttemptOutcome::Success => write!(f, "success"),
            AttemptOutcome::Failure(code) => write!(f, "failed (exit code {code})"),
            AttemptOutcome::Crashed => write!(f, "crashed"),
            AttemptOutcome::FailedToStart => write!(f, "failed to start"),
            AttemptOutcome::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Tunables for one supervisor
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    /// How long `Starting` may last before the attempt is written off
    pub launch_timeout: Duration,
    /// Pause between graceful termination and force kill
    pub cancel_grace: Duration,
    /// Where per-attempt install logs go; `None` disables them
    pub log_dir: Option<PathBuf>,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        SupervisorConfig {
            launch_timeout: Duration::from_secs(5),
            cancel_grace: Duration::from_secs(3),
            log_dir: None,
        }
    }
}

/// Book-keeping for the attempt currently holding the process slot
struct Attempt {
    rx: Receiver<WorkerEvent>,
    worker: Option<JoinHandle<()>>,
    pid: Option<u32>,
    /// Set until the worker confirms the process started
    launch_deadline: Option<Instant>,
    /// Set once cancellation has delivered the graceful signal
    kill_deadline: Option<Instant>,
    cancel_requested: bool,
    /// The launch deadline expired; the slot only survives to kill a
    /// process that appears late
    abandoned: bool,
    log_writer: Option<BufWriter<File>>,
}

/// The process supervisor and navigation gate
pub struct InstallSupervisor {
    config: SupervisorConfig,
    phase: InstallPhase,
    ever_attempted: bool,
    finished: bool,
    last_outcome: Option<AttemptOutcome>,
    last_log_path: Option<PathBuf>,
    transcript: Transcript,
    attempt: Option<Attempt>,
}

impl InstallSupervisor {
    pub fn new(config: SupervisorConfig) -> Self {
        InstallSupervisor {
            config,
            phase: InstallPhase::Idle,
            ever_attempted: false,
            finished: false,
            last_outcome: None,
            last_log_path: None,
            transcript: Transcript::new(),
            attempt: None,
        }
    }

    /// Start an installation attempt for the selected group ids and
    /// package names.
    ///
    /// Returns `false` only when an attempt is already in flight; every
    /// other path accepts the request, including ones that settle it
    /// immediately (empty selection, rejected tokens, missing installer).
    /// A dismissed credential prompt leaves the supervisor in `Idle`,
    /// ready for another call.
    pub fn request_start(
        &mut self,
        selection: &[String],
        catalog: &Catalog,
        installer: &InstallerConfig,
        prompt: &mut dyn CredentialPrompt,
    ) -> bool {
        if self.phase.is_in_flight() {
            return false;
        }

        // An abandoned attempt may still hold the slot; nothing of it may
        // survive once a new attempt begins. A Started event queued but
        // never drained still names a child that must die here.
        if let Some(stale) = self.attempt.take() {
            if let Some(pid) = stale.pid {
                let _ = signal::force_kill(pid);
            }
            while let Ok(event) = stale.rx.try_recv() {
                if let WorkerEvent::Started { pid } = event {
                    let _ = signal::force_kill(pid);
                }
            }
        }

        self.transcript.clear();
        self.ever_attempted = true;
        self.finished = false;
        self.last_outcome = None;

        let command = match command::build_install_command(selection, catalog, installer) {
            Ok(Some(command)) => command,
            Ok(None) => {
                self.settle(
                    AttemptOutcome::Success,
                    Severity::Info,
                    "Nothing to install. Skipping installation.".to_string(),
                );
                return true;
            }
            Err(e) => {
                self.settle(
                    AttemptOutcome::FailedToStart,
                    Severity::Error,
                    format!("✗ Failed to start installer: {e}"),
                );
                return true;
            }
        };

        self.phase = InstallPhase::Prompting;
        let credential = match prompt.request_credential() {
            Some(credential) => credential,
            None => {
                self.transcript.push_status(
                    Severity::Info,
                    "Password prompt dismissed; installation not started.",
                );
                self.phase = InstallPhase::Idle;
                return true;
            }
        };

        // Resolve bare tool names up front so a missing installer fails
        // immediately instead of burning the launch timeout. Names carrying
        // a path or embedded arguments are left for the spawn to judge.
        for tool in [&command.program, &installer.package_tool] {
            if is_bare_name(tool) && which::which(tool).is_err() {
                self.settle(
                    AttemptOutcome::FailedToStart,
                    Severity::Error,
                    format!("✗ Required binary not found: {tool}"),
                );
                return true;
            }
        }

        let mut log_writer = self.open_log(&command);

        let started = self.transcript.push_status(
            Severity::Info,
            format!("Installing {} package(s)...", command.packages.len()),
        );
        write_log(&mut log_writer, &started);
        let echoed = self
            .transcript
            .push_status(Severity::Info, format!("$ {}", command.display));
        write_log(&mut log_writer, &echoed);

        let (tx, rx) = mpsc::channel();
        let handle = thread::spawn(move || worker::run_attempt(command, Some(credential), tx));

        self.attempt = Some(Attempt {
            rx,
            worker: Some(handle),
            pid: None,
            launch_deadline: Some(Instant::now() + self.config.launch_timeout),
            kill_deadline: None,
            cancel_requested: false,
            abandoned: false,
            log_writer,
        });
        self.phase = InstallPhase::Starting;
        true
    }

    /// Request cancellation of the in-flight attempt.
    ///
    /// Idempotent, and a no-op outside `Starting`/`Running`. Delivers a
    /// graceful signal first; `pump` escalates to a forced kill when the
    /// grace period runs out.
    pub fn cancel(&mut self) {
        if !matches!(self.phase, InstallPhase::Starting | InstallPhase::Running) {
            return;
        }
        let grace = self.config.cancel_grace;
        let Some(attempt) = self.attempt.as_mut() else {
            return;
        };
        if attempt.cancel_requested {
            return;
        }
        attempt.cancel_requested = true;

        let line = self
            .transcript
            .push_status(Severity::Info, "Cancelling installation...");
        write_log(&mut attempt.log_writer, &line);

        // With no pid yet, the signal goes out when Started arrives
        if let Some(pid) = attempt.pid {
            let _ = signal::terminate(pid);
            attempt.kill_deadline = Some(Instant::now() + grace);
        }
    }

    /// Drain pending worker events and enforce deadlines. Call once per
    /// UI tick; bounded work per call.
    pub fn pump(&mut self) {
        if self.attempt.as_ref().is_some_and(|a| a.abandoned) {
            self.drain_abandoned();
            return;
        }

        for _ in 0..MAX_EVENTS_PER_TICK {
            let event = match self.attempt.as_ref().map(|a| a.rx.try_recv()) {
                Some(Ok(event)) => event,
                Some(Err(TryRecvError::Empty)) => break,
                Some(Err(TryRecvError::Disconnected)) => {
                    // The worker died without an exit report
                    if self.phase.is_in_flight() {
                        self.settle(
                            AttemptOutcome::Crashed,
                            Severity::Error,
                            "✗ Installer terminated abnormally (no exit report)".to_string(),
                        );
                    }
                    break;
                }
                None => return,
            };
            self.handle_event(event);
            if self.attempt.is_none() {
                return;
            }
        }

        self.check_deadlines();
    }

    /// The navigation gate: the wizard may advance past the install step
    /// once at least one attempt was made and the latest one is settled.
    /// An attempt that never launched keeps the gate closed; the user can
    /// only retry from there.
    pub fn is_advance_allowed(&self) -> bool {
        self.ever_attempted
            && self.finished
            && self.last_outcome != Some(AttemptOutcome::FailedToStart)
    }

    pub fn phase(&self) -> InstallPhase {
        self.phase
    }

    pub fn last_outcome(&self) -> Option<AttemptOutcome> {
        self.last_outcome
    }

    pub fn ever_attempted(&self) -> bool {
        self.ever_attempted
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Log file of the most recent attempt that spawned a process
    pub fn last_log_path(&self) -> Option<&Path> {
        self.last_log_path.as_deref()
    }

    fn handle_event(&mut self, event: WorkerEvent) {
        match event {
            WorkerEvent::Started { pid } => {
                let grace = self.config.cancel_grace;
                if let Some(attempt) = self.attempt.as_mut() {
                    attempt.pid = Some(pid);
                    attempt.launch_deadline = None;
                    if attempt.cancel_requested {
                        let _ = signal::terminate(pid);
                        attempt.kill_deadline = Some(Instant::now() + grace);
                    }
                }
                if self.phase == InstallPhase::Starting {
                    self.phase = InstallPhase::Running;
                }
            }
            WorkerEvent::Output { channel, chunk } => {
                let completed = self.transcript.push_chunk(channel, &chunk);
                if let Some(attempt) = self.attempt.as_mut() {
                    for line in &completed {
                        write_log(&mut attempt.log_writer, line);
                    }
                }
            }
            WorkerEvent::LaunchFailed { message } => {
                self.settle(
                    AttemptOutcome::FailedToStart,
                    Severity::Error,
                    format!("✗ Failed to start installer: {message}"),
                );
            }
            WorkerEvent::Exited { status } => {
                self.phase = InstallPhase::Finishing;
                self.flush_partial_output();

                let cancelled = self
                    .attempt
                    .as_ref()
                    .is_some_and(|a| a.cancel_requested);
                if let Some(attempt) = self.attempt.as_mut()
                    && let Some(w) = attempt.log_writer.as_mut()
                {
                    let _ = writeln!(w, "\n=== Result ===");
                    let _ = writeln!(w, "Exit code: {:?}", status.code());
                }
                let (outcome, severity, message) = classify_exit(status, cancelled);
                self.settle(outcome, severity, message);
            }
            WorkerEvent::WaitFailed { message } => {
                self.phase = InstallPhase::Finishing;
                self.flush_partial_output();
                self.settle(
                    AttemptOutcome::Crashed,
                    Severity::Error,
                    format!("✗ Installer terminated abnormally ({message})"),
                );
            }
        }
    }

    /// Record the terminal outcome: exactly one status line, log closed,
    /// worker reaped, slot released.
    fn settle(&mut self, outcome: AttemptOutcome, severity: Severity, message: String) {
        let line = self.transcript.push_status(severity, message);
        if let Some(mut attempt) = self.attempt.take() {
            write_log(&mut attempt.log_writer, &line);
            if let Some(w) = attempt.log_writer.as_mut() {
                let _ = w.flush();
            }
            if let Some(handle) = attempt.worker.take() {
                let _ = handle.join();
            }
        }
        self.phase = InstallPhase::Terminal(outcome);
        self.last_outcome = Some(outcome);
        self.finished = true;
    }

    fn flush_partial_output(&mut self) {
        let flushed = self.transcript.flush_partial();
        if let Some(attempt) = self.attempt.as_mut() {
            for line in &flushed {
                write_log(&mut attempt.log_writer, line);
            }
        }
    }

    fn check_deadlines(&mut self) {
        let now = Instant::now();

        if self.phase == InstallPhase::Starting {
            let expired = self
                .attempt
                .as_ref()
                .and_then(|a| a.launch_deadline)
                .is_some_and(|deadline| now >= deadline);
            if expired {
                let secs = self.config.launch_timeout.as_secs();
                let line = self.transcript.push_status(
                    Severity::Error,
                    format!("✗ Failed to start installer: timed out after {secs}s"),
                );
                // Keep the slot: a process that appears after the deadline
                // must still be killed
                if let Some(attempt) = self.attempt.as_mut() {
                    attempt.abandoned = true;
                    write_log(&mut attempt.log_writer, &line);
                    if let Some(w) = attempt.log_writer.as_mut() {
                        let _ = w.flush();
                    }
                }
                self.phase = InstallPhase::Terminal(AttemptOutcome::FailedToStart);
                self.last_outcome = Some(AttemptOutcome::FailedToStart);
                self.finished = true;
                return;
            }
        }

        if self.phase == InstallPhase::Running {
            let kill_due = self
                .attempt
                .as_ref()
                .and_then(|a| a.kill_deadline)
                .is_some_and(|deadline| now >= deadline);
            if kill_due && let Some(attempt) = self.attempt.as_mut() {
                if let Some(pid) = attempt.pid {
                    let _ = signal::force_kill(pid);
                }
                attempt.kill_deadline = None;
            }
        }
    }

    /// Post-deadline housekeeping: kill a late-started process and release
    /// the slot once the worker gives up
    fn drain_abandoned(&mut self) {
        let mut worker_done = false;
        if let Some(attempt) = self.attempt.as_mut() {
            loop {
                match attempt.rx.try_recv() {
                    Ok(WorkerEvent::Started { pid }) => {
                        attempt.pid = Some(pid);
                        let _ = signal::force_kill(pid);
                    }
                    Ok(WorkerEvent::Output { .. }) => {}
                    Ok(
                        WorkerEvent::Exited { .. }
                        | WorkerEvent::LaunchFailed { .. }
                        | WorkerEvent::WaitFailed { .. },
                    )
                    | Err(TryRecvError::Disconnected) => {
                        worker_done = true;
                        break;
                    }
                    Err(TryRecvError::Empty) => break,
                }
            }
        }
        if worker_done
            && let Some(mut attempt) = self.attempt.take()
            && let Some(handle) = attempt.worker.take()
        {
            let _ = handle.join();
        }
    }

    fn open_log(&mut self, command: &InstallCommand) -> Option<BufWriter<File>> {
        let dir = self.config.log_dir.clone()?;
        let path = dir.join(format!(
            "install-{}.log",
            Local::now().format("%Y%m%d-%H%M%S%.3f")
        ));
        let created = fs::create_dir_all(&dir).and_then(|_| File::create(&path));
        match created {
            Ok(file) => {
                let mut writer = BufWriter::new(file);
                let _ = writeln!(writer, "=== Install Log ===");
                let _ = writeln!(writer, "Command: {}", command.display);
                let _ = writeln!(
                    writer,
                    "Timestamp: {}",
                    Local::now().format("%Y-%m-%d %H:%M:%S")
                );
                let _ = writeln!(writer, "===================\n");
                self.last_log_path = Some(path);
                Some(writer)
            }
            Err(e) => {
                self.transcript
                    .push_status(Severity::Info, format!("Could not create install log: {e}"));
                None
            }
        }
    }
}

impl Drop for InstallSupervisor {
    fn drop(&mut self) {
        // The UI may be torn down mid-attempt; do not leave the child behind
        if let Some(attempt) = self.attempt.take()
            && let Some(pid) = attempt.pid
            && !attempt.abandoned
        {
            let _ = signal::terminate(pid);
        }
    }
}

/// A name `which` can resolve on PATH: no path separator, no embedded
/// arguments
fn is_bare_name(tool: &str) -> bool {
    !tool.contains('/') && !tool.contains(char::is_whitespace)
}

fn write_log(writer: &mut Option<BufWriter<File>>, line: &LogLine) {
    if let Some(w) = writer.as_mut() {
        let _ = writeln!(w, "{}{}", line.file_prefix(), line.text);
    }
}

fn classify_exit(status: ExitStatus, cancel_requested: bool) -> (AttemptOutcome, Severity, String) {
    if cancel_requested {
        return (
            AttemptOutcome::Cancelled,
            Severity::Info,
            "Installation cancelled by user".to_string(),
        );
    }
    if status.success() {
        return (
            AttemptOutcome::Success,
            Severity::Success,
            "✓ Installation completed successfully".to_string(),
        );
    }
    if let Some(code) = status.code() {
        return (
            AttemptOutcome::Failure(code),
            Severity::Error,
            format!("✗ Installation failed (exit code: {code})"),
        );
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(sig) = status.signal() {
            return (
                AttemptOutcome::Crashed,
                Severity::Error,
                format!("✗ Installer terminated abnormally (signal {sig})"),
            );
        }
    }
    (
        AttemptOutcome::Crashed,
        Severity::Error,
        "✗ Installer terminated abnormally".to_string(),
    )
}
