//! Installation attempt worker
//!
//! Owns the child process for one attempt. Spawns it, writes the
//! credential to its stdin, pumps both output pipes from reader threads,
//! and reports everything as events on a channel the supervisor drains.
//! The exit event is sent only after both readers have finished, so no
//! output can arrive after it.

use std::io::{Read, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::mpsc::Sender;
use std::thread;

use crate::command::InstallCommand;
use crate::credential::Credential;
use crate::transcript::OutputChannel;

const READ_BUF_SIZE: usize = 4096;

/// Everything a running attempt can tell the supervisor
#[derive(Debug)]
pub enum WorkerEvent {
    /// The child process exists
    Started { pid: u32 },
    /// Raw bytes from one output channel
    Output { channel: OutputChannel, chunk: Vec<u8> },
    /// The child could not be spawned
    LaunchFailed { message: String },
    /// The child terminated; all output events precede this one
    Exited { status: ExitStatus },
    /// The child was spawned but waiting on it failed
    WaitFailed { message: String },
}

/// Run one installation attempt to completion.
///
/// The credential is written to the child's stdin exactly once and dropped
/// (zeroizing it) immediately afterwards; stdin is closed in the same scope
/// so the child never blocks on it. Send failures are ignored: a dropped
/// receiver means the supervisor abandoned this attempt.
pub(crate) fn run_attempt(
    command: InstallCommand,
    credential: Option<Credential>,
    tx: Sender<WorkerEvent>,
) {
    let mut child = match Command::new(&command.program)
        .args(&command.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            let _ = tx.send(WorkerEvent::LaunchFailed {
                message: format!("{}: {}", command.program, e),
            });
            return;
        }
    };

    if tx.send(WorkerEvent::Started { pid: child.id() }).is_err() {
        // The supervisor is gone; nobody else will ever reap this child
        let _ = child.kill();
        let _ = child.wait();
        return;
    }

    {
        let stdin = child.stdin.take();
        if let (Some(mut stdin), Some(credential)) = (stdin, credential) {
            // The child may exit before reading; a broken pipe here is fine
            let _ = writeln!(stdin, "{}", credential.expose());
            let _ = stdin.flush();
            drop(credential);
        }
        // stdin (if still Some) drops here, closing the pipe
    }

    let stdout_reader = child
        .stdout
        .take()
        .map(|pipe| spawn_reader(OutputChannel::Stdout, pipe, tx.clone()));
    let stderr_reader = child
        .stderr
        .take()
        .map(|pipe| spawn_reader(OutputChannel::Stderr, pipe, tx.clone()));

    // Drain both pipes to EOF before reaping, so every Output event is
    // already sent when Exited goes out
    if let Some(handle) = stdout_reader {
        let _ = handle.join();
    }
    if let Some(handle) = stderr_reader {
        let _ = handle.join();
    }

    match child.wait() {
        Ok(status) => {
            let _ = tx.send(WorkerEvent::Exited { status });
        }
        Err(e) => {
            let _ = tx.send(WorkerEvent::WaitFailed {
                message: e.to_string(),
            });
        }
    }
}

fn spawn_reader<R: Read + Send + 'static>(
    channel: OutputChannel,
    mut pipe: R,
    tx: Sender<WorkerEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut buf = [0u8; READ_BUF_SIZE];
        loop {
            match pipe.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    if tx
                        .send(WorkerEvent::Output {
                            channel,
                            chunk: buf[..n].to_vec(),
                        })
                        .is_err()
                    {
                        break;
                    }
                }
            }
        }
    })
}
