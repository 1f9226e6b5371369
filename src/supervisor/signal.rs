//! Unix signal delivery for cancellation
//!
//! SIGTERM first, SIGKILL if the child outlives the grace period.

use std::io;

#[cfg(unix)]
pub fn terminate(pid: u32) -> io::Result<()> {
    send(pid, libc::SIGTERM)
}

#[cfg(unix)]
pub fn force_kill(pid: u32) -> io::Result<()> {
    send(pid, libc::SIGKILL)
}

#[cfg(unix)]
fn send(pid: u32, signal: libc::c_int) -> io::Result<()> {
    // Safety: kill(2) with a valid pid and signal number
    let rc = unsafe { libc::kill(pid as libc::pid_t, signal) };
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
pub fn terminate(_pid: u32) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "signal delivery is only available on unix",
    ))
}

#[cfg(not(unix))]
pub fn force_kill(_pid: u32) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "signal delivery is only available on unix",
    ))
}
