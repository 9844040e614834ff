//! Socket activation support (`VARLINK_ADDRESS`, `LISTEN_FDS`, `LISTEN_PID`).
//!
//! A process manager such as systemd may open the listening socket itself and pass it to the
//! service as file descriptor 3, setting `LISTEN_FDS=1` and `LISTEN_PID=<our pid>` so we know the
//! descriptor is meant for us (and not inherited stale from a parent that forgot to close it).
//! `VARLINK_ADDRESS` carries the address the socket was bound to, so a service can still report it
//! via `org.varlink.service.GetInfo` without having parsed it itself.
//!
//! Only Unix domain sockets are supported, matching every activation setup varlink services are
//! deployed with in practice.

use std::os::fd::{FromRawFd, RawFd};

use crate::{unix, Result};

const ACTIVATION_FD: RawFd = 3;

/// The address a process manager bound on our behalf, if `VARLINK_ADDRESS` is set.
pub fn activated_address() -> Option<String> {
    std::env::var("VARLINK_ADDRESS").ok()
}

/// Take over the listening socket a process manager bound on fd 3, if `LISTEN_FDS`/`LISTEN_PID`
/// indicate one was left for us.
///
/// Returns `Ok(None)` when no activation env vars are set (the normal case of a service that
/// binds its own socket). `LISTEN_PID`, when set, is checked against our own pid so a child
/// process that merely inherited the parent's environment doesn't mistake a stale activation for
/// its own.
pub fn take_activated_listener() -> Result<Option<unix::Listener>> {
    let Ok(fds) = std::env::var("LISTEN_FDS") else {
        return Ok(None);
    };
    let fds: u32 = fds
        .parse()
        .map_err(|_| crate::Error::InvalidAddress(format!("malformed LISTEN_FDS {fds:?}")))?;
    if fds != 1 {
        return Ok(None);
    }

    if let Ok(pid) = std::env::var("LISTEN_PID") {
        let pid: u32 = pid
            .parse()
            .map_err(|_| crate::Error::InvalidAddress(format!("malformed LISTEN_PID {pid:?}")))?;
        if pid != std::process::id() {
            return Ok(None);
        }
    }

    // SAFETY: the process manager that set `LISTEN_FDS` guarantees fd 3 is a valid, open,
    // already-bound-and-listening Unix domain socket handed to us for the lifetime of this
    // process.
    let std_listener = unsafe { std::os::unix::net::UnixListener::from_raw_fd(ACTIVATION_FD) };
    std_listener.set_nonblocking(true)?;
    let listener = tokio::net::UnixListener::from_std(std_listener)?;

    Ok(Some(unix::from_tokio(listener)))
}
