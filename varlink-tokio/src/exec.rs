//! Provides transport to a spawned child process connected over a socketpair inherited as fd 3.
//!
//! This is the `exec:` address scheme: the service executable is expected to notice it was
//! started with a listening socket already open on file descriptor 3 (the same convention
//! [`crate::activation`] uses for externally-managed socket activation) and use it directly
//! rather than binding its own.

use std::os::{
    fd::{IntoRawFd, RawFd},
    unix::{net::UnixStream as StdUnixStream, process::CommandExt},
};

use tokio::process::{Child, Command};

use crate::{unix::Stream, Connection, Result};

const ACTIVATION_FD: RawFd = 3;

/// A running `exec:` child process together with the varlink connection to it.
#[derive(Debug)]
pub struct Exec {
    child: Child,
    connection: Connection<Stream>,
}

impl Exec {
    /// The varlink connection to the child's end of the socketpair.
    pub fn connection(&mut self) -> &mut Connection<Stream> {
        &mut self.connection
    }

    /// Terminate the child, sending `SIGTERM` and escalating to `SIGKILL` if it does not exit
    /// within `grace`.
    pub async fn terminate(&mut self, grace: std::time::Duration) -> Result<()> {
        if let Some(pid) = self.child.id() {
            // SAFETY: `pid` is a valid process id obtained from the still-running `Child`.
            unsafe {
                libc::kill(pid as libc::pid_t, libc::SIGTERM);
            }
        }

        match tokio::time::timeout(grace, self.child.wait()).await {
            Ok(_) => Ok(()),
            Err(_) => {
                self.child.kill().await?;
                self.child.wait().await?;
                Ok(())
            }
        }
    }
}

/// Spawn `path args...`, handing it a connected socketpair on fd 3, and return the parent-side
/// connection to it.
pub fn spawn(path: &str, args: &[String]) -> Result<Exec> {
    let (parent, child) = StdUnixStream::pair()?;
    parent.set_nonblocking(true)?;

    let child_fd = child.into_raw_fd();

    let mut command = Command::new(path);
    command.args(args);
    command.kill_on_drop(true);

    // SAFETY: `pre_exec` runs in the forked child before `exec`, between `fork` and `exec` only
    // async-signal-safe calls are permitted; `dup2`/`close` are. `child_fd` is duplicated onto
    // fd 3 then the original is closed so only fd 3 survives into the child's image.
    unsafe {
        command.pre_exec(move || {
            if libc::dup2(child_fd, ACTIVATION_FD) < 0 {
                return Err(std::io::Error::last_os_error());
            }
            if child_fd != ACTIVATION_FD {
                libc::close(child_fd);
            }
            Ok(())
        });
    }

    let child_proc = command.spawn()?;
    // The child has its own copy of `child_fd` post-fork (duped onto fd 3); close the parent's
    // copy so it isn't held open for the lifetime of the parent process.
    // SAFETY: `child_fd` was obtained from `into_raw_fd` above and not used anywhere else since.
    unsafe {
        libc::close(child_fd);
    }

    let tokio_stream = tokio::net::UnixStream::from_std(parent)?;
    let connection = Connection::new(Stream::from(tokio_stream));

    Ok(Exec {
        child: child_proc,
        connection,
    })
}
