//! Provides transport over a spawned child process's stdio.
//!
//! This is the `ssh:`/`bridge:` address scheme: rather than a socket, the peer is a subprocess
//! (`ssh <host> varlink bridge` or an arbitrary bridge command) spoken to over its stdin/stdout.

use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    process::{Child, ChildStdin, ChildStdout, Command},
};

use crate::{
    connection::socket::{self, Socket},
    Connection, Result,
};

/// A running bridge subprocess together with the varlink connection to its stdio.
#[derive(Debug)]
pub struct Pipe {
    child: Child,
    connection: Connection<Stdio>,
}

impl Pipe {
    /// The varlink connection to the subprocess's stdio.
    pub fn connection(&mut self) -> &mut Connection<Stdio> {
        &mut self.connection
    }

    /// Terminate the subprocess, sending `SIGTERM` and escalating to `SIGKILL` if it does not
    /// exit within `grace`.
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

/// Run `command` through `/bin/sh -c` (the `bridge:` scheme) and connect to its stdio.
pub fn bridge(command: &str) -> Result<Pipe> {
    spawn_piped(Command::new("/bin/sh").arg("-c").arg(command))
}

/// Run `ssh host varlink bridge` (the `ssh:` scheme) and connect to its stdio.
pub fn ssh(host: &str) -> Result<Pipe> {
    let mut command = Command::new("ssh");
    command.arg(host).arg("varlink").arg("bridge");
    spawn_piped(&mut command)
}

fn spawn_piped(command: &mut Command) -> Result<Pipe> {
    command
        .stdin(std::process::Stdio::piped())
        .stdout(std::process::Stdio::piped())
        .kill_on_drop(true);

    let mut child = command.spawn()?;
    let stdin = child.stdin.take().expect("stdin was piped");
    let stdout = child.stdout.take().expect("stdout was piped");

    Ok(Pipe {
        child,
        connection: Connection::new(Stdio { stdin, stdout }),
    })
}

/// The [`Socket`] implementation over a child process's piped stdin/stdout.
#[derive(Debug)]
pub struct Stdio {
    stdin: ChildStdin,
    stdout: ChildStdout,
}

impl Socket for Stdio {
    type ReadHalf = ReadHalf;
    type WriteHalf = WriteHalf;

    fn split(self) -> (Self::ReadHalf, Self::WriteHalf) {
        (ReadHalf(self.stdout), WriteHalf(self.stdin))
    }
}

/// The [`ReadHalf`] implementation reading a child process's stdout.
#[derive(Debug)]
pub struct ReadHalf(ChildStdout);

impl socket::ReadHalf for ReadHalf {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.0.read(buf).await.map_err(Into::into)
    }
}

/// The [`WriteHalf`] implementation writing a child process's stdin.
#[derive(Debug)]
pub struct WriteHalf(ChildStdin);

impl socket::WriteHalf for WriteHalf {
    async fn write(&mut self, buf: &[u8]) -> Result<()> {
        let mut pos = 0;

        while pos < buf.len() {
            let n = self.0.write(&buf[pos..]).await?;
            pos += n;
        }

        Ok(())
    }
}
