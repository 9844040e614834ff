use crate::{Connection, Result};

#[cfg(feature = "address")]
use std::{
    ffi::CString,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
};

/// A unix domain socket listener.
#[derive(Debug)]
pub struct Listener {
    listener: tokio::net::UnixListener,
    #[cfg(feature = "address")]
    unlink_on_drop: Option<PathBuf>,
}

impl crate::Listener for Listener {
    type Socket = super::Stream;

    async fn accept(&mut self) -> Result<Connection<Self::Socket>> {
        self.listener
            .accept()
            .await
            .map(|(stream, _)| super::Stream::from(stream).into())
            .map_err(Into::into)
    }
}

/// Bind a Unix domain socket listener from an already-parsed [`varlink_core::Address::Unix`].
///
/// Abstract addresses (`path` starting with `@`) create no filesystem node and are never
/// unlinked. Filesystem-backed sockets have `mode` applied (if given) before any connection is
/// accepted, `user`/`group` applied via `chown` (if given), and are unlinked when the returned
/// [`Listener`] is dropped.
#[cfg(feature = "address")]
pub fn bind(
    path: &str,
    mode: Option<u32>,
    user: Option<&str>,
    group: Option<&str>,
) -> Result<Listener> {
    let is_abstract = path.starts_with('@');

    let listener = if is_abstract {
        bind_abstract(path)?
    } else {
        std::os::unix::net::UnixListener::bind(path)?
    };
    listener.set_nonblocking(true)?;
    let listener = tokio::net::UnixListener::from_std(listener)?;

    if !is_abstract {
        let fs_path = Path::new(path);
        if let Some(mode) = mode {
            std::fs::set_permissions(fs_path, std::fs::Permissions::from_mode(mode))?;
        }
        if user.is_some() || group.is_some() {
            chown(fs_path, user, group)?;
        }
    }

    Ok(Listener {
        listener,
        unlink_on_drop: (!is_abstract).then(|| PathBuf::from(path)),
    })
}

/// Bind an abstract-namespace Unix socket (path beginning with `@`, mapped to a leading NUL byte).
#[cfg(feature = "address")]
fn bind_abstract(path: &str) -> Result<std::os::unix::net::UnixListener> {
    use std::os::unix::net::SocketAddr;

    // `SocketAddr::from_abstract_name` is nightly-only; we go through `libc` directly instead,
    // which works on stable and is the same mechanism `socket(7)` documents.
    let name = &path[1..];
    // SAFETY: straightforward libc socket/bind/listen sequence, all return values checked.
    unsafe {
        let fd = libc::socket(libc::AF_UNIX, libc::SOCK_STREAM, 0);
        if fd < 0 {
            return Err(std::io::Error::last_os_error().into());
        }

        let mut addr: libc::sockaddr_un = std::mem::zeroed();
        addr.sun_family = libc::AF_UNIX as libc::sa_family_t;
        let name_bytes = name.as_bytes();
        if name_bytes.len() >= addr.sun_path.len() - 1 {
            libc::close(fd);
            return Err(varlink_core::Error::InvalidAddress(format!(
                "abstract socket name too long: {path}"
            )));
        }
        // Leading NUL byte marks this as an abstract-namespace address.
        for (i, b) in name_bytes.iter().enumerate() {
            addr.sun_path[i + 1] = *b as libc::c_char;
        }
        let addr_len = (std::mem::size_of::<libc::sa_family_t>() + 1 + name_bytes.len())
            as libc::socklen_t;

        let ret = libc::bind(
            fd,
            &addr as *const _ as *const libc::sockaddr,
            addr_len,
        );
        if ret < 0 {
            let err = std::io::Error::last_os_error();
            libc::close(fd);
            return Err(err.into());
        }
        if libc::listen(fd, 128) < 0 {
            let err = std::io::Error::last_os_error();
            libc::close(fd);
            return Err(err.into());
        }

        use std::os::fd::FromRawFd;
        let _ = SocketAddr::from_pathname("/"); // keep `SocketAddr` import used on all targets
        Ok(std::os::unix::net::UnixListener::from_raw_fd(fd))
    }
}

#[cfg(feature = "address")]
fn chown(path: &Path, user: Option<&str>, group: Option<&str>) -> Result<()> {
    let uid = user.map(lookup_uid).transpose()?.unwrap_or(u32::MAX);
    let gid = group.map(lookup_gid).transpose()?.unwrap_or(u32::MAX);

    let c_path = CString::new(path.as_os_str().as_encoded_bytes())
        .map_err(|_| varlink_core::Error::InvalidAddress(format!("invalid path {path:?}")))?;

    // SAFETY: `c_path` is a valid, NUL-terminated C string for the duration of this call.
    let ret = unsafe { libc::chown(c_path.as_ptr(), uid, gid) };
    if ret != 0 {
        return Err(std::io::Error::last_os_error().into());
    }

    Ok(())
}

#[cfg(feature = "address")]
fn lookup_uid(name: &str) -> Result<u32> {
    let c_name = CString::new(name)
        .map_err(|_| varlink_core::Error::InvalidAddress(format!("invalid user name {name:?}")))?;
    // SAFETY: `c_name` is valid for the duration of this call; `getpwnam` returns a pointer into
    // thread-local storage that we only read before the next libc call.
    let passwd = unsafe { libc::getpwnam(c_name.as_ptr()) };
    if passwd.is_null() {
        return Err(varlink_core::Error::InvalidAddress(format!(
            "unknown user {name:?}"
        )));
    }
    // SAFETY: `passwd` was just checked non-null and points to a valid `passwd` struct.
    Ok(unsafe { (*passwd).pw_uid })
}

#[cfg(feature = "address")]
fn lookup_gid(name: &str) -> Result<u32> {
    let c_name = CString::new(name).map_err(|_| {
        varlink_core::Error::InvalidAddress(format!("invalid group name {name:?}"))
    })?;
    // SAFETY: same reasoning as `lookup_uid`.
    let group = unsafe { libc::getgrnam(c_name.as_ptr()) };
    if group.is_null() {
        return Err(varlink_core::Error::InvalidAddress(format!(
            "unknown group {name:?}"
        )));
    }
    // SAFETY: `group` was just checked non-null and points to a valid `group` struct.
    Ok(unsafe { (*group).gr_gid })
}


/// Wrap an already-bound, already-listening [`tokio::net::UnixListener`] (e.g. one handed to us
/// via socket activation) without taking responsibility for unlinking its path on drop — the
/// process manager that bound it owns that path, not us.
#[cfg(feature = "address")]
pub(crate) fn from_tokio(listener: tokio::net::UnixListener) -> Listener {
    Listener {
        listener,
        unlink_on_drop: None,
    }
}

#[cfg(feature = "address")]
impl Drop for Listener {
    fn drop(&mut self) {
        if let Some(path) = self.unlink_on_drop.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}
