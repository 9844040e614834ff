use std::net::SocketAddr;

use socket2::{Domain, Socket as Socket2, Type};

use crate::{Connection, Result};

/// A TCP listener.
#[derive(Debug)]
pub struct Listener {
    listener: tokio::net::TcpListener,
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

/// Bind a TCP listener on the given host and port.
///
/// `SO_REUSEADDR` is set before bind so a restarted service can rebind a recently-closed address
/// without waiting out `TIME_WAIT`. `host` may be `0.0.0.0` or `::` to listen on all interfaces.
pub fn bind(host: &str, port: u16) -> Result<Listener> {
    let addr: SocketAddr = format!("{}:{}", bracket_if_needed(host), port)
        .parse()
        .map_err(|_| varlink_core::Error::InvalidAddress(format!("invalid tcp address {host}:{port}")))?;

    let domain = if addr.is_ipv6() {
        Domain::IPV6
    } else {
        Domain::IPV4
    };
    let socket = Socket2::new(domain, Type::STREAM, None)?;
    socket.set_reuse_address(true)?;
    socket.bind(&addr.into())?;
    socket.listen(128)?;
    socket.set_nonblocking(true)?;

    let listener = tokio::net::TcpListener::from_std(socket.into())?;

    Ok(Listener { listener })
}

fn bracket_if_needed(host: &str) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("[{host}]")
    } else {
        host.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test(tokio::test)]
    async fn bind_and_connect() {
        let mut listener = bind("127.0.0.1", 0).unwrap();
        let addr = listener.listener.local_addr().unwrap();

        let accept = tokio::spawn(async move { listener.accept().await });
        let _client = super::super::connect("127.0.0.1", addr.port()).await.unwrap();
        accept.await.unwrap().unwrap();
    }

    #[test]
    fn rebinding_after_close_succeeds() {
        let first = bind("127.0.0.1", 0).unwrap();
        let addr = first.listener.local_addr().unwrap();
        drop(first);

        bind("127.0.0.1", addr.port()).unwrap();
    }
}
