//! Connects and listens using a parsed [`varlink_core::Address`].
//!
//! This is the piece that ties the scheme-specific transports (`unix`, `tcp`, `exec`, `pipe`)
//! together behind the address grammar clients and services are actually configured with.

use varlink_core::{Address, Call};

use crate::{exec, pipe, tcp, unix, Result};

/// The well-known address a resolver is expected to listen on.
///
/// A client given a bare interface name (no `scheme:` prefix) consults this address with
/// `org.varlink.resolver.Resolve` to find out where the interface is actually served.
pub const DEFAULT_RESOLVER_ADDRESS: &str = "unix:/run/org.varlink.resolver";

/// The outcome of connecting to a parsed address.
///
/// `Exec` and `Pipe` own the child process they connected to; dropping either terminates it
/// (`kill_on_drop`). `Unix` and `Tcp` are plain socket connections.
#[derive(Debug)]
pub enum Connected {
    /// Connected over a Unix domain socket.
    Unix(unix::Connection),
    /// Connected over TCP.
    Tcp(tcp::Connection),
    /// Connected to a spawned `exec:` child over its fd-3 socketpair.
    Exec(exec::Exec),
    /// Connected to an `ssh:`/`bridge:` subprocess over its stdio.
    Pipe(pipe::Pipe),
}

/// Parse `address` and connect to it using the scheme-appropriate transport.
///
/// `address` may also be a bare interface name (e.g. `org.example.ftl`, no `scheme:` prefix), in
/// which case [`DEFAULT_RESOLVER_ADDRESS`] is consulted via `org.varlink.resolver.Resolve` and the
/// address it returns is connected to instead.
pub async fn connect(address: &str) -> Result<Connected> {
    if address.split_once(':').is_none() {
        return resolve_and_connect(address).await;
    }

    let (address, _interface) = Address::parse(address)?;

    match address {
        Address::Unix { path, .. } => unix::connect(&path).await.map(Connected::Unix),
        Address::Tcp { host, port } => tcp::connect(&host, port).await.map(Connected::Tcp),
        Address::Exec { path, args } => exec::spawn(&path, &args).map(Connected::Exec),
        Address::Ssh { host } => pipe::ssh(&host).map(Connected::Pipe),
        Address::Bridge { command } => pipe::bridge(&command).map(Connected::Pipe),
        _ => Err(varlink_core::Error::InvalidAddress(
            "address scheme has no client transport".into(),
        )),
    }
}

/// Resolve `interface` against [`DEFAULT_RESOLVER_ADDRESS`] and connect to the address it names.
async fn resolve_and_connect(interface: &str) -> Result<Connected> {
    resolve_and_connect_via(DEFAULT_RESOLVER_ADDRESS, interface).await
}

/// Resolve `interface` against `resolver_address` and connect to the address it names.
async fn resolve_and_connect_via(resolver_address: &str, interface: &str) -> Result<Connected> {
    let mut resolver = Box::pin(connect(resolver_address)).await?;

    let call = Call::new(serde_json::json!({
        "method": "org.varlink.resolver.Resolve",
        "parameters": { "interface": interface },
    }));

    let reply = call_raw(&mut resolver, &call).await?;
    let address = match reply {
        Ok(Some(value)) => value
            .get("address")
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned),
        Ok(None) => None,
        Err(e) => {
            return Err(varlink_core::Error::InvalidAddress(format!(
                "resolver refused to resolve {interface:?}: {e}"
            )))
        }
    };

    let address = address.ok_or_else(|| {
        varlink_core::Error::InvalidAddress(format!(
            "resolver returned no address for {interface:?}"
        ))
    })?;

    Box::pin(connect(&address)).await
}

/// Call `org.varlink.resolver.Resolve` on whichever transport `connected` holds.
async fn call_raw(
    connected: &mut Connected,
    call: &Call<serde_json::Value>,
) -> Result<core::result::Result<Option<serde_json::Value>, serde_json::Value>> {
    let reply = match connected {
        Connected::Unix(conn) => conn.call_method(call).await,
        Connected::Tcp(conn) => conn.call_method(call).await,
        Connected::Exec(exec) => exec.connection().call_method(call).await,
        Connected::Pipe(pipe) => pipe.connection().call_method(call).await,
    }?;

    Ok(reply.map(|r| r.into_parameters()))
}

/// A listener bound from a parsed address. Only `unix:` and `tcp:` addresses can be listened on;
/// `exec:`/`ssh:`/`bridge:` describe how to reach a peer, not how to accept connections.
#[derive(Debug)]
pub enum Listening {
    /// Listening on a Unix domain socket.
    Unix(unix::Listener),
    /// Listening on TCP.
    Tcp(tcp::Listener),
}

/// Parse `address` and bind a listener using the scheme-appropriate transport.
pub fn listen(address: &str) -> Result<Listening> {
    let (address, _interface) = Address::parse(address)?;

    match address {
        Address::Unix {
            path,
            mode,
            user,
            group,
        } => unix::bind(&path, mode, user.as_deref(), group.as_deref()).map(Listening::Unix),
        Address::Tcp { host, port } => tcp::bind(&host, port).map(Listening::Tcp),
        other => Err(varlink_core::Error::InvalidAddress(format!(
            "{other} cannot be listened on"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listen_rejects_exec_address() {
        assert!(listen("exec:/usr/bin/foo").is_err());
    }

    #[test_log::test(tokio::test)]
    async fn listen_and_connect_unix() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.sock");
        let address = format!("unix:{}", path.display());

        let mut listening = listen(&address).unwrap();

        let accept = tokio::spawn(async move {
            match &mut listening {
                Listening::Unix(listener) => crate::Listener::accept(listener).await,
                Listening::Tcp(_) => unreachable!(),
            }
        });
        let connected = connect(&address).await.unwrap();
        assert!(matches!(connected, Connected::Unix(_)));
        accept.await.unwrap().unwrap();
    }

    #[test_log::test(tokio::test)]
    async fn bare_interface_name_is_resolved() {
        use futures_util::stream;

        struct FakeResolver {
            target: String,
        }

        impl crate::Service for FakeResolver {
            type MethodCall<'de> = serde_json::Value;
            type ReplyParams<'ser> = serde_json::Value;
            type ReplyStreamParams = serde_json::Value;
            type ReplyStream = stream::Empty<crate::Reply<serde_json::Value>>;
            type ReplyError<'ser> = serde_json::Value;

            async fn handle<'ser>(
                &'ser mut self,
                _call: Call<Self::MethodCall<'_>>,
            ) -> crate::service::MethodReply<Self::ReplyParams<'ser>, Self::ReplyStream, Self::ReplyError<'ser>>
            {
                crate::service::MethodReply::Single(Some(
                    serde_json::json!({ "address": self.target }),
                ))
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let resolver_path = dir.path().join("resolver.sock");
        let target_path = dir.path().join("target.sock");
        let resolver_address = format!("unix:{}", resolver_path.display());
        let target_address = format!("unix:{}", target_path.display());

        let resolver_listener =
            unix::bind(&resolver_path.display().to_string(), None, None, None).unwrap();
        let target_listener =
            unix::bind(&target_path.display().to_string(), None, None, None).unwrap();

        tokio::spawn(crate::Server::new(resolver_listener, FakeResolver { target: target_address.clone() }).run());
        tokio::spawn(crate::Server::new(target_listener, FakeResolver { target: target_address.clone() }).run());

        let connected = resolve_and_connect_via(&resolver_address, "org.example.ftl")
            .await
            .unwrap();
        assert!(matches!(connected, Connected::Unix(_)));
    }
}
