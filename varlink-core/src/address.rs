//! Parsing of varlink connection address URIs.
//!
//! An address selects a transport (`unix:`, `tcp:`, `exec:`, `ssh:`, `bridge:`) and, optionally,
//! a default interface via a trailing `/interface.name` suffix. This module only parses and
//! represents the address; opening the actual connection is the job of a transport crate (such
//! as `varlink-tokio`), which consumes an [`Address`] and knows how to connect/listen/accept for
//! each variant.

use alloc::{string::String, vec::Vec};

use crate::{Error, Result};

/// A parsed varlink connection address.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Address {
    /// A Unix domain socket, filesystem-backed or abstract (`@name`).
    Unix {
        /// The socket path. Starts with `@` for an abstract address.
        path: String,
        /// `chmod` to apply to the socket on bind, if given (`;mode=OOO`).
        mode: Option<u32>,
        /// `chown` user to apply to the socket on bind, if given (`;user=USER`).
        user: Option<String>,
        /// `chown` group to apply to the socket on bind, if given (`;group=GROUP`).
        group: Option<String>,
    },
    /// A TCP endpoint, IPv4 or (bracketed) IPv6.
    Tcp {
        /// The host literal, brackets stripped for IPv6.
        host: String,
        /// The port number.
        port: u16,
    },
    /// A spawned child process connected via a socketpair inherited as fd 3.
    Exec {
        /// The executable path.
        path: String,
        /// Arguments passed to the executable.
        args: Vec<String>,
    },
    /// An `ssh <host> varlink bridge` subprocess, spoken to over its stdio.
    Ssh {
        /// The SSH destination (`user@host` or `host`).
        host: String,
    },
    /// An arbitrary shell command, spoken to over its stdio.
    Bridge {
        /// The command line, not yet word-split.
        command: String,
    },
}

impl Address {
    /// Parse a varlink address, returning the address and an optional default interface name
    /// stripped from a trailing `/interface.name` suffix.
    pub fn parse(s: &str) -> Result<(Self, Option<String>)> {
        let (scheme, rest) = s
            .split_once(':')
            .ok_or_else(|| invalid(alloc::format!("missing ':' after scheme in {s:?}")))?;

        let (body, interface) = split_interface_suffix(rest);

        let address = match scheme {
            "unix" => parse_unix(body)?,
            "tcp" => parse_tcp(body)?,
            "exec" => parse_exec(body)?,
            "ssh" => Address::Ssh {
                host: non_empty(body, "ssh host")?.into(),
            },
            "bridge" => Address::Bridge {
                command: non_empty(body, "bridge command")?.into(),
            },
            other => return Err(invalid(alloc::format!("unknown address scheme {other:?}"))),
        };

        Ok((address, interface))
    }
}

impl core::fmt::Display for Address {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Address::Unix {
                path,
                mode,
                user,
                group,
            } => {
                write!(f, "unix:{path}")?;
                if let Some(mode) = mode {
                    write!(f, ";mode={mode:03o}")?;
                }
                if let Some(user) = user {
                    write!(f, ";user={user}")?;
                }
                if let Some(group) = group {
                    write!(f, ";group={group}")?;
                }
                Ok(())
            }
            Address::Tcp { host, port } => {
                if host.contains(':') {
                    write!(f, "tcp:[{host}]:{port}")
                } else {
                    write!(f, "tcp:{host}:{port}")
                }
            }
            Address::Exec { path, args } => {
                write!(f, "exec:{path}")?;
                for arg in args {
                    write!(f, " {arg}")?;
                }
                Ok(())
            }
            Address::Ssh { host } => write!(f, "ssh:{host}"),
            Address::Bridge { command } => write!(f, "bridge:{command}"),
        }
    }
}

fn invalid(message: String) -> Error {
    Error::InvalidAddress(message)
}

fn non_empty<'a>(s: &'a str, what: &str) -> Result<&'a str> {
    if s.is_empty() {
        Err(invalid(alloc::format!("empty {what}")))
    } else {
        Ok(s)
    }
}

/// Strip a trailing `/interface.name` suffix, if any, from the scheme body.
///
/// Only the *last* `/` is treated as the separator, since `exec:` paths may themselves contain
/// `/`; the interface suffix never contains a `/` (interface names are dot-separated).
fn split_interface_suffix(body: &str) -> (&str, Option<String>) {
    match body.rsplit_once('/') {
        Some((before, iface)) if !iface.is_empty() && is_interface_name(iface) => {
            (before, Some(iface.into()))
        }
        _ => (body, None),
    }
}

fn is_interface_name(s: &str) -> bool {
    let mut parts = s.split('.');
    match parts.next() {
        Some(first) if !first.is_empty() && first.chars().next().unwrap().is_ascii_alphabetic() => {}
        _ => return false,
    }
    s.contains('.') && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_')
}

fn parse_unix(body: &str) -> Result<Address> {
    let mut parts = body.split(';');
    let path = non_empty(parts.next().unwrap_or(""), "unix socket path")?.into();

    let mut mode = None;
    let mut user = None;
    let mut group = None;
    for param in parts {
        let (key, value) = param
            .split_once('=')
            .ok_or_else(|| invalid(alloc::format!("malformed unix address parameter {param:?}")))?;
        match key {
            "mode" => {
                mode = Some(u32::from_str_radix(value, 8).map_err(|_| {
                    invalid(alloc::format!("invalid unix socket mode {value:?}"))
                })?)
            }
            "user" => user = Some(value.into()),
            "group" => group = Some(value.into()),
            other => return Err(invalid(alloc::format!("unknown unix address parameter {other:?}"))),
        }
    }

    Ok(Address::Unix {
        path,
        mode,
        user,
        group,
    })
}

fn parse_tcp(body: &str) -> Result<Address> {
    let (host, port) = if let Some(rest) = body.strip_prefix('[') {
        let (host, after) = rest
            .split_once(']')
            .ok_or_else(|| invalid(alloc::format!("unterminated IPv6 literal in {body:?}")))?;
        let port = after
            .strip_prefix(':')
            .ok_or_else(|| invalid(alloc::format!("missing port after IPv6 literal in {body:?}")))?;
        (host, port)
    } else if body.contains("::") || body.matches(':').count() > 1 {
        return Err(invalid(alloc::format!(
            "IPv6 address must be bracketed in {body:?}"
        )));
    } else {
        body.split_once(':')
            .ok_or_else(|| invalid(alloc::format!("missing port in {body:?}")))?
    };

    let host = non_empty(host, "tcp host")?.into();
    let port: u16 = port
        .parse()
        .map_err(|_| invalid(alloc::format!("invalid tcp port {port:?}")))?;

    Ok(Address::Tcp { host, port })
}

fn parse_exec(body: &str) -> Result<Address> {
    let mut words = body.split_whitespace();
    let path = words
        .next()
        .filter(|p| !p.is_empty())
        .ok_or_else(|| invalid(alloc::format!("empty exec path in {body:?}")))?
        .into();
    let args = words.map(Into::into).collect();

    Ok(Address::Exec { path, args })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn unix_plain() {
        let (addr, iface) = Address::parse("unix:/run/foo.sock").unwrap();
        assert_eq!(
            addr,
            Address::Unix {
                path: "/run/foo.sock".into(),
                mode: None,
                user: None,
                group: None,
            }
        );
        assert_eq!(iface, None);
    }

    #[test]
    fn unix_abstract_with_mode_user_group() {
        let (addr, _) = Address::parse("unix:@my-service;mode=600;user=alice;group=staff").unwrap();
        assert_eq!(
            addr,
            Address::Unix {
                path: "@my-service".into(),
                mode: Some(0o600),
                user: Some("alice".into()),
                group: Some("staff".into()),
            }
        );
    }

    #[test]
    fn unix_with_interface_suffix() {
        let (addr, iface) = Address::parse("unix:/run/foo.sock/org.example.ftl").unwrap();
        assert_eq!(
            addr,
            Address::Unix {
                path: "/run/foo.sock".into(),
                mode: None,
                user: None,
                group: None,
            }
        );
        assert_eq!(iface.as_deref(), Some("org.example.ftl"));
    }

    #[test]
    fn tcp_ipv4() {
        let (addr, _) = Address::parse("tcp:127.0.0.1:9999").unwrap();
        assert_eq!(
            addr,
            Address::Tcp {
                host: "127.0.0.1".into(),
                port: 9999,
            }
        );
    }

    #[test]
    fn tcp_ipv6_bracketed() {
        let (addr, _) = Address::parse("tcp:[::1]:9999").unwrap();
        assert_eq!(
            addr,
            Address::Tcp {
                host: "::1".into(),
                port: 9999,
            }
        );
    }

    #[test]
    fn tcp_ipv6_without_brackets_is_rejected() {
        assert!(Address::parse("tcp:::1:9999").is_err());
    }

    #[test]
    fn tcp_all_interfaces() {
        let (addr, _) = Address::parse("tcp:0.0.0.0:1234").unwrap();
        assert_eq!(
            addr,
            Address::Tcp {
                host: "0.0.0.0".into(),
                port: 1234,
            }
        );
    }

    #[test]
    fn tcp_bad_port_is_rejected() {
        assert!(Address::parse("tcp:127.0.0.1:notaport").is_err());
    }

    #[test]
    fn exec_with_args() {
        let (addr, _) = Address::parse("exec:/usr/bin/foo --bar baz").unwrap();
        assert_eq!(
            addr,
            Address::Exec {
                path: "/usr/bin/foo".into(),
                args: vec!["--bar".into(), "baz".into()],
            }
        );
    }

    #[test]
    fn ssh_host() {
        let (addr, _) = Address::parse("ssh:example.com").unwrap();
        assert_eq!(
            addr,
            Address::Ssh {
                host: "example.com".into(),
            }
        );
    }

    #[test]
    fn bridge_command() {
        let (addr, _) = Address::parse("bridge:ssh host2 varlink bridge").unwrap();
        assert_eq!(
            addr,
            Address::Bridge {
                command: "ssh host2 varlink bridge".into(),
            }
        );
    }

    #[test]
    fn unknown_scheme_is_rejected() {
        assert!(Address::parse("ftp:example.com").is_err());
    }

    #[test]
    fn missing_scheme_separator_is_rejected() {
        assert!(Address::parse("no-scheme-here").is_err());
    }

    #[test]
    fn empty_unix_path_is_rejected() {
        assert!(Address::parse("unix:").is_err());
    }

    #[test]
    fn display_round_trips_unix() {
        let (addr, _) = Address::parse("unix:@x;mode=600").unwrap();
        assert_eq!(addr.to_string(), "unix:@x;mode=600");
    }

    #[test]
    fn display_round_trips_tcp_ipv6() {
        let (addr, _) = Address::parse("tcp:[::1]:1234").unwrap();
        assert_eq!(addr.to_string(), "tcp:[::1]:1234");
    }
}
