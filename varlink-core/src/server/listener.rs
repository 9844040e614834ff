use core::future::Future;

use crate::{connection::Socket, Connection, Result};

/// A listener that accepts incoming connections.
///
/// This is the trait that needs to be implemented for a type to be used as a listener by
/// [`crate::Server`]. A transport crate (such as `varlink-tokio`) provides a concrete
/// implementation per address scheme it supports.
pub trait Listener: core::fmt::Debug {
    /// The socket type of the connections accepted by this listener.
    type Socket: Socket;

    /// Accept a new incoming connection.
    ///
    /// The returned future must be cancel safe: the [`Server`](crate::Server) run loop polls it
    /// alongside connection I/O and will drop it if another readiness event wins the race.
    fn accept(&mut self) -> impl Future<Output = Result<Connection<Self::Socket>>>;
}
