//! Provides transport over Unix Domain Sockets.

mod stream;
pub use stream::{connect, Connection, Stream};
mod listener;
pub use listener::{bind, Listener};
#[cfg(feature = "address")]
pub(crate) use listener::from_tokio;
