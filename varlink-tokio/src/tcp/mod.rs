//! Provides transport over TCP.

mod stream;
pub use stream::{connect, Connection, Stream};
mod listener;
pub use listener::{bind, Listener};
