use crate::{
    connection::socket::{self, Socket},
    Result,
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{tcp, TcpStream},
};

/// The connection type that uses TCP for transport.
pub type Connection = crate::Connection<Stream>;

/// Connect to the given TCP host and port.
pub async fn connect(host: &str, port: u16) -> Result<Connection> {
    TcpStream::connect((host, port))
        .await
        .map(Stream)
        .map(Connection::new)
        .map_err(Into::into)
}

/// The [`Socket`] implementation using TCP.
#[derive(Debug)]
pub struct Stream(TcpStream);

impl Socket for Stream {
    type ReadHalf = ReadHalf;
    type WriteHalf = WriteHalf;

    fn split(self) -> (Self::ReadHalf, Self::WriteHalf) {
        let (read, write) = self.0.into_split();

        (ReadHalf(read), WriteHalf(write))
    }
}

impl From<TcpStream> for Stream {
    fn from(stream: TcpStream) -> Self {
        Self(stream)
    }
}

/// The [`ReadHalf`] implementation using TCP.
#[derive(Debug)]
pub struct ReadHalf(tcp::OwnedReadHalf);

impl socket::ReadHalf for ReadHalf {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.0.read(buf).await.map_err(Into::into)
    }
}

/// The [`WriteHalf`] implementation using TCP.
#[derive(Debug)]
pub struct WriteHalf(tcp::OwnedWriteHalf);

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
