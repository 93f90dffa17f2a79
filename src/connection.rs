use bytes::BytesMut;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error as ThisError;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use uuid::Uuid;

use crate::Error;

/// Default upper bound of a single message, in bytes.
pub const MAX_MESSAGE_SIZE: usize = 1024;

/// One accepted client connection.
///
/// A message is whatever a single `read` call returns, up to `max_message_size` bytes. There is
/// no delimiter and no length prefix: a larger message is truncated, and a message split across
/// several TCP segments may be cut short.
pub struct Connection {
    pub id: Uuid,
    pub client_address: SocketAddr,
    stream: TcpStream,
    max_message_size: usize,
    read_timeout: Option<Duration>,
}

/// Lifecycle of a connection, from accept to close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Accepted,
    Reading,
    Processing,
    Writing,
    Closed,
}

#[derive(Debug, ThisError, PartialEq)]
pub enum ConnectionError {
    #[error("timed out after {0:?} waiting for a message")]
    ReadTimeout(Duration),
    #[error("max message size must be greater than zero")]
    InvalidMessageSize,
}

impl Connection {
    pub fn new(stream: TcpStream, client_address: SocketAddr) -> Connection {
        Connection {
            id: Uuid::new_v4(),
            client_address,
            stream,
            max_message_size: MAX_MESSAGE_SIZE,
            read_timeout: None,
        }
    }

    pub fn with_max_message_size(mut self, max_message_size: usize) -> Result<Self, Error> {
        if max_message_size == 0 {
            return Err(ConnectionError::InvalidMessageSize.into());
        }
        self.max_message_size = max_message_size;
        Ok(self)
    }

    pub fn with_read_timeout(mut self, read_timeout: Option<Duration>) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    /// Reads one message with a single `read` call. Returns an empty buffer if the peer closed
    /// the connection without sending anything.
    pub async fn read_message(&mut self) -> Result<BytesMut, Error> {
        let mut buffer = BytesMut::zeroed(self.max_message_size);

        let read = self.stream.read(&mut buffer[..]);
        let n = match self.read_timeout {
            Some(timeout) => tokio::time::timeout(timeout, read)
                .await
                .map_err(|_| ConnectionError::ReadTimeout(timeout))??,
            None => read.await?,
        };

        buffer.truncate(n);
        Ok(buffer)
    }

    pub async fn write_message(&mut self, src: &[u8]) -> Result<(), Error> {
        self.stream.write_all(src).await?;
        self.stream.flush().await?;
        Ok(())
    }

    /// Shuts down the write half so the peer sees EOF. The socket itself is released on drop.
    pub async fn close(mut self) -> Result<(), Error> {
        self.stream.shutdown().await?;
        Ok(())
    }
}
