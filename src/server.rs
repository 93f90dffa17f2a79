use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Semaphore;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::EnvFilter;

use crate::connection::{Connection, ConnectionError, ConnectionState, MAX_MESSAGE_SIZE};
use crate::processor;
use crate::Error;

pub const PORT: u16 = 5000;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Size of the single read that makes up a message.
    pub max_message_size: usize,
    /// Upper bound on connections handled at once. `None` means unbounded.
    pub max_connections: Option<usize>,
    /// How long a handler waits for the client's message. `None` waits forever.
    pub read_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: PORT,
            max_message_size: MAX_MESSAGE_SIZE,
            max_connections: None,
            read_timeout: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), Error> {
        if self.max_message_size == 0 {
            return Err(ConnectionError::InvalidMessageSize.into());
        }
        if self.max_connections == Some(0) {
            return Err("max connections must be greater than zero".into());
        }
        Ok(())
    }
}

pub async fn run(config: Config) -> Result<(), Error> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init()
        .map_err(|e| debug!("Failed to initialize global tracing: {}", e));

    let listener = TcpListener::bind(("127.0.0.1", config.port)).await?;

    serve(listener, config).await
}

/// Accepts connections forever, handling each one on its own task.
pub async fn serve(listener: TcpListener, config: Config) -> Result<(), Error> {
    config.validate()?;

    let config = Arc::new(config);
    let limit = config
        .max_connections
        .map(|max| Arc::new(Semaphore::new(max)));

    info!(
        max_connections = ?config.max_connections,
        max_message_size = config.max_message_size,
        "Server listening on {}",
        listener.local_addr()?
    );

    loop {
        let permit = match &limit {
            Some(limit) => Some(Arc::clone(limit).acquire_owned().await?),
            None => None,
        };

        let (socket, client_address) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!("Failed to accept connection: {}", e);
                continue;
            }
        };
        info!("Accepted connection from {:?}", client_address);

        let config = Arc::clone(&config);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(socket, client_address, &config).await {
                error!(error = %e, "Connection error");
            }
            drop(permit);
        });
    }
}

#[instrument(
    name = "connection",
    skip(stream, config),
    fields(connection_id, client_address)
)]
async fn handle_connection(
    stream: TcpStream,
    client_address: SocketAddr,
    config: &Config,
) -> Result<(), Error> {
    let mut conn = Connection::new(stream, client_address)
        .with_max_message_size(config.max_message_size)?
        .with_read_timeout(config.read_timeout);

    tracing::Span::current()
        .record("connection_id", conn.id.to_string())
        .record("client_address", client_address.to_string());

    debug!(state = ?ConnectionState::Accepted);

    debug!(state = ?ConnectionState::Reading);
    let mut message = conn.read_message().await?;
    info!(
        "Received message from client: {:?}",
        String::from_utf8_lossy(&message)
    );

    debug!(state = ?ConnectionState::Processing);
    let res = processor::process(&mut message)?;
    info!(
        "Sending response to client: {:?}",
        String::from_utf8_lossy(&res)
    );

    debug!(state = ?ConnectionState::Writing);
    conn.write_message(&res).await?;

    // The socket is released when `conn` drops, on every path out of this function.
    if let Err(e) = conn.close().await {
        debug!("Failed to shut down connection: {}", e);
    }

    debug!(state = ?ConnectionState::Closed);
    info!("Connection closed");
    Ok(())
}
