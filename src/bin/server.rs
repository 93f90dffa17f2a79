use clap::Parser;
use oneshot_rpc::server::{self, Config, PORT};
use oneshot_rpc::Error;
use std::time::Duration;

const MAX_MESSAGE_SIZE: usize = oneshot_rpc::connection::MAX_MESSAGE_SIZE;

#[derive(Parser, Debug)]
struct Args {
    /// The port to listen on
    #[arg(short, long, env = "ONESHOT_PORT", default_value_t = PORT)]
    port: u16,

    /// Bytes read from a connection to form its single message
    #[arg(long, env = "ONESHOT_MAX_MESSAGE_SIZE", default_value_t = MAX_MESSAGE_SIZE)]
    max_message_size: usize,

    /// Maximum number of connections handled concurrently (unbounded when omitted)
    #[arg(long, env = "ONESHOT_MAX_CONNECTIONS")]
    max_connections: Option<usize>,

    /// Milliseconds to wait for a client's message before dropping the connection
    #[arg(long, env = "ONESHOT_READ_TIMEOUT_MS")]
    read_timeout_ms: Option<u64>,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Config {
            port: args.port,
            max_message_size: args.max_message_size,
            max_connections: args.max_connections,
            read_timeout: args.read_timeout_ms.map(Duration::from_millis),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Args::parse();

    server::run(args.into()).await
}
