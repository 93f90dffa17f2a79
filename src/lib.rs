pub mod codec;
pub mod connection;
pub mod message;
pub mod methods;
pub mod processor;
pub mod server;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Result<T> = std::result::Result<T, Error>;
