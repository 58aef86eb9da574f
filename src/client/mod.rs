//! NNTP client implementation with TLS and compression support

mod compression;
mod connection;
mod io;
mod state;

use crate::config::ServerConfig;
use state::{CompressionMode, ConnectionState};
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tracing::debug;

/// Async NNTP connection realizing the Socket/SocketCreator line-oriented
/// duplex channel: TLS connect plus generic command send / response read.
///
/// # Example
///
/// ```no_run
/// use nntp_rs::{NntpClient, ServerConfig};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ServerConfig::tls("news.example.com", "user", "pass");
/// let client = NntpClient::connect(Arc::new(config)).await?;
/// assert!(!client.is_broken());
/// # Ok(())
/// # }
/// ```
#[must_use]
pub struct NntpClient {
    /// TLS stream (both reader and writer)
    stream: BufReader<TlsStream<TcpStream>>,
    /// Connection state
    state: ConnectionState,
    /// Server configuration
    config: Arc<ServerConfig>,
    /// Compression mode for this connection
    compression_mode: CompressionMode,
    /// Total compressed bytes received (only when compression enabled)
    bytes_compressed: u64,
    /// Total decompressed bytes (original size)
    bytes_decompressed: u64,
    /// Whether this connection is broken (received garbage/invalid data)
    is_broken: bool,
}

impl NntpClient {
    /// Check if this connection is broken and should be discarded
    pub fn is_broken(&self) -> bool {
        self.is_broken
    }

    /// Mark this connection as broken
    fn mark_broken(&mut self) {
        self.is_broken = true;
    }
}

impl Drop for NntpClient {
    fn drop(&mut self) {
        debug!("NntpClient dropped");
    }
}
