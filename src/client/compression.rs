use tracing::{trace, warn};

use super::state::CompressionMode;
use super::NntpClient;

impl NntpClient {
    /// Get bandwidth statistics (compressed vs decompressed bytes)
    ///
    /// Returns `(bytes_compressed, bytes_decompressed)`.
    /// Returns `(0, 0)` if compression is not enabled.
    pub fn get_bandwidth_stats(&self) -> (u64, u64) {
        (self.bytes_compressed, self.bytes_decompressed)
    }

    /// Check if compression is enabled
    pub fn is_compression_enabled(&self) -> bool {
        self.compression_mode != CompressionMode::None
    }

    /// Decompress data based on current compression mode
    pub(super) fn maybe_decompress(&mut self, data: &[u8]) -> Vec<u8> {
        use flate2::read::{DeflateDecoder, ZlibDecoder};
        use std::io::Read;

        match self.compression_mode {
            CompressionMode::None => data.to_vec(),
            CompressionMode::HeadersOnly => {
                // Use zlib decompression (server sends zlib despite calling it "GZIP")
                let mut decoder = ZlibDecoder::new(data);
                // Pre-allocate: compressed data typically expands 3-5x
                let mut decompressed = Vec::with_capacity(data.len() * 3);
                match decoder.read_to_end(&mut decompressed) {
                    Ok(_) => {
                        self.bytes_compressed += data.len() as u64;
                        self.bytes_decompressed += decompressed.len() as u64;
                        trace!(
                            "Decompressed {} bytes to {} bytes (zlib)",
                            data.len(),
                            decompressed.len()
                        );
                        decompressed
                    }
                    Err(e) => {
                        warn!("Zlib decompression failed: {}. Using uncompressed data.", e);
                        data.to_vec()
                    }
                }
            }
            CompressionMode::FullSession => {
                // Use deflate decompression
                let mut decoder = DeflateDecoder::new(data);
                // Pre-allocate: compressed data typically expands 3-5x
                let mut decompressed = Vec::with_capacity(data.len() * 3);
                match decoder.read_to_end(&mut decompressed) {
                    Ok(_) => {
                        self.bytes_compressed += data.len() as u64;
                        self.bytes_decompressed += decompressed.len() as u64;
                        trace!(
                            "Decompressed {} bytes to {} bytes (deflate)",
                            data.len(),
                            decompressed.len()
                        );
                        decompressed
                    }
                    Err(e) => {
                        warn!(
                            "Deflate decompression failed: {}. Using uncompressed data.",
                            e
                        );
                        data.to_vec()
                    }
                }
            }
        }
    }
}
