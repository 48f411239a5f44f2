//! Async output for tokio-based servers.
//!
//! Encoding is CPU-bound and runs synchronously into memory; only the
//! finished file is written to the async sink. A failed encode therefore
//! writes nothing.
//!
//! # Example
//!
//! ```rust,ignore
//! use oxipix::async_io::write_async;
//! use oxipix::{ImageFormat, PixelBuffer};
//!
//! async fn respond<W: tokio::io::AsyncWrite + Unpin>(body: &mut W) -> oxipix::Result<usize> {
//!     let icon = PixelBuffer::filled(16, 16, 0xFF3366CC);
//!     write_async(&icon, &ImageFormat::Png.into(), body).await
//! }
//! ```
//!
//! # Feature Flag
//!
//! Only available with the `async-io` feature:
//!
//! ```toml
//! [dependencies]
//! oxipix = { version = "0.1.0", features = ["async-io"] }
//! ```

use crate::{EncodeOptions, encode};
use oxipix_core::error::{OxiPixError, Result};
use oxipix_core::pixel::{PixelBuffer, PixelSource};
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Encode `source` and write the file to an async sink.
///
/// Returns the number of bytes written. The writer is flushed on success.
pub async fn write_async<S, W>(source: S, options: &EncodeOptions, writer: &mut W) -> Result<usize>
where
    S: PixelSource,
    W: AsyncWrite + Unpin,
{
    let bytes = encode(source, options)?;
    writer.write_all(&bytes).await?;
    writer.flush().await?;
    Ok(bytes.len())
}

/// Encode an owned image on tokio's blocking thread pool.
pub async fn encode_blocking(image: PixelBuffer, options: EncodeOptions) -> Result<Vec<u8>> {
    tokio::task::spawn_blocking(move || encode(&image, &options))
        .await
        .map_err(|e| OxiPixError::Io(std::io::Error::other(e)))?
}
