//! Byte source abstraction so the decoder can be driven by a serial port,
//! an in-memory stream or a test double.

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{CrsfRxError, Result};

/// Source of raw receiver bytes
///
/// Opening happens in the concrete constructor; closing is explicit so a
/// caller can release the device while keeping the decoded state around.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ByteSource: Send {
    /// Read up to `max_bytes`, waiting at most `timeout`
    ///
    /// Returns an empty buffer when the timeout expires with nothing to read.
    ///
    /// # Errors
    ///
    /// - [`CrsfRxError::NotOpen`] after [`ByteSource::close`]
    /// - [`CrsfRxError::Disconnected`] when the stream ends
    /// - [`CrsfRxError::Serial`] for any other read failure
    async fn read(&mut self, max_bytes: usize, timeout: Duration) -> Result<Bytes>;

    /// Release the underlying device
    fn close(&mut self);

    /// True until `close` is called
    fn is_open(&self) -> bool;
}

/// [`ByteSource`] over any async byte stream
pub struct StreamSource<R> {
    stream: Option<R>,
    name: String,
}

impl<R> std::fmt::Debug for StreamSource<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamSource")
            .field("name", &self.name)
            .field("open", &self.stream.is_some())
            .finish_non_exhaustive()
    }
}

impl<R> StreamSource<R> {
    /// Wrap an already opened stream
    pub fn new(stream: R, name: impl Into<String>) -> Self {
        Self {
            stream: Some(stream),
            name: name.into(),
        }
    }

    /// Name of the device or stream (e.g. /dev/serial0)
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl<R> ByteSource for StreamSource<R>
where
    R: AsyncRead + Unpin + Send,
{
    async fn read(&mut self, max_bytes: usize, timeout: Duration) -> Result<Bytes> {
        let stream = self.stream.as_mut().ok_or(CrsfRxError::NotOpen)?;
        let mut buf = BytesMut::zeroed(max_bytes);

        match tokio::time::timeout(timeout, stream.read(&mut buf)).await {
            Err(_) => Ok(Bytes::new()),
            Ok(Ok(0)) if max_bytes > 0 => Err(CrsfRxError::Disconnected(self.name.clone())),
            Ok(Ok(n)) => {
                buf.truncate(n);
                Ok(buf.freeze())
            }
            Ok(Err(e)) => Err(CrsfRxError::Serial(format!(
                "Failed to read from {}: {}",
                self.name, e
            ))),
        }
    }

    fn close(&mut self) {
        self.stream = None;
    }

    fn is_open(&self) -> bool {
        self.stream.is_some()
    }
}
