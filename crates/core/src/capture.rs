//! Photo capture.
//!
//! A [`CaptureSource`] owns some device-like resource that must be acquired
//! before a frame can be taken and released afterwards. Callers never drive
//! that lifecycle by hand: [`CaptureSession`] acquires the source when opened
//! and releases it when dropped, so the device is freed whether the session
//! ends in a capture, a cancellation or an error.
//!
//! # Example
//!
//! ```ignore
//! use artisan_core::capture::{CaptureSession, FileCaptureSource};
//!
//! let mut source = FileCaptureSource::new("portrait.jpg");
//! let mut session = CaptureSession::open(&mut source).await?;
//! let data_uri = session.capture()?;
//! ```

use crate::error::{AppError, Result};
use crate::image_processing::ImageProcessor;
use futures::future::BoxFuture;
use image::DynamicImage;
use std::path::PathBuf;

/// Produces encoded still images on demand.
pub trait CaptureSource: Send {
    /// Acquires the underlying device.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CaptureUnavailable`] if the device is missing or
    /// access is denied.
    fn start(&mut self) -> BoxFuture<'_, Result<()>>;

    /// Takes one frame as a data URI.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DeviceUnavailable`] if [`start`](Self::start) never
    /// succeeded.
    fn capture(&mut self) -> Result<String>;

    /// Releases the device. Must be safe to call more than once.
    fn release(&mut self);
}

/// Scoped acquisition of a [`CaptureSource`].
pub struct CaptureSession<'a> {
    source: &'a mut dyn CaptureSource,
}

impl<'a> CaptureSession<'a> {
    /// Starts `source`, releasing it again if starting fails.
    pub async fn open(source: &'a mut dyn CaptureSource) -> Result<Self> {
        let started = source.start().await;
        if let Err(e) = started {
            source.release();
            return Err(e);
        }
        tracing::debug!(event = "core.capture.session_opened");
        Ok(Self { source })
    }

    pub fn capture(&mut self) -> Result<String> {
        self.source.capture()
    }
}

impl Drop for CaptureSession<'_> {
    fn drop(&mut self) {
        self.source.release();
        tracing::debug!(event = "core.capture.session_released");
    }
}

/// Imports a photo from disk.
///
/// Reading and decoding the file is the "acquisition"; the decoded image is
/// held until release.
pub struct FileCaptureSource {
    path: PathBuf,
    image: Option<DynamicImage>,
}

impl FileCaptureSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            image: None,
        }
    }

    /// Whether a decoded image is currently held.
    pub fn is_acquired(&self) -> bool {
        self.image.is_some()
    }
}

impl CaptureSource for FileCaptureSource {
    fn start(&mut self) -> BoxFuture<'_, Result<()>> {
        Box::pin(async move {
            let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
                AppError::capture(format!("Cannot read {}: {}", self.path.display(), e))
            })?;

            let image = ImageProcessor::decode(&bytes).map_err(|e| {
                AppError::capture(format!("{} is not a usable photo: {}", self.path.display(), e))
            })?;

            tracing::info!(
                event = "core.capture.file_loaded",
                path = %self.path.display(),
                width = image.width(),
                height = image.height()
            );
            self.image = Some(image);
            Ok(())
        })
    }

    fn capture(&mut self) -> Result<String> {
        let image = self.image.as_ref().ok_or(AppError::DeviceUnavailable)?;
        ImageProcessor::encode_data_uri(image)
    }

    fn release(&mut self) {
        self.image = None;
    }
}
