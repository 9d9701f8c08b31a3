//! The image generation contract.
//!
//! The controller only depends on [`GenerationClient`]; the Gemini-backed
//! implementation lives in [`crate::gemini`]. Implementations must classify
//! their failures as [`GenerationError`] so that a rejected credential can be
//! told apart from every other failure.

use crate::error::{AppError, GenerationError};
use crate::image_processing::ImageProcessor;
use futures::future::BoxFuture;

/// Text the service returns when the selected key no longer exists.
const INVALID_CREDENTIAL_SIGNAL: &str = "requested entity was not found";

/// A single stylization request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Base64 payload of the source image, without data URI header.
    pub image_data: String,
    pub mime_type: String,
    pub instruction_text: String,
    pub aspect_ratio: String,
    pub target_resolution: String,
}

impl GenerationRequest {
    /// Builds a request from a data URI and an instruction.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ImageProcessing`] if the image carries no payload.
    pub fn from_data_uri(
        image: &str,
        instruction: &str,
        aspect_ratio: &str,
        target_resolution: &str,
    ) -> Result<Self, AppError> {
        let (mime_type, image_data) = ImageProcessor::split_data_uri(image)?;
        Ok(Self {
            image_data,
            mime_type,
            instruction_text: instruction.to_string(),
            aspect_ratio: aspect_ratio.to_string(),
            target_resolution: target_resolution.to_string(),
        })
    }
}

/// Produces a stylized image from a source image and an instruction.
///
/// The returned string is the result image as a data URI. No retries are
/// performed; a failed request is only repeated when the user asks again.
pub trait GenerationClient: Send + Sync {
    fn generate(&self, request: GenerationRequest)
    -> BoxFuture<'_, Result<String, GenerationError>>;
}

/// Maps a raw service error message onto the consumer classification.
pub fn classify_service_error(message: &str) -> GenerationError {
    if message.to_lowercase().contains(INVALID_CREDENTIAL_SIGNAL) {
        GenerationError::InvalidCredential
    } else {
        GenerationError::Unknown(message.to_string())
    }
}
