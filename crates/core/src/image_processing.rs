//! Image encoding utilities.
//!
//! Images travel through the application as `data:` URIs: captured photos are
//! encoded as JPEG, generated results keep whatever mime type the service
//! returned. This module converts between decoded images, raw payloads and
//! data URIs.

use crate::error::{AppError, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

/// Mime type assumed for payloads that carry no data URI header.
pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// Image encoding helpers for the capture and generation paths.
pub struct ImageProcessor;

impl ImageProcessor {
    /// Encodes an image as a Base64 JPEG data URI.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ImageProcessing`] if JPEG encoding fails.
    pub fn encode_data_uri(image: &DynamicImage) -> Result<String> {
        let payload = Self::encode_to_base64_jpeg(image)?;
        Ok(Self::to_data_uri(DEFAULT_MIME_TYPE, &payload))
    }

    /// Decodes raw file bytes, guessing the format from the content.
    pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
        image::load_from_memory(bytes)
            .map_err(|e| AppError::image(format!("Failed to decode image: {}", e)))
    }

    /// Wraps a Base64 payload in a data URI.
    pub fn to_data_uri(mime_type: &str, payload: &str) -> String {
        format!("data:{};base64,{}", mime_type, payload)
    }

    /// Splits a data URI into its mime type and Base64 payload.
    ///
    /// A string without a `data:` header is treated as a bare JPEG payload.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ImageProcessing`] if the payload is empty.
    pub fn split_data_uri(uri: &str) -> Result<(String, String)> {
        let (mime_type, payload) = match uri.strip_prefix("data:") {
            Some(rest) => {
                let (header, payload) = rest
                    .split_once(',')
                    .ok_or_else(|| AppError::image("Data URI has no payload separator"))?;
                let mime_type = header.split(';').next().unwrap_or_default();
                let mime_type = if mime_type.is_empty() {
                    DEFAULT_MIME_TYPE
                } else {
                    mime_type
                };
                (mime_type.to_string(), payload.to_string())
            }
            None => (DEFAULT_MIME_TYPE.to_string(), uri.to_string()),
        };

        if payload.trim().is_empty() {
            return Err(AppError::image("Image payload is empty"));
        }

        Ok((mime_type, payload))
    }

    fn encode_to_base64_jpeg(image: &DynamicImage) -> Result<String> {
        let mut buffer: Vec<u8> = Vec::new();
        let mut cursor = Cursor::new(&mut buffer);

        // JPEG has no alpha channel
        DynamicImage::ImageRgb8(image.to_rgb8())
            .write_to(&mut cursor, ImageFormat::Jpeg)
            .map_err(|e| AppError::image(format!("Failed to encode image: {}", e)))?;

        Ok(BASE64.encode(buffer))
    }
}
