use crate::config::{Config, api_key_from_env};
use crate::error::{AppError, GenerationError, Result};
use crate::generation::{GenerationClient, GenerationRequest, classify_service_error};
use crate::image_processing::ImageProcessor;
use futures::future::BoxFuture;
use gemini_rust::{Blob, Content, Gemini, Message, Part, Role};

const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";

/// Appended to every style instruction.
const OUTPUT_DIRECTIVE: &str = "Output should be a single beautiful artistic image.";

pub struct GeminiClient {
    api_key: Option<String>,
    model_url: String,
    base_url: url::Url,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self> {
        // Explicit base URL avoids the BadScheme error from the default one
        let base_url = url::Url::parse(API_BASE_URL)
            .map_err(|e| AppError::Config(format!("Invalid base URL: {}", e)))?;

        let model_name = if config.model_name.starts_with("models/") {
            config.model_name.clone()
        } else {
            format!("models/{}", config.model_name)
        };

        Ok(Self {
            api_key: config.gemini_api_key.clone(),
            model_url: format!("{}{}", API_BASE_URL, model_name),
            base_url,
        })
    }

    /// The key is resolved per call so a key granted after startup is used.
    fn resolve_key(&self) -> std::result::Result<String, GenerationError> {
        self.api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .or_else(api_key_from_env)
            .ok_or(GenerationError::MissingCredential)
    }

    /// Sends the photo and instruction and returns the first image part as a data URI.
    pub async fn render(
        &self,
        request: GenerationRequest,
    ) -> std::result::Result<String, GenerationError> {
        let api_key = self.resolve_key()?;

        let client =
            Gemini::with_model_and_base_url(&api_key, self.model_url.clone(), self.base_url.clone())
                .map_err(|e| {
                    GenerationError::Unknown(format!("Failed to create Gemini client: {:?}", e))
                })?;

        let image_part = Part::InlineData {
            inline_data: Blob {
                mime_type: request.mime_type,
                data: request.image_data,
            },
        };

        let text_part = Part::Text {
            text: instruction_text(
                &request.instruction_text,
                &request.aspect_ratio,
                &request.target_resolution,
            ),
            thought: None,
            thought_signature: None,
        };

        let message = Message {
            role: Role::User,
            content: Content {
                role: Some(Role::User),
                parts: Some(vec![image_part, text_part]),
            },
        };

        tracing::debug!(
            event = "core.generation.request_sent",
            model = %self.model_url,
            aspect_ratio = %request.aspect_ratio,
            resolution = %request.target_resolution
        );

        let response = client
            .generate_content()
            .with_messages(vec![message])
            .execute()
            .await
            .map_err(|e| {
                let message = format!("{:?}", e);
                tracing::warn!(event = "core.generation.request_failed", error = %message);
                classify_service_error(&message)
            })?;

        let inline = response
            .candidates
            .first()
            .and_then(|candidate| candidate.content.parts.as_ref())
            .and_then(|parts| {
                parts.iter().find_map(|part| match part {
                    Part::InlineData { inline_data, .. } => Some(inline_data),
                    _ => None,
                })
            })
            .filter(|blob| !blob.data.is_empty())
            .ok_or(GenerationError::EmptyResult)?;

        let mime_type = if inline.mime_type.is_empty() {
            "image/png"
        } else {
            inline.mime_type.as_str()
        };

        Ok(ImageProcessor::to_data_uri(mime_type, &inline.data))
    }
}

impl GenerationClient for GeminiClient {
    fn generate(
        &self,
        request: GenerationRequest,
    ) -> BoxFuture<'_, std::result::Result<String, GenerationError>> {
        Box::pin(self.render(request))
    }
}

/// The builder surface used here has no image config, so the output shape
/// travels as part of the instruction.
// TODO: send aspect ratio and resolution as image generation config once
// gemini-rust exposes an image config on its content builder.
fn instruction_text(prompt: &str, aspect_ratio: &str, resolution: &str) -> String {
    format!(
        "{}. {} Aspect ratio {}, {} resolution.",
        prompt.trim_end_matches('.'),
        OUTPUT_DIRECTIVE,
        aspect_ratio,
        resolution
    )
}
