use crate::error::{AppError, Result};
use directories::ProjectDirs;
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_MODEL: &str = "gemini-3-pro-image-preview";
pub const DEFAULT_ASPECT_RATIO: &str = "3:4";
pub const DEFAULT_IMAGE_SIZE: &str = "1K";

#[derive(Clone, Debug)]
pub struct Config {
    /// Explicit key; `None` defers to `GEMINI_API_KEY` at call time.
    pub gemini_api_key: Option<String>,
    pub model_name: String,
    pub aspect_ratio: String,
    pub image_size: String,
    pub data_dir: PathBuf,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load .env file if it exists, ignore if it doesn't
        let _ = dotenv();

        let gemini_api_key = api_key_from_env();

        let model_name = env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let aspect_ratio =
            env::var("ARTISAN_ASPECT_RATIO").unwrap_or_else(|_| DEFAULT_ASPECT_RATIO.to_string());
        let image_size =
            env::var("ARTISAN_IMAGE_SIZE").unwrap_or_else(|_| DEFAULT_IMAGE_SIZE.to_string());

        let data_dir = match env::var("ARTISAN_DATA_DIR") {
            Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => default_data_dir()?,
        };

        Ok(Self {
            gemini_api_key,
            model_name,
            aspect_ratio,
            image_size,
            data_dir,
        })
    }

    /// Configuration rooted at `data_dir` with every other value defaulted.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            gemini_api_key: None,
            model_name: DEFAULT_MODEL.to_string(),
            aspect_ratio: DEFAULT_ASPECT_RATIO.to_string(),
            image_size: DEFAULT_IMAGE_SIZE.to_string(),
            data_dir: data_dir.into(),
        }
    }
}

/// Reads `GEMINI_API_KEY`, treating an empty value as unset.
pub fn api_key_from_env() -> Option<String> {
    env::var("GEMINI_API_KEY")
        .ok()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
}

fn default_data_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "artisan", "artisan-ai")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| AppError::config("Could not determine a home directory for the gallery"))
}
