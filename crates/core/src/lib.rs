//! Artisan Core Library
//!
//! This library turns photos into stylized artwork through Google's Gemini
//! image models and keeps the results in a locally persisted gallery.
//!
//! # Overview
//!
//! A session moves through capture, style selection, generation and the
//! result view, and can browse, re-edit or delete saved pieces. The library
//! handles:
//!
//! - **State**: the single session snapshot and its transitions via [`controller`]
//! - **Capture**: scoped device acquisition and photo import via [`capture`]
//! - **Generation**: the classified generation contract via [`generation`],
//!   backed by [`gemini`]
//! - **Persistence**: the gallery via [`gallery`] on top of [`storage`]
//!
//! # Quick Start
//!
//! ```ignore
//! use artisan_core::{Artisan, FileCaptureSource};
//!
//! artisan_core::init();
//! let app = Artisan::new()?;
//! let mut controller = app.start().await?;
//!
//! controller.capture_from(&mut FileCaptureSource::new("portrait.jpg")).await;
//! controller.select_style("impressionist");
//! controller.handle_generate().await;
//! controller.save_to_gallery();
//! ```
//!
//! # Module Structure
//!
//! - [`auth`]: Authorization gate for the generation service
//! - [`capture`]: Capture sources and the release-on-drop session
//! - [`config`]: Configuration loading
//! - [`controller`]: The state controller and its actions
//! - [`error`]: Error types and result aliases
//! - [`gallery`]: Gallery items and the persisted store
//! - [`gemini`]: Gemini implementation of the generation contract
//! - [`generation`]: Generation request, client trait and error classification
//! - [`image_processing`]: Data URI encoding utilities
//! - [`state`]: Snapshot types and pure transitions
//! - [`storage`]: Keyed storage media
//! - [`styles`]: The artistic style catalog

pub mod auth;
pub mod capture;
pub mod config;
pub mod controller;
pub mod error;
pub mod gallery;
pub mod gemini;
pub mod generation;
pub mod image_processing;
pub mod state;
pub mod storage;
pub mod styles;

// Re-export primary types for convenience
pub use auth::{AlwaysAuthorized, ApiKeyGate, AuthorizationGate};
pub use capture::{CaptureSession, CaptureSource, FileCaptureSource};
pub use config::Config;
pub use controller::StateController;
pub use error::{AppError, GenerationError, Result};
pub use gallery::{GalleryItem, GalleryStore};
pub use gemini::GeminiClient;
pub use generation::{GenerationClient, GenerationRequest};
pub use state::{AppState, Displayed, Screen, View};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use styles::{ART_STYLES, ArtStyle, StyleCatalog};

/// Main entry point for the Artisan application.
///
/// Wires the real collaborators (file-backed gallery, Gemini client, API key
/// gate) from a [`Config`] into a started [`StateController`].
///
/// # Example
///
/// ```ignore
/// use artisan_core::Artisan;
///
/// let controller = Artisan::new()?.start().await?;
/// ```
pub struct Artisan {
    config: Config,
}

impl Artisan {
    /// Creates an instance configured from the environment (including `.env`).
    ///
    /// # Errors
    ///
    /// Returns an error if no data directory can be determined.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config: Config::load()?,
        })
    }

    /// Creates an instance with custom configuration.
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Loads the gallery, checks authorization and returns the controller.
    ///
    /// A missing or unreadable gallery never fails startup.
    ///
    /// # Errors
    ///
    /// Returns an error if the Gemini client cannot be configured.
    pub async fn start(&self) -> Result<StateController> {
        let storage = FileStorage::new(&self.config.data_dir);
        let gallery = GalleryStore::load(Box::new(storage));
        let client = GeminiClient::new(&self.config)?;
        let gate = ApiKeyGate::new(self.config.gemini_api_key.clone());

        let controller = StateController::start(gallery, Box::new(client), Box::new(gate))
            .await
            .with_output_shape(&self.config.aspect_ratio, &self.config.image_size);
        Ok(controller)
    }

    /// Returns a reference to the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Initializes the library: loads `.env` files if present and installs the
/// tracing subscriber (filtered by `RUST_LOG`, `info` by default).
///
/// Call this once at application startup. Calling it again is harmless.
pub fn init() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
