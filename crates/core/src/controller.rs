//! The application state controller.
//!
//! [`StateController`] owns the live [`AppState`] snapshot and is the only
//! place that talks to the generation client, the authorization gate and the
//! gallery store. Every action takes `&mut self`, so actions are applied one
//! at a time, and every action swallows its failures: they end up in
//! [`AppState::error`] or in a logged warning, never in a returned error.
//!
//! The pipeline is capture → style selection → generation → result → gallery:
//!
//! ```ignore
//! controller.handle_capture(photo);
//! controller.select_style("charcoal");
//! controller.handle_generate().await;
//! controller.save_to_gallery();
//! ```

use crate::auth::AuthorizationGate;
use crate::capture::{CaptureSession, CaptureSource};
use crate::config::{DEFAULT_ASPECT_RATIO, DEFAULT_IMAGE_SIZE};
use crate::error::{AppError, GenerationError};
use crate::gallery::{GalleryItem, GalleryStore};
use crate::generation::{GenerationClient, GenerationRequest};
use crate::state::{AppState, Screen, View};
use crate::styles::StyleCatalog;
use tracing::{debug, info, warn};

pub struct StateController {
    state: AppState,
    catalog: StyleCatalog,
    gallery: GalleryStore,
    client: Box<dyn GenerationClient>,
    gate: Box<dyn AuthorizationGate>,
    aspect_ratio: String,
    target_resolution: String,
}

impl StateController {
    /// Creates the session state: home view, the loaded gallery, and the
    /// gate's current answer as the authorization flag.
    pub async fn start(
        gallery: GalleryStore,
        client: Box<dyn GenerationClient>,
        gate: Box<dyn AuthorizationGate>,
    ) -> Self {
        let authorized = gate.has_access().await;
        info!(
            event = "core.controller.started",
            gallery_items = gallery.len(),
            authorized
        );

        Self {
            state: AppState::initial(gallery.all().to_vec(), authorized),
            catalog: StyleCatalog::default(),
            gallery,
            client,
            gate,
            aspect_ratio: DEFAULT_ASPECT_RATIO.to_string(),
            target_resolution: DEFAULT_IMAGE_SIZE.to_string(),
        }
    }

    pub fn with_catalog(mut self, catalog: StyleCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Sets the aspect ratio and resolution requested from the generator.
    pub fn with_output_shape(
        mut self,
        aspect_ratio: impl Into<String>,
        target_resolution: impl Into<String>,
    ) -> Self {
        self.aspect_ratio = aspect_ratio.into();
        self.target_resolution = target_resolution.into();
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn catalog(&self) -> &StyleCatalog {
        &self.catalog
    }

    /// Navigates to `screen` and clears the error.
    ///
    /// Screens whose data is missing (editor without a photo, result without
    /// a rendering) are refused.
    pub fn set_view(&mut self, screen: Screen) {
        let next = self.state.with_view(screen);
        if next == self.state && self.state.view != View::from(screen) {
            debug!(event = "core.controller.view_refused", screen = ?screen);
        }
        self.state = next;
    }

    /// Accepts a captured or imported photo and opens the editor with the
    /// default style. Allowed while unauthorized, refused while a request is
    /// in flight.
    pub fn handle_capture(&mut self, image: impl Into<String>) {
        if self.state.is_processing {
            warn!(event = "core.controller.capture_refused_while_processing");
            return;
        }
        let image = image.into();
        if image.trim().is_empty() {
            warn!(event = "core.controller.empty_capture_ignored");
            return;
        }
        info!(event = "core.controller.captured", bytes = image.len());
        self.state = self.state.with_capture(image, self.catalog.default_style());
    }

    /// Runs one capture against `source` and feeds the frame to
    /// [`handle_capture`](Self::handle_capture).
    ///
    /// The source is released before this returns, whatever the outcome. A
    /// missing or refused device, or a blank frame, sends the user back home
    /// with the reason. Nothing is captured while a request is in flight.
    pub async fn capture_from(&mut self, source: &mut dyn CaptureSource) {
        if self.state.is_processing {
            warn!(event = "core.controller.capture_refused_while_processing");
            return;
        }
        self.set_view(Screen::Camera);

        let captured = match CaptureSession::open(source).await {
            Ok(mut session) => session.capture(),
            Err(e) => Err(e),
        };
        let captured = captured.and_then(|image| {
            if image.trim().is_empty() {
                Err(AppError::capture("The captured frame was empty"))
            } else {
                Ok(image)
            }
        });

        match captured {
            Ok(image) => self.handle_capture(image),
            Err(e) => {
                warn!(event = "core.controller.capture_failed", error = %e);
                self.state = self.state.capture_failed(e.to_string());
            }
        }
    }

    pub fn cancel_capture(&mut self) {
        self.set_view(Screen::Home);
    }

    /// Selects a catalog style. Unknown ids and changes during a request are ignored.
    pub fn select_style(&mut self, style_id: &str) {
        if self.state.is_processing {
            return;
        }
        match self.catalog.find(style_id) {
            Some(style) => self.state = self.state.with_style(style),
            None => debug!(event = "core.controller.unknown_style", style_id),
        }
    }

    /// Issues the generation request for the current photo and style.
    ///
    /// No-op without a photo or style, or while another request is
    /// outstanding. The gate is asked first; a closed gate only revokes
    /// authorization.
    pub async fn handle_generate(&mut self) {
        if !self.state.can_generate() {
            return;
        }

        if !self.gate.has_access().await {
            warn!(event = "core.controller.generation_unauthorized");
            self.set_authorized(false);
            return;
        }

        let Some(request) = self.begin_generate() else {
            return;
        };
        let result = self.client.generate(request).await;
        self.finish_generate(result);
    }

    /// First half of [`handle_generate`](Self::handle_generate): marks the
    /// request as in flight and returns it, for hosts that run the call on
    /// their own executor. Returns `None` when no request may be issued.
    pub fn begin_generate(&mut self) -> Option<GenerationRequest> {
        if !self.state.can_generate() {
            return None;
        }
        let (Some(image), Some(style)) = (&self.state.image, self.state.selected_style) else {
            return None;
        };

        match GenerationRequest::from_data_uri(
            image,
            style.prompt,
            &self.aspect_ratio,
            &self.target_resolution,
        ) {
            Ok(request) => {
                info!(event = "core.controller.generation_started", style_id = style.id);
                self.state = self.state.generation_started();
                Some(request)
            }
            Err(e) => {
                warn!(event = "core.controller.generation_rejected", error = %e);
                self.state = self
                    .state
                    .generation_failed(&GenerationError::Unknown(e.to_string()));
                None
            }
        }
    }

    /// Second half of [`handle_generate`](Self::handle_generate). Results
    /// arriving when no request is in flight are dropped.
    pub fn finish_generate(&mut self, result: Result<String, GenerationError>) {
        if !self.state.is_processing {
            warn!(event = "core.controller.stale_generation_result");
            return;
        }

        self.state = match result {
            Ok(processed) => {
                info!(event = "core.controller.generation_completed", bytes = processed.len());
                self.state.generation_succeeded(processed)
            }
            Err(e) => {
                warn!(
                    event = "core.controller.generation_failed",
                    error = %e,
                    invalid_credential = e == GenerationError::InvalidCredential
                );
                self.state.generation_failed(&e)
            }
        };
    }

    /// Saves the current result and opens the gallery.
    ///
    /// A failed write is only logged; the item stays in the session gallery.
    pub fn save_to_gallery(&mut self) {
        let (Some(image), Some(processed), Some(style)) = (
            &self.state.image,
            &self.state.processed_image,
            self.state.selected_style,
        ) else {
            return;
        };

        let item = GalleryItem::new(image.clone(), processed.clone(), style.id);
        if let Err(e) = self.gallery.add(item) {
            warn!(event = "core.controller.gallery_save_unpersisted", error = %e);
        }
        self.state = self
            .state
            .with_gallery(self.gallery.all().to_vec(), View::Gallery);
    }

    /// Opens the detail view of a saved item. Unknown ids are ignored.
    pub fn open_gallery_item(&mut self, id: &str) {
        if let Some(item) = self.gallery.get(id).cloned() {
            self.state = self.state.with_detail(item);
        }
    }

    /// Deletes a saved item and returns to the gallery.
    pub fn delete_gallery_item(&mut self, id: &str) {
        if let Err(e) = self.gallery.remove(id) {
            warn!(event = "core.controller.gallery_delete_unpersisted", id, error = %e);
        }
        self.state = self
            .state
            .with_gallery(self.gallery.all().to_vec(), View::Gallery);
    }

    /// Opens a saved item's original photo in the editor with its style,
    /// or the default style if that style no longer exists.
    pub fn re_edit_item(&mut self, item: &GalleryItem) {
        if item.original_image.trim().is_empty() {
            return;
        }
        if self.catalog.find(&item.style_id).is_none() {
            debug!(event = "core.controller.dangling_style", style_id = %item.style_id);
        }
        let style = self.catalog.resolve(&item.style_id);
        self.state = self.state.with_re_edit(item.original_image.clone(), style);
    }

    pub fn set_authorized(&mut self, authorized: bool) {
        if self.state.authorized != authorized {
            info!(event = "core.controller.authorization_changed", authorized);
        }
        self.state = self.state.with_authorized(authorized);
    }

    /// Forwards the user's request for access to the gate, then lifts the
    /// overlay. The next generation re-checks the gate.
    pub async fn grant_access(&mut self) {
        self.gate.grant_access().await;
        self.set_authorized(true);
    }

    pub async fn refresh_authorization(&mut self) {
        let authorized = self.gate.has_access().await;
        self.set_authorized(authorized);
    }
}
