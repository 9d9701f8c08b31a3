//! Application state snapshots.
//!
//! [`AppState`] is never edited in place by the controller. Each transition
//! below borrows the current snapshot and returns the next one, so a caller
//! holding a snapshot never observes a half-applied action. Transitions that
//! would break an invariant (entering the editor without a photo, showing a
//! result that does not exist) return an unchanged copy instead.

use crate::error::GenerationError;
use crate::gallery::GalleryItem;
use crate::styles::ArtStyle;

/// The current screen. Each variant carries exactly the data it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Home,
    Camera,
    Editing,
    Result,
    Gallery,
    GalleryDetail { item: GalleryItem },
}

/// Payload-free navigation targets, i.e. every view except the gallery detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Home,
    Camera,
    Editing,
    Result,
    Gallery,
}

impl From<Screen> for View {
    fn from(screen: Screen) -> Self {
        match screen {
            Screen::Home => View::Home,
            Screen::Camera => View::Camera,
            Screen::Editing => View::Editing,
            Screen::Result => View::Result,
            Screen::Gallery => View::Gallery,
        }
    }
}

/// What the host should put on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Displayed<'a> {
    /// The authorization prompt, which preempts every view.
    Authorization,
    View(&'a View),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub view: View,
    /// Captured or imported source photo.
    pub image: Option<String>,
    pub selected_style: Option<ArtStyle>,
    /// Last generated result.
    pub processed_image: Option<String>,
    /// True only while a generation request is outstanding.
    pub is_processing: bool,
    /// Last user-facing failure message.
    pub error: Option<String>,
    /// Saved items, most recent first.
    pub gallery: Vec<GalleryItem>,
    /// Whether the generation service is usable.
    pub authorized: bool,
}

impl AppState {
    pub fn initial(gallery: Vec<GalleryItem>, authorized: bool) -> Self {
        Self {
            view: View::Home,
            image: None,
            selected_style: None,
            processed_image: None,
            is_processing: false,
            error: None,
            gallery,
            authorized,
        }
    }

    pub fn selected_gallery_item(&self) -> Option<&GalleryItem> {
        match &self.view {
            View::GalleryDetail { item } => Some(item),
            _ => None,
        }
    }

    pub fn displayed(&self) -> Displayed<'_> {
        if self.authorized {
            Displayed::View(&self.view)
        } else {
            Displayed::Authorization
        }
    }

    /// Whether a generation request may be issued from this snapshot.
    pub fn can_generate(&self) -> bool {
        self.image.is_some() && self.selected_style.is_some() && !self.is_processing
    }

    fn allows(&self, screen: Screen) -> bool {
        match screen {
            Screen::Editing => self.image.is_some(),
            Screen::Result => self.image.is_some() && self.processed_image.is_some(),
            Screen::Home | Screen::Camera | Screen::Gallery => true,
        }
    }

    pub fn with_view(&self, screen: Screen) -> Self {
        if !self.allows(screen) {
            return self.clone();
        }
        Self {
            view: screen.into(),
            error: None,
            ..self.clone()
        }
    }

    /// A new photo invalidates any earlier rendering.
    pub fn with_capture(&self, image: String, style: ArtStyle) -> Self {
        Self {
            view: View::Editing,
            image: Some(image),
            selected_style: Some(style),
            processed_image: None,
            error: None,
            ..self.clone()
        }
    }

    pub fn capture_failed(&self, message: String) -> Self {
        Self {
            view: View::Home,
            error: Some(message),
            ..self.clone()
        }
    }

    /// Switching to a different style drops the rendering made with the old
    /// one and leaves the result view for the editor.
    pub fn with_style(&self, style: ArtStyle) -> Self {
        if self.selected_style.is_some_and(|current| current.id == style.id) {
            return self.clone();
        }
        let view = if self.view == View::Result {
            View::Editing
        } else {
            self.view.clone()
        };
        Self {
            view,
            selected_style: Some(style),
            processed_image: None,
            ..self.clone()
        }
    }

    pub fn generation_started(&self) -> Self {
        Self {
            is_processing: true,
            error: None,
            ..self.clone()
        }
    }

    pub fn generation_succeeded(&self, processed_image: String) -> Self {
        Self {
            view: View::Result,
            processed_image: Some(processed_image),
            is_processing: false,
            ..self.clone()
        }
    }

    /// Keeps the view, photo and style so the user can retry from the editor.
    pub fn generation_failed(&self, error: &GenerationError) -> Self {
        Self {
            is_processing: false,
            error: Some(error.to_string()),
            authorized: self.authorized && *error != GenerationError::InvalidCredential,
            ..self.clone()
        }
    }

    pub fn with_authorized(&self, authorized: bool) -> Self {
        Self {
            authorized,
            ..self.clone()
        }
    }

    /// Replaces the gallery snapshot and moves to `view`.
    pub fn with_gallery(&self, gallery: Vec<GalleryItem>, view: View) -> Self {
        Self {
            view,
            gallery,
            ..self.clone()
        }
    }

    pub fn with_detail(&self, item: GalleryItem) -> Self {
        Self {
            view: View::GalleryDetail { item },
            error: None,
            ..self.clone()
        }
    }

    /// Loads a saved item back into the editor.
    pub fn with_re_edit(&self, original_image: String, style: ArtStyle) -> Self {
        Self {
            view: View::Editing,
            image: Some(original_image),
            selected_style: Some(style),
            processed_image: None,
            error: None,
            ..self.clone()
        }
    }
}
