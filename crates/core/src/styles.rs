//! The artistic style catalog.
//!
//! Styles are compiled in and never change at runtime. Gallery items refer to
//! styles by id only, so a saved item can outlive the style it was made with;
//! [`StyleCatalog::resolve`] covers that case by falling back to the default.

/// A named style descriptor driving the instruction sent to the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtStyle {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// Instruction template sent along with the photo.
    pub prompt: &'static str,
    pub preview_url: &'static str,
}

/// Styles offered to the user. The first entry is the default.
pub const ART_STYLES: &[ArtStyle] = &[
    ArtStyle {
        id: "renaissance",
        name: "Renaissance Master",
        description: "Classic oil painting with dramatic sfumato and anatomical precision.",
        prompt: "Transform this photo into a High Renaissance oil painting masterpiece, similar to the works of Leonardo da Vinci or Raphael. Use sfumato technique for soft transitions, realistic textures, warm museum-quality chiaroscuro lighting, and classic artistic composition. High fidelity, 8k resolution, oil on canvas texture.",
        preview_url: "https://images.unsplash.com/photo-1578301978693-85fa9c0320b9?q=80&w=400",
    },
    ArtStyle {
        id: "impressionist",
        name: "Impressionist Sun",
        description: "Vibrant visible brushstrokes and emphasis on the shifting quality of light.",
        prompt: "Transform this image into a late 19th-century impressionist masterpiece. Use heavy, visible, expressive brushstrokes and a vibrant color palette, reminiscent of Claude Monet. Capture the ephemeral play of light and atmosphere. High artistic fidelity, thick impasto textures.",
        preview_url: "https://images.unsplash.com/photo-1579783902614-a3fb3927b6a5?q=80&w=400",
    },
    ArtStyle {
        id: "surrealist",
        name: "Surrealist Dream",
        description: "Dreamlike imagery and impossible arrangements of reality.",
        prompt: "Transform this image into a surrealist dreamscape inspired by Salvador Dalí. Incorporate melting forms, impossible geometry, and ethereal, haunting lighting. Sharp focus amidst a landscape of dreams. High resolution, meticulously detailed.",
        preview_url: "https://images.unsplash.com/photo-1549490349-8643362247b5?q=80&w=400",
    },
    ArtStyle {
        id: "charcoal",
        name: "Fine Charcoal",
        description: "Sophisticated monochromatic hand-drawn sketch with deep contrast.",
        prompt: "A museum-quality fine charcoal and graphite drawing on heavy textured archival paper. Features realistic shading, intricate cross-hatching, and dramatic high-contrast lighting. Hand-drawn artistic imperfections, smudged shadows, fine-art sketch.",
        preview_url: "https://images.unsplash.com/photo-1541535881962-3bb380b08458?q=80&w=400",
    },
    ArtStyle {
        id: "cyberpunk",
        name: "Neo-Noir Digital",
        description: "Neon-infused digital masterpiece from a high-tech future.",
        prompt: "Reimagine this photo as a futuristic cyberpunk digital art piece. Neon-noir lighting, rainy atmosphere with realistic reflections, holographic elements, and high-tech intricate details. Cinematic lighting, octane render style, vibrant cyan and magenta palette.",
        preview_url: "https://images.unsplash.com/photo-1614728263952-84ea256f9679?q=80&w=400",
    },
    ArtStyle {
        id: "sculpture",
        name: "Classical Marble",
        description: "Carved white marble sculpture with dramatic studio lighting.",
        prompt: "Transform the subject of this photo into a classical Roman marble sculpture. Smooth white Carrara marble texture with subtle veins, dramatic side lighting creating deep shadows, carved with incredible detail and anatomical realism. Set against a dark, minimalist museum background.",
        preview_url: "https://images.unsplash.com/photo-1554188248-986adbb73be4?q=80&w=400",
    },
];

/// Read-only view over a non-empty list of styles.
#[derive(Debug, Clone, Copy)]
pub struct StyleCatalog {
    styles: &'static [ArtStyle],
}

impl StyleCatalog {
    /// Wraps a custom style list.
    ///
    /// Returns `None` for an empty list, since a catalog must have a default.
    pub fn new(styles: &'static [ArtStyle]) -> Option<Self> {
        if styles.is_empty() {
            None
        } else {
            Some(Self { styles })
        }
    }

    pub fn all(&self) -> &'static [ArtStyle] {
        self.styles
    }

    /// The style preselected after a capture.
    pub fn default_style(&self) -> ArtStyle {
        self.styles[0]
    }

    pub fn find(&self, id: &str) -> Option<ArtStyle> {
        self.styles.iter().find(|style| style.id == id).copied()
    }

    /// Looks up `id`, falling back to the default style for unknown ids.
    pub fn resolve(&self, id: &str) -> ArtStyle {
        self.find(id).unwrap_or_else(|| self.default_style())
    }
}

impl Default for StyleCatalog {
    fn default() -> Self {
        Self { styles: ART_STYLES }
    }
}
