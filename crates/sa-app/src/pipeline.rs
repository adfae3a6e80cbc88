use sa_ascii::compositor::Compositor;
use sa_ascii::style::StyleProfile;
use sa_core::error::ConvertError;
use sa_core::frame::{AsciiGrid, FrameBuffer};
use sa_export::rasterizer::{GlyphAtlas, Rasterizer};

/// Pipeline d'une frame : image source → grille de glyphes → canvas.
///
/// Construit une fois par conversion; l'atlas est réutilisé pour toutes les
/// frames d'une vidéo.
pub struct FramePipeline {
    compositor: Compositor,
    rasterizer: Rasterizer,
    background: (u8, u8, u8),
}

impl FramePipeline {
    /// # Errors
    /// Returns [`ConvertError::InvalidParameter`] when `block_size` is 0.
    pub fn new(
        style: &StyleProfile,
        block_size: u32,
        atlas: GlyphAtlas,
    ) -> Result<Self, ConvertError> {
        Ok(Self {
            compositor: Compositor::new(style, block_size)?,
            rasterizer: Rasterizer::new(atlas),
            background: style.background,
        })
    }

    /// Grille de glyphes pour `frame`.
    #[must_use]
    pub fn compose(&self, frame: &FrameBuffer) -> AsciiGrid {
        self.compositor.process(frame)
    }

    /// Canvas rendu d'une grille déjà calculée.
    #[must_use]
    pub fn rasterize(&self, grid: &AsciiGrid) -> FrameBuffer {
        self.rasterizer.render(grid, self.background)
    }

    /// Frame source → canvas final.
    #[must_use]
    pub fn render(&self, frame: &FrameBuffer) -> FrameBuffer {
        self.rasterize(&self.compose(frame))
    }

    /// Taille du canvas produit pour une source `width × height`.
    #[must_use]
    pub fn canvas_size(&self, width: u32, height: u32) -> (u32, u32) {
        let (gw, gh) = self.compositor.grid_size(width, height);
        self.rasterizer.target_dimensions(gw, gh)
    }
}
