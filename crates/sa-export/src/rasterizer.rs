use std::collections::HashMap;
use std::path::Path;

use ab_glyph::{Font, FontRef, Point, PxScale, point};
use anyhow::Result;
use rayon::prelude::*;
use sa_core::charset::GlyphRamp;
use sa_core::error::{ConvertError, Stage};
use sa_core::frame::{AsciiGrid, FrameBuffer};

/// Masques alpha des glyphes, tous de taille `char_width × char_height`.
///
/// La taille de cellule est mesurée une seule fois et partagée par tous les
/// placements, ce qui garde la grille du canvas uniforme.
///
/// # Example
/// ```
/// use sa_export::rasterizer::GlyphAtlas;
/// let atlas = GlyphAtlas::from_masks(2, 2, [('#', vec![255; 4])]).unwrap();
/// assert_eq!(atlas.cell_size(), (2, 2));
/// assert_eq!(atlas.mask('#'), &[255, 255, 255, 255]);
/// assert_eq!(atlas.mask('?'), &[0, 0, 0, 0]);
/// ```
pub struct GlyphAtlas {
    char_width: u32,
    char_height: u32,
    /// Maps a char to its 1D alpha buffer (size = char_width * char_height)
    masks: HashMap<char, Vec<u8>>,
    /// Fallback for chars without a mask.
    empty: Vec<u8>,
}

impl GlyphAtlas {
    /// Rasterise every glyph of `ramp` with a TrueType/OpenType font.
    ///
    /// The cell is the pixel bounding box of the ramp's densest glyph; every
    /// other glyph is drawn relative to that box and clipped to it. Falls back
    /// to advance width × line height when the densest glyph has no outline.
    ///
    /// # Errors
    /// Returns [`ConvertError::InvalidParameter`] if the font data is invalid.
    pub fn from_font(font_data: &[u8], px_size: f32, ramp: &GlyphRamp) -> Result<Self> {
        let font = FontRef::try_from_slice(font_data)
            .map_err(|e| ConvertError::InvalidParameter(format!("police invalide: {e}")))?;
        let scale = PxScale::from(px_size);
        let ascent_px = font.ascent_unscaled() * scale.y / font.height_unscaled();

        let densest = ramp.densest();
        let probe = font
            .glyph_id(densest)
            .with_scale_and_position(scale, point(0.0, ascent_px));

        let (origin, char_width, char_height) = if let Some(outline) = font.outline_glyph(probe) {
            let bounds = outline.px_bounds();
            (
                bounds.min,
                bounds.width().ceil() as u32,
                bounds.height().ceil() as u32,
            )
        } else {
            let v_advance =
                font.ascent_unscaled() - font.descent_unscaled() + font.line_gap_unscaled();
            let height = (v_advance * scale.y / font.height_unscaled()).ceil() as u32;
            let h_advance = font.h_advance_unscaled(font.glyph_id(densest));
            let width = (h_advance * scale.x / font.height_unscaled()).ceil() as u32;
            (point(0.0, 0.0), width, height)
        };

        let mut atlas = Self::empty(char_width.max(1), char_height.max(1));
        for &ch in ramp.chars() {
            atlas.cache_glyph(&font, scale, ascent_px, origin, ch);
        }
        log::debug!(
            "GlyphAtlas: cellule {}x{} px (glyphe '{densest}', {px_size}px)",
            atlas.char_width,
            atlas.char_height
        );
        Ok(atlas)
    }

    /// Build an atlas from pre-rendered masks of `width × height` bytes.
    ///
    /// # Errors
    /// Returns [`ConvertError::InvalidParameter`] for a zero-sized cell or a
    /// mask of the wrong length.
    pub fn from_masks(
        width: u32,
        height: u32,
        masks: impl IntoIterator<Item = (char, Vec<u8>)>,
    ) -> Result<Self, ConvertError> {
        if width == 0 || height == 0 {
            return Err(ConvertError::InvalidParameter(format!(
                "glyph cell must be non-empty, got {width}x{height}"
            )));
        }
        let mut atlas = Self::empty(width, height);
        for (ch, mask) in masks {
            if mask.len() != atlas.empty.len() {
                return Err(ConvertError::InvalidParameter(format!(
                    "mask for {ch:?} has {} bytes, expected {}",
                    mask.len(),
                    atlas.empty.len()
                )));
            }
            atlas.masks.insert(ch, mask);
        }
        Ok(atlas)
    }

    fn empty(char_width: u32, char_height: u32) -> Self {
        Self {
            char_width,
            char_height,
            masks: HashMap::new(),
            empty: vec![0u8; char_width as usize * char_height as usize],
        }
    }

    fn cache_glyph<F: Font>(&mut self, font: &F, scale: PxScale, ascent_px: f32, origin: Point, ch: char) {
        let gid = font.glyph_id(ch);
        // glyph_id 0 = .notdef : on ne veut pas de boîte "?" dans le rendu.
        if gid.0 == 0 {
            log::warn!("GlyphAtlas: la police n'a pas de glyphe pour {ch:?}, cellule vide.");
            return;
        }

        let (w, h) = (self.char_width as i32, self.char_height as i32);
        let mut buffer = self.empty.clone();
        let glyph = gid.with_scale_and_position(scale, point(-origin.x, ascent_px - origin.y));

        if let Some(outline) = font.outline_glyph(glyph) {
            let bounds = outline.px_bounds();
            outline.draw(|x, y, v| {
                let px = x as i32 + bounds.min.x as i32;
                let py = y as i32 + bounds.min.y as i32;
                if (0..w).contains(&px) && (0..h).contains(&py) {
                    let idx = (py * w + px) as usize;
                    buffer[idx] = (v * 255.0).round().clamp(0.0, 255.0) as u8;
                }
            });
        }
        self.masks.insert(ch, buffer);
    }

    /// Glyph cell size in pixels.
    #[must_use]
    pub fn cell_size(&self) -> (u32, u32) {
        (self.char_width, self.char_height)
    }

    /// Alpha mask for `ch`; all zeros when the atlas has none.
    #[inline]
    #[must_use]
    pub fn mask(&self, ch: char) -> &[u8] {
        self.masks.get(&ch).unwrap_or(&self.empty)
    }
}

/// Convertit une AsciiGrid en pixels RGBA.
pub struct Rasterizer {
    atlas: GlyphAtlas,
}

impl Rasterizer {
    #[must_use]
    pub fn new(atlas: GlyphAtlas) -> Self {
        Self { atlas }
    }

    #[must_use]
    pub fn atlas(&self) -> &GlyphAtlas {
        &self.atlas
    }

    /// Dimensions du canvas pour une grille donnée.
    #[must_use]
    pub fn target_dimensions(&self, grid_w: u32, grid_h: u32) -> (u32, u32) {
        (
            grid_w.saturating_mul(self.atlas.char_width),
            grid_h.saturating_mul(self.atlas.char_height),
        )
    }

    /// Rendu de la grille sur un canvas neuf rempli de `background`.
    ///
    /// Chaque bande horizontale appartient à une seule ligne de la grille :
    /// le rendu parallèle est déterministe.
    ///
    /// # Example
    /// ```
    /// use sa_export::rasterizer::{GlyphAtlas, Rasterizer};
    /// use sa_core::frame::{AsciiCell, AsciiGrid};
    ///
    /// let atlas = GlyphAtlas::from_masks(2, 3, [('#', vec![255; 6])]).unwrap();
    /// let rasterizer = Rasterizer::new(atlas);
    /// let mut grid = AsciiGrid::new(2, 1);
    /// grid.set(1, 0, AsciiCell { ch: '#', fg: (255, 0, 0) });
    /// let canvas = rasterizer.render(&grid, (0, 0, 0));
    /// assert_eq!((canvas.width, canvas.height), (4, 3));
    /// assert_eq!(canvas.pixel(0, 0), (0, 0, 0, 255));
    /// assert_eq!(canvas.pixel(3, 2), (255, 0, 0, 255));
    /// ```
    #[must_use]
    pub fn render(&self, grid: &AsciiGrid, background: (u8, u8, u8)) -> FrameBuffer {
        let (width, height) = self.target_dimensions(grid.width, grid.height);
        let mut canvas = FrameBuffer::filled(width, height, background);
        if canvas.is_empty() {
            return canvas;
        }

        let cw = self.atlas.char_width as usize;
        let ch = self.atlas.char_height as usize;
        let stride = canvas.stride();
        let band_size = stride * ch;
        let (bg_r, bg_g, bg_b) = (
            f32::from(background.0),
            f32::from(background.1),
            f32::from(background.2),
        );

        canvas
            .data
            .par_chunks_exact_mut(band_size)
            .enumerate()
            .for_each(|(gy, band)| {
                for gx in 0..grid.width {
                    let cell = grid.get(gx, gy as u32);
                    let mask = self.atlas.mask(cell.ch);
                    let x_start = gx as usize * cw;

                    for cy in 0..ch {
                        let row_offset = cy * stride;
                        for cx in 0..cw {
                            let alpha = mask[cy * cw + cx];
                            if alpha == 0 {
                                continue;
                            }
                            let a = f32::from(alpha) / 255.0;
                            let r = f32::from(cell.fg.0) * a + bg_r * (1.0 - a);
                            let g = f32::from(cell.fg.1) * a + bg_g * (1.0 - a);
                            let b = f32::from(cell.fg.2) * a + bg_b * (1.0 - a);

                            let idx = row_offset + (x_start + cx) * 4;
                            band[idx] = r.round() as u8;
                            band[idx + 1] = g.round() as u8;
                            band[idx + 2] = b.round() as u8;
                        }
                    }
                }
            });

        canvas
    }
}

/// Écrit le canvas en PNG RGB.
///
/// # Errors
/// Returns [`ConvertError::Encode`] (image stage) if the file cannot be written.
pub fn save_png(canvas: &FrameBuffer, path: &Path) -> Result<()> {
    let rgb: Vec<u8> = canvas
        .data
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();
    let img = image::RgbImage::from_raw(canvas.width, canvas.height, rgb).ok_or_else(|| {
        ConvertError::encode(Stage::Image, "canvas buffer does not match its dimensions")
    })?;
    img.save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| ConvertError::encode(Stage::Image, format!("{}: {e}", path.display())))?;
    log::info!(
        "PNG écrit: {}x{} — {}",
        canvas.width,
        canvas.height,
        path.display()
    );
    Ok(())
}
