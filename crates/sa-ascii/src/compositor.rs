use rayon::prelude::*;
use sa_core::error::ConvertError;
use sa_core::frame::{AsciiCell, AsciiGrid, FrameBuffer};

use crate::luminance::reduce_block;
use crate::quantize::LuminanceLut;
use crate::sampler::BlockGrid;
use crate::style::StyleProfile;

/// Compositor orchestre la conversion pixel→glyphe pour un style donné.
///
/// preprocess → blocs → réduction → quantification → couleur.
///
/// # Example
/// ```
/// use sa_ascii::compositor::Compositor;
/// use sa_ascii::style::catalog;
/// use sa_core::frame::FrameBuffer;
///
/// let style = catalog().get("grayscale").unwrap();
/// let compositor = Compositor::new(style, 3).unwrap();
/// let grid = compositor.process(&FrameBuffer::filled(7, 3, (0, 0, 0)));
/// assert_eq!((grid.width, grid.height), (3, 1));
/// ```
pub struct Compositor {
    style: StyleProfile,
    lut: LuminanceLut,
    block_size: u32,
}

impl Compositor {
    /// Create a compositor for `style` sampling `block_size`-pixel blocks.
    ///
    /// # Errors
    /// Returns [`ConvertError::InvalidParameter`] when `block_size` is 0.
    pub fn new(style: &StyleProfile, block_size: u32) -> Result<Self, ConvertError> {
        if block_size == 0 {
            return Err(ConvertError::InvalidParameter(
                "block_size must be a positive integer".into(),
            ));
        }
        Ok(Self {
            style: style.clone(),
            lut: LuminanceLut::new(&style.ramp, style.gamma),
            block_size,
        })
    }

    #[must_use]
    pub fn style(&self) -> &StyleProfile {
        &self.style
    }

    #[must_use]
    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    /// Grid dimensions produced for a `width × height` source.
    #[must_use]
    pub fn grid_size(&self, width: u32, height: u32) -> (u32, u32) {
        (
            width.div_ceil(self.block_size),
            height.div_ceil(self.block_size),
        )
    }

    /// Process a frame into a grid of glyph placements.
    #[must_use]
    pub fn process(&self, frame: &FrameBuffer) -> AsciiGrid {
        let source = self.style.preprocess.apply(frame);
        let (gw, gh) = self.grid_size(source.width, source.height);
        let mut grid = AsciiGrid::new(gw, gh);
        if grid.cells.is_empty() {
            log::debug!(
                "Compositor: image vide {}x{}, aucun bloc",
                source.width,
                source.height
            );
            return grid;
        }

        // block_size validé dans new()
        let Ok(blocks) = BlockGrid::new(source.width, source.height, self.block_size) else {
            return grid;
        };

        grid.cells
            .par_chunks_mut(gw as usize)
            .enumerate()
            .for_each(|(gy, row)| {
                for (cell, block) in row.iter_mut().zip(blocks.row(gy as u32)) {
                    let Some(sample) = reduce_block(&source, &block, self.style.color_mode)
                    else {
                        continue;
                    };
                    *cell = AsciiCell {
                        ch: self.lut.map(sample.luminance),
                        fg: self.style.fill_color(sample.color),
                    };
                }
            });

        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocess::Preprocess;
    use crate::style::{ColorMode, catalog};
    use sa_core::charset::GlyphRamp;

    fn mono_style(ramp: &str) -> StyleProfile {
        StyleProfile {
            name: "test-mono",
            ramp: GlyphRamp::new(ramp).unwrap(),
            color_mode: ColorMode::Monochrome,
            background: (0, 0, 0),
            foreground: (255, 255, 255),
            gamma: 0.65,
            preprocess: Preprocess::Identity,
        }
    }

    #[test]
    fn black_image_renders_emptiest_glyph() {
        let compositor = Compositor::new(&mono_style(" .#"), 3).unwrap();
        let grid = compositor.process(&FrameBuffer::filled(6, 6, (0, 0, 0)));
        assert_eq!((grid.width, grid.height), (2, 2));
        assert!(grid.cells.iter().all(|c| c.ch == ' '));
    }

    #[test]
    fn single_white_pixel_selects_densest_glyph() {
        for name in ["colored", "grayscale", "blocks", "neon"] {
            let style = catalog().get(name).unwrap();
            let compositor = Compositor::new(style, 3).unwrap();
            let grid = compositor.process(&FrameBuffer::filled(1, 1, (255, 255, 255)));
            assert_eq!((grid.width, grid.height), (1, 1));
            assert_eq!(grid.get(0, 0).ch, style.ramp.densest(), "style {name}");
        }
    }

    #[test]
    fn inverted_style_flips_white_to_emptiest() {
        let style = catalog().get("inverted").unwrap();
        let grid = Compositor::new(style, 3)
            .unwrap()
            .process(&FrameBuffer::filled(1, 1, (255, 255, 255)));
        assert_eq!(grid.get(0, 0).ch, style.ramp.emptiest());
    }

    #[test]
    fn sketch_single_pixel_has_no_edge() {
        // Sobel n'a pas de voisinage sur 1×1 : aucun contour, glyphe le plus vide.
        let style = catalog().get("sketch").unwrap();
        let compositor = Compositor::new(style, 3).unwrap();
        let grid = compositor.process(&FrameBuffer::filled(1, 1, (255, 255, 255)));
        assert_eq!((grid.width, grid.height), (1, 1));
        assert_eq!(grid.get(0, 0).ch, style.ramp.emptiest());

        let flat = compositor.process(&FrameBuffer::filled(9, 9, (255, 255, 255)));
        assert!(flat.cells.iter().all(|c| c.ch == style.ramp.emptiest()));
    }

    #[test]
    fn color_style_keeps_sampled_color() {
        let style = catalog().get("colored").unwrap();
        let grid = Compositor::new(style, 2)
            .unwrap()
            .process(&FrameBuffer::filled(4, 2, (100, 50, 20)));
        // Brightness(1.3) appliqué avant échantillonnage.
        assert_eq!(grid.get(1, 0).fg, (130, 65, 26));
    }

    #[test]
    fn monochrome_uses_foreground() {
        let style = catalog().get("sketch").unwrap();
        let grid = Compositor::new(style, 2)
            .unwrap()
            .process(&FrameBuffer::filled(4, 4, (10, 200, 30)));
        assert!(grid.cells.iter().all(|c| c.fg == (0, 0, 0)));
    }

    #[test]
    fn ragged_edges_are_clipped_not_dropped() {
        let compositor = Compositor::new(&mono_style(" #"), 4).unwrap();
        let grid = compositor.process(&FrameBuffer::filled(9, 5, (255, 255, 255)));
        assert_eq!((grid.width, grid.height), (3, 2));
        assert!(grid.cells.iter().all(|c| c.ch == '#'));
    }

    #[test]
    fn zero_block_size_is_rejected() {
        assert!(Compositor::new(&mono_style(" #"), 0).is_err());
    }

    #[test]
    fn processing_is_deterministic() {
        let mut frame = FrameBuffer::filled(31, 17, (0, 0, 0));
        for (i, b) in frame.data.iter_mut().enumerate() {
            *b = (i * 37 % 251) as u8;
        }
        let compositor = Compositor::new(catalog().get("neon").unwrap(), 3).unwrap();
        let a = compositor.process(&frame);
        let b = compositor.process(&frame);
        assert_eq!(a.cells, b.cells);
    }
}
