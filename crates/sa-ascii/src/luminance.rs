use sa_core::color::luma;
use sa_core::frame::FrameBuffer;

use crate::sampler::Block;
use crate::style::ColorMode;

/// Signal réduit d'un bloc : luminance scalaire + couleur représentative.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockSample {
    pub luminance: u8,
    pub color: (u8, u8, u8),
}

/// Reduce a block of pixels to a luminance and a representative color.
///
/// - `Monochrome`: mean of per-pixel `(r + g + b) / 3`, integer truncating
///   at both steps. The color is the matching gray.
/// - `Color`: per-channel mean, then BT.709 weighted luminance of that mean.
///
/// Returns `None` for an empty block. Alpha is ignored.
///
/// # Example
/// ```
/// use sa_core::frame::FrameBuffer;
/// use sa_ascii::luminance::reduce_block;
/// use sa_ascii::sampler::BlockGrid;
/// use sa_ascii::style::ColorMode;
///
/// let frame = FrameBuffer::filled(3, 3, (255, 255, 255));
/// let block = BlockGrid::new(3, 3, 3).unwrap().block(0, 0);
/// let sample = reduce_block(&frame, &block, ColorMode::Color).unwrap();
/// assert_eq!(sample.luminance, 255);
/// assert_eq!(sample.color, (255, 255, 255));
/// ```
#[must_use]
pub fn reduce_block(frame: &FrameBuffer, block: &Block, mode: ColorMode) -> Option<BlockSample> {
    if block.is_empty() {
        return None;
    }
    let count = block.pixel_count();
    let stride = frame.stride();

    match mode {
        ColorMode::Monochrome => {
            let mut sum = 0u64;
            for y in block.y0..block.y1 {
                let row = &frame.data[y as usize * stride..][..stride];
                for px in row[block.x0 as usize * 4..block.x1 as usize * 4].chunks_exact(4) {
                    sum += (u64::from(px[0]) + u64::from(px[1]) + u64::from(px[2])) / 3;
                }
            }
            let l = (sum / count).min(255) as u8;
            Some(BlockSample {
                luminance: l,
                color: (l, l, l),
            })
        }
        ColorMode::Color => {
            let (mut r, mut g, mut b) = (0u64, 0u64, 0u64);
            for y in block.y0..block.y1 {
                let row = &frame.data[y as usize * stride..][..stride];
                for px in row[block.x0 as usize * 4..block.x1 as usize * 4].chunks_exact(4) {
                    r += u64::from(px[0]);
                    g += u64::from(px[1]);
                    b += u64::from(px[2]);
                }
            }
            let mean = |sum: u64| (sum / count).min(255) as u8;
            let (r, g, b) = (mean(r), mean(g), mean(b));
            Some(BlockSample {
                luminance: luma(r, g, b),
                color: (r, g, b),
            })
        }
    }
}
