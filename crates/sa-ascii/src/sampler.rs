use sa_core::error::ConvertError;

/// A clipped `block_size × block_size` rectangle of source pixels.
///
/// Covers `[x0, x1) × [y0, y1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Block {
    /// Grid column.
    pub gx: u32,
    /// Grid row.
    pub gy: u32,
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl Block {
    /// Number of source pixels covered.
    #[inline]
    #[must_use]
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.x1 - self.x0) * u64::from(self.y1 - self.y0)
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }
}

/// Partition d'une image en grille de blocs fixes, bords clippés.
///
/// La grille fait `ceil(W/B) × ceil(H/B)` cellules. Pure fonction des
/// dimensions : itérer deux fois donne la même séquence.
///
/// # Example
/// ```
/// use sa_ascii::sampler::BlockGrid;
/// let grid = BlockGrid::new(10, 7, 3).unwrap();
/// assert_eq!((grid.grid_width(), grid.grid_height()), (4, 3));
/// let last = grid.block(3, 2);
/// assert_eq!((last.x0, last.x1, last.y0, last.y1), (9, 10, 6, 7));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct BlockGrid {
    width: u32,
    height: u32,
    block_size: u32,
    grid_width: u32,
    grid_height: u32,
}

impl BlockGrid {
    /// # Errors
    /// Returns [`ConvertError::InvalidParameter`] when `block_size` is 0.
    pub fn new(width: u32, height: u32, block_size: u32) -> Result<Self, ConvertError> {
        if block_size == 0 {
            return Err(ConvertError::InvalidParameter(
                "block_size must be at least 1".into(),
            ));
        }
        Ok(Self {
            width,
            height,
            block_size,
            grid_width: width.div_ceil(block_size),
            grid_height: height.div_ceil(block_size),
        })
    }

    #[must_use]
    pub fn grid_width(&self) -> u32 {
        self.grid_width
    }

    #[must_use]
    pub fn grid_height(&self) -> u32 {
        self.grid_height
    }

    #[must_use]
    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    /// Total number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.grid_width as usize * self.grid_height as usize
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Block at grid coordinates (gx, gy), clipped to the image.
    #[inline]
    #[must_use]
    pub fn block(&self, gx: u32, gy: u32) -> Block {
        let b = self.block_size;
        let x0 = gx.saturating_mul(b).min(self.width);
        let y0 = gy.saturating_mul(b).min(self.height);
        Block {
            gx,
            gy,
            x0,
            y0,
            x1: x0.saturating_add(b).min(self.width),
            y1: y0.saturating_add(b).min(self.height),
        }
    }

    /// Blocks of grid row `gy`, left to right.
    pub fn row(&self, gy: u32) -> impl Iterator<Item = Block> + '_ {
        (0..self.grid_width).map(move |gx| self.block(gx, gy))
    }

    /// Every block in row-major grid order.
    pub fn blocks(&self) -> impl Iterator<Item = Block> + '_ {
        (0..self.grid_height).flat_map(move |gy| self.row(gy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coverage(w: u32, h: u32, b: u32) -> Vec<u32> {
        let grid = BlockGrid::new(w, h, b).unwrap();
        let mut hits = vec![0u32; (w * h) as usize];
        for block in grid.blocks() {
            assert!(!block.is_empty());
            for y in block.y0..block.y1 {
                for x in block.x0..block.x1 {
                    hits[(y * w + x) as usize] += 1;
                }
            }
        }
        hits
    }

    #[test]
    fn blocks_tile_image_exactly() {
        for (w, h) in [(1, 1), (6, 6), (10, 7), (17, 3), (64, 33)] {
            for b in 1..=9 {
                let hits = coverage(w, h, b);
                assert!(
                    hits.iter().all(|&n| n == 1),
                    "pavage incorrect pour {w}x{h} B={b}"
                );
            }
        }
    }

    #[test]
    fn cell_count_is_ceil_product() {
        for (w, h, b) in [(6u32, 6u32, 3u32), (6, 6, 4), (10, 7, 3), (1, 1, 3), (100, 1, 7)] {
            let grid = BlockGrid::new(w, h, b).unwrap();
            assert_eq!(grid.blocks().count(), (w.div_ceil(b) * h.div_ceil(b)) as usize);
            assert_eq!(grid.len(), grid.blocks().count());
        }
        let even = BlockGrid::new(12, 9, 3).unwrap();
        assert_eq!(even.len(), (12 / 3) * (9 / 3));
    }

    #[test]
    fn oversized_block_collapses_to_one() {
        let grid = BlockGrid::new(2, 2, 50).unwrap();
        let blocks: Vec<Block> = grid.blocks().collect();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].pixel_count(), 4);
    }

    #[test]
    fn zero_block_size_is_invalid() {
        assert!(matches!(
            BlockGrid::new(4, 4, 0),
            Err(ConvertError::InvalidParameter(_))
        ));
    }

    #[test]
    fn iteration_is_restartable_and_row_major() {
        let grid = BlockGrid::new(7, 5, 2).unwrap();
        let first: Vec<Block> = grid.blocks().collect();
        let second: Vec<Block> = grid.blocks().collect();
        assert_eq!(first, second);
        let order: Vec<(u32, u32)> = first.iter().map(|b| (b.gx, b.gy)).collect();
        let mut sorted = order.clone();
        sorted.sort_by_key(|&(x, y)| (y, x));
        assert_eq!(order, sorted);
    }

    #[test]
    fn empty_image_has_no_blocks() {
        let grid = BlockGrid::new(0, 10, 3).unwrap();
        assert!(grid.is_empty());
        assert_eq!(grid.blocks().count(), 0);
    }
}
