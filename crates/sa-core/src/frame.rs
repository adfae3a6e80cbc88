/// Buffer de pixels. Une nouvelle instance est produite par chaque transformation.
///
/// Stocke les pixels en RGBA row-major, 4 bytes par pixel, origine en haut à gauche.
///
/// # Example
/// ```
/// use sa_core::frame::FrameBuffer;
/// let fb = FrameBuffer::new(10, 10);
/// assert_eq!(fb.data.len(), 400);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    /// Pixels RGBA, row-major, 4 bytes par pixel.
    pub data: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameBuffer {
    /// Crée un buffer noir transparent aux dimensions données.
    ///
    /// # Example
    /// ```
    /// use sa_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::new(100, 50);
    /// assert_eq!(fb.width, 100);
    /// assert_eq!(fb.height, 50);
    /// assert_eq!(fb.data.len(), 100 * 50 * 4);
    /// ```
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            data: vec![0u8; width as usize * height as usize * 4],
            width,
            height,
        }
    }

    /// Crée un buffer opaque rempli d'une couleur unie.
    ///
    /// # Example
    /// ```
    /// use sa_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::filled(2, 2, (10, 20, 30));
    /// assert_eq!(fb.pixel(1, 1), (10, 20, 30, 255));
    /// ```
    #[must_use]
    pub fn filled(width: u32, height: u32, rgb: (u8, u8, u8)) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..(width as usize * height as usize) {
            data.extend_from_slice(&[rgb.0, rgb.1, rgb.2, 255]);
        }
        Self {
            data,
            width,
            height,
        }
    }

    /// Wraps raw RGBA bytes. Returns `None` when the length does not match.
    ///
    /// # Example
    /// ```
    /// use sa_core::frame::FrameBuffer;
    /// assert!(FrameBuffer::from_rgba(1, 1, vec![0, 0, 0, 255]).is_some());
    /// assert!(FrameBuffer::from_rgba(2, 1, vec![0, 0, 0, 255]).is_none());
    /// ```
    #[must_use]
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        (data.len() == width as usize * height as usize * 4).then_some(Self {
            data,
            width,
            height,
        })
    }

    /// True when the buffer holds no pixel.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Accès au pixel (x, y) → (r, g, b, a).
    ///
    /// # Example
    /// ```
    /// use sa_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::new(10, 10);
    /// let (r, g, b, a) = fb.pixel(0, 0);
    /// assert_eq!((r, g, b, a), (0, 0, 0, 0));
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        debug_assert!(x < self.width && y < self.height, "pixel out of bounds");
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        if idx + 3 >= self.data.len() {
            return (0, 0, 0, 0);
        }
        (
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        )
    }

    /// Luminance perceptuelle BT.709.
    ///
    /// # Example
    /// ```
    /// use sa_core::frame::FrameBuffer;
    /// let fb = FrameBuffer::filled(1, 1, (255, 255, 255));
    /// assert_eq!(fb.luminance(0, 0), 255);
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn luminance(&self, x: u32, y: u32) -> u8 {
        let (r, g, b, _) = self.pixel(x, y);
        crate::color::luma(r, g, b)
    }

    /// Bytes per row.
    #[inline]
    #[must_use]
    pub fn stride(&self) -> usize {
        self.width as usize * 4
    }
}

/// Grille de placements de glyphes, row-major.
///
/// La cellule (gx, gy) est dessinée en (gx × char_width, gy × char_height).
///
/// # Example
/// ```
/// use sa_core::frame::{AsciiGrid, AsciiCell};
/// let mut grid = AsciiGrid::new(80, 24);
/// grid.set(0, 0, AsciiCell { ch: '@', fg: (255, 0, 0) });
/// assert_eq!(grid.get(0, 0).ch, '@');
/// ```
#[derive(Clone, Debug)]
pub struct AsciiGrid {
    /// Flat array of cells, row-major.
    pub cells: Vec<AsciiCell>,
    /// Width in characters.
    pub width: u32,
    /// Height in characters.
    pub height: u32,
}

/// Single glyph placement: character plus fill color.
///
/// # Example
/// ```
/// use sa_core::frame::AsciiCell;
/// let cell = AsciiCell::default();
/// assert_eq!(cell.ch, ' ');
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AsciiCell {
    /// Caractère à afficher.
    pub ch: char,
    /// Couleur de remplissage du glyphe (RGB).
    pub fg: (u8, u8, u8),
}

impl Default for AsciiCell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: (0, 0, 0),
        }
    }
}

impl AsciiGrid {
    /// Crée une grille remplie de cellules vides.
    ///
    /// # Example
    /// ```
    /// use sa_core::frame::AsciiGrid;
    /// let grid = AsciiGrid::new(80, 24);
    /// assert_eq!(grid.cells.len(), 80 * 24);
    /// ```
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            cells: vec![AsciiCell::default(); width as usize * height as usize],
            width,
            height,
        }
    }

    /// Set a cell at position (x, y).
    #[inline(always)]
    pub fn set(&mut self, x: u32, y: u32, cell: AsciiCell) {
        self.cells[y as usize * self.width as usize + x as usize] = cell;
    }

    /// Get a cell reference at position (x, y).
    ///
    /// # Example
    /// ```
    /// use sa_core::frame::AsciiGrid;
    /// let grid = AsciiGrid::new(10, 10);
    /// assert_eq!(grid.get(0, 0).ch, ' ');
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> &AsciiCell {
        &self.cells[y as usize * self.width as usize + x as usize]
    }

    /// Renders the grid as plain text, one line per row.
    ///
    /// # Example
    /// ```
    /// use sa_core::frame::{AsciiGrid, AsciiCell};
    /// let mut grid = AsciiGrid::new(2, 2);
    /// grid.set(1, 1, AsciiCell { ch: '#', fg: (255, 255, 255) });
    /// assert_eq!(grid.to_text(), "  \n #\n");
    /// ```
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity(self.cells.len() + self.height as usize);
        for row in self.cells.chunks(self.width.max(1) as usize) {
            out.extend(row.iter().map(|c| c.ch));
            out.push('\n');
        }
        out
    }
}
