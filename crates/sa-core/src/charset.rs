use crate::error::ConvertError;

/// 10 caractères — compact, bon contraste. Rampe ASCII par défaut.
pub const CHARSET_COMPACT: &str = " .:-=+*#%@";

/// Blocs Unicode — pseudo-pixels.
pub const CHARSET_BLOCKS: &str = " ░▒▓█";

/// Ordered glyph sequence, index 0 = visually emptiest, last = densest.
///
/// Always holds at least two characters. Density ordering is a contract of
/// the caller and is not checked.
///
/// # Example
/// ```
/// use sa_core::charset::GlyphRamp;
/// let ramp = GlyphRamp::new(" .:#@").unwrap();
/// assert_eq!(ramp.len(), 5);
/// assert_eq!(ramp.emptiest(), ' ');
/// assert_eq!(ramp.densest(), '@');
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphRamp {
    chars: Vec<char>,
}

impl GlyphRamp {
    /// Build a ramp from a string ordered lightest→densest.
    ///
    /// # Errors
    /// Returns [`ConvertError::InvalidParameter`] if the string has fewer
    /// than 2 characters.
    pub fn new(charset: &str) -> Result<Self, ConvertError> {
        let chars: Vec<char> = charset.chars().collect();
        if chars.len() < 2 {
            return Err(ConvertError::InvalidParameter(format!(
                "glyph ramp needs at least 2 characters, got {:?}",
                charset
            )));
        }
        Ok(Self { chars })
    }

    /// Ramp built from a compile-time constant known to be valid.
    pub(crate) fn from_static(charset: &'static str) -> Self {
        Self {
            chars: charset.chars().collect(),
        }
    }

    /// Default 10-glyph ASCII ramp.
    #[must_use]
    pub fn ascii() -> Self {
        Self::from_static(CHARSET_COMPACT)
    }

    /// Unicode shade-block ramp.
    #[must_use]
    pub fn blocks() -> Self {
        Self::from_static(CHARSET_BLOCKS)
    }

    /// Number of glyphs (always ≥ 2).
    #[must_use]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Glyph at `index`, clamped to the last glyph.
    #[inline(always)]
    #[must_use]
    pub fn glyph(&self, index: usize) -> char {
        self.chars[index.min(self.chars.len() - 1)]
    }

    /// Glyph at index 0.
    #[must_use]
    pub fn emptiest(&self) -> char {
        self.chars[0]
    }

    /// Glyph at index N−1.
    #[must_use]
    pub fn densest(&self) -> char {
        self.chars[self.chars.len() - 1]
    }

    /// All glyphs in ramp order.
    #[must_use]
    pub fn chars(&self) -> &[char] {
        &self.chars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_rejects_short_charsets() {
        assert!(GlyphRamp::new("").is_err());
        assert!(matches!(
            GlyphRamp::new("@"),
            Err(ConvertError::InvalidParameter(_))
        ));
        assert!(GlyphRamp::new(" @").is_ok());
    }

    #[test]
    fn builtin_ramps_count_chars_not_bytes() {
        assert_eq!(GlyphRamp::ascii().len(), 10);
        assert_eq!(GlyphRamp::blocks().len(), 5);
        assert_eq!(GlyphRamp::blocks().densest(), '█');
    }

    #[test]
    fn glyph_index_is_clamped() {
        let ramp = GlyphRamp::new(" .#").unwrap();
        assert_eq!(ramp.glyph(0), ' ');
        assert_eq!(ramp.glyph(2), '#');
        assert_eq!(ramp.glyph(99), '#');
    }
}
