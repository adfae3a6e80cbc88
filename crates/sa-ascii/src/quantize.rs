use sa_core::charset::GlyphRamp;

/// Gamma appliqué avant la quantification quand un style n'en précise pas.
pub const DEFAULT_GAMMA: f32 = 0.65;

/// Courbe gamma sur une luminance : `floor(255 × (l / 255)^γ)`.
///
/// L'entrée est clampée à [0, 255] (les boosts de canaux peuvent déborder).
/// 0 et 255 sont des points fixes pour tout γ > 0.
///
/// # Example
/// ```
/// use sa_ascii::quantize::gamma_adjust;
/// assert_eq!(gamma_adjust(0, 0.65), 0);
/// assert_eq!(gamma_adjust(255, 0.65), 255);
/// assert!(gamma_adjust(64, 0.65) > 64);
/// ```
#[must_use]
pub fn gamma_adjust(luminance: i32, gamma: f32) -> u8 {
    let l = luminance.clamp(0, 255);
    if l == 0 || l == 255 {
        return l as u8;
    }
    let normalized = f64::from(l) / 255.0;
    let adjusted = (255.0 * normalized.powf(f64::from(gamma))).floor();
    adjusted.clamp(0.0, 255.0) as u8
}

/// Index de rampe pour une luminance : `clamp(floor(adj × (N−1) / 255), 0, N−1)`.
///
/// # Example
/// ```
/// use sa_ascii::quantize::quantize;
/// assert_eq!(quantize(0, 0.65, 10), 0);
/// assert_eq!(quantize(255, 0.65, 10), 9);
/// assert_eq!(quantize(900, 0.65, 10), 9);
/// assert_eq!(quantize(-40, 0.65, 10), 0);
/// ```
#[inline]
#[must_use]
pub fn quantize(luminance: i32, gamma: f32, ramp_len: usize) -> usize {
    if ramp_len < 2 {
        return 0;
    }
    let adjusted = usize::from(gamma_adjust(luminance, gamma));
    (adjusted * (ramp_len - 1) / 255).min(ramp_len - 1)
}

/// Lookup table mapping luminance [0..255] → glyph, gamma included.
///
/// Pre-computed once per style for O(1) per-block cost.
///
/// # Example
/// ```
/// use sa_core::charset::GlyphRamp;
/// use sa_ascii::quantize::LuminanceLut;
/// let lut = LuminanceLut::new(&GlyphRamp::new(" .:#@").unwrap(), 0.65);
/// assert_eq!(lut.map(0), ' ');
/// assert_eq!(lut.map(255), '@');
/// ```
pub struct LuminanceLut {
    lut: [char; 256],
}

impl LuminanceLut {
    /// Build a LUT for `ramp` with the given gamma.
    #[must_use]
    pub fn new(ramp: &GlyphRamp, gamma: f32) -> Self {
        let mut lut = [' '; 256];
        for (l, slot) in lut.iter_mut().enumerate() {
            *slot = ramp.glyph(quantize(l as i32, gamma, ramp.len()));
        }
        Self { lut }
    }

    /// Map a luminance value [0..255] to a glyph.
    #[inline(always)]
    #[must_use]
    pub fn map(&self, luminance: u8) -> char {
        self.lut[luminance as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_always_in_range() {
        for n in 2..=70usize {
            for l in -300..=600i32 {
                for gamma in [0.6f32, 0.65, 0.7, 1.0] {
                    let idx = quantize(l, gamma, n);
                    assert!(idx < n, "index {idx} hors rampe (n={n}, l={l})");
                }
            }
        }
    }

    #[test]
    fn index_is_monotonic_in_luminance() {
        for n in [2usize, 3, 5, 10, 70] {
            for gamma in [0.6f32, 0.65, 0.7] {
                let mut prev = 0usize;
                for l in 0..=255i32 {
                    let idx = quantize(l, gamma, n);
                    assert!(idx >= prev, "non monotone à l={l} (n={n}, γ={gamma})");
                    prev = idx;
                }
            }
        }
    }

    #[test]
    fn extremes_map_to_ramp_ends() {
        for n in 2..=16usize {
            assert_eq!(quantize(0, DEFAULT_GAMMA, n), 0);
            assert_eq!(quantize(255, DEFAULT_GAMMA, n), n - 1);
        }
    }

    #[test]
    fn gamma_lifts_mid_tones() {
        // Linéaire : 128 * 9 / 255 = 4. Avec γ = 0.65, 128 → 162 → 5.
        assert_eq!(gamma_adjust(128, 0.65), 162);
        assert_eq!(quantize(128, 0.65, 10), 5);
    }

    #[test]
    fn lut_matches_quantize() {
        let ramp = GlyphRamp::ascii();
        let lut = LuminanceLut::new(&ramp, 0.7);
        for l in 0..=255u8 {
            assert_eq!(lut.map(l), ramp.glyph(quantize(i32::from(l), 0.7, ramp.len())));
        }
    }
}
