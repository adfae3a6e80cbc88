/// Convertit RGB [0,255] → HSV. H ∈ [0.0, 1.0), S ∈ [0.0, 1.0], V ∈ [0.0, 1.0].
///
/// # Example
/// ```
/// use sa_core::color::rgb_to_hsv;
/// let (h, s, v) = rgb_to_hsv(255, 0, 0);
/// assert!((h - 0.0).abs() < 0.01);
/// assert!((s - 1.0).abs() < 0.01);
/// assert!((v - 1.0).abs() < 0.01);
/// ```
#[must_use]
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (f32, f32, f32) {
    let r = f32::from(r) / 255.0;
    let g = f32::from(g) / 255.0;
    let b = f32::from(b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let v = max;
    let s = if max == 0.0 { 0.0 } else { delta / max };
    let h = if delta == 0.0 {
        0.0
    } else if (max - r).abs() < f32::EPSILON {
        (((g - b) / delta) % 6.0) / 6.0
    } else if (max - g).abs() < f32::EPSILON {
        ((b - r) / delta + 2.0) / 6.0
    } else {
        ((r - g) / delta + 4.0) / 6.0
    };
    let h = if h < 0.0 { h + 1.0 } else { h };

    (h, s, v)
}

/// Convertit HSV → RGB [0,255]. H ∈ [0.0, 1.0), S ∈ [0.0, 1.0], V ∈ [0.0, 1.0].
///
/// # Example
/// ```
/// use sa_core::color::hsv_to_rgb;
/// let (r, g, b) = hsv_to_rgb(0.0, 1.0, 1.0);
/// assert_eq!(r, 255);
/// assert_eq!(g, 0);
/// assert_eq!(b, 0);
/// ```
#[must_use]
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (u8, u8, u8) {
    let h = h * 6.0;
    let i = h.floor() as u32;
    let f = h - i as f32;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match i % 6 {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    ((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
}

/// Multiplie la saturation HSV d'un pixel, teinte et valeur conservées.
///
/// # Example
/// ```
/// use sa_core::color::boost_saturation;
/// // Les gris n'ont pas de saturation à amplifier.
/// assert_eq!(boost_saturation(128, 128, 128, 1.6), (128, 128, 128));
/// ```
#[must_use]
pub fn boost_saturation(r: u8, g: u8, b: u8, factor: f32) -> (u8, u8, u8) {
    let (h, s, v) = rgb_to_hsv(r, g, b);
    if s == 0.0 {
        return (r, g, b);
    }
    let s = (s * factor).clamp(0.0, 1.0);
    hsv_to_rgb(h, s, v)
}

/// Multiplie chaque canal par `factor`, résultat clampé à [0, 255].
///
/// # Example
/// ```
/// use sa_core::color::scale_channels;
/// assert_eq!(scale_channels(100, 200, 0, 1.3), (130, 255, 0));
/// ```
#[must_use]
pub fn scale_channels(r: u8, g: u8, b: u8, factor: f32) -> (u8, u8, u8) {
    let scale = |c: u8| (f32::from(c) * factor).round().clamp(0.0, 255.0) as u8;
    (scale(r), scale(g), scale(b))
}

/// Luma BT.709, poids entiers ×10000.
///
/// # Example
/// ```
/// use sa_core::color::luma;
/// assert_eq!(luma(255, 255, 255), 255);
/// assert_eq!(luma(0, 255, 0), 182);
/// ```
#[inline(always)]
#[must_use]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((u32::from(r) * 2126 + u32::from(g) * 7152 + u32::from(b) * 722) / 10000) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn luma_uses_perceptual_weights() {
        assert_eq!(luma(255, 0, 0), 54);
        assert_eq!(luma(0, 255, 0), 182);
        assert_eq!(luma(0, 0, 255), 18);
        assert_eq!(luma(0, 0, 0), 0);
    }

    #[test]
    fn rgb_hsv_roundtrip() {
        for r in (0..=255).step_by(17) {
            for g in (0..=255).step_by(17) {
                for b in (0..=255).step_by(17) {
                    let r = r as u8;
                    let g = g as u8;
                    let b = b as u8;
                    let (h, s, v) = rgb_to_hsv(r, g, b);
                    let (r2, g2, b2) = hsv_to_rgb(h, s, v);
                    assert!(
                        (i16::from(r) - i16::from(r2)).abs() <= 1,
                        "R mismatch: {r} vs {r2} (h={h}, s={s}, v={v})"
                    );
                    assert!(
                        (i16::from(g) - i16::from(g2)).abs() <= 1,
                        "G mismatch: {g} vs {g2}"
                    );
                    assert!(
                        (i16::from(b) - i16::from(b2)).abs() <= 1,
                        "B mismatch: {b} vs {b2}"
                    );
                }
            }
        }
    }

    #[test]
    fn saturation_boost_keeps_hue() {
        let (h, s, _v) = rgb_to_hsv(200, 120, 120);
        let (r2, g2, b2) = boost_saturation(200, 120, 120, 1.6);
        let (h2, s2, _v2) = rgb_to_hsv(r2, g2, b2);
        assert!((h - h2).abs() < 0.01, "Hue shifted: {h} vs {h2}");
        assert!(s2 > s, "saturation not boosted: {s} -> {s2}");
    }

    #[test]
    fn scale_channels_clamps() {
        assert_eq!(scale_channels(255, 255, 255, 1.3), (255, 255, 255));
        assert_eq!(scale_channels(0, 0, 0, 1.3), (0, 0, 0));
        assert_eq!(scale_channels(10, 20, 30, 0.0), (0, 0, 0));
    }
}
