use rayon::prelude::*;
use sa_core::color::{boost_saturation, scale_channels};
use sa_core::frame::FrameBuffer;

/// Transformation appliquée à toute l'image avant l'échantillonnage.
///
/// Chaque variante est une fonction pure `FrameBuffer → FrameBuffer`.
///
/// # Example
/// ```
/// use sa_core::frame::FrameBuffer;
/// use sa_ascii::preprocess::Preprocess;
/// let src = FrameBuffer::filled(2, 2, (10, 20, 30));
/// let out = Preprocess::Invert.apply(&src);
/// assert_eq!(out.pixel(0, 0), (245, 235, 225, 255));
/// assert_eq!(src.pixel(0, 0), (10, 20, 30, 255));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Preprocess {
    /// Image inchangée.
    Identity,
    /// Multiplie chaque canal (enhancer de luminosité), clampé.
    Brightness(f32),
    /// Boost de saturation HSV.
    Saturation(f32),
    /// Négatif RGB.
    Invert,
    /// Magnitude Sobel × `gain`, en niveaux de gris.
    Edges {
        /// Amplification de la magnitude normalisée.
        gain: f32,
    },
}

impl Preprocess {
    /// Produce the transformed image. The source is left untouched.
    #[must_use]
    pub fn apply(&self, frame: &FrameBuffer) -> FrameBuffer {
        match *self {
            Self::Identity => frame.clone(),
            Self::Brightness(factor) => map_pixels(frame, |r, g, b| {
                scale_channels(r, g, b, factor)
            }),
            Self::Saturation(factor) => map_pixels(frame, |r, g, b| {
                boost_saturation(r, g, b, factor)
            }),
            Self::Invert => map_pixels(frame, |r, g, b| (255 - r, 255 - g, 255 - b)),
            Self::Edges { gain } => edges(frame, gain),
        }
    }
}

/// Applique `f` à chaque pixel RGB, alpha conservé. Lignes en parallèle.
fn map_pixels<F>(frame: &FrameBuffer, f: F) -> FrameBuffer
where
    F: Fn(u8, u8, u8) -> (u8, u8, u8) + Sync,
{
    let mut out = frame.clone();
    let stride = frame.stride().max(4);
    out.data.par_chunks_mut(stride).for_each(|row| {
        for px in row.chunks_exact_mut(4) {
            let (r, g, b) = f(px[0], px[1], px[2]);
            px[0] = r;
            px[1] = g;
            px[2] = b;
        }
    });
    out
}

/// Image de contours Sobel 3×3, bords à zéro.
fn edges(frame: &FrameBuffer, gain: f32) -> FrameBuffer {
    let mut out = FrameBuffer::filled(frame.width, frame.height, (0, 0, 0));
    if frame.width < 3 || frame.height < 3 {
        return out;
    }
    let stride = out.stride();
    out.data
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..frame.width {
                let mag = (detect_edge(frame, x, y as u32) * gain).clamp(0.0, 1.0);
                let v = (mag * 255.0).round() as u8;
                let i = x as usize * 4;
                row[i] = v;
                row[i + 1] = v;
                row[i + 2] = v;
            }
        });
    out
}

/// Detect edge magnitude at pixel (x, y) using Sobel 3×3.
///
/// Returns normalized edge magnitude [0.0, 1.0]. Border pixels return 0.
///
/// # Example
/// ```
/// use sa_core::frame::FrameBuffer;
/// use sa_ascii::preprocess::detect_edge;
///
/// let frame = FrameBuffer::new(10, 10);
/// let edge = detect_edge(&frame, 5, 5);
/// assert!(edge >= 0.0 && edge <= 1.0);
/// ```
#[must_use]
pub fn detect_edge(frame: &FrameBuffer, x: u32, y: u32) -> f32 {
    if x == 0 || y == 0 || x + 1 >= frame.width || y + 1 >= frame.height {
        return 0.0;
    }

    let tl = f32::from(frame.luminance(x - 1, y - 1));
    let tc = f32::from(frame.luminance(x, y - 1));
    let tr = f32::from(frame.luminance(x + 1, y - 1));
    let ml = f32::from(frame.luminance(x - 1, y));
    let mr = f32::from(frame.luminance(x + 1, y));
    let bl = f32::from(frame.luminance(x - 1, y + 1));
    let bc = f32::from(frame.luminance(x, y + 1));
    let br = f32::from(frame.luminance(x + 1, y + 1));

    let gx = -tl + tr - 2.0 * ml + 2.0 * mr - bl + br;
    let gy = -tl - 2.0 * tc - tr + bl + 2.0 * bc + br;

    let mag = (gx * gx + gy * gy).sqrt();
    (mag / 1442.0).min(1.0) // max théorique: sqrt(2) * 1020 ≈ 1442
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brightness_boost_clamps_channels() {
        let src = FrameBuffer::filled(1, 1, (100, 200, 250));
        let out = Preprocess::Brightness(1.3).apply(&src);
        assert_eq!(out.pixel(0, 0), (130, 255, 255, 255));
    }

    #[test]
    fn identity_is_a_copy() {
        let src = FrameBuffer::filled(3, 2, (1, 2, 3));
        assert_eq!(Preprocess::Identity.apply(&src), src);
    }

    #[test]
    fn saturation_leaves_grays_alone() {
        let src = FrameBuffer::filled(2, 2, (90, 90, 90));
        assert_eq!(Preprocess::Saturation(1.6).apply(&src), src);
    }

    #[test]
    fn flat_image_has_no_edges() {
        let src = FrameBuffer::filled(8, 8, (200, 200, 200));
        let out = Preprocess::Edges { gain: 1.8 }.apply(&src);
        assert!(out.data.chunks_exact(4).all(|px| px[0] == 0 && px[3] == 255));
    }

    #[test]
    fn vertical_step_is_detected() {
        // Moitié gauche noire, moitié droite blanche.
        let mut src = FrameBuffer::filled(6, 5, (0, 0, 0));
        for y in 0..5u32 {
            for x in 3..6u32 {
                let i = ((y * 6 + x) * 4) as usize;
                src.data[i..i + 3].copy_from_slice(&[255, 255, 255]);
            }
        }
        let out = Preprocess::Edges { gain: 1.8 }.apply(&src);
        assert!(out.pixel(2, 2).0 > 200, "contour manqué: {:?}", out.pixel(2, 2));
        assert_eq!(out.pixel(0, 2).0, 0);
    }

    #[test]
    fn tiny_images_do_not_panic() {
        for (w, h) in [(0, 0), (1, 1), (2, 5)] {
            let src = FrameBuffer::filled(w, h, (255, 255, 255));
            let out = Preprocess::Edges { gain: 1.0 }.apply(&src);
            assert_eq!((out.width, out.height), (w, h));
        }
    }
}
