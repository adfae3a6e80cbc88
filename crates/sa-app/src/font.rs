use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sa_core::charset::GlyphRamp;
use sa_core::config::ConvertConfig;
use sa_core::error::ConvertError;
use sa_export::rasterizer::GlyphAtlas;

/// Polices monospace courantes, essayées dans l'ordre.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSansMono.ttf",
    "/usr/share/fonts/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/dejavu-sans-mono-fonts/DejaVuSansMono.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationMono-Regular.ttf",
    "/usr/share/fonts/liberation-mono/LiberationMono-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSansMono-Regular.ttf",
    "/System/Library/Fonts/Menlo.ttc",
    "/Library/Fonts/Courier New.ttf",
    "C:\\Windows\\Fonts\\consola.ttf",
    "C:\\Windows\\Fonts\\cour.ttf",
];

/// Police configurée, sinon première police système trouvée.
fn discover_font(configured: Option<&Path>, candidates: &[&str]) -> Result<PathBuf, ConvertError> {
    if let Some(path) = configured {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        return Err(ConvertError::InvalidParameter(format!(
            "font not found: {}",
            path.display()
        )));
    }
    candidates
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
        .ok_or_else(|| {
            ConvertError::InvalidParameter(
                "no monospace font found; pass --font <file.ttf> or set [font] path".into(),
            )
        })
}

/// Construit l'atlas de glyphes pour `ramp` selon la configuration.
///
/// # Errors
/// Returns [`ConvertError::InvalidParameter`] if no usable font is found.
pub fn load_atlas(config: &ConvertConfig, ramp: &GlyphRamp) -> Result<GlyphAtlas> {
    let path = discover_font(config.font_path.as_deref(), SYSTEM_FONTS)?;
    let data = std::fs::read(&path)
        .with_context(|| format!("Impossible de lire la police {}", path.display()))?;
    log::info!("Police: {} ({}px)", path.display(), config.font_size);
    GlyphAtlas::from_font(&data, config.font_size, ramp)
}
