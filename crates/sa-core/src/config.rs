use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

/// Nombre maximal de frames gardées en mémoire avant flush sur disque.
pub const MAX_CHUNK_FRAMES: usize = 30;

/// Configuration complète d'une conversion.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use sa_core::config::ConvertConfig;
/// let config = ConvertConfig::default();
/// assert_eq!(config.block_size, 3);
/// assert_eq!(config.fps, 15);
/// ```
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ConvertConfig {
    // === Style ===
    /// Nom du style dans le catalogue.
    pub style: String,
    /// Côté d'un bloc de pixels échantillonné par glyphe.
    pub block_size: u32,

    // === Vidéo ===
    /// FPS de la vidéo produite.
    pub fps: u32,
    /// Nombre maximal de frames à convertir. None = toute la source.
    pub max_frames: Option<u64>,
    /// Frames par chunk intermédiaire [1, 30].
    pub chunk_size: usize,

    // === Police ===
    /// Police monospace TTF/OTF. None = recherche dans les chemins système.
    pub font_path: Option<PathBuf>,
    /// Taille de rendu des glyphes en pixels.
    pub font_size: f32,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            style: "colored".to_string(),
            block_size: 3,
            fps: 15,
            max_frames: None,
            chunk_size: MAX_CHUNK_FRAMES,
            font_path: None,
            font_size: 12.0,
        }
    }
}

impl ConvertConfig {
    /// Clamp numeric fields that have a safe range.
    /// Called after TOML deserialization.
    pub fn clamp_all(&mut self) {
        if self.chunk_size > MAX_CHUNK_FRAMES {
            log::warn!(
                "chunk_size {} > {MAX_CHUNK_FRAMES}, ramené à {MAX_CHUNK_FRAMES}",
                self.chunk_size
            );
            self.chunk_size = MAX_CHUNK_FRAMES;
        }
        self.font_size = self.font_size.clamp(4.0, 256.0);
    }

    /// Reject values that cannot be converted with.
    ///
    /// # Errors
    /// Returns [`ConvertError::InvalidParameter`] for a zero block size,
    /// zero fps, zero chunk size or a zero frame cap.
    ///
    /// # Example
    /// ```
    /// use sa_core::config::ConvertConfig;
    /// let config = ConvertConfig { block_size: 0, ..ConvertConfig::default() };
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConvertError> {
        if self.block_size == 0 {
            return Err(ConvertError::InvalidParameter(
                "block_size must be a positive integer".into(),
            ));
        }
        if self.fps == 0 {
            return Err(ConvertError::InvalidParameter(
                "fps must be a positive integer".into(),
            ));
        }
        if self.chunk_size == 0 {
            return Err(ConvertError::InvalidParameter(
                "chunk_size must be a positive integer".into(),
            ));
        }
        if self.max_frames == Some(0) {
            return Err(ConvertError::InvalidParameter(
                "max_frames must be positive when set".into(),
            ));
        }
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(ConvertError::InvalidParameter(format!(
                "font_size must be positive, got {}",
                self.font_size
            )));
        }
        Ok(())
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    convert: Option<ConvertSection>,
    video: Option<VideoSection>,
    font: Option<FontSection>,
}

#[derive(Deserialize)]
struct ConvertSection {
    style: Option<String>,
    block_size: Option<u32>,
}

#[derive(Deserialize)]
struct VideoSection {
    fps: Option<u32>,
    max_frames: Option<u64>,
    chunk_size: Option<usize>,
}

#[derive(Deserialize)]
struct FontSection {
    path: Option<PathBuf>,
    size: Option<f32>,
}

/// Parse un document TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the document is not valid TOML for this schema.
///
/// # Example
/// ```
/// use sa_core::config::parse_config;
/// let config = parse_config("[convert]\nstyle = \"blocks\"").unwrap();
/// assert_eq!(config.style, "blocks");
/// assert_eq!(config.block_size, 3);
/// ```
pub fn parse_config(content: &str) -> Result<ConvertConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;

    let mut config = ConvertConfig::default();

    if let Some(c) = file.convert {
        if let Some(v) = c.style {
            config.style = v;
        }
        if let Some(v) = c.block_size {
            config.block_size = v;
        }
    }
    if let Some(v) = file.video {
        if let Some(fps) = v.fps {
            config.fps = fps;
        }
        if v.max_frames.is_some() {
            config.max_frames = v.max_frames;
        }
        if let Some(n) = v.chunk_size {
            config.chunk_size = n;
        }
    }
    if let Some(f) = file.font {
        if f.path.is_some() {
            config.font_path = f.path;
        }
        if let Some(size) = f.size {
            config.font_size = size;
        }
    }

    config.clamp_all();
    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use sa_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<ConvertConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    let config =
        parse_config(&content).with_context(|| format!("Config invalide : {}", path.display()))?;
    log::info!("Config chargée : {}", path.display());
    Ok(config)
}
