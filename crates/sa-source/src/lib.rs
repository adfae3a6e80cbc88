//! Sources visuelles de stylASCII : image fixe et vidéo (ffmpeg).

pub mod image;

#[cfg(feature = "video")]
pub mod video;
