use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sa_core::config::ConvertConfig;

/// stylascii — convertit images et vidéos en art ASCII stylisé.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, global = true, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Police monospace TTF/OTF pour le rendu des glyphes.
    #[arg(long, global = true)]
    pub font: Option<PathBuf>,

    /// Taille des glyphes en pixels.
    #[arg(long, global = true)]
    pub font_size: Option<f32>,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convertit une image en PNG ASCII.
    Image(ImageArgs),
    /// Convertit une vidéo en MP4 ASCII. Requiert ffmpeg dans PATH.
    #[cfg(feature = "video")]
    Video(VideoArgs),
    /// Liste les styles disponibles.
    Styles,
}

#[derive(Args, Debug)]
pub struct ImageArgs {
    /// Image source (PNG, JPEG, BMP, GIF).
    pub input: PathBuf,

    /// Style : colored, grayscale, inverted, blocks, neon, sketch.
    #[arg(short, long)]
    pub style: Option<String>,

    /// Côté des blocs de pixels échantillonnés.
    #[arg(short, long)]
    pub block_size: Option<u32>,

    /// Fichier PNG de sortie. Défaut : <nom>-<style>-ascii.png.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Affiche aussi la grille en texte sur stdout.
    #[arg(long, default_value_t = false)]
    pub print: bool,
}

#[cfg(feature = "video")]
#[derive(Args, Debug)]
pub struct VideoArgs {
    /// Vidéo source.
    pub input: PathBuf,

    /// Style : colored, grayscale, inverted, blocks, neon, sketch.
    #[arg(short, long)]
    pub style: Option<String>,

    /// Côté des blocs de pixels échantillonnés.
    #[arg(short, long)]
    pub block_size: Option<u32>,

    /// FPS de la vidéo produite.
    #[arg(long)]
    pub fps: Option<u32>,

    /// Nombre maximal de frames converties.
    #[arg(long)]
    pub max_frames: Option<u64>,

    /// Fichier MP4 de sortie. Défaut : <nom>-<style>-ascii.mp4.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl Cli {
    /// Applique les options globales sur la config chargée.
    pub fn apply_overrides(&self, config: &mut ConvertConfig) {
        if let Some(ref font) = self.font {
            config.font_path = Some(font.clone());
        }
        if let Some(size) = self.font_size {
            config.font_size = size;
        }
        match &self.command {
            Command::Image(args) => {
                override_style(config, args.style.as_ref(), args.block_size);
            }
            #[cfg(feature = "video")]
            Command::Video(args) => {
                override_style(config, args.style.as_ref(), args.block_size);
                if let Some(fps) = args.fps {
                    config.fps = fps;
                }
                if args.max_frames.is_some() {
                    config.max_frames = args.max_frames;
                }
            }
            Command::Styles => {}
        }
        config.clamp_all();
    }
}

fn override_style(config: &mut ConvertConfig, style: Option<&String>, block_size: Option<u32>) {
    if let Some(style) = style {
        config.style.clone_from(style);
    }
    if let Some(b) = block_size {
        config.block_size = b;
    }
}
