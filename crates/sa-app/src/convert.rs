use std::path::{Path, PathBuf};

use anyhow::Result;
use sa_ascii::style::catalog;
use sa_core::config::ConvertConfig;
use sa_core::frame::AsciiGrid;
use sa_export::rasterizer::save_png;
use sa_source::image::load_image;

use crate::font::load_atlas;
use crate::output;
use crate::pipeline::FramePipeline;

#[cfg(feature = "video")]
use sa_core::traits::FrameDecoder;
#[cfg(feature = "video")]
use sa_export::sequencer::{FrameSequencer, SequenceReport, SequencerConfig, VideoBackend};

/// Résultat d'une conversion d'image.
pub struct ImageReport {
    pub output: PathBuf,
    pub grid: AsciiGrid,
    pub canvas_size: (u32, u32),
}

/// Convertit une image en PNG ASCII.
///
/// Le style est résolu avant toute autre opération : un nom inconnu ne
/// produit aucun fichier.
///
/// # Errors
/// `InvalidStyle`, `InvalidParameter` (configuration, police), `Decode`
/// (image stage) ou `Encode` (image stage), portés par l'`anyhow::Error`.
pub fn convert_image(
    input: &Path,
    requested: Option<&Path>,
    config: &ConvertConfig,
) -> Result<ImageReport> {
    let style = catalog().get(&config.style)?;
    config.validate()?;
    let output = output::image_output(input, requested, style.name);
    let pipeline = FramePipeline::new(style, config.block_size, load_atlas(config, &style.ramp)?)?;
    log::info!(
        "Image {} → {} (style {}, blocs {}px)",
        input.display(),
        output.display(),
        style.name,
        config.block_size
    );
    render_image_file(&pipeline, input, output)
}

/// Charge `input`, le rend avec `pipeline` et écrit le PNG dans `output`.
///
/// # Errors
/// Returns a decode or encode failure (image stage).
pub fn render_image_file(
    pipeline: &FramePipeline,
    input: &Path,
    output: PathBuf,
) -> Result<ImageReport> {
    let frame = load_image(input)?;
    let grid = pipeline.compose(&frame);
    let canvas = pipeline.rasterize(&grid);
    save_png(&canvas, &output)?;
    Ok(ImageReport {
        output,
        grid,
        canvas_size: (canvas.width, canvas.height),
    })
}

/// Résultat d'une conversion vidéo.
#[cfg(feature = "video")]
pub struct VideoReport {
    pub output: PathBuf,
    pub sequence: SequenceReport,
}

/// Convertit une vidéo en MP4 ASCII via ffmpeg.
///
/// # Errors
/// `InvalidStyle` avant toute opération, puis `InvalidParameter`, `Decode`
/// (decode stage) ou `Encode` (encode/combine stage).
#[cfg(feature = "video")]
pub fn convert_video(
    input: &Path,
    requested: Option<&Path>,
    config: &ConvertConfig,
) -> Result<VideoReport> {
    use sa_export::muxer::FfmpegBackend;
    use sa_source::video::FfmpegDecoder;

    let style = catalog().get(&config.style)?;
    config.validate()?;
    let output = output::video_output(input, requested, style.name);
    let sequencer = FrameSequencer::new(SequencerConfig::from(config))?;
    let pipeline = FramePipeline::new(style, config.block_size, load_atlas(config, &style.ramp)?)?;

    let mut decoder = FfmpegDecoder::open(input)?;
    let (w, h) = decoder.native_size();
    let (cw, ch) = pipeline.canvas_size(w, h);
    log::info!(
        "Vidéo {} ({w}x{h}) → {} ({cw}x{ch} @ {}fps, style {})",
        input.display(),
        output.display(),
        config.fps,
        style.name
    );

    let sequence = render_video(&pipeline, &sequencer, &mut decoder, &FfmpegBackend, &output)?;
    Ok(VideoReport { output, sequence })
}

/// Rend chaque frame de `decoder` et confie la séquence au séquenceur.
///
/// # Errors
/// See [`FrameSequencer::run`].
#[cfg(feature = "video")]
pub fn render_video<D, B>(
    pipeline: &FramePipeline,
    sequencer: &FrameSequencer,
    decoder: &mut D,
    backend: &B,
    output: &Path,
) -> Result<SequenceReport>
where
    D: FrameDecoder + ?Sized,
    B: VideoBackend + ?Sized,
{
    sequencer.run(decoder, backend, |frame| Ok(pipeline.render(frame)), output)
}
