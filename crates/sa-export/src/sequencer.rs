//! Conversion vidéo par chunks bornés.
//!
//! Les frames décodées sont transformées puis encodées par paquets d'au plus
//! [`MAX_CHUNK_FRAMES`] frames dans des fichiers intermédiaires, concaténés à la
//! fin dans l'ordre. Les intermédiaires vivent dans un répertoire temporaire
//! détruit sur tous les chemins de sortie, succès comme erreur.

use std::path::{Path, PathBuf};

use anyhow::Result;
use sa_core::config::{ConvertConfig, MAX_CHUNK_FRAMES};
use sa_core::error::{ConvertError, Stage};
use sa_core::frame::FrameBuffer;
use sa_core::traits::{FrameDecoder, FrameEncoder};
use tempfile::TempDir;

/// Encodage des chunks et assemblage final.
///
/// Implémenté par : `FfmpegBackend`.
pub trait VideoBackend {
    /// Ouvre un encodeur pour un chunk `width × height` écrit dans `path`.
    ///
    /// # Errors
    /// Returns an error if the encoder cannot be started.
    fn open_chunk(
        &self,
        path: &Path,
        width: u32,
        height: u32,
        fps: u32,
    ) -> Result<Box<dyn FrameEncoder>>;

    /// Concatène `chunks` dans `output`, dans l'ordre. `scratch` est un
    /// répertoire jetable pour les fichiers annexes.
    ///
    /// # Errors
    /// Returns an error if the final artifact cannot be produced.
    fn combine(&self, chunks: &[PathBuf], scratch: &Path, output: &Path, fps: u32) -> Result<()>;

    /// Extension des fichiers de chunk.
    fn chunk_extension(&self) -> &'static str {
        "mp4"
    }
}

/// Paramètres du séquenceur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencerConfig {
    pub fps: u32,
    pub max_frames: Option<u64>,
    pub chunk_size: usize,
}

impl From<&ConvertConfig> for SequencerConfig {
    fn from(config: &ConvertConfig) -> Self {
        Self {
            fps: config.fps,
            max_frames: config.max_frames,
            chunk_size: config.chunk_size,
        }
    }
}

/// Bilan d'une conversion vidéo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceReport {
    pub frames: u64,
    pub chunks: usize,
}

/// Fichiers de chunk en attente de concaténation.
///
/// Le drop supprime les fichiers puis le répertoire, quel que soit le chemin
/// par lequel la conversion se termine.
struct ChunkArtifacts {
    dir: TempDir,
    paths: Vec<PathBuf>,
}

impl ChunkArtifacts {
    fn create(parent: &Path) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(".stylascii-chunks-")
            .tempdir_in(parent)
            .map_err(|e| {
                ConvertError::encode(
                    Stage::Encode,
                    format!("répertoire temporaire dans {}: {e}", parent.display()),
                )
            })?;
        log::debug!("Chunks intermédiaires dans {}", dir.path().display());
        Ok(Self {
            dir,
            paths: Vec::new(),
        })
    }

    /// Réserve le chemin du prochain chunk.
    fn reserve(&mut self, extension: &str) -> PathBuf {
        let path = self
            .dir
            .path()
            .join(format!("chunk_{:05}.{extension}", self.paths.len()));
        self.paths.push(path.clone());
        path
    }

    fn dir(&self) -> &Path {
        self.dir.path()
    }
}

impl Drop for ChunkArtifacts {
    fn drop(&mut self) {
        for path in &self.paths {
            if path.exists()
                && let Err(e) = std::fs::remove_file(path)
            {
                log::warn!("Impossible de supprimer {}: {e}", path.display());
            }
        }
        log::debug!("{} chunks intermédiaires supprimés", self.paths.len());
    }
}

/// Conserve le type d'une erreur déjà classée, sinon la range dans `stage`.
fn in_stage(err: anyhow::Error, stage: Stage, decode: bool) -> anyhow::Error {
    if err.downcast_ref::<ConvertError>().is_some() {
        return err;
    }
    if decode {
        ConvertError::decode(stage, err).into()
    } else {
        ConvertError::encode(stage, err).into()
    }
}

/// Découpe une vidéo en chunks, les rend et les assemble.
///
/// Au plus `chunk_size` frames rendues (≤ 30) sont en mémoire à la fois.
///
/// # Example
/// ```no_run
/// use sa_core::traits::FrameDecoder;
/// use sa_export::muxer::FfmpegBackend;
/// use sa_export::sequencer::{FrameSequencer, SequencerConfig};
/// use std::path::Path;
///
/// fn convert(decoder: &mut dyn FrameDecoder) -> anyhow::Result<()> {
///     let config = SequencerConfig { fps: 15, max_frames: Some(60), chunk_size: 30 };
///     let report = FrameSequencer::new(config)?
///         .run(decoder, &FfmpegBackend, |f| Ok(f.clone()), Path::new("out.mp4"))?;
///     println!("{} frames", report.frames);
///     Ok(())
/// }
/// ```
pub struct FrameSequencer {
    config: SequencerConfig,
}

impl FrameSequencer {
    /// # Errors
    /// Returns [`ConvertError::InvalidParameter`] for a zero fps, chunk size or
    /// frame cap. Chunk sizes above [`MAX_CHUNK_FRAMES`] are clamped.
    pub fn new(mut config: SequencerConfig) -> Result<Self, ConvertError> {
        if config.fps == 0 {
            return Err(ConvertError::InvalidParameter("fps must be positive".into()));
        }
        if config.chunk_size == 0 {
            return Err(ConvertError::InvalidParameter(
                "chunk_size must be positive".into(),
            ));
        }
        if config.max_frames == Some(0) {
            return Err(ConvertError::InvalidParameter(
                "max_frames must be positive when set".into(),
            ));
        }
        if config.chunk_size > MAX_CHUNK_FRAMES {
            log::warn!(
                "chunk_size {} > {MAX_CHUNK_FRAMES}, ramené à {MAX_CHUNK_FRAMES}",
                config.chunk_size
            );
            config.chunk_size = MAX_CHUNK_FRAMES;
        }
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> SequencerConfig {
        self.config
    }

    /// Décode, transforme, encode par chunks puis concatène dans `output`.
    ///
    /// # Errors
    /// - [`ConvertError::Decode`] (decode stage) si la source échoue ou ne
    ///   produit aucune frame ;
    /// - [`ConvertError::Encode`] (encode stage) si un chunk ne peut être écrit ;
    /// - [`ConvertError::Encode`] (combine stage) si l'assemblage échoue ;
    /// - toute erreur renvoyée par `transform`, inchangée.
    ///
    /// Aucun fichier intermédiaire ne survit à l'appel.
    pub fn run<D, B, F>(
        &self,
        decoder: &mut D,
        backend: &B,
        mut transform: F,
        output: &Path,
    ) -> Result<SequenceReport>
    where
        D: FrameDecoder + ?Sized,
        B: VideoBackend + ?Sized,
        F: FnMut(&FrameBuffer) -> Result<FrameBuffer>,
    {
        let parent = output
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut artifacts = ChunkArtifacts::create(parent)?;

        let cap = self.config.max_frames.unwrap_or(u64::MAX);
        let mut frames: u64 = 0;
        let mut frame_size: Option<(u32, u32)> = None;
        let mut exhausted = false;

        while !exhausted && frames < cap {
            let room = usize::try_from(cap - frames)
                .unwrap_or(usize::MAX)
                .min(self.config.chunk_size);
            let mut chunk: Vec<FrameBuffer> = Vec::with_capacity(room);

            while chunk.len() < room {
                match decoder.next_frame() {
                    Ok(Some(frame)) => chunk.push(transform(&frame)?),
                    Ok(None) => {
                        exhausted = true;
                        break;
                    }
                    Err(e) => return Err(in_stage(e, Stage::Decode, true)),
                }
            }
            if chunk.is_empty() {
                break;
            }

            let size = *frame_size.get_or_insert((chunk[0].width, chunk[0].height));
            let path = artifacts.reserve(backend.chunk_extension());
            write_chunk(backend, &path, size, self.config.fps, &chunk)
                .map_err(|e| in_stage(e, Stage::Encode, false))?;

            frames += chunk.len() as u64;
            log::info!(
                "Chunk {} écrit ({} frames, total {frames})",
                artifacts.paths.len(),
                chunk.len()
            );
        }

        if artifacts.paths.is_empty() {
            return Err(ConvertError::decode(Stage::Decode, "source produced no frames").into());
        }

        backend
            .combine(&artifacts.paths, artifacts.dir(), output, self.config.fps)
            .map_err(|e| in_stage(e, Stage::Combine, false))?;

        let report = SequenceReport {
            frames,
            chunks: artifacts.paths.len(),
        };
        log::info!(
            "Vidéo assemblée: {} frames en {} chunks → {}",
            report.frames,
            report.chunks,
            output.display()
        );
        Ok(report)
    }
}

fn write_chunk<B: VideoBackend + ?Sized>(
    backend: &B,
    path: &Path,
    (width, height): (u32, u32),
    fps: u32,
    chunk: &[FrameBuffer],
) -> Result<()> {
    let mut encoder = backend.open_chunk(path, width, height, fps)?;
    for frame in chunk {
        if (frame.width, frame.height) != (width, height) {
            anyhow::bail!(
                "taille de frame variable: {}x{} au lieu de {width}x{height}",
                frame.width,
                frame.height
            );
        }
        encoder.write_frame(frame)?;
    }
    encoder.finish()
}
