use std::fmt::Write as _;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread::JoinHandle;

use anyhow::{Context, Result};
use sa_core::frame::FrameBuffer;
use sa_core::process::{drain_stderr, join_stderr};
use sa_core::traits::FrameEncoder;

use crate::sequencer::VideoBackend;

/// Encode des raw frames RGBA dans un fichier MP4 avec ffmpeg (lossless).
///
/// Sert aux chunks intermédiaires : aucune perte avant la concaténation.
pub struct Mp4Muxer {
    ffmpeg_child: Option<Child>,
    stderr: Option<JoinHandle<String>>,
    width: u32,
    height: u32,
    frames: u64,
}

impl Mp4Muxer {
    /// Crée un muxer vidéo pour des frames `width × height`.
    /// Utilise x264rgb avec `-crf 0`.
    ///
    /// # Errors
    /// Retourne une erreur si ffmpeg n'est pas installé ou impossible à démarrer.
    pub fn new(output_path: &Path, width: u32, height: u32, target_fps: u32) -> Result<Self> {
        let path_str = output_path.to_str().context("Chemin invalide")?;

        let mut child = Command::new("ffmpeg")
            .args([
                "-y",
                "-f",
                "rawvideo",
                "-vcodec",
                "rawvideo",
                "-s",
                &format!("{width}x{height}"),
                "-pix_fmt",
                "rgba",
                "-r",
                &target_fps.to_string(),
                "-i",
                "-",
                "-c:v",
                "libx264rgb",
                "-crf",
                "0",
                "-preset",
                "ultrafast",
                "-pix_fmt",
                "rgb24",
                "-color_range",
                "pc",
                "-hide_banner",
                "-loglevel",
                "error",
                path_str,
            ])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .context("Échec de l'initialisation de l'encodeur vidéo ffmpeg. (Est-il dans PATH ?)")?;

        log::debug!(
            "Mp4Muxer: {width}x{height}@{target_fps} → {}",
            output_path.display()
        );
        let stderr = child.stderr.take().map(drain_stderr);
        Ok(Self {
            ffmpeg_child: Some(child),
            stderr,
            width,
            height,
            frames: 0,
        })
    }
}

impl FrameEncoder for Mp4Muxer {
    fn write_frame(&mut self, fb: &FrameBuffer) -> Result<()> {
        if (fb.width, fb.height) != (self.width, self.height) {
            anyhow::bail!(
                "frame {}x{} ne correspond pas au flux {}x{}",
                fb.width,
                fb.height,
                self.width,
                self.height
            );
        }
        let stdin = self
            .ffmpeg_child
            .as_mut()
            .and_then(|c| c.stdin.as_mut())
            .context("flux ffmpeg déjà fermé")?;
        stdin
            .write_all(&fb.data)
            .context("écriture dans le pipe ffmpeg")?;
        self.frames += 1;
        Ok(())
    }

    fn finish(mut self: Box<Self>) -> Result<()> {
        let Some(mut child) = self.ffmpeg_child.take() else {
            return Ok(());
        };
        drop(child.stdin.take());

        let status = child.wait()?;
        let stderr = join_stderr(self.stderr.take());
        if !status.success() {
            anyhow::bail!("ffmpeg encoder error ({status}): {}", stderr.trim());
        }
        log::debug!("Mp4Muxer: {} frames finalisées", self.frames);
        Ok(())
    }
}

impl Drop for Mp4Muxer {
    fn drop(&mut self) {
        // Abandon sans finish() : on ne laisse pas de process orphelin.
        if let Some(mut c) = self.ffmpeg_child.take() {
            let _ = c.kill();
            let _ = c.wait();
        }
        self.stderr = None;
    }
}

/// Contenu d'une liste pour le demuxer concat de ffmpeg.
///
/// # Example
/// ```
/// use sa_export::muxer::concat_list;
/// use std::path::PathBuf;
/// let list = concat_list(&[PathBuf::from("/tmp/a.mp4"), PathBuf::from("/tmp/it's.mp4")]);
/// assert_eq!(list, "file '/tmp/a.mp4'\nfile '/tmp/it'\\''s.mp4'\n");
/// ```
#[must_use]
pub fn concat_list(chunks: &[PathBuf]) -> String {
    let mut list = String::new();
    for chunk in chunks {
        let escaped = chunk.to_string_lossy().replace('\'', "'\\''");
        let _ = writeln!(list, "file '{escaped}'");
    }
    list
}

/// Concatène les chunks dans `output`, dans l'ordre donné.
///
/// La sortie finale est ré-encodée en H.264 yuv420p pour rester lisible
/// partout; les dimensions impaires sont complétées d'un pixel.
///
/// # Errors
/// Retourne une erreur si la liste ne peut être écrite ou si ffmpeg échoue.
pub fn concat_videos(chunks: &[PathBuf], list_path: &Path, output: &Path, fps: u32) -> Result<()> {
    std::fs::write(list_path, concat_list(chunks))
        .with_context(|| format!("écriture de {}", list_path.display()))?;

    let list_str = list_path.to_str().context("list path invalid")?;
    let output_str = output.to_str().context("output path invalid")?;

    let result = Command::new("ffmpeg")
        .args([
            "-y",
            "-f",
            "concat",
            "-safe",
            "0",
            "-i",
            list_str,
            "-vf",
            "pad=ceil(iw/2)*2:ceil(ih/2)*2",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-crf",
            "18",
            "-r",
            &fps.to_string(),
            "-hide_banner",
            "-loglevel",
            "error",
            output_str,
        ])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .context("Impossible de lancer ffmpeg pour la concaténation.")?;

    if !result.status.success() {
        discard_partial(output);
        let stderr = String::from_utf8_lossy(&result.stderr);
        anyhow::bail!("ffmpeg concat error: {}", stderr.trim());
    }
    log::info!("{} chunks concaténés → {}", chunks.len(), output.display());
    Ok(())
}

/// Supprime une sortie laissée à moitié écrite par un ffmpeg en échec.
fn discard_partial(output: &Path) {
    if output.exists()
        && let Err(e) = std::fs::remove_file(output)
    {
        log::warn!("sortie partielle non supprimée {}: {e}", output.display());
    }
}

/// Backend vidéo réel : chunks MP4 lossless puis concaténation ffmpeg.
#[derive(Debug, Default, Clone, Copy)]
pub struct FfmpegBackend;

impl VideoBackend for FfmpegBackend {
    fn open_chunk(
        &self,
        path: &Path,
        width: u32,
        height: u32,
        fps: u32,
    ) -> Result<Box<dyn FrameEncoder>> {
        Ok(Box::new(Mp4Muxer::new(path, width, height, fps)?))
    }

    fn combine(&self, chunks: &[PathBuf], scratch: &Path, output: &Path, fps: u32) -> Result<()> {
        concat_videos(chunks, &scratch.join("chunks.txt"), output, fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn muxer_new_does_not_panic() {
        // Dépend de la présence de ffmpeg : les deux issues sont valides.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_output.mp4");
        if let Ok(mut muxer) = Mp4Muxer::new(&path, 4, 4, 30) {
            assert!(muxer.write_frame(&FrameBuffer::new(2, 2)).is_err());
            drop(muxer);
        }
    }

    #[test]
    fn partial_output_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.mp4");
        std::fs::write(&output, b"ftyp truncated").unwrap();
        discard_partial(&output);
        assert!(!output.exists());
        // Absente : rien à faire, pas d'erreur.
        discard_partial(&output);
    }

    #[test]
    fn failed_concat_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.mp4");
        let chunks = [dir.path().join("missing_00000.mp4")];
        // Sans ffmpeg le lancement échoue ; avec, la chunk absente le fait échouer.
        let result = concat_videos(&chunks, &dir.path().join("chunks.txt"), &output, 15);
        assert!(result.is_err());
        assert!(!output.exists());
    }

    #[test]
    fn concat_list_keeps_order() {
        let chunks: Vec<PathBuf> = (0..3)
            .map(|i| PathBuf::from(format!("chunk_{i:05}.mp4")))
            .collect();
        let list = concat_list(&chunks);
        let names: Vec<&str> = list.lines().collect();
        assert_eq!(
            names,
            [
                "file 'chunk_00000.mp4'",
                "file 'chunk_00001.mp4'",
                "file 'chunk_00002.mp4'"
            ]
        );
    }
}
