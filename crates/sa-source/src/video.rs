// Ce module utilise ffmpeg via subprocess (std::process::Command) plutôt qu'un
// binding C. Prérequis : `ffmpeg` et `ffprobe` accessibles dans PATH.
//
// Architecture :
//   - `probe_video`      : interroge ffprobe pour obtenir width/height/fps
//   - `spawn_ffmpeg_pipe`: lance ffmpeg → flux raw RGBA sur stdout
//   - `FfmpegDecoder`    : lit une frame à la fois, tue/récolte ffmpeg au drop
//
// stderr est vidé en continu par un thread dédié : un pipe plein bloquerait
// ffmpeg avant qu'il n'écrive sur stdout.

use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread::JoinHandle;

use anyhow::{Context, Result};
use sa_core::error::{ConvertError, Stage};
use sa_core::frame::FrameBuffer;
use sa_core::process::{drain_stderr, join_stderr};
use sa_core::traits::FrameDecoder;

/// Métadonnées extraites via ffprobe.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    /// Images par seconde (ex: 23.976, 24.0, 30.0, 60.0).
    pub fps: f64,
}

/// Interroge `ffprobe` pour obtenir les métadonnées du flux vidéo principal.
///
/// # Errors
/// Retourne une erreur si `ffprobe` est introuvable ou si le fichier
/// ne contient aucun flux vidéo décodable.
pub fn probe_video(path: &Path) -> Result<VideoInfo> {
    let path_str = path.to_str().context("Chemin vidéo invalide (non-UTF8)")?;

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height,r_frame_rate",
            "-of",
            "default=noprint_wrappers=1",
            "-i",
            path_str,
        ])
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .context(
            "Impossible de lancer ffprobe. Vérifiez que ffprobe est installé et dans le PATH.",
        )?;

    let info = parse_probe_output(&String::from_utf8_lossy(&output.stdout))
        .with_context(|| format!("aucun flux vidéo dans {}", path.display()))?;

    log::info!(
        "probe_video: {}x{} @ {:.3}fps — {}",
        info.width,
        info.height,
        info.fps,
        path.display()
    );
    Ok(info)
}

/// Parse la sortie `key=value` de ffprobe.
///
/// # Errors
/// Returns an error if width or height is missing or zero.
///
/// # Example
/// ```
/// use sa_source::video::parse_probe_output;
/// let info = parse_probe_output("width=640\nheight=360\nr_frame_rate=30000/1001\n").unwrap();
/// assert_eq!((info.width, info.height), (640, 360));
/// assert!((info.fps - 29.97).abs() < 0.01);
/// ```
pub fn parse_probe_output(text: &str) -> Result<VideoInfo> {
    let mut width: u32 = 0;
    let mut height: u32 = 0;
    let mut fps: f64 = 0.0;

    for line in text.lines() {
        if let Some(val) = line.strip_prefix("width=") {
            width = val.trim().parse().unwrap_or(0);
        } else if let Some(val) = line.strip_prefix("height=") {
            height = val.trim().parse().unwrap_or(0);
        } else if let Some(val) = line.strip_prefix("r_frame_rate=") {
            // Format: "24/1" ou "30000/1001"
            let mut parts = val.trim().splitn(2, '/');
            let num: f64 = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0.0);
            let den: f64 = parts.next().and_then(|s| s.parse().ok()).unwrap_or(1.0);
            if den > 0.0 {
                fps = num / den;
            }
        }
    }

    if width == 0 || height == 0 {
        anyhow::bail!("dimensions vidéo introuvables dans la sortie ffprobe");
    }
    Ok(VideoInfo { width, height, fps })
}

/// Lance un processus `ffmpeg` qui écrit des frames RGBA brutes sur stdout.
///
/// Chaque frame = `w × h × 4` bytes (RGBA row-major, sans padding), à la
/// résolution native. `-an` supprime l'audio.
///
/// # Errors
/// Retourne une erreur si ffmpeg ne peut être lancé.
pub fn spawn_ffmpeg_pipe(path: &Path) -> Result<Child> {
    let path_str = path.to_str().context("Chemin vidéo invalide (non-UTF8)")?;

    let mut cmd = Command::new("ffmpeg");
    cmd.args([
            "-i",
            path_str,
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-an",
            "-hide_banner",
            "-loglevel",
            "error",
            "pipe:1",
        ]);
    let child = pipe_stdio(&mut cmd)
        .spawn()
        .context("Impossible de lancer ffmpeg. (Est-il dans PATH ?)")?;

    log::debug!("ffmpeg spawné pour {}", path.display());
    Ok(child)
}

/// stdout et stderr en pipe, stdin fermé.
fn pipe_stdio(cmd: &mut Command) -> &mut Command {
    cmd.stdout(Stdio::piped())
        .stdin(Stdio::null())
        .stderr(Stdio::piped())
}

/// Lit exactement `buf.len()` bytes depuis `reader`.
///
/// # Errors
/// Retourne `Ok(true)` si lu avec succès, `Ok(false)` sur EOF avant complétion,
/// `Err` sur erreur I/O fatale.
///
/// # Example
/// ```
/// use sa_source::video::read_exact_or_eof;
/// let mut src: &[u8] = &[1, 2, 3];
/// let mut buf = [0u8; 2];
/// assert!(read_exact_or_eof(&mut src, &mut buf).unwrap());
/// assert!(!read_exact_or_eof(&mut src, &mut buf).unwrap());
/// ```
pub fn read_exact_or_eof<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<bool> {
    let mut total = 0usize;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => return Ok(false),
            Ok(n) => total += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(true)
}

/// Décodeur de frames RGBA natives via un pipe ffmpeg.
///
/// Le processus est tué et récolté au drop, quel que soit le chemin de sortie.
///
/// # Example
/// ```no_run
/// use sa_source::video::FfmpegDecoder;
/// use sa_core::traits::FrameDecoder;
/// use std::path::Path;
/// let mut decoder = FfmpegDecoder::open(Path::new("clip.mp4")).unwrap();
/// while let Some(frame) = decoder.next_frame().unwrap() {
///     println!("{}x{}", frame.width, frame.height);
/// }
/// ```
pub struct FfmpegDecoder {
    child: Option<Child>,
    stderr: Option<JoinHandle<String>>,
    info: VideoInfo,
    frames_read: u64,
}

impl FfmpegDecoder {
    /// Probe then open `path`.
    ///
    /// # Errors
    /// Returns [`ConvertError::Decode`] (decode stage) when the file cannot be
    /// probed or ffmpeg cannot be started.
    pub fn open(path: &Path) -> Result<Self> {
        let info = probe_video(path).map_err(|e| ConvertError::decode(Stage::Decode, e))?;
        let child = spawn_ffmpeg_pipe(path).map_err(|e| ConvertError::decode(Stage::Decode, e))?;
        Ok(Self::from_child(child, info))
    }

    /// Adopte un processus qui écrit des frames `info.width × info.height`
    /// RGBA sur stdout. Son stderr, s'il est en pipe, est vidé en arrière-plan.
    fn from_child(mut child: Child, info: VideoInfo) -> Self {
        let stderr = child.stderr.take().map(drain_stderr);
        Self {
            child: Some(child),
            stderr,
            info,
            frames_read: 0,
        }
    }

    #[must_use]
    pub fn info(&self) -> VideoInfo {
        self.info
    }

    /// Attend ffmpeg après EOF et remonte son code d'erreur éventuel.
    fn reap(&mut self) -> Result<()> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        drop(child.stdout.take());
        let status = child.wait()?;
        // Le thread se termine avec le processus (EOF sur stderr).
        let stderr = join_stderr(self.stderr.take());
        if !status.success() {
            anyhow::bail!("ffmpeg decoder error ({status}): {}", stderr.trim());
        }
        Ok(())
    }
}

impl FrameDecoder for FfmpegDecoder {
    fn next_frame(&mut self) -> Result<Option<FrameBuffer>> {
        let Some(stdout) = self.child.as_mut().and_then(|c| c.stdout.as_mut()) else {
            return Ok(None);
        };

        let mut frame = FrameBuffer::new(self.info.width, self.info.height);
        let complete = read_exact_or_eof(stdout, &mut frame.data)
            .map_err(|e| ConvertError::decode(Stage::Decode, e))?;

        if complete {
            self.frames_read += 1;
            return Ok(Some(frame));
        }

        log::info!("Décodeur vidéo: EOF après {} frames.", self.frames_read);
        self.reap()
            .map_err(|e| ConvertError::decode(Stage::Decode, e))?;
        Ok(None)
    }

    fn native_size(&self) -> (u32, u32) {
        (self.info.width, self.info.height)
    }
}

impl Drop for FfmpegDecoder {
    fn drop(&mut self) {
        if let Some(mut c) = self.child.take() {
            let _ = c.kill();
            let _ = c.wait();
        }
        // Thread stderr détaché sans join : il finit seul sur EOF.
        self.stderr = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_output_rejects_missing_stream() {
        assert!(parse_probe_output("").is_err());
        assert!(parse_probe_output("width=0\nheight=10\n").is_err());
    }

    #[test]
    fn probe_output_handles_integer_rates() {
        let info = parse_probe_output("r_frame_rate=24/1\nwidth=8\nheight=6").unwrap();
        assert_eq!(info, VideoInfo { width: 8, height: 6, fps: 24.0 });
    }

    #[test]
    fn read_exact_handles_short_reads() {
        struct Trickle<'a>(&'a [u8]);
        impl Read for Trickle<'_> {
            fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
                if self.0.is_empty() || buf.is_empty() {
                    return Ok(0);
                }
                buf[0] = self.0[0];
                self.0 = &self.0[1..];
                Ok(1)
            }
        }
        let mut src = Trickle(&[1, 2, 3, 4, 5]);
        let mut buf = [0u8; 4];
        assert!(read_exact_or_eof(&mut src, &mut buf).unwrap());
        assert_eq!(buf, [1, 2, 3, 4]);
        assert!(!read_exact_or_eof(&mut src, &mut buf).unwrap());
    }

    /// Processus factice configuré comme ffmpeg (même stdio).
    #[cfg(unix)]
    fn fake_decoder(script: &str) -> FfmpegDecoder {
        let child = pipe_stdio(Command::new("sh").args(["-c", script]))
            .spawn()
            .unwrap();
        FfmpegDecoder::from_child(
            child,
            VideoInfo {
                width: 2,
                height: 2,
                fps: 15.0,
            },
        )
    }

    #[cfg(unix)]
    #[test]
    fn chatty_stderr_does_not_stall_decoding() {
        // ~140 KiB sur stderr avant la première frame : bien plus qu'un pipe.
        let mut decoder = fake_decoder(
            "i=0; while [ $i -lt 3000 ]; do \
               echo 'error while decoding MB 12 7, bytestream -5' >&2; i=$((i+1)); \
             done; head -c 48 /dev/zero",
        );
        let mut frames = 0;
        while let Some(frame) = decoder.next_frame().unwrap() {
            assert_eq!((frame.width, frame.height), (2, 2));
            frames += 1;
        }
        assert_eq!(frames, 3);
        assert!(decoder.next_frame().unwrap().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn failed_exit_surfaces_stderr_as_decode_error() {
        let mut decoder = fake_decoder("echo 'boom: invalid data' >&2; exit 1");
        let err = decoder.next_frame().err().unwrap();
        let Some(ConvertError::Decode { stage, message }) = err.downcast_ref::<ConvertError>()
        else {
            panic!("expected Decode, got {err:#}");
        };
        assert_eq!(*stage, Stage::Decode);
        assert!(message.contains("boom: invalid data"), "{message}");
    }

    #[cfg(unix)]
    #[test]
    fn dropping_mid_stream_kills_the_process() {
        let mut decoder = fake_decoder("cat /dev/zero");
        assert!(decoder.next_frame().unwrap().is_some());
        drop(decoder);
    }
}
