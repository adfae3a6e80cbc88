//! Helpers pour les sous-processus ffmpeg.

use std::io::Read;
use std::thread::JoinHandle;

/// Taille max du diagnostic conservé (fin du flux).
pub const STDERR_TAIL: usize = 16 * 1024;

/// Vide `pipe` jusqu'à EOF sur un thread et garde ses derniers
/// [`STDERR_TAIL`] bytes.
///
/// Un stderr en pipe jamais lu bloque le processus enfant dès que le buffer
/// de l'OS est plein.
///
/// # Example
/// ```
/// use sa_core::process::drain_stderr;
/// let handle = drain_stderr(std::io::Cursor::new(b"warning\n".to_vec()));
/// assert_eq!(handle.join().unwrap(), "warning\n");
/// ```
pub fn drain_stderr<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<String> {
    std::thread::spawn(move || {
        let mut tail = Vec::new();
        let mut buf = [0u8; 8192];
        loop {
            match pipe.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    tail.extend_from_slice(&buf[..n]);
                    if tail.len() > STDERR_TAIL {
                        tail.drain(..tail.len() - STDERR_TAIL);
                    }
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(_) => break,
            }
        }
        String::from_utf8_lossy(&tail).into_owned()
    })
}

/// Récupère le texte d'un thread [`drain_stderr`] ; vide s'il a paniqué.
#[must_use]
pub fn join_stderr(handle: Option<JoinHandle<String>>) -> String {
    handle.and_then(|h| h.join().ok()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn long_streams_keep_only_the_tail() {
        let mut data = vec![b'a'; STDERR_TAIL * 3];
        data.extend_from_slice(b"fatal: last line");
        let text = drain_stderr(Cursor::new(data)).join().unwrap();
        assert_eq!(text.len(), STDERR_TAIL);
        assert!(text.ends_with("fatal: last line"));
    }

    #[test]
    fn missing_handle_is_empty() {
        assert_eq!(join_stderr(None), "");
    }
}
