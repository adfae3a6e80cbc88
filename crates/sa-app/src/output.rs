use std::path::{Path, PathBuf};

/// `<input_basename>-<style>-ascii.<extension>`, dans le répertoire courant.
#[must_use]
pub fn default_output(input: &Path, style: &str, extension: &str) -> PathBuf {
    let base = input
        .file_stem()
        .map_or_else(|| "output".to_string(), |s| s.to_string_lossy().into_owned());
    PathBuf::from(format!("{base}-{style}-ascii.{extension}"))
}

/// Chemin de sortie d'une image : celui demandé (extension `.png` forcée)
/// ou le nom par défaut.
#[must_use]
pub fn image_output(input: &Path, requested: Option<&Path>, style: &str) -> PathBuf {
    match requested {
        Some(path) => {
            let is_png = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("png"));
            if is_png {
                path.to_path_buf()
            } else {
                log::warn!("Sortie {} : extension .png forcée", path.display());
                path.with_extension("png")
            }
        }
        None => default_output(input, style, "png"),
    }
}

/// Chemin de sortie d'une vidéo : celui demandé tel quel, ou le nom par défaut.
#[must_use]
pub fn video_output(input: &Path, requested: Option<&Path>, style: &str) -> PathBuf {
    requested.map_or_else(|| default_output(input, style, "mp4"), Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_names_follow_input_and_style() {
        assert_eq!(
            default_output(Path::new("/photos/cat.jpg"), "neon", "png"),
            PathBuf::from("cat-neon-ascii.png")
        );
        assert_eq!(
            video_output(Path::new("clips/run.final.mov"), None, "blocks"),
            PathBuf::from("run.final-blocks-ascii.mp4")
        );
    }

    #[test]
    fn requested_image_output_gets_png_extension() {
        let input = Path::new("in.jpg");
        assert_eq!(
            image_output(input, Some(Path::new("out/result.jpg")), "colored"),
            PathBuf::from("out/result.png")
        );
        assert_eq!(
            image_output(input, Some(Path::new("result")), "colored"),
            PathBuf::from("result.png")
        );
        assert_eq!(
            image_output(input, Some(Path::new("result.PNG")), "colored"),
            PathBuf::from("result.PNG")
        );
    }

    #[test]
    fn requested_video_output_is_kept() {
        assert_eq!(
            video_output(Path::new("in.mp4"), Some(Path::new("x.mkv")), "neon"),
            PathBuf::from("x.mkv")
        );
    }
}
