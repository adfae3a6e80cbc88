use std::sync::LazyLock;

use sa_core::charset::GlyphRamp;
use sa_core::error::ConvertError;

use crate::preprocess::Preprocess;

/// Couleur de remplissage des glyphes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    /// Couleur moyenne échantillonnée dans le bloc.
    Color,
    /// Premier plan fixe du style.
    Monochrome,
}

/// Named, immutable bundle of everything a conversion needs to know about a look.
///
/// Numeric constants (gamma, boost factors) are tuned by eye and carry no
/// further meaning.
#[derive(Clone, Debug)]
pub struct StyleProfile {
    pub name: &'static str,
    pub ramp: GlyphRamp,
    pub color_mode: ColorMode,
    pub background: (u8, u8, u8),
    /// Glyph color for `Monochrome` styles.
    pub foreground: (u8, u8, u8),
    pub gamma: f32,
    pub preprocess: Preprocess,
}

impl StyleProfile {
    /// Fill color for a block whose sampled color is `sampled`.
    ///
    /// # Example
    /// ```
    /// use sa_ascii::style::catalog;
    /// let gray = catalog().get("grayscale").unwrap();
    /// assert_eq!(gray.fill_color((10, 20, 30)), (255, 255, 255));
    /// let colored = catalog().get("colored").unwrap();
    /// assert_eq!(colored.fill_color((10, 20, 30)), (10, 20, 30));
    /// ```
    #[inline(always)]
    #[must_use]
    pub fn fill_color(&self, sampled: (u8, u8, u8)) -> (u8, u8, u8) {
        match self.color_mode {
            ColorMode::Color => sampled,
            ColorMode::Monochrome => self.foreground,
        }
    }
}

const BLACK: (u8, u8, u8) = (0, 0, 0);
const WHITE: (u8, u8, u8) = (255, 255, 255);

/// Registre fixe des styles, construit une seule fois.
pub struct StyleCatalog {
    styles: Vec<StyleProfile>,
}

static CATALOG: LazyLock<StyleCatalog> = LazyLock::new(StyleCatalog::builtin);

/// Process-wide read-only style registry.
///
/// # Example
/// ```
/// use sa_ascii::style::catalog;
/// assert!(catalog().names().contains(&"blocks"));
/// assert!(catalog().get("nonexistent").is_err());
/// ```
#[must_use]
pub fn catalog() -> &'static StyleCatalog {
    &CATALOG
}

impl StyleCatalog {
    fn builtin() -> Self {
        let styles = vec![
            StyleProfile {
                name: "colored",
                ramp: GlyphRamp::ascii(),
                color_mode: ColorMode::Color,
                background: BLACK,
                foreground: WHITE,
                gamma: 0.65,
                // Éclaircit la source : les couleurs moyennes sortent trop sombres sur fond noir.
                preprocess: Preprocess::Brightness(1.3),
            },
            StyleProfile {
                name: "grayscale",
                ramp: GlyphRamp::ascii(),
                color_mode: ColorMode::Monochrome,
                background: BLACK,
                foreground: WHITE,
                gamma: 0.65,
                preprocess: Preprocess::Identity,
            },
            StyleProfile {
                name: "inverted",
                ramp: GlyphRamp::ascii(),
                color_mode: ColorMode::Monochrome,
                background: BLACK,
                foreground: WHITE,
                gamma: 0.65,
                preprocess: Preprocess::Invert,
            },
            StyleProfile {
                name: "blocks",
                ramp: GlyphRamp::blocks(),
                color_mode: ColorMode::Monochrome,
                background: BLACK,
                foreground: WHITE,
                gamma: 0.7,
                preprocess: Preprocess::Identity,
            },
            StyleProfile {
                name: "neon",
                ramp: GlyphRamp::ascii(),
                color_mode: ColorMode::Color,
                background: BLACK,
                foreground: WHITE,
                gamma: 0.6,
                preprocess: Preprocess::Saturation(1.6),
            },
            StyleProfile {
                name: "sketch",
                ramp: GlyphRamp::ascii(),
                color_mode: ColorMode::Monochrome,
                background: WHITE,
                foreground: BLACK,
                gamma: 0.7,
                preprocess: Preprocess::Edges { gain: 1.8 },
            },
        ];
        Self { styles }
    }

    /// Look a style up by name.
    ///
    /// # Errors
    /// Returns [`ConvertError::InvalidStyle`] listing every registered name.
    pub fn get(&self, name: &str) -> Result<&StyleProfile, ConvertError> {
        self.styles
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| ConvertError::InvalidStyle {
                name: name.to_string(),
                valid: self.names().iter().map(ToString::to_string).collect(),
            })
    }

    /// Registered names, in catalog order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.styles.iter().map(|s| s.name).collect()
    }

    /// Every registered profile.
    pub fn iter(&self) -> impl Iterator<Item = &StyleProfile> {
        self.styles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_style_lists_every_name() {
        let Err(ConvertError::InvalidStyle { name, valid }) = catalog().get("nonexistent") else {
            panic!("style inconnu accepté");
        };
        assert_eq!(name, "nonexistent");
        assert_eq!(
            valid,
            vec!["colored", "grayscale", "inverted", "blocks", "neon", "sketch"]
        );
    }

    #[test]
    fn names_are_unique() {
        let mut names = catalog().names();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), catalog().iter().count());
    }

    #[test]
    fn gammas_stay_in_tuned_range() {
        for style in catalog().iter() {
            assert!(
                (0.6..=0.7).contains(&style.gamma),
                "{} gamma {}",
                style.name,
                style.gamma
            );
        }
    }

    #[test]
    fn catalog_is_shared() {
        assert!(std::ptr::eq(catalog(), catalog()));
    }
}
