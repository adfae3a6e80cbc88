use std::fmt;

use thiserror::Error;

/// Étape de la conversion où une erreur d'I/O s'est produite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Lecture ou écriture d'une image fixe.
    Image,
    /// Décodage des frames vidéo source.
    Decode,
    /// Encodage d'un chunk vidéo intermédiaire.
    Encode,
    /// Concaténation des chunks dans la vidéo finale.
    Combine,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Image => "image",
            Self::Decode => "decode",
            Self::Encode => "encode",
            Self::Combine => "combine",
        })
    }
}

/// Errors surfaced by a conversion call.
///
/// Library functions return `anyhow::Result`; the typed kind is recoverable
/// with `downcast_ref::<ConvertError>()`.
///
/// # Example
/// ```
/// use sa_core::error::{ConvertError, Stage};
/// let err = ConvertError::Decode { stage: Stage::Decode, message: "EOF".into() };
/// assert_eq!(err.to_string(), "decode failure (decode stage): EOF");
/// ```
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Requested style is not registered in the catalog.
    #[error("unknown style '{name}' (valid styles: {})", valid.join(", "))]
    InvalidStyle {
        /// Name that was requested.
        name: String,
        /// Every registered style name, in catalog order.
        valid: Vec<String>,
    },

    /// Out-of-range configuration value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Source could not be opened or a frame could not be decoded.
    #[error("decode failure ({stage} stage): {message}")]
    Decode {
        /// Stage that failed.
        stage: Stage,
        /// Human-readable cause.
        message: String,
    },

    /// Output artifact could not be written.
    #[error("encode failure ({stage} stage): {message}")]
    Encode {
        /// Stage that failed.
        stage: Stage,
        /// Human-readable cause.
        message: String,
    },
}

impl ConvertError {
    /// Construit une erreur de décodage à partir d'une cause quelconque.
    #[must_use]
    pub fn decode(stage: Stage, cause: impl fmt::Display) -> Self {
        Self::Decode {
            stage,
            message: format!("{cause:#}"),
        }
    }

    /// Construit une erreur d'encodage à partir d'une cause quelconque.
    #[must_use]
    pub fn encode(stage: Stage, cause: impl fmt::Display) -> Self {
        Self::Encode {
            stage,
            message: format!("{cause:#}"),
        }
    }

    /// Stage at which an I/O failure happened, if any.
    #[must_use]
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Decode { stage, .. } | Self::Encode { stage, .. } => Some(*stage),
            Self::InvalidStyle { .. } | Self::InvalidParameter(_) => None,
        }
    }
}
