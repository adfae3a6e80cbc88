//! Moteur de conversion bloc→glyphe de stylASCII.
//!
//! Échantillonne des blocs de pixels, les réduit en luminance/couleur et
//! choisit un glyphe dans la rampe du style.

pub mod compositor;
pub mod luminance;
pub mod preprocess;
pub mod quantize;
pub mod sampler;
pub mod style;

pub use compositor::Compositor;
pub use style::{ColorMode, StyleProfile, catalog};
