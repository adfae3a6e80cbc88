//! Configuration, types, and shared structures for stylASCII.
//!
//! This crate contains all shared types, traits, and configuration logic
//! used across the stylASCII workspace.

pub mod charset;
pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod process;
pub mod traits;

pub use charset::GlyphRamp;
pub use config::ConvertConfig;
pub use error::{ConvertError, Stage};
pub use frame::{AsciiCell, AsciiGrid, FrameBuffer};
