//! Sortie des conversions : rasterisation des grilles en pixels, écriture PNG,
//! encodage MP4 et séquencement vidéo par chunks.

pub mod muxer;
pub mod rasterizer;
pub mod sequencer;

pub use rasterizer::{GlyphAtlas, Rasterizer, save_png};
pub use sequencer::{FrameSequencer, SequenceReport, SequencerConfig, VideoBackend};
