use anyhow::Result;

use crate::frame::FrameBuffer;

/// Fournit les frames décodées d'une source vidéo, une à la fois.
///
/// Implémenté par : `FfmpegDecoder` (sa-source).
///
/// # Example
/// ```
/// use sa_core::traits::FrameDecoder;
/// use sa_core::frame::FrameBuffer;
///
/// struct Countdown(u32);
/// impl FrameDecoder for Countdown {
///     fn next_frame(&mut self) -> anyhow::Result<Option<FrameBuffer>> {
///         if self.0 == 0 { return Ok(None); }
///         self.0 -= 1;
///         Ok(Some(FrameBuffer::new(2, 2)))
///     }
///     fn native_size(&self) -> (u32, u32) { (2, 2) }
/// }
///
/// let mut d = Countdown(2);
/// assert!(d.next_frame().unwrap().is_some());
/// ```
pub trait FrameDecoder {
    /// Retourne la prochaine frame.
    ///
    /// `Ok(None)` signale l'épuisement normal de la source.
    ///
    /// # Errors
    /// Toute autre défaillance de décodage.
    fn next_frame(&mut self) -> Result<Option<FrameBuffer>>;

    /// Dimensions natives de la source.
    fn native_size(&self) -> (u32, u32);
}

/// Consomme des frames rendues et les écrit dans un artefact vidéo.
///
/// `finish` prend `Box<Self>` pour rester utilisable derrière `dyn`.
pub trait FrameEncoder {
    /// Ajoute une frame au flux.
    ///
    /// # Errors
    /// Returns an error if the frame cannot be written.
    fn write_frame(&mut self, frame: &FrameBuffer) -> Result<()>;

    /// Ferme le flux et finalise l'artefact.
    ///
    /// # Errors
    /// Returns an error if the encoder reports a failure on close.
    fn finish(self: Box<Self>) -> Result<()>;
}
