// Trait for the e-paper display collaborator
use image::RgbImage;

/// A panel that accepts full-color frames in its own buffer format.
///
/// `width`/`height` are the physical, portrait dimensions. Opening and closing
/// the underlying device is the owner's business.
pub trait DisplayDriver {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Convert a composed frame into the panel's native buffer
    fn get_buffer(&self, image: &RgbImage) -> anyhow::Result<Vec<u8>>;

    fn display(&mut self, buffer: &[u8]) -> anyhow::Result<()>;
}
