// Display driver that writes the panel buffer out as a PNG preview
use crate::application::display_driver::DisplayDriver;
use crate::infrastructure::epd2in13g::{self, EPD_HEIGHT, EPD_WIDTH};
use anyhow::Context;
use image::{imageops, RgbImage};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct PreviewDisplay {
    path: PathBuf,
    frames_shown: usize,
}

impl PreviewDisplay {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            frames_shown: 0,
        }
    }
}

impl DisplayDriver for PreviewDisplay {
    fn width(&self) -> u32 {
        EPD_WIDTH
    }

    fn height(&self) -> u32 {
        EPD_HEIGHT
    }

    fn get_buffer(&self, image: &RgbImage) -> anyhow::Result<Vec<u8>> {
        epd2in13g::pack(image)
    }

    fn display(&mut self, buffer: &[u8]) -> anyhow::Result<()> {
        // Rotate back so the preview reads the way the panel is mounted
        let portrait = epd2in13g::unpack(buffer)?;
        let landscape = imageops::rotate90(&portrait);
        landscape
            .save(&self.path)
            .with_context(|| format!("Failed to write preview {}", self.path.display()))?;

        self.frames_shown += 1;
        tracing::info!("Frame {} written to {}", self.frames_shown, self.path.display());
        Ok(())
    }
}
