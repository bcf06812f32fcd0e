// Frame renderer - Draws logo and charts onto a two-layer frame and composites it
use crate::application::display_driver::DisplayDriver;
use crate::domain::chart::{bar_heights, draw_bars, scale_factor, ChartGeometry};
use crate::domain::frame::{Frame, Layer};
use crate::infrastructure::config::{AssetSettings, ChartSettings};
use anyhow::Context;
use image::{imageops, GrayImage, Luma, Rgb, RgbImage};
use std::path::Path;

const RED: Rgb<u8> = Rgb([255, 0, 0]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

#[derive(Debug, Clone)]
pub struct FrameRenderer {
    chart: ChartSettings,
    assets: AssetSettings,
}

impl FrameRenderer {
    pub fn new(chart: ChartSettings, assets: AssetSettings) -> Self {
        Self { chart, assets }
    }

    /// Blank frame for a driver's panel. The panel is mounted landscape, so
    /// the canvas is `height x width` of the physical display.
    pub fn new_frame(&self, driver: &dyn DisplayDriver) -> Frame {
        Frame::blank(driver.height(), driver.width())
    }

    /// Paste the split logo: top half in black, bottom half in red.
    pub fn draw_logo(&self, frame: &mut Frame) -> anyhow::Result<()> {
        tracing::info!("Rendering logo");

        let top = load_bitmap(&self.assets.logo_top)?;
        let bottom = load_bitmap(&self.assets.logo_bottom)?;
        imageops::replace(&mut frame.black, &top, self.assets.logo_x, self.assets.logo_y);
        imageops::replace(&mut frame.red, &bottom, self.assets.logo_x, self.assets.logo_y);
        Ok(())
    }

    /// Draw `totals` in black and `sub` in red, both scaled so the largest
    /// total fills the chart height. Empty or all-zero totals draw nothing.
    pub fn draw_charts(&self, frame: &mut Frame, totals: &[u64], sub: &[u64]) {
        tracing::info!("Rendering charts");

        let Some(factor) = scale_factor(totals, self.chart.height) else {
            tracing::debug!("No chart data to scale ({} buckets), skipping bars", totals.len());
            return;
        };

        let geometry = self.geometry(frame);
        draw_bars(frame.layer_mut(Layer::Black), &bar_heights(totals, factor), &geometry);
        draw_bars(frame.layer_mut(Layer::Red), &bar_heights(sub, factor), &geometry);
        tracing::debug!(
            "Chart scale {:.3}: {} black and {} red pixels inked",
            factor,
            frame.ink_count(Layer::Black),
            frame.ink_count(Layer::Red)
        );
    }

    pub fn geometry(&self, frame: &Frame) -> ChartGeometry {
        self.chart.geometry(frame.height())
    }

    /// Merge both layers into one RGB image. Black is stamped after red, so
    /// black wins where both layers are inked.
    pub fn compose(&self, frame: &Frame) -> RgbImage {
        let mut image = RgbImage::from_pixel(frame.width(), frame.height(), WHITE);
        paste_through_mask(&mut image, RED, &frame.red);
        paste_through_mask(&mut image, BLACK, &frame.black);
        image
    }

    /// Compose the frame and push it to the panel
    pub fn compose_and_emit(
        &self,
        frame: &Frame,
        driver: &mut dyn DisplayDriver,
    ) -> anyhow::Result<()> {
        let image = self.compose(frame);
        let buffer = driver.get_buffer(&image)?;
        driver.display(&buffer)
    }
}

fn load_bitmap(path: &Path) -> anyhow::Result<GrayImage> {
    let image = image::open(path)
        .with_context(|| format!("Failed to load bitmap {}", path.display()))?
        .to_luma8();
    Ok(threshold(image))
}

/// Snap grayscale to pure black/white like a 1-bit bitmap
fn threshold(mut image: GrayImage) -> GrayImage {
    for pixel in image.pixels_mut() {
        *pixel = if pixel[0] < 128 { Luma([0]) } else { Luma([255]) };
    }
    image
}

/// Blend `color` into `image`, weighted by the inverted `layer` luma.
fn paste_through_mask(image: &mut RgbImage, color: Rgb<u8>, layer: &GrayImage) {
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let weight = 255 - u32::from(layer.get_pixel(x, y)[0]);
        if weight == 0 {
            continue;
        }
        for (channel, target) in pixel.0.iter_mut().zip(color.0) {
            let blended = (u32::from(*channel) * (255 - weight) + u32::from(target) * weight) / 255;
            *channel = blended as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::frame::INK;
    use std::path::PathBuf;

    fn chart(height: u32) -> ChartSettings {
        ChartSettings {
            height,
            left: 4,
            bottom_margin: 22,
            pitch: 3,
            bar_width: 1,
            columns: None,
        }
    }

    fn renderer(height: u32) -> FrameRenderer {
        FrameRenderer::new(chart(height), AssetSettings::default())
    }

    #[test]
    fn test_compose_black_wins_over_red() {
        let renderer = renderer(50);
        let mut frame = Frame::blank(3, 1);
        frame.black.put_pixel(0, 0, INK);
        frame.red.put_pixel(0, 0, INK);
        frame.red.put_pixel(1, 0, INK);

        let image = renderer.compose(&frame);
        assert_eq!(*image.get_pixel(0, 0), BLACK);
        assert_eq!(*image.get_pixel(1, 0), RED);
        assert_eq!(*image.get_pixel(2, 0), WHITE);
    }

    #[test]
    fn test_draw_charts_scales_both_series_by_totals() {
        let renderer = renderer(50);
        let mut frame = Frame::blank(250, 122);
        renderer.draw_charts(&mut frame, &[100, 40], &[40, 10]);

        // factor 0.5: totals 50 + 20, sub 20 + 5
        assert_eq!(frame.ink_count(Layer::Black), 70);
        assert_eq!(frame.ink_count(Layer::Red), 25);
        assert_eq!(frame.black.get_pixel(4, 99)[0], 0);
        assert_eq!(frame.black.get_pixel(4, 50)[0], 0);
        assert_eq!(frame.black.get_pixel(4, 49)[0], 255);
    }

    #[test]
    fn test_draw_charts_tolerates_degenerate_series() {
        let renderer = renderer(50);
        let mut frame = Frame::blank(250, 122);
        renderer.draw_charts(&mut frame, &[], &[]);
        renderer.draw_charts(&mut frame, &[0, 0], &[0, 0]);

        assert_eq!(frame.ink_count(Layer::Black), 0);
        assert_eq!(frame.ink_count(Layer::Red), 0);
    }

    #[test]
    fn test_draw_logo_pastes_halves_with_offset() {
        let dir = tempfile::tempdir().unwrap();
        let top_path = dir.path().join("top.bmp");
        let bottom_path = dir.path().join("bottom.bmp");
        GrayImage::from_pixel(20, 10, Luma([0])).save(&top_path).unwrap();
        GrayImage::from_pixel(20, 10, Luma([255])).save(&bottom_path).unwrap();

        let assets = AssetSettings {
            logo_top: top_path,
            logo_bottom: bottom_path,
            logo_x: -12,
            logo_y: 2,
        };
        let renderer = FrameRenderer::new(chart(50), assets);
        let mut frame = Frame::blank(250, 122);
        frame.red.put_pixel(0, 2, INK);
        renderer.draw_logo(&mut frame).unwrap();

        // 12 of 20 columns are clipped off the left edge
        assert_eq!(frame.ink_count(Layer::Black), 8 * 10);
        assert_eq!(frame.black.get_pixel(0, 1)[0], 255);
        assert_eq!(frame.black.get_pixel(7, 11)[0], 0);
        // Pasting replaces pixels, white included
        assert_eq!(frame.ink_count(Layer::Red), 0);
    }

    #[test]
    fn test_draw_logo_missing_asset() {
        let assets = AssetSettings {
            logo_top: PathBuf::from("/nonexistent/top.bmp"),
            ..AssetSettings::default()
        };
        let renderer = FrameRenderer::new(chart(50), assets);
        let mut frame = Frame::blank(250, 122);
        assert!(renderer.draw_logo(&mut frame).is_err());
    }
}
