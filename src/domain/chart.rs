// Bar chart scaling and rasterisation
use super::frame::INK;
use image::GrayImage;

/// Where bars land on a layer. `baseline` is the first row below the bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartGeometry {
    pub left: u32,
    pub baseline: u32,
    pub pitch: u32,
    pub bar_width: u32,
}

impl ChartGeometry {
    /// How many bars fit between `left` and the right edge of the canvas
    pub fn capacity(&self, canvas_width: u32) -> usize {
        if self.pitch == 0 {
            return 0;
        }
        (canvas_width.saturating_sub(self.left) / self.pitch) as usize
    }
}

/// Pixels per unit so the tallest total fills `chart_height`.
///
/// `None` means there is nothing to draw: the series is empty or all zero.
pub fn scale_factor(totals: &[u64], chart_height: u32) -> Option<f64> {
    match totals.iter().max() {
        Some(&max) if max > 0 => Some(chart_height as f64 / max as f64),
        _ => None,
    }
}

pub fn bar_heights(series: &[u64], factor: f64) -> Vec<u32> {
    series
        .iter()
        .map(|&v| (v as f64 * factor).round().max(0.0) as u32)
        .collect()
}

/// Ink one bar per height, left to right, anchored on the baseline.
/// Bars are clipped to the layer.
pub fn draw_bars(layer: &mut GrayImage, heights: &[u32], geometry: &ChartGeometry) {
    let (width, height) = layer.dimensions();
    let baseline = geometry.baseline.min(height);

    for (i, &bar) in heights.iter().enumerate() {
        let x0 = geometry.left as u64 + i as u64 * geometry.pitch as u64;
        if x0 >= width as u64 {
            break;
        }
        let x0 = x0 as u32;
        let x1 = x0.saturating_add(geometry.bar_width).min(width);
        let top = baseline.saturating_sub(bar);

        for x in x0..x1 {
            for y in top..baseline {
                layer.put_pixel(x, y, INK);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::frame::new_blank_canvas;

    fn geometry() -> ChartGeometry {
        ChartGeometry {
            left: 4,
            baseline: 100,
            pitch: 3,
            bar_width: 1,
        }
    }

    fn column_height(layer: &GrayImage, x: u32) -> u32 {
        (0..layer.height())
            .filter(|&y| layer.get_pixel(x, y)[0] < 128)
            .count() as u32
    }

    #[test]
    fn test_scale_factor_fills_chart_height() {
        let factor = scale_factor(&[10, 20, 30], 30).unwrap();
        assert_eq!(factor, 1.0);
        assert_eq!(bar_heights(&[10, 20, 30], factor), vec![10, 20, 30]);

        let factor = scale_factor(&[100, 10], 50).unwrap();
        assert_eq!(factor, 0.5);
        assert_eq!(bar_heights(&[40], factor), vec![20]);
    }

    #[test]
    fn test_scale_factor_degenerate_series() {
        assert_eq!(scale_factor(&[], 50), None);
        assert_eq!(scale_factor(&[0, 0, 0], 50), None);
    }

    #[test]
    fn test_draw_bars_places_columns_on_pitch() {
        let mut layer = new_blank_canvas(250, 122);
        draw_bars(&mut layer, &[10, 0, 5], &geometry());

        assert_eq!(column_height(&layer, 4), 10);
        assert_eq!(column_height(&layer, 5), 0);
        assert_eq!(column_height(&layer, 7), 0);
        assert_eq!(column_height(&layer, 10), 5);
        // Bars sit directly on the baseline
        assert!(layer.get_pixel(4, 99)[0] < 128);
        assert!(layer.get_pixel(4, 100)[0] > 128);
        assert!(layer.get_pixel(4, 90)[0] < 128);
        assert!(layer.get_pixel(4, 89)[0] > 128);
    }

    #[test]
    fn test_draw_bars_clips_to_canvas() {
        let mut layer = new_blank_canvas(12, 20);
        draw_bars(&mut layer, &[500, 500, 500, 500, 500], &geometry());

        // Only x = 4, 7, 10 fit, and each is cut off at the top edge
        assert_eq!(column_height(&layer, 4), 20);
        assert_eq!(column_height(&layer, 10), 20);
        assert_eq!(layer.pixels().filter(|p| p[0] < 128).count(), 60);
    }

    #[test]
    fn test_capacity() {
        assert_eq!(geometry().capacity(250), 82);
        assert_eq!(geometry().capacity(2), 0);
    }
}
