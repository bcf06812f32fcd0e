// Two-layer e-paper frame model
use image::{GrayImage, Luma};

pub const WHITE: Luma<u8> = Luma([255]);
pub const INK: Luma<u8> = Luma([0]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Black,
    Red,
}

/// A monochrome canvas, fully white.
pub fn new_blank_canvas(width: u32, height: u32) -> GrayImage {
    GrayImage::from_pixel(width, height, WHITE)
}

/// Black and red ink layers of one display frame. Both layers share a size.
#[derive(Debug, Clone)]
pub struct Frame {
    pub black: GrayImage,
    pub red: GrayImage,
}

impl Frame {
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            black: new_blank_canvas(width, height),
            red: new_blank_canvas(width, height),
        }
    }

    pub fn width(&self) -> u32 {
        self.black.width()
    }

    pub fn height(&self) -> u32 {
        self.black.height()
    }

    pub fn layer_mut(&mut self, layer: Layer) -> &mut GrayImage {
        match layer {
            Layer::Black => &mut self.black,
            Layer::Red => &mut self.red,
        }
    }

    /// Number of inked pixels on a layer
    pub fn ink_count(&self, layer: Layer) -> usize {
        let image = match layer {
            Layer::Black => &self.black,
            Layer::Red => &self.red,
        };
        image.pixels().filter(|p| p[0] < 128).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_frame_is_white() {
        let frame = Frame::blank(250, 122);
        assert_eq!((frame.width(), frame.height()), (250, 122));
        assert_eq!(frame.red.dimensions(), (250, 122));
        assert_eq!(frame.ink_count(Layer::Black), 0);
        assert_eq!(frame.ink_count(Layer::Red), 0);
    }

    #[test]
    fn test_layer_mut_targets_the_right_layer() {
        let mut frame = Frame::blank(4, 4);
        frame.layer_mut(Layer::Red).put_pixel(1, 1, INK);
        assert_eq!(frame.ink_count(Layer::Red), 1);
        assert_eq!(frame.ink_count(Layer::Black), 0);
    }
}
