//! Alpha mask construction.
//!
//! Converts a decoded raster into a binary foreground/background grid.
//! The grid is stored flat, row-major, y-down (row 0 is the top of the
//! image), matching the pixel layout of the source.

use image::{GenericImageView, GrayImage, Luma, Pixel};

/// Binary foreground grid for contour tracing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlphaMask {
    data: Vec<bool>,
    width: i32,
    height: i32,
}

impl AlphaMask {
    /// Create a mask from explicit cells (row-major, `width * height` long).
    pub fn from_cells(width: u32, height: u32, data: Vec<bool>) -> Self {
        debug_assert_eq!(data.len(), (width * height) as usize);
        AlphaMask {
            data,
            width: width as i32,
            height: height as i32,
        }
    }

    pub fn width(&self) -> u32 {
        self.width as u32
    }

    pub fn height(&self) -> u32 {
        self.height as u32
    }

    /// Get the cell at (x, y). Out-of-bounds = false.
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return false;
        }
        self.data[(y * self.width + x) as usize]
    }

    /// Number of foreground cells.
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&set| set).count()
    }

    pub fn is_empty(&self) -> bool {
        !self.data.iter().any(|&set| set)
    }

    /// First foreground cell in row-major order (top row first).
    pub fn first_foreground(&self) -> Option<(i32, i32)> {
        let idx = self.data.iter().position(|&set| set)?;
        let idx = idx as i32;
        Some((idx % self.width, idx / self.width))
    }

    /// Foreground = 255, background = 0. Used for debug dumps.
    pub fn to_gray(&self) -> GrayImage {
        GrayImage::from_fn(self.width(), self.height(), |x, y| {
            Luma([if self.get(x as i32, y as i32) { 255 } else { 0 }])
        })
    }
}

/// Threshold an image's alpha channel into a mask.
///
/// A cell is foreground iff the pixel's alpha is strictly greater than
/// `threshold`. Pixel types without an alpha channel read as opaque.
pub fn build_mask<I>(image: &I, threshold: u8) -> AlphaMask
where
    I: GenericImageView,
    I::Pixel: Pixel<Subpixel = u8>,
{
    let (w, h) = image.dimensions();
    let mut data = vec![false; (w as usize) * (h as usize)];
    for (x, y, pixel) in image.pixels() {
        let alpha = pixel.to_rgba().0[3];
        data[(y as usize) * (w as usize) + x as usize] = alpha > threshold;
    }

    let mask = AlphaMask::from_cells(w, h, data);

    // Debug: save the thresholded mask
    if std::env::var("STICKERCUT_DEBUG_MASK").is_ok() {
        match mask.to_gray().save("debug_mask.png") {
            Ok(()) => tracing::debug!("saved debug_mask.png"),
            Err(e) => tracing::warn!("could not save debug_mask.png: {e}"),
        }
    }

    mask
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Rgba, RgbaImage};

    #[test]
    fn threshold_is_strict() {
        let mut img = RgbaImage::new(3, 1);
        img.put_pixel(0, 0, Rgba([0, 0, 0, 9]));
        img.put_pixel(1, 0, Rgba([0, 0, 0, 10]));
        img.put_pixel(2, 0, Rgba([0, 0, 0, 11]));

        let mask = build_mask(&img, 10);
        assert!(!mask.get(0, 0));
        assert!(!mask.get(1, 0));
        assert!(mask.get(2, 0));
        assert_eq!(mask.count(), 1);
    }

    #[test]
    fn color_channels_are_ignored() {
        // Opaque black and transparent white: only alpha matters.
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([255, 255, 255, 0]));

        let mask = build_mask(&img, 10);
        assert!(mask.get(0, 0));
        assert!(!mask.get(1, 0));
    }

    #[test]
    fn transparent_image_gives_empty_mask() {
        let img = RgbaImage::new(50, 50);
        let mask = build_mask(&img, 10);
        assert!(mask.is_empty());
        assert_eq!(mask.first_foreground(), None);
    }

    #[test]
    fn images_without_alpha_are_opaque() {
        let img = GrayImage::new(4, 4);
        let mask = build_mask(&img, 254);
        assert_eq!(mask.count(), 16);
    }

    #[test]
    fn first_foreground_is_row_major() {
        let mut img = RgbaImage::new(5, 5);
        img.put_pixel(1, 3, Rgba([0, 0, 0, 255]));
        img.put_pixel(4, 2, Rgba([0, 0, 0, 255]));

        let mask = build_mask(&img, 10);
        assert_eq!(mask.first_foreground(), Some((4, 2)));
    }

    #[test]
    fn out_of_bounds_reads_are_background() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        let mask = build_mask(&img, 10);
        assert!(!mask.get(-1, 0));
        assert!(!mask.get(0, 2));
        assert!(mask.get(1, 1));
    }
}
