use anyhow::Result;
use image::{DynamicImage, RgbImage, RgbaImage};

use super::resize::{resize_rgb, resize_rgba};

/// Decoded pixels in one of the two layouts the WebP encoder accepts
#[derive(Debug, Clone)]
pub enum PixelGrid {
    Rgb(RgbImage),
    Rgba(RgbaImage),
}

impl PixelGrid {
    /// Keep alpha when the source carries it, otherwise flatten to plain RGB
    ///
    /// Palette, grayscale and 16-bit sources all land in one of the two 8-bit layouts.
    pub fn from_dynamic(img: DynamicImage) -> Self {
        if img.color().has_alpha() {
            PixelGrid::Rgba(img.into_rgba8())
        } else {
            PixelGrid::Rgb(img.into_rgb8())
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            PixelGrid::Rgb(img) => img.dimensions(),
            PixelGrid::Rgba(img) => img.dimensions(),
        }
    }

    pub fn has_alpha(&self) -> bool {
        matches!(self, PixelGrid::Rgba(_))
    }

    pub fn resize(self, width: u32, height: u32) -> Result<Self> {
        Ok(match self {
            PixelGrid::Rgb(img) => PixelGrid::Rgb(resize_rgb(&img, width, height)?),
            PixelGrid::Rgba(img) => PixelGrid::Rgba(resize_rgba(&img, width, height)?),
        })
    }

    /// Lossy WebP at `quality` (1-100)
    pub fn encode_webp(&self, quality: u8) -> Result<Vec<u8>> {
        let mut config = ::webp::WebPConfig::new()
            .map_err(|_| anyhow::anyhow!("Failed to initialize WebP encoder config"))?;
        config.lossless = 0;
        config.quality = quality.clamp(1, 100) as f32;

        let (width, height) = self.dimensions();
        let encoder = match self {
            PixelGrid::Rgb(img) => ::webp::Encoder::from_rgb(img.as_raw(), width, height),
            PixelGrid::Rgba(img) => ::webp::Encoder::from_rgba(img.as_raw(), width, height),
        };

        let memory = encoder
            .encode_advanced(&config)
            .map_err(|e| anyhow::anyhow!("WebP encoding failed: {:?}", e))?;
        Ok(memory.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, ImageBuffer, Luma, Rgb, Rgba};

    #[test]
    fn test_grayscale_is_forced_to_rgb() {
        let gray: GrayImage = ImageBuffer::from_fn(8, 4, |x, _| Luma([(x * 30) as u8]));
        let grid = PixelGrid::from_dynamic(DynamicImage::ImageLuma8(gray));
        assert!(!grid.has_alpha());
        assert_eq!(grid.dimensions(), (8, 4));
    }

    #[test]
    fn test_alpha_sources_keep_alpha() {
        let rgba: RgbaImage = ImageBuffer::from_pixel(4, 4, Rgba([10, 20, 30, 128]));
        assert!(PixelGrid::from_dynamic(DynamicImage::ImageRgba8(rgba)).has_alpha());

        let la = DynamicImage::ImageLumaA8(ImageBuffer::from_pixel(4, 4, image::LumaA([50, 0])));
        assert!(PixelGrid::from_dynamic(la).has_alpha());
    }

    #[test]
    fn test_encode_produces_decodable_webp() {
        let rgb: RgbImage = ImageBuffer::from_fn(32, 16, |x, y| Rgb([x as u8 * 8, y as u8 * 16, 90]));
        let bytes = PixelGrid::Rgb(rgb).encode_webp(80).unwrap();
        assert_eq!(&bytes[0..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WEBP");

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (32, 16));
    }

    #[test]
    fn test_encode_rgba_keeps_alpha_in_output() {
        let rgba: RgbaImage = ImageBuffer::from_pixel(16, 16, Rgba([200, 10, 10, 0]));
        let bytes = PixelGrid::Rgba(rgba).encode_webp(80).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert!(decoded.color().has_alpha());
    }

    #[test]
    fn test_resize_preserves_layout() {
        let rgba: RgbaImage = ImageBuffer::from_pixel(40, 20, Rgba([1, 2, 3, 4]));
        let grid = PixelGrid::Rgba(rgba).resize(20, 10).unwrap();
        assert!(grid.has_alpha());
        assert_eq!(grid.dimensions(), (20, 10));
    }
}
