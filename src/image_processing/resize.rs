use anyhow::{Context, Result};
use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::{ImageBuffer, Pixel, RgbImage, RgbaImage};

/// Dimensions after applying an optional maximum width
///
/// Images narrower than (or exactly) `max_width` keep their size. Wider images are scaled down
/// proportionally; the new height is truncated toward zero and never drops below 1.
pub fn scaled_dimensions(width: u32, height: u32, max_width: Option<u32>) -> (u32, u32) {
    match max_width {
        Some(max_width) if width > max_width => {
            let ratio = max_width as f64 / width as f64;
            let new_height = (height as f64 * ratio) as u32;
            (max_width, new_height.max(1))
        }
        _ => (width, height),
    }
}

/// Resize an RGB image to exact dimensions using Lanczos3
pub fn resize_rgb(img: &RgbImage, width: u32, height: u32) -> Result<RgbImage> {
    resize_buffer(img, width, height, PixelType::U8x3)
}

/// Resize an RGBA image to exact dimensions using Lanczos3
///
/// Alpha is premultiplied during the convolution so transparent edges do not bleed color.
pub fn resize_rgba(img: &RgbaImage, width: u32, height: u32) -> Result<RgbaImage> {
    resize_buffer(img, width, height, PixelType::U8x4)
}

fn resize_buffer<P>(
    img: &ImageBuffer<P, Vec<u8>>,
    width: u32,
    height: u32,
    pixel_type: PixelType,
) -> Result<ImageBuffer<P, Vec<u8>>>
where
    P: Pixel<Subpixel = u8>,
{
    let (src_width, src_height) = img.dimensions();

    if src_width == width && src_height == height {
        return Ok(img.clone());
    }
    if src_width == 0 || src_height == 0 {
        return Err(anyhow::anyhow!("Source image has zero size"));
    }
    if width == 0 || height == 0 {
        return Err(anyhow::anyhow!(
            "Target size must be non-zero, got {}x{}",
            width,
            height
        ));
    }

    let src_image = Image::from_vec_u8(src_width, src_height, img.as_raw().clone(), pixel_type)
        .context("Failed to wrap source pixels for resizing")?;
    let mut dst_image = Image::new(width, height, pixel_type);

    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3));
    let mut resizer = Resizer::new();
    resizer
        .resize(&src_image, &mut dst_image, &options)
        .with_context(|| {
            format!(
                "Failed to resize {}x{} to {}x{}",
                src_width, src_height, width, height
            )
        })?;

    ImageBuffer::from_raw(width, height, dst_image.into_vec())
        .ok_or_else(|| anyhow::anyhow!("Resized buffer does not match {}x{}", width, height))
}
