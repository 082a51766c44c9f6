//! Pixel operations on resolved images.

use crate::{MediaError, Result};
use colonist_core::Rgb;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use tiny_skia::Pixmap;

// ============================================================================
// Sizing
// ============================================================================

/// Largest width or height of any rendered or synthesized image.
pub const MAX_DIMENSION: u32 = 16_384;

/// Reject sizes no image of ours can have.
pub fn check_size(width: u32, height: u32) -> Result<(u32, u32)> {
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(MediaError::Synthesis(format!(
            "image size {width}x{height} exceeds {MAX_DIMENSION}x{MAX_DIMENSION}"
        )));
    }
    Ok((width, height))
}

/// Size of an image of `size` drawn at `scale`, never smaller than 1x1.
pub fn scaled_size((width, height): (u32, u32), scale: f32) -> Result<(u32, u32)> {
    let scale_dim = |d: u32| ((d as f32 * scale).round() as u32).max(1);
    check_size(scale_dim(width), scale_dim(height))
}

/// Resample `image` to exactly `width` x `height`.
pub fn resize_image(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if image.dimensions() == (width, height) {
        return image.clone();
    }
    imageops::resize(image, width.max(1), height.max(1), FilterType::CatmullRom)
}

// ============================================================================
// Color transforms
// ============================================================================

/// Blend every RGB channel towards `target`, leaving alpha untouched:
/// `out = round(in * fade + target * (1 - fade))`, clamped to 0..=255.
pub fn fade_image(image: &RgbaImage, fade: f32, target: f32) -> RgbaImage {
    let offset = target * (1.0 - fade);
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        for channel in &mut pixel.0[..3] {
            let value = (f32::from(*channel) * fade + offset).round();
            *channel = value.clamp(0.0, 255.0) as u8;
        }
    }
    out
}

/// Desaturated copy of `image`, alpha preserved.
pub fn to_grayscale(image: &RgbaImage) -> RgbaImage {
    let mut out = image.clone();
    for pixel in out.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        let luma = (Rgb::new(r, g, b).luminance_centi() + 50) / 100;
        let luma = luma.min(255) as u8;
        *pixel = Rgba([luma, luma, luma, a]);
    }
    out
}

// ============================================================================
// Compositing
// ============================================================================

/// Stack `layers` over each other, each aligned to the bottom edge of a canvas
/// as wide as the first layer and as tall as the tallest one.
pub fn compose_bottom_aligned(layers: &[&RgbaImage]) -> Option<RgbaImage> {
    let width = layers.first()?.width();
    let height = layers.iter().map(|l| l.height()).max()?;
    let mut canvas = RgbaImage::new(width, height);
    for layer in layers {
        let top = height - layer.height();
        for (x, y, src) in layer.enumerate_pixels() {
            if x < width {
                blend_over(canvas.get_pixel_mut(x, top + y), *src);
            }
        }
    }
    Some(canvas)
}

/// Source-over blend of `src` onto `dst` in straight alpha.
pub fn blend_over(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let src_a = u32::from(src.0[3]);
    if src_a == 0 {
        return;
    }
    if src_a == 255 {
        *dst = src;
        return;
    }
    let dst_a = u32::from(dst.0[3]);
    let dst_weight = dst_a * (255 - src_a);
    let out_a = src_a * 255 + dst_weight;
    for i in 0..3 {
        let mixed = u32::from(src.0[i]) * src_a * 255 + u32::from(dst.0[i]) * dst_weight;
        dst.0[i] = ((mixed + out_a / 2) / out_a) as u8;
    }
    dst.0[3] = ((out_a + 127) / 255) as u8;
}

/// Convert a tiny-skia pixmap into straight-alpha RGBA.
pub fn pixmap_to_rgba(pixmap: &Pixmap) -> RgbaImage {
    let mut out = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in out.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    out
}

// ============================================================================
// Tiling
// ============================================================================

/// Space left free around a tiled background.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insets {
    pub top: u32,
    pub left: u32,
    pub bottom: u32,
    pub right: u32,
}

/// Rectangle of a canvas to be covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileArea {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl TileArea {
    /// The whole of a `width` x `height` canvas.
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    fn inset(self, insets: Insets) -> Self {
        Self {
            x: self.x + insets.left,
            y: self.y + insets.top,
            width: self.width.saturating_sub(insets.left + insets.right),
            height: self.height.saturating_sub(insets.top + insets.bottom),
        }
    }
}

/// Repeat `tile` over `area` (shrunk by `insets`), clipped to the area and
/// the canvas. Without a usable tile the area is filled with `fallback`.
pub fn draw_tiled(
    canvas: &mut RgbaImage,
    tile: Option<&RgbaImage>,
    area: TileArea,
    insets: Option<Insets>,
    fallback: Rgb,
) {
    let area = insets.map_or(area, |i| area.inset(i));
    let right = (area.x + area.width).min(canvas.width());
    let bottom = (area.y + area.height).min(canvas.height());

    match tile.filter(|t| t.width() > 0 && t.height() > 0) {
        Some(tile) => {
            for y in area.y..bottom {
                for x in area.x..right {
                    let src = *tile.get_pixel((x - area.x) % tile.width(), (y - area.y) % tile.height());
                    canvas.put_pixel(x, y, src);
                }
            }
        }
        None => {
            let pixel = Rgba(fallback.to_rgba());
            for y in area.y..bottom {
                for x in area.x..right {
                    canvas.put_pixel(x, y, pixel);
                }
            }
        }
    }
}
