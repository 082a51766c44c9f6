//! Text measurement and drawing onto RGBA canvases.

use crate::font::Font;
use colonist_core::Rgb;
use image::{Rgba, RgbaImage};

/// Total advance of `text`.
pub fn text_width(font: &dyn Font, text: &str) -> u32 {
    text.chars()
        .fold(0u32, |width, ch| width.saturating_add(font.advance(ch)))
}

/// Horizontal extent of the pixels `text` actually covers when laid out
/// from x = 0, as `(left, width)`. Blank text covers nothing.
pub fn ink_bounds(font: &dyn Font, text: &str) -> Option<(i64, u32)> {
    let mut extent: Option<(i64, i64)> = None;
    for_each_pixel(font, text, 0, 0, &mut |x, _| {
        extent = Some(match extent {
            Some((left, right)) => (left.min(x), right.max(x)),
            None => (x, x),
        });
    });
    extent.map(|(left, right)| (left, u32::try_from(right - left + 1).unwrap_or(u32::MAX)))
}

/// Height of a line of text.
pub fn line_height(font: &dyn Font) -> u32 {
    font.ascent() + font.descent()
}

/// Call `plot` for every covered pixel of `text`, laid out left to right
/// from `(x, top)`. `top` is the row `ascent` pixels above the baseline.
pub fn for_each_pixel(
    font: &dyn Font,
    text: &str,
    x: i64,
    top: i64,
    plot: &mut dyn FnMut(i64, i64),
) {
    let mut pen = x;
    for ch in text.chars() {
        font.rasterize(ch, &mut |gx, gy| plot(pen + i64::from(gx), top + i64::from(gy)));
        pen += i64::from(font.advance(ch));
    }
}

/// Draw `text` opaquely in `color`; pixels outside the canvas are clipped.
pub fn draw_text(canvas: &mut RgbaImage, font: &dyn Font, text: &str, x: i64, top: i64, color: Rgb) {
    let (width, height) = canvas.dimensions();
    let pixel = Rgba(color.to_rgba());
    for_each_pixel(font, text, x, top, &mut |px, py| {
        if let (Ok(px), Ok(py)) = (u32::try_from(px), u32::try_from(py)) {
            if px < width && py < height {
                canvas.put_pixel(px, py, pixel);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::BitmapFont;

    #[test]
    fn test_text_width() {
        let font = BitmapFont::new(1);
        assert_eq!(text_width(&font, ""), 0);
        assert_eq!(text_width(&font, "abc"), 18);
        assert_eq!(line_height(&font), 9);
    }

    #[test]
    fn test_ink_bounds_drop_trailing_spacing() {
        let font = BitmapFont::new(1);
        assert_eq!(ink_bounds(&font, "H"), Some((0, 5)));
        assert_eq!(ink_bounds(&font, "HH"), Some((0, 11)));
        // '1' starts one column in.
        assert_eq!(ink_bounds(&font, "1"), Some((1, 3)));
        assert_eq!(ink_bounds(&font, ""), None);
        assert_eq!(ink_bounds(&font, "  "), None);
        assert_eq!(ink_bounds(&BitmapFont::new(2).bold(), "3"), Some((0, 12)));
    }

    #[test]
    fn test_draw_text_clips() {
        let font = BitmapFont::new(1);
        let mut canvas = RgbaImage::new(4, 4);
        draw_text(&mut canvas, &font, "HH", -2, -2, Rgb::WHITE);
        // 'H' has its right column lit on row 2, which lands at (2, 0).
        assert_eq!(canvas.get_pixel(2, 0).0, [255, 255, 255, 255]);
        assert_eq!(canvas.get_pixel(0, 0).0, [0, 0, 0, 0]);
    }
}
