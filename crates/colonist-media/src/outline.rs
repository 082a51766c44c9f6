//! Outlined strings: text with a one pixel contrasting halo so it stays
//! legible on any map background.

use crate::font::Font;
use crate::imaging::check_size;
use crate::text::{for_each_pixel, line_height, text_width};
use crate::Result;
use colonist_core::Rgb;
use image::{Rgba, RgbaImage};

/// Horizontal room reserved for the outline, split evenly left and right.
const OUTLINE_MARGIN: u32 = 4;

/// Render `text` in `color` with a one pixel outline in `color.string_border()`.
///
/// The image is `text_width + 4` wide and `ascent + descent` tall; everything
/// outside glyphs and their outline is transparent.
pub fn render_outlined(text: &str, color: Rgb, font: &dyn Font) -> Result<RgbaImage> {
    let (width, height) = check_size(
        text_width(font, text).saturating_add(OUTLINE_MARGIN),
        line_height(font).max(1),
    )?;

    let mut mask = vec![false; (width * height) as usize];
    let index = |x: i64, y: i64| -> Option<usize> {
        let (x, y) = (u32::try_from(x).ok()?, u32::try_from(y).ok()?);
        (x < width && y < height).then(|| (y * width + x) as usize)
    };
    for_each_pixel(font, text, i64::from(OUTLINE_MARGIN / 2), 0, &mut |x, y| {
        if let Some(i) = index(x, y) {
            mask[i] = true;
        }
    });

    let mut image = RgbaImage::new(width, height);
    let border = Rgba(color.string_border().to_rgba());
    let fill = Rgba(color.to_rgba());
    for y in 0..i64::from(height) {
        for x in 0..i64::from(width) {
            let lit = |dx: i64, dy: i64| index(x + dx, y + dy).is_some_and(|i| mask[i]);
            let (px, py) = (x as u32, y as u32);
            if lit(0, 0) {
                image.put_pixel(px, py, fill);
            } else if lit(-1, 0) || lit(1, 0) || lit(0, -1) || lit(0, 1) {
                image.put_pixel(px, py, border);
            }
        }
    }
    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::BitmapFont;

    #[test]
    fn test_outlined_dimensions_and_colors() {
        let font = BitmapFont::new(1);
        let yellow = Rgb::new(255, 255, 0);
        let image = render_outlined("Hi", yellow, &font).unwrap();
        assert_eq!(image.dimensions(), (12 + 4, 9));

        assert_eq!(image.get_pixel(0, 0).0[3], 0);
        // Left stem of 'H' starts at x = 2, so x = 1 is its outline.
        assert_eq!(image.get_pixel(2, 0).0, [255, 255, 0, 255]);
        assert_eq!(image.get_pixel(1, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_dark_text_gets_white_outline() {
        let font = BitmapFont::new(1);
        let image = render_outlined("I", Rgb::BLACK, &font).unwrap();
        assert!(image.pixels().any(|p| p.0 == [255, 255, 255, 255]));
        assert!(image.pixels().any(|p| p.0 == [0, 0, 0, 255]));
    }
}
