//! Chip synthesis: small bordered rectangles carrying a short text label and
//! an optional proportional fill.

use crate::font::Font;
use crate::imaging::{check_size, pixmap_to_rgba};
use crate::text::{draw_text, ink_bounds};
use crate::{MediaError, Result};
use colonist_core::Rgb;
use image::RgbaImage;
use tiny_skia::{Paint, Pixmap, Rect, Transform};

/// Padding around chip text at scale 1.
pub const DEFAULT_PADDING: f32 = 6.0;

/// A proportion of the chip interior painted from the top down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChipFill {
    /// Fraction of the interior height; drawn only when in `(0, 1]`
    pub amount: f64,
    pub color: Rgb,
}

impl ChipFill {
    fn height(&self, interior: u32) -> Option<u32> {
        if self.amount > 0.0 && self.amount <= 1.0 {
            Some((f64::from(interior) * self.amount).floor() as u32)
        } else {
            None
        }
    }
}

/// Colors of a chip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChipStyle {
    pub border: Rgb,
    pub background: Rgb,
    pub foreground: Rgb,
    pub fill: Option<ChipFill>,
}

impl ChipStyle {
    /// Black-bordered chip with a contrasting foreground.
    pub fn on(background: Rgb) -> Self {
        Self {
            border: Rgb::BLACK,
            background,
            foreground: Rgb::foreground_for(Some(background)),
            fill: None,
        }
    }

    /// `(amount, color)` as embedded in chip keys.
    pub fn fill_key(&self) -> Option<(f64, Rgb)> {
        self.fill.map(|f| (f.amount, f.color))
    }
}

/// Render a chip around `text`.
///
/// The chip is as wide as the inked pixels of the text plus padding and
/// `ascent + descent + padding` tall, where padding is
/// `DEFAULT_PADDING * scale`. The leftmost inked column sits half the padding
/// from the left edge, the glyph cells half the padding from the top.
pub fn render_chip(text: &str, style: &ChipStyle, font: &dyn Font, padding: f32) -> Result<RgbaImage> {
    let padding = padding.max(0.0);
    let (ink_left, ink_width) = ink_bounds(font, text).unwrap_or((0, 0));
    let line = font.ascent().saturating_add(font.descent());
    let (width, height) = check_size(
        ((ink_width as f32 + padding) as u32).max(2),
        ((line as f32 + padding) as u32).max(2),
    )?;

    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| MediaError::Synthesis(format!("cannot allocate {width}x{height} chip")))?;

    fill(&mut pixmap, 0, 0, width, height, style.border)?;
    fill(&mut pixmap, 1, 1, width - 2, height - 2, style.background)?;
    if let Some(fill_style) = style.fill {
        if let Some(fill_height) = fill_style.height(height - 2).filter(|h| *h > 0) {
            fill(&mut pixmap, 1, 1, width - 2, fill_height, fill_style.color)?;
        }
    }

    let mut image = pixmap_to_rgba(&pixmap);
    let inset = (padding / 2.0) as i64;
    draw_text(&mut image, font, text, inset - ink_left, inset, style.foreground);
    Ok(image)
}

fn fill(pixmap: &mut Pixmap, x: u32, y: u32, width: u32, height: u32, color: Rgb) -> Result<()> {
    if width == 0 || height == 0 {
        return Ok(());
    }
    let rect = Rect::from_xywh(x as f32, y as f32, width as f32, height as f32)
        .ok_or_else(|| MediaError::Synthesis(format!("bad chip rect {x},{y} {width}x{height}")))?;
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, 255);
    paint.anti_alias = false;
    pixmap.fill_rect(rect, &paint, Transform::identity(), None);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::BitmapFont;

    const RED: Rgb = Rgb::new(200, 30, 30);
    const BLUE: Rgb = Rgb::new(0, 0, 200);

    fn rgb_at(image: &RgbaImage, x: u32, y: u32) -> Rgb {
        let [r, g, b, _] = image.get_pixel(x, y).0;
        Rgb::new(r, g, b)
    }

    #[test]
    fn test_chip_layout_and_border() {
        let font = BitmapFont::new(1).bold();
        let chip = render_chip("3", &ChipStyle::on(RED), &font, DEFAULT_PADDING).unwrap();
        assert_eq!(chip.dimensions(), (6 + 6, 9 + 6));

        let (w, h) = chip.dimensions();
        for x in 0..w {
            assert_eq!(rgb_at(&chip, x, 0), Rgb::BLACK);
            assert_eq!(rgb_at(&chip, x, h - 1), Rgb::BLACK);
        }
        for y in 0..h {
            assert_eq!(rgb_at(&chip, 0, y), Rgb::BLACK);
            assert_eq!(rgb_at(&chip, w - 1, y), Rgb::BLACK);
        }
        assert_eq!(rgb_at(&chip, 1, 1), RED);
        assert_eq!(rgb_at(&chip, w - 2, h - 2), RED);
        // The label is drawn in the contrasting foreground.
        assert!(chip.pixels().any(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn test_fill_is_top_anchored() {
        let font = BitmapFont::new(1).bold();
        let mut style = ChipStyle::on(RED);
        style.fill = Some(ChipFill {
            amount: 0.5,
            color: BLUE,
        });
        let chip = render_chip("3", &style, &font, DEFAULT_PADDING).unwrap();
        let (_, h) = chip.dimensions();
        let fill_height = (h - 2) / 2;
        assert_eq!(rgb_at(&chip, 1, 1), BLUE);
        assert_eq!(rgb_at(&chip, 1, fill_height), BLUE);
        assert_eq!(rgb_at(&chip, 1, fill_height + 1), RED);
    }

    #[test]
    fn test_out_of_range_fill_is_ignored() {
        let font = BitmapFont::new(1);
        for amount in [0.0, -0.5, 1.5] {
            let mut style = ChipStyle::on(RED);
            style.fill = Some(ChipFill { amount, color: BLUE });
            let chip = render_chip("x", &style, &font, DEFAULT_PADDING).unwrap();
            assert_eq!(rgb_at(&chip, 1, 1), RED);
        }
    }

    #[test]
    fn test_width_follows_inked_columns() {
        let font = BitmapFont::new(1);
        let style = ChipStyle::on(RED);
        // '1' covers three columns starting one in from its cell.
        let chip = render_chip("1", &style, &font, DEFAULT_PADDING).unwrap();
        assert_eq!(chip.dimensions(), (3 + 6, 15));
        let lit: Vec<u32> = (0..chip.width())
            .filter(|x| (0..chip.height()).any(|y| rgb_at(&chip, *x, y) == Rgb::WHITE))
            .collect();
        assert_eq!(lit, [3, 4, 5]);
        // Trailing spaces add no width.
        let spaced = render_chip("1  ", &style, &font, DEFAULT_PADDING).unwrap();
        assert_eq!(spaced.dimensions(), chip.dimensions());
    }

    #[test]
    fn test_oversized_chip_is_an_error() {
        let font = BitmapFont::new(1);
        let result = render_chip("3", &ChipStyle::on(RED), &font, 1e9);
        assert!(matches!(result, Err(MediaError::Synthesis(_))));
    }

    #[test]
    fn test_empty_text_still_renders() {
        let font = BitmapFont::new(1);
        let chip = render_chip("", &ChipStyle::on(Rgb::WHITE), &font, DEFAULT_PADDING).unwrap();
        assert_eq!(chip.dimensions(), (6, 15));
    }
}
