//! Frames and colors shared by the panels.

use colonist_core::Rgb;
use egui::{Color32, CornerRadius, Frame, Margin, Shadow, Stroke};

/// Shared color constants of the parchment palette
#[allow(missing_docs)]
pub mod colors {
    use egui::Color32;

    pub const BORDER: Color32 = Color32::BLACK;
    pub const PARCHMENT: Color32 = Color32::from_rgb(231, 218, 180); // Panel background
    pub const SELECTION: Color32 = Color32::from_rgb(196, 160, 64); // Selected unit outline
}

/// Undecorated dialog frame: 1px black line, 10px above and below, 20px at the sides.
pub fn dialog_frame(_style: &egui::Style) -> Frame {
    Frame {
        inner_margin: Margin::symmetric(20, 10),
        outer_margin: Margin::ZERO,
        corner_radius: CornerRadius::same(0),
        shadow: Shadow::NONE,
        fill: colors::PARCHMENT,
        stroke: Stroke::new(1.0, colors::BORDER),
    }
}

/// Frame for report panels such as the settlement panel.
pub fn panel_frame(style: &egui::Style) -> Frame {
    Frame {
        inner_margin: Margin::same(8),
        corner_radius: CornerRadius::same(2),
        shadow: style.visuals.window_shadow,
        ..dialog_frame(style)
    }
}

/// Convert a game color for painting.
pub fn to_color32(color: Rgb) -> Color32 {
    Color32::from_rgb(color.r, color.g, color.b)
}
