pub mod map;
pub mod panels;

use eframe::egui::Color32;
use palette::Srgba;

/// Legend colour as an egui colour.
pub fn to_color32(color: Srgba<u8>) -> Color32 {
    Color32::from_rgba_unmultiplied(color.red, color.green, color.blue, color.alpha)
}
