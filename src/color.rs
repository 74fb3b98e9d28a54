use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::aggregate::Ranking;

/// Flat colour for bars that are not shaded by value.
pub const BAR_COLOR: Color32 = Color32::from_rgb(99, 110, 250);

// Gradient end-points (hue, lightness): low values dark blue, high values yellow.
const LOW: (f32, f32) = (250.0, 0.35);
const HIGH: (f32, f32) = (55.0, 0.60);

fn hsl_to_color32(hsl: Hsl) -> Color32 {
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Continuous scale: value → Color32
// ---------------------------------------------------------------------------

/// Colour for `value` on a gradient spanning `min..=max`.
pub fn gradient(value: f64, min: f64, max: f64) -> Color32 {
    let range = max - min;
    let t = if range.abs() < f64::EPSILON {
        1.0
    } else {
        ((value - min) / range).clamp(0.0, 1.0) as f32
    };
    let hue = LOW.0 + (HIGH.0 - LOW.0) * t;
    let lightness = LOW.1 + (HIGH.1 - LOW.1) * t;
    hsl_to_color32(Hsl::new(hue, 0.85, lightness))
}

/// One colour per ranking entry, in entry order.
pub fn bar_colors(ranking: &Ranking) -> Vec<Color32> {
    if !ranking.color_by_value {
        return vec![BAR_COLOR; ranking.entries.len()];
    }
    let min = ranking
        .entries
        .iter()
        .map(|(_, v)| *v)
        .fold(f64::INFINITY, f64::min);
    let max = ranking.max_value();
    ranking
        .entries
        .iter()
        .map(|(_, v)| gradient(*v, min, max))
        .collect()
}
