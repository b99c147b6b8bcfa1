use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Color schemes for the color channel
// ---------------------------------------------------------------------------

/// Continuous color ramps available to chart encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    /// Light to dark blue.
    Blues,
}

impl ColorScheme {
    /// Colour at position `t` in `[0, 1]` along the ramp.
    pub fn sample(self, t: f32) -> Color32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let hsl = match self {
            ColorScheme::Blues => Hsl::new(215.0, 0.7, 0.85 - 0.55 * t),
        };
        to_color32(hsl)
    }
}

fn to_color32(hsl: Hsl) -> Color32 {
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0) as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Value → Color32 over an observed domain
// ---------------------------------------------------------------------------

/// Maps numeric values in `[min, max]` onto a [`ColorScheme`].
#[derive(Debug, Clone, Copy)]
pub struct ColorScale {
    scheme: ColorScheme,
    min: f64,
    max: f64,
}

impl ColorScale {
    pub fn new(scheme: ColorScheme, min: f64, max: f64) -> Self {
        ColorScale { scheme, min, max }
    }

    /// Position of `value` in the domain, `0.0` for a degenerate domain.
    pub fn normalize(&self, value: f64) -> f32 {
        let span = self.max - self.min;
        if span.abs() < f64::EPSILON {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0) as f32
    }

    pub fn color_for(&self, value: f64) -> Color32 {
        self.scheme.sample(self.normalize(value))
    }
}
