use serde::{Deserialize, Serialize};

/// Altitude units per full hue turn.
pub const ALTITUDE_HUE_SCALE: f64 = 10.0;

/// Linear RGB, each channel in `[0, 1]`.
#[derive(Copy, Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

/// HSL to RGB.
///
/// `h` is in turns and wraps (euclidean modulo 1), so `1.25` and `-0.75` both
/// mean `0.25`. `s` and `l` are clamped to `[0, 1]`.
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> Rgb {
    let h = h.rem_euclid(1.0);
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        let v = l as f32;
        return Rgb::new(v, v, v);
    }

    let high = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let low = 2.0 * l - high;

    Rgb::new(
        hue_channel(low, high, h + 1.0 / 3.0) as f32,
        hue_channel(low, high, h) as f32,
        hue_channel(low, high, h - 1.0 / 3.0) as f32,
    )
}

fn hue_channel(low: f64, high: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return low + (high - low) * 6.0 * t;
    }
    if t < 0.5 {
        return high;
    }
    if t < 2.0 / 3.0 {
        return low + (high - low) * 6.0 * (2.0 / 3.0 - t);
    }
    low
}

/// Colour for a point at altitude `z`: hue `z / 10`, full saturation, 50% lightness.
///
/// The hue is not clamped: altitudes outside `[0, 10)` cycle
/// through the colour wheel again.
pub fn color_for_altitude(z: f64) -> Rgb {
    hsl_to_rgb(z / ALTITUDE_HUE_SCALE, 1.0, 0.5)
}

/// Interleaved `[r, g, b, r, g, b, ...]` for upload as a vertex attribute.
pub fn flatten_colors(colors: &[Rgb]) -> Vec<f32> {
    let mut out = Vec::with_capacity(colors.len() * 3);
    for c in colors {
        out.extend_from_slice(&c.to_array());
    }
    out
}
