//! Display colors derived from particle speed.
//!
//! Colors are cosmetic. They are recomputed from velocity after every step
//! and are never read back by the physics.

use cgmath::{InnerSpace, Vector2, Vector3};

/// Phase offset between the channels of [`ColorMode::Rainbow`], 120 degrees.
const RAINBOW_PHASE: f64 = 2.0944;
/// Angular frequency of [`ColorMode::Rainbow`] per unit of speed.
const RAINBOW_FREQ: f64 = 0.016;
/// Channel change per unit of speed in [`ColorMode::Linear`], out of 255.
const LINEAR_GAIN: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Blue at rest, shifting to red as speed grows. Saturates at speed 25.5.
    #[default]
    Linear,
    /// Three phase shifted sine waves, cycling with speed.
    Rainbow,
    /// Speed in degrees used as hue, full saturation and value.
    Hue,
}

impl ColorMode {
    pub fn color_for(self, velocity: Vector2<f64>) -> Vector3<f32> {
        let speed = velocity.magnitude();
        match self {
            ColorMode::Linear => linear(speed),
            ColorMode::Rainbow => rainbow(speed),
            ColorMode::Hue => hsv_to_rgb(speed, 1.0, 1.0),
        }
    }
}

fn linear(speed: f64) -> Vector3<f32> {
    let red = (speed * LINEAR_GAIN).clamp(0.0, 255.0);
    let blue = (255.0 - speed * LINEAR_GAIN).clamp(0.0, 255.0);
    Vector3::new((red / 255.0) as f32, 0.0, (blue / 255.0) as f32)
}

fn rainbow(speed: f64) -> Vector3<f32> {
    let phase = RAINBOW_FREQ * speed;
    let channel = |offset: f64| (phase + offset).sin().max(0.0) as f32;
    Vector3::new(channel(0.0), channel(-RAINBOW_PHASE), channel(RAINBOW_PHASE))
}

/// Hue in degrees (wrapped into [0, 360)), saturation and value in [0, 1].
pub fn hsv_to_rgb(hue: f64, saturation: f64, value: f64) -> Vector3<f32> {
    let hue = hue.rem_euclid(360.0);
    let chroma = value * saturation;
    let sector = hue / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = value - chroma;
    Vector3::new((r + m) as f32, (g + m) as f32, (b + m) as f32)
}
