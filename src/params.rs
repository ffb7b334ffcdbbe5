use serde::{Deserialize, Serialize};

/// The fourteen effect sliders driving the filter pipeline
///
/// Each parameter is independently ranged; at its default every gated stage
/// is a pass-through and the color/tone stage is numerically the identity.
/// Values are clamped to their declared ranges at the parameter-source
/// boundary (configuration or CLI) before they ever reach the engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectParameters {
    /// Linear brightness offset [-1, 1]
    pub brightness: f32,

    /// Contrast scale about mid-gray [0.5, 1.5]
    pub contrast: f32,

    /// Saturation scale [0, 2]
    pub saturation: f32,

    /// Warm/cool white-balance shift [-1, 1] (±1000 units on the chroma axis)
    pub temperature: f32,

    /// Green/magenta white-balance shift [-1, 1] (±500 units on the other axis)
    pub tint: f32,

    /// Unseeded film grain [0, 1]
    pub grain: f32,

    /// Radial corner darkening [0, 1]
    pub vignette: f32,

    /// Sepia tone mapping [0, 1]
    pub sepia: f32,

    /// Red/blue channel separation in pixels [0, 10]
    pub chromatic_aberration: f32,

    /// Gaussian blur radius [0, 20]
    pub blur: f32,

    /// Highlight sparkle accent [0, 1]
    pub sparkle: f32,

    /// Monochrome overlay noise [0, 1]
    pub mono_noise: f32,

    /// Seeded RGB dot noise [0, 1]
    pub color_noise: f32,

    /// Dust and scratch specks [0, 1]
    pub dust_noise: f32,
}

impl Default for EffectParameters {
    fn default() -> Self {
        Self {
            brightness: 0.0,
            contrast: 1.0,
            saturation: 1.0,
            temperature: 0.0,
            tint: 0.0,
            grain: 0.0,
            vignette: 0.0,
            sepia: 0.0,
            chromatic_aberration: 0.0,
            blur: 0.0,
            sparkle: 0.0,
            mono_noise: 0.0,
            color_noise: 0.0,
            dust_noise: 0.0,
        }
    }
}

impl EffectParameters {
    /// Declared (min, max) range for every slider, in field order
    pub const RANGES: [(&'static str, f32, f32); 14] = [
        ("brightness", -1.0, 1.0),
        ("contrast", 0.5, 1.5),
        ("saturation", 0.0, 2.0),
        ("temperature", -1.0, 1.0),
        ("tint", -1.0, 1.0),
        ("grain", 0.0, 1.0),
        ("vignette", 0.0, 1.0),
        ("sepia", 0.0, 1.0),
        ("chromatic_aberration", 0.0, 10.0),
        ("blur", 0.0, 20.0),
        ("sparkle", 0.0, 1.0),
        ("mono_noise", 0.0, 1.0),
        ("color_noise", 0.0, 1.0),
        ("dust_noise", 0.0, 1.0),
    ];

    /// Return a copy with every slider clamped to its declared range
    ///
    /// NaN values collapse to the slider's lower bound.
    pub fn clamped(&self) -> Self {
        fn clamp(value: f32, min: f32, max: f32) -> f32 {
            if value.is_nan() {
                min
            } else {
                value.clamp(min, max)
            }
        }

        Self {
            brightness: clamp(self.brightness, -1.0, 1.0),
            contrast: clamp(self.contrast, 0.5, 1.5),
            saturation: clamp(self.saturation, 0.0, 2.0),
            temperature: clamp(self.temperature, -1.0, 1.0),
            tint: clamp(self.tint, -1.0, 1.0),
            grain: clamp(self.grain, 0.0, 1.0),
            vignette: clamp(self.vignette, 0.0, 1.0),
            sepia: clamp(self.sepia, 0.0, 1.0),
            chromatic_aberration: clamp(self.chromatic_aberration, 0.0, 10.0),
            blur: clamp(self.blur, 0.0, 20.0),
            sparkle: clamp(self.sparkle, 0.0, 1.0),
            mono_noise: clamp(self.mono_noise, 0.0, 1.0),
            color_noise: clamp(self.color_noise, 0.0, 1.0),
            dust_noise: clamp(self.dust_noise, 0.0, 1.0),
        }
    }

    /// Whether every slider sits at its identity default
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}
