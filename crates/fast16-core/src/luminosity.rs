//! Perceptual luminosity of an 8-bit RGB pixel.
//!
//! Each channel is normalized to [0, 1], passed through the sRGB-to-linear
//! transfer curve, and weighted with (0.21, 0.72, 0.07). Note these are not
//! the Rec.709 weights; detection results depend on the exact values.

const WEIGHT_R: f64 = 0.21;
const WEIGHT_G: f64 = 0.72;
const WEIGHT_B: f64 = 0.07;

/// sRGB-to-linear transfer function for one 8-bit channel.
#[inline]
pub fn linearize(c: u8) -> f64 {
    let s = f64::from(c) / 255.0;
    if s <= 0.04045 {
        s / 12.92
    } else {
        ((s + 0.055) / 1.055).powf(2.4)
    }
}

/// Luminosity in [0, 1] of an RGB triple.
#[inline]
pub fn luminosity(r: u8, g: u8, b: u8) -> f64 {
    WEIGHT_R * linearize(r) + WEIGHT_G * linearize(g) + WEIGHT_B * linearize(b)
}

#[inline]
pub fn luminosity_rgb(rgb: [u8; 3]) -> f64 {
    luminosity(rgb[0], rgb[1], rgb[2])
}

/// Precomputed `linearize` for all 256 channel values.
///
/// Produces exactly the same values as [`luminosity`] without a `powf` per
/// sample, which matters in the scan loop where every center reads 17 pixels.
#[derive(Clone, Debug)]
pub struct LumaTable {
    linear: [f64; 256],
}

impl Default for LumaTable {
    fn default() -> Self {
        Self::new()
    }
}

impl LumaTable {
    pub fn new() -> Self {
        let mut linear = [0.0f64; 256];
        for (c, v) in linear.iter_mut().enumerate() {
            *v = linearize(c as u8);
        }
        Self { linear }
    }

    #[inline]
    pub fn luminosity(&self, rgb: [u8; 3]) -> f64 {
        WEIGHT_R * self.linear[rgb[0] as usize]
            + WEIGHT_G * self.linear[rgb[1] as usize]
            + WEIGHT_B * self.linear[rgb[2] as usize]
    }
}
