use crate::foundation::error::{ClashError, ClashResult};

/// Absolute 0-based frame index in video timeline space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> ClashResult<Self> {
        if den == 0 {
            return Err(ClashError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(ClashError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Convert frame count to seconds.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * f64::from(self.den) / f64::from(self.num)
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Number of bytes in a tightly packed RGBA8 buffer of this size.
    pub fn rgba8_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }
}

/// Opaque 8-bit sRGB color.
///
/// Deserializes from `"#rrggbb"`, `[r, g, b]` or `{ "r": .., "g": .., "b": .. }`; always
/// serializes as `[r, g, b]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Black.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Build a color from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels as an opaque RGBA8 array.
    pub fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }

    fn parse_hex(s: &str) -> Result<Self, String> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(format!("invalid hex color '{s}' (expected #rrggbb)"));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| format!("invalid hex color '{s}' (expected #rrggbb)"))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl serde::Serialize for Rgb8 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        [self.r, self.g, self.b].serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Rgb8 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Obj { r: u8, g: u8, b: u8 },
            Arr(Vec<u8>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => Self::parse_hex(&s).map_err(serde::de::Error::custom),
            Repr::Obj { r, g, b } => Ok(Self::new(r, g, b)),
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] => Ok(Self::new(*r, *g, *b)),
                _ => Err(serde::de::Error::custom(
                    "rgb array must have len 3 ([r,g,b])",
                )),
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
