use serde::{Deserialize, Serialize};

use crate::foundation::core::Pixel;

/// Color as written in job files.
///
/// Accepts `"#RRGGBB"` / `"#RRGGBBAA"` strings, `{ "r", "g", "b", "a"? }` objects and `[r, g, b]`
/// / `[r, g, b, a]` arrays, all in 0..=255. Alpha defaults to opaque. Serializes as `#RRGGBBAA`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorSpec(pub Pixel);

impl ColorSpec {
    /// The wrapped pixel.
    pub fn pixel(self) -> Pixel {
        self.0
    }
}

impl From<Pixel> for ColorSpec {
    fn from(p: Pixel) -> Self {
        Self(p)
    }
}

impl Serialize for ColorSpec {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let p = self.0;
        serializer.serialize_str(&format!(
            "#{:02x}{:02x}{:02x}{:02x}",
            p.r, p.g, p.b, p.a
        ))
    }
}

impl<'de> Deserialize<'de> for ColorSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Obj {
                r: u8,
                g: u8,
                b: u8,
                #[serde(default = "opaque")]
                a: u8,
            },
            Arr(Vec<u8>),
        }

        fn opaque() -> u8 {
            255
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => parse_hex(&s).map(Self).map_err(serde::de::Error::custom),
            Repr::Obj { r, g, b, a } => Ok(Self(Pixel::rgba(r, g, b, a))),
            Repr::Arr(v) => match v.as_slice() {
                &[r, g, b] => Ok(Self(Pixel::rgb(r, g, b))),
                &[r, g, b, a] => Ok(Self(Pixel::rgba(r, g, b, a))),
                _ => Err(serde::de::Error::custom(
                    "color array must be [r, g, b] or [r, g, b, a]",
                )),
            },
        }
    }
}

fn parse_hex(s: &str) -> Result<Pixel, String> {
    let s = s.trim();
    let digits = s.strip_prefix('#').unwrap_or(s);
    if !digits.is_ascii() || !matches!(digits.len(), 6 | 8) {
        return Err(format!("hex color \"{s}\" must be #RRGGBB or #RRGGBBAA"));
    }
    let byte = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .map_err(|_| format!("invalid hex byte \"{}\"", &digits[i..i + 2]))
    };
    let a = if digits.len() == 8 { byte(6)? } else { 255 };
    Ok(Pixel::rgba(byte(0)?, byte(2)?, byte(4)?, a))
}

/// 32-bit packed mask written either as a JSON number or as a `"0x..."` hex string.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Bits(pub u32);

impl Serialize for Bits {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!("0x{:08X}", self.0))
    }
}

impl<'de> Deserialize<'de> for Bits {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Num(u32),
            Hex(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Num(v) => Ok(Self(v)),
            Repr::Hex(s) => {
                let t = s.trim();
                let digits = t
                    .strip_prefix("0x")
                    .or_else(|| t.strip_prefix("0X"))
                    .unwrap_or(t);
                u32::from_str_radix(&digits.replace('_', ""), 16)
                    .map(Self)
                    .map_err(|_| serde::de::Error::custom(format!("invalid hex mask \"{s}\"")))
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/job/color.rs"]
mod tests;
