use std::fmt::{self, Display};
use std::str::FromStr;

use raqote::SolidSource;
use serde::{Deserialize, Serialize};

use crate::error::HalftoneError;

/// An 8-bit color with straight (non-premultiplied) alpha.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Rgba::new(r, g, b, 255)
    }

    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// ITU-R BT.709 luma of the color channels, truncated toward zero. Alpha is ignored.
    ///
    /// Grays map to themselves: the weights sum to one only up to rounding, so a tiny bias keeps
    /// e.g. pure white at 255 rather than 254.
    pub fn luminance(self) -> u8 {
        let y = 0.2126 * f64::from(self.r) + 0.7152 * f64::from(self.g) + 0.0722 * f64::from(self.b);
        (y + 1e-9) as u8
    }

    pub(crate) fn to_source(self) -> SolidSource {
        SolidSource::from_unpremultiplied_argb(self.a, self.r, self.g, self.b)
    }
}

impl From<[u8; 4]> for Rgba {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Rgba { r, g, b, a }
    }
}

impl FromStr for Rgba {
    type Err = HalftoneError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || HalftoneError::InvalidColor(s.to_string());
        let digits = s
            .strip_prefix('#')
            .or_else(|| s.strip_prefix("0x"))
            .unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|_| invalid())?;
        match bytes[..] {
            [r, g, b] => Ok(Rgba::opaque(r, g, b)),
            [r, g, b, a] => Ok(Rgba::new(r, g, b, a)),
            _ => Err(invalid()),
        }
    }
}

impl Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("#")?;
        if self.a == 255 {
            f.write_str(&hex::encode([self.r, self.g, self.b]))
        } else {
            f.write_str(&hex::encode(self.to_bytes()))
        }
    }
}

impl TryFrom<String> for Rgba {
    type Error = HalftoneError;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Rgba> for String {
    fn from(c: Rgba) -> String {
        c.to_string()
    }
}
