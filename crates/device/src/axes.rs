//! Selection of which pose components a tracker effect applies.

use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

use cullfx_core::Error;

/// Bitmask over the tracked pose components.
///
/// Any integer is accepted; bits other than the named ones are carried along
/// but have no effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrackedAxes(i32);

impl TrackedAxes {
    /// No components.
    pub const NONE: Self = Self(0x000);
    /// X position.
    pub const X: Self = Self(0x001);
    /// Y position.
    pub const Y: Self = Self(0x002);
    /// Z position.
    pub const Z: Self = Self(0x004);
    /// All three position axes.
    pub const POSITION: Self = Self(0x007);
    /// Orientation.
    pub const ORIENTATION: Self = Self(0x008);
    /// Position and orientation.
    pub const ALL: Self = Self(0x00f);

    /// Wrap a raw bitmask without validation.
    pub const fn from_bits(bits: i32) -> Self {
        Self(bits)
    }

    /// The raw bitmask.
    pub const fn bits(self) -> i32 {
        self.0
    }

    /// True if any of the bits in `other` are set.
    pub const fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }
}

impl Default for TrackedAxes {
    fn default() -> Self {
        Self::ALL
    }
}

impl BitOr for TrackedAxes {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Display for TrackedAxes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl FromStr for TrackedAxes {
    type Err = Error;

    /// Parses names joined by `|`, e.g. `"x|z|orient"`. Plain integers,
    /// decimal or `0x` hex, are accepted as raw masks.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut axes = Self::NONE;
        for part in s.split('|').map(str::trim) {
            let next = match part.to_ascii_lowercase().as_str() {
                "x" => Self::X,
                "y" => Self::Y,
                "z" => Self::Z,
                "pos" | "position" => Self::POSITION,
                "orient" | "orientation" => Self::ORIENTATION,
                "all" => Self::ALL,
                "none" => Self::NONE,
                other => parse_bits(other)
                    .map(Self::from_bits)
                    .ok_or_else(|| Error::Config(format!("unknown tracked axis '{}'", part)))?,
            };
            axes = axes | next;
        }
        Ok(axes)
    }
}

/// Raw masks are read as 32 bits; hex and large decimals wrap into the sign bit.
fn parse_bits(s: &str) -> Option<i32> {
    match s.strip_prefix("0x") {
        Some(hex) => u32::from_str_radix(hex, 16).ok().map(|v| v as i32),
        None => s
            .parse::<i32>()
            .ok()
            .or_else(|| s.parse::<u32>().ok().map(|v| v as i32)),
    }
}
