//! The fixed palette of risograph ink colors.
//!
//! Tints always name one of these entries; [`InkId`] makes that a type-level guarantee so a scene
//! can never reference an ink that does not exist.

use std::fmt;
use std::str::FromStr;

use crate::foundation::core::Rgb8;
use crate::foundation::error::RisoError;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum InkId {
    FluorescentPink,
    FluorescentOrange,
    Sunflower,
    Yellow,
    LightLime,
    Green,
    Teal,
    Aqua,
    SkyBlue,
    Blue,
    Violet,
    Purple,
    Burgundy,
    Red,
    Scarlet,
    BrightRed,
    Black,
}

/// One palette entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ink {
    pub id: InkId,
    pub key: &'static str,
    pub name: &'static str,
    pub rgb: Rgb8,
}

const PALETTE: [Ink; 17] = [
    ink(InkId::FluorescentPink, "fluorescent-pink", "Fluorescent Pink", 255, 72, 176),
    ink(InkId::FluorescentOrange, "fluorescent-orange", "Fluorescent Orange", 255, 102, 0),
    ink(InkId::Sunflower, "sunflower", "Sunflower", 255, 180, 0),
    ink(InkId::Yellow, "yellow", "Yellow", 255, 232, 0),
    ink(InkId::LightLime, "light-lime", "Light Lime", 228, 255, 43),
    ink(InkId::Green, "green", "Green", 0, 166, 81),
    ink(InkId::Teal, "teal", "Teal", 0, 169, 157),
    ink(InkId::Aqua, "aqua", "Aqua", 0, 169, 224),
    ink(InkId::SkyBlue, "sky-blue", "Sky Blue", 73, 180, 230),
    ink(InkId::Blue, "blue", "Blue", 0, 120, 191),
    ink(InkId::Violet, "violet", "Violet", 101, 50, 149),
    ink(InkId::Purple, "purple", "Purple", 114, 65, 144),
    ink(InkId::Burgundy, "burgundy", "Burgundy", 145, 57, 89),
    ink(InkId::Red, "red", "Red", 255, 72, 0),
    ink(InkId::Scarlet, "scarlet", "Scarlet", 240, 76, 60),
    ink(InkId::BrightRed, "bright-red", "Bright Red", 255, 53, 71),
    ink(InkId::Black, "black", "Black", 0, 0, 0),
];

const fn ink(id: InkId, key: &'static str, name: &'static str, r: u8, g: u8, b: u8) -> Ink {
    Ink {
        id,
        key,
        name,
        rgb: Rgb8::new(r, g, b),
    }
}

impl InkId {
    /// All inks in palette order.
    pub const ALL: [InkId; 17] = [
        InkId::FluorescentPink,
        InkId::FluorescentOrange,
        InkId::Sunflower,
        InkId::Yellow,
        InkId::LightLime,
        InkId::Green,
        InkId::Teal,
        InkId::Aqua,
        InkId::SkyBlue,
        InkId::Blue,
        InkId::Violet,
        InkId::Purple,
        InkId::Burgundy,
        InkId::Red,
        InkId::Scarlet,
        InkId::BrightRed,
        InkId::Black,
    ];

    pub fn ink(self) -> &'static Ink {
        // PALETTE is declared in the same order as the enum.
        &PALETTE[self as usize]
    }

    pub fn key(self) -> &'static str {
        self.ink().key
    }

    pub fn name(self) -> &'static str {
        self.ink().name
    }

    pub fn rgb(self) -> Rgb8 {
        self.ink().rgb
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let key = key.trim();
        PALETTE
            .iter()
            .find(|ink| ink.key.eq_ignore_ascii_case(key))
            .map(|ink| ink.id)
    }
}

impl fmt::Display for InkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for InkId {
    type Err = RisoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| RisoError::validation(format!("unknown ink '{s}'")))
    }
}

/// The full palette in display order.
pub fn palette() -> &'static [Ink] {
    &PALETTE
}

#[cfg(test)]
#[path = "../../tests/unit/assets/ink.rs"]
mod tests;
