//! Speaker colors.
//!
//! Known speakers always get their fixed color. Anyone else gets the next
//! color from a small pool the first time they speak and keeps it for the
//! rest of the conversion.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// An sRGB color, written as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Rgb = Rgb(0x00, 0x00, 0x00);

    /// Uppercase hex digits without the leading `#`, as used in DrawingML.
    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.hex())
    }
}

impl FromStr for Rgb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let digits = s.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidColor(s.to_string()));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| Error::InvalidColor(s.to_string()))
        };
        Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

/// Color configuration for a conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerPalette {
    /// Color for text with no speaker.
    #[serde(default = "default_color")]
    pub default: Rgb,

    /// Speakers with a permanent color, keyed by exact name.
    #[serde(default)]
    pub fixed: BTreeMap<String, Rgb>,

    /// Colors handed out in turn to other speakers.
    pub pool: Vec<Rgb>,
}

fn default_color() -> Rgb {
    Rgb::WHITE
}

impl Default for SpeakerPalette {
    fn default() -> Self {
        let fixed = [
            ("仲條", Rgb(0x00, 0xFD, 0xFF)),
            ("三村", Rgb(0xFF, 0xFF, 0xFF)),
            ("星野", Rgb(0xFF, 0xFF, 0x00)),
        ]
        .into_iter()
        .map(|(name, color)| (name.to_string(), color))
        .collect();

        Self {
            default: Rgb::WHITE,
            fixed,
            pool: vec![
                Rgb(0xFF, 0x40, 0xFF), // pink
                Rgb(0xFF, 0xA5, 0x00), // orange
                Rgb(0xFF, 0xFB, 0x00), // spare yellow
            ],
        }
    }
}

impl SpeakerPalette {
    /// Parse a palette from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let palette: Self =
            serde_json::from_str(json).map_err(|e| Error::InvalidPalette(e.to_string()))?;
        palette.validate()?;
        Ok(palette)
    }

    /// A palette needs at least one pool color to hand out.
    pub fn validate(&self) -> Result<()> {
        if self.pool.is_empty() {
            return Err(Error::InvalidPalette(
                "auto color pool must contain at least one color".to_string(),
            ));
        }
        Ok(())
    }
}

/// Per-conversion speaker → color state.
///
/// Create one per conversion; assignments never leak between conversions.
#[derive(Debug, Clone)]
pub struct ColorAssigner {
    palette: SpeakerPalette,
    assigned: HashMap<String, Rgb>,
    cursor: usize,
}

impl Default for ColorAssigner {
    fn default() -> Self {
        Self {
            palette: SpeakerPalette::default(),
            assigned: HashMap::new(),
            cursor: 0,
        }
    }
}

impl ColorAssigner {
    /// Create an assigner over a validated palette.
    pub fn new(palette: SpeakerPalette) -> Result<Self> {
        palette.validate()?;
        Ok(Self {
            palette,
            assigned: HashMap::new(),
            cursor: 0,
        })
    }

    /// The color for a speaker, assigning a pool color on first encounter.
    pub fn color_for(&mut self, speaker: Option<&str>) -> Rgb {
        let name = match speaker {
            Some(name) if !name.is_empty() => name,
            _ => return self.palette.default,
        };

        if let Some(&color) = self.palette.fixed.get(name) {
            return color;
        }

        if let Some(&color) = self.assigned.get(name) {
            return color;
        }

        let color = self.palette.pool[self.cursor % self.palette.pool.len()];
        self.cursor += 1;
        self.assigned.insert(name.to_string(), color);
        log::debug!("Assigned {} to speaker '{}'", color, name);
        color
    }

    /// Number of speakers that received a pool color so far.
    pub fn assigned_count(&self) -> usize {
        self.assigned.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_parse_and_display() {
        let color: Rgb = "#00fdff".parse().unwrap();
        assert_eq!(color, Rgb(0x00, 0xFD, 0xFF));
        assert_eq!(color.to_string(), "#00FDFF");
        assert_eq!(color.hex(), "00FDFF");
        assert_eq!("FFA500".parse::<Rgb>().unwrap(), Rgb(0xFF, 0xA5, 0x00));
    }

    #[test]
    fn test_rgb_rejects_malformed() {
        assert!(matches!("#FFF".parse::<Rgb>(), Err(Error::InvalidColor(_))));
        assert!(matches!("#GGGGGG".parse::<Rgb>(), Err(Error::InvalidColor(_))));
        assert!(matches!("#ＦＦＦＦＦＦ".parse::<Rgb>(), Err(Error::InvalidColor(_))));
    }

    #[test]
    fn test_no_speaker_is_white() {
        let mut colors = ColorAssigner::default();
        assert_eq!(colors.color_for(None), Rgb::WHITE);
        assert_eq!(colors.color_for(Some("")), Rgb::WHITE);
        assert_eq!(colors.assigned_count(), 0);
    }

    #[test]
    fn test_fixed_speakers() {
        let mut colors = ColorAssigner::default();
        assert_eq!(colors.color_for(Some("仲條")), Rgb(0x00, 0xFD, 0xFF));
        assert_eq!(colors.color_for(Some("三村")), Rgb(0xFF, 0xFF, 0xFF));
        assert_eq!(colors.color_for(Some("星野")), Rgb(0xFF, 0xFF, 0x00));
    }

    #[test]
    fn test_unknown_speakers_round_robin() {
        let mut colors = ColorAssigner::default();
        let pool = SpeakerPalette::default().pool;

        assert_eq!(colors.color_for(Some("C")), pool[0]);
        assert_eq!(colors.color_for(Some("D")), pool[1]);
        assert_eq!(colors.color_for(Some("C")), pool[0]);
        assert_eq!(colors.color_for(Some("E")), pool[2]);
        assert_eq!(colors.color_for(Some("F")), pool[0]);
        assert_eq!(colors.assigned_count(), 4);
    }

    #[test]
    fn test_fixed_speaker_unaffected_by_call_order() {
        let mut colors = ColorAssigner::default();
        colors.color_for(Some("C"));
        colors.color_for(Some("D"));
        assert_eq!(colors.color_for(Some("星野")), Rgb(0xFF, 0xFF, 0x00));
        // Fixed speakers do not advance the pool.
        assert_eq!(colors.color_for(Some("E")), SpeakerPalette::default().pool[2]);
    }

    #[test]
    fn test_fresh_assigner_starts_over() {
        let mut first = ColorAssigner::default();
        first.color_for(Some("C"));
        first.color_for(Some("D"));

        let mut second = ColorAssigner::default();
        assert_eq!(second.color_for(Some("D")), SpeakerPalette::default().pool[0]);
    }

    #[test]
    fn test_empty_pool_rejected() {
        let palette = SpeakerPalette {
            pool: Vec::new(),
            ..SpeakerPalette::default()
        };
        assert!(matches!(
            ColorAssigner::new(palette),
            Err(Error::InvalidPalette(_))
        ));
    }

    #[test]
    fn test_palette_from_json() {
        let palette = SpeakerPalette::from_json(
            r##"{"fixed": {"Alice": "#112233"}, "pool": ["#445566"]}"##,
        )
        .unwrap();

        assert_eq!(palette.default, Rgb::WHITE);
        let mut colors = ColorAssigner::new(palette).unwrap();
        assert_eq!(colors.color_for(Some("Alice")), Rgb(0x11, 0x22, 0x33));
        assert_eq!(colors.color_for(Some("Bob")), Rgb(0x44, 0x55, 0x66));
        assert_eq!(colors.color_for(Some("Carol")), Rgb(0x44, 0x55, 0x66));
    }

    #[test]
    fn test_palette_from_json_rejects_bad_color() {
        let result = SpeakerPalette::from_json(r##"{"pool": ["#12"]}"##);
        assert!(matches!(result, Err(Error::InvalidPalette(_))));
    }

    #[test]
    fn test_palette_json_round_trip_uses_hex_strings() {
        let json = serde_json::to_string(&SpeakerPalette::default()).unwrap();
        assert!(json.contains("\"#FF40FF\""));
        assert_eq!(SpeakerPalette::from_json(&json).unwrap(), SpeakerPalette::default());
    }
}
