//! Color constants and the `#rrggbb` config color type.
//!
//! Most colors come from the layout config. The constants here are the
//! fixed tints the sign uses regardless of config (unlit squares, obstacle
//! lamp) and the fallbacks for optional config colors.

use std::fmt;

use embedded_graphics::pixelcolor::{Rgb888, RgbColor};
use serde::Deserialize;

use crate::error::ConfigError;

// =============================================================================
// Standard Colors
// =============================================================================

/// Pure black. Canvas fallback and text on light badges.
pub const BLACK: Rgb888 = Rgb888::BLACK;

/// Pure white. Unlit square icon and edge, description text.
pub const WHITE: Rgb888 = Rgb888::WHITE;

// =============================================================================
// Indicator Colors
// =============================================================================

/// Fill of an unlit approach square.
pub const UNLIT_SQUARE: Rgb888 = Rgb888::new(0x2d, 0x4d, 0x2d);

/// Header status square fill when no `squareOnColor` is configured.
pub const DEFAULT_SQUARE_ON: Rgb888 = Rgb888::new(0x4d, 0x98, 0x4d);

/// Icon and edge color of a lit square when the config leaves them unset.
pub const DEFAULT_LIT_ACCENT: Rgb888 = Rgb888::new(0x88, 0x88, 0x88);

/// Icon and edge color of the lit header status square when unset.
pub const HEADER_LIT_ACCENT: Rgb888 = Rgb888::new(0x4b, 0x4b, 0x4b);

/// Status lamp fill while a route reports an obstacle.
pub const OBSTACLE_RED: Rgb888 = Rgb888::new(0xff, 0x44, 0x44);

/// Legend square fill for a lit indicator when the legend has no `onFillColor`.
pub const LEGEND_LIT_FILL: Rgb888 = Rgb888::new(0x90, 0xee, 0x90);

/// Legend square fill for an edge-only (unlit) indicator.
pub const LEGEND_EDGE_FILL: Rgb888 = Rgb888::new(0x0f, 0x0f, 0x0f);

// =============================================================================
// Config Color Type
// =============================================================================

/// A color read from the layout config.
///
/// Accepts `#rgb`, `#rrggbb` and a handful of CSS names used by existing
/// layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct HexColor(pub Rgb888);

impl HexColor {
    pub const fn rgb(self) -> Rgb888 {
        self.0
    }

    /// Parse a config color string.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let trimmed = value.trim();
        let invalid = || ConfigError::InvalidColor { value: value.to_owned() };

        if let Some(named) = named_color(trimmed) {
            return Ok(Self(named));
        }

        let hex = trimmed.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match hex.len() {
            3 => {
                let (r, g, b) = (channel(&hex[0..1])?, channel(&hex[1..2])?, channel(&hex[2..3])?);
                Ok(Self(Rgb888::new(r * 17, g * 17, b * 17)))
            }
            6 => Ok(Self(Rgb888::new(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?))),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for HexColor {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HexColor> for Rgb888 {
    fn from(color: HexColor) -> Self {
        color.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0.r(), self.0.g(), self.0.b())
    }
}

fn named_color(name: &str) -> Option<Rgb888> {
    let color = match name.to_ascii_lowercase().as_str() {
        "black" => BLACK,
        "white" => WHITE,
        "red" => Rgb888::RED,
        "yellow" => Rgb888::YELLOW,
        "lightgreen" => LEGEND_LIT_FILL,
        "gray" | "grey" => Rgb888::new(0x80, 0x80, 0x80),
        _ => return None,
    };
    Some(color)
}

/// Resolve an optional config color against a fallback.
#[inline]
pub fn or_default(color: Option<HexColor>, fallback: Rgb888) -> Rgb888 {
    color.map_or(fallback, HexColor::rgb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_hex() {
        let color = HexColor::parse("#2d4d2d").unwrap();
        assert_eq!(color.rgb(), UNLIT_SQUARE);
    }

    #[test]
    fn test_parse_short_hex_expands_nibbles() {
        let color = HexColor::parse("#fff").unwrap();
        assert_eq!(color.rgb(), WHITE, "#fff should expand to pure white");
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(HexColor::parse("#FF4444").unwrap().rgb(), OBSTACLE_RED);
        assert_eq!(HexColor::parse("LightGreen").unwrap().rgb(), LEGEND_LIT_FILL);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        for bad in ["", "#", "#12", "#12345", "#gggggg", "2d4d2d", "#+1+2+3"] {
            assert!(
                matches!(HexColor::parse(bad), Err(ConfigError::InvalidColor { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let color = HexColor::parse("#4d984d").unwrap();
        assert_eq!(color.to_string(), "#4d984d");
    }

    #[test]
    fn test_deserialize_from_json_string() {
        let color: HexColor = serde_json::from_str("\"#888888\"").unwrap();
        assert_eq!(color.rgb(), DEFAULT_LIT_ACCENT);
        assert!(serde_json::from_str::<HexColor>("\"nope\"").is_err());
    }

    #[test]
    fn test_or_default_falls_back() {
        assert_eq!(or_default(None, WHITE), WHITE);
        assert_eq!(or_default(Some(HexColor(BLACK)), WHITE), BLACK);
    }
}
