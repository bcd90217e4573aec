//! Display palette for savings goals.

use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Fixed palette a goal's accent color is chosen from.
///
/// Encoded on the wire as the hex string of the swatch (`"#3B82F6"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GoalColor {
    #[default]
    Blue,
    Emerald,
    Amber,
    Red,
    Violet,
    Pink,
    Teal,
    Orange,
}

impl GoalColor {
    pub const PALETTE: [GoalColor; 8] = [
        GoalColor::Blue,
        GoalColor::Emerald,
        GoalColor::Amber,
        GoalColor::Red,
        GoalColor::Violet,
        GoalColor::Pink,
        GoalColor::Teal,
        GoalColor::Orange,
    ];

    pub fn hex(self) -> &'static str {
        match self {
            GoalColor::Blue => "#3B82F6",
            GoalColor::Emerald => "#10B981",
            GoalColor::Amber => "#F59E0B",
            GoalColor::Red => "#EF4444",
            GoalColor::Violet => "#8B5CF6",
            GoalColor::Pink => "#EC4899",
            GoalColor::Teal => "#14B8A6",
            GoalColor::Orange => "#F97316",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GoalColor::Blue => "blue",
            GoalColor::Emerald => "emerald",
            GoalColor::Amber => "amber",
            GoalColor::Red => "red",
            GoalColor::Violet => "violet",
            GoalColor::Pink => "pink",
            GoalColor::Teal => "teal",
            GoalColor::Orange => "orange",
        }
    }

    /// Picks a palette entry by position, wrapping around once the palette is exhausted.
    pub fn cycle(index: usize) -> Self {
        Self::PALETTE[index % Self::PALETTE.len()]
    }

    /// Returns the `(r, g, b)` channels of the swatch.
    pub fn rgb(self) -> (u8, u8, u8) {
        let hex = &self.hex()[1..];
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).unwrap_or(0);
        (channel(0..2), channel(2..4), channel(4..6))
    }
}

impl fmt::Display for GoalColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raised when a color name or hex code is not part of the palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownColor(pub String);

impl fmt::Display for UnknownColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "`{}` is not a palette color (expected one of: {})",
            self.0,
            GoalColor::PALETTE
                .iter()
                .map(|color| color.label())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl std::error::Error for UnknownColor {}

impl FromStr for GoalColor {
    type Err = UnknownColor;

    /// Accepts either a palette label (`teal`) or its hex code, with or without `#`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        let hex = normalized.trim_start_matches('#');
        GoalColor::PALETTE
            .iter()
            .copied()
            .find(|color| {
                color.label() == normalized || color.hex()[1..].eq_ignore_ascii_case(hex)
            })
            .ok_or_else(|| UnknownColor(value.to_string()))
    }
}

impl Serialize for GoalColor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.hex())
    }
}

impl<'de> Deserialize<'de> for GoalColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        GoalColor::from_str(&value).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labels_and_hex_codes() {
        assert_eq!("Teal".parse::<GoalColor>().unwrap(), GoalColor::Teal);
        assert_eq!("#ef4444".parse::<GoalColor>().unwrap(), GoalColor::Red);
        assert_eq!("F97316".parse::<GoalColor>().unwrap(), GoalColor::Orange);
        assert!("chartreuse".parse::<GoalColor>().is_err());
    }

    #[test]
    fn serializes_as_hex_string() {
        let json = serde_json::to_string(&GoalColor::Violet).unwrap();
        assert_eq!(json, "\"#8B5CF6\"");
        let back: GoalColor = serde_json::from_str("\"#8b5cf6\"").unwrap();
        assert_eq!(back, GoalColor::Violet);
    }

    #[test]
    fn cycle_wraps_palette() {
        assert_eq!(GoalColor::cycle(0), GoalColor::Blue);
        assert_eq!(GoalColor::cycle(9), GoalColor::Emerald);
        assert_eq!(GoalColor::Blue.rgb(), (0x3B, 0x82, 0xF6));
    }
}
