use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Named colour from the fixed category palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    #[default]
    Emerald,
    Sky,
    Violet,
    Amber,
    Rose,
    Teal,
    Indigo,
    Orange,
    Cyan,
    Pink,
    Lime,
    Fuchsia,
}

impl Color {
    /// Every palette entry, in picker order
    pub const ALL: [Color; 12] = [
        Color::Emerald,
        Color::Sky,
        Color::Violet,
        Color::Amber,
        Color::Rose,
        Color::Teal,
        Color::Indigo,
        Color::Orange,
        Color::Cyan,
        Color::Pink,
        Color::Lime,
        Color::Fuchsia,
    ];

    /// The persisted name of this colour
    pub fn name(self) -> &'static str {
        match self {
            Color::Emerald => "emerald",
            Color::Sky => "sky",
            Color::Violet => "violet",
            Color::Amber => "amber",
            Color::Rose => "rose",
            Color::Teal => "teal",
            Color::Indigo => "indigo",
            Color::Orange => "orange",
            Color::Cyan => "cyan",
            Color::Pink => "pink",
            Color::Lime => "lime",
            Color::Fuchsia => "fuchsia",
        }
    }

    /// Parse a palette name. Returns None for names outside the palette.
    pub fn parse(s: &str) -> Option<Color> {
        Color::ALL.iter().copied().find(|c| c.name() == s)
    }

    /// Parse a palette name, falling back to the default colour
    pub fn parse_or_default(s: &str) -> Color {
        Color::parse(s).unwrap_or_default()
    }

    /// Main swatch as a hex string (`#rrggbb`)
    pub fn hex(self) -> &'static str {
        match self {
            Color::Emerald => "#10b981",
            Color::Sky => "#0ea5e9",
            Color::Violet => "#8b5cf6",
            Color::Amber => "#f59e0b",
            Color::Rose => "#f43f5e",
            Color::Teal => "#14b8a6",
            Color::Indigo => "#6366f1",
            Color::Orange => "#f97316",
            Color::Cyan => "#06b6d4",
            Color::Pink => "#ec4899",
            Color::Lime => "#84cc16",
            Color::Fuchsia => "#d946ef",
        }
    }

    /// Main swatch as an RGB triple
    pub fn rgb(self) -> (u8, u8, u8) {
        let hex = &self.hex()[1..];
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
        (channel(0), channel(2), channel(4))
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

// Unknown names are accepted and mapped to the default colour.
impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Color::parse_or_default).unwrap_or_default())
    }
}

/// A user-defined grouping of tracked items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub color: Color,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: Color) -> Self {
        Category {
            id: id.into(),
            name: name.into(),
            color,
        }
    }
}
