//! Mediaframe Core Type Definitions
//!
//! Defines fundamental types used throughout the wrapper.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// =============================================================================
// Content Types
// =============================================================================

/// Concrete content type handled by exactly one content plugin
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    /// HTML5 video or a video platform embed
    Video,
    /// 3D model (glTF, OBJ, FBX, ...)
    Model,
    /// PDF document
    Pdf,
    /// H5P interactive package
    H5p,
    /// Arbitrary website in a nested frame
    Iframe,
    /// Point-cloud / gaussian-splat scene
    Supersplat,
}

impl ContentType {
    /// All concrete content types, in dispatch-table order
    pub const ALL: [ContentType; 6] = [
        ContentType::Video,
        ContentType::Model,
        ContentType::Pdf,
        ContentType::H5p,
        ContentType::Iframe,
        ContentType::Supersplat,
    ];

    /// Wire/tag representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Model => "model",
            Self::Pdf => "pdf",
            Self::H5p => "h5p",
            Self::Iframe => "iframe",
            Self::Supersplat => "supersplat",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == tag)
            .ok_or_else(|| format!("unknown content type '{}'", s))
    }
}

/// Requested content type before resolution; `Auto` never survives resolution
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TypeRequest {
    /// Detect the type from the content source
    #[default]
    Auto,
    /// Use the given type
    Explicit(ContentType),
}

impl FromStr for TypeRequest {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        s.parse().map(Self::Explicit)
    }
}

impl Serialize for TypeRequest {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Auto => serializer.serialize_str("auto"),
            Self::Explicit(t) => serializer.serialize_str(t.as_str()),
        }
    }
}

impl<'de> Deserialize<'de> for TypeRequest {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Theme Types
// =============================================================================

/// Theme requested by configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemePreference {
    /// Follow system media queries
    #[default]
    Auto,
    Light,
    Dark,
    HighContrast,
}

impl FromStr for ThemePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "high-contrast" => Ok(Self::HighContrast),
            other => Err(format!("unknown theme '{}'", other)),
        }
    }
}

/// Theme actually applied to the wrapper
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    Light,
    Dark,
    HighContrast,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::HighContrast => "high-contrast",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
