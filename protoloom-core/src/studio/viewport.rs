//! Device-width presets for the preview surface.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewportPreset {
    Compact,
    Medium,
    #[default]
    Full,
}

impl ViewportPreset {
    /// Fixed surface dimensions in CSS pixels; `None` means fluid width.
    /// Size changes replay the whole render rather than resizing in CSS,
    /// so units that measure layout at mount time re-measure.
    pub fn dimensions(self) -> Option<(u32, u32)> {
        match self {
            ViewportPreset::Compact => Some((375, 667)),
            ViewportPreset::Medium => Some((768, 1024)),
            ViewportPreset::Full => None,
        }
    }
}

impl std::str::FromStr for ViewportPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "compact" => Ok(ViewportPreset::Compact),
            "medium" => Ok(ViewportPreset::Medium),
            "full" => Ok(ViewportPreset::Full),
            other => Err(format!("unknown viewport preset '{}'", other)),
        }
    }
}
