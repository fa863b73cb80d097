//! Application configuration.
//!
//! The configuration is loaded from `$XDG_CONFIG_HOME/splitview/config.json`.
//! Each concern has its own top-level key so sections can be added later
//! without breaking existing files.
//!
//! # Example
//!
//! ```json
//! {
//!   "chords": {
//!     "debounce_ms": 100,
//!     "key_codes": "evdev"
//!   },
//!   "placement": {
//!     "float_window": true,
//!     "reapply_size": true
//!   }
//! }
//! ```

use crate::chord::ChordConfig;
use crate::hyprland::placer::PlacementConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration.
///
/// Every field is optional: `{}` is a valid file and all sections fall back
/// to their compiled-in defaults.  Unknown keys are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Chord recognition settings.
    #[serde(default)]
    pub chords: ChordConfig,

    /// How the Hyprland backend moves windows.
    #[serde(default)]
    pub placement: PlacementConfig,
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
