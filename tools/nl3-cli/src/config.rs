//! Tool configuration (`nl3.toml`)
//!
//! Every section and key is optional; missing values fall back to defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use nl3_sysex::DEFAULT_DESTINATION_ID;

/// Tool configuration, organized into sections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Frame settings used on export
    #[serde(default)]
    pub sysex: SysexConfig,
    /// Import behaviour
    #[serde(default)]
    pub import: ImportConfig,
    /// Listing output
    #[serde(default)]
    pub listing: ListingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SysexConfig {
    /// Destination byte written into exported frames (default: 0x7F)
    #[serde(default = "default_destination_id")]
    pub destination_id: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ImportConfig {
    /// Replace occupied memory locations when loading (default: false)
    #[serde(default)]
    pub overwrite: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Skip empty locations in summaries (default: true)
    #[serde(default = "default_true")]
    pub omit_blank: bool,
}

fn default_destination_id() -> u8 {
    DEFAULT_DESTINATION_ID
}
fn default_true() -> bool {
    true
}

impl Default for SysexConfig {
    fn default() -> Self {
        Self {
            destination_id: default_destination_id(),
        }
    }
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            omit_blank: default_true(),
        }
    }
}

/// Load the configuration at `path`.
///
/// No path, or a path that does not exist, gives the defaults. A file that
/// exists but does not parse is an error.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    if !path.exists() {
        tracing::debug!("No config at {:?}, using defaults", path);
        return Ok(Config::default());
    }

    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let config = toml::from_str(&content).with_context(|| format!("Failed to parse {:?}", path))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.sysex.destination_id, 0x7F);
        assert!(!config.import.overwrite);
        assert!(config.listing.omit_blank);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config: Config = toml::from_str("[sysex]\ndestination_id = 3\n").unwrap();
        assert_eq!(config.sysex.destination_id, 3);
        assert!(config.listing.omit_blank);
        assert_eq!(config.import, ImportConfig::default());
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(Some(&dir.path().join("nl3.toml"))).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(load(None).unwrap(), Config::default());
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[import]\noverwrite = true\n\n[listing]\nomit_blank = false").unwrap();

        let config = load(Some(file.path())).unwrap();
        assert!(config.import.overwrite);
        assert!(!config.listing.omit_blank);
        assert_eq!(config.sysex.destination_id, 0x7F);
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[sysex]\ndestination_id = \"loud\"").unwrap();
        assert!(load(Some(file.path())).is_err());
    }

    #[test]
    fn test_round_trip_through_toml() {
        let mut config = Config::default();
        config.sysex.destination_id = 0x10;
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(toml::from_str::<Config>(&text).unwrap(), config);
    }
}
