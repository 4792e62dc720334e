use std::path::{Path, PathBuf};

use anyhow::Context;
use idrive_decoder::idrive::Channel;
use serde::{Deserialize, Serialize};

/// Settings for replaying a recorded bus log.
///
/// ```yaml
/// can_id: 612        # only decode this identifier
/// interface: can0
/// ignore: [map, option]
/// rotary: true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// CAN identifier carrying controller frames; every 8-byte record when unset
    #[serde(default)]
    pub can_id: Option<u32>,
    /// Only records from this interface
    #[serde(default)]
    pub interface: Option<String>,
    /// Channels whose switch events are not printed
    #[serde(default)]
    pub ignore: Vec<Channel>,
    /// Print rotary deltas
    #[serde(default = "default_true")]
    pub rotary: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            can_id: None,
            interface: None,
            ignore: Vec::new(),
            rotary: default_true(),
        }
    }
}

impl ReplayConfig {
    /// Default config file name, looked up in the working directory.
    pub fn default_path() -> PathBuf {
        PathBuf::from("idrive.yml")
    }

    /// Load config from a file, or return default if not found
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        // An empty document deserializes to unit, not a mapping.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn is_ignored(&self, channel: Channel) -> bool {
        self.ignore.contains(&channel)
    }
}
