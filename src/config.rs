#![cfg(feature = "std")]

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::config::{DEFAULT_MARKER_AS, DEFAULT_PREFIX};

pub const DEFAULT_TEMPLATE_PATH: &str = "/etc/bird/conf.orig";
pub const DEFAULT_CONFIG_PATH: &str = "/etc/bird/bird.conf";
pub const DEFAULT_SOCKET_PATH: &str = "/run/bird/bird.ctl";

/// Everything a peer needs to know to read and write the side-channel.
///
/// Passed explicitly to the gateway and node; there is no global state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// AS number both peers tag protocol communities with.
    pub marker_as: u16,
    /// Prefix announced by the other peer.
    pub prefix: String,
    /// BIRD configuration template containing the community placeholder.
    pub template_path: PathBuf,
    /// Where the rendered BIRD configuration is written.
    pub config_path: PathBuf,
    /// BIRD control socket.
    pub socket_path: PathBuf,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            marker_as: DEFAULT_MARKER_AS,
            prefix: DEFAULT_PREFIX.to_string(),
            template_path: PathBuf::from(DEFAULT_TEMPLATE_PATH),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            socket_path: PathBuf::from(DEFAULT_SOCKET_PATH),
        }
    }
}

impl SignalConfig {
    /// Loads a JSON config; missing keys take their defaults.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}
