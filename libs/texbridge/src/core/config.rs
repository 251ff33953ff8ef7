// Copyright (c) 2025 Jonathan Fontanez
// SPDX-License-Identifier: BUSL-1.1

//! Bridge configuration, loadable from TOML or YAML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{ConfigError, PixelLayout};

/// Flush stale cache entries every N converted frames.
/// 60 = roughly once per second at 60fps.
pub const DEFAULT_FLUSH_INTERVAL: u64 = 60;

/// Configuration for a [`FrameTextureBridge`](super::FrameTextureBridge).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeConfig {
    /// Layout of the delivered pixel buffers.
    pub pixel_layout: PixelLayout,

    /// Flush the texture cache every N converted frames. 0 disables.
    pub flush_interval: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            pixel_layout: PixelLayout::default(),
            flush_interval: DEFAULT_FLUSH_INTERVAL,
        }
    }
}

impl From<PixelLayout> for BridgeConfig {
    fn from(pixel_layout: PixelLayout) -> Self {
        Self {
            pixel_layout,
            ..Self::default()
        }
    }
}

impl BridgeConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load from a `.toml`, `.yaml` or `.yml` file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;

        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&content)?,
            Some("yaml" | "yml") => Self::from_yaml_str(&content)?,
            other => {
                return Err(ConfigError::UnsupportedFormat(
                    other.unwrap_or_default().to_string(),
                ))
            }
        };

        tracing::info!("Loaded bridge config from {}", path.display());
        Ok(config)
    }

    /// Load from `path`, returning defaults if the file is missing or
    /// unparseable.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!("No bridge config at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}
