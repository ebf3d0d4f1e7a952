// Copyright 2025 stoa contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Engine configuration loaded from a single JSON file.
//!
//! The file has one `engine` section the runtime interprets and any number
//! of per-module sections keyed by module name, which the runtime passes
//! through to the owning module unexamined.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fallback for `engine.max_delta_seconds`, also used to sanitize
/// non-positive or non-finite values.
const DEFAULT_MAX_DELTA_SECONDS: f32 = 0.1;

/// An error loading the engine configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read engine config '{path}'")]
    Io {
        /// The configuration file path.
        path: String,
        /// The underlying filesystem error.
        #[source]
        source: std::io::Error,
    },
    /// The file was read but is not valid JSON for this schema.
    #[error("engine config '{path}' is not valid JSON")]
    Parse {
        /// The configuration file path.
        path: String,
        /// The underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },
}

/// The whole configuration file: the `engine` section plus pass-through
/// module sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Settings the runtime itself interprets.
    #[serde(default)]
    pub engine: EngineSection,
    /// Per-module sections, keyed by module name. Content is opaque to the
    /// runtime; each module receives its own section at initialize.
    #[serde(flatten)]
    pub modules: BTreeMap<String, serde_json::Value>,
}

impl EngineConfig {
    /// Loads the configuration from `path`.
    ///
    /// A missing file is not an error: the engine runs fine on defaults, so
    /// it logs a warning and returns them. A present-but-broken file is an
    /// error, because silently ignoring a file the user wrote hides typos.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(
                "Engine config '{}' not found, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        info!(
            "Engine config loaded from '{}' ({} module sections)",
            path.display(),
            config.modules.len()
        );
        Ok(config)
    }

    /// Returns the named module's configuration section, or `Null` when the
    /// file has none for it.
    #[must_use]
    pub fn module_section(&self, module: &str) -> &serde_json::Value {
        static NULL: serde_json::Value = serde_json::Value::Null;
        self.modules.get(module).unwrap_or(&NULL)
    }
}

/// The `engine` section of the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSection {
    /// Application name, for logs and window titles.
    #[serde(default = "default_name")]
    pub name: String,
    /// Window parameters, forwarded to whichever module owns the window.
    #[serde(default)]
    pub window: WindowConfig,
    /// Upper bound on the per-frame delta, in seconds.
    #[serde(default = "default_max_delta_seconds")]
    pub max_delta_seconds: f32,
}

impl EngineSection {
    /// The frame delta clamp as a [`Duration`].
    ///
    /// Non-finite or non-positive configured values fall back to the
    /// default rather than producing a zero or garbage clamp.
    #[must_use]
    pub fn max_delta(&self) -> Duration {
        let seconds = if self.max_delta_seconds.is_finite() && self.max_delta_seconds > 0.0 {
            self.max_delta_seconds
        } else {
            DEFAULT_MAX_DELTA_SECONDS
        };
        Duration::from_secs_f32(seconds)
    }
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            name: default_name(),
            window: WindowConfig::default(),
            max_delta_seconds: default_max_delta_seconds(),
        }
    }
}

/// Window parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Client width in pixels.
    #[serde(default = "default_window_width")]
    pub width: u32,
    /// Client height in pixels.
    #[serde(default = "default_window_height")]
    pub height: u32,
    /// Title bar text.
    #[serde(default = "default_window_title")]
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_window_width(),
            height: default_window_height(),
            title: default_window_title(),
        }
    }
}

fn default_name() -> String {
    "stoa".to_string()
}

fn default_max_delta_seconds() -> f32 {
    DEFAULT_MAX_DELTA_SECONDS
}

fn default_window_width() -> u32 {
    1280
}

fn default_window_height() -> u32 {
    720
}

fn default_window_title() -> String {
    "Stoa".to_string()
}
