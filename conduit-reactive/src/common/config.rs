/*
 * Copyright (c) 2024. Govcraft
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */

use std::time::Duration;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

/// Configuration for Conduit.
///
/// Loaded from TOML in XDG-compliant locations; every field has a default, so a
/// file only needs the values it changes.
///
/// ```toml
/// [timeouts]
/// default_reply_timeout_ms = 2000
///
/// [defaults]
/// cycle_interval_ms = 100
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ConduitConfig {
    /// Timeout configuration
    pub timeouts: TimeoutConfig,
    /// Default values configuration
    pub defaults: DefaultsConfig,
    /// Behavioral configuration switches
    pub behavior: BehaviorConfig,
}

/// Timeout-related configuration values
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Per-component shutdown timeout in milliseconds
    pub component_shutdown_timeout_ms: u64,
    /// System-wide shutdown timeout in milliseconds
    pub system_shutdown_timeout_ms: u64,
    /// Reply bound used by `ask_default` in milliseconds
    pub default_reply_timeout_ms: u64,
}

/// Default configuration values
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Name root for components created without one
    pub component_name: String,
    /// Name root for temporary workers
    pub worker_name: String,
    /// Tick period for components that do not set one; 0 disables ticking
    pub cycle_interval_ms: u64,
}

/// Behavioral configuration switches
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Log messages no behavior entry matched at `warn` instead of `trace`
    pub warn_on_unmatched: bool,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            component_shutdown_timeout_ms: 10_000,
            system_shutdown_timeout_ms: 30_000,
            default_reply_timeout_ms: 5_000,
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            component_name: "component".to_string(),
            worker_name: "temp-worker".to_string(),
            cycle_interval_ms: 0,
        }
    }
}

impl ConduitConfig {
    /// Per-component shutdown timeout.
    pub const fn component_shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.timeouts.component_shutdown_timeout_ms)
    }

    /// System-wide shutdown timeout.
    pub const fn system_shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.timeouts.system_shutdown_timeout_ms)
    }

    /// Reply bound used when a caller does not pick one.
    pub const fn default_reply_timeout(&self) -> Duration {
        Duration::from_millis(self.timeouts.default_reply_timeout_ms)
    }

    /// Default tick period, if ticking is enabled.
    pub const fn default_cycle_interval(&self) -> Option<Duration> {
        match self.defaults.cycle_interval_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this structure.
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from XDG-compliant locations
    ///
    /// Looks for `conduit/config.toml` under the XDG config directories
    /// (`$XDG_CONFIG_HOME`, then `~/.config`).
    ///
    /// If no configuration file is found, returns the default configuration.
    /// If a configuration file exists but is malformed, logs an error and uses defaults.
    pub fn load() -> Self {
        use tracing::{error, info};

        let xdg_dirs = match xdg::BaseDirectories::with_prefix("conduit") {
            Ok(dirs) => dirs,
            Err(e) => {
                error!("Failed to initialize XDG directories: {}", e);
                return Self::default();
            }
        };

        let Some(path) = xdg_dirs.find_config_file("config.toml") else {
            info!("No configuration file found, using defaults");
            return Self::default();
        };

        info!("Loading configuration from: {}", path.display());
        match std::fs::read_to_string(&path) {
            Ok(config_str) => match Self::from_toml(&config_str) {
                Ok(config) => {
                    info!("Successfully loaded configuration");
                    config
                }
                Err(e) => {
                    error!("Failed to parse configuration file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                error!("Failed to read configuration file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

lazy_static! {
    /// Global configuration instance loaded from XDG-compliant locations
    pub static ref CONFIG: ConduitConfig = ConduitConfig::load();
}
