//! Configuration types for dnsync
//!
//! This module defines all configuration structures used throughout the workspace.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::model::ZoneName;

/// Main dnsync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// DNS provider configuration
    pub provider: ProviderConfig,

    /// Zones to manage
    pub zones: Vec<ZoneConfig>,

    /// Optional run settings
    #[serde(default)]
    pub settings: SyncSettings,
}

impl SyncConfig {
    /// Create a new configuration for a provider with no zones yet
    pub fn new(provider: ProviderConfig) -> Self {
        Self {
            provider,
            zones: Vec::new(),
            settings: SyncSettings::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.zones.is_empty() {
            return Err(crate::Error::config("No zones configured"));
        }

        for zone in &self.zones {
            zone.zone_name()?;
        }

        self.provider.validate()?;

        Ok(())
    }
}

/// DNS provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Mythic Beasts primary DNS API
    #[serde(rename = "mythicbeasts")]
    MythicBeasts {
        /// Per-zone API passwords keyed by zone name
        ///
        /// ⚠️ NEVER log these values
        passwords: Option<HashMap<String, String>>,
    },

    /// Custom provider
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ProviderConfig {
    /// Validate the provider configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ProviderConfig::MythicBeasts { passwords } => {
                let Some(passwords) = passwords else {
                    return Err(crate::Error::config("Passwords must be a dictionary"));
                };
                let mut seen = HashSet::new();
                for (zone, password) in passwords {
                    let zone_name = ZoneName::new(zone)?;
                    if !seen.insert(zone_name.to_string()) {
                        return Err(crate::Error::config(format!(
                            "Duplicate password for domain: {}",
                            zone_name.without_trailing_dot()
                        )));
                    }
                    if password.is_empty() {
                        return Err(crate::Error::config(format!(
                            "Empty password for domain: {}",
                            zone.trim_end_matches('.')
                        )));
                    }
                }
                Ok(())
            }
            ProviderConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config(
                        "Custom provider factory cannot be empty",
                    ));
                }
                if config.is_null() {
                    return Err(crate::Error::config(
                        "Custom provider config cannot be null",
                    ));
                }
                Ok(())
            }
        }
    }

    /// Get the provider type name
    pub fn type_name(&self) -> &str {
        match self {
            ProviderConfig::MythicBeasts { .. } => "mythicbeasts",
            ProviderConfig::Custom { factory, .. } => factory,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig::MythicBeasts { passwords: None }
    }
}

/// One zone to manage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneConfig {
    /// Zone name, dotted or bare
    pub name: String,

    /// File holding the desired records, in the provider listing format
    #[serde(default)]
    pub desired_file: Option<String>,
}

impl ZoneConfig {
    /// Create a new zone configuration
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            desired_file: None,
        }
    }

    /// Set the desired-state file
    pub fn with_desired_file(mut self, path: impl Into<String>) -> Self {
        self.desired_file = Some(path.into());
        self
    }

    /// The absolute zone name
    pub fn zone_name(&self) -> Result<ZoneName, crate::Error> {
        ZoneName::new(&self.name)
    }
}

/// Run settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Fetch live state but only log the changes that would be sent
    #[serde(default)]
    pub dry_run: bool,

    /// Fail planning when the desired zone holds unsupported record types
    #[serde(default = "default_strict_supports")]
    pub strict_supports: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            dry_run: false,
            strict_supports: default_strict_supports(),
        }
    }
}

fn default_strict_supports() -> bool {
    true
}
