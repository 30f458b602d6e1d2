//! Configuration loader with multi-source merging.
//!
//! Sources, later ones winning: built-in defaults, the global
//! `~/.config/convene/config.toml`, the project-level `./convene.toml`, an
//! explicit `--config` file, and `CONVENE_*` environment variables (nested
//! keys split on `__`, e.g. `CONVENE_SYNC__POLL_INTERVAL_SECS=4`).

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use convene_domain::{RoomCatalog, RoomCounts, RoomType};

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] figment::Error),
}

/// Room pool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomsConfig {
    /// How many rooms of each type the catalog holds
    pub counts: RoomCounts,
    /// Domain join URLs hang off of
    pub base_url: String,
}

impl Default for RoomsConfig {
    fn default() -> Self {
        Self {
            counts: RoomCounts::default(),
            base_url: "https://rooms.convene.local".to_string(),
        }
    }
}

/// Which room provider adapter to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderMode {
    /// Derive rooms from the catalog, no network
    Static,
    /// Create rooms on demand through the hosting service API
    Http,
}

/// Room-hosting provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub mode: ProviderMode,
    /// Management API base, e.g. `https://api.rooms.example/v1`
    pub api_base: String,
    /// Bearer token for the management API
    pub api_token: Option<String>,
    /// Lifetime requested for provider-created rooms
    pub room_expiry_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            mode: ProviderMode::Static,
            api_base: String::new(),
            api_token: None,
            room_expiry_secs: 2 * 60 * 60,
        }
    }
}

/// Cross-process synchronization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Store polling interval for participant processes
    pub poll_interval_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 3,
        }
    }
}

/// Session defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Total session length in minutes
    pub duration_minutes: u32,
    /// Room type used when the host doesn't pick one
    pub default_room_type: RoomType,
    /// Whether participants may switch breakout rooms on their own
    pub allow_room_switching: bool,
    /// Shuffle participants before partitioning
    pub shuffle: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_minutes: 90,
            default_room_type: RoomType::Dyad,
            allow_room_switching: false,
            shuffle: true,
        }
    }
}

/// Complete convene configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConveneConfig {
    pub rooms: RoomsConfig,
    pub provider: ProviderConfig,
    pub sync: SyncConfig,
    pub session: SessionConfig,
}

impl ConveneConfig {
    /// Load and merge configuration from all sources.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(ConveneConfig::default()));

        if let Some(global) = Self::global_config_path() {
            figment = figment.merge(Toml::file(global));
        }
        figment = figment.merge(Toml::file("convene.toml"));
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }
        figment = figment.merge(Env::prefixed("CONVENE_").split("__"));

        Ok(figment.extract()?)
    }

    /// `~/.config/convene/config.toml`, platform-adjusted.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("convene").join("config.toml"))
    }

    /// Catalog derived from the room counts and base URL.
    pub fn catalog(&self) -> RoomCatalog {
        RoomCatalog::new(self.rooms.counts, self.rooms.base_url.clone())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.sync.poll_interval_secs)
    }

    pub fn room_expiry(&self) -> Duration {
        Duration::from_secs(self.provider.room_expiry_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConveneConfig::default();
        assert_eq!(config.session.duration_minutes, 90);
        assert_eq!(config.session.default_room_type, RoomType::Dyad);
        assert_eq!(config.provider.mode, ProviderMode::Static);
        assert_eq!(config.poll_interval(), Duration::from_secs(3));
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let figment = Figment::from(Serialized::defaults(ConveneConfig::default())).merge(
            Toml::string(
                r#"
                [rooms]
                base_url = "https://rooms.example"

                [rooms.counts]
                dyad = 12

                [session]
                duration_minutes = 120
                default_room_type = "triad"

                [provider]
                mode = "http"
                api_base = "https://api.rooms.example/v1"
                api_token = "secret"
                "#,
            ),
        );
        let config: ConveneConfig = figment.extract().unwrap();

        assert_eq!(config.rooms.counts.dyad, 12);
        // Unset fields keep their defaults.
        assert_eq!(config.rooms.counts.kiva, RoomCounts::default().kiva);
        assert_eq!(config.session.duration_minutes, 120);
        assert_eq!(config.session.default_room_type, RoomType::Triad);
        assert_eq!(config.provider.mode, ProviderMode::Http);
        assert_eq!(config.provider.api_token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_catalog_from_config() {
        let config = ConveneConfig::default();
        let catalog = config.catalog();
        assert_eq!(
            catalog.rooms_of_type(RoomType::Dyad).len(),
            RoomCounts::default().dyad
        );
    }
}
