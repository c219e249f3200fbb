use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
///
/// Loaded from `config.toml` in the platform config dir. Every field has a
/// default, so a missing file or a partial one is fine.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub curation: CurationConfig,
    #[serde(default)]
    pub branding: BrandingConfig,
}

impl Config {
    /// Load config from the default location, falling back to defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load config from an explicit path. A missing file yields defaults
    pub fn load_from<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    /// Save config to an explicit path, creating parent dirs as needed
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the config file path
    pub fn config_path() -> crate::Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find config directory".into()))?
            .join("votewallet");

        Ok(config_dir.join("config.toml"))
    }

    /// Reject values the store could never honor
    pub fn validate(&self) -> crate::Result<()> {
        let c = &self.curation;
        if c.default_max_stores == 0 {
            return Err(crate::Error::ConfigError(
                "curation.default_max_stores must be at least 1".into(),
            ));
        }
        if c.max_stores_ceiling < c.default_max_stores {
            return Err(crate::Error::ConfigError(format!(
                "curation.max_stores_ceiling ({}) is below default_max_stores ({})",
                c.max_stores_ceiling, c.default_max_stores
            )));
        }
        crate::profile::WhiteLabelSettings::from(&self.branding)
            .validate()
            .map_err(|e| crate::Error::ConfigError(format!("branding: {}", e)))?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurationConfig {
    /// Stores per category a new profile starts with
    #[serde(default = "default_max_stores")]
    pub default_max_stores: usize,

    /// Upper bound the shell clamps user-entered limits to
    #[serde(default = "default_max_stores_ceiling")]
    pub max_stores_ceiling: usize,

    /// How many better-rated alternatives a company detail shows
    #[serde(default = "default_alternatives_limit")]
    pub alternatives_limit: usize,

    /// How many companies the home highlights show
    #[serde(default = "default_top_companies_limit")]
    pub top_companies_limit: usize,

    /// Dollars recorded when a logged-in user adds a store
    #[serde(default = "default_new_store_spend")]
    pub new_store_spend: u64,

    /// Notifications shown before the user asks for all of them
    #[serde(default = "default_notification_preview")]
    pub notification_preview: usize,

    /// Load categories from this JSON file instead of the bundled catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_path: Option<PathBuf>,
}

fn default_max_stores() -> usize {
    3
}

fn default_max_stores_ceiling() -> usize {
    10
}

fn default_alternatives_limit() -> usize {
    3
}

fn default_top_companies_limit() -> usize {
    3
}

fn default_new_store_spend() -> u64 {
    100
}

fn default_notification_preview() -> usize {
    2
}

impl Default for CurationConfig {
    fn default() -> Self {
        Self {
            default_max_stores: default_max_stores(),
            max_stores_ceiling: default_max_stores_ceiling(),
            alternatives_limit: default_alternatives_limit(),
            top_companies_limit: default_top_companies_limit(),
            new_store_spend: default_new_store_spend(),
            notification_preview: default_notification_preview(),
            catalog_path: None,
        }
    }
}

impl CurationConfig {
    /// Clamp a user-entered limit into `1..=max_stores_ceiling`
    pub fn clamp_limit(&self, requested: usize) -> usize {
        requested.clamp(1, self.max_stores_ceiling.max(1))
    }
}

/// White-label defaults a new session starts with
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandingConfig {
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// `#rrggbb`
    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_mantra")]
    pub mantra: String,
}

fn default_app_name() -> String {
    "VoteWallet".to_string()
}

fn default_color() -> String {
    "#14b8a6".to_string()
}

fn default_mantra() -> String {
    "Shop your politics. Spend your values.".to_string()
}

impl Default for BrandingConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            color: default_color(),
            mantra: default_mantra(),
        }
    }
}
