//! Board configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{CalboardError, CalboardResult};
use crate::view::DEFAULT_VISIBLE_PER_DAY;

static DEFAULT_DATA_DIR: &str = "~/calboard";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn default_id() -> i64 {
    1
}

fn default_visible_per_day() -> usize {
    DEFAULT_VISIBLE_PER_DAY
}

/// Configuration at ~/.config/calboard/config.toml, overridable with
/// `CALBOARD_*` environment variables.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BoardConfig {
    /// Where the JSON store lives.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Whose tasks, bugs and todos to show.
    #[serde(default = "default_id")]
    pub owner_id: i64,

    /// Organization owning the native events.
    #[serde(default = "default_id")]
    pub org_id: i64,

    /// Entries shown per day cell before "+N more".
    #[serde(default = "default_visible_per_day")]
    pub visible_per_day: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            data_dir: default_data_dir(),
            owner_id: default_id(),
            org_id: default_id(),
            visible_per_day: default_visible_per_day(),
        }
    }
}

impl BoardConfig {
    pub fn config_path() -> CalboardResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalboardError::Config("Could not determine config directory".into()))?
            .join("calboard");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default location, creating a commented default file on
    /// first use.
    pub fn load() -> CalboardResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from a specific file (which may be absent), then apply
    /// environment overrides.
    pub fn load_from(path: &Path) -> CalboardResult<Self> {
        let config: BoardConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("CALBOARD").try_parsing(true))
            .build()
            .map_err(|e| CalboardError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalboardError::Config(e.to_string()))?;

        if config.visible_per_day == 0 {
            return Err(CalboardError::Config(
                "visible_per_day must be at least 1".into(),
            ));
        }

        Ok(config)
    }

    /// The data directory with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();
        PathBuf::from(full_path_str)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalboardResult<()> {
        let contents = format!(
            "\
# calboard configuration

# Where tasks.json, bugs.json, todos.json and events.json live:
# data_dir = \"{}\"

# Whose tasks, bugs and todos to show:
# owner_id = 1

# Organization owning calendar events:
# org_id = 1

# Entries shown per day before collapsing into \"+N more\":
# visible_per_day = {}
",
            DEFAULT_DATA_DIR, DEFAULT_VISIBLE_PER_DAY
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalboardError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalboardError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_file_loads_as_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("calboard/config.toml");

        BoardConfig::create_default_config(&path).unwrap();
        let config = BoardConfig::load_from(&path).unwrap();

        assert_eq!(config.owner_id, 1);
        assert_eq!(config.visible_per_day, 3);
        assert_eq!(config.data_dir, PathBuf::from("~/calboard"));
    }

    #[test]
    fn test_file_values_override_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "owner_id = 12\nvisible_per_day = 5\ndata_dir = \"/srv/board\"\n")
            .unwrap();

        let config = BoardConfig::load_from(&path).unwrap();
        assert_eq!(config.owner_id, 12);
        assert_eq!(config.org_id, 1);
        assert_eq!(config.visible_per_day, 5);
        assert_eq!(config.data_path(), PathBuf::from("/srv/board"));
    }

    #[test]
    fn test_zero_cap_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "visible_per_day = 0\n").unwrap();

        assert!(matches!(
            BoardConfig::load_from(&path),
            Err(CalboardError::Config(_))
        ));
    }
}
