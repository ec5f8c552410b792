use crate::{
    error::{CleanerError, CleanerResult},
    REPOCLEANER_CONFIG,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Main single-line source list
    #[serde(default = "default_sources_list")]
    pub sources_list: PathBuf,

    /// Directory holding both `*.list` and deb822 `*.sources` files
    #[serde(default = "default_sources_dir")]
    pub sources_dir: PathBuf,

    #[serde(default = "default_list_extension")]
    pub list_extension: String,

    #[serde(default = "default_deb822_extension")]
    pub deb822_extension: String,

    /// Extension a deb822 file is renamed to once disabled
    #[serde(default = "default_disabled_extension")]
    pub disabled_extension: String,

    #[serde(default = "default_apt_get")]
    pub apt_get: PathBuf,

    #[serde(default = "default_apt_cache")]
    pub apt_cache: PathBuf,

    /// Extra arguments passed after `apt-get update`
    #[serde(default)]
    pub update_args: Vec<String>,
}

impl Config {
    pub fn load(config_path: Option<&Path>) -> CleanerResult<Self> {
        let config_path = match config_path {
            Some(path) if !path.is_file() => {
                return Err(CleanerError::ConfigError(format!(
                    "config file {} does not exist",
                    path.display()
                )));
            }
            Some(path) => path.to_path_buf(),
            None => REPOCLEANER_CONFIG.clone(),
        };

        if config_path.is_file() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            log::debug!("Loaded configuration from {}", config_path.display());
            Ok(config)
        } else {
            log::debug!(
                "No configuration at {}, using defaults",
                config_path.display()
            );
            Ok(Config::default())
        }
    }

    pub fn with_sources_list(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.sources_list = path;
        }
        self
    }

    pub fn with_sources_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.sources_dir = dir;
        }
        self
    }

    /// Configuration rooted at an arbitrary `etc/apt`-like directory.
    pub fn rooted_at(apt_dir: &Path) -> Self {
        Self {
            sources_list: apt_dir.join("sources.list"),
            sources_dir: apt_dir.join("sources.list.d"),
            ..Self::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sources_list: default_sources_list(),
            sources_dir: default_sources_dir(),
            list_extension: default_list_extension(),
            deb822_extension: default_deb822_extension(),
            disabled_extension: default_disabled_extension(),
            apt_get: default_apt_get(),
            apt_cache: default_apt_cache(),
            update_args: Vec::new(),
        }
    }
}

fn default_sources_list() -> PathBuf {
    PathBuf::from("/etc/apt/sources.list")
}

fn default_sources_dir() -> PathBuf {
    PathBuf::from("/etc/apt/sources.list.d")
}

fn default_list_extension() -> String {
    "list".to_string()
}

fn default_deb822_extension() -> String {
    "sources".to_string()
}

fn default_disabled_extension() -> String {
    "deb822-disabled".to_string()
}

fn default_apt_get() -> PathBuf {
    PathBuf::from("apt-get")
}

fn default_apt_cache() -> PathBuf {
    PathBuf::from("apt-cache")
}
