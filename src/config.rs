use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ConfigColorMode {
    Auto,
    Always,
    Never,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Config {
    #[serde(default)]
    pub(crate) default_model: Option<String>,
    /// Catalog file replacing the built-in pricing
    #[serde(default)]
    pub(crate) catalog: Option<PathBuf>,
    /// Remote catalog document, cached for a day
    #[serde(default)]
    pub(crate) catalog_url: Option<String>,
    #[serde(default)]
    pub(crate) offline: bool,
    #[serde(default)]
    pub(crate) color: Option<ConfigColorMode>,
    #[serde(default)]
    pub(crate) no_color: bool,
    #[serde(default)]
    pub(crate) locale: Option<String>,
    #[serde(default)]
    pub(crate) debug: bool,
    #[serde(default)]
    pub(crate) history: Option<PathBuf>,
}

/// Result of looking for a config file. Kept apart from logging because the
/// config decides the log level.
#[derive(Debug, Default)]
pub(crate) struct ConfigLoad {
    pub(crate) config: Config,
    pub(crate) path: Option<PathBuf>,
    pub(crate) failures: Vec<(PathBuf, String)>,
}

impl ConfigLoad {
    pub(crate) fn report(&self) {
        for (path, error) in &self.failures {
            tracing::warn!(path = %path.display(), %error, "failed to parse config");
        }
        if let Some(path) = &self.path {
            tracing::info!(path = %path.display(), "loaded config");
        }
    }
}

impl Config {
    pub(crate) fn load() -> ConfigLoad {
        Self::load_from(&Self::get_config_paths())
    }

    /// First config among `paths` that parses wins
    fn load_from(paths: &[PathBuf]) -> ConfigLoad {
        let mut load = ConfigLoad::default();
        for path in paths {
            if !path.exists() {
                continue;
            }
            match Self::parse_file(path) {
                Ok(config) => {
                    load.config = config;
                    load.path = Some(path.clone());
                    return load;
                }
                Err(e) => load.failures.push((path.clone(), e)),
            }
        }
        load
    }

    fn parse_file(path: &Path) -> Result<Self, String> {
        let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
        toml::from_str(&content).map_err(|e| e.to_string())
    }

    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("mmcost").join("config.toml"));
        }

        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("mmcost").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".mmcost.toml"));
        }

        paths
    }
}
