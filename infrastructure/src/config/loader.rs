//! Configuration file loader with multi-source merging

use super::error::ConfigError;
use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::PathBuf;

const APP_DIR: &str = "multisource-agent";
const PROJECT_FILES: [&str; 2] = ["multisource.toml", ".multisource.toml"];
const ENV_PREFIX: &str = "MSA_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `MSA_*` environment variables (`MSA_AGENT__MAX_ITERATIONS=5`)
    /// 2. `OPENAI_API_KEY` (mapped to `llm.api_key`)
    /// 3. Explicit config path (if provided)
    /// 4. Project root: `./multisource.toml` or `./.multisource.toml`
    /// 5. XDG config: `$XDG_CONFIG_HOME/multisource-agent/config.toml`
    /// 6. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, ConfigError> {
        Self::figment(config_path)
            .extract()
            .map_err(|e| ConfigError::Load(Box::new(e)))
    }

    /// Load defaults plus environment only (for --no-config)
    pub fn load_without_files() -> Result<FileConfig, ConfigError> {
        Self::with_env(Figment::new().merge(Serialized::defaults(FileConfig::default())))
            .extract()
            .map_err(|e| ConfigError::Load(Box::new(e)))
    }

    /// Build the merged provider chain without extracting it.
    pub fn figment(config_path: Option<&PathBuf>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(&global_path));
            }
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        Self::with_env(figment)
    }

    fn with_env(figment: Figment) -> Figment {
        figment
            .merge(
                Env::raw()
                    .only(&["OPENAI_API_KEY"])
                    .map(|_| "llm.api_key".into()),
            )
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/multisource-agent/config.toml if set,
    /// otherwise falls back to ~/.config/multisource-agent/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&PathBuf>) {
        println!("Configuration sources (in priority order):");
        println!("  [ENV  ] {}* variables, OPENAI_API_KEY", ENV_PREFIX);

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISS " };
            println!("  [{}] Explicit: {}", mark, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./multisource.toml or ./.multisource.toml");
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "     " };
            println!("  [{}] Global:  {}", mark, path.display());
        }

        println!("  [     ] Default: built-in defaults");
    }
}
