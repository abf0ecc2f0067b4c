//! Configuration errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// A setting required to serve requests is missing
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Load(#[from] Box<figment::Error>),
}
