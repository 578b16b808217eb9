use thiserror::Error;

/// Errors that stop the server from starting.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Configuration parse error: {0}")]
    Config(#[from] toml::de::Error),
    #[error(transparent)]
    Core(#[from] wayfinder_core::Error),
}
