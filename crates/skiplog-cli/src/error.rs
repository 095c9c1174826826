use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("archived log not found: {}", .0.display())]
    NoArchive(PathBuf),

    #[error("failed to encode view: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to install logger: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
}

impl CliError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
