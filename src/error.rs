use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrefError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },

    #[error("Filename does not match the verified-results pattern: {filename} ({reason})")]
    InvalidFilenamePattern { filename: String, reason: String },

    #[error("Multiple source files map to {target}: {}", sources.join(", "))]
    NameCollision { target: String, sources: Vec<String> },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CrefError {
    /// Process exit code reported by the binary for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CrefError::InvalidPath { .. } => 3,
            CrefError::Parse { .. } => 4,
            CrefError::InvalidFilenamePattern { .. } => 5,
            CrefError::NameCollision { .. } => 6,
            CrefError::Config { .. } => 7,
            CrefError::Io(_) | CrefError::Read { .. } => 1,
        }
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for CrefError {
    fn user_message(&self) -> String {
        match self {
            CrefError::Io(e) => format!("File operation failed: {}", e),
            CrefError::Read { path, source } => {
                format!("Could not read {}: {}", path.display(), source)
            }
            CrefError::Parse { path, source } => {
                format!(
                    "Malformed JSON in {} (line {}, column {})",
                    path.display(),
                    source.line(),
                    source.column()
                )
            }
            CrefError::InvalidPath { path } => format!("Invalid path: {}", path),
            CrefError::InvalidFilenamePattern { filename, reason } => {
                format!("Cannot derive a book name from {}: {}", filename, reason)
            }
            CrefError::NameCollision { target, sources } => {
                format!(
                    "{} source files would be written to {}: {}",
                    sources.len(),
                    target,
                    sources.join(", ")
                )
            }
            CrefError::Config { message } => format!("Configuration error: {}", message),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            CrefError::Parse { .. } => Some(
                "Fix or remove the malformed file, or rerun with --keep-going to skip files that fail to parse.".to_string()
            ),
            CrefError::InvalidPath { .. } => Some(
                "Check that the directory exists and that you are running from the data directory.".to_string()
            ),
            CrefError::InvalidFilenamePattern { .. } => Some(
                "Source files must be named <prefix>-<book>_verified_results.json (e.g., 40-Matt_verified_results.json).".to_string()
            ),
            CrefError::NameCollision { .. } => Some(
                "Remove the duplicate source files, or use --on-collision overwrite|skip to choose a winner.".to_string()
            ),
            CrefError::Config { .. } => Some(
                "Check your configuration file syntax, or regenerate one with --generate-config.".to_string()
            ),
            CrefError::Read { .. } => Some(
                "Check that the file exists and that you have permission to read it.".to_string()
            ),
            CrefError::Io(_) => None,
        }
    }
}

impl From<toml::de::Error> for CrefError {
    fn from(error: toml::de::Error) -> Self {
        CrefError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CrefError>;
