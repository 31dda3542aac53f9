use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ScaffoldError {
    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Embedding model not found: {provider}/{model}")]
    ModelNotFound { provider: String, model: String },

    #[error("Incompatible embedding configuration: {0}")]
    Compatibility(String),

    #[error("Render error in {artifact}: {message}")]
    Render { artifact: String, message: String },

    #[error("Directory already exists: {}", .0.display())]
    DirectoryExists(PathBuf),

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScaffoldError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub(crate) fn invalid_name(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidName { name: name.to_string(), reason: reason.into() }
    }

    /// Pipeline stage that produced this error.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::InvalidName { .. } | Self::Validation(_) | Self::Config(_) => "validation",
            Self::ModelNotFound { .. } | Self::Compatibility(_) => "embedding",
            Self::Render { .. } => "render",
            Self::DirectoryExists(_) | Self::Io { .. } => "filesystem",
        }
    }
}

pub type Result<T> = std::result::Result<T, ScaffoldError>;
