use thiserror::Error;

/// Main error type for the film-look library
#[derive(Error, Debug)]
pub enum FilmLookError {
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Pipeline-specific errors
///
/// Individual stage failures never show up here: a stage that cannot produce
/// an intermediate image is skipped and the running image passes through
/// unchanged. Only the terminal conversion to an encodable buffer fails hard.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Pipeline produced no output for a {width}x{height} frame")]
    NoOutput { width: u32, height: u32 },
}

/// Session-specific errors (frame loading, saving, discovery)
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Failed to load frame: {path}")]
    LoadFailed { path: String },

    #[error("Failed to save frame: {path} - {reason}")]
    SaveFailed { path: String, reason: String },

    #[error("No numbered frames found in directory: {path}")]
    NoFramesFound { path: String },

    #[error("Unsupported frame format: {format}")]
    UnsupportedFormat { format: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using FilmLookError
pub type Result<T> = std::result::Result<T, FilmLookError>;

impl FilmLookError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Check if this error is recoverable (can be retried)
    pub fn is_recoverable(&self) -> bool {
        match self {
            // IO errors might be temporary
            Self::Io(_) => true,
            // Frame loading might work on retry
            Self::Session(SessionError::LoadFailed { .. }) => true,
            // A dropped frame is recovered by processing the next one
            Self::Pipeline(PipelineError::NoOutput { .. }) => true,
            // Most other errors are permanent
            _ => false,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Session(SessionError::LoadFailed { path }) => {
                format!(
                    "Could not load image '{}'. Please check the file exists and is a supported format.",
                    path
                )
            }
            Self::Session(SessionError::NoFramesFound { path }) => {
                format!(
                    "No numbered frames (like '01_intro.png') found in '{}'.",
                    path
                )
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            Self::Pipeline(PipelineError::NoOutput { .. }) => {
                "The pipeline produced no output for this frame; it was skipped.".to_string()
            }
            _ => self.to_string(),
        }
    }
}
