use thiserror::Error;

/// Main error type for the underwater enhancer library
#[derive(Error, Debug)]
pub enum EnhanceError {
    #[error("Filter error: {0}")]
    Filter(#[from] FilterError),

    #[error("Video processing error: {0}")]
    Video(#[from] VideoError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Parameter error: {0}")]
    Param(#[from] ParamError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Filter-stage errors
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Stage '{stage}' changed frame size from {expected:?} to {actual:?}")]
    SizeMismatch {
        stage: String,
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

/// Video-specific errors
#[derive(Error, Debug)]
pub enum VideoError {
    #[error("Failed to open video source: {path}")]
    OpenFailed { path: String },

    #[error("Failed to probe video metadata for {path}: {reason}")]
    ProbeFailed { path: String, reason: String },

    #[error("ffmpeg not found. Please install ffmpeg and make sure it is on PATH")]
    FfmpegMissing,

    #[error("Video decoding failed: {reason}")]
    DecodingFailed { reason: String },

    #[error("Video encoding failed: {reason}")]
    EncodingFailed { reason: String },

    #[error("Failed to create output video: {path}")]
    CreateOutputFailed { path: String },

    #[error("Video stream has no frames")]
    EmptyStream,

    #[error("Frame size {actual:?} does not match stream size {expected:?}")]
    FrameSizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

/// Interactive session errors
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Failed to load image: {path}")]
    ImageLoadFailed { path: String },

    #[error("No video source is open")]
    NoVideoSource,
}

/// Parameter update errors
#[derive(Error, Debug)]
pub enum ParamError {
    #[error("Value for {name} must be finite, got {value}")]
    NotFinite { name: String, value: f32 },

    #[error("Value for {name} out of range: {value} (expected {min}..={max})")]
    OutOfRange {
        name: String,
        value: f32,
        min: f32,
        max: f32,
    },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}: {reason}")]
    ParseFailed { path: String, reason: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using EnhanceError
pub type Result<T> = std::result::Result<T, EnhanceError>;

impl EnhanceError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Session(SessionError::ImageLoadFailed { path }) => {
                format!("Could not load image '{}'. Please check the file exists and is a supported format.", path)
            }
            Self::Video(VideoError::OpenFailed { path })
            | Self::Video(VideoError::ProbeFailed { path, .. }) => {
                format!("Could not open video '{}'. Please check the file exists and ffmpeg can read it.", path)
            }
            Self::Video(VideoError::FfmpegMissing) => {
                "ffmpeg and ffprobe are required for video playback and export.".to_string()
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}
