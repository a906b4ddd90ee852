use thiserror::Error;

#[derive(Error, Debug)]
pub enum RemovalError {
    #[error("Invalid input: image must be at least 1x1, got {width}x{height}")]
    InvalidInput { width: u32, height: u32 },

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Failed to discover input files: {0}")]
    Discovery(String),

    #[error("Invalid file name: {0}")]
    InvalidFileName(String),

    #[error("Output {output} collides with {claimed_by}")]
    OutputCollision { output: String, claimed_by: String },

    #[error("Failed to write report: {0}")]
    Report(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RemovalError {
    /// Stable identifier recorded in batch reports
    pub fn code(&self) -> &'static str {
        match self {
            RemovalError::InvalidInput { .. } => "INVALID_INPUT",
            RemovalError::Decode(_) => "DECODE_ERROR",
            RemovalError::Encode(_) => "ENCODE_ERROR",
            RemovalError::Discovery(_) => "DISCOVERY_ERROR",
            RemovalError::InvalidFileName(_) => "INVALID_FILE_NAME",
            RemovalError::OutputCollision { .. } => "OUTPUT_COLLISION",
            RemovalError::Report(_) => "REPORT_ERROR",
            RemovalError::Io(_) => "IO_ERROR",
        }
    }
}
