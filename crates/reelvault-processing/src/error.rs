use reelvault_core::AppError;
use thiserror::Error;

/// Failures of the external media tools.
///
/// Display strings are safe to hand to clients: tools are named by file name
/// only and diagnostics have staging paths redacted before they get here.
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("invalid tool path: {0}")]
    InvalidToolPath(String),

    #[error("{tool} is not installed or not executable")]
    ToolNotFound { tool: String },

    #[error("failed to start {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} did not finish within {secs}s")]
    TimedOut { tool: String, secs: u64 },

    #[error("{tool} exited with {status}: {stderr}")]
    Failed {
        tool: String,
        status: String,
        stderr: String,
    },

    #[error("{tool} produced unusable output: {detail}")]
    InvalidOutput { tool: String, detail: String },

    #[error("no video stream found in file")]
    NoVideoStream,

    #[error("invalid video dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

impl From<ProcessingError> for AppError {
    fn from(err: ProcessingError) -> Self {
        AppError::Processing(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelvault_core::ErrorMetadata;

    #[test]
    fn failed_tool_maps_to_processing_with_stderr() {
        let err = ProcessingError::Failed {
            tool: "ffmpeg".to_string(),
            status: "status 1".to_string(),
            stderr: "<staging>/a.mp4: moov atom not found".to_string(),
        };
        let app: AppError = err.into();
        assert_eq!(app.error_code(), "PROCESSING_ERROR");
        assert!(app.client_message().contains("moov atom not found"));
        assert!(app.client_message().contains("ffmpeg exited with status 1"));
    }
}
