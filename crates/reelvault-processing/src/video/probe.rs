//! Video stream inspection via ffprobe.

use super::aspect::AspectCategory;
use crate::command::{validate_tool_path, ToolCommand};
use crate::error::ProcessingError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

/// Pixel dimensions of the primary video stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoDimensions {
    pub width: u32,
    pub height: u32,
}

impl VideoDimensions {
    pub fn category(&self) -> AspectCategory {
        AspectCategory::from_dimensions(self.width, self.height)
    }
}

/// Extract the first video stream's dimensions from `ffprobe -print_format json` output.
pub fn parse_probe_output(stdout: &[u8]) -> Result<VideoDimensions, ProcessingError> {
    let output: ProbeOutput =
        serde_json::from_slice(stdout).map_err(|e| ProcessingError::InvalidOutput {
            tool: "ffprobe".to_string(),
            detail: e.to_string(),
        })?;

    let stream = output
        .streams
        .into_iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or(ProcessingError::NoVideoStream)?;

    match (stream.width, stream.height) {
        (Some(width), Some(height)) if width > 0 && height > 0 => {
            Ok(VideoDimensions { width, height })
        }
        (width, height) => Err(ProcessingError::InvalidDimensions {
            width: width.unwrap_or(0),
            height: height.unwrap_or(0),
        }),
    }
}

/// Format classifier backed by ffprobe.
#[derive(Debug, Clone)]
pub struct VideoProbe {
    ffprobe_path: String,
    timeout: Duration,
}

impl VideoProbe {
    pub fn new(ffprobe_path: impl Into<String>, timeout: Duration) -> Result<Self, ProcessingError> {
        let ffprobe_path = ffprobe_path.into();
        validate_tool_path(&ffprobe_path)?;
        Ok(Self {
            ffprobe_path,
            timeout,
        })
    }

    #[tracing::instrument(skip(self, path), fields(
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    pub async fn dimensions(&self, path: &Path) -> Result<VideoDimensions, ProcessingError> {
        let stdout = ToolCommand::new(&self.ffprobe_path, self.timeout)
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_streams",
                "-select_streams",
                "v:0",
            ])
            .path_arg(path)
            .run()
            .await?;

        parse_probe_output(&stdout)
    }

    /// Classify the staged file at `path` by the aspect ratio of its video stream.
    pub async fn classify(&self, path: &Path) -> Result<AspectCategory, ProcessingError> {
        let dimensions = self.dimensions(path).await?;
        let category = dimensions.category();
        tracing::info!(
            width = dimensions.width,
            height = dimensions.height,
            category = %category,
            "Video classified"
        );
        Ok(category)
    }
}
