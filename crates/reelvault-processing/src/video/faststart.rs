//! Fast-start remux: moves the MP4 index to the front without re-encoding.

use crate::command::{validate_tool_path, ToolCommand};
use crate::error::ProcessingError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Appended to the staged file name to form the remux output.
pub const REMUX_SUFFIX: &str = ".processing";

pub fn remuxed_path_for(input: &Path) -> PathBuf {
    let mut name: OsString = input.as_os_str().to_owned();
    name.push(REMUX_SUFFIX);
    PathBuf::from(name)
}

#[derive(Debug, Clone)]
pub struct FastStartRemuxer {
    ffmpeg_path: String,
    timeout: Duration,
}

impl FastStartRemuxer {
    pub fn new(ffmpeg_path: impl Into<String>, timeout: Duration) -> Result<Self, ProcessingError> {
        let ffmpeg_path = ffmpeg_path.into();
        validate_tool_path(&ffmpeg_path)?;
        Ok(Self {
            ffmpeg_path,
            timeout,
        })
    }

    /// Remux `input` into a sibling file and return its path.
    ///
    /// Streams are copied as-is and container metadata is preserved. The
    /// caller owns both files; nothing here deletes them.
    #[tracing::instrument(skip(self, input), fields(
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "faststart"
    ))]
    pub async fn remux(&self, input: &Path) -> Result<PathBuf, ProcessingError> {
        let output = remuxed_path_for(input);

        ToolCommand::new(&self.ffmpeg_path, self.timeout)
            .args(["-hide_banner", "-loglevel", "error", "-y", "-i"])
            .path_arg(input)
            .args([
                "-movflags",
                "faststart",
                "-map_metadata",
                "0",
                "-codec",
                "copy",
                "-f",
                "mp4",
            ])
            .path_arg(&output)
            .run()
            .await?;

        if !tokio::fs::try_exists(&output).await.unwrap_or(false) {
            return Err(ProcessingError::InvalidOutput {
                tool: "ffmpeg".to_string(),
                detail: "remux reported success but wrote no output".to_string(),
            });
        }

        Ok(output)
    }
}
