//! ffmpeg-backed clip encoder.

use super::encoder::{ClipEncoder, EncodeError};
use super::params::EncodeParams;
use std::process::{Command, Stdio};
use tracing::debug;

/// Runs an external ffmpeg once per clip.
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    program: String,
}

impl FfmpegEncoder {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl ClipEncoder for FfmpegEncoder {
    fn encode(&self, params: &EncodeParams) -> Result<(), EncodeError> {
        let args = params.ffmpeg_args();
        debug!("Running {} {:?}", self.program, args);
        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| EncodeError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(EncodeError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}
