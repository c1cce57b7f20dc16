//! Clip encoder trait.
//!
//! The production implementation is
//! [`FfmpegEncoder`](super::ffmpeg::FfmpegEncoder), which shells out to an
//! external ffmpeg. Tests use a recording mock instead.

use super::params::EncodeParams;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EncodeError {
    /// The encoder program could not be started at all.
    #[error("could not run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// The encoder ran and reported failure for this clip.
    #[error("encoder exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
}

/// Encodes one clip from a sequence of frames.
pub trait ClipEncoder {
    fn encode(&self, params: &EncodeParams) -> Result<(), EncodeError>;
}
