//! Parameters for a clip encode.
//!
//! These describe *what* to encode; the [`encoder`](super::encoder) decides
//! how.

use std::ffi::OsString;
use std::path::PathBuf;

/// One encode: a glob of numbered frames in, one H.264 clip out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeParams {
    /// Glob matching the input frames, e.g. `frames/01/*.png`.
    pub input_pattern: String,
    pub framerate: u32,
    /// x264 constant rate factor.
    pub crf: u32,
    pub output: PathBuf,
}

impl EncodeParams {
    /// ffmpeg arguments for this encode.
    ///
    /// Frames are read in glob order. Odd dimensions are padded up to even
    /// ones, which yuv420p requires.
    pub fn ffmpeg_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = [
            "-framerate".to_string(),
            self.framerate.to_string(),
            "-pattern_type".to_string(),
            "glob".to_string(),
            "-i".to_string(),
            self.input_pattern.clone(),
            "-c:v".to_string(),
            "libx264".to_string(),
            "-profile:v".to_string(),
            "high".to_string(),
            "-crf".to_string(),
            self.crf.to_string(),
            "-pix_fmt".to_string(),
            "yuv420p".to_string(),
            "-vf".to_string(),
            "pad=ceil(iw/2)*2:ceil(ih/2)*2".to_string(),
        ]
        .into_iter()
        .map(OsString::from)
        .collect();
        args.push(self.output.clone().into_os_string());
        args
    }
}
