//! Clip compilation: turn cleaned frame sequences into video clips.
//!
//! Runs after [`clean`](crate::clean). Every immediate subdirectory of the
//! source is one capture session and becomes one clip; the surviving frames
//! are read in name order, so they must be sequentially numbered.
//!
//! ```text
//! frames/                 clips/
//! ├── 01/*.png      →     ├── 01.mp4
//! ├── 02/*.png      →     ├── 02.mp4
//! └── 03/*.png      →     ├── 03.mp4
//!                         └── 03_pad.mp4   # last frame of 03, held
//! ```
//!
//! The padding clip repeats the final frame of the last session at 1 fps so an
//! edited timelapse can end on a still.
//!
//! The module is split into:
//! - **Parameters**: [`EncodeParams`], the ffmpeg argument list
//! - **Encoder**: [`ClipEncoder`] trait + [`FfmpegEncoder`]

pub mod encoder;
pub mod ffmpeg;
mod params;

pub use encoder::{ClipEncoder, EncodeError};
pub use ffmpeg::FfmpegEncoder;
pub use params::EncodeParams;

use crate::config::CompileConfig;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("The specified source does not exist ({0})")]
    SourceNotFound(PathBuf),
    #[error("The specified source is not a directory ({0})")]
    SourceNotADirectory(PathBuf),
    #[error("The specified destination is not a directory ({0})")]
    DestinationNotADirectory(PathBuf),
    #[error(
        "The specified destination directory could not be created because of missing parents ({0})"
    )]
    DestinationMissingParent(PathBuf),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Permission denied on {path}: {source}")]
    Permission {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

impl CompileError {
    fn io(path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        if source.kind() == io::ErrorKind::PermissionDenied {
            CompileError::Permission { path, source }
        } else {
            CompileError::Io { path, source }
        }
    }
}

/// Options for one compile run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub framerate: u32,
    pub crf: u32,
    /// Number of copies of the final frame in the padding clip.
    pub pad_frames: u32,
    pub skip_pad_clip: bool,
}

impl CompileOptions {
    /// Options for `source` with every other value taken from config.
    pub fn from_config(source: PathBuf, config: &CompileConfig) -> Self {
        Self {
            source,
            destination: config.destination.clone(),
            framerate: config.framerate,
            crf: config.crf,
            pad_frames: config.pad_frames,
            skip_pad_clip: false,
        }
    }
}

/// Outcome of a compile run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileReport {
    /// Clips the encoder reported as written, in encode order.
    pub clips: Vec<PathBuf>,
    /// Clips the encoder failed on.
    pub failed: Vec<PathBuf>,
}

/// Encode one clip per sequence directory, plus the padding clip.
pub fn compile(
    options: &CompileOptions,
    encoder: &impl ClipEncoder,
) -> Result<CompileReport, CompileError> {
    verify_source(&options.source)?;
    verify_destination(&options.destination)?;

    let mut report = CompileReport::default();
    let mut last_sequence = None;

    for sequence in sequence_directories(&options.source, &options.destination)? {
        let Some(name) = sequence.file_name() else {
            continue;
        };
        let target = options
            .destination
            .join(format!("{}.mp4", name.to_string_lossy()));
        info!(
            "Preparing clip for {} - destination {}",
            sequence.display(),
            target.display()
        );
        encode_clip(
            encoder,
            &sequence,
            options.framerate,
            options.crf,
            target,
            &mut report,
        )?;
        last_sequence = Some(sequence);
    }

    if let Some(sequence) = last_sequence.filter(|_| !options.skip_pad_clip) {
        prepare_padding_clip(encoder, &sequence, options, &mut report)?;
    }

    Ok(report)
}

fn verify_source(source: &Path) -> Result<(), CompileError> {
    if !source.exists() {
        return Err(CompileError::SourceNotFound(source.to_path_buf()));
    }
    if !source.is_dir() {
        return Err(CompileError::SourceNotADirectory(source.to_path_buf()));
    }
    Ok(())
}

fn verify_destination(destination: &Path) -> Result<(), CompileError> {
    if destination.exists() {
        if !destination.is_dir() {
            return Err(CompileError::DestinationNotADirectory(
                destination.to_path_buf(),
            ));
        }
        return Ok(());
    }
    fs::create_dir(destination).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => {
            CompileError::DestinationMissingParent(destination.to_path_buf())
        }
        _ => CompileError::io(destination, source),
    })
}

/// Subdirectories of `source` in name order, excluding `destination`.
fn sequence_directories(source: &Path, destination: &Path) -> Result<Vec<PathBuf>, CompileError> {
    let destination = fs::canonicalize(destination).ok();
    let mut dirs = Vec::new();
    for entry in fs::read_dir(source).map_err(|e| CompileError::io(source, e))? {
        let path = entry.map_err(|e| CompileError::io(source, e))?.path();
        if !path.is_dir() {
            continue;
        }
        if destination.is_some() && fs::canonicalize(&path).ok() == destination {
            continue;
        }
        dirs.push(path);
    }
    dirs.sort();
    Ok(dirs)
}

fn encode_clip(
    encoder: &impl ClipEncoder,
    frames_dir: &Path,
    framerate: u32,
    crf: u32,
    target: PathBuf,
    report: &mut CompileReport,
) -> Result<(), CompileError> {
    if target.exists() {
        fs::remove_file(&target).map_err(|e| CompileError::io(&target, e))?;
    }
    let params = EncodeParams {
        input_pattern: format!("{}/*.png", frames_dir.display()),
        framerate,
        crf,
        output: target,
    };
    match encoder.encode(&params) {
        Ok(()) => report.clips.push(params.output),
        Err(EncodeError::Failed { status, stderr }) => {
            warn!(
                "Clip {} failed ({status}): {stderr}",
                params.output.display()
            );
            report.failed.push(params.output);
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

/// Hold the last frame of `sequence` for `pad_frames` frames at 1 fps.
fn prepare_padding_clip(
    encoder: &impl ClipEncoder,
    sequence: &Path,
    options: &CompileOptions,
    report: &mut CompileReport,
) -> Result<(), CompileError> {
    let Some(last_frame) = last_png(sequence)? else {
        warn!(
            "No frames in {}, skipping padding clip",
            sequence.display()
        );
        return Ok(());
    };
    let name = sequence
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let target = options.destination.join(format!("{name}_pad.mp4"));

    let temp_dir = tempfile::TempDir::new().map_err(|e| CompileError::io(sequence, e))?;
    let width = options.pad_frames.saturating_sub(1).to_string().len().max(2);
    for i in 0..options.pad_frames {
        let copy = temp_dir.path().join(format!("{i:0width$}.png"));
        fs::copy(&last_frame, &copy).map_err(|e| CompileError::io(&copy, e))?;
    }

    info!(
        "Preparing pad clip from {} - destination: {}",
        sequence.display(),
        target.display()
    );
    encode_clip(encoder, temp_dir.path(), 1, options.crf, target, report)
}

/// The name-order last `*.png` in `dir`.
fn last_png(dir: &Path) -> Result<Option<PathBuf>, CompileError> {
    let mut last: Option<PathBuf> = None;
    for entry in fs::read_dir(dir).map_err(|e| CompileError::io(dir, e))? {
        let path = entry.map_err(|e| CompileError::io(dir, e))?.path();
        let is_png = path.is_file() && path.extension().is_some_and(|e| e == "png");
        if is_png && last.as_ref().is_none_or(|l| path > *l) {
            last = Some(path);
        }
    }
    Ok(last)
}
