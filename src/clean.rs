//! Frame validation walk: classify every frame and quarantine the rejects.
//!
//! Given a source directory of captured frames, [`run`] decodes each frame,
//! classifies it against the specifications (see
//! [`classify`](crate::specification::classify)) and disposes of rejected
//! frames by moving them into a rejection directory or deleting them.
//!
//! ## Directory layout
//!
//! ```text
//! frames/                     # source
//! ├── 000001.png              # processed first, in name order
//! ├── 000002.png
//! ├── 01/                     # with check_children: processed after the
//! │   ├── 000001.png          #   direct frames, one level deep only
//! │   └── 000002.png
//! └── 02/
//!     └── 000001.png
//!
//! rejected/                   # destination
//! ├── 000002.png              # reject from frames/
//! └── 01/
//!     └── 000001.png          # reject from frames/01/
//! ```
//!
//! ## Failure semantics
//!
//! Any frame that cannot be decoded, and any failed move or delete, aborts the
//! walk with a [`CleanError`]. Nothing is skipped silently: a corrupt frame in
//! a capture session is something the operator has to see. Configuration
//! problems (missing source, destination that is a file) are reported before
//! the first frame is touched.
//!
//! Each frame is fully moved or deleted, or left in place; a cross-device move
//! stages a copy in the destination and only removes the source once the copy
//! has been renamed into place.

use crate::imaging::{DecodeError, decode_frame};
use crate::rules::Evaluator;
use crate::specification::{Specification, classify};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum CleanError {
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
    #[error(transparent)]
    Decode(DecodeError),
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
}

impl CleanError {
    fn io(path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        if source.kind() == io::ErrorKind::PermissionDenied {
            CleanError::Permission { path, source }
        } else {
            CleanError::Io { path, source }
        }
    }

    /// True for problems with the invocation itself rather than with a frame.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            CleanError::SourceNotFound(_)
                | CleanError::SourceNotADirectory(_)
                | CleanError::DestinationNotADirectory(_)
                | CleanError::DestinationMissingParent(_)
        )
    }
}

impl From<DecodeError> for CleanError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::Io { path, source } => CleanError::io(&path, source),
            other => CleanError::Decode(other),
        }
    }
}

/// Options for a single walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanOptions {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// Also process each immediate subdirectory of `source`.
    pub check_children: bool,
    /// Delete rejected frames instead of moving them to `destination`.
    pub delete_immediately: bool,
    /// Classify and report only; never move or delete anything.
    pub dry_run: bool,
}

/// Outcome of a walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Number of frames classified.
    pub processed: usize,
    /// Original paths of rejected frames, in processing order.
    pub rejected: Vec<PathBuf>,
}

/// Walk `options.source`, classify every frame and dispose of the rejects.
pub fn run(
    options: &CleanOptions,
    specifications: &[Specification],
    eval: &Evaluator,
) -> Result<RunReport, CleanError> {
    verify_source(&options.source)?;
    if !options.delete_immediately {
        verify_destination(&options.destination, !options.dry_run)?;
    }

    let mut report = RunReport::default();
    process_directory(
        &options.source,
        &options.destination,
        options,
        specifications,
        eval,
        &mut report,
    )?;

    if options.check_children {
        for child in child_directories(&options.source)? {
            if is_same_directory(&child, &options.destination) {
                debug!("Skipping rejection directory {}", child.display());
                continue;
            }
            let Some(name) = child.file_name() else {
                continue;
            };
            let child_destination = options.destination.join(name);
            process_directory(
                &child,
                &child_destination,
                options,
                specifications,
                eval,
                &mut report,
            )?;
        }
    }

    Ok(report)
}

fn verify_source(source: &Path) -> Result<(), CleanError> {
    if !source.exists() {
        return Err(CleanError::SourceNotFound(source.to_path_buf()));
    }
    if !source.is_dir() {
        return Err(CleanError::SourceNotADirectory(source.to_path_buf()));
    }
    Ok(())
}

/// Check the destination can hold rejected frames, creating it when `create`.
fn verify_destination(destination: &Path, create: bool) -> Result<(), CleanError> {
    if destination.exists() {
        if !destination.is_dir() {
            return Err(CleanError::DestinationNotADirectory(
                destination.to_path_buf(),
            ));
        }
        return Ok(());
    }
    if !create {
        return Ok(());
    }
    fs::create_dir(destination).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => CleanError::DestinationMissingParent(destination.to_path_buf()),
        _ => CleanError::io(destination, source),
    })
}

fn process_directory(
    dir: &Path,
    destination: &Path,
    options: &CleanOptions,
    specifications: &[Specification],
    eval: &Evaluator,
    report: &mut RunReport,
) -> Result<(), CleanError> {
    for entry in list_entries(dir)? {
        let frame = entry.path();
        if !frame.is_file() {
            continue;
        }
        report.processed += 1;
        if !process_frame(frame, destination, options, specifications, eval)? {
            report.rejected.push(frame.to_path_buf());
        }
    }
    Ok(())
}

/// Classify one frame and, if rejected, dispose of it. Returns whether the
/// frame was accepted.
fn process_frame(
    frame_path: &Path,
    destination: &Path,
    options: &CleanOptions,
    specifications: &[Specification],
    eval: &Evaluator,
) -> Result<bool, CleanError> {
    let accepted = {
        let frame = decode_frame(frame_path)?;
        classify(&frame, specifications, eval)
    };
    if accepted {
        return Ok(true);
    }

    if eval.verbose {
        debug!("Bad frame detected ({})", frame_path.display());
    }
    if !options.dry_run {
        if options.delete_immediately {
            remove_frame(frame_path)?;
        } else {
            quarantine(frame_path, destination)?;
        }
    }
    Ok(false)
}

fn remove_frame(frame: &Path) -> Result<(), CleanError> {
    fs::remove_file(frame).map_err(|e| CleanError::io(frame, e))
}

/// Move a frame into `destination`, keeping its file name.
fn quarantine(frame: &Path, destination: &Path) -> Result<(), CleanError> {
    fs::create_dir_all(destination).map_err(|e| CleanError::io(destination, e))?;
    let Some(name) = frame.file_name() else {
        return Err(CleanError::io(
            frame,
            io::Error::new(io::ErrorKind::InvalidInput, "frame path has no file name"),
        ));
    };
    let target = destination.join(name);
    match fs::rename(frame, &target) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => move_across_devices(frame, &target),
        Err(e) => Err(CleanError::io(frame, e)),
    }
}

/// Copy to a hidden staging name next to `target`, rename it into place, then
/// remove the source. The frame exists in full at one location at any time.
fn move_across_devices(frame: &Path, target: &Path) -> Result<(), CleanError> {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let staging = target.with_file_name(format!(".{name}.partial"));

    if let Err(e) = fs::copy(frame, &staging) {
        let _ = fs::remove_file(&staging);
        return Err(CleanError::io(&staging, e));
    }
    fs::rename(&staging, target).map_err(|e| CleanError::io(target, e))?;
    fs::remove_file(frame).map_err(|e| CleanError::io(frame, e))
}

/// Entries directly inside `dir`, hidden entries excluded, sorted by name.
///
/// Links are not resolved here; callers check `is_file`/`is_dir` on the path,
/// which skips dangling links.
fn list_entries(dir: &Path) -> Result<Vec<DirEntry>, CleanError> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            let source = e
                .into_io_error()
                .unwrap_or_else(|| io::Error::other("filesystem loop"));
            CleanError::io(&path, source)
        })
}

fn child_directories(dir: &Path) -> Result<Vec<PathBuf>, CleanError> {
    Ok(list_entries(dir)?
        .into_iter()
        .map(DirEntry::into_path)
        .filter(|path| path.is_dir())
        .collect())
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn is_same_directory(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
