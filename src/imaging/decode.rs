//! Frame decoding.

use image::{DynamicImage, ImageReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("cannot open frame {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot decode frame {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl DecodeError {
    pub fn path(&self) -> &Path {
        match self {
            DecodeError::Io { path, .. } | DecodeError::Image { path, .. } => path,
        }
    }
}

/// Load and decode a frame from disk.
///
/// The format is sniffed from the file contents, so frames without an
/// extension (or with the wrong one) still decode.
pub fn decode_frame(path: &Path) -> Result<DynamicImage, DecodeError> {
    let io_err = |source| DecodeError::Io {
        path: path.to_path_buf(),
        source,
    };
    ImageReader::open(path)
        .map_err(io_err)?
        .with_guessed_format()
        .map_err(io_err)?
        .decode()
        .map_err(|source| DecodeError::Image {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::Frame;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    #[test]
    fn decodes_png_without_extension() {
        let tmp = TempDir::new().unwrap();
        let png = tmp.path().join("frame.png");
        RgbImage::from_pixel(7, 5, Rgb([9, 8, 7])).save(&png).unwrap();
        let bare = tmp.path().join("frame");
        std::fs::rename(&png, &bare).unwrap();

        let frame = decode_frame(&bare).unwrap();
        assert_eq!(Frame::dimensions(&frame), (7, 5));
        assert_eq!(frame.pixel(6, 4), Some(Rgb([9, 8, 7])));
    }

    #[test]
    fn garbage_is_an_image_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("000001.png");
        std::fs::write(&path, "definitely not a png").unwrap();

        let err = decode_frame(&path).unwrap_err();
        assert!(matches!(err, DecodeError::Image { .. }));
        assert_eq!(err.path(), path);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let tmp = TempDir::new().unwrap();
        let err = decode_frame(&tmp.path().join("gone.png")).unwrap_err();
        assert!(matches!(err, DecodeError::Io { .. }));
    }
}
