//! Shared test utilities for the timelapse test suite.
//!
//! Frames are generated at test time with the `image` crate so fixtures never
//! drift from what the decoder actually sees.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_frame(&tmp.path().join("000001.png"), 100, 100, WHITE);
//! let specs = [spec("square", vec![size(100, 100)])];
//! ```

use image::{Rgb, RgbImage};
use std::path::Path;

use crate::colour::Colour;
use crate::rules::Rule;
use crate::specification::Specification;

pub const WHITE: [u8; 3] = [255, 255, 255];
pub const RED: [u8; 3] = [255, 0, 0];
pub const BLUE: [u8; 3] = [0, 0, 255];

// =========================================================================
// Frame fixtures
// =========================================================================

/// Write a solid-colour PNG frame, creating parent directories.
pub fn write_frame(path: &Path, width: u32, height: u32, fill: [u8; 3]) {
    write_frame_with_origin(path, width, height, fill, fill);
}

/// Write a PNG frame whose pixel (0, 0) differs from the rest.
pub fn write_frame_with_origin(
    path: &Path,
    width: u32,
    height: u32,
    fill: [u8; 3],
    origin: [u8; 3],
) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let mut frame = RgbImage::from_pixel(width, height, Rgb(fill));
    frame.put_pixel(0, 0, Rgb(origin));
    frame.save(path).unwrap();
}

/// Sorted file names directly inside `dir`; empty if `dir` does not exist.
pub fn file_names(dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .map(|e| e.unwrap())
        .filter(|e| e.path().is_file())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

// =========================================================================
// Rule and specification builders
// =========================================================================

pub fn spec(name: &str, rules: Vec<Rule>) -> Specification {
    Specification {
        name: name.to_string(),
        rules,
    }
}

pub fn size(width: u32, height: u32) -> Rule {
    Rule::Size {
        name: Some(format!("{width}x{height}")),
        width,
        height,
    }
}

pub fn pixel_not_colour(x: i64, y: i64, [r, g, b]: [u8; 3]) -> Rule {
    Rule::PixelNotColour {
        name: Some(format!("not ({r}, {g}, {b}) at ({x}, {y})")),
        x,
        y,
        colour: Colour::new(r, g, b),
    }
}

/// The two alternative profiles used across walker tests: "exactly 100x100"
/// or "origin is not red".
pub fn square_or_clean_origin() -> Vec<Specification> {
    vec![
        spec("square", vec![size(100, 100)]),
        spec("clean origin", vec![pixel_not_colour(0, 0, RED)]),
    ]
}
