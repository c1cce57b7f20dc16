//! # Timelapse
//!
//! Post-capture tooling for window timelapses. A capture session leaves a
//! directory of numbered screenshots; some of them show the wrong window, a
//! dialog, or a half-drawn screen. This crate finds those frames, moves them
//! aside, and compiles what is left into video clips.
//!
//! # Pipeline
//!
//! ```text
//! 1. Clean     frames/  →  frames/ + rejected/   (validate every frame against specifications)
//! 2. Compile   frames/  →  clips/                (one clip per session directory)
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`colour`] | Colour strings (`"red"`, `"#ff0000"`, `"rgb(255, 0, 0)"`) to RGB |
//! | [`imaging`] | The [`Frame`](imaging::Frame) pixel accessor and frame decoding |
//! | [`rules`] | Declarative frame rules and their evaluation |
//! | [`specification`] | Named rule sets, loading them, and the frame classifier |
//! | [`clean`] | Walks a frame directory and deletes or quarantines rejected frames |
//! | [`compile`] | Encodes session directories into clips through ffmpeg |
//! | [`config`] | `config.toml` loading and the config directory layout |
//! | [`output`] | CLI output formatting |
//!
//! # Specifications
//!
//! A frame is kept when it satisfies **any** of the specifications given for a
//! run, and a specification is satisfied when **all** of its rules hold:
//!
//! ```json
//! {
//!   "name": "editor",
//!   "rules": [
//!     {"type": "size", "name": "window", "width": 1280, "height": 720},
//!     {"type": "or", "name": "theme", "rules": [
//!       {"type": "pixel_colour", "x": 4, "y": 4, "colour": "#1e1e1e"},
//!       {"type": "pixel_colour", "x": 4, "y": 4, "colour": "white"}
//!     ]},
//!     {"type": "pixel_not_colour", "x": 640, "y": 360, "colour": "red"}
//!   ]
//! }
//! ```
//!
//! Rule evaluation is pure: a frame is only read, and every run with the same
//! inputs gives the same verdict. Diagnostics are controlled by an explicit
//! [`rules::Evaluator`] value passed down from the CLI's `--debug` flag.

pub mod clean;
pub mod colour;
pub mod compile;
pub mod config;
pub mod imaging;
pub mod output;
pub mod rules;
pub mod specification;

#[cfg(test)]
pub(crate) mod test_helpers;
