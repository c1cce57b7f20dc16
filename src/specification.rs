//! Frame specifications and the frame classifier.
//!
//! A [`Specification`] is one acceptable frame profile: a named list of
//! [`Rule`]s that must all hold. A run takes several specifications as
//! alternatives, and [`classify`] accepts a frame when any one of them holds.
//!
//! ## Locating specification files
//!
//! A specification identifier is either a path to a JSON file or the bare
//! name of a file in the user's framespec directory:
//!
//! ```text
//! timelapse clean ./specs/editor.json frames/   # direct path
//! timelapse clean editor frames/                # <config-root>/timelapse/framespecs/editor.json
//! ```
//!
//! A direct path that exists always wins.

use crate::config;
use crate::imaging::Frame;
use crate::rules::{Evaluator, Rule};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum SpecError {
    #[error("The specification file does not exist ({0})")]
    NotFound(PathBuf),
    #[error("Cannot read specification {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid specification {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A named set of rules combined with AND.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Specification {
    pub name: String,
    pub rules: Vec<Rule>,
}

impl Specification {
    /// Parse a specification from its JSON document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// True when every rule matches. A specification without rules matches
    /// every frame.
    pub fn matches<F: Frame + ?Sized>(&self, frame: &F, eval: &Evaluator) -> bool {
        let passed = self.rules.iter().all(|rule| rule.matches(frame, eval));
        if !passed && eval.verbose {
            debug!("Frame broke rules for specification \"{}\"", self.name);
        }
        passed
    }
}

/// Accept a frame when at least one specification matches it.
///
/// With no specifications every frame is rejected.
pub fn classify<F: Frame + ?Sized>(
    frame: &F,
    specifications: &[Specification],
    eval: &Evaluator,
) -> bool {
    specifications.iter().any(|spec| spec.matches(frame, eval))
}

/// Resolve a specification identifier to the file it names.
///
/// `identifier` is tried as a path first; otherwise it is looked up as
/// `<config_root>/timelapse/framespecs/<identifier>.json`.
pub fn resolve_path(identifier: &str, config_root: Option<&Path>) -> Result<PathBuf, SpecError> {
    let direct = PathBuf::from(identifier);
    if direct.exists() {
        return Ok(direct);
    }

    let Some(root) = config_root else {
        return Err(SpecError::NotFound(direct));
    };
    let candidate = config::framespecs_dir(root).join(format!("{identifier}.json"));
    if candidate.is_file() {
        Ok(candidate)
    } else {
        Err(SpecError::NotFound(candidate))
    }
}

/// Read and validate a single specification file.
pub fn load(path: &Path) -> Result<Specification, SpecError> {
    let content = fs::read_to_string(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => SpecError::NotFound(path.to_path_buf()),
        _ => SpecError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    Specification::from_json(&content).map_err(|source| SpecError::Invalid {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolve and load every identifier, in order. Fails on the first missing or
/// invalid specification.
pub fn load_all<S: AsRef<str>>(
    identifiers: &[S],
    config_root: Option<&Path>,
) -> Result<Vec<Specification>, SpecError> {
    identifiers
        .iter()
        .map(|id| resolve_path(id.as_ref(), config_root).and_then(|path| load(&path)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colour::Colour;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    const QUIET: Evaluator = Evaluator { verbose: false };

    fn spec(name: &str, rules: Vec<Rule>) -> Specification {
        Specification {
            name: name.into(),
            rules,
        }
    }

    fn size(width: u32, height: u32) -> Rule {
        Rule::Size {
            name: None,
            width,
            height,
        }
    }

    fn not_red_at_origin() -> Rule {
        Rule::PixelNotColour {
            name: Some("origin".into()),
            x: 0,
            y: 0,
            colour: Colour::new(255, 0, 0),
        }
    }

    // =========================================================================
    // Specification evaluation
    // =========================================================================

    #[test]
    fn empty_specification_matches_everything() {
        let empty = spec("anything", vec![]);
        assert!(empty.matches(&RgbImage::new(1, 1), &QUIET));
        assert!(empty.matches(&RgbImage::new(300, 20), &QUIET));
    }

    #[test]
    fn specification_requires_all_rules() {
        let frame = RgbImage::from_pixel(100, 100, Rgb([0, 0, 0]));
        assert!(spec("both", vec![size(100, 100), not_red_at_origin()]).matches(&frame, &QUIET));
        assert!(!spec("size", vec![size(100, 100), size(1, 1)]).matches(&frame, &QUIET));
    }

    #[test]
    fn rule_order_does_not_change_the_result() {
        let mut frame = RgbImage::from_pixel(100, 100, Rgb([0, 0, 0]));
        frame.put_pixel(0, 0, Rgb([255, 0, 0]));
        let a = spec("a", vec![size(100, 100), not_red_at_origin()]);
        let b = spec("b", vec![not_red_at_origin(), size(100, 100)]);
        assert_eq!(a.matches(&frame, &QUIET), b.matches(&frame, &QUIET));
        assert!(!a.matches(&frame, &QUIET));
    }

    // =========================================================================
    // Classifier
    // =========================================================================

    #[test]
    fn no_specifications_rejects_every_frame() {
        assert!(!classify(&RgbImage::new(1, 1), &[], &QUIET));
        assert!(!classify(&RgbImage::new(100, 100), &[], &Evaluator::new(true)));
    }

    #[test]
    fn any_specification_accepts() {
        let specs = [
            spec("square", vec![size(100, 100)]),
            spec("clean origin", vec![not_red_at_origin()]),
        ];

        let square = RgbImage::from_pixel(100, 100, Rgb([255, 0, 0]));
        assert!(classify(&square, &specs, &QUIET));

        let small_clean = RgbImage::from_pixel(50, 50, Rgb([0, 0, 255]));
        assert!(classify(&small_clean, &specs, &QUIET));

        let small_red = RgbImage::from_pixel(50, 50, Rgb([255, 0, 0]));
        assert!(!classify(&small_red, &specs, &QUIET));
    }

    #[test]
    fn classifier_accepts_through_empty_specification() {
        let specs = [spec("never", vec![size(1, 1)]), spec("always", vec![])];
        assert!(classify(&RgbImage::new(9, 9), &specs, &QUIET));
    }

    // =========================================================================
    // Loading
    // =========================================================================

    const EDITOR_SPEC: &str = r#"{
        "name": "editor",
        "rules": [
            {"type": "size", "name": "window", "width": 100, "height": 100},
            {"type": "or", "name": "theme", "rules": [
                {"type": "pixel_colour", "name": "dark", "x": 0, "y": 0, "colour": "black"},
                {"type": "pixel_colour", "name": "light", "x": 0, "y": 0, "colour": "white"}
            ]}
        ]
    }"#;

    #[test]
    fn parses_document_form() {
        let spec = Specification::from_json(EDITOR_SPEC).unwrap();
        assert_eq!(spec.name, "editor");
        assert_eq!(spec.rules.len(), 2);
        assert!(spec.matches(&RgbImage::from_pixel(100, 100, Rgb([0, 0, 0])), &QUIET));
        assert!(!spec.matches(&RgbImage::from_pixel(100, 100, Rgb([9, 9, 9])), &QUIET));
    }

    #[test]
    fn specification_without_name_is_invalid() {
        assert!(Specification::from_json(r#"{"rules": []}"#).is_err());
    }

    #[test]
    fn resolve_prefers_direct_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("direct.json");
        fs::write(&path, EDITOR_SPEC).unwrap();

        let resolved = resolve_path(path.to_str().unwrap(), Some(tmp.path())).unwrap();
        assert_eq!(resolved, path);
    }

    #[test]
    fn resolve_falls_back_to_framespecs_dir() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("timelapse/framespecs");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("editor.json"), EDITOR_SPEC).unwrap();

        let resolved = resolve_path("editor", Some(tmp.path())).unwrap();
        assert_eq!(resolved, dir.join("editor.json"));
    }

    #[test]
    fn resolve_reports_searched_config_path() {
        let tmp = TempDir::new().unwrap();
        let err = resolve_path("missing-spec", Some(tmp.path())).unwrap_err();
        match err {
            SpecError::NotFound(path) => {
                assert_eq!(path, tmp.path().join("timelapse/framespecs/missing-spec.json"))
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn resolve_without_config_root() {
        let err = resolve_path("nowhere-to-be-found", None).unwrap_err();
        assert!(matches!(err, SpecError::NotFound(p) if p == Path::new("nowhere-to-be-found")));
    }

    #[test]
    fn load_rejects_invalid_document() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.json");
        fs::write(
            &path,
            r#"{"name": "bad", "rules": [{"type": "histogram", "bins": 4}]}"#,
        )
        .unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, SpecError::Invalid { .. }));
        assert!(err.to_string().contains("bad.json"));
    }

    #[test]
    fn load_all_keeps_order() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("timelapse/framespecs");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("b.json"), r#"{"name": "second", "rules": []}"#).unwrap();
        fs::write(dir.join("a.json"), r#"{"name": "first", "rules": []}"#).unwrap();

        let specs = load_all(&["a", "b"], Some(tmp.path())).unwrap();
        let names: Vec<&str> = specs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn load_all_fails_on_first_missing() {
        let tmp = TempDir::new().unwrap();
        let result = load_all(&["absent"], Some(tmp.path()));
        assert!(matches!(result, Err(SpecError::NotFound(_))));
    }
}
