//! Frame rules: the predicates a specification is built from.
//!
//! A rule is one of a closed set of checks against a single decoded frame.
//! Rules are parsed eagerly from their JSON form, so an unknown `type`, a
//! missing field, a negative size or an unresolvable colour is reported when
//! the specification is loaded, never during a walk.
//!
//! ```json
//! { "type": "size", "name": "full window", "width": 1920, "height": 1080 }
//! { "type": "pixel_colour", "name": "title bar", "x": 10, "y": 4, "colour": "#2d2d2d" }
//! { "type": "pixel_not_colour", "name": "no dialog", "x": 600, "y": 400, "colour": "white" }
//! { "type": "or", "name": "either theme", "rules": [ ... ] }
//! ```
//!
//! ## Out-of-bounds pixels
//!
//! A pixel rule whose coordinate falls outside the frame never matches. This
//! holds for `pixel_not_colour` too: a missing pixel is not treated as "some
//! other colour", so a frame smaller than expected is rejected by either kind.

use crate::colour::Colour;
use crate::imaging::Frame;
use serde::Deserialize;
use tracing::debug;

/// Evaluation settings threaded through rule, specification and frame checks.
///
/// With `verbose` set, every failing rule logs a one-line diagnostic naming
/// it. The diagnostics never change a result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Evaluator {
    pub verbose: bool,
}

impl Evaluator {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

/// A single check against a frame.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Rule {
    /// Frame dimensions equal `width` x `height` exactly.
    Size {
        #[serde(default)]
        name: Option<String>,
        width: u32,
        height: u32,
    },
    /// The pixel at `(x, y)` is exactly `colour`.
    #[serde(alias = "pixel_color")]
    PixelColour {
        #[serde(default)]
        name: Option<String>,
        x: i64,
        y: i64,
        #[serde(alias = "color")]
        colour: Colour,
    },
    /// The pixel at `(x, y)` exists and is not `colour`.
    #[serde(alias = "pixel_not_color")]
    PixelNotColour {
        #[serde(default)]
        name: Option<String>,
        x: i64,
        y: i64,
        #[serde(alias = "color")]
        colour: Colour,
    },
    /// At least one sub-rule matches. Empty never matches.
    Or {
        #[serde(default)]
        name: Option<String>,
        rules: Vec<Rule>,
    },
}

impl Rule {
    /// Diagnostic name; carries no meaning for evaluation.
    pub fn name(&self) -> Option<&str> {
        match self {
            Rule::Size { name, .. }
            | Rule::PixelColour { name, .. }
            | Rule::PixelNotColour { name, .. }
            | Rule::Or { name, .. } => name.as_deref(),
        }
    }

    fn label(&self) -> &str {
        self.name().unwrap_or("unnamed")
    }

    /// Evaluate this rule against `frame`.
    pub fn matches<F: Frame + ?Sized>(&self, frame: &F, eval: &Evaluator) -> bool {
        match self {
            Rule::Size { width, height, .. } => {
                let (w, h) = frame.dimensions();
                let matched = w == *width && h == *height;
                if !matched && eval.verbose {
                    debug!(
                        "Size rule broken ({}) (image is ({w}, {h}), rule requires ({width}, {height}))",
                        self.label()
                    );
                }
                matched
            }
            Rule::PixelColour { x, y, colour, .. } => match self.sample(frame, *x, *y, eval) {
                Some(pixel) => {
                    let matched = pixel == colour.rgb();
                    if !matched && eval.verbose {
                        debug!(
                            "Colour rule broken ({}) (pixel is {}, rule requires {colour})",
                            self.label(),
                            Colour(pixel)
                        );
                    }
                    matched
                }
                None => false,
            },
            Rule::PixelNotColour { x, y, colour, .. } => match self.sample(frame, *x, *y, eval) {
                Some(pixel) => {
                    let matched = pixel != colour.rgb();
                    if !matched && eval.verbose {
                        debug!(
                            "Inverse colour rule broken ({}) (pixel is {colour})",
                            self.label()
                        );
                    }
                    matched
                }
                None => false,
            },
            Rule::Or { rules, .. } => {
                let matched = rules.iter().any(|rule| rule.matches(frame, eval));
                if !matched && eval.verbose {
                    debug!("Or rule broken ({})", self.label());
                }
                matched
            }
        }
    }

    fn sample<F: Frame + ?Sized>(
        &self,
        frame: &F,
        x: i64,
        y: i64,
        eval: &Evaluator,
    ) -> Option<image::Rgb<u8>> {
        let pixel = frame.pixel(x, y);
        if pixel.is_none() && eval.verbose {
            let (w, h) = frame.dimensions();
            debug!(
                "Pixel rule out of bounds ({}) (({x}, {y}) outside {w}x{h} frame)",
                self.label()
            );
        }
        pixel
    }
}
