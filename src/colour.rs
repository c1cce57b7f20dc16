//! Colour strings used by pixel rules.
//!
//! Specifications name colours the way a person writes them in a stylesheet,
//! and [`Colour::parse`] resolves every accepted form to a plain RGB triple:
//!
//! | Form | Example |
//! |---|---|
//! | Named colour (CSS, case-insensitive) | `red`, `DarkSlateGrey` |
//! | Short hex, optional alpha | `#f00`, `#f00f` |
//! | Long hex, optional alpha | `#ff0000`, `#ff0000ff` |
//! | `rgb()` with integers | `rgb(255, 0, 0)` |
//! | `rgb()` with percentages | `rgb(100%, 0%, 0%)` |
//! | `hsl()` | `hsl(0, 100%, 50%)` |
//!
//! Alpha components are accepted and discarded. Frames are compared on their
//! RGB channels only (see [`crate::imaging::Frame`]).

use image::Rgb;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColourError {
    #[error("unknown colour specifier: {0:?}")]
    Unknown(String),
    #[error("colour component out of range in {0:?}")]
    OutOfRange(String),
}

/// An opaque RGB colour resolved from a colour string.
///
/// Deserializes from any string [`Colour::parse`] accepts, so an invalid colour
/// is rejected while a specification is loaded rather than when it is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Colour(pub Rgb<u8>);

impl Colour {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self(Rgb([r, g, b]))
    }

    pub fn rgb(self) -> Rgb<u8> {
        self.0
    }

    /// Resolve a colour string to RGB.
    pub fn parse(input: &str) -> Result<Self, ColourError> {
        let spec = input.trim();
        if let Some(hex) = spec.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| ColourError::Unknown(input.to_string()));
        }

        let lower = spec.to_ascii_lowercase();
        if let Some(args) = function_args(&lower, "rgb") {
            return parse_rgb_function(args, input);
        }
        if let Some(args) = function_args(&lower, "hsl") {
            return parse_hsl_function(args, input);
        }

        NAMED_COLOURS
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|&(_, [r, g, b])| Colour::new(r, g, b))
            .ok_or_else(|| ColourError::Unknown(input.to_string()))
    }
}

impl FromStr for Colour {
    type Err = ColourError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Colour::parse(s)
    }
}

impl TryFrom<String> for Colour {
    type Error = ColourError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Colour::parse(&value)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}")
    }
}

fn parse_hex(hex: &str) -> Option<Colour> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let digit = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok();
    let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        // #rgb and #rgba: each digit is doubled
        3 | 4 => Some(Colour::new(
            digit(0)? * 17,
            digit(1)? * 17,
            digit(2)? * 17,
        )),
        6 | 8 => Some(Colour::new(pair(0)?, pair(2)?, pair(4)?)),
        _ => None,
    }
}

/// Return the comma-separated arguments of `name(...)`, if `spec` has that shape.
fn function_args<'a>(spec: &'a str, name: &str) -> Option<Vec<&'a str>> {
    let inner = spec
        .strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')?;
    Some(inner.split(',').map(str::trim).collect())
}

fn parse_rgb_function(args: Vec<&str>, input: &str) -> Result<Colour, ColourError> {
    let [r, g, b] = args.as_slice() else {
        return Err(ColourError::Unknown(input.to_string()));
    };
    let channel = |arg: &str| -> Result<u8, ColourError> {
        let value = if let Some(pct) = arg.strip_suffix('%') {
            let pct: u32 = pct
                .trim()
                .parse()
                .map_err(|_| ColourError::Unknown(input.to_string()))?;
            if pct > 100 {
                return Err(ColourError::OutOfRange(input.to_string()));
            }
            (pct as f64 * 255.0 / 100.0 + 0.5) as u32
        } else {
            arg.parse()
                .map_err(|_| ColourError::Unknown(input.to_string()))?
        };
        u8::try_from(value).map_err(|_| ColourError::OutOfRange(input.to_string()))
    };
    Ok(Colour::new(channel(*r)?, channel(*g)?, channel(*b)?))
}

fn parse_hsl_function(args: Vec<&str>, input: &str) -> Result<Colour, ColourError> {
    let [h, s, l] = args.as_slice() else {
        return Err(ColourError::Unknown(input.to_string()));
    };
    let number = |arg: &str| -> Result<f64, ColourError> {
        arg.parse::<f64>()
            .map_err(|_| ColourError::Unknown(input.to_string()))
    };
    let percent = |arg: &str| -> Result<f64, ColourError> {
        let value = arg
            .strip_suffix('%')
            .ok_or_else(|| ColourError::Unknown(input.to_string()))
            .and_then(|v| number(v.trim()))?;
        if !(0.0..=100.0).contains(&value) {
            return Err(ColourError::OutOfRange(input.to_string()));
        }
        Ok(value / 100.0)
    };

    let hue = number(*h)?.rem_euclid(360.0) / 360.0;
    let (r, g, b) = hsl_to_rgb(hue, percent(*s)?, percent(*l)?);
    let scale = |v: f64| (v * 255.0 + 0.5) as u8;
    Ok(Colour::new(scale(r), scale(g), scale(b)))
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (l, l, l);
    }
    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;
    (
        hue_channel(m1, m2, h + 1.0 / 3.0),
        hue_channel(m1, m2, h),
        hue_channel(m1, m2, h - 1.0 / 3.0),
    )
}

fn hue_channel(m1: f64, m2: f64, hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);
    if hue < 1.0 / 6.0 {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < 2.0 / 3.0 {
        m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
    } else {
        m1
    }
}

const NAMED_COLOURS: &[(&str, [u8; 3])] = &[
    ("aliceblue", [240, 248, 255]),
    ("antiquewhite", [250, 235, 215]),
    ("aqua", [0, 255, 255]),
    ("aquamarine", [127, 255, 212]),
    ("azure", [240, 255, 255]),
    ("beige", [245, 245, 220]),
    ("bisque", [255, 228, 196]),
    ("black", [0, 0, 0]),
    ("blanchedalmond", [255, 235, 205]),
    ("blue", [0, 0, 255]),
    ("blueviolet", [138, 43, 226]),
    ("brown", [165, 42, 42]),
    ("burlywood", [222, 184, 135]),
    ("cadetblue", [95, 158, 160]),
    ("chartreuse", [127, 255, 0]),
    ("chocolate", [210, 105, 30]),
    ("coral", [255, 127, 80]),
    ("cornflowerblue", [100, 149, 237]),
    ("cornsilk", [255, 248, 220]),
    ("crimson", [220, 20, 60]),
    ("cyan", [0, 255, 255]),
    ("darkblue", [0, 0, 139]),
    ("darkcyan", [0, 139, 139]),
    ("darkgoldenrod", [184, 134, 11]),
    ("darkgray", [169, 169, 169]),
    ("darkgrey", [169, 169, 169]),
    ("darkgreen", [0, 100, 0]),
    ("darkkhaki", [189, 183, 107]),
    ("darkmagenta", [139, 0, 139]),
    ("darkolivegreen", [85, 107, 47]),
    ("darkorange", [255, 140, 0]),
    ("darkorchid", [153, 50, 204]),
    ("darkred", [139, 0, 0]),
    ("darksalmon", [233, 150, 122]),
    ("darkseagreen", [143, 188, 143]),
    ("darkslateblue", [72, 61, 139]),
    ("darkslategray", [47, 79, 79]),
    ("darkslategrey", [47, 79, 79]),
    ("darkturquoise", [0, 206, 209]),
    ("darkviolet", [148, 0, 211]),
    ("deeppink", [255, 20, 147]),
    ("deepskyblue", [0, 191, 255]),
    ("dimgray", [105, 105, 105]),
    ("dimgrey", [105, 105, 105]),
    ("dodgerblue", [30, 144, 255]),
    ("firebrick", [178, 34, 34]),
    ("floralwhite", [255, 250, 240]),
    ("forestgreen", [34, 139, 34]),
    ("fuchsia", [255, 0, 255]),
    ("gainsboro", [220, 220, 220]),
    ("ghostwhite", [248, 248, 255]),
    ("gold", [255, 215, 0]),
    ("goldenrod", [218, 165, 32]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
    ("green", [0, 128, 0]),
    ("greenyellow", [173, 255, 47]),
    ("honeydew", [240, 255, 240]),
    ("hotpink", [255, 105, 180]),
    ("indianred", [205, 92, 92]),
    ("indigo", [75, 0, 130]),
    ("ivory", [255, 255, 240]),
    ("khaki", [240, 230, 140]),
    ("lavender", [230, 230, 250]),
    ("lavenderblush", [255, 240, 245]),
    ("lawngreen", [124, 252, 0]),
    ("lemonchiffon", [255, 250, 205]),
    ("lightblue", [173, 216, 230]),
    ("lightcoral", [240, 128, 128]),
    ("lightcyan", [224, 255, 255]),
    ("lightgoldenrodyellow", [250, 250, 210]),
    ("lightgreen", [144, 238, 144]),
    ("lightgray", [211, 211, 211]),
    ("lightgrey", [211, 211, 211]),
    ("lightpink", [255, 182, 193]),
    ("lightsalmon", [255, 160, 122]),
    ("lightseagreen", [32, 178, 170]),
    ("lightskyblue", [135, 206, 250]),
    ("lightslategray", [119, 136, 153]),
    ("lightslategrey", [119, 136, 153]),
    ("lightsteelblue", [176, 196, 222]),
    ("lightyellow", [255, 255, 224]),
    ("lime", [0, 255, 0]),
    ("limegreen", [50, 205, 50]),
    ("linen", [250, 240, 230]),
    ("magenta", [255, 0, 255]),
    ("maroon", [128, 0, 0]),
    ("mediumaquamarine", [102, 205, 170]),
    ("mediumblue", [0, 0, 205]),
    ("mediumorchid", [186, 85, 211]),
    ("mediumpurple", [147, 112, 219]),
    ("mediumseagreen", [60, 179, 113]),
    ("mediumslateblue", [123, 104, 238]),
    ("mediumspringgreen", [0, 250, 154]),
    ("mediumturquoise", [72, 209, 204]),
    ("mediumvioletred", [199, 21, 133]),
    ("midnightblue", [25, 25, 112]),
    ("mintcream", [245, 255, 250]),
    ("mistyrose", [255, 228, 225]),
    ("moccasin", [255, 228, 181]),
    ("navajowhite", [255, 222, 173]),
    ("navy", [0, 0, 128]),
    ("oldlace", [253, 245, 230]),
    ("olive", [128, 128, 0]),
    ("olivedrab", [107, 142, 35]),
    ("orange", [255, 165, 0]),
    ("orangered", [255, 69, 0]),
    ("orchid", [218, 112, 214]),
    ("palegoldenrod", [238, 232, 170]),
    ("palegreen", [152, 251, 152]),
    ("paleturquoise", [175, 238, 238]),
    ("palevioletred", [219, 112, 147]),
    ("papayawhip", [255, 239, 213]),
    ("peachpuff", [255, 218, 185]),
    ("peru", [205, 133, 63]),
    ("pink", [255, 192, 203]),
    ("plum", [221, 160, 221]),
    ("powderblue", [176, 224, 230]),
    ("purple", [128, 0, 128]),
    ("rebeccapurple", [102, 51, 153]),
    ("red", [255, 0, 0]),
    ("rosybrown", [188, 143, 143]),
    ("royalblue", [65, 105, 225]),
    ("saddlebrown", [139, 69, 19]),
    ("salmon", [250, 128, 114]),
    ("sandybrown", [244, 164, 96]),
    ("seagreen", [46, 139, 87]),
    ("seashell", [255, 245, 238]),
    ("sienna", [160, 82, 45]),
    ("silver", [192, 192, 192]),
    ("skyblue", [135, 206, 235]),
    ("slateblue", [106, 90, 205]),
    ("slategray", [112, 128, 144]),
    ("slategrey", [112, 128, 144]),
    ("snow", [255, 250, 250]),
    ("springgreen", [0, 255, 127]),
    ("steelblue", [70, 130, 180]),
    ("tan", [210, 180, 140]),
    ("teal", [0, 128, 128]),
    ("thistle", [216, 191, 216]),
    ("tomato", [255, 99, 71]),
    ("turquoise", [64, 224, 208]),
    ("violet", [238, 130, 238]),
    ("wheat", [245, 222, 179]),
    ("white", [255, 255, 255]),
    ("whitesmoke", [245, 245, 245]),
    ("yellow", [255, 255, 0]),
    ("yellowgreen", [154, 205, 50]),
];
