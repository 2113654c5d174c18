use crate::foundation::error::{UnveilError, UnveilResult};
use std::fmt;
use std::str::FromStr;

pub use kurbo::{Rect, Vec2};

/// A length that is either absolute (pixels) or relative to some reference extent.
///
/// JSON accepts a bare number (pixels) or a string such as `"24px"`, `"24"` or `"100%"`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "LengthRepr", into = "LengthRepr")]
pub enum Length {
    /// Absolute pixels.
    Px(f64),
    /// Percentage of a reference extent (`100.0` is the whole extent).
    Percent(f64),
}

impl Length {
    /// Resolve this length against `extent` pixels.
    pub fn resolve(self, extent: f64) -> f64 {
        match self {
            Self::Px(v) => v,
            Self::Percent(p) => extent * p / 100.0,
        }
    }

    /// Zero pixels.
    pub const ZERO: Self = Self::Px(0.0);
}

impl Default for Length {
    fn default() -> Self {
        Self::ZERO
    }
}

impl FromStr for Length {
    type Err = UnveilError;

    fn from_str(s: &str) -> UnveilResult<Self> {
        let s = s.trim();
        let (num, pct) = if let Some(rest) = s.strip_suffix('%') {
            (rest, true)
        } else if let Some(rest) = s.strip_suffix("px") {
            (rest, false)
        } else {
            (s, false)
        };
        let v: f64 = num
            .trim()
            .parse()
            .map_err(|_| UnveilError::validation(format!("invalid length '{s}'")))?;
        if !v.is_finite() {
            return Err(UnveilError::validation(format!("length '{s}' is not finite")));
        }
        Ok(if pct { Self::Percent(v) } else { Self::Px(v) })
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(v) => write!(f, "{v}px"),
            Self::Percent(p) => write!(f, "{p}%"),
        }
    }
}

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
enum LengthRepr {
    Num(f64),
    Str(String),
}

impl TryFrom<LengthRepr> for Length {
    type Error = UnveilError;

    fn try_from(r: LengthRepr) -> UnveilResult<Self> {
        match r {
            LengthRepr::Num(v) => Ok(Self::Px(v)),
            LengthRepr::Str(s) => s.parse(),
        }
    }
}

impl From<Length> for LengthRepr {
    fn from(l: Length) -> Self {
        match l {
            Length::Px(v) => Self::Num(v),
            Length::Percent(_) => Self::Str(l.to_string()),
        }
    }
}

/// Size of the visible viewport in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ViewportSize {
    /// Viewport width.
    pub width: f64,
    /// Viewport height.
    pub height: f64,
}

impl ViewportSize {
    /// Build a viewport size, rejecting non-positive or non-finite extents.
    pub fn new(width: f64, height: f64) -> UnveilResult<Self> {
        if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
            return Err(UnveilError::validation(
                "viewport width and height must be finite and > 0",
            ));
        }
        Ok(Self { width, height })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
