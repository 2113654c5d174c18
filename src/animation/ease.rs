use crate::foundation::error::{UnveilError, UnveilResult};
use std::fmt;
use std::str::FromStr;

/// Easing functions used to map normalized animation progress.
///
/// Besides the variant names (`"OutCubic"`), the common tween-library identifiers
/// are accepted when parsing: `none`/`linear`, and `power1`..`power4` with `.in`, `.out` or
/// `.inOut` suffixes (`power2.out` is `OutCubic`). A bare `powerN` means `.out`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Ease {
    /// Linear interpolation.
    Linear,
    /// Quadratic ease-in.
    InQuad,
    /// Quadratic ease-out.
    OutQuad,
    /// Quadratic ease-in/out.
    InOutQuad,
    /// Cubic ease-in.
    InCubic,
    /// Cubic ease-out.
    OutCubic,
    /// Cubic ease-in/out.
    InOutCubic,
    /// Quartic ease-in.
    InQuart,
    /// Quartic ease-out.
    OutQuart,
    /// Quartic ease-in/out.
    InOutQuart,
    /// Quintic ease-in.
    InQuint,
    /// Quintic ease-out.
    OutQuint,
    /// Quintic ease-in/out.
    InOutQuint,
}

impl Default for Ease {
    /// `power1.out`.
    fn default() -> Self {
        Self::OutQuad
    }
}

impl Ease {
    /// Every easing variant, in declaration order.
    pub const ALL: [Ease; 13] = [
        Self::Linear,
        Self::InQuad,
        Self::OutQuad,
        Self::InOutQuad,
        Self::InCubic,
        Self::OutCubic,
        Self::InOutCubic,
        Self::InQuart,
        Self::OutQuart,
        Self::InOutQuart,
        Self::InQuint,
        Self::OutQuint,
        Self::InOutQuint,
    ];

    /// Apply this easing function to normalized progress `t` in `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => ease_in(t, 2),
            Self::OutQuad => ease_out(t, 2),
            Self::InOutQuad => ease_in_out(t, 2),
            Self::InCubic => ease_in(t, 3),
            Self::OutCubic => ease_out(t, 3),
            Self::InOutCubic => ease_in_out(t, 3),
            Self::InQuart => ease_in(t, 4),
            Self::OutQuart => ease_out(t, 4),
            Self::InOutQuart => ease_in_out(t, 4),
            Self::InQuint => ease_in(t, 5),
            Self::OutQuint => ease_out(t, 5),
            Self::InOutQuint => ease_in_out(t, 5),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Linear => "Linear",
            Self::InQuad => "InQuad",
            Self::OutQuad => "OutQuad",
            Self::InOutQuad => "InOutQuad",
            Self::InCubic => "InCubic",
            Self::OutCubic => "OutCubic",
            Self::InOutCubic => "InOutCubic",
            Self::InQuart => "InQuart",
            Self::OutQuart => "OutQuart",
            Self::InOutQuart => "InOutQuart",
            Self::InQuint => "InQuint",
            Self::OutQuint => "OutQuint",
            Self::InOutQuint => "InOutQuint",
        }
    }
}

fn ease_in(t: f64, p: i32) -> f64 {
    t.powi(p)
}

fn ease_out(t: f64, p: i32) -> f64 {
    1.0 - (1.0 - t).powi(p)
}

fn ease_in_out(t: f64, p: i32) -> f64 {
    if t < 0.5 {
        2f64.powi(p - 1) * t.powi(p)
    } else {
        1.0 - ((-2.0 * t + 2.0).powi(p) / 2.0)
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Ease {
    type Err = UnveilError;

    fn from_str(s: &str) -> UnveilResult<Self> {
        let s = s.trim();
        if let Some(e) = Self::ALL.iter().copied().find(|e| e.name() == s) {
            return Ok(e);
        }
        if s == "none" || s == "linear" || s == "power0" || s.starts_with("power0.") {
            return Ok(Self::Linear);
        }

        let (family, dir) = s.split_once('.').unwrap_or((s, "out"));
        let degree = match family {
            "power1" | "quad" => 1,
            "power2" | "cubic" => 2,
            "power3" | "quart" => 3,
            "power4" | "quint" | "strong" => 4,
            _ => return Err(UnveilError::validation(format!("unknown ease '{s}'"))),
        };
        let e = match (degree, dir) {
            (1, "in") => Self::InQuad,
            (1, "out") => Self::OutQuad,
            (1, "inOut") => Self::InOutQuad,
            (2, "in") => Self::InCubic,
            (2, "out") => Self::OutCubic,
            (2, "inOut") => Self::InOutCubic,
            (3, "in") => Self::InQuart,
            (3, "out") => Self::OutQuart,
            (3, "inOut") => Self::InOutQuart,
            (4, "in") => Self::InQuint,
            (4, "out") => Self::OutQuint,
            (4, "inOut") => Self::InOutQuint,
            _ => return Err(UnveilError::validation(format!("unknown ease '{s}'"))),
        };
        Ok(e)
    }
}

impl TryFrom<String> for Ease {
    type Error = UnveilError;

    fn try_from(s: String) -> UnveilResult<Self> {
        s.parse()
    }
}

impl From<Ease> for String {
    fn from(e: Ease) -> Self {
        e.name().to_owned()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
