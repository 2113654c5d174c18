use crate::foundation::error::{UnveilError, UnveilResult};
use std::fmt;
use std::str::FromStr;

/// A position along one vertical extent (a node's height or the viewport's height).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Anchor {
    /// Leading edge.
    Top,
    /// Midpoint.
    Center,
    /// Trailing edge.
    Bottom,
    /// Percentage of the extent from its top.
    Percent(f64),
    /// Pixels from its top.
    Px(f64),
}

impl Anchor {
    /// Offset from the top of an extent of `extent` pixels.
    pub fn resolve(self, extent: f64) -> f64 {
        match self {
            Self::Top => 0.0,
            Self::Center => extent / 2.0,
            Self::Bottom => extent,
            Self::Percent(p) => extent * p / 100.0,
            Self::Px(v) => v,
        }
    }

    fn is_finite(self) -> bool {
        match self {
            Self::Percent(v) | Self::Px(v) => v.is_finite(),
            _ => true,
        }
    }
}

impl FromStr for Anchor {
    type Err = UnveilError;

    fn from_str(s: &str) -> UnveilResult<Self> {
        let s = s.trim();
        let anchor = match s {
            "top" => Self::Top,
            "center" => Self::Center,
            "bottom" => Self::Bottom,
            _ => {
                let (num, pct) = match s.strip_suffix('%') {
                    Some(rest) => (rest, true),
                    None => (s.strip_suffix("px").unwrap_or(s), false),
                };
                let v: f64 = num
                    .parse()
                    .map_err(|_| UnveilError::validation(format!("invalid anchor '{s}'")))?;
                if pct { Self::Percent(v) } else { Self::Px(v) }
            }
        };
        if !anchor.is_finite() {
            return Err(UnveilError::validation(format!("anchor '{s}' is not finite")));
        }
        Ok(anchor)
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Top => f.write_str("top"),
            Self::Center => f.write_str("center"),
            Self::Bottom => f.write_str("bottom"),
            Self::Percent(p) => write!(f, "{p}%"),
            Self::Px(v) => write!(f, "{v}px"),
        }
    }
}

/// The moment a node's `element` anchor crosses the viewport's `viewport` anchor while
/// scrolling down. Written `"<element> <viewport>"`, e.g. `"top 80%"`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EnterPoint {
    /// Anchor on the trigger node.
    pub element: Anchor,
    /// Anchor on the viewport.
    pub viewport: Anchor,
}

impl EnterPoint {
    /// `top <pct>%`: the node's top edge reaches `pct` percent of the viewport height.
    pub fn top_at(pct: f64) -> Self {
        Self {
            element: Anchor::Top,
            viewport: Anchor::Percent(pct),
        }
    }

    /// Scroll offset at which this point is reached for a node whose top sits at `node_top`
    /// (document coordinates) with height `node_height`.
    pub fn scroll_offset(&self, node_top: f64, node_height: f64, viewport_height: f64) -> f64 {
        node_top + self.element.resolve(node_height) - self.viewport.resolve(viewport_height)
    }
}

impl Default for EnterPoint {
    fn default() -> Self {
        Self::top_at(85.0)
    }
}

impl FromStr for EnterPoint {
    type Err = UnveilError;

    fn from_str(s: &str) -> UnveilResult<Self> {
        let mut parts = s.split_whitespace();
        let (Some(a), b, None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(UnveilError::validation(format!(
                "trigger point '{s}' must be '<element> <viewport>'"
            )));
        };
        let element: Anchor = a.parse()?;
        let viewport: Anchor = match b {
            Some(b) => b.parse()?,
            None => element,
        };
        Ok(Self { element, viewport })
    }
}

impl fmt::Display for EnterPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.element, self.viewport)
    }
}

impl TryFrom<String> for EnterPoint {
    type Error = UnveilError;

    fn try_from(s: String) -> UnveilResult<Self> {
        s.parse()
    }
}

impl From<EnterPoint> for String {
    fn from(p: EnterPoint) -> Self {
        p.to_string()
    }
}

/// A scroll position used as a scrub boundary.
///
/// Accepts everything [`EnterPoint`] accepts, plus a bare number (absolute scroll offset in
/// pixels) and `"max"` (the maximum scroll offset of the document).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "ScrollPointRepr", into = "String")]
pub enum ScrollPoint {
    /// Relative to a trigger node.
    Edge(EnterPoint),
    /// Absolute scroll offset.
    Offset(f64),
    /// Maximum scroll offset.
    Max,
}

impl ScrollPoint {
    /// Absolute scroll offset for a trigger node at `node_top` with `node_height`.
    pub fn resolve(
        &self,
        node_top: f64,
        node_height: f64,
        viewport_height: f64,
        max_scroll: f64,
    ) -> f64 {
        match self {
            Self::Edge(p) => p.scroll_offset(node_top, node_height, viewport_height),
            Self::Offset(v) => *v,
            Self::Max => max_scroll,
        }
    }
}

impl FromStr for ScrollPoint {
    type Err = UnveilError;

    fn from_str(s: &str) -> UnveilResult<Self> {
        let t = s.trim();
        if t == "max" {
            return Ok(Self::Max);
        }
        if let Ok(v) = t.parse::<f64>() {
            if !v.is_finite() {
                return Err(UnveilError::validation(format!("scroll point '{t}' is not finite")));
            }
            return Ok(Self::Offset(v));
        }
        Ok(Self::Edge(t.parse()?))
    }
}

impl fmt::Display for ScrollPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Edge(p) => p.fmt(f),
            Self::Offset(v) => write!(f, "{v}"),
            Self::Max => f.write_str("max"),
        }
    }
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ScrollPointRepr {
    Num(f64),
    Str(String),
}

impl TryFrom<ScrollPointRepr> for ScrollPoint {
    type Error = UnveilError;

    fn try_from(r: ScrollPointRepr) -> UnveilResult<Self> {
        match r {
            ScrollPointRepr::Num(v) => Ok(Self::Offset(v)),
            ScrollPointRepr::Str(s) => s.parse(),
        }
    }
}

impl From<ScrollPoint> for String {
    fn from(p: ScrollPoint) -> Self {
        p.to_string()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/trigger/point.rs"]
mod tests;
