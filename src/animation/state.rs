use crate::foundation::core::{Length, Rect};

/// Interpolation contract for animated value types.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b` with normalized factor `t` in `[0, 1]`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

/// Resolved visual presentation of a node.
///
/// Translation is in pixels relative to the node's laid-out position; `scale` is uniform and
/// `scale_x` multiplies it horizontally (progress bars scrub `scale_x` from 0 to 1).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VisualState {
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Horizontal translation in pixels.
    pub x: f64,
    /// Vertical translation in pixels.
    pub y: f64,
    /// Uniform scale.
    pub scale: f64,
    /// Extra horizontal scale.
    pub scale_x: f64,
}

impl VisualState {
    /// The natural, untransformed presentation.
    pub const IDENTITY: Self = Self {
        opacity: 1.0,
        x: 0.0,
        y: 0.0,
        scale: 1.0,
        scale_x: 1.0,
    };

    /// Whether two states agree within `eps` on every property.
    pub fn approx_eq(&self, other: &Self, eps: f64) -> bool {
        (self.opacity - other.opacity).abs() <= eps
            && (self.x - other.x).abs() <= eps
            && (self.y - other.y).abs() <= eps
            && (self.scale - other.scale).abs() <= eps
            && (self.scale_x - other.scale_x).abs() <= eps
    }
}

impl Default for VisualState {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Lerp for VisualState {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            opacity: f64::lerp(&a.opacity, &b.opacity, t),
            x: f64::lerp(&a.x, &b.x, t),
            y: f64::lerp(&a.y, &b.y, t),
            scale: f64::lerp(&a.scale, &b.scale, t),
            scale_x: f64::lerp(&a.scale_x, &b.scale_x, t),
        }
    }
}

/// Partial visual state as written in configuration: only the named properties are set.
///
/// Percent translations resolve against the node's own width (`x`) or height (`y`), so
/// `{"y": "100%"}` pushes a word one line-height down, below its clipping mask.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateDef {
    /// Opacity override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    /// Horizontal translation override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<Length>,
    /// Vertical translation override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<Length>,
    /// Uniform scale override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    /// Horizontal scale override.
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "scaleX")]
    pub scale_x: Option<f64>,
}

impl StateDef {
    /// Opacity-only state.
    pub fn opacity(v: f64) -> Self {
        Self {
            opacity: Some(v),
            ..Self::default()
        }
    }

    /// Fade plus vertical offset in pixels, the most common reveal start state.
    pub fn fade_up(opacity: f64, y: f64) -> Self {
        Self {
            opacity: Some(opacity),
            y: Some(Length::Px(y)),
            ..Self::default()
        }
    }

    /// Overlay the set properties onto `base`, resolving percentages against `bounds`.
    pub fn resolve(&self, base: &VisualState, bounds: Rect) -> VisualState {
        VisualState {
            opacity: self.opacity.unwrap_or(base.opacity),
            x: self.x.map_or(base.x, |l| l.resolve(bounds.width())),
            y: self.y.map_or(base.y, |l| l.resolve(bounds.height())),
            scale: self.scale.unwrap_or(base.scale),
            scale_x: self.scale_x.unwrap_or(base.scale_x),
        }
    }

    pub(crate) fn is_finite(&self) -> bool {
        let len_ok = |l: Option<Length>| {
            l.is_none_or(|l| match l {
                Length::Px(v) | Length::Percent(v) => v.is_finite(),
            })
        };
        self.opacity.is_none_or(f64::is_finite)
            && self.scale.is_none_or(f64::is_finite)
            && self.scale_x.is_none_or(f64::is_finite)
            && len_ok(self.x)
            && len_ok(self.y)
    }
}

/// Resolve a `from`/`to` pair for a node with the given bounds.
///
/// `to` overlays the identity state; `from` overlays the resolved `to`, so properties that only
/// the target mentions start where they end.
pub fn resolve_pair(from: &StateDef, to: &StateDef, bounds: Rect) -> (VisualState, VisualState) {
    let target = to.resolve(&VisualState::IDENTITY, bounds);
    let initial = from.resolve(&target, bounds);
    (initial, target)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/state.rs"]
mod tests;
