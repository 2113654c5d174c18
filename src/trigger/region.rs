use crate::foundation::core::Length;
use crate::foundation::error::{UnveilError, UnveilResult};
use crate::trigger::point::{Anchor, EnterPoint, ScrollPoint};

/// Options for an intersection watch.
///
/// Margins grow (positive) or shrink (negative) the viewport box before intersecting; percent
/// margins resolve against the viewport height. `threshold` is the visible fraction of the node
/// required to count as intersecting; 0 means any overlap.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ObserveOptions {
    /// Margin applied to the top edge of the viewport box.
    pub margin_top: Length,
    /// Margin applied to the bottom edge of the viewport box.
    pub margin_bottom: Length,
    /// Required visible fraction in `[0, 1]`.
    pub threshold: f64,
}

impl Default for ObserveOptions {
    fn default() -> Self {
        Self {
            margin_top: Length::ZERO,
            margin_bottom: Length::ZERO,
            threshold: 0.0,
        }
    }
}

impl ObserveOptions {
    /// A band centred on the viewport midpoint: both edges shrunk by `pct` percent.
    pub fn centered_band(pct: f64) -> Self {
        Self {
            margin_top: Length::Percent(-pct),
            margin_bottom: Length::Percent(-pct),
            threshold: 0.0,
        }
    }

    /// Watch options that report a node as intersecting exactly when `point` has been reached.
    ///
    /// The viewport anchor becomes a bottom margin (`top 85%` shrinks the bottom by 15%). The
    /// root box is unbounded upward, so the fraction of the node inside it is the fraction above
    /// the line and the element anchor becomes a threshold. A node already scrolled past the
    /// viewport still counts as reached.
    pub fn for_enter(point: &EnterPoint, node_height: f64, viewport_height: f64) -> Self {
        let margin_bottom = match point.viewport {
            Anchor::Top => Length::Percent(-100.0),
            Anchor::Center => Length::Percent(-50.0),
            Anchor::Bottom => Length::ZERO,
            Anchor::Percent(p) => Length::Percent(p - 100.0),
            Anchor::Px(v) => Length::Px(v - viewport_height),
        };
        let threshold = if node_height > 0.0 {
            (point.element.resolve(node_height) / node_height).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            margin_top: Length::Px(f64::MAX),
            margin_bottom,
            threshold,
        }
    }

    /// Viewport box `[top, bottom]` in document coordinates for scroll offset `scroll`.
    pub fn root_box(&self, scroll: f64, viewport_height: f64) -> (f64, f64) {
        let top = scroll - self.margin_top.resolve(viewport_height);
        let bottom = scroll + viewport_height + self.margin_bottom.resolve(viewport_height);
        (top, bottom)
    }

    /// Whether a node spanning `[node_top, node_bottom]` intersects under these options.
    pub fn intersects(
        &self,
        node_top: f64,
        node_bottom: f64,
        scroll: f64,
        viewport_height: f64,
    ) -> bool {
        let (root_top, root_bottom) = self.root_box(scroll, viewport_height);
        if root_bottom < root_top {
            return false;
        }
        let overlap = node_bottom.min(root_bottom) - node_top.max(root_top);
        let height = node_bottom - node_top;
        if height <= 0.0 {
            return node_top >= root_top && node_top <= root_bottom;
        }
        if self.threshold <= 0.0 {
            // Edge-adjacent counts, so a band collapsed to a line still reports hits.
            return overlap >= 0.0;
        }
        overlap >= 0.0 && overlap / height >= self.threshold
    }
}

/// Start/end pair of a scrubbed animation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScrubRange {
    /// Scroll position at progress 0.
    pub start: ScrollPoint,
    /// Scroll position at progress 1.
    pub end: ScrollPoint,
}

impl ScrubRange {
    /// Whole-document range: `0` to `max`.
    pub fn whole_page() -> Self {
        Self {
            start: ScrollPoint::Offset(0.0),
            end: ScrollPoint::Max,
        }
    }

    /// Resolve both boundaries to absolute scroll offsets.
    pub fn resolve(
        &self,
        node_top: f64,
        node_height: f64,
        viewport_height: f64,
        max_scroll: f64,
    ) -> ResolvedRange {
        ResolvedRange {
            start: self
                .start
                .resolve(node_top, node_height, viewport_height, max_scroll),
            end: self
                .end
                .resolve(node_top, node_height, viewport_height, max_scroll),
        }
    }
}

/// Absolute scrub boundaries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedRange {
    /// Scroll offset at progress 0.
    pub start: f64,
    /// Scroll offset at progress 1.
    pub end: f64,
}

impl ResolvedRange {
    /// Linear progress in `[0, 1]` at scroll offset `scroll`.
    ///
    /// A degenerate range (`end <= start`) is a step at `start`.
    pub fn progress(&self, scroll: f64) -> f64 {
        let span = self.end - self.start;
        if span <= 0.0 {
            return if scroll >= self.start { 1.0 } else { 0.0 };
        }
        ((scroll - self.start) / span).clamp(0.0, 1.0)
    }
}

/// Validate a centred-band percentage.
pub(crate) fn validate_band(pct: f64) -> UnveilResult<()> {
    if !pct.is_finite() || !(0.0..=50.0).contains(&pct) {
        return Err(UnveilError::validation(
            "scroll-spy band margin must be in [0, 50] percent",
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/trigger/region.rs"]
mod tests;
