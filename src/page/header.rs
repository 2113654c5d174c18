use crate::animation::ease::Ease;
use crate::animation::state::VisualState;
use crate::animation::tween::{Timing, TweenRequest};
use crate::foundation::error::{UnveilError, UnveilResult};
use crate::host::{Host, NodeId};

/// Visibility of the sticky header.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum HeaderState {
    /// In place.
    Shown,
    /// Slid out above the viewport.
    Hidden,
}

/// Header wiring and thresholds.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeaderConfig {
    /// Header node.
    #[serde(default = "default_selector")]
    pub selector: String,
    /// Minimum offset before the header may hide.
    #[serde(default = "default_hide_after")]
    pub hide_after: f64,
    /// Offset below which the header always shows.
    #[serde(default = "default_show_before")]
    pub show_before: f64,
    /// Minimum travel since the last commit before committing again.
    #[serde(default = "default_hysteresis")]
    pub hysteresis: f64,
    /// Upward slide distance when hidden, in pixels.
    #[serde(default = "default_offset")]
    pub offset: f64,
    /// Slide timing.
    #[serde(default = "default_timing")]
    pub timing: Timing,
    /// Backdrop class toggled past `scrolled_after`; `None` disables the marker.
    #[serde(default = "default_scrolled_class")]
    pub scrolled_class: Option<String>,
    /// Offset past which the backdrop class is set.
    #[serde(default = "default_scrolled_after")]
    pub scrolled_after: f64,
}

fn default_selector() -> String {
    ".header".to_owned()
}
fn default_hide_after() -> f64 {
    200.0
}
fn default_show_before() -> f64 {
    100.0
}
fn default_hysteresis() -> f64 {
    60.0
}
fn default_offset() -> f64 {
    100.0
}
fn default_timing() -> Timing {
    Timing::new(0.3, Ease::OutCubic)
}
fn default_scrolled_class() -> Option<String> {
    Some("scrolled".to_owned())
}
fn default_scrolled_after() -> f64 {
    80.0
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            selector: default_selector(),
            hide_after: default_hide_after(),
            show_before: default_show_before(),
            hysteresis: default_hysteresis(),
            offset: default_offset(),
            timing: default_timing(),
            scrolled_class: default_scrolled_class(),
            scrolled_after: default_scrolled_after(),
        }
    }
}

impl HeaderConfig {
    /// Check thresholds and timing.
    pub fn validate(&self) -> UnveilResult<()> {
        let all_finite = [
            self.hide_after,
            self.show_before,
            self.hysteresis,
            self.offset,
            self.scrolled_after,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !all_finite {
            return Err(UnveilError::validation("header thresholds must be finite"));
        }
        if self.hysteresis < 0.0 {
            return Err(UnveilError::validation("header hysteresis must be >= 0"));
        }
        if self.show_before > self.hide_after {
            return Err(UnveilError::validation(
                "header show_before must not exceed hide_after",
            ));
        }
        self.timing.validate()
    }
}

/// Hide-on-scroll-down, show-on-scroll-up state machine with a hysteresis band.
///
/// A sample commits `Hidden` when `y > hide_after && y > last + hysteresis`, otherwise commits
/// `Shown` when `y < last - hysteresis || y < show_before`. Every commit moves `last` to `y`;
/// samples that commit nothing leave it alone. Only commits that change the state are reported.
#[derive(Clone, Debug, PartialEq)]
pub struct HeaderVisibility {
    hide_after: f64,
    show_before: f64,
    hysteresis: f64,
    state: HeaderState,
    last: f64,
    suspended: bool,
}

impl HeaderVisibility {
    /// Machine in `Shown`, anchored at `initial_offset`.
    pub fn new(config: &HeaderConfig, initial_offset: f64) -> Self {
        Self {
            hide_after: config.hide_after,
            show_before: config.show_before,
            hysteresis: config.hysteresis,
            state: HeaderState::Shown,
            last: initial_offset,
            suspended: false,
        }
    }

    /// Current state.
    pub fn state(&self) -> HeaderState {
        self.state
    }

    /// Offset of the last commit.
    pub fn last(&self) -> f64 {
        self.last
    }

    /// Ignore samples while `on`.
    pub fn set_suspended(&mut self, on: bool) {
        self.suspended = on;
    }

    /// Whether samples are ignored.
    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Feed one scroll sample; returns the new state on a transition.
    pub fn sample(&mut self, y: f64) -> Option<HeaderState> {
        if self.suspended {
            return None;
        }
        let commit = if y > self.hide_after && y > self.last + self.hysteresis {
            HeaderState::Hidden
        } else if y < self.last - self.hysteresis || y < self.show_before {
            HeaderState::Shown
        } else {
            return None;
        };
        self.last = y;
        if commit == self.state {
            return None;
        }
        self.state = commit;
        Some(commit)
    }
}

/// Tracks whether the page has scrolled past a threshold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrolledMarker {
    threshold: f64,
    on: bool,
}

impl ScrolledMarker {
    /// Marker that turns on strictly past `threshold`.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            on: false,
        }
    }

    /// Whether the marker is on.
    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Feed one scroll sample; returns the new value when it flips.
    pub fn sample(&mut self, y: f64) -> Option<bool> {
        let on = y > self.threshold;
        if on == self.on {
            return None;
        }
        self.on = on;
        Some(on)
    }
}

/// The installed header: state machine, backdrop marker and the node they drive.
#[derive(Clone, Debug)]
pub struct Header {
    node: NodeId,
    machine: HeaderVisibility,
    marker: Option<(ScrolledMarker, String)>,
    offset: f64,
    timing: Timing,
}

impl Header {
    /// Resolve the header node and sync the backdrop class with the current offset. `None`
    /// when the page has no header.
    pub fn install<H: Host>(host: &mut H, config: &HeaderConfig) -> Option<Self> {
        let node = host.query_one(&config.selector)?;
        let y = host.scroll_offset();
        let mut header = Self {
            node,
            machine: HeaderVisibility::new(config, y),
            marker: config
                .scrolled_class
                .as_ref()
                .map(|c| (ScrolledMarker::new(config.scrolled_after), c.clone())),
            offset: config.offset,
            timing: config.timing,
        };
        header.sync_marker(host, y);
        Some(header)
    }

    /// Header node.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Current visibility.
    pub fn state(&self) -> HeaderState {
        self.machine.state()
    }

    /// The underlying state machine.
    pub fn machine(&self) -> &HeaderVisibility {
        &self.machine
    }

    /// Suspend or resume the state machine (the nav overlay holds it while open).
    pub fn set_suspended(&mut self, on: bool) {
        self.machine.set_suspended(on);
    }

    /// Scroll sample: update the backdrop class and slide on transitions. Under reduced motion
    /// the slide is applied without a tween.
    pub fn on_scroll<H: Host>(&mut self, host: &mut H, y: f64, reduced_motion: bool) {
        self.sync_marker(host, y);
        let Some(state) = self.machine.sample(y) else {
            return;
        };
        tracing::trace!(?state, y, "header transition");
        let current = host.current(self.node);
        let target = VisualState {
            y: match state {
                HeaderState::Shown => 0.0,
                HeaderState::Hidden => -self.offset,
            },
            ..current
        };
        host.kill(self.node);
        if reduced_motion {
            host.set(self.node, target);
        } else {
            host.tween(
                self.node,
                TweenRequest {
                    from: current,
                    to: target,
                    timing: self.timing,
                },
            );
        }
    }

    fn sync_marker<H: Host>(&mut self, host: &mut H, y: f64) {
        if let Some((marker, class)) = &mut self.marker
            && let Some(on) = marker.sample(y)
        {
            host.toggle_class(self.node, class, on);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/page/header.rs"]
mod tests;
