use crate::animation::ease::Ease;
use crate::animation::state::StateDef;
use crate::animation::tween::Timing;
use crate::foundation::error::{UnveilError, UnveilResult};
use crate::host::{Document, NodeId};
use crate::trigger::point::EnterPoint;
use crate::trigger::region::ScrubRange;

/// What a registration applies to.
#[derive(Clone, Debug, PartialEq)]
pub enum Target {
    /// Every node matching a selector, in document order.
    Selector(String),
    /// Explicit nodes, in the given order.
    Nodes(Vec<NodeId>),
}

impl Target {
    /// Resolve to attached nodes. Unknown selectors and detached nodes resolve to nothing.
    pub fn resolve<D: Document + ?Sized>(&self, doc: &D) -> Vec<NodeId> {
        match self {
            Self::Selector(sel) => doc.query(sel),
            Self::Nodes(nodes) => nodes.iter().copied().filter(|n| doc.exists(*n)).collect(),
        }
    }
}

impl From<&str> for Target {
    fn from(s: &str) -> Self {
        Self::Selector(s.to_owned())
    }
}

impl From<String> for Target {
    fn from(s: String) -> Self {
        Self::Selector(s)
    }
}

impl From<NodeId> for Target {
    fn from(n: NodeId) -> Self {
        Self::Nodes(vec![n])
    }
}

impl From<Vec<NodeId>> for Target {
    fn from(nodes: Vec<NodeId>) -> Self {
        Self::Nodes(nodes)
    }
}

/// When a reveal plays.
#[derive(Clone, Debug, PartialEq)]
pub enum RevealTrigger {
    /// At registration time (hero intros).
    Load,
    /// When `point` is reached. `anchor` overrides the node whose position is watched; by
    /// default each revealed node watches itself, and a group watches its first member.
    Enter {
        /// Trigger point.
        point: EnterPoint,
        /// Node whose position is watched instead of the revealed node.
        anchor: Option<Target>,
    },
}

impl Default for RevealTrigger {
    fn default() -> Self {
        Self::Enter {
            point: EnterPoint::default(),
            anchor: None,
        }
    }
}

/// Configuration of a one-shot reveal.
#[derive(Clone, Debug, PartialEq)]
pub struct RevealConfig {
    /// Initial state, applied at registration.
    pub from: StateDef,
    /// Target state.
    pub to: StateDef,
    /// Duration, base delay and ease.
    pub timing: Timing,
    /// When the reveal plays.
    pub trigger: RevealTrigger,
    /// Keep watching after firing so [`crate::Engine::rearm`] can replay it.
    pub retrigger: bool,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self::fade_up(24.0)
    }
}

impl RevealConfig {
    /// Fade in from transparent while rising `y` pixels, `power3.out`, 0.7 s.
    pub fn fade_up(y: f64) -> Self {
        Self {
            from: StateDef::fade_up(0.0, y),
            to: StateDef::fade_up(1.0, 0.0),
            timing: Timing::new(0.7, Ease::OutQuart),
            trigger: RevealTrigger::default(),
            retrigger: false,
        }
    }

    /// Replace the states.
    pub fn states(mut self, from: StateDef, to: StateDef) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// Replace the duration.
    pub fn duration(mut self, secs: f64) -> Self {
        self.timing.duration = secs;
        self
    }

    /// Replace the base delay.
    pub fn delay(mut self, secs: f64) -> Self {
        self.timing.delay = secs;
        self
    }

    /// Replace the ease.
    pub fn ease(mut self, ease: Ease) -> Self {
        self.timing.ease = ease;
        self
    }

    /// Trigger when `point` is reached by the revealed node itself.
    pub fn start(mut self, point: EnterPoint) -> Self {
        self.trigger = RevealTrigger::Enter {
            point,
            anchor: None,
        };
        self
    }

    /// Trigger when `point` is reached by `anchor`.
    pub fn start_at(mut self, point: EnterPoint, anchor: impl Into<Target>) -> Self {
        self.trigger = RevealTrigger::Enter {
            point,
            anchor: Some(anchor.into()),
        };
        self
    }

    /// Play at registration time.
    pub fn on_load(mut self) -> Self {
        self.trigger = RevealTrigger::Load;
        self
    }

    /// Mark as replayable through [`crate::Engine::rearm`].
    pub fn retrigger(mut self, on: bool) -> Self {
        self.retrigger = on;
        self
    }

    /// Check numeric ranges.
    pub fn validate(&self) -> UnveilResult<()> {
        self.timing.validate()?;
        if !self.from.is_finite() || !self.to.is_finite() {
            return Err(UnveilError::validation("reveal states must be finite"));
        }
        Ok(())
    }
}

/// Configuration of a staggered group: a reveal plus a per-member delay increment.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupConfig {
    /// Shared reveal configuration; `timing.delay` is the delay of member 0.
    pub reveal: RevealConfig,
    /// Delay added per member index, in seconds.
    pub stagger: f64,
}

impl GroupConfig {
    /// Group with the given reveal and stagger.
    pub fn new(reveal: RevealConfig, stagger: f64) -> Self {
        Self { reveal, stagger }
    }

    /// Check numeric ranges.
    pub fn validate(&self) -> UnveilResult<()> {
        self.reveal.validate()?;
        if !self.stagger.is_finite() || self.stagger < 0.0 {
            return Err(UnveilError::validation("stagger must be finite and >= 0"));
        }
        Ok(())
    }
}

/// Configuration of a scroll-scrubbed anchor.
#[derive(Clone, Debug, PartialEq)]
pub struct ScrubConfig {
    /// State at progress 0.
    pub from: StateDef,
    /// State at progress 1.
    pub to: StateDef,
    /// Scroll range mapped to progress.
    pub range: ScrubRange,
    /// Node whose position resolves edge-relative boundaries; defaults to the body.
    pub anchor: Option<Target>,
    /// Ease applied to progress.
    pub ease: Ease,
    /// Catch-up time in seconds; `None` applies each sample directly.
    pub smoothing: Option<f64>,
}

impl ScrubConfig {
    /// Scrub between two states over `range`, linear, unsmoothed.
    pub fn new(from: StateDef, to: StateDef, range: ScrubRange) -> Self {
        Self {
            from,
            to,
            range,
            anchor: None,
            ease: Ease::Linear,
            smoothing: None,
        }
    }

    /// Set the catch-up time.
    pub fn smoothing(mut self, secs: f64) -> Self {
        self.smoothing = Some(secs);
        self
    }

    /// Resolve boundaries against `anchor`.
    pub fn anchored(mut self, anchor: impl Into<Target>) -> Self {
        self.anchor = Some(anchor.into());
        self
    }

    /// Check numeric ranges.
    pub fn validate(&self) -> UnveilResult<()> {
        if !self.from.is_finite() || !self.to.is_finite() {
            return Err(UnveilError::validation("scrub states must be finite"));
        }
        if let Some(s) = self.smoothing
            && (!s.is_finite() || s < 0.0)
        {
            return Err(UnveilError::validation("scrub smoothing must be finite and >= 0"));
        }
        Ok(())
    }
}

/// Engine-wide options.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EngineOptions {
    /// Class added to a node when its reveal fires, removed when re-armed.
    #[serde(default = "default_reveal_class")]
    pub reveal_class: Option<String>,
    /// Media query that signals the reduced-motion preference.
    #[serde(default = "default_reduced_motion_query")]
    pub reduced_motion_query: String,
}

fn default_reveal_class() -> Option<String> {
    Some("revealed".to_owned())
}

fn default_reduced_motion_query() -> String {
    REDUCED_MOTION_QUERY.to_owned()
}

/// The standard reduced-motion media query.
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            reveal_class: default_reveal_class(),
            reduced_motion_query: default_reduced_motion_query(),
        }
    }
}
