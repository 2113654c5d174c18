use crate::animation::ease::Ease;
use crate::animation::state::{Lerp, VisualState};
use crate::foundation::error::{UnveilError, UnveilResult};

/// Timing of one tween: how long it runs, how long it waits, and how progress is eased.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Timing {
    /// Duration in seconds.
    #[serde(default = "default_duration")]
    pub duration: f64,
    /// Delay before the tween starts, in seconds.
    #[serde(default)]
    pub delay: f64,
    /// Easing curve.
    #[serde(default)]
    pub ease: Ease,
}

fn default_duration() -> f64 {
    0.5
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            duration: default_duration(),
            delay: 0.0,
            ease: Ease::default(),
        }
    }
}

impl Timing {
    /// Timing with the given duration and ease, no delay.
    pub fn new(duration: f64, ease: Ease) -> Self {
        Self {
            duration,
            delay: 0.0,
            ease,
        }
    }

    /// Same timing with `delay` replaced.
    pub fn with_delay(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }

    /// Reject negative or non-finite durations and delays.
    pub fn validate(&self) -> UnveilResult<()> {
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(UnveilError::validation(
                "tween duration must be finite and >= 0",
            ));
        }
        if !self.delay.is_finite() || self.delay < 0.0 {
            return Err(UnveilError::validation("tween delay must be finite and >= 0"));
        }
        Ok(())
    }
}

/// Fire-and-forget tween request handed to an [`crate::Animator`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweenRequest {
    /// State at progress 0.
    pub from: VisualState,
    /// State at progress 1.
    pub to: VisualState,
    /// Duration, delay and ease.
    pub timing: Timing,
}

/// A tween scheduled at an absolute clock time.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ScheduledTween {
    /// State before the tween starts.
    pub from: VisualState,
    /// State once the tween completes.
    pub to: VisualState,
    /// Absolute start time in seconds (request time plus delay).
    pub start: f64,
    /// Duration in seconds.
    pub duration: f64,
    /// Easing curve.
    pub ease: Ease,
}

impl ScheduledTween {
    /// Schedule `req` as issued at clock time `now`.
    pub fn schedule(req: &TweenRequest, now: f64) -> Self {
        Self {
            from: req.from,
            to: req.to,
            start: now + req.timing.delay,
            duration: req.timing.duration,
            ease: req.timing.ease,
        }
    }

    /// Absolute end time.
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    /// Normalized, eased progress at clock time `at`.
    pub fn progress(&self, at: f64) -> f64 {
        if at <= self.start {
            return 0.0;
        }
        if self.duration <= 0.0 || at >= self.end() {
            return 1.0;
        }
        self.ease.apply((at - self.start) / self.duration)
    }

    /// Interpolated state at clock time `at`.
    pub fn sample(&self, at: f64) -> VisualState {
        VisualState::lerp(&self.from, &self.to, self.progress(at))
    }

    /// Whether `at` lies strictly inside the running window.
    pub fn is_running(&self, at: f64) -> bool {
        at > self.start && at < self.end()
    }
}

/// Delay of member `index` in a staggered group.
pub fn stagger_delay(base_delay: f64, stagger: f64, index: usize) -> f64 {
    base_delay + index as f64 * stagger
}

#[cfg(test)]
#[path = "../../tests/unit/animation/tween.rs"]
mod tests;
