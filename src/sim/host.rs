use crate::animation::state::VisualState;
use crate::animation::tween::{ScheduledTween, TweenRequest};
use crate::foundation::core::{Rect, ViewportSize};
use crate::foundation::error::UnveilResult;
use crate::host::{
    Animator, Document, FrameToken, IntersectionRecord, NodeId, Viewport, WatchId,
};
use crate::sim::document::{PageDef, SimDocument};
use crate::trigger::region::ObserveOptions;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// One observable side effect of the simulated host.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimEvent {
    /// The scroll offset changed.
    Scroll {
        /// New offset.
        offset: f64,
    },
    /// A state was applied immediately.
    Set {
        /// Target node.
        node: NodeId,
        /// Applied state.
        state: VisualState,
    },
    /// A tween was scheduled.
    Tween {
        /// Target node.
        node: NodeId,
        /// Scheduled tween.
        tween: ScheduledTween,
    },
    /// Running tweens on a node were stopped.
    Kill {
        /// Target node.
        node: NodeId,
    },
    /// A class was added or removed.
    Class {
        /// Target node.
        node: NodeId,
        /// Class name.
        class: String,
        /// `true` when added.
        on: bool,
    },
    /// An attribute was set or removed.
    Attribute {
        /// Target node.
        node: NodeId,
        /// Attribute name.
        name: String,
        /// New value, `None` when removed.
        value: Option<String>,
    },
    /// Display suppression changed.
    Display {
        /// Target node.
        node: NodeId,
        /// New display state.
        displayed: bool,
    },
    /// Keyboard focus moved.
    Focus {
        /// Focused node.
        node: NodeId,
    },
    /// An intersection watch started.
    Observe {
        /// New watch.
        watch: WatchId,
        /// Observed node.
        node: NodeId,
    },
    /// An intersection watch stopped.
    Unobserve {
        /// Stopped watch.
        watch: WatchId,
    },
    /// An intersection record was queued.
    Intersection(IntersectionRecord),
    /// A frame was requested.
    FrameRequested {
        /// Frame token.
        token: FrameToken,
    },
    /// A pending frame was cancelled.
    FrameCancelled {
        /// Frame token.
        token: FrameToken,
    },
    /// The viewport was resized.
    Resize {
        /// New viewport size.
        viewport: ViewportSize,
    },
    /// The reduced-motion preference changed.
    ReducedMotion {
        /// New preference.
        on: bool,
    },
}

/// A [`SimEvent`] stamped with the clock time it happened at.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct LogEntry {
    /// Clock time in seconds.
    pub at: f64,
    /// What happened.
    #[serde(flatten)]
    pub event: SimEvent,
}

#[derive(Clone, Debug, Default)]
struct NodeVisual {
    base: Option<VisualState>,
    tweens: Vec<ScheduledTween>,
}

impl NodeVisual {
    fn sample(&self, at: f64) -> VisualState {
        // Later tweens override earlier ones; a tween holds its `from` until it starts.
        self.tweens
            .last()
            .map(|t| t.sample(at))
            .or(self.base)
            .unwrap_or(VisualState::IDENTITY)
    }
}

#[derive(Clone, Debug)]
struct SimWatch {
    node: NodeId,
    opts: ObserveOptions,
    last: bool,
}

/// Deterministic in-memory host: a laid-out page, a manual clock, a scroll offset, geometric
/// intersection watches, a frame queue and a tween log.
///
/// Nothing advances on its own. Drivers move the clock with [`SimHost::advance`], scroll with
/// [`SimHost::scroll_to`] and hand pending frames to the engine after draining them with
/// [`SimHost::take_frames`].
#[derive(Clone, Debug)]
pub struct SimHost {
    doc: SimDocument,
    viewport: ViewportSize,
    now: f64,
    scroll: f64,
    reduced_motion: bool,
    media: BTreeMap<String, bool>,
    visuals: HashMap<NodeId, NodeVisual>,
    watches: BTreeMap<WatchId, SimWatch>,
    next_watch: u64,
    records: Vec<IntersectionRecord>,
    frames: Vec<FrameToken>,
    next_frame: u64,
    log: Vec<LogEntry>,
}

impl SimHost {
    /// Build a host from a page description, scrolled to the top at time 0.
    pub fn new(page: &PageDef) -> UnveilResult<Self> {
        let viewport = ViewportSize::new(page.viewport.width, page.viewport.height)?;
        let doc = SimDocument::build(&page.body)?;
        Ok(Self {
            doc,
            viewport,
            now: 0.0,
            scroll: 0.0,
            reduced_motion: false,
            media: BTreeMap::new(),
            visuals: HashMap::new(),
            watches: BTreeMap::new(),
            next_watch: 1,
            records: Vec::new(),
            frames: Vec::new(),
            next_frame: 1,
            log: Vec::new(),
        })
    }

    /// Load a page description from disk and build a host from it.
    pub fn from_path(path: impl AsRef<Path>) -> UnveilResult<Self> {
        Self::new(&PageDef::from_path(path)?)
    }

    /// Builder: start with the reduced-motion preference set.
    pub fn with_reduced_motion(mut self, on: bool) -> Self {
        self.reduced_motion = on;
        self
    }

    /// Builder: force a media query result that the built-in evaluator does not know.
    pub fn with_media(mut self, query: &str, matches: bool) -> Self {
        self.media.insert(query.to_owned(), matches);
        self
    }

    fn push(&mut self, event: SimEvent) {
        self.log.push(LogEntry {
            at: self.now,
            event,
        });
    }

    /// Viewport size.
    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    /// Move the clock forward by `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        if dt.is_finite() && dt > 0.0 {
            self.now += dt;
        }
    }

    /// Scroll to `offset`, clamped to `[0, max_scroll]`, and recompute every watch. Returns
    /// whether the offset changed.
    pub fn scroll_to(&mut self, offset: f64) -> bool {
        let offset = if offset.is_finite() {
            offset.clamp(0.0, self.max_scroll())
        } else {
            self.scroll
        };
        if offset == self.scroll {
            return false;
        }
        self.scroll = offset;
        self.push(SimEvent::Scroll { offset });
        self.refresh_watches();
        true
    }

    /// Resize the viewport and recompute every watch.
    pub fn resize(&mut self, viewport: ViewportSize) {
        self.viewport = viewport;
        self.push(SimEvent::Resize { viewport });
        self.scroll = self.scroll.min(self.max_scroll());
        self.refresh_watches();
    }

    /// Change the reduced-motion preference.
    pub fn set_reduced_motion(&mut self, on: bool) {
        if self.reduced_motion != on {
            self.reduced_motion = on;
            self.push(SimEvent::ReducedMotion { on });
        }
    }

    /// Drain pending frames in request order.
    pub fn take_frames(&mut self) -> Vec<FrameToken> {
        std::mem::take(&mut self.frames)
    }

    /// Number of pending frames.
    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    /// Number of live intersection watches.
    pub fn watch_count(&self) -> usize {
        self.watches.len()
    }

    /// Presentation of `node` at the current clock time.
    pub fn state(&self, node: NodeId) -> VisualState {
        self.state_at(node, self.now)
    }

    /// Presentation of `node` at clock time `at`, assuming nothing else is issued meanwhile.
    pub fn state_at(&self, node: NodeId, at: f64) -> VisualState {
        self.visuals
            .get(&node)
            .map_or(VisualState::IDENTITY, |v| v.sample(at))
    }

    /// Tweens issued on `node` since it was last set or killed, oldest first.
    pub fn tweens(&self, node: NodeId) -> &[ScheduledTween] {
        self.visuals.get(&node).map_or(&[], |v| &v.tweens)
    }

    /// Every tween ever issued on `node`, oldest first.
    pub fn tween_history(&self, node: NodeId) -> Vec<ScheduledTween> {
        self.log
            .iter()
            .filter_map(|e| match &e.event {
                SimEvent::Tween { node: n, tween } if *n == node => Some(*tween),
                _ => None,
            })
            .collect()
    }

    /// Everything that happened so far.
    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// Readable label of a node: `#id`, else `tag.class[index]`.
    pub fn label(&self, node: NodeId) -> String {
        self.doc.label(node)
    }

    /// One line per log entry, with node labels.
    pub fn render_log(&self) -> Vec<String> {
        self.log
            .iter()
            .map(|e| format!("{:>8.3}s  {}", e.at, self.describe(&e.event)))
            .collect()
    }

    fn describe(&self, event: &SimEvent) -> String {
        let s = |v: &VisualState| {
            format!(
                "opacity={:.3} x={:.1} y={:.1} scale={:.3} scale_x={:.3}",
                v.opacity, v.x, v.y, v.scale, v.scale_x
            )
        };
        match event {
            SimEvent::Scroll { offset } => format!("scroll {offset:.1}"),
            SimEvent::Set { node, state } => format!("set {} {}", self.label(*node), s(state)),
            SimEvent::Tween { node, tween } => format!(
                "tween {} start={:.3} duration={:.3} ease={} to {}",
                self.label(*node),
                tween.start,
                tween.duration,
                tween.ease,
                s(&tween.to)
            ),
            SimEvent::Kill { node } => format!("kill {}", self.label(*node)),
            SimEvent::Class { node, class, on } => format!(
                "class {} {}{class}",
                self.label(*node),
                if *on { '+' } else { '-' }
            ),
            SimEvent::Attribute { node, name, value } => match value {
                Some(v) => format!("attr {} {name}=\"{v}\"", self.label(*node)),
                None => format!("attr {} -{name}", self.label(*node)),
            },
            SimEvent::Display { node, displayed } => {
                format!("display {} {displayed}", self.label(*node))
            }
            SimEvent::Focus { node } => format!("focus {}", self.label(*node)),
            SimEvent::Observe { watch, node } => {
                format!("observe {} watch={}", self.label(*node), watch.0)
            }
            SimEvent::Unobserve { watch } => format!("unobserve watch={}", watch.0),
            SimEvent::Intersection(r) => format!(
                "intersection {} watch={} {}",
                self.label(r.node),
                r.watch.0,
                if r.is_intersecting { "in" } else { "out" }
            ),
            SimEvent::FrameRequested { token } => format!("frame requested {}", token.0),
            SimEvent::FrameCancelled { token } => format!("frame cancelled {}", token.0),
            SimEvent::Resize { viewport } => {
                format!("resize {}x{}", viewport.width, viewport.height)
            }
            SimEvent::ReducedMotion { on } => format!("reduced-motion {on}"),
        }
    }

    fn intersecting(&self, node: NodeId, opts: &ObserveOptions) -> bool {
        match self.rect(node) {
            Some(r) => opts.intersects(r.y0, r.y1, self.scroll, self.viewport.height),
            None => false,
        }
    }

    fn refresh_watches(&mut self) {
        let changed: Vec<IntersectionRecord> = self
            .watches
            .iter()
            .filter_map(|(&watch, w)| {
                let now = self.intersecting(w.node, &w.opts);
                (now != w.last).then_some(IntersectionRecord {
                    watch,
                    node: w.node,
                    is_intersecting: now,
                })
            })
            .collect();
        for r in changed {
            if let Some(w) = self.watches.get_mut(&r.watch) {
                w.last = r.is_intersecting;
            }
            self.queue(r);
        }
    }

    fn queue(&mut self, record: IntersectionRecord) {
        self.push(SimEvent::Intersection(record));
        self.records.push(record);
    }

    fn parse_px(v: &str) -> Option<f64> {
        v.trim().trim_end_matches("px").trim().parse().ok()
    }
}

impl Document for SimHost {
    fn query(&self, selector: &str) -> Vec<NodeId> {
        self.doc.select(selector, None)
    }

    fn query_within(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        self.doc.select(selector, Some(scope))
    }

    fn exists(&self, node: NodeId) -> bool {
        self.doc.node(node).is_some()
    }

    fn rect(&self, node: NodeId) -> Option<Rect> {
        if !self.doc.is_rendered(node) {
            return None;
        }
        self.doc.node(node).map(|n| n.rect)
    }

    fn body(&self) -> NodeId {
        NodeId(0)
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.doc
            .node(node)
            .is_some_and(|n| n.classes.contains(class))
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        let added = self
            .doc
            .node_mut(node)
            .is_some_and(|n| n.classes.insert(class.to_owned()));
        if added {
            self.push(SimEvent::Class {
                node,
                class: class.to_owned(),
                on: true,
            });
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        let removed = self
            .doc
            .node_mut(node)
            .is_some_and(|n| n.classes.remove(class));
        if removed {
            self.push(SimEvent::Class {
                node,
                class: class.to_owned(),
                on: false,
            });
        }
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        let n = self.doc.node(node)?;
        match name {
            "id" => n.id.clone(),
            "class" => Some(n.classes.iter().cloned().collect::<Vec<_>>().join(" ")),
            _ => n.attrs.get(name).cloned(),
        }
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(n) = self.doc.node_mut(node) else {
            return;
        };
        if n.attrs.get(name).map(String::as_str) == Some(value) {
            return;
        }
        n.attrs.insert(name.to_owned(), value.to_owned());
        self.push(SimEvent::Attribute {
            node,
            name: name.to_owned(),
            value: Some(value.to_owned()),
        });
        if name == "hidden" {
            self.refresh_watches();
        }
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        let removed = self
            .doc
            .node_mut(node)
            .is_some_and(|n| n.attrs.remove(name).is_some());
        if !removed {
            return;
        }
        self.push(SimEvent::Attribute {
            node,
            name: name.to_owned(),
            value: None,
        });
        if name == "hidden" {
            self.refresh_watches();
        }
    }

    fn set_displayed(&mut self, node: NodeId, displayed: bool) {
        let changed = match self.doc.node_mut(node) {
            Some(n) if n.displayed != displayed => {
                n.displayed = displayed;
                true
            }
            _ => false,
        };
        if changed {
            self.push(SimEvent::Display { node, displayed });
            self.refresh_watches();
        }
    }

    fn is_displayed(&self, node: NodeId) -> bool {
        self.doc.node(node).is_some_and(|n| n.displayed)
    }

    fn focus(&mut self, node: NodeId) {
        if self.exists(node) && self.doc.focused != Some(node) {
            self.doc.focused = Some(node);
            self.push(SimEvent::Focus { node });
        }
    }

    fn focused(&self) -> Option<NodeId> {
        self.doc.focused
    }
}

impl Animator for SimHost {
    fn set(&mut self, node: NodeId, state: VisualState) {
        if !self.exists(node) {
            return;
        }
        let v = self.visuals.entry(node).or_default();
        v.base = Some(state);
        v.tweens.clear();
        self.push(SimEvent::Set { node, state });
    }

    fn tween(&mut self, node: NodeId, req: TweenRequest) {
        if !self.exists(node) {
            return;
        }
        let tween = ScheduledTween::schedule(&req, self.now);
        self.visuals.entry(node).or_default().tweens.push(tween);
        self.push(SimEvent::Tween { node, tween });
    }

    fn kill(&mut self, node: NodeId) {
        let now = self.now;
        let Some(v) = self.visuals.get_mut(&node) else {
            return;
        };
        let running = v.tweens.iter().any(|t| t.end() > now);
        v.base = Some(v.sample(now));
        v.tweens.clear();
        if running {
            self.push(SimEvent::Kill { node });
        }
    }

    fn current(&self, node: NodeId) -> VisualState {
        self.state(node)
    }
}

impl Viewport for SimHost {
    fn now(&self) -> f64 {
        self.now
    }

    fn viewport_height(&self) -> f64 {
        self.viewport.height
    }

    fn scroll_offset(&self) -> f64 {
        self.scroll
    }

    fn max_scroll(&self) -> f64 {
        (self.doc.height() - self.viewport.height).max(0.0)
    }

    fn observe(&mut self, node: NodeId, opts: ObserveOptions) -> WatchId {
        let watch = WatchId(self.next_watch);
        self.next_watch += 1;
        let now = self.intersecting(node, &opts);
        self.watches.insert(
            watch,
            SimWatch {
                node,
                opts,
                last: now,
            },
        );
        self.push(SimEvent::Observe { watch, node });
        self.queue(IntersectionRecord {
            watch,
            node,
            is_intersecting: now,
        });
        watch
    }

    fn unobserve(&mut self, watch: WatchId) {
        if self.watches.remove(&watch).is_some() {
            self.records.retain(|r| r.watch != watch);
            self.push(SimEvent::Unobserve { watch });
        }
    }

    fn take_records(&mut self) -> Vec<IntersectionRecord> {
        std::mem::take(&mut self.records)
    }

    fn request_frame(&mut self) -> FrameToken {
        let token = FrameToken(self.next_frame);
        self.next_frame += 1;
        self.frames.push(token);
        self.push(SimEvent::FrameRequested { token });
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        let before = self.frames.len();
        self.frames.retain(|t| *t != token);
        if self.frames.len() != before {
            self.push(SimEvent::FrameCancelled { token });
        }
    }

    fn matches_media(&self, query: &str) -> bool {
        if let Some(&forced) = self.media.get(query) {
            return forced;
        }
        let inner = query.trim().trim_start_matches('(').trim_end_matches(')');
        let Some((feature, value)) = inner.split_once(':') else {
            return false;
        };
        let value = value.trim();
        match feature.trim() {
            "prefers-reduced-motion" => match value {
                "reduce" => self.reduced_motion,
                "no-preference" => !self.reduced_motion,
                _ => false,
            },
            "min-width" => Self::parse_px(value).is_some_and(|w| self.viewport.width >= w),
            "max-width" => Self::parse_px(value).is_some_and(|w| self.viewport.width <= w),
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sim/host.rs"]
mod tests;
