//! The reveal engine: one-shot reveals, staggered groups and scroll-scrubbed anchors.

pub(crate) mod config;

use crate::animation::ease::Ease;
use crate::animation::state::{Lerp, VisualState, resolve_pair};
use crate::animation::tween::{Timing, TweenRequest, stagger_delay};
use crate::engine::config::{
    EngineOptions, GroupConfig, RevealConfig, RevealTrigger, ScrubConfig, Target,
};
use crate::foundation::core::Rect;
use crate::host::{FrameToken, Host, IntersectionRecord, NodeId, WatchId};
use crate::trigger::point::EnterPoint;
use crate::trigger::region::{ObserveOptions, ScrubRange};
use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;
use std::collections::HashMap;

new_key_type! {
    /// Handle to a registered reveal or group.
    pub struct RevealHandle;
    /// Handle to a registered scroll-scrubbed anchor.
    pub struct ScrubHandle;
}

/// How a registration is driven.
///
/// Discrete reveals carry per-member fired flags and react to intersection records; continuous
/// anchors carry no fired flag and react to sampled scroll offsets once per frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerStrategy {
    /// One-shot, intersection driven.
    Discrete,
    /// Scroll-sampled, every frame.
    Continuous,
}

/// A registration of either strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Registration {
    /// A reveal or group.
    Reveal(RevealHandle),
    /// A scrubbed anchor.
    Scrub(ScrubHandle),
}

impl Registration {
    /// Strategy driving this registration.
    pub fn strategy(&self) -> TriggerStrategy {
        match self {
            Self::Reveal(_) => TriggerStrategy::Discrete,
            Self::Scrub(_) => TriggerStrategy::Continuous,
        }
    }
}

/// Configuration of either strategy, for callers that register from data.
#[derive(Clone, Debug, PartialEq)]
pub enum TriggerSpec {
    /// One-shot reveal of each matched node.
    Reveal(RevealConfig),
    /// Staggered group over the matched nodes.
    Group(GroupConfig),
    /// Scroll-scrubbed anchor on each matched node.
    Scrub(ScrubConfig),
}

#[derive(Clone, Debug)]
struct Revealable {
    node: NodeId,
    initial: VisualState,
    target: VisualState,
    timing: Timing,
    fired: bool,
}

/// Which members a watch fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WatchScope {
    All,
    Member(usize),
}

#[derive(Clone, Debug)]
struct Watch {
    id: WatchId,
    scope: WatchScope,
}

#[derive(Clone, Debug)]
struct RevealEntry {
    members: Vec<Revealable>,
    point: Option<EnterPoint>,
    shared_anchor: Option<NodeId>,
    watches: SmallVec<[Watch; 1]>,
    retrigger: bool,
}

#[derive(Clone, Debug)]
struct ScrollAnchor {
    node: NodeId,
    anchor: NodeId,
    from: VisualState,
    to: VisualState,
    range: ScrubRange,
    ease: Ease,
    smoothing: Option<f64>,
    last_progress: Option<f64>,
}

/// Owns every registration of one page and the host it drives.
///
/// Registrations are discovered once, typically from a [`crate::Manifest`]. The engine must be
/// torn down when the page goes away; [`Engine::teardown`] also runs on drop.
pub struct Engine<H: Host> {
    host: H,
    opts: EngineOptions,
    reduced_motion: bool,
    reveals: SlotMap<RevealHandle, RevealEntry>,
    watch_owners: HashMap<WatchId, RevealHandle>,
    anchors: SlotMap<ScrubHandle, ScrollAnchor>,
    pending_frame: Option<FrameToken>,
    torn_down: bool,
}

impl<H: Host> Engine<H> {
    /// Create an engine over `host`, sampling the reduced-motion preference once.
    pub fn new(host: H, opts: EngineOptions) -> Self {
        let reduced_motion = host.matches_media(&opts.reduced_motion_query);
        tracing::debug!(reduced_motion, "reveal engine created");
        Self {
            host,
            opts,
            reduced_motion,
            reveals: SlotMap::with_key(),
            watch_owners: HashMap::new(),
            anchors: SlotMap::with_key(),
            pending_frame: None,
            torn_down: false,
        }
    }

    /// Shared access to the host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Exclusive access to the host.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Whether reduced motion is in effect.
    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// Engine options.
    pub fn options(&self) -> &EngineOptions {
        &self.opts
    }

    /// Register a one-shot reveal on every node `target` resolves to.
    ///
    /// Each node is its own Revealable with the configured delay. Without an explicit anchor,
    /// each node watches its own position. Returns `None` (and does nothing) when the target
    /// resolves to no attached node.
    #[tracing::instrument(skip(self, target, config))]
    pub fn register_reveal(
        &mut self,
        target: impl Into<Target>,
        config: &RevealConfig,
    ) -> Option<RevealHandle> {
        self.register(target.into(), config, 0.0, false)
    }

    /// Register a staggered group: member `i` starts `delay + i * stagger` after the group's
    /// trigger fires. Members share one watch, on the anchor or on the first member.
    #[tracing::instrument(skip(self, target, config))]
    pub fn register_group(
        &mut self,
        target: impl Into<Target>,
        config: &GroupConfig,
    ) -> Option<RevealHandle> {
        self.register(target.into(), &config.reveal, config.stagger, true)
    }

    /// Register `target` under either strategy.
    pub fn register_spec(
        &mut self,
        target: impl Into<Target>,
        spec: &TriggerSpec,
    ) -> Vec<Registration> {
        match spec {
            TriggerSpec::Reveal(c) => self
                .register_reveal(target, c)
                .map(Registration::Reveal)
                .into_iter()
                .collect(),
            TriggerSpec::Group(c) => self
                .register_group(target, c)
                .map(Registration::Reveal)
                .into_iter()
                .collect(),
            TriggerSpec::Scrub(c) => self
                .register_scrub(target, c)
                .into_iter()
                .map(Registration::Scrub)
                .collect(),
        }
    }

    fn register(
        &mut self,
        target: Target,
        config: &RevealConfig,
        stagger: f64,
        grouped: bool,
    ) -> Option<RevealHandle> {
        if self.torn_down {
            return None;
        }
        let nodes = target.resolve(&self.host);
        if nodes.is_empty() {
            tracing::trace!(?target, "reveal target missing, skipping");
            return None;
        }

        let members: Vec<Revealable> = nodes
            .iter()
            .enumerate()
            .map(|(i, &node)| {
                let bounds = self.host.rect(node).unwrap_or(Rect::ZERO);
                let (initial, target) = resolve_pair(&config.from, &config.to, bounds);
                let delay = if grouped {
                    stagger_delay(config.timing.delay, stagger, i)
                } else {
                    config.timing.delay
                };
                Revealable {
                    node,
                    initial,
                    target,
                    timing: config.timing.with_delay(delay),
                    fired: false,
                }
            })
            .collect();

        let (point, shared_anchor) = match &config.trigger {
            RevealTrigger::Load => (None, None),
            RevealTrigger::Enter { point, anchor } => {
                let anchor = match anchor {
                    Some(t) => match t.resolve(&self.host).first() {
                        Some(&a) => Some(a),
                        None => {
                            tracing::trace!(?t, "reveal anchor missing, skipping");
                            return None;
                        }
                    },
                    None if grouped => Some(members[0].node),
                    None => None,
                };
                (Some(*point), anchor)
            }
        };

        if self.reduced_motion {
            for m in &members {
                self.host.set(m.node, m.target);
                if let Some(class) = &self.opts.reveal_class {
                    self.host.add_class(m.node, class);
                }
            }
            let handle = self.reveals.insert(RevealEntry {
                members,
                point,
                shared_anchor,
                watches: SmallVec::new(),
                retrigger: config.retrigger,
            });
            self.mark_all_fired(handle);
            return Some(handle);
        }

        for m in &members {
            self.host.set(m.node, m.initial);
        }

        let handle = self.reveals.insert(RevealEntry {
            members,
            point,
            shared_anchor,
            watches: SmallVec::new(),
            retrigger: config.retrigger,
        });

        match point {
            None => self.fire(handle, WatchScope::All),
            Some(_) => self.watch_entry(handle),
        }
        Some(handle)
    }

    fn watch_entry(&mut self, handle: RevealHandle) {
        let Some(entry) = self.reveals.get(handle) else {
            return;
        };
        let Some(point) = entry.point else {
            return;
        };
        let targets: SmallVec<[(NodeId, WatchScope); 4]> = match entry.shared_anchor {
            Some(a) => smallvec::smallvec![(a, WatchScope::All)],
            None => entry
                .members
                .iter()
                .enumerate()
                .map(|(i, m)| (m.node, WatchScope::Member(i)))
                .collect(),
        };
        for (node, scope) in targets {
            self.watch(handle, node, scope, &point);
        }
    }

    fn watch(&mut self, handle: RevealHandle, node: NodeId, scope: WatchScope, point: &EnterPoint) {
        let vh = self.host.viewport_height();
        let height = self.host.rect(node).map_or(0.0, |r| r.height());
        let id = self.host.observe(node, ObserveOptions::for_enter(point, height, vh));
        if let Some(entry) = self.reveals.get_mut(handle) {
            entry.watches.push(Watch { id, scope });
            self.watch_owners.insert(id, handle);
        } else {
            self.host.unobserve(id);
        }
    }

    /// Intersection callback. Returns `false` when `watch` does not belong to this engine.
    ///
    /// The first intersecting record fires the watched member(s); later records are ignored
    /// until a [`Engine::rearm`].
    pub fn on_intersect(&mut self, watch: WatchId, is_intersecting: bool) -> bool {
        let Some(&handle) = self.watch_owners.get(&watch) else {
            return false;
        };
        if !is_intersecting {
            return true;
        }
        let Some(scope) = self
            .reveals
            .get(handle)
            .and_then(|e| e.watches.iter().find(|w| w.id == watch))
            .map(|w| w.scope)
        else {
            return true;
        };
        self.fire(handle, scope);
        true
    }

    /// Drain the host's queued intersection records, dispatching those this engine owns.
    /// Records for foreign watches are returned in order.
    pub fn pump(&mut self) -> Vec<IntersectionRecord> {
        let records = self.host.take_records();
        let mut foreign = Vec::new();
        for r in records {
            if !self.on_intersect(r.watch, r.is_intersecting) {
                foreign.push(r);
            }
        }
        foreign
    }

    fn fire(&mut self, handle: RevealHandle, scope: WatchScope) {
        let Some(entry) = self.reveals.get_mut(handle) else {
            return;
        };
        let indices: SmallVec<[usize; 8]> = match scope {
            WatchScope::All => (0..entry.members.len()).collect(),
            WatchScope::Member(i) => smallvec::smallvec![i],
        };

        let mut started = 0usize;
        for i in indices {
            let Some(m) = entry.members.get_mut(i) else {
                continue;
            };
            if m.fired {
                continue;
            }
            m.fired = true;
            started += 1;
            self.host.tween(
                m.node,
                TweenRequest {
                    from: m.initial,
                    to: m.target,
                    timing: m.timing,
                },
            );
            if let Some(class) = &self.opts.reveal_class {
                self.host.add_class(m.node, class);
            }
        }
        if started > 0 {
            tracing::debug!(?handle, started, "reveal fired");
        }

        if entry.retrigger {
            return;
        }
        let done: SmallVec<[WatchId; 4]> = entry
            .watches
            .iter()
            .filter(|w| match w.scope {
                WatchScope::All => entry.members.iter().all(|m| m.fired),
                WatchScope::Member(i) => entry.members.get(i).is_some_and(|m| m.fired),
            })
            .map(|w| w.id)
            .collect();
        entry.watches.retain(|w| !done.contains(&w.id));
        for id in done {
            self.host.unobserve(id);
            self.watch_owners.remove(&id);
        }
    }

    fn mark_all_fired(&mut self, handle: RevealHandle) {
        if let Some(entry) = self.reveals.get_mut(handle) {
            for m in &mut entry.members {
                m.fired = true;
            }
        }
    }

    /// Reset a reveal so it plays again: clear fired flags, reapply the initial state and
    /// restart observation (the fresh watch reports the current intersection state).
    ///
    /// Under reduced motion the target state is reapplied instead.
    #[tracing::instrument(skip(self))]
    pub fn rearm(&mut self, handle: RevealHandle) {
        if self.torn_down {
            return;
        }
        let Some(entry) = self.reveals.get_mut(handle) else {
            return;
        };
        let old: SmallVec<[WatchId; 4]> = entry.watches.drain(..).map(|w| w.id).collect();
        for id in old {
            self.host.unobserve(id);
            self.watch_owners.remove(&id);
        }

        if self.reduced_motion {
            for m in &entry.members {
                self.host.set(m.node, m.target);
                if let Some(class) = &self.opts.reveal_class {
                    self.host.add_class(m.node, class);
                }
            }
            return;
        }

        for m in &mut entry.members {
            m.fired = false;
            self.host.kill(m.node);
            self.host.set(m.node, m.initial);
            if let Some(class) = &self.opts.reveal_class {
                self.host.remove_class(m.node, class);
            }
        }

        if entry.point.is_some() {
            self.watch_entry(handle);
        } else {
            self.fire(handle, WatchScope::All);
        }
    }

    /// Re-arm only the member animating `node`, leaving the rest of its reveal alone. Returns
    /// `false` when no reveal animates `node`.
    ///
    /// The member is watched on its own node, whatever anchor its reveal shares.
    #[tracing::instrument(skip(self))]
    pub fn rearm_node(&mut self, node: NodeId) -> bool {
        if self.torn_down {
            return false;
        }
        let Some((handle, i)) = self.member_of(node) else {
            return false;
        };
        let Some(entry) = self.reveals.get_mut(handle) else {
            return false;
        };
        let scope = WatchScope::Member(i);
        let old: SmallVec<[WatchId; 1]> = entry
            .watches
            .iter()
            .filter(|w| w.scope == scope)
            .map(|w| w.id)
            .collect();
        entry.watches.retain(|w| w.scope != scope);
        for id in old {
            self.host.unobserve(id);
            self.watch_owners.remove(&id);
        }

        let m = &mut entry.members[i];
        if self.reduced_motion {
            self.host.set(m.node, m.target);
            if let Some(class) = &self.opts.reveal_class {
                self.host.add_class(m.node, class);
            }
            return true;
        }
        m.fired = false;
        self.host.kill(m.node);
        self.host.set(m.node, m.initial);
        if let Some(class) = &self.opts.reveal_class {
            self.host.remove_class(m.node, class);
        }
        let (node, point) = (m.node, entry.point);
        match point {
            Some(point) => self.watch(handle, node, scope, &point),
            None => self.fire(handle, scope),
        }
        true
    }

    fn member_of(&self, node: NodeId) -> Option<(RevealHandle, usize)> {
        self.reveals.iter().find_map(|(h, e)| {
            e.members
                .iter()
                .position(|m| m.node == node)
                .map(|i| (h, i))
        })
    }

    /// Whether every member of a reveal has fired; `None` for unknown handles.
    pub fn is_fired(&self, handle: RevealHandle) -> Option<bool> {
        self.reveals
            .get(handle)
            .map(|e| e.members.iter().all(|m| m.fired))
    }

    /// Nodes of a reveal, in member order.
    pub fn members(&self, handle: RevealHandle) -> Vec<NodeId> {
        self.reveals
            .get(handle)
            .map(|e| e.members.iter().map(|m| m.node).collect())
            .unwrap_or_default()
    }

    /// Number of live intersection watches owned by the engine.
    pub fn watch_count(&self) -> usize {
        self.watch_owners.len()
    }

    /// Register a scroll-scrubbed anchor on every node `target` resolves to.
    ///
    /// The current progress is applied immediately. Under reduced motion nothing is
    /// registered and the nodes keep their stylesheet presentation.
    #[tracing::instrument(skip(self, target, config))]
    pub fn register_scrub(
        &mut self,
        target: impl Into<Target>,
        config: &ScrubConfig,
    ) -> Vec<ScrubHandle> {
        if self.torn_down || self.reduced_motion {
            return Vec::new();
        }
        let target = target.into();
        let nodes = target.resolve(&self.host);
        if nodes.is_empty() {
            tracing::trace!(?target, "scrub target missing, skipping");
            return Vec::new();
        }
        let anchor = match &config.anchor {
            Some(t) => match t.resolve(&self.host).first() {
                Some(&a) => a,
                None => return Vec::new(),
            },
            None => self.host.body(),
        };

        let mut handles = Vec::with_capacity(nodes.len());
        for node in nodes {
            let bounds = self.host.rect(node).unwrap_or(Rect::ZERO);
            let to = config.to.resolve(&VisualState::IDENTITY, bounds);
            let from = config.from.resolve(&to, bounds);
            let h = self.anchors.insert(ScrollAnchor {
                node,
                anchor,
                from,
                to,
                range: config.range,
                ease: config.ease,
                smoothing: config.smoothing,
                last_progress: None,
            });
            self.sample_anchor(h, true);
            handles.push(h);
        }
        handles
    }

    /// Scroll notification: collapse to at most one pending frame.
    pub fn on_scroll(&mut self) {
        if self.torn_down || self.anchors.is_empty() {
            return;
        }
        if let Some(token) = self.pending_frame.take() {
            self.host.cancel_frame(token);
        }
        self.pending_frame = Some(self.host.request_frame());
    }

    /// Frame callback. Returns `false` when `token` is not the engine's pending frame.
    pub fn on_frame(&mut self, token: FrameToken) -> bool {
        if self.pending_frame != Some(token) {
            return false;
        }
        self.pending_frame = None;
        let handles: Vec<ScrubHandle> = self.anchors.keys().collect();
        for h in handles {
            self.sample_anchor(h, false);
        }
        true
    }

    /// Whether a frame is pending.
    pub fn has_pending_frame(&self) -> bool {
        self.pending_frame.is_some()
    }

    /// Last applied progress of a scrubbed anchor.
    pub fn scrub_progress(&self, handle: ScrubHandle) -> Option<f64> {
        self.anchors.get(handle).and_then(|a| a.last_progress)
    }

    fn sample_anchor(&mut self, handle: ScrubHandle, immediate: bool) {
        let scroll = self.host.scroll_offset();
        let vh = self.host.viewport_height();
        let max = self.host.max_scroll();
        let Some(a) = self.anchors.get_mut(handle) else {
            return;
        };
        let Some(anchor_rect) = self.host.rect(a.anchor) else {
            return;
        };
        let range = a
            .range
            .resolve(anchor_rect.y0, anchor_rect.height(), vh, max);
        let progress = range.progress(scroll);
        if a.last_progress == Some(progress) {
            return;
        }
        let state = VisualState::lerp(&a.from, &a.to, a.ease.apply(progress));
        match (a.smoothing, a.last_progress, immediate) {
            (Some(secs), Some(_), false) if secs > 0.0 => {
                let current = self.host.current(a.node);
                self.host.kill(a.node);
                self.host.tween(
                    a.node,
                    TweenRequest {
                        from: current,
                        to: state,
                        timing: Timing::new(secs, Ease::OutQuad),
                    },
                );
            }
            _ => self.host.set(a.node, state),
        }
        a.last_progress = Some(progress);
    }

    /// Media-change subscription for the reduced-motion preference.
    ///
    /// Turning it on snaps every Revealable to its target with the reveal class, drops all watches and
    /// scrubbed anchors. Turning it off only affects later registrations.
    pub fn set_reduced_motion(&mut self, on: bool) {
        if on == self.reduced_motion {
            return;
        }
        self.reduced_motion = on;
        tracing::debug!(on, "reduced motion changed");
        if !on {
            return;
        }
        for (_, entry) in self.reveals.iter_mut() {
            for m in &mut entry.members {
                m.fired = true;
                self.host.kill(m.node);
                self.host.set(m.node, m.target);
                if let Some(class) = &self.opts.reveal_class {
                    self.host.add_class(m.node, class);
                }
            }
            for w in entry.watches.drain(..) {
                self.host.unobserve(w.id);
            }
        }
        self.watch_owners.clear();
        self.anchors.clear();
        if let Some(token) = self.pending_frame.take() {
            self.host.cancel_frame(token);
        }
    }

    /// Disconnect every watch and cancel the pending frame. Idempotent; later registrations
    /// are no-ops.
    #[tracing::instrument(skip(self))]
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        let mut released = 0usize;
        for (_, entry) in self.reveals.iter_mut() {
            for w in entry.watches.drain(..) {
                self.host.unobserve(w.id);
                released += 1;
            }
        }
        self.watch_owners.clear();
        self.anchors.clear();
        if let Some(token) = self.pending_frame.take() {
            self.host.cancel_frame(token);
        }
        tracing::debug!(released, "reveal engine torn down");
    }

    /// Whether [`Engine::teardown`] has run.
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

impl<H: Host> Drop for Engine<H> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/engine.rs"]
mod tests;
