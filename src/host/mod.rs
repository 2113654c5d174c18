//! Capabilities the engine consumes from its environment.
//!
//! A real embedding backs these with a browser document, a tween library and intersection
//! observers; [`crate::sim::SimHost`] backs them with a deterministic in-memory page.

use crate::animation::state::VisualState;
use crate::animation::tween::TweenRequest;
use crate::foundation::core::Rect;
use crate::trigger::region::ObserveOptions;

/// Opaque handle to a document node.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct NodeId(pub u32);

/// Handle to one intersection watch.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct WatchId(pub u64);

/// Handle to one requested animation frame.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameToken(pub u64);

/// One intersection change reported by a [`Viewport`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct IntersectionRecord {
    /// Watch that produced the record.
    pub watch: WatchId,
    /// Observed node.
    pub node: NodeId,
    /// Whether the node now intersects the watch's viewport box.
    pub is_intersecting: bool,
}

/// Keys the page components react to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Key {
    /// Escape closes overlays.
    Escape,
    /// Any other key, by name.
    Other(char),
}

/// Events a host delivers to a [`crate::Page`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub enum HostEvent {
    /// The document scrolled; the new offset is readable through [`Viewport::scroll_offset`].
    Scroll,
    /// A requested frame is due.
    Frame(FrameToken),
    /// A watched media query changed its match state.
    MediaChange {
        /// Media query text.
        query: String,
        /// New match state.
        matches: bool,
    },
    /// A key was pressed.
    Key(Key),
    /// A node was clicked.
    Click(NodeId),
}

/// Read and mutate the document tree.
pub trait Document {
    /// Nodes matching `selector`, in document order.
    fn query(&self, selector: &str) -> Vec<NodeId>;

    /// Descendants of `scope` matching `selector`, in document order.
    fn query_within(&self, scope: NodeId, selector: &str) -> Vec<NodeId>;

    /// First node matching `selector`.
    fn query_one(&self, selector: &str) -> Option<NodeId> {
        self.query(selector).into_iter().next()
    }

    /// Whether `node` is still attached.
    fn exists(&self, node: NodeId) -> bool;

    /// Layout box in document coordinates, `None` when the node is not rendered.
    fn rect(&self, node: NodeId) -> Option<Rect>;

    /// The document body.
    fn body(&self) -> NodeId;

    /// Whether `node` carries `class`.
    fn has_class(&self, node: NodeId, class: &str) -> bool;

    /// Add `class` to `node`.
    fn add_class(&mut self, node: NodeId, class: &str);

    /// Remove `class` from `node`.
    fn remove_class(&mut self, node: NodeId, class: &str);

    /// Add or remove `class` depending on `on`.
    fn toggle_class(&mut self, node: NodeId, class: &str, on: bool) {
        if on {
            self.add_class(node, class);
        } else {
            self.remove_class(node, class);
        }
    }

    /// Attribute value.
    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    /// Set an attribute.
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    /// Remove an attribute; absent attributes are ignored.
    fn remove_attribute(&mut self, node: NodeId, name: &str);

    /// Show or suppress a node (`display: none`).
    fn set_displayed(&mut self, node: NodeId, displayed: bool);

    /// Whether a node is displayed.
    fn is_displayed(&self, node: NodeId) -> bool;

    /// Move keyboard focus.
    fn focus(&mut self, node: NodeId);

    /// Currently focused node.
    fn focused(&self) -> Option<NodeId>;
}

/// Tween capability: interpolates visual properties over time, fire-and-forget.
pub trait Animator {
    /// Apply `state` immediately.
    fn set(&mut self, node: NodeId, state: VisualState);

    /// Start a tween on `node`; the host owns its timing from here on.
    fn tween(&mut self, node: NodeId, req: TweenRequest);

    /// Stop tweens on `node` that have not finished, leaving it at its current state.
    fn kill(&mut self, node: NodeId);

    /// Presentation of `node` right now, as last set or interpolated.
    fn current(&self, node: NodeId) -> VisualState;
}

/// Viewport capability: scroll position, intersection watches, frames and media queries.
pub trait Viewport {
    /// Current clock time in seconds.
    fn now(&self) -> f64;

    /// Viewport height in pixels.
    fn viewport_height(&self) -> f64;

    /// Current vertical scroll offset.
    fn scroll_offset(&self) -> f64;

    /// Largest reachable scroll offset.
    fn max_scroll(&self) -> f64;

    /// Start watching `node`. An initial record with the current state is queued.
    fn observe(&mut self, node: NodeId, opts: ObserveOptions) -> WatchId;

    /// Stop a watch; unknown watches are ignored.
    fn unobserve(&mut self, watch: WatchId);

    /// Drain queued intersection records, oldest first.
    fn take_records(&mut self) -> Vec<IntersectionRecord>;

    /// Request a callback on the next frame.
    fn request_frame(&mut self) -> FrameToken;

    /// Cancel a pending frame; unknown tokens are ignored.
    fn cancel_frame(&mut self, token: FrameToken);

    /// Evaluate a media query.
    fn matches_media(&self, query: &str) -> bool;
}

/// Everything an engine needs from its environment.
pub trait Host: Document + Animator + Viewport {}

impl<T: Document + Animator + Viewport> Host for T {}
