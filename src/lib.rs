//! Unveil is a headless scroll-triggered reveal engine for marketing-style pages.
//!
//! Nodes go from a hidden visual state to a visible one the first time they enter a
//! viewport-relative trigger region, optionally staggered as a group; other nodes follow the
//! scroll offset continuously. Around the engine sit the usual page behaviors: a hide-on-scroll
//! header, scroll-spy navigation, a mobile nav overlay, modals, accordions and a project filter.
//!
//! Everything is glue over three capabilities the crate consumes through traits
//! ([`Document`], [`Animator`], [`Viewport`]). The public API is manifest-oriented:
//!
//! - Load and validate a [`Manifest`]
//! - Install it over a [`Host`] with [`Page::new`]
//! - Deliver [`HostEvent`]s through [`Page::dispatch`]
//!
//! [`sim::SimHost`] is a deterministic in-memory host for tests and the `unveil` simulator.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod engine;
/// Capabilities the engine consumes from its environment.
pub mod host;
pub(crate) mod manifest;
pub(crate) mod page;
/// Deterministic simulated host.
pub mod sim;
pub(crate) mod trigger;

pub use crate::foundation::core::{Length, Rect, Vec2, ViewportSize};
pub use crate::foundation::error::{UnveilError, UnveilResult};

pub use crate::animation::ease::Ease;
pub use crate::animation::state::{Lerp, StateDef, VisualState, resolve_pair};
pub use crate::animation::tween::{ScheduledTween, Timing, TweenRequest, stagger_delay};
pub use crate::engine::config::{
    EngineOptions, GroupConfig, REDUCED_MOTION_QUERY, RevealConfig, RevealTrigger, ScrubConfig,
    Target,
};
pub use crate::engine::{
    Engine, Registration, RevealHandle, ScrubHandle, TriggerSpec, TriggerStrategy,
};
pub use crate::host::{
    Animator, Document, FrameToken, Host, HostEvent, IntersectionRecord, Key, NodeId, Viewport,
    WatchId,
};
pub use crate::manifest::{MANIFEST_VERSION, Manifest};
pub use crate::page::Page;
pub use crate::page::accordion::{Accordion, AccordionConfig};
pub use crate::page::filter::{FilterConfig, ProjectFilter};
pub use crate::page::header::{Header, HeaderConfig, HeaderState, HeaderVisibility, ScrolledMarker};
pub use crate::page::modal::{Modal, ModalConfig};
pub use crate::page::nav::{NavConfig, NavOverlay};
pub use crate::page::spy::{ScrollSpy, SpyConfig};
pub use crate::trigger::point::{Anchor, EnterPoint, ScrollPoint};
pub use crate::trigger::region::{ObserveOptions, ResolvedRange, ScrubRange};
