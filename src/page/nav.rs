use crate::animation::ease::Ease;
use crate::animation::state::VisualState;
use crate::animation::tween::{Timing, TweenRequest, stagger_delay};
use crate::host::{FrameToken, Host, Key, NodeId};

/// Mobile navigation overlay wiring.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavConfig {
    /// Hamburger button.
    #[serde(default = "default_toggle")]
    pub toggle: String,
    /// Overlay root.
    #[serde(default = "default_overlay")]
    pub overlay: String,
    /// Links inside the overlay, animated in order.
    #[serde(default = "default_links")]
    pub links: String,
    /// Backdrop inside the overlay; clicking it closes.
    #[serde(default = "default_background")]
    pub background: String,
    /// Secondary block inside the overlay, animated after the links.
    #[serde(default = "default_meta")]
    pub meta: String,
    /// Media query that closes the overlay when it starts matching.
    #[serde(default = "default_close_query")]
    pub close_query: String,
}

fn default_toggle() -> String {
    ".nav-toggle".to_owned()
}
fn default_overlay() -> String {
    "#nav-overlay".to_owned()
}
fn default_links() -> String {
    ".nav-overlay-link".to_owned()
}
fn default_background() -> String {
    ".nav-overlay-bg".to_owned()
}
fn default_meta() -> String {
    ".nav-overlay-meta".to_owned()
}
fn default_close_query() -> String {
    "(min-width: 900px)".to_owned()
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            toggle: default_toggle(),
            overlay: default_overlay(),
            links: default_links(),
            background: default_background(),
            meta: default_meta(),
            close_query: default_close_query(),
        }
    }
}

const BODY_CLASS: &str = "nav-open";
const OPEN_CLASS: &str = "is-open";
const ANIMATED_CLASS: &str = "nav-animated";
const LINK_STAGGER: f64 = 0.09;

fn raised(y: f64) -> VisualState {
    VisualState {
        opacity: 0.0,
        y,
        ..VisualState::IDENTITY
    }
}

/// Full-screen navigation overlay.
#[derive(Clone, Debug)]
pub struct NavOverlay {
    toggle: NodeId,
    overlay: NodeId,
    links: Vec<NodeId>,
    background: Option<NodeId>,
    meta: Option<NodeId>,
    close_query: String,
    open: bool,
    pending_focus: Option<FrameToken>,
}

impl NavOverlay {
    /// Resolve the overlay and its parts. `None` when the toggle or the overlay is missing.
    pub fn install<H: Host>(host: &mut H, config: &NavConfig) -> Option<Self> {
        let toggle = host.query_one(&config.toggle)?;
        let overlay = host.query_one(&config.overlay)?;
        let first_within = |sel: &str| host.query_within(overlay, sel).into_iter().next();
        let background = first_within(&config.background);
        let meta = first_within(&config.meta);
        let links = host.query_within(overlay, &config.links);
        let open = host.has_class(overlay, OPEN_CLASS);
        Some(Self {
            toggle,
            overlay,
            links,
            background,
            meta,
            close_query: config.close_query.clone(),
            open,
            pending_focus: None,
        })
    }

    /// Whether the overlay is open.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Media query this overlay reacts to.
    pub fn close_query(&self) -> &str {
        &self.close_query
    }

    /// Open the overlay. With `motion`, links rise in with a stagger and the meta block
    /// follows. The first link takes focus on the next frame.
    pub fn open<H: Host>(&mut self, host: &mut H, motion: bool) {
        if self.open {
            return;
        }
        self.open = true;
        let body = host.body();
        host.add_class(body, BODY_CLASS);
        host.add_class(self.overlay, OPEN_CLASS);
        host.set_attribute(self.toggle, "aria-expanded", "true");
        host.set_attribute(self.overlay, "aria-hidden", "false");

        if motion && !self.links.is_empty() {
            host.add_class(self.overlay, ANIMATED_CLASS);
            let timing = Timing::new(0.65, Ease::OutQuart);
            for (i, &link) in self.links.iter().enumerate() {
                host.kill(link);
                host.tween(
                    link,
                    TweenRequest {
                        from: raised(32.0),
                        to: VisualState::IDENTITY,
                        timing: timing.with_delay(stagger_delay(0.0, LINK_STAGGER, i)),
                    },
                );
            }
            if let Some(meta) = self.meta {
                host.tween(
                    meta,
                    TweenRequest {
                        from: raised(24.0),
                        to: VisualState::IDENTITY,
                        timing: Timing::new(0.55, Ease::OutCubic).with_delay(0.4),
                    },
                );
            }
        }

        if let Some(old) = self.pending_focus.take() {
            host.cancel_frame(old);
        }
        self.pending_focus = Some(host.request_frame());
        tracing::debug!(motion, "nav overlay opened");
    }

    /// Close the overlay and return focus to the toggle.
    pub fn close<H: Host>(&mut self, host: &mut H) {
        if !self.open {
            return;
        }
        self.open = false;
        let body = host.body();
        host.remove_class(body, BODY_CLASS);
        host.remove_class(self.overlay, OPEN_CLASS);
        host.remove_class(self.overlay, ANIMATED_CLASS);
        host.set_attribute(self.overlay, "aria-hidden", "true");
        if let Some(token) = self.pending_focus.take() {
            host.cancel_frame(token);
        }
        host.set_attribute(self.toggle, "aria-expanded", "false");
        host.focus(self.toggle);
        tracing::debug!("nav overlay closed");
    }

    /// Open when closed, close when open.
    pub fn toggle<H: Host>(&mut self, host: &mut H, motion: bool) {
        if self.open {
            self.close(host);
        } else {
            self.open(host, motion);
        }
    }

    /// Click routing. Returns whether the click belonged to the overlay.
    pub fn on_click<H: Host>(&mut self, host: &mut H, node: NodeId, motion: bool) -> bool {
        if self.toggle == node {
            self.toggle(host, motion);
            return true;
        }
        if self.background == Some(node) || self.links.contains(&node) {
            self.close(host);
            return true;
        }
        false
    }

    /// Escape closes an open overlay. Returns whether the key was consumed.
    pub fn on_key<H: Host>(&mut self, host: &mut H, key: Key) -> bool {
        if key == Key::Escape && self.open {
            self.close(host);
            return true;
        }
        false
    }

    /// Close when the desktop breakpoint starts matching.
    pub fn on_media<H: Host>(&mut self, host: &mut H, query: &str, matches: bool) {
        if matches && query == self.close_query {
            self.close(host);
        }
    }

    /// Frame callback: move focus to the first link. Returns `false` for foreign frames.
    pub fn on_frame<H: Host>(&mut self, host: &mut H, token: FrameToken) -> bool {
        if self.pending_focus != Some(token) {
            return false;
        }
        self.pending_focus = None;
        if let Some(&first) = self.links.first() {
            host.focus(first);
        }
        true
    }

    /// Cancel the pending focus frame.
    pub fn teardown<H: Host>(&mut self, host: &mut H) {
        if let Some(token) = self.pending_focus.take() {
            host.cancel_frame(token);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/page/nav.rs"]
mod tests;
