//! Deterministic simulated host and the drivers that feed it to a [`crate::Page`].

pub(crate) mod document;
pub(crate) mod host;
pub(crate) mod selector;

pub use document::{NodeDef, PageDef};
pub use host::{LogEntry, SimEvent, SimHost};

use crate::foundation::core::ViewportSize;
use crate::foundation::error::UnveilResult;
use crate::host::{Document, HostEvent, Key, Viewport};
use crate::page::Page;
use std::collections::BTreeMap;

impl Page<SimHost> {
    /// Scroll the simulated page and deliver the scroll event. Returns whether it moved.
    pub fn scroll_to(&mut self, offset: f64) -> bool {
        if !self.host_mut().scroll_to(offset) {
            return false;
        }
        self.dispatch(HostEvent::Scroll);
        true
    }

    /// Advance the clock by `dt` seconds and deliver every frame that was pending.
    pub fn tick(&mut self, dt: f64) {
        self.host_mut().advance(dt);
        for token in self.host_mut().take_frames() {
            self.dispatch(HostEvent::Frame(token));
        }
    }

    /// Click the first node matching `selector`. Returns `false` when nothing matches.
    pub fn click(&mut self, selector: &str) -> bool {
        let Some(node) = self.host().query_one(selector) else {
            return false;
        };
        self.dispatch(HostEvent::Click(node));
        true
    }

    /// Press a key.
    pub fn press(&mut self, key: Key) {
        self.dispatch(HostEvent::Key(key));
    }

    /// Resize the viewport and deliver a change event for every watched media query that
    /// flipped.
    pub fn resize(&mut self, width: f64, height: f64) -> UnveilResult<()> {
        let viewport = ViewportSize::new(width, height)?;
        let before = self.media_states();
        self.host_mut().resize(viewport);
        self.deliver_media_changes(before);
        Ok(())
    }

    /// Flip the reduced-motion preference and deliver the change.
    pub fn set_reduced_motion(&mut self, on: bool) {
        let before = self.media_states();
        self.host_mut().set_reduced_motion(on);
        self.deliver_media_changes(before);
    }

    fn media_states(&self) -> BTreeMap<String, bool> {
        self.media_queries()
            .into_iter()
            .map(|q| {
                let m = self.host().matches_media(&q);
                (q, m)
            })
            .collect()
    }

    fn deliver_media_changes(&mut self, before: BTreeMap<String, bool>) {
        for (query, was) in before {
            let matches = self.host().matches_media(&query);
            if matches != was {
                self.dispatch(HostEvent::MediaChange { query, matches });
            }
        }
    }
}
