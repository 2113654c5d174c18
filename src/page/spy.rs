use crate::foundation::error::UnveilResult;
use crate::host::{Host, IntersectionRecord, NodeId, WatchId};
use crate::trigger::region::{ObserveOptions, validate_band};
use std::collections::BTreeMap;

/// Scroll-spy wiring.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpyConfig {
    /// Observed sections; only those carrying an `id` take part.
    #[serde(default = "default_sections")]
    pub sections: String,
    /// Navigation links, matched to sections by `href="#<id>"`.
    #[serde(default = "default_links")]
    pub links: String,
    /// Percent shrunk from the top and bottom of the viewport.
    #[serde(default = "default_band")]
    pub band: f64,
    /// Class marking the active link.
    #[serde(default = "default_active_class")]
    pub active_class: String,
}

fn default_sections() -> String {
    "section[id]".to_owned()
}
fn default_links() -> String {
    ".nav-link".to_owned()
}
fn default_band() -> f64 {
    50.0
}
fn default_active_class() -> String {
    "active".to_owned()
}

impl Default for SpyConfig {
    fn default() -> Self {
        Self {
            sections: default_sections(),
            links: default_links(),
            band: default_band(),
            active_class: default_active_class(),
        }
    }
}

impl SpyConfig {
    /// Check the band.
    pub fn validate(&self) -> UnveilResult<()> {
        validate_band(self.band)
    }
}

/// Highlights the navigation link of the section crossing the viewport's centre band.
///
/// When several sections enter the band within one batch of records, the last record wins.
#[derive(Clone, Debug)]
pub struct ScrollSpy {
    watches: BTreeMap<WatchId, String>,
    links: Vec<NodeId>,
    active_class: String,
    active: Option<String>,
}

impl ScrollSpy {
    /// Observe every identified section. `None` when there is nothing to observe.
    pub fn install<H: Host>(host: &mut H, config: &SpyConfig) -> Option<Self> {
        let opts = ObserveOptions::centered_band(config.band);
        let watches: BTreeMap<WatchId, String> = host
            .query(&config.sections)
            .into_iter()
            .filter_map(|node| {
                let id = host.attribute(node, "id").filter(|id| !id.is_empty())?;
                Some((node, id))
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|(node, id)| (host.observe(node, opts), id))
            .collect();
        if watches.is_empty() {
            return None;
        }
        tracing::debug!(sections = watches.len(), "scroll-spy installed");
        Some(Self {
            watches,
            links: host.query(&config.links),
            active_class: config.active_class.clone(),
            active: None,
        })
    }

    /// Id of the active section.
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Apply one batch of records. Records for other watches are ignored.
    pub fn on_records<H: Host>(&mut self, host: &mut H, records: &[IntersectionRecord]) {
        let Some(id) = records
            .iter()
            .filter(|r| r.is_intersecting)
            .filter_map(|r| self.watches.get(&r.watch))
            .next_back()
        else {
            return;
        };
        let href = format!("#{id}");
        for &link in &self.links {
            let on = host.attribute(link, "href").as_deref() == Some(href.as_str());
            host.toggle_class(link, &self.active_class, on);
        }
        if self.active.as_deref() != Some(id.as_str()) {
            tracing::trace!(section = %id, "scroll-spy active");
            self.active = Some(id.clone());
        }
    }

    /// Stop observing.
    pub fn teardown<H: Host>(&mut self, host: &mut H) {
        for watch in std::mem::take(&mut self.watches).into_keys() {
            host.unobserve(watch);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/page/spy.rs"]
mod tests;
