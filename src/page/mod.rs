//! Page-level behavior around the engine and the runtime that wires it from a manifest.

pub(crate) mod accordion;
pub(crate) mod filter;
pub(crate) mod header;
pub(crate) mod modal;
pub(crate) mod nav;
pub(crate) mod spy;

use crate::engine::config::Target;
use crate::engine::{Engine, Registration};
use crate::foundation::error::UnveilResult;
use crate::host::{Host, HostEvent, Key, NodeId};
use crate::manifest::Manifest;
use crate::manifest::model::TriggerDef;
use crate::page::accordion::Accordion;
use crate::page::filter::ProjectFilter;
use crate::page::header::Header;
use crate::page::modal::Modal;
use crate::page::nav::NavOverlay;
use crate::page::spy::ScrollSpy;

/// One installed page: the engine plus every component the manifest wires.
///
/// Hosts deliver [`HostEvent`]s through [`Page::dispatch`]; after each event the header is
/// synced with the nav overlay and queued intersection records are routed to their owners.
pub struct Page<H: Host> {
    engine: Engine<H>,
    active: bool,
    registrations: Vec<Registration>,
    header: Option<Header>,
    spy: Option<ScrollSpy>,
    nav: Option<NavOverlay>,
    modals: Vec<Modal>,
    accordions: Vec<Accordion>,
    filter: Option<ProjectFilter>,
}

impl<H: Host> Page<H> {
    /// Validate `manifest` and install it over `host`.
    ///
    /// When the manifest names a `page_class` the body lacks, nothing is installed and the page
    /// ignores every event.
    #[tracing::instrument(skip(host, manifest))]
    pub fn new(host: H, manifest: &Manifest) -> UnveilResult<Self> {
        manifest.validate()?;
        let def = manifest.def();
        let mut engine = Engine::new(host, def.options.clone());

        if let Some(class) = &def.page_class {
            let body = engine.host().body();
            if !engine.host().has_class(body, class) {
                tracing::debug!(class = %class, "page class absent, manifest inactive");
                return Ok(Self::inactive(engine));
            }
        }

        let host = engine.host_mut();
        let nav = def.nav.as_ref().and_then(|c| NavOverlay::install(host, c));
        let modals: Vec<Modal> = def
            .modals
            .iter()
            .filter_map(|c| Modal::install(host, c))
            .collect();
        let accordions: Vec<Accordion> = def
            .accordions
            .iter()
            .flat_map(|c| Accordion::install_all(host, c))
            .collect();
        let header = def.header.as_ref().and_then(|c| Header::install(host, c));
        let spy = def.spy.as_ref().and_then(|c| ScrollSpy::install(host, c));

        let mut registrations = Vec::new();
        for t in &def.triggers {
            registrations.extend(register_trigger(&mut engine, t)?);
        }

        let filter = def
            .filter
            .as_ref()
            .and_then(|c| ProjectFilter::install(engine.host_mut(), c));

        tracing::debug!(
            registrations = registrations.len(),
            header = header.is_some(),
            spy = spy.is_some(),
            nav = nav.is_some(),
            modals = modals.len(),
            accordions = accordions.len(),
            filter = filter.is_some(),
            "page installed"
        );

        let mut page = Self {
            engine,
            active: true,
            registrations,
            header,
            spy,
            nav,
            modals,
            accordions,
            filter,
        };
        page.settle();
        Ok(page)
    }

    fn inactive(engine: Engine<H>) -> Self {
        Self {
            engine,
            active: false,
            registrations: Vec::new(),
            header: None,
            spy: None,
            nav: None,
            modals: Vec::new(),
            accordions: Vec::new(),
            filter: None,
        }
    }

    /// Route one host event.
    pub fn dispatch(&mut self, event: HostEvent) {
        if !self.active || self.engine.is_torn_down() {
            return;
        }
        tracing::trace!(?event, "dispatch");
        match event {
            HostEvent::Scroll => self.on_scroll(),
            HostEvent::Frame(token) => {
                if !self.engine.on_frame(token)
                    && let Some(nav) = &mut self.nav
                {
                    nav.on_frame(self.engine.host_mut(), token);
                }
            }
            HostEvent::MediaChange { query, matches } => {
                if query == self.engine.options().reduced_motion_query {
                    self.engine.set_reduced_motion(matches);
                } else if let Some(nav) = &mut self.nav {
                    nav.on_media(self.engine.host_mut(), &query, matches);
                }
            }
            HostEvent::Key(key) => self.on_key(key),
            HostEvent::Click(node) => self.on_click(node),
        }
        self.settle();
    }

    fn on_scroll(&mut self) {
        self.engine.on_scroll();
        let reduced = self.engine.reduced_motion();
        if let Some(header) = &mut self.header {
            let host = self.engine.host_mut();
            let y = host.scroll_offset();
            header.on_scroll(host, y, reduced);
        }
    }

    fn on_key(&mut self, key: Key) {
        let host = self.engine.host_mut();
        if let Some(nav) = &mut self.nav
            && nav.on_key(host, key)
        {
            return;
        }
        for modal in &mut self.modals {
            modal.on_key(host, key);
        }
    }

    fn on_click(&mut self, node: NodeId) {
        let motion = !self.engine.reduced_motion();
        let host = self.engine.host_mut();
        if let Some(nav) = &mut self.nav
            && nav.on_click(host, node, motion)
        {
            return;
        }
        if self.modals.iter_mut().any(|m| m.on_click(host, node)) {
            return;
        }
        if self.accordions.iter_mut().any(|a| a.on_click(host, node)) {
            return;
        }
        if let Some(filter) = &mut self.filter {
            filter.on_click(&mut self.engine, node);
        }
    }

    /// Sync the header with the nav overlay and route queued intersection records.
    fn settle(&mut self) {
        if let Some(header) = &mut self.header {
            header.set_suspended(self.nav.as_ref().is_some_and(NavOverlay::is_open));
        }
        let foreign = self.engine.pump();
        if let Some(spy) = &mut self.spy
            && !foreign.is_empty()
        {
            spy.on_records(self.engine.host_mut(), &foreign);
        }
    }

    /// Media queries whose changes the page reacts to.
    pub fn media_queries(&self) -> Vec<String> {
        let mut queries = vec![self.engine.options().reduced_motion_query.clone()];
        if let Some(nav) = &self.nav {
            queries.push(nav.close_query().to_owned());
        }
        queries
    }

    /// Release every watch and pending frame. Idempotent. Dropping the page tears the engine
    /// down as well.
    #[tracing::instrument(skip(self))]
    pub fn teardown(&mut self) {
        let host = self.engine.host_mut();
        if let Some(spy) = &mut self.spy {
            spy.teardown(host);
        }
        if let Some(nav) = &mut self.nav {
            nav.teardown(host);
        }
        self.engine.teardown();
    }

    /// Whether the manifest applies to this page.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The engine.
    pub fn engine(&self) -> &Engine<H> {
        &self.engine
    }

    /// The engine, mutably.
    pub fn engine_mut(&mut self) -> &mut Engine<H> {
        &mut self.engine
    }

    /// The host.
    pub fn host(&self) -> &H {
        self.engine.host()
    }

    /// The host, mutably. Callers that change scroll or media state should dispatch the
    /// matching event afterwards.
    pub fn host_mut(&mut self) -> &mut H {
        self.engine.host_mut()
    }

    /// Engine registrations in manifest order.
    pub fn registrations(&self) -> &[Registration] {
        &self.registrations
    }

    /// The header, when installed.
    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref()
    }

    /// The scroll-spy, when installed.
    pub fn spy(&self) -> Option<&ScrollSpy> {
        self.spy.as_ref()
    }

    /// The nav overlay, when installed.
    pub fn nav(&self) -> Option<&NavOverlay> {
        self.nav.as_ref()
    }

    /// Installed modals.
    pub fn modals(&self) -> &[Modal] {
        &self.modals
    }

    /// Installed accordions.
    pub fn accordions(&self) -> &[Accordion] {
        &self.accordions
    }

    /// The project filter, when installed.
    pub fn filter(&self) -> Option<&ProjectFilter> {
        self.filter.as_ref()
    }

    /// Select a filter category as if its button were clicked. Returns the newly shown cards.
    pub fn apply_filter(&mut self, category: &str) -> Vec<NodeId> {
        let Some(filter) = &mut self.filter else {
            return Vec::new();
        };
        let shown = filter.apply(&mut self.engine, category);
        self.settle();
        shown
    }
}

/// Register one manifest entry, once per scope block when scoped.
fn register_trigger<H: Host>(
    engine: &mut Engine<H>,
    t: &TriggerDef,
) -> UnveilResult<Vec<Registration>> {
    let Some(scope) = &t.scope else {
        let spec = t.to_spec(t.trigger.as_deref().map(Target::from))?;
        return Ok(engine.register_spec(t.target.as_str(), &spec));
    };

    let mut out = Vec::new();
    for block in engine.host().query(scope) {
        let host = engine.host();
        let targets = host.query_within(block, &t.target);
        let anchor = match &t.trigger {
            Some(sel) => match host.query_within(block, sel).first() {
                Some(&a) => Some(Target::from(a)),
                None => continue,
            },
            None if t.on_load => None,
            None => Some(Target::from(block)),
        };
        let spec = t.to_spec(anchor)?;
        out.extend(engine.register_spec(targets, &spec));
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/page/page.rs"]
mod tests;
