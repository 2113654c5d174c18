//! Declarative per-page configuration.
//!
//! A manifest names, by selector, what a page reveals, groups and scrubs, and how its header,
//! scroll-spy, nav overlay, modals, accordions and project filter are wired:
//!
//! ```json
//! {
//!   "version": "1",
//!   "page_class": "page-services",
//!   "triggers": [
//!     { "target": ".hero-title .word", "mode": "group", "on_load": true,
//!       "from": { "y": "100%" }, "to": { "y": 0 }, "duration": 0.75, "stagger": 0.08,
//!       "delay": 0.4, "ease": "power3.out" },
//!     { "target": ".service-detail-content", "scope": ".service-detail",
//!       "from": { "opacity": 0, "x": -32 }, "to": { "opacity": 1, "x": 0 },
//!       "start": "top 80%" },
//!     { "target": ".scroll-progress", "mode": "scrub",
//!       "from": { "scaleX": 0 }, "to": { "scaleX": 1 }, "start": 0, "end": "max" }
//!   ],
//!   "header": {},
//!   "spy": {}
//! }
//! ```

pub(crate) mod model;
pub(crate) mod validate;

use crate::engine::config::EngineOptions;
use crate::foundation::error::{UnveilError, UnveilResult};
use crate::manifest::model::ManifestDef;
use crate::manifest::validate::validate_manifest;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub use crate::manifest::validate::MANIFEST_VERSION;

/// Manifest boundary object: the JSON-facing, hand-edited page configuration.
#[derive(Debug, Clone)]
pub struct Manifest {
    def: ManifestDef,
}

impl Manifest {
    /// Parse a manifest from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> UnveilResult<Self> {
        let def: ManifestDef = serde_json::from_reader(r)
            .map_err(|e| UnveilError::serde(format!("parse manifest JSON: {e}")))?;
        Ok(Self { def })
    }

    /// Parse a manifest from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> UnveilResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            UnveilError::manifest(format!("open manifest JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Validate every section, reporting all issues at once.
    pub fn validate(&self) -> UnveilResult<()> {
        validate_manifest(&self.def)
            .map_err(|e| UnveilError::manifest(format!("manifest validation failed: {e}")))
    }

    /// Body class that gates the manifest, if any.
    pub fn page_class(&self) -> Option<&str> {
        self.def.page_class.as_deref()
    }

    /// Engine options.
    pub fn options(&self) -> &EngineOptions {
        &self.def.options
    }

    /// Number of trigger entries.
    pub fn trigger_count(&self) -> usize {
        self.def.triggers.len()
    }

    pub(crate) fn def(&self) -> &ManifestDef {
        &self.def
    }
}

#[cfg(test)]
#[path = "../../tests/unit/manifest/manifest.rs"]
mod tests;
