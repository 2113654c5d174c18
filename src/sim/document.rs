use crate::foundation::core::{Rect, ViewportSize};
use crate::foundation::error::{UnveilError, UnveilResult};
use crate::host::NodeId;
use crate::sim::selector::{Matchable, SelectorList};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// JSON description of a simulated page: viewport plus a body subtree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageDef {
    /// Viewport size.
    pub viewport: ViewportSize,
    /// Root of the document.
    pub body: NodeDef,
}

impl PageDef {
    /// Parse a page description from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> UnveilResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| UnveilError::serde(format!("parse page JSON: {e}")))
    }

    /// Parse a page description from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> UnveilResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            UnveilError::validation(format!("open page JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }
}

/// One node of a [`PageDef`].
///
/// `rect` is `[x, y, width, height]` in document coordinates; omitted, the node shares its
/// parent's box.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeDef {
    /// Tag name.
    #[serde(default = "default_tag")]
    pub tag: String,
    /// `id` attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Space-separated class list.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub class: String,
    /// Other attributes.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    /// Layout box.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rect: Option<[f64; 4]>,
    /// Child nodes in document order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeDef>,
}

fn default_tag() -> String {
    "div".to_owned()
}

impl NodeDef {
    /// A `tag` node with classes and a box.
    pub fn new(tag: &str, class: &str, rect: [f64; 4]) -> Self {
        Self {
            tag: tag.to_owned(),
            class: class.to_owned(),
            rect: Some(rect),
            ..Self::default()
        }
    }

    /// Builder: set the `id`.
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_owned());
        self
    }

    /// Builder: add an attribute.
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_owned(), value.to_owned());
        self
    }

    /// Builder: append children.
    pub fn with_children(mut self, children: impl IntoIterator<Item = NodeDef>) -> Self {
        self.children.extend(children);
        self
    }
}

#[derive(Debug, Clone)]
pub(crate) struct SimNode {
    pub(crate) tag: String,
    pub(crate) id: Option<String>,
    pub(crate) classes: BTreeSet<String>,
    pub(crate) attrs: BTreeMap<String, String>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) rect: Rect,
    pub(crate) displayed: bool,
}

impl Matchable for SimNode {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    fn attr(&self, name: &str) -> Option<&str> {
        match name {
            "id" => self.id.as_deref(),
            "class" => None,
            _ => self.attrs.get(name).map(String::as_str),
        }
    }
}

/// Flattened node tree in document order; `NodeId(0)` is the body.
#[derive(Debug, Clone)]
pub(crate) struct SimDocument {
    pub(crate) nodes: Vec<SimNode>,
    pub(crate) focused: Option<NodeId>,
}

impl SimDocument {
    pub(crate) fn build(body: &NodeDef) -> UnveilResult<Self> {
        let mut doc = Self {
            nodes: Vec::new(),
            focused: None,
        };
        let root_rect = body
            .rect
            .ok_or_else(|| UnveilError::validation("page body must declare a rect"))?;
        doc.push(body, None, rect_from(root_rect)?)?;
        Ok(doc)
    }

    fn push(&mut self, def: &NodeDef, parent: Option<NodeId>, inherited: Rect) -> UnveilResult<()> {
        let rect = match def.rect {
            Some(r) => rect_from(r)?,
            None => inherited,
        };
        let id = NodeId(
            u32::try_from(self.nodes.len())
                .map_err(|_| UnveilError::validation("page has too many nodes"))?,
        );
        self.nodes.push(SimNode {
            tag: def.tag.to_ascii_lowercase(),
            id: def.id.clone(),
            classes: def.class.split_whitespace().map(str::to_owned).collect(),
            attrs: def.attrs.clone(),
            parent,
            rect,
            displayed: true,
        });
        for child in &def.children {
            self.push(child, Some(id), rect)?;
        }
        Ok(())
    }

    pub(crate) fn node(&self, id: NodeId) -> Option<&SimNode> {
        self.nodes.get(id.0 as usize)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut SimNode> {
        self.nodes.get_mut(id.0 as usize)
    }

    fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.node(id).and_then(|n| n.parent), |p| {
            self.node(*p).and_then(|n| n.parent)
        })
    }

    /// Displayed and not `hidden`, along with every ancestor.
    pub(crate) fn is_rendered(&self, id: NodeId) -> bool {
        let shown = |n: &SimNode| n.displayed && !n.attrs.contains_key("hidden");
        self.node(id).is_some_and(shown)
            && self
                .ancestors(id)
                .all(|a| self.node(a).is_some_and(shown))
    }

    fn is_within(&self, id: NodeId, scope: NodeId) -> bool {
        self.ancestors(id).any(|a| a == scope)
    }

    fn matches_chain(&self, id: NodeId, chain: &[crate::sim::selector::Compound]) -> bool {
        let Some((last, rest)) = chain.split_last() else {
            return false;
        };
        let Some(node) = self.node(id) else {
            return false;
        };
        if !last.matches(node) {
            return false;
        }
        // Greedy right-to-left match over ancestors.
        let mut remaining = rest;
        for a in self.ancestors(id) {
            let Some((want, more)) = remaining.split_last() else {
                break;
            };
            if self.node(a).is_some_and(|n| want.matches(n)) {
                remaining = more;
            }
        }
        remaining.is_empty()
    }

    /// Nodes matching `selector`, optionally restricted to descendants of `scope`. Invalid
    /// selectors match nothing.
    pub(crate) fn select(&self, selector: &str, scope: Option<NodeId>) -> Vec<NodeId> {
        let Ok(list) = SelectorList::parse(selector) else {
            tracing::trace!(selector, "invalid selector matches nothing");
            return Vec::new();
        };
        (0..self.nodes.len())
            .map(|i| NodeId(i as u32))
            .filter(|&id| scope.is_none_or(|s| self.is_within(id, s)))
            .filter(|&id| list.chains.iter().any(|c| self.matches_chain(id, c)))
            .collect()
    }

    /// Document height: bottom of the body box.
    pub(crate) fn height(&self) -> f64 {
        self.nodes.first().map_or(0.0, |b| b.rect.y1)
    }

    /// Human-readable label: `#id`, else `tag.first-class`, plus the node index.
    pub(crate) fn label(&self, id: NodeId) -> String {
        match self.node(id) {
            Some(n) => match (&n.id, n.classes.iter().next()) {
                (Some(i), _) => format!("#{i}"),
                (None, Some(c)) => format!("{}.{c}[{}]", n.tag, id.0),
                (None, None) => format!("{}[{}]", n.tag, id.0),
            },
            None => format!("?[{}]", id.0),
        }
    }
}

fn rect_from([x, y, w, h]: [f64; 4]) -> UnveilResult<Rect> {
    if ![x, y, w, h].iter().all(|v| v.is_finite()) || w < 0.0 || h < 0.0 {
        return Err(UnveilError::validation(
            "node rect must be finite with non-negative size",
        ));
    }
    Ok(Rect::new(x, y, x + w, y + h))
}

#[cfg(test)]
#[path = "../../tests/unit/sim/document.rs"]
mod tests;
