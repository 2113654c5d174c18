use crate::host::{Host, NodeId};

/// Accordion wiring: each root holds items, each item one trigger and one panel.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccordionConfig {
    /// Accordion roots.
    #[serde(default = "default_root")]
    pub root: String,
    /// Items inside a root.
    #[serde(default = "default_item")]
    pub item: String,
    /// Trigger inside an item.
    #[serde(default = "default_trigger")]
    pub trigger: String,
    /// Panel inside an item.
    #[serde(default = "default_panel")]
    pub panel: String,
    /// Opening one item closes its siblings.
    #[serde(default)]
    pub single_open: bool,
}

fn default_root() -> String {
    ".accordion".to_owned()
}
fn default_item() -> String {
    ".accordion-item".to_owned()
}
fn default_trigger() -> String {
    ".accordion-trigger".to_owned()
}
fn default_panel() -> String {
    ".accordion-panel".to_owned()
}

impl Default for AccordionConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            item: default_item(),
            trigger: default_trigger(),
            panel: default_panel(),
            single_open: false,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Item {
    node: NodeId,
    trigger: NodeId,
    panel: NodeId,
    open: bool,
}

/// One accordion.
#[derive(Clone, Debug)]
pub struct Accordion {
    items: Vec<Item>,
    single_open: bool,
}

impl Accordion {
    /// One accordion per matched root. Items without a trigger or panel are skipped, and
    /// roots with no usable item are dropped. Markup is synced to each item's `is-open` class.
    pub fn install_all<H: Host>(host: &mut H, config: &AccordionConfig) -> Vec<Self> {
        let mut out = Vec::new();
        for root in host.query(&config.root) {
            let items: Vec<Item> = host
                .query_within(root, &config.item)
                .into_iter()
                .filter_map(|node| {
                    let trigger = host.query_within(node, &config.trigger).into_iter().next()?;
                    let panel = host.query_within(node, &config.panel).into_iter().next()?;
                    Some(Item {
                        node,
                        trigger,
                        panel,
                        open: host.has_class(node, "is-open"),
                    })
                })
                .collect();
            if items.is_empty() {
                continue;
            }
            let acc = Self {
                items,
                single_open: config.single_open,
            };
            for i in 0..acc.items.len() {
                acc.apply(host, i);
            }
            out.push(acc);
        }
        out
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether there are no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether item `i` is open.
    pub fn is_open(&self, i: usize) -> bool {
        self.items.get(i).is_some_and(|it| it.open)
    }

    /// Flip item `i`. Out-of-range indices are ignored.
    pub fn toggle<H: Host>(&mut self, host: &mut H, i: usize) {
        let Some(item) = self.items.get(i) else {
            return;
        };
        let open = !item.open;
        if open && self.single_open {
            for j in 0..self.items.len() {
                if j != i && self.items[j].open {
                    self.items[j].open = false;
                    self.apply(host, j);
                }
            }
        }
        self.items[i].open = open;
        self.apply(host, i);
    }

    fn apply<H: Host>(&self, host: &mut H, i: usize) {
        let Some(item) = self.items.get(i) else {
            return;
        };
        host.toggle_class(item.node, "is-open", item.open);
        host.set_attribute(
            item.trigger,
            "aria-expanded",
            if item.open { "true" } else { "false" },
        );
        if item.open {
            host.remove_attribute(item.panel, "hidden");
        } else {
            host.set_attribute(item.panel, "hidden", "");
        }
    }

    /// Click routing: a trigger click toggles its item.
    pub fn on_click<H: Host>(&mut self, host: &mut H, node: NodeId) -> bool {
        match self.items.iter().position(|it| it.trigger == node) {
            Some(i) => {
                self.toggle(host, i);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/page/accordion.rs"]
mod tests;
