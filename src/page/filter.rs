use crate::engine::Engine;
use crate::host::{Host, NodeId};

/// Project filter wiring.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterConfig {
    /// Filter buttons.
    #[serde(default = "default_buttons")]
    pub buttons: String,
    /// Attribute holding a button's category.
    #[serde(default = "default_button_attribute")]
    pub button_attribute: String,
    /// Filtered cards.
    #[serde(default = "default_cards")]
    pub cards: String,
    /// Attribute holding a card's space-separated categories.
    #[serde(default = "default_category_attribute")]
    pub category_attribute: String,
    /// Category that shows every card.
    #[serde(default = "default_all")]
    pub all: String,
    /// Class marking the selected button.
    #[serde(default = "default_active_class")]
    pub active_class: String,
}

fn default_buttons() -> String {
    ".filter-button".to_owned()
}
fn default_button_attribute() -> String {
    "data-filter".to_owned()
}
fn default_cards() -> String {
    ".project-card".to_owned()
}
fn default_category_attribute() -> String {
    "data-category".to_owned()
}
fn default_all() -> String {
    "all".to_owned()
}
fn default_active_class() -> String {
    "active".to_owned()
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            buttons: default_buttons(),
            button_attribute: default_button_attribute(),
            cards: default_cards(),
            category_attribute: default_category_attribute(),
            all: default_all(),
            active_class: default_active_class(),
        }
    }
}

#[derive(Clone, Debug)]
struct Card {
    node: NodeId,
    categories: Vec<String>,
}

/// Shows the cards of one category and replays their reveals.
///
/// Cards that become visible again replay their entrance; cards that stay visible are left
/// alone even when one reveal animates all of them.
#[derive(Clone, Debug)]
pub struct ProjectFilter {
    buttons: Vec<(NodeId, String)>,
    cards: Vec<Card>,
    all: String,
    active_class: String,
    current: String,
}

impl ProjectFilter {
    /// Resolve buttons and cards. `None` when there are no cards.
    pub fn install<H: Host>(host: &mut H, config: &FilterConfig) -> Option<Self> {
        let cards: Vec<Card> = host
            .query(&config.cards)
            .into_iter()
            .map(|node| Card {
                node,
                categories: host
                    .attribute(node, &config.category_attribute)
                    .map(|c| c.split_whitespace().map(str::to_owned).collect())
                    .unwrap_or_default(),
            })
            .collect();
        if cards.is_empty() {
            return None;
        }
        let buttons: Vec<(NodeId, String)> = host
            .query(&config.buttons)
            .into_iter()
            .filter_map(|b| Some((b, host.attribute(b, &config.button_attribute)?)))
            .collect();
        let current = buttons
            .iter()
            .find(|(b, _)| host.has_class(*b, &config.active_class))
            .map_or_else(|| config.all.clone(), |(_, c)| c.clone());
        Some(Self {
            buttons,
            cards,
            all: config.all.clone(),
            active_class: config.active_class.clone(),
            current,
        })
    }

    /// Selected category.
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Whether `card` belongs to `category`.
    fn matches(&self, card: &Card, category: &str) -> bool {
        category == self.all || card.categories.iter().any(|c| c == category)
    }

    /// Select `category`: suppress non-matching cards, mark the buttons, and re-arm the reveals
    /// of cards that were hidden and are shown again. Returns the newly shown cards.
    #[tracing::instrument(skip(self, engine))]
    pub fn apply<H: Host>(&mut self, engine: &mut Engine<H>, category: &str) -> Vec<NodeId> {
        self.current = category.to_owned();
        let host = engine.host_mut();
        for (button, value) in &self.buttons {
            host.toggle_class(*button, &self.active_class, value == category);
        }
        let mut shown = Vec::new();
        for card in &self.cards {
            let show = self.matches(card, category);
            if show && !host.is_displayed(card.node) {
                host.set_displayed(card.node, true);
                shown.push(card.node);
            } else if !show {
                host.set_displayed(card.node, false);
            }
        }

        for &node in &shown {
            engine.rearm_node(node);
        }
        tracing::debug!(shown = shown.len(), "filter applied");
        shown
    }

    /// Click routing: a filter button applies its category.
    pub fn on_click<H: Host>(&mut self, engine: &mut Engine<H>, node: NodeId) -> bool {
        let Some(category) = self
            .buttons
            .iter()
            .find(|(b, _)| *b == node)
            .map(|(_, c)| c.clone())
        else {
            return false;
        };
        self.apply(engine, &category);
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/page/filter.rs"]
mod tests;
