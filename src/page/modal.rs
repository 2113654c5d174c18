use crate::host::{Host, Key, NodeId};

/// One dialog and the controls that open and close it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModalConfig {
    /// Dialog node.
    pub dialog: String,
    /// Controls that open the dialog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openers: Option<String>,
    /// Controls inside the dialog that close it.
    #[serde(default = "default_closers")]
    pub closers: String,
}

fn default_closers() -> String {
    "[data-close]".to_owned()
}

impl ModalConfig {
    /// Dialog matched by `dialog`, opened by `openers`.
    pub fn new(dialog: &str, openers: &str) -> Self {
        Self {
            dialog: dialog.to_owned(),
            openers: Some(openers.to_owned()),
            closers: default_closers(),
        }
    }
}

/// A dialog with focus hand-off.
#[derive(Clone, Debug)]
pub struct Modal {
    dialog: NodeId,
    openers: Vec<NodeId>,
    closers: Vec<NodeId>,
    open: bool,
    restore_focus: Option<NodeId>,
}

impl Modal {
    /// Resolve the dialog. `None` when it is missing.
    pub fn install<H: Host>(host: &mut H, config: &ModalConfig) -> Option<Self> {
        let dialog = host.query_one(&config.dialog)?;
        let openers = config
            .openers
            .as_deref()
            .map(|s| host.query(s))
            .unwrap_or_default();
        let closers = host.query_within(dialog, &config.closers);
        host.set_attribute(dialog, "aria-hidden", "true");
        Some(Self {
            dialog,
            openers,
            closers,
            open: false,
            restore_focus: None,
        })
    }

    /// Dialog node.
    pub fn dialog(&self) -> NodeId {
        self.dialog
    }

    /// Whether the dialog is open.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Show the dialog, remembering the focused node and moving focus into the dialog.
    pub fn open<H: Host>(&mut self, host: &mut H) {
        if self.open {
            return;
        }
        self.open = true;
        self.restore_focus = host.focused();
        host.add_class(self.dialog, "is-open");
        host.set_attribute(self.dialog, "aria-hidden", "false");
        let body = host.body();
        host.add_class(body, "modal-open");
        host.focus(self.dialog);
    }

    /// Hide the dialog and give focus back.
    pub fn close<H: Host>(&mut self, host: &mut H) {
        if !self.open {
            return;
        }
        self.open = false;
        host.remove_class(self.dialog, "is-open");
        host.set_attribute(self.dialog, "aria-hidden", "true");
        let body = host.body();
        host.remove_class(body, "modal-open");
        if let Some(prev) = self.restore_focus.take() {
            host.focus(prev);
        }
    }

    /// Click routing. Clicking the dialog backdrop itself also closes.
    pub fn on_click<H: Host>(&mut self, host: &mut H, node: NodeId) -> bool {
        if self.openers.contains(&node) {
            self.open(host);
            return true;
        }
        if self.open && (node == self.dialog || self.closers.contains(&node)) {
            self.close(host);
            return true;
        }
        false
    }

    /// Escape closes.
    pub fn on_key<H: Host>(&mut self, host: &mut H, key: Key) -> bool {
        if key == Key::Escape && self.open {
            self.close(host);
            return true;
        }
        false
    }
}

#[cfg(test)]
#[path = "../../tests/unit/page/modal.rs"]
mod tests;
