use super::*;
use crate::foundation::core::ViewportSize;
use crate::host::Document;
use crate::sim::{NodeDef, PageDef, SimHost};

fn setup() -> (SimHost, Modal) {
    let page = PageDef {
        viewport: ViewportSize {
            width: 1280.0,
            height: 800.0,
        },
        body: NodeDef::new("body", "", [0.0, 0.0, 1280.0, 2000.0]).with_children([
            NodeDef::new("button", "open-reel", [0.0, 500.0, 120.0, 40.0]),
            NodeDef::new("div", "modal", [0.0, 0.0, 1280.0, 800.0])
                .with_id("reel")
                .with_children([
                    NodeDef::new("button", "modal-close", [1200.0, 20.0, 40.0, 40.0])
                        .with_attr("data-close", ""),
                ]),
        ]),
    };
    let mut host = SimHost::new(&page).unwrap();
    let modal = Modal::install(&mut host, &ModalConfig::new("#reel", ".open-reel")).unwrap();
    (host, modal)
}

#[test]
fn open_and_close_hand_focus_back() {
    let (mut host, mut modal) = setup();
    let opener = host.query_one(".open-reel").unwrap();
    host.focus(opener);
    assert!(modal.on_click(&mut host, opener));
    assert!(modal.is_open());
    assert_eq!(host.focused(), Some(modal.dialog()));
    assert!(host.has_class(host.body(), "modal-open"));
    assert_eq!(
        host.attribute(modal.dialog(), "aria-hidden").as_deref(),
        Some("false")
    );

    let close = host.query_one(".modal-close").unwrap();
    assert!(modal.on_click(&mut host, close));
    assert!(!modal.is_open());
    assert_eq!(host.focused(), Some(opener));
    assert!(!host.has_class(host.body(), "modal-open"));
    assert!(!host.has_class(modal.dialog(), "is-open"));
}

#[test]
fn escape_and_backdrop_close() {
    let (mut host, mut modal) = setup();
    modal.open(&mut host);
    assert!(modal.on_key(&mut host, Key::Escape));
    assert!(!modal.on_key(&mut host, Key::Escape));
    modal.open(&mut host);
    let dialog = modal.dialog();
    assert!(modal.on_click(&mut host, dialog));
    assert!(!modal.is_open());
}

#[test]
fn closed_modal_ignores_dialog_clicks() {
    let (mut host, mut modal) = setup();
    let dialog = modal.dialog();
    assert!(!modal.on_click(&mut host, dialog));
    assert_eq!(
        host.attribute(dialog, "aria-hidden").as_deref(),
        Some("true")
    );
}

#[test]
fn missing_dialog_installs_nothing() {
    let (mut host, _) = setup();
    assert!(Modal::install(&mut host, &ModalConfig::new("#nope", ".open-reel")).is_none());
}
