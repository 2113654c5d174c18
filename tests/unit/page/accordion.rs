use super::*;
use crate::foundation::core::ViewportSize;
use crate::host::Document;
use crate::sim::{NodeDef, PageDef, SimHost};

fn item(open: bool) -> NodeDef {
    NodeDef::new(
        "div",
        if open { "accordion-item is-open" } else { "accordion-item" },
        [0.0, 0.0, 600.0, 80.0],
    )
    .with_children([
        NodeDef::new("button", "accordion-trigger", [0.0, 0.0, 600.0, 40.0]),
        NodeDef::new("div", "accordion-panel", [0.0, 40.0, 600.0, 40.0]),
    ])
}

fn host() -> SimHost {
    let page = PageDef {
        viewport: ViewportSize {
            width: 1280.0,
            height: 800.0,
        },
        body: NodeDef::new("body", "", [0.0, 0.0, 1280.0, 2000.0]).with_children([
            NodeDef::new("div", "accordion", [0.0, 0.0, 600.0, 400.0]).with_children([
                item(true),
                item(false),
                item(false),
                NodeDef::new("div", "accordion-item", [0.0, 300.0, 600.0, 40.0]),
            ]),
            NodeDef::new("div", "accordion", [0.0, 500.0, 600.0, 100.0]),
        ]),
    };
    SimHost::new(&page).unwrap()
}

#[test]
fn install_syncs_markup_and_skips_incomplete_items() {
    let mut host = host();
    let accs = Accordion::install_all(&mut host, &AccordionConfig::default());
    assert_eq!(accs.len(), 1);
    let acc = &accs[0];
    assert_eq!(acc.len(), 3);
    assert!(acc.is_open(0));
    assert!(!acc.is_open(1));
    let triggers = host.query(".accordion-trigger");
    let panels = host.query(".accordion-panel");
    assert_eq!(host.attribute(triggers[0], "aria-expanded").as_deref(), Some("true"));
    assert_eq!(host.attribute(triggers[1], "aria-expanded").as_deref(), Some("false"));
    assert_eq!(host.attribute(panels[0], "hidden"), None);
    assert_eq!(host.attribute(panels[1], "hidden").as_deref(), Some(""));
}

#[test]
fn independent_items_toggle_freely() {
    let mut host = host();
    let mut acc = Accordion::install_all(&mut host, &AccordionConfig::default()).remove(0);
    let triggers = host.query(".accordion-trigger");
    assert!(acc.on_click(&mut host, triggers[1]));
    assert!(acc.is_open(0) && acc.is_open(1));
    acc.toggle(&mut host, 1);
    assert!(!acc.is_open(1));
    acc.toggle(&mut host, 7);
    let body = host.body();
    assert!(!acc.on_click(&mut host, body));
}

#[test]
fn single_open_closes_siblings() {
    let mut host = host();
    let cfg = AccordionConfig {
        single_open: true,
        ..AccordionConfig::default()
    };
    let mut acc = Accordion::install_all(&mut host, &cfg).remove(0);
    acc.toggle(&mut host, 2);
    assert!(!acc.is_open(0));
    assert!(acc.is_open(2));
    let items = host.query(".accordion-item");
    assert!(!host.has_class(items[0], "is-open"));
    assert!(host.has_class(items[2], "is-open"));
    acc.toggle(&mut host, 2);
    assert!((0..3).all(|i| !acc.is_open(i)));
}
