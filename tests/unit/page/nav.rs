use super::*;
use crate::foundation::core::ViewportSize;
use crate::host::Document;
use crate::sim::{NodeDef, PageDef, SimHost};

fn host() -> SimHost {
    let link = || NodeDef::new("a", "nav-overlay-link", [0.0, 100.0, 300.0, 40.0]);
    let page = PageDef {
        viewport: ViewportSize {
            width: 390.0,
            height: 800.0,
        },
        body: NodeDef::new("body", "", [0.0, 0.0, 390.0, 2000.0]).with_children([
            NodeDef::new("button", "nav-toggle", [340.0, 10.0, 40.0, 40.0]),
            NodeDef::new("div", "nav-overlay", [0.0, 0.0, 390.0, 800.0])
                .with_id("nav-overlay")
                .with_children([
                    NodeDef::new("div", "nav-overlay-bg", [0.0, 0.0, 390.0, 800.0]),
                    link(),
                    link(),
                    link(),
                    NodeDef::new("div", "nav-overlay-meta", [0.0, 600.0, 390.0, 100.0]),
                ]),
        ]),
    };
    SimHost::new(&page).unwrap()
}

fn setup() -> (SimHost, NavOverlay) {
    let mut host = host();
    let nav = NavOverlay::install(&mut host, &NavConfig::default()).unwrap();
    (host, nav)
}

#[test]
fn open_sets_classes_attributes_and_staggers_links() {
    let (mut host, mut nav) = setup();
    nav.open(&mut host, true);
    assert!(nav.is_open());
    let body = host.body();
    let overlay = host.query_one("#nav-overlay").unwrap();
    let toggle = host.query_one(".nav-toggle").unwrap();
    assert!(host.has_class(body, "nav-open"));
    assert!(host.has_class(overlay, "is-open"));
    assert_eq!(host.attribute(toggle, "aria-expanded").as_deref(), Some("true"));
    assert_eq!(host.attribute(overlay, "aria-hidden").as_deref(), Some("false"));

    let links = host.query(".nav-overlay-link");
    for (i, &link) in links.iter().enumerate() {
        let t = host.tweens(link)[0];
        assert!((t.start - 0.09 * i as f64).abs() < 1e-9);
        assert_eq!(t.duration, 0.65);
        assert_eq!(t.from.y, 32.0);
        assert_eq!(t.ease, Ease::OutQuart);
    }
    let meta = host.query_one(".nav-overlay-meta").unwrap();
    let t = host.tweens(meta)[0];
    assert_eq!((t.start, t.duration, t.from.y), (0.4, 0.55, 24.0));
}

#[test]
fn first_link_focused_on_next_frame() {
    let (mut host, mut nav) = setup();
    nav.open(&mut host, true);
    assert_eq!(host.focused(), None);
    let frames = host.take_frames();
    assert_eq!(frames.len(), 1);
    assert!(!nav.on_frame(&mut host, FrameToken(999)));
    assert!(nav.on_frame(&mut host, frames[0]));
    assert_eq!(host.focused(), host.query_one(".nav-overlay-link"));
}

#[test]
fn reduced_motion_open_skips_tweens() {
    let (mut host, mut nav) = setup();
    nav.open(&mut host, false);
    let link = host.query_one(".nav-overlay-link").unwrap();
    assert!(host.tweens(link).is_empty());
    let overlay = host.query_one("#nav-overlay").unwrap();
    assert!(!host.has_class(overlay, "nav-animated"));
}

#[test]
fn close_paths_restore_state_and_focus_toggle() {
    let (mut host, mut nav) = setup();
    let toggle = host.query_one(".nav-toggle").unwrap();
    let bg = host.query_one(".nav-overlay-bg").unwrap();
    let link = host.query(".nav-overlay-link")[1];

    assert!(nav.on_click(&mut host, toggle, true));
    assert!(nav.on_click(&mut host, bg, true));
    assert!(!nav.is_open());
    assert_eq!(host.focused(), Some(toggle));
    assert_eq!(host.pending_frames(), 0);

    nav.toggle(&mut host, true);
    assert!(nav.on_click(&mut host, link, true));
    assert!(!nav.is_open());

    nav.toggle(&mut host, true);
    assert!(!nav.on_key(&mut host, Key::Other('a')));
    assert!(nav.on_key(&mut host, Key::Escape));
    assert!(!nav.on_key(&mut host, Key::Escape));

    nav.open(&mut host, true);
    nav.on_media(&mut host, "(min-width: 900px)", false);
    assert!(nav.is_open());
    nav.on_media(&mut host, "(min-width: 900px)", true);
    assert!(!nav.is_open());
    assert!(!host.has_class(host.body(), "nav-open"));
    let overlay = host.query_one("#nav-overlay").unwrap();
    assert_eq!(host.attribute(overlay, "aria-hidden").as_deref(), Some("true"));
    assert_eq!(host.attribute(toggle, "aria-expanded").as_deref(), Some("false"));
}

#[test]
fn unrelated_clicks_pass_through() {
    let (mut host, mut nav) = setup();
    let body = host.body();
    assert!(!nav.on_click(&mut host, body, true));
}

#[test]
fn missing_overlay_installs_nothing() {
    let mut host = host();
    let cfg = NavConfig {
        overlay: "#menu".into(),
        ..NavConfig::default()
    };
    assert!(NavOverlay::install(&mut host, &cfg).is_none());
}
