use super::*;
use crate::host::{Document, Viewport};
use crate::sim::{NodeDef, PageDef, SimHost};
use crate::foundation::core::ViewportSize;

fn machine() -> HeaderVisibility {
    HeaderVisibility::new(&HeaderConfig::default(), 0.0)
}

#[test]
fn hides_only_past_threshold_and_band() {
    let mut m = machine();
    assert_eq!(m.sample(150.0), None);
    assert_eq!(m.last(), 0.0);
    assert_eq!(m.sample(250.0), Some(HeaderState::Hidden));
    assert_eq!(m.last(), 250.0);
}

#[test]
fn jitter_inside_band_never_toggles() {
    let mut m = machine();
    m.sample(400.0);
    assert_eq!(m.state(), HeaderState::Hidden);
    for y in [420.0, 380.0, 450.0, 345.0, 459.0, 341.0] {
        assert_eq!(m.sample(y), None, "sample {y}");
    }
    assert_eq!(m.state(), HeaderState::Hidden);
}

#[test]
fn shows_on_upward_travel_or_near_top() {
    let mut m = machine();
    m.sample(1000.0);
    assert_eq!(m.sample(939.0), Some(HeaderState::Shown));

    let mut m = machine();
    m.sample(230.0);
    assert_eq!(m.state(), HeaderState::Hidden);
    assert_eq!(m.sample(99.0), Some(HeaderState::Shown));
}

#[test]
fn repeated_commit_moves_reference_without_transition() {
    let mut m = machine();
    m.sample(300.0);
    assert_eq!(m.sample(2000.0), None);
    assert_eq!(m.last(), 2000.0);
    assert_eq!(m.sample(1930.0), Some(HeaderState::Shown));
}

#[test]
fn monotonic_run_toggles_at_most_once() {
    let mut m = machine();
    let mut transitions = 0;
    let mut y = 0.0;
    while y < 3000.0 {
        y += 7.0;
        transitions += usize::from(m.sample(y).is_some());
    }
    assert_eq!(transitions, 1);
}

#[test]
fn suspended_machine_ignores_samples() {
    let mut m = machine();
    m.set_suspended(true);
    assert_eq!(m.sample(900.0), None);
    assert_eq!(m.last(), 0.0);
    m.set_suspended(false);
    assert_eq!(m.sample(900.0), Some(HeaderState::Hidden));
}

#[test]
fn marker_flips_strictly_past_threshold() {
    let mut s = ScrolledMarker::new(80.0);
    assert_eq!(s.sample(80.0), None);
    assert_eq!(s.sample(81.0), Some(true));
    assert_eq!(s.sample(500.0), None);
    assert_eq!(s.sample(10.0), Some(false));
}

#[test]
fn config_validation() {
    assert!(HeaderConfig::default().validate().is_ok());
    let bad = HeaderConfig {
        show_before: 500.0,
        ..HeaderConfig::default()
    };
    assert!(bad.validate().is_err());
    let c: HeaderConfig = serde_json::from_str(r#"{"hide_after": 150, "show_before": 80}"#).unwrap();
    assert_eq!(c.hysteresis, 60.0);
    assert!(serde_json::from_str::<HeaderConfig>(r#"{"hyst": 1}"#).is_err());
}

#[test]
fn installed_header_slides_and_marks_backdrop() {
    let page = PageDef {
        viewport: ViewportSize {
            width: 1280.0,
            height: 800.0,
        },
        body: NodeDef::new("body", "", [0.0, 0.0, 1280.0, 4000.0])
            .with_children([NodeDef::new("header", "header", [0.0, 0.0, 1280.0, 90.0])]),
    };
    let mut host = SimHost::new(&page).unwrap();
    let mut header = Header::install(&mut host, &HeaderConfig::default()).unwrap();
    let node = header.node();

    host.scroll_to(300.0);
    let y = host.scroll_offset();
    header.on_scroll(&mut host, y, false);
    assert_eq!(header.state(), HeaderState::Hidden);
    assert!(host.has_class(node, "scrolled"));
    host.advance(0.3);
    assert!((host.state(node).y + 100.0).abs() < 1e-9);

    host.scroll_to(50.0);
    header.on_scroll(&mut host, 50.0, true);
    assert_eq!(header.state(), HeaderState::Shown);
    assert!(!host.has_class(node, "scrolled"));
    assert_eq!(host.state(node).y, 0.0);
    assert!(Header::install(&mut host, &HeaderConfig {
        selector: ".missing".into(),
        ..HeaderConfig::default()
    })
    .is_none());
}
