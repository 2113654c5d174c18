use super::*;

const VH: f64 = 800.0;

#[test]
fn enter_options_fire_when_top_crosses_line() {
    // Node at [1000, 1200]; "top 80%" is reached at scroll 360.
    let opts = ObserveOptions::for_enter(&EnterPoint::top_at(80.0), 200.0, VH);
    assert_eq!(opts.margin_bottom, Length::Percent(-20.0));
    assert_eq!(opts.threshold, 0.0);
    assert!(!opts.intersects(1000.0, 1200.0, 359.0, VH));
    assert!(opts.intersects(1000.0, 1200.0, 361.0, VH));
}

#[test]
fn enter_options_still_match_a_node_scrolled_past() {
    let opts = ObserveOptions::for_enter(&EnterPoint::top_at(80.0), 200.0, VH);
    // The whole node sits above the viewport at scroll 2000.
    assert!(opts.intersects(1000.0, 1200.0, 2000.0, VH));
    let point: EnterPoint = "center bottom".parse().unwrap();
    let opts = ObserveOptions::for_enter(&point, 200.0, VH);
    assert!(opts.intersects(1000.0, 1200.0, 2000.0, VH));
}

#[test]
fn element_anchor_becomes_threshold() {
    let point: EnterPoint = "center bottom".parse().unwrap();
    let opts = ObserveOptions::for_enter(&point, 200.0, VH);
    assert_eq!(opts.threshold, 0.5);
    // Center of [1000, 1200] is 1100; bottom line is scroll + 800.
    assert!(!opts.intersects(1000.0, 1200.0, 299.0, VH));
    assert!(opts.intersects(1000.0, 1200.0, 300.0, VH));
}

#[test]
fn centered_band_only_catches_the_middle() {
    let opts = ObserveOptions::centered_band(50.0);
    // Band collapses to the line at scroll + 400.
    assert!(opts.intersects(300.0, 600.0, 0.0, VH));
    assert!(!opts.intersects(500.0, 900.0, 0.0, VH));
    assert!(!opts.intersects(0.0, 300.0, 0.0, VH));
}

#[test]
fn progress_is_clamped_linear() {
    let r = ScrubRange {
        start: ScrollPoint::Offset(100.0),
        end: ScrollPoint::Offset(400.0),
    }
    .resolve(0.0, 0.0, VH, 3000.0);
    assert_eq!(r.progress(0.0), 0.0);
    assert_eq!(r.progress(250.0), 0.5);
    assert_eq!(r.progress(1000.0), 1.0);
}

#[test]
fn degenerate_range_is_a_step() {
    let r = ResolvedRange {
        start: 0.0,
        end: 0.0,
    };
    assert_eq!(r.progress(-1.0), 0.0);
    assert_eq!(r.progress(0.0), 1.0);
}

#[test]
fn band_validation() {
    assert!(validate_band(50.0).is_ok());
    assert!(validate_band(50.5).is_err());
    assert!(validate_band(-1.0).is_err());
}
