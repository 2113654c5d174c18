use super::*;

#[test]
fn endpoints_are_stable() {
    for ease in Ease::ALL {
        assert_eq!(ease.apply(0.0), 0.0);
        assert_eq!(ease.apply(1.0), 1.0);
    }
}

#[test]
fn monotonic_spot_check() {
    for ease in Ease::ALL {
        let a = ease.apply(0.25);
        let b = ease.apply(0.5);
        let c = ease.apply(0.75);
        assert!(a < b, "{ease}");
        assert!(b < c, "{ease}");
    }
}

#[test]
fn in_out_is_continuous_at_midpoint() {
    for ease in [
        Ease::InOutQuad,
        Ease::InOutCubic,
        Ease::InOutQuart,
        Ease::InOutQuint,
    ] {
        let lo = ease.apply(0.5 - 1e-9);
        let hi = ease.apply(0.5 + 1e-9);
        assert!((lo - 0.5).abs() < 1e-6, "{ease}");
        assert!((hi - 0.5).abs() < 1e-6, "{ease}");
    }
}

#[test]
fn parses_tween_library_names() {
    assert_eq!("power3.out".parse::<Ease>().unwrap(), Ease::OutQuart);
    assert_eq!("power2.out".parse::<Ease>().unwrap(), Ease::OutCubic);
    assert_eq!("power1.inOut".parse::<Ease>().unwrap(), Ease::InOutQuad);
    assert_eq!("power4".parse::<Ease>().unwrap(), Ease::OutQuint);
    assert_eq!("none".parse::<Ease>().unwrap(), Ease::Linear);
    assert_eq!("OutCubic".parse::<Ease>().unwrap(), Ease::OutCubic);
    assert!("elastic.out".parse::<Ease>().is_err());
}

#[test]
fn json_round_trips_through_variant_name() {
    let e: Ease = serde_json::from_str("\"power3.out\"").unwrap();
    assert_eq!(serde_json::to_string(&e).unwrap(), "\"OutQuart\"");
}
