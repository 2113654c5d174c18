use super::*;

fn hidden() -> VisualState {
    VisualState {
        opacity: 0.0,
        y: 24.0,
        ..VisualState::IDENTITY
    }
}

#[test]
fn scheduled_tween_holds_before_start_and_after_end() {
    let req = TweenRequest {
        from: hidden(),
        to: VisualState::IDENTITY,
        timing: Timing::new(0.4, Ease::Linear).with_delay(0.1),
    };
    let tw = ScheduledTween::schedule(&req, 2.0);
    assert!((tw.start - 2.1).abs() < 1e-12);
    assert_eq!(tw.sample(2.0), hidden());
    assert_eq!(tw.sample(2.6), VisualState::IDENTITY);
    let mid = tw.sample(2.3);
    assert!((mid.opacity - 0.5).abs() < 1e-9);
    assert!(tw.is_running(2.3));
    assert!(!tw.is_running(2.6));
}

#[test]
fn zero_duration_jumps_to_target() {
    let req = TweenRequest {
        from: hidden(),
        to: VisualState::IDENTITY,
        timing: Timing::new(0.0, Ease::OutCubic),
    };
    let tw = ScheduledTween::schedule(&req, 1.0);
    assert_eq!(tw.sample(1.0), hidden());
    assert_eq!(tw.sample(1.0 + 1e-9), VisualState::IDENTITY);
}

#[test]
fn stagger_is_index_linear() {
    assert_eq!(stagger_delay(0.4, 0.1, 0), 0.4);
    assert!((stagger_delay(0.4, 0.1, 3) - 0.7).abs() < 1e-12);
}

#[test]
fn timing_rejects_negative_values() {
    assert!(Timing::new(-1.0, Ease::Linear).validate().is_err());
    assert!(
        Timing::new(1.0, Ease::Linear)
            .with_delay(-0.1)
            .validate()
            .is_err()
    );
    assert!(Timing::default().validate().is_ok());
}

#[test]
fn timing_json_defaults() {
    let t: Timing = serde_json::from_str(r#"{"ease": "power3.out"}"#).unwrap();
    assert_eq!(t.duration, 0.5);
    assert_eq!(t.delay, 0.0);
    assert_eq!(t.ease, Ease::OutQuart);
}
