use super::*;
use crate::animation::state::StateDef;
use crate::host::{Document, Viewport};
use crate::sim::{NodeDef, PageDef, SimEvent, SimHost};

fn page() -> PageDef {
    PageDef {
        viewport: crate::foundation::core::ViewportSize {
            width: 1280.0,
            height: 800.0,
        },
        body: NodeDef::new("body", "", [0.0, 0.0, 1280.0, 3000.0]).with_children([
            NodeDef::new("section", "hero", [0.0, 100.0, 1280.0, 200.0]),
            NodeDef::new("h2", "title", [0.0, 1200.0, 900.0, 60.0]).with_children([
                NodeDef::new("span", "word", [0.0, 1200.0, 200.0, 60.0]),
                NodeDef::new("span", "word", [220.0, 1200.0, 200.0, 60.0]),
                NodeDef::new("span", "word", [440.0, 1200.0, 200.0, 60.0]),
            ]),
            NodeDef::new("article", "card", [0.0, 1600.0, 400.0, 300.0]),
            NodeDef::new("article", "card", [420.0, 1600.0, 400.0, 300.0]),
            NodeDef::new("div", "bar", [0.0, 0.0, 1280.0, 4.0]),
        ]),
    }
}

fn engine() -> Engine<SimHost> {
    Engine::new(SimHost::new(&page()).unwrap(), EngineOptions::default())
}

fn scroll(engine: &mut Engine<SimHost>, y: f64) {
    engine.host_mut().scroll_to(y);
    engine.pump();
}

#[test]
fn registration_applies_initial_state_and_waits() {
    let mut e = engine();
    let h = e.register_reveal(".card", &RevealConfig::default()).unwrap();
    let cards = e.host().query(".card");
    let s = e.host().state(cards[0]);
    assert_eq!(s.opacity, 0.0);
    assert_eq!(s.y, 24.0);
    assert_eq!(e.watch_count(), 2);
    assert!(e.pump().is_empty());
    assert_eq!(e.is_fired(h), Some(false));
    assert!(e.host().tween_history(cards[0]).is_empty());
}

#[test]
fn reveal_fires_once_per_lifetime() {
    let mut e = engine();
    let h = e.register_reveal(".card", &RevealConfig::default()).unwrap();
    let card = e.host().query(".card")[0];
    e.host_mut().advance(3.0);
    scroll(&mut e, 1000.0);
    assert_eq!(e.is_fired(h), Some(true));
    assert_eq!(e.watch_count(), 0);
    assert_eq!(e.host().watch_count(), 0);
    let history = e.host().tween_history(card);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].start, 3.0);
    assert_eq!(history[0].duration, 0.7);
    assert!(e.host().has_class(card, "revealed"));

    scroll(&mut e, 0.0);
    scroll(&mut e, 1000.0);
    assert_eq!(e.host().tween_history(card).len(), 1);
}

#[test]
fn group_members_start_at_stagger_offsets() {
    let mut e = engine();
    let cfg = GroupConfig::new(
        RevealConfig::default()
            .start(EnterPoint::top_at(80.0))
            .duration(0.4),
        0.05,
    );
    let h = e.register_group(".word", &cfg).unwrap();
    assert_eq!(e.watch_count(), 1);
    e.host_mut().advance(2.0);
    scroll(&mut e, 1000.0);
    assert_eq!(e.is_fired(h), Some(true));
    for (i, word) in e.members(h).into_iter().enumerate() {
        let history = e.host().tween_history(word);
        assert_eq!(history.len(), 1);
        assert!((history[0].start - (2.0 + 0.05 * i as f64)).abs() < 1e-9);
        assert_eq!(history[0].duration, 0.4);
    }
}

#[test]
fn group_watches_an_explicit_anchor() {
    let mut e = engine();
    let cfg = GroupConfig::new(
        RevealConfig::default().start_at(EnterPoint::default(), ".hero"),
        0.1,
    );
    let h = e.register_group(".card", &cfg).unwrap();
    // The hero is already in view, so the cards fire with it.
    e.pump();
    assert_eq!(e.is_fired(h), Some(true));
}

#[test]
fn load_trigger_plays_at_registration() {
    let mut e = engine();
    let h = e
        .register_reveal(".hero", &RevealConfig::default().on_load().delay(0.15))
        .unwrap();
    let hero = e.host().query_one(".hero").unwrap();
    assert_eq!(e.is_fired(h), Some(true));
    assert_eq!(e.watch_count(), 0);
    assert!((e.host().tween_history(hero)[0].start - 0.15).abs() < 1e-9);
}

#[test]
fn missing_targets_register_nothing() {
    let mut e = engine();
    assert!(e.register_reveal(".missing", &RevealConfig::default()).is_none());
    assert!(e
        .register_group(".missing", &GroupConfig::new(RevealConfig::default(), 0.1))
        .is_none());
    assert!(e
        .register_reveal(
            ".card",
            &RevealConfig::default().start_at(EnterPoint::default(), ".missing")
        )
        .is_none());
    assert!(e
        .register_scrub(
            ".missing",
            &ScrubConfig::new(
                StateDef::opacity(0.0),
                StateDef::opacity(1.0),
                ScrubRange::whole_page()
            )
        )
        .is_empty());
    assert_eq!(e.watch_count(), 0);
    assert!(e.host().log().is_empty());
    e.teardown();
    assert!(e.is_torn_down());
}

#[test]
fn reduced_motion_presents_targets_without_tweens() {
    let host = SimHost::new(&page()).unwrap().with_reduced_motion(true);
    let mut e = Engine::new(host, EngineOptions::default());
    assert!(e.reduced_motion());
    let h = e.register_reveal(".card", &RevealConfig::default()).unwrap();
    let card = e.host().query(".card")[0];
    assert_eq!(e.is_fired(h), Some(true));
    assert!(e.host().state(card).approx_eq(&VisualState::IDENTITY, 1e-9));
    assert!(e.host().has_class(card, "revealed"));
    assert_eq!(e.host().watch_count(), 0);
    assert!(e
        .register_scrub(
            ".bar",
            &ScrubConfig::new(
                StateDef::opacity(0.0),
                StateDef::opacity(1.0),
                ScrubRange::whole_page()
            )
        )
        .is_empty());
    assert!(
        !e.host()
            .log()
            .iter()
            .any(|l| matches!(l.event, SimEvent::Tween { .. }))
    );
}

#[test]
fn reduced_motion_change_snaps_pending_reveals() {
    let mut e = engine();
    let h = e.register_reveal(".card", &RevealConfig::default()).unwrap();
    e.on_scroll();
    e.set_reduced_motion(true);
    let card = e.host().query(".card")[0];
    assert_eq!(e.is_fired(h), Some(true));
    assert_eq!(e.host().state(card).opacity, 1.0);
    assert!(e.host().has_class(card, "revealed"));
    assert_eq!(e.host().watch_count(), 0);
    assert!(!e.has_pending_frame());
}

#[test]
fn rearm_under_reduced_motion_keeps_the_reveal_class() {
    let mut e = engine();
    let h = e.register_reveal(".card", &RevealConfig::default()).unwrap();
    let card = e.host().query(".card")[0];
    e.set_reduced_motion(true);
    e.rearm(h);
    assert!(e.host().has_class(card, "revealed"));
    assert!(e.rearm_node(card));
    assert!(e.host().has_class(card, "revealed"));
    assert_eq!(e.host().state(card).opacity, 1.0);
    assert_eq!(e.host().watch_count(), 0);
}

#[test]
fn rearm_replays_from_the_initial_state() {
    let mut e = engine();
    let h = e.register_reveal(".card", &RevealConfig::default()).unwrap();
    let card = e.host().query(".card")[0];
    scroll(&mut e, 1000.0);
    e.host_mut().advance(1.0);
    assert_eq!(e.host().state(card).opacity, 1.0);

    e.rearm(h);
    assert_eq!(e.is_fired(h), Some(false));
    assert_eq!(e.host().state(card).opacity, 0.0);
    assert!(!e.host().has_class(card, "revealed"));
    e.pump();
    assert_eq!(e.is_fired(h), Some(true));
    assert_eq!(e.host().tween_history(card).len(), 2);
}

#[test]
fn rearm_node_leaves_siblings_alone() {
    let mut e = engine();
    let cfg = GroupConfig::new(RevealConfig::default(), 0.1);
    let h = e.register_group(".card", &cfg).unwrap();
    scroll(&mut e, 1000.0);
    let cards = e.members(h);

    assert!(e.rearm_node(cards[1]));
    assert_eq!(e.is_fired(h), Some(false));
    assert_eq!(e.watch_count(), 1);
    e.pump();
    assert_eq!(e.is_fired(h), Some(true));
    assert_eq!(e.host().tween_history(cards[0]).len(), 1);
    assert_eq!(e.host().tween_history(cards[1]).len(), 2);

    let hero = e.host().query_one(".hero").unwrap();
    assert!(!e.rearm_node(hero));
}

#[test]
fn retriggerable_reveals_keep_their_watch() {
    let mut e = engine();
    let h = e
        .register_reveal(".card", &RevealConfig::default().retrigger(true))
        .unwrap();
    scroll(&mut e, 1000.0);
    assert_eq!(e.is_fired(h), Some(true));
    assert_eq!(e.watch_count(), 2);
}

#[test]
fn scrub_samples_once_per_frame() {
    let mut e = engine();
    let cfg = ScrubConfig::new(
        StateDef {
            scale_x: Some(0.0),
            ..StateDef::default()
        },
        StateDef {
            scale_x: Some(1.0),
            ..StateDef::default()
        },
        ScrubRange::whole_page(),
    );
    let handles = e.register_scrub(".bar", &cfg);
    assert_eq!(handles.len(), 1);
    let bar = e.host().query_one(".bar").unwrap();
    assert_eq!(e.host().state(bar).scale_x, 0.0);
    assert_eq!(e.scrub_progress(handles[0]), Some(0.0));

    e.host_mut().scroll_to(1100.0);
    e.on_scroll();
    e.on_scroll();
    assert_eq!(e.host().pending_frames(), 1);
    let frames = e.host_mut().take_frames();
    assert!(!e.on_frame(FrameToken(999)));
    assert!(e.on_frame(frames[0]));
    assert!(!e.has_pending_frame());
    assert_eq!(e.scrub_progress(handles[0]), Some(0.5));
    assert!((e.host().state(bar).scale_x - 0.5).abs() < 1e-9);
}

#[test]
fn smoothed_scrub_catches_up_with_a_tween() {
    let mut e = engine();
    let cfg = ScrubConfig::new(
        StateDef::opacity(0.0),
        StateDef::opacity(1.0),
        ScrubRange::whole_page(),
    )
    .smoothing(0.3);
    e.register_scrub(".bar", &cfg);
    let bar = e.host().query_one(".bar").unwrap();

    e.host_mut().scroll_to(2200.0);
    e.on_scroll();
    let frames = e.host_mut().take_frames();
    e.on_frame(frames[0]);
    let tweens = e.host().tweens(bar);
    assert_eq!(tweens.len(), 1);
    assert_eq!(tweens[0].duration, 0.3);
    assert_eq!(tweens[0].to.opacity, 1.0);
    assert_eq!(e.host().state(bar).opacity, 0.0);
    e.host_mut().advance(0.3);
    assert_eq!(e.host().state(bar).opacity, 1.0);
}

#[test]
fn register_spec_reports_strategies() {
    let mut e = engine();
    let regs = e.register_spec(".card", &TriggerSpec::Reveal(RevealConfig::default()));
    assert_eq!(regs.len(), 1);
    assert_eq!(regs[0].strategy(), TriggerStrategy::Discrete);
    let regs = e.register_spec(
        ".bar",
        &TriggerSpec::Scrub(ScrubConfig::new(
            StateDef::opacity(0.0),
            StateDef::opacity(1.0),
            ScrubRange::whole_page(),
        )),
    );
    assert_eq!(regs.len(), 1);
    assert_eq!(regs[0].strategy(), TriggerStrategy::Continuous);
    assert!(e
        .register_spec(".missing", &TriggerSpec::Reveal(RevealConfig::default()))
        .is_empty());
}

#[test]
fn foreign_records_are_returned() {
    let mut e = engine();
    e.register_reveal(".card", &RevealConfig::default());
    let hero = e.host().query_one(".hero").unwrap();
    let w = e
        .host_mut()
        .observe(hero, crate::trigger::region::ObserveOptions::default());
    let foreign = e.pump();
    assert_eq!(foreign.len(), 1);
    assert_eq!(foreign[0].watch, w);
    assert!(!e.on_intersect(w, true));
}

#[test]
fn teardown_is_idempotent_and_final() {
    let mut e = engine();
    e.register_reveal(".card", &RevealConfig::default());
    e.register_scrub(
        ".bar",
        &ScrubConfig::new(
            StateDef::opacity(0.0),
            StateDef::opacity(1.0),
            ScrubRange::whole_page(),
        ),
    );
    e.host_mut().scroll_to(500.0);
    e.on_scroll();
    e.teardown();
    assert_eq!(e.host().watch_count(), 0);
    assert_eq!(e.host().pending_frames(), 0);
    e.teardown();
    assert!(e.register_reveal(".hero", &RevealConfig::default()).is_none());
    e.on_scroll();
    assert!(!e.has_pending_frame());
}
