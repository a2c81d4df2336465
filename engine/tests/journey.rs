//! End-to-end: a snapshot comes in, the aircraft animates across the
//! viewport at frame rate, survives the feed going quiet, and leaves the
//! registry when it reaches the boundary.

use engine::{Bounds, Config, Engine, EntityId, LonLat, Sample, Time};

fn config() -> Config {
    Config {
        bounds: Bounds::new(-0.5, 0.5, 50.5, 51.5).unwrap(),
        home: LonLat::new(0.0, 51.0),
        curve_probability: 0.0,
        ..Config::default()
    }
}

fn sample(id: &str) -> Sample {
    Sample {
        id: EntityId(id.to_string()),
        position: Some(LonLat::new(0.0, 51.0)),
        heading: 90.0,
        speed: Some(200.0),
        label: "BAW123".to_string(),
        color: None,
    }
}

// Below the 30fps target, so every tick is due.
const DT: f64 = 0.04;

#[test]
fn one_aircraft_crosses_and_exits() {
    let mut engine = Engine::new(config(), 800.0, 450.0, Some(42)).unwrap();
    engine.reconcile(&[sample("abc123")], Time::START);
    assert_eq!(engine.registry().len(), 1);

    let mut frames_seen = 0;
    let mut last_x = f64::NEG_INFINITY;
    let mut t = 0.0;
    while !engine.registry().is_empty() {
        t += DT;
        assert!(t < 120.0, "journey never completed");
        if let Some(frames) = engine.tick(Time::seconds(t)) {
            for frame in &frames {
                assert_eq!(frame.label, "BAW123");
                // Heading due east, so x only grows and stays on screen
                assert!(frame.pos.x >= last_x);
                assert!(frame.pos.x >= 0.0 && frame.pos.x <= 800.0 + 1e-6);
                assert!((frame.pos.y - 225.0).abs() < 1e-6);
                last_x = frame.pos.x;
                frames_seen += 1;
            }
        }
    }
    // Tens of seconds of animation from a single snapshot
    assert!(frames_seen > 100);
}

#[test]
fn feed_dropout_does_not_interrupt_the_journey() {
    let mut engine = Engine::new(config(), 800.0, 450.0, Some(42)).unwrap();
    engine.reconcile(&[sample("abc123")], Time::START);
    let exit_before = engine
        .registry()
        .get(&EntityId("abc123".to_string()))
        .unwrap()
        .trajectory
        .exit();

    // Two whole feed cycles pass without the aircraft being mentioned
    engine.tick(Time::seconds(5.0));
    engine.reconcile(&[], Time::seconds(15.0));
    engine.reconcile(&[], Time::seconds(30.0));
    engine.tick(Time::seconds(16.0));

    let entity = engine
        .registry()
        .get(&EntityId("abc123".to_string()))
        .expect("dropped sample truncated the animation");
    assert_eq!(entity.trajectory.exit(), exit_before);
}

#[test]
fn resize_rescales_without_restarting() {
    let mut engine = Engine::new(config(), 800.0, 450.0, Some(42)).unwrap();
    engine.reconcile(&[sample("abc123")], Time::START);

    let before = engine.tick(Time::seconds(1.0)).unwrap();
    engine.resize(1600.0, 900.0);
    let after = engine.tick(Time::seconds(1.0 + DT)).unwrap();

    // Same geographic journey, twice the pixels. The aircraft only moved a
    // fraction of a pixel between these two ticks.
    assert!((after[0].pos.x - 2.0 * before[0].pos.x).abs() < 5.0);
    assert!((after[0].pos.y - 2.0 * before[0].pos.y).abs() < 5.0);
}

#[test]
fn ticks_above_target_rate_are_throttled() {
    let mut engine = Engine::new(config(), 800.0, 450.0, Some(42)).unwrap();
    engine.reconcile(&[sample("abc123")], Time::START);

    assert!(engine.tick(Time::seconds(1.0)).is_some());
    assert!(engine.tick(Time::seconds(1.001)).is_none());
    assert!(engine.tick(Time::seconds(1.04)).is_some());
}
