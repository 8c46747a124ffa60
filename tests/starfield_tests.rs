//! Integration tests for the starfield simulation, input mapping and loop.
//!
//! Every test seeds its RNGs so failures reproduce.

use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use starwarp::recycle::{choose_edge, RESPAWN_DEPTH};
use starwarp::{
    Animation, FrameHandle, FrameScheduler, InputAdapter, InputOutcome, LineBatch, LoopState,
    PointerKind, Renderer, Simulator, SpawnEdge, Star, StarfieldConfig, Vec2, VelocityField,
};

const WIDTH: f32 = 1000.0;
const HEIGHT: f32 = 800.0;
const T: f32 = 50.0;

fn config() -> StarfieldConfig {
    StarfieldConfig::default().with_seed(1234)
}

fn simulator(count: usize, seed: u64) -> Simulator<SmallRng> {
    Simulator::with_rng(&config(), count, WIDTH, HEIGHT, SmallRng::seed_from_u64(seed))
}

fn in_band(s: &Star) -> bool {
    s.in_bounds(WIDTH, HEIGHT, T)
}

/// Where a star ends up after one step if it is not recycled.
fn integrate(star: &Star, v: &VelocityField) -> Star {
    let center = Vec2::new(WIDTH, HEIGHT) * 0.5;
    let mut p = star.position + v.drift * star.z;
    p += (p - center) * v.z * star.z;
    Star {
        position: p,
        z: star.z + v.z,
    }
}

// ============================================================================
// Simulation properties
// ============================================================================

#[test]
fn test_stars_stay_in_band_under_random_input() {
    let mut sim = simulator(500, 1);
    let mut input = InputAdapter::from_config(&config(), 1.0);
    let mut driver = SmallRng::seed_from_u64(2);
    let t0 = Instant::now();

    for frame in 0..2000u64 {
        let now = t0 + Duration::from_millis(frame * 16);
        if driver.gen_bool(0.2) {
            let x = driver.gen_range(0.0..WIDTH);
            let y = driver.gen_range(0.0..HEIGHT);
            let kind = if driver.gen_bool(0.5) {
                PointerKind::Mouse
            } else {
                PointerKind::Touch
            };
            input.pointer_moved(sim.velocity_mut(), kind, x, y);
        }
        if driver.gen_bool(0.02) {
            input.pointer_left();
        }
        if driver.gen_bool(0.05) {
            input.scrolled(sim.velocity_mut(), now);
        }
        input.poll_timers(sim.velocity_mut(), now);

        sim.step(WIDTH, HEIGHT);

        assert_eq!(sim.stars().len(), 500);
        for s in sim.stars() {
            assert!(in_band(s), "frame {frame}: star escaped at {:?}", s.position);
        }
        assert!(sim.velocity().z > 0.0);
    }
}

#[test]
fn test_depth_grows_between_recycles() {
    let mut sim = simulator(300, 3);
    sim.velocity_mut().push(Vec2::new(3.0, -2.0));

    for _ in 0..200 {
        let before: Vec<Star> = sim.stars().to_vec();
        sim.step(WIDTH, HEIGHT);
        let v = *sim.velocity();

        for (old, new) in before.iter().zip(sim.stars()) {
            let expected = integrate(old, &v);
            if in_band(&expected) {
                assert!((new.position - expected.position).length() < 1e-3);
                assert!(new.z > old.z);
            }
        }
    }
}

#[test]
fn test_strong_horizontal_drift_recycles_at_left_edge() {
    let mut sim = simulator(500, 4);
    sim.velocity_mut().push(Vec2::new(1000.0, 0.0));

    let before: Vec<Star> = sim.stars().to_vec();
    sim.step(WIDTH, HEIGHT);
    let v = *sim.velocity();
    assert!(v.drift.x > 1.0);
    assert_eq!(v.drift.y, 0.0);

    let mut recycled = 0;
    for (old, new) in before.iter().zip(sim.stars()) {
        if !in_band(&integrate(old, &v)) {
            recycled += 1;
            assert_eq!(new.position.x, -T);
            assert!((0.0..HEIGHT).contains(&new.position.y));
            assert!((0.2..1.0).contains(&new.z));
        }
    }
    assert!(recycled > 0);
}

#[test]
fn test_still_field_recycles_to_low_depth_anywhere() {
    // A star pushed out by radial expansion alone while drift is negligible.
    let stars = vec![Star::new(WIDTH + T - 0.01, HEIGHT / 2.0, 900.0)];
    let mut sim = Simulator::from_stars(&config(), stars, SmallRng::seed_from_u64(5));
    sim.step(WIDTH, HEIGHT);

    let s = sim.stars()[0];
    assert_eq!(s.z, RESPAWN_DEPTH);
    assert!((0.0..WIDTH).contains(&s.position.x));
    assert!((0.0..HEIGHT).contains(&s.position.y));
}

#[test]
fn test_edge_choice_tracks_drift_ratio() {
    let mut rng = SmallRng::seed_from_u64(6);
    let mut v = VelocityField::new(0.0005);
    v.drift = Vec2::new(-2.0, 6.0);

    let samples = 20_000;
    let mut right = 0;
    let mut top = 0;
    for _ in 0..samples {
        match choose_edge(&v, &mut rng) {
            SpawnEdge::Right => right += 1,
            SpawnEdge::Top => top += 1,
            other => panic!("unexpected edge {other:?}"),
        }
    }
    let share = right as f32 / samples as f32;
    assert!((share - 0.25).abs() < 0.02, "right share {share}");
    assert_eq!(right + top, samples);
}

#[test]
fn test_target_decays_without_overshoot() {
    let mut sim = simulator(10, 7);
    sim.velocity_mut().push(Vec2::new(10.0, -6.0));

    let mut last = sim.velocity().target;
    for _ in 0..300 {
        sim.step(WIDTH, HEIGHT);
        let v = sim.velocity();
        assert!(v.target.x.abs() < last.x.abs());
        assert!(v.target.y.abs() < last.y.abs());
        assert!(v.target.x > 0.0 && v.target.y < 0.0);
        assert!(v.drift.x >= 0.0 && v.drift.y <= 0.0);
        last = v.target;
    }
    assert!(last.length() < 1e-3);
}

// ============================================================================
// Input scenarios
// ============================================================================

#[test]
fn test_pointer_delta_scenario() {
    let mut sim = simulator(500, 8);
    let mut input = InputAdapter::from_config(&config(), 1.0);

    input.pointer_moved(sim.velocity_mut(), PointerKind::Mouse, 100.0, 300.0);
    input.pointer_moved(sim.velocity_mut(), PointerKind::Mouse, 180.0, 300.0);
    assert_eq!(sim.velocity().target, Vec2::new(-10.0, 0.0));

    let before: Vec<Star> = sim.stars().to_vec();
    sim.step(WIDTH, HEIGHT);
    let v = *sim.velocity();
    assert!((v.drift.x - (-10.0 * 0.96 * 0.8)).abs() < 1e-4);

    for (old, new) in before.iter().zip(sim.stars()) {
        let expected = integrate(old, &v);
        assert!((new.position - expected.position).length() < 1e-3);
        // Mouse steering is inverted: a rightward drag drifts stars left.
        assert!(new.position.x < old.position.x);
    }
}

#[test]
fn test_touch_steers_with_motion() {
    let mut v = VelocityField::new(0.0005);
    let mut input = InputAdapter::from_config(&config(), 1.0);
    input.pointer_moved(&mut v, PointerKind::Touch, 0.0, 0.0);
    input.pointer_moved(&mut v, PointerKind::Touch, 80.0, 0.0);
    assert_eq!(v.target, Vec2::new(10.0, 0.0));
}

#[test]
fn test_scroll_burst_scenario() {
    let base = config().base_depth_rate;
    let mut sim = simulator(200, 9);
    let mut input = InputAdapter::from_config(&config(), 1.0);
    let t0 = Instant::now();

    input.scrolled(sim.velocity_mut(), t0);
    assert!((sim.velocity().target_z - base * 50.0).abs() < 1e-7);

    let mut last_z = sim.velocity().z;
    for _ in 0..5 {
        sim.step(WIDTH, HEIGHT);
        assert!(sim.velocity().z > last_z);
        last_z = sim.velocity().z;
    }

    assert!(input.poll_timers(sim.velocity_mut(), t0 + Duration::from_millis(10)));
    assert_eq!(sim.velocity().target_z, base);

    for _ in 0..100 {
        sim.step(WIDTH, HEIGHT);
        let z = sim.velocity().z;
        assert!(z < last_z);
        assert!(z > base);
        last_z = z;
    }
}

#[test]
fn test_window_events_drive_input() {
    use winit::dpi::PhysicalSize;
    use winit::event::WindowEvent;

    let mut v = VelocityField::new(0.0005);
    let mut input = InputAdapter::from_config(&config(), 2.0);
    let outcome = input.handle_event(
        &WindowEvent::Resized(PhysicalSize::new(1600, 1200)),
        &mut v,
        Instant::now(),
    );
    assert_eq!(outcome, InputOutcome::Resized(Vec2::new(1600.0, 1200.0)));
    assert_eq!(input.surface_size(), Vec2::new(1600.0, 1200.0));
}

fn touch(id: u64, phase: winit::event::TouchPhase, x: f64, y: f64) -> winit::event::WindowEvent {
    use winit::dpi::PhysicalPosition;
    use winit::event::{DeviceId, Touch, WindowEvent};

    WindowEvent::Touch(Touch {
        // SAFETY: the id is only compared, never handed back to the platform.
        device_id: unsafe { DeviceId::dummy() },
        phase,
        location: PhysicalPosition::new(x, y),
        force: None,
        id,
    })
}

#[test]
fn test_touch_start_sets_baseline_only() {
    use winit::event::TouchPhase;

    let mut v = VelocityField::new(0.0005);
    let mut input = InputAdapter::from_config(&config(), 1.0);
    let now = Instant::now();

    input.pointer_moved(&mut v, PointerKind::Mouse, 10.0, 10.0);
    assert_eq!(input.pointer_kind(), PointerKind::Mouse);

    // A new touch far from the old mouse position does not jump the field.
    let outcome = input.handle_event(&touch(1, TouchPhase::Started, 400.0, 300.0), &mut v, now);
    assert_eq!(outcome, InputOutcome::Steered);
    assert_eq!(v.target, Vec2::ZERO);
    assert_eq!(input.pointer(), Some(Vec2::new(400.0, 300.0)));
    assert_eq!(input.pointer_kind(), PointerKind::Touch);

    input.handle_event(&touch(1, TouchPhase::Moved, 480.0, 300.0), &mut v, now);
    assert_eq!(v.target, Vec2::new(10.0, 0.0));
}

#[test]
fn test_only_first_touch_steers() {
    use winit::event::TouchPhase;

    let mut v = VelocityField::new(0.0005);
    let mut input = InputAdapter::from_config(&config(), 1.0);
    let now = Instant::now();

    input.handle_event(&touch(1, TouchPhase::Started, 100.0, 100.0), &mut v, now);

    let second = [
        touch(2, TouchPhase::Started, 700.0, 500.0),
        touch(2, TouchPhase::Moved, 900.0, 100.0),
        touch(2, TouchPhase::Ended, 900.0, 100.0),
        touch(2, TouchPhase::Cancelled, 900.0, 100.0),
    ];
    for event in &second {
        assert_eq!(input.handle_event(event, &mut v, now), InputOutcome::Ignored);
    }
    assert_eq!(v.target, Vec2::ZERO);
    assert_eq!(input.pointer(), Some(Vec2::new(100.0, 100.0)));

    input.handle_event(&touch(1, TouchPhase::Moved, 100.0, 180.0), &mut v, now);
    assert_eq!(v.target, Vec2::new(0.0, 10.0));

    let outcome = input.handle_event(&touch(1, TouchPhase::Ended, 100.0, 180.0), &mut v, now);
    assert_eq!(outcome, InputOutcome::Released);
    assert_eq!(input.pointer(), None);

    // With the first finger lifted, the next touch takes over from a fresh baseline.
    let outcome = input.handle_event(&touch(3, TouchPhase::Started, 50.0, 50.0), &mut v, now);
    assert_eq!(outcome, InputOutcome::Steered);
    assert_eq!(v.target, Vec2::new(0.0, 10.0));
    input.handle_event(&touch(3, TouchPhase::Moved, 34.0, 50.0), &mut v, now);
    assert_eq!(v.target, Vec2::new(-2.0, 10.0));
}

#[test]
fn test_cancelled_touch_releases_pointer() {
    use winit::event::TouchPhase;

    let mut v = VelocityField::new(0.0005);
    let mut input = InputAdapter::from_config(&config(), 2.0);
    let now = Instant::now();

    // Physical positions are halved to logical before the delta is taken.
    input.handle_event(&touch(7, TouchPhase::Started, 200.0, 200.0), &mut v, now);
    assert_eq!(input.pointer(), Some(Vec2::new(100.0, 100.0)));

    let outcome = input.handle_event(&touch(7, TouchPhase::Cancelled, 200.0, 200.0), &mut v, now);
    assert_eq!(outcome, InputOutcome::Released);
    assert_eq!(input.pointer(), None);
    assert_eq!(v.target, Vec2::ZERO);
}

#[test]
fn test_minimize_restore_keeps_field_spread() {
    use winit::dpi::PhysicalSize;
    use winit::event::WindowEvent;

    let config = config();
    let mut anim = Animation::new(
        &config,
        Vec2::new(1280.0, 720.0),
        1.0,
        FakeScheduler::default(),
    )
    .unwrap();
    assert_eq!(anim.simulator().stars().len(), 250);

    let mut batch = LineBatch::new(1280.0, 720.0);
    let now = Instant::now();
    anim.run();

    // Minimizing reports an empty size.
    let outcome = anim.handle_event(&WindowEvent::Resized(PhysicalSize::new(0, 0)), now);
    assert_eq!(outcome, InputOutcome::Ignored);
    assert_eq!(anim.surface_size(), Vec2::new(1280.0, 720.0));
    assert!(anim.tick(&mut batch, now));

    let outcome = anim.handle_event(&WindowEvent::Resized(PhysicalSize::new(1280, 720)), now);
    assert_eq!(outcome, InputOutcome::Resized(Vec2::new(1280.0, 720.0)));
    for _ in 0..600 {
        assert!(anim.tick(&mut batch, now));
    }

    let near_origin = anim
        .simulator()
        .stars()
        .iter()
        .filter(|s| s.position.length() < 60.0)
        .count();
    assert!(near_origin < 25, "{near_origin}/250 stars piled near the origin");
}

// ============================================================================
// Loop
// ============================================================================

#[derive(Default)]
struct FakeScheduler {
    next: u64,
    requests: usize,
    cancels: Vec<FrameHandle>,
}

impl FrameScheduler for FakeScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next += 1;
        self.requests += 1;
        FrameHandle(self.next)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.cancels.push(handle);
    }
}

fn animation() -> Animation<FakeScheduler> {
    Animation::new(&config(), Vec2::new(500.0, 400.0), 2.0, FakeScheduler::default()).unwrap()
}

#[test]
fn test_tick_steps_and_draws() {
    let mut anim = animation();
    let size = anim.surface_size();
    assert_eq!(size, Vec2::new(1000.0, 800.0));
    assert_eq!(anim.simulator().stars().len(), 113);

    let mut batch = LineBatch::new(size.x, size.y);
    anim.run();
    assert!(anim.tick(&mut batch, Instant::now()));
    assert_eq!(batch.instances().len(), 113);
    assert_eq!(anim.scheduler().requests, 2);
}

#[test]
fn test_teardown_is_idempotent() {
    let mut anim = animation();
    let mut batch = LineBatch::new(1000.0, 800.0);
    let now = Instant::now();

    anim.run();
    anim.tick(&mut batch, now);
    anim.scrolled(now);
    assert!(anim.next_deadline().is_some());

    anim.teardown();
    anim.teardown();

    assert_eq!(anim.state(), LoopState::Detached);
    assert_eq!(anim.scheduler().cancels, vec![FrameHandle(2)]);
    assert_eq!(anim.pending_frame(), None);
    assert_eq!(anim.next_deadline(), None);

    let requests = anim.scheduler().requests;
    assert!(!anim.tick(&mut batch, now));
    anim.run();
    assert_eq!(anim.scheduler().requests, requests);
    assert!(!anim.poll_timers(now + Duration::from_secs(1)));
}

#[test]
fn test_resize_keeps_stars_and_recycles_later() {
    let mut anim = animation();
    let mut batch = LineBatch::new(1000.0, 800.0);
    let now = Instant::now();
    anim.run();
    anim.tick(&mut batch, now);

    let before: Vec<Star> = anim.simulator().stars().to_vec();
    let size = anim.resize(100.0, 100.0, 2.0);
    assert_eq!(size, Vec2::new(200.0, 200.0));
    assert_eq!(anim.simulator().stars(), before.as_slice());

    batch.resize(size.x, size.y);
    anim.tick(&mut batch, now);
    for s in anim.simulator().stars() {
        assert!(s.in_bounds(200.0, 200.0, T));
    }
}

#[test]
fn test_renderer_twinkle_changes_between_frames() {
    let config = config();
    let mut renderer = Renderer::with_rng(&config, 1.0, SmallRng::seed_from_u64(10));
    let stars = vec![Star::new(10.0, 10.0, 0.5); 50];
    let v = VelocityField::new(0.0005);
    let mut batch = LineBatch::new(100.0, 100.0);

    renderer.draw(&mut batch, &stars, &v);
    let first: Vec<f32> = batch.instances().iter().map(|l| l.color[3]).collect();
    renderer.draw(&mut batch, &stars, &v);
    let second: Vec<f32> = batch.instances().iter().map(|l| l.color[3]).collect();

    assert_ne!(first, second);
    for line in batch.instances() {
        assert_eq!(line.end, [10.5, 10.5]);
    }
}
