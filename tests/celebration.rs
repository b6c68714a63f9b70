// Integration tests (native) for the celebration core.
// These drive `Celebration` through in-memory surface/overlay fakes so they run
// under plain `cargo test` without a browser.

use valentine_fx::celebration::{Celebration, Particle, SpawnCounters};
use valentine_fx::config::FxConfig;
use valentine_fx::error::FxResult;
use valentine_fx::overlay::{HeartSpec, Overlay};
use valentine_fx::rng::FxRng;
use valentine_fx::surface::Surface;

#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
enum Shape {
    Rect { x: f64, y: f64 },
    Circle { x: f64, y: f64, alpha: f64 },
}

/// Keeps whatever has been drawn since the last clear, like a canvas would.
#[derive(Default)]
struct RecordingSurface {
    shapes: Vec<Shape>,
}

impl RecordingSurface {
    fn is_blank(&self) -> bool {
        self.shapes.is_empty()
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self) {
        self.shapes.clear();
    }
    fn fill_rotated_rect(&mut self, x: f64, y: f64, _w: f64, _h: f64, _rot: f64, _color: &str) {
        self.shapes.push(Shape::Rect { x, y });
    }
    fn fill_circle(&mut self, x: f64, y: f64, _r: f64, _color: &str, alpha: f64) {
        self.shapes.push(Shape::Circle { x, y, alpha });
    }
}

#[derive(Default)]
struct MemoryOverlay {
    next_id: usize,
    nodes: Vec<(usize, HeartSpec)>,
}

impl Overlay for MemoryOverlay {
    type Handle = usize;

    fn append(&mut self, heart: &HeartSpec) -> FxResult<usize> {
        self.next_id += 1;
        self.nodes.push((self.next_id, heart.clone()));
        Ok(self.next_id)
    }
    fn remove(&mut self, handle: usize) {
        self.nodes.retain(|(id, _)| *id != handle);
    }
    fn clear(&mut self) {
        self.nodes.clear();
    }
}

type Fx = Celebration<RecordingSurface, MemoryOverlay>;

fn celebration(config: FxConfig, width: f64, height: f64, seed: u64) -> Fx {
    Celebration::new(
        config,
        FxRng::with_seed(seed),
        RecordingSurface::default(),
        MemoryOverlay::default(),
        width,
        height,
    )
}

const FRAME_MS: f64 = 16.0;

/// Tick from `from` up to (not past) `until`, returning the next timestamp.
fn run_frames(fx: &mut Fx, from: f64, until: f64, mut check: impl FnMut(&Fx)) -> f64 {
    let mut t = from;
    while t <= until {
        fx.tick(t);
        check(fx);
        t += FRAME_MS;
    }
    t
}

#[test]
fn no_particle_outlives_its_life() {
    for seed in 0..4 {
        let mut fx = celebration(FxConfig::desktop(), 1280.0, 720.0, seed);
        fx.start(0.0);
        run_frames(&mut fx, 0.0, 20_000.0, |fx| {
            for p in fx.particles() {
                assert!(p.age() <= p.life(), "age {} > life {}", p.age(), p.life());
            }
        });
    }
}

#[test]
fn particle_count_never_exceeds_cap() {
    let config = FxConfig {
        max_particles: 150,
        rocket_interval_ms: 100.0,
        burst_interval_ms: 120.0,
        burst_size: 60,
        ..FxConfig::desktop()
    };
    let mut fx = celebration(config, 1280.0, 720.0, 99);
    fx.start(0.0);
    let mut peak = 0;
    run_frames(&mut fx, 0.0, 8_000.0, |fx| {
        assert!(fx.particle_count() <= 150);
        peak = peak.max(fx.particle_count());
    });
    // Make sure the cap was actually exercised.
    assert!(peak >= 140, "peak was only {peak}");
}

#[test]
fn launch_rocket_at_cap_is_skipped() {
    let config = FxConfig {
        max_particles: 100,
        ..FxConfig::desktop()
    };
    let mut fx = celebration(config, 1280.0, 720.0, 5);
    assert_eq!(fx.spawn_burst(640.0, 360.0, 100), 100);
    let before = fx.rocket_count();
    assert!(!fx.launch_rocket());
    assert_eq!(fx.rocket_count(), before);
}

#[test]
fn rocket_below_target_explodes_once_on_timeout() {
    // A very tall viewport puts every apex target out of reach.
    let config = FxConfig {
        rocket_max_age: 30,
        ..FxConfig::desktop()
    };
    let mut fx = celebration(config, 1280.0, 10_000.0, 17);
    assert!(fx.launch_rocket());

    for _ in 0..30 {
        fx.advance_frame();
        assert_eq!(fx.rocket_count(), 1);
        assert_eq!(fx.particle_count(), 0);
    }
    // Frame 31 exceeds the safety age.
    fx.advance_frame();
    assert_eq!(fx.rocket_count(), 0);
    let after_explosion = fx.particle_count();
    let fragments = fx
        .particles()
        .iter()
        .filter(|p| matches!(p, Particle::Fragment(_)))
        .count();
    assert!((24..52).contains(&fragments), "{fragments} fragments");
    assert_eq!(after_explosion - fragments, 12);

    // Nothing explodes a second time.
    for _ in 0..20 {
        fx.advance_frame();
        assert!(fx.particle_count() <= after_explosion);
    }
}

#[test]
fn rocket_reaching_apex_explodes() {
    // Short viewport: every apex target is within reach of the slowest rocket.
    let mut fx = celebration(FxConfig::desktop(), 1280.0, 250.0, 23);
    assert!(fx.launch_rocket());
    let target = fx.rockets()[0].target_y;
    let mut frames = 0u32;
    while fx.rocket_count() == 1 {
        fx.advance_frame();
        frames += 1;
    }
    // Burst before the safety age, so it was the target that triggered it.
    assert!(frames <= fx.config().rocket_max_age);
    assert!(fx.particle_count() >= 24 + 12);
    // Fragments start from where the rocket burst, within one frame of travel.
    let highest = fx
        .particles()
        .iter()
        .map(|p| p.position().1)
        .fold(f64::INFINITY, f64::min);
    assert!(highest > target - 40.0);
}

#[test]
fn burst_on_empty_system_is_exact() {
    let mut fx = celebration(FxConfig::desktop(), 1280.0, 720.0, 1);
    assert_eq!(fx.config().max_particles, 1200);
    assert_eq!(fx.spawn_burst(640.0, 360.0, 160), 160);
    assert_eq!(fx.particle_count(), 160);
}

#[test]
fn restart_does_not_duplicate_timers() {
    let window_ms = 5_000.0;

    let mut single = celebration(FxConfig::desktop(), 1280.0, 720.0, 3);
    single.start(0.0);
    run_frames(&mut single, 0.0, window_ms, |_| {});

    let mut restarted = celebration(FxConfig::desktop(), 1280.0, 720.0, 3);
    restarted.start(0.0);
    restarted.stop();
    restarted.start(0.0);
    restarted.start(0.0);
    run_frames(&mut restarted, 0.0, window_ms, |_| {});

    assert_eq!(single.counters(), restarted.counters());
    // 5 periodic rockets + 2 intro, 3 periodic bursts + 1 intro, a heart every 600 ms.
    assert_eq!(
        single.counters(),
        SpawnCounters {
            rockets: 7,
            bursts: 4,
            hearts: 8,
        }
    );
}

#[test]
fn mobile_profile_spawns_less() {
    let mut desktop = celebration(FxConfig::for_viewport(1280.0, false), 1280.0, 720.0, 8);
    let mut mobile = celebration(FxConfig::for_viewport(390.0, false), 390.0, 844.0, 8);
    desktop.start(0.0);
    mobile.start(0.0);
    run_frames(&mut desktop, 0.0, 5_000.0, |_| {});
    run_frames(&mut mobile, 0.0, 5_000.0, |fx| assert!(fx.particle_count() <= 600));
    assert!(mobile.counters().rockets < desktop.counters().rockets);
    assert!(mobile.counters().hearts < desktop.counters().hearts);
}

#[test]
fn stop_leaves_everything_blank() {
    let mut fx = celebration(FxConfig::desktop(), 1280.0, 720.0, 11);
    fx.start(0.0);
    run_frames(&mut fx, 0.0, 3_000.0, |_| {});
    assert!(fx.particle_count() + fx.rocket_count() > 0);
    assert!(fx.heart_count() > 0);
    assert!(!fx.surface().is_blank());

    assert!(fx.stop());
    assert_eq!(fx.particle_count(), 0);
    assert_eq!(fx.rocket_count(), 0);
    assert_eq!(fx.heart_count(), 0);
    assert!(fx.overlay().nodes.is_empty());
    assert!(fx.surface().is_blank());

    // Timers are gone: ticking a stopped effect spawns and draws nothing.
    run_frames(&mut fx, 3_000.0, 6_000.0, |fx| {
        assert_eq!(fx.particle_count(), 0);
        assert!(fx.surface().is_blank());
    });
}

#[test]
fn hearts_are_removed_after_their_animation() {
    let mut fx = celebration(FxConfig::desktop(), 1280.0, 720.0, 4);
    fx.start(0.0);
    // First heart timer fires on the 608 ms frame.
    run_frames(&mut fx, 0.0, 608.0, |_| {});
    assert_eq!(fx.heart_count(), 1);
    let spec = fx.overlay().nodes[0].1.clone();
    assert!((10.0..90.0).contains(&spec.left_pct));
    assert!((5.0..11.0).contains(&spec.duration_s));
    let expires = 608.0 + spec.lifetime_ms();
    fx.expire_hearts(expires - 1.0);
    assert!(fx.overlay().nodes.iter().any(|(id, _)| *id == 1));
    fx.expire_hearts(expires);
    assert!(fx.overlay().nodes.iter().all(|(id, _)| *id != 1));
}

#[test]
fn fragments_fade_as_they_age() {
    let mut fx = celebration(FxConfig::desktop(), 1280.0, 10_000.0, 31);
    fx.launch_rocket();
    while fx.rocket_count() > 0 {
        fx.advance_frame();
    }
    for _ in 0..20 {
        fx.advance_frame();
    }
    let alphas: Vec<f64> = fx
        .surface()
        .shapes
        .iter()
        .filter_map(|s| match s {
            Shape::Circle { alpha, .. } => Some(*alpha),
            Shape::Rect { .. } => None,
        })
        .collect();
    assert!(!alphas.is_empty());
    assert!(alphas.iter().all(|a| *a < 1.0 && *a > 0.0));
}
