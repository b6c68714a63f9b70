//! The celebration effect: rockets, confetti, fragments and floating hearts.
//!
//! `Celebration` owns every live entity plus the spawn timers. It never talks
//! to the browser directly; drawing goes through a [`Surface`] and hearts go
//! through an [`Overlay`], so the whole thing runs natively under test.

use super::entities::{Confetti, Particle, Rocket, draw_rocket, explode_rocket, update_rocket};
use super::ticker::Ticker;
use crate::config::FxConfig;
use crate::overlay::{HeartSpec, Overlay};
use crate::rng::FxRng;
use crate::surface::Surface;

/// Spawn jitter around a burst origin.
const BURST_JITTER: f64 = 20.0;
/// Rockets launch at least this far from either side edge.
const ROCKET_EDGE_INSET: f64 = 100.0;
/// Periodic bursts keep this far from either side edge.
const BURST_EDGE_INSET: f64 = 120.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Job {
    LaunchRocket,
    ConfettiBurst,
    Heart,
    IntroBurst,
    IntroRockets,
}

/// What was spawned since the last `start`. Handy for tests and debug logs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpawnCounters {
    pub rockets: u32,
    pub bursts: u32,
    pub hearts: u32,
}

struct HeartElement<H> {
    handle: H,
    expires_at_ms: f64,
}

pub struct Celebration<S: Surface, O: Overlay> {
    config: FxConfig,
    rng: FxRng,
    surface: S,
    overlay: O,
    width: f64,
    height: f64,
    rockets: Vec<Rocket>,
    // Oldest first; eviction drains from the front.
    particles: Vec<Particle>,
    hearts: Vec<HeartElement<O::Handle>>,
    // `Some` exactly while running.
    timers: Option<Vec<(Job, Ticker)>>,
    counters: SpawnCounters,
}

impl<S: Surface, O: Overlay> Celebration<S, O> {
    pub fn new(config: FxConfig, rng: FxRng, surface: S, overlay: O, width: f64, height: f64) -> Self {
        Self {
            config,
            rng,
            surface,
            overlay,
            width,
            height,
            rockets: Vec::new(),
            particles: Vec::new(),
            hearts: Vec::new(),
            timers: None,
            counters: SpawnCounters::default(),
        }
    }

    pub fn config(&self) -> &FxConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.timers.is_some()
    }

    /// Running, but with no timers left to fire and nothing on screen. Only the
    /// reduced-motion burst ever gets here, once it has settled.
    pub fn is_idle(&self) -> bool {
        matches!(&self.timers, Some(t) if t.is_empty())
            && self.rockets.is_empty()
            && self.particles.is_empty()
    }

    pub fn rocket_count(&self) -> usize {
        self.rockets.len()
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn heart_count(&self) -> usize {
        self.hearts.len()
    }

    pub fn rockets(&self) -> &[Rocket] {
        &self.rockets
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn counters(&self) -> SpawnCounters {
        self.counters
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn overlay(&self) -> &O {
        &self.overlay
    }

    pub fn viewport(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    // --- Lifecycle -----------------------------------------------------------

    /// Arm the spawn timers. Returns `false` (and changes nothing) if already running.
    pub fn start(&mut self, now: f64) -> bool {
        if self.is_running() {
            return false;
        }
        self.counters = SpawnCounters::default();
        if self.config.reduced_motion {
            // One burst, no timers, no hearts.
            self.timers = Some(Vec::new());
            let (cx, cy) = (self.width / 2.0, self.height / 2.0);
            self.spawn_burst(cx, cy, self.config.intro_burst_size);
            log::debug!("celebration started (reduced motion)");
            return true;
        }
        let cfg = &self.config;
        self.timers = Some(vec![
            (Job::LaunchRocket, Ticker::every(cfg.rocket_interval_ms, now)),
            (Job::ConfettiBurst, Ticker::every(cfg.burst_interval_ms, now)),
            (Job::Heart, Ticker::every(cfg.heart_interval_ms, now)),
            (Job::IntroBurst, Ticker::once(cfg.intro_burst_delay_ms, now)),
            (Job::IntroRockets, Ticker::once(cfg.intro_rocket_delay_ms, now)),
        ]);
        log::debug!("celebration started at {now:.0}ms");
        true
    }

    /// Cancel all timers and wipe every entity, the canvas and the overlay.
    /// Returns `false` if it was not running.
    pub fn stop(&mut self) -> bool {
        if self.timers.take().is_none() {
            return false;
        }
        self.rockets.clear();
        self.particles.clear();
        self.hearts.clear();
        self.overlay.clear();
        self.surface.clear();
        log::debug!("celebration stopped after {:?}", self.counters);
        true
    }

    /// One animation frame: fire due timers, retire hearts, advance and draw.
    pub fn tick(&mut self, now: f64) {
        let Some(timers) = self.timers.as_mut() else {
            return;
        };
        let mut due: Vec<Job> = Vec::new();
        for (job, ticker) in timers.iter_mut() {
            for _ in 0..ticker.fire_count(now) {
                due.push(*job);
            }
        }
        timers.retain(|(_, t)| !t.is_done());
        for job in due {
            self.run(job, now);
        }
        self.expire_hearts(now);
        self.advance_frame();
    }

    fn run(&mut self, job: Job, now: f64) {
        match job {
            Job::LaunchRocket => {
                self.launch_rocket();
            }
            Job::ConfettiBurst => {
                let x = self.rng.range(BURST_EDGE_INSET, self.width - BURST_EDGE_INSET);
                let y = self.rng.range(self.height * 0.15, self.height * 0.45);
                self.spawn_burst(x, y, self.config.burst_size);
            }
            Job::Heart => {
                self.spawn_heart(now);
            }
            Job::IntroBurst => {
                let (cx, cy) = (self.width / 2.0, self.height / 2.0);
                self.spawn_burst(cx, cy, self.config.intro_burst_size);
            }
            Job::IntroRockets => {
                for _ in 0..self.config.intro_rockets {
                    self.launch_rocket();
                }
            }
        }
    }

    // --- Spawning ------------------------------------------------------------

    /// Launch one rocket from below the viewport. Skipped (returns `false`) when
    /// particles + rockets already reach the cap.
    pub fn launch_rocket(&mut self) -> bool {
        if self.particles.len() + self.rockets.len() >= self.config.max_particles {
            return false;
        }
        let x = self
            .rng
            .range(ROCKET_EDGE_INSET, self.width - ROCKET_EDGE_INSET);
        let rocket = Rocket::new(x, self.height, self.config.rocket_max_age, &mut self.rng);
        self.rockets.push(rocket);
        self.counters.rockets += 1;
        true
    }

    /// Throw confetti around `(x, y)`. The requested count shrinks in
    /// proportion to the remaining headroom under the cap, but never below
    /// `min_burst` (or the request, if smaller). Returns how many were spawned.
    pub fn spawn_burst(&mut self, x: f64, y: f64, requested: usize) -> usize {
        let cap = self.config.max_particles.max(1);
        // A single burst never asks for more than the whole cap.
        let requested = requested.min(cap);
        let headroom = cap.saturating_sub(self.particles.len());
        // Widened so a large cap cannot overflow a 32-bit usize.
        let proportional = (requested as u128 * headroom as u128 / cap as u128) as usize;
        let count = proportional
            .max(requested.min(self.config.min_burst))
            .min(requested);
        self.particles.reserve(count);
        for _ in 0..count {
            let px = x + self.rng.range(-BURST_JITTER, BURST_JITTER);
            let py = y + self.rng.range(-BURST_JITTER, BURST_JITTER);
            self.particles
                .push(Particle::Confetti(Confetti::new(px, py, &mut self.rng)));
        }
        self.counters.bursts += 1;
        count
    }

    /// Append one floating heart to the overlay. Skipped under reduced motion;
    /// an overlay failure drops the heart with a warning.
    pub fn spawn_heart(&mut self, now: f64) -> bool {
        if self.config.reduced_motion {
            return false;
        }
        let spec = HeartSpec {
            left_pct: self.rng.range(10.0, 90.0),
            duration_s: self.rng.range(5.0, 11.0),
            delay_s: self.rng.range(0.0, 0.6),
            size_px: self.rng.range(18.0, 34.0),
        };
        match self.overlay.append(&spec) {
            Ok(handle) => {
                self.hearts.push(HeartElement {
                    handle,
                    expires_at_ms: now + spec.lifetime_ms(),
                });
                self.counters.hearts += 1;
                true
            }
            Err(err) => {
                log::warn!("dropping heart: {err}");
                false
            }
        }
    }

    /// Remove hearts whose animation has finished.
    pub fn expire_hearts(&mut self, now: f64) {
        let mut i = 0;
        while i < self.hearts.len() {
            if self.hearts[i].expires_at_ms <= now {
                let heart = self.hearts.swap_remove(i);
                self.overlay.remove(heart.handle);
            } else {
                i += 1;
            }
        }
    }

    // --- Per-frame update ----------------------------------------------------

    /// Clear the surface, advance and draw every canvas entity, then prune
    /// exploded rockets, expired or escaped particles, and the oldest overflow.
    pub fn advance_frame(&mut self) {
        self.surface.clear();

        for rocket in self.rockets.iter_mut() {
            if update_rocket(rocket) {
                explode_rocket(rocket, &mut self.rng, &mut self.particles);
            }
            draw_rocket(rocket, &mut self.surface);
        }
        self.rockets.retain(|r| !r.exploded);

        for particle in self.particles.iter_mut() {
            particle.update();
            particle.draw(&mut self.surface);
        }
        let (w, h, margin) = (self.width, self.height, self.config.bounds_margin);
        self.particles
            .retain(|p| !p.is_expired() && p.in_bounds(w, h, margin));

        let cap = self.config.max_particles;
        if self.particles.len() > cap {
            let excess = self.particles.len() - cap;
            self.particles.drain(..excess);
        }
    }
}
