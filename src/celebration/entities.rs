// Canvas entities: confetti, rockets and explosion fragments.
// Each kind is a flat record with free update/draw functions; confetti and
// fragments share the `Particle` collection, rockets live on their own.

use std::f64::consts::TAU;

use crate::rng::FxRng;
use crate::surface::Surface;

pub const PALETTE: [&str; 6] = [
    "#ff4e50", "#ff7a8a", "#ffd166", "#f9d423", "#7ee7c7", "#b39ddb",
];

pub const ROCKET_GRAVITY: f64 = 0.2;
pub const CONFETTI_GRAVITY: f64 = 0.26;
/// Applied to horizontal velocity only.
pub const CONFETTI_DRAG: f64 = 0.995;
pub const FRAGMENT_GRAVITY: f64 = 0.08;

const ROCKET_RADIUS: f64 = 2.4;
/// Confetti pieces thrown out alongside every firework explosion.
pub const EXPLOSION_CONFETTI: usize = 12;

// --- Confetti ----------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct Confetti {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub w: f64,
    pub h: f64,
    pub rot: f64,
    pub vr: f64,
    pub color: &'static str,
    pub age: u32,
    pub life: u32,
}

impl Confetti {
    pub fn new(x: f64, y: f64, rng: &mut FxRng) -> Self {
        Self {
            x,
            y,
            vx: rng.range(-3.0, 3.0),
            vy: rng.range(-8.0, -2.0),
            w: rng.range(6.0, 12.0),
            h: rng.range(8.0, 18.0),
            rot: rng.range(0.0, TAU),
            vr: rng.range(-0.12, 0.12),
            color: *rng.pick(&PALETTE),
            age: 0,
            life: rng.int(240, 360) as u32,
        }
    }
}

pub fn update_confetti(c: &mut Confetti) {
    c.vx *= CONFETTI_DRAG;
    c.vy += CONFETTI_GRAVITY;
    c.x += c.vx;
    c.y += c.vy;
    c.rot += c.vr;
    c.age += 1;
}

pub fn draw_confetti(c: &Confetti, surface: &mut impl Surface) {
    surface.fill_rotated_rect(c.x, c.y, c.w, c.h, c.rot, c.color);
}

// --- Rocket ------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct Rocket {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Explodes once `y` climbs to this height (canvas y grows downward).
    pub target_y: f64,
    pub color: &'static str,
    pub exploded: bool,
    pub age: u32,
    /// Safety timeout in frames.
    pub max_age: u32,
}

impl Rocket {
    /// Start just below the bottom edge of a `viewport_h` tall viewport.
    pub fn new(x: f64, viewport_h: f64, max_age: u32, rng: &mut FxRng) -> Self {
        Self {
            x,
            y: viewport_h + 10.0,
            vx: rng.range(-1.0, 1.0),
            vy: rng.range(-13.0, -10.0),
            target_y: rng.range(viewport_h * 0.2, viewport_h * 0.45),
            color: *rng.pick(&PALETTE),
            exploded: false,
            age: 0,
            max_age,
        }
    }
}

/// Advance one frame. Returns `true` on the single frame the rocket explodes.
pub fn update_rocket(r: &mut Rocket) -> bool {
    r.vy += ROCKET_GRAVITY;
    r.x += r.vx;
    r.y += r.vy;
    r.age += 1;
    if !r.exploded && (r.y <= r.target_y || r.age > r.max_age) {
        r.exploded = true;
        return true;
    }
    false
}

/// Fragments plus a small confetti cluster at the rocket's position.
pub fn explode_rocket(r: &Rocket, rng: &mut FxRng, out: &mut Vec<Particle>) {
    let n = rng.int(24, 52);
    out.reserve(n + EXPLOSION_CONFETTI);
    for _ in 0..n {
        let angle = rng.range(0.0, TAU);
        let speed = rng.range(1.8, 6.0);
        out.push(Particle::Fragment(Fragment::new(
            r.x,
            r.y,
            angle.cos() * speed,
            angle.sin() * speed,
            r.color,
            rng,
        )));
    }
    for _ in 0..EXPLOSION_CONFETTI {
        let x = r.x + rng.range(-8.0, 8.0);
        let y = r.y + rng.range(-8.0, 8.0);
        out.push(Particle::Confetti(Confetti::new(x, y, rng)));
    }
}

pub fn draw_rocket(r: &Rocket, surface: &mut impl Surface) {
    surface.fill_circle(r.x, r.y, ROCKET_RADIUS, r.color, 1.0);
}

// --- Explosion fragment ------------------------------------------------------

#[derive(Clone, Debug)]
pub struct Fragment {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub color: &'static str,
    pub age: u32,
    pub life: u32,
    pub size: f64,
}

impl Fragment {
    pub fn new(x: f64, y: f64, vx: f64, vy: f64, color: &'static str, rng: &mut FxRng) -> Self {
        Self {
            x,
            y,
            vx,
            vy,
            color,
            age: 0,
            life: rng.int(40, 80) as u32,
            size: rng.range(2.0, 4.0),
        }
    }

    /// Linear fade from opaque at birth to transparent at end of life.
    pub fn alpha(&self) -> f64 {
        (1.0 - self.age as f64 / self.life.max(1) as f64).max(0.0)
    }
}

pub fn update_fragment(f: &mut Fragment) {
    f.vy += FRAGMENT_GRAVITY;
    f.x += f.vx;
    f.y += f.vy;
    f.age += 1;
}

pub fn draw_fragment(f: &Fragment, surface: &mut impl Surface) {
    surface.fill_circle(f.x, f.y, f.size, f.color, f.alpha());
}

// --- Shared particle collection ---------------------------------------------

#[derive(Clone, Debug)]
pub enum Particle {
    Confetti(Confetti),
    Fragment(Fragment),
}

impl Particle {
    pub fn update(&mut self) {
        match self {
            Particle::Confetti(c) => update_confetti(c),
            Particle::Fragment(f) => update_fragment(f),
        }
    }

    pub fn draw(&self, surface: &mut impl Surface) {
        match self {
            Particle::Confetti(c) => draw_confetti(c, surface),
            Particle::Fragment(f) => draw_fragment(f, surface),
        }
    }

    pub fn position(&self) -> (f64, f64) {
        match self {
            Particle::Confetti(c) => (c.x, c.y),
            Particle::Fragment(f) => (f.x, f.y),
        }
    }

    pub fn age(&self) -> u32 {
        match self {
            Particle::Confetti(c) => c.age,
            Particle::Fragment(f) => f.age,
        }
    }

    pub fn life(&self) -> u32 {
        match self {
            Particle::Confetti(c) => c.life,
            Particle::Fragment(f) => f.life,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.age() > self.life()
    }

    /// Inside the viewport grown by `margin` on the left, right and bottom.
    /// The top is open: confetti is thrown upward and falls back in.
    pub fn in_bounds(&self, width: f64, height: f64, margin: f64) -> bool {
        let (x, y) = self.position();
        y <= height + margin && x >= -margin && x <= width + margin
    }
}
