//! Tuning profiles for the celebration effect.
//!
//! Two fixed profiles exist: `desktop()` and `mobile()` (viewport width at or
//! below [`MOBILE_BREAKPOINT_PX`]). Narrow screens launch less often, burst
//! smaller and keep fewer particles alive.

/// Viewport widths at or below this use the mobile profile.
pub const MOBILE_BREAKPOINT_PX: f64 = 640.0;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FxConfig {
    /// Upper bound on live confetti + fragments.
    pub max_particles: usize,
    pub rocket_interval_ms: f64,
    pub burst_interval_ms: f64,
    pub heart_interval_ms: f64,
    /// Pieces per periodic confetti burst.
    pub burst_size: usize,
    /// Smallest burst handed out while the system is near the cap.
    pub min_burst: usize,
    pub intro_burst_size: usize,
    pub intro_burst_delay_ms: f64,
    pub intro_rockets: usize,
    pub intro_rocket_delay_ms: f64,
    /// Distance outside the viewport before a particle is dropped.
    pub bounds_margin: f64,
    /// Frames a rocket may fly before it is force-exploded. Slightly past the
    /// apex of the slowest launch, so a missed target still bursts on screen.
    pub rocket_max_age: u32,
    pub reduced_motion: bool,
}

impl FxConfig {
    pub fn desktop() -> Self {
        Self {
            max_particles: 1200,
            rocket_interval_ms: 900.0,
            burst_interval_ms: 1600.0,
            heart_interval_ms: 600.0,
            burst_size: 20,
            min_burst: 4,
            intro_burst_size: 160,
            intro_burst_delay_ms: 300.0,
            intro_rockets: 2,
            intro_rocket_delay_ms: 700.0,
            bounds_margin: 50.0,
            rocket_max_age: 70,
            reduced_motion: false,
        }
    }

    pub fn mobile() -> Self {
        Self {
            max_particles: 600,
            rocket_interval_ms: 1400.0,
            burst_interval_ms: 2400.0,
            heart_interval_ms: 1000.0,
            burst_size: 12,
            intro_burst_size: 90,
            ..Self::desktop()
        }
    }

    /// Pick the profile for a viewport width and the user's motion preference.
    pub fn for_viewport(width: f64, reduced_motion: bool) -> Self {
        let base = if width <= MOBILE_BREAKPOINT_PX {
            Self::mobile()
        } else {
            Self::desktop()
        };
        Self {
            reduced_motion,
            ..base
        }
    }
}

impl Default for FxConfig {
    fn default() -> Self {
        Self::desktop()
    }
}

/// Partial overrides supplied by the page as JSON; absent keys keep the
/// viewport profile's value.
#[cfg(feature = "serde")]
#[derive(Clone, Debug, Default, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FxOverrides {
    pub max_particles: Option<usize>,
    pub rocket_interval_ms: Option<f64>,
    pub burst_interval_ms: Option<f64>,
    pub heart_interval_ms: Option<f64>,
    pub burst_size: Option<usize>,
    pub min_burst: Option<usize>,
    pub intro_burst_size: Option<usize>,
    pub bounds_margin: Option<f64>,
    pub rocket_max_age: Option<u32>,
    pub reduced_motion: Option<bool>,
}

#[cfg(feature = "serde")]
impl FxOverrides {
    pub fn apply(self, mut base: FxConfig) -> FxConfig {
        if let Some(v) = self.max_particles {
            base.max_particles = v;
        }
        if let Some(v) = self.rocket_interval_ms {
            base.rocket_interval_ms = v;
        }
        if let Some(v) = self.burst_interval_ms {
            base.burst_interval_ms = v;
        }
        if let Some(v) = self.heart_interval_ms {
            base.heart_interval_ms = v;
        }
        if let Some(v) = self.burst_size {
            base.burst_size = v;
        }
        if let Some(v) = self.min_burst {
            base.min_burst = v;
        }
        if let Some(v) = self.intro_burst_size {
            base.intro_burst_size = v;
        }
        if let Some(v) = self.bounds_margin {
            base.bounds_margin = v;
        }
        if let Some(v) = self.rocket_max_age {
            base.rocket_max_age = v;
        }
        if let Some(v) = self.reduced_motion {
            base.reduced_motion = v;
        }
        base
    }
}

#[cfg(feature = "serde_json")]
impl FxOverrides {
    pub fn from_json(json: &str) -> crate::error::FxResult<Self> {
        let overrides: Self = serde_json::from_str(json)?;
        for interval in [
            overrides.rocket_interval_ms,
            overrides.burst_interval_ms,
            overrides.heart_interval_ms,
        ]
        .into_iter()
        .flatten()
        {
            if interval.is_nan() || interval <= 0.0 {
                return Err(crate::error::FxError::Config(format!(
                    "interval must be positive, got {interval}"
                )));
            }
        }
        if overrides.max_particles == Some(0) {
            return Err(crate::error::FxError::Config(
                "max_particles must be at least 1".into(),
            ));
        }
        Ok(overrides)
    }
}
