//! Clocks for input timing and the animation time resource.
//!
//! Interaction logic reads wall-clock milliseconds through the [`Clock`]
//! trait so double-click and focus debouncing can be driven by a manual
//! clock in tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use bevy::prelude::*;

/// Source of monotonic timestamps in milliseconds.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> f64;
}

/// Monotonic clock measured from its creation.
#[derive(Clone, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Clock advanced by hand. Clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    bits: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        let clock = Self::default();
        clock.set(start_ms);
        clock
    }

    pub fn set(&self, ms: f64) {
        self.bits.store(ms.to_bits(), Ordering::SeqCst);
    }

    pub fn advance(&self, ms: f64) {
        self.set(self.now_ms() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::SeqCst))
    }
}

/// Animation time driving orbital motion.
#[derive(Resource, Clone, Debug)]
pub struct OrbitTime {
    /// Elapsed animation time in seconds.
    pub elapsed: f64,
    /// Seconds of animation per real second.
    pub scale: f64,
    /// Whether orbital motion is frozen.
    pub paused: bool,
}

impl Default for OrbitTime {
    fn default() -> Self {
        Self {
            elapsed: 0.0,
            scale: 1.0,
            paused: false,
        }
    }
}

impl OrbitTime {
    /// Scaled delta for a real-time step (zero while paused).
    pub fn step(&mut self, real_delta_secs: f64) -> f64 {
        if self.paused {
            return 0.0;
        }
        let dt = real_delta_secs * self.scale;
        self.elapsed += dt;
        dt
    }
}

/// Plugin providing animation time advancement.
pub struct TimePlugin;

impl Plugin for TimePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OrbitTime>()
            .add_systems(Update, advance_time);
    }
}

fn advance_time(mut orbit_time: ResMut<OrbitTime>, time: Res<Time>) {
    orbit_time.step(time.delta_secs_f64());
}
