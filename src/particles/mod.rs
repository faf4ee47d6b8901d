//! Procedurally generated point clouds: starfield, nebula and asteroid belt.
//!
//! Generators fill flat [`ParticleBuffers`] (xyz positions, rgb colors,
//! per-point sizes) and attach them to a [`ParticleScene`]. The Bevy side
//! turns attached buffers into point-list meshes and re-uploads them when a
//! dirty flag is set.

pub mod asteroid_belt;
pub mod manager;
pub mod nebula;
pub mod plugin;
pub mod starfield;

use std::f32::consts::TAU;

use bevy::math::Vec3;
use rand::Rng;

use crate::diagnostics::{ErrorHandler, LogLevel};

pub use asteroid_belt::{AsteroidBelt, AsteroidBeltParams, BeltReferences, compute_belt_radii};
pub use manager::{ParticleManager, ParticleManagerConfig, ParticleStats, ParticleSystemStats};
pub use nebula::{Nebula, NebulaParams};
pub use starfield::{Starfield, StarfieldParams};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParticleError {
    #[error("particle system {0} generated no particles")]
    EmptySystem(String),

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("reference position {0} is missing")]
    MissingReferencePosition(&'static str),

    #[error("failed to attach {system}: {reason}")]
    Attach { system: String, reason: String },

    #[error("{} particle system(s) failed to initialize: {}", .failures.len(), .failures.join("; "))]
    ManagerInit { failures: Vec<String> },
}

/// Flat vertex buffers for one point cloud.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParticleBuffers {
    /// xyz triples.
    pub positions: Vec<f32>,
    /// rgb triples in `[0, 1]`.
    pub colors: Vec<f32>,
    pub sizes: Vec<f32>,
    pub positions_dirty: bool,
    pub colors_dirty: bool,
}

impl ParticleBuffers {
    pub fn with_capacity(count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(count * 3),
            colors: Vec::with_capacity(count * 3),
            sizes: Vec::with_capacity(count),
            positions_dirty: false,
            colors_dirty: false,
        }
    }

    pub fn push(&mut self, position: Vec3, color: [f32; 3], size: f32) {
        self.positions.extend_from_slice(&position.to_array());
        self.colors.extend_from_slice(&color);
        self.sizes.push(size);
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn position(&self, index: usize) -> Vec3 {
        let i = index * 3;
        Vec3::new(
            self.positions[i],
            self.positions[i + 1],
            self.positions[i + 2],
        )
    }

    pub fn set_position(&mut self, index: usize, position: Vec3) {
        let i = index * 3;
        self.positions[i..i + 3].copy_from_slice(&position.to_array());
    }

    pub fn position_array(&self) -> Vec<[f32; 3]> {
        self.positions
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect()
    }

    /// Colors as RGBA with a shared alpha.
    pub fn color_array(&self, alpha: f32) -> Vec<[f32; 4]> {
        self.colors
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2], alpha])
            .collect()
    }

    pub fn mark_clean(&mut self) {
        self.positions_dirty = false;
        self.colors_dirty = false;
    }
}

/// How a point cloud is drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct PointStyle {
    pub opacity: f32,
    /// Additive blending, used for glowing clouds.
    pub additive: bool,
}

impl Default for PointStyle {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            additive: false,
        }
    }
}

/// Scene that renders named point clouds.
pub trait ParticleScene {
    fn attach(
        &mut self,
        name: &str,
        buffers: &ParticleBuffers,
        style: &PointStyle,
    ) -> Result<(), ParticleError>;

    /// Remove a cloud by name. Returns false if nothing was attached.
    fn detach(&mut self, name: &str) -> bool;
}

/// A generator owning one point cloud.
pub trait ParticleSystem: Send + Sync {
    fn name(&self) -> &'static str;

    /// Generate buffers and attach them to the scene.
    ///
    /// Failures are reported to `errors` and leave the system unattached.
    fn init(
        &mut self,
        scene: &mut dyn ParticleScene,
        errors: &dyn ErrorHandler,
    ) -> Result<(), ParticleError>;

    /// Advance animation. Does nothing before a successful `init`.
    fn update(&mut self, dt: f32);

    fn set_visible(&mut self, visible: bool);

    fn is_visible(&self) -> bool;

    /// Returns false if the system has no adjustable opacity.
    fn set_opacity(&mut self, _opacity: f32) -> bool {
        false
    }

    /// Returns false if the system ignores performance mode.
    fn set_performance_mode(&mut self, _enabled: bool) -> bool {
        false
    }

    fn particle_count(&self) -> usize;

    fn is_attached(&self) -> bool;

    fn buffers(&self) -> &ParticleBuffers;

    fn buffers_mut(&mut self) -> &mut ParticleBuffers;

    fn style(&self) -> &PointStyle;

    /// Release generated buffers. Safe before `init` and when repeated.
    fn dispose(&mut self);
}

/// Buffers plus attachment and visibility state shared by every generator.
#[derive(Clone, Debug)]
pub struct PointCloud {
    pub buffers: ParticleBuffers,
    pub style: PointStyle,
    pub visible: bool,
    pub attached: bool,
}

impl PointCloud {
    pub fn new(style: PointStyle) -> Self {
        Self {
            buffers: ParticleBuffers::default(),
            style,
            visible: true,
            attached: false,
        }
    }

    /// Generate and attach buffers, reporting any failure to `errors`.
    pub fn attach_with(
        &mut self,
        name: &'static str,
        scene: &mut dyn ParticleScene,
        errors: &dyn ErrorHandler,
        generate: impl FnOnce() -> Result<ParticleBuffers, ParticleError>,
    ) -> Result<(), ParticleError> {
        if self.attached {
            return Ok(());
        }

        let result = generate().and_then(|buffers| {
            if buffers.is_empty() {
                return Err(ParticleError::EmptySystem(name.to_string()));
            }
            scene.attach(name, &buffers, &self.style)?;
            Ok(buffers)
        });

        match result {
            Ok(buffers) => {
                errors.log(
                    &format!("{name} initialized with {} particles", buffers.len()),
                    LogLevel::Info,
                );
                self.buffers = buffers;
                self.attached = true;
                Ok(())
            }
            Err(e) => {
                errors.handle_error(&e, &format!("{name}::init"));
                Err(e)
            }
        }
    }

    pub fn release(&mut self) {
        self.buffers = ParticleBuffers::default();
        self.attached = false;
    }
}

/// Reject non-finite or out-of-range parameters.
pub(crate) fn check_range(
    name: &'static str,
    value: f32,
    min: f32,
) -> Result<(), ParticleError> {
    if value.is_finite() && value >= min {
        Ok(())
    } else {
        Err(ParticleError::InvalidParameter {
            name,
            reason: format!("expected a finite value >= {min}, got {value}"),
        })
    }
}

/// Pick an index from `weights` with probability proportional to weight.
pub(crate) fn weighted_index(rng: &mut impl Rng, weights: &[f32]) -> usize {
    let total: f32 = weights.iter().sum();
    let mut roll = rng.gen_range(0.0..total);
    for (i, w) in weights.iter().enumerate() {
        if roll < *w {
            return i;
        }
        roll -= w;
    }
    weights.len() - 1
}

/// Uniformly distributed unit vector.
pub(crate) fn random_direction(rng: &mut impl Rng) -> Vec3 {
    let theta = rng.gen_range(0.0..TAU);
    let cos_phi: f32 = rng.gen_range(-1.0..=1.0);
    let sin_phi = (1.0 - cos_phi * cos_phi).sqrt();
    Vec3::new(sin_phi * theta.cos(), cos_phi, sin_phi * theta.sin())
}

/// Standard normal sample (Box-Muller).
pub(crate) fn gaussian(rng: &mut impl Rng) -> f32 {
    let u1: f32 = rng.gen_range(f32::EPSILON..1.0);
    let u2: f32 = rng.gen_range(0.0..1.0);
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}
