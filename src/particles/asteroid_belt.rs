//! Asteroid belt between two reference orbits.
//!
//! Asteroids orbit the origin in the XZ plane with a small inclination;
//! angular speed falls off with radius so inner asteroids overtake outer
//! ones.

use bevy::math::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{
    ParticleBuffers, ParticleError, ParticleScene, ParticleSystem, PointCloud, PointStyle,
    check_range, weighted_index,
};
use crate::diagnostics::ErrorHandler;

/// Band used when no usable reference positions are given.
pub const DEFAULT_INNER_RADIUS: f32 = 232.0;
pub const DEFAULT_OUTER_RADIUS: f32 = 292.0;

/// Narrowest band the belt may occupy.
pub const MIN_BELT_WIDTH: f32 = 15.0;

/// Smallest orbit radius an asteroid may have.
pub const MIN_ORBIT_RADIUS: f32 = 1.0;

/// Fraction of the gap between the reference orbits left empty on each side.
const GAP_MARGIN: f32 = 0.3;

/// Composition classes with draw weight and base color.
const ASTEROID_CLASSES: [(f32, [f32; 3]); 3] = [
    // rocky
    (0.60, [0.55, 0.47, 0.38]),
    // metallic
    (0.25, [0.62, 0.62, 0.65]),
    // carbonaceous
    (0.15, [0.30, 0.28, 0.26]),
];

/// Positions of the bodies bounding the belt, usually Mars and Jupiter.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BeltReferences {
    pub inner: Option<Vec3>,
    pub outer: Option<Vec3>,
}

/// Inner and outer radius of the belt.
///
/// `None` and non-finite positions fall back to the default band. A
/// reference with a missing position is an error.
pub fn compute_belt_radii(references: Option<&BeltReferences>) -> Result<(f32, f32), ParticleError> {
    const DEFAULT: (f32, f32) = (DEFAULT_INNER_RADIUS, DEFAULT_OUTER_RADIUS);

    let Some(references) = references else {
        return Ok(DEFAULT);
    };
    let inner = references
        .inner
        .ok_or(ParticleError::MissingReferencePosition("inner"))?;
    let outer = references
        .outer
        .ok_or(ParticleError::MissingReferencePosition("outer"))?;

    let (a, b) = (inner.length(), outer.length());
    if !a.is_finite() || !b.is_finite() {
        return Ok(DEFAULT);
    }

    let (low, high) = if a <= b { (a, b) } else { (b, a) };
    let gap = high - low;
    let inner_radius = low + gap * GAP_MARGIN;
    let mut outer_radius = high - gap * GAP_MARGIN;

    if outer_radius - inner_radius < MIN_BELT_WIDTH {
        outer_radius = inner_radius + MIN_BELT_WIDTH;
        while outer_radius - inner_radius < MIN_BELT_WIDTH {
            outer_radius = outer_radius.next_up();
        }
    }
    Ok((inner_radius, outer_radius))
}

#[derive(Clone, Debug, PartialEq)]
pub struct AsteroidBeltParams {
    pub count: usize,
    pub references: Option<BeltReferences>,
    /// Maximum orbital inclination in radians.
    pub max_inclination: f32,
    pub size_min: f32,
    pub size_max: f32,
    /// Orbital speed numerator: angular speed is `orbit_speed / radius`.
    pub orbit_speed: f32,
    /// Maximum per-asteroid brightness deviation.
    pub brightness_variance: f32,
    pub opacity: f32,
    pub seed: u64,
}

impl Default for AsteroidBeltParams {
    fn default() -> Self {
        Self {
            count: 3000,
            references: None,
            max_inclination: 0.05,
            size_min: 0.2,
            size_max: 1.2,
            orbit_speed: 4.0,
            brightness_variance: 0.15,
            opacity: 0.9,
            seed: 0xa57e_401d,
        }
    }
}

/// Orbital elements of one asteroid.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Orbit {
    radius: f32,
    angle: f32,
    /// Height above the ecliptic as a fraction of the radius.
    lift: f32,
}

impl Orbit {
    fn position(&self) -> Vec3 {
        Vec3::new(
            self.radius * self.angle.cos(),
            self.radius * self.lift,
            self.radius * self.angle.sin(),
        )
    }
}

pub struct AsteroidBelt {
    params: AsteroidBeltParams,
    cloud: PointCloud,
    orbits: Vec<Orbit>,
    radii: Option<(f32, f32)>,
}

impl AsteroidBelt {
    pub const NAME: &'static str = "asteroid_belt";

    pub fn new(params: AsteroidBeltParams) -> Self {
        let style = PointStyle {
            opacity: params.opacity,
            additive: false,
        };
        Self {
            params,
            cloud: PointCloud::new(style),
            orbits: Vec::new(),
            radii: None,
        }
    }

    pub fn params(&self) -> &AsteroidBeltParams {
        &self.params
    }

    /// Belt band after a successful `init`.
    pub fn radii(&self) -> Option<(f32, f32)> {
        self.radii
    }

    /// Orbital angle of each asteroid in radians.
    pub fn angles(&self) -> Vec<f32> {
        self.orbits.iter().map(|o| o.angle).collect()
    }

    fn generate(
        params: &AsteroidBeltParams,
    ) -> Result<(ParticleBuffers, Vec<Orbit>, (f32, f32)), ParticleError> {
        check_range("max_inclination", params.max_inclination, 0.0)?;
        check_range("size_min", params.size_min, 0.0)?;
        check_range("size_max", params.size_max, params.size_min)?;
        check_range("orbit_speed", params.orbit_speed, 0.0)?;
        check_range("brightness_variance", params.brightness_variance, 0.0)?;
        if params.count == 0 {
            return Err(ParticleError::EmptySystem(Self::NAME.to_string()));
        }

        let (inner, outer) = compute_belt_radii(params.references.as_ref())?;
        let weights: Vec<f32> = ASTEROID_CLASSES.iter().map(|(w, _)| *w).collect();
        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut buffers = ParticleBuffers::with_capacity(params.count);
        let mut orbits = Vec::with_capacity(params.count);

        for _ in 0..params.count {
            let inclination = rng.gen_range(-params.max_inclination..=params.max_inclination);
            let orbit = Orbit {
                radius: rng.gen_range(inner..=outer).max(MIN_ORBIT_RADIUS),
                angle: rng.gen_range(0.0..std::f32::consts::TAU),
                lift: inclination.sin(),
            };

            let (_, base) = ASTEROID_CLASSES[weighted_index(&mut rng, &weights)];
            let v = params.brightness_variance;
            let brightness = 1.0 + rng.gen_range(-v..=v);
            let color = base.map(|c| (c * brightness).clamp(0.0, 1.0));
            let size = rng.gen_range(params.size_min..=params.size_max);

            buffers.push(orbit.position(), color, size);
            orbits.push(orbit);
        }

        Ok((buffers, orbits, (inner, outer)))
    }
}

impl ParticleSystem for AsteroidBelt {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn init(
        &mut self,
        scene: &mut dyn ParticleScene,
        errors: &dyn ErrorHandler,
    ) -> Result<(), ParticleError> {
        let mut generated = None;
        let params = &self.params;
        self.cloud.attach_with(Self::NAME, scene, errors, || {
            let (buffers, orbits, radii) = Self::generate(params)?;
            generated = Some((orbits, radii));
            Ok(buffers)
        })?;
        if let Some((orbits, radii)) = generated {
            self.orbits = orbits;
            self.radii = Some(radii);
        }
        Ok(())
    }

    fn update(&mut self, dt: f32) {
        if !self.cloud.attached {
            return;
        }
        let buffers = &mut self.cloud.buffers;
        for (i, orbit) in self.orbits.iter_mut().enumerate() {
            orbit.angle = (orbit.angle + self.params.orbit_speed * dt / orbit.radius)
                .rem_euclid(std::f32::consts::TAU);
            buffers.set_position(i, orbit.position());
        }
        buffers.positions_dirty = true;
    }

    fn set_visible(&mut self, visible: bool) {
        self.cloud.visible = visible;
    }

    fn is_visible(&self) -> bool {
        self.cloud.visible
    }

    fn particle_count(&self) -> usize {
        self.cloud.buffers.len()
    }

    fn is_attached(&self) -> bool {
        self.cloud.attached
    }

    fn buffers(&self) -> &ParticleBuffers {
        &self.cloud.buffers
    }

    fn buffers_mut(&mut self) -> &mut ParticleBuffers {
        &mut self.cloud.buffers
    }

    fn style(&self) -> &PointStyle {
        &self.cloud.style
    }

    fn dispose(&mut self) {
        self.cloud.release();
        self.orbits = Vec::new();
        self.radii = None;
    }
}
