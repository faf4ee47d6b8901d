//! Background stars on a spherical shell with twinkling brightness.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{
    ParticleBuffers, ParticleError, ParticleScene, ParticleSystem, PointCloud, PointStyle,
    check_range, random_direction, weighted_index,
};
use crate::diagnostics::ErrorHandler;

/// Stellar classes with their draw weight and color.
const STAR_CLASSES: [(f32, [f32; 3]); 5] = [
    // blue giant
    (0.05, [0.61, 0.71, 1.0]),
    // white
    (0.15, [1.0, 1.0, 1.0]),
    // yellow
    (0.30, [1.0, 0.95, 0.76]),
    // orange
    (0.30, [1.0, 0.78, 0.55]),
    // red dwarf
    (0.20, [1.0, 0.58, 0.46]),
];

#[derive(Clone, Debug, PartialEq)]
pub struct StarfieldParams {
    pub count: usize,
    /// Mean shell radius.
    pub radius: f32,
    /// Maximum deviation from `radius`.
    pub radius_jitter: f32,
    pub size_min: f32,
    pub size_max: f32,
    /// Twinkle angular speed in radians per second.
    pub twinkle_speed: f32,
    pub opacity: f32,
    pub seed: u64,
}

impl Default for StarfieldParams {
    fn default() -> Self {
        Self {
            count: 10_000,
            radius: 2000.0,
            radius_jitter: 500.0,
            size_min: 0.5,
            size_max: 3.0,
            twinkle_speed: 1.5,
            opacity: 0.9,
            seed: 0x5eed_57a2,
        }
    }
}

pub struct Starfield {
    params: StarfieldParams,
    cloud: PointCloud,
    base_colors: Vec<f32>,
    phases: Vec<f32>,
    elapsed: f32,
}

impl Starfield {
    pub const NAME: &'static str = "starfield";

    pub fn new(params: StarfieldParams) -> Self {
        let style = PointStyle {
            opacity: params.opacity,
            additive: true,
        };
        Self {
            params,
            cloud: PointCloud::new(style),
            base_colors: Vec::new(),
            phases: Vec::new(),
            elapsed: 0.0,
        }
    }

    pub fn params(&self) -> &StarfieldParams {
        &self.params
    }

    /// Per-star twinkle phases in radians.
    pub fn phases(&self) -> &[f32] {
        &self.phases
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Generate star buffers and twinkle phases.
    pub fn generate(params: &StarfieldParams) -> Result<(ParticleBuffers, Vec<f32>), ParticleError> {
        check_range("radius", params.radius, 0.0)?;
        check_range("radius_jitter", params.radius_jitter, 0.0)?;
        check_range("size_min", params.size_min, 0.0)?;
        check_range("size_max", params.size_max, params.size_min)?;
        if params.count == 0 {
            return Err(ParticleError::EmptySystem(Self::NAME.to_string()));
        }

        let weights: Vec<f32> = STAR_CLASSES.iter().map(|(w, _)| *w).collect();
        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut buffers = ParticleBuffers::with_capacity(params.count);
        let mut phases = Vec::with_capacity(params.count);

        for _ in 0..params.count {
            let distance =
                params.radius + rng.gen_range(-params.radius_jitter..=params.radius_jitter);
            let position = random_direction(&mut rng) * distance;

            let (_, color) = STAR_CLASSES[weighted_index(&mut rng, &weights)];

            // Squared draw favours small stars.
            let r: f32 = rng.r#gen();
            let size = (params.size_min + (params.size_max - params.size_min) * r * r)
                .min(params.size_max);

            buffers.push(position, color, size);
            phases.push(rng.gen_range(0.0..std::f32::consts::TAU));
        }

        Ok((buffers, phases))
    }
}

impl ParticleSystem for Starfield {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn init(
        &mut self,
        scene: &mut dyn ParticleScene,
        errors: &dyn ErrorHandler,
    ) -> Result<(), ParticleError> {
        let mut phases = Vec::new();
        let params = &self.params;
        self.cloud.attach_with(Self::NAME, scene, errors, || {
            let (buffers, generated) = Self::generate(params)?;
            phases = generated;
            Ok(buffers)
        })?;
        if !phases.is_empty() {
            self.base_colors = self.cloud.buffers.colors.clone();
            self.phases = phases;
            self.elapsed = 0.0;
        }
        Ok(())
    }

    fn update(&mut self, dt: f32) {
        if !self.cloud.attached {
            return;
        }
        self.elapsed += dt;

        let t = self.elapsed * self.params.twinkle_speed;
        let colors = &mut self.cloud.buffers.colors;
        for (i, phase) in self.phases.iter().enumerate() {
            let brightness = 0.75 + 0.25 * (t + phase).sin();
            for c in 0..3 {
                let k = i * 3 + c;
                colors[k] = (self.base_colors[k] * brightness).clamp(0.0, 1.0);
            }
        }
        self.cloud.buffers.colors_dirty = true;
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
        self.base_colors = Vec::new();
        self.phases = Vec::new();
        self.elapsed = 0.0;
    }
}
