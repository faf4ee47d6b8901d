//! Drifting gas clouds clustered around a few fixed centers.

use bevy::math::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{
    ParticleBuffers, ParticleError, ParticleScene, ParticleSystem, PointCloud, PointStyle,
    check_range, gaussian, random_direction,
};
use crate::diagnostics::ErrorHandler;

/// Opacity multiplier applied in performance mode.
pub const PERFORMANCE_OPACITY_SCALE: f32 = 0.5;

#[derive(Clone, Debug, PartialEq)]
pub struct NebulaParams {
    pub count: usize,
    pub cluster_centers: Vec<Vec3>,
    /// Standard deviation of the jitter around a center.
    pub cluster_spread: f32,
    pub palette: Vec<[f32; 3]>,
    /// Maximum per-channel color deviation from the palette entry.
    pub color_variance: f32,
    pub size_min: f32,
    pub size_max: f32,
    /// Maximum drift speed in units per second.
    pub drift_speed: f32,
    pub opacity: f32,
    pub seed: u64,
}

impl Default for NebulaParams {
    fn default() -> Self {
        Self {
            count: 2000,
            cluster_centers: vec![
                Vec3::new(-800.0, 200.0, -1200.0),
                Vec3::new(900.0, -300.0, -1000.0),
                Vec3::new(200.0, 500.0, 1400.0),
                Vec3::new(-1100.0, -400.0, 700.0),
            ],
            cluster_spread: 220.0,
            palette: vec![
                [0.55, 0.25, 0.85],
                [0.25, 0.45, 0.95],
                [0.90, 0.35, 0.55],
                [0.30, 0.75, 0.80],
            ],
            color_variance: 0.1,
            size_min: 8.0,
            size_max: 24.0,
            drift_speed: 2.0,
            opacity: 0.35,
            seed: 0x0e_b01a,
        }
    }
}

pub struct Nebula {
    params: NebulaParams,
    cloud: PointCloud,
    velocities: Vec<Vec3>,
    clusters: Vec<usize>,
    base_opacity: f32,
    performance_mode: bool,
}

impl Nebula {
    pub const NAME: &'static str = "nebula";

    pub fn new(params: NebulaParams) -> Self {
        let base_opacity = params.opacity.clamp(0.0, 1.0);
        let style = PointStyle {
            opacity: base_opacity,
            additive: true,
        };
        Self {
            params,
            cloud: PointCloud::new(style),
            velocities: Vec::new(),
            clusters: Vec::new(),
            base_opacity,
            performance_mode: false,
        }
    }

    pub fn params(&self) -> &NebulaParams {
        &self.params
    }

    /// Opacity currently applied, including the performance reduction.
    pub fn opacity(&self) -> f32 {
        self.cloud.style.opacity
    }

    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    /// Drift stays within this distance of the cluster center.
    fn max_drift(&self) -> f32 {
        self.params.cluster_spread * 3.0
    }

    fn apply_opacity(&mut self) {
        let scale = if self.performance_mode {
            PERFORMANCE_OPACITY_SCALE
        } else {
            1.0
        };
        self.cloud.style.opacity = self.base_opacity * scale;
    }

    /// Generate buffers, drift velocities and cluster assignments.
    pub fn generate(
        params: &NebulaParams,
    ) -> Result<(ParticleBuffers, Vec<Vec3>, Vec<usize>), ParticleError> {
        check_range("cluster_spread", params.cluster_spread, 0.0)?;
        check_range("color_variance", params.color_variance, 0.0)?;
        check_range("size_min", params.size_min, 0.0)?;
        check_range("size_max", params.size_max, params.size_min)?;
        check_range("drift_speed", params.drift_speed, 0.0)?;
        if params.cluster_centers.is_empty() {
            return Err(ParticleError::InvalidParameter {
                name: "cluster_centers",
                reason: "at least one cluster center is required".into(),
            });
        }
        if params.palette.is_empty() {
            return Err(ParticleError::InvalidParameter {
                name: "palette",
                reason: "at least one color is required".into(),
            });
        }
        if params.count == 0 {
            return Err(ParticleError::EmptySystem(Self::NAME.to_string()));
        }

        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut buffers = ParticleBuffers::with_capacity(params.count);
        let mut velocities = Vec::with_capacity(params.count);
        let mut clusters = Vec::with_capacity(params.count);

        for _ in 0..params.count {
            let cluster = rng.gen_range(0..params.cluster_centers.len());
            let jitter = Vec3::new(gaussian(&mut rng), gaussian(&mut rng), gaussian(&mut rng));
            let position = params.cluster_centers[cluster] + jitter * params.cluster_spread;

            let base = params.palette[rng.gen_range(0..params.palette.len())];
            let v = params.color_variance;
            let color = base.map(|c| (c + rng.gen_range(-v..=v)).clamp(0.0, 1.0));

            let size = rng.gen_range(params.size_min..=params.size_max);
            let velocity =
                random_direction(&mut rng) * rng.gen_range(0.0..=params.drift_speed);

            buffers.push(position, color, size);
            velocities.push(velocity);
            clusters.push(cluster);
        }

        Ok((buffers, velocities, clusters))
    }
}

impl ParticleSystem for Nebula {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn init(
        &mut self,
        scene: &mut dyn ParticleScene,
        errors: &dyn ErrorHandler,
    ) -> Result<(), ParticleError> {
        let mut motion = None;
        let params = &self.params;
        self.cloud.attach_with(Self::NAME, scene, errors, || {
            let (buffers, velocities, clusters) = Self::generate(params)?;
            motion = Some((velocities, clusters));
            Ok(buffers)
        })?;
        if let Some((velocities, clusters)) = motion {
            self.velocities = velocities;
            self.clusters = clusters;
        }
        Ok(())
    }

    fn update(&mut self, dt: f32) {
        if !self.cloud.attached {
            return;
        }
        let max_drift = self.max_drift();
        let buffers = &mut self.cloud.buffers;
        for (i, velocity) in self.velocities.iter_mut().enumerate() {
            let center = self.params.cluster_centers[self.clusters[i]];
            let position = buffers.position(i) + *velocity * dt;
            // Outside the drift radius, only outward motion is reversed.
            let offset = position - center;
            if offset.length() > max_drift && velocity.dot(offset) > 0.0 {
                *velocity = -*velocity;
            }
            buffers.set_position(i, position);
        }
        buffers.positions_dirty = true;
    }

    fn set_visible(&mut self, visible: bool) {
        self.cloud.visible = visible;
    }

    fn is_visible(&self) -> bool {
        self.cloud.visible
    }

    fn set_opacity(&mut self, opacity: f32) -> bool {
        if !opacity.is_finite() {
            return false;
        }
        self.base_opacity = opacity.clamp(0.0, 1.0);
        self.apply_opacity();
        true
    }

    fn set_performance_mode(&mut self, enabled: bool) -> bool {
        self.performance_mode = enabled;
        self.apply_opacity();
        true
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
        self.velocities = Vec::new();
        self.clusters = Vec::new();
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::test_utils::{FakeParticleScene, RecordingErrorHandler};

    fn small() -> NebulaParams {
        NebulaParams {
            count: 400,
            ..Default::default()
        }
    }

    fn attached(params: NebulaParams) -> Nebula {
        let mut nebula = Nebula::new(params);
        nebula
            .init(
                &mut FakeParticleScene::default(),
                &RecordingErrorHandler::default(),
            )
            .unwrap();
        nebula
    }

    #[test]
    fn test_particles_cluster_around_centers() {
        let params = small();
        let (buffers, _, clusters) = Nebula::generate(&params).unwrap();
        assert_eq!(buffers.len(), 400);

        let mean_offset: f32 = (0..buffers.len())
            .map(|i| buffers.position(i).distance(params.cluster_centers[clusters[i]]))
            .sum::<f32>()
            / buffers.len() as f32;
        // Mean of a 3D normal's norm is about 1.6 sigma.
        assert!(mean_offset < params.cluster_spread * 2.5);
        assert!(buffers.colors.iter().all(|c| (0.0..=1.0).contains(c)));
    }

    #[test]
    fn test_empty_palette_rejected() {
        let params = NebulaParams {
            palette: Vec::new(),
            ..small()
        };
        assert!(matches!(
            Nebula::generate(&params),
            Err(ParticleError::InvalidParameter { name: "palette", .. })
        ));
    }

    #[test]
    fn test_update_moves_particles() {
        let mut nebula = attached(small());
        let before = nebula.buffers().positions.clone();
        nebula.update(1.0);
        assert_ne!(before, nebula.buffers().positions);
        assert!(nebula.buffers().positions_dirty);
    }

    fn lone_particle(position: Vec3, velocity: Vec3) -> Nebula {
        let mut nebula = attached(NebulaParams {
            count: 1,
            cluster_centers: vec![Vec3::ZERO],
            cluster_spread: 1.0,
            drift_speed: 1.0,
            ..Default::default()
        });
        nebula.buffers_mut().set_position(0, position);
        nebula.velocities[0] = velocity;
        nebula
    }

    #[test]
    fn test_drift_reverses_far_from_cluster() {
        let mut nebula = lone_particle(Vec3::new(10.0, 0.0, 0.0), Vec3::X);
        nebula.update(0.1);
        assert_eq!(nebula.velocities()[0], Vec3::NEG_X);
    }

    #[test]
    fn test_stray_particle_drifts_back_to_its_cluster() {
        let mut nebula = lone_particle(Vec3::new(10.0, 0.0, 0.0), Vec3::X);
        nebula.update(1.0);

        let mut distance = nebula.buffers().position(0).length();
        for _ in 0..5 {
            nebula.update(1.0);
            let next = nebula.buffers().position(0).length();
            assert!(next < distance, "{next} did not move inward from {distance}");
            distance = next;
        }
        assert_relative_eq!(distance, 6.0, epsilon = 1e-4);
        assert_eq!(nebula.velocities()[0], Vec3::NEG_X);
    }

    #[test]
    fn test_inward_drift_outside_the_limit_is_kept() {
        let mut nebula = lone_particle(Vec3::new(0.0, 8.0, 0.0), Vec3::NEG_Y);
        nebula.update(1.0);
        assert_eq!(nebula.velocities()[0], Vec3::NEG_Y);
        assert_relative_eq!(nebula.buffers().position(0).y, 7.0, epsilon = 1e-5);
    }

    #[test]
    fn test_opacity_and_performance_mode() {
        let mut nebula = attached(small());
        assert!(nebula.set_opacity(0.8));
        assert_relative_eq!(nebula.opacity(), 0.8);

        assert!(nebula.set_performance_mode(true));
        assert_relative_eq!(nebula.opacity(), 0.4);

        assert!(nebula.set_opacity(2.0));
        assert_relative_eq!(nebula.opacity(), 0.5);

        nebula.set_performance_mode(false);
        assert_relative_eq!(nebula.opacity(), 1.0);
        assert!(!nebula.set_opacity(f32::NAN));
    }
}
