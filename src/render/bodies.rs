//! Sun and planet spheres spawned from the catalog.
//!
//! Planets sit on circular orbits in the XZ plane and advance with
//! [`OrbitTime`]. Each sphere owns its material so hover and selection
//! highlights can change its emissive color independently.

use std::f32::consts::TAU;

use bevy::prelude::*;

use crate::catalog::{PlanetCatalog, SUN};
use crate::time::OrbitTime;
use crate::types::{PlanetData, PlanetHandle};

/// Render units per AU.
pub const DISTANCE_SCALE: f64 = 40.0;

/// Kilometers of radius per render unit.
pub const SIZE_SCALE: f64 = 4000.0;

/// Smallest rendered planet radius, so dwarf planets stay pickable.
pub const MIN_PLANET_RADIUS: f32 = 0.5;

/// Rendered radius of the Sun.
pub const SUN_RADIUS: f32 = 8.0;

/// Simulated days per second of animation time.
pub const DAYS_PER_SECOND: f64 = 10.0;

/// Handle the interaction layer uses for a planet entity.
pub fn planet_handle(entity: Entity) -> PlanetHandle {
    PlanetHandle(entity.to_bits())
}

/// Component marking a pickable sphere in the scene.
#[derive(Component, Clone, Debug)]
pub struct PlanetBody {
    /// Catalog name.
    pub name: String,
    /// Rendered sphere radius.
    pub radius: f32,
    /// Orbit radius in render units; zero for the Sun.
    pub orbit_radius: f32,
    /// Orbital period in days; non-positive means stationary.
    pub orbital_period: f64,
    /// Angle at animation time zero.
    pub phase: f32,
}

impl PlanetBody {
    pub fn from_data(planet: &PlanetData) -> Self {
        if planet.name == SUN {
            return Self {
                name: planet.name.clone(),
                radius: SUN_RADIUS,
                orbit_radius: 0.0,
                orbital_period: 0.0,
                phase: 0.0,
            };
        }
        Self {
            name: planet.name.clone(),
            radius: (planet.scaled_size(SIZE_SCALE) as f32).max(MIN_PLANET_RADIUS),
            orbit_radius: planet.scaled_distance(DISTANCE_SCALE) as f32,
            orbital_period: planet.orbital_period,
            // Spread the starting angles so planets don't line up.
            phase: (planet.display_order as f32 * 2.4).rem_euclid(TAU),
        }
    }

    /// Position after `elapsed` seconds of animation time.
    pub fn position_at(&self, elapsed: f64) -> Vec3 {
        orbit_position(self.orbit_radius, self.orbital_period, self.phase, elapsed)
    }
}

/// Point on a circular orbit in the XZ plane.
pub fn orbit_position(orbit_radius: f32, period_days: f64, phase: f32, elapsed: f64) -> Vec3 {
    if orbit_radius <= 0.0 {
        return Vec3::ZERO;
    }
    let turns = if period_days > 0.0 && period_days.is_finite() {
        (elapsed * DAYS_PER_SECOND / period_days).fract() as f32
    } else {
        0.0
    };
    let angle = phase + turns * TAU;
    Vec3::new(orbit_radius * angle.cos(), 0.0, orbit_radius * angle.sin())
}

/// Plugin spawning the catalog bodies and moving them along their orbits.
pub struct PlanetBodyPlugin;

impl Plugin for PlanetBodyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlanetCatalog>()
            .add_systems(Startup, spawn_solar_system)
            .add_systems(Update, advance_orbits);
    }
}

/// Spawn one sphere per catalog entry.
fn spawn_solar_system(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    catalog: Res<PlanetCatalog>,
    orbit_time: Res<OrbitTime>,
) {
    for planet in catalog.ordered() {
        let body = PlanetBody::from_data(planet);
        let [r, g, b] = planet.color_srgb();
        let color = Color::srgb(r, g, b);

        // The Sun glows; planets are lit by it.
        let material = materials.add(StandardMaterial {
            base_color: color,
            emissive: if planet.name == SUN {
                color.to_linear() * 4.0
            } else {
                LinearRgba::BLACK
            },
            perceptual_roughness: 0.9,
            ..default()
        });

        commands.spawn((
            Mesh3d(meshes.add(Sphere::new(body.radius).mesh().uv(32, 18))),
            MeshMaterial3d(material),
            Transform::from_translation(body.position_at(orbit_time.elapsed)),
            body,
            Name::new(planet.name.clone()),
        ));
    }

    info!("Spawned {} celestial bodies", catalog.len());
}

fn advance_orbits(orbit_time: Res<OrbitTime>, mut bodies: Query<(&PlanetBody, &mut Transform)>) {
    for (body, mut transform) in &mut bodies {
        transform.translation = body.position_at(orbit_time.elapsed);
    }
}
