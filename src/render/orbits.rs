//! Orbit path rendering using Bevy Gizmos.

use std::f32::consts::TAU;

use bevy::prelude::*;

use super::bodies::PlanetBody;

/// Plugin providing orbit path visualization.
pub struct OrbitPathPlugin;

impl Plugin for OrbitPathPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OrbitPathSettings>()
            .add_systems(Update, draw_orbit_paths);
    }
}

/// Settings for orbit path rendering.
#[derive(Resource)]
pub struct OrbitPathSettings {
    pub visible: bool,
    /// Segments per full circle.
    pub segments: u32,
    pub alpha: f32,
    /// Dash pattern: draw N segments, then skip M segments, repeating.
    ///
    /// Set to (1, 0) for a solid line.
    pub dash_on: u32,
    pub dash_off: u32,
}

impl Default for OrbitPathSettings {
    fn default() -> Self {
        Self {
            visible: true,
            segments: 256,
            alpha: 0.25,
            dash_on: 2,
            dash_off: 3,
        }
    }
}

/// Segment endpoints of a dashed circle in the XZ plane.
pub fn dashed_circle(radius: f32, segments: u32, dash_on: u32, dash_off: u32) -> Vec<(Vec3, Vec3)> {
    let period = (dash_on + dash_off).max(1);
    let point = |i: u32| {
        let angle = i as f32 / segments as f32 * TAU;
        Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin())
    };
    (0..segments)
        .filter(|i| i % period < dash_on.max(1))
        .map(|i| (point(i), point(i + 1)))
        .collect()
}

fn draw_orbit_paths(
    mut gizmos: Gizmos,
    settings: Res<OrbitPathSettings>,
    bodies: Query<&PlanetBody>,
) {
    if !settings.visible {
        return;
    }

    let segments = settings.segments.max(64);
    let color = Color::srgba(0.6, 0.7, 0.9, settings.alpha);

    for body in &bodies {
        if body.orbit_radius <= 0.0 {
            continue;
        }
        for (a, b) in dashed_circle(body.orbit_radius, segments, settings.dash_on, settings.dash_off) {
            gizmos.line(a, b, color);
        }
    }
}
