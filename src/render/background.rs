//! Scene lighting. The star background itself is a particle system.

use bevy::prelude::*;

/// Plugin providing lighting.
pub struct BackgroundPlugin;

impl Plugin for BackgroundPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::srgb(0.0, 0.0, 0.02)))
            .add_systems(Startup, spawn_lighting);
    }
}

/// Sunlight from the origin plus a dim ambient fill.
fn spawn_lighting(mut commands: Commands) {
    commands.insert_resource(GlobalAmbientLight {
        color: Color::WHITE,
        brightness: 80.0,
        ..default()
    });

    commands.spawn((
        PointLight {
            intensity: 5.0e9,
            range: 5000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_translation(Vec3::ZERO),
    ));

    info!("Scene lighting initialized");
}
