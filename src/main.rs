//! Orrery - Interactive Solar System
//!
//! A desktop application showing the planets on their orbits, with hover
//! tooltips, click-to-select, double-click camera follow and particle
//! backdrops.

use bevy::prelude::*;

use orrery::camera::CameraPlugin;
use orrery::interaction::plugin::InteractionPlugin;
use orrery::particles::plugin::ParticlePlugin;
use orrery::render::SolarSystemPlugin;
use orrery::time::TimePlugin;
use orrery::ui::UiPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Orrery".into(),
                ..default()
            }),
            ..default()
        }))
        // Bodies spawn in Startup; interaction and particles read them in PostStartup
        .add_plugins((TimePlugin, SolarSystemPlugin, CameraPlugin))
        .add_plugins((
            InteractionPlugin::default(),
            ParticlePlugin::default(),
            UiPlugin,
        ))
        .run();
}
