//! Rendering of the Sun, planets, orbit paths and lighting.

mod background;
pub mod bodies;
pub mod orbits;

use bevy::prelude::*;

use self::background::BackgroundPlugin;
use self::bodies::PlanetBodyPlugin;
use self::orbits::OrbitPathPlugin;

pub use self::bodies::{PlanetBody, planet_handle};
pub use self::orbits::OrbitPathSettings;

/// Plugin aggregating all rendering functionality.
pub struct SolarSystemPlugin;

impl Plugin for SolarSystemPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((PlanetBodyPlugin, BackgroundPlugin, OrbitPathPlugin));
    }
}
