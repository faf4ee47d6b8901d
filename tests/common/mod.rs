//! Common test utilities for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use bevy::prelude::*;
use orrery::camera::OrbitCameraController;
use orrery::catalog::PlanetCatalog;
use orrery::diagnostics::{ErrorHandler, LogLevel};
use orrery::interaction::collaborators::InfoPanel;
use orrery::interaction::picking::{PickMesh, ProjectionCamera};
use orrery::interaction::plugin::{BevyScene, BevySurface};
use orrery::interaction::{InteractionConfig, InteractionManager};
use orrery::particles::{ParticleBuffers, ParticleError, ParticleScene, PointStyle};
use orrery::time::ManualClock;
use orrery::types::{PlanetData, PlanetHandle};
use orrery::ui::{SharedControlPanel, SharedInfoPanel};

/// Manager over the Bevy scene and surface with a fixed projection.
pub type Manager = InteractionManager<BevyScene, ProjectionCamera, BevySurface>;

pub const SURFACE: Vec2 = Vec2::new(800.0, 600.0);

pub const EARTH: PlanetHandle = PlanetHandle(1);
pub const MARS: PlanetHandle = PlanetHandle(2);

// The orthographic camera maps the 800x600 surface onto x in [-40, 40] and
// y in [-30, 30]; Earth sits at the origin and Mars at x = 20.
pub const EARTH_PX: Vec2 = Vec2::new(400.0, 300.0);
pub const MARS_PX: Vec2 = Vec2::new(600.0, 300.0);
pub const EMPTY_PX: Vec2 = Vec2::new(100.0, 100.0);

/// Orthographic camera at z = 100 looking down -Z, reverse-Z like Bevy.
pub fn ortho_camera() -> ProjectionCamera {
    ProjectionCamera::new(
        Mat4::from_translation(Vec3::new(0.0, 0.0, 100.0)),
        Mat4::orthographic_rh(-40.0, 40.0, -30.0, 30.0, 1000.0, 0.1),
    )
}

pub fn planet(name: &str) -> PlanetData {
    PlanetCatalog::solar_system()
        .get(name)
        .cloned()
        .unwrap_or_else(|| PlanetData::named(name))
}

/// Error handler keeping `<level>:<message>` and `error:<context>` lines.
#[derive(Clone, Default)]
pub struct LogCapture {
    pub lines: Arc<Mutex<Vec<String>>>,
}

impl LogCapture {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|l| l.starts_with("error:"))
            .collect()
    }
}

impl ErrorHandler for LogCapture {
    fn log(&self, message: &str, level: LogLevel) {
        self.lines
            .lock()
            .unwrap()
            .push(format!("{level:?}:{message}"));
    }

    fn handle_error(&self, _error: &dyn std::error::Error, context: &str) {
        self.lines.lock().unwrap().push(format!("error:{context}"));
    }
}

/// A manager wired to the real UI models and camera controller.
pub struct Desk {
    pub manager: Manager,
    pub clock: ManualClock,
    pub camera: OrbitCameraController,
    pub control: SharedControlPanel,
    pub info: SharedInfoPanel,
    pub log: LogCapture,
}

pub fn desk_with(config: InteractionConfig) -> Desk {
    let mut scene = BevyScene::default();
    scene.upsert(EARTH, PickMesh::planet(Vec3::ZERO, 2.0), LinearRgba::BLACK);
    scene.upsert(
        MARS,
        PickMesh::planet(Vec3::new(20.0, 0.0, 0.0), 2.0),
        LinearRgba::BLACK,
    );

    let mut surface = BevySurface::default();
    surface.size = SURFACE;

    let clock = ManualClock::new(50_000.0);
    let camera = OrbitCameraController::default();
    let control = SharedControlPanel::default();
    let info = SharedInfoPanel::default();
    let log = LogCapture::default();

    let factory_panel = info.clone();
    let mut manager = Manager::builder()
        .scene(scene)
        .camera(ortho_camera())
        .surface(surface)
        .config(config)
        .planets([(EARTH, planet("Earth")), (MARS, planet("Mars"))])
        .camera_controller(camera.clone())
        .control_panel(control.clone())
        .info_panel_factory(move || Box::new(factory_panel) as Box<dyn InfoPanel>)
        .error_handler(log.clone())
        .clock(clock.clone())
        .build()
        .expect("all required handles supplied");
    manager.init().expect("init succeeds");

    Desk {
        manager,
        clock,
        camera,
        control,
        info,
        log,
    }
}

pub fn desk() -> Desk {
    desk_with(InteractionConfig::default())
}

/// Particle scene recording attached clouds and their sizes.
#[derive(Default)]
pub struct RecordingParticleScene {
    pub clouds: Vec<(String, usize)>,
    pub detached: Vec<String>,
    pub reject: Option<&'static str>,
}

impl ParticleScene for RecordingParticleScene {
    fn attach(
        &mut self,
        name: &str,
        buffers: &ParticleBuffers,
        _style: &PointStyle,
    ) -> Result<(), ParticleError> {
        if self.reject == Some(name) {
            return Err(ParticleError::Attach {
                system: name.to_string(),
                reason: "scene is full".into(),
            });
        }
        self.clouds.push((name.to_string(), buffers.len()));
        Ok(())
    }

    fn detach(&mut self, name: &str) -> bool {
        let before = self.clouds.len();
        self.clouds.retain(|(n, _)| n != name);
        self.detached.push(name.to_string());
        self.clouds.len() != before
    }
}
