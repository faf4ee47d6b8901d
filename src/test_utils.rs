//! Test doubles for the interaction and particle collaborators.
//!
//! Fakes that end up owned by the code under test record into shared
//! `Arc<Mutex<..>>` logs so the test keeps a handle for assertions.

use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

use bevy::color::LinearRgba;
use bevy::math::{Vec2, Vec3};

use crate::diagnostics::{ErrorHandler, LogLevel};
use crate::interaction::collaborators::{
    CameraController, CollaboratorError, ControlPanel, CursorStyle, InfoPanel, PointerSurface,
    SceneView,
};
use crate::interaction::input::{InputEventKind, ListenerId, ListenerTarget};
use crate::interaction::picking::{CameraView, PickMesh, PickRay, SurfaceRect};
use crate::particles::{ParticleBuffers, ParticleError, ParticleScene, PointStyle};
use crate::types::{PlanetData, PlanetHandle};

/// Shared, ordered record of calls.
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn calls(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Scene holding one bounding sphere per planet.
#[derive(Default)]
pub struct FakeScene {
    meshes: HashMap<PlanetHandle, Vec<PickMesh>>,
    emissive: HashMap<PlanetHandle, LinearRgba>,
    writes: Vec<(PlanetHandle, LinearRgba)>,
}

impl FakeScene {
    pub fn add_planet(
        &mut self,
        handle: PlanetHandle,
        center: Vec3,
        radius: f32,
        emissive: LinearRgba,
    ) {
        self.meshes
            .insert(handle, vec![PickMesh::planet(center, radius)]);
        self.emissive.insert(handle, emissive);
    }

    pub fn remove_planet(&mut self, handle: PlanetHandle) {
        self.meshes.remove(&handle);
        self.emissive.remove(&handle);
    }

    pub fn emissive_of(&self, handle: PlanetHandle) -> Option<LinearRgba> {
        self.emissive.get(&handle).copied()
    }

    pub fn writes_for(&self, handle: PlanetHandle) -> usize {
        self.writes.iter().filter(|(h, _)| *h == handle).count()
    }

    pub fn writes(&self) -> &[(PlanetHandle, LinearRgba)] {
        &self.writes
    }
}

impl SceneView for FakeScene {
    fn planet_meshes(&self, handle: PlanetHandle) -> Vec<PickMesh> {
        self.meshes.get(&handle).cloned().unwrap_or_default()
    }

    fn contains(&self, handle: PlanetHandle) -> bool {
        self.meshes.contains_key(&handle)
    }

    fn emissive(&self, handle: PlanetHandle) -> Option<LinearRgba> {
        self.emissive_of(handle)
    }

    fn set_emissive(&mut self, handle: PlanetHandle, color: LinearRgba) {
        self.emissive.insert(handle, color);
        self.writes.push((handle, color));
    }
}

/// Orthographic camera looking down -Z; NDC (±1, ±1) spans ±`half_extent`.
pub struct OrthoCamera {
    pub half_extent: Vec2,
}

impl Default for OrthoCamera {
    fn default() -> Self {
        Self {
            half_extent: Vec2::new(40.0, 30.0),
        }
    }
}

impl CameraView for OrthoCamera {
    fn ray_through(&self, ndc: Vec2) -> Option<PickRay> {
        let origin = (ndc * self.half_extent).extend(100.0);
        PickRay::new(origin, Vec3::NEG_Z)
    }
}

/// 800x600 surface at the client origin.
pub struct FakeSurface {
    pub size: Vec2,
    pub cursor: CursorStyle,
    pub fail_on: Option<InputEventKind>,
    listeners: HashMap<ListenerId, (ListenerTarget, InputEventKind)>,
    pub removed: Vec<ListenerId>,
    next_id: u64,
}

impl Default for FakeSurface {
    fn default() -> Self {
        Self {
            size: Vec2::new(800.0, 600.0),
            cursor: CursorStyle::Default,
            fail_on: None,
            listeners: HashMap::new(),
            removed: Vec::new(),
            next_id: 1,
        }
    }
}

impl FakeSurface {
    pub fn attached(&self) -> usize {
        self.listeners.len()
    }
}

impl PointerSurface for FakeSurface {
    fn bounding_rect(&self) -> SurfaceRect {
        SurfaceRect::from_size(self.size)
    }

    fn viewport_size(&self) -> Vec2 {
        self.size
    }

    fn set_cursor(&mut self, cursor: CursorStyle) {
        self.cursor = cursor;
    }

    fn add_listener(
        &mut self,
        target: ListenerTarget,
        kind: InputEventKind,
    ) -> Result<ListenerId, CollaboratorError> {
        if self.fail_on == Some(kind) {
            return Err(CollaboratorError::new("surface", format!("cannot listen for {kind:?}")));
        }
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.insert(id, (target, kind));
        Ok(id)
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.removed.push(id);
        self.listeners.remove(&id).is_some()
    }
}

/// Camera controller recording `focus:<name>` calls.
#[derive(Clone, Default)]
pub struct RecordingCameraController {
    pub log: CallLog,
}

impl CameraController for RecordingCameraController {
    fn focus_and_follow(&mut self, _handle: PlanetHandle, planet: &PlanetData) {
        self.log.lock().unwrap().push(format!("focus:{}", planet.name));
    }

    fn follow_distance(&self) -> f32 {
        25.0
    }
}

/// Control panel recording `selected:<name|None>` and `distance:<d>` calls.
#[derive(Clone, Default)]
pub struct RecordingControlPanel {
    pub log: CallLog,
}

impl ControlPanel for RecordingControlPanel {
    fn update_selected_planet(&mut self, name: Option<&str>) {
        self.log
            .lock()
            .unwrap()
            .push(format!("selected:{}", name.unwrap_or("None")));
    }

    fn update_camera_distance(&mut self, distance: f32) {
        self.log.lock().unwrap().push(format!("distance:{distance}"));
    }
}

/// Info panel recording `init`, `show:<name>`, `hide`, `toggle`, `dispose`.
#[derive(Clone, Default)]
pub struct RecordingInfoPanel {
    pub log: CallLog,
    pub fail_init: bool,
}

impl InfoPanel for RecordingInfoPanel {
    fn init(&mut self) -> Result<(), CollaboratorError> {
        self.log.lock().unwrap().push("init".into());
        if self.fail_init {
            return Err(CollaboratorError::new("info panel", "template missing"));
        }
        Ok(())
    }

    fn show(&mut self, planet: &PlanetData) {
        self.log.lock().unwrap().push(format!("show:{}", planet.name));
    }

    fn hide(&mut self) {
        self.log.lock().unwrap().push("hide".into());
    }

    fn toggle(&mut self) {
        self.log.lock().unwrap().push("toggle".into());
    }

    fn dispose(&mut self) {
        self.log.lock().unwrap().push("dispose".into());
    }
}

/// Error handler recording `<level>:<message>` and `error:<context>`.
#[derive(Clone, Default)]
pub struct RecordingErrorHandler {
    pub log: CallLog,
}

impl ErrorHandler for RecordingErrorHandler {
    fn log(&self, message: &str, level: LogLevel) {
        self.log
            .lock()
            .unwrap()
            .push(format!("{level:?}:{message}"));
    }

    fn handle_error(&self, _error: &dyn Error, context: &str) {
        self.log.lock().unwrap().push(format!("error:{context}"));
    }
}

impl RecordingErrorHandler {
    pub fn errors(&self) -> Vec<String> {
        calls(&self.log)
            .into_iter()
            .filter(|c| c.starts_with("error:"))
            .collect()
    }
}

/// Particle scene tracking attached cloud names.
#[derive(Default)]
pub struct FakeParticleScene {
    pub attached: Vec<String>,
    pub detached: Vec<String>,
    pub fail_attach: Option<&'static str>,
}

impl ParticleScene for FakeParticleScene {
    fn attach(
        &mut self,
        name: &str,
        _buffers: &ParticleBuffers,
        _style: &PointStyle,
    ) -> Result<(), ParticleError> {
        if self.fail_attach == Some(name) {
            return Err(ParticleError::Attach {
                system: name.to_string(),
                reason: "scene rejected point cloud".into(),
            });
        }
        self.attached.push(name.to_string());
        Ok(())
    }

    fn detach(&mut self, name: &str) -> bool {
        let present = self.attached.iter().any(|n| n == name);
        self.attached.retain(|n| n != name);
        self.detached.push(name.to_string());
        present
    }
}

/// A planet record with the given name.
pub fn planet(name: &str) -> PlanetData {
    PlanetData::named(name)
}
