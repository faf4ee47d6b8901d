//! Capabilities the interaction core consumes from its host.
//!
//! The scene and pointer surface are required; the camera controller,
//! control panel and info panel are optional and every call site treats
//! them as `Option`.

use bevy::color::LinearRgba;
use bevy::math::Vec2;

use super::input::{InputEventKind, ListenerId, ListenerTarget};
use super::picking::{PickMesh, SurfaceRect};
use crate::types::{PlanetData, PlanetHandle};

/// Failure reported by an external collaborator.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{collaborator}: {message}")]
pub struct CollaboratorError {
    pub collaborator: &'static str,
    pub message: String,
}

impl CollaboratorError {
    pub fn new(collaborator: &'static str, message: impl Into<String>) -> Self {
        Self {
            collaborator,
            message: message.into(),
        }
    }
}

/// Pointer affordance requested by the hover state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CursorStyle {
    #[default]
    Default,
    Pointer,
}

/// Scene graph the core picks against and highlights.
pub trait SceneView: Send + Sync {
    /// World-space leaf meshes of a planet group, empty if unknown.
    fn planet_meshes(&self, handle: PlanetHandle) -> Vec<PickMesh>;

    /// Whether the handle still refers to a live planet.
    fn contains(&self, handle: PlanetHandle) -> bool;

    /// Current emissive color of the planet's material.
    fn emissive(&self, handle: PlanetHandle) -> Option<LinearRgba>;

    fn set_emissive(&mut self, handle: PlanetHandle, color: LinearRgba);
}

/// Element receiving pointer input.
pub trait PointerSurface: Send + Sync {
    fn bounding_rect(&self) -> SurfaceRect;

    /// Size of the visible viewport in client pixels.
    fn viewport_size(&self) -> Vec2;

    fn set_cursor(&mut self, cursor: CursorStyle);

    fn add_listener(
        &mut self,
        target: ListenerTarget,
        kind: InputEventKind,
    ) -> Result<ListenerId, CollaboratorError>;

    /// Returns false if the listener was not attached.
    fn remove_listener(&mut self, id: ListenerId) -> bool;
}

/// Camera rig that can fly to and track a planet.
pub trait CameraController: Send + Sync {
    fn focus_and_follow(&mut self, handle: PlanetHandle, planet: &PlanetData);

    /// Distance kept from the followed planet.
    fn follow_distance(&self) -> f32;
}

/// Panel displaying the current selection and camera distance.
pub trait ControlPanel: Send + Sync {
    /// `None` clears the selection display.
    fn update_selected_planet(&mut self, name: Option<&str>);

    fn update_camera_distance(&mut self, distance: f32);
}

/// Panel showing detailed planet information.
pub trait InfoPanel: Send + Sync {
    fn init(&mut self) -> Result<(), CollaboratorError>;

    fn show(&mut self, planet: &PlanetData);

    fn hide(&mut self);

    fn toggle(&mut self);

    fn dispose(&mut self);
}
