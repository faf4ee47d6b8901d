//! Perspective orbit camera with focus-and-follow.
//!
//! The camera orbits a target point: scroll zooms, right drag rotates,
//! middle drag pans. [`OrbitCameraController`] is the handle the
//! interaction layer uses to fly to a planet and keep it centered.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bevy::{
    input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll},
    prelude::*,
};

use crate::interaction::collaborators::CameraController;
use crate::interaction::plugin::PointerCapture;
use crate::render::{PlanetBody, planet_handle};
use crate::types::{PlanetData, PlanetHandle};

/// Closest allowed camera distance.
pub const MIN_DISTANCE: f32 = 2.0;

/// Furthest allowed camera distance.
pub const MAX_DISTANCE: f32 = 4000.0;

/// Distance at startup, showing the inner system.
pub const DEFAULT_DISTANCE: f32 = 320.0;

/// Zoom speed multiplier for scroll wheel.
pub const ZOOM_SPEED: f32 = 0.1;

/// Radians per pixel of right-drag.
pub const ROTATE_SPEED: f32 = 0.005;

/// Pan speed multiplier, scaled by distance.
pub const PAN_SPEED: f32 = 0.002;

/// Follow distance in multiples of the planet radius.
pub const FOLLOW_RADIUS_FACTOR: f32 = 6.0;

/// Minimum follow distance.
pub const MIN_FOLLOW_DISTANCE: f32 = 8.0;

/// Exponential smoothing rate while flying to a target, per second.
pub const FOLLOW_SMOOTHING: f32 = 4.0;

const MAX_PITCH: f32 = 1.5;

/// Marker component for the main camera.
#[derive(Component)]
pub struct MainCamera;

/// Orbit parameters of the camera.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraRig {
    pub target: Vec3,
    /// Distance the camera eases towards.
    pub distance: f32,
    /// Distance currently applied.
    pub current_distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    /// Planet the target tracks.
    pub following: Option<FollowTarget>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FollowTarget {
    pub handle: PlanetHandle,
    pub name: String,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: DEFAULT_DISTANCE,
            current_distance: DEFAULT_DISTANCE,
            yaw: 0.0,
            pitch: 0.6,
            following: None,
        }
    }
}

impl CameraRig {
    /// Camera position for the applied distance.
    pub fn eye(&self) -> Vec3 {
        let offset = Vec3::new(
            self.pitch.cos() * self.yaw.sin(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.cos(),
        );
        self.target + offset * self.current_distance
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.eye()).looking_at(self.target, Vec3::Y)
    }

    /// Multiply the distance, keeping it within bounds.
    pub fn zoom(&mut self, factor: f32) {
        self.distance = (self.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    pub fn rotate(&mut self, delta: Vec2) {
        self.yaw -= delta.x * ROTATE_SPEED;
        self.pitch = (self.pitch + delta.y * ROTATE_SPEED).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Move the target in the view plane; panning stops following.
    pub fn pan(&mut self, delta: Vec2) {
        let transform = self.transform();
        let scale = self.current_distance * PAN_SPEED;
        self.target += (transform.up() * delta.y - transform.right() * delta.x) * scale;
        self.following = None;
    }

    /// Ease target and distance towards their goals.
    pub fn advance(&mut self, goal: Option<Vec3>, dt: f32) {
        let t = 1.0 - (-FOLLOW_SMOOTHING * dt).exp();
        if let Some(goal) = goal {
            self.target = self.target.lerp(goal, t);
        }
        self.current_distance += (self.distance - self.current_distance) * t;
    }
}

/// Follow distance for a planet, derived from its rendered size.
pub fn follow_distance_for(planet: &PlanetData) -> f32 {
    (PlanetBody::from_data(planet).radius * FOLLOW_RADIUS_FACTOR).max(MIN_FOLLOW_DISTANCE)
}

/// Shared handle on the camera rig.
#[derive(Resource, Clone, Default)]
pub struct OrbitCameraController {
    rig: Arc<Mutex<CameraRig>>,
}

impl OrbitCameraController {
    fn lock(&self) -> MutexGuard<'_, CameraRig> {
        self.rig.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the rig.
    pub fn rig(&self) -> CameraRig {
        self.lock().clone()
    }

    pub fn following(&self) -> Option<String> {
        self.lock().following.as_ref().map(|f| f.name.clone())
    }

    pub fn stop_following(&self) {
        self.lock().following = None;
    }

    /// Camera distance currently applied.
    pub fn distance(&self) -> f32 {
        self.lock().current_distance
    }
}

impl CameraController for OrbitCameraController {
    fn focus_and_follow(&mut self, handle: PlanetHandle, planet: &PlanetData) {
        let mut rig = self.lock();
        rig.distance = follow_distance_for(planet);
        rig.following = Some(FollowTarget {
            handle,
            name: planet.name.clone(),
        });
        info!("Camera following {} at distance {:.1}", planet.name, rig.distance);
    }

    fn follow_distance(&self) -> f32 {
        self.lock().distance
    }
}

/// Plugin providing camera functionality.
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OrbitCameraController>()
            .add_systems(Startup, setup_camera)
            .add_systems(
                Update,
                (camera_input, follow_target, apply_rig).chain(),
            );
    }
}

/// Spawn the main camera with a perspective projection.
fn setup_camera(mut commands: Commands, controller: Res<OrbitCameraController>) {
    commands.spawn((
        Camera3d::default(),
        Projection::from(PerspectiveProjection {
            far: 20_000.0,
            ..default()
        }),
        controller.rig().transform(),
        MainCamera,
    ));
}

/// Scroll to zoom, right drag to rotate, middle drag to pan.
fn camera_input(
    mouse_scroll: Res<AccumulatedMouseScroll>,
    mouse_motion: Res<AccumulatedMouseMotion>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    capture: Option<Res<PointerCapture>>,
    controller: Res<OrbitCameraController>,
) {
    if capture.is_some_and(|c| c.0) {
        return;
    }

    let mut rig = controller.lock();
    if mouse_scroll.delta.y != 0.0 {
        // Logarithmic zoom
        rig.zoom(1.0 - mouse_scroll.delta.y * ZOOM_SPEED);
    }
    if mouse_motion.delta != Vec2::ZERO {
        if mouse_buttons.pressed(MouseButton::Right) {
            rig.rotate(mouse_motion.delta);
        } else if mouse_buttons.pressed(MouseButton::Middle) {
            rig.pan(mouse_motion.delta);
        }
    }
}

/// Move the orbit target towards the followed planet.
fn follow_target(
    time: Res<Time>,
    controller: Res<OrbitCameraController>,
    planets: Query<(Entity, &GlobalTransform), With<PlanetBody>>,
) {
    let mut rig = controller.lock();
    let goal = match &rig.following {
        Some(follow) => {
            let found = planets
                .iter()
                .find(|(entity, _)| planet_handle(*entity) == follow.handle)
                .map(|(_, transform)| transform.translation());
            if found.is_none() {
                warn!("Followed planet {} left the scene", follow.name);
                rig.following = None;
            }
            found
        }
        None => None,
    };
    rig.advance(goal, time.delta_secs());
}

fn apply_rig(
    controller: Res<OrbitCameraController>,
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
) {
    let Ok(mut transform) = camera_query.single_mut() else {
        return;
    };
    *transform = controller.lock().transform();
}
