//! Bevy glue for [`InteractionManager`].
//!
//! The manager only sees snapshots: [`BevyScene`] mirrors planet spheres and
//! their emissive colors, [`BevyCamera`] the main camera's projection and
//! [`BevySurface`] the primary window. Emissive writes are queued and applied
//! to `StandardMaterial`s after the manager has handled the frame's input.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use bevy::input::touch::{TouchInput, TouchPhase};
use bevy::prelude::*;
use bevy::window::{CursorLeft, CursorMoved, PrimaryWindow, WindowResized};

use super::collaborators::{
    CollaboratorError, CursorStyle, InfoPanel, PointerSurface, SceneView,
};
use super::input::{InputEvent, InputEventKind, Key, ListenerId, ListenerTarget};
use super::picking::{CameraView, PickMesh, PickRay, ProjectionCamera, SurfaceRect};
use super::{InteractionConfig, InteractionManager};
use crate::camera::{MainCamera, OrbitCameraController};
use crate::catalog::PlanetCatalog;
use crate::events::PlanetEvent;
use crate::render::{PlanetBody, planet_handle};
use crate::types::{PlanetData, PlanetHandle};
use crate::ui::{SharedControlPanel, SharedInfoPanel};

/// Interaction manager wired to the Bevy adapters.
pub type BevyInteractionManager = InteractionManager<BevyScene, BevyCamera, BevySurface>;

/// The live interaction manager.
#[derive(Resource)]
pub struct PlanetInteraction(pub BevyInteractionManager);

/// Whether the UI is using the pointer this frame.
#[derive(Resource, Default)]
pub struct PointerCapture(pub bool);

/// A planet was selected by click or tap.
#[derive(Message, Clone, Debug)]
pub struct PlanetSelected(pub PlanetData);

/// Request to show the info panel for a planet.
#[derive(Message, Clone, Debug)]
pub struct ShowPlanetInfo(pub PlanetData);

/// Request to hide the info panel.
#[derive(Message, Clone, Copy, Debug, Default)]
pub struct HidePlanetInfo;

/// Bus events waiting to become Bevy messages.
#[derive(Resource, Clone, Default)]
pub struct PlanetEventOutbox(Arc<Mutex<Vec<PlanetEvent>>>);

impl PlanetEventOutbox {
    pub fn push(&self, event: PlanetEvent) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    pub fn drain(&self) -> Vec<PlanetEvent> {
        std::mem::take(&mut *self.0.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

/// Snapshot of pickable planet spheres.
#[derive(Default)]
pub struct BevyScene {
    meshes: HashMap<PlanetHandle, PickMesh>,
    emissive: HashMap<PlanetHandle, LinearRgba>,
    pending: Vec<(PlanetHandle, LinearRgba)>,
}

impl BevyScene {
    /// Record a planet's current sphere. The first emissive seen is kept;
    /// later changes come from the manager.
    pub fn upsert(&mut self, handle: PlanetHandle, mesh: PickMesh, emissive: LinearRgba) {
        self.meshes.insert(handle, mesh);
        self.emissive.entry(handle).or_insert(emissive);
    }

    /// Forget planets no longer in the world.
    pub fn retain(&mut self, live: impl Fn(PlanetHandle) -> bool) {
        self.meshes.retain(|handle, _| live(*handle));
        self.emissive.retain(|handle, _| live(*handle));
    }

    /// Emissive writes since the last call.
    pub fn take_writes(&mut self) -> Vec<(PlanetHandle, LinearRgba)> {
        std::mem::take(&mut self.pending)
    }
}

impl SceneView for BevyScene {
    fn planet_meshes(&self, handle: PlanetHandle) -> Vec<PickMesh> {
        self.meshes.get(&handle).copied().into_iter().collect()
    }

    fn contains(&self, handle: PlanetHandle) -> bool {
        self.meshes.contains_key(&handle)
    }

    fn emissive(&self, handle: PlanetHandle) -> Option<LinearRgba> {
        self.emissive.get(&handle).copied()
    }

    fn set_emissive(&mut self, handle: PlanetHandle, color: LinearRgba) {
        if let Some(current) = self.emissive.get_mut(&handle) {
            *current = color;
            self.pending.push((handle, color));
        }
    }
}

/// Projection of the main camera, refreshed every frame.
#[derive(Default)]
pub struct BevyCamera(pub Option<ProjectionCamera>);

impl CameraView for BevyCamera {
    fn ray_through(&self, ndc: Vec2) -> Option<PickRay> {
        self.0.as_ref()?.ray_through(ndc)
    }
}

/// Primary window as seen by the manager.
#[derive(Default)]
pub struct BevySurface {
    pub size: Vec2,
    pub cursor: CursorStyle,
    listeners: HashMap<ListenerId, (ListenerTarget, InputEventKind)>,
    next_id: u64,
}

impl BevySurface {
    pub fn listeners(&self) -> impl Iterator<Item = &(ListenerTarget, InputEventKind)> {
        self.listeners.values()
    }
}

impl PointerSurface for BevySurface {
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
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners.insert(id, (target, kind));
        Ok(id)
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }
}

/// Plugin wiring window input into the interaction manager.
#[derive(Default)]
pub struct InteractionPlugin {
    pub config: InteractionConfig,
}

/// Ordering of the per-frame interaction systems.
#[derive(SystemSet, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InteractionSet {
    Sync,
    Input,
    Apply,
}

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone())
            .init_resource::<PointerCapture>()
            .init_resource::<PlanetEventOutbox>()
            .add_message::<PlanetSelected>()
            .add_message::<ShowPlanetInfo>()
            .add_message::<HidePlanetInfo>()
            .configure_sets(
                Update,
                (InteractionSet::Sync, InteractionSet::Input, InteractionSet::Apply)
                    .chain()
                    .run_if(resource_exists::<PlanetInteraction>),
            )
            .add_systems(PostStartup, setup_interaction)
            .add_systems(Update, sync_scene.in_set(InteractionSet::Sync))
            .add_systems(
                Update,
                (forward_input, forward_info_requests, tick_tooltip)
                    .chain()
                    .in_set(InteractionSet::Input),
            )
            .add_systems(
                Update,
                (apply_emissive_writes, flush_planet_events).in_set(InteractionSet::Apply),
            )
            .add_systems(Last, dispose_on_exit.run_if(resource_exists::<PlanetInteraction>));
    }
}

/// Build and initialize the manager once the planets exist.
fn setup_interaction(
    mut commands: Commands,
    config: Res<InteractionConfig>,
    catalog: Res<PlanetCatalog>,
    outbox: Res<PlanetEventOutbox>,
    planets: Query<(Entity, &PlanetBody)>,
    camera: Option<Res<OrbitCameraController>>,
    info_panel: Option<Res<SharedInfoPanel>>,
    control_panel: Option<Res<SharedControlPanel>>,
) {
    let registered = planets.iter().filter_map(|(entity, body)| {
        let data = catalog.get(&body.name)?.clone();
        Some((planet_handle(entity), data))
    });

    let mut builder = BevyInteractionManager::builder()
        .scene(BevyScene::default())
        .camera(BevyCamera::default())
        .surface(BevySurface::default())
        .config(config.clone())
        .planets(registered);
    if let Some(camera) = camera {
        builder = builder.camera_controller(camera.clone());
    }
    if let Some(panel) = control_panel {
        builder = builder.control_panel(panel.clone());
    }
    if let Some(panel) = info_panel {
        let panel = panel.clone();
        builder = builder.info_panel_factory(move || Box::new(panel) as Box<dyn InfoPanel>);
    }

    let mut manager = match builder.build() {
        Ok(manager) => manager,
        Err(e) => {
            error!("Interaction disabled: {}", e);
            return;
        }
    };

    let outbox = outbox.clone();
    manager
        .events_mut()
        .subscribe_all(move |event: &PlanetEvent| outbox.push(event.clone()));

    // Failures are already reported; listeners that did attach stay usable.
    let _ = manager.init();
    info!("Interaction ready with {} planets", manager.planet_count());
    commands.insert_resource(PlanetInteraction(manager));
}

/// Refresh the scene, camera and surface snapshots.
pub fn sync_scene(
    mut interaction: ResMut<PlanetInteraction>,
    planets: Query<(Entity, &PlanetBody, &GlobalTransform, &MeshMaterial3d<StandardMaterial>)>,
    materials: Res<Assets<StandardMaterial>>,
    camera: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    window: Query<&Window, With<PrimaryWindow>>,
) {
    let manager = &mut interaction.0;

    let scene = manager.scene_mut();
    for (entity, body, transform, material) in &planets {
        let (scale, _, center) = transform.to_scale_rotation_translation();
        let emissive = materials
            .get(&material.0)
            .map_or(LinearRgba::BLACK, |m| m.emissive);
        scene.upsert(
            planet_handle(entity),
            PickMesh::planet(center, body.radius * scale.max_element()),
            emissive,
        );
    }
    scene.retain(|handle| planets.iter().any(|(e, ..)| planet_handle(e) == handle));

    if let Ok((camera, transform)) = camera.single() {
        manager.camera_mut().0 = Some(ProjectionCamera::new(
            Mat4::from(transform.affine()),
            camera.clip_from_view(),
        ));
    }

    if let Ok(window) = window.single() {
        manager.surface_mut().size = Vec2::new(window.width(), window.height());
    }
}

/// Translate window, mouse, touch and keyboard input into [`InputEvent`]s.
pub fn forward_input(
    mut interaction: ResMut<PlanetInteraction>,
    capture: Res<PointerCapture>,
    mut cursor_moved: MessageReader<CursorMoved>,
    mut cursor_left: MessageReader<CursorLeft>,
    mut resized: MessageReader<WindowResized>,
    mut touches: MessageReader<TouchInput>,
    active_touches: Res<Touches>,
    mouse: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
) {
    let manager = &mut interaction.0;
    let captured = capture.0;

    for moved in cursor_moved.read() {
        if !captured {
            manager.handle_input(InputEvent::PointerMove {
                position: moved.position,
            });
        }
    }

    if cursor_left.read().count() > 0 {
        manager.handle_input(InputEvent::PointerLeave);
    }

    if mouse.just_released(MouseButton::Left) && !captured {
        let position = manager.pointer();
        let timestamp_ms = manager.now_ms();
        manager.handle_input(InputEvent::Click {
            position,
            timestamp_ms,
        });
    }

    // Active touches include the ones that started this frame and exclude
    // those that just ended.
    let held = active_touches.iter().count();
    for touch in touches.read() {
        if captured {
            continue;
        }
        match touch.phase {
            TouchPhase::Started => manager.handle_input(InputEvent::TouchStart {
                position: touch.position,
                touch_count: held,
            }),
            TouchPhase::Ended => manager.handle_input(InputEvent::TouchEnd {
                position: touch.position,
                touch_count: held + 1,
            }),
            TouchPhase::Moved | TouchPhase::Canceled => {}
        }
    }

    for key in keys.get_just_pressed() {
        let key = match key {
            KeyCode::Escape => Key::Escape,
            KeyCode::KeyI => Key::KeyI,
            _ => Key::Other,
        };
        manager.handle_input(InputEvent::KeyDown(key));
    }

    if resized.read().count() > 0 {
        manager.handle_input(InputEvent::Resize);
    }
}

/// Route info-panel requests from other modules through the manager.
pub fn forward_info_requests(
    mut interaction: ResMut<PlanetInteraction>,
    mut show: MessageReader<ShowPlanetInfo>,
    mut hide: MessageReader<HidePlanetInfo>,
) {
    for ShowPlanetInfo(planet) in show.read() {
        interaction
            .0
            .handle_input(InputEvent::ShowPlanetInfo(planet.clone()));
    }
    if hide.read().count() > 0 {
        interaction.0.handle_input(InputEvent::HidePlanetInfo);
    }
}

pub fn tick_tooltip(mut interaction: ResMut<PlanetInteraction>) {
    interaction.0.tick();
}

/// Copy queued highlight colors onto the planets' materials.
pub fn apply_emissive_writes(
    mut interaction: ResMut<PlanetInteraction>,
    planets: Query<(Entity, &MeshMaterial3d<StandardMaterial>), With<PlanetBody>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (handle, color) in interaction.0.scene_mut().take_writes() {
        let Some((_, material)) = planets.iter().find(|(e, _)| planet_handle(*e) == handle) else {
            continue;
        };
        if let Some(mut material) = materials.get_mut(&material.0) {
            material.emissive = color;
        }
    }
}

/// Publish bus events as Bevy messages.
pub fn flush_planet_events(
    outbox: Res<PlanetEventOutbox>,
    mut selected: MessageWriter<PlanetSelected>,
    mut show: MessageWriter<ShowPlanetInfo>,
    mut hide: MessageWriter<HidePlanetInfo>,
) {
    for event in outbox.drain() {
        match event {
            PlanetEvent::PlanetSelected(planet) => {
                selected.write(PlanetSelected(planet));
            }
            PlanetEvent::ShowPlanetInfo(planet) => {
                show.write(ShowPlanetInfo(planet));
            }
            PlanetEvent::HidePlanetInfo => {
                hide.write(HidePlanetInfo);
            }
        }
    }
}

fn dispose_on_exit(mut exit: MessageReader<AppExit>, mut interaction: ResMut<PlanetInteraction>) {
    if exit.read().count() > 0 {
        interaction.0.dispose();
    }
}
