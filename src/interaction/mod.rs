//! Planet picking, hover and selection state, camera focus requests and the
//! hover tooltip.
//!
//! [`InteractionManager`] is framework-independent: it talks to the scene,
//! camera and pointer surface through the traits in [`collaborators`] and
//! [`picking`], and is driven by [`InputEvent`]s. The Bevy glue lives in
//! [`plugin`].

pub mod collaborators;
pub mod highlight;
pub mod input;
pub mod picking;
pub mod plugin;
pub mod tooltip;

use std::collections::HashMap;

use bevy::math::Vec2;
use bevy::prelude::Resource;

use crate::diagnostics::{ErrorHandler, LogLevel, TracingErrorHandler};
use crate::events::{EventBus, PlanetEvent};
use crate::time::{Clock, SystemClock};
use crate::types::{PlanetData, PlanetHandle};
use collaborators::{
    CameraController, CollaboratorError, ControlPanel, CursorStyle, InfoPanel, PointerSurface,
    SceneView,
};
use highlight::{HighlightState, HighlightTable};
use input::{InputEvent, Key, LISTENED_EVENTS, ListenerRegistration, ListenerRegistry};
use picking::{CameraView, client_to_ndc, nearest_hit};
use tooltip::{Tooltip, TooltipTimer};

/// Behaviour switches and timings for the interaction core.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct InteractionConfig {
    pub enable_planet_selection: bool,
    pub enable_tooltips: bool,
    pub enable_hover: bool,
    pub enable_double_click: bool,
    pub tooltip_delay_ms: u64,
    pub double_click_threshold_ms: u64,
    pub focus_debounce_delay_ms: u64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            enable_planet_selection: true,
            enable_tooltips: true,
            enable_hover: true,
            enable_double_click: true,
            tooltip_delay_ms: 500,
            double_click_threshold_ms: 300,
            focus_debounce_delay_ms: 500,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum InteractionError {
    #[error("interaction manager requires scene, camera, and surface (missing: {})", .missing.join(", "))]
    Configuration { missing: Vec<&'static str> },

    #[error("interaction manager failed to initialize")]
    Initialization(#[source] Box<InteractionError>),

    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

/// Mutable hover, selection and focus state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InteractionState {
    pub selected_planet: Option<PlanetData>,
    pub hovered_planet: Option<PlanetData>,
    pub last_focused_planet_name: Option<String>,
    /// Clock time of the last delegated focus, in milliseconds.
    pub last_focus_timestamp: f64,
    pub is_tooltip_visible: bool,
}

/// Result of a [`InteractionManager::focus_and_follow`] request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusOutcome {
    /// Forwarded to the camera controller.
    Delegated,
    /// Same planet requested again within the debounce window.
    Debounced,
    NoController,
    /// The planet has no live handle in the scene.
    UnknownPlanet,
}

/// Creates the info panel during [`InteractionManager::init`].
pub type InfoPanelFactory = Box<dyn FnOnce() -> Box<dyn InfoPanel> + Send + Sync>;

#[derive(Clone, Debug)]
struct RegisteredPlanet {
    handle: PlanetHandle,
    data: PlanetData,
}

struct InfoPanelSlot {
    panel: Box<dyn InfoPanel>,
    /// Created by our factory, so disposed with us.
    owned: bool,
}

/// Builder for [`InteractionManager`].
pub struct InteractionManagerBuilder<S, C, P> {
    scene: Option<S>,
    camera: Option<C>,
    surface: Option<P>,
    config: InteractionConfig,
    planets: Vec<(PlanetHandle, PlanetData)>,
    camera_controller: Option<Box<dyn CameraController>>,
    control_panel: Option<Box<dyn ControlPanel>>,
    info_panel: Option<Box<dyn InfoPanel>>,
    info_panel_factory: Option<InfoPanelFactory>,
    error_handler: Option<Box<dyn ErrorHandler>>,
    clock: Option<Box<dyn Clock>>,
}

impl<S, C, P> Default for InteractionManagerBuilder<S, C, P> {
    fn default() -> Self {
        Self {
            scene: None,
            camera: None,
            surface: None,
            config: InteractionConfig::default(),
            planets: Vec::new(),
            camera_controller: None,
            control_panel: None,
            info_panel: None,
            info_panel_factory: None,
            error_handler: None,
            clock: None,
        }
    }
}

impl<S, C, P> InteractionManagerBuilder<S, C, P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scene(mut self, scene: S) -> Self {
        self.scene = Some(scene);
        self
    }

    pub fn camera(mut self, camera: C) -> Self {
        self.camera = Some(camera);
        self
    }

    pub fn surface(mut self, surface: P) -> Self {
        self.surface = Some(surface);
        self
    }

    pub fn config(mut self, config: InteractionConfig) -> Self {
        self.config = config;
        self
    }

    /// Initial planet registry.
    pub fn planets(mut self, planets: impl IntoIterator<Item = (PlanetHandle, PlanetData)>) -> Self {
        self.planets = planets.into_iter().collect();
        self
    }

    pub fn camera_controller(mut self, controller: impl CameraController + 'static) -> Self {
        self.camera_controller = Some(Box::new(controller));
        self
    }

    pub fn control_panel(mut self, panel: impl ControlPanel + 'static) -> Self {
        self.control_panel = Some(Box::new(panel));
        self
    }

    /// Info panel owned by the caller. It is never disposed by the manager.
    pub fn info_panel(mut self, panel: impl InfoPanel + 'static) -> Self {
        self.info_panel = Some(Box::new(panel));
        self
    }

    /// Info panel created and initialized by [`InteractionManager::init`]
    /// and disposed with the manager.
    pub fn info_panel_factory(
        mut self,
        factory: impl FnOnce() -> Box<dyn InfoPanel> + Send + Sync + 'static,
    ) -> Self {
        self.info_panel_factory = Some(Box::new(factory));
        self
    }

    pub fn error_handler(mut self, handler: impl ErrorHandler + 'static) -> Self {
        self.error_handler = Some(Box::new(handler));
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }
}

impl<S: SceneView, C: CameraView, P: PointerSurface> InteractionManagerBuilder<S, C, P> {
    pub fn build(self) -> Result<InteractionManager<S, C, P>, InteractionError> {
        let (scene, camera, surface) = match (self.scene, self.camera, self.surface) {
            (Some(scene), Some(camera), Some(surface)) => (scene, camera, surface),
            (scene, camera, surface) => {
                let missing = [
                    ("scene", scene.is_none()),
                    ("camera", camera.is_none()),
                    ("surface", surface.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();
                return Err(InteractionError::Configuration { missing });
            }
        };

        let mut manager = InteractionManager {
            scene,
            camera,
            surface,
            config: self.config,
            planets: HashMap::new(),
            state: InteractionState::default(),
            highlights: HighlightTable::default(),
            tooltip: None,
            tooltip_timer: TooltipTimer::default(),
            listeners: ListenerRegistry::default(),
            info_panel: self.info_panel.map(|panel| InfoPanelSlot {
                panel,
                owned: false,
            }),
            info_panel_factory: self.info_panel_factory,
            camera_controller: self.camera_controller,
            control_panel: self.control_panel,
            error_handler: self
                .error_handler
                .unwrap_or_else(|| Box::new(TracingErrorHandler)),
            clock: self.clock.unwrap_or_else(|| Box::new(SystemClock::default())),
            bus: EventBus::new(),
            pointer: Vec2::ZERO,
            last_click_ms: None,
            is_initialized: false,
        };
        manager.update_planets(self.planets);
        Ok(manager)
    }
}

/// Owns hover, selection and focus state for one scene.
pub struct InteractionManager<S, C, P> {
    scene: S,
    camera: C,
    surface: P,
    config: InteractionConfig,
    planets: HashMap<String, RegisteredPlanet>,
    state: InteractionState,
    highlights: HighlightTable,
    tooltip: Option<Tooltip>,
    tooltip_timer: TooltipTimer,
    listeners: ListenerRegistry,
    info_panel: Option<InfoPanelSlot>,
    info_panel_factory: Option<InfoPanelFactory>,
    camera_controller: Option<Box<dyn CameraController>>,
    control_panel: Option<Box<dyn ControlPanel>>,
    error_handler: Box<dyn ErrorHandler>,
    clock: Box<dyn Clock>,
    bus: EventBus<PlanetEvent>,
    pointer: Vec2,
    last_click_ms: Option<f64>,
    is_initialized: bool,
}

impl<S: SceneView, C: CameraView, P: PointerSurface> InteractionManager<S, C, P> {
    pub fn builder() -> InteractionManagerBuilder<S, C, P> {
        InteractionManagerBuilder::new()
    }

    /// Create the tooltip, acquire the info panel and attach listeners.
    ///
    /// Already-attached listeners are kept, so retrying after a failure only
    /// attaches the missing ones. Nothing is rolled back on failure; call
    /// [`dispose`](Self::dispose) to clean up.
    pub fn init(&mut self) -> Result<(), InteractionError> {
        if self.is_initialized {
            return Ok(());
        }

        match self.try_init() {
            Ok(()) => {
                self.is_initialized = true;
                self.error_handler.log(
                    &format!(
                        "Interaction manager initialized with {} listeners",
                        self.listeners.len()
                    ),
                    LogLevel::Info,
                );
                Ok(())
            }
            Err(cause) => {
                let error = InteractionError::Initialization(Box::new(cause));
                self.error_handler
                    .handle_error(&error, "InteractionManager::init");
                Err(error)
            }
        }
    }

    fn try_init(&mut self) -> Result<(), InteractionError> {
        if self.tooltip.is_none() {
            self.tooltip = Some(Tooltip::default());
        }

        if self.info_panel.is_none()
            && let Some(factory) = self.info_panel_factory.take()
        {
            let mut panel = factory();
            panel.init()?;
            self.info_panel = Some(InfoPanelSlot { panel, owned: true });
        }

        for kind in LISTENED_EVENTS {
            if self.listeners.is_registered(kind) {
                continue;
            }
            let target = kind.target();
            let id = self.surface.add_listener(target, kind)?;
            self.listeners
                .record(ListenerRegistration { target, kind, id });
        }
        Ok(())
    }

    /// Dispatch one input event. Events without an attached listener are
    /// dropped.
    pub fn handle_input(&mut self, event: InputEvent) {
        if !self.listeners.is_registered(event.kind()) {
            return;
        }

        match event {
            InputEvent::PointerMove { position } => self.on_pointer_move(position),
            InputEvent::Click {
                position,
                timestamp_ms,
            } => self.on_click(position, timestamp_ms),
            InputEvent::TouchStart {
                position,
                touch_count: 1,
            } => self.pointer = position,
            InputEvent::TouchEnd {
                position,
                touch_count: 1,
            } => self.on_tap(position),
            InputEvent::TouchStart { .. } | InputEvent::TouchEnd { .. } => {}
            InputEvent::PointerLeave => {
                self.hide_tooltip();
                if let Some(name) = self.state.hovered_planet.as_ref().map(|p| p.name.clone()) {
                    self.leave_hover(&name);
                }
            }
            InputEvent::KeyDown(key) => self.on_key(key),
            InputEvent::Resize => self.hide_tooltip(),
            InputEvent::ShowPlanetInfo(planet) => {
                if let Some(slot) = &mut self.info_panel {
                    slot.panel.show(&planet);
                }
            }
            InputEvent::HidePlanetInfo => self.hide_info_panel(),
        }
    }

    /// Planet under a client-space point, if any.
    pub fn pick_at(&self, client: Vec2) -> Option<PlanetData> {
        let name = self.pick_name(client)?;
        self.planets.get(&name).map(|p| p.data.clone())
    }

    fn pick_name(&self, client: Vec2) -> Option<String> {
        let ndc = client_to_ndc(client, self.surface.bounding_rect())?;
        let ray = self.camera.ray_through(ndc)?;
        let candidates = self.planets.iter().flat_map(|(name, planet)| {
            self.scene
                .planet_meshes(planet.handle)
                .into_iter()
                .map(move |mesh| (name.as_str(), mesh))
        });
        nearest_hit(&ray, candidates).map(|(name, _)| name.to_string())
    }

    fn on_pointer_move(&mut self, position: Vec2) {
        self.pointer = position;
        if !self.config.enable_hover && !self.config.enable_tooltips {
            return;
        }

        let picked = self.pick_name(position);
        let current = self.state.hovered_planet.as_ref().map(|p| p.name.clone());

        if picked == current {
            self.tooltip_timer.update_cursor(position);
            if self.state.is_tooltip_visible {
                let viewport = self.surface.viewport_size();
                if let Some(tooltip) = &mut self.tooltip {
                    tooltip.show_at(position, viewport);
                }
            }
            return;
        }

        self.hide_tooltip();
        if let Some(previous) = current {
            self.leave_hover(&previous);
        }
        if let Some(name) = picked {
            self.enter_hover(&name, position);
        }
    }

    fn enter_hover(&mut self, name: &str, position: Vec2) {
        let Some(planet) = self.planets.get(name).cloned() else {
            return;
        };

        if self.config.enable_hover {
            if self.highlights.state(planet.handle) != HighlightState::Selected {
                self.highlights
                    .set_state(&mut self.scene, planet.handle, HighlightState::Hovered);
            }
            self.surface.set_cursor(CursorStyle::Pointer);
        }
        if self.config.enable_tooltips {
            let due = self.clock.now_ms() + self.config.tooltip_delay_ms as f64;
            self.tooltip_timer.schedule(due, name, position);
        }
        self.state.hovered_planet = Some(planet.data);
    }

    fn leave_hover(&mut self, name: &str) {
        self.state.hovered_planet = None;
        if !self.config.enable_hover {
            return;
        }
        if let Some(handle) = self.handle_of(name)
            && self.highlights.state(handle) == HighlightState::Hovered
        {
            self.highlights
                .set_state(&mut self.scene, handle, HighlightState::Default);
        }
        self.surface.set_cursor(CursorStyle::Default);
    }

    fn on_click(&mut self, position: Vec2, timestamp_ms: f64) {
        if !self.config.enable_planet_selection {
            return;
        }
        self.pointer = position;

        let is_double = self.config.enable_double_click
            && self.last_click_ms.is_some_and(|last| {
                timestamp_ms - last < self.config.double_click_threshold_ms as f64
            });
        self.last_click_ms = Some(timestamp_ms);

        match self.pick_at(position) {
            None => {
                self.deselect_planet();
            }
            Some(planet) if is_double => {
                self.focus_and_follow(&planet);
            }
            Some(planet) => self.on_planet_click(planet),
        }
    }

    fn on_tap(&mut self, position: Vec2) {
        self.pointer = position;
        if !self.config.enable_planet_selection {
            return;
        }
        match self.pick_at(position) {
            Some(planet) => self.on_planet_click(planet),
            None => {
                self.deselect_planet();
            }
        }
    }

    fn on_planet_click(&mut self, planet: PlanetData) {
        self.select_planet(&planet);
        if let Some(slot) = &mut self.info_panel {
            slot.panel.show(&planet);
        }
        self.bus.publish(&PlanetEvent::PlanetSelected(planet));
    }

    fn on_key(&mut self, key: Key) {
        match key {
            Key::Escape => {
                let had_selection = self.deselect_planet();
                self.hide_tooltip();
                // deselect_planet already hid the panel
                if !had_selection {
                    self.hide_info_panel();
                }
            }
            Key::KeyI => {
                if self.state.selected_planet.is_some()
                    && let Some(slot) = &mut self.info_panel
                {
                    slot.panel.toggle();
                }
            }
            Key::Other => {}
        }
    }

    /// Select a planet, reverting the previous selection first.
    pub fn select_planet(&mut self, planet: &PlanetData) {
        if let Some(previous) = self.state.selected_planet.take()
            && previous.name != planet.name
        {
            self.revert_selection(&previous.name);
        }

        if let Some(handle) = self.handle_of(&planet.name) {
            self.highlights
                .set_state(&mut self.scene, handle, HighlightState::Selected);
        }
        self.state.selected_planet = Some(planet.clone());

        if let Some(panel) = &mut self.control_panel {
            panel.update_selected_planet(Some(&planet.name));
        }
    }

    /// Clear the selection. Returns false if nothing was selected.
    pub fn deselect_planet(&mut self) -> bool {
        let Some(previous) = self.state.selected_planet.take() else {
            return false;
        };
        self.revert_selection(&previous.name);

        if let Some(panel) = &mut self.control_panel {
            panel.update_selected_planet(None);
        }
        self.hide_info_panel();
        true
    }

    fn revert_selection(&mut self, name: &str) {
        let Some(handle) = self.handle_of(name) else {
            return;
        };
        let still_hovered = self.config.enable_hover
            && self
                .state
                .hovered_planet
                .as_ref()
                .is_some_and(|p| p.name == name);
        let target = if still_hovered {
            HighlightState::Hovered
        } else {
            HighlightState::Default
        };
        self.highlights.set_state(&mut self.scene, handle, target);
    }

    /// Ask the camera controller to fly to and follow a planet.
    ///
    /// Repeated requests for the same planet within the debounce window are
    /// ignored.
    pub fn focus_and_follow(&mut self, planet: &PlanetData) -> FocusOutcome {
        if self.camera_controller.is_none() {
            self.error_handler.log(
                &format!("No camera controller available to focus {}", planet.name),
                LogLevel::Warn,
            );
            return FocusOutcome::NoController;
        }

        let Some(handle) = self
            .handle_of(&planet.name)
            .filter(|h| self.scene.contains(*h))
        else {
            self.error_handler.log(
                &format!("Planet {} not found in scene", planet.name),
                LogLevel::Warn,
            );
            return FocusOutcome::UnknownPlanet;
        };

        let now = self.clock.now_ms();
        if self.state.last_focused_planet_name.as_deref() == Some(planet.name.as_str())
            && now - self.state.last_focus_timestamp < self.config.focus_debounce_delay_ms as f64
        {
            return FocusOutcome::Debounced;
        }
        self.state.last_focused_planet_name = Some(planet.name.clone());
        self.state.last_focus_timestamp = now;

        let Some(controller) = &mut self.camera_controller else {
            return FocusOutcome::NoController;
        };
        controller.focus_and_follow(handle, planet);
        let distance = controller.follow_distance();

        if let Some(panel) = &mut self.control_panel {
            panel.update_selected_planet(Some(&planet.name));
            panel.update_camera_distance(distance);
        }
        self.error_handler
            .log(&format!("Focusing camera on {}", planet.name), LogLevel::Debug);
        FocusOutcome::Delegated
    }

    /// Forget the last focus so the next request is always delegated.
    pub fn reset_focus_debounce(&mut self) {
        self.state.last_focused_planet_name = None;
        self.state.last_focus_timestamp = 0.0;
    }

    /// Show the pending tooltip once its delay has elapsed.
    pub fn tick(&mut self) {
        let Some(pending) = self.tooltip_timer.take_due(self.clock.now_ms()) else {
            return;
        };
        let Some(hovered) = &self.state.hovered_planet else {
            return;
        };
        if hovered.name != pending.planet {
            return;
        }

        let viewport = self.surface.viewport_size();
        if let Some(tooltip) = &mut self.tooltip {
            tooltip.set_content(hovered);
            tooltip.show_at(pending.cursor, viewport);
            self.state.is_tooltip_visible = true;
        }
    }

    fn hide_tooltip(&mut self) {
        self.tooltip_timer.cancel();
        if let Some(tooltip) = &mut self.tooltip {
            tooltip.hide();
        }
        self.state.is_tooltip_visible = false;
    }

    fn hide_info_panel(&mut self) {
        if let Some(slot) = &mut self.info_panel {
            slot.panel.hide();
        }
    }

    /// Replace the planet registry.
    pub fn update_planets(&mut self, planets: impl IntoIterator<Item = (PlanetHandle, PlanetData)>) {
        self.planets = planets
            .into_iter()
            .map(|(handle, data)| (data.name.clone(), RegisteredPlanet { handle, data }))
            .collect();
    }

    /// Tear everything down. Safe to call repeatedly or before `init`.
    pub fn dispose(&mut self) {
        self.tooltip_timer.cancel();
        self.tooltip = None;

        if let Some(mut slot) = self.info_panel.take() {
            if slot.owned {
                slot.panel.dispose();
            } else {
                self.info_panel = Some(slot);
            }
        }

        for registration in self.listeners.drain() {
            if !self.surface.remove_listener(registration.id) {
                self.error_handler.log(
                    &format!("Listener for {:?} was already detached", registration.kind),
                    LogLevel::Warn,
                );
            }
        }

        self.highlights.restore_all(&mut self.scene);
        self.surface.set_cursor(CursorStyle::Default);
        self.planets.clear();
        self.state = InteractionState::default();
        self.last_click_ms = None;
        if self.is_initialized {
            self.error_handler
                .log("Interaction manager disposed", LogLevel::Info);
        }
        self.is_initialized = false;
    }

    fn handle_of(&self, name: &str) -> Option<PlanetHandle> {
        self.planets.get(name).map(|p| p.handle)
    }

    pub fn set_camera_controller(&mut self, controller: Option<Box<dyn CameraController>>) {
        self.camera_controller = controller;
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn selected_planet(&self) -> Option<&PlanetData> {
        self.state.selected_planet.as_ref()
    }

    pub fn hovered_planet(&self) -> Option<&PlanetData> {
        self.state.hovered_planet.as_ref()
    }

    pub fn is_tooltip_visible(&self) -> bool {
        self.state.is_tooltip_visible
    }

    /// `None` before `init` and after `dispose`.
    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.is_initialized
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn planet_count(&self) -> usize {
        self.planets.len()
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn highlight_state(&self, name: &str) -> HighlightState {
        self.handle_of(name)
            .map(|h| self.highlights.state(h))
            .unwrap_or_default()
    }

    /// Last pointer position in client pixels.
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    pub fn events_mut(&mut self) -> &mut EventBus<PlanetEvent> {
        &mut self.bus
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn camera_mut(&mut self) -> &mut C {
        &mut self.camera
    }

    pub fn surface(&self) -> &P {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut P {
        &mut self.surface
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use bevy::color::LinearRgba;
    use bevy::math::Vec3;

    use super::highlight::{HighlightState, highlight_emissive};
    use super::input::InputEventKind;
    use super::*;
    use crate::events::PlanetEventKind;
    use crate::test_utils::*;
    use crate::time::ManualClock;

    type Manager = InteractionManager<FakeScene, OrthoCamera, FakeSurface>;

    const EARTH: PlanetHandle = PlanetHandle(1);
    const MARS: PlanetHandle = PlanetHandle(2);
    const ORIGINAL: LinearRgba = LinearRgba {
        red: 0.01,
        green: 0.02,
        blue: 0.03,
        alpha: 1.0,
    };
    const HOVERED: LinearRgba = highlight_emissive(ORIGINAL, HighlightState::Hovered);
    const SELECTED: LinearRgba = highlight_emissive(ORIGINAL, HighlightState::Selected);

    // OrthoCamera maps the 800x600 surface onto x in [-40, 40], y in [-30, 30].
    const EARTH_PX: Vec2 = Vec2::new(400.0, 300.0);
    const MARS_PX: Vec2 = Vec2::new(600.0, 300.0);
    const EMPTY_PX: Vec2 = Vec2::new(100.0, 100.0);

    struct Harness {
        manager: Manager,
        clock: ManualClock,
        camera: RecordingCameraController,
        control: RecordingControlPanel,
        info: RecordingInfoPanel,
        errors: RecordingErrorHandler,
    }

    fn harness_with(config: InteractionConfig) -> Harness {
        let mut scene = FakeScene::default();
        scene.add_planet(EARTH, Vec3::ZERO, 2.0, ORIGINAL);
        scene.add_planet(MARS, Vec3::new(20.0, 0.0, 0.0), 2.0, ORIGINAL);

        let clock = ManualClock::new(10_000.0);
        let camera = RecordingCameraController::default();
        let control = RecordingControlPanel::default();
        let info = RecordingInfoPanel::default();
        let errors = RecordingErrorHandler::default();

        let factory_panel = info.clone();
        let mut manager = Manager::builder()
            .scene(scene)
            .camera(OrthoCamera::default())
            .surface(FakeSurface::default())
            .config(config)
            .planets([(EARTH, planet("Earth")), (MARS, planet("Mars"))])
            .camera_controller(camera.clone())
            .control_panel(control.clone())
            .info_panel_factory(move || Box::new(factory_panel) as Box<dyn InfoPanel>)
            .error_handler(errors.clone())
            .clock(clock.clone())
            .build()
            .unwrap();
        manager.init().unwrap();

        Harness {
            manager,
            clock,
            camera,
            control,
            info,
            errors,
        }
    }

    fn harness() -> Harness {
        harness_with(InteractionConfig::default())
    }

    fn click(h: &mut Harness, position: Vec2) {
        let timestamp_ms = h.clock.now_ms();
        h.manager.handle_input(InputEvent::Click {
            position,
            timestamp_ms,
        });
    }

    #[test]
    fn test_build_reports_missing_handles() {
        let result = Manager::builder().scene(FakeScene::default()).build();
        match result {
            Err(InteractionError::Configuration { missing }) => {
                assert_eq!(missing, vec!["camera", "surface"]);
            }
            _ => panic!("expected configuration error"),
        }
    }

    #[test]
    fn test_configuration_error_message() {
        let err = InteractionError::Configuration {
            missing: vec!["scene"],
        };
        assert!(err.to_string().contains("requires scene, camera, and surface"));
    }

    #[test]
    fn test_init_registers_every_listener_once() {
        let mut h = harness();
        assert!(h.manager.is_initialized());
        assert_eq!(h.manager.listener_count(), LISTENED_EVENTS.len());
        assert!(h.manager.tooltip().is_some());

        h.manager.init().unwrap();
        assert_eq!(h.manager.surface().attached(), LISTENED_EVENTS.len());
        assert_eq!(calls(&h.info.log), vec!["init"]);
    }

    #[test]
    fn test_init_failure_keeps_partial_registrations() {
        let mut surface = FakeSurface::default();
        surface.fail_on = Some(InputEventKind::KeyDown);
        let errors = RecordingErrorHandler::default();

        let mut manager = Manager::builder()
            .scene(FakeScene::default())
            .camera(OrthoCamera::default())
            .surface(surface)
            .error_handler(errors.clone())
            .build()
            .unwrap();

        let err = manager.init().unwrap_err();
        assert!(matches!(err, InteractionError::Initialization(_)));
        assert!(!manager.is_initialized());
        assert_eq!(manager.listener_count(), 5);
        assert_eq!(errors.errors(), vec!["error:InteractionManager::init"]);

        manager.dispose();
        assert_eq!(manager.listener_count(), 0);
        assert_eq!(manager.surface().attached(), 0);
    }

    #[test]
    fn test_info_panel_init_failure_is_wrapped() {
        let info = RecordingInfoPanel {
            fail_init: true,
            ..Default::default()
        };
        let mut manager = Manager::builder()
            .scene(FakeScene::default())
            .camera(OrthoCamera::default())
            .surface(FakeSurface::default())
            .info_panel_factory(move || Box::new(info) as Box<dyn InfoPanel>)
            .error_handler(RecordingErrorHandler::default())
            .build()
            .unwrap();

        let err = manager.init().unwrap_err();
        let source = std::error::Error::source(&err).unwrap().to_string();
        assert!(source.contains("template missing"));
    }

    #[test]
    fn test_events_ignored_before_init() {
        let mut manager = Manager::builder()
            .scene(FakeScene::default())
            .camera(OrthoCamera::default())
            .surface(FakeSurface::default())
            .planets([(EARTH, planet("Earth"))])
            .build()
            .unwrap();
        manager.handle_input(InputEvent::Click {
            position: EARTH_PX,
            timestamp_ms: 0.0,
        });
        assert!(manager.selected_planet().is_none());
    }

    #[test]
    fn test_hover_highlights_and_sets_pointer_cursor() {
        let mut h = harness();
        h.manager
            .handle_input(InputEvent::PointerMove { position: EARTH_PX });

        assert_eq!(h.manager.hovered_planet().unwrap().name, "Earth");
        assert_eq!(h.manager.scene().emissive_of(EARTH), Some(HOVERED));
        assert_eq!(h.manager.surface().cursor, CursorStyle::Pointer);

        h.manager
            .handle_input(InputEvent::PointerMove { position: EMPTY_PX });
        assert!(h.manager.hovered_planet().is_none());
        assert_eq!(h.manager.scene().emissive_of(EARTH), Some(ORIGINAL));
        assert_eq!(h.manager.surface().cursor, CursorStyle::Default);
    }

    #[test]
    fn test_moving_within_same_planet_does_not_rewrite() {
        let mut h = harness();
        h.manager
            .handle_input(InputEvent::PointerMove { position: EARTH_PX });
        h.manager.handle_input(InputEvent::PointerMove {
            position: EARTH_PX + Vec2::new(3.0, 0.0),
        });
        assert_eq!(h.manager.scene().writes_for(EARTH), 1);
    }

    #[test]
    fn test_tooltip_shows_after_delay_for_same_planet() {
        let mut h = harness();
        h.manager
            .handle_input(InputEvent::PointerMove { position: EARTH_PX });

        h.clock.advance(499.0);
        h.manager.tick();
        assert!(!h.manager.is_tooltip_visible());

        h.clock.advance(1.0);
        h.manager.tick();
        assert!(h.manager.is_tooltip_visible());
        let tooltip = h.manager.tooltip().unwrap();
        assert_eq!(tooltip.title, "Earth");
        assert_eq!(tooltip.position, Vec2::new(410.0, 300.0 - tooltip.size().y - 10.0));
    }

    #[test]
    fn test_hover_change_cancels_pending_tooltip() {
        let mut h = harness();
        h.manager
            .handle_input(InputEvent::PointerMove { position: EARTH_PX });
        h.clock.advance(300.0);
        h.manager
            .handle_input(InputEvent::PointerMove { position: EMPTY_PX });
        h.clock.advance(1000.0);
        h.manager.tick();
        assert!(!h.manager.is_tooltip_visible());
    }

    #[test]
    fn test_tooltips_disabled() {
        let mut h = harness_with(InteractionConfig {
            enable_tooltips: false,
            ..Default::default()
        });
        h.manager
            .handle_input(InputEvent::PointerMove { position: EARTH_PX });
        h.clock.advance(1000.0);
        h.manager.tick();
        assert!(!h.manager.is_tooltip_visible());
        assert_eq!(h.manager.scene().emissive_of(EARTH), Some(HOVERED));
    }

    #[test]
    fn test_single_click_selects_and_shows_info() {
        let mut h = harness();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        h.manager
            .events_mut()
            .subscribe(PlanetEventKind::PlanetSelected, move |e| {
                sink.lock().unwrap().push(e.clone());
            });

        click(&mut h, EARTH_PX);

        assert_eq!(h.manager.selected_planet().unwrap().name, "Earth");
        assert_eq!(h.manager.scene().emissive_of(EARTH), Some(SELECTED));
        assert_eq!(calls(&h.control.log), vec!["selected:Earth"]);
        assert_eq!(calls(&h.info.log), vec!["init", "show:Earth"]);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![PlanetEvent::PlanetSelected(planet("Earth"))]
        );
    }

    #[test]
    fn test_selecting_other_planet_reverts_previous_once() {
        let mut h = harness();
        click(&mut h, EARTH_PX);
        h.clock.advance(1000.0);
        click(&mut h, MARS_PX);

        assert_eq!(h.manager.scene().emissive_of(EARTH), Some(ORIGINAL));
        assert_eq!(h.manager.scene().emissive_of(MARS), Some(SELECTED));
        assert_eq!(h.manager.scene().writes_for(EARTH), 2);
        assert_eq!(h.manager.scene().writes_for(MARS), 1);
    }

    #[test]
    fn test_reselecting_does_not_reapply_effect() {
        let mut h = harness();
        h.manager.select_planet(&planet("Earth"));
        h.manager.select_planet(&planet("Earth"));
        assert_eq!(h.manager.scene().writes_for(EARTH), 1);
        assert_eq!(h.manager.highlight_state("Earth"), HighlightState::Selected);
    }

    #[test]
    fn test_selected_planet_keeps_highlight_while_hovered() {
        let mut h = harness();
        click(&mut h, EARTH_PX);
        h.manager
            .handle_input(InputEvent::PointerMove { position: EARTH_PX });
        h.manager
            .handle_input(InputEvent::PointerMove { position: EMPTY_PX });
        assert_eq!(h.manager.scene().emissive_of(EARTH), Some(SELECTED));
    }

    #[test]
    fn test_deselect_returns_hovered_planet_to_hover_color() {
        let mut h = harness();
        h.manager
            .handle_input(InputEvent::PointerMove { position: EARTH_PX });
        click(&mut h, EARTH_PX);
        h.manager.handle_input(InputEvent::KeyDown(Key::Escape));
        assert_eq!(h.manager.scene().emissive_of(EARTH), Some(HOVERED));
    }

    #[test]
    fn test_click_on_empty_space_deselects() {
        let mut h = harness();
        click(&mut h, EARTH_PX);
        h.clock.advance(1000.0);
        click(&mut h, EMPTY_PX);

        assert!(h.manager.selected_planet().is_none());
        assert_eq!(calls(&h.control.log), vec!["selected:Earth", "selected:None"]);
        assert_eq!(calls(&h.info.log), vec!["init", "show:Earth", "hide"]);
    }

    #[test]
    fn test_double_click_focuses_once() {
        let mut h = harness();
        click(&mut h, EARTH_PX);
        h.clock.advance(150.0);
        click(&mut h, EARTH_PX);

        assert_eq!(calls(&h.camera.log), vec!["focus:Earth"]);
        assert_eq!(
            calls(&h.control.log),
            vec!["selected:Earth", "selected:Earth", "distance:25"]
        );
    }

    #[test]
    fn test_slow_second_click_is_single() {
        let mut h = harness();
        click(&mut h, EARTH_PX);
        h.clock.advance(300.0);
        click(&mut h, EARTH_PX);
        assert!(calls(&h.camera.log).is_empty());
    }

    #[test]
    fn test_double_click_disabled() {
        let mut h = harness_with(InteractionConfig {
            enable_double_click: false,
            ..Default::default()
        });
        click(&mut h, EARTH_PX);
        h.clock.advance(50.0);
        click(&mut h, EARTH_PX);
        assert!(calls(&h.camera.log).is_empty());
    }

    #[test]
    fn test_selection_disabled_ignores_clicks() {
        let mut h = harness_with(InteractionConfig {
            enable_planet_selection: false,
            ..Default::default()
        });
        click(&mut h, EARTH_PX);
        assert!(h.manager.selected_planet().is_none());
    }

    #[test]
    fn test_focus_debounce() {
        let mut h = harness();
        let earth = planet("Earth");

        assert_eq!(h.manager.focus_and_follow(&earth), FocusOutcome::Delegated);
        h.clock.advance(200.0);
        assert_eq!(h.manager.focus_and_follow(&earth), FocusOutcome::Debounced);
        h.clock.advance(400.0);
        assert_eq!(h.manager.focus_and_follow(&earth), FocusOutcome::Delegated);

        assert_eq!(calls(&h.camera.log), vec!["focus:Earth", "focus:Earth"]);
    }

    #[test]
    fn test_focus_different_planets_never_debounced() {
        let mut h = harness();
        h.manager.focus_and_follow(&planet("Earth"));
        h.manager.focus_and_follow(&planet("Mars"));
        assert_eq!(calls(&h.camera.log), vec!["focus:Earth", "focus:Mars"]);
    }

    #[test]
    fn test_reset_focus_debounce() {
        let mut h = harness();
        let earth = planet("Earth");
        h.manager.focus_and_follow(&earth);
        h.manager.reset_focus_debounce();
        assert_eq!(h.manager.focus_and_follow(&earth), FocusOutcome::Delegated);
    }

    #[test]
    fn test_focus_without_controller_or_planet() {
        let mut h = harness();
        assert_eq!(
            h.manager.focus_and_follow(&planet("Vulcan")),
            FocusOutcome::UnknownPlanet
        );

        h.manager.scene_mut().remove_planet(MARS);
        assert_eq!(
            h.manager.focus_and_follow(&planet("Mars")),
            FocusOutcome::UnknownPlanet
        );

        h.manager.set_camera_controller(None);
        assert_eq!(
            h.manager.focus_and_follow(&planet("Earth")),
            FocusOutcome::NoController
        );
        assert!(calls(&h.errors.log).iter().any(|c| c.starts_with("Warn:")));
    }

    #[test]
    fn test_escape_clears_selection_and_hides_once() {
        let mut h = harness();
        click(&mut h, EARTH_PX);
        h.manager.handle_input(InputEvent::KeyDown(Key::Escape));

        assert!(h.manager.selected_planet().is_none());
        assert!(!h.manager.is_tooltip_visible());
        assert_eq!(calls(&h.info.log), vec!["init", "show:Earth", "hide"]);
    }

    #[test]
    fn test_key_i_toggles_only_with_selection() {
        let mut h = harness();
        h.manager.handle_input(InputEvent::KeyDown(Key::KeyI));
        click(&mut h, EARTH_PX);
        h.manager.handle_input(InputEvent::KeyDown(Key::KeyI));
        h.manager.handle_input(InputEvent::KeyDown(Key::Other));
        assert_eq!(calls(&h.info.log), vec!["init", "show:Earth", "toggle"]);
    }

    #[test]
    fn test_single_touch_end_selects() {
        let mut h = harness();
        h.manager.handle_input(InputEvent::TouchStart {
            position: EARTH_PX,
            touch_count: 1,
        });
        h.manager.handle_input(InputEvent::TouchEnd {
            position: EARTH_PX,
            touch_count: 1,
        });
        assert_eq!(h.manager.selected_planet().unwrap().name, "Earth");

        h.manager.handle_input(InputEvent::TouchEnd {
            position: EARTH_PX,
            touch_count: 1,
        });
        assert!(calls(&h.camera.log).is_empty());

        h.manager.handle_input(InputEvent::TouchEnd {
            position: EMPTY_PX,
            touch_count: 2,
        });
        assert!(h.manager.selected_planet().is_some());
    }

    #[test]
    fn test_resize_hides_tooltip() {
        let mut h = harness();
        h.manager
            .handle_input(InputEvent::PointerMove { position: EARTH_PX });
        h.clock.advance(600.0);
        h.manager.tick();
        assert!(h.manager.is_tooltip_visible());

        h.manager.handle_input(InputEvent::Resize);
        assert!(!h.manager.is_tooltip_visible());
        assert!(!h.manager.tooltip().unwrap().visible);
    }

    #[test]
    fn test_show_and_hide_planet_info_forwarded() {
        let mut h = harness();
        h.manager
            .handle_input(InputEvent::ShowPlanetInfo(planet("Mars")));
        h.manager.handle_input(InputEvent::HidePlanetInfo);
        assert_eq!(calls(&h.info.log), vec!["init", "show:Mars", "hide"]);
    }

    #[test]
    fn test_missing_planet_in_registry_is_tolerated() {
        let mut h = harness();
        h.manager.select_planet(&planet("Vulcan"));
        assert_eq!(h.manager.selected_planet().unwrap().name, "Vulcan");
        assert!(h.manager.deselect_planet());
        assert!(h.manager.scene().writes().is_empty());
    }

    #[test]
    fn test_dispose_is_idempotent_and_restores_visuals() {
        let mut h = harness();
        click(&mut h, EARTH_PX);
        h.manager.dispose();
        h.manager.dispose();

        assert!(!h.manager.is_initialized());
        assert_eq!(h.manager.listener_count(), 0);
        assert_eq!(h.manager.surface().attached(), 0);
        assert_eq!(h.manager.surface().removed.len(), LISTENED_EVENTS.len());
        assert_eq!(h.manager.planet_count(), 0);
        assert!(h.manager.tooltip().is_none());
        assert!(h.manager.selected_planet().is_none());
        assert_eq!(h.manager.scene().emissive_of(EARTH), Some(ORIGINAL));
        assert_eq!(
            calls(&h.info.log).iter().filter(|c| *c == "dispose").count(),
            1
        );
    }

    #[test]
    fn test_dispose_without_init() {
        let mut manager = Manager::builder()
            .scene(FakeScene::default())
            .camera(OrthoCamera::default())
            .surface(FakeSurface::default())
            .build()
            .unwrap();
        manager.dispose();
        assert_eq!(manager.listener_count(), 0);
    }

    #[test]
    fn test_borrowed_info_panel_not_disposed() {
        let info = RecordingInfoPanel::default();
        let mut manager = Manager::builder()
            .scene(FakeScene::default())
            .camera(OrthoCamera::default())
            .surface(FakeSurface::default())
            .info_panel(info.clone())
            .build()
            .unwrap();
        manager.init().unwrap();
        manager.dispose();
        assert!(calls(&info.log).is_empty());
    }

    #[test]
    fn test_pointer_leave_clears_hover() {
        let mut h = harness();
        h.manager
            .handle_input(InputEvent::PointerMove { position: EARTH_PX });
        h.manager.handle_input(InputEvent::PointerLeave);
        assert!(h.manager.hovered_planet().is_none());
        assert_eq!(h.manager.scene().emissive_of(EARTH), Some(ORIGINAL));
    }
}
