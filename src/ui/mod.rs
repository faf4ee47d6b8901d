//! UI module providing the egui-based interface.
//!
//! Panels read shared models written by the interaction manager and send
//! requests back as messages or direct calls on the manager resource.

mod control_panel;
pub mod icons;
mod info_panel;
mod tooltip;

use bevy::prelude::*;
use bevy_egui::{EguiPlugin, EguiPrimaryContextPass};

use crate::catalog::PlanetCatalog;
use crate::interaction::plugin::{HidePlanetInfo, PointerCapture, ShowPlanetInfo};
use crate::render::OrbitPathSettings;
use crate::time::OrbitTime;

pub use control_panel::{ControlPanelModel, ControlPanelState, SharedControlPanel};
pub use info_panel::{InfoPanelModel, SharedInfoPanel};

/// Plugin that adds all UI systems.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        if !app.is_plugin_added::<EguiPlugin>() {
            app.add_plugins(EguiPlugin::default());
        }

        // Shared with the render and interaction plugins; init is a no-op
        // when they are already present.
        app.init_resource::<PlanetCatalog>()
            .init_resource::<OrbitTime>()
            .init_resource::<OrbitPathSettings>()
            .add_message::<ShowPlanetInfo>()
            .add_message::<HidePlanetInfo>()
            .init_resource::<PointerCapture>()
            .init_resource::<icons::UiStyleReady>()
            .init_resource::<SharedInfoPanel>()
            .init_resource::<SharedControlPanel>()
            .init_resource::<ControlPanelState>()
            // Panels draw icons, so the style goes in first.
            .add_systems(EguiPrimaryContextPass, icons::setup_ui_style)
            .add_systems(
                EguiPrimaryContextPass,
                (
                    tooltip::pointer_feedback,
                    tooltip::tooltip_system,
                    control_panel::control_panel,
                    info_panel::info_panel,
                )
                    .chain()
                    .after(icons::setup_ui_style)
                    .run_if(|ready: Res<icons::UiStyleReady>| ready.0),
            );
    }
}
