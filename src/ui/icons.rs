//! Phosphor icon definitions for the UI.
//!
//! The font is installed by `setup_ui_style` on the first egui pass.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

/// Set once the icon font and panel visuals are installed.
#[derive(Resource, Default)]
pub struct UiStyleReady(pub bool);

/// Panel fill over the starfield.
const PANEL_FILL: egui::Color32 = egui::Color32::from_rgba_premultiplied(12, 16, 28, 220);

/// Installs the Phosphor font and the translucent dark panel style.
pub fn setup_ui_style(mut contexts: EguiContexts, mut ready: ResMut<UiStyleReady>) {
    if ready.0 {
        return;
    }
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
    ctx.set_fonts(fonts);

    let mut visuals = egui::Visuals::dark();
    visuals.window_fill = PANEL_FILL;
    visuals.panel_fill = PANEL_FILL;
    ctx.set_visuals(visuals);

    ready.0 = true;
    debug!("UI style installed");
}

// Browse all icons at https://phosphoricons.com/

pub const PLAY: &str = egui_phosphor::regular::PLAY;
pub const PAUSE: &str = egui_phosphor::regular::PAUSE;
pub const CLOSE: &str = egui_phosphor::regular::X;
pub const INFO: &str = egui_phosphor::regular::INFO;
/// Focus camera on a planet
pub const TARGET: &str = egui_phosphor::regular::CROSSHAIR;
pub const CAMERA: &str = egui_phosphor::regular::VIDEO_CAMERA;
pub const EXPAND: &str = egui_phosphor::regular::CARET_DOWN;
pub const COLLAPSE: &str = egui_phosphor::regular::CARET_UP;

// Celestial bodies
pub const SUN: &str = egui_phosphor::regular::SUN;
pub const PLANET: &str = egui_phosphor::regular::GLOBE;
pub const STARS: &str = egui_phosphor::regular::SPARKLE;
pub const NEBULA: &str = egui_phosphor::regular::CLOUD;
pub const ASTEROID: &str = egui_phosphor::regular::ASTERISK;
pub const ORBIT: &str = egui_phosphor::regular::PATH;

// Info panel sections
pub const RULER: &str = egui_phosphor::regular::RULER;
pub const LIGHTBULB: &str = egui_phosphor::regular::LIGHTBULB;
pub const ROCKET: &str = egui_phosphor::regular::ROCKET;
/// Performance mode
pub const GAUGE: &str = egui_phosphor::regular::GAUGE;

/// Icon for a planet row in lists.
pub fn body_icon(name: &str) -> &'static str {
    if name == crate::catalog::SUN {
        SUN
    } else {
        PLANET
    }
}
