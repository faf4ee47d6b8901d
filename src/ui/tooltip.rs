//! Hover tooltip, pointer cursor and pointer capture.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use crate::interaction::collaborators::CursorStyle;
use crate::interaction::plugin::{PlanetInteraction, PointerCapture};

/// Draw the tooltip the interaction manager placed, if visible.
pub fn tooltip_system(mut contexts: EguiContexts, interaction: Option<Res<PlanetInteraction>>) {
    let Some(interaction) = interaction else {
        return;
    };
    let Some(tooltip) = interaction.0.tooltip().filter(|t| t.visible) else {
        return;
    };
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    let size = tooltip.size();
    egui::Area::new(egui::Id::new("planet_tooltip"))
        .order(egui::Order::Tooltip)
        .fixed_pos(egui::pos2(tooltip.position.x, tooltip.position.y))
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.set_width(size.x - 16.0);
                ui.label(egui::RichText::new(&tooltip.title).strong());
                for line in &tooltip.lines {
                    ui.label(egui::RichText::new(line).small());
                }
            });
        });
}

/// Show a pointing hand over planets and tell the scene input systems when
/// egui owns the pointer.
pub fn pointer_feedback(
    mut contexts: EguiContexts,
    mut capture: ResMut<PointerCapture>,
    interaction: Option<Res<PlanetInteraction>>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    capture.0 = ctx.wants_pointer_input() || ctx.is_pointer_over_area();

    let over_planet = interaction
        .is_some_and(|i| i.0.surface().cursor == CursorStyle::Pointer);
    if over_planet && !capture.0 {
        ctx.set_cursor_icon(egui::CursorIcon::PointingHand);
    }
}
