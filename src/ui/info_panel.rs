//! Info panel showing details of the selected planet.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use super::icons;
use crate::catalog::PlanetCatalog;
use crate::info::InfoContent;
use crate::interaction::collaborators::{CollaboratorError, InfoPanel};
use crate::interaction::plugin::HidePlanetInfo;
use crate::types::PlanetData;

/// What the info panel currently shows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InfoPanelModel {
    pub initialized: bool,
    pub visible: bool,
    pub planet: Option<PlanetData>,
    pub disposed: bool,
}

/// Info panel state shared between the interaction manager and the UI.
#[derive(Resource, Clone, Default)]
pub struct SharedInfoPanel(Arc<Mutex<InfoPanelModel>>);

impl SharedInfoPanel {
    fn lock(&self) -> MutexGuard<'_, InfoPanelModel> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> InfoPanelModel {
        self.lock().clone()
    }
}

impl InfoPanel for SharedInfoPanel {
    fn init(&mut self) -> Result<(), CollaboratorError> {
        let mut model = self.lock();
        if model.disposed {
            return Err(CollaboratorError::new("info panel", "panel was disposed"));
        }
        model.initialized = true;
        Ok(())
    }

    fn show(&mut self, planet: &PlanetData) {
        let mut model = self.lock();
        model.planet = Some(planet.clone());
        model.visible = true;
    }

    fn hide(&mut self) {
        self.lock().visible = false;
    }

    fn toggle(&mut self) {
        let mut model = self.lock();
        if model.planet.is_some() {
            model.visible = !model.visible;
        }
    }

    fn dispose(&mut self) {
        *self.lock() = InfoPanelModel {
            disposed: true,
            ..Default::default()
        };
    }
}

/// System that renders the info panel.
pub fn info_panel(
    mut contexts: EguiContexts,
    panel: Res<SharedInfoPanel>,
    catalog: Res<PlanetCatalog>,
    mut hide: MessageWriter<HidePlanetInfo>,
) {
    let model = panel.snapshot();
    let (true, Some(planet)) = (model.visible, model.planet) else {
        return;
    };

    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    let content = InfoContent::build(&planet, &catalog);
    let panel_frame = egui::Frame::NONE
        .fill(egui::Color32::from_rgba_unmultiplied(20, 20, 30, 230))
        .inner_margin(egui::Margin::same(12));

    egui::SidePanel::right("info_panel")
        .resizable(false)
        .default_width(280.0)
        .frame(panel_frame)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(format!(
                    "{} {}",
                    icons::body_icon(&planet.name),
                    content.summary.title
                ));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .button(icons::CLOSE)
                        .on_hover_text("Close (Esc)")
                        .clicked()
                    {
                        hide.write(HidePlanetInfo);
                    }
                });
            });
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                render_content(ui, &content);
            });
        });
}

fn render_content(ui: &mut egui::Ui, content: &InfoContent) {
    egui::Grid::new("planet_summary")
        .num_columns(2)
        .spacing([12.0, 4.0])
        .show(ui, |ui| {
            for (label, value) in &content.summary.rows {
                ui.label(egui::RichText::new(*label).weak());
                ui.label(value);
                ui.end_row();
            }
        });

    if let Some(composition) = &content.summary.composition {
        ui.add_space(6.0);
        ui.label(egui::RichText::new("Composition").strong());
        ui.label(composition);
    }
    if let Some(atmosphere) = &content.summary.atmosphere {
        ui.add_space(6.0);
        ui.label(egui::RichText::new("Atmosphere").strong());
        ui.label(atmosphere);
    }

    if !content.comparison.is_empty() {
        ui.add_space(8.0);
        ui.label(egui::RichText::new(format!("{} Compared to Earth", icons::RULER)).strong());
        egui::Grid::new("earth_comparison")
            .num_columns(2)
            .show(ui, |ui| {
                for (label, value) in &content.comparison {
                    ui.label(egui::RichText::new(*label).weak());
                    ui.label(value);
                    ui.end_row();
                }
            });
    }

    if !content.facts.is_empty() {
        ui.add_space(8.0);
        ui.label(egui::RichText::new(format!("{} Did you know?", icons::LIGHTBULB)).strong());
        for fact in &content.facts {
            ui.label(format!("• {fact}"));
        }
    }

    ui.add_space(8.0);
    ui.label(egui::RichText::new(format!("{} Exploration", icons::ROCKET)).strong());
    ui.label(content.exploration);
}
