//! Control panel: selection and camera status, system overview, planet
//! list, particle toggles, performance mode and animation speed.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use super::icons;
use crate::camera::OrbitCameraController;
use crate::catalog::{PlanetCatalog, SUN, SystemStats};
use crate::interaction::collaborators::ControlPanel;
use crate::interaction::plugin::{PlanetInteraction, ShowPlanetInfo};
use crate::particles::plugin::Particles;
use crate::particles::{AsteroidBelt, Nebula, Starfield};
use crate::render::OrbitPathSettings;
use crate::time::OrbitTime;
use crate::types::PlanetData;

/// Animation speeds offered in the panel.
const SPEEDS: [f64; 4] = [0.25, 1.0, 4.0, 16.0];

/// Values pushed into the panel by the interaction manager.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ControlPanelModel {
    pub selected_planet: Option<String>,
    /// Follow distance of the last camera focus.
    pub camera_distance: Option<f32>,
}

/// Control panel state shared between the interaction manager and the UI.
#[derive(Resource, Clone, Default)]
pub struct SharedControlPanel(Arc<Mutex<ControlPanelModel>>);

impl SharedControlPanel {
    fn lock(&self) -> MutexGuard<'_, ControlPanelModel> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> ControlPanelModel {
        self.lock().clone()
    }
}

impl ControlPanel for SharedControlPanel {
    fn update_selected_planet(&mut self, name: Option<&str>) {
        self.lock().selected_planet = name.map(str::to_string);
    }

    fn update_camera_distance(&mut self, distance: f32) {
        self.lock().camera_distance = Some(distance);
    }
}

/// Whether the panel body is expanded.
#[derive(Resource)]
pub struct ControlPanelState {
    pub expanded: bool,
}

impl Default for ControlPanelState {
    fn default() -> Self {
        Self { expanded: true }
    }
}

/// Label and icon for a particle system row.
fn system_label(name: &str) -> String {
    match name {
        Starfield::NAME => format!("{} Starfield", icons::STARS),
        Nebula::NAME => format!("{} Nebula", icons::NEBULA),
        AsteroidBelt::NAME => format!("{} Asteroid belt", icons::ASTEROID),
        other => other.to_string(),
    }
}

/// One-line summary of the catalog counts.
fn system_overview(stats: &SystemStats) -> String {
    format!(
        "{} planets: {} terrestrial, {} gas giants, {} ice giants, {} dwarf. {} known moons.",
        stats.total_planets,
        stats.terrestrial,
        stats.gas_giants,
        stats.ice_giants,
        stats.dwarf_planets,
        stats.total_moons
    )
}

/// Catalog bodies grouped under headings, empty groups dropped.
fn planet_groups(catalog: &PlanetCatalog) -> Vec<(&'static str, Vec<&PlanetData>)> {
    [
        ("Star", catalog.get(SUN).into_iter().collect()),
        ("Terrestrial planets", catalog.terrestrial()),
        ("Gas giants", catalog.gas_giants()),
        ("Ice giants", catalog.ice_giants()),
        ("Dwarf planets", catalog.dwarf_planets()),
    ]
    .into_iter()
    .filter(|(_, planets)| !planets.is_empty())
    .collect()
}

/// System that renders the control panel.
pub fn control_panel(
    mut contexts: EguiContexts,
    panel: Res<SharedControlPanel>,
    mut state: ResMut<ControlPanelState>,
    catalog: Res<PlanetCatalog>,
    camera: Option<Res<OrbitCameraController>>,
    mut interaction: Option<ResMut<PlanetInteraction>>,
    mut particles: Option<ResMut<Particles>>,
    mut orbit_paths: ResMut<OrbitPathSettings>,
    mut orbit_time: ResMut<OrbitTime>,
    mut show_info: MessageWriter<ShowPlanetInfo>,
) {
    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };
    let model = panel.snapshot();

    egui::Window::new("Solar System")
        .anchor(egui::Align2::LEFT_TOP, [12.0, 12.0])
        .resizable(false)
        .collapsible(false)
        .default_width(230.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!(
                    "{} {}",
                    icons::TARGET,
                    model.selected_planet.as_deref().unwrap_or("No selection")
                ));
                let toggle = if state.expanded { icons::COLLAPSE } else { icons::EXPAND };
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button(toggle).clicked() {
                        state.expanded = !state.expanded;
                    }
                });
            });

            if let Some(camera) = &camera {
                let following = camera.following();
                ui.horizontal(|ui| {
                    ui.label(format!(
                        "{} {:.1} units{}",
                        icons::CAMERA,
                        camera.distance(),
                        following
                            .as_ref()
                            .map(|n| format!(" (following {n})"))
                            .unwrap_or_default()
                    ));
                    if following.is_some()
                        && ui
                            .small_button(icons::CLOSE)
                            .on_hover_text("Stop following")
                            .clicked()
                    {
                        camera.stop_following();
                    }
                });
            }
            if let Some(distance) = model.camera_distance {
                ui.label(egui::RichText::new(format!("Follow distance {distance:.1}")).weak());
            }

            if !state.expanded {
                return;
            }
            ui.separator();

            ui.label(egui::RichText::new(system_overview(&catalog.system_stats())).small());

            // Planet list: name selects and focuses, info button opens the panel.
            for (heading, planets) in planet_groups(&catalog) {
                ui.label(egui::RichText::new(heading).weak());
                for planet in planets {
                    ui.horizontal(|ui| {
                        let selected = model.selected_planet.as_deref() == Some(planet.name.as_str());
                        let label = format!("{} {}", icons::body_icon(&planet.name), planet.name);
                        if ui.selectable_label(selected, label).clicked()
                            && let Some(interaction) = interaction.as_mut()
                        {
                            interaction.0.select_planet(planet);
                            interaction.0.focus_and_follow(planet);
                        }
                        if ui
                            .small_button(icons::INFO)
                            .on_hover_text("Show details")
                            .clicked()
                        {
                            show_info.write(ShowPlanetInfo(planet.clone()));
                        }
                    });
                }
            }

            ui.separator();
            ui.checkbox(&mut orbit_paths.visible, format!("{} Orbit paths", icons::ORBIT));

            if let Some(particles) = particles.as_mut() {
                let stats = particles.0.get_stats();
                for system in &stats.systems {
                    let mut visible = system.visible;
                    if ui
                        .checkbox(&mut visible, system_label(system.name))
                        .on_hover_text(format!("{} particles", system.particle_count))
                        .changed()
                    {
                        particles.0.set_system_visible(system.name, visible);
                    }
                }

                if let Some(nebula) = particles.0.system(Nebula::NAME) {
                    let mut opacity = nebula.style().opacity;
                    if ui
                        .add(egui::Slider::new(&mut opacity, 0.0..=1.0).text("Nebula opacity"))
                        .changed()
                    {
                        particles.0.set_system_opacity(Nebula::NAME, opacity);
                    }
                }

                let mut performance = stats.performance_mode;
                if ui
                    .checkbox(&mut performance, format!("{} Performance mode", icons::GAUGE))
                    .changed()
                {
                    particles.0.set_performance_mode(performance);
                }
                ui.label(
                    egui::RichText::new(format!("{} particles", stats.total_particles)).weak(),
                );
            }

            ui.separator();
            ui.horizontal(|ui| {
                let icon = if orbit_time.paused { icons::PLAY } else { icons::PAUSE };
                if ui
                    .button(icon)
                    .on_hover_text(if orbit_time.paused { "Play" } else { "Pause" })
                    .clicked()
                {
                    orbit_time.paused = !orbit_time.paused;
                }
                for speed in SPEEDS {
                    let is_selected = (orbit_time.scale - speed).abs() < 0.01;
                    if ui.selectable_label(is_selected, format!("{speed}x")).clicked() {
                        orbit_time.scale = speed;
                    }
                }
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_tracks_updates() {
        let mut panel = SharedControlPanel::default();
        panel.update_selected_planet(Some("Mars"));
        panel.update_camera_distance(12.5);
        assert_eq!(
            panel.snapshot(),
            ControlPanelModel {
                selected_planet: Some("Mars".into()),
                camera_distance: Some(12.5),
            }
        );

        panel.update_selected_planet(None);
        assert_eq!(panel.snapshot().selected_planet, None);
    }

    #[test]
    fn test_planet_groups_cover_every_body_once() {
        let catalog = PlanetCatalog::solar_system();
        let groups = planet_groups(&catalog);
        let headings: Vec<&str> = groups.iter().map(|(h, _)| *h).collect();
        assert_eq!(
            headings,
            ["Star", "Terrestrial planets", "Gas giants", "Ice giants", "Dwarf planets"]
        );

        let mut listed: Vec<&str> = groups
            .iter()
            .flat_map(|(_, planets)| planets.iter().map(|p| p.name.as_str()))
            .collect();
        listed.sort_unstable();
        let mut all: Vec<&str> = catalog.ordered().iter().map(|p| p.name.as_str()).collect();
        all.sort_unstable();
        assert_eq!(listed, all);
    }

    #[test]
    fn test_system_overview_counts() {
        let text = system_overview(&PlanetCatalog::solar_system().system_stats());
        assert!(text.starts_with("9 planets: 4 terrestrial, 2 gas giants, 2 ice giants, 1 dwarf."));
        assert!(text.ends_with("293 known moons."));
    }

    #[test]
    fn test_system_labels() {
        assert!(system_label(Starfield::NAME).ends_with("Starfield"));
        assert_eq!(system_label("comets"), "comets");
    }
}
