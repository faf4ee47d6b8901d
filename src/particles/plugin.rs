//! Bevy glue for the particle systems.
//!
//! Each attached cloud becomes one point-list mesh entity. Buffers are
//! re-uploaded only when a generator marks them dirty.

use std::collections::HashMap;

use bevy::asset::RenderAssetUsages;
use bevy::mesh::PrimitiveTopology;
use bevy::prelude::*;

use super::{
    BeltReferences, ParticleBuffers, ParticleError, ParticleManager, ParticleManagerConfig,
    ParticleScene, PointStyle,
};
use crate::diagnostics::TracingErrorHandler;
use crate::render::PlanetBody;

/// Bodies bounding the asteroid belt.
pub const BELT_INNER_BODY: &str = "Mars";
pub const BELT_OUTER_BODY: &str = "Jupiter";

/// The live particle manager.
#[derive(Resource)]
pub struct Particles(pub ParticleManager);

/// Marker for a point cloud entity.
#[derive(Component, Clone, Debug)]
pub struct ParticleCloud {
    pub name: String,
}

/// Point cloud entities by system name.
#[derive(Resource, Default, Debug)]
pub struct ParticleClouds {
    pub entities: HashMap<String, Entity>,
}

/// Point-list mesh with per-vertex colors.
pub fn point_mesh(buffers: &ParticleBuffers) -> Mesh {
    Mesh::new(PrimitiveTopology::PointList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, buffers.position_array())
        .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, buffers.color_array(1.0))
}

pub fn point_material(style: &PointStyle) -> StandardMaterial {
    StandardMaterial {
        base_color: Color::WHITE.with_alpha(style.opacity),
        unlit: true,
        alpha_mode: if style.additive {
            AlphaMode::Add
        } else {
            AlphaMode::Blend
        },
        ..default()
    }
}

/// [`ParticleScene`] spawning mesh entities through `Commands`.
pub struct BevyParticleScene<'a, 'w, 's> {
    pub commands: &'a mut Commands<'w, 's>,
    pub meshes: &'a mut Assets<Mesh>,
    pub materials: &'a mut Assets<StandardMaterial>,
    pub clouds: &'a mut ParticleClouds,
}

impl ParticleScene for BevyParticleScene<'_, '_, '_> {
    fn attach(
        &mut self,
        name: &str,
        buffers: &ParticleBuffers,
        style: &PointStyle,
    ) -> Result<(), ParticleError> {
        if self.clouds.entities.contains_key(name) {
            return Err(ParticleError::Attach {
                system: name.to_string(),
                reason: "a cloud with this name is already attached".into(),
            });
        }

        let entity = self
            .commands
            .spawn((
                Mesh3d(self.meshes.add(point_mesh(buffers))),
                MeshMaterial3d(self.materials.add(point_material(style))),
                Transform::default(),
                ParticleCloud {
                    name: name.to_string(),
                },
                Name::new(name.to_string()),
            ))
            .id();
        self.clouds.entities.insert(name.to_string(), entity);
        Ok(())
    }

    fn detach(&mut self, name: &str) -> bool {
        match self.clouds.entities.remove(name) {
            Some(entity) => {
                self.commands.entity(entity).despawn();
                true
            }
            None => false,
        }
    }
}

/// Belt bounds from the current positions of the reference planets.
///
/// Returns `None` when neither planet is in the scene so the default band
/// is used.
pub fn belt_references<'a>(
    planets: impl IntoIterator<Item = (&'a PlanetBody, Vec3)>,
) -> Option<BeltReferences> {
    let mut references = BeltReferences::default();
    for (body, position) in planets {
        if body.name == BELT_INNER_BODY {
            references.inner = Some(position);
        } else if body.name == BELT_OUTER_BODY {
            references.outer = Some(position);
        }
    }
    (references.inner.is_some() || references.outer.is_some()).then_some(references)
}

/// Plugin generating and animating the point clouds.
#[derive(Default)]
pub struct ParticlePlugin {
    pub config: ParticleManagerConfig,
}

impl Plugin for ParticlePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone())
            .init_resource::<ParticleClouds>()
            .add_systems(PostStartup, setup_particles)
            .add_systems(Update, update_particles.run_if(resource_exists::<Particles>))
            .add_systems(Last, dispose_on_exit.run_if(resource_exists::<Particles>));
    }
}

fn setup_particles(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut clouds: ResMut<ParticleClouds>,
    config: Res<ParticleManagerConfig>,
    planets: Query<(&PlanetBody, &Transform)>,
) {
    let mut config = config.clone();
    if config.asteroid_belt.references.is_none() {
        config.asteroid_belt.references =
            belt_references(planets.iter().map(|(body, t)| (body, t.translation)));
    }

    let mut manager = ParticleManager::new(config);
    let mut scene = BevyParticleScene {
        commands: &mut commands,
        meshes: &mut meshes,
        materials: &mut materials,
        clouds: &mut clouds,
    };
    // Systems that failed are reported and stay detached; the rest animate.
    let _ = manager.init(&mut scene, &TracingErrorHandler);

    info!(
        "Particle clouds ready: {} particles",
        manager.get_stats().total_particles
    );
    commands.insert_resource(Particles(manager));
}

/// Advance the generators and push dirty buffers, visibility and opacity to
/// the render world.
pub fn update_particles(
    time: Res<Time>,
    mut particles: ResMut<Particles>,
    clouds: Res<ParticleClouds>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut query: Query<(&Mesh3d, &MeshMaterial3d<StandardMaterial>, &mut Visibility), With<ParticleCloud>>,
) {
    particles.0.update(time.delta_secs());

    for system in particles.0.systems_mut() {
        let Some(&entity) = clouds.entities.get(system.name()) else {
            continue;
        };
        let Ok((mesh3d, material3d, mut visibility)) = query.get_mut(entity) else {
            continue;
        };

        let wanted = if system.is_visible() {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        visibility.set_if_neq(wanted);

        let opacity = system.style().opacity;
        if materials
            .get(&material3d.0)
            .is_some_and(|m| m.base_color.alpha() != opacity)
            && let Some(mut material) = materials.get_mut(&material3d.0)
        {
            material.base_color.set_alpha(opacity);
        }

        let buffers = system.buffers_mut();
        if !(buffers.positions_dirty || buffers.colors_dirty) {
            continue;
        }
        if let Some(mut mesh) = meshes.get_mut(&mesh3d.0) {
            if buffers.positions_dirty {
                mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, buffers.position_array());
            }
            if buffers.colors_dirty {
                mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, buffers.color_array(1.0));
            }
        }
        buffers.mark_clean();
    }
}

fn dispose_on_exit(
    mut exit: MessageReader<AppExit>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut clouds: ResMut<ParticleClouds>,
    mut particles: ResMut<Particles>,
) {
    if exit.read().count() == 0 {
        return;
    }
    let mut scene = BevyParticleScene {
        commands: &mut commands,
        meshes: &mut meshes,
        materials: &mut materials,
        clouds: &mut clouds,
    };
    particles.0.dispose(&mut scene);
}
