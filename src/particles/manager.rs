//! Named collection of particle systems with shared lifecycle.

use std::collections::BTreeMap;

use bevy::prelude::Resource;

use super::{
    AsteroidBelt, AsteroidBeltParams, Nebula, NebulaParams, ParticleError, ParticleScene,
    ParticleSystem, Starfield, StarfieldParams,
};
use crate::diagnostics::{ErrorHandler, LogLevel};

/// Particle count multiplier in performance mode.
pub const PERFORMANCE_COUNT_SCALE: f32 = 0.5;

#[derive(Resource, Clone, Debug, PartialEq)]
pub struct ParticleManagerConfig {
    pub enable_starfield: bool,
    pub enable_nebula: bool,
    pub enable_asteroid_belt: bool,
    /// Build systems with reduced counts and start in performance mode.
    pub performance_mode: bool,
    pub performance_scale: f32,
    pub starfield: StarfieldParams,
    pub nebula: NebulaParams,
    pub asteroid_belt: AsteroidBeltParams,
}

impl Default for ParticleManagerConfig {
    fn default() -> Self {
        Self {
            enable_starfield: true,
            enable_nebula: true,
            enable_asteroid_belt: true,
            performance_mode: false,
            performance_scale: PERFORMANCE_COUNT_SCALE,
            starfield: StarfieldParams::default(),
            nebula: NebulaParams::default(),
            asteroid_belt: AsteroidBeltParams::default(),
        }
    }
}

impl ParticleManagerConfig {
    fn scaled(&self, count: usize) -> usize {
        if self.performance_mode {
            ((count as f32 * self.performance_scale).round() as usize).max(1)
        } else {
            count
        }
    }
}

/// Per-system entry of [`ParticleStats`].
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleSystemStats {
    pub name: &'static str,
    pub particle_count: usize,
    pub visible: bool,
    pub attached: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParticleStats {
    pub systems: Vec<ParticleSystemStats>,
    pub total_particles: usize,
    pub performance_mode: bool,
}

impl ParticleStats {
    pub fn get(&self, name: &str) -> Option<&ParticleSystemStats> {
        self.systems.iter().find(|s| s.name == name)
    }
}

pub struct ParticleManager {
    config: ParticleManagerConfig,
    systems: BTreeMap<&'static str, Box<dyn ParticleSystem>>,
    performance_mode: bool,
    is_initialized: bool,
}

impl ParticleManager {
    pub fn new(config: ParticleManagerConfig) -> Self {
        let performance_mode = config.performance_mode;
        Self {
            config,
            systems: BTreeMap::new(),
            performance_mode,
            is_initialized: false,
        }
    }

    /// Construct the enabled systems, honouring performance-mode counts.
    fn build_systems(&mut self) {
        let config = &self.config;
        let mut systems: Vec<Box<dyn ParticleSystem>> = Vec::new();

        if config.enable_starfield {
            systems.push(Box::new(Starfield::new(StarfieldParams {
                count: config.scaled(config.starfield.count),
                ..config.starfield.clone()
            })));
        }
        if config.enable_nebula {
            systems.push(Box::new(Nebula::new(NebulaParams {
                count: config.scaled(config.nebula.count),
                ..config.nebula.clone()
            })));
        }
        if config.enable_asteroid_belt {
            systems.push(Box::new(AsteroidBelt::new(AsteroidBeltParams {
                count: config.scaled(config.asteroid_belt.count),
                ..config.asteroid_belt.clone()
            })));
        }

        for system in systems {
            self.add_system(system);
        }
    }

    /// Register an extra system under its own name, replacing any previous one.
    pub fn add_system(&mut self, mut system: Box<dyn ParticleSystem>) {
        system.set_performance_mode(self.performance_mode);
        self.systems.insert(system.name(), system);
    }

    /// Initialize every system.
    ///
    /// Every system gets a chance to initialize; failures are collected and
    /// reported once as [`ParticleError::ManagerInit`].
    pub fn init(
        &mut self,
        scene: &mut dyn ParticleScene,
        errors: &dyn ErrorHandler,
    ) -> Result<(), ParticleError> {
        if self.is_initialized {
            return Ok(());
        }
        if self.systems.is_empty() {
            self.build_systems();
        }

        let failures: Vec<String> = self
            .systems
            .iter_mut()
            .filter_map(|(name, system)| {
                system
                    .init(&mut *scene, errors)
                    .err()
                    .map(|e| format!("{name}: {e}"))
            })
            .collect();

        if !failures.is_empty() {
            let error = ParticleError::ManagerInit { failures };
            errors.handle_error(&error, "ParticleManager::init");
            return Err(error);
        }

        self.is_initialized = true;
        errors.log(
            &format!(
                "Particle systems initialized: {}",
                self.systems.keys().copied().collect::<Vec<_>>().join(", ")
            ),
            LogLevel::Info,
        );
        Ok(())
    }

    pub fn update(&mut self, dt: f32) {
        for system in self.systems.values_mut() {
            system.update(dt);
        }
    }

    /// Returns false if no system has that name.
    pub fn set_system_visible(&mut self, name: &str, visible: bool) -> bool {
        match self.systems.get_mut(name) {
            Some(system) => {
                system.set_visible(visible);
                true
            }
            None => false,
        }
    }

    /// Returns false if the system is absent or has no adjustable opacity.
    pub fn set_system_opacity(&mut self, name: &str, opacity: f32) -> bool {
        self.systems
            .get_mut(name)
            .is_some_and(|system| system.set_opacity(opacity))
    }

    /// Returns false if the system is absent or ignores performance mode.
    pub fn set_system_performance_mode(&mut self, name: &str, enabled: bool) -> bool {
        self.systems
            .get_mut(name)
            .is_some_and(|system| system.set_performance_mode(enabled))
    }

    /// Switch performance mode on every system that supports it.
    ///
    /// Counts are fixed at construction; only per-frame costs such as
    /// opacity change here.
    pub fn set_performance_mode(&mut self, enabled: bool) {
        self.performance_mode = enabled;
        let names: Vec<&'static str> = self.systems.keys().copied().collect();
        for name in names {
            self.set_system_performance_mode(name, enabled);
        }
    }

    pub fn performance_mode(&self) -> bool {
        self.performance_mode
    }

    pub fn get_stats(&self) -> ParticleStats {
        let systems: Vec<ParticleSystemStats> = self
            .systems
            .iter()
            .map(|(name, system)| ParticleSystemStats {
                name: *name,
                particle_count: system.particle_count(),
                visible: system.is_visible(),
                attached: system.is_attached(),
            })
            .collect();
        ParticleStats {
            total_particles: systems.iter().map(|s| s.particle_count).sum(),
            systems,
            performance_mode: self.performance_mode,
        }
    }

    pub fn system(&self, name: &str) -> Option<&dyn ParticleSystem> {
        self.systems.get(name).map(|s| s.as_ref())
    }

    pub fn systems(&self) -> impl Iterator<Item = &dyn ParticleSystem> {
        self.systems.values().map(|s| s.as_ref())
    }

    pub fn systems_mut(&mut self) -> impl Iterator<Item = &mut (dyn ParticleSystem + 'static)> {
        self.systems.values_mut().map(|s| s.as_mut())
    }

    pub fn is_initialized(&self) -> bool {
        self.is_initialized
    }

    pub fn config(&self) -> &ParticleManagerConfig {
        &self.config
    }

    /// Dispose every system and detach it from the scene.
    pub fn dispose(&mut self, scene: &mut dyn ParticleScene) {
        for (name, mut system) in std::mem::take(&mut self.systems) {
            system.dispose();
            scene.detach(name);
        }
        self.is_initialized = false;
    }
}
