//! Emissive highlight state per planet.
//!
//! Each planet's original emissive color is captured once, the first time
//! its state changes, and restored when it returns to `Default`.

use std::collections::HashMap;

use bevy::color::LinearRgba;

use super::collaborators::SceneView;
use crate::types::PlanetHandle;

/// Emissive boost added while the pointer is over a planet.
pub const HOVER_EMISSIVE: LinearRgba = LinearRgba {
    red: 0.2,
    green: 0.2,
    blue: 0.2,
    alpha: 1.0,
};

/// Emissive boost added to the selected planet.
pub const SELECTED_EMISSIVE: LinearRgba = LinearRgba {
    red: 0.4,
    green: 0.4,
    blue: 0.1,
    alpha: 1.0,
};

/// Emissive color for a planet in `state`.
///
/// Highlights add to the planet's own glow, so an emissive body such as the
/// Sun brightens instead of dimming.
pub const fn highlight_emissive(original: LinearRgba, state: HighlightState) -> LinearRgba {
    let boost = match state {
        HighlightState::Default => return original,
        HighlightState::Hovered => HOVER_EMISSIVE,
        HighlightState::Selected => SELECTED_EMISSIVE,
    };
    LinearRgba {
        red: original.red + boost.red,
        green: original.green + boost.green,
        blue: original.blue + boost.blue,
        alpha: original.alpha,
    }
}

/// Visual state of a planet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HighlightState {
    #[default]
    Default,
    Hovered,
    Selected,
}

#[derive(Clone, Copy, Debug)]
struct VisualEntry {
    original: LinearRgba,
    state: HighlightState,
}

/// Highlight bookkeeping for every planet touched so far.
#[derive(Debug, Default)]
pub struct HighlightTable {
    entries: HashMap<PlanetHandle, VisualEntry>,
}

impl HighlightTable {
    /// Move a planet to `state`, writing its emissive color if it changed.
    ///
    /// Returns true if a color was written. Unknown handles are ignored.
    pub fn set_state(
        &mut self,
        scene: &mut dyn SceneView,
        handle: PlanetHandle,
        state: HighlightState,
    ) -> bool {
        if !scene.contains(handle) {
            return false;
        }

        let entry = self.entries.entry(handle).or_insert_with(|| VisualEntry {
            original: scene.emissive(handle).unwrap_or(LinearRgba::BLACK),
            state: HighlightState::Default,
        });

        if entry.state == state {
            return false;
        }
        entry.state = state;

        scene.set_emissive(handle, highlight_emissive(entry.original, state));
        true
    }

    pub fn state(&self, handle: PlanetHandle) -> HighlightState {
        self.entries
            .get(&handle)
            .map(|e| e.state)
            .unwrap_or_default()
    }

    /// Original emissive color, once captured.
    pub fn original(&self, handle: PlanetHandle) -> Option<LinearRgba> {
        self.entries.get(&handle).map(|e| e.original)
    }

    /// Restore every highlighted planet and forget all entries.
    pub fn restore_all(&mut self, scene: &mut dyn SceneView) {
        for (handle, entry) in self.entries.drain() {
            if entry.state != HighlightState::Default && scene.contains(handle) {
                scene.set_emissive(handle, entry.original);
            }
        }
    }
}
