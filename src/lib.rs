//! Orrery - Interactive Solar System
//!
//! A library crate providing the planet catalog, pointer interaction and
//! particle backdrops for testing and integration purposes.

pub mod camera;
pub mod catalog;
pub mod diagnostics;
pub mod events;
pub mod info;
pub mod interaction;
pub mod particles;
pub mod render;
pub mod time;
pub mod types;
pub mod ui;

#[cfg(test)]
pub mod test_utils;
