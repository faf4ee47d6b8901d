//! Hover tooltip model: content, placement and the delayed-show timer.

use bevy::math::Vec2;

use crate::info;
use crate::types::PlanetData;

/// Gap between the cursor and the tooltip edge, in pixels.
pub const TOOLTIP_OFFSET: f32 = 10.0;

const TOOLTIP_WIDTH: f32 = 200.0;
const TITLE_HEIGHT: f32 = 22.0;
const LINE_HEIGHT: f32 = 18.0;
const PADDING: f32 = 16.0;

/// Place a tooltip of `size` next to `cursor` inside `viewport`.
///
/// Above and to the right of the cursor by default; flips left when it would
/// overflow the right edge and below when it would leave the top.
pub fn position_tooltip(cursor: Vec2, size: Vec2, viewport: Vec2) -> Vec2 {
    let mut x = cursor.x + TOOLTIP_OFFSET;
    let mut y = cursor.y - size.y - TOOLTIP_OFFSET;

    if x + size.x > viewport.x {
        x = cursor.x - size.x - TOOLTIP_OFFSET;
    }
    if y < 0.0 {
        y = cursor.y + TOOLTIP_OFFSET;
    }
    Vec2::new(x, y)
}

/// Overlay element shown next to a hovered planet.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tooltip {
    pub visible: bool,
    /// Top-left corner in client pixels.
    pub position: Vec2,
    pub title: String,
    pub lines: Vec<String>,
}

impl Tooltip {
    /// Estimated rendered size, used for edge flipping.
    pub fn size(&self) -> Vec2 {
        Vec2::new(
            TOOLTIP_WIDTH,
            PADDING + TITLE_HEIGHT + LINE_HEIGHT * self.lines.len() as f32,
        )
    }

    pub fn set_content(&mut self, planet: &PlanetData) {
        self.title = info::display_name(planet).to_string();
        self.lines = info::tooltip_lines(planet);
    }

    pub fn show_at(&mut self, cursor: Vec2, viewport: Vec2) {
        self.position = position_tooltip(cursor, self.size(), viewport);
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}

/// A tooltip waiting for its delay to elapse.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingTooltip {
    pub due_ms: f64,
    pub planet: String,
    pub cursor: Vec2,
}

/// At most one pending tooltip; scheduling replaces the previous one.
#[derive(Clone, Debug, Default)]
pub struct TooltipTimer {
    pending: Option<PendingTooltip>,
}

impl TooltipTimer {
    pub fn schedule(&mut self, due_ms: f64, planet: impl Into<String>, cursor: Vec2) {
        self.pending = Some(PendingTooltip {
            due_ms,
            planet: planet.into(),
            cursor,
        });
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Track the latest cursor so the tooltip appears where the pointer is.
    pub fn update_cursor(&mut self, cursor: Vec2) {
        if let Some(pending) = &mut self.pending {
            pending.cursor = cursor;
        }
    }

    /// Take the pending tooltip if its delay has elapsed.
    pub fn take_due(&mut self, now_ms: f64) -> Option<PendingTooltip> {
        if self.pending.as_ref().is_some_and(|p| now_ms >= p.due_ms) {
            self.pending.take()
        } else {
            None
        }
    }
}
