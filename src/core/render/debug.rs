//=========================================================================
// Debug Draw
//=========================================================================
//
// Line overlay queued by components and drawn on top of the scene.
//
// The queue is emptied at the start of every logic tick, so a renderer
// always sees the lines of the most recent tick, however many frames it
// draws in between. Leveled debug text goes through the `log` macros.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec2;
use log::warn;

//=== Internal Dependencies ===============================================

use crate::core::config::Color;

/// Lines kept per tick; later ones are dropped.
pub const MAX_DEBUG_LINES: usize = 4096;

//=== DebugLine ===========================================================

/// A world-space segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugLine {
    pub start: Vec2,
    pub end: Vec2,
    pub color: Color,
}

//=== DebugDraw ===========================================================

#[derive(Debug, Clone, Default)]
pub struct DebugDraw {
    lines: Vec<DebugLine>,
    dropped: usize,
}

impl DebugDraw {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, start: Vec2, end: Vec2, color: Color) {
        if self.lines.len() >= MAX_DEBUG_LINES {
            self.dropped += 1;
            return;
        }
        self.lines.push(DebugLine { start, end, color });
    }

    /// Segment from `origin` to `origin + direction`.
    pub fn ray(&mut self, origin: Vec2, direction: Vec2, color: Color) {
        self.line(origin, origin + direction, color);
    }

    pub fn lines(&self) -> &[DebugLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines refused since the last `clear` because the queue was full.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub(crate) fn clear(&mut self) {
        if self.dropped > 0 {
            warn!(target: "render", "{} debug lines over the limit were dropped", self.dropped);
        }
        self.lines.clear();
        self.dropped = 0;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_ends_at_origin_plus_direction() {
        let mut debug = DebugDraw::new();
        debug.ray(Vec2::new(1.0, 1.0), Vec2::new(0.0, -3.0), Color::WHITE);

        assert_eq!(
            debug.lines(),
            &[DebugLine {
                start: Vec2::new(1.0, 1.0),
                end: Vec2::new(1.0, -2.0),
                color: Color::WHITE,
            }]
        );
    }

    #[test]
    fn full_queue_drops_and_clear_resets() {
        let mut debug = DebugDraw::new();
        for _ in 0..MAX_DEBUG_LINES + 3 {
            debug.line(Vec2::ZERO, Vec2::ONE, Color::BLACK);
        }
        assert_eq!(debug.lines().len(), MAX_DEBUG_LINES);
        assert_eq!(debug.dropped(), 3);

        debug.clear();
        assert!(debug.is_empty());
        assert_eq!(debug.dropped(), 0);
    }
}
