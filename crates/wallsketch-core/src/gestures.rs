//! Multi-finger tap recognition for undo and redo.
//!
//! Runs alongside whichever tool is active and only looks at touch input. A
//! gesture is every contact placed between the first touch down and the last
//! touch up. It counts as a tap when no contact travelled [`TAP_SLOP`] or more
//! and all contacts were lifted within [`TAP_WINDOW_MS`] of each other.

use crate::geometry;
use crate::input::{Phase, PointerKind, ToolEvent};
use crate::plan::ContactId;
use kurbo::Point;
use std::collections::HashMap;

/// Maximum travel of a tapping finger, in screen units.
pub const TAP_SLOP: f64 = 10.0;
/// Maximum time between the first and the last lift.
pub const TAP_WINDOW_MS: u64 = 500;

/// History action requested by a tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureAction {
    Undo,
    Redo,
}

#[derive(Debug, Clone, Copy)]
struct Track {
    start: Point,
    current: Point,
}

#[derive(Debug, Clone, Default)]
pub struct TapRecognizer {
    tracks: HashMap<ContactId, Track>,
    first_lift: Option<u64>,
    cancelled: bool,
}

impl TapRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one event. Returns an action once a gesture completes as a tap.
    pub fn handle(&mut self, event: &ToolEvent) -> Option<GestureAction> {
        if event.kind() != PointerKind::Touch {
            return None;
        }
        match event.phase {
            Phase::Start => {
                for c in event.changed() {
                    self.tracks.entry(c.id).or_insert(Track {
                        start: c.position,
                        current: c.position,
                    });
                }
                None
            }
            Phase::Move => {
                for c in event.changed() {
                    if let Some(track) = self.tracks.get_mut(&c.id) {
                        track.current = c.position;
                    }
                }
                None
            }
            Phase::End | Phase::Cancel => {
                if event.phase == Phase::Cancel {
                    self.cancelled = true;
                }
                for c in event.changed() {
                    if let Some(track) = self.tracks.get_mut(&c.id) {
                        track.current = c.position;
                    }
                }
                let first_lift = *self.first_lift.get_or_insert(event.timestamp);
                if event.active_contacts() > 0 {
                    return None;
                }
                let action = self.classify(event.timestamp.saturating_sub(first_lift));
                self.reset();
                action
            }
        }
    }

    fn classify(&self, lift_span: u64) -> Option<GestureAction> {
        if self.cancelled || lift_span >= TAP_WINDOW_MS {
            return None;
        }
        let still = self
            .tracks
            .values()
            .all(|t| geometry::distance(t.start, t.current) < TAP_SLOP);
        if !still {
            return None;
        }
        match self.tracks.len() {
            2 => Some(GestureAction::Undo),
            3 => Some(GestureAction::Redo),
            _ => None,
        }
    }

    fn reset(&mut self) {
        self.tracks.clear();
        self.first_lift = None;
        self.cancelled = false;
    }
}
