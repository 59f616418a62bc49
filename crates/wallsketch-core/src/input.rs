//! Canonical pointer events for mouse, touch and stylus input.
//!
//! Raw device events are normalized upstream into [`ToolEvent`]. Tools only
//! ever see this type.

use crate::plan::ContactId;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Contact id reported for the mouse pointer.
pub const MOUSE_CONTACT_ID: ContactId = 1;

/// Pressure assumed when the device reports none.
pub const DEFAULT_PRESSURE: f64 = 0.5;

/// Phase of a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Start,
    Move,
    End,
    /// The platform aborted the contact (pointer left, touch cancelled).
    Cancel,
}

impl Phase {
    /// End and Cancel both terminate a gesture.
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::End | Phase::Cancel)
    }
}

/// Device class of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    Mouse,
    Touch,
    Stylus,
}

/// One finger, pen tip or mouse pointer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    /// Position in screen coordinates.
    pub position: Point,
    #[serde(default)]
    pub pressure: Option<f64>,
}

impl Contact {
    pub fn new(id: ContactId, position: Point) -> Self {
        Self { id, position, pressure: None }
    }

    pub fn with_pressure(mut self, pressure: f64) -> Self {
        self.pressure = Some(pressure);
        self
    }

    /// Reported pressure, or [`DEFAULT_PRESSURE`].
    pub fn pressure_or_default(&self) -> f64 {
        self.pressure.unwrap_or(DEFAULT_PRESSURE)
    }
}

/// Device-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PointerInput {
    Mouse {
        position: Point,
        /// Whether a button is held. Moves without a button are hover moves.
        #[serde(default)]
        pressed: bool,
    },
    Touch {
        /// Contacts that changed in this event.
        changed: Vec<Contact>,
        /// Number of touches still on the surface after this event.
        active: usize,
    },
    Stylus(Contact),
}

/// A normalized pointer event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolEvent {
    pub phase: Phase,
    pub input: PointerInput,
    /// Milliseconds on a monotonic clock.
    #[serde(default)]
    pub timestamp: u64,
}

impl ToolEvent {
    pub fn mouse(phase: Phase, position: Point, pressed: bool) -> Self {
        Self {
            phase,
            input: PointerInput::Mouse { position, pressed },
            timestamp: 0,
        }
    }

    pub fn touch(phase: Phase, changed: Vec<Contact>, active: usize) -> Self {
        Self {
            phase,
            input: PointerInput::Touch { changed, active },
            timestamp: 0,
        }
    }

    pub fn stylus(phase: Phase, contact: Contact) -> Self {
        Self {
            phase,
            input: PointerInput::Stylus(contact),
            timestamp: 0,
        }
    }

    pub fn at(mut self, timestamp: u64) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn kind(&self) -> PointerKind {
        match self.input {
            PointerInput::Mouse { .. } => PointerKind::Mouse,
            PointerInput::Touch { .. } => PointerKind::Touch,
            PointerInput::Stylus(_) => PointerKind::Stylus,
        }
    }

    /// Contacts that changed in this event. Mouse and stylus yield one.
    pub fn changed(&self) -> Vec<Contact> {
        match &self.input {
            PointerInput::Mouse { position, .. } => vec![Contact::new(MOUSE_CONTACT_ID, *position)],
            PointerInput::Touch { changed, .. } => changed.clone(),
            PointerInput::Stylus(contact) => vec![*contact],
        }
    }

    /// The first changed contact.
    pub fn primary(&self) -> Option<Contact> {
        self.changed().into_iter().next()
    }

    /// Contacts on the surface after this event. For touch starts this
    /// includes the new contact.
    pub fn active_contacts(&self) -> usize {
        match &self.input {
            PointerInput::Touch { active, .. } => *active,
            PointerInput::Mouse { pressed, .. } => usize::from(*pressed),
            PointerInput::Stylus(_) => usize::from(!self.phase.is_terminal()),
        }
    }

    /// A touch start while another finger is already down.
    pub fn is_additional_touch(&self) -> bool {
        matches!(self.input, PointerInput::Touch { active, .. } if active > 1)
            && self.phase == Phase::Start
    }

    /// A mouse move with no button held.
    pub fn is_hover(&self) -> bool {
        matches!(self.input, PointerInput::Mouse { pressed: false, .. }) && self.phase == Phase::Move
    }

    /// Whether drawing tools should react to this event. In stylus mode raw
    /// touches are reserved for panning.
    pub fn drives_tools(&self, stylus_mode: bool) -> bool {
        !(stylus_mode && self.kind() == PointerKind::Touch)
    }
}
