//! Viewport panning with a single contact.

use super::{Tool, ToolContext};
use crate::input::ToolEvent;
use crate::plan::ContactId;
use kurbo::Point;

#[derive(Debug, Clone, Default)]
pub struct PanTool {
    /// Contact driving the pan and its last screen position.
    grab: Option<(ContactId, Point)>,
}

impl PanTool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tool for PanTool {
    fn on_start(&mut self, _ctx: &mut ToolContext<'_>, event: &ToolEvent) {
        // More than one finger is a gesture, not a pan.
        if event.is_additional_touch() {
            self.grab = None;
            return;
        }
        if let Some(contact) = event.primary() {
            self.grab = Some((contact.id, contact.position));
        }
    }

    fn on_move(&mut self, ctx: &mut ToolContext<'_>, event: &ToolEvent) {
        if event.is_hover() {
            return;
        }
        let Some((id, last)) = self.grab.as_mut() else {
            return;
        };
        let Some(c) = event.changed().into_iter().find(|c| c.id == *id) else {
            return;
        };
        ctx.viewport.pan(c.position - *last);
        *last = c.position;
    }

    fn on_end(&mut self, _ctx: &mut ToolContext<'_>, event: &ToolEvent) {
        if let Some((id, _)) = self.grab {
            if event.changed().iter().any(|c| c.id == id) {
                self.grab = None;
            }
        }
    }

    fn deactivate(&mut self, _ctx: &mut ToolContext<'_>) {
        self.grab = None;
    }

    fn is_busy(&self) -> bool {
        self.grab.is_some()
    }
}
