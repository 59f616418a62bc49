//! Freehand pencil and eraser strokes.

use super::{Tool, ToolContext};
use crate::draw::{self, PEN_GROUP};
use crate::history::HistoryRecord;
use crate::input::{Contact, ToolEvent};
use crate::plan::{ContactId, Note, NotePoint};

const PENCIL_COLOR: &str = "#000";
const PENCIL_WIDTH: f64 = 1.5;
/// The eraser paints with the background color.
const ERASER_COLOR: &str = "#fff";
const ERASER_WIDTH: f64 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PenMode {
    #[default]
    Pencil,
    Eraser,
}

impl PenMode {
    fn stroke(self) -> (&'static str, f64) {
        match self {
            PenMode::Pencil => (PENCIL_COLOR, PENCIL_WIDTH),
            PenMode::Eraser => (ERASER_COLOR, ERASER_WIDTH),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PenTool {
    mode: PenMode,
    stroke: Option<(ContactId, Note)>,
}

impl PenTool {
    pub fn new(mode: PenMode) -> Self {
        Self { mode, stroke: None }
    }

    pub fn mode(&self) -> PenMode {
        self.mode
    }

    fn sample(ctx: &ToolContext<'_>, contact: &Contact) -> NotePoint {
        let p = ctx.to_plan(contact.position);
        NotePoint::new(p.x, p.y, Some(contact.pressure_or_default()))
    }

    /// Commit the stroke in progress, if any.
    fn finish(&mut self, ctx: &mut ToolContext<'_>) {
        let Some((_, note)) = self.stroke.take() else {
            return;
        };
        if note.is_empty() {
            draw::remove_note(ctx.surface, &note);
            return;
        }
        let radius = ctx.magnet_radius();
        ctx.doc.commit(HistoryRecord::NoteAdded { note }, ctx.surface, radius);
    }
}

impl Tool for PenTool {
    fn on_start(&mut self, ctx: &mut ToolContext<'_>, event: &ToolEvent) {
        if self.stroke.is_some() || event.is_additional_touch() {
            return;
        }
        let Some(contact) = event.primary() else {
            return;
        };
        let (color, width) = self.mode.stroke();
        let mut note = Note::new(color, ctx.viewport.plan_length(width), PEN_GROUP);
        note.points.push(Self::sample(ctx, &contact));
        draw::draw_note(ctx.surface, &note);
        self.stroke = Some((contact.id, note));
    }

    fn on_move(&mut self, ctx: &mut ToolContext<'_>, event: &ToolEvent) {
        if event.is_hover() {
            return;
        }
        let Some((contact, note)) = self.stroke.as_mut() else {
            return;
        };
        let Some(c) = event.changed().into_iter().find(|c| c.id == *contact) else {
            return;
        };
        note.points.push(Self::sample(ctx, &c));
        draw::draw_note(ctx.surface, note);
    }

    fn on_end(&mut self, ctx: &mut ToolContext<'_>, event: &ToolEvent) {
        let Some((contact, _)) = &self.stroke else {
            return;
        };
        let contact = *contact;
        if event.changed().iter().any(|c| c.id == contact) {
            self.finish(ctx);
        }
    }

    fn deactivate(&mut self, ctx: &mut ToolContext<'_>) {
        self.finish(ctx);
    }

    fn is_busy(&self) -> bool {
        self.stroke.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Contact, Phase, DEFAULT_PRESSURE};
    use crate::surface::Primitive;
    use crate::tools::test_support::*;
    use kurbo::Point;

    fn scribble(h: &mut Harness, tool: &mut PenTool) {
        h.send(tool, mouse(Phase::Start, 0.0, 0.0));
        h.send(tool, mouse(Phase::Move, 10.0, 5.0));
        h.send(tool, mouse(Phase::Move, 20.0, 0.0));
        h.send(tool, mouse(Phase::End, 20.0, 0.0));
    }

    #[test]
    fn test_pencil_commits_note() {
        let mut h = Harness::new();
        let mut tool = PenTool::new(PenMode::Pencil);
        scribble(&mut h, &mut tool);

        let notes = &h.doc.plan().notes;
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].points.len(), 3);
        assert_eq!(notes[0].stroke, "#000");
        assert!((notes[0].stroke_width - 1.5).abs() < f64::EPSILON);
        assert_eq!(notes[0].points[1].pressure, Some(DEFAULT_PRESSURE));
        assert!(matches!(h.doc.history().last(), Some(HistoryRecord::NoteAdded { .. })));
        assert_eq!(h.surface.children(PEN_GROUP), vec![notes[0].id.clone()]);
        assert!(!tool.is_busy());
    }

    #[test]
    fn test_eraser_uses_background_stroke() {
        let mut h = Harness::new();
        h.viewport.scale = 2.0;
        let mut tool = PenTool::new(PenMode::Eraser);
        scribble(&mut h, &mut tool);
        let note = &h.doc.plan().notes[0];
        assert_eq!(note.stroke, "#fff");
        assert!((note.stroke_width - 30.0).abs() < f64::EPSILON);
        assert_eq!(note.points[2].pos(), Point::new(40.0, 0.0));
    }

    #[test]
    fn test_live_path_grows() {
        let mut h = Harness::new();
        let mut tool = PenTool::new(PenMode::Pencil);
        h.send(&mut tool, mouse(Phase::Start, 0.0, 0.0));
        h.send(&mut tool, mouse(Phase::Move, 3.0, 3.0));
        let id = h.surface.children(PEN_GROUP).remove(0);
        match &h.surface.element(&id).unwrap().primitive {
            Primitive::Path(points) => assert_eq!(points.len(), 2),
            other => panic!("unexpected primitive {:?}", other),
        }
        assert!(h.doc.plan().notes.is_empty());
    }

    #[test]
    fn test_stylus_pressure_recorded() {
        let mut h = Harness::new();
        let mut tool = PenTool::new(PenMode::Pencil);
        let pen = |phase, x: f64, p: f64| {
            ToolEvent::stylus(phase, Contact::new(7, Point::new(x, 0.0)).with_pressure(p))
        };
        h.send(&mut tool, pen(Phase::Start, 0.0, 0.2));
        h.send(&mut tool, pen(Phase::Move, 5.0, 0.9));
        h.send(&mut tool, pen(Phase::End, 5.0, 0.9));
        let pressures: Vec<_> = h.doc.plan().notes[0].points.iter().map(|p| p.pressure).collect();
        assert_eq!(pressures, vec![Some(0.2), Some(0.9)]);
    }

    #[test]
    fn test_other_contact_does_not_end_stroke() {
        let mut h = Harness::new();
        h.settings.stylus_mode = false;
        let mut tool = PenTool::new(PenMode::Pencil);
        h.send(&mut tool, touch(Phase::Start, 1, 0.0, 0.0, 1));
        h.send(&mut tool, touch(Phase::Start, 2, 50.0, 50.0, 2));
        h.send(&mut tool, touch(Phase::End, 2, 50.0, 50.0, 1));
        assert!(tool.is_busy());
        h.send(&mut tool, touch(Phase::Move, 1, 5.0, 0.0, 1));
        h.send(&mut tool, touch(Phase::End, 1, 5.0, 0.0, 0));
        assert_eq!(h.doc.plan().notes[0].points.len(), 2);
    }

    #[test]
    fn test_undo_removes_stroke() {
        let mut h = Harness::new();
        let mut tool = PenTool::new(PenMode::Pencil);
        scribble(&mut h, &mut tool);
        let mut surface = std::mem::take(&mut h.surface);
        assert!(h.doc.undo(&mut surface, 15.0));
        assert!(h.doc.plan().notes.is_empty());
        assert!(surface.children(PEN_GROUP).is_empty());
    }

    #[test]
    fn test_cancel_commits_sampled_points() {
        let mut h = Harness::new();
        let mut tool = PenTool::new(PenMode::Pencil);
        h.send(&mut tool, mouse(Phase::Start, 0.0, 0.0));
        h.send(&mut tool, mouse(Phase::Move, 6.0, 2.0));
        h.send(&mut tool, ToolEvent::mouse(Phase::Cancel, Point::new(40.0, 40.0), false));

        assert!(!tool.is_busy());
        let notes = &h.doc.plan().notes;
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].points.len(), 2);
        assert_eq!(h.doc.history().undo_len(), 1);
    }

    #[test]
    fn test_deactivate_commits() {
        let mut h = Harness::new();
        let mut tool = PenTool::new(PenMode::Pencil);
        h.send(&mut tool, mouse(Phase::Start, 0.0, 0.0));
        h.send(&mut tool, mouse(Phase::Move, 8.0, 0.0));
        tool.deactivate(&mut h.ctx());
        assert_eq!(h.doc.plan().notes.len(), 1);
        assert!(!tool.is_busy());
    }
}
