//! Endpoint dragging and wall selection.
//!
//! Each contact owns the endpoints it tagged at press time. Points tagged by
//! one contact are never moved or used as snap targets by another.

use super::{Tool, ToolContext};
use crate::draw::{self, Highlight};
use crate::history::HistoryRecord;
use crate::input::{Contact, Phase, ToolEvent};
use crate::plan::{ContactId, Wall, WallEnd, WallId};
use crate::snap;
use kurbo::Point;
use std::collections::HashMap;

/// One live drag: the press-time position of every endpoint it tagged.
#[derive(Debug, Clone)]
struct Drag {
    origins: Vec<(WallId, WallEnd, Point)>,
}

impl Drag {
    fn origin(&self, wall: &str, end: WallEnd) -> Option<Point> {
        self.origins
            .iter()
            .find(|(id, e, _)| id == wall && *e == end)
            .map(|(.., p)| *p)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CursorTool {
    drags: HashMap<ContactId, Drag>,
    selected: Option<WallId>,
}

impl CursorTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the selected wall, if any.
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn clear_selection(&mut self, ctx: &mut ToolContext<'_>) {
        if let Some(id) = self.selected.take() {
            redraw(ctx, &id, Highlight::None);
        }
    }

    /// Redraw the selected wall highlighted, dropping a stale selection.
    pub fn highlight_selection(&mut self, ctx: &mut ToolContext<'_>) {
        let Some(id) = self.selected.clone() else {
            return;
        };
        if ctx.doc.plan().contains_wall(&id) {
            redraw(ctx, &id, Highlight::Selected);
        } else {
            self.selected = None;
        }
    }

    fn select(&mut self, ctx: &mut ToolContext<'_>, id: Option<WallId>) {
        if self.selected == id {
            return;
        }
        self.clear_selection(ctx);
        if let Some(id) = id {
            log::debug!("Selected wall {}", id);
            redraw(ctx, &id, Highlight::Selected);
            self.selected = Some(id);
        }
    }

    fn press(&mut self, ctx: &mut ToolContext<'_>, contact: Contact) {
        let point = ctx.to_plan(contact.position);
        let radius = ctx.magnet_radius();

        let mut tagged = 0;
        for wall in ctx.doc.plan_mut().walls.iter_mut() {
            for p in [&mut wall.p1, &mut wall.p2] {
                if p.edit_id.is_none() && p.pos().distance(point) <= radius {
                    p.edit_id = Some(contact.id);
                    tagged += 1;
                }
            }
        }

        if tagged == 0 {
            let near = ctx
                .doc
                .plan()
                .find_near_wall(point, radius)
                .filter(|w| !w.is_being_edited())
                .map(|w| w.id.clone());
            self.select(ctx, near);
            return;
        }

        self.select(ctx, None);
        let origins = ctx
            .doc
            .plan()
            .endpoints()
            .filter(|(_, _, p)| p.edit_id == Some(contact.id))
            .map(|(w, end, p)| (w.id.clone(), end, p.pos()))
            .collect();
        self.drags.insert(contact.id, Drag { origins });
    }

    /// Snapshot of `wall` as last committed: endpoints still held by other
    /// drags are reported at their press-time position.
    fn committed(&self, wall: &Wall) -> Wall {
        let mut snapshot = wall.snapshot();
        for end in [WallEnd::Start, WallEnd::End] {
            let origin = wall
                .point(end)
                .edit_id
                .and_then(|owner| self.drags.get(&owner))
                .and_then(|drag| drag.origin(&wall.id, end));
            if let Some(origin) = origin {
                snapshot.point_mut(end).set_pos(origin);
            }
        }
        snapshot
    }

    /// Move this contact's points to `screen`, aligning when magnetic.
    fn drag(ctx: &mut ToolContext<'_>, contact: ContactId, screen: Point, show_guides: bool) {
        let mut point = ctx.to_plan(screen);
        if ctx.settings.magnetic_mode {
            let aligned = snap::drag_alignment(ctx.doc.plan(), point, ctx.alignment_radius());
            point = aligned.point;
            if show_guides {
                draw::draw_guide_lines(ctx.surface, contact, point, &aligned.guides);
            }
        }
        for wall in ctx.doc.plan_mut().walls.iter_mut() {
            for p in [&mut wall.p1, &mut wall.p2] {
                if p.edit_id == Some(contact) {
                    p.set_pos(point);
                }
            }
        }
        let ids: Vec<WallId> = owned_walls(ctx, contact).map(|w| w.id.clone()).collect();
        for id in ids {
            redraw(ctx, &id, Highlight::None);
        }
    }

    /// Settle, untag and commit the drag of `contact`.
    fn release(&mut self, ctx: &mut ToolContext<'_>, contact: ContactId, end: Option<Point>) {
        let Some(drag) = self.drags.remove(&contact) else {
            return;
        };
        if let Some(screen) = end {
            Self::drag(ctx, contact, screen, false);
        }

        if ctx.settings.magnetic_mode {
            let radius = ctx.magnet_radius();
            let mut settled: Vec<(WallId, bool, Point)> = Vec::new();
            for wall in owned_walls(ctx, contact) {
                for (first, p) in [(true, &wall.p1), (false, &wall.p2)] {
                    if p.edit_id == Some(contact) {
                        let target = snap::settle_point(ctx.doc.plan(), p.pos(), radius).point;
                        settled.push((wall.id.clone(), first, target));
                    }
                }
            }
            for (id, first, pos) in settled {
                if let Some(wall) = ctx.doc.plan_mut().wall_mut(&id) {
                    if first { wall.p1.set_pos(pos) } else { wall.p2.set_pos(pos) }
                }
            }
        }

        for wall in ctx.doc.plan_mut().walls.iter_mut() {
            for p in [&mut wall.p1, &mut wall.p2] {
                if p.edit_id == Some(contact) {
                    p.edit_id = None;
                }
            }
        }
        draw::remove_guide_lines(ctx.surface, contact);

        // Only the points this contact owned differ between the snapshots.
        let mut before: Vec<Wall> = Vec::new();
        let mut after: Vec<Wall> = Vec::new();
        for (id, end, origin) in &drag.origins {
            let index = match after.iter().position(|w| &w.id == id) {
                Some(index) => index,
                None => {
                    let Some(wall) = ctx.doc.plan().wall(id) else {
                        continue;
                    };
                    after.push(self.committed(wall));
                    before.push(self.committed(wall));
                    after.len() - 1
                }
            };
            before[index].point_mut(*end).set_pos(*origin);
        }
        let radius = ctx.magnet_radius();
        if before.iter().zip(&after).any(|(b, a)| b.geometry_differs(a)) {
            ctx.doc.commit(HistoryRecord::WallsMoved { before, after }, ctx.surface, radius);
        } else {
            for wall in &after {
                redraw(ctx, &wall.id, Highlight::None);
            }
        }
    }
}

/// Walls with at least one endpoint tagged by `contact`.
fn owned_walls<'a>(ctx: &'a ToolContext<'_>, contact: ContactId) -> impl Iterator<Item = &'a Wall> {
    ctx.doc
        .plan()
        .walls
        .iter()
        .filter(move |w| w.p1.edit_id == Some(contact) || w.p2.edit_id == Some(contact))
}

fn redraw(ctx: &mut ToolContext<'_>, id: &str, highlight: Highlight) {
    let radius = ctx.magnet_radius();
    if let Some(wall) = ctx.doc.plan().wall(id) {
        draw::draw_wall(ctx.surface, wall, radius, highlight);
    }
}

impl Tool for CursorTool {
    fn on_start(&mut self, ctx: &mut ToolContext<'_>, event: &ToolEvent) {
        for contact in event.changed() {
            if self.drags.contains_key(&contact.id) {
                continue;
            }
            self.press(ctx, contact);
        }
    }

    fn on_move(&mut self, ctx: &mut ToolContext<'_>, event: &ToolEvent) {
        if event.is_hover() {
            return;
        }
        for contact in event.changed() {
            if self.drags.contains_key(&contact.id) {
                Self::drag(ctx, contact.id, contact.position, true);
            }
        }
    }

    fn on_end(&mut self, ctx: &mut ToolContext<'_>, event: &ToolEvent) {
        for contact in event.changed() {
            let end = (event.phase == Phase::End).then_some(contact.position);
            self.release(ctx, contact.id, end);
        }
    }

    fn deactivate(&mut self, ctx: &mut ToolContext<'_>) {
        let contacts: Vec<ContactId> = self.drags.keys().copied().collect();
        for contact in contacts {
            self.release(ctx, contact, None);
        }
        self.clear_selection(ctx);
    }

    fn is_busy(&self) -> bool {
        !self.drags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ToolEvent;
    use crate::plan::Plan;
    use crate::tools::test_support::*;

    fn harness_with(walls: &[(&str, (f64, f64), (f64, f64))]) -> Harness {
        let mut plan = Plan::new();
        for (id, a, b) in walls {
            plan.add_wall(Wall::new(*id, Point::new(a.0, a.1), Point::new(b.0, b.1)));
        }
        let mut h = Harness::new();
        h.doc = crate::document::Document::with_plan(plan);
        h.settings.stylus_mode = false;
        h
    }

    fn drag(h: &mut Harness, tool: &mut CursorTool, from: (f64, f64), to: (f64, f64)) {
        h.send(tool, mouse(Phase::Start, from.0, from.1));
        h.send(tool, mouse(Phase::Move, to.0, to.1));
        h.send(tool, mouse(Phase::End, to.0, to.1));
    }

    #[test]
    fn test_drag_endpoint_records_move() {
        let mut h = harness_with(&[("1", (0.0, 0.0), (100.0, 0.0))]);
        let mut tool = CursorTool::new();
        drag(&mut h, &mut tool, (100.0, 2.0), (150.0, 80.0));

        let wall = &h.doc.plan().walls[0];
        assert_eq!(wall.p2.pos(), Point::new(150.0, 80.0));
        assert!(!wall.is_being_edited());
        match h.doc.history().last() {
            Some(HistoryRecord::WallsMoved { before, after }) => {
                assert_eq!(before[0].p2.pos(), Point::new(100.0, 0.0));
                assert_eq!(after[0].p2.pos(), Point::new(150.0, 80.0));
            }
            other => panic!("unexpected record {:?}", other),
        }
        assert!(!h.surface.has_group("p1"));
    }

    #[test]
    fn test_unchanged_drag_records_nothing() {
        let mut h = harness_with(&[("1", (0.0, 0.0), (100.0, 0.0))]);
        let mut tool = CursorTool::new();
        drag(&mut h, &mut tool, (100.0, 0.0), (100.0, 0.0));
        assert!(!h.doc.history().can_undo());
        assert!(!h.doc.plan().walls[0].is_being_edited());
    }

    #[test]
    fn test_coincident_endpoints_move_together() {
        let mut h = harness_with(&[("1", (0.0, 0.0), (100.0, 0.0)), ("2", (100.0, 0.0), (100.0, 100.0))]);
        let mut tool = CursorTool::new();
        drag(&mut h, &mut tool, (101.0, 1.0), (160.0, 40.0));

        let plan = h.doc.plan();
        assert_eq!(plan.walls[0].p2.pos(), Point::new(160.0, 40.0));
        assert_eq!(plan.walls[1].p1.pos(), Point::new(160.0, 40.0));
        match h.doc.history().last() {
            Some(HistoryRecord::WallsMoved { before, .. }) => assert_eq!(before.len(), 2),
            other => panic!("unexpected record {:?}", other),
        }
    }

    #[test]
    fn test_release_merges_onto_nearby_endpoint() {
        let mut h = harness_with(&[("1", (0.0, 0.0), (100.0, 0.0)), ("2", (300.0, 300.0), (400.0, 300.0))]);
        h.settings.magnetic_mode = true;
        let mut tool = CursorTool::new();
        drag(&mut h, &mut tool, (100.0, 0.0), (292.0, 306.0));
        assert_eq!(h.doc.plan().walls[0].p2.pos(), Point::new(300.0, 300.0));
    }

    #[test]
    fn test_release_far_stays_unsnapped() {
        let mut h = harness_with(&[("1", (0.0, 0.0), (100.0, 0.0)), ("2", (300.0, 300.0), (400.0, 300.0))]);
        let mut tool = CursorTool::new();
        drag(&mut h, &mut tool, (100.0, 0.0), (240.0, 200.0));
        assert_eq!(h.doc.plan().walls[0].p2.pos(), Point::new(240.0, 200.0));
    }

    #[test]
    fn test_magnetic_off_no_snap() {
        let mut h = harness_with(&[("1", (0.0, 0.0), (100.0, 0.0)), ("2", (300.0, 300.0), (400.0, 300.0))]);
        h.settings.magnetic_mode = false;
        let mut tool = CursorTool::new();
        drag(&mut h, &mut tool, (100.0, 0.0), (292.0, 306.0));
        assert_eq!(h.doc.plan().walls[0].p2.pos(), Point::new(292.0, 306.0));
    }

    #[test]
    fn test_tap_selects_wall() {
        let mut h = harness_with(&[("1", (0.0, 0.0), (200.0, 0.0))]);
        let mut tool = CursorTool::new();
        h.send(&mut tool, mouse(Phase::Start, 100.0, 8.0));
        h.send(&mut tool, mouse(Phase::End, 100.0, 8.0));
        assert_eq!(tool.selected(), Some("1"));
        assert!(!h.doc.history().can_undo());
        let stroke = h.surface.element("w1l").unwrap().style.stroke.unwrap().to_rgba8();
        assert_eq!((stroke.r, stroke.g, stroke.b), (0, 112, 243));

        h.send(&mut tool, mouse(Phase::Start, 100.0, 150.0));
        assert_eq!(tool.selected(), None);
    }

    #[test]
    fn test_two_contacts_are_isolated() {
        let mut h = harness_with(&[("1", (0.0, 0.0), (100.0, 0.0)), ("2", (0.0, 300.0), (100.0, 300.0))]);
        h.settings.magnetic_mode = false;
        let mut tool = CursorTool::new();
        h.send(&mut tool, touch(Phase::Start, 7, 0.0, 0.0, 1));
        h.send(&mut tool, touch(Phase::Start, 8, 100.0, 300.0, 2));
        h.send(&mut tool, touch(Phase::Move, 7, 40.0, 50.0, 2));
        assert_eq!(h.doc.plan().walls[1].p2.pos(), Point::new(100.0, 300.0));
        h.send(&mut tool, touch(Phase::Move, 8, 150.0, 250.0, 2));
        assert_eq!(h.doc.plan().walls[0].p1.pos(), Point::new(40.0, 50.0));
        h.send(&mut tool, touch(Phase::End, 7, 40.0, 50.0, 1));
        h.send(&mut tool, touch(Phase::End, 8, 150.0, 250.0, 0));

        let plan = h.doc.plan();
        assert_eq!(plan.walls[0].p1.pos(), Point::new(40.0, 50.0));
        assert_eq!(plan.walls[1].p2.pos(), Point::new(150.0, 250.0));
        assert_eq!(h.doc.history().undo_len(), 2);
    }

    #[test]
    fn test_tagged_points_are_not_stolen() {
        let mut h = harness_with(&[("1", (0.0, 0.0), (100.0, 0.0))]);
        let mut tool = CursorTool::new();
        h.send(&mut tool, touch(Phase::Start, 7, 100.0, 0.0, 1));
        h.send(&mut tool, touch(Phase::Start, 8, 101.0, 1.0, 2));
        assert_eq!(h.doc.plan().walls[0].p2.edit_id, Some(7));
        h.send(&mut tool, touch(Phase::Move, 8, 50.0, 50.0, 2));
        assert_eq!(h.doc.plan().walls[0].p2.pos(), Point::new(100.0, 0.0));
    }

    #[test]
    fn test_two_contacts_drag_ends_of_one_wall() {
        let mut h = harness_with(&[("1", (0.0, 0.0), (100.0, 0.0))]);
        h.settings.magnetic_mode = false;
        let mut tool = CursorTool::new();
        h.send(&mut tool, touch(Phase::Start, 7, 0.0, 0.0, 1));
        h.send(&mut tool, touch(Phase::Start, 8, 100.0, 0.0, 2));
        h.send(&mut tool, touch(Phase::Move, 8, 180.0, 50.0, 2));
        h.send(&mut tool, touch(Phase::Move, 7, 0.0, 60.0, 2));
        h.send(&mut tool, touch(Phase::End, 7, 0.0, 60.0, 1));

        let wall = &h.doc.plan().walls[0];
        assert_eq!(wall.p1.edit_id, None);
        assert_eq!(wall.p2.edit_id, Some(8));
        assert_eq!(wall.p2.pos(), Point::new(180.0, 50.0));

        h.send(&mut tool, touch(Phase::Move, 8, 250.0, 90.0, 1));
        h.send(&mut tool, touch(Phase::End, 8, 250.0, 90.0, 0));
        let wall = &h.doc.plan().walls[0];
        assert_eq!(wall.p1.pos(), Point::new(0.0, 60.0));
        assert_eq!(wall.p2.pos(), Point::new(250.0, 90.0));
        assert!(!wall.is_being_edited());
        assert_eq!(h.doc.history().undo_len(), 2);

        // Each record only carries the endpoint its own contact moved.
        let mut surface = std::mem::take(&mut h.surface);
        assert!(h.doc.undo(&mut surface, 15.0));
        let wall = &h.doc.plan().walls[0];
        assert_eq!(wall.p1.pos(), Point::new(0.0, 60.0));
        assert_eq!(wall.p2.pos(), Point::new(100.0, 0.0));
        assert!(h.doc.undo(&mut surface, 15.0));
        assert_eq!(h.doc.plan().walls[0].p1.pos(), Point::new(0.0, 0.0));
        assert!(h.doc.redo(&mut surface, 15.0));
        let wall = &h.doc.plan().walls[0];
        assert_eq!(wall.p1.pos(), Point::new(0.0, 60.0));
        assert_eq!(wall.p2.pos(), Point::new(100.0, 0.0));
    }

    #[test]
    fn test_undo_keeps_live_drag() {
        let mut h = harness_with(&[("1", (0.0, 0.0), (100.0, 0.0))]);
        h.settings.magnetic_mode = false;
        let mut tool = CursorTool::new();
        drag(&mut h, &mut tool, (0.0, 0.0), (0.0, -50.0));
        h.send(&mut tool, touch(Phase::Start, 9, 100.0, 0.0, 1));
        h.send(&mut tool, touch(Phase::Move, 9, 140.0, 30.0, 1));

        let mut surface = std::mem::take(&mut h.surface);
        assert!(h.doc.undo(&mut surface, 15.0));
        h.surface = surface;
        let live = &h.doc.plan().walls[0];
        assert_eq!(live.p1.pos(), Point::new(0.0, 0.0));
        assert_eq!(live.p2.edit_id, Some(9));
        assert_eq!(live.p2.pos(), Point::new(140.0, 30.0));

        h.send(&mut tool, touch(Phase::Move, 9, 160.0, 40.0, 1));
        h.send(&mut tool, touch(Phase::End, 9, 160.0, 40.0, 0));
        let wall = &h.doc.plan().walls[0];
        assert_eq!(wall.p1.pos(), Point::new(0.0, 0.0));
        assert_eq!(wall.p2.pos(), Point::new(160.0, 40.0));
    }

    #[test]
    fn test_cancel_settles_and_commits() {
        let mut h = harness_with(&[("1", (0.0, 0.0), (100.0, 0.0)), ("2", (300.0, 200.0), (300.0, 400.0))]);
        let mut tool = CursorTool::new();
        h.send(&mut tool, mouse(Phase::Start, 100.0, 0.0));
        h.send(&mut tool, mouse(Phase::Move, 290.0, 195.0));
        assert!(h.surface.has_group("p1"));

        h.send(&mut tool, ToolEvent::mouse(Phase::Cancel, Point::new(290.0, 195.0), false));
        assert!(!tool.is_busy());
        assert!(!h.surface.has_group("p1"));
        let plan = h.doc.plan();
        assert!(plan.walls.iter().all(|w| !w.is_being_edited()));
        assert_eq!(plan.walls[0].p2.pos(), Point::new(300.0, 200.0));
        assert!(matches!(h.doc.history().last(), Some(HistoryRecord::WallsMoved { .. })));
    }

    #[test]
    fn test_deactivate_releases_tags() {
        let mut h = harness_with(&[("1", (0.0, 0.0), (100.0, 0.0))]);
        h.settings.magnetic_mode = false;
        let mut tool = CursorTool::new();
        h.send(&mut tool, mouse(Phase::Start, 100.0, 0.0));
        h.send(&mut tool, mouse(Phase::Move, 130.0, 40.0));
        tool.deactivate(&mut h.ctx());
        assert!(!tool.is_busy());
        assert!(!h.doc.plan().walls[0].is_being_edited());
        assert!(h.doc.history().can_undo());
    }
}
