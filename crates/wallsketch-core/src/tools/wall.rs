//! Wall drawing: press to anchor, drag to size, release to commit.

use super::{Tool, ToolContext};
use crate::draw::{self, Highlight};
use crate::geometry;
use crate::history::HistoryRecord;
use crate::input::{Phase, ToolEvent};
use crate::plan::{ContactId, Wall};
use crate::snap;
use kurbo::Point;

#[derive(Debug, Clone, Default)]
enum WallState {
    #[default]
    Idle,
    /// A wall held outside the plan until release.
    Drawing { contact: ContactId, wall: Wall },
}

/// Draws new walls. A second touch while drawing aborts the wall.
#[derive(Debug, Clone, Default)]
pub struct WallTool {
    state: WallState,
}

impl WallTool {
    pub fn new() -> Self {
        Self::default()
    }

    fn cancel(&mut self, ctx: &mut ToolContext<'_>) {
        if let WallState::Drawing { contact, wall } = std::mem::take(&mut self.state) {
            log::debug!("Cancelled wall {}", wall.id);
            draw::remove_wall(ctx.surface, &wall.id);
            draw::remove_guide_lines(ctx.surface, contact);
        }
    }

    /// Move the free end to `point`, applying axis alignment.
    fn drag_to(ctx: &mut ToolContext<'_>, contact: ContactId, wall: &mut Wall, point: Point) {
        if ctx.settings.wall_alignment_mode {
            let aligned = snap::align_new_wall(
                ctx.doc.plan(),
                wall.p1.pos(),
                point,
                ctx.alignment_radius(),
                Some(wall.id.as_str()),
            );
            wall.p2.set_pos(aligned.point);
            draw::draw_guide_lines(ctx.surface, contact, aligned.point, &aligned.guides);
        } else {
            wall.p2.set_pos(point);
        }
        let radius = ctx.magnet_radius();
        draw::draw_wall(ctx.surface, wall, radius, Highlight::None);
    }
}

impl Tool for WallTool {
    fn on_start(&mut self, ctx: &mut ToolContext<'_>, event: &ToolEvent) {
        if matches!(self.state, WallState::Drawing { .. }) || event.is_additional_touch() {
            self.cancel(ctx);
            return;
        }
        let Some(contact) = event.primary() else {
            return;
        };

        let radius = ctx.magnet_radius();
        let mut start = ctx.to_plan(contact.position);
        if ctx.settings.magnetic_mode {
            start = snap::merge_point(ctx.doc.plan(), start, radius, None).point;
        }
        let id = ctx.doc.plan_mut().allocate_wall_id();
        let mut wall = Wall::new(id, start, start);
        wall.p2.edit_id = Some(contact.id);

        draw::draw_wall(ctx.surface, &wall, radius, Highlight::None);
        self.state = WallState::Drawing {
            contact: contact.id,
            wall,
        };
    }

    fn on_move(&mut self, ctx: &mut ToolContext<'_>, event: &ToolEvent) {
        if event.is_hover() {
            return;
        }
        let WallState::Drawing { contact, wall } = &mut self.state else {
            return;
        };
        let Some(c) = event.changed().into_iter().find(|c| c.id == *contact) else {
            return;
        };
        let point = ctx.to_plan(c.position);
        Self::drag_to(ctx, *contact, wall, point);
    }

    fn on_end(&mut self, ctx: &mut ToolContext<'_>, event: &ToolEvent) {
        let WallState::Drawing { contact, .. } = &self.state else {
            return;
        };
        let contact = *contact;
        let Some(c) = event.changed().into_iter().find(|c| c.id == contact) else {
            return;
        };
        let WallState::Drawing { mut wall, .. } = std::mem::take(&mut self.state) else {
            return;
        };

        if event.phase == Phase::End {
            let point = ctx.to_plan(c.position);
            Self::drag_to(ctx, contact, &mut wall, point);
        }
        if ctx.settings.magnetic_mode {
            let merged = snap::merge_point(ctx.doc.plan(), wall.p2.pos(), ctx.magnet_radius(), Some(wall.id.as_str()));
            wall.p2.set_pos(merged.point);
        }
        draw::remove_guide_lines(ctx.surface, contact);

        if geometry::distance(wall.p1.pos(), wall.p2.pos()) < geometry::EPSILON {
            log::debug!("Discarded zero-length wall {}", wall.id);
            draw::remove_wall(ctx.surface, &wall.id);
            return;
        }
        let radius = ctx.magnet_radius();
        ctx.doc.commit(
            HistoryRecord::WallAdded {
                wall: wall.snapshot(),
            },
            ctx.surface,
            radius,
        );
    }

    fn deactivate(&mut self, ctx: &mut ToolContext<'_>) {
        self.cancel(ctx);
    }

    fn is_busy(&self) -> bool {
        matches!(self.state, WallState::Drawing { .. })
    }
}
