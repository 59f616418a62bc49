//! Cutting walls with a stroke, or tapping one to remove it.

use super::{Tool, ToolContext};
use crate::draw::{self, CROSS_GROUP, Highlight, WALLS_GROUP};
use crate::geometry;
use crate::history::HistoryRecord;
use crate::input::{Phase, ToolEvent};
use crate::plan::{ContactId, Plan, WallId};
use crate::surface::{CircleOptions, LineOptions, Style, Target};
use kurbo::{Circle, Line, Point};
use peniko::Color;

/// Radius of the crossing markers.
const CROSS_MARKER_RADIUS: f64 = 5.0;

/// Screen distance under which a press and release count as a tap.
const TAP_TOLERANCE: f64 = 3.0;

#[derive(Debug, Clone)]
struct Cut {
    contact: ContactId,
    start: Point,
    current: Point,
}

#[derive(Debug, Clone, Default)]
pub struct DestroyTool {
    cut: Option<Cut>,
    /// Walls currently drawn with the destroy highlight.
    pending: Vec<WallId>,
}

/// Walls truly crossed by `cut`, with their crossing points, in plan order.
fn crossed_walls(plan: &Plan, cut: Line) -> Vec<(WallId, Point)> {
    plan.walls
        .iter()
        .filter_map(|w| geometry::intersect(w.line(), cut, true).map(|p| (w.id.clone(), p)))
        .collect()
}

fn red() -> Color {
    Color::from_rgba8(255, 0, 0, 255)
}

impl DestroyTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Redraw highlights so exactly `ids` carry the destroy color.
    fn set_pending(&mut self, ctx: &mut ToolContext<'_>, ids: Vec<WallId>) {
        let radius = ctx.magnet_radius();
        let plan = ctx.doc.plan();
        for id in self.pending.iter().filter(|id| !ids.contains(*id)) {
            if let Some(wall) = plan.wall(id) {
                draw::draw_wall(ctx.surface, wall, radius, Highlight::None);
            }
        }
        for id in &ids {
            if let Some(wall) = plan.wall(id) {
                draw::draw_wall(ctx.surface, wall, radius, Highlight::Destroy);
            }
        }
        self.pending = ids;
    }

    fn draw_cut(ctx: &mut ToolContext<'_>, cut: &Cut) -> Vec<WallId> {
        let group = ctx.surface.create_group(CROSS_GROUP, Some(WALLS_GROUP));
        ctx.surface.draw_line(LineOptions {
            target: Target::new(format!("d{}", cut.contact), Some(group.as_str())),
            line: Line::new(cut.start, cut.current),
            style: Style::stroke(red(), ctx.viewport.scale),
        });

        let crossed = crossed_walls(ctx.doc.plan(), Line::new(cut.start, cut.current));
        let marker_ids: Vec<String> = crossed
            .iter()
            .map(|(id, point)| {
                let marker = format!("x{}", id);
                ctx.surface.draw_circle(CircleOptions {
                    target: Target::new(marker.clone(), Some(group.as_str())),
                    circle: Circle::new(*point, CROSS_MARKER_RADIUS),
                    style: Style::filled(red()),
                });
                marker
            })
            .collect();
        ctx.surface.remove_elements(
            &|id| id.starts_with('x') && !marker_ids.iter().any(|m| m.as_str() == id),
            Some(group.as_str()),
        );
        crossed.into_iter().map(|(id, _)| id).collect()
    }

    fn reset(&mut self, ctx: &mut ToolContext<'_>) {
        self.cut = None;
        ctx.surface.remove_element(CROSS_GROUP, None);
        self.set_pending(ctx, Vec::new());
    }
}

impl Tool for DestroyTool {
    fn on_start(&mut self, ctx: &mut ToolContext<'_>, event: &ToolEvent) {
        if self.cut.is_some() || event.is_additional_touch() {
            return;
        }
        let Some(contact) = event.primary() else {
            return;
        };
        let start = ctx.to_plan(contact.position);
        self.cut = Some(Cut {
            contact: contact.id,
            start,
            current: start,
        });
    }

    fn on_move(&mut self, ctx: &mut ToolContext<'_>, event: &ToolEvent) {
        let Some(contact) = event.primary() else {
            return;
        };
        let point = ctx.to_plan(contact.position);

        if event.is_hover() {
            let near = ctx
                .doc
                .plan()
                .find_near_wall(point, ctx.magnet_radius())
                .map(|w| w.id.clone());
            self.set_pending(ctx, near.into_iter().collect());
            return;
        }

        let Some(cut) = self.cut.as_mut() else {
            return;
        };
        let Some(c) = event.changed().into_iter().find(|c| c.id == cut.contact) else {
            return;
        };
        cut.current = ctx.to_plan(c.position);
        let cut = cut.clone();
        let crossed = Self::draw_cut(ctx, &cut);
        self.set_pending(ctx, crossed);
    }

    fn on_end(&mut self, ctx: &mut ToolContext<'_>, event: &ToolEvent) {
        let Some(cut) = self.cut.clone() else {
            return;
        };
        let Some(c) = event.changed().into_iter().find(|c| c.id == cut.contact) else {
            return;
        };
        if event.phase == Phase::Cancel {
            log::debug!("Cut cancelled");
            self.reset(ctx);
            return;
        }
        let end = ctx.to_plan(c.position);

        let mut ids: Vec<WallId> = crossed_walls(ctx.doc.plan(), Line::new(cut.start, end))
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        if geometry::distance(cut.start, end) <= ctx.viewport.plan_length(TAP_TOLERANCE) {
            if let Some(wall) = ctx.doc.plan().find_near_wall(end, ctx.magnet_radius()) {
                if !ids.contains(&wall.id) {
                    ids.push(wall.id.clone());
                }
            }
        }

        self.reset(ctx);
        let record = HistoryRecord::walls_destroyed(ctx.doc.plan(), ids.iter().map(String::as_str));
        if let Some(record) = record {
            log::debug!("Destroying {} walls", ids.len());
            let radius = ctx.magnet_radius();
            ctx.doc.commit(record, ctx.surface, radius);
        }
    }

    fn deactivate(&mut self, ctx: &mut ToolContext<'_>) {
        self.reset(ctx);
    }

    fn is_busy(&self) -> bool {
        self.cut.is_some()
    }
}
