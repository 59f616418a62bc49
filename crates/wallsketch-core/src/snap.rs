//! Snapping of wall endpoints onto other endpoints and onto axis alignments.
//!
//! Every query skips points tagged with an `edit_id`: those belong to live
//! gestures and are never snap targets.

use crate::geometry::{self, Orientation};
use crate::plan::{Plan, Wall, WallEnd, WallId, WallPoint};
use kurbo::{Line, Point};

/// Visual hint linking a dragged point to the endpoint it aligns with.
#[derive(Debug, Clone, PartialEq)]
pub struct GuideLine {
    pub source: Point,
    pub target: Point,
    /// Wall owning `target`.
    pub wall_id: WallId,
    /// Which endpoint of that wall `target` is.
    pub end: WallEnd,
}

impl GuideLine {
    pub fn line(&self) -> Line {
        Line::new(self.source, self.target)
    }
}

/// Result of a snap operation.
#[derive(Debug, Clone)]
pub struct SnapResult {
    /// The snapped point.
    pub point: Point,
    /// Whether the X coordinate was snapped.
    pub snapped_x: bool,
    /// Whether the Y coordinate was snapped.
    pub snapped_y: bool,
    /// Guides to draw for this snap.
    pub guides: Vec<GuideLine>,
}

impl SnapResult {
    /// Create a result with no snapping.
    pub fn none(point: Point) -> Self {
        Self {
            point,
            snapped_x: false,
            snapped_y: false,
            guides: Vec::new(),
        }
    }

    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        self.snapped_x || self.snapped_y
    }
}

fn is_candidate(wall: &Wall, point: &WallPoint, exclude_wall: Option<&str>) -> bool {
    point.edit_id.is_none() && exclude_wall != Some(wall.id.as_str())
}

/// Nearest untagged endpoint within `radius`, ignoring `exclude_wall`.
pub fn nearest_endpoint<'a>(
    plan: &'a Plan,
    point: Point,
    radius: f64,
    exclude_wall: Option<&str>,
) -> Option<(&'a Wall, WallEnd, Point)> {
    plan.endpoints()
        .filter(|(wall, _, p)| is_candidate(wall, p, exclude_wall))
        .map(|(wall, end, p)| (wall, end, p.pos(), geometry::distance(point, p.pos())))
        .filter(|(.., d)| *d <= radius)
        .min_by(|a, b| a.3.total_cmp(&b.3))
        .map(|(wall, end, p, _)| (wall, end, p))
}

/// Move `point` exactly onto the nearest endpoint within `radius`.
pub fn merge_point(plan: &Plan, point: Point, radius: f64, exclude_wall: Option<&str>) -> SnapResult {
    match nearest_endpoint(plan, point, radius, exclude_wall) {
        Some((wall, end, target)) => SnapResult {
            point: target,
            snapped_x: true,
            snapped_y: true,
            guides: vec![GuideLine {
                source: point,
                target,
                wall_id: wall.id.clone(),
                end,
            }],
        },
        None => SnapResult::none(point),
    }
}

/// Final merge pass for a released point.
///
/// A point that already sits exactly on an untagged endpoint counts as merged
/// and is left in place. Otherwise it merges onto the nearest untagged
/// endpoint within `radius`.
pub fn settle_point(plan: &Plan, point: Point, radius: f64) -> SnapResult {
    let already_merged = plan
        .endpoints()
        .any(|(_, _, p)| p.edit_id.is_none() && p.pos() == point);
    if already_merged {
        return SnapResult::none(point);
    }
    merge_point(plan, point, radius, None)
}

/// Settled walls lying exactly on the axis of `orientation`. Diagonal walls
/// are never alignment targets.
fn aligned_walls<'a>(
    plan: &'a Plan,
    orientation: Orientation,
    exclude_wall: Option<&'a str>,
) -> impl Iterator<Item = &'a Wall> {
    plan.walls.iter().filter(move |w| {
        let on_axis = match orientation {
            Orientation::Horizontal => w.p1.y == w.p2.y,
            Orientation::Vertical => w.p1.x == w.p2.x,
        };
        on_axis && !w.is_being_edited() && exclude_wall != Some(w.id.as_str())
    })
}

/// Constrain the free end of a wall being drawn.
///
/// The free end is locked to the dominant axis from `anchor`. Its free
/// coordinate then snaps to the nearest matching coordinate of a wall with the
/// same orientation within `radius`, with a guide to every endpoint sharing it.
pub fn align_new_wall(
    plan: &Plan,
    anchor: Point,
    free: Point,
    radius: f64,
    exclude_wall: Option<&str>,
) -> SnapResult {
    let orientation = geometry::orientation(Line::new(anchor, free));
    let locked = match orientation {
        Orientation::Horizontal => Point::new(free.x, anchor.y),
        Orientation::Vertical => Point::new(anchor.x, free.y),
    };
    let coord = |p: Point| match orientation {
        Orientation::Horizontal => p.x,
        Orientation::Vertical => p.y,
    };

    let best = aligned_walls(plan, orientation, exclude_wall)
        .flat_map(|w| [w.p1.pos(), w.p2.pos()])
        .map(|p| (coord(p), (coord(p) - coord(locked)).abs()))
        .filter(|(_, d)| *d <= radius)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(c, _)| c);

    let Some(target) = best else {
        let mut result = SnapResult::none(locked);
        match orientation {
            Orientation::Horizontal => result.snapped_y = true,
            Orientation::Vertical => result.snapped_x = true,
        }
        return result;
    };

    let point = match orientation {
        Orientation::Horizontal => Point::new(target, locked.y),
        Orientation::Vertical => Point::new(locked.x, target),
    };
    let guides = aligned_walls(plan, orientation, exclude_wall)
        .flat_map(|w| [(w, WallEnd::Start, w.p1.pos()), (w, WallEnd::End, w.p2.pos())])
        .filter(|(.., p)| (coord(*p) - target).abs() < geometry::EPSILON)
        .map(|(w, end, p)| GuideLine {
            source: point,
            target: p,
            wall_id: w.id.clone(),
            end,
        })
        .collect();

    SnapResult {
        point,
        snapped_x: true,
        snapped_y: true,
        guides,
    }
}

/// Per-axis alignment for a dragged point.
///
/// X and Y snap independently to the nearest untagged endpoint coordinate
/// within `radius`. When both snap to the same endpoint the point merges onto
/// it.
pub fn drag_alignment(plan: &Plan, point: Point, radius: f64) -> SnapResult {
    let candidates: Vec<(&Wall, WallEnd, Point)> = plan
        .endpoints()
        .filter(|(wall, _, p)| is_candidate(wall, p, None))
        .map(|(wall, end, p)| (wall, end, p.pos()))
        .collect();

    // Ties on the axis go to the endpoint closest overall.
    let nearest_on = |axis: fn(Point) -> f64| {
        candidates
            .iter()
            .map(|(w, end, p)| (*w, *end, *p, (axis(*p) - axis(point)).abs()))
            .filter(|(.., d)| *d <= radius)
            .min_by(|a, b| {
                a.3.total_cmp(&b.3)
                    .then_with(|| geometry::distance(point, a.2).total_cmp(&geometry::distance(point, b.2)))
            })
            .map(|(w, end, p, _)| (w, end, p))
    };

    let by_x = nearest_on(|p| p.x);
    let by_y = nearest_on(|p| p.y);

    let mut result = SnapResult::none(point);
    if let Some((.., target)) = by_x {
        result.point.x = target.x;
        result.snapped_x = true;
    }
    if let Some((.., target)) = by_y {
        result.point.y = target.y;
        result.snapped_y = true;
    }
    for (wall, end, target) in [by_x, by_y].into_iter().flatten() {
        if result.guides.iter().any(|g| g.target == target) {
            continue;
        }
        result.guides.push(GuideLine {
            source: result.point,
            target,
            wall_id: wall.id.clone(),
            end,
        });
    }
    result
}
