//! Rendering of plan entities onto a [`DrawingSurface`].
//!
//! Element ids are stable so that redraws are upserts:
//! - wall `7` lives in group `w7` under [`WALLS_GROUP`] with body `w7l`,
//!   endpoint circles `w7c1`/`w7c2` and endpoint squares `w7s`/`w7e`;
//! - guides for contact `3` live in group `p3` under [`GUIDE_GROUP`], one line
//!   `p3g{wall}s` or `p3g{wall}e` per aligned endpoint;
//! - notes are paths under [`PEN_GROUP`] keyed by the note id.

use crate::geometry;
use crate::plan::{ContactId, Note, Wall, WallEnd, WallType};
use crate::snap::GuideLine;
use crate::surface::{
    ArcOptions, CircleOptions, DrawingSurface, LineOptions, PathOptions, RectOptions, Style,
    Target, TextOptions,
};
use kurbo::{Circle, Line, Point, Rect, Vec2};
use peniko::Color;

pub const WALLS_GROUP: &str = "walls";
pub const GUIDE_GROUP: &str = "guide";
pub const PEN_GROUP: &str = "pen";
/// Cut line and crossing markers of the destroy tool.
pub const CROSS_GROUP: &str = "cross";

/// Side of the endpoint squares.
pub const WALL_POINT_SIZE: f64 = 10.0;
const LABEL_FONT_SIZE: f64 = 14.0;
const LABEL_OFFSET: f64 = 12.0;
const WINDOW_HALF_GAP: f64 = 4.0;
const GUIDE_DASH: [f64; 2] = [10.0, 10.0];
const RULER_DASH: [f64; 2] = [6.0, 4.0];

/// Color treatment for a wall body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Highlight {
    #[default]
    None,
    /// Selected by the cursor tool.
    Selected,
    /// About to be removed by the destroy tool.
    Destroy,
}

impl Highlight {
    fn color(self) -> Color {
        match self {
            Highlight::None => black(),
            Highlight::Selected => Color::from_rgba8(0, 112, 243, 255),
            Highlight::Destroy => red(),
        }
    }
}

fn black() -> Color {
    Color::from_rgba8(0, 0, 0, 255)
}

fn red() -> Color {
    Color::from_rgba8(255, 0, 0, 255)
}

fn green() -> Color {
    Color::from_rgba8(0, 128, 0, 255)
}

/// Parse a stored stroke color: `#rgb`, `#rrggbb`, `#rrggbbaa` or a few
/// names. Unknown values fall back to black.
pub fn parse_color(color: &str) -> Color {
    let hex_pair = |s: &str| u8::from_str_radix(s, 16).unwrap_or(0);
    if let Some(hex) = color.trim().strip_prefix('#') {
        match hex.len() {
            3 if hex.is_ascii() => {
                let r = hex_pair(&hex[0..1]) * 17;
                let g = hex_pair(&hex[1..2]) * 17;
                let b = hex_pair(&hex[2..3]) * 17;
                return Color::from_rgba8(r, g, b, 255);
            }
            6 if hex.is_ascii() => {
                return Color::from_rgba8(hex_pair(&hex[0..2]), hex_pair(&hex[2..4]), hex_pair(&hex[4..6]), 255);
            }
            8 if hex.is_ascii() => {
                return Color::from_rgba8(
                    hex_pair(&hex[0..2]),
                    hex_pair(&hex[2..4]),
                    hex_pair(&hex[4..6]),
                    hex_pair(&hex[6..8]),
                );
            }
            _ => {}
        }
    }
    match color {
        "white" => Color::from_rgba8(255, 255, 255, 255),
        "red" => red(),
        "green" => green(),
        "transparent" | "none" => Color::from_rgba8(0, 0, 0, 0),
        _ => black(),
    }
}

pub fn wall_group_id(wall_id: &str) -> String {
    format!("w{}", wall_id)
}

pub fn guide_group_id(contact: ContactId) -> String {
    format!("p{}", contact)
}

fn square(center: Point, size: f64) -> Rect {
    Rect::from_center_size(center, (size, size))
}

/// Draw or redraw a wall, its endpoint markers, labels and type decoration.
///
/// `circle_radius` is the endpoint magnet radius in plan units.
pub fn draw_wall(surface: &mut dyn DrawingSurface, wall: &Wall, circle_radius: f64, highlight: Highlight) {
    let gid = surface.create_group(&wall_group_id(&wall.id), Some(WALLS_GROUP));
    let g = Some(gid.as_str());
    let id = |suffix: &str| format!("w{}{}", wall.id, suffix);

    for (suffix, p) in [("c1", wall.p1.pos()), ("c2", wall.p2.pos())] {
        surface.draw_circle(CircleOptions {
            target: Target::new(id(suffix), g),
            circle: Circle::new(p, circle_radius),
            style: Style::stroke(black(), 1.0),
        });
    }

    let color = highlight.color();
    let mut body = Style::stroke(color, 2.0);
    if wall.kind == WallType::Ruler {
        body = body.dashed(RULER_DASH.to_vec());
    }
    surface.draw_line(LineOptions {
        target: Target::new(id("l"), g),
        line: wall.line(),
        style: body,
    });

    surface.draw_rect(RectOptions {
        target: Target::new(id("s"), g),
        rect: square(wall.p1.pos(), WALL_POINT_SIZE),
        style: Style::filled(green()),
    });
    surface.draw_rect(RectOptions {
        target: Target::new(id("e"), g),
        rect: square(wall.p2.pos(), WALL_POINT_SIZE),
        style: Style::filled(red()),
    });

    draw_decoration(surface, wall, g, color);
    draw_labels(surface, wall, g, color);
}

fn draw_decoration(surface: &mut dyn DrawingSurface, wall: &Wall, group: Option<&str>, color: Color) {
    let decoration_id = format!("w{}d", wall.id);
    surface.remove_element(&decoration_id, group);
    surface.remove_element(&format!("w{}d2", wall.id), group);

    let line = wall.line();
    match wall.kind {
        WallType::Wall => {}
        WallType::Window => {
            let Some(normal) = geometry::normalize((line.p1 - line.p0).turn_90()) else {
                return;
            };
            let shift = normal * WINDOW_HALF_GAP;
            for (suffix, offset) in [("d", shift), ("d2", -shift)] {
                surface.draw_line(LineOptions {
                    target: Target::new(format!("w{}{}", wall.id, suffix), group),
                    line: Line::new(line.p0 + offset, line.p1 + offset),
                    style: Style::stroke(color, 1.0),
                });
            }
        }
        WallType::Door => {
            let length = wall.length();
            if length < geometry::EPSILON {
                return;
            }
            let (hinge, swing_from, clockwise) = door_geometry(wall);
            let start_angle = geometry::angle(hinge, swing_from);
            let sweep_angle = if clockwise { -90.0 } else { 90.0 };
            surface.draw_arc(ArcOptions {
                target: Target::new(decoration_id, group),
                center: hinge,
                radius: length,
                start_angle,
                sweep_angle,
                style: Style::stroke(color, 1.0),
            });
        }
        WallType::Ruler => {
            let length = wall.length();
            surface.draw_text(TextOptions {
                target: Target::new(decoration_id, group),
                position: line.p0.midpoint(line.p1),
                text: format!("{:.0}", length),
                font_size: LABEL_FONT_SIZE,
                rotation: label_rotation(wall),
                style: Style::filled(color),
            });
        }
    }
}

/// Hinge point, the point the leaf rests on when closed, and swing direction
/// for the wall's door variant.
fn door_geometry(wall: &Wall) -> (Point, Point, bool) {
    let variant = wall
        .variant
        .as_deref()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(1);
    let (a, b) = (wall.p1.pos(), wall.p2.pos());
    match variant {
        2 => (a, b, true),
        3 => (b, a, false),
        4 => (b, a, true),
        _ => (a, b, false),
    }
}

/// Text angle along the wall, kept upright.
fn label_rotation(wall: &Wall) -> f64 {
    let angle = geometry::angle(wall.p1.pos(), wall.p2.pos());
    if angle > 90.0 && angle <= 270.0 {
        angle - 180.0
    } else {
        angle
    }
}

fn draw_labels(surface: &mut dyn DrawingSurface, wall: &Wall, group: Option<&str>, color: Color) {
    let line = wall.line();
    let normal = geometry::normalize((line.p1 - line.p0).turn_90()).unwrap_or(Vec2::new(0.0, 1.0));
    let labels = [
        ("t", wall.top_text.as_deref(), -normal),
        ("b", wall.bottom_text.as_deref(), normal),
    ];
    for (suffix, text, direction) in labels {
        let id = format!("w{}{}", wall.id, suffix);
        match text {
            Some(text) if !text.is_empty() => {
                surface.draw_text(TextOptions {
                    target: Target::new(id, group),
                    position: line.p0.midpoint(line.p1) + direction * LABEL_OFFSET,
                    text: text.to_string(),
                    font_size: LABEL_FONT_SIZE,
                    rotation: label_rotation(wall),
                    style: Style::filled(color),
                });
            }
            _ => surface.remove_element(&id, group),
        }
    }
}

pub fn remove_wall(surface: &mut dyn DrawingSurface, wall_id: &str) {
    surface.remove_element(&wall_group_id(wall_id), Some(WALLS_GROUP));
}

/// Draw the guides of one contact, dropping any of its guides that no longer
/// apply.
pub fn draw_guide_lines(surface: &mut dyn DrawingSurface, contact: ContactId, point: Point, guides: &[GuideLine]) {
    let gid = surface.create_group(&guide_group_id(contact), Some(GUIDE_GROUP));
    let ids: Vec<String> = guides
        .iter()
        .map(|guide| {
            let end = match guide.end {
                WallEnd::Start => 's',
                WallEnd::End => 'e',
            };
            let id = format!("p{}g{}{}", contact, guide.wall_id, end);
            surface.draw_line(LineOptions {
                target: Target::new(id.clone(), Some(gid.as_str())),
                line: Line::new(point, guide.target),
                style: Style::stroke(black(), 1.0).dashed(GUIDE_DASH.to_vec()),
            });
            id
        })
        .collect();
    surface.remove_elements(&|id| !ids.iter().any(|kept| kept.as_str() == id), Some(gid.as_str()));
}

pub fn remove_guide_lines(surface: &mut dyn DrawingSurface, contact: ContactId) {
    surface.remove_element(&guide_group_id(contact), Some(GUIDE_GROUP));
}

/// Draw or redraw a freehand note.
pub fn draw_note(surface: &mut dyn DrawingSurface, note: &Note) {
    let gid = surface.create_group(&note.group_id, None);
    let mut style = Style::stroke(parse_color(&note.stroke), note.stroke_width);
    if let Some(fill) = note.fill.as_deref() {
        style = style.with_fill(parse_color(fill));
    }
    surface.draw_path(PathOptions {
        target: Target::new(note.id.clone(), Some(gid.as_str())),
        points: note.points.clone(),
        style,
    });
}

pub fn remove_note(surface: &mut dyn DrawingSurface, note: &Note) {
    surface.remove_element(&note.id, Some(note.group_id.as_str()));
}
