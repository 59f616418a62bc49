//! Drawing-surface contract.
//!
//! The editor is write-only towards the surface: every draw call is an upsert
//! keyed by a stable element id, and nothing is ever read back. Hosts provide
//! an implementation backed by SVG, a GPU scene, or anything else.

use crate::plan::NotePoint;
use kurbo::{Circle, Line, Point, Rect};
use peniko::Color;
use std::collections::HashMap;

/// Stroke and fill applied to an element.
#[derive(Debug, Clone)]
pub struct Style {
    pub stroke: Option<Color>,
    pub stroke_width: f64,
    pub fill: Option<Color>,
    /// Dash pattern lengths; `None` for a solid stroke.
    pub dash: Option<Vec<f64>>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            stroke: Some(Color::from_rgba8(0, 0, 0, 255)),
            stroke_width: 1.0,
            fill: None,
            dash: None,
        }
    }
}

impl Style {
    pub fn stroke(color: Color, width: f64) -> Self {
        Self {
            stroke: Some(color),
            stroke_width: width,
            ..Self::default()
        }
    }

    pub fn filled(color: Color) -> Self {
        Self {
            stroke: None,
            fill: Some(color),
            ..Self::default()
        }
    }

    pub fn dashed(mut self, dash: Vec<f64>) -> Self {
        self.dash = Some(dash);
        self
    }

    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }
}

/// Element id and optional parent group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub id: String,
    pub group: Option<String>,
}

impl Target {
    pub fn new(id: impl Into<String>, group: Option<&str>) -> Self {
        Self {
            id: id.into(),
            group: group.map(str::to_string),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LineOptions {
    pub target: Target,
    pub line: Line,
    pub style: Style,
}

#[derive(Debug, Clone)]
pub struct RectOptions {
    pub target: Target,
    pub rect: Rect,
    pub style: Style,
}

#[derive(Debug, Clone)]
pub struct CircleOptions {
    pub target: Target,
    pub circle: Circle,
    pub style: Style,
}

/// Circular arc; angles in degrees, sweep counter-clockwise.
#[derive(Debug, Clone)]
pub struct ArcOptions {
    pub target: Target,
    pub center: Point,
    pub radius: f64,
    pub start_angle: f64,
    pub sweep_angle: f64,
    pub style: Style,
}

#[derive(Debug, Clone)]
pub struct TextOptions {
    pub target: Target,
    pub position: Point,
    pub text: String,
    pub font_size: f64,
    /// Rotation around `position` in degrees.
    pub rotation: f64,
    pub style: Style,
}

/// Polyline through pressure samples. The surface modulates the stroke width
/// by each sample's pressure.
#[derive(Debug, Clone)]
pub struct PathOptions {
    pub target: Target,
    pub points: Vec<NotePoint>,
    pub style: Style,
}

/// Imperative drawing target.
pub trait DrawingSurface {
    /// Create (or keep) a group under `parent`. Returns the group id.
    fn create_group(&mut self, id: &str, parent: Option<&str>) -> String;

    fn draw_line(&mut self, options: LineOptions) -> String;

    fn draw_rect(&mut self, options: RectOptions) -> String;

    fn draw_circle(&mut self, options: CircleOptions) -> String;

    fn draw_arc(&mut self, options: ArcOptions) -> String;

    fn draw_text(&mut self, options: TextOptions) -> String;

    fn draw_path(&mut self, options: PathOptions) -> String;

    /// Remove an element or a whole group. With `group`, only an element
    /// inside that group is removed.
    fn remove_element(&mut self, id: &str, group: Option<&str>);

    /// Remove every element whose id matches `predicate`.
    fn remove_elements(&mut self, predicate: &dyn Fn(&str) -> bool, group: Option<&str>);
}

/// Geometry of a recorded element.
#[derive(Debug, Clone)]
pub enum Primitive {
    Line(Line),
    Rect(Rect),
    Circle(Circle),
    Arc { center: Point, radius: f64, start_angle: f64, sweep_angle: f64 },
    Text { position: Point, text: String },
    Path(Vec<NotePoint>),
}

/// A drawn element held by [`RecordingSurface`].
#[derive(Debug, Clone)]
pub struct RecordedElement {
    pub group: Option<String>,
    pub primitive: Primitive,
    pub style: Style,
}

/// In-memory surface that keeps the latest state of every element.
///
/// Used headless and in tests to observe what the editor drew.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    elements: HashMap<String, RecordedElement>,
    groups: HashMap<String, Option<String>>,
    draw_calls: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element(&self, id: &str) -> Option<&RecordedElement> {
        self.elements.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id) || self.groups.contains_key(id)
    }

    pub fn has_group(&self, id: &str) -> bool {
        self.groups.contains_key(id)
    }

    /// Ids of the elements directly inside `group`, sorted.
    pub fn children(&self, group: &str) -> Vec<String> {
        let mut ids: Vec<String> = self
            .elements
            .iter()
            .filter(|(_, e)| e.group.as_deref() == Some(group))
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn draw_calls(&self) -> usize {
        self.draw_calls
    }

    fn upsert(&mut self, target: Target, primitive: Primitive, style: Style) -> String {
        self.draw_calls += 1;
        let id = target.id.clone();
        self.elements.insert(
            target.id,
            RecordedElement {
                group: target.group,
                primitive,
                style,
            },
        );
        id
    }

    fn remove_group(&mut self, id: &str) {
        self.groups.remove(id);
        self.elements.retain(|_, e| e.group.as_deref() != Some(id));
        let nested: Vec<String> = self
            .groups
            .iter()
            .filter(|(_, parent)| parent.as_deref() == Some(id))
            .map(|(g, _)| g.clone())
            .collect();
        for g in nested {
            self.remove_group(&g);
        }
    }
}

impl DrawingSurface for RecordingSurface {
    fn create_group(&mut self, id: &str, parent: Option<&str>) -> String {
        self.groups
            .entry(id.to_string())
            .or_insert_with(|| parent.map(str::to_string));
        id.to_string()
    }

    fn draw_line(&mut self, options: LineOptions) -> String {
        self.upsert(options.target, Primitive::Line(options.line), options.style)
    }

    fn draw_rect(&mut self, options: RectOptions) -> String {
        self.upsert(options.target, Primitive::Rect(options.rect), options.style)
    }

    fn draw_circle(&mut self, options: CircleOptions) -> String {
        self.upsert(options.target, Primitive::Circle(options.circle), options.style)
    }

    fn draw_arc(&mut self, options: ArcOptions) -> String {
        let primitive = Primitive::Arc {
            center: options.center,
            radius: options.radius,
            start_angle: options.start_angle,
            sweep_angle: options.sweep_angle,
        };
        self.upsert(options.target, primitive, options.style)
    }

    fn draw_text(&mut self, options: TextOptions) -> String {
        let primitive = Primitive::Text {
            position: options.position,
            text: options.text,
        };
        self.upsert(options.target, primitive, options.style)
    }

    fn draw_path(&mut self, options: PathOptions) -> String {
        self.upsert(options.target, Primitive::Path(options.points), options.style)
    }

    fn remove_element(&mut self, id: &str, group: Option<&str>) {
        if self.groups.contains_key(id) {
            let parent_matches = match group {
                Some(g) => self.groups.get(id).and_then(|p| p.as_deref()) == Some(g),
                None => true,
            };
            if parent_matches {
                self.remove_group(id);
            }
            return;
        }
        let matches = match (group, self.elements.get(id)) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(g), Some(e)) => e.group.as_deref() == Some(g),
        };
        if matches {
            self.elements.remove(id);
        }
    }

    fn remove_elements(&mut self, predicate: &dyn Fn(&str) -> bool, group: Option<&str>) {
        self.elements.retain(|id, e| {
            let in_group = group.is_none_or(|g| e.group.as_deref() == Some(g));
            !(in_group && predicate(id))
        });
    }
}
