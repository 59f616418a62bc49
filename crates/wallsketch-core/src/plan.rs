//! The plan document: walls and freehand notes.

use crate::geometry;
use kurbo::{Line, Point};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable wall identifier. Numeric, rendered as a decimal string.
pub type WallId = String;

/// Identifier of an active touch, stylus or mouse contact.
pub type ContactId = u64;

/// A wall endpoint.
///
/// `edit_id` marks the contact currently dragging this point. It is never
/// persisted and must be cleared when that contact is released.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallPoint {
    pub x: f64,
    pub y: f64,
    #[serde(skip)]
    pub edit_id: Option<ContactId>,
}

impl WallPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, edit_id: None }
    }

    pub fn pos(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_pos(&mut self, p: Point) {
        self.x = p.x;
        self.y = p.y;
    }

    /// Exact positional coincidence (edit tags ignored).
    pub fn same_position(&self, other: &WallPoint) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl From<Point> for WallPoint {
    fn from(p: Point) -> Self {
        Self::new(p.x, p.y)
    }
}

/// Which end of a wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WallEnd {
    Start,
    End,
}

/// Kind of segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallType {
    #[default]
    Wall,
    Window,
    Door,
    Ruler,
}

impl WallType {
    fn is_wall(&self) -> bool {
        *self == WallType::Wall
    }
}

/// Number of door swing configurations.
pub const DOOR_VARIANTS: u32 = 4;

/// A typed segment with two owned endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wall {
    pub id: WallId,
    pub p1: WallPoint,
    pub p2: WallPoint,
    #[serde(rename = "type", default, skip_serializing_if = "WallType::is_wall")]
    pub kind: WallType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom_text: Option<String>,
}

impl Wall {
    /// Create a plain wall between two points.
    pub fn new(id: impl Into<WallId>, p1: Point, p2: Point) -> Self {
        Self {
            id: id.into(),
            p1: p1.into(),
            p2: p2.into(),
            kind: WallType::Wall,
            variant: None,
            top_text: None,
            bottom_text: None,
        }
    }

    pub fn line(&self) -> Line {
        Line::new(self.p1.pos(), self.p2.pos())
    }

    pub fn length(&self) -> f64 {
        geometry::distance(self.p1.pos(), self.p2.pos())
    }

    pub fn point(&self, end: WallEnd) -> &WallPoint {
        match end {
            WallEnd::Start => &self.p1,
            WallEnd::End => &self.p2,
        }
    }

    pub fn point_mut(&mut self, end: WallEnd) -> &mut WallPoint {
        match end {
            WallEnd::Start => &mut self.p1,
            WallEnd::End => &mut self.p2,
        }
    }

    /// Whether either endpoint is tagged by an active contact.
    pub fn is_being_edited(&self) -> bool {
        self.p1.edit_id.is_some() || self.p2.edit_id.is_some()
    }

    /// Copy without transient edit tags.
    pub fn snapshot(&self) -> Wall {
        let mut wall = self.clone();
        wall.p1.edit_id = None;
        wall.p2.edit_id = None;
        wall
    }

    /// Whether the endpoints differ from `other`'s.
    pub fn geometry_differs(&self, other: &Wall) -> bool {
        !self.p1.same_position(&other.p1) || !self.p2.same_position(&other.p2)
    }

    /// Whether labels, type or variant differ from `other`'s.
    pub fn attributes_differ(&self, other: &Wall) -> bool {
        self.kind != other.kind
            || self.variant != other.variant
            || self.top_text != other.top_text
            || self.bottom_text != other.bottom_text
    }

    /// Apply a type picked from the type selector.
    ///
    /// Picking `Door` on a door advances the swing variant through
    /// 1, 2, 3, 4 and back to 1. Any other pick sets the type and clears the
    /// variant.
    pub fn select_type(&mut self, kind: WallType) {
        if kind == WallType::Door && self.kind == WallType::Door {
            let current = self
                .variant
                .as_deref()
                .and_then(|v| v.parse::<u32>().ok())
                .filter(|v| (1..=DOOR_VARIANTS).contains(v))
                .unwrap_or(1);
            let next = current % DOOR_VARIANTS + 1;
            self.variant = Some(next.to_string());
        } else {
            self.kind = kind;
            self.variant = None;
        }
    }

    fn numeric_id(&self) -> Option<u64> {
        self.id.parse().ok()
    }
}

/// A sampled point of a freehand stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NotePoint {
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
}

impl NotePoint {
    pub fn new(x: f64, y: f64, pressure: Option<f64>) -> Self {
        Self { x, y, pressure }
    }

    pub fn pos(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A freehand ink stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub points: Vec<NotePoint>,
    pub stroke: String,
    pub stroke_width: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    pub group_id: String,
}

impl Note {
    /// Create an empty stroke with a fresh id.
    pub fn new(stroke: impl Into<String>, stroke_width: f64, group_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            points: Vec::new(),
            stroke: stroke.into(),
            stroke_width,
            fill: None,
            group_id: group_id.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A wall removed from the plan, with the index it occupied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemovedWall {
    pub index: usize,
    pub wall: Wall,
}

/// The floor-plan document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub walls: Vec<Wall>,
    #[serde(default)]
    pub notes: Vec<Note>,
    /// Highest wall id handed out this session.
    #[serde(skip)]
    issued_wall_id: u64,
}

impl Plan {
    /// Create an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize the plan to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize a plan from JSON. Missing `notes` default to empty.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse stored JSON, falling back to an empty plan when it is missing or
    /// malformed.
    pub fn load_or_default(json: Option<&str>) -> Self {
        let Some(json) = json else {
            return Self::new();
        };
        match Self::from_json(json) {
            Ok(plan) => {
                log::info!(
                    "Restored plan with {} walls and {} notes",
                    plan.walls.len(),
                    plan.notes.len()
                );
                plan
            }
            Err(e) => {
                log::warn!("Failed to restore plan, starting empty: {}", e);
                Self::new()
            }
        }
    }

    /// Hand out the next wall id: one past the largest numeric id in the
    /// plan or issued earlier this session, starting at 1.
    pub fn allocate_wall_id(&mut self) -> WallId {
        let max_existing = self.walls.iter().filter_map(Wall::numeric_id).max().unwrap_or(0);
        let next = max_existing.max(self.issued_wall_id) + 1;
        self.issued_wall_id = next;
        next.to_string()
    }

    pub fn wall(&self, id: &str) -> Option<&Wall> {
        self.walls.iter().find(|w| w.id == id)
    }

    pub fn wall_mut(&mut self, id: &str) -> Option<&mut Wall> {
        self.walls.iter_mut().find(|w| w.id == id)
    }

    pub fn contains_wall(&self, id: &str) -> bool {
        self.wall(id).is_some()
    }

    /// Append a wall. Ignored if a wall with the same id already exists.
    pub fn add_wall(&mut self, wall: Wall) -> bool {
        if self.contains_wall(&wall.id) {
            return false;
        }
        self.walls.push(wall);
        true
    }

    /// Insert a wall at `index` (clamped to the end).
    pub fn insert_wall(&mut self, index: usize, wall: Wall) -> bool {
        if self.contains_wall(&wall.id) {
            return false;
        }
        let index = index.min(self.walls.len());
        self.walls.insert(index, wall);
        true
    }

    pub fn remove_wall(&mut self, id: &str) -> Option<RemovedWall> {
        let index = self.walls.iter().position(|w| w.id == id)?;
        let wall = self.walls.remove(index);
        Some(RemovedWall { index, wall })
    }

    /// Overwrite geometry and attributes of the wall with `wall.id`.
    ///
    /// Edit tags on the live wall are kept, and a tagged endpoint keeps its
    /// position since it belongs to the gesture dragging it. Returns false
    /// when the wall is no longer in the plan.
    pub fn replace_wall(&mut self, wall: &Wall) -> bool {
        let Some(existing) = self.wall_mut(&wall.id) else {
            return false;
        };
        for end in [WallEnd::Start, WallEnd::End] {
            let point = existing.point_mut(end);
            if point.edit_id.is_none() {
                point.set_pos(wall.point(end).pos());
            }
        }
        existing.kind = wall.kind;
        existing.variant = wall.variant.clone();
        existing.top_text = wall.top_text.clone();
        existing.bottom_text = wall.bottom_text.clone();
        true
    }

    /// Iterate over every endpoint.
    pub fn endpoints(&self) -> impl Iterator<Item = (&Wall, WallEnd, &WallPoint)> {
        self.walls.iter().flat_map(|w| {
            [(w, WallEnd::Start, &w.p1), (w, WallEnd::End, &w.p2)]
        })
    }

    /// Nearest wall whose body lies within `radius` of `point`.
    pub fn find_near_wall(&self, point: Point, radius: f64) -> Option<&Wall> {
        self.walls
            .iter()
            .filter_map(|w| geometry::distance_to_segment(point, w.line()).map(|d| (w, d)))
            .filter(|(_, d)| *d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(w, _)| w)
    }

    pub fn note(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn add_note(&mut self, note: Note) -> bool {
        if self.note(&note.id).is_some() {
            return false;
        }
        self.notes.push(note);
        true
    }

    pub fn remove_note(&mut self, id: &str) -> Option<Note> {
        let index = self.notes.iter().position(|n| n.id == id)?;
        Some(self.notes.remove(index))
    }

    /// Drop all walls and notes. Issued ids stay reserved.
    pub fn clear(&mut self) {
        let max_existing = self.walls.iter().filter_map(Wall::numeric_id).max().unwrap_or(0);
        self.issued_wall_id = self.issued_wall_id.max(max_existing);
        self.walls.clear();
        self.notes.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.walls.is_empty() && self.notes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall(id: &str, x1: f64, y1: f64, x2: f64, y2: f64) -> Wall {
        Wall::new(id, Point::new(x1, y1), Point::new(x2, y2))
    }

    #[test]
    fn test_allocate_wall_id_empty() {
        let mut plan = Plan::new();
        assert_eq!(plan.allocate_wall_id(), "1");
    }

    #[test]
    fn test_allocate_wall_id_max_plus_one() {
        let mut plan = Plan::new();
        plan.add_wall(wall("3", 0.0, 0.0, 1.0, 0.0));
        plan.add_wall(wall("7", 0.0, 0.0, 1.0, 0.0));
        plan.add_wall(wall("2", 0.0, 0.0, 1.0, 0.0));
        assert_eq!(plan.allocate_wall_id(), "8");
    }

    #[test]
    fn test_ids_not_reused_after_removal() {
        let mut plan = Plan::new();
        let id = plan.allocate_wall_id();
        plan.add_wall(wall(&id, 0.0, 0.0, 1.0, 0.0));
        plan.remove_wall(&id);
        assert_eq!(plan.allocate_wall_id(), "2");

        plan.clear();
        assert_eq!(plan.allocate_wall_id(), "3");
    }

    #[test]
    fn test_json_round_trip() {
        let mut plan = Plan::new();
        let mut w = wall("1", 0.0, 0.0, 100.0, 0.0);
        w.kind = WallType::Door;
        w.variant = Some("2".to_string());
        w.top_text = Some("3.5".to_string());
        w.p1.edit_id = Some(9);
        plan.add_wall(w);
        let mut note = Note::new("#000", 1.5, "pen");
        note.points.push(NotePoint::new(1.0, 2.0, Some(0.5)));
        note.points.push(NotePoint::new(3.0, 4.0, None));
        plan.add_note(note);

        let json = plan.to_json().unwrap();
        assert!(json.contains("\"type\":\"door\""));
        assert!(json.contains("\"topText\":\"3.5\""));
        assert!(json.contains("\"strokeWidth\":1.5"));
        assert!(json.contains("\"groupId\":\"pen\""));
        assert!(!json.contains("edit"));

        let restored = Plan::from_json(&json).unwrap();
        assert_eq!(restored.walls[0].kind, WallType::Door);
        assert_eq!(restored.walls[0].p1.edit_id, None);
        assert_eq!(restored.walls[0].p1.pos(), Point::new(0.0, 0.0));
        assert_eq!(restored.notes, plan.notes);
    }

    #[test]
    fn test_load_tolerates_missing_notes() {
        let plan = Plan::from_json(r#"{"walls":[{"id":"1","p1":{"x":0,"y":0},"p2":{"x":5,"y":0}}]}"#)
            .unwrap();
        assert_eq!(plan.walls.len(), 1);
        assert_eq!(plan.walls[0].kind, WallType::Wall);
        assert!(plan.notes.is_empty());
    }

    #[test]
    fn test_load_or_default_malformed() {
        assert!(Plan::load_or_default(Some("{not json")).is_empty());
        assert!(Plan::load_or_default(None).is_empty());
        assert!(Plan::load_or_default(Some("[1,2,3]")).is_empty());
    }

    #[test]
    fn test_find_near_wall() {
        let mut plan = Plan::new();
        plan.add_wall(wall("1", 0.0, 0.0, 100.0, 0.0));
        plan.add_wall(wall("2", 0.0, 50.0, 100.0, 50.0));

        assert_eq!(plan.find_near_wall(Point::new(50.0, 10.0), 15.0).unwrap().id, "1");
        assert_eq!(plan.find_near_wall(Point::new(50.0, 40.0), 15.0).unwrap().id, "2");
        assert!(plan.find_near_wall(Point::new(50.0, 25.0), 15.0).is_none());
        assert!(plan.find_near_wall(Point::new(150.0, 0.0), 15.0).is_none());
    }

    #[test]
    fn test_remove_and_insert_keeps_order() {
        let mut plan = Plan::new();
        plan.add_wall(wall("1", 0.0, 0.0, 1.0, 0.0));
        plan.add_wall(wall("2", 0.0, 0.0, 1.0, 0.0));
        plan.add_wall(wall("3", 0.0, 0.0, 1.0, 0.0));

        let removed = plan.remove_wall("2").unwrap();
        assert_eq!(removed.index, 1);
        plan.insert_wall(removed.index, removed.wall);
        let ids: Vec<&str> = plan.walls.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert!(!plan.add_wall(wall("3", 0.0, 0.0, 1.0, 0.0)));
    }

    #[test]
    fn test_door_variant_cycle() {
        let mut w = wall("1", 0.0, 0.0, 1.0, 0.0);
        w.select_type(WallType::Door);
        assert_eq!(w.kind, WallType::Door);
        assert_eq!(w.variant, None);

        let mut seen = Vec::new();
        for _ in 0..5 {
            w.select_type(WallType::Door);
            seen.push(w.variant.clone().unwrap());
        }
        assert_eq!(seen, vec!["2", "3", "4", "1", "2"]);

        w.select_type(WallType::Window);
        assert_eq!(w.kind, WallType::Window);
        assert_eq!(w.variant, None);
    }

    #[test]
    fn test_door_variant_garbage_resets() {
        let mut w = wall("1", 0.0, 0.0, 1.0, 0.0);
        w.kind = WallType::Door;
        w.variant = Some("abc".to_string());
        w.select_type(WallType::Door);
        assert_eq!(w.variant.as_deref(), Some("2"));
    }

    #[test]
    fn test_replace_wall_keeps_live_tags() {
        let mut plan = Plan::new();
        plan.add_wall(wall("1", 0.0, 0.0, 100.0, 0.0));
        plan.walls[0].p2.edit_id = Some(8);
        plan.walls[0].p2.set_pos(Point::new(180.0, 50.0));

        let mut update = wall("1", 0.0, 60.0, 100.0, 0.0);
        update.top_text = Some("2.4".to_string());
        assert!(plan.replace_wall(&update));

        let live = &plan.walls[0];
        assert_eq!(live.p1.pos(), Point::new(0.0, 60.0));
        assert_eq!(live.p2.pos(), Point::new(180.0, 50.0));
        assert_eq!(live.p2.edit_id, Some(8));
        assert_eq!(live.top_text.as_deref(), Some("2.4"));
        assert!(!plan.replace_wall(&wall("9", 0.0, 0.0, 1.0, 0.0)));
    }

    #[test]
    fn test_snapshot_clears_edit_tags() {
        let mut w = wall("1", 0.0, 0.0, 1.0, 0.0);
        w.p2.edit_id = Some(4);
        assert!(w.is_being_edited());
        assert!(!w.snapshot().is_being_edited());
    }
}
