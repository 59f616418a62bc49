//! Undo/redo history of committed plan edits.
//!
//! Each [`HistoryRecord`] carries enough data to apply and revert itself
//! against a [`Plan`]. References to walls or notes that no longer exist are
//! skipped.

use crate::plan::{Note, Plan, RemovedWall, Wall};
use serde::{Deserialize, Serialize};

/// A committed edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum HistoryRecord {
    WallAdded {
        wall: Wall,
    },
    /// Endpoints of one or more walls changed. Snapshots are stored in the
    /// same order.
    WallsMoved {
        before: Vec<Wall>,
        after: Vec<Wall>,
    },
    /// Walls removed in order; each index is the position at the time of its
    /// own removal.
    WallsDestroyed {
        removed: Vec<RemovedWall>,
    },
    /// A pen or eraser stroke.
    NoteAdded {
        note: Note,
    },
    /// Labels, type or variant of a wall changed.
    TextChanged {
        before: Wall,
        after: Wall,
    },
}

impl HistoryRecord {
    /// Build a destroy record for `ids`, capturing the index each wall will
    /// have when removed in that order. Unknown and repeated ids are skipped.
    /// Returns `None` when nothing would be removed.
    pub fn walls_destroyed<'a>(plan: &Plan, ids: impl IntoIterator<Item = &'a str>) -> Option<Self> {
        let mut remaining: Vec<&Wall> = plan.walls.iter().collect();
        let mut removed = Vec::new();
        for id in ids {
            if let Some(index) = remaining.iter().position(|w| w.id == id) {
                let wall = remaining.remove(index);
                removed.push(RemovedWall {
                    index,
                    wall: wall.snapshot(),
                });
            }
        }
        if removed.is_empty() {
            None
        } else {
            Some(HistoryRecord::WallsDestroyed { removed })
        }
    }

    /// Short name for logs.
    pub fn label(&self) -> &'static str {
        match self {
            HistoryRecord::WallAdded { .. } => "wall-added",
            HistoryRecord::WallsMoved { .. } => "walls-moved",
            HistoryRecord::WallsDestroyed { .. } => "walls-destroyed",
            HistoryRecord::NoteAdded { .. } => "note-added",
            HistoryRecord::TextChanged { .. } => "text-changed",
        }
    }

    /// Perform the edit on `plan`.
    pub fn apply(&self, plan: &mut Plan) {
        match self {
            HistoryRecord::WallAdded { wall } => {
                if !plan.add_wall(wall.snapshot()) {
                    log::debug!("Wall {} already present, skipping add", wall.id);
                }
            }
            HistoryRecord::WallsMoved { after, .. } => replace_all(plan, after),
            HistoryRecord::WallsDestroyed { removed } => {
                for r in removed {
                    if plan.remove_wall(&r.wall.id).is_none() {
                        log::debug!("Wall {} already gone, skipping removal", r.wall.id);
                    }
                }
            }
            HistoryRecord::NoteAdded { note } => {
                plan.add_note(note.clone());
            }
            HistoryRecord::TextChanged { after, .. } => replace_all(plan, std::slice::from_ref(after)),
        }
    }

    /// Undo the edit on `plan`.
    pub fn revert(&self, plan: &mut Plan) {
        match self {
            HistoryRecord::WallAdded { wall } => {
                plan.remove_wall(&wall.id);
            }
            HistoryRecord::WallsMoved { before, .. } => replace_all(plan, before),
            HistoryRecord::WallsDestroyed { removed } => {
                for r in removed.iter().rev() {
                    plan.insert_wall(r.index, r.wall.clone());
                }
            }
            HistoryRecord::NoteAdded { note } => {
                plan.remove_note(&note.id);
            }
            HistoryRecord::TextChanged { before, .. } => replace_all(plan, std::slice::from_ref(before)),
        }
    }

    /// Ids of the walls this record touches.
    pub fn wall_ids(&self) -> Vec<&str> {
        match self {
            HistoryRecord::WallAdded { wall } => vec![wall.id.as_str()],
            HistoryRecord::WallsMoved { after, .. } => after.iter().map(|w| w.id.as_str()).collect(),
            HistoryRecord::WallsDestroyed { removed } => removed.iter().map(|r| r.wall.id.as_str()).collect(),
            HistoryRecord::NoteAdded { .. } => Vec::new(),
            HistoryRecord::TextChanged { after, .. } => vec![after.id.as_str()],
        }
    }

    /// Notes this record touches.
    pub fn notes(&self) -> Vec<&Note> {
        match self {
            HistoryRecord::NoteAdded { note } => vec![note],
            _ => Vec::new(),
        }
    }
}

fn replace_all(plan: &mut Plan, walls: &[Wall]) {
    for wall in walls {
        if !plan.replace_wall(wall) {
            log::debug!("Wall {} no longer in plan, skipping", wall.id);
        }
    }
}

/// Undo and redo stacks for one document.
#[derive(Debug, Clone, Default)]
pub struct History {
    undo_stack: Vec<HistoryRecord>,
    redo_stack: Vec<HistoryRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an already applied record. Clears the redo stack.
    pub fn add(&mut self, record: HistoryRecord) {
        self.undo_stack.push(record);
        self.redo_stack.clear();
    }

    /// Revert the latest record on `plan` and move it to the redo stack.
    /// Returns `None` when there is nothing to undo.
    pub fn undo(&mut self, plan: &mut Plan) -> Option<&HistoryRecord> {
        let record = self.undo_stack.pop()?;
        record.revert(plan);
        self.redo_stack.push(record);
        self.redo_stack.last()
    }

    /// Re-apply the latest undone record and move it back to the undo stack.
    pub fn redo(&mut self, plan: &mut Plan) -> Option<&HistoryRecord> {
        let record = self.redo_stack.pop()?;
        record.apply(plan);
        self.undo_stack.push(record);
        self.undo_stack.last()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Most recent undoable record.
    pub fn last(&self) -> Option<&HistoryRecord> {
        self.undo_stack.last()
    }

    /// Drop both stacks.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    fn wall(id: &str, x1: f64, y1: f64, x2: f64, y2: f64) -> Wall {
        Wall::new(id, Point::new(x1, y1), Point::new(x2, y2))
    }

    fn ids(plan: &Plan) -> Vec<&str> {
        plan.walls.iter().map(|w| w.id.as_str()).collect()
    }

    #[test]
    fn test_wall_added_undo_redo() {
        let mut plan = Plan::new();
        let mut history = History::new();
        let record = HistoryRecord::WallAdded {
            wall: wall("1", 0.0, 0.0, 10.0, 0.0),
        };
        record.apply(&mut plan);
        history.add(record);

        assert!(history.undo(&mut plan).is_some());
        assert!(plan.walls.is_empty());
        assert!(history.can_redo());

        assert!(history.redo(&mut plan).is_some());
        assert_eq!(plan.walls[0], wall("1", 0.0, 0.0, 10.0, 0.0));
    }

    #[test]
    fn test_empty_stacks_are_noops() {
        let mut plan = Plan::new();
        plan.add_wall(wall("1", 0.0, 0.0, 10.0, 0.0));
        let mut history = History::new();
        assert!(history.undo(&mut plan).is_none());
        assert!(history.redo(&mut plan).is_none());
        assert_eq!(plan.walls.len(), 1);
    }

    #[test]
    fn test_add_clears_redo() {
        let mut plan = Plan::new();
        let mut history = History::new();
        let first = HistoryRecord::WallAdded {
            wall: wall("1", 0.0, 0.0, 10.0, 0.0),
        };
        first.apply(&mut plan);
        history.add(first);
        history.undo(&mut plan);
        assert_eq!(history.redo_len(), 1);

        history.add(HistoryRecord::WallAdded {
            wall: wall("2", 0.0, 0.0, 10.0, 0.0),
        });
        assert_eq!(history.redo_len(), 0);
        assert_eq!(history.undo_len(), 1);
    }

    #[test]
    fn test_walls_moved_revert() {
        let mut plan = Plan::new();
        plan.add_wall(wall("1", 0.0, 0.0, 10.0, 0.0));
        let before = vec![plan.walls[0].clone()];
        plan.walls[0].p2.set_pos(Point::new(20.0, 5.0));
        let after = vec![plan.walls[0].clone()];

        let record = HistoryRecord::WallsMoved { before, after };
        record.revert(&mut plan);
        assert_eq!(plan.walls[0].p2.pos(), Point::new(10.0, 0.0));
        record.apply(&mut plan);
        assert_eq!(plan.walls[0].p2.pos(), Point::new(20.0, 5.0));
    }

    #[test]
    fn test_walls_destroyed_restores_order() {
        let mut plan = Plan::new();
        for id in ["1", "2", "3", "4"] {
            plan.add_wall(wall(id, 0.0, 0.0, 1.0, 0.0));
        }
        let record = HistoryRecord::walls_destroyed(&plan, ["3", "1", "9", "3"]).unwrap();
        match &record {
            HistoryRecord::WallsDestroyed { removed } => {
                let captured: Vec<(usize, &str)> =
                    removed.iter().map(|r| (r.index, r.wall.id.as_str())).collect();
                assert_eq!(captured, vec![(2, "3"), (0, "1")]);
            }
            other => panic!("unexpected record {:?}", other),
        }

        record.apply(&mut plan);
        assert_eq!(ids(&plan), vec!["2", "4"]);
        record.revert(&mut plan);
        assert_eq!(ids(&plan), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_walls_destroyed_empty() {
        let plan = Plan::new();
        assert!(HistoryRecord::walls_destroyed(&plan, ["1"]).is_none());
    }

    #[test]
    fn test_missing_reference_is_noop() {
        let mut plan = Plan::new();
        plan.add_wall(wall("2", 0.0, 0.0, 1.0, 0.0));
        let record = HistoryRecord::TextChanged {
            before: wall("1", 0.0, 0.0, 1.0, 0.0),
            after: wall("1", 0.0, 0.0, 1.0, 0.0),
        };
        record.revert(&mut plan);
        record.apply(&mut plan);
        assert_eq!(ids(&plan), vec!["2"]);
    }

    #[test]
    fn test_note_added() {
        let mut plan = Plan::new();
        let note = Note::new("#000", 1.5, "pen");
        let record = HistoryRecord::NoteAdded { note: note.clone() };
        record.apply(&mut plan);
        assert_eq!(plan.notes.len(), 1);
        assert_eq!(record.notes()[0].id, note.id);
        record.revert(&mut plan);
        assert!(plan.notes.is_empty());
    }

    #[test]
    fn test_record_json_tag() {
        let record = HistoryRecord::WallAdded {
            wall: wall("1", 0.0, 0.0, 1.0, 0.0),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"type\":\"wall-added\""));
        assert_eq!(record.label(), "wall-added");
    }
}
