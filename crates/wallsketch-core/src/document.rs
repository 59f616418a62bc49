//! The single mutation path for committed edits.
//!
//! [`Document`] owns the plan, its history and the storage binding. A
//! committed record is applied to the plan, redrawn, pushed onto the history
//! and persisted within the same call.

use crate::draw::{self, Highlight};
use crate::history::{History, HistoryRecord};
use crate::plan::Plan;
use crate::storage::{Storage, StorageError};
use crate::surface::DrawingSurface;

/// A plan with its undo history and optional persistence.
pub struct Document {
    plan: Plan,
    history: History,
    store: Option<(Box<dyn Storage>, String)>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty document without persistence.
    pub fn new() -> Self {
        Self::with_plan(Plan::new())
    }

    /// Wrap an existing plan without persistence.
    pub fn with_plan(plan: Plan) -> Self {
        Self {
            plan,
            history: History::new(),
            store: None,
        }
    }

    /// Load the plan stored under `key`, falling back to an empty plan when it
    /// is missing or unreadable. Every later commit is saved back under `key`.
    pub fn open(storage: Box<dyn Storage>, key: &str) -> Self {
        let plan = match storage.load(key) {
            Ok(plan) => {
                log::info!(
                    "Loaded plan '{}' with {} walls and {} notes",
                    key,
                    plan.walls.len(),
                    plan.notes.len()
                );
                plan
            }
            Err(StorageError::NotFound(_)) => {
                log::debug!("No stored plan '{}', starting empty", key);
                Plan::new()
            }
            Err(e) => {
                log::warn!("Failed to load plan '{}', starting empty: {}", key, e);
                Plan::new()
            }
        };
        Self {
            plan,
            history: History::new(),
            store: Some((storage, key.to_string())),
        }
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    /// Live access for in-progress gestures. Edits made here are not recorded
    /// until a matching record is committed.
    pub(crate) fn plan_mut(&mut self) -> &mut Plan {
        &mut self.plan
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Apply `record`, redraw what it touched, push it and persist.
    pub fn commit(&mut self, record: HistoryRecord, surface: &mut dyn DrawingSurface, radius: f64) {
        record.apply(&mut self.plan);
        redraw_record(&self.plan, &record, surface, radius);
        log::debug!("Committed {}", record.label());
        self.history.add(record);
        self.persist();
    }

    /// Undo the latest record. Returns false when there was nothing to undo.
    pub fn undo(&mut self, surface: &mut dyn DrawingSurface, radius: f64) -> bool {
        let Some(record) = self.history.undo(&mut self.plan) else {
            return false;
        };
        redraw_record(&self.plan, record, surface, radius);
        log::debug!("Undid {}", record.label());
        self.persist();
        true
    }

    /// Redo the latest undone record. Returns false when there was nothing to
    /// redo.
    pub fn redo(&mut self, surface: &mut dyn DrawingSurface, radius: f64) -> bool {
        let Some(record) = self.history.redo(&mut self.plan) else {
            return false;
        };
        redraw_record(&self.plan, record, surface, radius);
        log::debug!("Redid {}", record.label());
        self.persist();
        true
    }

    /// Wipe the plan and both history stacks.
    pub fn clear_all(&mut self, surface: &mut dyn DrawingSurface) {
        for wall in &self.plan.walls {
            draw::remove_wall(surface, &wall.id);
        }
        for note in &self.plan.notes {
            draw::remove_note(surface, note);
        }
        self.plan.clear();
        self.history.clear();
        log::info!("Cleared plan and history");
        self.persist();
    }

    /// Draw every wall and note.
    pub fn redraw_all(&self, surface: &mut dyn DrawingSurface, radius: f64) {
        for note in &self.plan.notes {
            draw::draw_note(surface, note);
        }
        for wall in &self.plan.walls {
            draw::draw_wall(surface, wall, radius, Highlight::None);
        }
    }

    fn persist(&self) {
        let Some((storage, key)) = &self.store else {
            return;
        };
        if let Err(e) = storage.save(key, &self.plan) {
            log::warn!("Failed to save plan '{}': {}", key, e);
        }
    }
}

fn redraw_record(plan: &Plan, record: &HistoryRecord, surface: &mut dyn DrawingSurface, radius: f64) {
    for id in record.wall_ids() {
        match plan.wall(id) {
            Some(wall) => draw::draw_wall(surface, wall, radius, Highlight::None),
            None => draw::remove_wall(surface, id),
        }
    }
    for note in record.notes() {
        match plan.note(&note.id) {
            Some(note) => draw::draw_note(surface, note),
            None => draw::remove_note(surface, note),
        }
    }
}
