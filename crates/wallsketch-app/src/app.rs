//! Headless application shell: opens a stored plan, replays scripts against
//! it and reports what the editor holds.

use crate::script::{self, Command};
use std::fs;
use std::path::{Path, PathBuf};
use wallsketch_core::{
    Document, Editor, FileStorage, PLAN_KEY, RecordingSurface, Settings, StorageResult,
};

const SETTINGS_FILE: &str = "settings.json";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding the stored plan and settings. Defaults to the
    /// per-user data directory.
    pub plan_dir: Option<PathBuf>,
    pub plan_key: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            plan_dir: None,
            plan_key: PLAN_KEY.to_string(),
        }
    }
}

/// What the editor holds after a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub walls: usize,
    pub notes: usize,
    pub undo_depth: usize,
    pub redo_depth: usize,
    pub drawn_elements: usize,
    pub tool: &'static str,
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} walls, {} notes, undo {} / redo {}, {} drawn elements, tool {}",
            self.walls, self.notes, self.undo_depth, self.redo_depth, self.drawn_elements, self.tool
        )
    }
}

pub struct App {
    dir: PathBuf,
    editor: Editor<RecordingSurface>,
}

impl App {
    /// Open the plan stored in the configured directory, creating the
    /// directory if needed.
    pub fn open(config: AppConfig) -> StorageResult<Self> {
        let storage = match config.plan_dir {
            Some(dir) => FileStorage::new(dir)?,
            None => FileStorage::default_location()?,
        };
        let dir = storage.base_path().to_path_buf();
        let settings = load_settings(&dir);
        let doc = Document::open(Box::new(storage), &config.plan_key);
        log::info!("Opened plan '{}' in {}", config.plan_key, dir.display());
        Ok(Self {
            dir,
            editor: Editor::new(doc, RecordingSurface::new(), settings),
        })
    }

    pub fn editor(&self) -> &Editor<RecordingSurface> {
        &self.editor
    }

    /// Replay `commands` in order. Returns how many had an effect.
    pub fn run_script(&mut self, commands: &[Command]) -> usize {
        let applied = commands
            .iter()
            .filter(|c| {
                let applied = script::apply(&mut self.editor, c);
                if !applied {
                    log::debug!("Command had no effect: {:?}", c);
                }
                applied
            })
            .count();
        self.save_settings();
        applied
    }

    pub fn summary(&self) -> Summary {
        let plan = self.editor.plan();
        let history = self.editor.document().history();
        Summary {
            walls: plan.walls.len(),
            notes: plan.notes.len(),
            undo_depth: history.undo_len(),
            redo_depth: history.redo_len(),
            drawn_elements: self.editor.surface().element_count(),
            tool: self.editor.current_tool().name(),
        }
    }

    fn save_settings(&self) {
        let path = self.dir.join(SETTINGS_FILE);
        let json = match self.editor.settings().to_json() {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Failed to serialize settings: {}", e);
                return;
            }
        };
        if let Err(e) = fs::write(&path, json) {
            log::warn!("Failed to write {}: {}", path.display(), e);
        }
    }
}

fn load_settings(dir: &Path) -> Settings {
    let path = dir.join(SETTINGS_FILE);
    match fs::read_to_string(&path) {
        Ok(json) => Settings::from_json(&json),
        Err(_) => {
            log::debug!("No settings at {}, using defaults", path.display());
            Settings::default()
        }
    }
}
