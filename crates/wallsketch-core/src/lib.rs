//! WallSketch Core Library
//!
//! Platform-agnostic floor-plan editing: the plan model, snapping, gesture
//! tools, undo history and persistence. Rendering goes through the
//! [`DrawingSurface`] trait so any front end can host the editor.

pub mod document;
pub mod draw;
pub mod editor;
pub mod geometry;
pub mod gestures;
pub mod history;
pub mod input;
pub mod plan;
pub mod settings;
pub mod snap;
pub mod storage;
pub mod surface;
pub mod tools;
pub mod viewport;

pub use document::Document;
pub use editor::{Editor, PAN_HOLD_KEY};
pub use gestures::{GestureAction, TapRecognizer};
pub use history::{History, HistoryRecord};
pub use input::{Contact, Phase, PointerInput, PointerKind, ToolEvent};
pub use plan::{Note, NotePoint, Plan, Wall, WallEnd, WallPoint, WallType};
pub use settings::Settings;
pub use snap::{GuideLine, SnapResult};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError, StorageResult, PLAN_KEY};
pub use surface::{DrawingSurface, RecordingSurface};
pub use tools::{ToolKind, ToolManager};
pub use viewport::Viewport;
