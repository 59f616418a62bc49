//! WallSketch Application
//!
//! Headless shell around the editor core: plan storage on disk, persisted
//! settings and replayable command scripts.

mod app;
pub mod script;
mod shortcuts;

pub use app::{App, AppConfig, Summary};
pub use script::Command;
pub use shortcuts::{Shortcut, ShortcutRegistry};
