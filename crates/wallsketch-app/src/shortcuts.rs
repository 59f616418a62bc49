//! Keyboard and gesture shortcut registry and documentation.

use wallsketch_core::ToolKind;

/// A shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub description: &'static str,
    /// Tool the key selects, if it is a tool hotkey.
    pub tool: Option<ToolKind>,
}

impl Shortcut {
    pub const fn tool(key: &'static str, tool: ToolKind, description: &'static str) -> Self {
        Self {
            key,
            description,
            tool: Some(tool),
        }
    }

    pub const fn gesture(key: &'static str, description: &'static str) -> Self {
        Self {
            key,
            description,
            tool: None,
        }
    }
}

/// Registry of all shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        vec![
            Shortcut::tool("KeyW", ToolKind::Wall, "Draw walls"),
            Shortcut::tool("KeyC", ToolKind::Cursor, "Select walls and drag endpoints"),
            Shortcut::tool("KeyD", ToolKind::Destroy, "Cut through walls to delete them"),
            Shortcut::tool("KeyP", ToolKind::Pencil, "Freehand pencil"),
            Shortcut::tool("KeyQ", ToolKind::Pencil, "Freehand pencil"),
            Shortcut::tool("KeyE", ToolKind::Eraser, "Eraser"),
            Shortcut::tool("KeyM", ToolKind::Move, "Pan the view"),
            Shortcut::gesture("Space (hold)", "Pan until released"),
            Shortcut::gesture("2-finger tap", "Undo"),
            Shortcut::gesture("3-finger tap", "Redo"),
        ]
    }

    /// Print all shortcuts to console.
    pub fn print_all() {
        println!("\n=== Shortcuts ===");
        for shortcut in Self::all() {
            println!("  {:14} {}", shortcut.key, shortcut.description);
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_matches_hotkeys() {
        for shortcut in ShortcutRegistry::all() {
            assert_eq!(ToolKind::from_hotkey(shortcut.key), shortcut.tool);
        }
    }
}
