//! Editor scripts: a JSON list of commands replayed against an open plan.
//!
//! ```json
//! [
//!   { "type": "tool", "tool": "wall" },
//!   { "type": "event", "event": { "phase": "start", "input": { "kind": "mouse", "position": { "x": 0, "y": 0 }, "pressed": true } } },
//!   { "type": "key", "code": "KeyC" },
//!   { "type": "key", "code": "Space" },
//!   { "type": "key_up", "code": "Space" },
//!   { "type": "undo" }
//! ]
//! ```

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use wallsketch_core::{DrawingSurface, Editor, ToolEvent, ToolKind, WallType};

/// One scripted editor command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Feed a pointer event.
    Event { event: ToolEvent },
    /// Press a key.
    Key { code: String },
    /// Release a key.
    KeyUp { code: String },
    /// Pick a tool from the toolbar.
    Tool { tool: ToolKind },
    Undo,
    Redo,
    ClearAll,
    /// Apply a type to the selected wall.
    SelectType { wall_type: WallType },
    /// Set the labels of the selected wall.
    SetText {
        #[serde(default)]
        top: Option<String>,
        #[serde(default)]
        bottom: Option<String>,
    },
    Pan { dx: f64, dy: f64 },
    Zoom { x: f64, y: f64, factor: f64 },
}

/// Parse a script file's contents.
pub fn parse(json: &str) -> Result<Vec<Command>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Apply one command. Returns false when the command had no effect the
/// editor could report.
pub fn apply<S: DrawingSurface>(editor: &mut Editor<S>, command: &Command) -> bool {
    match command {
        Command::Event { event } => {
            editor.handle_event(event);
            true
        }
        Command::Key { code } => editor.handle_key_down(code),
        Command::KeyUp { code } => editor.handle_key_up(code),
        Command::Tool { tool } => {
            editor.set_tool(*tool);
            true
        }
        Command::Undo => editor.undo(),
        Command::Redo => editor.redo(),
        Command::ClearAll => {
            editor.clear_all();
            true
        }
        Command::SelectType { wall_type } => editor.select_wall_type(*wall_type),
        Command::SetText { top, bottom } => editor.set_wall_text(top.clone(), bottom.clone()),
        Command::Pan { dx, dy } => {
            editor.pan(Vec2::new(*dx, *dy));
            true
        }
        Command::Zoom { x, y, factor } => {
            editor.zoom_at(Point::new(*x, *y), *factor);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallsketch_core::{Document, Phase, RecordingSurface, Settings};

    #[test]
    fn test_parse_commands() {
        let script = parse(
            r#"[
                {"type": "tool", "tool": "cursor"},
                {"type": "key", "code": "KeyW"},
                {"type": "select_type", "wall_type": "door"},
                {"type": "set_text", "top": "Hall"},
                {"type": "event", "event": {"phase": "move", "input": {"kind": "mouse", "position": {"x": 1, "y": 2}}}},
                {"type": "undo"}
            ]"#,
        )
        .unwrap();
        assert_eq!(script.len(), 6);
        assert_eq!(script[0], Command::Tool { tool: ToolKind::Cursor });
        assert_eq!(
            script[3],
            Command::SetText {
                top: Some("Hall".into()),
                bottom: None
            }
        );
        match &script[4] {
            Command::Event { event } => {
                assert_eq!(event.phase, Phase::Move);
                assert!(event.is_hover());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_apply_draws_wall() {
        let mut editor = Editor::new(Document::new(), RecordingSurface::new(), Settings::default());
        let mouse = |phase, x: f64, pressed| Command::Event {
            event: ToolEvent::mouse(phase, Point::new(x, 0.0), pressed),
        };
        for c in [
            mouse(Phase::Start, 0.0, true),
            mouse(Phase::Move, 80.0, true),
            mouse(Phase::End, 80.0, false),
        ] {
            assert!(apply(&mut editor, &c));
        }
        assert_eq!(editor.plan().walls.len(), 1);
        assert!(apply(&mut editor, &Command::Undo));
        assert!(!apply(&mut editor, &Command::Undo));
        assert!(!apply(&mut editor, &Command::Key { code: "KeyZ".into() }));
    }

    #[test]
    fn test_held_space_restores_tool() {
        let mut editor = Editor::new(Document::new(), RecordingSurface::new(), Settings::default());
        let script = parse(
            r#"[
                {"type": "key", "code": "KeyC"},
                {"type": "key", "code": "Space"},
                {"type": "key_up", "code": "Space"}
            ]"#,
        )
        .unwrap();
        assert!(apply(&mut editor, &script[0]));
        assert!(apply(&mut editor, &script[1]));
        assert_eq!(editor.current_tool(), ToolKind::Move);
        assert!(apply(&mut editor, &script[2]));
        assert_eq!(editor.current_tool(), ToolKind::Cursor);
    }
}
