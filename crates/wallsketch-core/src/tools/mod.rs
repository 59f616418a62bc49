//! Tool system for the plan editor.
//!
//! Exactly one tool is active. [`ToolManager`] routes canonical events to it
//! and reconciles any in-flight edit when the tool changes.

mod cursor;
mod destroy;
mod pan;
mod pen;
mod wall;

pub use cursor::CursorTool;
pub use destroy::DestroyTool;
pub use pan::PanTool;
pub use pen::{PenMode, PenTool};
pub use wall::WallTool;

use crate::document::Document;
use crate::input::{Phase, ToolEvent};
use crate::settings::Settings;
use crate::surface::DrawingSurface;
use crate::viewport::Viewport;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Wall,
    Cursor,
    Destroy,
    Pencil,
    Eraser,
    /// Pan the viewport.
    Move,
}

impl ToolKind {
    /// Map a keyboard code (`KeyW`, `KeyD`, ...) to its tool.
    pub fn from_hotkey(code: &str) -> Option<Self> {
        match code {
            "KeyW" => Some(ToolKind::Wall),
            "KeyD" => Some(ToolKind::Destroy),
            "KeyC" => Some(ToolKind::Cursor),
            "KeyP" | "KeyQ" => Some(ToolKind::Pencil),
            "KeyE" => Some(ToolKind::Eraser),
            "KeyM" => Some(ToolKind::Move),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Wall => "wall",
            ToolKind::Cursor => "cursor",
            ToolKind::Destroy => "destroy",
            ToolKind::Pencil => "pencil",
            ToolKind::Eraser => "eraser",
            ToolKind::Move => "move",
        }
    }
}

/// Everything a tool may touch while handling one event.
pub struct ToolContext<'a> {
    pub doc: &'a mut Document,
    pub surface: &'a mut dyn DrawingSurface,
    pub settings: &'a Settings,
    pub viewport: &'a mut Viewport,
}

impl ToolContext<'_> {
    pub fn to_plan(&self, screen: Point) -> Point {
        self.viewport.screen_to_plan(screen)
    }

    /// Endpoint magnet radius in plan units.
    pub fn magnet_radius(&self) -> f64 {
        self.viewport.plan_length(self.settings.magnet_radius)
    }

    /// Alignment magnet radius in plan units.
    pub fn alignment_radius(&self) -> f64 {
        self.viewport.plan_length(self.settings.alignment_radius)
    }
}

/// A gesture state machine.
pub trait Tool {
    fn on_start(&mut self, ctx: &mut ToolContext<'_>, event: &ToolEvent);

    fn on_move(&mut self, ctx: &mut ToolContext<'_>, event: &ToolEvent);

    /// Called for both `End` and `Cancel`.
    fn on_end(&mut self, ctx: &mut ToolContext<'_>, event: &ToolEvent);

    /// Commit or discard any in-flight edit and clear transient drawing.
    fn deactivate(&mut self, ctx: &mut ToolContext<'_>);

    /// Whether a gesture is in progress.
    fn is_busy(&self) -> bool;
}

/// Manages the current tool and routes events to it.
#[derive(Debug, Default)]
pub struct ToolManager {
    current_tool: ToolKind,
    wall: WallTool,
    cursor: CursorTool,
    destroy: DestroyTool,
    pencil: PenTool,
    eraser: PenTool,
    pan: PanTool,
    /// Pans with raw touches while stylus mode reserves tools for the pen.
    touch_pan: PanTool,
}

impl ToolManager {
    pub fn new(tool: ToolKind) -> Self {
        Self {
            current_tool: tool,
            pencil: PenTool::new(PenMode::Pencil),
            eraser: PenTool::new(PenMode::Eraser),
            ..Self::default()
        }
    }

    pub fn current_tool(&self) -> ToolKind {
        self.current_tool
    }

    /// Switch tools, reconciling the outgoing tool first.
    pub fn set_tool(&mut self, ctx: &mut ToolContext<'_>, tool: ToolKind) {
        if tool == self.current_tool {
            return;
        }
        self.active_mut().deactivate(ctx);
        log::debug!("Tool {} -> {}", self.current_tool.name(), tool.name());
        self.current_tool = tool;
    }

    /// Route one event.
    pub fn handle(&mut self, ctx: &mut ToolContext<'_>, event: &ToolEvent) {
        let tool: &mut dyn Tool = if event.drives_tools(ctx.settings.stylus_mode) {
            self.active_mut()
        } else {
            &mut self.touch_pan
        };
        match event.phase {
            Phase::Start => tool.on_start(ctx, event),
            Phase::Move => tool.on_move(ctx, event),
            Phase::End | Phase::Cancel => tool.on_end(ctx, event),
        }
    }

    /// Selected wall id exposed by the cursor tool.
    pub fn selected_wall(&self) -> Option<&str> {
        self.cursor.selected()
    }

    pub fn clear_selection(&mut self, ctx: &mut ToolContext<'_>) {
        self.cursor.clear_selection(ctx);
    }

    pub fn highlight_selection(&mut self, ctx: &mut ToolContext<'_>) {
        self.cursor.highlight_selection(ctx);
    }

    pub fn is_busy(&self) -> bool {
        self.active().is_busy() || self.touch_pan.is_busy()
    }

    fn active(&self) -> &dyn Tool {
        match self.current_tool {
            ToolKind::Wall => &self.wall,
            ToolKind::Cursor => &self.cursor,
            ToolKind::Destroy => &self.destroy,
            ToolKind::Pencil => &self.pencil,
            ToolKind::Eraser => &self.eraser,
            ToolKind::Move => &self.pan,
        }
    }

    fn active_mut(&mut self) -> &mut dyn Tool {
        match self.current_tool {
            ToolKind::Wall => &mut self.wall,
            ToolKind::Cursor => &mut self.cursor,
            ToolKind::Destroy => &mut self.destroy,
            ToolKind::Pencil => &mut self.pencil,
            ToolKind::Eraser => &mut self.eraser,
            ToolKind::Move => &mut self.pan,
        }
    }
}
