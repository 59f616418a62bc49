//! Editor session tying the document, tools and drawing surface together.

use crate::document::Document;
use crate::gestures::{GestureAction, TapRecognizer};
use crate::history::HistoryRecord;
use crate::input::ToolEvent;
use crate::plan::{Plan, Wall, WallType};
use crate::settings::Settings;
use crate::surface::DrawingSurface;
use crate::tools::{ToolContext, ToolKind, ToolManager};
use crate::viewport::Viewport;
use kurbo::Point;

/// Key that switches to the move tool while held.
pub const PAN_HOLD_KEY: &str = "Space";

/// One open plan with its tools, viewport and drawing surface.
///
/// Every input event, hotkey and menu command goes through here.
pub struct Editor<S: DrawingSurface> {
    doc: Document,
    surface: S,
    settings: Settings,
    viewport: Viewport,
    tools: ToolManager,
    taps: TapRecognizer,
    /// Tool to restore when [`PAN_HOLD_KEY`] is released.
    held_tool: Option<ToolKind>,
}

impl<S: DrawingSurface> Editor<S> {
    /// Open an editor on `doc` and draw its contents.
    pub fn new(doc: Document, surface: S, settings: Settings) -> Self {
        let mut editor = Self {
            doc,
            surface,
            tools: ToolManager::new(settings.selected_tool),
            settings,
            viewport: Viewport::default(),
            taps: TapRecognizer::new(),
            held_tool: None,
        };
        editor.redraw_all();
        editor
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn plan(&self) -> &Plan {
        self.doc.plan()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn current_tool(&self) -> ToolKind {
        self.tools.current_tool()
    }

    fn magnet_radius(&self) -> f64 {
        self.viewport.plan_length(self.settings.magnet_radius)
    }

    fn split(&mut self) -> (&mut ToolManager, ToolContext<'_>) {
        let Self {
            doc,
            surface,
            settings,
            viewport,
            tools,
            ..
        } = self;
        (
            tools,
            ToolContext {
                doc,
                surface,
                settings,
                viewport,
            },
        )
    }

    /// Route one pointer event to the active tool and the tap recognizer.
    pub fn handle_event(&mut self, event: &ToolEvent) {
        let (tools, mut ctx) = self.split();
        tools.handle(&mut ctx, event);

        match self.taps.handle(event) {
            Some(GestureAction::Undo) => {
                log::debug!("Two-finger tap");
                self.undo();
            }
            Some(GestureAction::Redo) => {
                log::debug!("Three-finger tap");
                self.redo();
            }
            None => {}
        }
    }

    /// Handle a key press by keyboard code. Returns whether the key was a
    /// hotkey.
    ///
    /// Holding [`PAN_HOLD_KEY`] switches to the move tool until it is
    /// released. Repeated presses while held are ignored.
    pub fn handle_key_down(&mut self, code: &str) -> bool {
        if code == PAN_HOLD_KEY {
            let current = self.current_tool();
            if current != ToolKind::Move {
                log::debug!("Temporary pan from {}", current.name());
                self.held_tool = Some(current);
                self.set_tool(ToolKind::Move);
            }
            return true;
        }
        match ToolKind::from_hotkey(code) {
            Some(tool) => {
                self.set_tool(tool);
                true
            }
            None => false,
        }
    }

    /// Handle a key release. Releasing [`PAN_HOLD_KEY`] restores the tool
    /// that was active when it was pressed. Returns whether a tool was
    /// restored.
    pub fn handle_key_up(&mut self, code: &str) -> bool {
        if code != PAN_HOLD_KEY {
            return false;
        }
        match self.held_tool.take() {
            Some(tool) => {
                self.set_tool(tool);
                true
            }
            None => false,
        }
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        let (tools, mut ctx) = self.split();
        tools.set_tool(&mut ctx, tool);
        self.settings.selected_tool = tool;
    }

    /// Replace the settings, switching tools if the selection changed.
    pub fn set_settings(&mut self, settings: Settings) {
        let tool = settings.selected_tool;
        let rescaled = (settings.magnet_radius - self.settings.magnet_radius).abs() > f64::EPSILON;
        self.settings = settings;
        self.set_tool(tool);
        if rescaled {
            self.redraw_all();
        }
    }

    pub fn undo(&mut self) -> bool {
        let radius = self.magnet_radius();
        let undone = self.doc.undo(&mut self.surface, radius);
        self.refresh_selection();
        undone
    }

    pub fn redo(&mut self) -> bool {
        let radius = self.magnet_radius();
        let redone = self.doc.redo(&mut self.surface, radius);
        self.refresh_selection();
        redone
    }

    /// Remove every wall and note and forget all history.
    pub fn clear_all(&mut self) {
        let (tools, mut ctx) = self.split();
        tools.clear_selection(&mut ctx);
        self.doc.clear_all(&mut self.surface);
    }

    pub fn selected_wall(&self) -> Option<&Wall> {
        self.tools.selected_wall().and_then(|id| self.doc.plan().wall(id))
    }

    /// Replace the selected wall with an edited copy.
    ///
    /// Records `walls-moved` when the endpoints changed, `text-changed` when
    /// only labels, type or variant changed and nothing otherwise. Returns
    /// whether a record was committed.
    pub fn update_selected_wall(&mut self, wall: Wall) -> bool {
        let Some(current) = self.selected_wall() else {
            log::debug!("No selected wall to update");
            return false;
        };
        if current.id != wall.id {
            log::warn!("Edited wall {} is not the selected wall {}", wall.id, current.id);
            return false;
        }
        let before = current.snapshot();
        let after = wall.snapshot();
        let record = if after.geometry_differs(&before) {
            HistoryRecord::WallsMoved {
                before: vec![before],
                after: vec![after],
            }
        } else if after.attributes_differ(&before) {
            HistoryRecord::TextChanged { before, after }
        } else {
            return false;
        };
        let radius = self.magnet_radius();
        self.doc.commit(record, &mut self.surface, radius);
        self.refresh_selection();
        true
    }

    /// Apply a type from the type selector to the selected wall.
    pub fn select_wall_type(&mut self, kind: WallType) -> bool {
        let Some(mut wall) = self.selected_wall().cloned() else {
            return false;
        };
        wall.select_type(kind);
        self.update_selected_wall(wall)
    }

    /// Set the labels of the selected wall.
    pub fn set_wall_text(&mut self, top: Option<String>, bottom: Option<String>) -> bool {
        let Some(mut wall) = self.selected_wall().cloned() else {
            return false;
        };
        wall.top_text = top;
        wall.bottom_text = bottom;
        self.update_selected_wall(wall)
    }

    /// Drag the view by a screen-space delta.
    pub fn pan(&mut self, delta: kurbo::Vec2) {
        self.viewport.pan(delta);
    }

    /// Zoom around a screen point. Endpoint circles are redrawn at the new
    /// magnet radius.
    pub fn zoom_at(&mut self, screen: Point, factor: f64) {
        let before = self.viewport.scale;
        self.viewport.zoom_at(screen, factor);
        if (self.viewport.scale - before).abs() > f64::EPSILON {
            self.redraw_all();
        }
    }

    pub fn redraw_all(&mut self) {
        let radius = self.magnet_radius();
        self.doc.redraw_all(&mut self.surface, radius);
        self.refresh_selection();
    }

    fn refresh_selection(&mut self) {
        let (tools, mut ctx) = self.split();
        tools.highlight_selection(&mut ctx);
    }
}
