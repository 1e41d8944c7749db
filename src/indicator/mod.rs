//! Workspace indicator rendering state
//!
//! Turns each workspace change into the draw operations that update the
//! shared frame buffer:
//! - the newest workspace at full brightness in the current slot
//! - the one before it dimmed in the trailing slot
//! - anything older erased

pub mod history;

use log::debug;

use crate::config::{Config, Palette, Slot};
use crate::image::{Canvas, Color};

pub use history::{History, UNSET};

/// One glyph draw against the frame buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawOp {
    pub color: Color,
    pub digit: i32,
    pub x: u32,
    pub y: u32,
}

impl DrawOp {
    fn at(slot: Slot, color: Color, digit: i32) -> Self {
        Self {
            color,
            digit,
            x: slot.x,
            y: slot.y,
        }
    }

    /// Execute this operation on a canvas
    pub fn apply<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        canvas.draw(self.color, self.digit, self.x, self.y);
    }
}

/// Owns the workspace history and decides what gets redrawn
#[derive(Debug, Clone)]
pub struct RenderStateMachine {
    palette: Palette,
    current_slot: Slot,
    trailing_slot: Slot,
    history: History,
}

impl RenderStateMachine {
    /// Create a state machine with an empty history
    pub fn new(palette: Palette, current_slot: Slot, trailing_slot: Slot) -> Self {
        Self {
            palette,
            current_slot,
            trailing_slot,
            history: History::new(),
        }
    }

    /// Create a state machine using the configured palette and slots
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.palette, config.current_slot, config.trailing_slot)
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Record a workspace change and return the draws it requires, in order
    pub fn on_workspace_change(&mut self, workspace: i32) -> Vec<DrawOp> {
        let History {
            current, previous, ..
        } = self.history;
        let mut ops = Vec::with_capacity(4);

        // The dimmed glyph still in the trailing slot is two changes old now
        if History::is_set(previous) {
            ops.push(DrawOp::at(
                self.trailing_slot,
                self.palette.background,
                previous,
            ));
        }

        if History::is_set(current) {
            ops.push(DrawOp::at(
                self.current_slot,
                self.palette.background,
                current,
            ));
            ops.push(DrawOp::at(self.trailing_slot, self.palette.dim, current));
        }

        ops.push(DrawOp::at(
            self.current_slot,
            self.palette.foreground,
            workspace,
        ));

        self.history.push(workspace);
        debug!("Workspace history now {:?}", self.history);

        ops
    }

    /// Record a workspace change and draw it straight onto `canvas`
    pub fn render<C: Canvas + ?Sized>(&mut self, workspace: i32, canvas: &mut C) -> usize {
        let ops = self.on_workspace_change(workspace);
        for op in &ops {
            op.apply(canvas);
        }
        ops.len()
    }
}
