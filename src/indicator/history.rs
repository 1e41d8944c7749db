//! Three-deep workspace history

/// Slot value meaning "no workspace"
pub const UNSET: i32 = -1;

/// The last three workspaces, newest first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct History {
    /// Shown at full brightness
    pub current: i32,
    /// Shown dimmed
    pub previous: i32,
    /// Already erased, kept so the next update knows nothing is left of it
    pub previous_previous: i32,
}

impl History {
    pub fn new() -> Self {
        Self {
            current: UNSET,
            previous: UNSET,
            previous_previous: UNSET,
        }
    }

    /// Whether a slot value names a workspace
    pub fn is_set(slot: i32) -> bool {
        slot >= 0
    }

    /// Shift every slot back by one and record `workspace` as current
    pub fn push(&mut self, workspace: i32) {
        self.previous_previous = self.previous;
        self.previous = self.current;
        self.current = workspace;
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
