//! Registry global classification

/// Lowest wl_output version accepted
pub const MIN_OUTPUT_VERSION: u32 = 4;

/// What to do with an announced global
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalKind {
    Shm,
    Compositor,
    LayerShell,
    Output,
    /// A wl_output too old to use
    Rejected,
    /// Not something the indicator needs
    Ignored,
}

/// Classify a registry announcement by interface name and version
pub fn classify_global(interface: &str, version: u32) -> GlobalKind {
    match interface {
        "wl_shm" => GlobalKind::Shm,
        "wl_compositor" => GlobalKind::Compositor,
        "zwlr_layer_shell_v1" => GlobalKind::LayerShell,
        "wl_output" if version >= MIN_OUTPUT_VERSION => GlobalKind::Output,
        "wl_output" => GlobalKind::Rejected,
        _ => GlobalKind::Ignored,
    }
}
