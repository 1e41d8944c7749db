//! Indicator configuration
//!
//! Everything here is fixed at build time. The values are still passed
//! around as a struct so components can be constructed with other
//! palettes or geometry in tests.

use std::path::PathBuf;

use crate::image::Color;
use crate::transport::{Anchor, Layer};

/// Width of every indicator surface and of the shared frame buffer
pub const SURFACE_WIDTH: u32 = 200;

/// Height of every indicator surface and of the shared frame buffer
pub const SURFACE_HEIGHT: u32 = 120;

/// Well-known path of the control socket
pub const SOCKET_PATH: &str = "/tmp/stage.sock";

/// Layer shell namespace announced for the overlay surfaces
pub const NAMESPACE: &str = "ws";

/// Colors used by the indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// The workspace that just became active
    pub foreground: Color,
    /// Surface fill, also used to erase glyphs
    pub background: Color,
    /// The previously active workspace
    pub dim: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            foreground: Color::rgb(0xff, 0xff, 0xff),
            background: Color::rgb(0x00, 0x00, 0x00),
            dim: Color::rgb(0x55, 0x55, 0x55),
        }
    }
}

/// Pixel position of a glyph slot inside the frame buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub x: u32,
    pub y: u32,
}

/// Complete indicator configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Surface size in pixels (width, height)
    pub size: (u32, u32),
    /// Path the control socket is bound to
    pub socket_path: PathBuf,
    /// Layer surface namespace
    pub namespace: String,
    /// Layer the surfaces are placed on
    pub layer: Layer,
    /// Edges the surfaces are anchored to
    pub anchor: Anchor,
    /// Indicator colors
    pub palette: Palette,
    /// Where the active workspace is drawn
    pub current_slot: Slot,
    /// Where the dimmed previous workspace is drawn
    pub trailing_slot: Slot,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: (SURFACE_WIDTH, SURFACE_HEIGHT),
            socket_path: PathBuf::from(SOCKET_PATH),
            namespace: NAMESPACE.to_string(),
            layer: Layer::Overlay,
            anchor: Anchor::empty(),
            palette: Palette::default(),
            current_slot: Slot { x: 100, y: 0 },
            trailing_slot: Slot { x: 50, y: 0 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry() {
        let config = Config::default();
        assert_eq!(config.size, (200, 120));
        assert_eq!(config.socket_path, PathBuf::from("/tmp/stage.sock"));
        assert!(config.trailing_slot.x < config.current_slot.x);
    }

    #[test]
    fn test_default_placement() {
        let config = Config::default();
        assert_eq!(config.layer, Layer::Overlay);
        assert!(config.anchor.is_empty());
    }

    #[test]
    fn test_default_palette() {
        let palette = Palette::default();
        assert_eq!(palette.foreground.to_argb8888(), 0xffff_ffff);
        assert_eq!(palette.background.to_argb8888(), 0xff00_0000);
        assert_eq!(palette.dim.to_argb8888(), 0xff55_5555);
    }
}
