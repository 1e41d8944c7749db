//! Layer shell placement and event handling
//!
//! Protocol-independent versions of the wlr-layer-shell values the
//! indicator uses, so placement and configure handling can be checked
//! without a compositor.

/// Layer shell layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layer {
    /// Below everything
    Background,
    /// Below windows
    Bottom,
    /// Above windows
    Top,
    /// Above everything, including fullscreen windows
    #[default]
    Overlay,
}

// Edge anchoring for layer surfaces, empty means floating
bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Anchor: u32 {
        const TOP = 1;
        const BOTTOM = 2;
        const LEFT = 4;
        const RIGHT = 8;
    }
}

/// Layer surface event, stripped of protocol types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerEvent {
    Configure { serial: u32, width: u32, height: u32 },
    Closed,
}

/// Request to send back for a layer surface event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerReply {
    AckConfigure(u32),
    None,
}

/// Decide how to answer a layer surface event
///
/// Configures are acknowledged straight away whatever size they suggest,
/// since the surface size never changes. Close requests are ignored.
pub fn reply_to(event: LayerEvent) -> LayerReply {
    match event {
        LayerEvent::Configure { serial, .. } => LayerReply::AckConfigure(serial),
        LayerEvent::Closed => LayerReply::None,
    }
}
