//! Error types

use std::io;
use std::path::PathBuf;

/// Errors raised while bringing up or driving the indicator
#[derive(Debug, thiserror::Error)]
pub enum IndicatorError {
    #[error("Failed to connect to the Wayland display: {0}")]
    Connect(#[from] wayland_client::ConnectError),
    #[error("Roundtrip with the compositor failed: {0}")]
    Roundtrip(#[from] wayland_client::DispatchError),
    #[error("Required global {0} was not announced by the compositor")]
    MissingGlobal(&'static str),
    #[error("Global {0} is not bound")]
    Unbound(&'static str),
    #[error("Frame buffer allocation failed: {0}")]
    FrameBuffer(#[source] io::Error),
    #[error("Control socket {}: {source}", .path.display())]
    Socket {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T, E = IndicatorError> = std::result::Result<T, E>;
