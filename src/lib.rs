//! wsi - a workspace switch indicator for wlroots-based compositors
//!
//! wsi listens for workspace changes on a Unix datagram socket and shows
//! the new workspace number in a small overlay on every output, with the
//! previous workspace dimmed beside it.
//!
//! # Architecture
//!
//! - **Transport**: the compositor connection, implemented with wayland-client
//!   and the wlr-layer-shell protocol
//! - **Session**: output discovery, lazily created layer surfaces, and the
//!   startup/teardown sequence
//! - **Indicator**: the three-deep workspace history and the glyph draws it
//!   produces
//! - **Image**: the single shared-memory frame buffer and digit rasterizer
//! - **Listener**: the control socket loop
//!
//! # Example
//!
//! ```no_run
//! use wsi::config::Config;
//! use wsi::listener::SocketListener;
//! use wsi::session::Session;
//! use wsi::transport::WaylandTransport;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::default();
//! let mut session = Session::start(WaylandTransport::connect()?, &config)?;
//! let listener = SocketListener::bind(&config.socket_path)?;
//! session.run(&listener);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod image;
pub mod indicator;
pub mod listener;
pub mod session;
pub mod transport;

pub use error::{IndicatorError, Result};
