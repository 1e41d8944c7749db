//! Display transport abstraction
//!
//! The session drives the compositor through this trait. The real
//! implementation speaks Wayland via wayland-client; tests use a
//! recording implementation.

pub mod globals;
pub mod layer;
#[cfg(test)]
pub(crate) mod mock;
pub mod wayland;

use crate::error::Result;
use crate::image::FrameBuffer;

pub use globals::{classify_global, GlobalKind, MIN_OUTPUT_VERSION};
pub use layer::{Anchor, Layer};
pub use wayland::WaylandTransport;

/// Which of the required globals have been bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub shm: bool,
    pub compositor: bool,
    pub layer_shell: bool,
}

/// Parameters for a new indicator surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSpec<'a> {
    pub width: u32,
    pub height: u32,
    pub namespace: &'a str,
    pub layer: Layer,
    /// Empty leaves the surface floating where the compositor centers it
    pub anchor: Anchor,
}

/// Message-passing substrate between the indicator and the compositor
pub trait Transport {
    /// Handle to a display output
    type Output;
    /// A surface together with its layer-surface role object
    type Surface;
    /// Handle to the shared pixel buffer
    type Buffer;

    /// Block until the compositor has processed every queued request
    fn roundtrip(&mut self) -> Result<usize>;

    /// Which required globals are bound so far
    fn capabilities(&self) -> Capabilities;

    /// Take the outputs announced since the last call
    fn take_outputs(&mut self) -> Vec<Self::Output>;

    /// Wrap the frame buffer memory in a buffer handle
    fn create_buffer(&mut self, image: &FrameBuffer) -> Result<Self::Buffer>;

    /// Create a layer surface on `output`, or wherever the compositor
    /// chooses when `output` is `None`, placed according to `spec`
    fn create_surface(
        &mut self,
        output: Option<&Self::Output>,
        spec: SurfaceSpec<'_>,
    ) -> Result<Self::Surface>;

    /// Commit without a buffer attached, which asks for the first configure
    fn commit(&mut self, surface: &Self::Surface);

    /// Attach `buffer`, damage the whole surface and commit
    fn present(&mut self, surface: &Self::Surface, buffer: &Self::Buffer);

    fn destroy_surface(&mut self, surface: Self::Surface);

    fn destroy_output(&mut self, output: Self::Output);

    fn destroy_buffer(&mut self, buffer: Self::Buffer);
}
