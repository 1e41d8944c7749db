//! Output discovery
//!
//! Tracks the outputs the compositor announced, plus one synthetic entry
//! that is bound to no output and lets the compositor place it.

use log::{debug, info};

use crate::error::{IndicatorError, Result};
use crate::transport::Transport;

/// Roundtrips performed before checking for required globals
const DISCOVERY_ROUNDTRIPS: usize = 2;

/// One display output and its indicator surface, once created
pub struct Output<T: Transport> {
    /// `None` for the default entry
    pub(crate) handle: Option<T::Output>,
    pub(crate) surface: Option<T::Surface>,
}

impl<T: Transport> Output<T> {
    fn new(handle: Option<T::Output>) -> Self {
        Self {
            handle,
            surface: None,
        }
    }

    /// Whether this is the entry bound to no particular output
    pub fn is_default(&self) -> bool {
        self.handle.is_none()
    }

    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    pub fn surface(&self) -> Option<&T::Surface> {
        self.surface.as_ref()
    }
}

/// All known outputs
pub struct OutputRegistry<T: Transport> {
    outputs: Vec<Output<T>>,
}

impl<T: Transport> OutputRegistry<T> {
    /// A registry holding only the default entry
    pub fn new() -> Self {
        Self {
            outputs: vec![Output::new(None)],
        }
    }

    /// Bind the globals and collect the outputs announced so far
    ///
    /// Fails if the shared-memory, compositor or layer-shell global is
    /// still missing after the discovery roundtrips.
    pub fn discover(transport: &mut T) -> Result<Self> {
        for _ in 0..DISCOVERY_ROUNDTRIPS {
            transport.roundtrip()?;
        }

        let caps = transport.capabilities();
        if !caps.layer_shell {
            return Err(IndicatorError::MissingGlobal("zwlr_layer_shell_v1"));
        }
        if !caps.shm {
            return Err(IndicatorError::MissingGlobal("wl_shm"));
        }
        if !caps.compositor {
            return Err(IndicatorError::MissingGlobal("wl_compositor"));
        }

        let mut registry = Self::new();
        let added = registry.absorb(transport);
        info!("Discovered {} output(s)", added);
        Ok(registry)
    }

    /// Add every output the transport announced since the last call
    pub fn absorb(&mut self, transport: &mut T) -> usize {
        let announced = transport.take_outputs();
        let count = announced.len();
        for handle in announced {
            self.outputs.push(Output::new(Some(handle)));
        }
        if count > 0 {
            debug!("Registry now tracks {} entries", self.outputs.len());
        }
        count
    }

    pub fn iter(&self) -> impl Iterator<Item = &Output<T>> {
        self.outputs.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Output<T>> {
        self.outputs.iter_mut()
    }

    /// Number of entries, including the default one
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    /// Only true after teardown
    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// Destroy every surface, then every output handle
    pub fn teardown(&mut self, transport: &mut T) {
        for output in self.outputs.drain(..) {
            if let Some(surface) = output.surface {
                transport.destroy_surface(surface);
            }
            if let Some(handle) = output.handle {
                transport.destroy_output(handle);
            }
        }
    }
}

impl<T: Transport> Default for OutputRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
