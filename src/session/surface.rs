//! Per-output overlay surfaces
//!
//! Surfaces are created lazily, the first time a flush sees an output
//! without one. Every surface shows the same shared buffer.

use log::{debug, error, warn};

use super::registry::OutputRegistry;
use crate::config::Config;
use crate::transport::{Anchor, Layer, SurfaceSpec, Transport};

/// Creates surfaces and pushes the shared buffer to them
#[derive(Debug, Clone)]
pub struct SurfaceManager {
    width: u32,
    height: u32,
    namespace: String,
    layer: Layer,
    anchor: Anchor,
}

impl SurfaceManager {
    /// A manager for floating overlay surfaces of the given size
    pub fn new(width: u32, height: u32, namespace: impl Into<String>) -> Self {
        Self {
            width,
            height,
            namespace: namespace.into(),
            layer: Layer::Overlay,
            anchor: Anchor::empty(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            layer: config.layer,
            anchor: config.anchor,
            ..Self::new(config.size.0, config.size.1, config.namespace.clone())
        }
    }

    fn spec(&self) -> SurfaceSpec<'_> {
        SurfaceSpec {
            width: self.width,
            height: self.height,
            namespace: &self.namespace,
            layer: self.layer,
            anchor: self.anchor,
        }
    }

    /// Give every output without a surface a new one, committed empty
    ///
    /// Returns how many surfaces were created. An output whose surface
    /// could not be created is retried on the next call.
    pub fn ensure_surfaces<T: Transport>(
        &self,
        transport: &mut T,
        outputs: &mut OutputRegistry<T>,
    ) -> usize {
        let mut created = 0;
        for output in outputs.iter_mut().filter(|o| !o.has_surface()) {
            match transport.create_surface(output.handle.as_ref(), self.spec()) {
                Ok(surface) => {
                    transport.commit(&surface);
                    output.surface = Some(surface);
                    created += 1;
                }
                Err(e) => warn!("Failed to create indicator surface: {}", e),
            }
        }
        if created > 0 {
            debug!("Created {} indicator surface(s)", created);
        }
        created
    }

    /// Create missing surfaces, then attach `buffer` to every surface
    ///
    /// Two roundtrips bound the cycle: the first lets configure events be
    /// acknowledged before any content is attached, the second waits for
    /// the compositor to take the frame. Roundtrip failures are logged.
    pub fn flush_all<T: Transport>(
        &self,
        transport: &mut T,
        outputs: &mut OutputRegistry<T>,
        buffer: &T::Buffer,
    ) {
        outputs.absorb(transport);
        self.ensure_surfaces(transport, outputs);

        if let Err(e) = transport.roundtrip() {
            error!("Roundtrip after surface creation failed: {}", e);
        }

        for surface in outputs.iter().filter_map(|o| o.surface()) {
            transport.present(surface, buffer);
        }

        if let Err(e) = transport.roundtrip() {
            error!("Roundtrip after commit failed: {}", e);
        }
    }
}
