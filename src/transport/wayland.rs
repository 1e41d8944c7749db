//! Wayland transport
//!
//! Binds wl_shm, wl_compositor, zwlr_layer_shell_v1 and every wl_output
//! through the registry, and creates the overlay layer surfaces.

use std::os::fd::AsFd;

use log::{debug, error, info, warn};
use wayland_client::protocol::{
    wl_buffer, wl_compositor, wl_output, wl_registry, wl_shm, wl_shm_pool, wl_surface,
};
use wayland_client::{delegate_noop, Connection, Dispatch, EventQueue, Proxy, QueueHandle};
use wayland_protocols_wlr::layer_shell::v1::client::{zwlr_layer_shell_v1, zwlr_layer_surface_v1};

use super::layer::{self, Layer, LayerEvent, LayerReply};
use super::{
    classify_global, Capabilities, GlobalKind, SurfaceSpec, Transport, MIN_OUTPUT_VERSION,
};
use crate::error::{IndicatorError, Result};
use crate::image::FrameBuffer;

/// Highest wl_compositor version we bind
const COMPOSITOR_VERSION: u32 = 4;

/// Highest zwlr_layer_shell_v1 version we bind
const LAYER_SHELL_VERSION: u32 = 4;

/// Highest wl_output version we bind
const OUTPUT_VERSION: u32 = 4;

/// zwlr_layer_shell_v1.destroy appeared in version 3
const LAYER_SHELL_DESTROY_SINCE: u32 = 3;

/// wl_output.release appeared in version 3
const OUTPUT_RELEASE_SINCE: u32 = 3;

/// State filled in by the registry and protocol event handlers
#[derive(Debug, Default)]
pub struct WaylandState {
    shm: Option<wl_shm::WlShm>,
    compositor: Option<wl_compositor::WlCompositor>,
    layer_shell: Option<zwlr_layer_shell_v1::ZwlrLayerShellV1>,
    /// Outputs bound but not yet handed to the session
    announced: Vec<wl_output::WlOutput>,
}

/// A wl_surface with the layer surface role
#[derive(Debug)]
pub struct LayerSurface {
    surface: wl_surface::WlSurface,
    layer_surface: zwlr_layer_surface_v1::ZwlrLayerSurfaceV1,
}

/// Connection to the compositor
pub struct WaylandTransport {
    state: WaylandState,
    queue: EventQueue<WaylandState>,
    qh: QueueHandle<WaylandState>,
    _registry: wl_registry::WlRegistry,
}

impl WaylandTransport {
    /// Connect to the display named by the environment and request the
    /// registry. Globals arrive on the next roundtrip.
    pub fn connect() -> Result<Self> {
        let connection = Connection::connect_to_env()?;
        info!("Connected to Wayland display");

        let queue = connection.new_event_queue();
        let qh = queue.handle();
        let registry = connection.display().get_registry(&qh, ());

        Ok(Self {
            state: WaylandState::default(),
            queue,
            qh,
            _registry: registry,
        })
    }
}

impl Transport for WaylandTransport {
    type Output = wl_output::WlOutput;
    type Surface = LayerSurface;
    type Buffer = wl_buffer::WlBuffer;

    fn roundtrip(&mut self) -> Result<usize> {
        Ok(self.queue.roundtrip(&mut self.state)?)
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            shm: self.state.shm.is_some(),
            compositor: self.state.compositor.is_some(),
            layer_shell: self.state.layer_shell.is_some(),
        }
    }

    fn take_outputs(&mut self) -> Vec<wl_output::WlOutput> {
        std::mem::take(&mut self.state.announced)
    }

    fn create_buffer(&mut self, image: &FrameBuffer) -> Result<wl_buffer::WlBuffer> {
        let shm = self
            .state
            .shm
            .as_ref()
            .ok_or(IndicatorError::Unbound("wl_shm"))?;

        let pool = shm.create_pool(image.as_fd(), image.size_in_bytes() as i32, &self.qh, ());
        let buffer = pool.create_buffer(
            0,
            image.width() as i32,
            image.height() as i32,
            image.stride() as i32,
            wl_shm::Format::Argb8888,
            &self.qh,
            (),
        );
        // The buffer keeps the pool memory alive
        pool.destroy();

        debug!("Created wl_buffer {:?}", buffer.id());
        Ok(buffer)
    }

    fn create_surface(
        &mut self,
        output: Option<&wl_output::WlOutput>,
        spec: SurfaceSpec<'_>,
    ) -> Result<LayerSurface> {
        let compositor = self
            .state
            .compositor
            .as_ref()
            .ok_or(IndicatorError::Unbound("wl_compositor"))?;
        let layer_shell = self
            .state
            .layer_shell
            .as_ref()
            .ok_or(IndicatorError::Unbound("zwlr_layer_shell_v1"))?;

        let surface = compositor.create_surface(&self.qh, ());
        let layer_surface = layer_shell.get_layer_surface(
            &surface,
            output,
            protocol_layer(spec.layer),
            spec.namespace.to_string(),
            &self.qh,
            (),
        );
        layer_surface.set_size(spec.width, spec.height);
        layer_surface.set_anchor(zwlr_layer_surface_v1::Anchor::from_bits_truncate(
            spec.anchor.bits(),
        ));

        debug!(
            "Created layer surface {:?} on output {:?}",
            layer_surface.id(),
            output.map(|o| o.id())
        );

        Ok(LayerSurface {
            surface,
            layer_surface,
        })
    }

    fn commit(&mut self, surface: &LayerSurface) {
        surface.surface.commit();
    }

    fn present(&mut self, surface: &LayerSurface, buffer: &wl_buffer::WlBuffer) {
        surface.surface.attach(Some(buffer), 0, 0);
        surface.surface.damage(0, 0, i32::MAX, i32::MAX);
        surface.surface.commit();
    }

    fn destroy_surface(&mut self, surface: LayerSurface) {
        surface.layer_surface.destroy();
        surface.surface.destroy();
    }

    fn destroy_output(&mut self, output: wl_output::WlOutput) {
        if output.version() >= OUTPUT_RELEASE_SINCE {
            output.release();
        }
    }

    fn destroy_buffer(&mut self, buffer: wl_buffer::WlBuffer) {
        buffer.destroy();
    }
}

fn protocol_layer(layer: Layer) -> zwlr_layer_shell_v1::Layer {
    match layer {
        Layer::Background => zwlr_layer_shell_v1::Layer::Background,
        Layer::Bottom => zwlr_layer_shell_v1::Layer::Bottom,
        Layer::Top => zwlr_layer_shell_v1::Layer::Top,
        Layer::Overlay => zwlr_layer_shell_v1::Layer::Overlay,
    }
}

impl Drop for WaylandTransport {
    fn drop(&mut self) {
        for output in self.state.announced.drain(..) {
            if output.version() >= OUTPUT_RELEASE_SINCE {
                output.release();
            }
        }

        if let Some(layer_shell) = self.state.layer_shell.take() {
            if layer_shell.version() >= LAYER_SHELL_DESTROY_SINCE {
                layer_shell.destroy();
            }
        }

        // wl_compositor and wl_shm v1 have no destructor request
        self.state.compositor = None;
        self.state.shm = None;

        if let Err(e) = self.queue.roundtrip(&mut self.state) {
            error!("Final roundtrip failed: {}", e);
        }
        info!("Disconnecting from Wayland display");
    }
}

// ============================================================================
// wl_registry
// ============================================================================

impl Dispatch<wl_registry::WlRegistry, ()> for WaylandState {
    fn event(
        state: &mut Self,
        registry: &wl_registry::WlRegistry,
        event: wl_registry::Event,
        _data: &(),
        _conn: &Connection,
        qh: &QueueHandle<Self>,
    ) {
        match event {
            wl_registry::Event::Global {
                name,
                interface,
                version,
            } => match classify_global(&interface, version) {
                GlobalKind::Shm => {
                    state.shm = Some(registry.bind::<wl_shm::WlShm, _, _>(name, 1, qh, ()));
                    info!("Bound {} v1", interface);
                }
                GlobalKind::Compositor => {
                    let version = version.min(COMPOSITOR_VERSION);
                    state.compositor = Some(registry.bind::<wl_compositor::WlCompositor, _, _>(
                        name,
                        version,
                        qh,
                        (),
                    ));
                    info!("Bound {} v{}", interface, version);
                }
                GlobalKind::LayerShell => {
                    let version = version.min(LAYER_SHELL_VERSION);
                    state.layer_shell = Some(
                        registry.bind::<zwlr_layer_shell_v1::ZwlrLayerShellV1, _, _>(
                            name,
                            version,
                            qh,
                            (),
                        ),
                    );
                    info!("Bound {} v{}", interface, version);
                }
                GlobalKind::Output => {
                    let version = version.min(OUTPUT_VERSION);
                    let output =
                        registry.bind::<wl_output::WlOutput, _, _>(name, version, qh, ());
                    info!("Bound {} v{} (global {})", interface, version, name);
                    state.announced.push(output);
                }
                GlobalKind::Rejected => {
                    warn!(
                        "Unsupported {} version {}, need at least {}",
                        interface, version, MIN_OUTPUT_VERSION
                    );
                }
                GlobalKind::Ignored => {}
            },
            wl_registry::Event::GlobalRemove { name } => {
                debug!("Global {} removed, output removal is not supported", name);
            }
            _ => {}
        }
    }
}

// ============================================================================
// wl_output
// ============================================================================

impl Dispatch<wl_output::WlOutput, ()> for WaylandState {
    fn event(
        _state: &mut Self,
        proxy: &wl_output::WlOutput,
        event: wl_output::Event,
        _data: &(),
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
        match event {
            wl_output::Event::Name { name } => {
                debug!("Output {:?} is {}", proxy.id(), name);
            }
            wl_output::Event::Description { description } => {
                debug!("Output {:?}: {}", proxy.id(), description);
            }
            _ => {}
        }
    }
}

// ============================================================================
// zwlr_layer_surface_v1
// ============================================================================

impl Dispatch<zwlr_layer_surface_v1::ZwlrLayerSurfaceV1, ()> for WaylandState {
    fn event(
        _state: &mut Self,
        proxy: &zwlr_layer_surface_v1::ZwlrLayerSurfaceV1,
        event: zwlr_layer_surface_v1::Event,
        _data: &(),
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
    ) {
        let event = match event {
            zwlr_layer_surface_v1::Event::Configure {
                serial,
                width,
                height,
            } => {
                debug!(
                    "Layer surface {:?} configure {} ({}x{})",
                    proxy.id(),
                    serial,
                    width,
                    height
                );
                LayerEvent::Configure {
                    serial,
                    width,
                    height,
                }
            }
            zwlr_layer_surface_v1::Event::Closed => {
                debug!("Layer surface {:?} closed by compositor", proxy.id());
                LayerEvent::Closed
            }
            _ => return,
        };

        match layer::reply_to(event) {
            LayerReply::AckConfigure(serial) => proxy.ack_configure(serial),
            LayerReply::None => {}
        }
    }
}

delegate_noop!(WaylandState: wl_compositor::WlCompositor);
delegate_noop!(WaylandState: wl_shm_pool::WlShmPool);
delegate_noop!(WaylandState: zwlr_layer_shell_v1::ZwlrLayerShellV1);
delegate_noop!(WaylandState: ignore wl_shm::WlShm);
delegate_noop!(WaylandState: ignore wl_surface::WlSurface);
delegate_noop!(WaylandState: ignore wl_buffer::WlBuffer);
