//! Recording transport for tests

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use wayland_client::backend::WaylandError;
use wayland_client::DispatchError;

use super::{Anchor, Capabilities, Layer, SurfaceSpec, Transport};
use crate::error::{IndicatorError, Result};
use crate::image::FrameBuffer;

/// A request the session made of the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Roundtrip,
    CreateBuffer { width: u32, height: u32 },
    CreateSurface {
        surface: u32,
        output: Option<u32>,
        width: u32,
        height: u32,
        layer: Layer,
        anchor: Anchor,
    },
    Commit(u32),
    Present { surface: u32, buffer: u32 },
    DestroySurface(u32),
    DestroyOutput(u32),
    DestroyBuffer(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockOutput(pub u32);

#[derive(Debug, PartialEq, Eq)]
pub struct MockSurface {
    pub id: u32,
    pub output: Option<u32>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct MockBuffer(pub u32);

/// Call log shared with the test so it survives the transport being dropped
pub type CallLog = Rc<RefCell<Vec<Call>>>;

pub struct MockTransport {
    pub calls: CallLog,
    pub capabilities: Capabilities,
    /// Outputs handed out by the next `take_outputs`
    pub announced: Vec<MockOutput>,
    /// Refuse to create surfaces
    pub fail_surfaces: bool,
    /// Fail every roundtrip as if the connection broke
    pub fail_roundtrips: bool,
    next_id: u32,
}

impl MockTransport {
    /// A transport with every required global bound and `outputs` outputs
    pub fn new(outputs: u32) -> Self {
        Self {
            calls: CallLog::default(),
            capabilities: Capabilities {
                shm: true,
                compositor: true,
                layer_shell: true,
            },
            announced: (1..=outputs).map(MockOutput).collect(),
            fail_surfaces: false,
            fail_roundtrips: false,
            next_id: 100,
        }
    }

    pub fn log(&self) -> CallLog {
        Rc::clone(&self.calls)
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

/// Count the calls matching a predicate
pub fn count(log: &CallLog, pred: impl Fn(&Call) -> bool) -> usize {
    log.borrow().iter().filter(|&c| pred(c)).count()
}

impl Transport for MockTransport {
    type Output = MockOutput;
    type Surface = MockSurface;
    type Buffer = MockBuffer;

    fn roundtrip(&mut self) -> Result<usize> {
        self.record(Call::Roundtrip);
        if self.fail_roundtrips {
            let broken = io::Error::from(io::ErrorKind::BrokenPipe);
            return Err(DispatchError::Backend(WaylandError::Io(broken)).into());
        }
        Ok(0)
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn take_outputs(&mut self) -> Vec<MockOutput> {
        std::mem::take(&mut self.announced)
    }

    fn create_buffer(&mut self, image: &FrameBuffer) -> Result<MockBuffer> {
        self.record(Call::CreateBuffer {
            width: image.width(),
            height: image.height(),
        });
        self.next_id += 1;
        Ok(MockBuffer(self.next_id))
    }

    fn create_surface(
        &mut self,
        output: Option<&MockOutput>,
        spec: SurfaceSpec<'_>,
    ) -> Result<MockSurface> {
        if self.fail_surfaces {
            return Err(IndicatorError::Unbound("wl_compositor"));
        }
        self.next_id += 1;
        let surface = MockSurface {
            id: self.next_id,
            output: output.map(|o| o.0),
        };
        self.record(Call::CreateSurface {
            surface: surface.id,
            output: surface.output,
            width: spec.width,
            height: spec.height,
            layer: spec.layer,
            anchor: spec.anchor,
        });
        Ok(surface)
    }

    fn commit(&mut self, surface: &MockSurface) {
        self.record(Call::Commit(surface.id));
    }

    fn present(&mut self, surface: &MockSurface, buffer: &MockBuffer) {
        self.record(Call::Present {
            surface: surface.id,
            buffer: buffer.0,
        });
    }

    fn destroy_surface(&mut self, surface: MockSurface) {
        self.record(Call::DestroySurface(surface.id));
    }

    fn destroy_output(&mut self, output: MockOutput) {
        self.record(Call::DestroyOutput(output.0));
    }

    fn destroy_buffer(&mut self, buffer: MockBuffer) {
        self.record(Call::DestroyBuffer(buffer.0));
    }
}
