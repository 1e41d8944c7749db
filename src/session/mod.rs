//! Indicator session
//!
//! Owns the display transport, the outputs and their surfaces, the shared
//! frame buffer and the rendering state, and ties them to the control
//! socket loop.
//!
//! Resources are acquired in order (globals and outputs, frame buffer,
//! buffer handle) and released in reverse when the session is dropped,
//! whichever way the loop ended.

pub mod registry;
pub mod surface;

use log::{debug, info};

use crate::config::Config;
use crate::error::Result;
use crate::image::FrameBuffer;
use crate::indicator::{History, RenderStateMachine};
use crate::listener::SocketListener;
use crate::transport::Transport;

pub use crate::transport::{classify_global, GlobalKind};
pub use registry::{Output, OutputRegistry};
pub use surface::SurfaceManager;

/// A running indicator bound to one compositor connection
pub struct Session<T: Transport> {
    outputs: OutputRegistry<T>,
    surfaces: SurfaceManager,
    renderer: RenderStateMachine,
    /// Always `Some` until teardown
    buffer: Option<T::Buffer>,
    /// Dropped after the buffer and surfaces are destroyed
    transport: T,
    /// Released last, after the compositor let go of it
    image: FrameBuffer,
    updates: usize,
}

impl<T: Transport> Session<T> {
    /// Discover outputs and globals and set up the shared buffer
    ///
    /// Fails when a required global is missing or the buffer cannot be
    /// allocated. Anything acquired before the failure is released.
    pub fn start(mut transport: T, config: &Config) -> Result<Self> {
        let mut outputs = OutputRegistry::discover(&mut transport)?;

        let (width, height) = config.size;
        let mut image = match FrameBuffer::create(width, height) {
            Ok(image) => image,
            Err(e) => {
                outputs.teardown(&mut transport);
                return Err(e);
            }
        };
        image.fill(config.palette.background);

        let buffer = match transport.create_buffer(&image) {
            Ok(buffer) => buffer,
            Err(e) => {
                outputs.teardown(&mut transport);
                return Err(e);
            }
        };

        info!(
            "Session started with {} output entries, {}x{} indicator",
            outputs.len(),
            width,
            height
        );

        Ok(Self {
            outputs,
            surfaces: SurfaceManager::from_config(config),
            renderer: RenderStateMachine::from_config(config),
            buffer: Some(buffer),
            transport,
            image,
            updates: 0,
        })
    }

    /// Draw a workspace change and show it on every output
    pub fn update(&mut self, workspace: i32) {
        let ops = self.renderer.render(workspace, &mut self.image);
        self.updates += 1;

        if let Some(buffer) = &self.buffer {
            self.surfaces
                .flush_all(&mut self.transport, &mut self.outputs, buffer);
        }

        debug!("Update {} applied {} draw(s)", self.updates, ops);
    }

    /// Handle notifications from `listener` until it stops
    pub fn run(&mut self, listener: &SocketListener) -> usize {
        let handled = listener.listen(|workspace| self.update(workspace));
        info!("Control socket closed after {} notification(s)", handled);
        handled
    }

    pub fn history(&self) -> &History {
        self.renderer.history()
    }

    pub fn outputs(&self) -> &OutputRegistry<T> {
        &self.outputs
    }

    pub fn image(&self) -> &FrameBuffer {
        &self.image
    }

    pub fn updates(&self) -> usize {
        self.updates
    }
}

impl<T: Transport> Drop for Session<T> {
    fn drop(&mut self) {
        info!("Tearing down session");
        self.outputs.teardown(&mut self.transport);
        if let Some(buffer) = self.buffer.take() {
            self.transport.destroy_buffer(buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::os::unix::net::UnixDatagram;

    use super::*;
    use crate::error::IndicatorError;
    use crate::transport::mock::{count, Call, MockTransport};

    fn presents(log: &crate::transport::mock::CallLog) -> usize {
        count(log, |c| matches!(c, Call::Present { .. }))
    }

    #[test]
    fn test_start_creates_one_buffer() {
        let transport = MockTransport::new(2);
        let log = transport.log();
        let session = Session::start(transport, &Config::default()).unwrap();

        assert_eq!(session.outputs().len(), 3);
        assert_eq!(
            count(&log, |c| *c == Call::CreateBuffer { width: 200, height: 120 }),
            1
        );
        // Surfaces wait for the first flush
        assert_eq!(count(&log, |c| matches!(c, Call::CreateSurface { .. })), 0);
    }

    #[test]
    fn test_start_fills_background() {
        let config = Config::default();
        let session = Session::start(MockTransport::new(0), &config).unwrap();
        assert_eq!(session.image().pixel(0, 0), Some(config.palette.background));
        assert_eq!(
            session.image().pixel(199, 119),
            Some(config.palette.background)
        );
    }

    #[test]
    fn test_start_aborts_without_layer_shell() {
        let mut transport = MockTransport::new(1);
        transport.capabilities.layer_shell = false;
        let log = transport.log();

        let err = Session::start(transport, &Config::default()).err().unwrap();
        assert!(matches!(err, IndicatorError::MissingGlobal(_)));
        assert_eq!(count(&log, |c| matches!(c, Call::CreateBuffer { .. })), 0);
        assert_eq!(count(&log, |c| *c == Call::Roundtrip), 2);
    }

    #[test]
    fn test_start_discovers_before_frame_buffer() {
        // An unusable size is only noticed once the globals are known
        let config = Config {
            size: (0, 0),
            ..Config::default()
        };
        let mut transport = MockTransport::new(1);
        transport.capabilities.layer_shell = false;
        let err = Session::start(transport, &config).err().unwrap();
        assert!(matches!(err, IndicatorError::MissingGlobal(_)));

        let transport = MockTransport::new(2);
        let log = transport.log();
        let err = Session::start(transport, &config).err().unwrap();
        assert!(matches!(err, IndicatorError::FrameBuffer(_)));

        // Discovered outputs are released, no buffer handle was made
        let calls = log.borrow();
        assert_eq!(
            *calls,
            [
                Call::Roundtrip,
                Call::Roundtrip,
                Call::DestroyOutput(1),
                Call::DestroyOutput(2)
            ]
        );
    }

    #[test]
    fn test_updates_track_history() {
        let mut session = Session::start(MockTransport::new(1), &Config::default()).unwrap();
        for workspace in [4, 5, 6] {
            session.update(workspace);
        }

        let history = session.history();
        assert_eq!(history.current, 6);
        assert_eq!(history.previous, 5);
        assert_eq!(history.previous_previous, 4);
        assert_eq!(session.updates(), 3);
    }

    #[test]
    fn test_update_flushes_every_output() {
        let transport = MockTransport::new(2);
        let log = transport.log();
        let mut session = Session::start(transport, &Config::default()).unwrap();

        session.update(1);
        assert_eq!(presents(&log), 3);
        session.update(2);
        assert_eq!(presents(&log), 6);
        assert_eq!(count(&log, |c| matches!(c, Call::CreateSurface { .. })), 3);
    }

    #[test]
    fn test_update_survives_failed_roundtrips() {
        let transport = MockTransport::new(1);
        let log = transport.log();
        let mut session = Session::start(transport, &Config::default()).unwrap();
        session.transport.fail_roundtrips = true;

        session.update(1);
        session.update(2);

        // Every entry is still presented on both updates
        assert_eq!(presents(&log), 4);
        assert_eq!(count(&log, |c| *c == Call::Roundtrip), 2 + 4);
        let history = session.history();
        assert_eq!(history.current, 2);
        assert_eq!(history.previous, 1);
        assert_eq!(session.updates(), 2);
    }

    #[test]
    fn test_run_stops_on_empty_datagram() {
        let transport = MockTransport::new(1);
        let log = transport.log();
        let mut session = Session::start(transport, &Config::default()).unwrap();

        let (tx, rx) = UnixDatagram::pair().unwrap();
        tx.send(b"1").unwrap();
        tx.send(b"2").unwrap();
        tx.send(b"").unwrap();
        tx.send(b"3").unwrap();

        let listener = SocketListener::from_socket(rx);
        assert_eq!(session.run(&listener), 2);

        assert_eq!(session.history().current, 2);
        // Two flushes over two entries, nothing after the empty datagram
        assert_eq!(presents(&log), 4);
    }

    #[test]
    fn test_run_stops_on_receive_error() {
        let mut session = Session::start(MockTransport::new(0), &Config::default()).unwrap();
        let (_tx, rx) = UnixDatagram::pair().unwrap();
        rx.set_read_timeout(Some(std::time::Duration::from_millis(10)))
            .unwrap();

        let listener = SocketListener::from_socket(rx);
        assert_eq!(session.run(&listener), 0);
        assert_eq!(session.updates(), 0);
    }

    #[test]
    fn test_drop_tears_down_in_reverse() {
        let transport = MockTransport::new(1);
        let log = transport.log();
        let mut session = Session::start(transport, &Config::default()).unwrap();
        session.update(3);
        log.borrow_mut().clear();

        drop(session);

        let calls = log.borrow();
        assert_eq!(calls.len(), 4);
        assert!(matches!(calls[0], Call::DestroySurface(_)));
        assert!(matches!(calls[1], Call::DestroySurface(_)));
        assert!(matches!(calls[2], Call::DestroyOutput(1)));
        assert!(matches!(calls[3], Call::DestroyBuffer(_)));
    }
}
