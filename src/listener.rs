//! Control socket
//!
//! Workspace changes arrive as datagrams on a Unix socket at a fixed
//! path. Each datagram carries the decimal text of a workspace id. There
//! is no framing and nothing is sent back.

use std::fs;
use std::io;
use std::os::unix::net::UnixDatagram;
use std::path::{Path, PathBuf};

use log::{debug, error, info};

use crate::error::{IndicatorError, Result};

/// Largest datagram read in one go, longer ones are truncated
pub const RECV_BUFFER_SIZE: usize = 8192;

/// Parse a workspace id the way C `atoi` does
///
/// Leading whitespace is skipped, an optional sign is accepted, and
/// digits are read up to the first non-digit. Text without digits yields
/// 0. Values beyond the `i32` range saturate.
pub fn parse_workspace_id(payload: &[u8]) -> i32 {
    let mut rest = payload
        .iter()
        .copied()
        .skip_while(|&b| matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r'))
        .peekable();

    let negative = match rest.peek() {
        Some(b'-') => {
            rest.next();
            true
        }
        Some(b'+') => {
            rest.next();
            false
        }
        _ => false,
    };

    let limit = i64::from(i32::MAX) + 1;
    let magnitude = rest
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, b| (acc * 10 + i64::from(b - b'0')).min(limit));

    let value = if negative { -magnitude } else { magnitude };
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Blocking receiver for workspace change notifications
#[derive(Debug)]
pub struct SocketListener {
    socket: UnixDatagram,
    /// Filesystem path to unlink on drop, if we bound one
    path: Option<PathBuf>,
}

impl SocketListener {
    /// Bind to `path`, replacing any stale socket file left there
    pub fn bind(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let socket_error = |source: io::Error| IndicatorError::Socket {
            path: path.to_path_buf(),
            source,
        };

        match fs::remove_file(path) {
            Ok(()) => debug!("Removed stale socket {}", path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(socket_error(e)),
        }

        let socket = UnixDatagram::bind(path).map_err(socket_error)?;
        info!("Listening for workspace changes on {}", path.display());

        Ok(Self {
            socket,
            path: Some(path.to_path_buf()),
        })
    }

    /// Listen on an already created socket
    pub fn from_socket(socket: UnixDatagram) -> Self {
        Self { socket, path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Receive notifications until an empty datagram or a receive error
    ///
    /// `on_workspace` runs to completion for each notification before the
    /// next one is read. Returns the number of notifications handled.
    pub fn listen<F>(&self, mut on_workspace: F) -> usize
    where
        F: FnMut(i32),
    {
        let mut buf = vec![0u8; RECV_BUFFER_SIZE];
        let mut handled = 0;

        loop {
            match self.socket.recv(&mut buf) {
                Ok(0) => {
                    info!("Empty datagram received, stopping");
                    break;
                }
                Ok(len) => {
                    let workspace = parse_workspace_id(&buf[..len]);
                    debug!("Workspace change to {}", workspace);
                    on_workspace(workspace);
                    handled += 1;
                }
                Err(e) => {
                    error!("Receive on control socket failed: {}", e);
                    break;
                }
            }
        }

        handled
    }
}

impl Drop for SocketListener {
    fn drop(&mut self) {
        if let Some(path) = &self.path {
            if let Err(e) = fs::remove_file(path) {
                debug!("Could not remove socket {}: {}", path.display(), e);
            }
        }
    }
}
