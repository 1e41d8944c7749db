//! Shared pixel buffer and digit drawing
//!
//! The frame buffer lives in a memfd so the same memory can be handed to
//! the compositor through a wl_shm pool. Drawing mutates that memory in
//! place; there is no back buffer.

pub mod glyph;

use std::fs::File;
use std::io;
use std::os::fd::{AsFd, BorrowedFd};

use log::debug;
use memmap2::MmapMut;
use rustix::fs::MemfdFlags;

use crate::error::{IndicatorError, Result};

/// Bytes per ARGB8888 pixel
const BYTES_PER_PIXEL: u32 = 4;

/// A 32-bit ARGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(u32);

impl Color {
    /// Opaque color from its channels
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::argb(0xff, r, g, b)
    }

    /// Color from all four channels
    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Color(((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Create from a packed ARGB8888 value
    pub const fn from_argb8888(value: u32) -> Self {
        Color(value)
    }

    /// Packed ARGB8888 value
    pub const fn to_argb8888(self) -> u32 {
        self.0
    }
}

/// Something digit glyphs can be drawn onto
pub trait Canvas {
    /// Draw `digit` with its slot origin at (`x`, `y`)
    ///
    /// Only the glyph's own pixels are written, so drawing the same digit
    /// again in the background color erases it.
    fn draw(&mut self, color: Color, digit: i32, x: u32, y: u32);
}

/// The single shared ARGB8888 pixel buffer
pub struct FrameBuffer {
    /// memfd backing the pixels
    file: File,
    /// Writable mapping of `file`
    map: MmapMut,
    width: u32,
    height: u32,
    stride: u32,
}

impl FrameBuffer {
    /// Allocate a zeroed buffer of `width` x `height` pixels
    pub fn create(width: u32, height: u32) -> Result<Self> {
        // wl_shm refuses empty pools
        if width == 0 || height == 0 {
            return Err(IndicatorError::FrameBuffer(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("empty frame buffer {}x{}", width, height),
            )));
        }

        let stride = width * BYTES_PER_PIXEL;
        let size = u64::from(stride) * u64::from(height);

        let fd = rustix::fs::memfd_create("wsi-frame-buffer", MemfdFlags::CLOEXEC)
            .map_err(|e| IndicatorError::FrameBuffer(e.into()))?;
        let file = File::from(fd);
        file.set_len(size).map_err(IndicatorError::FrameBuffer)?;

        // SAFETY: the memfd is private to this process until it is shared
        // with the compositor, which only ever reads from it
        let map = unsafe { MmapMut::map_mut(&file) }.map_err(IndicatorError::FrameBuffer)?;

        debug!("Created {}x{} frame buffer ({} bytes)", width, height, size);

        Ok(Self {
            file,
            map,
            width,
            height,
            stride,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row
    pub fn stride(&self) -> u32 {
        self.stride
    }

    /// Total size of the pixel data in bytes
    pub fn size_in_bytes(&self) -> usize {
        self.map.len()
    }

    /// Set every pixel to `color`
    pub fn fill(&mut self, color: Color) {
        let bytes = color.to_argb8888().to_le_bytes();
        for pixel in self.map.chunks_exact_mut(BYTES_PER_PIXEL as usize) {
            pixel.copy_from_slice(&bytes);
        }
    }

    /// Read a pixel, `None` when outside the buffer
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let offset = self.offset(x, y)?;
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.map[offset..offset + BYTES_PER_PIXEL as usize]);
        Some(Color::from_argb8888(u32::from_le_bytes(bytes)))
    }

    /// Write a pixel, ignoring coordinates outside the buffer
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if let Some(offset) = self.offset(x, y) {
            self.map[offset..offset + BYTES_PER_PIXEL as usize]
                .copy_from_slice(&color.to_argb8888().to_le_bytes());
        }
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y * self.stride + x * BYTES_PER_PIXEL) as usize)
    }
}

impl Canvas for FrameBuffer {
    fn draw(&mut self, color: Color, digit: i32, x: u32, y: u32) {
        if glyph::bitmap(digit).is_none() {
            debug!("No glyph for {}, nothing drawn", digit);
            return;
        }
        for (px, py) in glyph::pixels(digit) {
            self.set_pixel(x.saturating_add(px), y.saturating_add(py), color);
        }
    }
}

impl AsFd for FrameBuffer {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.file.as_fd()
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .finish_non_exhaustive()
    }
}
