// SPDX-License-Identifier: MIT
//! Bounded, zero-based view over a shared buffer
//!
//! A window lets a tool treat "the record starting at offset X" as its own
//! buffer without copying. Window offsets are translated into the parent's
//! coordinates and validated against the window's own length.

use std::sync::Arc;

use parking_lot::{MappedRwLockReadGuard, RwLock, RwLockReadGuard};

use super::byte_buffer::ByteBuffer;
use super::int::{Endianness, IntWidth};
use crate::error::{check_range, HexError};

/// Buffer handle shared between an editor session and its windows
pub type SharedBuffer = Arc<RwLock<ByteBuffer>>;

/// Wrap a buffer so it can be shared with windows
pub fn shared(buffer: ByteBuffer) -> SharedBuffer {
    Arc::new(RwLock::new(buffer))
}

#[derive(Debug, Clone)]
pub struct BufferWindow {
    source: SharedBuffer,
    start_offset: usize,
    end_offset: usize,
}

impl BufferWindow {
    pub fn new(source: SharedBuffer, start_offset: usize, end_offset: usize) -> Result<Self, HexError> {
        check_range(start_offset, end_offset, source.read().len())?;
        Ok(Self {
            source,
            start_offset,
            end_offset,
        })
    }

    /// Window from `start_offset` to the current end of the buffer
    pub fn from_offset(source: SharedBuffer, start_offset: usize) -> Result<Self, HexError> {
        let end_offset = source.read().len();
        Self::new(source, start_offset, end_offset)
    }

    pub fn source(&self) -> &SharedBuffer {
        &self.source
    }

    pub fn start_offset(&self) -> usize {
        self.start_offset
    }

    pub fn end_offset(&self) -> usize {
        self.end_offset
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end_offset - self.start_offset
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn overwrite(&mut self, chunk: &[u8], offset: usize) -> Result<(), HexError> {
        let (start, _) = self.absolute(offset, offset.saturating_add(chunk.len()))?;
        self.source.write().overwrite(chunk, start)
    }

    /// Splice inside the window; the window grows or shrinks with the edit.
    pub fn splice(&mut self, chunk: &[u8], start: usize, end: usize) -> Result<(), HexError> {
        let (abs_start, abs_end) = self.absolute(start, end)?;
        self.source.write().splice(chunk, abs_start, abs_end)?;
        self.end_offset = self.end_offset - (end - start) + chunk.len();
        Ok(())
    }

    pub fn insert(&mut self, chunk: &[u8], offset: usize) -> Result<(), HexError> {
        self.splice(chunk, offset, offset)
    }

    pub fn delete(&mut self, start: usize, len: usize) -> Result<(), HexError> {
        self.splice(&[], start, start.saturating_add(len))
    }

    /// Borrow `start..end` of the window.
    ///
    /// The returned guard holds a read lock on the shared buffer.
    pub fn read_range(&self, start: usize, end: usize) -> Result<MappedRwLockReadGuard<'_, [u8]>, HexError> {
        let (abs_start, abs_end) = self.absolute(start, end)?;
        let guard = self.source.read();
        check_range(abs_start, abs_end, guard.len())?;
        Ok(RwLockReadGuard::map(guard, |buffer| {
            &buffer.as_slice()[abs_start..abs_end]
        }))
    }

    pub fn copy_range(&self, start: usize, end: usize) -> Result<Vec<u8>, HexError> {
        let (abs_start, abs_end) = self.absolute(start, end)?;
        self.source.read().copy_range(abs_start, abs_end)
    }

    /// Copy of the whole window
    pub fn get_buffer(&self) -> Result<Vec<u8>, HexError> {
        self.copy_range(0, self.len())
    }

    pub fn byte_at(&self, index: usize) -> Result<u8, HexError> {
        if index >= self.len() {
            return Err(HexError::out_of_bounds(index, index.saturating_add(1), self.len()));
        }
        self.source.read().byte_at(self.start_offset + index)
    }

    pub fn read_int(
        &self,
        width: IntWidth,
        signed: bool,
        endian: Endianness,
        offset: usize,
    ) -> Result<i128, HexError> {
        let (abs, _) = self.absolute(offset, offset.saturating_add(width.bytes()))?;
        self.source.read().read_int(width, signed, endian, abs)
    }

    pub fn write_int(
        &mut self,
        width: IntWidth,
        endian: Endianness,
        offset: usize,
        value: i128,
    ) -> Result<(), HexError> {
        let (abs, _) = self.absolute(offset, offset.saturating_add(width.bytes()))?;
        self.source.write().write_int(width, endian, abs, value)
    }

    pub fn read_text(&self, start: usize, end: usize) -> Result<String, HexError> {
        let (abs_start, abs_end) = self.absolute(start, end)?;
        self.source.read().read_text(abs_start, abs_end)
    }

    fn absolute(&self, start: usize, end: usize) -> Result<(usize, usize), HexError> {
        check_range(start, end, self.len())?;
        Ok((self.start_offset + start, self.start_offset + end))
    }
}
