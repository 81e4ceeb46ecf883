// SPDX-License-Identifier: MIT
//! Byte sources a struct codec can be attached to

use super::byte_buffer::ByteBuffer;
use super::window::BufferWindow;
use crate::error::{check_range, HexError};

/// Random-access byte storage with a fixed logical length
pub trait ByteSource {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Independent copy of `start..end`
    fn copy_range(&self, start: usize, end: usize) -> Result<Vec<u8>, HexError>;

    /// Copy `chunk` over the bytes at `offset` without changing the length
    fn overwrite(&mut self, chunk: &[u8], offset: usize) -> Result<(), HexError>;
}

impl ByteSource for ByteBuffer {
    fn len(&self) -> usize {
        ByteBuffer::len(self)
    }

    fn copy_range(&self, start: usize, end: usize) -> Result<Vec<u8>, HexError> {
        ByteBuffer::copy_range(self, start, end)
    }

    fn overwrite(&mut self, chunk: &[u8], offset: usize) -> Result<(), HexError> {
        ByteBuffer::overwrite(self, chunk, offset)
    }
}

impl ByteSource for BufferWindow {
    fn len(&self) -> usize {
        BufferWindow::len(self)
    }

    fn copy_range(&self, start: usize, end: usize) -> Result<Vec<u8>, HexError> {
        BufferWindow::copy_range(self, start, end)
    }

    fn overwrite(&mut self, chunk: &[u8], offset: usize) -> Result<(), HexError> {
        BufferWindow::overwrite(self, chunk, offset)
    }
}

impl ByteSource for Vec<u8> {
    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn copy_range(&self, start: usize, end: usize) -> Result<Vec<u8>, HexError> {
        check_range(start, end, Vec::len(self))?;
        Ok(self[start..end].to_vec())
    }

    fn overwrite(&mut self, chunk: &[u8], offset: usize) -> Result<(), HexError> {
        let end = offset.saturating_add(chunk.len());
        check_range(offset, end, Vec::len(self))?;
        self[offset..end].copy_from_slice(chunk);
        Ok(())
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn copy_range(&self, start: usize, end: usize) -> Result<Vec<u8>, HexError> {
        (**self).copy_range(start, end)
    }

    fn overwrite(&mut self, chunk: &[u8], offset: usize) -> Result<(), HexError> {
        (**self).overwrite(chunk, offset)
    }
}
