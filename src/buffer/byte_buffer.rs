// SPDX-License-Identifier: MIT
//! Growable byte storage with structural edits
//!
//! The buffer keeps a zero-filled storage region whose size is the capacity
//! and a logical `length` inside it. All public offsets are relative to the
//! logical start and are validated against `length`, never the capacity.

use std::path::Path;

use bytes::Bytes;
use tokio::sync::mpsc;
use tracing::debug;

use super::events::{ChangeEvent, ChangeKind, Listeners, SubscriptionId};
use super::int::{decode_int, encode_int, Endianness, IntWidth};
use super::{decode_text, encode_text};
use crate::config::BufferConfig;
use crate::error::{check_range, HexError};

pub struct ByteBuffer {
    storage: Vec<u8>,
    length: usize,
    config: BufferConfig,
    listeners: Listeners,
}

impl ByteBuffer {
    /// Create an empty buffer with the default growth policy
    pub fn new() -> Self {
        Self::with_config(BufferConfig::default())
    }

    pub fn with_config(config: BufferConfig) -> Self {
        Self {
            storage: Vec::new(),
            length: 0,
            config,
            listeners: Listeners::new(),
        }
    }

    /// Create a buffer holding a copy of `bytes`
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HexError> {
        let mut buffer = Self::new();
        buffer.load(bytes)?;
        Ok(buffer)
    }

    /// Create a zero-filled buffer of `len` bytes
    pub fn zeroed(len: usize) -> Result<Self, HexError> {
        let mut buffer = Self::new();
        buffer.ensure_size(len)?;
        buffer.storage = vec![0; len];
        buffer.length = len;
        Ok(buffer)
    }

    /// Read a file from disk into a new buffer
    pub fn open(path: impl AsRef<Path>) -> Result<Self, HexError> {
        Self::open_with_config(path, BufferConfig::default())
    }

    pub fn open_with_config(path: impl AsRef<Path>, config: BufferConfig) -> Result<Self, HexError> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        debug!("Loaded {} bytes from {:?}", data.len(), path);
        let mut buffer = Self::with_config(config);
        buffer.load(&data)?;
        Ok(buffer)
    }

    /// Replace the whole content.
    ///
    /// Emits a single `Change` event spanning the new content.
    pub fn load(&mut self, bytes: &[u8]) -> Result<(), HexError> {
        self.ensure_size(bytes.len())?;
        self.storage = bytes.to_vec();
        self.length = bytes.len();
        self.listeners.emit(ChangeEvent::new(
            ChangeKind::Change,
            0,
            self.length,
            self.length,
        ));
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Size of the allocated storage region
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    pub fn config(&self) -> &BufferConfig {
        &self.config
    }

    /// Copy `chunk` over the bytes at `offset`; length is unchanged
    pub fn overwrite(&mut self, chunk: &[u8], offset: usize) -> Result<(), HexError> {
        let end = offset
            .checked_add(chunk.len())
            .ok_or_else(|| HexError::out_of_bounds(offset, usize::MAX, self.length))?;
        check_range(offset, end, self.length)?;

        self.storage[offset..end].copy_from_slice(chunk);
        self.listeners.emit(ChangeEvent::new(
            ChangeKind::Overwrite,
            offset,
            end,
            chunk.len(),
        ));
        Ok(())
    }

    /// Remove `start..end` and insert `chunk` at `start`
    pub fn splice(&mut self, chunk: &[u8], start: usize, end: usize) -> Result<(), HexError> {
        check_range(start, end, self.length)?;

        let removed = end - start;
        let new_len = self.length - removed + chunk.len();
        self.ensure_size(new_len)?;

        if new_len > self.storage.len() {
            let capacity = self.grown_capacity(new_len);
            debug!(
                "Reallocating buffer storage: {} -> {} bytes (length {})",
                self.storage.len(),
                capacity,
                new_len
            );

            let mut storage = Vec::with_capacity(capacity);
            storage.extend_from_slice(&self.storage[..start]);
            storage.extend_from_slice(chunk);
            storage.extend_from_slice(&self.storage[end..self.length]);
            storage.resize(capacity, 0);
            self.storage = storage;
        } else {
            if chunk.len() != removed {
                self.storage
                    .copy_within(end..self.length, start + chunk.len());
            }
            self.storage[start..start + chunk.len()].copy_from_slice(chunk);
            if new_len < self.length {
                self.storage[new_len..self.length].fill(0);
            }
        }
        self.length = new_len;

        let kind = if chunk.len() >= removed {
            ChangeKind::Insert
        } else {
            ChangeKind::Delete
        };
        self.listeners
            .emit(ChangeEvent::new(kind, start, end, chunk.len()));
        Ok(())
    }

    /// Insert `chunk` at `offset` without removing anything
    pub fn insert(&mut self, chunk: &[u8], offset: usize) -> Result<(), HexError> {
        self.splice(chunk, offset, offset)
    }

    /// Remove `len` bytes starting at `start`
    pub fn delete(&mut self, start: usize, len: usize) -> Result<(), HexError> {
        let end = start
            .checked_add(len)
            .ok_or_else(|| HexError::out_of_bounds(start, usize::MAX, self.length))?;
        self.splice(&[], start, end)
    }

    /// Borrow `start..end` without copying
    pub fn read_range(&self, start: usize, end: usize) -> Result<&[u8], HexError> {
        check_range(start, end, self.length)?;
        Ok(&self.storage[start..end])
    }

    /// Independent copy of `start..end`
    pub fn copy_range(&self, start: usize, end: usize) -> Result<Vec<u8>, HexError> {
        self.read_range(start, end).map(|s| s.to_vec())
    }

    /// Immutable copy of `start..end` that can be handed to another thread
    pub fn snapshot(&self, start: usize, end: usize) -> Result<Bytes, HexError> {
        self.read_range(start, end).map(Bytes::copy_from_slice)
    }

    /// Copy of the whole logical content
    pub fn get_buffer(&self) -> Vec<u8> {
        self.as_slice().to_vec()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.storage[..self.length]
    }

    pub fn byte_at(&self, index: usize) -> Result<u8, HexError> {
        if index >= self.length {
            return Err(HexError::out_of_bounds(index, index.saturating_add(1), self.length));
        }
        Ok(self.storage[index])
    }

    pub fn read_int(
        &self,
        width: IntWidth,
        signed: bool,
        endian: Endianness,
        offset: usize,
    ) -> Result<i128, HexError> {
        let bytes = self.read_range(offset, offset.saturating_add(width.bytes()))?;
        decode_int(bytes, width, signed, endian)
            .ok_or_else(|| HexError::out_of_bounds(offset, offset + width.bytes(), self.length))
    }

    /// Write the low `width` bits of `value` at `offset`
    pub fn write_int(
        &mut self,
        width: IntWidth,
        endian: Endianness,
        offset: usize,
        value: i128,
    ) -> Result<(), HexError> {
        self.overwrite(&encode_int(value, width, endian), offset)
    }

    pub fn read_f32(&self, endian: Endianness, offset: usize) -> Result<f32, HexError> {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(self.read_range(offset, offset.saturating_add(4))?);
        Ok(match endian {
            Endianness::Little => f32::from_le_bytes(raw),
            Endianness::Big => f32::from_be_bytes(raw),
        })
    }

    pub fn read_f64(&self, endian: Endianness, offset: usize) -> Result<f64, HexError> {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(self.read_range(offset, offset.saturating_add(8))?);
        Ok(match endian {
            Endianness::Little => f64::from_le_bytes(raw),
            Endianness::Big => f64::from_be_bytes(raw),
        })
    }

    pub fn write_f32(&mut self, endian: Endianness, offset: usize, value: f32) -> Result<(), HexError> {
        let raw = match endian {
            Endianness::Little => value.to_le_bytes(),
            Endianness::Big => value.to_be_bytes(),
        };
        self.overwrite(&raw, offset)
    }

    pub fn write_f64(&mut self, endian: Endianness, offset: usize, value: f64) -> Result<(), HexError> {
        let raw = match endian {
            Endianness::Little => value.to_le_bytes(),
            Endianness::Big => value.to_be_bytes(),
        };
        self.overwrite(&raw, offset)
    }

    /// Read `start..end` as one character per byte
    pub fn read_text(&self, start: usize, end: usize) -> Result<String, HexError> {
        self.read_range(start, end).map(decode_text)
    }

    /// Overwrite bytes at `start` with one byte per character of `text`
    pub fn write_text(&mut self, start: usize, text: &str) -> Result<(), HexError> {
        self.overwrite(&encode_text(text), start)
    }

    pub fn subscribe<F>(&mut self, kind: ChangeKind, callback: F) -> SubscriptionId
    where
        F: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        self.listeners.subscribe(kind, callback)
    }

    pub fn watch(&mut self, kind: ChangeKind) -> (SubscriptionId, mpsc::UnboundedReceiver<ChangeEvent>) {
        self.listeners.watch(kind)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    fn ensure_size(&self, requested: usize) -> Result<(), HexError> {
        if requested > self.config.max_size {
            return Err(HexError::CapacityExceeded {
                requested,
                max: self.config.max_size,
            });
        }
        Ok(())
    }

    /// Capacity for a reallocation that must hold `new_len` bytes.
    ///
    /// Doubles the current capacity or adds the margin, whichever is larger,
    /// so runs of large inserts stay amortised linear.
    fn grown_capacity(&self, new_len: usize) -> usize {
        new_len
            .saturating_add(self.config.margin)
            .max(self.storage.len().saturating_mul(2))
            .min(self.config.max_size)
            .max(new_len)
    }
}

impl Default for ByteBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ByteBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteBuffer")
            .field("length", &self.length)
            .field("capacity", &self.storage.len())
            .field("listeners", &self.listeners)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(rx: &mut mpsc::UnboundedReceiver<ChangeEvent>) -> Vec<ChangeEvent> {
        let mut out = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            out.push(ev);
        }
        out
    }

    #[test]
    fn test_load_emits_full_range_change() {
        let mut buffer = ByteBuffer::new();
        let (_, mut rx) = buffer.watch(ChangeKind::Change);
        buffer.load(b"hello").unwrap();

        assert_eq!(buffer.len(), 5);
        assert_eq!(
            events(&mut rx),
            vec![ChangeEvent::new(ChangeKind::Change, 0, 5, 5)]
        );
    }

    #[test]
    fn test_overwrite() {
        let mut buffer = ByteBuffer::from_bytes(b"abcdef").unwrap();
        let (_, mut typed) = buffer.watch(ChangeKind::Overwrite);
        let (_, mut change) = buffer.watch(ChangeKind::Change);

        buffer.overwrite(b"XY", 2).unwrap();
        assert_eq!(buffer.as_slice(), b"abXYef");
        assert_eq!(buffer.len(), 6);
        assert_eq!(
            events(&mut typed),
            vec![ChangeEvent::new(ChangeKind::Overwrite, 2, 4, 2)]
        );
        assert_eq!(
            events(&mut change),
            vec![ChangeEvent::new(ChangeKind::Change, 2, 4, 2)]
        );
    }

    #[test]
    fn test_overwrite_out_of_bounds_leaves_buffer_untouched() {
        let mut buffer = ByteBuffer::from_bytes(b"abc").unwrap();
        let (_, mut change) = buffer.watch(ChangeKind::Change);

        assert!(matches!(
            buffer.overwrite(b"XY", 2),
            Err(HexError::OutOfBounds { .. })
        ));
        assert!(buffer.overwrite(b"X", usize::MAX).is_err());
        assert_eq!(buffer.as_slice(), b"abc");
        assert!(events(&mut change).is_empty());
    }

    #[test]
    fn test_splice_replace_grow() {
        let mut buffer = ByteBuffer::from_bytes(&[0x41, 0x42, 0x43]).unwrap();
        buffer.splice(&[0x58, 0x59], 1, 2).unwrap();
        assert_eq!(buffer.as_slice(), &[0x41, 0x58, 0x59, 0x43]);
        assert_eq!(buffer.len(), 4);
    }

    #[test]
    fn test_splice_shrink_in_place() {
        let mut buffer = ByteBuffer::from_bytes(b"abcdefgh").unwrap();
        let capacity = buffer.capacity();
        buffer.splice(b"Z", 2, 6).unwrap();
        assert_eq!(buffer.as_slice(), b"abZgh");
        assert_eq!(buffer.capacity(), capacity);
    }

    #[test]
    fn test_pure_insertion_and_deletion() {
        let mut buffer = ByteBuffer::from_bytes(b"ace").unwrap();
        buffer.insert(b"b", 1).unwrap();
        buffer.insert(b"d", 3).unwrap();
        assert_eq!(buffer.as_slice(), b"abcde");

        buffer.delete(1, 3).unwrap();
        assert_eq!(buffer.as_slice(), b"ae");
        buffer.delete(0, 2).unwrap();
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_insert_at_end() {
        let mut buffer = ByteBuffer::from_bytes(b"ab").unwrap();
        buffer.insert(b"cd", 2).unwrap();
        assert_eq!(buffer.as_slice(), b"abcd");
    }

    #[test]
    fn test_growth_reserves_margin() {
        let mut buffer = ByteBuffer::from_bytes(b"ab").unwrap();
        buffer.insert(b"c", 2).unwrap();
        assert!(buffer.capacity() >= 3 + DEFAULT_MARGIN);

        let capacity = buffer.capacity();
        buffer.insert(b"d", 0).unwrap();
        assert_eq!(buffer.capacity(), capacity, "small insert reuses slack");
        assert_eq!(buffer.as_slice(), b"dabc");
    }

    const DEFAULT_MARGIN: usize = crate::config::DEFAULT_BUFFER_MARGIN;

    #[test]
    fn test_growth_respects_max_size() {
        let mut buffer = ByteBuffer::with_config(BufferConfig {
            margin: 4,
            max_size: 8,
        });
        buffer.load(b"abcd").unwrap();
        buffer.insert(b"efgh", 4).unwrap();
        assert_eq!(buffer.capacity(), 8);

        let err = buffer.insert(b"i", 8).unwrap_err();
        assert!(matches!(err, HexError::CapacityExceeded { requested: 9, max: 8 }));
        assert_eq!(buffer.as_slice(), b"abcdefgh");
    }

    #[test]
    fn test_splice_events() {
        let mut buffer = ByteBuffer::from_bytes(b"abcdef").unwrap();
        let (_, mut insert) = buffer.watch(ChangeKind::Insert);
        let (_, mut delete) = buffer.watch(ChangeKind::Delete);
        let (_, mut change) = buffer.watch(ChangeKind::Change);

        buffer.splice(b"XYZ", 1, 2).unwrap();
        buffer.delete(0, 2).unwrap();

        assert_eq!(
            events(&mut insert),
            vec![ChangeEvent::new(ChangeKind::Insert, 1, 2, 3)]
        );
        assert_eq!(
            events(&mut delete),
            vec![ChangeEvent::new(ChangeKind::Delete, 0, 2, 0)]
        );
        assert_eq!(events(&mut change).len(), 2);
    }

    #[test]
    fn test_zero_length_splice_still_notifies() {
        let mut buffer = ByteBuffer::from_bytes(b"abc").unwrap();
        let (_, mut change) = buffer.watch(ChangeKind::Change);

        buffer.splice(&[], 3, 3).unwrap();
        assert_eq!(buffer.as_slice(), b"abc");
        assert_eq!(
            events(&mut change),
            vec![ChangeEvent::new(ChangeKind::Change, 3, 3, 0)]
        );
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        let mut buffer = ByteBuffer::from_bytes(b"abc").unwrap();
        assert!(buffer.splice(b"x", 2, 1).is_err());
        assert!(buffer.read_range(2, 1).is_err());
        assert!(buffer.delete(2, 5).is_err());
        assert_eq!(buffer.as_slice(), b"abc");
    }

    #[test]
    fn test_copy_is_independent_of_later_edits() {
        let mut buffer = ByteBuffer::from_bytes(b"abcd").unwrap();
        let copy = buffer.copy_range(0, 4).unwrap();
        let snapshot = buffer.snapshot(1, 3).unwrap();

        buffer.overwrite(b"ZZ", 1).unwrap();
        buffer.insert(&[0; 4096], 0).unwrap();

        assert_eq!(copy, b"abcd");
        assert_eq!(&snapshot[..], b"bc");
    }

    #[test]
    fn test_byte_at() {
        let buffer = ByteBuffer::from_bytes(&[1, 2, 3]).unwrap();
        assert_eq!(buffer.byte_at(2).unwrap(), 3);
        assert!(buffer.byte_at(3).is_err());
        assert!(matches!(
            buffer.byte_at(usize::MAX),
            Err(HexError::OutOfBounds { start: usize::MAX, end: usize::MAX, len: 3 })
        ));
    }

    #[test]
    fn test_typed_ints() {
        let mut buffer = ByteBuffer::zeroed(8).unwrap();
        buffer
            .write_int(IntWidth::W16, Endianness::Little, 0, -2)
            .unwrap();
        assert_eq!(buffer.copy_range(0, 2).unwrap(), vec![0xfe, 0xff]);
        assert_eq!(
            buffer
                .read_int(IntWidth::W16, true, Endianness::Little, 0)
                .unwrap(),
            -2
        );
        assert_eq!(
            buffer
                .read_int(IntWidth::W16, false, Endianness::Little, 0)
                .unwrap(),
            0xfffe
        );

        buffer
            .write_int(IntWidth::W64, Endianness::Big, 0, u64::MAX as i128)
            .unwrap();
        assert_eq!(
            buffer
                .read_int(IntWidth::W64, false, Endianness::Big, 0)
                .unwrap(),
            u64::MAX as i128
        );
        assert!(buffer
            .read_int(IntWidth::W32, false, Endianness::Big, 6)
            .is_err());
    }

    #[test]
    fn test_floats() {
        let mut buffer = ByteBuffer::zeroed(12).unwrap();
        buffer.write_f32(Endianness::Big, 0, 1.5).unwrap();
        buffer.write_f64(Endianness::Little, 4, -0.25).unwrap();
        assert_eq!(buffer.read_f32(Endianness::Big, 0).unwrap(), 1.5);
        assert_eq!(buffer.read_f64(Endianness::Little, 4).unwrap(), -0.25);
        assert!(buffer.read_f64(Endianness::Little, 8).is_err());
    }

    #[test]
    fn test_text() {
        let mut buffer = ByteBuffer::zeroed(5).unwrap();
        buffer.write_text(1, "abc").unwrap();
        assert_eq!(buffer.read_text(1, 4).unwrap(), "abc");
        assert_eq!(buffer.byte_at(0).unwrap(), 0);
        assert!(buffer.write_text(3, "abc").is_err());
    }

    #[test]
    fn test_open_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        std::fs::write(&path, [9u8, 8, 7]).unwrap();

        let buffer = ByteBuffer::open(&path).unwrap();
        assert_eq!(buffer.get_buffer(), vec![9, 8, 7]);

        let missing = ByteBuffer::open(dir.path().join("missing.bin"));
        assert!(matches!(missing, Err(HexError::Io(_))));
    }
}
