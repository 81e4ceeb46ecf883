// SPDX-License-Identifier: MIT
//! Byte storage engine: the growable buffer, bounded windows over it,
//! change notification and fixed-width integer coding.

pub mod byte_buffer;
pub mod events;
pub mod int;
pub mod source;
pub mod window;

pub use byte_buffer::ByteBuffer;
pub use events::{ChangeEvent, ChangeKind, Listeners, SubscriptionId};
pub use int::{decode_int, encode_int, Endianness, IntWidth};
pub use source::ByteSource;
pub use window::{shared, BufferWindow, SharedBuffer};

/// Map each byte to the character with the same code point.
pub fn decode_text(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Map each character to one byte, keeping the low 8 bits of its code point.
pub fn encode_text(text: &str) -> Vec<u8> {
    text.chars().map(|c| (u32::from(c) & 0xff) as u8).collect()
}
