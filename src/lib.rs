// SPDX-License-Identifier: MIT
//! # hexview
//!
//! Core of a binary inspection and editing tool.
//!
//! ## Layers
//!
//! - **buffer**: a growable, in-place editable byte store with change
//!   notification, plus bounded windows that expose a sub-range of a shared
//!   buffer with translated offsets
//! - **schema**: the compact struct format language (`<2HIs` and friends)
//! - **codec**: binds a schema to a byte source for typed, named field access
//! - **inspect**: formatting helpers, per-offset value interpretation and a
//!   background printable-string scanner
//!
//! ## Format strings
//!
//! ```text
//! format := endian ( count? code )+
//! endian := '<' | '>'
//! code   := 'x' pad | 'c' char | 'b' 'B' int8 | '?' bool | 'h' 'H' int16
//!         | 'i' 'I' int32 | 'f' float32 | 'd' float64 | 's' string
//! ```
//!
//! A count before `s` is the string's byte length; before any other code it
//! is a repeat count and the field decodes to a list.
//!
//! ## Usage
//!
//! ```rust
//! use hexview::{ByteBuffer, StructCodec, Value};
//!
//! let buffer = ByteBuffer::from_bytes(&[0x34, 0x12, 0x00, 0x01, 0x02]).unwrap();
//! let codec = StructCodec::compile("<H3B", Some(vec!["id".into(), "rgb".into()])).unwrap();
//! let mut record = codec.attach(buffer).unwrap();
//!
//! assert_eq!(record.get_named("id").unwrap(), Value::Int(0x1234));
//! record.set_named("id", &Value::Int(7)).unwrap();
//! assert_eq!(record.source().read_range(0, 2).unwrap(), &[7, 0]);
//! ```

pub mod buffer;
pub mod codec;
pub mod config;
pub mod error;
pub mod inspect;
pub mod schema;

// Re-export main types
pub use buffer::{
    BufferWindow, ByteBuffer, ByteSource, ChangeEvent, ChangeKind, Endianness, IntWidth,
    SharedBuffer, SubscriptionId,
};
pub use codec::{
    FieldLayout, NamedFields, Record, StructCodec, StructTemplate, TemplateLibrary, Value,
};
pub use config::{BufferConfig, Config, ScanConfig};
pub use error::HexError;
pub use inspect::{find_strings, ScanResult, StringScanner, ValueSet};
pub use schema::{Schema, Token, TypeCode};
