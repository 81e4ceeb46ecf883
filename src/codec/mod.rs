// SPDX-License-Identifier: MIT
//! Struct codec: typed field access over a byte source.

pub mod struct_codec;
pub mod template;
pub mod value;

pub use struct_codec::{FieldLayout, NamedFields, Record, StructCodec};
pub use template::{StructTemplate, TemplateLibrary};
pub use value::Value;
