// SPDX-License-Identifier: MIT
//! Struct schemas: format-string grammar and the compiled layout.

pub mod format;
pub mod parser;

pub use format::TypeCode;
pub use parser::{parse, Schema, Token};
