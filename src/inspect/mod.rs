// SPDX-License-Identifier: MIT
//! Read-only views over buffer contents: byte formatting, value
//! interpretation under a cursor and printable-string discovery.

pub mod converters;
pub mod scanner;
pub mod strings;
pub mod values;

pub use converters::{hex_dump, to_hex};
pub use scanner::{ScanResult, StringScanner};
pub use strings::find_strings;
pub use values::ValueSet;
