// SPDX-License-Identifier: MIT
//! Format-string compiler
//!
//! ```text
//! format  := endian token+
//! endian  := '<' | '>'
//! token   := [0-9]* code
//! ```

use std::str::FromStr;

use serde::Serialize;

use super::format::TypeCode;
use crate::buffer::Endianness;
use crate::error::HexError;

/// One typed field of a schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token {
    pub type_code: TypeCode,
    pub element_size: usize,
    pub repeat_count: usize,
    pub byte_offset: usize,
}

impl Token {
    /// Total bytes covered by the token
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.element_size * self.repeat_count
    }

    /// Offset one past the token's last byte
    #[inline]
    pub fn end_offset(&self) -> usize {
        self.byte_offset + self.byte_len()
    }
}

/// Parsed, offset-annotated record layout
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    format: String,
    endianness: Endianness,
    tokens: Vec<Token>,
    total_size: usize,
}

impl Schema {
    pub fn parse(format: &str) -> Result<Self, HexError> {
        parse(format)
    }

    /// The source format string
    pub fn format(&self) -> &str {
        &self.format
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token(&self, index: usize) -> Result<&Token, HexError> {
        self.tokens.get(index).ok_or(HexError::NoSuchToken {
            index,
            count: self.tokens.len(),
        })
    }

    /// Bytes a source must hold for the record to be read
    pub fn total_size(&self) -> usize {
        self.total_size
    }
}

impl FromStr for Schema {
    type Err = HexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

impl std::fmt::Display for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format)
    }
}

/// Compile `format` into a [`Schema`]
pub fn parse(format: &str) -> Result<Schema, HexError> {
    let mut chars = format.chars().peekable();

    let endianness = match chars.next() {
        Some(c) => Endianness::from_marker(c).ok_or_else(|| {
            HexError::InvalidFormat(format!(
                "invalid endianness {:?} in format {:?}, expected '<' or '>'",
                c, format
            ))
        })?,
        None => {
            return Err(HexError::InvalidFormat(
                "empty format, expected '<' or '>'".to_string(),
            ))
        }
    };

    let mut tokens = Vec::new();
    let mut offset = 0usize;

    while chars.peek().is_some() {
        let mut count: Option<usize> = None;
        while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
            chars.next();
            let next = count
                .unwrap_or(0)
                .checked_mul(10)
                .and_then(|n| n.checked_add(digit as usize))
                .ok_or_else(|| {
                    HexError::InvalidFormat(format!("repeat count overflow in format {:?}", format))
                })?;
            count = Some(next);
        }

        let c = chars.next().ok_or_else(|| {
            HexError::InvalidFormat(format!(
                "repeat count without type character at end of format {:?}",
                format
            ))
        })?;
        let type_code = TypeCode::from_char(c).ok_or_else(|| {
            HexError::InvalidFormat(format!(
                "invalid type character {:?} in format {:?}",
                c, format
            ))
        })?;

        let token = Token {
            type_code,
            element_size: type_code.size(),
            repeat_count: count.unwrap_or(1),
            byte_offset: offset,
        };
        offset = token
            .element_size
            .checked_mul(token.repeat_count)
            .and_then(|len| len.checked_add(offset))
            .ok_or_else(|| HexError::InvalidFormat(format!("format {:?} is too large", format)))?;
        tokens.push(token);
    }

    if tokens.is_empty() {
        return Err(HexError::InvalidFormat(format!(
            "format {:?} needs at least one type character",
            format
        )));
    }

    Ok(Schema {
        format: format.to_string(),
        endianness,
        tokens,
        total_size: offset,
    })
}
