// SPDX-License-Identifier: MIT
//! Schema-driven record reader/writer
//!
//! A [`StructCodec`] binds a [`Schema`] and optional field names; attaching
//! it to a [`ByteSource`] yields a [`Record`] with positional and named
//! field access. Writes go through `ByteSource::overwrite`, so edits made
//! through a record notify the buffer's listeners like any other overwrite.

use std::collections::BTreeMap;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use super::value::Value;
use crate::buffer::{decode_int, decode_text, encode_int, encode_text, ByteBuffer, ByteSource, Endianness};
use crate::error::HexError;
use crate::schema::{Schema, Token, TypeCode};

/// Position and extent of one field, for tables and highlights
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldLayout {
    pub name: Option<String>,
    pub type_code: TypeCode,
    pub offset: usize,
    pub count: usize,
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructCodec {
    schema: Schema,
    field_names: Option<Vec<String>>,
}

impl StructCodec {
    /// Bind a schema to an optional list of field names, one per token
    pub fn bind(schema: Schema, field_names: Option<Vec<String>>) -> Result<Self, HexError> {
        if let Some(names) = &field_names {
            if names.len() != schema.tokens().len() {
                return Err(HexError::SchemaMismatch(format!(
                    "{} field names given for {} tokens in format {:?}",
                    names.len(),
                    schema.tokens().len(),
                    schema.format()
                )));
            }
        }
        Ok(Self {
            schema,
            field_names,
        })
    }

    /// Parse `format` and bind it in one step
    pub fn compile(format: &str, field_names: Option<Vec<String>>) -> Result<Self, HexError> {
        Self::bind(Schema::parse(format)?, field_names)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn field_names(&self) -> Option<&[String]> {
        self.field_names.as_deref()
    }

    /// Resolve a field name to its token index
    pub fn index_of(&self, name: &str) -> Result<usize, HexError> {
        let names = self.names()?;
        names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| HexError::UnknownField(name.to_string()))
    }

    /// Attach to a byte source holding at least `schema.total_size()` bytes
    pub fn attach<S: ByteSource>(&self, source: S) -> Result<Record<'_, S>, HexError> {
        let required = self.schema.total_size();
        if source.len() < required {
            return Err(HexError::BufferTooShort {
                required,
                actual: source.len(),
            });
        }
        Ok(Record {
            codec: self,
            source,
        })
    }

    /// Build a fresh zero-filled record and set every entry of `map` on it
    pub fn from_named_map(&self, map: &BTreeMap<String, Value>) -> Result<Record<'_, ByteBuffer>, HexError> {
        let buffer = ByteBuffer::zeroed(self.schema.total_size())?;
        let mut record = self.attach(buffer)?;
        for (name, value) in map {
            record.set_named(name, value)?;
        }
        Ok(record)
    }

    pub fn layout(&self) -> Vec<FieldLayout> {
        self.schema
            .tokens()
            .iter()
            .enumerate()
            .map(|(i, token)| FieldLayout {
                name: self.field_names.as_ref().map(|names| names[i].clone()),
                type_code: token.type_code,
                offset: token.byte_offset,
                count: token.repeat_count,
                size: token.byte_len(),
            })
            .collect()
    }

    fn names(&self) -> Result<&[String], HexError> {
        self.field_names.as_deref().ok_or_else(|| {
            HexError::SchemaMismatch(format!(
                "no field names bound to format {:?}",
                self.schema.format()
            ))
        })
    }

    fn decode(&self, token: &Token, bytes: &[u8]) -> Value {
        let endian = self.schema.endianness();
        if token.type_code == TypeCode::String {
            return Value::Text(decode_text(bytes));
        }

        let mut values: Vec<Value> = bytes
            .chunks_exact(token.element_size)
            .map(|element| decode_element(token.type_code, endian, element))
            .collect();

        if token.repeat_count == 1 {
            values.pop().unwrap_or(Value::Null)
        } else {
            Value::List(values)
        }
    }

    fn encode(&self, index: usize, token: &Token, value: &Value) -> Result<Vec<u8>, HexError> {
        let endian = self.schema.endianness();
        let mismatch = |expected: String| HexError::ValueMismatch { index, expected };

        if token.type_code == TypeCode::Pad {
            return Ok(vec![0; token.byte_len()]);
        }

        if token.type_code == TypeCode::String {
            // Exact width only, so a written string always reads back unchanged
            return value
                .as_str()
                .filter(|text| text.chars().count() == token.repeat_count)
                .map(encode_text)
                .ok_or_else(|| mismatch(format!("string of exactly {} chars", token.repeat_count)));
        }

        if token.repeat_count == 1 {
            return encode_element(token.type_code, endian, value)
                .ok_or_else(|| mismatch(token.type_code.name().to_string()));
        }

        let items = value
            .as_list()
            .filter(|items| items.len() == token.repeat_count)
            .ok_or_else(|| {
                mismatch(format!(
                    "list of {} {} values",
                    token.repeat_count,
                    token.type_code.name()
                ))
            })?;

        let mut bytes = Vec::with_capacity(token.byte_len());
        for item in items {
            let element = encode_element(token.type_code, endian, item)
                .ok_or_else(|| mismatch(token.type_code.name().to_string()))?;
            bytes.extend_from_slice(&element);
        }
        Ok(bytes)
    }
}

fn decode_element(code: TypeCode, endian: Endianness, bytes: &[u8]) -> Value {
    if let Some((width, signed)) = code.int_layout() {
        // At most 32 bits, always fits in i64
        let v = decode_int(bytes, width, signed, endian).unwrap_or(0);
        return Value::Int(v as i64);
    }

    match code {
        TypeCode::Char | TypeCode::String => Value::Text(decode_text(bytes)),
        TypeCode::Bool => Value::Bool(bytes[0] != 0),
        TypeCode::Float32 => {
            let mut raw = [0u8; 4];
            raw.copy_from_slice(bytes);
            let v = match endian {
                Endianness::Little => f32::from_le_bytes(raw),
                Endianness::Big => f32::from_be_bytes(raw),
            };
            Value::Float(f64::from(v))
        }
        TypeCode::Float64 => {
            let mut raw = [0u8; 8];
            raw.copy_from_slice(bytes);
            Value::Float(match endian {
                Endianness::Little => f64::from_le_bytes(raw),
                Endianness::Big => f64::from_be_bytes(raw),
            })
        }
        _ => Value::Null,
    }
}

fn encode_element(code: TypeCode, endian: Endianness, value: &Value) -> Option<Vec<u8>> {
    let bytes = match code {
        TypeCode::Pad => vec![0],
        TypeCode::Char | TypeCode::String => {
            let c = value.as_str()?.chars().next()?;
            vec![(u32::from(c) & 0xff) as u8]
        }
        TypeCode::Bool => vec![u8::from(value.as_bool()?)],
        TypeCode::Float32 => {
            let v = value.as_f64()? as f32;
            match endian {
                Endianness::Little => v.to_le_bytes().to_vec(),
                Endianness::Big => v.to_be_bytes().to_vec(),
            }
        }
        TypeCode::Float64 => {
            let v = value.as_f64()?;
            match endian {
                Endianness::Little => v.to_le_bytes().to_vec(),
                Endianness::Big => v.to_be_bytes().to_vec(),
            }
        }
        _ => {
            let (width, _) = code.int_layout()?;
            encode_int(i128::from(value.as_i64()?), width, endian)
        }
    };
    Some(bytes)
}

/// A codec attached to a concrete byte source
#[derive(Debug)]
pub struct Record<'c, S> {
    codec: &'c StructCodec,
    source: S,
}

impl<'c, S: ByteSource> Record<'c, S> {
    pub fn codec(&self) -> &'c StructCodec {
        self.codec
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Decode the token at `index`
    pub fn read_at(&self, index: usize) -> Result<Value, HexError> {
        let token = self.codec.schema.token(index)?;
        let bytes = self
            .source
            .copy_range(token.byte_offset, token.end_offset())?;
        Ok(self.codec.decode(token, &bytes))
    }

    /// Encode `value` into the token at `index`.
    ///
    /// The value is fully encoded before any byte is written.
    pub fn write_at(&mut self, index: usize, value: &Value) -> Result<(), HexError> {
        let token = self.codec.schema.token(index)?;
        let bytes = self.codec.encode(index, token, value)?;
        self.source.overwrite(&bytes, token.byte_offset)
    }

    pub fn get_named(&self, name: &str) -> Result<Value, HexError> {
        self.read_at(self.codec.index_of(name)?)
    }

    pub fn set_named(&mut self, name: &str, value: &Value) -> Result<(), HexError> {
        let index = self.codec.index_of(name)?;
        self.write_at(index, value)
    }

    /// Decode every token in order
    pub fn to_positional(&self) -> Result<Vec<Value>, HexError> {
        (0..self.codec.schema.tokens().len())
            .map(|i| self.read_at(i))
            .collect()
    }

    /// Field name to value, in field order
    pub fn to_named_pairs(&self) -> Result<Vec<(String, Value)>, HexError> {
        let names = self.codec.names()?;
        names
            .iter()
            .enumerate()
            .map(|(i, name)| Ok((name.clone(), self.read_at(i)?)))
            .collect()
    }

    pub fn to_named_map(&self) -> Result<BTreeMap<String, Value>, HexError> {
        Ok(self.to_named_pairs()?.into_iter().collect())
    }

    /// Decoded fields that serialize as a map in field order
    pub fn to_named_fields(&self) -> Result<NamedFields, HexError> {
        self.to_named_pairs().map(NamedFields)
    }
}

/// Named field values kept in field order.
///
/// Serializes as a map whose keys follow the format string, unlike
/// [`Record::to_named_map`] which sorts by name.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedFields(pub Vec<(String, Value)>);

impl Serialize for NamedFields {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
