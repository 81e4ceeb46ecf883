// SPDX-License-Identifier: MIT
//! Named struct templates
//!
//! A template is the user-authored `{format, field_names}` pair. The
//! library keeps templates by name and (de)serializes them as JSON; where
//! that JSON is stored is up to the host application.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::struct_codec::StructCodec;
use crate::error::HexError;
use crate::schema::Schema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructTemplate {
    pub format: String,
    #[serde(rename = "fields", default)]
    pub field_names: Vec<String>,
}

impl StructTemplate {
    pub fn new(format: impl Into<String>, field_names: Vec<String>) -> Self {
        Self {
            format: format.into(),
            field_names,
        }
    }

    /// Field names padded with `prop{i}` up to the schema's token count
    pub fn resolved_names(&self, schema: &Schema) -> Vec<String> {
        let count = schema.tokens().len();
        let mut names: Vec<String> = self.field_names.iter().take(count).cloned().collect();
        for i in names.len()..count {
            names.push(format!("prop{}", i));
        }
        names
    }

    /// Compile into a codec with a name for every field
    pub fn codec(&self) -> Result<StructCodec, HexError> {
        let schema = Schema::parse(&self.format)?;
        let names = self.resolved_names(&schema);
        StructCodec::bind(schema, Some(names))
    }

    /// Check the template without keeping the codec.
    ///
    /// Unlike [`StructTemplate::codec`], explicit names must match the token
    /// count exactly.
    pub fn validate(&self) -> Result<(), HexError> {
        let schema = Schema::parse(&self.format)?;
        let names = if self.field_names.is_empty() {
            None
        } else {
            Some(self.field_names.clone())
        };
        StructCodec::bind(schema, names).map(|_| ())
    }
}

/// Templates keyed by user-visible name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateLibrary {
    templates: BTreeMap<String, StructTemplate>,
}

impl TemplateLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and store a template, replacing any previous one of that name
    pub fn insert(&mut self, name: impl Into<String>, template: StructTemplate) -> Result<(), HexError> {
        template.validate()?;
        self.templates.insert(name.into(), template);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Option<StructTemplate> {
        self.templates.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&StructTemplate> {
        self.templates.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Value;

    #[test]
    fn test_missing_names_get_defaults() {
        let template = StructTemplate::new(">HHB", vec!["width".into()]);
        let codec = template.codec().unwrap();
        assert_eq!(
            codec.field_names().unwrap(),
            &["width".to_string(), "prop1".to_string(), "prop2".to_string()]
        );

        let record = codec.attach(vec![0, 1, 0, 2, 3]).unwrap();
        assert_eq!(record.get_named("prop2").unwrap(), Value::Int(3));
    }

    #[test]
    fn test_validate() {
        assert!(StructTemplate::new("<B", vec![]).validate().is_ok());
        assert!(StructTemplate::new("<B", vec!["a".into(), "b".into()])
            .validate()
            .is_err());
        assert!(StructTemplate::new("B", vec![]).validate().is_err());
    }

    #[test]
    fn test_library_rejects_invalid_templates() {
        let mut library = TemplateLibrary::new();
        assert!(library
            .insert("broken", StructTemplate::new("<q", vec![]))
            .is_err());
        assert!(library.is_empty());

        library
            .insert("header", StructTemplate::new("<4sI", vec!["magic".into(), "size".into()]))
            .unwrap();
        assert_eq!(library.names().collect::<Vec<_>>(), vec!["header"]);
        assert!(library.remove("header").is_some());
        assert!(library.get("header").is_none());
    }

    #[test]
    fn test_library_json() {
        let mut library = TemplateLibrary::new();
        library
            .insert("pair", StructTemplate::new(">2H", vec!["xy".into()]))
            .unwrap();

        let json = library.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["pair"]["format"], ">2H");
        assert_eq!(value["pair"]["fields"][0], "xy");

        let restored = TemplateLibrary::from_json(&json).unwrap();
        assert_eq!(restored, library);
    }
}
