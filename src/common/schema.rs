// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F. (https://github.com/tomtom215/duckdb-behavioral)

//! Attribute schemas governing expression compilation and event layout.
//!
//! A [`Schema`] is an ordered list of typed attributes. Expression atoms are
//! resolved against it once, at parse time, to a positional index and a
//! declared type; events store their values in the same positional order.
//! Name lookup is case-insensitive.

use serde::Deserialize;

use crate::common::event::Event;
use crate::common::value::{AttributeType, Value};
use crate::error::{Error, Result};

/// One named, typed attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name as declared.
    pub name: String,
    /// Declared type; predicates coerce to this type before comparing.
    pub ty: AttributeType,
}

/// Ordered attribute list for one event stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "SchemaDef")]
pub struct Schema {
    name: String,
    attributes: Vec<Attribute>,
}

impl Schema {
    /// Creates an empty schema.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    /// Appends an attribute.
    ///
    /// Names are not checked here. If a name repeats (case-insensitively),
    /// lookups resolve to the first declaration; [`Schema::from_pairs`] and
    /// deserialization reject repeats instead.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, ty: AttributeType) -> Self {
        self.attributes.push(Attribute {
            name: name.into(),
            ty,
        });
        self
    }

    /// Builds a schema from `(name, type-name)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownAttributeType`] for an unsupported type name and
    /// [`Error::DuplicateAttribute`] for a repeated attribute name.
    pub fn from_pairs(name: impl Into<String>, pairs: &[(&str, &str)]) -> Result<Self> {
        let mut schema = Self::new(name);
        for &(attr, ty) in pairs {
            schema = schema.with_unique_attribute(attr, ty.parse()?)?;
        }
        Ok(schema)
    }

    fn with_unique_attribute(self, name: impl Into<String>, ty: AttributeType) -> Result<Self> {
        let name = name.into();
        if self.resolve(&name).is_ok() {
            return Err(Error::DuplicateAttribute(name));
        }
        Ok(self.with_attribute(name, ty))
    }

    /// Schema (stream) name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared attributes in positional order.
    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Returns true if no attributes are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Resolves an attribute name (case-insensitive) to its position and type.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownAttribute`] when the name is not declared.
    pub fn resolve(&self, name: &str) -> Result<(usize, &Attribute)> {
        self.attributes
            .iter()
            .enumerate()
            .find(|(_, a)| a.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::UnknownAttribute(name.to_string()))
    }

    /// Builds an event from named values. Attributes not mentioned are
    /// [`Value::Null`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownAttribute`] for a name the schema does not declare.
    pub fn event(&self, timestamp_us: i64, values: &[(&str, Value)]) -> Result<Event> {
        let mut row = vec![Value::Null; self.attributes.len()];
        for (name, value) in values {
            let (idx, _) = self.resolve(name)?;
            row[idx] = value.clone();
        }
        Ok(Event::new(timestamp_us, row))
    }
}

#[derive(Deserialize)]
struct SchemaDef {
    #[serde(default)]
    name: String,
    attributes: Vec<AttributeDef>,
}

#[derive(Deserialize)]
struct AttributeDef {
    name: String,
    #[serde(rename = "type")]
    ty: String,
}

impl TryFrom<SchemaDef> for Schema {
    type Error = Error;

    fn try_from(def: SchemaDef) -> Result<Self> {
        let mut schema = Self::new(def.name);
        for attr in def.attributes {
            schema = schema.with_unique_attribute(attr.name, attr.ty.parse()?)?;
        }
        Ok(schema)
    }
}
