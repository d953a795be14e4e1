//! Configuration schema: an ordered list of typed, optionally defaulted fields.

use crate::error::{ConfigError, SchemaError};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

lazy_static! {
    static ref IDENTIFIER_RE: Regex =
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid IDENTIFIER_RE");
}

/// Returns true when `s` is a C-family identifier.
pub fn is_identifier(s: &str) -> bool {
    IDENTIFIER_RE.is_match(s)
}

/// One configuration field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Used verbatim as the generated member name and as the JSON key.
    pub name: String,

    #[serde(rename = "type")]
    pub type_name: String,

    /// Literal expression substituted when the key is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl FieldSpec {
    pub fn required(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            default: None,
        }
    }

    pub fn defaulted(
        name: impl Into<String>,
        type_name: impl Into<String>,
        default: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            default: Some(default.into()),
        }
    }

    pub fn kind(&self) -> Option<ValueKind> {
        ValueKind::from_type_name(&self.type_name)
    }
}

/// All fields of one named configuration entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub entity: String,

    /// Enclosing namespace of the entity, e.g. `SHI`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Header declaring the entity, included by generated C++ sources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,

    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn new(entity: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self {
            entity: entity.into(),
            namespace: None,
            header: None,
            fields,
        }
    }

    /// Capacity hint of the bounded document: one object slot per field.
    pub fn capacity(&self) -> usize {
        self.fields.len()
    }

    /// Backend independent checks: names present, well formed and unique.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.entity.is_empty() {
            return Err(SchemaError::EmptyEntity);
        }
        if !is_identifier(&self.entity) {
            return Err(SchemaError::InvalidEntity(self.entity.clone()));
        }
        if let Some(ns) = &self.namespace {
            if !ns.split("::").all(is_identifier) {
                return Err(SchemaError::InvalidEntity(format!("{}::{}", ns, self.entity)));
            }
        }

        let mut seen = HashSet::with_capacity(self.fields.len());
        for (idx, field) in self.fields.iter().enumerate() {
            if field.name.is_empty() {
                return Err(SchemaError::EmptyField(idx));
            }
            if !is_identifier(&field.name) {
                return Err(SchemaError::InvalidField(field.name.clone()));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
        }
        Ok(())
    }

    pub fn from_toml_str(text: &str) -> Result<Self, SchemaError> {
        toml::from_str(text).map_err(|e| SchemaError::Parse(e.to_string()))
    }

    /// Reads a hand-written TOML schema from disk.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let schema: Schema = toml::from_str(&text).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(
            "Loaded schema for {} with {} fields from {}",
            schema.entity,
            schema.fields.len(),
            path.display()
        );
        Ok(schema)
    }
}

/// Pluggable origin of a schema (hand-written file, IDL, reflection, ...).
pub trait SchemaSource {
    fn extract(&self) -> Result<Schema, ConfigError>;
}

/// Schema stored as a TOML document on disk.
pub struct TomlSchemaFile<'a> {
    pub path: &'a Path,
}

impl SchemaSource for TomlSchemaFile<'_> {
    fn extract(&self) -> Result<Schema, ConfigError> {
        Schema::load(self.path)
    }
}

/// Semantic class of a declared field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Bool,
    Signed,
    Unsigned,
    Float,
    Text,
}

impl ValueKind {
    pub fn from_type_name(type_name: &str) -> Option<Self> {
        let t = type_name.trim();
        let t = t.strip_prefix("const ").unwrap_or(t).trim();
        let t = t.strip_prefix("std::").unwrap_or(t);
        let kind = match t {
            "bool" => Self::Bool,
            "int" | "long" | "short" | "long long" | "signed" | "signed int" | "long int"
            | "short int" | "long long int" | "signed long" | "signed short" | "signed char"
            | "int8_t" | "int16_t" | "int32_t" | "int64_t" | "int_fast8_t" | "int_fast16_t"
            | "int_fast32_t" | "int_fast64_t" | "int_least8_t" | "int_least16_t"
            | "int_least32_t" | "int_least64_t" | "intmax_t" | "ssize_t" | "i8" | "i16"
            | "i32" | "i64" | "isize" => Self::Signed,
            "unsigned" | "unsigned int" | "unsigned long" | "unsigned long int"
            | "unsigned long long" | "unsigned long long int" | "unsigned short"
            | "unsigned short int" | "unsigned char" | "size_t" | "uint8_t" | "uint16_t"
            | "uint32_t" | "uint64_t" | "uint_fast8_t" | "uint_fast16_t" | "uint_fast32_t"
            | "uint_fast64_t" | "uint_least8_t" | "uint_least16_t" | "uint_least32_t"
            | "uint_least64_t" | "uintmax_t" | "byte" | "u8" | "u16" | "u32" | "u64"
            | "usize" => Self::Unsigned,
            "float" | "double" | "long double" | "f32" | "f64" => Self::Float,
            "string" | "String" | "char*" | "char *" => Self::Text,
            _ => return None,
        };
        Some(kind)
    }

    /// Name of the JSON value class, used in diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            Self::Bool => "a boolean",
            Self::Signed => "a signed integer",
            Self::Unsigned => "an unsigned integer",
            Self::Float => "a number",
            Self::Text => "a string",
        }
    }
}
