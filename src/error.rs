//! Error types for the generator pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Malformed or inconsistent schema. Detected before any emission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("entity name is empty")]
    EmptyEntity,

    #[error("entity name '{0}' is not a valid identifier")]
    InvalidEntity(String),

    #[error("field #{0} has an empty name")]
    EmptyField(usize),

    #[error("field name '{0}' is not a valid identifier")]
    InvalidField(String),

    #[error("field '{0}' is declared more than once")]
    DuplicateField(String),

    #[error("'{name}' is a reserved word for the {backend} backend")]
    ReservedWord { name: String, backend: &'static str },

    #[error("field '{field}' has type '{type_name}' which the {backend} backend does not support")]
    UnknownType {
        field: String,
        type_name: String,
        backend: &'static str,
    },

    #[error("default '{expr}' of field '{field}' is not a literal")]
    UnevaluableDefault { field: String, expr: String },

    #[error("failed to parse schema: {0}")]
    Parse(String),
}

/// Template assembly failed for a schema that already passed validation.
#[derive(Debug, Error)]
pub enum EmissionError {
    #[error("failed to load templates: {0}")]
    Templates(#[source] tera::Error),

    #[error("failed to render template {template}: {source}")]
    Render {
        template: String,
        #[source]
        source: tera::Error,
    },
}

/// Errors surfaced by `Generator::generate`.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Emission(#[from] EmissionError),
}

/// Marshal-time failures of an entity against a JSON document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("required key '{0}' is missing from the document")]
    Missing(String),

    #[error("key '{key}' holds {found}, expected {expected}")]
    Type {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("serialized document needs {needed} code units but the buffer holds {ceiling}")]
    Capacity { needed: usize, ceiling: usize },

    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Problems loading schema or generator configuration files, or writing output.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown backend '{0}'; expected 'arduinojson' or 'serde_json'")]
    UnknownBackend(String),
}
