//! Schema-driven generator of JSON marshal/unmarshal code for embedded
//! configuration objects.
//!
//! A [`Schema`] lists the fields of one configuration entity; a
//! [`Generator`] turns it into source code for a [`Backend`] (C++ against
//! ArduinoJson, or Rust against `serde_json`). [`Codec`] applies the same
//! contract in-process.

pub mod artifact;
pub mod backend;
pub mod codec;
pub mod config;
pub mod error;
pub mod generator;
pub mod literal;
pub mod schema;

pub use artifact::{Artifact, GeneratedFile};
pub use backend::{ArduinoJsonBackend, Backend, BackendKind, SerdeJsonBackend};
pub use codec::{Codec, Entity, MissingKeyPolicy};
pub use config::GeneratorConfig;
pub use error::{ConfigError, DocumentError, EmissionError, GenerateError, SchemaError};
pub use generator::{Generator, GeneratorOptions, DEFAULT_TEXT_CEILING};
pub use schema::{FieldSpec, Schema, SchemaSource, TomlSchemaFile, ValueKind};
