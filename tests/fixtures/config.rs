// WARNING, this is an automatically generated file!
// Don't change anything in here.
// Required keys missing from the input document: from_document fails with DocumentError::Missing

use serde_json::{Map, Value};
use std::io::Write;

/// Object slots needed by a document holding every field.
pub const CAPACITY: usize = 4;

/// Longest text `to_text` produces.
pub const TEXT_CEILING: usize = 2000;

#[derive(Debug)]
pub enum DocumentError {
    Missing(&'static str),
    Type {
        key: &'static str,
        source: serde_json::Error,
    },
    Capacity {
        needed: usize,
        ceiling: usize,
    },
    Serialize(serde_json::Error),
}

impl std::fmt::Display for DocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(key) => write!(f, "required key '{key}' is missing"),
            Self::Type { key, source } => write!(f, "key '{key}' has the wrong type: {source}"),
            Self::Capacity { needed, ceiling } => {
                write!(f, "document needs {needed} bytes but the ceiling is {ceiling}")
            }
            Self::Serialize(source) => write!(f, "failed to serialize document: {source}"),
        }
    }
}

impl std::error::Error for DocumentError {}

fn read<T: serde::de::DeserializeOwned>(
    obj: &Map<String, Value>,
    key: &'static str,
) -> Result<Option<T>, DocumentError> {
    match obj.get(key) {
        None => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|source| DocumentError::Type { key, source }),
    }
}

#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub verMaj: i64,
    pub label: String,
    pub port: u16,
    pub on: bool,
}

impl Config {
    pub fn from_document(obj: &Map<String, Value>) -> Result<Self, DocumentError> {
        Ok(Self {
            verMaj: read(obj, "verMaj")?.unwrap_or_else(|| 1),
            label: read(obj, "label")?.ok_or(DocumentError::Missing("label"))?,
            port: read(obj, "port")?.unwrap_or_else(|| 80),
            on: read(obj, "on")?.unwrap_or_else(|| true),
        })
    }

    /// Inserts every field in schema order. Whether `doc` keeps that order
    /// depends on serde_json's `preserve_order` feature; `to_text` and
    /// `print_to` always write schema order.
    #[allow(unused_variables)]
    pub fn populate(&self, doc: &mut Map<String, Value>) {
        doc.insert("verMaj".to_owned(), Value::from(self.verMaj.clone()));
        doc.insert("label".to_owned(), Value::from(self.label.clone()));
        doc.insert("port".to_owned(), Value::from(self.port.clone()));
        doc.insert("on".to_owned(), Value::from(self.on.clone()));
    }

    pub fn to_text(&self) -> Result<String, DocumentError> {
        let text = serde_json::to_string(self).map_err(DocumentError::Serialize)?;
        if text.len() > TEXT_CEILING {
            return Err(DocumentError::Capacity {
                needed: text.len(),
                ceiling: TEXT_CEILING,
            });
        }
        Ok(text)
    }

    pub fn print_to<W: Write>(&self, sink: W) -> Result<(), DocumentError> {
        serde_json::to_writer(sink, self).map_err(DocumentError::Serialize)
    }
}

// Written by hand so keys keep schema order whatever map type serde_json uses.
impl serde::Serialize for Config {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        #[allow(unused_mut)]
        let mut map = serializer.serialize_map(Some(CAPACITY))?;
        map.serialize_entry("verMaj", &self.verMaj)?;
        map.serialize_entry("label", &self.label)?;
        map.serialize_entry("port", &self.port)?;
        map.serialize_entry("on", &self.on)?;
        map.end()
    }
}
