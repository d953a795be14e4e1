//! In-process marshal/unmarshal over `serde_json`, following the same contract
//! the generated code implements. Used by host tooling to read and write
//! firmware config documents without compiling the emitted sources.

use crate::error::{DocumentError, SchemaError};
use crate::literal;
use crate::schema::{Schema, ValueKind};
use serde_json::{Map, Value};
use std::io::Write;
use tracing::debug;

/// What `construct` does with a required key missing from the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingKeyPolicy {
    /// Substitute the zero value of the field's kind, as ArduinoJson does.
    #[default]
    ZeroValue,
    /// Fail with `DocumentError::Missing`.
    Fail,
}

#[derive(Debug, Clone)]
struct BoundField {
    name: String,
    kind: ValueKind,
    default: Option<Value>,
}

/// A schema bound to concrete default values.
#[derive(Debug, Clone)]
pub struct Codec {
    fields: Vec<BoundField>,
    policy: MissingKeyPolicy,
}

/// Field values of one constructed entity, in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    values: Vec<(String, Value)>,
}

impl Codec {
    pub fn new(schema: &Schema, policy: MissingKeyPolicy) -> Result<Self, SchemaError> {
        schema.validate()?;
        let mut fields = Vec::with_capacity(schema.fields.len());
        for field in &schema.fields {
            let kind = field.kind().ok_or_else(|| SchemaError::UnknownType {
                field: field.name.clone(),
                type_name: field.type_name.clone(),
                backend: "codec",
            })?;
            let default = match &field.default {
                None => None,
                Some(expr) => Some(literal::evaluate(kind, expr).ok_or_else(|| {
                    SchemaError::UnevaluableDefault {
                        field: field.name.clone(),
                        expr: expr.clone(),
                    }
                })?),
            };
            fields.push(BoundField {
                name: field.name.clone(),
                kind,
                default,
            });
        }
        Ok(Self { fields, policy })
    }

    pub fn capacity(&self) -> usize {
        self.fields.len()
    }

    /// Reads every field from `obj`. Keys outside the schema are ignored.
    pub fn construct(&self, obj: &Map<String, Value>) -> Result<Entity, DocumentError> {
        let mut values = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let value = match (obj.get(&field.name), &field.default) {
                (Some(v), _) => check_kind(&field.name, field.kind, v)?,
                (None, Some(default)) => default.clone(),
                (None, None) => match self.policy {
                    MissingKeyPolicy::ZeroValue => {
                        debug!("Required key {} missing, using zero value", field.name);
                        zero_value(field.kind)
                    }
                    MissingKeyPolicy::Fail => return Err(DocumentError::Missing(field.name.clone())),
                },
            };
            values.push((field.name.clone(), value));
        }
        Ok(Entity { values })
    }
}

impl Entity {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Writes every field into `doc`, in schema order.
    pub fn populate(&self, doc: &mut Map<String, Value>) {
        for (key, value) in &self.values {
            doc.insert(key.clone(), value.clone());
        }
    }

    fn document(&self) -> Value {
        let mut doc = Map::with_capacity(self.values.len());
        self.populate(&mut doc);
        Value::Object(doc)
    }

    /// Serializes into at most `ceiling` bytes, failing instead of truncating.
    pub fn to_text(&self, ceiling: usize) -> Result<String, DocumentError> {
        let text = serde_json::to_string(&self.document())?;
        if text.len() > ceiling {
            return Err(DocumentError::Capacity {
                needed: text.len(),
                ceiling,
            });
        }
        Ok(text)
    }

    /// Streams the document to `sink` with no size ceiling.
    pub fn print_to<W: Write>(&self, sink: W) -> Result<(), DocumentError> {
        serde_json::to_writer(sink, &self.document())?;
        Ok(())
    }
}

fn json_class(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(n) if n.is_f64() => "a float",
        Value::Number(n) if n.is_i64() && n.as_i64().is_some_and(|i| i < 0) => "a negative integer",
        Value::Number(_) => "an integer",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn check_kind(key: &str, kind: ValueKind, v: &Value) -> Result<Value, DocumentError> {
    let ok = match kind {
        ValueKind::Bool => v.is_boolean(),
        ValueKind::Signed => v.is_i64(),
        ValueKind::Unsigned => v.is_u64(),
        ValueKind::Float => v.is_number(),
        ValueKind::Text => v.is_string(),
    };
    if ok {
        Ok(v.clone())
    } else {
        Err(DocumentError::Type {
            key: key.to_string(),
            expected: kind.describe(),
            found: json_class(v),
        })
    }
}

fn zero_value(kind: ValueKind) -> Value {
    match kind {
        ValueKind::Bool => Value::Bool(false),
        ValueKind::Signed | ValueKind::Unsigned => Value::from(0),
        ValueKind::Float => Value::from(0.0),
        ValueKind::Text => Value::String(String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldSpec;
    use serde_json::json;

    fn doc(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            _ => unreachable!("test documents are objects"),
        }
    }

    #[test]
    fn zero_value_policy_mirrors_arduinojson() {
        let schema = Schema::new(
            "Config",
            vec![
                FieldSpec::required("n", "int"),
                FieldSpec::required("s", "std::string"),
                FieldSpec::required("b", "bool"),
            ],
        );
        let codec = Codec::new(&schema, MissingKeyPolicy::ZeroValue).unwrap();
        let entity = codec.construct(&Map::new()).unwrap();
        assert_eq!(entity.get("n"), Some(&json!(0)));
        assert_eq!(entity.get("s"), Some(&json!("")));
        assert_eq!(entity.get("b"), Some(&json!(false)));
    }

    #[test]
    fn fail_policy_reports_key() {
        let schema = Schema::new("Config", vec![FieldSpec::required("label", "std::string")]);
        let codec = Codec::new(&schema, MissingKeyPolicy::Fail).unwrap();
        let err = codec.construct(&Map::new()).unwrap_err();
        assert!(matches!(err, DocumentError::Missing(ref k) if k == "label"));
    }

    #[test]
    fn wrong_type_is_rejected() {
        let schema = Schema::new("Config", vec![FieldSpec::required("port", "uint16_t")]);
        let codec = Codec::new(&schema, MissingKeyPolicy::Fail).unwrap();
        let err = codec.construct(&doc(json!({"port": -1}))).unwrap_err();
        assert!(matches!(
            err,
            DocumentError::Type { expected: "an unsigned integer", found: "a negative integer", .. }
        ));
    }

    #[test]
    fn macro_default_cannot_be_bound() {
        let schema = Schema::new(
            "Config",
            vec![FieldSpec::defaulted("ERR_LED", "const int", "BUILTIN_LED")],
        );
        let err = Codec::new(&schema, MissingKeyPolicy::ZeroValue).unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnevaluableDefault {
                field: "ERR_LED".into(),
                expr: "BUILTIN_LED".into()
            }
        );
    }

    #[test]
    fn print_to_has_no_ceiling() {
        let schema = Schema::new("Config", vec![FieldSpec::required("blob", "std::string")]);
        let codec = Codec::new(&schema, MissingKeyPolicy::Fail).unwrap();
        let long = "x".repeat(5000);
        let entity = codec.construct(&doc(json!({ "blob": long }))).unwrap();

        assert!(matches!(
            entity.to_text(2000),
            Err(DocumentError::Capacity { needed: 5011, ceiling: 2000 })
        ));
        let mut sink = Vec::new();
        entity.print_to(&mut sink).unwrap();
        assert_eq!(sink.len(), 5011);
    }
}
