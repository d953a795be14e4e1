//! Emission backends: target language specifics behind one trait.

use crate::error::ConfigError;
use crate::literal;
use crate::schema::{FieldSpec, ValueKind};
use serde_json::Value;
use std::str::FromStr;

/// Built-in templates, keyed by the name backends render them under.
pub const BUILTIN_TEMPLATES: [(&str, &str); 3] = [
    (
        "arduinojson/source.cpp.tera",
        include_str!("../templates/arduinojson/source.cpp.tera"),
    ),
    (
        "arduinojson/header.h.tera",
        include_str!("../templates/arduinojson/header.h.tera"),
    ),
    (
        "serde_json/entity.rs.tera",
        include_str!("../templates/serde_json/entity.rs.tera"),
    ),
];

/// One file a backend renders for a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub path: String,
    pub template: &'static str,
}

/// A target language the generator can emit.
pub trait Backend: Send + Sync {
    fn name(&self) -> &'static str;

    /// True when `ident` cannot be used as a member or type name.
    fn is_reserved(&self, ident: &str) -> bool;

    /// Target spelling of the field's type, or `None` when unsupported.
    fn resolve_type(&self, field: &FieldSpec) -> Option<String>;

    /// Target expression for the field's default, or `None` when the
    /// expression cannot be expressed in the target language.
    fn default_expr(&self, field: &FieldSpec, kind: ValueKind, expr: &str) -> Option<String>;

    /// What generated code does when a required key is absent.
    fn missing_key_contract(&self) -> &'static str;

    /// Files to render for an entity whose file stem is `stem` and whose
    /// declaring header lives at `header`, relative to the output directory.
    fn outputs(&self, stem: &str, header: &str, emit_header: bool) -> Vec<Output>;
}

/// Which built-in backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    #[default]
    ArduinoJson,
    SerdeJson,
}

impl BackendKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ArduinoJson => "arduinojson",
            Self::SerdeJson => "serde_json",
        }
    }

    pub fn build(self) -> Box<dyn Backend> {
        match self {
            Self::ArduinoJson => Box::new(ArduinoJsonBackend),
            Self::SerdeJson => Box::new(SerdeJsonBackend),
        }
    }
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "arduinojson" | "cpp" => Ok(Self::ArduinoJson),
            "serde_json" | "rust" => Ok(Self::SerdeJson),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

const RUST_PRIMITIVES: &[&str] = &[
    "bool", "i8", "i16", "i32", "i64", "isize", "u8", "u16", "u32", "u64", "usize", "f32", "f64",
    "String", "str",
];

const CPP_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "asm", "auto", "bool", "break", "case", "catch", "char",
    "class", "const", "constexpr", "const_cast", "continue", "decltype", "default", "delete",
    "do", "double", "dynamic_cast", "else", "enum", "explicit", "export", "extern", "false",
    "float", "for", "friend", "goto", "if", "inline", "int", "long", "mutable", "namespace",
    "new", "noexcept", "not", "nullptr", "operator", "or", "private", "protected", "public",
    "register", "return", "short", "signed", "sizeof", "static", "struct", "switch", "template",
    "this", "throw", "true", "try", "typedef", "typename", "union", "unsigned", "using",
    "virtual", "void", "volatile", "while", "static_cast", "reinterpret_cast",
];

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where", "while", "gen",
];

/// C++ against ArduinoJson, the firmware target.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArduinoJsonBackend;

impl Backend for ArduinoJsonBackend {
    fn name(&self) -> &'static str {
        "arduinojson"
    }

    fn is_reserved(&self, ident: &str) -> bool {
        // The generated source declares `capacity` and `textCeiling` at file scope,
        // and `doc` names the fillData parameter.
        CPP_KEYWORDS.contains(&ident) || matches!(ident, "capacity" | "textCeiling" | "doc")
    }

    fn resolve_type(&self, field: &FieldSpec) -> Option<String> {
        let spelled = field.type_name.trim();
        let bare = spelled.strip_prefix("const ").unwrap_or(spelled).trim();
        if RUST_PRIMITIVES.contains(&bare) && !matches!(bare, "bool" | "String") {
            return None;
        }
        field.kind().map(|_| spelled.to_string())
    }

    fn default_expr(&self, _field: &FieldSpec, _kind: ValueKind, expr: &str) -> Option<String> {
        Some(expr.trim().to_string())
    }

    fn missing_key_contract(&self) -> &'static str {
        "ArduinoJson yields a null variant that converts to the zero value (0, false or an empty string)"
    }

    fn outputs(&self, stem: &str, header: &str, emit_header: bool) -> Vec<Output> {
        let mut outputs = vec![Output {
            path: format!("{stem}.cpp"),
            template: "arduinojson/source.cpp.tera",
        }];
        if emit_header {
            outputs.push(Output {
                path: header.to_string(),
                template: "arduinojson/header.h.tera",
            });
        }
        outputs
    }
}

/// Rust against `serde_json`, for host-side tooling sharing the same config.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeJsonBackend;

impl Backend for SerdeJsonBackend {
    fn name(&self) -> &'static str {
        "serde_json"
    }

    fn is_reserved(&self, ident: &str) -> bool {
        RUST_KEYWORDS.contains(&ident) || ident == "_"
    }

    fn resolve_type(&self, field: &FieldSpec) -> Option<String> {
        let kind = field.kind()?;
        let spelled = field.type_name.trim();
        if RUST_PRIMITIVES.contains(&spelled) && spelled != "str" {
            return Some(spelled.to_string());
        }
        let bare = spelled.strip_prefix("const ").unwrap_or(spelled).trim();
        let bare = bare.strip_prefix("std::").unwrap_or(bare);
        let mapped = match (kind, bare) {
            (_, "int8_t" | "signed char") => "i8",
            (_, "int16_t" | "short" | "short int" | "signed short") => "i16",
            (_, "int32_t") => "i32",
            (_, "uint8_t" | "unsigned char" | "byte") => "u8",
            (_, "uint16_t" | "unsigned short" | "unsigned short int") => "u16",
            (_, "uint32_t") => "u32",
            (_, "float") => "f32",
            (ValueKind::Bool, _) => "bool",
            (ValueKind::Signed, _) => "i64",
            (ValueKind::Unsigned, _) => "u64",
            (ValueKind::Float, _) => "f64",
            (ValueKind::Text, _) => "String",
        };
        Some(mapped.to_string())
    }

    fn default_expr(&self, field: &FieldSpec, kind: ValueKind, expr: &str) -> Option<String> {
        let value = literal::evaluate(kind, expr)?;
        let rendered = match value {
            Value::Bool(b) => b.to_string(),
            Value::String(s) => format!("String::from({s:?})"),
            Value::Number(n) if kind == ValueKind::Float => format!("{:?}", n.as_f64()?),
            Value::Number(n) => {
                let v = n
                    .as_i64()
                    .map(i128::from)
                    .or_else(|| n.as_u64().map(i128::from))?;
                let (min, max) = int_range(&self.resolve_type(field)?)?;
                if v < min || v > max {
                    return None;
                }
                v.to_string()
            }
            _ => return None,
        };
        Some(rendered)
    }

    fn missing_key_contract(&self) -> &'static str {
        "from_document fails with DocumentError::Missing"
    }

    fn outputs(&self, stem: &str, _header: &str, _emit_header: bool) -> Vec<Output> {
        vec![Output {
            path: format!("{}.rs", to_snake_case(stem)),
            template: "serde_json/entity.rs.tera",
        }]
    }
}

fn int_range(rust_type: &str) -> Option<(i128, i128)> {
    let range = match rust_type {
        "i8" => (i128::from(i8::MIN), i128::from(i8::MAX)),
        "i16" => (i128::from(i16::MIN), i128::from(i16::MAX)),
        "i32" => (i128::from(i32::MIN), i128::from(i32::MAX)),
        "i64" | "isize" => (i128::from(i64::MIN), i128::from(i64::MAX)),
        "u8" => (0, i128::from(u8::MAX)),
        "u16" => (0, i128::from(u16::MAX)),
        "u32" => (0, i128::from(u32::MAX)),
        "u64" | "usize" => (0, i128::from(u64::MAX)),
        _ => return None,
    };
    Some(range)
}

fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    let mut prev_lower = false;
    for c in s.chars() {
        if c.is_ascii_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        }
    }
    out
}
