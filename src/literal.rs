//! Evaluation of default literal expressions into JSON values.
//!
//! Source-emitting backends pass defaults through verbatim, so a default such
//! as `BUILTIN_LED` is perfectly valid there. The serde_json backend and the
//! in-process codec need a concrete value and get it from here.

use crate::schema::ValueKind;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Number, Value};

lazy_static! {
    static ref DECIMAL_RE: Regex = Regex::new(r"^[+-]?[0-9]+[uUlL]*$").expect("valid DECIMAL_RE");
    static ref HEX_RE: Regex =
        Regex::new(r"^(?P<sign>[+-]?)0[xX](?P<digits>[0-9A-Fa-f]+)[uUlL]*$").expect("valid HEX_RE");
    static ref FLOAT_RE: Regex =
        Regex::new(r"^[+-]?([0-9]+\.[0-9]*|\.[0-9]+|[0-9]+)([eE][+-]?[0-9]+)?[fF]?$")
            .expect("valid FLOAT_RE");
    static ref STRING_RE: Regex = Regex::new(r#"^"(?P<body>(?:[^"\\]|\\.)*)"$"#).expect("valid STRING_RE");
}

/// Evaluates `expr` as a literal of the given kind.
///
/// Returns `None` for anything that is not a plain literal of that kind.
pub fn evaluate(kind: ValueKind, expr: &str) -> Option<Value> {
    let expr = expr.trim();
    match kind {
        ValueKind::Bool => match expr {
            "true" => Some(Value::Bool(true)),
            "false" => Some(Value::Bool(false)),
            _ => None,
        },
        ValueKind::Signed => integer(expr)
            .and_then(|v| i64::try_from(v).ok())
            .map(Value::from),
        ValueKind::Unsigned => integer(expr)
            .and_then(|v| u64::try_from(v).ok())
            .map(Value::from),
        ValueKind::Float => {
            if let Some(v) = integer(expr) {
                return Number::from_f64(v as f64).map(Value::Number);
            }
            if !FLOAT_RE.is_match(expr) {
                return None;
            }
            let trimmed = expr.trim_end_matches(['f', 'F']);
            trimmed
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
        }
        ValueKind::Text => string(expr).map(Value::String),
    }
}

fn integer(expr: &str) -> Option<i128> {
    if let Some(cap) = HEX_RE.captures(expr) {
        let digits = i128::from_str_radix(&cap["digits"], 16).ok()?;
        return Some(if &cap["sign"] == "-" { -digits } else { digits });
    }
    if DECIMAL_RE.is_match(expr) {
        return expr.trim_end_matches(['u', 'U', 'l', 'L']).parse().ok();
    }
    None
}

fn string(expr: &str) -> Option<String> {
    let body = STRING_RE.captures(expr)?.name("body")?.as_str();
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '0' => out.push('\0'),
            other => out.push(other),
        }
    }
    Some(out)
}
