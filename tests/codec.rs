//! Marshal-time behaviour of the in-process codec.

use jsoncfg_gen::{Codec, DocumentError, FieldSpec, MissingKeyPolicy, Schema};
use rstest::{fixture, rstest};
use serde_json::{json, Map, Value};
use std::path::Path;

#[fixture]
fn codec() -> Codec {
    let schema = Schema::new(
        "Config",
        vec![
            FieldSpec::defaulted("verMaj", "int", "1"),
            FieldSpec::required("label", "string"),
        ],
    );
    Codec::new(&schema, MissingKeyPolicy::Fail).unwrap()
}

fn object(v: Value) -> Map<String, Value> {
    v.as_object().cloned().expect("object")
}

#[rstest]
#[case::absent(json!({"label": "x"}), json!(42))]
#[case::present(json!({"label": "x", "answer": 7}), json!(7))]
fn default_is_substituted_only_when_absent(#[case] input: Value, #[case] expected: Value) {
    let schema = Schema::new(
        "Config",
        vec![
            FieldSpec::defaulted("answer", "int", "42"),
            FieldSpec::required("label", "string"),
        ],
    );
    let codec = Codec::new(&schema, MissingKeyPolicy::Fail).unwrap();
    let entity = codec.construct(&object(input)).unwrap();
    assert_eq!(entity.get("answer"), Some(&expected));
}

#[rstest]
fn scenario_to_text(codec: Codec) {
    assert_eq!(codec.capacity(), 2);
    let entity = codec.construct(&object(json!({"label": "x"}))).unwrap();
    let text = entity.to_text(2000).unwrap();
    assert_eq!(text, r#"{"verMaj":1,"label":"x"}"#);
    let parsed: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, json!({"label": "x", "verMaj": 1}));
}

#[rstest]
#[case::all_present(json!({"verMaj": 3, "label": "y"}), json!({"verMaj": 3, "label": "y"}))]
#[case::extra_keys_ignored(
    json!({"label": "y", "verMaj": 3, "unused": [1, 2]}),
    json!({"verMaj": 3, "label": "y"})
)]
#[case::default_filled_in(json!({"label": "y"}), json!({"verMaj": 1, "label": "y"}))]
fn round_trip_restricts_to_schema(codec: Codec, #[case] input: Value, #[case] expected: Value) {
    let entity = codec.construct(&object(input)).unwrap();
    let mut out = Map::new();
    entity.populate(&mut out);
    assert_eq!(Value::Object(out.clone()), expected);
    let keys: Vec<&str> = out.keys().map(String::as_str).collect();
    assert_eq!(keys, ["verMaj", "label"]);
}

#[rstest]
fn text_ceiling_is_enforced(codec: Codec) {
    let entity = codec.construct(&object(json!({"label": "x"}))).unwrap();
    // {"verMaj":1,"label":"x"} is 24 bytes.
    assert!(entity.to_text(24).is_ok());
    match entity.to_text(23) {
        Err(DocumentError::Capacity { needed, ceiling }) => {
            assert_eq!((needed, ceiling), (24, 23));
        }
        other => panic!("expected capacity error, got {other:?}"),
    }
}

#[rstest]
fn print_to_streams_populated_document(codec: Codec) {
    let entity = codec.construct(&object(json!({"label": "x"}))).unwrap();
    let mut sink = Vec::new();
    entity.print_to(&mut sink).unwrap();
    assert_eq!(String::from_utf8(sink).unwrap(), r#"{"verMaj":1,"label":"x"}"#);
}

#[test]
fn firmware_defaults_bind_except_macros() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/esp32hw.toml");
    let mut schema = Schema::load(&path).unwrap();
    assert!(Codec::new(&schema, MissingKeyPolicy::ZeroValue).is_err());

    for field in &mut schema.fields {
        if field.default.as_deref() == Some("BUILTIN_LED") {
            field.default = Some("-1".into());
        }
    }
    let codec = Codec::new(&schema, MissingKeyPolicy::ZeroValue).unwrap();
    let entity = codec.construct(&Map::new()).unwrap();
    assert_eq!(entity.get("ssid"), Some(&json!("Elfenburg")));
    assert_eq!(entity.get("local_IP"), Some(&json!(0)));
    assert_eq!(entity.get("gateway"), Some(&json!(0x01bc_a8c0u64)));
    assert_eq!(entity.get("ERR_LED"), Some(&json!(-1)));
    assert_eq!(entity.get("disableUART"), Some(&json!(false)));
}
