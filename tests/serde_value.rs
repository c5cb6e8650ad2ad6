#![cfg(feature = "serde")]

use jetjson::{encode_to_vec, from_slice, Number, Value};

#[test]
fn serialize_matches_native_encoder() {
    let input = br#"{"a":1,"b":[true,null,-2,2.5],"c":"q\"uote","d":{}}"#;
    let v: Value = from_slice(input).unwrap();
    let via_serde = serde_json::to_vec(&v).unwrap();
    assert_eq!(via_serde, encode_to_vec(&v).unwrap());
    assert_eq!(via_serde, input);
}

#[test]
fn deserialize_matches_native_decoder() {
    let text = r#"{"k":[1,-7,0.25,"s",false,null],"nested":{"x":{}}}"#;
    let via_serde: Value = serde_json::from_str(text).unwrap();
    let native: Value = from_slice(text.as_bytes()).unwrap();
    assert_eq!(via_serde, native);
    assert_eq!(
        via_serde.get("k").and_then(|k| match k {
            Value::Array(items) => items.get(1).cloned(),
            _ => None,
        }),
        Some(Value::Number(Number::NegInt(-7)))
    );
}

#[test]
fn member_order_survives_serde() {
    let text = r#"{"z":1,"a":2,"m":3}"#;
    let v: Value = serde_json::from_str(text).unwrap();
    assert_eq!(serde_json::to_string(&v).unwrap(), text);
}
