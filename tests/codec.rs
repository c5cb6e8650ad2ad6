use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use jetjson::{
    decode, encode_to_vec, from_slice, DecodeLimits, DecodeOptions, Decoder, Encoder, ErrorCode,
    JsonDecode, JsonEncode, JsonError, Number, RawValue, Value,
};

/// Shaped like the accessors a code generator emits for a struct.
#[derive(Debug, Default, PartialEq)]
struct Order {
    id: u64,
    qty: i16,
    price: f64,
    paid: bool,
    note: String,
    tags: Vec<String>,
    meta: Option<Value>,
}

impl<'de> JsonDecode<'de> for Order {
    fn decode(d: &mut Decoder<'de>) -> Result<Self, JsonError> {
        let mut out = Self::default();
        if d.is_null() {
            return Ok(out);
        }
        d.expect(b'{')?;
        while !d.is_object_close() {
            match d.next_key()?.as_ref() {
                "id" => out.id = d.decode_u64()?,
                "qty" => out.qty = d.decode_i16()?,
                "price" => out.price = d.decode_f64()?,
                "paid" => out.paid = d.decode_bool()?,
                "note" => out.note = d.decode_string()?,
                "tags" => out.tags = Vec::decode(d)?,
                "meta" => out.meta = Option::decode(d)?,
                _ => d.skip_value()?,
            }
        }
        Ok(out)
    }
}

impl JsonEncode for Order {
    fn encode(&self, e: &mut Encoder) -> Result<(), JsonError> {
        e.begin_object()?;
        e.encode_key_u64("id", self.id)?;
        e.encode_key_i16("qty", self.qty)?;
        e.encode_key_f64("price", self.price)?;
        e.encode_key_bool("paid", self.paid)?;
        e.encode_key_str("note", &self.note)?;
        e.write_key("tags")?;
        self.tags.encode(e)?;
        e.write_key("meta")?;
        self.meta.encode(e)?;
        e.end_object()
    }
}

#[test]
fn struct_round_trip() {
    let order = Order {
        id: 9,
        qty: -3,
        price: 19.99,
        paid: true,
        note: "line\nbreak \"quoted\"".into(),
        tags: vec!["a".into(), "b".into()],
        meta: Some(Value::from(vec![Value::from(1_u64), Value::Null])),
    };
    let bytes = encode_to_vec(&order).unwrap();
    assert_eq!(
        std::str::from_utf8(&bytes).unwrap(),
        r#"{"id":9,"qty":-3,"price":19.99,"paid":true,"note":"line\nbreak \"quoted\"","tags":["a","b"],"meta":[1,null]}"#
    );
    let back: Order = from_slice(&bytes).unwrap();
    assert_eq!(back, order);
}

#[test]
fn struct_empty_fields_encode_null_and_decode_empty() {
    let order = Order::default();
    let bytes = encode_to_vec(&order).unwrap();
    assert_eq!(
        std::str::from_utf8(&bytes).unwrap(),
        r#"{"id":0,"qty":0,"price":0.0,"paid":false,"note":"","tags":null,"meta":null}"#
    );
    let back: Order = from_slice(&bytes).unwrap();
    assert_eq!(back, order);
}

#[test]
fn struct_tolerates_unknown_members_and_nulls() {
    let input = br#"{"extra":{"x":[1,{"y":"}"}]},"id":null,"qty":12,"note":null,"more":[]}"#;
    let order: Order = from_slice(input).unwrap();
    assert_eq!(order.id, 0);
    assert_eq!(order.qty, 12);
    assert_eq!(order.note, "");
    assert!(order.tags.is_empty());

    let none: Order = from_slice(b"null").unwrap();
    assert_eq!(none, Order::default());
}

#[test]
fn struct_error_propagates_position() {
    let err = from_slice::<Order>(br#"{"qty":40000}"#).unwrap_err();
    assert_eq!(err.code, ErrorCode::NumberOverflow);
    assert_eq!(err.offset, 7);
}

#[test]
fn collections() {
    assert_eq!(from_slice::<Vec<i32>>(b"[1, 2 ,3]").unwrap(), vec![1, 2, 3]);
    assert!(from_slice::<Vec<i32>>(b"null").unwrap().is_empty());
    assert!(from_slice::<Vec<i32>>(b"[]").unwrap().is_empty());
    assert_eq!(
        from_slice::<Vec<Vec<u8>>>(b"[[1],[],null,[2,3]]").unwrap(),
        vec![vec![1], vec![], vec![], vec![2, 3]]
    );
    assert!(from_slice::<Vec<i32>>(b"[1,2").unwrap_err().is_eof());

    let map: BTreeMap<String, u8> = from_slice(br#"{"b":2,"a":1}"#).unwrap();
    assert_eq!(map.get("a"), Some(&1));
    assert_eq!(map.get("b"), Some(&2));
    assert_eq!(encode_to_vec(&map).unwrap(), br#"{"a":1,"b":2}"#);

    let map: HashMap<String, String> = from_slice(br#"{"k":"v"}"#).unwrap();
    assert_eq!(map["k"], "v");
    assert!(from_slice::<HashMap<String, bool>>(b"{}").unwrap().is_empty());
}

#[test]
fn options() {
    assert_eq!(from_slice::<Option<i32>>(b"null").unwrap(), None);
    assert_eq!(from_slice::<Option<i32>>(b" 5 ").unwrap(), Some(5));
    assert_eq!(encode_to_vec(&Some(5_u8)).unwrap(), b"5");
}

#[test]
fn zero_copy_session() {
    let input = br#""borrowed""#;
    let s: Cow<'_, str> = decode(input, DecodeOptions::zero_copy()).unwrap();
    assert!(matches!(s, Cow::Borrowed("borrowed")));

    let s: Cow<'_, str> = from_slice(input).unwrap();
    assert!(matches!(s, Cow::Owned(_)));
}

#[test]
fn trailing_bytes_rejected() {
    let err = from_slice::<String>(br#""a" "b""#).unwrap_err();
    assert_eq!(err.code, ErrorCode::TrailingBytes);
    assert_eq!(err.offset, 4);
}

#[test]
fn limits_apply_to_helpers() {
    let options = DecodeOptions {
        limits: DecodeLimits::for_bytes(3),
        ..DecodeOptions::default()
    };
    let err = decode::<Value>(b"[1,2]", options).unwrap_err();
    assert_eq!(err.code, ErrorCode::MessageLenLimitExceeded);

    let options = DecodeOptions {
        limits: DecodeLimits {
            max_input_bytes: usize::MAX,
            max_depth: 1,
        },
        ..DecodeOptions::default()
    };
    decode::<Value>(b"[1]", options).unwrap();
    let err = decode::<Value>(b"[[1]]", options).unwrap_err();
    assert_eq!(err.code, ErrorCode::DepthLimitExceeded);
    assert_eq!(err.offset, 1);
}

#[test]
fn dynamic_value_decode() {
    let v: Value = from_slice(br#"{"a":[1,-2,3.5,"x",true,null],"b":{},"c":-0}"#).unwrap();
    let a = match v.get("a") {
        Some(Value::Array(items)) => items.clone(),
        other => panic!("unexpected {other:?}"),
    };
    assert_eq!(
        a,
        vec![
            Value::Number(Number::PosInt(1)),
            Value::Number(Number::NegInt(-2)),
            Value::Number(Number::Float(3.5)),
            Value::from("x"),
            Value::Bool(true),
            Value::Null,
        ]
    );
    assert_eq!(v.get("b"), Some(&Value::Object(jetjson::Map::new())));
    assert_eq!(v.get("c"), Some(&Value::Number(Number::PosInt(0))));
}

#[test]
fn dynamic_number_kinds() {
    let v: Value = from_slice(b"[18446744073709551615, -9223372036854775808, 1e2, 99999999999999999999]")
        .unwrap();
    let Value::Array(items) = v else {
        panic!("expected array");
    };
    assert_eq!(items[0], Value::Number(Number::PosInt(u64::MAX)));
    assert_eq!(items[1], Value::Number(Number::NegInt(i64::MIN)));
    assert_eq!(items[2], Value::Number(Number::Float(100.0)));
    assert_eq!(items[3], Value::Number(Number::Float(1e20)));
    assert_eq!(Number::PosInt(5).as_i64(), Some(5));
    assert_eq!(Number::NegInt(-5).as_u64(), None);
}

#[test]
fn dynamic_value_rejects_glued_tokens() {
    let err = from_slice::<Value>(b"[12x]").unwrap_err();
    assert_eq!(err.code, ErrorCode::UnexpectedByte);
    assert_eq!(err.offset, 3);
}

#[test]
fn dynamic_value_round_trip() {
    let input = br#"{"k":[1,"two",{"three":3.25}],"n":null}"#;
    let v: Value = from_slice(input).unwrap();
    assert_eq!(encode_to_vec(&v).unwrap(), input);
}

#[test]
fn raw_value_forwarding() {
    let input = br#"{"kind":"point","body":{"x":1,"y":2}}"#;
    let mut d = Decoder::new(input, jetjson::StringMode::Copy);
    assert!(d.is_object_open());
    let mut kind = String::new();
    let mut body = None;
    while !d.is_object_close() {
        match d.next_key().unwrap().as_ref() {
            "kind" => kind = d.decode_string().unwrap(),
            "body" => body = Some(RawValue::decode(&mut d).unwrap()),
            _ => d.skip_value().unwrap(),
        }
    }
    assert_eq!(kind, "point");
    let body = body.unwrap();
    assert_eq!(body.as_bytes(), br#"{"x":1,"y":2}"#);

    let point: BTreeMap<String, i32> = from_slice(body.as_bytes()).unwrap();
    assert_eq!(point["y"], 2);

    let mut e = Encoder::new();
    e.begin_object().unwrap();
    e.write_key("body").unwrap();
    body.encode(&mut e).unwrap();
    e.end_object().unwrap();
    assert_eq!(e.bytes(), br#"{"body":{"x":1,"y":2}}"#);
}
