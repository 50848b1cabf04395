mod common;

use common::doc;
use mongo_encode::{encode_document, ExtendedJsonError, ExtendedJsonWriter};
use serde_json::json;

#[test]
fn encoded_polymorphic_document_renders_relaxed() {
    let mut d = doc(json!({
        "name": "Test polymorphic list",
        "polymorphic_list": [
            {"id_property": "999999999999999999999999"},
            "123456789012345678901234",
            ["123456789012345678900000"]
        ],
        "created": "2009-10-11T12:34:56.000Z"
    }));
    encode_document(&mut d, ["polymorphic_list", "id_property"], ["created"]).unwrap();

    let out = ExtendedJsonWriter::new().write_document(&d).unwrap();
    assert_eq!(
        out,
        json!({
            "name": "Test polymorphic list",
            "polymorphic_list": [
                {"id_property": "999999999999999999999999"},
                {"$oid": "123456789012345678901234"},
                [{"$oid": "123456789012345678900000"}]
            ],
            "created": {"$date": "2009-10-11T12:34:56.000Z"}
        })
    );
}

#[test]
fn canonical_dates_use_number_long() {
    let mut d = doc(json!({"created": "2009-10-11T12:34:56.000Z"}));
    encode_document(&mut d, Vec::<String>::new(), ["created"]).unwrap();
    let out = ExtendedJsonWriter::canonical().write_document(&d).unwrap();
    assert_eq!(out, json!({"created": {"$date": {"$numberLong": "1255264496000"}}}));
}

#[test]
fn invalid_date_cannot_be_rendered() {
    let mut d = doc(json!({"items": [{"created": "garbage"}]}));
    encode_document(&mut d, Vec::<String>::new(), ["created"]).unwrap();
    assert_eq!(
        ExtendedJsonWriter::new().write_document(&d),
        Err(ExtendedJsonError::InvalidDate("/items/0/created".into()))
    );
}

#[test]
fn unencoded_document_renders_as_plain_json() {
    let input = json!({"a": [1, 2.5, "x", null, true], "b": {"c": "d"}});
    let d = doc(input.clone());
    assert_eq!(ExtendedJsonWriter::new().write_document(&d).unwrap(), input);
}
