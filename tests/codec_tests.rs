//! Cross-format codec tests: the same record through every builtin codec.

use record_codec::codec::{
    IniParser, JsonHandler, PhpHandler, RecordBuilder, RecordHandler, RecordParser, YamlHandler,
};
use record_codec::{parse_record, record, Error, RecordMap, Value};

fn sample_record() -> RecordMap {
    record!({
        "name": "Alice",
        "age": 30,
        "ratio": 0.25,
        "active": true,
        "note": null,
        "tags": ["admin", "user"],
        "nested": { "inner": "value", "empty": {} }
    })
    .into_map()
    .unwrap()
}

#[test]
fn test_every_builder_roundtrips_the_sample() {
    let data = sample_record();

    let handlers: [(&str, Box<dyn RecordHandler>); 3] = [
        ("json", Box::new(JsonHandler)),
        ("php", Box::new(PhpHandler)),
        ("yaml", Box::new(YamlHandler)),
    ];

    for (name, handler) in handlers {
        let bytes = handler.build_record(&data).unwrap();
        let parsed = handler.parse_record(&bytes).unwrap();
        assert_eq!(parsed, data, "{name}");
    }
}

#[test]
fn test_records_translate_between_formats() {
    // JSON in, PHP serialize out, JSON again: the model is the pivot.
    let data = JsonHandler
        .parse_record(br#"{"host":"localhost","ports":[80,443]}"#)
        .unwrap();

    let php_bytes = PhpHandler.build_record(&data).unwrap();
    let via_php = PhpHandler.parse_record(&php_bytes).unwrap();
    assert_eq!(via_php, data);

    let json_bytes = JsonHandler.build_record(&via_php).unwrap();
    assert_eq!(JsonHandler.parse_record(&json_bytes).unwrap(), data);
}

#[test]
fn test_php_lists_come_back_as_lists() {
    // PHP serializes lists as integer-keyed arrays; output normalization
    // turns them back into lists on the way out.
    let data = record!({ "items": [1, 2, 3] }).into_map().unwrap();
    let bytes = PhpHandler.build_record(&data).unwrap();

    let parsed = PhpHandler.parse_record(&bytes).unwrap();
    assert_eq!(parsed.get("items"), Some(&record!([1, 2, 3])));
}

#[test]
fn test_php_comment_lines_are_ignored() {
    let data = record!({ "key": "value" }).into_map().unwrap();
    let mut bytes = b"# generated file\n# do not edit\n".to_vec();
    bytes.extend(PhpHandler.build_record(&data).unwrap());

    assert_eq!(PhpHandler.parse_record(&bytes).unwrap(), data);
}

#[test]
fn test_ini_parses_real_world_config() {
    let source = br#"
; application settings
name = demo

[database]
host = localhost
port = 5432

[logging]
level = debug
"#;

    let data = IniParser.parse_record(source).unwrap();
    assert_eq!(data.get("name"), Some(&Value::String("demo".into())));
    assert_eq!(data.get("host"), Some(&Value::String("localhost".into())));
    assert_eq!(data.get("level"), Some(&Value::String("debug".into())));
}

#[test]
fn test_parsers_reject_non_map_documents() {
    assert!(matches!(
        JsonHandler.parse_record(b"42").unwrap_err(),
        Error::Malformed { .. }
    ));
    assert!(matches!(
        YamlHandler.parse_record(b"- 1\n- 2\n").unwrap_err(),
        Error::Malformed { .. }
    ));
    assert!(matches!(
        PhpHandler.parse_record(b"i:42;").unwrap_err(),
        Error::Malformed { .. }
    ));
}

#[test]
fn test_builders_reject_invalid_input_before_encoding() {
    let data = record!({ "bad key": 1 }).into_map().unwrap();

    for result in [
        JsonHandler.build_record(&data),
        PhpHandler.build_record(&data),
        YamlHandler.build_record(&data),
    ] {
        assert!(matches!(result.unwrap_err(), Error::InvalidKey { .. }));
    }
}

#[test]
fn test_unicode_survives_every_format() {
    let data = record!({ "greeting": "héllo wörld ☃" }).into_map().unwrap();

    for bytes in [
        JsonHandler.build_record(&data).unwrap(),
        PhpHandler.build_record(&data).unwrap(),
        YamlHandler.build_record(&data).unwrap(),
    ] {
        // PHP bytes parse with PhpHandler, the others with themselves;
        // the top-level helper covers the JSON case too.
        let parsed = if bytes.starts_with(b"a:") {
            PhpHandler.parse_record(&bytes).unwrap()
        } else if bytes.starts_with(b"{") {
            parse_record(&bytes, "application/json").unwrap()
        } else {
            YamlHandler.parse_record(&bytes).unwrap()
        };
        assert_eq!(parsed, data);
    }
}
