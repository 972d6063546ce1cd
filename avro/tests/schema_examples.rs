// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Parsing and normalization of a corpus of schema documents.

use avro_core::{ErrorKind, Schema, schema::Name};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

type TestResult = anyhow::Result<()>;

/// Compact re-encoding of the document itself, for documents already in normalized order.
fn compact(raw: &str) -> String {
    let value: serde_json::Value = serde_json::from_str(raw).expect("test document is valid JSON");
    value.to_string()
}

#[rstest]
#[case::null(r#""null""#)]
#[case::boolean(r#""boolean""#)]
#[case::int(r#""int""#)]
#[case::long(r#""long""#)]
#[case::float(r#""float""#)]
#[case::double(r#""double""#)]
#[case::bytes(r#""bytes""#)]
#[case::string(r#""string""#)]
fn test_primitive_types(#[case] raw: &str) -> TestResult {
    let bare = Schema::parse_str(raw)?;
    assert_eq!(bare.to_string(), raw);

    let wrapped = Schema::parse_str(&format!(r#"{{"type": {raw}}}"#))?;
    assert_eq!(wrapped.to_string(), raw);
    assert_eq!(wrapped, bare);
    Ok(())
}

#[rstest]
#[case::array(r#"{"type": "array", "items": "long"}"#)]
#[case::array_of_enum(
    r#"{"type": "array", "items": {"type": "enum", "name": "Test", "symbols": ["A", "B"]}}"#
)]
#[case::map(r#"{"type": "map", "values": "long"}"#)]
#[case::map_of_enum(
    r#"{"type": "map", "values": {"type": "enum", "name": "Test", "symbols": ["A", "B"]}}"#
)]
#[case::union(r#"["string", "null", "long"]"#)]
#[case::union_of_complex(
    r#"["long", {"type": "array", "items": "long"}, {"type": "map", "values": "long"}, "int"]"#
)]
#[case::fixed(r#"{"type": "fixed", "name": "Test", "size": 1}"#)]
#[case::fixed_with_namespace(
    r#"{"type": "fixed", "name": "MyFixed", "namespace": "org.apache.hadoop.avro", "size": 1}"#
)]
#[case::enum_(r#"{"type": "enum", "name": "Test", "symbols": ["A", "B"]}"#)]
#[case::enum_with_doc(
    r#"{"type": "enum", "name": "blood_types", "doc": "AB is freaky.", "symbols": ["A", "AB", "B", "O"]}"#
)]
#[case::record(r#"{"type": "record", "name": "Test", "fields": [{"name": "f", "type": "long"}]}"#)]
#[case::error(r#"{"type": "error", "name": "Test", "fields": [{"name": "f", "type": "long"}]}"#)]
#[case::recursive_through_array(
    r#"{"type": "record", "name": "Node", "fields": [
        {"name": "label", "type": "string"},
        {"name": "children", "type": {"type": "array", "items": "Node"}}]}"#
)]
#[case::directly_recursive(
    r#"{"type": "record", "name": "ListLink", "fields": [
        {"name": "car", "type": "int"},
        {"name": "cdr", "type": "ListLink"}]}"#
)]
#[case::nullable_field(
    r#"{"type": "record", "name": "Lisp", "fields": [{"name": "value", "type": ["null", "string"]}]}"#
)]
#[case::record_in_union(
    r#"{"type": "record", "name": "Lisp", "fields": [{"name": "value", "type": ["null", "string",
        {"type": "record", "name": "Cons", "fields": [
            {"name": "car", "type": "string"},
            {"name": "cdr", "type": "string"}]}]}]}"#
)]
#[case::mutually_recursive(
    r#"{"type": "record", "name": "Lisp", "fields": [{"name": "value", "type": ["null", "string",
        {"type": "record", "name": "Cons", "fields": [
            {"name": "car", "type": "Lisp"},
            {"name": "cdr", "type": "Lisp"}]}]}]}"#
)]
#[case::handshake_request(
    r#"{"type": "record", "name": "HandshakeRequest", "namespace": "org.apache.avro.ipc", "fields": [
        {"name": "clientHash", "type": {"type": "fixed", "name": "MD5", "size": 16}},
        {"name": "meta", "type": ["null", {"type": "map", "values": "bytes"}]}]}"#
)]
#[case::handshake_request_with_reference(
    r#"{"type": "record", "name": "HandshakeRequest", "namespace": "org.apache.avro.ipc", "fields": [
        {"name": "clientHash", "type": {"type": "fixed", "name": "MD5", "size": 16}},
        {"name": "clientProtocol", "type": ["null", "string"]},
        {"name": "serverHash", "type": "MD5"},
        {"name": "meta", "type": ["null", {"type": "map", "values": "bytes"}]}]}"#
)]
#[case::primitive_with_logical_type(
    r#"{"type": "bytes", "logicalType": "decimal", "precision": 4, "scale": 2}"#
)]
#[case::nullable_default(
    r#"{"type": "record", "name": "foo", "fields": [{"name": "bar", "type": ["null", "string"], "default": null}]}"#
)]
#[case::field_doc(
    r#"{"type": "record", "name": "foo", "fields": [{"name": "bar", "type": ["null", "string"], "doc": "Bar name."}]}"#
)]
fn test_valid_schema_in_normalized_order(#[case] raw: &str) -> TestResult {
    let schema = Schema::parse_str(raw)?;
    assert_eq!(schema.to_string(), compact(raw));
    Ok(())
}

#[rstest]
#[case::fixed_doc_is_dropped(
    r#"{"type":"fixed","name":"ex","doc":"this should be ignored","size": 314}"#,
    r#"{"type":"fixed","name":"ex","size":314}"#
)]
#[case::fixed_namespace_after_name(
    r#"{"name": "bar", "namespace": "com.example", "type": "fixed", "size": 32 }"#,
    r#"{"type":"fixed","name":"bar","namespace":"com.example","size":32}"#
)]
#[case::fixed_dotted_name(
    r#"{"name": "com.example.bar", "type": "fixed", "size": 32 }"#,
    r#"{"type":"fixed","name":"bar","namespace":"com.example","size":32}"#
)]
#[case::underscore_namespace(
    r#"{"type":"fixed","name":"_x.bar","size":4}"#,
    r#"{"type":"fixed","name":"bar","namespace":"_x","size":4}"#
)]
#[case::underscore_name(
    r#"{"type":"fixed","name":"baz._x","size":4}"#,
    r#"{"type":"fixed","name":"_x","namespace":"baz","size":4}"#
)]
#[case::fixed_logical_type(
    r#"{ "type": "fixed", "size": 32, "name": "hash", "logicalType": "md5" }"#,
    r#"{"type":"fixed","name":"hash","logicalType":"md5","size":32}"#
)]
#[case::enum_annotations(
    r#"{"type": "enum", "logicalType": "foo", "name": "foo", "symbols": ["FOO", "BAR"], "foo": "bar"}"#,
    r#"{"type":"enum","name":"foo","logicalType":"foo","foo":"bar","symbols":["FOO","BAR"]}"#
)]
#[case::array_annotations(
    r#"{"type": "array", "logicalType": "foo", "items": "string", "foo": "bar"}"#,
    r#"{"type":"array","items":"string","logicalType":"foo","foo":"bar"}"#
)]
#[case::map_annotations(
    r#"{"type": "map", "logicalType": "foo", "values": "long", "foo": "bar"}"#,
    r#"{"type":"map","values":"long","logicalType":"foo","foo":"bar"}"#
)]
#[case::record_annotations(
    r#"{ "type": "record", "name": "foo", "logicalType": "bar", "fields": [], "foo": "bar" }"#,
    r#"{"type":"record","name":"foo","logicalType":"bar","foo":"bar","fields":[]}"#
)]
#[case::field_order_and_default(
    r#"{"type":"record","name":"foo","doc":"doc string",
        "fields":[{"name":"bar", "type":"int", "order":"ascending", "default":1}]}"#,
    r#"{"type":"record","name":"foo","doc":"doc string","fields":[{"name":"bar","type":"int","default":1,"order":"ascending"}]}"#
)]
#[case::union_of_every_kind(
    r#"["null", "boolean", "int", "long", "float", "double", "string", "bytes",
        {"type": "array", "items":"int"},
        {"type": "map", "values":"int"},
        {"name": "bar", "type":"record", "fields":[{"name":"label", "type":"string"}]},
        {"name": "foo", "type":"fixed", "size":16},
        {"name": "baz", "type":"enum", "symbols":["A", "B", "C"]}]"#,
    r#"["null","boolean","int","long","float","double","string","bytes",{"type":"array","items":"int"},{"type":"map","values":"int"},{"type":"record","name":"bar","fields":[{"name":"label","type":"string"}]},{"type":"fixed","name":"foo","size":16},{"type":"enum","name":"baz","symbols":["A","B","C"]}]"#
)]
#[case::union_of_namespaced_records(
    r#"[{"name":"subtract", "namespace":"com.example", "type":"record",
         "fields":[{"name":"minuend", "type":"int"}, {"name":"subtrahend", "type":"int"}]},
        {"name": "divide", "namespace":"com.example", "type":"record",
         "fields":[{"name":"quotient", "type":"int"}, {"name":"dividend", "type":"int"}]},
        {"type": "array", "items": "string"}]"#,
    r#"[{"type":"record","name":"subtract","namespace":"com.example","fields":[{"name":"minuend","type":"int"},{"name":"subtrahend","type":"int"}]},{"type":"record","name":"divide","namespace":"com.example","fields":[{"name":"quotient","type":"int"},{"name":"dividend","type":"int"}]},{"type":"array","items":"string"}]"#
)]
#[case::handshake_response(
    r#"{"type": "record", "name": "HandshakeResponse", "namespace": "org.apache.avro.ipc",
        "fields": [{"name": "match", "type": {"type": "enum", "name": "HandshakeMatch", "symbols": ["BOTH", "CLIENT", "NONE"]}},
                   {"name": "serverProtocol", "type": ["null", "string"]},
                   {"name": "serverHash", "type": ["null", {"name": "MD5", "size": 16, "type": "fixed"}]},
                   {"name": "meta", "type": ["null", {"type": "map", "values": "bytes"}]}]}"#,
    r#"{"type":"record","name":"HandshakeResponse","namespace":"org.apache.avro.ipc","fields":[{"name":"match","type":{"type":"enum","name":"HandshakeMatch","symbols":["BOTH","CLIENT","NONE"]}},{"name":"serverProtocol","type":["null","string"]},{"name":"serverHash","type":["null",{"type":"fixed","name":"MD5","size":16}]},{"name":"meta","type":["null",{"type":"map","values":"bytes"}]}]}"#
)]
#[case::interop_fully_qualified_reference(
    r#"{"type": "record", "namespace": "org.apache.avro", "name": "Interop",
        "fields": [{"type": {"fields": [{"type": {"items": "org.apache.avro.Node", "type": "array"}, "name": "children"}],
                             "type": "record", "name": "Node"},
                    "name": "recordField"}]}"#,
    r#"{"type":"record","name":"Interop","namespace":"org.apache.avro","fields":[{"name":"recordField","type":{"type":"record","name":"Node","fields":[{"name":"children","type":{"type":"array","items":"Node"}}]}}]}"#
)]
#[case::interop_enum_and_record(
    r#"{"type": "record", "namespace": "org.apache.avro", "name": "Interop",
        "fields": [{"type": {"symbols": ["A", "B", "C"], "type": "enum", "name": "Kind"}, "name": "enumField"},
                   {"type": {"fields": [{"type": "string", "name": "label"},
                                        {"type": {"items": "org.apache.avro.Node", "type": "array"}, "name": "children"}],
                             "type": "record", "name": "Node"},
                    "name": "recordField"}]}"#,
    r#"{"type":"record","name":"Interop","namespace":"org.apache.avro","fields":[{"name":"enumField","type":{"type":"enum","name":"Kind","symbols":["A","B","C"]}},{"name":"recordField","type":{"type":"record","name":"Node","fields":[{"name":"label","type":"string"},{"name":"children","type":{"type":"array","items":"Node"}}]}}]}"#
)]
#[case::interop_every_type(
    r#"{"type": "record", "namespace": "org.apache.avro", "name": "Interop", "fields": [
        {"type": "int", "name": "intField"}, {"type": "long", "name": "longField"},
        {"type": "string", "name": "stringField"}, {"type": "boolean", "name": "boolField"},
        {"type": "float", "name": "floatField"}, {"type": "double", "name": "doubleField"},
        {"type": "bytes", "name": "bytesField"}, {"type": "null", "name": "nullField"},
        {"type": {"items": "double", "type": "array"}, "name": "arrayField"},
        {"type": {"type": "map", "values": {"fields": [{"type": "string", "name": "label"}], "type": "record", "name": "Foo"}}, "name": "mapField"},
        {"type": ["boolean", "double", {"items": "bytes", "type": "array"}], "name": "unionField"},
        {"type": {"symbols": ["A", "B", "C"], "type": "enum", "name": "Kind"}, "name": "enumField"},
        {"type": {"type": "fixed", "name": "MD5", "size": 16}, "name": "fixedField"},
        {"type": {"fields": [{"type": "string", "name": "label"}, {"type": {"items": "org.apache.avro.Node", "type": "array"}, "name": "children"}], "type": "record", "name": "Node"}, "name": "recordField"}]}"#,
    r#"{"type":"record","name":"Interop","namespace":"org.apache.avro","fields":[{"name":"intField","type":"int"},{"name":"longField","type":"long"},{"name":"stringField","type":"string"},{"name":"boolField","type":"boolean"},{"name":"floatField","type":"float"},{"name":"doubleField","type":"double"},{"name":"bytesField","type":"bytes"},{"name":"nullField","type":"null"},{"name":"arrayField","type":{"type":"array","items":"double"}},{"name":"mapField","type":{"type":"map","values":{"type":"record","name":"Foo","fields":[{"name":"label","type":"string"}]}}},{"name":"unionField","type":["boolean","double",{"type":"array","items":"bytes"}]},{"name":"enumField","type":{"type":"enum","name":"Kind","symbols":["A","B","C"]}},{"name":"fixedField","type":{"type":"fixed","name":"MD5","size":16}},{"name":"recordField","type":{"type":"record","name":"Node","fields":[{"name":"label","type":"string"},{"name":"children","type":{"type":"array","items":"Node"}}]}}]}"#
)]
#[case::union_of_fixed(
    r#"{"type": "record", "name": "ipAddr", "fields": [{"name": "addr", "type": [
        {"name": "IPv6", "type": "fixed", "size": 16},
        {"name": "IPv4", "type": "fixed", "size": 4}]}]}"#,
    r#"{"type":"record","name":"ipAddr","fields":[{"name":"addr","type":[{"type":"fixed","name":"IPv6","size":16},{"type":"fixed","name":"IPv4","size":4}]}]}"#
)]
fn test_valid_schema(#[case] raw: &str, #[case] normalized: &str) -> TestResult {
    let schema = Schema::parse_str(raw)?;
    assert_eq!(schema.to_string(), normalized);

    let reparsed = Schema::parse_str(normalized)?;
    assert_eq!(reparsed.to_string(), normalized);
    Ok(())
}

#[rstest]
#[case::unknown_type_name(r#""True""#)]
#[case::no_type(r#"{"no_type": "test"}"#)]
#[case::unknown_type(r#"{"type": "panther"}"#)]
#[case::duplicate_null_branch(r#"["null", "null"]"#)]
#[case::duplicate_long_branch(r#"["long", "long"]"#)]
#[case::missing_comma(
    r#"[{"type": "array", "items": "long"} {"type": "array", "items": "string"}]"#
)]
#[case::duplicate_annotated_branch(r#"["long", {"type": "long"}, "int"]"#)]
#[case::duplicate_array_branch(
    r#"[{"type": "array", "items": "long"}, {"type": "array", "items": "string"}]"#
)]
#[case::nested_union(r#"["long", ["string", "null"], "int"]"#)]
#[case::fixed_without_size(r#"{"type": "fixed", "name": "Missing size"}"#)]
#[case::fixed_without_name(r#"{"type": "fixed", "size": 314}"#)]
#[case::fixed_name_starting_with_digit(r#"{"type":"fixed","name":"baz.3x","size":4}"#)]
#[case::enum_symbols_not_array(
    r#"{"type": "enum", "name": "Status", "symbols": "Normal Caution Critical"}"#
)]
#[case::enum_name_not_string(
    r#"{"type": "enum", "name": [ 0, 1, 1, 2, 3, 5, 8 ], "symbols": ["Golden", "Mean"]}"#
)]
#[case::enum_without_name(r#"{"type": "enum", "symbols" : ["I", "will", "fail", "no", "name"]}"#)]
#[case::enum_duplicate_symbol(r#"{"type": "enum", "name": "Test", "symbols" : ["AA", "AA"]}"#)]
#[case::enum_symbol_not_string(r#"{"type":"enum","name":"Test","symbols":["AA", 16]}"#)]
#[case::enum_doc_not_string(
    r#"{"type": "enum", "name": "blood-types", "doc": 16, "symbols" : ["A", "AB", "B", "O"]}"#
)]
#[case::field_without_name(
    r#"{"type": "record", "name": "Address", "fields": [{"type": "string"}, {"type": "string", "name": "City"}]}"#
)]
#[case::field_without_type(
    r#"{"type": "record", "name": "Event", "fields": [{"name": "Sponsor"}, {"name": "City", "type": "string"}]}"#
)]
#[case::malformed_record(
    r#"{"type": "record", "fields": "His vision, from the constantly passing bars," "name", "Rainer"}"#
)]
#[case::record_name_not_string(
    r#"{"name": ["Tom", "Jerry"], "type": "record", "fields": [{"name": "name", "type": "string"}]}"#
)]
#[case::bad_field_order(
    r#"{"type":"record", "name":"foo", "doc":"doc string", "fields":[{"name":"bar", "type":"int", "order":"bad"}]}"#
)]
#[case::trailing_comma(r#"{"type": "array", "items": "long", }"#)]
#[case::single_quotes("{'type': 'array', 'items': 'long'}")]
#[case::binary_data("\x11\x07")]
fn test_invalid_schema(#[case] raw: &str) {
    let err = Schema::parse_str(raw).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SchemaParse, "{raw}: {err}");
}

#[test]
fn test_record_doc() -> TestResult {
    let schema = Schema::parse_str(
        r#"{"type": "record", "name": "foo", "doc": "Foo doc.",
            "fields": [{"name": "bar", "type": "int", "doc": "Bar doc."}]}"#,
    )?;
    assert_eq!(schema.doc(), Some("Foo doc."));
    let Schema::Record(record) = &schema else {
        panic!("Expected a record schema, got {schema:?}");
    };
    assert_eq!(record.fields.len(), 1);
    assert_eq!(record.fields[0].doc.as_deref(), Some("Bar doc."));
    Ok(())
}

#[test]
fn test_enum_doc() -> TestResult {
    let schema = Schema::parse_str(
        r#"{"type": "enum", "name": "blood_types", "doc": "AB is freaky.", "symbols": ["A", "AB", "B", "O"]}"#,
    )?;
    assert_eq!(schema.doc(), Some("AB is freaky."));
    Ok(())
}

#[test]
fn test_logical_type_and_extra_attributes() -> TestResult {
    let schema = Schema::parse_str(
        r#"{ "type": "bytes", "logicalType": "decimal", "precision": 4, "scale": 2 }"#,
    )?;
    assert_eq!(schema.logical_type(), Some("decimal"));
    let attributes = schema.custom_attributes().cloned().unwrap_or_default();
    assert_eq!(
        serde_json::Value::Object(attributes),
        json!({"precision": 4, "scale": 2})
    );
    Ok(())
}

#[test]
fn test_names_in_nested_namespaces() -> TestResult {
    let schema = Schema::parse_str(
        r#"{"type": "record", "name": "Outer", "namespace": "space", "fields": [
            {"name": "inner", "type": {"type": "enum", "name": "Inner", "symbols": ["A"]}},
            {"name": "other", "type": {"type": "fixed", "name": "Other", "namespace": "elsewhere", "size": 2}},
            {"name": "global", "type": {"type": "fixed", "name": "Global", "namespace": "", "size": 1}},
            {"name": "again", "type": "Inner"},
            {"name": "global_again", "type": ".Global"}]}"#,
    )?;
    let Schema::Record(record) = &schema else {
        panic!("Expected a record schema, got {schema:?}");
    };
    let names: Vec<String> = record
        .fields
        .iter()
        .map(|field| field.schema.name().map(Name::fullname).unwrap_or_default())
        .collect();
    assert_eq!(
        names,
        ["space.Inner", "elsewhere.Other", "Global", "space.Inner", "Global"]
    );

    assert_eq!(
        schema.to_string(),
        r#"{"type":"record","name":"Outer","namespace":"space","fields":[{"name":"inner","type":{"type":"enum","name":"Inner","symbols":["A"]}},{"name":"other","type":{"type":"fixed","name":"Other","namespace":"elsewhere","size":2}},{"name":"global","type":{"type":"fixed","name":"Global","namespace":"","size":1}},{"name":"again","type":"Inner"},{"name":"global_again","type":".Global"}]}"#
    );
    Ok(())
}

#[test]
fn test_duplicate_definition() {
    let err = Schema::parse_str(
        r#"{"type": "record", "name": "R", "fields": [
            {"name": "a", "type": {"type": "fixed", "name": "F", "size": 1}},
            {"name": "b", "type": {"type": "fixed", "name": "F", "size": 2}}]}"#,
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SchemaParse);
}
