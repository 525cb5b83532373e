use jsonschema7::{CompilationOptions, JsonSchema, SchemaError, ValidationResult};
use serde_json::{json, Value};
use test_case::test_case;

fn validate(schema: Value, instance: Value) -> ValidationResult {
    let compiled = JsonSchema::compile(&schema).expect("schema compiles");
    compiled.validate(&instance)
}

#[test]
fn unique_items_duplicate() {
    let result = validate(json!({"type": "array", "uniqueItems": true}), json!([1, 2, 1]));
    assert_eq!(result.errors().len(), 1);
    assert_eq!(result.errors()[0].keyword(), "uniqueItems");
    assert_eq!(result.errors()[0].message(), "Array items are not unique");
}

#[test]
fn required_property_missing() {
    let result = validate(
        json!({"type": "object", "required": ["a", "b"]}),
        json!({"a": 1}),
    );
    assert_eq!(result.errors().len(), 1);
    assert_eq!(result.errors()[0].keyword(), "required");
    assert_eq!(result.errors()[0].message(), "Required property \"b\" not found");
}

#[test]
fn one_of_ambiguity() {
    let result = validate(
        json!({"oneOf": [{"type": "integer"}, {"type": "number"}]}),
        json!(3),
    );
    assert_eq!(result.errors().len(), 1);
    assert_eq!(result.errors()[0].keyword(), "oneOf");
    assert_eq!(
        result.errors()[0].message(),
        "2 subschemas matched, but exactly one is required to match"
    );
}

#[test]
fn one_of_no_match_aggregates() {
    let result = validate(
        json!({"oneOf": [{"type": "integer"}, {"type": "boolean"}]}),
        json!("text"),
    );
    assert_eq!(result.errors().len(), 1);
    assert!(!result.errors()[0].nested().is_empty());
}

#[test]
fn default_is_filled_in() {
    let result = validate(
        json!({"type": "object", "properties": {"x": {"type": "integer", "default": 7}}}),
        json!({}),
    );
    assert!(result.is_valid());
    assert_eq!(
        result.patch().to_value(),
        json!([{"op": "add", "path": "/x", "value": 7}])
    );
}

#[test]
fn defaults_follow_declaration_order() {
    let result = validate(
        json!({
            "type": "object",
            "properties": {
                "a": {"default": 1},
                "b": {"default": 2}
            }
        }),
        json!({}),
    );
    assert_eq!(
        result.patch().to_value(),
        json!([
            {"op": "add", "path": "/a", "value": 1},
            {"op": "add", "path": "/b", "value": 2}
        ])
    );
}

#[test]
fn nested_default_uses_nested_path() {
    let result = validate(
        json!({
            "type": "object",
            "properties": {
                "outer": {
                    "type": "object",
                    "properties": {"inner": {"default": 5}}
                }
            }
        }),
        json!({"outer": {}}),
    );
    assert!(result.is_valid());
    assert_eq!(
        result.patch().to_value(),
        json!([{"op": "add", "path": "/outer/inner", "value": 5}])
    );
}

#[test]
fn pattern_properties_with_additional_properties_false() {
    let result = validate(
        json!({
            "patternProperties": {"^a": {"type": "integer"}},
            "additionalProperties": false
        }),
        json!({"abc": 1, "xyz": 2}),
    );
    assert_eq!(result.errors().len(), 1);
    assert_eq!(result.errors()[0].keyword(), "additionalProperties");
    assert_eq!(
        result.errors()[0].message(),
        "Additional property \"xyz\" found but was invalid."
    );
}

#[test]
fn string_length_counts_code_points() {
    let result = validate(json!({"type": "string", "maxLength": 3}), json!("αβγδ"));
    assert_eq!(result.errors().len(), 1);
    assert_eq!(result.errors()[0].keyword(), "maxLength");
    assert_eq!(result.errors()[0].message(), "Expected maxLength: 3, actual: 4");
}

#[test]
fn type_mismatch_names_expectations() {
    let result = validate(json!({"type": ["integer", "string"]}), json!(null));
    assert_eq!(result.errors().len(), 1);
    assert_eq!(result.errors()[0].keyword(), "type");
    assert_eq!(
        result.errors()[0].message(),
        "Expected integer, or string, found null"
    );
}

#[test]
fn integer_accepts_lossless_doubles() {
    let schema = json!({"type": "integer"});
    assert!(validate(schema.clone(), json!(2.0)).is_valid());
    let result = validate(schema, json!(2.5));
    assert_eq!(result.errors().len(), 1);
    assert_eq!(result.errors()[0].message(), "Instance is not a number");
}

#[test_case(json!(4.5), true; "exact multiple")]
#[test_case(json!(5), false; "not a multiple")]
#[test_case(json!(0), true; "zero is a multiple of everything")]
fn multiple_of(instance: Value, expected: bool) {
    let result = validate(json!({"type": "number", "multipleOf": 1.5}), instance);
    assert_eq!(result.is_valid(), expected);
}

#[test]
fn exclusive_maximum_is_numeric() {
    let result = validate(json!({"type": "number", "exclusiveMaximum": 180}), json!(180));
    assert_eq!(result.errors().len(), 1);
    assert_eq!(result.errors()[0].keyword(), "maximum");
    assert_eq!(result.errors()[0].message(), "180 exceeds maximum of 180");
}

#[test]
fn nested_errors_carry_locations() {
    let schema = json!({
        "type": "object",
        "properties": {
            "a": {"type": "array", "items": {"type": "integer"}}
        }
    });
    let result = validate(schema, json!({"a": [1, "x"]}));
    assert_eq!(result.errors().len(), 1);
    let error = result.errors()[0].clone();
    assert_eq!(error.instance_location(), "/a/1");
    assert_eq!(
        error.absolute_keyword_location(),
        "json-schema:///#/properties/a/items"
    );
    assert_eq!(error.message(), "Expected integer, found string");
}

#[test]
fn items_list_with_additional_items() {
    let schema = json!({
        "items": [{"type": "integer"}, {"type": "string"}],
        "additionalItems": {"type": "boolean"}
    });
    assert!(validate(schema.clone(), json!([1, "a", true, false])).is_valid());
    let result = validate(schema, json!([1, "a", 5]));
    assert_eq!(result.errors().len(), 1);
    assert_eq!(result.errors()[0].instance_location(), "/2");
}

#[test]
fn items_without_additional_stop_checking() {
    let schema = json!({"items": [{"type": "integer"}]});
    assert!(validate(schema, json!([1, "anything", null])).is_valid());
}

#[test]
fn contains_aggregates_attempts() {
    let schema = json!({"type": "array", "contains": {"type": "integer"}});
    assert!(validate(schema.clone(), json!(["a", 3])).is_valid());
    let result = validate(schema, json!(["a", "b"]));
    assert_eq!(result.errors().len(), 1);
    assert_eq!(result.errors()[0].keyword(), "contains");
    assert_eq!(result.errors()[0].nested().len(), 2);
}

#[test]
fn property_names_validates_keys() {
    let schema = json!({"propertyNames": {"maxLength": 3}});
    assert!(validate(schema.clone(), json!({"abc": 1})).is_valid());
    let result = validate(schema, json!({"abcd": 1}));
    assert_eq!(result.errors().len(), 1);
    assert_eq!(result.errors()[0].keyword(), "maxLength");
}

#[test]
fn dependencies_as_required_list() {
    let schema = json!({"dependencies": {"credit_card": ["billing_address"]}});
    assert!(validate(schema.clone(), json!({"name": "x"})).is_valid());
    let result = validate(schema, json!({"credit_card": "1234"}));
    assert_eq!(result.errors().len(), 1);
    assert_eq!(
        result.errors()[0].message(),
        "Required property \"billing_address\" not found"
    );
}

#[test]
fn dependencies_as_subschema() {
    let schema = json!({
        "dependencies": {
            "credit_card": {"properties": {"cvv": {"type": "integer"}}}
        }
    });
    assert!(validate(schema.clone(), json!({"credit_card": "1234", "cvv": 123})).is_valid());
    assert!(!validate(schema, json!({"credit_card": "1234", "cvv": "nope"})).is_valid());
}

#[test]
fn if_then_else_branches() {
    let schema = json!({
        "if": {"type": "integer"},
        "then": {"minimum": 10},
        "else": {"maxLength": 2}
    });
    assert!(validate(schema.clone(), json!(15)).is_valid());
    assert!(!validate(schema.clone(), json!(5)).is_valid());
    assert!(validate(schema.clone(), json!("ab")).is_valid());
    let result = validate(schema, json!("abc"));
    assert_eq!(result.errors().len(), 1);
    assert_eq!(result.errors()[0].keyword(), "maxLength");
}

#[test]
fn bare_if_is_inert() {
    let schema = json!({"if": {"type": "integer"}});
    assert!(validate(schema, json!("anything")).is_valid());
}

#[test]
fn not_inverts() {
    let schema = json!({"not": {"type": "string"}});
    assert!(validate(schema.clone(), json!(42)).is_valid());
    let result = validate(schema, json!("text"));
    assert_eq!(result.errors().len(), 1);
    assert_eq!(
        result.errors()[0].message(),
        "Instance must not be valid against schema"
    );
}

#[test]
fn all_of_reports_with_nested_context() {
    let schema = json!({"allOf": [{"type": "integer"}, {"minimum": 10}]});
    assert!(validate(schema.clone(), json!(12)).is_valid());
    let result = validate(schema, json!("x"));
    assert_eq!(result.errors().len(), 1);
    assert_eq!(result.errors()[0].keyword(), "allOf");
    assert!(!result.errors()[0].nested().is_empty());
}

#[test]
fn any_of_short_circuits() {
    let schema = json!({"anyOf": [{"type": "integer"}, {"type": "string"}]});
    assert!(validate(schema.clone(), json!(3)).is_valid());
    assert!(validate(schema.clone(), json!("x")).is_valid());
    let result = validate(schema, json!(null));
    assert_eq!(result.errors().len(), 1);
    assert_eq!(result.errors()[0].keyword(), "anyOf");
    assert_eq!(result.errors()[0].nested().len(), 2);
}

#[test]
fn enum_and_const() {
    assert!(validate(json!({"enum": ["red", "green"]}), json!("red")).is_valid());
    assert!(!validate(json!({"enum": ["red", "green"]}), json!("blue")).is_valid());
    assert!(validate(json!({"const": 3}), json!(3)).is_valid());
    let result = validate(json!({"const": 3}), json!(4));
    assert_eq!(result.errors()[0].message(), "Instance is not const");
}

#[test]
fn false_schema_always_fails() {
    let schema = json!({"properties": {"x": false}});
    assert!(validate(schema.clone(), json!({})).is_valid());
    let result = validate(schema, json!({"x": 1}));
    assert_eq!(result.errors().len(), 1);
    assert_eq!(result.errors()[0].message(), "False schema always fails");
}

#[test]
fn ref_into_definitions() {
    let schema = json!({
        "definitions": {"positive": {"type": "integer", "minimum": 1}},
        "type": "object",
        "properties": {"count": {"$ref": "#/definitions/positive"}}
    });
    assert!(validate(schema.clone(), json!({"count": 3})).is_valid());
    assert!(!validate(schema, json!({"count": 0})).is_valid());
}

#[test]
fn forward_reference_resolves() {
    // "a" references "b" before "b" has been built.
    let schema = json!({
        "definitions": {
            "a": {"properties": {"next": {"$ref": "#/definitions/b"}}},
            "b": {"type": "integer"}
        },
        "$ref": "#/definitions/a"
    });
    assert!(validate(schema.clone(), json!({"next": 1})).is_valid());
    assert!(!validate(schema, json!({"next": "x"})).is_valid());
}

#[test]
fn recursive_reference_terminates() {
    let schema = json!({
        "type": "object",
        "properties": {
            "name": {"type": "string"},
            "child": {"$ref": "#"}
        }
    });
    let valid = json!({"name": "a", "child": {"name": "b", "child": {"name": "c"}}});
    assert!(validate(schema.clone(), valid).is_valid());
    let invalid = json!({"name": "a", "child": {"name": "b", "child": {"name": 3}}});
    let result = validate(schema, invalid);
    assert_eq!(result.errors().len(), 1);
    assert_eq!(result.errors()[0].instance_location(), "/child/child/name");
}

#[test]
fn mutually_recursive_references() {
    let schema = json!({
        "definitions": {
            "even": {
                "properties": {"next": {"$ref": "#/definitions/odd"}},
                "required": ["level"]
            },
            "odd": {
                "properties": {"next": {"$ref": "#/definitions/even"}}
            }
        },
        "$ref": "#/definitions/even"
    });
    let compiled = JsonSchema::compile(&schema).expect("cyclic graph compiles");
    assert!(compiled.is_valid(&json!({"level": 0, "next": {"next": {"level": 2}}})));
    assert!(!compiled.is_valid(&json!({"level": 0, "next": {"next": {}}})));
}

#[test]
fn reference_into_unknown_keyword() {
    let schema = json!({
        "x-templates": {"identifier": {"type": "string", "minLength": 1}},
        "properties": {"id": {"$ref": "#/x-templates/identifier"}}
    });
    assert!(validate(schema.clone(), json!({"id": "a"})).is_valid());
    assert!(!validate(schema, json!({"id": ""})).is_valid());
}

#[test]
fn unresolved_reference_fails_compilation() {
    let schema = json!({"$ref": "#/definitions/missing"});
    match JsonSchema::compile(&schema) {
        Err(SchemaError::UnresolvedReference(uri)) => {
            assert!(uri.contains("/definitions/missing"))
        }
        other => panic!("expected unresolved reference, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn duplicate_id_fails_compilation() {
    let schema = json!({
        "definitions": {
            "a": {"$id": "http://example.com/shared", "type": "integer"},
            "b": {"$id": "http://example.com/shared", "type": "string"}
        }
    });
    assert!(matches!(
        JsonSchema::compile(&schema),
        Err(SchemaError::DuplicateIdentifier(_))
    ));
}

#[test]
fn id_gives_schemas_addresses() {
    let schema = json!({
        "$id": "http://example.com/root.json",
        "definitions": {
            "item": {"$id": "item.json", "type": "integer"}
        },
        "type": "array",
        "items": {"$ref": "item.json"}
    });
    assert!(validate(schema.clone(), json!([1, 2])).is_valid());
    assert!(!validate(schema, json!(["x"])).is_valid());
}

#[test]
fn validate_at_registered_uri() {
    let schema = json!({
        "definitions": {"positive": {"type": "integer", "minimum": 1}}
    });
    let compiled = JsonSchema::compile(&schema).unwrap();
    let result = compiled
        .validate_at("json-schema:///#/definitions/positive", &json!(5))
        .unwrap();
    assert!(result.is_valid());
    let result = compiled
        .validate_at("json-schema:///#/definitions/positive", &json!(0))
        .unwrap();
    assert!(!result.is_valid());
    assert!(compiled
        .validate_at("json-schema:///#/definitions/absent", &json!(5))
        .is_err());
}

#[test]
fn base64_content_is_decoded() {
    // "eyJhIjogMX0=" is `{"a": 1}`.
    let schema = json!({
        "type": "string",
        "contentEncoding": "base64",
        "contentMediaType": "application/json"
    });
    assert!(validate(schema.clone(), json!("eyJhIjogMX0=")).is_valid());

    let result = validate(schema.clone(), json!("!!! not base64 !!!"));
    assert!(result
        .errors()
        .iter()
        .any(|error| error.keyword() == "contentEncoding"
            && error.message() == "Content is not a base64 string"));

    // "bm90IGpzb24=" is `not json`.
    let result = validate(schema, json!("bm90IGpzb24="));
    assert!(result
        .errors()
        .iter()
        .any(|error| error.keyword() == "contentMediaType"
            && error.message().starts_with("Content is not JSON:")));
}

#[test]
fn unknown_content_encoding_is_reported() {
    let result = validate(
        json!({"type": "string", "contentEncoding": "quoted-printable"}),
        json!("anything"),
    );
    assert_eq!(result.errors().len(), 1);
    assert_eq!(
        result.errors()[0].message(),
        "unable to check for contentEncoding 'quoted-printable'"
    );
}

#[test_case("ipv4", "192.168.0.1", true)]
#[test_case("ipv4", "999.1.1.1", false)]
#[test_case("date", "1963-06-19", true)]
#[test_case("date", "yesterday", false)]
#[test_case("unknown-format", "anything goes", true; "unknown formats are accepted")]
fn formats(format: &str, instance: &str, expected: bool) {
    let schema = json!({"type": "string", "format": format});
    assert_eq!(validate(schema, json!(instance)).is_valid(), expected);
}

#[test]
fn custom_format_checker() {
    fn is_even(value: &str) -> bool {
        value.parse::<u64>().map_or(false, |n| n % 2 == 0)
    }
    let schema = CompilationOptions::new()
        .with_format("even-number", is_even)
        .compile(&json!({"type": "string", "format": "even-number"}))
        .unwrap();
    assert!(schema.is_valid(&json!("12")));
    assert!(!schema.is_valid(&json!("13")));
}

#[test]
fn custom_root_uri_shows_in_locations() {
    let schema = CompilationOptions::new()
        .with_root_uri("https://example.com/api/person.json")
        .compile(&json!({"type": "object", "required": ["name"]}))
        .unwrap();
    let result = schema.validate(&json!({}));
    assert_eq!(
        result.errors()[0].absolute_keyword_location(),
        "https://example.com/api/person.json#/required"
    );
}

#[test]
fn all_failures_are_reported_in_one_pass() {
    let schema = json!({
        "type": "object",
        "minProperties": 2,
        "propertyNames": {"minLength": 3}
    });
    let result = validate(schema, json!({"a": 3}));
    assert_eq!(result.errors().len(), 2);
    assert_eq!(result.errors()[0].keyword(), "minProperties");
    assert_eq!(result.errors()[1].keyword(), "minLength");
}

#[test]
fn errors_do_not_cancel_patch() {
    let schema = json!({
        "type": "object",
        "required": ["name"],
        "properties": {"x": {"default": 1}}
    });
    let result = validate(schema, json!({}));
    assert!(!result.is_valid());
    assert_eq!(result.patch().len(), 1);
}

#[test]
fn compiled_schema_is_shareable_across_threads() {
    use std::sync::Arc;

    let schema = json!({"type": "array", "items": {"type": "integer"}});
    let compiled = Arc::new(JsonSchema::compile(&schema).unwrap());
    let handles: Vec<_> = (0..4)
        .map(|index| {
            let compiled = Arc::clone(&compiled);
            std::thread::spawn(move || {
                let instance = json!([index, index + 1]);
                assert!(compiled.is_valid(&instance));
                assert!(!compiled.is_valid(&json!(["text"])));
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn boolean_schemas_at_the_root() {
    assert!(validate(json!(true), json!({"anything": []})).is_valid());
    let result = validate(json!(false), json!(1));
    assert_eq!(result.errors().len(), 1);
    assert_eq!(result.errors()[0].keyword(), "false");
}

#[test]
fn invalid_schemas_are_rejected() {
    assert!(matches!(
        JsonSchema::compile(&json!([1])),
        Err(SchemaError::Schema(_))
    ));
    assert!(matches!(
        JsonSchema::compile(&json!({"type": "everything"})),
        Err(SchemaError::Schema(_))
    ));
    assert!(matches!(
        JsonSchema::compile(&json!({"pattern": "(unclosed"})),
        Err(SchemaError::Schema(_))
    ));
}
