use serde_json::Value;
use tonalcli::tonal::parse::Payload;
use tonalcli::types::{Artist, Release};

// Minimal converter used where the domain converters would get in the way:
// accepts any object with a string "id", rejects everything else.
fn id_of(value: &Value) -> Option<String> {
    value
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[test]
fn test_array_skips_malformed_items_and_preserves_order() {
    let raw = r#"[{"id":"1"},{"id":"2"},null,{"bogus":true},{"id":"3"}]"#;

    let items = Payload::Array.parse(raw, id_of).unwrap();

    // Only the convertible items survive, in document order
    assert_eq!(items, vec!["1", "2", "3"]);
}

#[test]
fn test_array_with_domain_converter() {
    let raw = r#"[{"id":"a1","name":"Asha"},{"id":"a2"},{"id":"a3","name":"Trio"}]"#;

    let artists = Payload::Array.parse(raw, Artist::from_value).unwrap();

    // The middle element has no name and is skipped, not fatal
    assert_eq!(artists.len(), 2);
    assert_eq!(artists[0].name, "Asha");
    assert_eq!(artists[1].name, "Trio");
}

#[test]
fn test_array_on_non_array_root_yields_empty_list() {
    let items = Payload::Array.parse(r#"{"id":"1"}"#, id_of).unwrap();
    assert!(items.is_empty());
}

#[test]
fn test_named_list_on_empty_array() {
    let items = Payload::NamedList("items")
        .parse(r#"{"items": []}"#, id_of)
        .unwrap();

    // An empty collection is a successful empty result, not an error
    assert!(items.is_empty());
}

#[test]
fn test_named_list_with_missing_key() {
    let items = Payload::NamedList("items")
        .parse(r#"{"total": 0}"#, id_of)
        .unwrap();

    // Endpoints omit empty collections entirely; that is still empty, not an error
    assert!(items.is_empty());
}

#[test]
fn test_named_list_with_non_array_value() {
    let items = Payload::NamedList("items")
        .parse(r#"{"items": 17}"#, id_of)
        .unwrap();
    assert!(items.is_empty());
}

#[test]
fn test_named_list_converts_items() {
    let raw = r#"{"items":[{"id":"r1","name":"One"},{"id":"r2","name":"Two"}],"total":2}"#;

    let releases = Payload::NamedList("items")
        .parse(raw, Release::from_value)
        .unwrap();

    assert_eq!(releases.len(), 2);
    assert_eq!(releases[0].id, "r1");
    assert_eq!(releases[1].id, "r2");
}

#[test]
fn test_single_item_success_wraps_into_one_element_list() {
    let items = Payload::SingleItem.parse(r#"{"id":"x"}"#, id_of).unwrap();
    assert_eq!(items, vec!["x"]);
}

#[test]
fn test_single_item_converter_rejection_yields_empty_list() {
    let items = Payload::SingleItem
        .parse(r#"{"unexpected": true}"#, id_of)
        .unwrap();
    assert!(items.is_empty());
}

#[test]
fn test_invalid_json_text_is_an_error() {
    let result = Payload::Array.parse("not json at all", id_of);
    assert!(result.is_err());

    let result = Payload::NamedList("items").parse("{\"items\": [", id_of);
    assert!(result.is_err());
}
