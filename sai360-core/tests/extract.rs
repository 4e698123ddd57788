use sai360_core::extract::{CLASS_ATTRIBUTES, DATASTORES, RECORDS, TABLE_CLASSES};
use sai360_core::{extract_list, Extracted};
use serde_json::json;

#[test]
fn bare_array_matches_root() {
    let body = json!([{ "name": "Risk" }, { "name": "Control" }]);
    match extract_list(&body, TABLE_CLASSES) {
        Extracted::Found { field, items } => {
            assert_eq!(field, "$");
            assert_eq!(items.len(), 2);
        }
        Extracted::NotFound => panic!("expected root array"),
    }
}

#[test]
fn fields_are_tried_in_order() {
    let body = json!({ "entries": [1], "items": [1, 2], "classes": [1, 2, 3] });
    let Extracted::Found { field, items } = extract_list(&body, TABLE_CLASSES) else {
        panic!("expected a match");
    };
    assert_eq!(field, "classes");
    assert_eq!(items.len(), 3);

    let body = json!({ "properties": [{ "name": "uuid" }], "fields": [{ "name": "title" }] });
    let Extracted::Found { field, .. } = extract_list(&body, CLASS_ATTRIBUTES) else {
        panic!("expected a match");
    };
    assert_eq!(field, "fields");
}

#[test]
fn non_array_fields_are_skipped() {
    let body = json!({ "items": { "not": "a list" }, "instances": [{ "uuid": "1" }] });
    let Extracted::Found { field, .. } = extract_list(&body, RECORDS) else {
        panic!("expected a match");
    };
    assert_eq!(field, "instances");
}

#[test]
fn missing_shapes_report_not_found() {
    let body = json!({ "total": 0 });
    let result = extract_list(&body, DATASTORES);
    assert!(!result.is_found());
    assert!(result.items().is_empty());

    assert_eq!(extract_list(&json!([]), DATASTORES), Extracted::NotFound);
}
