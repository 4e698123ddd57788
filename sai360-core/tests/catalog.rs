use sai360_core::extract::{CLASS_ATTRIBUTES, DATASTORES, TABLE_CLASSES};
use sai360_core::{decode_list, strip_tags, ClassAttribute, DatastoreEntry, TableEntry};
use serde_json::json;

#[test]
fn datastores_decode_from_entries() {
    let body = json!({
        "entries": [
            { "identifier": "risks_open", "label": "Open risks", "type": "SQL", "objectId": 991 }
        ]
    });
    let entries: Vec<DatastoreEntry> = decode_list(&body, DATASTORES).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].display_name(), "Open risks (risks_open)");
    assert_eq!(entries[0].kind.as_deref(), Some("SQL"));
    assert_eq!(entries[0].object_id.as_deref(), Some("991"));
}

#[test]
fn tables_fall_back_to_name_for_label() {
    let body = json!({ "classes": [{ "name": "Risk" }, { "name": "Control", "label": "Controls" }] });
    let tables: Vec<TableEntry> = decode_list(&body, TABLE_CLASSES).unwrap();
    assert_eq!(tables[0].display_name(), "Risk (Risk)");
    assert_eq!(tables[1].display_name(), "Controls (Control)");
}

#[test]
fn attributes_and_missing_lists() {
    let body = json!([{ "name": "uuid" }, { "name": "owner", "label": "Owner", "type": "reference" }]);
    let attrs: Vec<ClassAttribute> = decode_list(&body, CLASS_ATTRIBUTES).unwrap();
    assert_eq!(attrs[1].display_name(), "Owner");

    let none: Vec<ClassAttribute> = decode_list(&json!({ "status": "ok" }), CLASS_ATTRIBUTES).unwrap();
    assert!(none.is_empty());
}

#[test]
fn malformed_items_are_errors() {
    let body = json!({ "entries": [{ "label": "no identifier" }] });
    assert!(decode_list::<DatastoreEntry>(&body, DATASTORES).is_err());
}

#[test]
fn strip_tags_keeps_text() {
    assert_eq!(
        strip_tags("<html><body><h1>BWise</h1> 6.4.2 (build 118)</body></html>\n"),
        "BWise 6.4.2 (build 118)"
    );
}
