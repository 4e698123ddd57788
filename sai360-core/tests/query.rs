use chrono::NaiveDate;
use sai360_core::{ExportFormat, InstanceQuery, RefMode};

fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
    items
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn export_params_wrap_the_query_in_the_class() {
    let query = InstanceQuery::new("Risk")
        .query("name='Fraud'")
        .sub_types(true)
        .meta_info(true)
        .published_since(NaiveDate::from_ymd_opt(2024, 3, 7).unwrap());

    assert_eq!(
        query.export_params(),
        pairs(&[
            ("class", "Risk"),
            ("refMode", "guid"),
            ("query", "Risk[name='Fraud']"),
            ("subTypes", "true"),
            ("metaInfo", "true"),
            ("publishedSince", "20240307"),
        ])
    );
}

#[test]
fn minimal_export_params() {
    let query = InstanceQuery::new("Control").ref_mode(RefMode::Label).query("");
    assert_eq!(
        query.export_params(),
        pairs(&[("class", "Control"), ("refMode", "label")])
    );
}

#[test]
fn form_fields_always_carry_sub_types() {
    let query = InstanceQuery::new("Risk")
        .query("owner='x'")
        .follow_references("owner");
    assert_eq!(
        query.form_fields(),
        pairs(&[
            ("class", "Risk"),
            ("refMode", "guid"),
            ("query", "Risk[owner='x']"),
            ("subTypes", "false"),
            ("followReferences", "Risk[owner]"),
        ])
    );
}

#[test]
fn result_params_only_list_enabled_flags() {
    assert!(InstanceQuery::new("Risk").result_params().is_empty());
    assert_eq!(
        InstanceQuery::new("Risk").workflow(true).result_params(),
        pairs(&[("workflow", "true")])
    );
}

#[test]
fn export_format_sets_accept() {
    assert_eq!(ExportFormat::Xml.accept(), "application/xml");
    assert_eq!(ExportFormat::Zip.accept(), "application/zip");
}
