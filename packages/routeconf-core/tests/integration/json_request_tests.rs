//! Requests loaded from their JSON form, as the command-line tool does.

use pretty_assertions::assert_eq;
use serde_json::json;

use routeconf_core::{analyze, HasPosition, Position, RequestSyntax};

use super::helpers::fixture;

#[test]
fn test_patch_fixture_to_json_directive() {
    let req = RequestSyntax::from_json(&fixture("patch_fdr.json")).unwrap();
    let directive = analyze(&req).unwrap();

    let value = serde_json::to_value(&directive).unwrap();
    assert_eq!(value["directive"], json!("patch"));
    assert_eq!(value["target"]["ocn"], json!(7));
    assert_eq!(value["target"]["one"]["name"], json!("fdr"));
    assert_eq!(value["change"]["addr"]["value"], json!("10.0.0.5:5432"));
    assert_eq!(
        value["change"]["addr"]["pos"],
        json!({ "line": 2, "column": 10 })
    );
    assert_eq!(value["change"]["dbname_rewritten"]["value"], json!("fdr_v2"));
    assert_eq!(value["change"]["dbname_in"], json!(null));
    assert_eq!(value["change"]["lock"], json!(null));
}

#[test]
fn test_create_with_ocn_fixture_is_rejected() {
    let req = RequestSyntax::from_json(&fixture("create_with_ocn.json")).unwrap();
    let err = analyze(&req).unwrap_err();
    assert!(err.is_bad_target());
    assert_eq!(err.position(), Position::new(1, 9));
}

#[test]
fn test_get_all_fixture() {
    let req = RequestSyntax::from_json(&fixture("get_all.json")).unwrap();
    let value = serde_json::to_value(analyze(&req).unwrap()).unwrap();
    assert_eq!(
        value,
        json!({
            "directive": "get",
            "pos": { "line": 1, "column": 1 },
            "target": { "kind": "all", "pos": { "line": 1, "column": 5 } }
        })
    );
}

#[test]
fn test_syntax_round_trips_through_json() {
    let req = RequestSyntax::from_json(&fixture("patch_fdr.json")).unwrap();
    let text = serde_json::to_string(&req).unwrap();
    let again = RequestSyntax::from_json(&text).unwrap();
    assert_eq!(req, again);
    assert_eq!(analyze(&req).unwrap(), analyze(&again).unwrap());
}

#[test]
fn test_unknown_action_kind_fails_to_load() {
    let text = r#"{
        "action": { "kind": "rename", "pos": { "line": 1, "column": 1 } },
        "target": { "kind": "all", "pos": { "line": 1, "column": 8 } }
    }"#;
    assert!(RequestSyntax::from_json(text).is_err());
}
