//! Integration tests for the JSON command protocol.

use glam::Vec3;
use scene_editor_lib::command::{execute_json, execute_json_batch};
use scene_editor_lib::harness::TestHarness;
use serde_json::json;

#[test]
fn test_create_pick_select_flow() {
    let mut h = TestHarness::new();
    let resp = execute_json(
        &mut h.editor,
        r#"{"command": "create_object", "type": "box", "name": "Crate", "params": {"width": 1.0, "height": 1.0, "depth": 1.0}}"#,
    )
    .unwrap();
    assert!(resp.success);
    let id = resp.data.unwrap()["id"].as_str().unwrap().to_string();

    let (x, y) = h.screen_point(Vec3::new(0.1, 0.5, 0.1));
    let cmd = json!({ "command": "pick", "x": x, "y": y, "modifiers": { "face": true } });
    let resp = execute_json(&mut h.editor, &cmd.to_string()).unwrap();
    let data = resp.data.unwrap();
    assert_eq!(data["hit"]["object"], id.as_str());
    assert_eq!(data["hit"]["hit"]["kind"], "face");
    assert_eq!(data["hit"]["hit"]["face"], 2);
    // picking alone does not select
    assert!(h.selection().is_none());

    let cmd = json!({ "command": "select", "x": x, "y": y });
    let resp = execute_json(&mut h.editor, &cmd.to_string()).unwrap();
    let data = resp.data.unwrap();
    assert_eq!(data["selection"]["kind"], "object");
    assert_eq!(data["selection"]["object"], id.as_str());
}

#[test]
fn test_pick_miss_returns_null_hit() {
    let mut h = TestHarness::new();
    let (x, y) = h.screen_point(Vec3::new(4.0, 0.0, 4.0));
    let cmd = json!({ "command": "pick", "x": x, "y": y });
    let resp = execute_json(&mut h.editor, &cmd.to_string()).unwrap();
    assert!(resp.success);
    assert!(resp.data.unwrap()["hit"].is_null());
}

#[test]
fn test_translate_and_delete() {
    let mut h = TestHarness::new();
    let id = h.create_cube("c1", 1.0, 1.0, 1.0);

    let cmd = json!({ "command": "translate", "id": id, "delta": [1.0, 0.0, -2.0] });
    let resp = execute_json(&mut h.editor, &cmd.to_string()).unwrap();
    assert!(resp.success);
    assert_eq!(resp.data.unwrap()["position"], json!([1.0, 0.0, -2.0]));

    let cmd = json!({ "command": "delete_object", "id": id });
    assert!(execute_json(&mut h.editor, &cmd.to_string()).unwrap().success);
    assert_eq!(h.object_count(), 0);

    let resp = execute_json(&mut h.editor, &cmd.to_string()).unwrap();
    assert!(!resp.success);
    assert!(resp.error.unwrap().contains("not found"));
}

#[test]
fn test_gizmo_poll_and_drag_via_pointer_commands() {
    let mut h = TestHarness::new();
    let id = h.create_cube("c1", 1.0, 1.0, 1.0);

    let resp = execute_json(&mut h.editor, r#"{"command": "poll_gizmo"}"#).unwrap();
    assert_eq!(resp.data.unwrap()["ready"], true);
    let cmd = json!({ "command": "select_object", "id": id });
    execute_json(&mut h.editor, &cmd.to_string()).unwrap();

    let (x0, y0) = h.screen_point(Vec3::new(0.0, 0.0, 0.7));
    let (x1, y1) = h.screen_point(Vec3::new(0.0, 0.0, 2.2));
    let batch = json!([
        { "command": "pointer_down", "x": x0, "y": y0 },
        { "command": "pointer_move", "x": x1, "y": y1 },
        { "command": "pointer_up", "x": x1, "y": y1 }
    ]);
    let responses = execute_json_batch(&mut h.editor, &batch.to_string()).unwrap();
    let outcomes: Vec<_> = responses
        .iter()
        .map(|r| r.data.as_ref().unwrap()["outcome"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        outcomes,
        vec!["gizmo_drag_started", "gizmo_moved", "gizmo_drag_ended"]
    );

    let pos = h.editor.scene().get(&id).unwrap().transform.position;
    assert!((pos[2] - 1.5).abs() < 1e-3, "{:?}", pos);
}

#[test]
fn test_clear_command() {
    let mut h = TestHarness::new();
    h.create_cube("c1", 1.0, 1.0, 1.0);
    h.create_sphere("s1", 0.5);
    let resp = execute_json(&mut h.editor, r#"{"command": "clear"}"#).unwrap();
    assert!(resp.success);
    assert_eq!(h.object_count(), 0);
    assert_eq!(h.renderer().mesh_count(), 0);
}

#[test]
fn test_import_invalid_document_reports_error() {
    let mut h = TestHarness::new();
    h.create_cube("c1", 1.0, 1.0, 1.0);
    let resp = execute_json(
        &mut h.editor,
        r#"{"command": "import_scene", "document": {"objects": 5}}"#,
    )
    .unwrap();
    assert!(!resp.success);
    assert!(resp.error.unwrap().contains("invalid scene document"));
    assert_eq!(h.object_count(), 1);
}

#[test]
fn test_unknown_command_is_rejected() {
    let mut h = TestHarness::new();
    assert!(execute_json(&mut h.editor, r#"{"command": "undo"}"#).is_err());
}
