//! JSON command protocol for driving the editor from scripts and agents.

use serde::{Deserialize, Serialize};
use serde_json::json;
use shared::{Shape, Transform};

use crate::editor::Editor;
use crate::render::SceneRenderer;
use crate::state::selection::Selection;
use crate::state::sketch::SketchMode;
use crate::viewport::picking::{Hit, PickModifiers};

/// A command the editor can execute.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum AgentCommand {
    /// Create an object from a document-style type tag and params
    CreateObject {
        #[serde(default)]
        name: Option<String>,
        #[serde(rename = "type")]
        kind: String,
        #[serde(default)]
        params: serde_json::Value,
        #[serde(default)]
        transform: Transform,
        #[serde(default)]
        color: Option<[f32; 3]>,
    },
    /// Delete an object by ID
    DeleteObject {
        id: String,
    },
    /// Move an object by a world-space offset
    Translate {
        id: String,
        delta: [f64; 3],
    },
    /// Clear the entire scene.
    Clear,
    /// Resolve a pointer position without changing the selection.
    Pick {
        x: f32,
        y: f32,
        #[serde(default)]
        modifiers: PickModifiers,
    },
    /// Pick at a pointer position and apply the result to the selection.
    Select {
        x: f32,
        y: f32,
        #[serde(default)]
        modifiers: PickModifiers,
    },
    /// Select a whole object by ID.
    SelectObject {
        id: String,
    },
    /// Clear selection.
    ClearSelection,
    SetSketchMode {
        mode: SketchMode,
    },
    PointerDown {
        x: f32,
        y: f32,
        #[serde(default)]
        modifiers: PickModifiers,
    },
    PointerMove {
        x: f32,
        y: f32,
    },
    PointerUp {
        x: f32,
        y: f32,
    },
    /// Leave sketch mode and drop the selection.
    Cancel,
    /// Advance gizmo initialization by one step.
    PollGizmo,
    /// Inspect the scene: list all objects and the selection.
    Inspect,
    /// Export the scene document.
    ExportScene,
    /// Replace the scene with a document.
    ImportScene {
        document: serde_json::Value,
    },
}

/// Response from executing a command.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl CommandResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
            data: None,
        }
    }

    fn ok_with_data(data: serde_json::Value) -> Self {
        Self {
            success: true,
            error: None,
            data: Some(data),
        }
    }

    fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(msg.into()),
            data: None,
        }
    }
}

impl<E: std::fmt::Display> From<Result<serde_json::Value, E>> for CommandResponse {
    fn from(result: Result<serde_json::Value, E>) -> Self {
        match result {
            Ok(data) => Self::ok_with_data(data),
            Err(e) => Self::err(e.to_string()),
        }
    }
}

fn hit_json(hit: &Hit) -> serde_json::Value {
    json!({
        "object": hit.object,
        "hit": hit.kind,
        "point": hit.point.to_array(),
        "triangle": hit.triangle,
        "distance": hit.distance,
    })
}

fn selection_json(selection: &Selection) -> serde_json::Value {
    serde_json::to_value(selection).unwrap_or(serde_json::Value::Null)
}

/// Execute a single command on the editor.
pub fn execute_command<R: SceneRenderer>(
    editor: &mut Editor<R>,
    cmd: AgentCommand,
) -> CommandResponse {
    match cmd {
        AgentCommand::CreateObject {
            name,
            kind,
            params,
            transform,
            color,
        } => {
            let result = Shape::from_params(&kind, params)
                .map_err(crate::error::EditorError::from)
                .and_then(|shape| editor.create_object(name, shape, transform, color))
                .map(|id| json!({ "id": id }));
            result.into()
        }

        AgentCommand::DeleteObject { id } => {
            editor.remove_object(&id).map(|_| json!({ "removed": id })).into()
        }

        AgentCommand::Translate { id, delta } => editor
            .translate_object(&id, delta)
            .map(|_| {
                let position = editor.scene().get(&id).map(|o| o.transform.position);
                json!({ "id": id, "position": position })
            })
            .into(),

        AgentCommand::Clear => {
            editor.cancel();
            editor.clear_scene();
            CommandResponse::ok()
        }

        AgentCommand::Pick { x, y, modifiers } => {
            let hit = editor.pick(x, y, modifiers);
            CommandResponse::ok_with_data(json!({ "hit": hit.as_ref().map(hit_json) }))
        }

        AgentCommand::Select { x, y, modifiers } => {
            let hit = editor.pick(x, y, modifiers);
            let selection = editor.select(hit.as_ref());
            CommandResponse::ok_with_data(json!({ "selection": selection_json(selection) }))
        }

        AgentCommand::SelectObject { id } => {
            if editor.scene().get(&id).is_none() {
                return CommandResponse::err(format!("Object not found: {id}"));
            }
            let selection = editor.select_target(Selection::Object { object: id });
            CommandResponse::ok_with_data(json!({ "selection": selection_json(selection) }))
        }

        AgentCommand::ClearSelection => {
            editor.clear_selection();
            CommandResponse::ok()
        }

        AgentCommand::SetSketchMode { mode } => {
            editor.set_sketch_mode(mode);
            CommandResponse::ok_with_data(json!({ "mode": mode }))
        }

        AgentCommand::PointerDown { x, y, modifiers } => {
            serde_json::to_value(editor.pointer_down(x, y, modifiers)).into()
        }

        AgentCommand::PointerMove { x, y } => serde_json::to_value(editor.pointer_move(x, y)).into(),

        AgentCommand::PointerUp { x, y } => serde_json::to_value(editor.pointer_up(x, y)).into(),

        AgentCommand::Cancel => {
            editor.cancel();
            CommandResponse::ok()
        }

        AgentCommand::PollGizmo => {
            let ready = editor.poll_gizmo();
            let gizmo = editor.gizmo();
            CommandResponse::ok_with_data(json!({
                "ready": ready,
                "failed": gizmo.is_failed(),
                "attempts": gizmo.attempts(),
                "failure": gizmo.failure(),
            }))
        }

        AgentCommand::Inspect => {
            let objects: Vec<serde_json::Value> = editor
                .scene()
                .objects()
                .iter()
                .map(|obj| {
                    json!({
                        "id": obj.id,
                        "name": obj.name,
                        "type": obj.kind().as_str(),
                        "position": obj.transform.position,
                        "triangles": obj.geometry.triangle_count(),
                        "faces": obj.topology.faces.len(),
                        "edges": obj.topology.edges.len(),
                        "selectable_edges": obj.topology.selectable_edges().count(),
                    })
                })
                .collect();
            CommandResponse::ok_with_data(json!({
                "object_count": objects.len(),
                "objects": objects,
                "selection": selection_json(editor.current_selection()),
                "sketch_mode": editor.sketch_mode(),
            }))
        }

        AgentCommand::ExportScene => editor
            .export_scene()
            .and_then(|doc| Ok(serde_json::to_value(doc)?))
            .into(),

        AgentCommand::ImportScene { document } => editor
            .import_scene(&document)
            .and_then(|report| Ok(serde_json::to_value(report)?))
            .into(),
    }
}

/// Parse and execute a single JSON command string.
pub fn execute_json<R: SceneRenderer>(
    editor: &mut Editor<R>,
    json: &str,
) -> Result<CommandResponse, String> {
    let cmd: AgentCommand =
        serde_json::from_str(json).map_err(|e| format!("Invalid command JSON: {e}"))?;
    Ok(execute_command(editor, cmd))
}

/// Parse and execute multiple JSON commands (array).
pub fn execute_json_batch<R: SceneRenderer>(
    editor: &mut Editor<R>,
    json: &str,
) -> Result<Vec<CommandResponse>, String> {
    let cmds: Vec<AgentCommand> =
        serde_json::from_str(json).map_err(|e| format!("Invalid commands JSON: {e}"))?;
    Ok(cmds
        .into_iter()
        .map(|cmd| execute_command(editor, cmd))
        .collect())
}
