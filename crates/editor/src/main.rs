use std::io::{BufRead, Write};

use scene_editor_lib::command::{execute_json, CommandResponse};
use scene_editor_lib::render::HeadlessRenderer;
use scene_editor_lib::state::settings::EditorSettings;
use scene_editor_lib::Editor;

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scene_editor=info,scene_editor_lib=info".into()),
        )
        .init();

    let mut editor = Editor::new(HeadlessRenderer::new(), EditorSettings::load());
    editor.poll_gizmo();

    if let Some(path) = parse_scene_arg() {
        load_scene(&mut editor, &path);
    } else if has_flag("--restore") {
        match editor.restore_autosave() {
            Ok(Some(report)) => tracing::info!(
                "Restored autosave ({} objects, {} skipped)",
                report.imported.len(),
                report.skipped
            ),
            Ok(None) => tracing::info!("No autosave to restore"),
            Err(e) => tracing::error!("Failed to restore autosave: {e}"),
        }
    }

    // One JSON command per line on stdin, one response per line on stdout
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("Failed to read command: {e}");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = execute_json(&mut editor, &line).unwrap_or_else(|e| CommandResponse {
            success: false,
            error: Some(e),
            data: None,
        });
        match serde_json::to_string(&response) {
            Ok(json) => {
                if writeln!(stdout, "{json}").and_then(|_| stdout.flush()).is_err() {
                    break;
                }
            }
            Err(e) => tracing::error!("Failed to encode response: {e}"),
        }
    }

    if !editor.scene().is_empty() {
        if let Err(e) = editor.autosave() {
            tracing::warn!("Autosave failed: {e}");
        }
    }
}

fn load_scene(editor: &mut Editor, path: &str) {
    match std::fs::read_to_string(path) {
        Ok(json) => match editor.import_scene_str(&json) {
            Ok(report) => {
                tracing::info!(
                    "Loaded scene from {path} ({} objects, {} skipped)",
                    report.imported.len(),
                    report.skipped
                );
            }
            Err(e) => {
                tracing::error!("Failed to import scene from {path}: {e}");
            }
        },
        Err(e) => {
            tracing::error!("Failed to read scene file {path}: {e}");
        }
    }
}

fn has_flag(flag: &str) -> bool {
    std::env::args().skip(1).any(|a| a == flag)
}

fn parse_scene_arg() -> Option<String> {
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        if args[i] == "--scene" && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
        i += 1;
    }
    None
}
