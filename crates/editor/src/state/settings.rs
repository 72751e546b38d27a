//! Editor settings

use serde::{Deserialize, Serialize};

use crate::viewport::edge::DEFAULT_CREASE_ANGLE;
use crate::viewport::picking::DEFAULT_EDGE_THRESHOLD;

/// Picking settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickingSettings {
    /// World-space distance within which an edge counts as hit
    pub edge_threshold: f32,
    /// Dihedral angle (radians) above which an interior edge is a crease
    pub crease_angle: f32,
}

impl Default for PickingSettings {
    fn default() -> Self {
        Self {
            edge_threshold: DEFAULT_EDGE_THRESHOLD,
            crease_angle: DEFAULT_CREASE_ANGLE,
        }
    }
}

/// Sketch-to-extrude settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchSettings {
    /// Snap grid cell size
    pub grid_size: f32,
    /// Shapes smaller than this in any dimension are discarded
    pub min_size: f32,
    /// Extrusion height of committed sketches
    pub extrude_depth: f32,
    /// Polygon segments used for circles
    pub circle_segments: u32,
}

impl Default for SketchSettings {
    fn default() -> Self {
        Self {
            grid_size: 0.5,
            min_size: 0.1,
            extrude_depth: 1.0,
            circle_segments: 32,
        }
    }
}

/// Transform gizmo settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GizmoSettings {
    /// Construction attempts before giving up
    pub max_init_attempts: u32,
    pub axis_length: f32,
    /// Ray distance within which an axis handle is grabbed
    pub hit_threshold: f32,
}

impl Default for GizmoSettings {
    fn default() -> Self {
        Self {
            max_init_attempts: 5,
            axis_length: 1.0,
            hit_threshold: 0.15,
        }
    }
}

/// Viewport colors (RGBA)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    /// Object highlight material color
    pub highlight_color: [f32; 4],
    /// Face and edge overlay color
    pub overlay_color: [f32; 4],
    /// Sketch preview line color
    pub preview_color: [f32; 4],
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            highlight_color: [0.0, 0.86, 1.0, 1.0],
            overlay_color: [1.0, 0.55, 0.0, 0.85],
            preview_color: [1.0, 0.78, 0.2, 0.7],
        }
    }
}

/// All editor settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditorSettings {
    #[serde(default)]
    pub picking: PickingSettings,
    #[serde(default)]
    pub sketch: SketchSettings,
    #[serde(default)]
    pub gizmo: GizmoSettings,
    #[serde(default)]
    pub viewport: ViewportSettings,
}

impl EditorSettings {
    fn config_path() -> Option<std::path::PathBuf> {
        directories::ProjectDirs::from("com", "scene-editor", "scene-editor")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from file, or return default if not found
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            if let Ok(json) = std::fs::read_to_string(&path) {
                match serde_json::from_str(&json) {
                    Ok(settings) => return settings,
                    Err(e) => tracing::warn!("Ignoring invalid settings {}: {}", path.display(), e),
                }
            }
        }
        Self::default()
    }

    /// Save settings to file
    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            if let Some(config_dir) = path.parent() {
                if std::fs::create_dir_all(config_dir).is_ok() {
                    if let Ok(json) = serde_json::to_string_pretty(self) {
                        if let Err(e) = std::fs::write(&path, json) {
                            tracing::warn!("Failed to save settings: {}", e);
                        }
                    }
                }
            }
        }
    }
}
