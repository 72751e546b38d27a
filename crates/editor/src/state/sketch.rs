//! Sketch-to-extrude tool
//!
//! `Disabled -> Armed(shape) -> Dragging -> Armed(shape)`. Pointer positions
//! are intersected with the ground plane and snapped to the grid; a live
//! wireframe preview is replaced on every move and disposed on every exit
//! from `Dragging`.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use shared::{ExtrudedParams, Profile, Shape, Transform};

use super::settings::SketchSettings;
use crate::render::{CursorHint, Overlay, OverlayHandle, SceneRenderer};
use crate::viewport::overlays::{circle_preview, rectangle_preview};
use crate::viewport::picking::{ray_ground_plane, Ray};

/// Requested sketch mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SketchMode {
    #[default]
    None,
    Rectangle,
    Circle,
}

/// Shape drawn by an armed tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SketchShape {
    Rectangle,
    Circle,
}

impl SketchMode {
    pub fn shape(self) -> Option<SketchShape> {
        match self {
            SketchMode::None => None,
            SketchMode::Rectangle => Some(SketchShape::Rectangle),
            SketchMode::Circle => Some(SketchShape::Circle),
        }
    }
}

/// Tool state
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SketchState {
    #[default]
    Disabled,
    Armed(SketchShape),
    Dragging {
        shape: SketchShape,
        /// Snapped start point `(x, z)`
        start: Vec2,
        /// Snapped current point `(x, z)`
        current: Vec2,
        preview: Option<OverlayHandle>,
    },
}

/// Object a finished drag asks to create
#[derive(Debug, Clone, PartialEq)]
pub struct SketchCommit {
    pub shape: Shape,
    pub transform: Transform,
}

/// Result of releasing the pointer
#[derive(Debug, Clone, PartialEq)]
pub enum SketchRelease {
    /// Tool was not dragging
    Ignored,
    /// Shape below the minimum size; nothing created
    Discarded,
    Commit(SketchCommit),
}

/// Snap a value to the nearest grid line
pub fn snap_to_grid(value: f32, grid_size: f32) -> f32 {
    if grid_size > 0.0 {
        (value / grid_size).round() * grid_size
    } else {
        value
    }
}

fn snap_point(p: Vec2, grid_size: f32) -> Vec2 {
    Vec2::new(snap_to_grid(p.x, grid_size), snap_to_grid(p.y, grid_size))
}

/// Ground-plane hit of a ray as a sketch point `(x, z)`
fn ground_hit(ray: &Ray) -> Option<Vec2> {
    ray_ground_plane(ray, 0.0).map(|p| Vec2::new(p.x, p.z))
}

#[derive(Debug, Default)]
pub struct SketchTool {
    state: SketchState,
}

impl SketchTool {
    pub fn state(&self) -> &SketchState {
        &self.state
    }

    pub fn mode(&self) -> SketchMode {
        match self.state {
            SketchState::Disabled => SketchMode::None,
            SketchState::Armed(shape) | SketchState::Dragging { shape, .. } => match shape {
                SketchShape::Rectangle => SketchMode::Rectangle,
                SketchShape::Circle => SketchMode::Circle,
            },
        }
    }

    /// Sketch mode is on (pointer events belong to the tool)
    pub fn is_enabled(&self) -> bool {
        !matches!(self.state, SketchState::Disabled)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, SketchState::Dragging { .. })
    }

    pub fn preview(&self) -> Option<OverlayHandle> {
        match self.state {
            SketchState::Dragging { preview, .. } => preview,
            _ => None,
        }
    }

    /// Enable, switch or disable the tool. Any live preview is disposed first.
    pub fn set_mode(&mut self, mode: SketchMode, renderer: &mut dyn SceneRenderer) {
        self.dispose_preview(renderer);
        match mode.shape() {
            Some(shape) => {
                self.state = SketchState::Armed(shape);
                renderer.set_cursor(CursorHint::Crosshair);
            }
            None => {
                self.state = SketchState::Disabled;
                renderer.set_cursor(CursorHint::Default);
            }
        }
        tracing::info!("Sketch mode: {:?}", mode);
    }

    /// Start a drag at the snapped ground point under the ray.
    /// Returns false if not armed or the ray misses the ground plane.
    pub fn pointer_down(&mut self, ray: &Ray, settings: &SketchSettings) -> bool {
        let SketchState::Armed(shape) = self.state else {
            return false;
        };
        let Some(hit) = ground_hit(ray) else {
            tracing::debug!("Sketch pointer-down missed the ground plane");
            return false;
        };
        let start = snap_point(hit, settings.grid_size);
        self.state = SketchState::Dragging {
            shape,
            start,
            current: start,
            preview: None,
        };
        true
    }

    /// Update the current point and replace the preview
    pub fn pointer_move(
        &mut self,
        ray: &Ray,
        settings: &SketchSettings,
        color: [f32; 4],
        renderer: &mut dyn SceneRenderer,
    ) -> bool {
        let SketchState::Dragging {
            shape,
            start,
            current,
            preview,
        } = &mut self.state
        else {
            return false;
        };
        let Some(hit) = ground_hit(ray) else {
            return false;
        };
        *current = snap_point(hit, settings.grid_size);

        if let Some(old) = preview.take() {
            renderer.dispose_overlay(old);
        }
        let lines = match shape {
            SketchShape::Rectangle => rectangle_preview(*start, *current, color),
            SketchShape::Circle => circle_preview(
                *start,
                start.distance(*current),
                settings.circle_segments,
                color,
            ),
        };
        *preview = Some(renderer.add_overlay(Overlay::SketchPreview { lines }));
        true
    }

    /// Finish the drag. The preview is disposed whatever the outcome and the
    /// tool returns to `Armed`.
    pub fn pointer_up(
        &mut self,
        ray: Option<&Ray>,
        settings: &SketchSettings,
        renderer: &mut dyn SceneRenderer,
    ) -> SketchRelease {
        let SketchState::Dragging {
            shape,
            start,
            mut current,
            preview,
        } = self.state.clone()
        else {
            return SketchRelease::Ignored;
        };

        if let Some(handle) = preview {
            renderer.dispose_overlay(handle);
        }
        self.state = SketchState::Armed(shape);

        if let Some(hit) = ray.and_then(ground_hit) {
            current = snap_point(hit, settings.grid_size);
        }

        match build_commit(shape, start, current, settings) {
            Some(commit) => SketchRelease::Commit(commit),
            None => {
                tracing::info!(
                    "Sketch {:?} from {:?} to {:?} below minimum size {}, discarded",
                    shape,
                    start,
                    current,
                    settings.min_size
                );
                SketchRelease::Discarded
            }
        }
    }

    fn dispose_preview(&mut self, renderer: &mut dyn SceneRenderer) {
        if let SketchState::Dragging { preview, .. } = &mut self.state {
            if let Some(handle) = preview.take() {
                renderer.dispose_overlay(handle);
            }
        }
    }
}

/// Extruded shape for a finished drag, centered on its own transform.
/// None when the shape is below the minimum size.
pub fn build_commit(
    shape: SketchShape,
    start: Vec2,
    end: Vec2,
    settings: &SketchSettings,
) -> Option<SketchCommit> {
    let depth = settings.extrude_depth as f64;

    let (profile, center) = match shape {
        SketchShape::Rectangle => {
            let size = (end - start).abs();
            if size.x < settings.min_size || size.y < settings.min_size {
                return None;
            }
            let half = [size.x as f64 / 2.0, size.y as f64 / 2.0];
            (
                Profile::Rectangle {
                    min: [-half[0], -half[1]],
                    max: half,
                },
                (start + end) * 0.5,
            )
        }
        SketchShape::Circle => {
            let radius = start.distance(end);
            if radius < settings.min_size {
                return None;
            }
            (
                Profile::Circle {
                    center: [0.0, 0.0],
                    radius: radius as f64,
                    segments: settings.circle_segments,
                },
                start,
            )
        }
    };

    Some(SketchCommit {
        shape: Shape::Extruded(ExtrudedParams { profile, depth }),
        transform: Transform::at([center.x as f64, 0.0, center.y as f64]),
    })
}
