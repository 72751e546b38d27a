//! Factory functions for creating test data.
//!
//! Provides convenient helpers to construct shapes, scene documents and
//! gizmo factories used in tests and by the command interface.

use serde_json::{json, Value};
use shared::*;

use crate::error::{EditorError, EditorResult};
use crate::viewport::gizmo::{GizmoFactory, TransformGizmo, TranslateGizmo};

// ── Shape factories ─────────────────────────────────────────────

/// Axis-aligned box centered on its origin.
pub fn box_shape(w: f64, h: f64, d: f64) -> Shape {
    Shape::Box(BoxParams {
        width: w,
        height: h,
        depth: d,
    })
}

/// 1x1x1 box.
pub fn unit_box() -> Shape {
    box_shape(1.0, 1.0, 1.0)
}

pub fn sphere_shape(radius: f64) -> Shape {
    Shape::Sphere(SphereParams {
        radius,
        width_segments: 16,
        height_segments: 8,
    })
}

pub fn cylinder_shape(radius: f64, height: f64) -> Shape {
    Shape::Cylinder(CylinderParams {
        radius_top: radius,
        radius_bottom: radius,
        height,
        radial_segments: 16,
    })
}

/// Rectangle on the ground plane extruded upwards.
pub fn rect_extrusion(min: [f64; 2], max: [f64; 2], depth: f64) -> Shape {
    Shape::Extruded(ExtrudedParams {
        profile: Profile::Rectangle { min, max },
        depth,
    })
}

pub fn circle_extrusion(center: [f64; 2], radius: f64, segments: u32, depth: f64) -> Shape {
    Shape::Extruded(ExtrudedParams {
        profile: Profile::Circle {
            center,
            radius,
            segments,
        },
        depth,
    })
}

/// `n` disjoint triangles laid out along X, non-indexed.
pub fn triangle_soup(n: usize) -> Shape {
    let mut positions = Vec::with_capacity(n * 3);
    for i in 0..n {
        let x = i as f32 * 2.0;
        positions.push([x, 0.0, 0.0]);
        positions.push([x + 1.0, 0.0, 0.0]);
        positions.push([x, 0.0, 1.0]);
    }
    Shape::Custom(CustomParams {
        positions,
        indices: None,
    })
}

// ── Document factories ──────────────────────────────────────────

/// Document with one object of each parametric kind.
pub fn sample_document() -> Value {
    json!({
        "objects": [
            {
                "type": "box",
                "name": "Crate",
                "position": [0.0, 0.5, 0.0],
                "rotation": [0.0, 0.0, 0.0],
                "scale": [1.0, 1.0, 1.0],
                "params": { "width": 1.0, "height": 1.0, "depth": 1.0 }
            },
            {
                "type": "sphere",
                "name": "Ball",
                "position": [3.0, 1.0, 0.0],
                "rotation": [0.0, 0.0, 0.0],
                "scale": [1.0, 1.0, 1.0],
                "params": { "radius": 1.0 },
                "color": [0.8, 0.2, 0.2]
            },
            {
                "type": "cylinder",
                "name": "Post",
                "position": [-3.0, 1.0, 0.0],
                "rotation": [0.0, 0.0, 0.0],
                "scale": [1.0, 2.0, 1.0],
                "params": { "radius_top": 0.5, "radius_bottom": 0.5, "height": 1.0 }
            },
            {
                "type": "extruded",
                "name": "Slab",
                "position": [0.0, 0.0, 4.0],
                "rotation": [0.0, 0.5, 0.0],
                "scale": [1.0, 1.0, 1.0],
                "params": {
                    "profile": { "shape": "rectangle", "min": [-1.0, -0.5], "max": [1.0, 0.5] },
                    "depth": 0.25
                }
            }
        ],
        "metadata": {
            "version": DOCUMENT_VERSION,
            "generator": GENERATOR,
            "date": "2024-01-01T00:00:00Z"
        }
    })
}

// ── Gizmo factories ─────────────────────────────────────────────

/// Gizmo factory that fails a fixed number of times before succeeding.
#[derive(Debug, Clone)]
pub struct FlakyGizmoFactory {
    pub failures_left: u32,
    pub calls: u32,
}

impl FlakyGizmoFactory {
    pub fn new(failures: u32) -> Self {
        Self {
            failures_left: failures,
            calls: 0,
        }
    }
}

impl GizmoFactory for FlakyGizmoFactory {
    fn create(&mut self) -> EditorResult<Box<dyn TransformGizmo>> {
        self.calls += 1;
        if self.failures_left > 0 {
            self.failures_left -= 1;
            return Err(EditorError::gizmo_unavailable("viewport not attached yet"));
        }
        Ok(Box::new(TranslateGizmo::new(1.0, 0.15)))
    }
}

/// Gizmo factory that never succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableGizmoFactory;

impl GizmoFactory for UnavailableGizmoFactory {
    fn create(&mut self) -> EditorResult<Box<dyn TransformGizmo>> {
        Err(EditorError::gizmo_unavailable("no gizmo support"))
    }
}
