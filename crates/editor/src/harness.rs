//! Headless test harness for programmatic scene manipulation.
//!
//! Wraps an [`Editor`] with a recording renderer and a top-down camera so
//! tests and the command interface can click and drag at world positions.

use glam::Vec3;
use shared::{ObjectId, Shape, Transform};

use crate::editor::{Editor, PointerOutcome};
use crate::error::EditorResult;
use crate::fixtures;
use crate::render::HeadlessRenderer;
use crate::state::scene::ImportReport;
use crate::state::selection::Selection;
use crate::state::sketch::SketchMode;
use crate::validation::MeshValidator;
use crate::viewport::camera::{ArcBallCamera, Viewport};
use crate::viewport::gizmo::GizmoFactory;
use crate::viewport::mesh::MeshGeometry;
use crate::viewport::picking::PickModifiers;
use crate::viewport::topology::MeshTopology;

/// Headless test harness: an editor looking straight down at the origin
pub struct TestHarness {
    pub editor: Editor<HeadlessRenderer>,
    camera: ArcBallCamera,
}

impl TestHarness {
    /// Create a new empty harness.
    pub fn new() -> Self {
        let camera = ArcBallCamera::top_down(Vec3::ZERO, 20.0);
        let mut editor = Editor::headless().with_camera(Box::new(camera.clone()));
        editor.set_viewport(Viewport::new(800.0, 600.0));
        Self { editor, camera }
    }

    /// Harness whose gizmo comes from `factory`
    pub fn with_gizmo_factory(factory: Box<dyn GizmoFactory>) -> Self {
        let mut h = Self::new();
        h.editor = std::mem::replace(&mut h.editor, Editor::headless()).with_gizmo_factory(factory);
        h
    }

    // ── Scene manipulation ────────────────────────────────────

    /// Create an object and return its ID
    pub fn create_shape(&mut self, name: &str, shape: Shape, transform: Transform) -> ObjectId {
        self.try_create_shape(name, shape, transform)
            .unwrap_or_default()
    }

    pub fn try_create_shape(
        &mut self,
        name: &str,
        shape: Shape,
        transform: Transform,
    ) -> EditorResult<ObjectId> {
        self.editor
            .create_object(Some(name.to_string()), shape, transform, None)
    }

    /// Create a box at the origin and return its ID
    pub fn create_cube(&mut self, name: &str, w: f64, h: f64, d: f64) -> ObjectId {
        self.create_shape(name, fixtures::box_shape(w, h, d), Transform::new())
    }

    /// Create a box at a position and return its ID
    pub fn create_cube_at(&mut self, name: &str, w: f64, h: f64, d: f64, pos: [f64; 3]) -> ObjectId {
        self.create_shape(name, fixtures::box_shape(w, h, d), Transform::at(pos))
    }

    pub fn create_sphere(&mut self, name: &str, r: f64) -> ObjectId {
        self.create_shape(name, fixtures::sphere_shape(r), Transform::new())
    }

    pub fn create_cylinder(&mut self, name: &str, r: f64, h: f64) -> ObjectId {
        self.create_shape(name, fixtures::cylinder_shape(r, h), Transform::new())
    }

    /// Delete an object; false if it did not exist
    pub fn delete(&mut self, id: &str) -> bool {
        self.editor.remove_object(&id.to_string()).is_ok()
    }

    /// Clear the entire scene
    pub fn clear(&mut self) {
        self.editor.cancel();
        self.editor.clear_scene();
    }

    /// Load a scene from JSON string (replaces current)
    pub fn load_scene_json(&mut self, json: &str) -> EditorResult<ImportReport> {
        self.editor.import_scene_str(json)
    }

    /// Export the current scene as JSON
    pub fn export_scene_json(&self) -> String {
        self.editor.export_scene_json().unwrap_or_default()
    }

    // ── Pointer input ─────────────────────────────────────────

    /// Pointer position of a world point
    pub fn screen_point(&self, world: Vec3) -> (f32, f32) {
        let viewport = self.editor.viewport();
        let ndc = self
            .camera
            .project_ndc(world, viewport.aspect())
            .unwrap_or_default();
        let p = viewport.from_ndc(ndc);
        (p.x, p.y)
    }

    /// Press and release at a world point
    pub fn click_world(&mut self, world: Vec3, modifiers: PickModifiers) -> PointerOutcome {
        let (x, y) = self.screen_point(world);
        let down = self.editor.pointer_down(x, y, modifiers);
        self.editor.pointer_up(x, y);
        down
    }

    /// Press at `from`, move to `to`, release there. Returns the release outcome.
    pub fn drag_world(&mut self, from: Vec3, to: Vec3) -> PointerOutcome {
        let (x0, y0) = self.screen_point(from);
        let (x1, y1) = self.screen_point(to);
        self.editor.pointer_down(x0, y0, PickModifiers::NONE);
        self.editor.pointer_move(x1, y1);
        self.editor.pointer_up(x1, y1)
    }

    /// Drag out a rectangle between two ground points (x, z)
    pub fn sketch_rectangle(&mut self, a: [f32; 2], b: [f32; 2]) -> Option<ObjectId> {
        self.sketch(SketchMode::Rectangle, a, b)
    }

    /// Drag out a circle from its center to a rim point (x, z)
    pub fn sketch_circle(&mut self, center: [f32; 2], rim: [f32; 2]) -> Option<ObjectId> {
        self.sketch(SketchMode::Circle, center, rim)
    }

    fn sketch(&mut self, mode: SketchMode, a: [f32; 2], b: [f32; 2]) -> Option<ObjectId> {
        self.editor.set_sketch_mode(mode);
        let outcome = self.drag_world(Vec3::new(a[0], 0.0, a[1]), Vec3::new(b[0], 0.0, b[1]));
        self.editor.set_sketch_mode(SketchMode::None);
        match outcome {
            PointerOutcome::SketchCommitted { object } => Some(object),
            _ => None,
        }
    }

    // ── Selection ─────────────────────────────────────────────

    pub fn select_object(&mut self, id: &str) -> Selection {
        self.editor
            .select_target(Selection::Object {
                object: id.to_string(),
            })
            .clone()
    }

    pub fn clear_selection(&mut self) {
        self.editor.clear_selection();
    }

    pub fn selection(&self) -> &Selection {
        self.editor.current_selection()
    }

    // ── Inspection ────────────────────────────────────────────

    pub fn object_count(&self) -> usize {
        self.editor.scene().len()
    }

    pub fn renderer(&self) -> &HeadlessRenderer {
        self.editor.renderer()
    }

    /// Local-space geometry of an object
    pub fn mesh_of(&self, id: &str) -> Option<&MeshGeometry> {
        self.editor.scene().get(&id.to_string()).map(|o| &o.geometry)
    }

    pub fn topology_of(&self, id: &str) -> Option<&MeshTopology> {
        self.editor.scene().get(&id.to_string()).map(|o| &o.topology)
    }

    /// Create a validator for an object's mesh
    pub fn validate_mesh(&self, id: &str) -> Option<MeshValidator<'_>> {
        self.mesh_of(id).map(MeshValidator::new)
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
