//! Editor context
//!
//! `Editor` owns the scene, the selection state machine, the sketch tool, the
//! gizmo slot and the renderer collaborator, and exposes the operations the
//! UI layer drives: picking, selection, sketch mode, pointer events, object
//! editing and scene import/export.

use std::path::PathBuf;

use glam::Vec2;
use serde::Serialize;
use serde_json::Value;
use shared::{ObjectId, SceneDocument, Shape, Transform};

use crate::error::{EditorError, EditorResult};
use crate::render::{HeadlessRenderer, SceneRenderer};
use crate::state::scene::{ImportReport, SceneState};
use crate::state::selection::{Selection, SelectionContext, SelectionState};
use crate::state::settings::EditorSettings;
use crate::state::sketch::{SketchMode, SketchRelease, SketchTool};
use crate::viewport::camera::{ArcBallCamera, ViewCamera, Viewport};
use crate::viewport::gizmo::{GizmoFactory, GizmoSlot, TranslateGizmoFactory};
use crate::viewport::picking::{self, Hit, MeshRayCaster, PickModifiers, Ray, RayCaster};

/// What a pointer event did
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PointerOutcome {
    Ignored,
    Selected { selection: Selection },
    GizmoDragStarted { object: ObjectId },
    GizmoMoved { object: ObjectId, delta: [f32; 3] },
    GizmoDragEnded,
    SketchStarted,
    SketchUpdated,
    SketchCommitted { object: ObjectId },
    SketchDiscarded,
}

pub struct Editor<R: SceneRenderer = HeadlessRenderer> {
    settings: EditorSettings,
    scene: SceneState,
    selection: SelectionState,
    sketch: SketchTool,
    gizmo: GizmoSlot,
    renderer: R,
    camera: Box<dyn ViewCamera>,
    caster: Box<dyn RayCaster>,
    viewport: Viewport,
}

impl Editor<HeadlessRenderer> {
    /// Editor with a recording renderer and default settings
    pub fn headless() -> Self {
        Self::new(HeadlessRenderer::new(), EditorSettings::default())
    }
}

impl<R: SceneRenderer> Editor<R> {
    pub fn new(mut renderer: R, settings: EditorSettings) -> Self {
        renderer.set_highlight_color(settings.viewport.highlight_color);
        let factory = TranslateGizmoFactory {
            axis_length: settings.gizmo.axis_length,
            hit_threshold: settings.gizmo.hit_threshold,
        };
        Self {
            scene: SceneState::new(settings.picking.crease_angle),
            selection: SelectionState::default(),
            sketch: SketchTool::default(),
            gizmo: GizmoSlot::new(Box::new(factory), settings.gizmo.max_init_attempts),
            renderer,
            camera: Box::new(ArcBallCamera::new()),
            caster: Box::new(MeshRayCaster),
            viewport: Viewport::new(800.0, 600.0),
            settings,
        }
    }

    /// Replace the gizmo factory (resets gizmo initialization)
    pub fn with_gizmo_factory(mut self, factory: Box<dyn GizmoFactory>) -> Self {
        self.gizmo = GizmoSlot::new(factory, self.settings.gizmo.max_init_attempts);
        self
    }

    pub fn with_camera(mut self, camera: Box<dyn ViewCamera>) -> Self {
        self.camera = camera;
        self
    }

    pub fn with_ray_caster(mut self, caster: Box<dyn RayCaster>) -> Self {
        self.caster = caster;
        self
    }

    // ── Accessors ────────────────────────────────────────────

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn sketch(&self) -> &SketchTool {
        &self.sketch
    }

    pub fn gizmo(&self) -> &GizmoSlot {
        &self.gizmo
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// World ray under a pointer position
    pub fn ray_at(&self, x: f32, y: f32) -> Ray {
        let ndc = self.viewport.to_ndc(Vec2::new(x, y));
        self.camera.ray_from_ndc(ndc, self.viewport.aspect())
    }

    fn selection_parts(&mut self) -> (&mut SelectionState, SelectionContext<'_>) {
        let ctx = SelectionContext {
            scene: &self.scene,
            renderer: &mut self.renderer,
            gizmo: self.gizmo.gizmo_mut(),
            overlay_color: self.settings.viewport.overlay_color,
        };
        (&mut self.selection, ctx)
    }

    // ── Picking & selection ──────────────────────────────────

    /// Resolve a pointer position against all scene objects
    pub fn pick(&self, x: f32, y: f32, modifiers: PickModifiers) -> Option<Hit> {
        let targets = self.scene.pick_targets();
        picking::resolve(
            Vec2::new(x, y),
            self.camera.as_ref(),
            &self.viewport,
            &targets,
            modifiers,
            self.caster.as_ref(),
            self.settings.picking.edge_threshold,
        )
    }

    /// Resolve an explicit world-space ray
    pub fn pick_ray(&self, ray: &Ray, modifiers: PickModifiers) -> Option<Hit> {
        let targets = self.scene.pick_targets();
        picking::resolve_ray(
            ray,
            &targets,
            modifiers,
            self.caster.as_ref(),
            self.settings.picking.edge_threshold,
        )
    }

    /// Apply a pick result; no hit deselects
    pub fn select(&mut self, hit: Option<&Hit>) -> &Selection {
        self.select_target(Selection::from_hit(hit))
    }

    pub fn select_target(&mut self, target: Selection) -> &Selection {
        let (selection, mut ctx) = self.selection_parts();
        selection.select(target, &mut ctx)
    }

    pub fn clear_selection(&mut self) {
        let (selection, mut ctx) = self.selection_parts();
        selection.clear(&mut ctx);
    }

    pub fn current_selection(&self) -> &Selection {
        self.selection.current()
    }

    /// Drive gizmo initialization one step; attaches it once ready
    pub fn poll_gizmo(&mut self) -> bool {
        let was_ready = self.gizmo.is_ready();
        let ready = self.gizmo.poll();
        if ready && !was_ready {
            let current = self.selection.current().clone();
            if matches!(current, Selection::Object { .. }) {
                self.select_target(current);
            }
        }
        ready
    }

    // ── Sketch mode & pointer events ─────────────────────────

    /// Enable, switch or disable the sketch tool.
    /// Entering a sketch mode drops the current selection first.
    pub fn set_sketch_mode(&mut self, mode: SketchMode) {
        if mode != SketchMode::None {
            self.end_gizmo_drag();
            self.clear_selection();
        }
        self.sketch.set_mode(mode, &mut self.renderer);
    }

    pub fn sketch_mode(&self) -> SketchMode {
        self.sketch.mode()
    }

    pub fn pointer_down(&mut self, x: f32, y: f32, modifiers: PickModifiers) -> PointerOutcome {
        let ray = self.ray_at(x, y);

        if self.sketch.is_enabled() {
            return if self.sketch.pointer_down(&ray, &self.settings.sketch) {
                PointerOutcome::SketchStarted
            } else {
                PointerOutcome::Ignored
            };
        }

        if matches!(self.selection.current(), Selection::Object { .. }) {
            if let Some(gizmo) = self.gizmo.gizmo_mut() {
                if gizmo.begin_drag(&ray) {
                    if let Some(object) = gizmo.attached().cloned() {
                        tracing::debug!("Gizmo drag started on {}", object);
                        return PointerOutcome::GizmoDragStarted { object };
                    }
                }
            }
        }

        let hit = self.pick_ray(&ray, modifiers);
        let selection = self.select(hit.as_ref()).clone();
        PointerOutcome::Selected { selection }
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) -> PointerOutcome {
        let ray = self.ray_at(x, y);

        if self.sketch.is_dragging() {
            let color = self.settings.viewport.preview_color;
            return if self
                .sketch
                .pointer_move(&ray, &self.settings.sketch, color, &mut self.renderer)
            {
                PointerOutcome::SketchUpdated
            } else {
                PointerOutcome::Ignored
            };
        }

        let Some(gizmo) = self.gizmo.gizmo_mut() else {
            return PointerOutcome::Ignored;
        };
        if !gizmo.is_dragging() {
            return PointerOutcome::Ignored;
        }
        let (Some(delta), Some(object)) = (gizmo.drag(&ray), gizmo.attached().cloned()) else {
            return PointerOutcome::Ignored;
        };

        if let Err(e) = self.scene.translate(&object, delta.as_dvec3().to_array()) {
            tracing::warn!("Gizmo drag lost its object: {}", e);
            self.end_gizmo_drag();
            return PointerOutcome::Ignored;
        }
        if let Some(obj) = self.scene.get(&object) {
            self.renderer.update_transform(&object, obj.world_matrix());
        }
        PointerOutcome::GizmoMoved {
            object,
            delta: delta.to_array(),
        }
    }

    pub fn pointer_up(&mut self, x: f32, y: f32) -> PointerOutcome {
        let ray = self.ray_at(x, y);

        if self.sketch.is_dragging() {
            let release = self
                .sketch
                .pointer_up(Some(&ray), &self.settings.sketch, &mut self.renderer);
            return match release {
                SketchRelease::Ignored => PointerOutcome::Ignored,
                SketchRelease::Discarded => PointerOutcome::SketchDiscarded,
                SketchRelease::Commit(commit) => {
                    match self.create_object(None, commit.shape, commit.transform, None) {
                        Ok(object) => PointerOutcome::SketchCommitted { object },
                        Err(e) => {
                            tracing::warn!("Sketch extrusion failed: {}", e);
                            PointerOutcome::SketchDiscarded
                        }
                    }
                }
            };
        }

        if self.end_gizmo_drag() {
            return PointerOutcome::GizmoDragEnded;
        }
        PointerOutcome::Ignored
    }

    /// Escape: leave sketch mode and drop the selection, synchronously
    pub fn cancel(&mut self) {
        if self.sketch.is_enabled() {
            self.sketch.set_mode(SketchMode::None, &mut self.renderer);
        }
        self.end_gizmo_drag();
        self.clear_selection();
    }

    fn end_gizmo_drag(&mut self) -> bool {
        match self.gizmo.gizmo_mut() {
            Some(gizmo) if gizmo.is_dragging() => {
                gizmo.end_drag();
                true
            }
            _ => false,
        }
    }

    // ── Object editing ───────────────────────────────────────

    /// Create an object and register its mesh with the renderer
    pub fn create_object(
        &mut self,
        name: Option<String>,
        shape: Shape,
        transform: Transform,
        color: Option<[f32; 3]>,
    ) -> EditorResult<ObjectId> {
        let id = self.scene.add_object(name, shape, transform, color)?;
        self.register_mesh(&id);
        Ok(id)
    }

    /// Remove an object, dropping any selection that refers to it
    pub fn remove_object(&mut self, id: &ObjectId) -> EditorResult<()> {
        if !self.scene.contains(id) {
            return Err(EditorError::ObjectNotFound(id.clone()));
        }
        self.release_object(id);
        self.scene.remove_object(id);
        self.renderer.remove_mesh(id);
        Ok(())
    }

    /// Remove every object
    pub fn clear_scene(&mut self) {
        self.end_gizmo_drag();
        self.clear_selection();
        for id in self.scene.clear() {
            self.renderer.remove_mesh(&id);
        }
    }

    pub fn set_transform(&mut self, id: &ObjectId, transform: Transform) -> EditorResult<()> {
        self.scene.set_transform(id, transform)?;
        self.after_transform(id);
        Ok(())
    }

    pub fn translate_object(&mut self, id: &ObjectId, delta: [f64; 3]) -> EditorResult<()> {
        self.scene.translate(id, delta)?;
        self.after_transform(id);
        Ok(())
    }

    /// Swap an object's shape; face and edge ids may change, so a selection
    /// on the object is dropped
    pub fn replace_shape(&mut self, id: &ObjectId, shape: Shape) -> EditorResult<()> {
        shape.validate()?;
        if !self.scene.contains(id) {
            return Err(EditorError::ObjectNotFound(id.clone()));
        }
        self.release_object(id);
        self.scene.replace_shape(id, shape)?;
        self.register_mesh(id);
        Ok(())
    }

    pub fn set_object_color(&mut self, id: &ObjectId, color: [f32; 3]) -> EditorResult<()> {
        if !self.scene.contains(id) {
            return Err(EditorError::ObjectNotFound(id.clone()));
        }
        self.release_object(id);
        self.scene.set_color(id, color)?;
        self.register_mesh(id);
        Ok(())
    }

    pub fn rename_object(&mut self, id: &ObjectId, name: String) -> EditorResult<()> {
        self.scene.rename(id, name)
    }

    fn register_mesh(&mut self, id: &ObjectId) {
        if let Some(obj) = self.scene.get(id) {
            self.renderer
                .add_mesh(&obj.id, &obj.geometry, obj.world_matrix(), obj.color);
        }
    }

    fn release_object(&mut self, id: &ObjectId) {
        if self.gizmo.gizmo().and_then(|g| g.attached()) == Some(id) {
            self.end_gizmo_drag();
        }
        let (selection, mut ctx) = self.selection_parts();
        selection.release_object(id, &mut ctx);
    }

    fn after_transform(&mut self, id: &ObjectId) {
        if let Some(obj) = self.scene.get(id) {
            self.renderer.update_transform(id, obj.world_matrix());
        }
        if self.selection.current().object() == Some(id) {
            let (selection, mut ctx) = self.selection_parts();
            selection.refresh(&mut ctx);
        }
    }

    // ── Import / export ──────────────────────────────────────

    pub fn export_scene(&self) -> EditorResult<SceneDocument> {
        self.scene.export_document()
    }

    pub fn export_scene_json(&self) -> EditorResult<String> {
        Ok(serde_json::to_string_pretty(&self.export_scene()?)?)
    }

    /// Replace the scene with a document's objects.
    ///
    /// A structurally invalid document leaves scene, selection and renderer
    /// untouched.
    pub fn import_scene(&mut self, document: &Value) -> EditorResult<ImportReport> {
        let (removed, report) = self.scene.import_document(document)?;

        self.end_gizmo_drag();
        self.clear_selection();
        for id in &removed {
            self.renderer.remove_mesh(id);
        }
        for id in &report.imported {
            self.register_mesh(id);
        }
        Ok(report)
    }

    pub fn import_scene_str(&mut self, json: &str) -> EditorResult<ImportReport> {
        let document: Value = serde_json::from_str(json)?;
        self.import_scene(&document)
    }

    pub fn autosave(&self) -> EditorResult<PathBuf> {
        self.scene.autosave()
    }

    /// Import the autosaved scene, if there is one
    pub fn restore_autosave(&mut self) -> EditorResult<Option<ImportReport>> {
        if !SceneState::has_autosave() {
            return Ok(None);
        }
        match SceneState::load_autosave() {
            Some(document) => self.import_scene(&document).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{unit_box, FlakyGizmoFactory, UnavailableGizmoFactory};
    use crate::render::CursorHint;
    use glam::Vec3;

    const VIEW: Viewport = Viewport {
        x: 0.0,
        y: 0.0,
        width: 800.0,
        height: 600.0,
    };

    fn camera() -> ArcBallCamera {
        ArcBallCamera::top_down(Vec3::ZERO, 10.0)
    }

    fn editor() -> Editor {
        let mut editor = Editor::headless().with_camera(Box::new(camera()));
        editor.set_viewport(VIEW);
        editor
    }

    /// Pointer position of a world point
    fn screen(point: Vec3) -> (f32, f32) {
        let ndc = camera().project_ndc(point, VIEW.aspect()).unwrap();
        let p = VIEW.from_ndc(ndc);
        (p.x, p.y)
    }

    #[test]
    fn test_highlight_color_comes_from_settings() {
        let mut settings = EditorSettings::default();
        settings.viewport.highlight_color = [0.1, 0.2, 0.3, 1.0];
        let ed = Editor::new(HeadlessRenderer::new(), settings);
        assert_eq!(ed.renderer().highlight_color(), [0.1, 0.2, 0.3, 1.0]);

        let ed = editor();
        assert_eq!(
            ed.renderer().highlight_color(),
            EditorSettings::default().viewport.highlight_color
        );
    }

    #[test]
    fn test_create_and_remove_object_tracks_renderer() {
        let mut ed = editor();
        let id = ed
            .create_object(None, unit_box(), Transform::new(), None)
            .unwrap();
        assert_eq!(ed.renderer().mesh_count(), 1);
        assert_eq!(ed.scene().get(&id).unwrap().name, "Box 1");

        ed.remove_object(&id).unwrap();
        assert_eq!(ed.renderer().mesh_count(), 0);
        assert!(ed.scene().is_empty());
        assert!(matches!(
            ed.remove_object(&id),
            Err(EditorError::ObjectNotFound(_))
        ));
    }

    #[test]
    fn test_click_selects_and_empty_click_deselects() {
        let mut ed = editor();
        let id = ed
            .create_object(None, unit_box(), Transform::new(), None)
            .unwrap();

        let (x, y) = screen(Vec3::new(0.1, 0.5, 0.1));
        let outcome = ed.pointer_down(x, y, PickModifiers::NONE);
        assert_eq!(
            outcome,
            PointerOutcome::Selected {
                selection: Selection::Object { object: id.clone() }
            }
        );
        assert_eq!(ed.renderer().highlighted(), vec![&id]);

        let (x, y) = screen(Vec3::new(3.0, 0.0, 3.0));
        ed.pointer_down(x, y, PickModifiers::NONE);
        assert!(ed.current_selection().is_none());
        assert!(ed.renderer().highlighted().is_empty());
    }

    #[test]
    fn test_removing_selected_object_clears_selection() {
        let mut ed = editor();
        let id = ed
            .create_object(None, unit_box(), Transform::new(), None)
            .unwrap();
        ed.select_target(Selection::Face {
            object: id.clone(),
            face: 2,
        });
        assert_eq!(ed.renderer().overlay_count(), 1);

        ed.remove_object(&id).unwrap();
        assert!(ed.current_selection().is_none());
        assert_eq!(ed.renderer().overlay_count(), 0);
    }

    #[test]
    fn test_sketch_rectangle_commits_object() {
        let mut ed = editor();
        ed.set_sketch_mode(SketchMode::Rectangle);
        assert_eq!(ed.renderer().cursor(), CursorHint::Crosshair);

        let (x0, y0) = screen(Vec3::new(0.0, 0.0, 0.0));
        let (x1, y1) = screen(Vec3::new(2.0, 0.0, 3.0));
        assert_eq!(
            ed.pointer_down(x0, y0, PickModifiers::NONE),
            PointerOutcome::SketchStarted
        );
        assert_eq!(ed.pointer_move(x1, y1), PointerOutcome::SketchUpdated);
        assert_eq!(ed.renderer().overlay_count(), 1);

        let PointerOutcome::SketchCommitted { object } = ed.pointer_up(x1, y1) else {
            panic!("expected a committed sketch");
        };
        assert_eq!(ed.renderer().overlay_count(), 0);
        let obj = ed.scene().get(&object).unwrap();
        assert_eq!(obj.kind(), shared::ObjectKind::Extruded);
        assert_eq!(obj.name, "Extrusion 1");
        assert_eq!(ed.sketch_mode(), SketchMode::Rectangle);
    }

    #[test]
    fn test_tiny_sketch_is_discarded() {
        let mut ed = editor();
        ed.set_sketch_mode(SketchMode::Circle);
        let (x, y) = screen(Vec3::new(0.05, 0.0, 0.05));
        ed.pointer_down(x, y, PickModifiers::NONE);
        assert_eq!(ed.pointer_up(x, y), PointerOutcome::SketchDiscarded);
        assert!(ed.scene().is_empty());
    }

    #[test]
    fn test_cancel_tears_down_sketch_and_selection() {
        let mut ed = editor();
        let id = ed
            .create_object(None, unit_box(), Transform::new(), None)
            .unwrap();
        ed.select_target(Selection::Object { object: id });

        ed.set_sketch_mode(SketchMode::Rectangle);
        assert!(ed.current_selection().is_none());
        let (x0, y0) = screen(Vec3::new(1.0, 0.0, 1.0));
        let (x1, y1) = screen(Vec3::new(2.0, 0.0, 2.0));
        ed.pointer_down(x0, y0, PickModifiers::NONE);
        ed.pointer_move(x1, y1);
        assert_eq!(ed.renderer().overlay_count(), 1);

        ed.cancel();
        assert_eq!(ed.renderer().overlay_count(), 0);
        assert_eq!(ed.sketch_mode(), SketchMode::None);
        assert_eq!(ed.renderer().cursor(), CursorHint::Default);
        assert_eq!(ed.scene().len(), 1);
    }

    #[test]
    fn test_gizmo_drag_moves_object() {
        let mut ed = editor();
        assert!(ed.poll_gizmo());
        let id = ed
            .create_object(None, unit_box(), Transform::new(), None)
            .unwrap();
        ed.select_target(Selection::Object { object: id.clone() });

        let (x0, y0) = screen(Vec3::new(0.8, 0.0, 0.0));
        let (x1, y1) = screen(Vec3::new(1.8, 0.0, 0.0));
        assert_eq!(
            ed.pointer_down(x0, y0, PickModifiers::NONE),
            PointerOutcome::GizmoDragStarted { object: id.clone() }
        );
        assert!(matches!(
            ed.pointer_move(x1, y1),
            PointerOutcome::GizmoMoved { .. }
        ));
        assert_eq!(ed.pointer_up(x1, y1), PointerOutcome::GizmoDragEnded);

        let pos = ed.scene().get(&id).unwrap().transform.position;
        assert!((pos[0] - 1.0).abs() < 1e-3, "moved to {:?}", pos);
        assert!(pos[1].abs() < 1e-6 && pos[2].abs() < 1e-6);
        let rendered = ed.renderer().mesh(&id).unwrap();
        assert!((rendered.world.w_axis.x - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_gizmo_attaches_once_ready() {
        let mut ed = editor().with_gizmo_factory(Box::new(FlakyGizmoFactory::new(1)));
        let id = ed
            .create_object(None, unit_box(), Transform::new(), None)
            .unwrap();
        ed.select_target(Selection::Object { object: id.clone() });

        assert!(!ed.poll_gizmo());
        // one poll of backoff after the first failure
        assert!(!ed.poll_gizmo());
        assert!(ed.poll_gizmo());
        assert_eq!(ed.gizmo().gizmo().unwrap().attached(), Some(&id));
    }

    #[test]
    fn test_unavailable_gizmo_keeps_selection_working() {
        let mut ed = editor()
            .with_gizmo_factory(Box::new(UnavailableGizmoFactory))
            .with_camera(Box::new(camera()));
        for _ in 0..64 {
            ed.poll_gizmo();
        }
        assert!(ed.gizmo().is_failed());

        let id = ed
            .create_object(None, unit_box(), Transform::new(), None)
            .unwrap();
        let sel = ed.select_target(Selection::Object { object: id.clone() });
        assert_eq!(sel, &Selection::Object { object: id });
    }

    #[test]
    fn test_translate_refreshes_face_overlay() {
        let mut ed = editor();
        let id = ed
            .create_object(None, unit_box(), Transform::new(), None)
            .unwrap();
        ed.select_target(Selection::Face {
            object: id.clone(),
            face: 2,
        });
        let before = ed.selection.overlay().unwrap();

        ed.translate_object(&id, [0.0, 0.0, 2.0]).unwrap();
        let after = ed.selection.overlay().unwrap();
        assert_ne!(before, after);
        assert_eq!(ed.renderer().overlay_count(), 1);
        assert_eq!(
            ed.current_selection(),
            &Selection::Face { object: id, face: 2 }
        );
    }

    #[test]
    fn test_import_replaces_renderer_meshes() {
        let mut ed = editor();
        let old = ed
            .create_object(None, unit_box(), Transform::new(), None)
            .unwrap();
        ed.select_target(Selection::Object { object: old.clone() });

        let report = ed.import_scene(&crate::fixtures::sample_document()).unwrap();
        assert_eq!(report.imported.len(), 4);
        assert!(ed.current_selection().is_none());
        assert!(ed.renderer().mesh(&old).is_none());
        assert_eq!(ed.renderer().mesh_count(), 4);
        assert!(ed.renderer().highlighted().is_empty());
    }

    #[test]
    fn test_invalid_import_leaves_editor_untouched() {
        let mut ed = editor();
        let id = ed
            .create_object(None, unit_box(), Transform::new(), None)
            .unwrap();
        ed.select_target(Selection::Object { object: id.clone() });

        let err = ed.import_scene_str(r#"{ "metadata": {} }"#).unwrap_err();
        assert!(matches!(err, EditorError::InvalidDocument(_)));
        assert!(ed.import_scene_str("not json").is_err());
        assert_eq!(ed.current_selection(), &Selection::Object { object: id });
        assert_eq!(ed.renderer().mesh_count(), 1);
    }
}
