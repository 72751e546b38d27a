//! Selection state machine
//!
//! Exactly one of none / object / face / edge is selected. Every transition
//! first reverts the previous highlight (material restore or overlay
//! disposal, gizmo detach) and only then applies the new one, so at most one
//! highlight exists at any time.

use serde::Serialize;
use shared::ObjectId;

use crate::build::pivot;
use crate::render::{MaterialHandle, Overlay, OverlayHandle, SceneRenderer};
use crate::state::scene::{SceneObject, SceneState};
use crate::viewport::edge::EdgeKey;
use crate::viewport::gizmo::TransformGizmo;
use crate::viewport::overlays::{edge_overlay, face_overlay};
use crate::viewport::picking::{Hit, HitKind};
use crate::viewport::topology::FaceId;

/// What is currently selected
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Selection {
    #[default]
    None,
    Object {
        object: ObjectId,
    },
    Face {
        object: ObjectId,
        face: FaceId,
    },
    Edge {
        object: ObjectId,
        edge: EdgeKey,
    },
}

impl Selection {
    /// Selection a pick result asks for; no hit means deselect
    pub fn from_hit(hit: Option<&Hit>) -> Self {
        let Some(hit) = hit else {
            return Selection::None;
        };
        let object = hit.object.clone();
        match hit.kind {
            HitKind::Object => Selection::Object { object },
            HitKind::Face { face } => Selection::Face { object, face },
            HitKind::Edge { edge } => Selection::Edge { object, edge },
        }
    }

    /// Object the selection refers to
    pub fn object(&self) -> Option<&ObjectId> {
        match self {
            Selection::None => None,
            Selection::Object { object }
            | Selection::Face { object, .. }
            | Selection::Edge { object, .. } => Some(object),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Selection::None)
    }

    pub fn state_name(&self) -> &'static str {
        match self {
            Selection::None => "idle",
            Selection::Object { .. } => "object_selected",
            Selection::Face { .. } => "face_selected",
            Selection::Edge { .. } => "edge_selected",
        }
    }
}

/// The single live highlight side effect
#[derive(Debug, Clone, PartialEq, Default)]
enum Highlight {
    #[default]
    None,
    /// Object wears the shared highlight material; `original` is restored on teardown
    Material {
        object: ObjectId,
        original: MaterialHandle,
    },
    /// Face or edge overlay node
    Overlay(OverlayHandle),
}

/// Collaborators a transition may touch
pub struct SelectionContext<'a> {
    pub scene: &'a SceneState,
    pub renderer: &'a mut dyn SceneRenderer,
    /// None while the gizmo is not initialized
    pub gizmo: Option<&'a mut dyn TransformGizmo>,
    pub overlay_color: [f32; 4],
}

/// Current selection and its highlight
#[derive(Debug, Default)]
pub struct SelectionState {
    current: Selection,
    highlight: Highlight,
}

impl SelectionState {
    pub fn current(&self) -> &Selection {
        &self.current
    }

    /// Whether a material swap or overlay is currently applied
    pub fn has_highlight(&self) -> bool {
        self.highlight != Highlight::None
    }

    /// Overlay node owned by the selection, if any
    pub fn overlay(&self) -> Option<OverlayHandle> {
        match self.highlight {
            Highlight::Overlay(h) => Some(h),
            _ => None,
        }
    }

    /// Transition to `target`.
    ///
    /// Re-selecting the current target keeps the existing highlight. A target
    /// that no longer resolves (missing object, unknown face, non-selectable
    /// edge) leaves the machine idle.
    pub fn select(&mut self, target: Selection, ctx: &mut SelectionContext<'_>) -> &Selection {
        if target == self.current && (target.is_none() || self.has_highlight()) {
            if let Selection::Object { object } = &target {
                attach_gizmo(ctx, object);
            }
            return &self.current;
        }

        self.teardown(ctx);

        if let Err(reason) = self.apply(&target, ctx) {
            tracing::warn!("Cannot select {:?}: {}", target, reason);
            return &self.current;
        }

        tracing::debug!("Selection -> {}", self.current.state_name());
        &self.current
    }

    /// Transition to idle
    pub fn clear(&mut self, ctx: &mut SelectionContext<'_>) {
        self.select(Selection::None, ctx);
    }

    /// Rebuild the highlight of the current target (e.g. after a transform
    /// change so world-space overlays follow the object)
    pub fn refresh(&mut self, ctx: &mut SelectionContext<'_>) {
        let target = self.current.clone();
        self.teardown(ctx);
        if let Err(reason) = self.apply(&target, ctx) {
            tracing::warn!("Selection dropped on refresh: {}", reason);
        }
    }

    /// Go idle if the selection refers to `object`
    pub fn release_object(&mut self, object: &ObjectId, ctx: &mut SelectionContext<'_>) {
        if self.current.object() == Some(object) {
            self.clear(ctx);
        }
    }

    /// Revert all highlight side effects and return to idle
    fn teardown(&mut self, ctx: &mut SelectionContext<'_>) {
        match std::mem::take(&mut self.highlight) {
            Highlight::None => {}
            Highlight::Material { object, original } => {
                if !ctx.renderer.set_material(&object, original) {
                    tracing::debug!("Material of {} not restored: mesh already disposed", object);
                }
            }
            Highlight::Overlay(handle) => ctx.renderer.dispose_overlay(handle),
        }
        if let Some(gizmo) = ctx.gizmo.as_deref_mut() {
            gizmo.detach();
        }
        self.current = Selection::None;
    }

    fn apply(&mut self, target: &Selection, ctx: &mut SelectionContext<'_>) -> Result<(), String> {
        let highlight = match target {
            Selection::None => Highlight::None,
            Selection::Object { object } => {
                let obj = find(ctx.scene, object)?;
                let original = ctx
                    .renderer
                    .material(object)
                    .ok_or_else(|| format!("object {} is not rendered", object))?;
                let highlight = ctx.renderer.highlight_material();
                if !ctx.renderer.set_material(object, highlight) {
                    return Err(format!("object {} rejected the highlight material", object));
                }
                if let Some(gizmo) = ctx.gizmo.as_deref_mut() {
                    gizmo.attach(object, pivot(&obj.transform));
                }
                Highlight::Material {
                    object: object.clone(),
                    original,
                }
            }
            Selection::Face { object, face } => {
                let obj = find(ctx.scene, object)?;
                let mesh = face_overlay(&obj.geometry, &obj.topology, *face, &obj.world_matrix())
                    .ok_or_else(|| format!("object {} has no face {}", object, face))?;
                Highlight::Overlay(ctx.renderer.add_overlay(Overlay::Face {
                    object: object.clone(),
                    mesh,
                    color: ctx.overlay_color,
                }))
            }
            Selection::Edge { object, edge } => {
                let obj = find(ctx.scene, object)?;
                match obj.topology.edge(*edge) {
                    Some(e) if e.selectable => {}
                    Some(_) => return Err(format!("edge {} of {} is a smoothing seam", edge, object)),
                    None => return Err(format!("object {} has no edge {}", object, edge)),
                }
                let lines = edge_overlay(&obj.geometry, *edge, &obj.world_matrix(), ctx.overlay_color)
                    .ok_or_else(|| format!("edge {} of {} has no geometry", edge, object))?;
                Highlight::Overlay(ctx.renderer.add_overlay(Overlay::Edge {
                    object: object.clone(),
                    lines,
                }))
            }
        };

        self.highlight = highlight;
        self.current = target.clone();
        Ok(())
    }
}

fn find<'s>(scene: &'s SceneState, id: &ObjectId) -> Result<&'s SceneObject, String> {
    scene
        .get(id)
        .ok_or_else(|| format!("object {} not found", id))
}

fn attach_gizmo(ctx: &mut SelectionContext<'_>, object: &ObjectId) {
    let Some(obj) = ctx.scene.get(object) else {
        return;
    };
    if let Some(gizmo) = ctx.gizmo.as_deref_mut() {
        if gizmo.attached() != Some(object) {
            gizmo.attach(object, pivot(&obj.transform));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HeadlessRenderer;
    use crate::viewport::gizmo::TranslateGizmo;
    use shared::{BoxParams, Shape, Transform};

    struct Fixture {
        scene: SceneState,
        renderer: HeadlessRenderer,
        gizmo: TranslateGizmo,
        a: ObjectId,
        b: ObjectId,
    }

    impl Fixture {
        fn new() -> Self {
            let mut scene = SceneState::default();
            let mut renderer = HeadlessRenderer::new();
            let cube = || {
                Shape::Box(BoxParams {
                    width: 1.0,
                    height: 1.0,
                    depth: 1.0,
                })
            };
            let a = scene
                .add_object(None, cube(), Transform::new(), None)
                .unwrap();
            let b = scene
                .add_object(None, cube(), Transform::at([3.0, 0.0, 0.0]), None)
                .unwrap();
            for obj in scene.objects() {
                renderer.add_mesh(&obj.id, &obj.geometry, obj.world_matrix(), obj.color);
            }
            Self {
                scene,
                renderer,
                gizmo: TranslateGizmo::new(1.0, 0.15),
                a,
                b,
            }
        }

        fn select(&mut self, sel: &mut SelectionState, target: Selection) -> Selection {
            let mut ctx = SelectionContext {
                scene: &self.scene,
                renderer: &mut self.renderer,
                gizmo: Some(&mut self.gizmo),
                overlay_color: [1.0; 4],
            };
            sel.select(target, &mut ctx).clone()
        }
    }

    #[test]
    fn test_object_then_object_restores_first_material() {
        let mut f = Fixture::new();
        let mut sel = SelectionState::default();
        let original_a = f.renderer.material(&f.a).unwrap();
        let original_b = f.renderer.material(&f.b).unwrap();

        f.select(&mut sel, Selection::Object { object: f.a.clone() });
        assert_eq!(f.renderer.highlighted(), vec![&f.a]);
        assert_eq!(f.gizmo.attached(), Some(&f.a));

        f.select(&mut sel, Selection::Object { object: f.b.clone() });
        assert_eq!(f.renderer.material(&f.a), Some(original_a));
        assert_eq!(f.renderer.highlighted(), vec![&f.b]);
        assert_eq!(f.gizmo.attached(), Some(&f.b));

        f.select(&mut sel, Selection::None);
        assert_eq!(f.renderer.material(&f.b), Some(original_b));
        assert!(f.renderer.highlighted().is_empty());
        assert_eq!(f.gizmo.attached(), None);
    }

    #[test]
    fn test_repeated_cycles_do_not_drift_original() {
        let mut f = Fixture::new();
        let mut sel = SelectionState::default();
        let original = f.renderer.material(&f.a).unwrap();
        for _ in 0..5 {
            f.select(&mut sel, Selection::Object { object: f.a.clone() });
            f.select(&mut sel, Selection::Object { object: f.a.clone() });
            f.select(&mut sel, Selection::None);
        }
        assert_eq!(f.renderer.material(&f.a), Some(original));
    }

    #[test]
    fn test_deselect_when_idle_is_noop() {
        let mut f = Fixture::new();
        let mut sel = SelectionState::default();
        let s = f.select(&mut sel, Selection::None);
        assert_eq!(s, Selection::None);
        assert_eq!(f.renderer.overlay_count(), 0);
        assert_eq!(f.renderer.disposed_overlays(), 0);
        assert!(f.renderer.highlighted().is_empty());
    }

    #[test]
    fn test_face_and_edge_overlays_are_exclusive() {
        let mut f = Fixture::new();
        let mut sel = SelectionState::default();

        f.select(&mut sel, Selection::Object { object: f.a.clone() });
        f.select(&mut sel, Selection::Face { object: f.a.clone(), face: 2 });
        assert!(f.renderer.highlighted().is_empty(), "face selection keeps material");
        assert_eq!(f.renderer.overlay_count(), 1);
        assert_eq!(f.gizmo.attached(), None);

        let edge = f.scene.get(&f.a).unwrap().topology.selectable_edges().next().unwrap().key;
        f.select(&mut sel, Selection::Edge { object: f.a.clone(), edge });
        assert_eq!(f.renderer.overlay_count(), 1);
        assert_eq!(f.renderer.disposed_overlays(), 1);
        let (_, overlay) = f.renderer.overlays().next().unwrap();
        assert_eq!(overlay.kind(), "edge");

        f.select(&mut sel, Selection::None);
        assert_eq!(f.renderer.overlay_count(), 0);
        assert_eq!(f.renderer.disposed_overlays(), 2);
    }

    #[test]
    fn test_reselecting_face_keeps_overlay() {
        let mut f = Fixture::new();
        let mut sel = SelectionState::default();
        let target = Selection::Face { object: f.a.clone(), face: 0 };
        f.select(&mut sel, target.clone());
        let first = sel.overlay();
        f.select(&mut sel, target);
        assert_eq!(sel.overlay(), first);
        assert_eq!(f.renderer.overlay_count(), 1);
    }

    /// Renderer that knows every mesh but refuses material swaps
    struct LockedMaterials(HeadlessRenderer);

    impl SceneRenderer for LockedMaterials {
        fn add_mesh(
            &mut self,
            id: &ObjectId,
            geometry: &crate::viewport::mesh::MeshGeometry,
            world: glam::Mat4,
            color: [f32; 3],
        ) {
            self.0.add_mesh(id, geometry, world, color)
        }
        fn update_transform(&mut self, id: &ObjectId, world: glam::Mat4) {
            self.0.update_transform(id, world)
        }
        fn remove_mesh(&mut self, id: &ObjectId) {
            self.0.remove_mesh(id)
        }
        fn material(&self, id: &ObjectId) -> Option<crate::render::MaterialHandle> {
            self.0.material(id)
        }
        fn set_material(&mut self, _id: &ObjectId, _material: crate::render::MaterialHandle) -> bool {
            false
        }
        fn highlight_material(&self) -> crate::render::MaterialHandle {
            self.0.highlight_material()
        }
        fn set_highlight_color(&mut self, color: [f32; 4]) {
            self.0.set_highlight_color(color)
        }
        fn add_overlay(&mut self, overlay: Overlay) -> crate::render::OverlayHandle {
            self.0.add_overlay(overlay)
        }
        fn dispose_overlay(&mut self, handle: crate::render::OverlayHandle) {
            self.0.dispose_overlay(handle)
        }
        fn set_cursor(&mut self, cursor: crate::render::CursorHint) {
            self.0.set_cursor(cursor)
        }
    }

    #[test]
    fn test_rejected_highlight_material_leaves_idle() {
        let f = Fixture::new();
        let mut renderer = LockedMaterials(f.renderer);
        let mut gizmo = f.gizmo;
        let mut sel = SelectionState::default();
        let mut ctx = SelectionContext {
            scene: &f.scene,
            renderer: &mut renderer,
            gizmo: Some(&mut gizmo),
            overlay_color: [1.0; 4],
        };

        let s = sel.select(Selection::Object { object: f.a.clone() }, &mut ctx).clone();
        assert_eq!(s, Selection::None);
        assert!(!sel.has_highlight());
        assert!(gizmo.attached().is_none());
        assert!(renderer.0.highlighted().is_empty());
    }

    #[test]
    fn test_invalid_targets_leave_idle() {
        let mut f = Fixture::new();
        let mut sel = SelectionState::default();
        f.select(&mut sel, Selection::Object { object: f.a.clone() });

        let s = f.select(&mut sel, Selection::Face { object: f.a.clone(), face: 42 });
        assert_eq!(s, Selection::None);
        assert!(f.renderer.highlighted().is_empty());

        // Face diagonal of a cube side is a seam
        let seam = f.scene.get(&f.a).unwrap().topology.edges.iter().find(|e| !e.selectable).unwrap().key;
        assert_eq!(f.select(&mut sel, Selection::Edge { object: f.a.clone(), edge: seam }), Selection::None);

        let s = f.select(&mut sel, Selection::Object { object: "missing".into() });
        assert_eq!(s, Selection::None);
        assert!(!sel.has_highlight());
    }

    #[test]
    fn test_selection_without_gizmo_still_highlights() {
        let mut f = Fixture::new();
        let mut sel = SelectionState::default();
        let mut ctx = SelectionContext {
            scene: &f.scene,
            renderer: &mut f.renderer,
            gizmo: None,
            overlay_color: [1.0; 4],
        };
        sel.select(Selection::Object { object: f.a.clone() }, &mut ctx);
        assert_eq!(f.renderer.highlighted(), vec![&f.a]);
    }
}
