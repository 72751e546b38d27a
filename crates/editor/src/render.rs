//! Renderer collaborator interface
//!
//! The editor core never draws. It registers object meshes, swaps materials,
//! inserts and disposes overlay nodes and signals a cursor hint through
//! `SceneRenderer`. `HeadlessRenderer` records those calls for the command
//! harness and for tests.

use std::collections::{BTreeMap, HashMap};

use glam::Mat4;
use serde::Serialize;
use shared::ObjectId;

use crate::viewport::mesh::{LineMeshData, MeshGeometry};

/// Opaque material reference owned by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MaterialHandle(pub u64);

/// Opaque handle of an inserted overlay node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct OverlayHandle(pub u64);

/// Transient render-only node
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    /// Triangles covering one selected face (world space)
    Face {
        object: ObjectId,
        mesh: MeshGeometry,
        color: [f32; 4],
    },
    /// Line segment over one selected edge (world space)
    Edge {
        object: ObjectId,
        lines: LineMeshData,
    },
    /// Wireframe of an in-progress sketch on the ground plane
    SketchPreview { lines: LineMeshData },
}

impl Overlay {
    pub fn kind(&self) -> &'static str {
        match self {
            Overlay::Face { .. } => "face",
            Overlay::Edge { .. } => "edge",
            Overlay::SketchPreview { .. } => "sketch_preview",
        }
    }
}

/// Cursor the UI should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorHint {
    #[default]
    Default,
    Crosshair,
}

/// Capabilities the core consumes from the rendering engine
pub trait SceneRenderer {
    /// Register an object's mesh with its world matrix and base color.
    /// Re-registering an id replaces the previous mesh and material.
    fn add_mesh(&mut self, id: &ObjectId, geometry: &MeshGeometry, world: Mat4, color: [f32; 3]);
    fn update_transform(&mut self, id: &ObjectId, world: Mat4);
    /// Dispose an object's mesh and material
    fn remove_mesh(&mut self, id: &ObjectId);
    /// Material currently assigned to an object
    fn material(&self, id: &ObjectId) -> Option<MaterialHandle>;
    /// Returns false if the object is unknown
    fn set_material(&mut self, id: &ObjectId, material: MaterialHandle) -> bool;
    /// Shared material used for object highlighting
    fn highlight_material(&self) -> MaterialHandle;
    /// Color of the shared highlight material (RGBA)
    fn set_highlight_color(&mut self, color: [f32; 4]);
    fn add_overlay(&mut self, overlay: Overlay) -> OverlayHandle;
    /// Remove an overlay and free its geometry
    fn dispose_overlay(&mut self, handle: OverlayHandle);
    fn set_cursor(&mut self, cursor: CursorHint);
}

// ── Headless renderer ───────────────────────────────────────

/// Mesh as registered with the headless renderer
#[derive(Debug, Clone)]
pub struct RenderedMesh {
    pub triangle_count: usize,
    pub world: Mat4,
    pub color: [f32; 3],
    pub material: MaterialHandle,
    /// The object's own material, as created at registration
    pub base_material: MaterialHandle,
}

/// Renderer that only records state
#[derive(Debug)]
pub struct HeadlessRenderer {
    meshes: HashMap<ObjectId, RenderedMesh>,
    overlays: BTreeMap<OverlayHandle, Overlay>,
    highlight: MaterialHandle,
    highlight_color: [f32; 4],
    cursor: CursorHint,
    next_material: u64,
    next_overlay: u64,
    disposed_overlays: usize,
    disposed_meshes: usize,
}

impl Default for HeadlessRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self {
            meshes: HashMap::new(),
            overlays: BTreeMap::new(),
            highlight: MaterialHandle(0),
            highlight_color: [1.0; 4],
            cursor: CursorHint::Default,
            next_material: 1,
            next_overlay: 1,
            disposed_overlays: 0,
            disposed_meshes: 0,
        }
    }

    pub fn mesh(&self, id: &ObjectId) -> Option<&RenderedMesh> {
        self.meshes.get(id)
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn overlays(&self) -> impl Iterator<Item = (&OverlayHandle, &Overlay)> {
        self.overlays.iter()
    }

    pub fn overlay(&self, handle: OverlayHandle) -> Option<&Overlay> {
        self.overlays.get(&handle)
    }

    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    /// Objects currently wearing the highlight material
    pub fn highlighted(&self) -> Vec<&ObjectId> {
        let mut ids: Vec<&ObjectId> = self
            .meshes
            .iter()
            .filter(|(_, m)| m.material == self.highlight)
            .map(|(id, _)| id)
            .collect();
        ids.sort();
        ids
    }

    pub fn cursor(&self) -> CursorHint {
        self.cursor
    }

    pub fn highlight_color(&self) -> [f32; 4] {
        self.highlight_color
    }

    pub fn disposed_overlays(&self) -> usize {
        self.disposed_overlays
    }

    pub fn disposed_meshes(&self) -> usize {
        self.disposed_meshes
    }
}

impl SceneRenderer for HeadlessRenderer {
    fn add_mesh(&mut self, id: &ObjectId, geometry: &MeshGeometry, world: Mat4, color: [f32; 3]) {
        let material = MaterialHandle(self.next_material);
        self.next_material += 1;
        let previous = self.meshes.insert(
            id.clone(),
            RenderedMesh {
                triangle_count: geometry.triangle_count(),
                world,
                color,
                material,
                base_material: material,
            },
        );
        if previous.is_some() {
            self.disposed_meshes += 1;
        }
    }

    fn update_transform(&mut self, id: &ObjectId, world: Mat4) {
        if let Some(mesh) = self.meshes.get_mut(id) {
            mesh.world = world;
        }
    }

    fn remove_mesh(&mut self, id: &ObjectId) {
        if self.meshes.remove(id).is_some() {
            self.disposed_meshes += 1;
        }
    }

    fn material(&self, id: &ObjectId) -> Option<MaterialHandle> {
        self.meshes.get(id).map(|m| m.material)
    }

    fn set_material(&mut self, id: &ObjectId, material: MaterialHandle) -> bool {
        match self.meshes.get_mut(id) {
            Some(mesh) => {
                mesh.material = material;
                true
            }
            None => false,
        }
    }

    fn highlight_material(&self) -> MaterialHandle {
        self.highlight
    }

    fn set_highlight_color(&mut self, color: [f32; 4]) {
        self.highlight_color = color;
    }

    fn add_overlay(&mut self, overlay: Overlay) -> OverlayHandle {
        let handle = OverlayHandle(self.next_overlay);
        self.next_overlay += 1;
        self.overlays.insert(handle, overlay);
        handle
    }

    fn dispose_overlay(&mut self, handle: OverlayHandle) {
        if self.overlays.remove(&handle).is_some() {
            self.disposed_overlays += 1;
        }
    }

    fn set_cursor(&mut self, cursor: CursorHint) {
        self.cursor = cursor;
    }
}
