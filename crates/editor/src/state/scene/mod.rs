//! Scene state management
//!
//! The scene owns its objects in creation order. Each object carries its
//! construction shape, transform, geometry and the topology derived from that
//! geometry; topology is recomputed only when the geometry is replaced.

mod object_ops;
mod persistence;

pub use persistence::ImportReport;

use glam::Mat4;
use shared::{ObjectId, ObjectKind, Shape, Transform};

use crate::build;
use crate::viewport::edge::DEFAULT_CREASE_ANGLE;
use crate::viewport::mesh::MeshGeometry;
use crate::viewport::picking::PickTarget;
use crate::viewport::topology::MeshTopology;

/// One renderable object of the scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    /// Exact construction inputs, kept for re-export
    pub shape: Shape,
    pub transform: Transform,
    pub color: [f32; 3],
    pub geometry: MeshGeometry,
    pub topology: MeshTopology,
}

impl SceneObject {
    pub fn kind(&self) -> ObjectKind {
        self.shape.kind()
    }

    /// Local-to-world matrix of the current transform
    pub fn world_matrix(&self) -> Mat4 {
        build::world_matrix(&self.transform)
    }

    pub fn pick_target(&self) -> PickTarget<'_> {
        PickTarget {
            id: &self.id,
            geometry: &self.geometry,
            topology: &self.topology,
            world: self.world_matrix(),
        }
    }
}

/// Scene objects plus a mutation counter
#[derive(Debug)]
pub struct SceneState {
    pub(crate) objects: Vec<SceneObject>,
    /// Crease angle used when analyzing new geometry
    pub(crate) crease_angle: f32,
    /// Monotonically increasing version counter
    pub(crate) version: u64,
}

impl Default for SceneState {
    fn default() -> Self {
        Self::new(DEFAULT_CREASE_ANGLE)
    }
}

impl SceneState {
    pub fn new(crease_angle: f32) -> Self {
        Self {
            objects: Vec::new(),
            crease_angle,
            version: 0,
        }
    }

    /// Current scene version (increments on every mutation)
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn crease_angle(&self) -> f32 {
        self.crease_angle
    }

    /// Get an object by ID
    pub fn get(&self, id: &ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == *id)
    }

    pub(crate) fn get_mut(&mut self, id: &ObjectId) -> Option<&mut SceneObject> {
        self.objects.iter_mut().find(|o| o.id == *id)
    }

    pub fn contains(&self, id: &ObjectId) -> bool {
        self.get(id).is_some()
    }

    /// Objects in creation order
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn ids(&self) -> Vec<ObjectId> {
        self.objects.iter().map(|o| o.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Pick candidates with world matrices current as of this call
    pub fn pick_targets(&self) -> Vec<PickTarget<'_>> {
        self.objects.iter().map(SceneObject::pick_target).collect()
    }
}
