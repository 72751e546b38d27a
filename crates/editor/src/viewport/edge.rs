//! Mesh edges and crease classification
//!
//! Edges are keyed by their canonical `(min, max)` vertex-index pair so the
//! two triangles sharing an edge resolve to the same key regardless of
//! winding. Interior edges are only selectable when the faces on either side
//! meet at an angle above the crease threshold; boundary edges always are.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::topology::FaceId;

/// Default crease threshold in radians (~57 degrees)
pub const DEFAULT_CREASE_ANGLE: f32 = 1.0;

/// Canonical undirected edge key: (smaller vertex index, larger vertex index)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey(pub u32, pub u32);

impl EdgeKey {
    pub fn new(a: u32, b: u32) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    pub fn start(&self) -> u32 {
        self.0
    }

    pub fn end(&self) -> u32 {
        self.1
    }
}

impl std::fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.0, self.1)
    }
}

/// Represents an edge in a mesh
#[derive(Debug, Clone, PartialEq)]
pub struct MeshEdge {
    pub key: EdgeKey,
    /// Local-space length
    pub length: f32,
    /// Local-space midpoint
    pub midpoint: Vec3,
    /// Triangles using this edge, in scan order
    pub triangles: Vec<usize>,
    /// Distinct faces owning those triangles, in scan order
    pub faces: Vec<FaceId>,
    /// Boundary or crease edge (pick candidate and overlay-visible)
    pub selectable: bool,
}

impl MeshEdge {
    /// Edge used by exactly one triangle
    pub fn is_boundary(&self) -> bool {
        self.triangles.len() == 1
    }

    /// Number of triangles using this edge
    pub fn count(&self) -> usize {
        self.triangles.len()
    }
}

/// Angle between two face normals (in radians)
pub fn dihedral_angle(normal_a: Vec3, normal_b: Vec3) -> f32 {
    normal_a
        .normalize_or_zero()
        .dot(normal_b.normalize_or_zero())
        .clamp(-1.0, 1.0)
        .acos()
}

/// Decide whether an edge is selectable.
///
/// Boundary edges always are. Interior edges are creases when the angle
/// between the adjacent face normals exceeds `threshold` (radians); below it
/// they are smoothing seams.
pub fn classify(edge: &MeshEdge, normal_a: Vec3, normal_b: Vec3, threshold: f32) -> bool {
    if edge.is_boundary() {
        return true;
    }
    dihedral_angle(normal_a, normal_b) > threshold
}
