//! Geometry building for scene objects.
//!
//! Every shape variant is matched exhaustively; the resulting geometry is
//! analyzed once here and the topology is stored next to it on the object.

mod primitives;

pub use primitives::{create_primitive, pivot, world_matrix};

use shared::Shape;

use crate::error::EditorResult;
use crate::viewport::mesh::MeshGeometry;
use crate::viewport::topology::{analyze_with_threshold, MeshTopology};

/// Geometry of a shape together with its derived topology
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltMesh {
    pub geometry: MeshGeometry,
    pub topology: MeshTopology,
}

/// Build a shape's geometry and analyze it with the given crease angle
pub fn build_mesh(shape: &Shape, crease_angle: f32) -> EditorResult<BuiltMesh> {
    let geometry = create_primitive(shape)?;
    let topology = analyze_with_threshold(&geometry, crease_angle);
    if topology.is_empty() {
        tracing::warn!(
            "{} geometry has no faces or edges; it is pickable as a whole only",
            shape.kind()
        );
    }
    Ok(BuiltMesh { geometry, topology })
}
