//! Viewport geometry: meshes, topology, picking, gizmo and overlays.
//!
//! Nothing in here draws; the renderer collaborator consumes the meshes and
//! overlays built here.

pub mod camera;
pub mod edge;
pub mod gizmo;
pub mod mesh;
pub mod overlays;
pub mod picking;
pub mod topology;

pub use camera::{ArcBallCamera, ViewCamera, Viewport};
pub use edge::EdgeKey;
pub use mesh::{LineMeshData, MeshGeometry};
pub use picking::{Hit, HitKind, PickModifiers, Ray};
pub use topology::{FaceId, MeshTopology};
