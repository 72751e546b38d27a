//! Face and edge structure derived from triangle geometry
//!
//! `analyze` turns a position buffer (plus optional index buffer and group
//! ranges) into logical faces and deduplicated edges. Identifiers are
//! assigned in ascending triangle-scan order, so analyzing the same buffers
//! twice yields identical ids. Invalid geometry yields empty topology.

use std::collections::HashMap;

use glam::Vec3;

use super::edge::{classify, EdgeKey, MeshEdge, DEFAULT_CREASE_ANGLE};
use super::mesh::MeshGeometry;
use crate::validation::MeshValidator;

/// Index of a face within its `MeshTopology`
pub type FaceId = usize;

/// Logical face: one group range, or a single triangle for ungrouped geometry
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub id: FaceId,
    /// Triangle indices belonging to this face, ascending
    pub triangles: Vec<usize>,
    /// Unit normal of the first non-degenerate triangle
    pub normal: Vec3,
    /// Mean of the face's triangle vertices
    pub centroid: Vec3,
    pub area: f32,
    pub material_index: u32,
}

/// Derived face map and edge list of one geometry version
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshTopology {
    pub faces: Vec<Face>,
    pub edges: Vec<MeshEdge>,
    /// Owning face of every triangle
    pub triangle_faces: Vec<FaceId>,
    edge_lookup: HashMap<EdgeKey, usize>,
}

impl MeshTopology {
    /// No faces and no edges: unpickable below object granularity
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty() && self.edges.is_empty()
    }

    pub fn face(&self, id: FaceId) -> Option<&Face> {
        self.faces.get(id)
    }

    pub fn face_of_triangle(&self, triangle: usize) -> Option<FaceId> {
        self.triangle_faces.get(triangle).copied()
    }

    pub fn edge(&self, key: EdgeKey) -> Option<&MeshEdge> {
        self.edge_lookup.get(&key).map(|&i| &self.edges[i])
    }

    /// Boundary and crease edges, in edge-list order
    pub fn selectable_edges(&self) -> impl Iterator<Item = &MeshEdge> {
        self.edges.iter().filter(|e| e.selectable)
    }

    pub fn boundary_edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.is_boundary()).count()
    }
}

/// Analyze geometry with the default crease angle
pub fn analyze(geometry: &MeshGeometry) -> MeshTopology {
    analyze_with_threshold(geometry, DEFAULT_CREASE_ANGLE)
}

/// Analyze geometry, classifying interior edges against `crease_angle` (radians)
pub fn analyze_with_threshold(geometry: &MeshGeometry, crease_angle: f32) -> MeshTopology {
    let errors = MeshValidator::new(geometry).validate_all();
    if !errors.is_empty() {
        tracing::warn!("Geometry not analyzable, no faces/edges derived: {:?}", errors);
        return MeshTopology::default();
    }

    let tri_count = geometry.triangle_count();
    let (faces, triangle_faces) = derive_faces(geometry, tri_count);
    let (edges, edge_lookup) = derive_edges(geometry, tri_count, &faces, &triangle_faces, crease_angle);

    tracing::debug!(
        "Analyzed geometry: {} triangles, {} faces, {} edges",
        tri_count,
        faces.len(),
        edges.len()
    );

    MeshTopology {
        faces,
        edges,
        triangle_faces,
        edge_lookup,
    }
}

// ── Faces ────────────────────────────────────────────────────

fn derive_faces(geometry: &MeshGeometry, tri_count: usize) -> (Vec<Face>, Vec<FaceId>) {
    // Group of each triangle; first matching range wins
    let mut tri_group: Vec<Option<usize>> = vec![None; tri_count];
    for (g, group) in geometry.groups.iter().enumerate() {
        for slot in tri_group.iter_mut().skip(group.start).take(group.count) {
            if slot.is_none() {
                *slot = Some(g);
            }
        }
    }

    let mut faces: Vec<Face> = Vec::new();
    let mut triangle_faces = Vec::with_capacity(tri_count);
    let mut group_face: HashMap<usize, FaceId> = HashMap::new();

    for (tri, group) in tri_group.iter().enumerate() {
        let face_id = match group {
            Some(g) => *group_face.entry(*g).or_insert_with(|| {
                faces.push(empty_face(faces.len(), geometry.groups[*g].material_index));
                faces.len() - 1
            }),
            None => {
                faces.push(empty_face(faces.len(), 0));
                faces.len() - 1
            }
        };
        faces[face_id].triangles.push(tri);
        triangle_faces.push(face_id);
    }

    for face in &mut faces {
        fill_face_metrics(geometry, face);
    }

    (faces, triangle_faces)
}

fn empty_face(id: FaceId, material_index: u32) -> Face {
    Face {
        id,
        triangles: Vec::new(),
        normal: Vec3::ZERO,
        centroid: Vec3::ZERO,
        area: 0.0,
        material_index,
    }
}

fn fill_face_metrics(geometry: &MeshGeometry, face: &mut Face) {
    let mut sum = Vec3::ZERO;
    let mut count = 0;

    for &tri in &face.triangles {
        let Some([a, b, c]) = geometry.triangle_positions(tri) else {
            continue;
        };
        if face.normal == Vec3::ZERO {
            face.normal = triangle_normal(a, b, c);
        }
        face.area += heron_area(a, b, c);
        sum += a + b + c;
        count += 3;
    }

    if count > 0 {
        face.centroid = sum / count as f32;
    }
}

/// Unit normal from the cross product of two edge vectors (zero if degenerate)
pub fn triangle_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - a).normalize_or_zero()
}

/// Triangle area from its three side lengths
pub fn heron_area(a: Vec3, b: Vec3, c: Vec3) -> f32 {
    let la = a.distance(b);
    let lb = b.distance(c);
    let lc = c.distance(a);
    let s = (la + lb + lc) * 0.5;
    (s * (s - la) * (s - lb) * (s - lc)).max(0.0).sqrt()
}

// ── Edges ────────────────────────────────────────────────────

fn derive_edges(
    geometry: &MeshGeometry,
    tri_count: usize,
    faces: &[Face],
    triangle_faces: &[FaceId],
    crease_angle: f32,
) -> (Vec<MeshEdge>, HashMap<EdgeKey, usize>) {
    let mut edges: Vec<MeshEdge> = Vec::new();
    let mut lookup: HashMap<EdgeKey, usize> = HashMap::new();

    for tri in 0..tri_count {
        let [i0, i1, i2] = geometry.triangle(tri);
        for (a, b) in [(i0, i1), (i1, i2), (i2, i0)] {
            if a == b {
                continue;
            }
            let key = EdgeKey::new(a, b);
            let idx = *lookup.entry(key).or_insert_with(|| {
                edges.push(MeshEdge {
                    key,
                    length: 0.0,
                    midpoint: Vec3::ZERO,
                    triangles: Vec::new(),
                    faces: Vec::new(),
                    selectable: false,
                });
                edges.len() - 1
            });
            let edge = &mut edges[idx];
            if edge.triangles.last() != Some(&tri) {
                edge.triangles.push(tri);
            }
        }
    }

    for edge in &mut edges {
        let (Some(p0), Some(p1)) = (geometry.position(edge.key.0), geometry.position(edge.key.1))
        else {
            continue;
        };
        edge.length = p0.distance(p1);
        edge.midpoint = (p0 + p1) * 0.5;

        for &tri in &edge.triangles {
            let face = triangle_faces[tri];
            if !edge.faces.contains(&face) {
                edge.faces.push(face);
            }
        }

        edge.selectable = match edge.triangles.as_slice() {
            [t0, t1] => {
                let n0 = faces[triangle_faces[*t0]].normal;
                let n1 = faces[triangle_faces[*t1]].normal;
                classify(edge, n0, n1, crease_angle)
            }
            // Boundary, or non-manifold fan treated as a crease
            _ => true,
        };
    }

    (edges, lookup)
}
