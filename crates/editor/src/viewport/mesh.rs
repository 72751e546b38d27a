use glam::Vec3;

/// Contiguous range of triangles sharing one material slot.
///
/// Ranges are expressed in triangles, not indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryGroup {
    /// First triangle of the range
    pub start: usize,
    /// Number of triangles in the range
    pub count: usize,
    pub material_index: u32,
}

/// CPU-side triangle geometry: position buffer, optional index buffer, optional groups.
///
/// Without indices every three consecutive positions form one triangle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshGeometry {
    pub positions: Vec<[f32; 3]>,
    pub indices: Option<Vec<u32>>,
    pub groups: Vec<GeometryGroup>,
}

impl MeshGeometry {
    pub fn indexed(positions: Vec<[f32; 3]>, indices: Vec<u32>) -> Self {
        Self {
            positions,
            indices: Some(indices),
            groups: Vec::new(),
        }
    }

    pub fn non_indexed(positions: Vec<[f32; 3]>) -> Self {
        Self {
            positions,
            indices: None,
            groups: Vec::new(),
        }
    }

    pub fn with_groups(mut self, groups: Vec<GeometryGroup>) -> Self {
        self.groups = groups;
        self
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        match &self.indices {
            Some(indices) => indices.len() / 3,
            None => self.positions.len() / 3,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Vertex indices of a triangle (implicit for non-indexed geometry)
    pub fn triangle(&self, tri: usize) -> [u32; 3] {
        match &self.indices {
            Some(indices) => [indices[tri * 3], indices[tri * 3 + 1], indices[tri * 3 + 2]],
            None => {
                let base = (tri * 3) as u32;
                [base, base + 1, base + 2]
            }
        }
    }

    pub fn position(&self, vertex: u32) -> Option<Vec3> {
        self.positions.get(vertex as usize).map(|p| Vec3::from(*p))
    }

    /// Local-space corners of a triangle, or None if an index is out of range
    pub fn triangle_positions(&self, tri: usize) -> Option<[Vec3; 3]> {
        if tri >= self.triangle_count() {
            return None;
        }
        let [a, b, c] = self.triangle(tri);
        Some([self.position(a)?, self.position(b)?, self.position(c)?])
    }
}

/// Lines mesh: interleaved [pos.x, pos.y, pos.z, r, g, b, a], two vertices per segment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineMeshData {
    /// 7 floats per vertex: position(3) + color(4)
    pub vertices: Vec<f32>,
}

impl LineMeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 7
    }

    pub fn segment_count(&self) -> usize {
        self.vertex_count() / 2
    }

    pub fn push_segment(&mut self, a: Vec3, b: Vec3, color: [f32; 4]) {
        push_line_vert(&mut self.vertices, a, color);
        push_line_vert(&mut self.vertices, b, color);
    }

    /// Vertex position by index
    pub fn point(&self, i: usize) -> Vec3 {
        let base = i * 7;
        Vec3::new(
            self.vertices[base],
            self.vertices[base + 1],
            self.vertices[base + 2],
        )
    }
}

// ── Primitive generation ─────────────────────────────────────

/// Box centered at the origin: 8 shared corners, one group per side (+X, -X, +Y, -Y, +Z, -Z).
pub fn cube(w: f32, h: f32, d: f32) -> MeshGeometry {
    let hw = w * 0.5;
    let hh = h * 0.5;
    let hd = d * 0.5;

    // Corner i: bit 0 -> +X, bit 1 -> +Y, bit 2 -> +Z
    let positions: Vec<[f32; 3]> = (0..8u32)
        .map(|i| {
            [
                if i & 1 != 0 { hw } else { -hw },
                if i & 2 != 0 { hh } else { -hh },
                if i & 4 != 0 { hd } else { -hd },
            ]
        })
        .collect();

    // Counter-clockwise seen from outside
    let quads: [[u32; 4]; 6] = [
        [1, 3, 7, 5], // +X
        [0, 4, 6, 2], // -X
        [2, 6, 7, 3], // +Y
        [0, 1, 5, 4], // -Y
        [4, 5, 7, 6], // +Z
        [0, 2, 3, 1], // -Z
    ];

    let mut indices = Vec::with_capacity(36);
    let mut groups = Vec::with_capacity(6);
    for (side, q) in quads.iter().enumerate() {
        groups.push(GeometryGroup {
            start: side * 2,
            count: 2,
            material_index: side as u32,
        });
        indices.extend_from_slice(&[q[0], q[1], q[2], q[0], q[2], q[3]]);
    }

    MeshGeometry::indexed(positions, indices).with_groups(groups)
}

/// UV sphere with a shared seam and single pole vertices (closed manifold, no groups).
pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshGeometry {
    let sectors = width_segments.max(3);
    let rings = height_segments.max(2);

    let mut positions = Vec::new();
    positions.push([0.0, radius, 0.0]);
    for r in 1..rings {
        let phi = std::f32::consts::PI * r as f32 / rings as f32;
        for s in 0..sectors {
            let theta = std::f32::consts::TAU * s as f32 / sectors as f32;
            positions.push([
                radius * phi.sin() * theta.cos(),
                radius * phi.cos(),
                radius * phi.sin() * theta.sin(),
            ]);
        }
    }
    let south = positions.len() as u32;
    positions.push([0.0, -radius, 0.0]);

    let ring = |r: u32, s: u32| 1 + (r - 1) * sectors + (s % sectors);

    let mut indices = Vec::new();
    for s in 0..sectors {
        indices.extend_from_slice(&[0, ring(1, s + 1), ring(1, s)]);
    }
    for r in 1..(rings - 1) {
        for s in 0..sectors {
            let a = ring(r, s);
            let b = ring(r, s + 1);
            let c = ring(r + 1, s);
            let d = ring(r + 1, s + 1);
            indices.extend_from_slice(&[a, b, c, b, d, c]);
        }
    }
    for s in 0..sectors {
        indices.extend_from_slice(&[ring(rings - 1, s), ring(rings - 1, s + 1), south]);
    }

    MeshGeometry::indexed(positions, indices)
}

/// Cylinder (or cone when one radius is zero) along Y, centered at the origin.
///
/// Groups: side (0), top cap (1), bottom cap (2). Caps share the rim vertices with the side.
pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> MeshGeometry {
    let segments = segments.max(3);
    let hh = height * 0.5;
    let mut positions: Vec<[f32; 3]> = Vec::new();

    let top = push_ring(&mut positions, radius_top, hh, segments);
    let bottom = push_ring(&mut positions, radius_bottom, -hh, segments);

    let mut indices = Vec::new();
    let mut groups = Vec::new();

    // Side
    let start = indices.len() / 3;
    for s in 0..segments {
        let a = top.at(s);
        let b = top.at(s + 1);
        let c = bottom.at(s);
        let d = bottom.at(s + 1);
        if a != b {
            indices.extend_from_slice(&[a, b, c]);
        }
        if c != d {
            indices.extend_from_slice(&[b, d, c]);
        }
    }
    groups.push(GeometryGroup {
        start,
        count: indices.len() / 3 - start,
        material_index: 0,
    });

    // Top cap
    if radius_top > 0.0 {
        let center = positions.len() as u32;
        positions.push([0.0, hh, 0.0]);
        let start = indices.len() / 3;
        for s in 0..segments {
            indices.extend_from_slice(&[center, top.at(s + 1), top.at(s)]);
        }
        groups.push(GeometryGroup {
            start,
            count: segments as usize,
            material_index: 1,
        });
    }

    // Bottom cap
    if radius_bottom > 0.0 {
        let center = positions.len() as u32;
        positions.push([0.0, -hh, 0.0]);
        let start = indices.len() / 3;
        for s in 0..segments {
            indices.extend_from_slice(&[bottom.at(s), bottom.at(s + 1), center]);
        }
        groups.push(GeometryGroup {
            start,
            count: segments as usize,
            material_index: 2,
        });
    }

    MeshGeometry::indexed(positions, indices).with_groups(groups)
}

// ── Helpers ──────────────────────────────────────────────────

/// Ring of vertices on a horizontal circle, or a single apex when the radius is zero
struct Ring {
    first: u32,
    len: u32,
}

impl Ring {
    fn at(&self, s: u32) -> u32 {
        self.first + s % self.len
    }
}

fn push_ring(positions: &mut Vec<[f32; 3]>, radius: f32, y: f32, segments: u32) -> Ring {
    let first = positions.len() as u32;
    if radius <= 0.0 {
        positions.push([0.0, y, 0.0]);
        return Ring { first, len: 1 };
    }
    for i in 0..segments {
        let angle = (i as f32) * std::f32::consts::TAU / segments as f32;
        positions.push([radius * angle.cos(), y, radius * angle.sin()]);
    }
    Ring {
        first,
        len: segments,
    }
}

pub(crate) fn push_line_vert(v: &mut Vec<f32>, p: Vec3, c: [f32; 4]) {
    v.extend_from_slice(&[p.x, p.y, p.z, c[0], c[1], c[2], c[3]]);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_normal(geometry: &MeshGeometry, tri: usize) -> Vec3 {
        let [a, b, c] = geometry.triangle_positions(tri).unwrap();
        (b - a).cross(c - a).normalize()
    }

    #[test]
    fn test_cube_counts() {
        let cube = cube(1.0, 1.0, 1.0);
        assert_eq!(cube.vertex_count(), 8);
        assert_eq!(cube.triangle_count(), 12);
        assert_eq!(cube.groups.len(), 6);
    }

    #[test]
    fn test_cube_winding_is_outward() {
        let cube = cube(2.0, 2.0, 2.0);
        for tri in 0..cube.triangle_count() {
            let [a, b, c] = cube.triangle_positions(tri).unwrap();
            let centroid = (a + b + c) / 3.0;
            assert!(triangle_normal(&cube, tri).dot(centroid) > 0.0, "triangle {tri}");
        }
    }

    #[test]
    fn test_sphere_winding_is_outward() {
        let sphere = sphere(1.0, 8, 6);
        assert_eq!(sphere.vertex_count(), 2 + 5 * 8);
        for tri in 0..sphere.triangle_count() {
            let [a, b, c] = sphere.triangle_positions(tri).unwrap();
            let centroid = (a + b + c) / 3.0;
            assert!(triangle_normal(&sphere, tri).dot(centroid) > 0.0, "triangle {tri}");
        }
    }

    #[test]
    fn test_cylinder_groups_cover_all_triangles() {
        let cyl = cylinder(0.5, 0.5, 2.0, 12);
        let covered: usize = cyl.groups.iter().map(|g| g.count).sum();
        assert_eq!(covered, cyl.triangle_count());
        assert_eq!(cyl.groups.len(), 3);
    }

    #[test]
    fn test_cone_has_no_top_cap() {
        let cone = cylinder(0.0, 1.0, 2.0, 8);
        assert_eq!(cone.groups.len(), 2);
        assert_eq!(cone.triangle_count(), 8 + 8);
    }

    #[test]
    fn test_non_indexed_triangles_are_implicit() {
        let g = MeshGeometry::non_indexed(vec![[0.0; 3], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        assert_eq!(g.triangle_count(), 1);
        assert_eq!(g.triangle(0), [0, 1, 2]);
    }

    #[test]
    fn test_triangle_positions_rejects_bad_index() {
        let g = MeshGeometry::indexed(vec![[0.0; 3]; 3], vec![0, 1, 7]);
        assert!(g.triangle_positions(0).is_none());
        assert!(g.triangle_positions(1).is_none());
    }
}
