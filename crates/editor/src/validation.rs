//! Geometry validation utilities.
//!
//! `MeshValidator` checks the buffer invariants the topology analyzer relies
//! on: a non-empty position buffer, index buffer stride, in-range indices,
//! implicit-triangle vertex counts and group ranges.

use crate::viewport::mesh::MeshGeometry;
use crate::viewport::picking::Aabb;

/// Validator for `MeshGeometry` integrity checks.
pub struct MeshValidator<'a> {
    mesh: &'a MeshGeometry,
}

impl<'a> MeshValidator<'a> {
    /// Create a new validator for the given geometry.
    pub fn new(mesh: &'a MeshGeometry) -> Self {
        Self { mesh }
    }

    /// Number of vertices in the position buffer.
    pub fn vertex_count(&self) -> usize {
        self.mesh.vertex_count()
    }

    /// Number of triangles (indexed or implicit).
    pub fn triangle_count(&self) -> usize {
        self.mesh.triangle_count()
    }

    /// Check that a position buffer is present.
    pub fn has_positions(&self) -> bool {
        !self.mesh.positions.is_empty()
    }

    /// Check that the triangle stride is valid: index length (or, without
    /// indices, vertex count) must be a multiple of 3.
    pub fn is_triangle_stride_valid(&self) -> bool {
        match &self.mesh.indices {
            Some(indices) => indices.len() % 3 == 0,
            None => self.mesh.positions.len() % 3 == 0,
        }
    }

    /// Check that all indices are within the valid vertex range.
    pub fn are_indices_in_range(&self) -> bool {
        let max_idx = self.vertex_count() as u32;
        self.mesh
            .indices
            .as_ref()
            .is_none_or(|indices| indices.iter().all(|&i| i < max_idx))
    }

    /// Check that all positions are finite.
    pub fn are_positions_finite(&self) -> bool {
        self.mesh
            .positions
            .iter()
            .all(|p| p.iter().all(|c| c.is_finite()))
    }

    /// Check that every group range lies inside the triangle range.
    pub fn are_groups_in_range(&self) -> bool {
        let tri_count = self.triangle_count();
        self.mesh
            .groups
            .iter()
            .all(|g| g.start + g.count <= tri_count)
    }

    /// Compute the axis-aligned bounding box of the geometry.
    pub fn aabb(&self) -> Aabb {
        Aabb::from_geometry(self.mesh)
    }

    /// Compute the dimensions (width, height, depth) of the bounding box.
    pub fn dimensions(&self) -> [f32; 3] {
        let aabb = self.aabb();
        [
            aabb.max.x - aabb.min.x,
            aabb.max.y - aabb.min.y,
            aabb.max.z - aabb.min.z,
        ]
    }

    /// Check that the AABB dimensions are approximately equal to `expected`.
    pub fn assert_dimensions_approx(&self, expected: [f32; 3], tolerance: f32) -> bool {
        let dims = self.dimensions();
        (dims[0] - expected[0]).abs() < tolerance
            && (dims[1] - expected[1]).abs() < tolerance
            && (dims[2] - expected[2]).abs() < tolerance
    }

    /// Shorthand for `validate_all().is_empty()`.
    pub fn is_valid(&self) -> bool {
        self.validate_all().is_empty()
    }

    /// Run all validation checks and return a list of error messages.
    /// An empty list means the geometry is valid.
    pub fn validate_all(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.has_positions() {
            errors.push("Position buffer is empty".to_string());
        }

        if !self.is_triangle_stride_valid() {
            match &self.mesh.indices {
                Some(indices) => errors.push(format!(
                    "Index buffer length {} is not a multiple of 3",
                    indices.len()
                )),
                None => errors.push(format!(
                    "Non-indexed vertex count {} is not a multiple of 3",
                    self.vertex_count()
                )),
            }
        }

        if !self.are_indices_in_range() {
            let max_idx = self.vertex_count() as u32;
            let out_of_range: Vec<_> = self
                .mesh
                .indices
                .iter()
                .flatten()
                .filter(|&&i| i >= max_idx)
                .take(5)
                .collect();
            errors.push(format!(
                "Indices out of range (vertex_count={}): {:?}",
                max_idx, out_of_range
            ));
        }

        if !self.are_positions_finite() {
            errors.push("Some positions are not finite".to_string());
        }

        if !self.are_groups_in_range() {
            errors.push(format!(
                "Group ranges exceed triangle count {}",
                self.triangle_count()
            ));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::mesh::GeometryGroup;

    fn simple_triangle() -> MeshGeometry {
        MeshGeometry::indexed(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![0, 1, 2],
        )
    }

    #[test]
    fn test_counts() {
        let mesh = simple_triangle();
        let v = MeshValidator::new(&mesh);
        assert_eq!(v.vertex_count(), 3);
        assert_eq!(v.triangle_count(), 1);
    }

    #[test]
    fn test_indices_out_of_range() {
        let bad = MeshGeometry::indexed(vec![[0.0; 3]], vec![0, 1, 2]);
        let v = MeshValidator::new(&bad);
        assert!(!v.are_indices_in_range());
        assert!(v.validate_all().iter().any(|e| e.contains("out of range")));
    }

    #[test]
    fn test_index_stride_invalid() {
        let bad = MeshGeometry::indexed(vec![[0.0; 3]; 3], vec![0, 1]);
        let errors = MeshValidator::new(&bad).validate_all();
        assert!(errors.iter().any(|e| e.contains("multiple of 3")));
    }

    #[test]
    fn test_non_indexed_stride_invalid() {
        let bad = MeshGeometry::non_indexed(vec![[0.0; 3]; 4]);
        assert!(!MeshValidator::new(&bad).is_triangle_stride_valid());
    }

    #[test]
    fn test_empty_positions_invalid() {
        let empty = MeshGeometry::default();
        let errors = MeshValidator::new(&empty).validate_all();
        assert!(errors.iter().any(|e| e.contains("empty")));
    }

    #[test]
    fn test_groups_out_of_range() {
        let bad = simple_triangle().with_groups(vec![GeometryGroup {
            start: 0,
            count: 2,
            material_index: 0,
        }]);
        assert!(!MeshValidator::new(&bad).are_groups_in_range());
    }

    #[test]
    fn test_dimensions() {
        let mesh = simple_triangle();
        let v = MeshValidator::new(&mesh);
        assert!(v.assert_dimensions_approx([1.0, 1.0, 0.0], 0.01));
        assert!(!v.assert_dimensions_approx([2.0, 1.0, 0.0], 0.01));
    }

    #[test]
    fn test_validate_all_ok() {
        let mesh = simple_triangle();
        let errors = MeshValidator::new(&mesh).validate_all();
        assert!(errors.is_empty(), "Expected no errors, got: {:?}", errors);
    }
}
