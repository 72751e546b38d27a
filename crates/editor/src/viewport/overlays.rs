//! Highlight and preview geometry (face fills, edge lines, sketch outlines)
//!
//! Everything here is built in world space so the renderer can insert the
//! result as an auxiliary node without parenting it to the object.

use glam::{Mat4, Vec2, Vec3};

use super::edge::EdgeKey;
use super::mesh::{LineMeshData, MeshGeometry};
use super::topology::{FaceId, MeshTopology};

/// Distance a face overlay is lifted off its face to avoid z-fighting
pub const FACE_OVERLAY_OFFSET: f32 = 0.002;

/// Height of sketch previews above the ground plane
pub const PREVIEW_LIFT: f32 = 0.001;

/// Non-indexed copy of a face's triangles, transformed to world space and
/// lifted slightly along the face normal.
pub fn face_overlay(
    geometry: &MeshGeometry,
    topology: &MeshTopology,
    face: FaceId,
    world: &Mat4,
) -> Option<MeshGeometry> {
    let face = topology.face(face)?;
    let normal_matrix = world.inverse().transpose();
    let lift = normal_matrix.transform_vector3(face.normal).normalize_or_zero() * FACE_OVERLAY_OFFSET;

    let mut positions = Vec::with_capacity(face.triangles.len() * 3);
    for &tri in &face.triangles {
        let Some(corners) = geometry.triangle_positions(tri) else {
            continue;
        };
        for p in corners {
            positions.push((world.transform_point3(p) + lift).to_array());
        }
    }

    if positions.is_empty() {
        return None;
    }
    Some(MeshGeometry::non_indexed(positions))
}

/// Single line segment between an edge's world-space endpoints
pub fn edge_overlay(
    geometry: &MeshGeometry,
    edge: EdgeKey,
    world: &Mat4,
    color: [f32; 4],
) -> Option<LineMeshData> {
    let a = world.transform_point3(geometry.position(edge.start())?);
    let b = world.transform_point3(geometry.position(edge.end())?);
    let mut lines = LineMeshData::default();
    lines.push_segment(a, b, color);
    Some(lines)
}

/// Point on the ground plane for a sketch coordinate `(x, z)`
pub fn ground_point(p: Vec2) -> Vec3 {
    Vec3::new(p.x, PREVIEW_LIFT, p.y)
}

/// Closed 4-point loop spanning two opposite sketch corners
pub fn rectangle_preview(a: Vec2, b: Vec2, color: [f32; 4]) -> LineMeshData {
    let corners = [
        Vec2::new(a.x, a.y),
        Vec2::new(b.x, a.y),
        Vec2::new(b.x, b.y),
        Vec2::new(a.x, b.y),
    ];
    closed_loop(&corners, color)
}

/// Closed polygon approximating a circle on the ground plane
pub fn circle_preview(center: Vec2, radius: f32, segments: u32, color: [f32; 4]) -> LineMeshData {
    let segments = segments.max(3);
    let points: Vec<Vec2> = (0..segments)
        .map(|i| {
            let angle = i as f32 / segments as f32 * std::f32::consts::TAU;
            center + Vec2::new(angle.cos(), angle.sin()) * radius
        })
        .collect();
    closed_loop(&points, color)
}

fn closed_loop(points: &[Vec2], color: [f32; 4]) -> LineMeshData {
    let mut lines = LineMeshData::default();
    for (i, p) in points.iter().enumerate() {
        let next = points[(i + 1) % points.len()];
        lines.push_segment(ground_point(*p), ground_point(next), color);
    }
    lines
}
