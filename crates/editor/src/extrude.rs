use glam::Vec2;
use shared::Profile;

use crate::viewport::mesh::{GeometryGroup, MeshGeometry};

// ── Profiles ────────────────────────────────────────────────

/// Outline of a profile in sketch coordinates `(x, z)`, counter-clockwise
/// when seen from +Y.
pub fn profile_points(profile: &Profile) -> Vec<Vec2> {
    let points = match profile {
        Profile::Rectangle { min, max } => {
            let x0 = min[0].min(max[0]) as f32;
            let x1 = min[0].max(max[0]) as f32;
            let z0 = min[1].min(max[1]) as f32;
            let z1 = min[1].max(max[1]) as f32;
            vec![
                Vec2::new(x0, z0),
                Vec2::new(x0, z1),
                Vec2::new(x1, z1),
                Vec2::new(x1, z0),
            ]
        }
        Profile::Circle {
            center,
            radius,
            segments,
        } => {
            let c = Vec2::new(center[0] as f32, center[1] as f32);
            let r = *radius as f32;
            let n = (*segments).max(3);
            (0..n)
                .map(|i| {
                    let angle = -(i as f32 / n as f32) * std::f32::consts::TAU;
                    c + Vec2::new(angle.cos(), angle.sin()) * r
                })
                .collect()
        }
    };

    if signed_area(&points) < 0.0 {
        points.into_iter().rev().collect()
    } else {
        points
    }
}

/// Shoelace area in the (x, z) plane; positive when counter-clockwise from +Y
pub fn signed_area(points: &[Vec2]) -> f32 {
    let n = points.len();
    let mut sum = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        sum += b.x * a.y - a.x * b.y;
    }
    sum * 0.5
}

// ── Extrude ─────────────────────────────────────────────────

/// Extrude a closed profile from the ground plane up along +Y by `depth`.
///
/// Bottom ring vertices are `0..n`, top ring `n..2n`; caps and walls share
/// them so the result is a closed manifold. Groups: bottom cap, top cap, then
/// one group per wall for rectangles or a single side group for circles.
pub fn extrude_profile(profile: &Profile, depth: f32) -> Result<MeshGeometry, String> {
    let outline = profile_points(profile);
    let n = outline.len();
    if n < 3 {
        return Err("Profile needs at least 3 points".to_string());
    }
    if !(depth.is_finite() && depth > 0.0) {
        return Err(format!("Extrude depth must be positive, got {depth}"));
    }

    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(n * 2);
    for p in &outline {
        positions.push([p.x, 0.0, p.y]);
    }
    for p in &outline {
        positions.push([p.x, depth, p.y]);
    }

    let n32 = n as u32;
    let mut indices: Vec<u32> = Vec::new();
    let mut groups = Vec::new();

    // Bottom cap (fan, facing -Y)
    for i in 1..(n32 - 1) {
        indices.extend_from_slice(&[0, i + 1, i]);
    }
    groups.push(GeometryGroup {
        start: 0,
        count: n - 2,
        material_index: 0,
    });

    // Top cap (fan, facing +Y)
    for i in 1..(n32 - 1) {
        indices.extend_from_slice(&[n32, n32 + i, n32 + i + 1]);
    }
    groups.push(GeometryGroup {
        start: n - 2,
        count: n - 2,
        material_index: 1,
    });

    // Side walls (outward facing)
    let walls_start = 2 * (n - 2);
    for i in 0..n32 {
        let next = (i + 1) % n32;
        let (b0, b1) = (i, next);
        let (t0, t1) = (n32 + i, n32 + next);
        indices.extend_from_slice(&[b0, b1, t1]);
        indices.extend_from_slice(&[b0, t1, t0]);
    }

    match profile {
        Profile::Rectangle { .. } => {
            for i in 0..n {
                groups.push(GeometryGroup {
                    start: walls_start + i * 2,
                    count: 2,
                    material_index: 2 + i as u32,
                });
            }
        }
        Profile::Circle { .. } => {
            groups.push(GeometryGroup {
                start: walls_start,
                count: n * 2,
                material_index: 2,
            });
        }
    }

    Ok(MeshGeometry::indexed(positions, indices).with_groups(groups))
}
