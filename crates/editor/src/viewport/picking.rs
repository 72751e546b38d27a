//! Ray casting and pick resolution
//!
//! A pointer position becomes a ray (through the renderer's camera), the
//! nearest triangle hit is found across the candidate objects, and the hit is
//! refined to an edge or face depending on the held modifiers.

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use shared::ObjectId;

use super::camera::{ViewCamera, Viewport};
use super::edge::EdgeKey;
use super::mesh::MeshGeometry;
use super::topology::{FaceId, MeshTopology};

/// Default world-space distance within which an edge counts as hit
pub const DEFAULT_EDGE_THRESHOLD: f32 = 0.1;

/// A ray in world space with a unit-length direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at distance `t` along the ray
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::MAX),
            max: Vec3::splat(f32::MIN),
        }
    }

    pub fn grow(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Compute AABB of a geometry's positions
    pub fn from_geometry(geometry: &MeshGeometry) -> Self {
        let mut aabb = Self::empty();
        for p in &geometry.positions {
            aabb.grow(Vec3::from(*p));
        }
        aabb
    }

    /// World-space AABB of a geometry under `world`
    pub fn from_geometry_transformed(geometry: &MeshGeometry, world: &Mat4) -> Self {
        let mut aabb = Self::empty();
        for p in &geometry.positions {
            aabb.grow(world.transform_point3(Vec3::from(*p)));
        }
        aabb
    }
}

/// Slack added around every box so rays grazing a face plane or an edge
/// still reach the triangle test
const AABB_EPSILON: f32 = 1e-4;

/// Ray-AABB intersection using the slab method.
/// Returns the distance along the ray to the nearest hit, or None.
pub fn ray_aabb(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    let min = aabb.min - Vec3::splat(AABB_EPSILON);
    let max = aabb.max + Vec3::splat(AABB_EPSILON);

    let mut tmin = f32::NEG_INFINITY;
    let mut tmax = f32::INFINITY;

    for axis in 0..3 {
        let origin = ray.origin[axis];
        let dir = ray.direction[axis];

        // Parallel to this slab: inside or never
        if dir.abs() < 1e-12 {
            if origin < min[axis] || origin > max[axis] {
                return None;
            }
            continue;
        }

        let inv = 1.0 / dir;
        let t1 = (min[axis] - origin) * inv;
        let t2 = (max[axis] - origin) * inv;
        tmin = tmin.max(t1.min(t2));
        tmax = tmax.min(t1.max(t2));
        if tmin > tmax {
            return None;
        }
    }

    if tmax < 0.0 {
        return None;
    }

    Some(if tmin < 0.0 { tmax } else { tmin })
}

/// Möller-Trumbore ray-triangle intersection algorithm.
/// Returns the distance along the ray if hit, or None if no intersection.
pub fn ray_triangle_intersect(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
    const EPSILON: f32 = 1e-7;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);

    // Outside triangle (u)
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);

    // Outside triangle (v)
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);

    // Intersection is behind ray origin
    if t > EPSILON {
        Some(t)
    } else {
        None
    }
}

/// Minimum distance between a ray (t >= 0) and a line segment.
pub fn ray_segment_distance(ray: &Ray, seg_start: Vec3, seg_end: Vec3) -> f32 {
    ray_segment_closest(ray, seg_start, seg_end).0
}

/// Minimum distance between a ray (t >= 0) and a line segment, together with
/// the ray parameter of the closest point.
pub fn ray_segment_closest(ray: &Ray, seg_start: Vec3, seg_end: Vec3) -> (f32, f32) {
    let u = ray.direction;
    let v = seg_end - seg_start;
    let w = ray.origin - seg_start;

    let a = u.dot(u); // always >= 0
    let b = u.dot(v);
    let c = v.dot(v); // always >= 0
    let d = u.dot(w);
    let e = v.dot(w);

    if c < 1e-12 {
        // Degenerate segment: point-to-ray distance
        let sc = (-d / a).max(0.0);
        return ((ray.at(sc) - seg_start).length(), sc);
    }

    let denom = a * c - b * b;
    let tc = if denom < 1e-7 {
        // Nearly parallel
        e / c
    } else {
        (a * e - b * d) / denom
    };

    // Clamp to the segment, then re-project onto the ray and back
    let tc = tc.clamp(0.0, 1.0);
    let sc = ((seg_start + v * tc - ray.origin).dot(u) / a).max(0.0);
    let closest_ray = ray.at(sc);
    let tc = ((closest_ray - seg_start).dot(v) / c).clamp(0.0, 1.0);
    let closest_seg = seg_start + v * tc;

    ((closest_ray - closest_seg).length(), sc)
}

/// Intersect a ray with the horizontal plane `y = height`.
/// Returns None if the ray is parallel to the plane or the hit is behind the origin.
pub fn ray_ground_plane(ray: &Ray, height: f32) -> Option<Vec3> {
    let denom = ray.direction.y;
    if denom.abs() < 1e-6 {
        return None;
    }
    let t = (height - ray.origin.y) / denom;
    if t < 0.0 {
        return None;
    }
    Some(ray.at(t))
}

// ── Ray casting capability ──────────────────────────────────

/// One pickable object as seen by the resolver
#[derive(Clone, Copy)]
pub struct PickTarget<'a> {
    pub id: &'a ObjectId,
    pub geometry: &'a MeshGeometry,
    pub topology: &'a MeshTopology,
    /// Local-to-world matrix, current at pick time
    pub world: Mat4,
}

/// Nearest triangle hit across a set of targets
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Index into the target slice
    pub target: usize,
    pub triangle: usize,
    /// Ray parameter (world distance from the ray origin)
    pub distance: f32,
    pub point: Vec3,
}

/// Ray-triangle intersection against world-transformed meshes
pub trait RayCaster {
    fn cast(&self, ray: &Ray, targets: &[PickTarget<'_>]) -> Option<RayHit>;
}

/// Brute-force caster with a per-object bounding-box reject
#[derive(Debug, Clone, Copy, Default)]
pub struct MeshRayCaster;

impl RayCaster for MeshRayCaster {
    fn cast(&self, ray: &Ray, targets: &[PickTarget<'_>]) -> Option<RayHit> {
        let mut best: Option<RayHit> = None;

        for (idx, target) in targets.iter().enumerate() {
            let bounds = Aabb::from_geometry_transformed(target.geometry, &target.world);
            if ray_aabb(ray, &bounds).is_none() {
                continue;
            }

            if let Some((triangle, distance)) = pick_triangle(ray, target.geometry, &target.world) {
                if best.as_ref().is_none_or(|b| distance < b.distance) {
                    best = Some(RayHit {
                        target: idx,
                        triangle,
                        distance,
                        point: ray.at(distance),
                    });
                }
            }
        }

        best
    }
}

/// Find the nearest triangle of a geometry intersected by the ray.
/// Returns triangle index and hit distance.
pub fn pick_triangle(ray: &Ray, geometry: &MeshGeometry, world: &Mat4) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;

    for tri in 0..geometry.triangle_count() {
        let Some([v0, v1, v2]) = geometry.triangle_positions(tri) else {
            continue;
        };
        let v0 = world.transform_point3(v0);
        let v1 = world.transform_point3(v1);
        let v2 = world.transform_point3(v2);

        if let Some(dist) = ray_triangle_intersect(ray, v0, v1, v2) {
            if best.is_none_or(|(_, d)| dist < d) {
                best = Some((tri, dist));
            }
        }
    }

    best
}

// ── Resolver ────────────────────────────────────────────────

/// Modifier keys that refine a pick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickModifiers {
    /// Refine to the face under the pointer
    #[serde(default)]
    pub face: bool,
    /// Refine to the nearest selectable edge
    #[serde(default)]
    pub edge: bool,
}

impl PickModifiers {
    pub const NONE: Self = Self {
        face: false,
        edge: false,
    };

    /// Shift picks faces, Alt picks edges
    pub fn from_keys(shift: bool, alt: bool) -> Self {
        Self {
            face: shift,
            edge: alt,
        }
    }
}

/// What a hit resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HitKind {
    Object,
    Face { face: FaceId },
    Edge { edge: EdgeKey },
}

/// Result of resolving a pointer position
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub object: ObjectId,
    pub kind: HitKind,
    /// World-space point on the hit triangle
    pub point: Vec3,
    pub triangle: usize,
    pub distance: f32,
}

/// Resolve a pointer position to an object, face or edge hit.
///
/// `None` means nothing was hit (the deselect path).
#[allow(clippy::too_many_arguments)]
pub fn resolve(
    pointer: Vec2,
    camera: &dyn ViewCamera,
    viewport: &Viewport,
    targets: &[PickTarget<'_>],
    modifiers: PickModifiers,
    caster: &dyn RayCaster,
    edge_threshold: f32,
) -> Option<Hit> {
    let ndc = viewport.to_ndc(pointer);
    let ray = camera.ray_from_ndc(ndc, viewport.aspect());
    resolve_ray(&ray, targets, modifiers, caster, edge_threshold)
}

/// Resolve an already constructed world-space ray
pub fn resolve_ray(
    ray: &Ray,
    targets: &[PickTarget<'_>],
    modifiers: PickModifiers,
    caster: &dyn RayCaster,
    edge_threshold: f32,
) -> Option<Hit> {
    let hit = caster.cast(ray, targets)?;
    let target = targets.get(hit.target)?;

    let mut kind = HitKind::Object;
    if modifiers.edge {
        if let Some(edge) = nearest_edge(ray, target, edge_threshold, hit.distance) {
            kind = HitKind::Edge { edge };
        }
    }
    if kind == HitKind::Object && modifiers.face {
        if let Some(face) = target.topology.face_of_triangle(hit.triangle) {
            kind = HitKind::Face { face };
        }
    }

    tracing::debug!(
        "Pick hit {} ({:?}) at distance {:.3}",
        target.id,
        kind,
        hit.distance
    );

    Some(Hit {
        object: target.id.clone(),
        kind,
        point: hit.point,
        triangle: hit.triangle,
        distance: hit.distance,
    })
}

/// Closest selectable edge of a target within `threshold` of the ray.
///
/// Edges whose closest point lies farther along the ray than `hit_distance`
/// (plus the threshold) sit behind the hit surface and are skipped.
/// Ties keep the first edge in edge-list order.
pub fn nearest_edge(
    ray: &Ray,
    target: &PickTarget<'_>,
    threshold: f32,
    hit_distance: f32,
) -> Option<EdgeKey> {
    let mut best: Option<(EdgeKey, f32)> = None;

    for edge in target.topology.selectable_edges() {
        let (Some(p0), Some(p1)) = (
            target.geometry.position(edge.key.0),
            target.geometry.position(edge.key.1),
        ) else {
            continue;
        };
        let w0 = target.world.transform_point3(p0);
        let w1 = target.world.transform_point3(p1);

        let (dist, along) = ray_segment_closest(ray, w0, w1);
        if along > hit_distance + threshold {
            continue;
        }
        if dist <= threshold && best.is_none_or(|(_, d)| dist < d) {
            best = Some((edge.key, dist));
        }
    }

    best.map(|(key, _)| key)
}
