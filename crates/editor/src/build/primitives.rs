//! Primitive creation and transform helpers

use glam::{EulerRot, Mat4, Quat, Vec3};
use shared::{Shape, ShapeError, Transform};

use crate::error::EditorResult;
use crate::extrude::extrude_profile;
use crate::viewport::mesh::{cube, cylinder, sphere, MeshGeometry};

/// Build local-space geometry for a shape
pub fn create_primitive(shape: &Shape) -> EditorResult<MeshGeometry> {
    shape.validate()?;

    let geometry = match shape {
        Shape::Box(p) => cube(p.width as f32, p.height as f32, p.depth as f32),
        Shape::Sphere(p) => sphere(p.radius as f32, p.width_segments, p.height_segments),
        Shape::Cylinder(p) => cylinder(
            p.radius_top as f32,
            p.radius_bottom as f32,
            p.height as f32,
            p.radial_segments,
        ),
        Shape::Extruded(p) => {
            extrude_profile(&p.profile, p.depth as f32).map_err(|message| {
                ShapeError::InvalidParams {
                    kind: shape.kind(),
                    message,
                }
            })?
        }
        Shape::Custom(p) => match &p.indices {
            Some(indices) => MeshGeometry::indexed(p.positions.clone(), indices.clone()),
            None => MeshGeometry::non_indexed(p.positions.clone()),
        },
    };

    Ok(geometry)
}

/// Local-to-world matrix: translation * rotation (XYZ Euler, radians) * scale
pub fn world_matrix(transform: &Transform) -> Mat4 {
    let [tx, ty, tz] = transform.position;
    let [rx, ry, rz] = transform.rotation;
    let [sx, sy, sz] = transform.scale;

    Mat4::from_scale_rotation_translation(
        Vec3::new(sx as f32, sy as f32, sz as f32),
        Quat::from_euler(EulerRot::XYZ, rx as f32, ry as f32, rz as f32),
        Vec3::new(tx as f32, ty as f32, tz as f32),
    )
}

/// World-space pivot of a transform (its translation)
pub fn pivot(transform: &Transform) -> Vec3 {
    let [x, y, z] = transform.position;
    Vec3::new(x as f32, y as f32, z as f32)
}
