//! Object CRUD and transform operations

use shared::{ObjectId, Shape, Transform, DEFAULT_COLOR};

use super::{SceneObject, SceneState};
use crate::build::build_mesh;
use crate::error::{EditorError, EditorResult};

impl SceneState {
    /// Create a new object from a shape. A missing name becomes `"<Kind> <n>"`.
    pub fn add_object(
        &mut self,
        name: Option<String>,
        shape: Shape,
        transform: Transform,
        color: Option<[f32; 3]>,
    ) -> EditorResult<ObjectId> {
        let built = build_mesh(&shape, self.crease_angle)?;
        let id = uuid::Uuid::new_v4().to_string();
        let name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| self.default_name(&shape));

        tracing::info!(
            "Created {} '{}' ({}): {} faces, {} edges",
            shape.kind(),
            name,
            id,
            built.topology.faces.len(),
            built.topology.edges.len()
        );

        self.objects.push(SceneObject {
            id: id.clone(),
            name,
            shape,
            transform,
            color: color.unwrap_or(DEFAULT_COLOR),
            geometry: built.geometry,
            topology: built.topology,
        });

        self.version += 1;
        Ok(id)
    }

    /// Remove an object, returning it
    pub fn remove_object(&mut self, id: &ObjectId) -> Option<SceneObject> {
        let idx = self.objects.iter().position(|o| o.id == *id)?;
        let obj = self.objects.remove(idx);
        tracing::info!("Removed {} '{}' ({})", obj.kind(), obj.name, obj.id);
        self.version += 1;
        Some(obj)
    }

    /// Remove every object, returning their ids in creation order
    pub fn clear(&mut self) -> Vec<ObjectId> {
        let ids = self.ids();
        self.objects.clear();
        if !ids.is_empty() {
            self.version += 1;
        }
        ids
    }

    /// Set object transform. Topology is local-space and is kept.
    pub fn set_transform(&mut self, id: &ObjectId, transform: Transform) -> EditorResult<()> {
        let obj = self
            .get_mut(id)
            .ok_or_else(|| EditorError::ObjectNotFound(id.clone()))?;
        obj.transform = transform;
        self.version += 1;
        Ok(())
    }

    /// Move an object by a world-space delta
    pub fn translate(&mut self, id: &ObjectId, delta: [f64; 3]) -> EditorResult<()> {
        let obj = self
            .get_mut(id)
            .ok_or_else(|| EditorError::ObjectNotFound(id.clone()))?;
        for (p, d) in obj.transform.position.iter_mut().zip(delta) {
            *p += d;
        }
        self.version += 1;
        Ok(())
    }

    /// Replace an object's shape: rebuilds geometry and recomputes topology
    pub fn replace_shape(&mut self, id: &ObjectId, shape: Shape) -> EditorResult<()> {
        let crease_angle = self.crease_angle;
        let obj = self
            .get_mut(id)
            .ok_or_else(|| EditorError::ObjectNotFound(id.clone()))?;
        let built = build_mesh(&shape, crease_angle)?;

        tracing::info!(
            "Replaced geometry of '{}' ({} -> {}): {} faces, {} edges",
            obj.name,
            obj.kind(),
            shape.kind(),
            built.topology.faces.len(),
            built.topology.edges.len()
        );

        obj.shape = shape;
        obj.geometry = built.geometry;
        obj.topology = built.topology;
        self.version += 1;
        Ok(())
    }

    /// Rename an object
    pub fn rename(&mut self, id: &ObjectId, name: String) -> EditorResult<()> {
        let obj = self
            .get_mut(id)
            .ok_or_else(|| EditorError::ObjectNotFound(id.clone()))?;
        obj.name = name;
        self.version += 1;
        Ok(())
    }

    pub fn set_color(&mut self, id: &ObjectId, color: [f32; 3]) -> EditorResult<()> {
        let obj = self
            .get_mut(id)
            .ok_or_else(|| EditorError::ObjectNotFound(id.clone()))?;
        obj.color = color;
        self.version += 1;
        Ok(())
    }

    fn default_name(&self, shape: &Shape) -> String {
        let kind = shape.kind();
        let n = self.objects.iter().filter(|o| o.kind() == kind).count() + 1;
        format!("{} {}", kind.display_name(), n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{BoxParams, SphereParams};

    fn unit_box() -> Shape {
        Shape::Box(BoxParams {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
        })
    }

    #[test]
    fn test_add_object_builds_topology() {
        let mut scene = SceneState::default();
        let id = scene
            .add_object(None, unit_box(), Transform::new(), None)
            .unwrap();
        let obj = scene.get(&id).unwrap();
        assert_eq!(obj.name, "Box 1");
        assert_eq!(obj.color, DEFAULT_COLOR);
        assert_eq!(obj.topology.edges.len(), 18);
        assert_eq!(scene.version(), 1);
    }

    #[test]
    fn test_default_names_count_per_kind() {
        let mut scene = SceneState::default();
        scene.add_object(None, unit_box(), Transform::new(), None).unwrap();
        let sphere = Shape::Sphere(SphereParams {
            radius: 1.0,
            width_segments: 8,
            height_segments: 4,
        });
        let s = scene.add_object(None, sphere, Transform::new(), None).unwrap();
        let b = scene.add_object(None, unit_box(), Transform::new(), None).unwrap();
        assert_eq!(scene.get(&s).unwrap().name, "Sphere 1");
        assert_eq!(scene.get(&b).unwrap().name, "Box 2");
    }

    #[test]
    fn test_ids_are_unique_and_ordered() {
        let mut scene = SceneState::default();
        let a = scene.add_object(None, unit_box(), Transform::new(), None).unwrap();
        let b = scene.add_object(None, unit_box(), Transform::new(), None).unwrap();
        assert_ne!(a, b);
        assert_eq!(scene.ids(), vec![a, b]);
    }

    #[test]
    fn test_invalid_shape_is_not_added() {
        let mut scene = SceneState::default();
        let bad = Shape::Box(BoxParams {
            width: 0.0,
            height: 1.0,
            depth: 1.0,
        });
        assert!(scene.add_object(None, bad, Transform::new(), None).is_err());
        assert!(scene.is_empty());
        assert_eq!(scene.version(), 0);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut scene = SceneState::default();
        let a = scene.add_object(None, unit_box(), Transform::new(), None).unwrap();
        scene.add_object(None, unit_box(), Transform::new(), None).unwrap();

        assert!(scene.remove_object(&a).is_some());
        assert!(scene.remove_object(&a).is_none());
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.clear().len(), 1);
        assert!(scene.is_empty());
    }

    #[test]
    fn test_transform_keeps_topology() {
        let mut scene = SceneState::default();
        let id = scene.add_object(None, unit_box(), Transform::new(), None).unwrap();
        let before = scene.get(&id).unwrap().topology.clone();

        scene.translate(&id, [1.0, 2.0, 3.0]).unwrap();
        let obj = scene.get(&id).unwrap();
        assert_eq!(obj.transform.position, [1.0, 2.0, 3.0]);
        assert_eq!(obj.topology, before);

        let missing = "nope".to_string();
        assert!(matches!(
            scene.translate(&missing, [0.0; 3]),
            Err(EditorError::ObjectNotFound(_))
        ));
    }

    #[test]
    fn test_replace_shape_recomputes_topology() {
        let mut scene = SceneState::default();
        let id = scene.add_object(None, unit_box(), Transform::new(), None).unwrap();
        let sphere = Shape::Sphere(SphereParams {
            radius: 1.0,
            width_segments: 8,
            height_segments: 4,
        });
        scene.replace_shape(&id, sphere).unwrap();
        let obj = scene.get(&id).unwrap();
        assert_eq!(obj.kind(), shared::ObjectKind::Sphere);
        assert_eq!(obj.topology.selectable_edges().count(), 0);
    }
}
