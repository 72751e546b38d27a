//! Scene document export/import and autosave

use serde::Serialize;
use serde_json::Value;
use shared::{
    DocumentMetadata, ObjectId, ObjectRecord, SceneDocument, Shape, Transform, DOCUMENT_VERSION,
    GENERATOR,
};

use super::SceneState;
use crate::error::{EditorError, EditorResult};

/// Outcome of a successful import
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportReport {
    /// Ids of the reconstructed objects, in document order
    pub imported: Vec<ObjectId>,
    /// Entries that could not be reconstructed
    pub skipped: usize,
    /// One message per skipped entry
    pub diagnostics: Vec<String>,
}

/// Object entry that passed decoding, not yet built
struct DecodedObject {
    name: String,
    shape: Shape,
    transform: Transform,
    color: Option<[f32; 3]>,
}

impl SceneState {
    /// Export all objects in creation order
    pub fn export_document(&self) -> EditorResult<SceneDocument> {
        let objects = self
            .objects
            .iter()
            .map(|o| ObjectRecord::new(o.name.clone(), &o.shape, &o.transform, o.color))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SceneDocument {
            objects,
            metadata: DocumentMetadata {
                version: DOCUMENT_VERSION.to_string(),
                generator: GENERATOR.to_string(),
                date: chrono::Utc::now().to_rfc3339(),
            },
        })
    }

    /// Replace the scene with the objects of a document.
    ///
    /// The document is fully decoded before anything is removed; a document
    /// without an `objects` array is rejected and the scene left untouched.
    /// Entries with an unknown type or bad parameters are skipped.
    ///
    /// Returns the ids of the removed objects along with the report.
    pub fn import_document(
        &mut self,
        document: &Value,
    ) -> EditorResult<(Vec<ObjectId>, ImportReport)> {
        let mut report = ImportReport::default();
        let decoded = decode_objects(document, &mut report)?;

        if let Some(meta) = document.get("metadata") {
            match serde_json::from_value::<DocumentMetadata>(meta.clone()) {
                Ok(meta) if meta.version != DOCUMENT_VERSION => tracing::warn!(
                    "Importing document version {} (generator {}), expected {}",
                    meta.version,
                    meta.generator,
                    DOCUMENT_VERSION
                ),
                Ok(_) => {}
                Err(e) => tracing::warn!("Ignoring malformed document metadata: {}", e),
            }
        }

        let removed = self.clear();

        for (index, obj) in decoded {
            let kind = obj.shape.kind();
            match self.add_object(Some(obj.name), obj.shape, obj.transform, obj.color) {
                Ok(id) => report.imported.push(id),
                Err(e) => skip(&mut report, index, &format!("{kind}: {e}")),
            }
        }

        tracing::info!(
            "Imported scene: {} objects, {} skipped (replaced {})",
            report.imported.len(),
            report.skipped,
            removed.len()
        );

        Ok((removed, report))
    }

    // ── Autosave ─────────────────────────────────────────────

    /// Get autosave file path
    fn autosave_path() -> Option<std::path::PathBuf> {
        directories::ProjectDirs::from("com", "scene-editor", "scene-editor")
            .map(|dirs| dirs.data_dir().join("autosave.json"))
    }

    /// Save scene to autosave file
    pub fn autosave(&self) -> EditorResult<std::path::PathBuf> {
        let path = Self::autosave_path()
            .ok_or_else(|| EditorError::invalid_document("no data directory for autosave"))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.export_document()?)?;
        std::fs::write(&path, json)?;
        tracing::debug!("Autosaved {} objects to {}", self.len(), path.display());
        Ok(path)
    }

    /// Load autosaved document
    pub fn load_autosave() -> Option<Value> {
        let path = Self::autosave_path()?;
        let json = std::fs::read_to_string(&path).ok()?;
        serde_json::from_str(&json).ok()
    }

    /// Check if autosave file exists
    pub fn has_autosave() -> bool {
        Self::autosave_path().is_some_and(|p| p.exists())
    }
}

fn decode_objects(
    document: &Value,
    report: &mut ImportReport,
) -> EditorResult<Vec<(usize, DecodedObject)>> {
    let objects = document
        .get("objects")
        .ok_or_else(|| EditorError::invalid_document("missing 'objects'"))?
        .as_array()
        .ok_or_else(|| EditorError::invalid_document("'objects' is not an array"))?;

    let mut decoded = Vec::with_capacity(objects.len());
    for (index, entry) in objects.iter().enumerate() {
        let record = match serde_json::from_value::<ObjectRecord>(entry.clone()) {
            Ok(r) => r,
            Err(e) => {
                skip(report, index, &e.to_string());
                continue;
            }
        };
        match record.shape() {
            Ok(shape) => decoded.push((
                index,
                DecodedObject {
                    transform: record.transform(),
                    name: record.name,
                    shape,
                    color: record.color,
                },
            )),
            Err(e) => skip(report, index, &e.to_string()),
        }
    }

    Ok(decoded)
}

fn skip(report: &mut ImportReport, index: usize, reason: &str) {
    tracing::warn!("Skipping object #{} during import: {}", index, reason);
    report.skipped += 1;
    report.diagnostics.push(format!("object #{index}: {reason}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::{BoxParams, CylinderParams};

    fn scene_with_two() -> SceneState {
        let mut scene = SceneState::default();
        scene
            .add_object(
                Some("Crate".into()),
                Shape::Box(BoxParams {
                    width: 1.0,
                    height: 2.0,
                    depth: 3.0,
                }),
                Transform {
                    position: [1.0, 0.5, -2.0],
                    rotation: [0.1, 0.2, 0.3],
                    scale: [1.0, 2.0, 1.0],
                },
                Some([1.0, 0.0, 0.0]),
            )
            .unwrap();
        scene
            .add_object(
                None,
                Shape::Cylinder(CylinderParams {
                    radius_top: 0.0,
                    radius_bottom: 1.0,
                    height: 2.0,
                    radial_segments: 16,
                }),
                Transform::at([0.0, 1.0, 0.0]),
                None,
            )
            .unwrap();
        scene
    }

    #[test]
    fn test_export_document_shape() {
        let doc = scene_with_two().export_document().unwrap();
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["objects"].as_array().unwrap().len(), 2);
        assert_eq!(value["objects"][0]["type"], "box");
        assert_eq!(value["objects"][0]["params"]["depth"], 3.0);
        assert_eq!(value["objects"][1]["params"]["radial_segments"], 16);
        assert_eq!(value["metadata"]["version"], DOCUMENT_VERSION);
        assert_eq!(value["metadata"]["generator"], GENERATOR);
        assert!(!doc.metadata.date.is_empty());
    }

    #[test]
    fn test_import_export_roundtrip() {
        let original = scene_with_two();
        let doc = serde_json::to_value(original.export_document().unwrap()).unwrap();

        let mut restored = SceneState::default();
        let (removed, report) = restored.import_document(&doc).unwrap();
        assert!(removed.is_empty());
        assert_eq!(report.skipped, 0);
        assert_eq!(restored.len(), 2);

        for (a, b) in original.objects().iter().zip(restored.objects()) {
            assert_eq!(a.kind(), b.kind());
            assert_eq!(a.name, b.name);
            assert_eq!(a.shape, b.shape);
            assert_eq!(a.color, b.color);
            for i in 0..3 {
                assert!((a.transform.position[i] - b.transform.position[i]).abs() < 1e-4);
                assert!((a.transform.rotation[i] - b.transform.rotation[i]).abs() < 1e-4);
                assert!((a.transform.scale[i] - b.transform.scale[i]).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_import_rejects_non_array_objects() {
        let mut scene = scene_with_two();
        let version = scene.version();
        for bad in [json!({}), json!({ "objects": 5 }), json!([1, 2])] {
            let err = scene.import_document(&bad).unwrap_err();
            assert!(matches!(err, EditorError::InvalidDocument(_)));
        }
        assert_eq!(scene.len(), 2, "scene must be untouched");
        assert_eq!(scene.version(), version);
    }

    #[test]
    fn test_import_skips_unknown_and_malformed_objects() {
        let doc = json!({
            "objects": [
                { "type": "teapot", "name": "T", "position": [0, 0, 0], "rotation": [0, 0, 0], "scale": [1, 1, 1], "params": {} },
                { "type": "box", "name": "B", "position": [0, 0, 0], "rotation": [0, 0, 0], "scale": [1, 1, 1], "params": { "width": 1, "height": 1, "depth": 1 } },
                { "type": "sphere", "name": "S", "params": { "radius": -2 } },
                "not an object"
            ],
            "metadata": { "version": "1.0", "generator": "test", "date": "" }
        });

        let mut scene = scene_with_two();
        let (removed, report) = scene.import_document(&doc).unwrap();
        assert_eq!(removed.len(), 2);
        assert_eq!(report.imported.len(), 1);
        assert_eq!(report.skipped, 3);
        assert!(report.diagnostics[0].contains("teapot"));
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.objects()[0].name, "B");
        assert_eq!(scene.objects()[0].color, shared::DEFAULT_COLOR);
    }

    #[test]
    fn test_import_empty_objects_clears_scene() {
        let mut scene = scene_with_two();
        let (removed, report) = scene.import_document(&json!({ "objects": [] })).unwrap();
        assert_eq!(removed.len(), 2);
        assert!(report.imported.is_empty());
        assert!(scene.is_empty());
    }
}
