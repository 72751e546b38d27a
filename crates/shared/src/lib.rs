use serde::{Deserialize, Serialize};

/// Unique identifier of an object in the scene
pub type ObjectId = String;

/// Scene document format version written into `metadata.version`
pub const DOCUMENT_VERSION: &str = "1.0";

/// Generator name written into `metadata.generator`
pub const GENERATOR: &str = "scene-editor";

/// Upper bound for any segment count of a parametric shape
pub const MAX_SEGMENTS: u32 = 1024;

/// Color assigned to objects that do not specify one
pub const DEFAULT_COLOR: [f32; 3] = [0.6, 0.6, 0.65];

fn unit_scale() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

fn default_sphere_width_segments() -> u32 {
    32
}

fn default_sphere_height_segments() -> u32 {
    16
}

fn default_radial_segments() -> u32 {
    32
}

fn default_circle_segments() -> u32 {
    32
}

/// Object transform: position, Euler rotation (radians, XYZ order) and scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: [f64; 3],
    pub rotation: [f64; 3],
    pub scale: [f64; 3],
}

impl Transform {
    pub fn new() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
        }
    }

    /// Identity transform moved to `position`
    pub fn at(position: [f64; 3]) -> Self {
        Self {
            position,
            ..Self::new()
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

/// Type tag of a scene object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Box,
    Sphere,
    Cylinder,
    Extruded,
    Custom,
}

impl ObjectKind {
    /// Tag used for the `type` field of the scene document
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Box => "box",
            ObjectKind::Sphere => "sphere",
            ObjectKind::Cylinder => "cylinder",
            ObjectKind::Extruded => "extruded",
            ObjectKind::Custom => "custom",
        }
    }

    /// Parse a document `type` tag
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "box" => Some(ObjectKind::Box),
            "sphere" => Some(ObjectKind::Sphere),
            "cylinder" => Some(ObjectKind::Cylinder),
            "extruded" => Some(ObjectKind::Extruded),
            "custom" => Some(ObjectKind::Custom),
            _ => None,
        }
    }

    /// Human-readable name (used for default object names)
    pub fn display_name(&self) -> &'static str {
        match self {
            ObjectKind::Box => "Box",
            ObjectKind::Sphere => "Sphere",
            ObjectKind::Cylinder => "Cylinder",
            ObjectKind::Extruded => "Extrusion",
            ObjectKind::Custom => "Mesh",
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Closed 2D profile drawn on the ground plane, in (x, z) coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Profile {
    Rectangle {
        min: [f64; 2],
        max: [f64; 2],
    },
    Circle {
        center: [f64; 2],
        radius: f64,
        #[serde(default = "default_circle_segments")]
        segments: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxParams {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SphereParams {
    pub radius: f64,
    #[serde(default = "default_sphere_width_segments")]
    pub width_segments: u32,
    #[serde(default = "default_sphere_height_segments")]
    pub height_segments: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CylinderParams {
    pub radius_top: f64,
    pub radius_bottom: f64,
    pub height: f64,
    #[serde(default = "default_radial_segments")]
    pub radial_segments: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtrudedParams {
    pub profile: Profile,
    pub depth: f64,
}

/// Raw triangle geometry. Without indices, positions form implicit triangles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomParams {
    pub positions: Vec<[f32; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indices: Option<Vec<u32>>,
}

/// Construction parameters of an object, one record per object kind
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Box(BoxParams),
    Sphere(SphereParams),
    Cylinder(CylinderParams),
    Extruded(ExtrudedParams),
    Custom(CustomParams),
}

impl Shape {
    pub fn kind(&self) -> ObjectKind {
        match self {
            Shape::Box(_) => ObjectKind::Box,
            Shape::Sphere(_) => ObjectKind::Sphere,
            Shape::Cylinder(_) => ObjectKind::Cylinder,
            Shape::Extruded(_) => ObjectKind::Extruded,
            Shape::Custom(_) => ObjectKind::Custom,
        }
    }

    /// Serialize the parameter record for the document `params` field
    pub fn params_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        match self {
            Shape::Box(p) => serde_json::to_value(p),
            Shape::Sphere(p) => serde_json::to_value(p),
            Shape::Cylinder(p) => serde_json::to_value(p),
            Shape::Extruded(p) => serde_json::to_value(p),
            Shape::Custom(p) => serde_json::to_value(p),
        }
    }

    /// Rebuild a shape from a document `type` tag and its `params` value
    pub fn from_params(tag: &str, params: serde_json::Value) -> Result<Shape, ShapeError> {
        let kind = ObjectKind::parse(tag).ok_or_else(|| ShapeError::UnknownType(tag.to_string()))?;
        let invalid = |e: serde_json::Error| ShapeError::InvalidParams {
            kind,
            message: e.to_string(),
        };

        let shape = match kind {
            ObjectKind::Box => Shape::Box(serde_json::from_value(params).map_err(invalid)?),
            ObjectKind::Sphere => Shape::Sphere(serde_json::from_value(params).map_err(invalid)?),
            ObjectKind::Cylinder => {
                Shape::Cylinder(serde_json::from_value(params).map_err(invalid)?)
            }
            ObjectKind::Extruded => {
                Shape::Extruded(serde_json::from_value(params).map_err(invalid)?)
            }
            ObjectKind::Custom => Shape::Custom(serde_json::from_value(params).map_err(invalid)?),
        };

        shape.validate()?;
        Ok(shape)
    }

    /// Check that dimensions are finite and positive and segment counts usable
    pub fn validate(&self) -> Result<(), ShapeError> {
        let kind = self.kind();
        let positive = |name: &str, v: f64| -> Result<(), ShapeError> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(ShapeError::InvalidParams {
                    kind,
                    message: format!("{name} must be positive, got {v}"),
                })
            }
        };
        let segments = |name: &str, v: u32, min: u32| -> Result<(), ShapeError> {
            if (min..=MAX_SEGMENTS).contains(&v) {
                Ok(())
            } else {
                Err(ShapeError::InvalidParams {
                    kind,
                    message: format!("{name} must be within {min}..={MAX_SEGMENTS}, got {v}"),
                })
            }
        };

        match self {
            Shape::Box(p) => {
                positive("width", p.width)?;
                positive("height", p.height)?;
                positive("depth", p.depth)
            }
            Shape::Sphere(p) => {
                positive("radius", p.radius)?;
                segments("width_segments", p.width_segments, 3)?;
                segments("height_segments", p.height_segments, 2)
            }
            Shape::Cylinder(p) => {
                // One of the radii may be zero (cone)
                if !(p.radius_top >= 0.0 && p.radius_bottom >= 0.0)
                    || (p.radius_top == 0.0 && p.radius_bottom == 0.0)
                {
                    return Err(ShapeError::InvalidParams {
                        kind,
                        message: "cylinder needs a positive radius".to_string(),
                    });
                }
                positive("height", p.height)?;
                segments("radial_segments", p.radial_segments, 3)
            }
            Shape::Extruded(p) => {
                positive("depth", p.depth)?;
                match &p.profile {
                    Profile::Rectangle { min, max } => {
                        positive("profile width", (max[0] - min[0]).abs())?;
                        positive("profile length", (max[1] - min[1]).abs())
                    }
                    Profile::Circle {
                        radius, segments: n, ..
                    } => {
                        positive("radius", *radius)?;
                        segments("segments", *n, 3)
                    }
                }
            }
            Shape::Custom(p) => {
                if p.positions.is_empty() {
                    return Err(ShapeError::InvalidParams {
                        kind,
                        message: "custom geometry has no positions".to_string(),
                    });
                }
                Ok(())
            }
        }
    }
}

/// Errors raised while decoding shape parameters
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeError {
    /// `type` tag does not name a known object kind
    UnknownType(String),
    /// Parameters are missing, malformed or out of range
    InvalidParams { kind: ObjectKind, message: String },
}

impl std::fmt::Display for ShapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShapeError::UnknownType(tag) => write!(f, "Unknown object type '{}'", tag),
            ShapeError::InvalidParams { kind, message } => {
                write!(f, "Invalid {} parameters: {}", kind, message)
            }
        }
    }
}

impl std::error::Error for ShapeError {}

// ============================================================================
// Scene document
// ============================================================================

/// One object entry of the scene document.
///
/// `type` is kept as a raw string so a document with an unknown type can
/// still be read and the offending entry skipped individually.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub position: [f64; 3],
    #[serde(default)]
    pub rotation: [f64; 3],
    #[serde(default = "unit_scale")]
    pub scale: [f64; 3],
    #[serde(default)]
    pub params: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<[f32; 3]>,
}

impl ObjectRecord {
    /// Build a record from a typed shape
    pub fn new(
        name: impl Into<String>,
        shape: &Shape,
        transform: &Transform,
        color: [f32; 3],
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            kind: shape.kind().as_str().to_string(),
            name: name.into(),
            position: transform.position,
            rotation: transform.rotation,
            scale: transform.scale,
            params: shape.params_value()?,
            color: Some(color),
        })
    }

    pub fn transform(&self) -> Transform {
        Transform {
            position: self.position,
            rotation: self.rotation,
            scale: self.scale,
        }
    }

    /// Decode the typed shape of this record
    pub fn shape(&self) -> Result<Shape, ShapeError> {
        Shape::from_params(&self.kind, self.params.clone())
    }
}

/// Document metadata block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub version: String,
    pub generator: String,
    #[serde(default)]
    pub date: String,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self {
            version: DOCUMENT_VERSION.to_string(),
            generator: GENERATOR.to_string(),
            date: String::new(),
        }
    }
}

/// Exported scene: objects plus metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SceneDocument {
    pub objects: Vec<ObjectRecord>,
    #[serde(default)]
    pub metadata: DocumentMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip<T>(value: &T)
    where
        T: Serialize + for<'de> Deserialize<'de> + PartialEq + std::fmt::Debug,
    {
        let json = serde_json::to_string(value).unwrap();
        let back: T = serde_json::from_str(&json).unwrap();
        assert_eq!(&back, value);
    }

    // --- Transform ---

    #[test]
    fn test_transform_new_is_identity() {
        let t = Transform::new();
        assert_eq!(t.position, [0.0; 3]);
        assert_eq!(t.rotation, [0.0; 3]);
        assert_eq!(t.scale, [1.0; 3]);
        assert_eq!(Transform::default(), t);
    }

    // --- ObjectKind ---

    #[test]
    fn test_kind_tags_parse_back() {
        for kind in [
            ObjectKind::Box,
            ObjectKind::Sphere,
            ObjectKind::Cylinder,
            ObjectKind::Extruded,
            ObjectKind::Custom,
        ] {
            assert_eq!(ObjectKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ObjectKind::parse("torus"), None);
    }

    // --- Shape ---

    #[test]
    fn test_shape_from_params_box() {
        let params = serde_json::json!({"width": 2, "height": 3, "depth": 1});
        let shape = Shape::from_params("box", params).unwrap();
        assert_eq!(
            shape,
            Shape::Box(BoxParams {
                width: 2.0,
                height: 3.0,
                depth: 1.0
            })
        );
    }

    #[test]
    fn test_shape_from_params_applies_segment_defaults() {
        let shape = Shape::from_params("sphere", serde_json::json!({"radius": 1.5})).unwrap();
        match shape {
            Shape::Sphere(p) => {
                assert_eq!(p.width_segments, 32);
                assert_eq!(p.height_segments, 16);
            }
            other => panic!("expected sphere, got {:?}", other),
        }
    }

    #[test]
    fn test_shape_unknown_type() {
        let err = Shape::from_params("torus", serde_json::json!({})).unwrap_err();
        assert_eq!(err, ShapeError::UnknownType("torus".to_string()));
        assert!(err.to_string().contains("torus"));
    }

    #[test]
    fn test_shape_missing_params_is_invalid() {
        let err = Shape::from_params("cylinder", serde_json::json!({"height": 1})).unwrap_err();
        assert!(matches!(
            err,
            ShapeError::InvalidParams {
                kind: ObjectKind::Cylinder,
                ..
            }
        ));
    }

    #[test]
    fn test_shape_rejects_non_positive_dimensions() {
        let shape = Shape::Box(BoxParams {
            width: 0.0,
            height: 1.0,
            depth: 1.0,
        });
        assert!(shape.validate().is_err());
    }

    #[test]
    fn test_shape_rejects_oversized_segment_counts() {
        let err = Shape::from_params(
            "sphere",
            serde_json::json!({ "radius": 1.0, "width_segments": 4_000_000_000u32 }),
        )
        .unwrap_err();
        assert!(matches!(err, ShapeError::InvalidParams { kind: ObjectKind::Sphere, .. }));

        let circle = Shape::from_params(
            "extruded",
            serde_json::json!({
                "profile": { "shape": "circle", "center": [0.0, 0.0], "radius": 1.0, "segments": MAX_SEGMENTS + 1 },
                "depth": 1.0
            }),
        );
        assert!(circle.is_err());

        let at_cap = Shape::from_params(
            "cylinder",
            serde_json::json!({ "radius_top": 1.0, "radius_bottom": 1.0, "height": 1.0, "radial_segments": MAX_SEGMENTS }),
        );
        assert!(at_cap.is_ok());
    }

    #[test]
    fn test_cone_is_a_valid_cylinder() {
        let shape = Shape::Cylinder(CylinderParams {
            radius_top: 0.0,
            radius_bottom: 1.0,
            height: 2.0,
            radial_segments: 16,
        });
        assert!(shape.validate().is_ok());
    }

    #[test]
    fn test_extruded_params_value_roundtrip() {
        let shape = Shape::Extruded(ExtrudedParams {
            profile: Profile::Circle {
                center: [1.0, 2.0],
                radius: 0.5,
                segments: 32,
            },
            depth: 1.0,
        });
        let value = shape.params_value().unwrap();
        let back = Shape::from_params("extruded", value).unwrap();
        assert_eq!(back, shape);
    }

    // --- Document ---

    #[test]
    fn test_object_record_defaults() {
        let json = r#"{"type":"box","params":{"width":1,"height":1,"depth":1}}"#;
        let record: ObjectRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.scale, [1.0; 3]);
        assert_eq!(record.position, [0.0; 3]);
        assert!(record.color.is_none());
        assert!(record.shape().is_ok());
    }

    #[test]
    fn test_document_serde() {
        let shape = Shape::Box(BoxParams {
            width: 1.0,
            height: 2.0,
            depth: 3.0,
        });
        let doc = SceneDocument {
            objects: vec![
                ObjectRecord::new("Box 1", &shape, &Transform::at([1.0, 0.0, 0.0]), DEFAULT_COLOR)
                    .unwrap(),
            ],
            metadata: DocumentMetadata::default(),
        };
        roundtrip(&doc);

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["objects"][0]["type"], "box");
        assert_eq!(value["metadata"]["generator"], GENERATOR);
    }
}
