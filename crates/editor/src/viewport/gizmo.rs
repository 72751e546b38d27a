//! Transform gizmo capability and its initialization slot
//!
//! The selection state machine attaches a gizmo only while an object is
//! selected. Gizmo construction may fail while its inputs are not ready; the
//! slot retries with a backoff counted in polls and gives up after a bounded
//! number of attempts.

use glam::Vec3;
use shared::ObjectId;

use super::picking::{ray_segment_distance, Ray};
use crate::error::EditorResult;

/// Which axis a gizmo handle belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GizmoAxis {
    X,
    Y,
    Z,
}

impl GizmoAxis {
    pub const ALL: [GizmoAxis; 3] = [GizmoAxis::X, GizmoAxis::Y, GizmoAxis::Z];

    pub fn direction(self) -> Vec3 {
        match self {
            GizmoAxis::X => Vec3::X,
            GizmoAxis::Y => Vec3::Y,
            GizmoAxis::Z => Vec3::Z,
        }
    }
}

/// External transform control driven by the selection state machine
pub trait TransformGizmo {
    /// Attach to an object whose pivot is at `center` (world space)
    fn attach(&mut self, object: &ObjectId, center: Vec3);
    fn detach(&mut self);
    fn attached(&self) -> Option<&ObjectId>;
    /// Axis handle under the ray, if any
    fn hit_test(&self, ray: &Ray) -> Option<GizmoAxis>;
    /// Start dragging the handle under the ray. Returns false if none was hit.
    fn begin_drag(&mut self, ray: &Ray) -> bool;
    /// Translation accumulated since the previous drag update
    fn drag(&mut self, ray: &Ray) -> Option<Vec3>;
    fn end_drag(&mut self);
    fn is_dragging(&self) -> bool;
}

/// Builds gizmos; may fail while required inputs are not available yet
pub trait GizmoFactory {
    fn create(&mut self) -> EditorResult<Box<dyn TransformGizmo>>;
}

// ── Translate gizmo ─────────────────────────────────────────

#[derive(Debug, Clone)]
struct GizmoDrag {
    axis: GizmoAxis,
    /// Axis parameter of the grab point, relative to the center
    last_param: f32,
}

/// Three-axis translation gizmo
#[derive(Debug, Clone)]
pub struct TranslateGizmo {
    pub axis_length: f32,
    pub hit_threshold: f32,
    object: Option<ObjectId>,
    center: Vec3,
    drag: Option<GizmoDrag>,
}

impl TranslateGizmo {
    pub fn new(axis_length: f32, hit_threshold: f32) -> Self {
        Self {
            axis_length,
            hit_threshold,
            object: None,
            center: Vec3::ZERO,
            drag: None,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn active_axis(&self) -> Option<GizmoAxis> {
        self.drag.as_ref().map(|d| d.axis)
    }
}

impl TransformGizmo for TranslateGizmo {
    fn attach(&mut self, object: &ObjectId, center: Vec3) {
        if self.object.as_ref() != Some(object) {
            self.drag = None;
        }
        self.object = Some(object.clone());
        self.center = center;
    }

    fn detach(&mut self) {
        self.object = None;
        self.drag = None;
    }

    fn attached(&self) -> Option<&ObjectId> {
        self.object.as_ref()
    }

    fn hit_test(&self, ray: &Ray) -> Option<GizmoAxis> {
        self.object.as_ref()?;

        let mut best: Option<(GizmoAxis, f32)> = None;
        for axis in GizmoAxis::ALL {
            let line_end = self.center + axis.direction() * self.axis_length;
            let dist = ray_segment_distance(ray, self.center, line_end);
            if dist < self.hit_threshold && best.is_none_or(|(_, d)| dist < d) {
                best = Some((axis, dist));
            }
        }

        best.map(|(axis, _)| axis)
    }

    fn begin_drag(&mut self, ray: &Ray) -> bool {
        let Some(axis) = self.hit_test(ray) else {
            return false;
        };
        let Some(last_param) = axis_parameter(ray, self.center, axis.direction()) else {
            return false;
        };
        self.drag = Some(GizmoDrag { axis, last_param });
        true
    }

    fn drag(&mut self, ray: &Ray) -> Option<Vec3> {
        let drag = self.drag.as_ref()?;
        let dir = drag.axis.direction();
        let param = axis_parameter(ray, self.center, dir)?;
        let delta = dir * (param - drag.last_param);
        // The handle moves with the object; the grab parameter stays fixed
        // relative to the center
        self.center += delta;
        Some(delta)
    }

    fn end_drag(&mut self) {
        self.drag = None;
    }

    fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }
}

/// Parameter along the infinite line `origin + t * dir` closest to the ray.
/// None when the ray is parallel to the line.
fn axis_parameter(ray: &Ray, origin: Vec3, dir: Vec3) -> Option<f32> {
    let w = origin - ray.origin;
    let b = ray.direction.dot(dir);
    let denom = 1.0 - b * b;
    if denom.abs() < 1e-6 {
        return None;
    }
    let d = ray.direction.dot(w);
    let e = dir.dot(w);
    Some((b * d - e) / denom)
}

/// Factory for the built-in translate gizmo; never fails
#[derive(Debug, Clone, Copy)]
pub struct TranslateGizmoFactory {
    pub axis_length: f32,
    pub hit_threshold: f32,
}

impl GizmoFactory for TranslateGizmoFactory {
    fn create(&mut self) -> EditorResult<Box<dyn TransformGizmo>> {
        Ok(Box::new(TranslateGizmo::new(
            self.axis_length,
            self.hit_threshold,
        )))
    }
}

// ── Initialization slot ─────────────────────────────────────

enum SlotState {
    Uninitialized { attempts: u32, wait: u32 },
    Ready(Box<dyn TransformGizmo>),
    Failed { attempts: u32, reason: String },
}

/// Gizmo initialization: `Uninitialized -> Ready | Failed`
pub struct GizmoSlot {
    factory: Box<dyn GizmoFactory>,
    max_attempts: u32,
    state: SlotState,
}

impl GizmoSlot {
    pub fn new(factory: Box<dyn GizmoFactory>, max_attempts: u32) -> Self {
        Self {
            factory,
            max_attempts: max_attempts.max(1),
            state: SlotState::Uninitialized {
                attempts: 0,
                wait: 0,
            },
        }
    }

    /// Advance initialization by one step. Returns true once the gizmo is ready.
    ///
    /// After the n-th failed attempt the slot skips `2^(n-1)` polls before
    /// trying again.
    pub fn poll(&mut self) -> bool {
        let SlotState::Uninitialized { attempts, wait } = &mut self.state else {
            return self.is_ready();
        };

        if *wait > 0 {
            *wait -= 1;
            return false;
        }

        match self.factory.create() {
            Ok(gizmo) => {
                tracing::info!("Transform gizmo ready after {} attempt(s)", *attempts + 1);
                self.state = SlotState::Ready(gizmo);
                true
            }
            Err(e) => {
                let attempts = *attempts + 1;
                if attempts >= self.max_attempts {
                    tracing::warn!(
                        "Transform gizmo unavailable after {} attempts: {}",
                        attempts,
                        e
                    );
                    self.state = SlotState::Failed {
                        attempts,
                        reason: e.to_string(),
                    };
                } else {
                    let wait = 1u32 << (attempts - 1).min(16);
                    tracing::debug!(
                        "Transform gizmo init failed (attempt {}), retrying in {} polls: {}",
                        attempts,
                        wait,
                        e
                    );
                    self.state = SlotState::Uninitialized { attempts, wait };
                }
                false
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, SlotState::Ready(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, SlotState::Failed { .. })
    }

    /// Failed construction attempts so far (0 once ready)
    pub fn attempts(&self) -> u32 {
        match &self.state {
            SlotState::Uninitialized { attempts, .. } | SlotState::Failed { attempts, .. } => {
                *attempts
            }
            SlotState::Ready(_) => 0,
        }
    }

    /// Why initialization gave up, if it did
    pub fn failure(&self) -> Option<&str> {
        match &self.state {
            SlotState::Failed { reason, .. } => Some(reason),
            _ => None,
        }
    }

    pub fn gizmo(&self) -> Option<&dyn TransformGizmo> {
        match &self.state {
            SlotState::Ready(g) => Some(g.as_ref()),
            _ => None,
        }
    }

    pub fn gizmo_mut(&mut self) -> Option<&mut dyn TransformGizmo> {
        match &mut self.state {
            SlotState::Ready(g) => Some(g.as_mut()),
            _ => None,
        }
    }
}

impl std::fmt::Debug for GizmoSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &self.state {
            SlotState::Uninitialized { .. } => "uninitialized",
            SlotState::Ready(_) => "ready",
            SlotState::Failed { .. } => "failed",
        };
        f.debug_struct("GizmoSlot")
            .field("state", &state)
            .field("attempts", &self.attempts())
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}
