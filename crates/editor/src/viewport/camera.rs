use glam::{Mat4, Vec2, Vec3, Vec4};

use super::picking::Ray;

/// Screen rectangle the scene is drawn into, in pointer coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
        }
    }

    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Pointer position -> normalized device coordinates (y up)
    pub fn to_ndc(&self, pointer: Vec2) -> Vec2 {
        let px = pointer.x - self.x;
        let py = pointer.y - self.y;
        Vec2::new((px / self.width) * 2.0 - 1.0, -(py / self.height) * 2.0 + 1.0)
    }

    /// Normalized device coordinates -> pointer position
    pub fn from_ndc(&self, ndc: Vec2) -> Vec2 {
        Vec2::new(
            self.x + (ndc.x + 1.0) * 0.5 * self.width,
            self.y + (1.0 - ndc.y) * 0.5 * self.height,
        )
    }
}

/// Ray construction from normalized device coordinates.
///
/// Provided by the renderer's camera; the picking code never unprojects itself.
pub trait ViewCamera {
    fn ray_from_ndc(&self, ndc: Vec2, aspect: f32) -> Ray;
}

/// Arc-ball camera for the 3D viewport
#[derive(Debug, Clone)]
pub struct ArcBallCamera {
    /// Horizontal rotation angle (radians)
    pub yaw: f32,
    /// Vertical rotation angle (radians)
    pub pitch: f32,
    /// Distance from target
    pub distance: f32,
    /// Camera target point
    pub target: Vec3,
    /// Vertical field of view (radians)
    pub fov: f32,
}

impl Default for ArcBallCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl ArcBallCamera {
    pub fn new() -> Self {
        Self {
            yaw: 0.6,
            pitch: 0.4,
            distance: 6.0,
            target: Vec3::ZERO,
            fov: 45.0_f32.to_radians(),
        }
    }

    /// Camera looking straight down at `target` from `distance` above it
    pub fn top_down(target: Vec3, distance: f32) -> Self {
        Self {
            yaw: 0.0,
            pitch: std::f32::consts::FRAC_PI_2,
            distance,
            target,
            ..Self::new()
        }
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx.to_radians();
        self.pitch = (self.pitch + dy.to_radians()).clamp(-1.5, 1.5);
    }

    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance * (1.0 - delta)).clamp(0.5, 100.0);
    }

    /// Camera position in world space
    pub fn eye_position(&self) -> Vec3 {
        let cy = self.yaw.cos();
        let sy = self.yaw.sin();
        let cp = self.pitch.cos();
        let sp = self.pitch.sin();

        self.target
            + Vec3::new(
                self.distance * cp * sy,
                self.distance * sp,
                self.distance * cp * cy,
            )
    }

    /// View matrix (world -> camera)
    pub fn view_matrix(&self) -> Mat4 {
        // Looking straight down makes Y a degenerate up vector
        let up = if self.pitch.abs() > 1.55 { Vec3::NEG_Z } else { Vec3::Y };
        Mat4::look_at_rh(self.eye_position(), self.target, up)
    }

    /// Projection matrix (camera -> clip)
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov, aspect, 0.1, 200.0)
    }

    /// Combined view-projection matrix
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// Project a world point to normalized device coordinates
    pub fn project_ndc(&self, point: Vec3, aspect: f32) -> Option<Vec2> {
        let p = self.view_projection(aspect) * Vec4::new(point.x, point.y, point.z, 1.0);
        if p.w <= 0.0 {
            return None;
        }
        Some(Vec2::new(p.x / p.w, p.y / p.w))
    }
}

impl ViewCamera for ArcBallCamera {
    fn ray_from_ndc(&self, ndc: Vec2, aspect: f32) -> Ray {
        let vp_inv = self.view_projection(aspect).inverse();

        // Unproject near and far points
        let near_world = vp_inv * Vec4::new(ndc.x, ndc.y, -1.0, 1.0);
        let far_world = vp_inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);

        let near = near_world.truncate() / near_world.w;
        let far = far_world.truncate() / far_world.w;

        Ray::new(self.eye_position(), far - near)
    }
}
