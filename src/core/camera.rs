use glam::{Mat4, Vec2, Vec3, Vec4};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Camera on the +Z axis looking at the origin.
    pub fn looking_at_origin(fov_deg: f32, aspect: f32, znear: f32, zfar: f32, z: f32) -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, z),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy_radians: fov_deg.to_radians(),
            znear,
            zfar,
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }

    /// Cast a ray through normalized device coordinates and intersect it with
    /// the plane `z = plane_z`. Returns `None` when the ray runs parallel to the
    /// plane or points away from it.
    pub fn unproject_to_plane(&self, ndc: Vec2, plane_z: f32) -> Option<Vec3> {
        let inv = self.view_projection().inverse();
        let p = inv * Vec4::new(ndc.x, ndc.y, 0.5, 1.0);
        if p.w.abs() < f32::EPSILON {
            return None;
        }
        let dir = (p.truncate() / p.w - self.eye).normalize_or_zero();
        if dir.z.abs() < 1e-6 {
            return None;
        }
        let t = (plane_z - self.eye.z) / dir.z;
        (t >= 0.0).then(|| self.eye + dir * t)
    }
}

/// Convert viewport pixel coordinates into normalized device coordinates
/// (x right, y up, both in [-1, 1]).
#[inline]
pub fn pixel_to_ndc(x: f32, y: f32, width: f32, height: f32) -> Vec2 {
    let w = width.max(1.0);
    let h = height.max(1.0);
    Vec2::new((x / w) * 2.0 - 1.0, -(y / h) * 2.0 + 1.0)
}
