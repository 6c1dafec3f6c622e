use crate::node::NodeKind;
use glam::Mat4;
use kestrel_base::{Visit, Visitor};

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Vertical field of view, radians.
    pub fov: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov: 75.0f32.to_radians(),
            z_near: 0.025,
            z_far: 2048.0,
        }
    }
}

impl Camera {
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov, aspect, self.z_near, self.z_far)
    }
}

pub(crate) fn init(kind: &mut NodeKind) {
    *kind.camera_mut() = Camera::default();
}

pub(crate) fn copy(src: &NodeKind, dest: &mut NodeKind) {
    dest.camera_mut().clone_from(src.camera());
}

pub(crate) fn visit(kind: &mut NodeKind, visitor: &mut Visitor) -> bool {
    let camera = kind.camera_mut();
    let mut ok = camera.fov.visit("Fov", visitor);
    ok &= camera.z_near.visit("ZNear", visitor);
    ok &= camera.z_far.visit("ZFar", visitor);
    ok
}
