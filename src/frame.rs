use cgmath::{InnerSpace, Vector3};

/// Orthonormal basis a patch is laid out in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalFrame {
    pub origin: Vector3<f32>,
    pub right: Vector3<f32>,
    pub up: Vector3<f32>,
    pub forward: Vector3<f32>,
}

impl LocalFrame {
    /// Builds the frame at `origin` for travel along `forward` with `normal`
    /// as the intended up direction.
    ///
    /// `forward` must be non-zero and not parallel to `normal`; coincident
    /// points produce NaNs here and callers are expected to avoid them.
    pub fn new(
        origin: Vector3<f32>,
        normal: Vector3<f32>,
        forward: Vector3<f32>,
        upside_down: bool,
    ) -> Self {
        let right = forward.cross(normal).normalize();
        let mut up = -forward.cross(right).normalize();
        if upside_down {
            up = -up;
        }
        Self {
            origin,
            right,
            up,
            forward,
        }
    }

    /// Maps local (right, up, forward) coordinates to world space.
    #[inline]
    pub fn point(&self, x: f32, y: f32, z: f32) -> Vector3<f32> {
        self.origin + self.right * x + self.up * y + self.forward * z
    }
}
