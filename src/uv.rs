use std::ops::Mul;

use cgmath::Vector2;

/// 2D placement of patch UVs inside the atlas.
///
/// Applied as scale, then translate, then rotate (radians, about the atlas
/// origin). `a * b` combines component-wise, not as matrices: translations
/// and rotations add, scales multiply.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UvTransform {
    pub translate: Vector2<f32>,
    pub scale: Vector2<f32>,
    pub rotation: f32,
}

impl Default for UvTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl UvTransform {
    pub const IDENTITY: UvTransform = UvTransform {
        translate: Vector2 { x: 0.0, y: 0.0 },
        scale: Vector2 { x: 1.0, y: 1.0 },
        rotation: 0.0,
    };

    pub fn translation(u: f32, v: f32) -> Self {
        Self {
            translate: Vector2::new(u, v),
            ..Self::IDENTITY
        }
    }

    pub fn scaling(u: f32, v: f32) -> Self {
        Self {
            scale: Vector2::new(u, v),
            ..Self::IDENTITY
        }
    }

    pub fn rotation(radians: f32) -> Self {
        Self {
            rotation: radians,
            ..Self::IDENTITY
        }
    }

    pub fn apply(&self, uv: Vector2<f32>) -> Vector2<f32> {
        let scaled = Vector2::new(uv.x * self.scale.x, uv.y * self.scale.y);
        let moved = scaled + self.translate;
        if self.rotation == 0.0 {
            return moved;
        }
        let (sin, cos) = self.rotation.sin_cos();
        Vector2::new(moved.x * cos - moved.y * sin, moved.x * sin + moved.y * cos)
    }
}

impl Mul for UvTransform {
    type Output = UvTransform;

    fn mul(self, rhs: UvTransform) -> UvTransform {
        UvTransform {
            translate: self.translate + rhs.translate,
            scale: Vector2::new(self.scale.x * rhs.scale.x, self.scale.y * rhs.scale.y),
            rotation: self.rotation + rhs.rotation,
        }
    }
}

impl Mul<Vector2<f32>> for UvTransform {
    type Output = Vector2<f32>;

    fn mul(self, uv: Vector2<f32>) -> Vector2<f32> {
        self.apply(uv)
    }
}
