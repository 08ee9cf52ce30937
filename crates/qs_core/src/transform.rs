//! Per-object rectangle state and its model matrix.

use glam::{Mat4, Vec3};

/// A rectangle in world space: center position, extents, and accumulated
/// rotation in radians. Rotation is unbounded; only sin/cos ever consume it,
/// so there is no wraparound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rotate: f32,
}

impl Rect {
    /// Model matrix carrying the unit quad into world space:
    /// `T(x, y) * S(width, height) * Rz(rotate)`, so the quad rotates first,
    /// is scaled second, and is placed last. The order is load-bearing:
    /// rotation and non-uniform scale do not commute, and swapping them skews
    /// the rendered shape.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(self.x, self.y, 0.0))
            * Mat4::from_scale(Vec3::new(self.width, self.height, 1.0))
            * Mat4::from_rotation_z(self.rotate)
    }
}
