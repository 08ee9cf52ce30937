//! World-space camera: an orthographic projection over a fixed world extent,
//! composed with a look-at view centered on the world.
//!
//! The viewport and the world space are coupled: the viewport's pixel aspect
//! ratio derives the world height, so changing one without recomputing the
//! other breaks the projection. Both are rebuilt together on resize.

use glam::{Mat4, Vec2, Vec3};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Pixel-space draw region: the canvas inset by a uniform border.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub offset_x: u32,
    pub offset_y: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Inset the canvas by `offset` on every side. An offset that would leave
    /// no drawable area falls back to the full canvas.
    pub fn inset(canvas_width: u32, canvas_height: u32, offset: u32) -> Self {
        if canvas_width <= offset * 2 || canvas_height <= offset * 2 {
            if offset > 0 {
                log::warn!(
                    "Viewport inset {}px leaves no drawable area in {}x{}; using the full canvas",
                    offset,
                    canvas_width,
                    canvas_height
                );
            }
            return Self {
                offset_x: 0,
                offset_y: 0,
                width: canvas_width.max(1),
                height: canvas_height.max(1),
            };
        }
        Self {
            offset_x: offset,
            offset_y: offset,
            width: canvas_width - offset * 2,
            height: canvas_height - offset * 2,
        }
    }
}

/// The simulation coordinate system. Width is configured; height derives from
/// the viewport aspect ratio so one world unit stays square on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldSpace {
    pub width: f32,
    pub height: f32,
    pub half_width: f32,
    pub half_height: f32,
    pub center: Vec2,
    pub camera_distance: f32,
}

impl WorldSpace {
    /// Callers guarantee a nonzero viewport; the aspect computation divides
    /// by its height.
    pub fn new(width: f32, center: Vec2, camera_distance: f32, viewport: &Viewport) -> Self {
        assert!(
            viewport.width > 0 && viewport.height > 0,
            "world space requires a nonzero viewport"
        );
        let aspect = viewport.width as f32 / viewport.height as f32;
        let height = width / aspect;
        Self {
            width,
            height,
            half_width: width / 2.0,
            half_height: height / 2.0,
            center,
            camera_distance,
        }
    }

    /// Orthographic world-to-clip matrix: eye hovering `camera_distance` above
    /// the world center looking straight down the -Z axis, world extents
    /// mapped to the unit clip box.
    pub fn view_proj(&self) -> Mat4 {
        let eye = Vec3::new(self.center.x, self.center.y, self.camera_distance);
        let target = Vec3::new(self.center.x, self.center.y, 0.0);
        let view = Mat4::look_at_rh(eye, target, Vec3::Y);
        let proj = Mat4::orthographic_rh(
            -self.half_width,
            self.half_width,
            -self.half_height,
            self.half_height,
            0.0,
            self.camera_distance,
        );
        proj * view
    }

    pub fn build_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_proj().to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    const EPS: f32 = 1e-5;

    #[test]
    fn height_derives_from_viewport_aspect() {
        let viewport = Viewport::inset(800, 600, 0);
        let world = WorldSpace::new(20.0, Vec2::ZERO, 10.0, &viewport);
        assert!((world.height - 15.0).abs() < EPS);
        assert!((world.half_width - 10.0).abs() < EPS);
        assert!((world.half_height - 7.5).abs() < EPS);
    }

    #[test]
    fn world_extent_corners_map_to_clip_corners() {
        let viewport = Viewport::inset(800, 600, 0);
        let world = WorldSpace::new(20.0, Vec2::new(3.0, -2.0), 10.0, &viewport);
        let vp = world.view_proj();

        let top_right = vp
            * Vec4::new(
                world.center.x + world.half_width,
                world.center.y + world.half_height,
                0.0,
                1.0,
            );
        assert!((top_right.x - 1.0).abs() < EPS);
        assert!((top_right.y - 1.0).abs() < EPS);

        let bottom_left = vp
            * Vec4::new(
                world.center.x - world.half_width,
                world.center.y - world.half_height,
                0.0,
                1.0,
            );
        assert!((bottom_left.x + 1.0).abs() < EPS);
        assert!((bottom_left.y + 1.0).abs() < EPS);
    }

    #[test]
    fn world_center_maps_to_clip_origin() {
        let viewport = Viewport::inset(640, 480, 20);
        let world = WorldSpace::new(10.0, Vec2::new(-4.0, 7.0), 5.0, &viewport);
        let p = world.view_proj() * Vec4::new(-4.0, 7.0, 0.0, 1.0);
        assert!(p.x.abs() < EPS);
        assert!(p.y.abs() < EPS);
    }

    #[test]
    fn inset_shrinks_canvas_on_all_sides() {
        let viewport = Viewport::inset(800, 600, 20);
        assert_eq!(viewport.offset_x, 20);
        assert_eq!(viewport.offset_y, 20);
        assert_eq!(viewport.width, 760);
        assert_eq!(viewport.height, 560);
    }

    #[test]
    fn oversized_inset_falls_back_to_full_canvas() {
        let viewport = Viewport::inset(100, 40, 30);
        assert_eq!(viewport.offset_x, 0);
        assert_eq!(viewport.width, 100);
        assert_eq!(viewport.height, 40);
    }

    #[test]
    fn uniform_roundtrips_the_matrix() {
        let viewport = Viewport::inset(800, 600, 0);
        let world = WorldSpace::new(20.0, Vec2::ZERO, 10.0, &viewport);
        let uniform = world.build_uniform();
        assert_eq!(uniform.view_proj, world.view_proj().to_cols_array_2d());
    }
}
