//! Pixel-space projection for the 2D canvas

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};

/// Projection uniform for GPU
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct ProjectionUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Maps canvas pixels (origin top-left, y down) to clip space.
///
/// The canvas size is the simulation extent, not the window size, so the
/// whole canvas always fills the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenProjection {
    pub width: f32,
    pub height: f32,
}

impl ScreenProjection {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as f32,
            height: height as f32,
        }
    }

    pub fn build_view_projection_matrix(&self) -> Mat4 {
        Mat4::orthographic_rh(0.0, self.width, self.height, 0.0, -1.0, 1.0)
    }

    /// Clip-space xy of a canvas point
    pub fn to_clip(&self, point: Vec2) -> Vec2 {
        self.build_view_projection_matrix()
            .project_point3(Vec3::new(point.x, point.y, 0.0))
            .truncate()
    }

    pub fn to_uniform(&self) -> ProjectionUniform {
        ProjectionUniform {
            view_proj: self.build_view_projection_matrix().to_cols_array_2d(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_corners_map_to_clip_corners() {
        let projection = ScreenProjection::new(800, 600);

        assert!(close(projection.to_clip(Vec2::new(0.0, 0.0)), Vec2::new(-1.0, 1.0)));
        assert!(close(projection.to_clip(Vec2::new(800.0, 600.0)), Vec2::new(1.0, -1.0)));
        assert!(close(projection.to_clip(Vec2::new(400.0, 300.0)), Vec2::ZERO));
    }

    #[test]
    fn test_y_axis_points_down() {
        let projection = ScreenProjection::new(800, 600);
        let upper = projection.to_clip(Vec2::new(100.0, 50.0));
        let lower = projection.to_clip(Vec2::new(100.0, 500.0));
        assert!(upper.y > lower.y);
    }
}
