//! Drawing contract between the simulation and a rendering backend

use glam::DVec2;
use molecule_physics::Molecule;

/// Color with sRGB-encoded channels in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_srgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    fn from_palette(color: &catppuccin::Color) -> Self {
        Self::from_srgb8(color.rgb.r, color.rgb.g, color.rgb.b)
    }

    /// Linear-light channels, for sRGB render targets
    pub fn to_linear(self) -> [f32; 4] {
        fn channel(c: f32) -> f32 {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        [channel(self.r), channel(self.g), channel(self.b), self.a]
    }
}

/// Catppuccin Mocha blue
pub fn molecule_color() -> Rgba {
    Rgba::from_palette(&catppuccin::PALETTE.mocha.colors.blue)
}

/// Catppuccin Mocha base
pub fn background_color() -> Rgba {
    Rgba::from_palette(&catppuccin::PALETTE.mocha.colors.base)
}

/// A fixed-size 2D surface that can be cleared and filled with circles.
///
/// These are the only primitives the animation needs.
pub trait Canvas {
    /// Width and height in canvas pixels
    fn size(&self) -> (u32, u32);

    fn clear(&mut self, color: Rgba);

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: Rgba);
}

/// Clear the canvas, then paint every molecule in collection order.
pub fn draw_molecules<C: Canvas + ?Sized>(canvas: &mut C, molecules: &[Molecule], fill: Rgba) {
    canvas.clear(background_color());
    for molecule in molecules {
        canvas.fill_circle(molecule.position, molecule.radius(), fill);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Op {
        Clear,
        Circle(DVec2, f64),
    }

    #[derive(Default)]
    struct RecordingCanvas {
        ops: Vec<Op>,
    }

    impl Canvas for RecordingCanvas {
        fn size(&self) -> (u32, u32) {
            (800, 600)
        }

        fn clear(&mut self, _color: Rgba) {
            self.ops.push(Op::Clear);
        }

        fn fill_circle(&mut self, center: DVec2, radius: f64, _color: Rgba) {
            self.ops.push(Op::Circle(center, radius));
        }
    }

    #[test]
    fn test_clears_then_draws_in_order() {
        let molecules = [
            Molecule::new(DVec2::new(10.0, 20.0), DVec2::new(1.0, 1.0), 10.0),
            Molecule::new(DVec2::new(-3.0, 700.0), DVec2::ZERO, 10.0),
            Molecule::new(DVec2::new(400.0, 300.0), DVec2::ZERO, 5.0),
        ];
        let mut canvas = RecordingCanvas::default();

        draw_molecules(&mut canvas, &molecules, molecule_color());

        assert_eq!(
            canvas.ops,
            vec![
                Op::Clear,
                Op::Circle(DVec2::new(10.0, 20.0), 10.0),
                Op::Circle(DVec2::new(-3.0, 700.0), 10.0),
                Op::Circle(DVec2::new(400.0, 300.0), 5.0),
            ]
        );
    }

    #[test]
    fn test_empty_collection_only_clears() {
        let mut canvas = RecordingCanvas::default();
        draw_molecules(&mut canvas, &[], molecule_color());
        assert_eq!(canvas.ops, vec![Op::Clear]);
    }

    #[test]
    fn test_srgb_to_linear() {
        let white = Rgba::new(1.0, 1.0, 1.0, 0.5).to_linear();
        assert!((white[0] - 1.0).abs() < 1e-6);
        assert_eq!(white[3], 0.5);

        let black = Rgba::new(0.0, 0.0, 0.0, 1.0).to_linear();
        assert_eq!(black[0], 0.0);

        let mid = Rgba::new(0.5, 0.5, 0.5, 1.0).to_linear();
        assert!((mid[0] - 0.214).abs() < 1e-3);
    }

    #[test]
    fn test_palette_colors_are_opaque_and_distinct() {
        let fill = molecule_color();
        let background = background_color();
        assert_eq!(fill.a, 1.0);
        assert_ne!(fill, background);
        // Mocha blue is blue-dominant
        assert!(fill.b > fill.r);
    }
}
