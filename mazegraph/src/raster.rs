use std::path::Path;

use image::{Rgb, RgbImage};

use crate::config::Color;
use crate::error::Result;
use crate::render::Overlay;
use crate::segment::{Drawing, Segment};

const BACKGROUND: Rgb<u8> = Rgb([0xff, 0xff, 0xff]);

/// Rasterizes walls and strokes onto a white canvas the size of the SVG output
pub fn rasterize(drawing: &Drawing, overlay: &Overlay, wall_color: Color, width: u32) -> RgbImage {
    let mut img = RgbImage::from_pixel(drawing.max_x + width, drawing.max_y + width, BACKGROUND);

    for wall in &drawing.segments {
        draw_thick(&mut img, wall, wall_color, width);
    }
    for (stroke, color) in overlay.strokes() {
        draw_thick(&mut img, &stroke, color, width);
    }
    img
}

pub fn save_png(
    drawing: &Drawing,
    overlay: &Overlay,
    wall_color: Color,
    width: u32,
    path: impl AsRef<Path>,
) -> Result<()> {
    rasterize(drawing, overlay, wall_color, width).save(path)?;
    Ok(())
}

/// Fills the segment's bounding box grown by half the line width on every side
fn draw_thick(img: &mut RgbImage, s: &Segment, color: Color, width: u32) {
    let half = width / 2;
    let x_end = (s.x2 + half + width % 2).min(img.width());
    let y_end = (s.y2 + half + width % 2).min(img.height());
    let pixel = Rgb([color.r, color.g, color.b]);

    for y in s.y1.saturating_sub(half)..y_end {
        for x in s.x1.saturating_sub(half)..x_end {
            img.put_pixel(x, y, pixel);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::Geometry;
    use crate::grid::{Grid, Point};
    use crate::render::{PathKind, PathPainter};

    #[test]
    fn test_walls_and_strokes_are_drawn() {
        let geometry = Geometry::default();
        let drawing = Drawing::from_segments(vec![
            Segment::horizontal(2, 18, 2),
            Segment::vertical(2, 2, 18),
            Segment::vertical(18, 2, 18),
        ]);
        let grid = Grid::build(&drawing, geometry).unwrap();
        let mut overlay = Overlay::new(&grid, true);
        overlay.paint_path(&[Point::new(0, 0)], PathKind::Solution, Color::RED);

        let img = rasterize(&drawing, &overlay, Color::BLACK, geometry.origin);
        assert_eq!(img.dimensions(), (20, 20));

        assert_eq!(*img.get_pixel(10, 2), Rgb([0, 0, 0]));
        assert_eq!(*img.get_pixel(1, 10), Rgb([0, 0, 0]));
        // the only cell opens downward, so the stub runs from its center to the bottom edge
        assert_eq!(*img.get_pixel(10, 14), Rgb([0xff, 0x33, 0x00]));
        assert_eq!(*img.get_pixel(10, 6), BACKGROUND);
        assert_eq!(*img.get_pixel(5, 5), BACKGROUND);
    }
}
