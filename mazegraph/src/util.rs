//! Readers that turn maze files into a [`Drawing`].

use std::path::Path;

use log::debug;
use usvg::tiny_skia_path::{PathSegment, Point};

use crate::config::Geometry;
use crate::error::{MazeError, Result};
use crate::segment::{Drawing, Segment};

/// Reads a maze from disk, choosing the parser from the file extension
pub fn load_drawing(path: impl AsRef<Path>, geometry: &Geometry) -> Result<Drawing> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let drawing = match extension.as_deref() {
        Some("svg") => parse_svg(&text)?,
        Some("json") => parse_json(&text)?,
        Some("txt") => parse_ascii(&text, geometry)?,
        _ => return Err(MazeError::UnknownFormat(path.display().to_string())),
    };

    debug!(
        "read {} wall segments from {}, extent {}x{}",
        drawing.segments.len(),
        path.display(),
        drawing.max_x,
        drawing.max_y
    );
    Ok(drawing)
}

/// Collects every straight piece of every path in the SVG as a wall.
///
/// `<line>`, `<polyline>`, `<rect>` and `<path>` elements all end up as paths in the parsed tree.
/// Curves are skipped.
pub fn parse_svg(text: &str) -> Result<Drawing> {
    let tree = usvg::Tree::from_str(text, &usvg::Options::default())?;
    let mut segments = Vec::new();
    collect_segments(tree.root(), &mut segments);
    Ok(Drawing::from_segments(segments))
}

fn collect_segments(group: &usvg::Group, segments: &mut Vec<Segment>) {
    for node in group.children() {
        match node {
            usvg::Node::Group(group) => collect_segments(group, segments),
            usvg::Node::Path(path) => {
                let transform = path.abs_transform();
                let to_pixel = |p: Point| {
                    let x = p.x * transform.sx + p.y * transform.kx + transform.tx;
                    let y = p.x * transform.ky + p.y * transform.sy + transform.ty;
                    (x.round().max(0.0) as u32, y.round().max(0.0) as u32)
                };

                let mut start = None;
                let mut last = None;
                for segment in path.data().segments() {
                    match segment {
                        PathSegment::MoveTo(p) => {
                            start = Some(to_pixel(p));
                            last = start;
                        }
                        PathSegment::LineTo(p) => {
                            let p = to_pixel(p);
                            if let Some((x, y)) = last {
                                segments.push(Segment::new(x, y, p.0, p.1));
                            }
                            last = Some(p);
                        }
                        PathSegment::QuadTo(_, p) | PathSegment::CubicTo(_, _, p) => {
                            last = Some(to_pixel(p));
                        }
                        PathSegment::Close => {
                            if let (Some((x1, y1)), Some((x2, y2))) = (last, start) {
                                if (x1, y1) != (x2, y2) {
                                    segments.push(Segment::new(x1, y1, x2, y2));
                                }
                            }
                            last = start;
                        }
                    }
                }
            }
            _ => {}
        }
    }
}

/// Reads a JSON array of `{"x1", "y1", "x2", "y2"}` objects
pub fn parse_json(text: &str) -> Result<Drawing> {
    let segments: Vec<Segment> = serde_json::from_str(text)?;
    Ok(Drawing::from_segments(segments))
}

/// Reads a maze drawn with `+`, `-` and `|`, three characters per cell:
///
/// ```text
/// +--+  +--+
/// |     |  |
/// +  +--+  +
/// |        |
/// +--+--+  +
/// ```
///
/// Wall rows alternate with cell rows. Adjacent walls on the same line are merged into one long
/// segment, the way a drawing program would emit them. Missing trailing characters count as open.
pub fn parse_ascii(text: &str, geometry: &Geometry) -> Result<Drawing> {
    let lines: Vec<&[u8]> = text
        .lines()
        .map(|l| l.trim_end().as_bytes())
        .skip_while(|l| l.is_empty())
        .collect();
    let lines: Vec<&[u8]> = match lines.iter().rposition(|l| !l.is_empty()) {
        Some(last) => lines[..=last].to_vec(),
        None => return Err(MazeError::EmptyMaze),
    };

    if lines.len() < 3 || lines.len() % 2 == 0 {
        return Err(MazeError::Ascii {
            line: lines.len(),
            reason: "wall rows and cell rows must alternate".to_string(),
        });
    }
    if lines[0].first() != Some(&b'+') {
        return Err(MazeError::Ascii {
            line: 1,
            reason: "first line must start with '+'".to_string(),
        });
    }

    let rows = lines.len() / 2;
    let columns = (lines[0].len() - 1) / 3;
    let at = |line: &[u8], i: usize| line.get(i).copied().unwrap_or(b' ');

    // horizontal[r][c]: wall above cell (r, c), r == rows is the bottom edge
    let mut horizontal = vec![vec![false; columns]; rows + 1];
    // vertical[r][c]: wall left of cell (r, c), c == columns is the right edge
    let mut vertical = vec![vec![false; columns + 1]; rows];

    for (i, line) in lines.iter().enumerate() {
        let r = i / 2;
        if i % 2 == 0 {
            for (c, wall) in horizontal[r].iter_mut().enumerate() {
                *wall = match at(line, 3 * c + 1) {
                    b'-' => true,
                    b' ' => false,
                    other => return Err(unexpected(i, 3 * c + 1, other)),
                };
            }
        } else {
            for (c, wall) in vertical[r].iter_mut().enumerate() {
                *wall = match at(line, 3 * c) {
                    b'|' => true,
                    b' ' => false,
                    other => return Err(unexpected(i, 3 * c, other)),
                };
            }
        }
    }

    let mut segments = Vec::new();
    for (r, walls) in horizontal.iter().enumerate() {
        for (start, end) in runs(walls.iter().copied()) {
            segments.push(Segment::horizontal(
                geometry.edge(start),
                geometry.edge(end),
                geometry.edge(r),
            ));
        }
    }
    for c in 0..=columns {
        for (start, end) in runs(vertical.iter().map(|row| row[c])) {
            segments.push(Segment::vertical(
                geometry.edge(c),
                geometry.edge(start),
                geometry.edge(end),
            ));
        }
    }

    Ok(Drawing::from_segments(segments))
}

fn unexpected(line: usize, column: usize, found: u8) -> MazeError {
    MazeError::Ascii {
        line: line + 1,
        reason: format!("unexpected '{}' at column {}", found as char, column + 1),
    }
}

/// Half-open index ranges of consecutive `true` values
fn runs(flags: impl Iterator<Item = bool>) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut open: Option<usize> = None;
    let mut len = 0;
    for (i, flag) in flags.enumerate() {
        match (flag, open) {
            (true, None) => open = Some(i),
            (false, Some(start)) => {
                runs.push((start, i));
                open = None;
            }
            _ => {}
        }
        len = i + 1;
    }
    if let Some(start) = open {
        runs.push((start, len));
    }
    runs
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_ascii_merges_runs() {
        let geometry = Geometry::default();
        let drawing = parse_ascii(
            "+--+--+\n\
             |     |\n\
             +  +--+\n\
             |     |\n\
             +--+--+\n",
            &geometry,
        )
        .unwrap();

        assert!(drawing.segments.contains(&Segment::horizontal(2, 34, 2)));
        assert!(drawing.segments.contains(&Segment::horizontal(18, 34, 18)));
        assert!(drawing.segments.contains(&Segment::horizontal(2, 34, 34)));
        assert!(drawing.segments.contains(&Segment::vertical(2, 2, 34)));
        assert!(drawing.segments.contains(&Segment::vertical(34, 2, 34)));
        assert_eq!(drawing.segments.len(), 5);
        assert_eq!((drawing.max_x, drawing.max_y), (34, 34));
    }

    #[test]
    fn test_ascii_rejects_garbage() {
        let geometry = Geometry::default();
        assert!(matches!(
            parse_ascii("+--+\n|  |\n", &geometry),
            Err(MazeError::Ascii { .. })
        ));
        assert!(matches!(
            parse_ascii("+--+\n|  x\n+--+", &geometry),
            Err(MazeError::Ascii { line: 2, .. })
        ));
        assert!(matches!(
            parse_ascii("\n\n", &geometry),
            Err(MazeError::EmptyMaze)
        ));
    }

    #[test]
    fn test_json_segments() {
        let text = r#"[
            {"x1": 2, "y1": 2, "x2": 34, "y2": 2},
            {"x1": 34, "y1": 34, "x2": 34, "y2": 2}
        ]"#;
        let drawing = parse_json(text).unwrap();
        assert_eq!(drawing.segments[1], Segment::vertical(34, 2, 34));
        assert_eq!((drawing.max_x, drawing.max_y), (34, 34));
        assert!(matches!(parse_json("{"), Err(MazeError::Json(_))));
    }

    #[test]
    fn test_svg_lines() {
        let drawing = parse_svg(
            r##"<?xml version="1.0" standalone="no"?>
<svg width="36" height="36" version="1.1" xmlns="http://www.w3.org/2000/svg">
  <g fill="none" stroke="#000000" stroke-width="2" stroke-linecap="square">
    <line x1="2" y1="2" x2="34" y2="2" />
    <line x1="2" y1="34" x2="2" y2="2" />
    <line x1="34" y1="2" x2="34" y2="34" />
    <line x1="2" y1="34" x2="34" y2="34" />
  </g>
</svg>"##,
        )
        .unwrap();

        assert_eq!(drawing.segments.len(), 4);
        assert!(drawing.segments.contains(&Segment::vertical(2, 2, 34)));
        assert_eq!((drawing.max_x, drawing.max_y), (34, 34));
    }

    #[test]
    fn test_runs() {
        assert_eq!(
            runs([true, true, false, true].into_iter()),
            vec![(0, 2), (3, 4)]
        );
        assert!(runs([false, false].into_iter()).is_empty());
    }
}
