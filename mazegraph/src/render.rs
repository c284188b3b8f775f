//! Drawing search results back on top of the maze.

use std::fmt::Display;
use std::path::Path;

use crate::config::{Color, Geometry, SolverConfig};
use crate::error::Result;
use crate::find::SearchRun;
use crate::graph::GraphTrait;
use crate::grid::{Direction, Grid, Point};
use crate::segment::{Drawing, Segment};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PathKind {
    /// An explored branch that ended without reaching the goal
    DeadEnd,
    Solution,
}

/// Receives the paths of a search run, dead ends first and the solution last
pub trait PathPainter {
    fn paint_path(&mut self, path: &[Point], kind: PathKind, color: Color);
}

/// Paints everything worth showing about `run` in the configured colors
pub fn paint_run<P: PathPainter, G: GraphTrait>(
    painter: &mut P,
    run: &SearchRun,
    graph: &G,
    config: &SolverConfig,
) {
    let positions = |path: &[usize]| -> Vec<Point> {
        path.iter().map(|&n| graph.position_of(n)).collect()
    };

    if config.render_dead_ends {
        for path in run.dead_end_paths() {
            painter.paint_path(&positions(&path), PathKind::DeadEnd, config.dead_end_color);
        }
    }
    if let Some(path) = run.path() {
        painter.paint_path(&positions(path), PathKind::Solution, config.solution_color);
    }
}

/// Half-strokes from the cell center to each of its sides
#[derive(Copy, Clone, Debug)]
struct CellStrokes {
    on: [bool; 4],
    color: [Color; 4],
}

impl Default for CellStrokes {
    fn default() -> Self {
        Self {
            on: [false; 4],
            color: [Color::BLACK; 4],
        }
    }
}

/// Stroke layer over a grid, traced cell by cell along node paths
#[derive(Debug)]
pub struct Overlay<'a> {
    grid: &'a Grid,
    cells: Vec<CellStrokes>,
    per_direction_color: bool,
}

impl<'a> Overlay<'a> {
    pub fn new(grid: &'a Grid, per_direction_color: bool) -> Self {
        Self {
            grid,
            cells: vec![CellStrokes::default(); grid.rows * grid.columns],
            per_direction_color,
        }
    }

    fn set(&mut self, p: Point, direction: Direction, color: Color) {
        let cell = &mut self.cells[p.row * self.grid.columns + p.col];
        cell.on[direction.slot()] = true;
        if self.per_direction_color {
            cell.color[direction.slot()] = color;
        } else {
            // the whole cell takes the latest color
            cell.color = [color; 4];
        }
    }

    /// Side through which a boundary cell leaves the maze
    fn opening(&self, p: Point) -> Option<Direction> {
        let cell = self.grid.cell(p);
        if p.row == 0 && cell.can_go_up {
            Some(Direction::Up)
        } else if p.row + 1 == self.grid.rows && cell.can_go_down {
            Some(Direction::Down)
        } else if cell.can_go_up {
            Some(Direction::Up)
        } else if cell.can_go_down {
            Some(Direction::Down)
        } else {
            None
        }
    }

    fn stub(&mut self, p: Point, color: Color) {
        if let Some(direction) = self.opening(p) {
            self.set(p, direction, color);
        }
    }

    /// Both half-strokes of every cell from `a` to `b`, which share a row or a column
    fn trace_leg(&mut self, a: Point, b: Point, color: Color) {
        let along_row = |c: usize| Point::new(a.row, c);
        let along_col = |r: usize| Point::new(r, a.col);
        let (direction, cells): (Direction, Vec<Point>) = if a.row == b.row {
            if a.col <= b.col {
                (Direction::Right, (a.col..=b.col).map(along_row).collect())
            } else {
                (Direction::Left, (b.col..=a.col).rev().map(along_row).collect())
            }
        } else if a.row <= b.row {
            (Direction::Down, (a.row..=b.row).map(along_col).collect())
        } else {
            (Direction::Up, (b.row..=a.row).rev().map(along_col).collect())
        };

        let last = cells.len() - 1;
        for (i, &p) in cells.iter().enumerate() {
            if i > 0 {
                self.set(p, direction.opposite(), color);
            }
            if i < last {
                self.set(p, direction, color);
            }
        }
    }

    /// Active strokes in drawing order with their pixel coordinates
    pub fn strokes(&self) -> Vec<(Segment, Color)> {
        const ORDER: [Direction; 4] = [
            Direction::Left,
            Direction::Up,
            Direction::Right,
            Direction::Down,
        ];

        let g = &self.grid.geometry;
        let mut out = Vec::new();
        for row in 0..self.grid.rows {
            for col in 0..self.grid.columns {
                let cell = &self.cells[row * self.grid.columns + col];
                for direction in ORDER {
                    if cell.on[direction.slot()] {
                        out.push((stroke(g, row, col, direction), cell.color[direction.slot()]));
                    }
                }
            }
        }
        out
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| !c.on.iter().any(|&on| on))
    }

    /// The walls followed by the strokes, as an SVG document
    pub fn to_svg(&self, drawing: &Drawing, wall_color: Color) -> String {
        SvgDocument {
            overlay: self,
            drawing,
            wall_color,
        }
        .to_string()
    }

    pub fn write_svg(
        &self,
        drawing: &Drawing,
        wall_color: Color,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        std::fs::write(path, self.to_svg(drawing, wall_color))?;
        Ok(())
    }
}

impl PathPainter for Overlay<'_> {
    fn paint_path(&mut self, path: &[Point], kind: PathKind, color: Color) {
        let Some(&first) = path.first() else {
            return;
        };

        self.stub(first, color);
        for leg in path.windows(2) {
            self.trace_leg(leg[0], leg[1], color);
        }
        if kind == PathKind::Solution {
            if let Some(&last) = path.last() {
                self.stub(last, color);
            }
        }
    }
}

fn stroke(g: &Geometry, row: usize, col: usize, direction: Direction) -> Segment {
    let (mid_x, mid_y) = (g.mid(col), g.mid(row));
    match direction {
        Direction::Left => Segment::horizontal(g.edge(col), mid_x, mid_y),
        Direction::Right => Segment::horizontal(mid_x, g.edge(col + 1), mid_y),
        Direction::Up => Segment::vertical(mid_x, g.edge(row), mid_y),
        Direction::Down => Segment::vertical(mid_x, mid_y, g.edge(row + 1)),
    }
}

/// An overlay on top of its drawing, rendered by [`Overlay::to_svg`]
struct SvgDocument<'a> {
    overlay: &'a Overlay<'a>,
    drawing: &'a Drawing,
    wall_color: Color,
}

impl Display for SvgDocument<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let width = self.overlay.grid.geometry.origin;

        writeln!(f, "<?xml version=\"1.0\" standalone=\"no\"?>")?;
        writeln!(
            f,
            "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \
             \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">"
        )?;
        writeln!(
            f,
            "<svg width=\"{}\" height=\"{}\" version=\"1.1\" xmlns=\"http://www.w3.org/2000/svg\">",
            self.drawing.max_x + width,
            self.drawing.max_y + width
        )?;
        writeln!(f, "\t<title>Maze Solution</title>")?;

        for wall in &self.drawing.segments {
            write_line(f, wall, self.wall_color, width, "square")?;
        }
        for (stroke, color) in self.overlay.strokes() {
            write_line(f, &stroke, color, width, "round")?;
        }

        writeln!(f, "</svg>")
    }
}

fn write_line(
    f: &mut std::fmt::Formatter<'_>,
    s: &Segment,
    color: Color,
    width: u32,
    cap: &str,
) -> std::fmt::Result {
    writeln!(
        f,
        "\t<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" fill=\"none\" stroke=\"{}\" \
         stroke-width=\"{}\" stroke-linecap=\"{}\"/>",
        s.x1, s.y1, s.x2, s.y2, color, width, cap
    )
}
