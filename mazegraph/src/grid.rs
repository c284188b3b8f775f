use std::fmt::Display;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::Geometry;
use crate::error::{MazeError, Result};
use crate::segment::{Drawing, Segment};

/// Dense index of a node cell, assigned in row-major order
pub type NodeIndex = usize;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub(crate) fn slot(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Direction::Up => "up",
                Direction::Down => "down",
                Direction::Left => "left",
                Direction::Right => "right",
            }
        )
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Point {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn manhattan(&self, other: &Point) -> u32 {
        (self.row.abs_diff(other.row) + self.col.abs_diff(other.col)) as u32
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One square of the maze and the sides it can be left through
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub can_go_up: bool,
    pub can_go_down: bool,
    pub can_go_left: bool,
    pub can_go_right: bool,
    pub is_node: bool,
    /// only set for node cells
    pub node: Option<NodeIndex>,
}

impl Cell {
    /// Creates a cell and decides whether it is a node.
    ///
    /// Nodes are turns, dead ends, T and 4-way junctions, plus any top row cell open upward or
    /// bottom row cell open downward (entrance and exit). Straight corridors and fully closed
    /// cells are not nodes.
    pub fn classify(
        row: usize,
        col: usize,
        rows: usize,
        [up, down, left, right]: [bool; 4],
    ) -> Self {
        let is_node = (up != down)
            || (left != right)
            || (up && down && left && right)
            || (row == 0 && up)
            || (row + 1 == rows && down);

        Self {
            row,
            col,
            can_go_up: up,
            can_go_down: down,
            can_go_left: left,
            can_go_right: right,
            is_node,
            node: None,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.row, self.col)
    }

    pub fn can_go(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.can_go_up,
            Direction::Down => self.can_go_down,
            Direction::Left => self.can_go_left,
            Direction::Right => self.can_go_right,
        }
    }

    /// A plain corridor cell along the axis of `forward`: open both ways and not a node
    pub fn is_corridor(&self, forward: Direction) -> bool {
        !self.is_node && self.can_go(forward) && self.can_go(forward.opposite())
    }

    pub fn open_sides(&self) -> usize {
        Direction::ALL.iter().filter(|d| self.can_go(**d)).count()
    }
}

/// The four edges of a cell, used to probe the drawing for walls
#[derive(Copy, Clone, Debug)]
struct CellProbes {
    up: Segment,
    down: Segment,
    left: Segment,
    right: Segment,
}

impl CellProbes {
    fn new(geometry: &Geometry, row: usize, col: usize) -> Self {
        let (left, right) = (geometry.edge(col), geometry.edge(col + 1));
        let (top, bottom) = (geometry.edge(row), geometry.edge(row + 1));
        Self {
            up: Segment::horizontal(left, right, top),
            down: Segment::horizontal(left, right, bottom),
            left: Segment::vertical(left, top, bottom),
            right: Segment::vertical(right, top, bottom),
        }
    }

    fn openings(&self, drawing: &Drawing) -> [bool; 4] {
        [
            !drawing.blocks(&self.up),
            !drawing.blocks(&self.down),
            !drawing.blocks(&self.left),
            !drawing.blocks(&self.right),
        ]
    }
}

/// A square grid of cells reconstructed from the walls of a drawing
#[derive(Clone, Debug, Serialize)]
pub struct Grid {
    pub rows: usize,
    pub columns: usize,
    pub geometry: Geometry,
    cells: Vec<Cell>,
    node_count: usize,
}

impl Grid {
    /// Probes every cell edge against every wall of the drawing.
    pub fn build(drawing: &Drawing, geometry: Geometry) -> Result<Self> {
        geometry.validate()?;
        let rows = geometry.cells_within(drawing.max_y);
        let columns = geometry.cells_within(drawing.max_x);

        if drawing.is_empty() || rows == 0 || columns == 0 {
            return Err(MazeError::EmptyMaze);
        }
        if rows != columns {
            return Err(MazeError::NotSquare { rows, columns });
        }

        let mut cells = Vec::with_capacity(rows * columns);
        for row in 0..rows {
            for col in 0..columns {
                let openings = CellProbes::new(&geometry, row, col).openings(drawing);
                cells.push(Cell::classify(row, col, rows, openings));
            }
        }

        let grid = Self::from_cells(rows, columns, geometry, cells);
        info!(
            "built {}x{} grid with {} nodes from {} segments",
            rows,
            columns,
            grid.node_count,
            drawing.segments.len()
        );
        Ok(grid)
    }

    /// Takes classified cells in row-major order and numbers the node cells
    fn from_cells(rows: usize, columns: usize, geometry: Geometry, mut cells: Vec<Cell>) -> Self {
        debug_assert_eq!(cells.len(), rows * columns);

        let mut next = 0;
        for cell in cells.iter_mut() {
            cell.node = if cell.is_node {
                next += 1;
                Some(next - 1)
            } else {
                None
            };
        }

        Self {
            rows,
            columns,
            geometry,
            cells,
            node_count: next,
        }
    }

    pub fn cell(&self, p: Point) -> &Cell {
        &self.cells[p.row * self.columns + p.col]
    }

    pub fn get(&self, row: usize, col: usize) -> &Cell {
        self.cell(Point::new(row, col))
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Node cells in index order
    pub fn node_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|c| c.is_node)
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// The node in the top row that opens upward
    pub fn entrance(&self) -> Result<NodeIndex> {
        (0..self.columns)
            .map(|col| self.get(0, col))
            .find(|c| c.can_go_up)
            .and_then(|c| c.node)
            .ok_or(MazeError::NoEntrance)
    }

    /// The node in the bottom row that opens downward
    pub fn exit(&self) -> Result<NodeIndex> {
        let row = self.rows - 1;
        (0..self.columns)
            .map(|col| self.get(row, col))
            .find(|c| c.can_go_down)
            .and_then(|c| c.node)
            .ok_or(MazeError::NoExit)
    }

    /// Writes every cell's openings to the debug log
    pub fn log_cells(&self) {
        for c in &self.cells {
            debug!(
                "cell ({}, {}) left {} | up {} | right {} | down {} | node {:?}",
                c.row, c.col, c.can_go_left, c.can_go_up, c.can_go_right, c.can_go_down, c.node
            );
        }
    }
}

/// Draws the walls in the same `+--+` / `|  |` notation that [`crate::util::parse_ascii`] reads
impl Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..self.rows {
            self.write_wall_row(f, |col| !self.get(row, col).can_go_up)?;

            write!(
                f,
                "{}",
                if self.get(row, 0).can_go_left {
                    " "
                } else {
                    "|"
                }
            )?;
            for col in 0..self.columns {
                let cell = self.get(row, col);
                write!(f, "  {}", if cell.can_go_right { " " } else { "|" })?;
            }
            writeln!(f)?;
        }
        self.write_wall_row(f, |col| !self.get(self.rows - 1, col).can_go_down)
    }
}

impl Grid {
    fn write_wall_row(
        &self,
        f: &mut std::fmt::Formatter<'_>,
        wall: impl Fn(usize) -> bool,
    ) -> std::fmt::Result {
        write!(f, "+")?;
        for col in 0..self.columns {
            write!(f, "{}+", if wall(col) { "--" } else { "  " })?;
        }
        writeln!(f)
    }
}
