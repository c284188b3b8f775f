//! Compression of a [`Grid`] into a weighted graph between node cells.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::EdgeWeightMode;
use crate::grid::{Direction, Grid, NodeIndex, Point};

/// Anything the search engines can walk over
pub trait GraphTrait {
    fn node_count(&self) -> usize;

    /// Return an iterator over the neighbors of the provided node and the cost required to go there
    fn neighbors_of(&self, node: NodeIndex) -> impl Iterator<Item = (NodeIndex, u32)>;

    /// Grid position of the node, used for the Manhattan heuristic
    fn position_of(&self, node: NodeIndex) -> Point;
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AdjacencyEntry {
    pub node: NodeIndex,
    pub row: usize,
    pub col: usize,
    pub weight: u32,
}

/// Symmetric adjacency list over the node cells of a maze
#[derive(Clone, Debug, Default, Serialize)]
pub struct MazeGraph {
    positions: Vec<Point>,
    adjacency: Vec<Vec<AdjacencyEntry>>,
}

impl MazeGraph {
    /// An edgeless graph with one node per position
    pub fn new(positions: Vec<Point>) -> Self {
        let adjacency = vec![Vec::new(); positions.len()];
        Self {
            positions,
            adjacency,
        }
    }

    /// Adds the edge in both directions
    pub fn connect(&mut self, a: NodeIndex, b: NodeIndex, weight: u32) {
        let (pa, pb) = (self.positions[a], self.positions[b]);
        self.adjacency[a].push(AdjacencyEntry {
            node: b,
            row: pb.row,
            col: pb.col,
            weight,
        });
        self.adjacency[b].push(AdjacencyEntry {
            node: a,
            row: pa.row,
            col: pa.col,
            weight,
        });
    }

    /// Collapses every straight corridor of the grid into a single edge.
    ///
    /// Rows are swept left to right, then columns top to bottom. The weight of an edge is the
    /// number of cells between its two ends, or 1 under [`EdgeWeightMode::Uniform`].
    pub fn compress(grid: &Grid, mode: EdgeWeightMode) -> Self {
        let positions = grid.node_cells().map(|c| c.position()).collect();
        let mut graph = Self::new(positions);

        for row in 0..grid.rows {
            graph.sweep(grid, mode, Direction::Right, grid.columns, |k| {
                Point::new(row, k)
            });
        }
        for col in 0..grid.columns {
            graph.sweep(grid, mode, Direction::Down, grid.rows, |k| {
                Point::new(k, col)
            });
        }

        info!(
            "compressed {} cells into {} nodes and {} edges",
            grid.rows * grid.columns,
            graph.node_count(),
            graph.edge_count()
        );
        graph
    }

    /// One line of the grid, `at(k)` giving the k-th cell along `forward`
    fn sweep(
        &mut self,
        grid: &Grid,
        mode: EdgeWeightMode,
        forward: Direction,
        len: usize,
        at: impl Fn(usize) -> Point,
    ) {
        let mut source = 0;
        for k in 0..len {
            let cell = grid.cell(at(k));
            if k == source {
                if !cell.can_go(forward) {
                    source = k + 1;
                }
                continue;
            }
            if cell.is_corridor(forward) {
                continue;
            }

            let weight = match mode {
                EdgeWeightMode::HopCount => (k - source) as u32,
                EdgeWeightMode::Uniform => 1,
            };
            match (grid.cell(at(source)).node, cell.node) {
                (Some(a), Some(b)) => self.connect(a, b, weight),
                _ => warn!(
                    "dropping {} edge {} -> {}: both ends must be nodes",
                    forward,
                    at(source),
                    at(k)
                ),
            }

            source = if cell.can_go(forward) { k } else { k + 1 };
        }
    }

    pub fn edges_of(&self, node: NodeIndex) -> &[AdjacencyEntry] {
        &self.adjacency[node]
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Weight of the edge between two nodes, if they are adjacent
    pub fn weight_between(&self, a: NodeIndex, b: NodeIndex) -> Option<u32> {
        self.adjacency
            .get(a)?
            .iter()
            .filter(|e| e.node == b)
            .map(|e| e.weight)
            .min()
    }

    /// Nodes without any edge. They can never be part of a path.
    pub fn isolated_nodes(&self) -> Vec<NodeIndex> {
        self.adjacency
            .iter()
            .enumerate()
            .filter(|(_, edges)| edges.is_empty())
            .map(|(i, _)| i)
            .collect()
    }

    /// Every edge has a twin going the other way with the same weight
    pub fn is_symmetric(&self) -> bool {
        self.adjacency.iter().enumerate().all(|(u, edges)| {
            edges.iter().all(|e| {
                self.adjacency[e.node]
                    .iter()
                    .any(|back| back.node == u && back.weight == e.weight)
            })
        })
    }

    /// Writes the whole adjacency list to the debug log
    pub fn log_adjacency(&self) {
        for (u, edges) in self.adjacency.iter().enumerate() {
            let list: Vec<String> = edges
                .iter()
                .map(|e| format!("{}@({},{}) w{}", e.node, e.row, e.col, e.weight))
                .collect();
            debug!(
                "node {} at {} -> [{}]",
                u,
                self.positions[u],
                list.join(", ")
            );
        }
    }
}

impl GraphTrait for MazeGraph {
    fn node_count(&self) -> usize {
        self.positions.len()
    }

    fn neighbors_of(&self, node: NodeIndex) -> impl Iterator<Item = (NodeIndex, u32)> {
        self.adjacency[node].iter().map(|e| (e.node, e.weight))
    }

    fn position_of(&self, node: NodeIndex) -> Point {
        self.positions[node]
    }
}
