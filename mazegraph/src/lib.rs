pub mod config;
pub mod error;
pub mod find;
pub mod graph;
pub mod grid;
pub mod heap;
pub mod path;
pub mod raster;
pub mod render;
pub mod segment;
pub mod util;

use std::path::{Path, PathBuf};

use log::{info, warn};

pub use config::{Color, EdgeWeightMode, Geometry, SolverConfig};
pub use error::{MazeError, Result};
pub use find::{Algorithm, PathFinder, PathFinderState, PathResult, RunReport, SearchRun};
pub use graph::{GraphTrait, MazeGraph};
pub use grid::{Grid, NodeIndex, Point};
pub use render::{Overlay, PathPainter};
pub use segment::{Drawing, Segment};

/// A maze ready to be searched: the drawing, its grid and the compressed graph
#[derive(Debug, Clone)]
pub struct Maze {
    pub drawing: Drawing,
    pub grid: Grid,
    pub graph: MazeGraph,
    /// node of the top row cell open upward
    pub start: NodeIndex,
    /// node of the bottom row cell open downward
    pub end: NodeIndex,
}

impl Maze {
    pub fn load(path: impl AsRef<Path>, config: &SolverConfig) -> Result<Self> {
        let drawing = util::load_drawing(path, &config.geometry)?;
        Self::from_drawing(drawing, config)
    }

    pub fn from_drawing(drawing: Drawing, config: &SolverConfig) -> Result<Self> {
        let grid = Grid::build(&drawing, config.geometry)?;
        if config.trace_enabled {
            grid.log_cells();
        }

        let graph = MazeGraph::compress(&grid, config.edge_weight_mode);
        if config.trace_enabled {
            graph.log_adjacency();
        }

        let isolated = graph.isolated_nodes();
        if !isolated.is_empty() {
            warn!("{} nodes have no edges: {:?}", isolated.len(), isolated);
        }

        let start = grid.entrance()?;
        let end = grid.exit()?;
        info!(
            "start node {} at {}, end node {} at {}",
            start,
            graph.position_of(start),
            end,
            graph.position_of(end)
        );

        Ok(Self {
            drawing,
            grid,
            graph,
            start,
            end,
        })
    }

    pub fn solve(&self, algorithm: Algorithm) -> SearchRun {
        SearchRun::run(algorithm, &self.graph, self.start, self.end)
    }

    /// Dead ends and solution of `run` painted on a fresh overlay
    pub fn overlay(&self, run: &SearchRun, config: &SolverConfig) -> Overlay<'_> {
        let mut overlay = Overlay::new(&self.grid, config.per_direction_color);
        render::paint_run(&mut overlay, run, &self.graph, config);
        overlay
    }

    /// Writes `<stem>_<algorithm>_solution.svg` (and `.png` if asked) into `dir`
    pub fn write_solution(
        &self,
        run: &SearchRun,
        config: &SolverConfig,
        dir: impl AsRef<Path>,
        stem: &str,
        png: bool,
    ) -> Result<PathBuf> {
        let overlay = self.overlay(run, config);
        let file_name = format!("{}_{}_solution.svg", stem, run.algorithm.file_tag());
        let svg_path = dir.as_ref().join(file_name);
        overlay.write_svg(&self.drawing, config.wall_color, &svg_path)?;

        if png {
            raster::save_png(
                &self.drawing,
                &overlay,
                config.wall_color,
                config.geometry.origin,
                svg_path.with_extension("png"),
            )?;
        }
        Ok(svg_path)
    }
}
