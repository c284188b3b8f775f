use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;
use mazegraph::{Algorithm, EdgeWeightMode, Maze, PathFinderState, RunReport, SolverConfig};

/// Finds the way through a maze drawing with Dijkstra, Greedy Best-First and A*
#[derive(Parser, Debug)]
#[command(name = "mazegraph", version)]
struct Args {
    /// Maze drawing: .svg, .json segment list or .txt ASCII art
    input: PathBuf,

    /// JSON solver configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Algorithm to run, may be repeated (default: all three)
    #[arg(long = "algorithm", short)]
    algorithms: Vec<Algorithm>,

    /// Where the solution images go (default: next to the input)
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Also write a PNG next to every SVG
    #[arg(long)]
    png: bool,

    /// Write a JSON report of every run to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Dump every cell and the adjacency list to the log
    #[arg(long)]
    trace: bool,

    /// Count junction-to-junction moves instead of cells
    #[arg(long)]
    uniform_weights: bool,

    /// One color per cell instead of per stroke
    #[arg(long)]
    single_color: bool,
}

impl Args {
    fn solver_config(&self) -> anyhow::Result<SolverConfig> {
        let mut config = match &self.config {
            Some(path) => SolverConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => SolverConfig::default(),
        };

        if !self.algorithms.is_empty() {
            config.algorithms = self.algorithms.clone();
        }
        if self.trace {
            config.trace_enabled = true;
        }
        if self.uniform_weights {
            config.edge_weight_mode = EdgeWeightMode::Uniform;
        }
        if self.single_color {
            config.per_direction_color = false;
        }
        Ok(config)
    }
}

fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();
    let config = args.solver_config()?;

    let default_filter = if config.trace_enabled { "debug" } else { "info" };
    let env = env_logger::Env::default().default_filter_or(default_filter);
    env_logger::Builder::from_env(env).init();

    let maze = Maze::load(&args.input, &config)
        .with_context(|| format!("failed to build maze from {}", args.input.display()))?;
    info!(
        "{}x{} maze, {} nodes, {} edges",
        maze.grid.rows,
        maze.grid.columns,
        maze.grid.node_count(),
        maze.graph.edge_count()
    );
    if config.trace_enabled {
        log::debug!("grid:\n{}", maze.grid);
    }

    let out_dir = match &args.out_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
            dir.clone()
        }
        None => args
            .input
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_default(),
    };
    let stem = args
        .input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("maze");

    let mut reports: Vec<RunReport> = Vec::new();
    for &algorithm in &config.algorithms {
        let run = maze.solve(algorithm);

        match &run.state {
            PathFinderState::PathFound(result) => info!(
                "{}: path of {} nodes, cost {}, {} dead ends, {:.3} ms",
                algorithm,
                result.path.len(),
                result.total_cost,
                run.dead_ends().len(),
                run.elapsed.as_secs_f64() * 1000.0
            ),
            _ => info!(
                "{}: no path found, {:.3} ms",
                algorithm,
                run.elapsed.as_secs_f64() * 1000.0
            ),
        }

        let written = maze
            .write_solution(&run, &config, &out_dir, stem, args.png)
            .with_context(|| format!("failed to write {} solution", algorithm))?;
        info!("saved {}", written.display());

        reports.push(run.report(&maze.graph));
    }

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&reports)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report {}", path.display()))?;
        info!("report written to {}", path.display());
    }

    Ok(())
}
