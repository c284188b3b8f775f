use std::{
    fmt::Display,
    str::FromStr,
    time::{Duration, Instant},
};

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::error::MazeError;
use crate::graph::GraphTrait;
use crate::grid::{NodeIndex, Point};
use crate::heap::{HeapSlots, IndexedMinHeap};
use crate::path::{path_cost, reconstruct_path};

/// Priority of a node that has not been reached yet
pub const UNSEEN: u32 = u32::MAX;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Dijkstra,
    GreedyBestFirst,
    AStar,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [
        Algorithm::Dijkstra,
        Algorithm::GreedyBestFirst,
        Algorithm::AStar,
    ];

    /// Short name used in output file names
    pub fn file_tag(&self) -> &'static str {
        match self {
            Algorithm::Dijkstra => "Dijkstra",
            Algorithm::GreedyBestFirst => "GreedyBest",
            Algorithm::AStar => "Astar",
        }
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Algorithm::Dijkstra => "Dijkstra",
                Algorithm::GreedyBestFirst => "Greedy Best-First",
                Algorithm::AStar => "A*",
            }
        )
    }
}

impl FromStr for Algorithm {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "dijkstra" => Ok(Algorithm::Dijkstra),
            "greedy" | "greedy_best" | "greedy_best_first" => Ok(Algorithm::GreedyBestFirst),
            "astar" | "a_star" | "a*" => Ok(Algorithm::AStar),
            _ => Err(MazeError::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Per-node bookkeeping of one search run
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SearchNode {
    /// Key in the heap: distance for Dijkstra, `end_dis` for greedy, `start_dis + end_dis` for A*
    pub priority: u32,
    /// Distance from the start, only maintained by A*
    pub start_dis: u32,
    /// Manhattan distance to the goal
    pub end_dis: u32,
    pub previous: Option<NodeIndex>,
    pub queue_pos: Option<usize>,
    /// Extracted without improving any neighbor
    pub dead_end: bool,
}

impl Default for SearchNode {
    fn default() -> Self {
        Self {
            priority: UNSEEN,
            start_dis: UNSEEN,
            end_dis: 0,
            previous: None,
            queue_pos: None,
            dead_end: false,
        }
    }
}

impl HeapSlots for [SearchNode] {
    fn priority(&self, node: NodeIndex) -> u32 {
        self[node].priority
    }

    fn queue_pos(&self, node: NodeIndex) -> Option<usize> {
        self[node].queue_pos
    }

    fn set_queue_pos(&mut self, node: NodeIndex, pos: Option<usize>) {
        self[node].queue_pos = pos;
    }
}

#[derive(Debug, PartialEq, Clone, Eq, Serialize)]
pub struct PathResult {
    pub path: Vec<NodeIndex>,
    pub start: NodeIndex,
    pub goal: NodeIndex,
    pub total_cost: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathFinderState {
    Computing,
    NoPathFound,
    PathFound(PathResult),
}

impl PathFinderState {
    pub fn is_done(&self) -> bool {
        !matches!(self, PathFinderState::Computing)
    }
}

/// A single search from `start` to `goal` that can be advanced one extraction at a time
#[derive(Debug)]
pub struct PathFinder<G: GraphTrait> {
    algorithm: Algorithm,
    start: NodeIndex,
    goal: NodeIndex,
    nodes: Vec<SearchNode>,
    heap: IndexedMinHeap,
    state: PathFinderState,
    _graph: std::marker::PhantomData<G>,
}

impl<G: GraphTrait> PathFinder<G> {
    /// Seeds the start node and queues every node of the graph
    pub fn new(algorithm: Algorithm, graph: &G, start: NodeIndex, goal: NodeIndex) -> Self {
        let n = graph.node_count();
        let target = graph.position_of(goal);

        let mut nodes: Vec<SearchNode> = (0..n)
            .map(|i| SearchNode {
                end_dis: graph.position_of(i).manhattan(&target),
                ..Default::default()
            })
            .collect();

        let seed = &mut nodes[start];
        match algorithm {
            Algorithm::Dijkstra => seed.priority = 0,
            Algorithm::GreedyBestFirst => seed.priority = seed.end_dis,
            Algorithm::AStar => {
                seed.start_dis = 0;
                seed.priority = seed.end_dis;
            }
        }

        let mut heap = IndexedMinHeap::with_capacity(n);
        for node in 0..n {
            heap.insert(node, &mut nodes[..]);
        }

        Self {
            algorithm,
            start,
            goal,
            nodes,
            heap,
            state: PathFinderState::Computing,
            _graph: std::marker::PhantomData,
        }
    }

    pub fn finish(mut self, graph: &G) -> (PathFinderState, Vec<SearchNode>) {
        loop {
            match self.step(graph) {
                PathFinderState::Computing => {}
                s => return (s, self.nodes),
            }
        }
    }

    pub fn step(&mut self, graph: &G) -> PathFinderState {
        if self.state.is_done() {
            return self.state.clone();
        }

        let Some(u) = self.heap.extract_min(&mut self.nodes[..]) else {
            self.state = PathFinderState::NoPathFound;
            return self.state.clone();
        };

        if self.nodes[u].priority == UNSEEN {
            // everything left in the heap is unreachable
            trace!(
                "{}: {} unreachable nodes left",
                self.algorithm,
                self.heap.len() + 1
            );
            self.state = PathFinderState::NoPathFound;
            return self.state.clone();
        }

        if u == self.goal {
            self.state = match self.priced_path(graph, u) {
                Some(result) => PathFinderState::PathFound(result),
                None => PathFinderState::NoPathFound,
            };
            return self.state.clone();
        }

        let mut relaxed = false;
        for (v, weight) in graph.neighbors_of(u) {
            if self.relax(u, v, weight) {
                self.nodes[v].previous = Some(u);
                self.heap.decrease_priority_notify(v, &mut self.nodes[..]);
                relaxed = true;
            }
        }
        if !relaxed {
            self.nodes[u].dead_end = true;
        }

        self.state.clone()
    }

    /// Applies the update rule of the algorithm to the edge `u -> v`, true if `v` improved
    fn relax(&mut self, u: NodeIndex, v: NodeIndex, weight: u32) -> bool {
        let from = self.nodes[u];
        let to = &mut self.nodes[v];
        match self.algorithm {
            Algorithm::Dijkstra => {
                let candidate = from.priority.saturating_add(weight);
                if to.priority > candidate {
                    to.priority = candidate;
                    return true;
                }
            }
            Algorithm::GreedyBestFirst => {
                if to.priority == UNSEEN {
                    to.priority = to.end_dis;
                    return true;
                }
            }
            Algorithm::AStar => {
                let candidate = from.start_dis.saturating_add(weight);
                if to.start_dis > candidate {
                    to.start_dis = candidate;
                    to.priority = candidate.saturating_add(to.end_dis);
                    return true;
                }
            }
        }
        false
    }

    /// The predecessor chain to `target` with its edge weights summed up
    fn priced_path(&self, graph: &G, target: NodeIndex) -> Option<PathResult> {
        let path = reconstruct_path(
            |n| self.nodes[n].previous,
            self.nodes.len(),
            self.start,
            target,
        )?;
        let Some(total_cost) = path_cost(graph, &path) else {
            warn!("{}: path {:?} uses a missing edge", self.algorithm, path);
            return None;
        };

        Some(PathResult {
            path,
            start: self.start,
            goal: self.goal,
            total_cost,
        })
    }

    pub fn state(&self) -> &PathFinderState {
        &self.state
    }

    pub fn nodes(&self) -> &[SearchNode] {
        &self.nodes
    }
}

/// Outcome of running one algorithm to completion
#[derive(Debug, Clone)]
pub struct SearchRun {
    pub algorithm: Algorithm,
    pub start: NodeIndex,
    pub goal: NodeIndex,
    pub state: PathFinderState,
    pub nodes: Vec<SearchNode>,
    pub elapsed: Duration,
}

impl SearchRun {
    pub fn run<G: GraphTrait>(
        algorithm: Algorithm,
        graph: &G,
        start: NodeIndex,
        goal: NodeIndex,
    ) -> Self {
        let timer = Instant::now();
        let (state, nodes) = PathFinder::new(algorithm, graph, start, goal).finish(graph);
        let elapsed = timer.elapsed();

        debug!(
            "{} finished in {:?}: {}",
            algorithm,
            elapsed,
            match &state {
                PathFinderState::PathFound(r) => {
                    format!("cost {} over {} nodes", r.total_cost, r.path.len())
                }
                _ => "no path".to_string(),
            }
        );

        Self {
            algorithm,
            start,
            goal,
            state,
            nodes,
            elapsed,
        }
    }

    pub fn result(&self) -> Option<&PathResult> {
        match &self.state {
            PathFinderState::PathFound(result) => Some(result),
            _ => None,
        }
    }

    pub fn path(&self) -> Option<&[NodeIndex]> {
        self.result().map(|r| r.path.as_slice())
    }

    pub fn total_cost(&self) -> Option<u32> {
        self.result().map(|r| r.total_cost)
    }

    pub fn predecessors(&self) -> Vec<Option<NodeIndex>> {
        self.nodes.iter().map(|n| n.previous).collect()
    }

    /// Nodes the search reached and then could not continue from
    pub fn dead_ends(&self) -> Vec<NodeIndex> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(i, n)| n.dead_end && *i != self.start)
            .map(|(i, _)| i)
            .collect()
    }

    /// The explored branch leading to every dead end, from the start
    pub fn dead_end_paths(&self) -> Vec<Vec<NodeIndex>> {
        self.dead_ends()
            .into_iter()
            .filter_map(|end| {
                reconstruct_path(
                    |n| self.nodes[n].previous,
                    self.nodes.len(),
                    self.start,
                    end,
                )
            })
            .collect()
    }

    pub fn report<G: GraphTrait>(&self, graph: &G) -> RunReport {
        RunReport {
            algorithm: self.algorithm,
            elapsed_seconds: self.elapsed.as_secs_f64(),
            start: graph.position_of(self.start),
            goal: graph.position_of(self.goal),
            found: self.result().is_some(),
            path: self
                .path()
                .map(|p| p.iter().map(|&n| graph.position_of(n)).collect())
                .unwrap_or_default(),
            total_cost: self.total_cost(),
            predecessors: self.predecessors(),
            dead_ends: self.dead_ends(),
        }
    }
}

/// Serializable summary of a [`SearchRun`], with positions instead of node indices where useful
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub algorithm: Algorithm,
    pub elapsed_seconds: f64,
    pub start: Point,
    pub goal: Point,
    pub found: bool,
    pub path: Vec<Point>,
    pub total_cost: Option<u32>,
    pub predecessors: Vec<Option<NodeIndex>>,
    pub dead_ends: Vec<NodeIndex>,
}
