use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mazegraph::{
    util::parse_ascii, Algorithm, Geometry, Maze, MazeGraph, PathFinderState, SearchRun,
    SolverConfig,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Perfect maze carved by a depth-first walk, entrance top left and exit bottom right
fn generate_maze(n: usize, seed: u64) -> String {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut right = vec![vec![true; n]; n];
    let mut down = vec![vec![true; n]; n];
    let mut seen = vec![vec![false; n]; n];
    let mut stack = vec![(0usize, 0usize)];
    seen[0][0] = true;

    while let Some(&(r, c)) = stack.last() {
        let mut options = Vec::with_capacity(4);
        if r > 0 && !seen[r - 1][c] {
            options.push((r - 1, c));
        }
        if r + 1 < n && !seen[r + 1][c] {
            options.push((r + 1, c));
        }
        if c > 0 && !seen[r][c - 1] {
            options.push((r, c - 1));
        }
        if c + 1 < n && !seen[r][c + 1] {
            options.push((r, c + 1));
        }
        if options.is_empty() {
            stack.pop();
            continue;
        }

        let (nr, nc) = options[rng.gen_range(0..options.len())];
        match (nr.cmp(&r), nc.cmp(&c)) {
            (std::cmp::Ordering::Greater, _) => down[r][c] = false,
            (std::cmp::Ordering::Less, _) => down[nr][nc] = false,
            (_, std::cmp::Ordering::Greater) => right[r][c] = false,
            _ => right[nr][nc] = false,
        }
        seen[nr][nc] = true;
        stack.push((nr, nc));
    }
    down[n - 1][n - 1] = false;

    let mut text = String::from("+");
    for c in 0..n {
        text.push_str(if c == 0 { "  +" } else { "--+" });
    }
    text.push('\n');
    for r in 0..n {
        text.push('|');
        for c in 0..n {
            text.push_str(if right[r][c] { "  |" } else { "   " });
        }
        text.push_str("\n+");
        for c in 0..n {
            text.push_str(if down[r][c] { "--+" } else { "  +" });
        }
        text.push('\n');
    }
    text
}

const SEED: u64 = 0x2545_f491_4f6c_dd1d;

fn load_maze(n: usize) -> Maze {
    let config = SolverConfig::default();
    let drawing = parse_ascii(&generate_maze(n, SEED), &Geometry::default()).unwrap();
    Maze::from_drawing(drawing, &config).unwrap()
}

fn bench_build(c: &mut Criterion, n: usize) {
    let config = SolverConfig::default();
    let drawing = parse_ascii(&generate_maze(n, SEED), &Geometry::default()).unwrap();

    c.bench_function(&format!("build_{}x{}", n, n), |b| {
        b.iter(|| {
            let maze = Maze::from_drawing(black_box(drawing.clone()), &config).unwrap();
            black_box(maze.graph.edge_count())
        })
    });
}

fn bench_solve(c: &mut Criterion, n: usize) {
    let maze = load_maze(n);
    let graph: &MazeGraph = &maze.graph;

    for algorithm in Algorithm::ALL {
        c.bench_function(&format!("{}_{}x{}", algorithm.file_tag(), n, n), |b| {
            b.iter(|| {
                let run = SearchRun::run(
                    algorithm,
                    black_box(graph),
                    black_box(maze.start),
                    black_box(maze.end),
                );
                assert!(matches!(run.state, PathFinderState::PathFound(_)));
            })
        });
    }
}

pub fn maze_small(c: &mut Criterion) {
    bench_build(c, 16);
    bench_solve(c, 16);
}

pub fn maze_medium(c: &mut Criterion) {
    bench_build(c, 32);
    bench_solve(c, 32);
}

pub fn maze_large(c: &mut Criterion) {
    bench_solve(c, 64);
}

criterion_group!(benches, maze_small, maze_medium, maze_large);
criterion_main!(benches);
