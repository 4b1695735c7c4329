//! Command-line solver for hexagonal regular-expression crosswords.
//!
//! Reads a puzzle file, prints every solution as a hexagonal dump followed by
//! its rows, and reports solver statistics.
//!
//! # Usage
//!
//! Solve the built-in reference puzzle:
//!
//! ```sh
//! cargo run --bin hexword
//! ```
//!
//! Solve a puzzle file and compare the result with its `answer`:
//!
//! ```sh
//! cargo run --bin hexword -- puzzles/regex-crossword.json --check
//! ```
//!
//! Explore branches in parallel and stop after two solutions:
//!
//! ```sh
//! cargo run --bin hexword -- my-puzzle.json --parallel --max-solutions 2
//! ```
//!
//! Set `RUST_LOG=debug` to trace branching decisions.
//!
//! # Exit status
//!
//! - `0`: solved (and, with `--check`, the answer matched)
//! - `1`: with `--check`, the solutions differ from the answer
//! - `2`: the puzzle could not be loaded

use std::{fs, io, path::PathBuf, process, sync::Arc};

use clap::{Parser, ValueEnum};
use hexword_core::CandidateGrid;
use hexword_solver::{BacktrackSolver, BranchPolicy, Puzzle, PuzzleDef, PuzzleError, SolverStats};

const BUILTIN_PUZZLE: &str = include_str!("../../../puzzles/regex-crossword.json");

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BranchKind {
    /// First undetermined cell in row-major order.
    First,
    /// Undetermined cell with the fewest candidates.
    Fewest,
}

impl From<BranchKind> for BranchPolicy {
    fn from(kind: BranchKind) -> Self {
        match kind {
            BranchKind::First => Self::FirstUndetermined,
            BranchKind::Fewest => Self::FewestCandidates,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Puzzle file (JSON). The built-in reference puzzle is used when omitted.
    #[arg(value_name = "PUZZLE")]
    puzzle: Option<PathBuf>,

    /// Explore search branches in parallel.
    #[arg(long)]
    parallel: bool,

    /// Cell to branch on when propagation stalls.
    #[arg(long, value_name = "POLICY", default_value = "fewest")]
    branch: BranchKind,

    /// Stop after this many solutions.
    #[arg(long, value_name = "COUNT")]
    max_solutions: Option<usize>,

    /// Compare the solutions with the puzzle's answer.
    #[arg(long)]
    check: bool,
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
enum LoadError {
    #[display("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[display("invalid puzzle file: {_0}")]
    Parse(#[from] serde_json::Error),
    #[display("{_0}")]
    Puzzle(#[from] PuzzleError),
    #[display("--check needs a puzzle with an answer")]
    MissingAnswer,
}

struct Loaded {
    puzzle: Arc<Puzzle>,
    answer: Option<CandidateGrid>,
}

/// Solutions to print, statistics, and the answer comparison if one was requested.
struct Report {
    solutions: Vec<CandidateGrid>,
    stats: SolverStats,
    answer_matched: Option<bool>,
}

impl Report {
    fn exit_code(&self) -> i32 {
        match self.answer_matched {
            Some(false) => 1,
            _ => 0,
        }
    }
}

fn main() {
    better_panic::install();
    env_logger::init();

    let args = Args::parse();
    let loaded = match load(&args) {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(2);
        }
    };

    let report = solve(&args, &loaded);
    if report.solutions.is_empty() {
        println!("No solutions.");
        println!();
    }
    for (i, grid) in report.solutions.iter().enumerate() {
        print_solution(i + 1, grid);
    }
    print_stats(&report.stats);

    if let (Some(matched), Some(answer)) = (report.answer_matched, &loaded.answer) {
        println!();
        if matched {
            println!("Answer: matched");
        } else {
            println!("Answer: MISMATCH");
            println!("Expected:");
            print_rows(answer);
        }
    }
    if report.exit_code() != 0 {
        process::exit(report.exit_code());
    }
}

fn load(args: &Args) -> Result<Loaded, LoadError> {
    let def: PuzzleDef = match &args.puzzle {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|source| LoadError::Read {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&text)?
        }
        None => serde_json::from_str(BUILTIN_PUZZLE)?,
    };
    load_def(&def, args.check)
}

fn load_def(def: &PuzzleDef, check: bool) -> Result<Loaded, LoadError> {
    let puzzle = Puzzle::from_def(def)?;
    let answer = if check {
        Some(def.answer_grid(&puzzle)?.ok_or(LoadError::MissingAnswer)?)
    } else {
        None
    };
    Ok(Loaded {
        puzzle: Arc::new(puzzle),
        answer,
    })
}

/// Solves the loaded puzzle, keeping at most `--max-solutions` grids for output.
///
/// The answer comparison needs to know whether the solution is unique, so with
/// `--check` at least two solutions are searched for regardless of the limit.
fn solve(args: &Args, loaded: &Loaded) -> Report {
    let puzzle = &loaded.puzzle;
    let solver = BacktrackSolver::new().with_branch_policy(args.branch.into());
    log::info!(
        "solving a {}-row puzzle with {} cells, policy={:?}, parallel={}",
        puzzle.size(),
        puzzle.geometry().cell_count(),
        solver.branch_policy(),
        args.parallel
    );

    let limit = args.max_solutions.unwrap_or(usize::MAX);
    let fetch = if loaded.answer.is_some() {
        limit.max(2)
    } else {
        limit
    };
    let (mut solutions, stats) = if args.parallel {
        solver.solve_parallel(puzzle)
    } else {
        let mut iter = solver.solutions(puzzle);
        let grids = iter.by_ref().take(fetch).collect::<Vec<_>>();
        (grids, iter.stats().clone())
    };

    let answer_matched = loaded.answer.as_ref().map(|answer| {
        matches!(solutions.as_slice(), [only] if only.cells() == answer.cells())
    });
    solutions.truncate(limit);
    Report {
        solutions,
        stats,
        answer_matched,
    }
}

fn print_solution(number: usize, grid: &CandidateGrid) {
    println!("Solution {number}:");
    print!("{grid}");
    println!();
    print_rows(grid);
    println!();
}

fn print_rows(grid: &CandidateGrid) {
    for row in grid.to_rows().unwrap_or_default() {
        println!("  {row}");
    }
}

fn print_stats(stats: &SolverStats) {
    println!("Stats:");
    println!("  propagations: {}", stats.propagations());
    println!("  line evaluations: {}", stats.line_evaluations());
    println!("  narrowed cells: {}", stats.narrowed_cells());
    println!("  branches: {}", stats.branches());
    println!("  dead ends: {}", stats.dead_ends());
    println!("  solutions: {}", stats.solutions());
}
