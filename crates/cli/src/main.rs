//! Misère Nim play and comparison harness.
//!
//! Drives the move-selection engine through the `Strategy` contract:
//! `play` runs one verbose game between two strategies, `compare` plays a
//! seeded batch of games in parallel and reports win rates.

mod game;
mod history;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use nim_core::{MctsConfig, SelectionPolicy, Strategy};
use nim_mcts::MctsStrategy;
use nim_strategies::{AlphaBetaStrategy, OptimalStrategy, RandomStrategy};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::game::{NimMisere, Winner};
use crate::history::GameHistory;

/// Misère Nim: two agents remove items from stacks; whoever takes the
/// last item loses.
#[derive(Parser)]
#[command(name = "nim-cli")]
#[command(about = "Play and compare Misère Nim strategies")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyKind {
    Random,
    Optimal,
    AlphaBeta,
    Mcts,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SelectionArg {
    Ucb1,
    UcbTuned,
    Rave,
}

impl From<SelectionArg> for SelectionPolicy {
    fn from(arg: SelectionArg) -> Self {
        match arg {
            SelectionArg::Ucb1 => SelectionPolicy::Ucb1,
            SelectionArg::UcbTuned => SelectionPolicy::UcbTuned,
            SelectionArg::Rave => SelectionPolicy::Rave,
        }
    }
}

/// MCTS configuration flags, shared by both subcommands.
#[derive(Args, Clone, Copy)]
struct MctsArgs {
    /// Match search-tree nodes by stack multiset instead of exact identity.
    #[arg(long)]
    hash_states: bool,

    /// UCB1 exploration constant.
    #[arg(long, default_value = "1.0")]
    exploration: f64,

    /// RAVE blend bias constant.
    #[arg(long, default_value = "1e-6")]
    beta: f64,

    /// Child-selection formula.
    #[arg(long, value_enum, default_value = "ucb1")]
    selection: SelectionArg,
}

impl MctsArgs {
    fn to_config(self) -> MctsConfig {
        MctsConfig {
            hash_states: self.hash_states,
            exploration_constant: self.exploration,
            beta: self.beta,
            selection: self.selection.into(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Play one game, printing every move.
    Play {
        /// Initial stack sizes, e.g. --stacks 3 4 5.
        #[arg(long, num_args = 1.., required = true)]
        stacks: Vec<u32>,

        /// Strategy for the first player.
        #[arg(long, value_enum, default_value = "mcts")]
        first: StrategyKind,

        /// Strategy for the second player.
        #[arg(long, value_enum, default_value = "optimal")]
        second: StrategyKind,

        /// Search depth (alpha-beta) or iteration count (MCTS) per move.
        #[arg(long, default_value = "1000")]
        depth: u32,

        /// Wall-clock seconds per move; overrides --depth with iterative
        /// deepening.
        #[arg(long)]
        time: Option<f64>,

        /// Random seed for reproducibility.
        #[arg(long, default_value = "42")]
        seed: u64,

        #[command(flatten)]
        mcts: MctsArgs,
    },

    /// Play a batch of games in parallel and report win rates. Sides are
    /// swapped on odd game numbers to balance the first-move advantage.
    Compare {
        /// Initial stack sizes, e.g. --stacks 3 4 5.
        #[arg(long, num_args = 1.., required = true)]
        stacks: Vec<u32>,

        /// Number of games to play.
        #[arg(long, default_value = "100")]
        games: usize,

        #[arg(long, value_enum, default_value = "mcts")]
        first: StrategyKind,

        #[arg(long, value_enum, default_value = "random")]
        second: StrategyKind,

        /// Search depth (alpha-beta) or iteration count (MCTS) per move.
        #[arg(long, default_value = "1000")]
        depth: u32,

        /// Base random seed; each game offsets it.
        #[arg(long, default_value = "42")]
        seed: u64,

        #[command(flatten)]
        mcts: MctsArgs,
    },
}

fn build_strategy(kind: StrategyKind, seed: u64, mcts: MctsArgs) -> Result<Box<dyn Strategy>> {
    Ok(match kind {
        StrategyKind::Random => {
            Box::new(RandomStrategy::with_rng(ChaCha8Rng::seed_from_u64(seed)))
        }
        StrategyKind::Optimal => Box::new(OptimalStrategy),
        StrategyKind::AlphaBeta => Box::new(AlphaBetaStrategy),
        StrategyKind::Mcts => Box::new(MctsStrategy::with_rng(
            mcts.to_config(),
            ChaCha8Rng::seed_from_u64(seed),
        )?),
    })
}

fn check_stacks(stacks: &[u32]) -> Result<()> {
    if stacks.iter().all(|&s| s == 0) {
        bail!("initial stacks must contain at least one item");
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_play(
    stacks: Vec<u32>,
    first: StrategyKind,
    second: StrategyKind,
    depth: u32,
    time: Option<f64>,
    seed: u64,
    mcts: MctsArgs,
) -> Result<()> {
    check_stacks(&stacks)?;
    println!("{:?} vs {:?} from {:?}", first, second, stacks);

    let game = NimMisere::new(
        stacks,
        build_strategy(first, seed, mcts)?,
        build_strategy(second, seed.wrapping_add(1), mcts)?,
    );
    let mut history = GameHistory::new(game);

    loop {
        let on_turn = if history.moves().len() % 2 == 0 {
            first
        } else {
            second
        };
        let mv = match time {
            Some(seconds) => history.step_timed(seconds)?,
            None => history.step(depth)?,
        };
        let Some(mv) = mv else { break };
        println!(
            "{:>2}. {:?} takes {} from stack {}  ->  {:?}",
            history.moves().len(),
            on_turn,
            mv.items_to_remove,
            mv.stack_index,
            history.stacks()
        );
        if history.result().is_some() {
            break;
        }
    }

    let winner = history
        .result()
        .context("game loop exited without a result")?;
    let (kind, label) = match winner {
        Winner::First => (first, "first"),
        Winner::Second => (second, "second"),
    };
    println!(
        "{} player ({:?}) wins after {} moves",
        label,
        kind,
        history.moves().len()
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_compare(
    stacks: Vec<u32>,
    games: usize,
    first: StrategyKind,
    second: StrategyKind,
    depth: u32,
    seed: u64,
    mcts: MctsArgs,
) -> Result<()> {
    check_stacks(&stacks)?;

    let results: Vec<Winner> = (0..games)
        .into_par_iter()
        .map(|g| -> Result<Winner> {
            let swapped = g % 2 == 1;
            let (a, b) = if swapped {
                (second, first)
            } else {
                (first, second)
            };
            let game_seed = seed.wrapping_add(g as u64);
            let mut game = NimMisere::new(
                stacks.clone(),
                build_strategy(a, game_seed, mcts)?,
                build_strategy(b, game_seed.wrapping_add(0x9e3779b9), mcts)?,
            );
            while game.result().is_none() {
                game.step(depth)?;
            }
            let winner = game
                .result()
                .context("finished game without a result")?;
            // Report relative to the un-swapped pairing.
            Ok(if swapped { winner.other() } else { winner })
        })
        .collect::<Result<Vec<_>>>()?;

    let first_wins = results.iter().filter(|&&w| w == Winner::First).count();
    let second_wins = results.len() - first_wins;
    println!(
        "{:?}: {}/{} ({:.1}%)   {:?}: {}/{} ({:.1}%)",
        first,
        first_wins,
        results.len(),
        100.0 * first_wins as f64 / results.len() as f64,
        second,
        second_wins,
        results.len(),
        100.0 * second_wins as f64 / results.len() as f64,
    );
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Play {
            stacks,
            first,
            second,
            depth,
            time,
            seed,
            mcts,
        } => run_play(stacks, first, second, depth, time, seed, mcts),
        Commands::Compare {
            stacks,
            games,
            first,
            second,
            depth,
            seed,
            mcts,
        } => run_compare(stacks, games, first, second, depth, seed, mcts),
    }
}
