//! Command-line arguments and the optional TOML run file.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use serde::Deserialize;
use snake_pilot_system_strategy::{SearchConfig, Strategy};

const DEFAULT_TICKS: u64 = 500;
const DEFAULT_SEED: u64 = 0x5eed_5a4e;

/// Drive a snake around a level with an autonomous strategy.
#[derive(Debug, Parser)]
#[command(name = "snake-pilot", version)]
pub(crate) struct Cli {
    /// ASCII level file; the built-in arena is used when omitted
    #[arg(long, value_name = "PATH")]
    level: Option<PathBuf>,

    /// TOML run file supplying defaults for the options below
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Strategy that picks each move
    #[arg(long, value_enum)]
    strategy: Option<StrategyKind>,

    /// Reject moves that would split the free space in two
    #[arg(long)]
    avoid_separating_spaces: bool,

    /// Expand roomier moves first among equally ranked ones
    #[arg(long)]
    prefer_more_paths: bool,

    /// Maximum number of ticks to simulate
    #[arg(long)]
    ticks: Option<u64>,

    /// Seed for apple placement
    #[arg(long)]
    seed: Option<u64>,

    /// Print the board after every tick
    #[arg(long)]
    render: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Number of `-v` flags supplied.
    pub(crate) const fn verbosity(&self) -> u8 {
        self.verbose
    }
}

/// Strategies selectable from the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum StrategyKind {
    /// Step toward the apple without look-ahead.
    Greedy,
    /// Plan whole-body paths.
    #[default]
    Search,
}

/// Contents of a TOML run file. Every field is optional.
#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RunFile {
    level: Option<PathBuf>,
    strategy: Option<StrategyKind>,
    search: SearchConfig,
    ticks: Option<u64>,
    seed: Option<u64>,
    render: bool,
}

impl RunFile {
    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse run file toml contents")
    }
}

/// Fully resolved run settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RunConfig {
    level: Option<PathBuf>,
    strategy: StrategyKind,
    search: SearchConfig,
    ticks: u64,
    seed: u64,
    render: bool,
}

impl RunConfig {
    /// Reads the run file named by `--config`, if any, and merges the
    /// command line over it.
    pub(crate) fn load(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => {
                let contents = fs::read_to_string(path)
                    .with_context(|| format!("failed to read run file {}", path.display()))?;
                RunFile::parse(&contents)
                    .with_context(|| format!("invalid run file {}", path.display()))?
            }
            None => RunFile::default(),
        };
        Ok(Self::resolve(cli, file))
    }

    /// Explicit command-line values win; switches can only be turned on.
    fn resolve(cli: &Cli, file: RunFile) -> Self {
        Self {
            level: cli.level.clone().or(file.level),
            strategy: cli.strategy.or(file.strategy).unwrap_or_default(),
            search: SearchConfig::new(
                cli.avoid_separating_spaces || file.search.avoid_separating_spaces,
                cli.prefer_more_paths || file.search.prefer_more_paths,
            ),
            ticks: cli.ticks.or(file.ticks).unwrap_or(DEFAULT_TICKS),
            seed: cli.seed.or(file.seed).unwrap_or(DEFAULT_SEED),
            render: cli.render || file.render,
        }
    }

    pub(crate) fn level(&self) -> Option<&Path> {
        self.level.as_deref()
    }

    pub(crate) const fn ticks(&self) -> u64 {
        self.ticks
    }

    pub(crate) const fn seed(&self) -> u64 {
        self.seed
    }

    pub(crate) const fn render(&self) -> bool {
        self.render
    }

    /// Builds the configured strategy.
    pub(crate) fn strategy(&self) -> Strategy {
        match self.strategy {
            StrategyKind::Greedy => Strategy::greedy(),
            StrategyKind::Search => Strategy::search_based(self.search),
        }
    }
}
