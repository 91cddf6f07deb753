use std::{path::PathBuf, time::Duration};

use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// The options applied to a game of hive.
pub struct GameOptions
{
    /// Tournament games forbid placing the queen on a player's first turn.
    pub tournament: bool,

    /// The expansions enabled on this game.
    pub expansions: ExpansionOptions,
}

impl Default for GameOptions
{
    fn default() -> Self
    {
        GameOptions::all()
    }
}

impl GameOptions
{
    /// Returns a fully-featured set of options, including all bugs and tournament settings.
    pub fn all() -> Self
    {
        GameOptions {
            tournament: true,
            expansions: ExpansionOptions::all(),
        }
    }

    /// The base game with no expansion bugs.
    pub fn base() -> Self
    {
        GameOptions {
            tournament: true,
            expansions: ExpansionOptions::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
/// The expansion bugs enabled on this game.
pub struct ExpansionOptions
{
    pub ladybug:  bool,
    pub mosquito: bool,
    pub pillbug:  bool,
}

impl ExpansionOptions
{
    /// Sets each expansion bug to be in-play.
    pub fn all() -> Self
    {
        ExpansionOptions {
            ladybug:  true,
            mosquito: true,
            pillbug:  true,
        }
    }
}

#[derive(Clone, Parser, Debug)]
#[command(version, about = "An AI that explores games of Hive.", long_about = None)]
pub struct EngineOptions
{
    #[arg(long, default_value_t = 10.0)]
    /// maximum number of seconds to explore a position
    pub time: f64,

    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=64))]
    /// maximum number of plies to deepen to (unbounded when omitted)
    pub max_depth: Option<u8>,

    #[arg(long, default_value = ".hivemind")]
    /// directory for the evaluation cache and hash tables
    pub cache_dir: PathBuf,

    #[arg(long, default_value_t = false)]
    /// bypass the evaluation cache entirely
    pub no_cache: bool,

    #[arg(long, default_value_t = 4_000_000)]
    /// maximum number of cached evaluations
    pub cache_capacity: usize,

    #[arg(long, default_value_t = false)]
    /// play as black instead of white
    pub second: bool,

    #[arg(long)]
    /// seed for the hash tables when none are persisted
    pub seed: Option<u64>,

    #[arg(short, long, default_value = "info")]
    /// lowest log level to show
    pub log_level: String,
}

impl Default for EngineOptions
{
    fn default() -> Self
    {
        EngineOptions {
            time:           10.0,
            max_depth:      None,
            cache_dir:      PathBuf::from(".hivemind"),
            no_cache:       false,
            cache_capacity: 4_000_000,
            second:         false,
            seed:           None,
            log_level:      "info".into(),
        }
    }
}

impl EngineOptions
{
    /// The exploration budget as a duration; nonsense values fall back to zero.
    pub fn budget(&self) -> Duration
    {
        Duration::try_from_secs_f64(self.time).unwrap_or(Duration::ZERO)
    }
}
