pub mod agent;
pub mod cli;
pub mod engine;
pub mod error;
pub mod hive;
pub mod options;

#[allow(unused)]
pub mod prelude
{
    pub use std::str::FromStr;

    pub use log::{self};

    pub use crate::{
        agent::*,
        cli::CommandLine,
        engine::{Engine, EpisodeStatus, Limits, SearchEvent},
        error::{Error, Kind, Result},
        hive::*,
        options::*,
    };
}
