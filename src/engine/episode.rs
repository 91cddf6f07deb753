use std::{thread::JoinHandle, time::Duration};

use crossbeam_channel::Receiver;

use crate::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Where the latest search episode is in its lifecycle.
pub enum EpisodeStatus
{
    Idle,
    Running,
    /// The episode searched as deep as it was allowed to.
    Completed,
    /// The episode hit its deadline or was superseded.
    Cancelled,
}

#[derive(Clone, Debug)]
/// Something a search worker wants the outside world to know.
pub enum SearchEvent
{
    DepthCompleted
    {
        generation: u64,
        report:     Report<Movement>,
    },
    Finished
    {
        generation: u64,
        status:     EpisodeStatus,
        best:       Option<Movement>,
    },
}

#[derive(Clone, Debug)]
/// The best movement known for the current generation.
///
/// Workers only write through [`BestMove::offer`] and [`BestMove::finish`], which ignore any
/// generation other than the current one.
pub struct BestMove
{
    pub generation: u64,
    pub report:     Option<Report<Movement>>,
    pub status:     EpisodeStatus,
}

impl BestMove
{
    pub fn new(generation: u64) -> BestMove
    {
        BestMove {
            generation,
            report: None,
            status: EpisodeStatus::Idle,
        }
    }

    /// The best movement found so far, if any depth has completed.
    pub fn movement(&self) -> Option<Movement>
    {
        self.report.as_ref().map(|report| report.movement)
    }

    /// Adopts a completed depth from a worker. Stale generations are discarded.
    pub fn offer(&mut self, generation: u64, report: &Report<Movement>) -> bool
    {
        if generation != self.generation
        {
            log::trace!("Discarding depth {} from stale generation {}.", report.depth, generation);
            return false;
        }

        self.report = Some(report.clone());
        true
    }

    /// Records how an episode ended. Stale generations are discarded.
    pub fn finish(&mut self, generation: u64, status: EpisodeStatus) -> bool
    {
        if generation != self.generation || self.status != EpisodeStatus::Running
        {
            return false;
        }

        self.status = status;
        true
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Bounds on a single episode.
pub struct Limits
{
    pub budget:    Option<Duration>,
    pub max_depth: Option<u8>,
}

impl Limits
{
    pub fn from_options(options: &EngineOptions) -> Limits
    {
        Limits {
            budget:    Some(options.budget()),
            max_depth: options.max_depth,
        }
    }
}

impl From<SearchArgs> for Limits
{
    fn from(args: SearchArgs) -> Self
    {
        Limits {
            budget:    args.time(),
            max_depth: args.depth(),
        }
    }
}

/// A worker thread searching on behalf of one generation.
pub(super) struct Episode
{
    pub generation: u64,
    pub token:      CancellationToken,
    pub done:       Receiver<()>,
    pub handle:     JoinHandle<()>,
}

impl Episode
{
    /// Asks the worker to stop at its next leaf.
    pub fn cancel(&self)
    {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool
    {
        self.handle.is_finished()
    }

    /// Waits for the worker thread to exit.
    pub fn join(self)
    {
        if self.handle.join().is_err()
        {
            log::error!("Search worker for generation {} panicked.", self.generation);
        }
    }
}
