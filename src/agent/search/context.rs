use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use crate::prelude::*;

/// How often the evaluated-leaf counter is logged.
const LOG_INTERVAL: u64 = 10_000;

#[derive(Clone, Debug, Default)]
/// A shared flag asking a search to stop at its next leaf.
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken
{
    pub fn new() -> CancellationToken
    {
        CancellationToken::default()
    }

    pub fn cancel(&self)
    {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool
    {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
/// State owned by one search episode.
///
/// Cancellation and the deadline are only polled at leaves, so a search stops within one leaf
/// evaluation of either being triggered.
pub struct SearchContext
{
    pub started:  Instant,
    pub deadline: Option<Instant>,
    pub token:    CancellationToken,
    evaluated:    AtomicU64,
}

impl SearchContext
{
    /// A context that runs until cancelled or until the optional budget elapses.
    pub fn new(budget: Option<Duration>, token: CancellationToken) -> SearchContext
    {
        let started = Instant::now();
        SearchContext {
            started,
            deadline: budget.map(|budget| started + budget),
            token,
            evaluated: AtomicU64::new(0),
        }
    }

    /// Fails with the reason the search has to stop, if any.
    pub fn check(&self) -> Result<()>
    {
        if self.token.is_cancelled()
        {
            Err(Error::empty(Kind::SearchCancelled))
        }
        else if self.deadline.map(|deadline| Instant::now() >= deadline).unwrap_or(false)
        {
            Err(Error::empty(Kind::OutOfTime))
        }
        else
        {
            Ok(())
        }
    }

    /// Counts one evaluated leaf.
    pub fn count(&self)
    {
        let evaluated = self.evaluated.fetch_add(1, Ordering::Relaxed) + 1;
        if evaluated % LOG_INTERVAL == 0
        {
            log::debug!("Evaluated {} leaves in {:?}.", evaluated, self.started.elapsed());
        }
    }

    /// The number of leaves evaluated so far.
    pub fn evaluated(&self) -> u64
    {
        self.evaluated.load(Ordering::Relaxed)
    }
}
