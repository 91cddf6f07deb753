use std::{
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError};
use parking_lot::Mutex;

use crate::prelude::*;

mod episode;

use episode::Episode;
pub use episode::{BestMove, EpisodeStatus, Limits, SearchEvent};

/// How many undrained events are kept before new ones are dropped.
const EVENT_CAPACITY: usize = 64;

/// Runs searches in the background and keeps the position they explore in sync with the game.
///
/// Every episode is tagged with a generation. Whenever the tracked position changes the generation
/// moves on, so a worker that is still unwinding from a superseded episode can no longer touch the
/// best movement.
pub struct Engine
{
    options:    EngineOptions,
    evaluator:  Arc<BasicEvaluator>,
    cache:      Arc<TranspositionCache>,
    hasher:     Arc<ZobristTable>,
    player:     Player,
    state:      GameState,
    generation: u64,
    best:       Arc<Mutex<BestMove>>,
    current:    Option<Episode>,
    retired:    Vec<Episode>,
    events:     (Sender<SearchEvent>, Receiver<SearchEvent>),
}

impl Engine
{
    /// Opens the evaluation cache and sets up a fresh game for the configured side.
    pub fn new(options: EngineOptions) -> Engine
    {
        let (cache, hasher) = if options.no_cache
        {
            (TranspositionCache::disabled(), Arc::new(ZobristTable::new(options.seed)))
        }
        else
        {
            TranspositionCache::open(&options.cache_dir, table::VERSION, options.cache_capacity, options.seed)
        };

        let player = if options.second { Player::Black } else { Player::White };
        log::info!("Engine plays {} with a {:?} budget.", player, options.budget());

        Engine {
            evaluator: Arc::new(BasicEvaluator),
            cache: Arc::new(cache),
            state: GameState::new(GameOptions::default(), hasher.clone()),
            hasher,
            player,
            generation: 0,
            best: Arc::new(Mutex::new(BestMove::new(0))),
            current: None,
            retired: Vec::new(),
            events: crossbeam_channel::bounded(EVENT_CAPACITY),
            options,
        }
    }

    /// Applies an opponent's (or our own) movement, starting a new episode when it becomes our turn.
    ///
    /// Illegal movements are rejected and leave both the position and any running episode alone.
    pub fn apply(&mut self, movement: Movement) -> Result<()>
    {
        if self.state.status().is_over()
        {
            return Err(Error::new(
                Kind::InvalidMove,
                format!("Cannot play '{}', the game is over ({}).", movement, self.state.status()),
            ));
        }

        self.state.apply(&movement)?;
        log::debug!("Applied {} (now ply {}).", movement, self.state.ply());

        if self.is_our_turn()
        {
            self.start(Limits::from_options(&self.options))
        }
        else
        {
            self.supersede();
            Ok(())
        }
    }

    /// Starts exploring a position in the background, superseding any running episode.
    pub fn begin(&mut self, state: GameState) -> Result<()>
    {
        self.state = if Arc::ptr_eq(state.hasher(), &self.hasher)
        {
            state
        }
        else
        {
            GameState::from_snapshot(&GameSnapshot::from(&state), self.hasher.clone())?
        };

        self.start(Limits::from_options(&self.options))
    }

    /// The movement held for the current generation, if any depth has completed.
    pub fn best_move(&self) -> Option<Movement>
    {
        self.best.lock().movement()
    }

    pub fn cache(&self) -> &TranspositionCache
    {
        &self.cache
    }

    /// Hands out a receiver of completed depths and finished episodes.
    ///
    /// The channel is bounded; events are dropped while nobody drains it.
    pub fn events(&self) -> Receiver<SearchEvent>
    {
        self.events.1.clone()
    }

    /// Searches the current position under explicit limits, then plays the result.
    ///
    /// Limits without a budget still stop at the configured time.
    pub fn explore(&mut self, limits: Limits) -> Result<Movement>
    {
        let budget = limits.budget.unwrap_or_else(|| self.options.budget());
        let deadline = Instant::now() + budget;
        self.start(Limits {
            budget: Some(budget),
            ..limits
        })?;
        self.wait(deadline);
        self.commit()
    }

    pub fn generation(&self) -> u64
    {
        self.generation
    }

    pub fn hasher(&self) -> &Arc<ZobristTable>
    {
        &self.hasher
    }

    /// Resets to a new game in which the engine plays the given side.
    pub fn new_game(&mut self, player: Player, options: GameOptions) -> Result<()>
    {
        log::info!("New game as {}.", player);
        self.player = player;
        self.state = GameState::new(options, self.hasher.clone());

        if self.is_our_turn()
        {
            self.start(Limits::from_options(&self.options))
        }
        else
        {
            self.supersede();
            Ok(())
        }
    }

    /// Waits for the running episode until the deadline, then plays the best movement known.
    ///
    /// Without a running episode this returns at once, falling back to the most promising legal
    /// movement when nothing has been explored.
    pub fn play(&mut self, deadline: Instant) -> Result<Movement>
    {
        self.wait(deadline);
        self.commit()
    }

    pub fn play_for(&mut self, duration: Duration) -> Result<Movement>
    {
        self.play(Instant::now() + duration)
    }

    pub fn player(&self) -> Player
    {
        self.player
    }

    /// Changes the budget of episodes started from now on.
    pub fn set_time(&mut self, seconds: f64)
    {
        self.options.time = seconds;
    }

    pub fn options(&self) -> &EngineOptions
    {
        &self.options
    }

    pub fn state(&self) -> &GameState
    {
        &self.state
    }

    pub fn status(&self) -> EpisodeStatus
    {
        self.best.lock().status
    }
}

impl Engine
{
    /// Picks the movement to play now and advances the position with it.
    fn commit(&mut self) -> Result<Movement>
    {
        let status = self.state.status();
        if status.is_over()
        {
            return Err(Error::new(Kind::InvalidState, format!("There is nothing to play, the game is over ({}).", status)));
        }

        let movement = match self.best_move()
        {
            | Some(movement) => movement,
            | None => self.fallback()?,
        };

        self.apply(movement)?;
        Ok(movement)
    }

    /// The legal movement the evaluator likes best at a glance.
    fn fallback(&self) -> Result<Movement>
    {
        let mut moves = self.state.legal_moves();
        moves.sort_by_cached_key(|mv| -self.evaluator.evaluate_move(&self.state, mv));

        log::debug!("Nothing explored yet, falling back to a heuristic choice.");
        moves
            .first()
            .copied()
            .ok_or_else(|| Error::new(Kind::InternalError, "No legal movement, not even a pass.".into()))
    }

    fn is_our_turn(&self) -> bool
    {
        self.state.current_player() == self.player && !self.state.status().is_over()
    }

    /// Spawns a worker for a new generation on the current position.
    fn start(&mut self, limits: Limits) -> Result<()>
    {
        self.supersede();

        if self.state.status().is_over()
        {
            log::debug!("Not exploring a finished game.");
            return Ok(());
        }

        let generation = self.generation;
        let support = GameStateSupport::new(self.player, &self.state)?;
        let token = CancellationToken::new();
        let (done, finished) = crossbeam_channel::bounded(1);

        let mut state = self.state.clone();
        let evaluator = self.evaluator.clone();
        let cache = self.cache.clone();
        let best = self.best.clone();
        let events = self.events.0.clone();
        let worker_token = token.clone();

        self.best.lock().status = EpisodeStatus::Running;
        log::info!("Exploring ply {} as generation {} with {:?}.", state.ply(), generation, limits);

        let spawned = thread::Builder::new().name(format!("search-{}", generation)).spawn(move || {
            let context = SearchContext::new(limits.budget, worker_token);
            let search = AlphaBeta::new(&context, &*evaluator, &*cache, support);

            let found = search.iterate(&mut state, limits.max_depth, |report| {
                if best.lock().offer(generation, report)
                {
                    notify(&events, SearchEvent::DepthCompleted {
                        generation,
                        report: report.clone(),
                    });
                }
            });

            let status = if context.check().is_err() { EpisodeStatus::Cancelled } else { EpisodeStatus::Completed };
            if best.lock().finish(generation, status)
            {
                notify(&events, SearchEvent::Finished {
                    generation,
                    status,
                    best: found.as_ref().map(|report| report.movement),
                });
            }
            log::debug!("Generation {} ended {:?} after {} leaves.", generation, status, context.evaluated());

            let _ = done.send(());
            if let Err(err) = cache.flush()
            {
                log::warn!("{}", err);
            }
        });

        match spawned
        {
            | Ok(handle) =>
            {
                self.current = Some(Episode {
                    generation,
                    token,
                    done: finished,
                    handle,
                });
                Ok(())
            }
            | Err(err) =>
            {
                self.best.lock().status = EpisodeStatus::Idle;
                let base = Error::new(Kind::InternalError, "Could not spawn a search worker.".into());
                Err(Error::from(err).chain(base))
            }
        }
    }

    /// Cancels the running episode and moves on to a new generation.
    fn supersede(&mut self)
    {
        if let Some(episode) = self.current.take()
        {
            episode.cancel();
            self.retired.push(episode);
        }

        let (finished, running): (Vec<Episode>, Vec<Episode>) = self.retired.drain(..).partition(Episode::is_finished);
        finished.into_iter().for_each(Episode::join);
        self.retired = running;

        self.generation += 1;
        *self.best.lock() = BestMove::new(self.generation);
    }

    /// Blocks until the running episode ends or the deadline passes, cancelling it in the latter case.
    fn wait(&mut self, deadline: Instant)
    {
        let Some(episode) = self.current.as_ref()
        else
        {
            return;
        };

        if let Err(RecvTimeoutError::Timeout) = episode.done.recv_deadline(deadline)
        {
            log::debug!("Deadline reached, cancelling generation {}.", episode.generation);
            episode.cancel();
            self.best.lock().finish(episode.generation, EpisodeStatus::Cancelled);
        }
    }
}

impl Drop for Engine
{
    fn drop(&mut self)
    {
        if let Some(episode) = self.current.take()
        {
            self.retired.push(episode);
        }

        for episode in self.retired.drain(..)
        {
            episode.cancel();
            episode.join();
        }

        if let Err(err) = self.cache.flush()
        {
            log::warn!("{}", err);
        }
    }
}

/// Sends an event without ever blocking a worker.
fn notify(events: &Sender<SearchEvent>, event: SearchEvent)
{
    if let Err(TrySendError::Full(_)) = events.try_send(event)
    {
        log::trace!("Event queue is full, dropping an event.");
    }
}
