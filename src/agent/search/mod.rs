use std::marker::PhantomData;

use crate::prelude::*;

mod context;

pub use context::{CancellationToken, SearchContext};

#[derive(Clone, Debug)]
/// The outcome of one fully searched depth.
pub struct Report<M>
{
    pub depth:     u8,
    pub movement:  M,
    /// The score of the best movement on the evaluator's scale.
    pub score:     i32,
    pub variation: Variation<M>,
    /// Leaves evaluated since the episode began.
    pub evaluated: u64,
}

/// Negamax search with alpha-beta pruning, driven by an iterative deepening loop.
pub struct AlphaBeta<'a, G, E>
where
    G: Game,
    E: Evaluator<G>,
{
    context:   &'a SearchContext,
    evaluator: &'a E,
    cache:     &'a TranspositionCache,
    support:   GameStateSupport,
    _game:     PhantomData<fn(&G)>,
}

impl<'a, G, E> AlphaBeta<'a, G, E>
where
    G: Game,
    E: Evaluator<G>,
{
    pub fn new(context: &'a SearchContext, evaluator: &'a E, cache: &'a TranspositionCache, support: GameStateSupport) -> Self
    {
        AlphaBeta {
            context,
            evaluator,
            cache,
            support,
            _game: PhantomData,
        }
    }

    /// Deepens one ply at a time until the depth limit, reporting every completed depth.
    ///
    /// An interrupted depth is thrown away, so the result is always that of the last complete depth.
    pub fn iterate<F>(&self, state: &mut G, max_depth: Option<u8>, mut on_report: F) -> Option<Report<G::Move>>
    where
        F: FnMut(&Report<G::Move>),
    {
        let limit = max_depth.map(|d| d as usize).unwrap_or(scalars::MAXIMUM_PLY).min(scalars::MAXIMUM_PLY) as u8;
        let mut best: Option<Report<G::Move>> = None;

        for depth in 1 ..= limit
        {
            let first = best.as_ref().map(|report| report.movement);
            match self.search(state, depth, first)
            {
                | Ok(Some(report)) =>
                {
                    log::debug!(
                        "Depth {} complete: {} scores {} after {} leaves.",
                        report.depth,
                        report.movement,
                        report.score,
                        report.evaluated
                    );
                    on_report(&report);
                    best = Some(report);
                }
                | Ok(None) =>
                {
                    log::debug!("No movement to search.");
                    break;
                }
                | Err(err) if err.interrupted() =>
                {
                    log::debug!("Depth {} abandoned: {:?}.", depth, err.kind);
                    break;
                }
                | Err(err) =>
                {
                    log::error!("Search failed at depth {}: {}", depth, err);
                    break;
                }
            }
        }

        best
    }

    /// Searches the root to a fixed depth, trying `first` before the other movements.
    pub fn search(&self, state: &mut G, depth: u8, first: Option<G::Move>) -> Result<Option<Report<G::Move>>>
    {
        let mut alpha = -INF;
        let mut best: Option<(G::Move, i64)> = None;
        let mut line = Variation::default();
        let mut child = Variation::default();

        for mv in self.ordered(state, first)
        {
            state.play(&mv);
            let result = self.negamax(state, depth.saturating_sub(1), 1, -INF, -alpha, &mut child);
            state.unplay();
            let score = -result?;

            if best.map(|(_, b)| score > b).unwrap_or(true)
            {
                best = Some((mv, score));
                line.load(mv, &child);
            }
            alpha = alpha.max(score);
        }

        Ok(best.map(|(movement, score)| Report {
            depth,
            movement,
            score: scores::reconstruct(score),
            variation: line,
            evaluated: self.context.evaluated(),
        }))
    }

    /// Scores a node from the perspective of its side to move.
    fn negamax(&self, state: &mut G, depth: u8, ply: usize, mut alpha: i64, beta: i64, line: &mut Variation<G::Move>) -> Result<i64>
    {
        line.clear();
        if depth == 0 || state.is_terminal()
        {
            return self.leaf(state, ply);
        }

        let moves = self.ordered(state, None);
        if moves.is_empty()
        {
            return self.leaf(state, ply);
        }

        let mut best = -INF;
        let mut child = Variation::default();
        for mv in moves
        {
            state.play(&mv);
            let result = self.negamax(state, depth - 1, ply + 1, -beta, -alpha, &mut child);
            state.unplay();
            let score = -result?;

            if score > best
            {
                best = score;
                line.load(mv, &child);
            }

            alpha = alpha.max(score);
            if alpha >= beta
            {
                break;
            }
        }

        Ok(best)
    }

    /// Evaluates a leaf through the cache, polling for cancellation first.
    fn leaf(&self, state: &G, ply: usize) -> Result<i64>
    {
        self.context.check()?;
        self.context.count();

        let key = state.fingerprint();
        let score = match self.cache.lookup(key)
        {
            | Some(score) => score,
            | None =>
            {
                let score = self.evaluator.evaluate(state, &self.support);
                self.cache.store(key, score);
                score
            }
        };

        Ok(scores::normalize(score, ply))
    }

    /// Orders movements so that likely-best ones come first for whoever is choosing.
    fn ordered(&self, state: &G, first: Option<G::Move>) -> Vec<G::Move>
    {
        let mut moves = state.available_moves();
        let maximizing = state.current_player() == self.support.player;

        moves.sort_by_cached_key(|mv| {
            let value = self.evaluator.evaluate_move(state, mv);
            if maximizing { -value } else { value }
        });

        if let Some(first) = first
        {
            if let Some(index) = moves.iter().position(|mv| *mv == first)
            {
                moves[..=index].rotate_right(1);
            }
        }

        moves
    }
}
