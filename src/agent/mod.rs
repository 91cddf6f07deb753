use crate::prelude::*;

pub mod evaluators;
pub mod scalars;
pub mod search;
pub mod searchargs;
pub mod support;
pub mod table;
pub mod variation;

pub use evaluators::BasicEvaluator;
pub use scalars::*;
pub use search::*;
pub use searchargs::SearchArgs;
pub use support::GameStateSupport;
pub use table::TranspositionCache;
pub use variation::Variation;

/// The view of a game that the search needs.
///
/// Implementations apply and undo movements in place; the search always undoes what it plays.
pub trait Game: Clone + Send + 'static
{
    type Move: Copy + PartialEq + std::fmt::Debug + std::fmt::Display + Send + 'static;

    /// Every legal movement for the side to move. Empty means the position is a leaf.
    fn available_moves(&self) -> Vec<Self::Move>;

    fn current_player(&self) -> Player;

    /// The fingerprint keying the transposition cache.
    fn fingerprint(&self) -> u64;

    /// Whether the game has ended in this position.
    fn is_terminal(&self) -> bool;

    /// Finds a player's queen, in play or in reserve.
    fn locate_queen(&self, player: Player) -> Option<Unit>;

    /// Plays a movement taken from [`Game::available_moves`].
    fn play(&mut self, mv: &Self::Move);

    /// Takes back the last movement played.
    fn unplay(&mut self);
}

/// Scores positions for the search.
pub trait Evaluator<G: Game>: Send + Sync
{
    /// Scores a position; higher is better for the side to move.
    fn evaluate(&self, state: &G, support: &GameStateSupport) -> i32;

    /// A cheap guess at how promising a movement is, used to order moves.
    fn evaluate_move(&self, state: &G, mv: &G::Move) -> i32;
}

impl Game for GameState
{
    type Move = Movement;

    fn available_moves(&self) -> Vec<Movement>
    {
        GameState::available_moves(self)
    }

    fn current_player(&self) -> Player
    {
        GameState::current_player(self)
    }

    fn fingerprint(&self) -> u64
    {
        GameState::fingerprint(self)
    }

    fn is_terminal(&self) -> bool
    {
        self.status().is_over()
    }

    fn locate_queen(&self, player: Player) -> Option<Unit>
    {
        GameState::locate_queen(self, player)
    }

    fn play(&mut self, mv: &Movement)
    {
        self.play_unchecked(mv);
    }

    fn unplay(&mut self)
    {
        if let Err(err) = self.undo()
        {
            log::error!("{}", err);
        }
    }
}
