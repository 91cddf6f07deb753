use crate::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Read-only context computed once per root position.
pub struct GameStateSupport
{
    /// The player the search represents.
    pub player: Player,

    pub white_queen: Unit,
    pub black_queen: Unit,
}

impl GameStateSupport
{
    /// Resolves both queens, failing when either cannot be found.
    pub fn new<G: Game>(player: Player, state: &G) -> Result<GameStateSupport>
    {
        let locate = |owner: Player| {
            state.locate_queen(owner).ok_or_else(|| {
                Error::new(
                    Kind::ConfigurationError,
                    format!("The {} queen is neither in play nor in reserve.", owner),
                )
            })
        };

        Ok(GameStateSupport {
            player,
            white_queen: locate(Player::White)?,
            black_queen: locate(Player::Black)?,
        })
    }

    /// The queen belonging to the given player.
    pub fn queen(&self, player: Player) -> Unit
    {
        match player
        {
            | Player::White => self.white_queen,
            | Player::Black => self.black_queen,
        }
    }
}
