use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Represents the current status of the game.
pub enum GameStatus
{
    NotStarted,
    InProgress,
    Draw,
    WhiteWins,
    BlackWins,
}

impl GameStatus
{
    /// Whether the game has ended.
    pub fn is_over(&self) -> bool
    {
        matches!(self, Self::Draw | Self::WhiteWins | Self::BlackWins)
    }
}

impl std::fmt::Display for GameStatus
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        let repr = match self
        {
            | Self::NotStarted => "NotStarted",
            | Self::InProgress => "InProgress",
            | Self::Draw => "Draw",
            | Self::WhiteWins => "WhiteWins",
            | Self::BlackWins => "BlackWins",
        };
        write!(f, "{repr}")
    }
}
