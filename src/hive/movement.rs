use serde::{Deserialize, Serialize};

use crate::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "movementType", rename_all = "camelCase")]
/// A single ply in a game of Hive.
pub enum Movement
{
    /// Moves a unit already in play.
    Move
    {
        unit: Unit,
        to:   Position,
    },

    /// A pillbug (or a mosquito touching one) lifts a neighbouring unit over itself.
    #[serde(rename_all = "camelCase")]
    Yoink
    {
        pill_bug: Unit,
        unit:     Unit,
        to:       Position,
    },

    /// Places a unit from the reserve.
    Place
    {
        unit: Unit,
        at:   Position,
    },

    /// The only legal movement when nothing else is available.
    Pass,
}

impl Movement
{
    /// The unit that changes position, if any.
    pub fn unit(&self) -> Option<Unit>
    {
        match self
        {
            | Self::Move { unit, .. } | Self::Yoink { unit, .. } | Self::Place { unit, .. } => Some(*unit),
            | Self::Pass => None,
        }
    }

    /// Where the moving unit ends up, if anywhere.
    pub fn target(&self) -> Option<Position>
    {
        match self
        {
            | Self::Move { to, .. } | Self::Yoink { to, .. } => Some(*to),
            | Self::Place { at, .. } => Some(*at),
            | Self::Pass => None,
        }
    }

    /// Whether this movement puts a queen into play.
    pub fn places_queen(&self) -> bool
    {
        matches!(self, Self::Place { unit, .. } if unit.class == Class::Queen)
    }
}

impl std::fmt::Display for Movement
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        match self
        {
            | Self::Move { unit, to } => write!(f, "move {} to {}", unit, to),
            | Self::Yoink { pill_bug, unit, to } => write!(f, "{} yoinks {} to {}", pill_bug, unit, to),
            | Self::Place { unit, at } => write!(f, "place {} at {}", unit, at),
            | Self::Pass => write!(f, "pass"),
        }
    }
}

impl FromStr for Movement
{
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err>
    {
        serde_json::from_str(s).map_err(|err| {
            let base = Error::new(Kind::MalformedInput, format!("'{}' is not a valid movement.", s));
            Error::from(err).chain(base)
        })
    }
}
