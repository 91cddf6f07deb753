use serde::{Deserialize, Serialize};

use crate::prelude::*;

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// The classes of bugs in Hive.
pub enum Class
{
    Ant      = 0,
    Beetle   = 1,
    Hopper   = 2,
    LadyBug  = 3,
    Mosquito = 4,
    PillBug  = 5,
    Queen    = 6,
    Spider   = 7,
}

impl std::fmt::Display for Class
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        let name = match self
        {
            | Self::Ant => "A",
            | Self::Beetle => "B",
            | Self::Hopper => "G",
            | Self::LadyBug => "L",
            | Self::Mosquito => "M",
            | Self::PillBug => "P",
            | Self::Queen => "Q",
            | Self::Spider => "S",
        };
        write!(f, "{name}")
    }
}

impl FromStr for Class
{
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err>
    {
        Class::all()
            .into_iter()
            .find(|class| class.long() == s)
            .ok_or_else(|| Error::for_parse::<Self>(s.into()))
    }
}

impl Class
{
    /// Returns the classes in offset order.
    pub const fn all() -> [Class; 8]
    {
        [
            Self::Ant,
            Self::Beetle,
            Self::Hopper,
            Self::LadyBug,
            Self::Mosquito,
            Self::PillBug,
            Self::Queen,
            Self::Spider,
        ]
    }

    /// The material value of a unit of this class.
    pub fn base_value(&self) -> i32
    {
        match self
        {
            | Self::Ant => 80,
            | Self::Beetle => 80,
            | Self::Hopper => 40,
            | Self::LadyBug => 50,
            | Self::Mosquito => 75,
            | Self::PillBug => 60,
            | Self::Queen => 100,
            | Self::Spider => 20,
        }
    }

    /// Gets the number of units of this class in a full box.
    pub fn extent(&self) -> u8
    {
        match self
        {
            | Self::Ant => 3,
            | Self::Beetle => 2,
            | Self::Hopper => 3,
            | Self::LadyBug => 1,
            | Self::Mosquito => 1,
            | Self::PillBug => 1,
            | Self::Queen => 1,
            | Self::Spider => 2,
        }
    }

    /// Whether this class only appears when an expansion is enabled.
    pub fn enabled(&self, options: &GameOptions) -> bool
    {
        match self
        {
            | Self::LadyBug => options.expansions.ladybug,
            | Self::Mosquito => options.expansions.mosquito,
            | Self::PillBug => options.expansions.pillbug,
            | _ => true,
        }
    }

    pub fn long(&self) -> &'static str
    {
        match self
        {
            | Self::Ant => "Ant",
            | Self::Beetle => "Beetle",
            | Self::Hopper => "Hopper",
            | Self::LadyBug => "LadyBug",
            | Self::Mosquito => "Mosquito",
            | Self::PillBug => "PillBug",
            | Self::Queen => "Queen",
            | Self::Spider => "Spider",
        }
    }

    /// Gets the index of the first unit of this class within a player's box.
    pub fn offset(&self) -> u8
    {
        match self
        {
            | Self::Ant => 0,
            | Self::Beetle => 3,
            | Self::Hopper => 5,
            | Self::LadyBug => 8,
            | Self::Mosquito => 9,
            | Self::PillBug => 10,
            | Self::Queen => 11,
            | Self::Spider => 12,
        }
    }
}
