use serde::{Deserialize, Serialize};

mod class;
mod player;
mod reserve;

pub use class::Class;
pub use player::Player;
pub use reserve::Reserve;

pub mod consts
{
    pub const PER_PLAYER: u8 = 14;
    pub const COUNT: usize = 2 * PER_PLAYER as usize;

    /// The tallest possible stack: four beetles, two mosquitoes and the unit underneath.
    pub const MAX_HEIGHT: usize = 7;
}
use consts::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
/// A unit in the game of Hive.
///
/// Units have an owner, a class, and a 1-based index among units of the same class.
/// For example, the third ant in white's box is wA3.
pub struct Unit
{
    pub class: Class,
    pub owner: Player,
    pub index: u8,
}

impl Unit
{
    pub const fn new(class: Class, owner: Player, index: u8) -> Unit
    {
        Unit { class, owner, index }
    }

    /// The queen belonging to the given player.
    pub const fn queen(owner: Player) -> Unit
    {
        Unit::new(Class::Queen, owner, 1)
    }

    /// Whether the unit exists in a full box.
    pub fn is_valid(&self) -> bool
    {
        (1..=self.class.extent()).contains(&self.index)
    }

    /// Gets the slot of this unit, in owner-class-index order.
    pub fn slot(&self) -> usize
    {
        (PER_PLAYER * (self.owner as u8) + self.class.offset() + (self.index - 1)) as usize
    }

    /// Every unit in a full box, in slot order.
    pub fn all() -> impl Iterator<Item = Unit>
    {
        Player::all().into_iter().flat_map(|owner| {
            Class::all()
                .into_iter()
                .flat_map(move |class| (1..=class.extent()).map(move |index| Unit::new(class, owner, index)))
        })
    }
}

impl std::fmt::Display for Unit
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        match self.class.extent()
        {
            | 1 => write!(f, "{}{}", self.owner.short(), self.class),
            | _ => write!(f, "{}{}{}", self.owner.short(), self.class, self.index),
        }
    }
}
