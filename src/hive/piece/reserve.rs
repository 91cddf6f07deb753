use crate::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// The units that have not yet entered play.
pub struct Reserve
{
    units:  [[u8; 8]; 2],
    totals: [u8; 8],
}

impl Default for Reserve
{
    fn default() -> Self
    {
        Reserve::new(GameOptions::default())
    }
}

impl Reserve
{
    /// Creates a new reserve with optional classes determined by the game options.
    pub fn new(options: GameOptions) -> Reserve
    {
        let totals = Class::all().map(|class| if class.enabled(&options) { class.extent() } else { 0 });
        Reserve {
            units: [totals, totals],
            totals,
        }
    }

    /// Whether the given unit is still waiting in the reserve.
    pub fn contains(&self, unit: &Unit) -> bool
    {
        self.peek(unit.owner, unit.class).map(|index| index <= unit.index).unwrap_or(false)
            && unit.index <= self.totals[unit.class as usize]
    }

    /// Whether the unit exists at all under these options.
    pub fn in_box(&self, unit: &Unit) -> bool
    {
        (1..=self.totals[unit.class as usize]).contains(&unit.index)
    }

    /// The next unit of a class to be placed.
    pub fn next(&self, owner: Player, class: Class) -> Option<Unit>
    {
        self.peek(owner, class).map(|index| Unit::new(class, owner, index))
    }

    /// Returns the lowest index left for the given class.
    pub fn peek(&self, owner: Player, class: Class) -> Option<u8>
    {
        let remaining = self.units[owner as usize][class as usize];
        if remaining > 0
        {
            Some(1 + self.totals[class as usize] - remaining)
        }
        else
        {
            None
        }
    }

    /// Puts a unit back. The index is unchecked, so only the most recently taken unit should be returned.
    pub fn put(&mut self, unit: Unit)
    {
        self.units[unit.owner as usize][unit.class as usize] += 1;
    }

    /// Takes the lowest remaining unit of a class, if any remain.
    pub fn take(&mut self, owner: Player, class: Class) -> Option<Unit>
    {
        let next = self.next(owner, class);
        if next.is_some()
        {
            self.units[owner as usize][class as usize] -= 1;
        }
        next
    }
}
