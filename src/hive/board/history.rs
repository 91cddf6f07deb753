use crate::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// A movement paired with everything needed to take it back.
pub struct Entry
{
    pub movement:     Movement,
    /// Where the moving unit stood before, or `None` for placements and passes.
    pub from:         Option<Position>,
    pub prev_immune:  Option<Unit>,
    pub prev_stunned: Option<Unit>,
}

impl std::fmt::Display for Entry
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        match self.from
        {
            | Some(from) => write!(f, "{} (from {})", self.movement, from),
            | None => write!(f, "{}", self.movement),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// A linear movement history that can be unwound back to its start.
pub struct History
{
    past: Vec<Entry>,
}

impl History
{
    /// Determines whether or not the history is empty.
    pub fn is_empty(&self) -> bool
    {
        self.past.is_empty()
    }

    /// A read-only iter to past entries, oldest first.
    pub fn iter(&self) -> std::slice::Iter<'_, Entry>
    {
        self.past.iter()
    }

    /// Gets the length of the history, which is useful for controlling undos.
    pub fn len(&self) -> usize
    {
        self.past.len()
    }

    /// Records a movement.
    pub fn play(&mut self, entry: Entry)
    {
        self.past.push(entry);
    }

    /// Gets the last entry recorded, if one exists.
    pub fn prev(&self) -> Option<&Entry>
    {
        self.past.last()
    }

    /// Forgets the last entry.
    pub fn undo(&mut self) -> Option<Entry>
    {
        self.past.pop()
    }
}
