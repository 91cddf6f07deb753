use arrayvec::ArrayVec;

use crate::prelude::*;

#[derive(Clone, Debug)]
/// A line of play found by the search, best movement first.
pub struct Variation<M>
{
    pub moves: ArrayVec<M, { scalars::MAXIMUM_PLY }>,
}

impl<M> Default for Variation<M>
{
    fn default() -> Self
    {
        Variation { moves: ArrayVec::new() }
    }
}

impl<M: Copy> Variation<M>
{
    /// Replaces this line with the given movement followed by the rest.
    pub fn load(&mut self, mv: M, rest: &Variation<M>)
    {
        self.moves.clear();
        self.moves.push(mv);
        let room = self.moves.remaining_capacity().min(rest.moves.len());
        self.moves.extend(rest.moves[.. room].iter().copied());
    }

    pub fn clear(&mut self)
    {
        self.moves.clear();
    }

    /// The first movement of the line.
    pub fn first(&self) -> Option<M>
    {
        self.moves.first().copied()
    }

    pub fn len(&self) -> usize
    {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.moves.is_empty()
    }
}

impl<M: std::fmt::Display> std::fmt::Display for Variation<M>
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        let line = self.moves.iter().map(|mv| mv.to_string()).collect::<Vec<String>>();
        write!(f, "[{}]", line.join(", "))
    }
}
