use std::collections::{hash_map::Entry as MapEntry, HashMap, HashSet};

use crate::prelude::*;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// A set of height-sensitive positions useful for performing reachability calculations.
pub struct Field
{
    map: HashMap<Position, u8>,
}

impl FromIterator<Position> for Field
{
    fn from_iter<T: IntoIterator<Item = Position>>(iter: T) -> Self
    {
        Field {
            map: iter.into_iter().map(|p| (p, 1)).collect(),
        }
    }
}

impl Field
{
    /// Determines whether this position is inside the field.
    pub fn contains(&self, p: Position) -> bool
    {
        self.map.contains_key(&p)
    }

    /// Ensures that the two positions are neighbours, and returns their common neighbours.
    pub fn ensure_common_neighbours(&self, from: Position, to: Position) -> Result<(Position, Position)>
    {
        let Some((cw, ccw)) = hex::common_neighbours(from, to)
        else
        {
            return Err(Error::new(
                Kind::InvalidState,
                format!("Positions {} and {} are not neighbours.", from, to),
            ));
        };

        Ok((cw, ccw))
    }

    /// Ensures that a movement between two positions satisfies the constant contact rule.
    ///
    /// This is true when the positions are neighbours and:
    /// 1. a ground-level movement has a common neighbour; or
    /// 2. one position is elevated.
    ///
    /// If the from-position is not in the hive, the check assumes there is a unit at **ground level**.
    ///
    /// Passing ghosting=true tells it to assume there is a unit one higher in the stack instead.
    pub fn ensure_constant_contact(&self, from: Position, to: Position, ghosting: bool) -> Result<()>
    {
        let base = Error::new(
            Kind::ConstantContact,
            format!("Moving from {} to {} violates the constant contact principle.", from, to),
        );

        let (cw, ccw) = self.ensure_common_neighbours(from, to).map_err(|err| err.chain(base.clone()))?;

        // The from-stack still holds the mover; the to-stack would gain it.
        let ghosting = if ghosting { 1 } else { 0 };
        let height_f = self.height(from).unwrap_or(1) + ghosting;
        let height_t = self.height(to).map(|h| h + 1).unwrap_or(1);

        if height_f.max(height_t) > 1 || self.contains(cw) || self.contains(ccw)
        {
            Ok(())
        }
        else
        {
            let err = Error::new(
                Kind::InvalidState,
                format!("Neither common neighbour, {} or {}, is in the hive.", cw, ccw),
            );
            Err(err.chain(base))
        }
    }

    /// Ensures that a movement between two positions satisfies the freedom to move rule.
    ///
    /// If the from-position is not in the hive, the check assumes there is a unit at **ground level**.
    ///
    /// Passing ghosting=true tells it to assume there is a unit one higher in the stack instead.
    pub fn ensure_freedom_to_move(&self, from: Position, to: Position, ghosting: bool) -> Result<()>
    {
        let base = Error::new(
            Kind::FreedomToMove,
            format!("Moving from {} to {} violates the freedom to move principle.", from, to),
        );

        let (cw, ccw) = self.ensure_common_neighbours(from, to).map_err(|err| err.chain(base.clone()))?;

        let (Some(height_cw), Some(height_ccw)) = (self.height(cw), self.height(ccw))
        else
        {
            return Ok(());
        };

        let ghosting = if ghosting { 1 } else { 0 };
        let height_f = self.height(from).unwrap_or(1) + ghosting;
        let height_t = self.height(to).map(|h| h + 1).unwrap_or(1);

        let height_path = height_f.max(height_t);
        let height_gate = height_cw.min(height_ccw);

        if height_gate >= height_path
        {
            let err = Error::new(
                Kind::InvalidState,
                format!(
                    "Neighbouring stacks form a gate at least {} units tall, which gates the movement at height {}.",
                    height_gate, height_path
                ),
            );
            Err(err.chain(base))
        }
        else
        {
            Ok(())
        }
    }

    /// Returns all ground positions reachable by crawling, optionally in an exact number of steps.
    pub fn find_crawls(&self, from: Position, distance: Option<u8>) -> HashSet<Position>
    {
        let perimeter = self.perimeter(Some(from));

        match distance
        {
            | Some(length) => perimeter.exact_distance(from, length),
            | None => perimeter.reachable(from),
        }
    }

    /// Gets the height of the given position in the field, if it exists.
    pub fn height(&self, p: Position) -> Option<u8>
    {
        self.map.get(&p).copied()
    }

    /// Determines whether or not the hive is empty.
    pub fn is_empty(&self) -> bool
    {
        self.map.is_empty()
    }

    /// Determines whether the position is locked behind a gate.
    pub fn is_gated(&self, p: Position) -> bool
    {
        self.neighbours(p).len() >= 5
    }

    /// Gets the number of occupied positions.
    pub fn len(&self) -> usize
    {
        self.map.len()
    }

    /// Returns the neighbours of the given position that are present in the field.
    pub fn neighbours(&self, p: Position) -> HashSet<Position>
    {
        hex::neighbours(p).into_iter().filter(|n| self.contains(*n)).collect()
    }

    /// Returns the field consisting of the perimeter.
    pub fn perimeter(&self, as_if_without: Option<Position>) -> Perimeter
    {
        let mut field = self.clone();
        if let Some(p) = as_if_without
        {
            field.pop(p);
        }

        let perim: Field = field
            .map
            .keys()
            .flat_map(|p| hex::neighbours(*p))
            .filter(|p| !field.contains(*p) && !field.is_gated(*p))
            .collect();

        Perimeter(perim, field)
    }

    /// Removes one level from the stack at a position.
    pub fn pop(&mut self, p: Position)
    {
        if let MapEntry::Occupied(mut o) = self.map.entry(p)
        {
            if *o.get() == 1u8
            {
                o.remove_entry();
            }
            else
            {
                *o.get_mut() -= 1;
            }
        }
    }

    /// Adds one level to the stack at a position.
    pub fn push(&mut self, p: Position)
    {
        *self.map.entry(p).or_insert(0) += 1;
    }
}

// Tarjan's algorithm for finding articulation points.

#[derive(Clone, Copy, Debug, Default)]
struct PositionStats
{
    num: u8,
    low: u8,
}

#[derive(Default)]
struct DescentRecord
{
    visited: HashMap<Position, PositionStats>,
    pinned:  HashSet<Position>,
    count:   u8,
}

impl Field
{
    /// Returns all of the pinned positions.
    pub fn find_pins(&self) -> HashSet<Position>
    {
        let Some(start) = self.map.keys().next()
        else
        {
            return HashSet::new();
        };

        let mut state = DescentRecord {
            count: 1,
            ..Default::default()
        };
        self.find_pins_recurse(*start, None, &mut state);
        state.pinned
    }

    fn find_pins_recurse(&self, p: Position, parent: Option<Position>, state: &mut DescentRecord)
    {
        let mut stats = PositionStats {
            num: state.count,
            low: state.count,
        };
        state.visited.insert(p, stats);
        state.count += 1;

        let mut children = 0;
        for neighbour in self.neighbours(p)
        {
            if parent == Some(neighbour)
            {
                continue;
            }

            if let Some(seen) = state.visited.get(&neighbour)
            {
                stats.low = stats.low.min(seen.num);
            }
            else
            {
                self.find_pins_recurse(neighbour, Some(p), state);
                children += 1;

                let child_low = state.visited.get(&neighbour).map(|s| s.low).unwrap_or(u8::MAX);
                stats.low = stats.low.min(child_low);

                if parent.is_some() && child_low >= stats.num
                {
                    state.pinned.insert(p);
                }
            }
            state.visited.insert(p, stats);
        }

        if parent.is_none() && children > 1
        {
            state.pinned.insert(p);
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A field that was specifically constructed from a perimeter.
///
/// The perimeter contains every position that:
/// 1. is unoccupied;
/// 2. has at least one occupied neighbour; and
/// 3. has fewer than 5 occupied neighbours.
///
/// The second field is the hive the perimeter was built around.
pub struct Perimeter(Field, Field);

#[derive(Default)]
struct PathRecord
{
    visited: HashSet<Position>,
    reached: HashSet<Position>,
    depth:   u8,
}

// Depth-first searches along the perimeter.

impl Perimeter
{
    /// Returns all positions reachable using a non-backtracking path of exactly the given length.
    pub fn exact_distance(&self, from: Position, length: u8) -> HashSet<Position>
    {
        log::trace!("Length {} DFS from {}.", length, from);

        if !self.0.contains(from)
        {
            return HashSet::new();
        }

        let mut state = PathRecord {
            depth: length,
            ..Default::default()
        };
        state.visited.insert(from);
        self.exact_distance_recurse(from, &mut state);
        state.reached
    }

    /// Determines the set of all positions reachable from the given start, which is excluded.
    pub fn reachable(&self, from: Position) -> HashSet<Position>
    {
        log::trace!("Reachability DFS from {}.", from);

        if !self.0.contains(from)
        {
            return HashSet::new();
        }

        let mut state = PathRecord::default();
        self.reachable_recurse(from, &mut state);
        state.visited.remove(&from);
        state.visited
    }

    fn exact_distance_recurse(&self, p: Position, state: &mut PathRecord)
    {
        if state.depth == 0
        {
            state.reached.insert(p);
            return;
        }

        for neighbour in self.0.neighbours(p)
        {
            if state.visited.contains(&neighbour) || !self.crawlable(p, neighbour)
            {
                continue;
            }

            state.depth -= 1;
            state.visited.insert(neighbour);
            self.exact_distance_recurse(neighbour, state);
            state.visited.remove(&neighbour);
            state.depth += 1;
        }
    }

    fn reachable_recurse(&self, from: Position, state: &mut PathRecord)
    {
        state.visited.insert(from);

        for neighbour in self.0.neighbours(from)
        {
            if !state.visited.contains(&neighbour) && self.crawlable(from, neighbour)
            {
                self.reachable_recurse(neighbour, state);
            }
        }
    }

    fn crawlable(&self, from: Position, to: Position) -> bool
    {
        self.1.ensure_freedom_to_move(from, to, false).is_ok() && self.1.ensure_constant_contact(from, to, false).is_ok()
    }
}
