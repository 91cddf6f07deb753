use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use serde::{Deserialize, Serialize};

use crate::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// One unit standing on the board.
pub struct Placement
{
    pub unit: Unit,
    pub at:   Position,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
/// A serializable description of a position.
///
/// Placements are listed bottom to top within each stack; the player to move follows from the ply.
pub struct GameSnapshot
{
    #[serde(default)]
    pub options:    GameOptions,
    pub ply:        u16,
    pub placements: Vec<Placement>,
}

impl From<&GameState> for GameSnapshot
{
    fn from(state: &GameState) -> Self
    {
        let mut positions = state.stacks.keys().copied().collect::<Vec<Position>>();
        positions.sort();

        let placements = positions
            .into_iter()
            .flat_map(|at| state.stack(at).iter().map(move |unit| Placement { unit: *unit, at }))
            .collect();

        GameSnapshot {
            options: state.options(),
            ply: state.ply(),
            placements,
        }
    }
}

impl TryFrom<GameSnapshot> for GameState
{
    type Error = Error;

    fn try_from(snapshot: GameSnapshot) -> std::result::Result<Self, Self::Error>
    {
        GameState::from_snapshot(&snapshot, Arc::new(ZobristTable::default()))
    }
}

impl GameState
{
    /// Rebuilds a validated position whose fingerprints come from the given tables.
    pub fn from_snapshot(snapshot: &GameSnapshot, hasher: Arc<ZobristTable>) -> Result<GameState>
    {
        snapshot.validate()?;
        Ok(GameState::from_placements(snapshot.options, hasher, snapshot.ply, &snapshot.placements))
    }
}

impl GameSnapshot
{
    /// Ensures the snapshot describes a position the board can hold.
    pub fn validate(&self) -> Result<()>
    {
        let base = Error::new(Kind::MalformedInput, "The position cannot be reconstructed.".into());
        let reserve = Reserve::new(self.options);

        let mut seen = HashSet::new();
        let mut heights: HashMap<Position, usize> = HashMap::new();

        for Placement { unit, at } in &self.placements
        {
            let problem = if !at.is_valid()
            {
                Some(format!("{} is not a cube coordinate.", at))
            }
            else if !reserve.in_box(unit)
            {
                Some(format!("{} is not part of this game.", unit))
            }
            else if !seen.insert(*unit)
            {
                Some(format!("{} appears more than once.", unit))
            }
            else
            {
                let height = heights.entry(*at).or_insert(0);
                *height += 1;
                (*height > piece::consts::MAX_HEIGHT).then(|| format!("The stack at {} is too tall.", at))
            };

            if let Some(problem) = problem
            {
                return Err(Error::new(Kind::MalformedInput, problem).chain(base));
            }
        }

        // Units of a class leave the reserve lowest index first.
        if let Some(unit) = seen.iter().find(|unit| unit.index > 1 && !seen.contains(&Unit { index: unit.index - 1, ..**unit }))
        {
            let err = Error::new(Kind::MalformedInput, format!("{} is in play before its lower-numbered sibling.", unit));
            return Err(err.chain(base));
        }

        let field: Field = heights.keys().copied().collect();
        if !is_connected(&field, heights.keys().copied())
        {
            let err = Error::new(Kind::MalformedInput, "The hive is split.".into());
            return Err(err.chain(base));
        }

        Ok(())
    }
}

/// Whether every occupied position can reach every other.
fn is_connected(field: &Field, mut positions: impl Iterator<Item = Position>) -> bool
{
    let Some(start) = positions.next()
    else
    {
        return true;
    };

    let mut visited = HashSet::from([start]);
    let mut frontier = vec![start];
    while let Some(p) = frontier.pop()
    {
        for n in field.neighbours(p)
        {
            if visited.insert(n)
            {
                frontier.push(n);
            }
        }
    }

    visited.len() == field.len()
}
