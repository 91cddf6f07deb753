use std::collections::HashSet;

use itertools::Itertools;

use crate::prelude::*;

impl GameState
{
    /// Generates every legal movement for the player to move, not including `Pass`.
    ///
    /// The list is sorted, so generation order never depends on hashing.
    pub fn available_moves(&self) -> Vec<Movement>
    {
        let player = self.current_player();
        let mut moves: Vec<Movement> = Vec::new();

        self.generate_placements_into(player, &mut moves);
        if self.location(&Unit::queen(player)).is_some()
        {
            // Units cannot move until their queen is in the hive.
            self.units_in_play(player)
                .iter()
                .for_each(|unit| self.generate_moves_for(unit, &mut moves));
            self.generate_yoinks_into(player, &mut moves);
        }

        moves.sort();
        moves.dedup();
        moves
    }

    /// Generates the movements of one unit in play, as if its owner were to move.
    pub fn moves_for(&self, unit: &Unit) -> Vec<Movement>
    {
        let mut moves = Vec::new();
        if self.location(&Unit::queen(unit.owner)).is_some()
        {
            self.generate_moves_for(unit, &mut moves);
        }
        moves
    }
}

impl GameState
{
    /// Generates placements for the given player.
    fn generate_placements_into(&self, player: Player, moves: &mut Vec<Movement>)
    {
        let turn = self.ply() / 2;
        let queen = Unit::queen(player);

        let reserve: Vec<Unit> = if self.reserve.contains(&queen) && turn >= 3
        {
            // The queen must be in play by the end of a player's fourth turn.
            vec![queen]
        }
        else
        {
            Class::all()
                .into_iter()
                .filter_map(|class| self.reserve.next(player, class))
                .filter(|unit| !(unit.class == Class::Queen && turn == 0 && self.options.tournament))
                .collect()
        };

        if reserve.is_empty()
        {
            return;
        }

        let targets = self.positions_for_placements(player);
        for (unit, at) in reserve.iter().cartesian_product(targets.iter())
        {
            moves.push(Movement::Place { unit: *unit, at: *at });
        }
    }

    /// Generates pillbug throws for the given player, including those by a mosquito touching a pillbug.
    fn generate_yoinks_into(&self, player: Player, moves: &mut Vec<Movement>)
    {
        for thrower in self.units_in_play(player).iter().filter(|unit| self.can_yoink(unit))
        {
            let Some(via) = self.location(thrower)
            else
            {
                continue;
            };

            let neighbours = hex::neighbours(via);
            for (from, to) in neighbours.iter().cartesian_product(neighbours.iter())
            {
                let Some(target) = self.top(*from)
                else
                {
                    continue;
                };

                if from == to
                    || self.stack(*from).len() != 1
                    || self.immune == Some(target)
                    || self.is_pinned(&target)
                    || self.stacks.contains_key(to)
                {
                    continue;
                }

                let lifted = self
                    .field
                    .ensure_freedom_to_move(*from, via, false)
                    .and_then(|_| self.field.ensure_freedom_to_move(via, *to, true));

                if lifted.is_ok()
                {
                    moves.push(Movement::Yoink {
                        pill_bug: *thrower,
                        unit:     target,
                        to:       *to,
                    });
                }
            }
        }
    }

    /// Whether the unit can use the pillbug ability this turn.
    fn can_yoink(&self, unit: &Unit) -> bool
    {
        let Some(at) = self.location(unit)
        else
        {
            return false;
        };

        if self.stunned == Some(*unit) || self.stack(at).len() != 1
        {
            return false;
        }

        match unit.class
        {
            | Class::PillBug => true,
            | Class::Mosquito => self.classes_neighbouring(at).contains(&Class::PillBug),
            | _ => false,
        }
    }

    /// The classes of the units on top of each neighbouring stack.
    fn classes_neighbouring(&self, at: Position) -> HashSet<Class>
    {
        hex::neighbours(at).into_iter().filter_map(|p| self.top(p)).map(|u| u.class).collect()
    }

    /// Returns all the empty positions in which the player can place a unit.
    fn positions_for_placements(&self, player: Player) -> Vec<Position>
    {
        if self.field.is_empty()
        {
            return vec![Position::ORIGIN];
        }

        let friendly = self.stacks.keys().copied().filter(|at| self.top(*at).map(|u| u.owner) == Some(player));
        let mut targets: Vec<Position> = if self.units_in_play(player).is_empty()
        {
            // A player's first placement may touch anything.
            self.stacks.keys().flat_map(|at| hex::neighbours(*at)).filter(|p| !self.field.contains(*p)).collect()
        }
        else
        {
            friendly
                .flat_map(hex::neighbours)
                .filter(|p| !self.field.contains(*p))
                .filter(|p| !hex::neighbours(*p).iter().any(|n| self.top(*n).map(|u| u.owner != player).unwrap_or(false)))
                .collect()
        };

        targets.sort();
        targets.dedup();
        targets
    }

    /// Determines whether the destination still touches the hive once the mover leaves its cell.
    fn touches_hive(&self, from: Position, to: Position) -> bool
    {
        let leaves_empty = self.stack(from).len() <= 1;
        self.field.neighbours(to).into_iter().any(|n| !(leaves_empty && n == from))
    }

    #[inline]
    /// Ensures that a unit can crawl one cell.
    fn ensure_crawl(&self, from: Position, to: Position, ghosting: bool) -> Result<()>
    {
        self.field
            .ensure_constant_contact(from, to, ghosting)
            .and_then(|_| self.field.ensure_freedom_to_move(from, to, ghosting))
    }

    #[inline]
    /// Whether the movement both starts and ends on the ground.
    fn is_ground_movement(&self, from: Position, to: Position) -> bool
    {
        self.field.height(from).unwrap_or(0) <= 1 && !self.field.contains(to)
    }
}

impl GameState
{
    /// Finds all of the ways this unit can move under its own power.
    fn generate_moves_for(&self, unit: &Unit, moves: &mut Vec<Movement>)
    {
        let Some(from) = self.location(unit)
        else
        {
            return;
        };

        if self.top(from) != Some(*unit) || self.stunned == Some(*unit) || self.is_pinned(unit)
        {
            return;
        }

        let destinations = self.destinations_as(unit.class, from);
        moves.extend(destinations.into_iter().map(|to| Movement::Move { unit: *unit, to }));
    }

    /// Every destination reachable from a position when moving as the given class.
    fn destinations_as(&self, class: Class, from: Position) -> HashSet<Position>
    {
        match class
        {
            | Class::Ant => self.field.find_crawls(from, None),
            | Class::Beetle => self.beetle(from),
            | Class::Hopper => self.hopper(from),
            | Class::LadyBug => self.ladybug(from),
            | Class::Mosquito => self.mosquito(from),
            | Class::PillBug | Class::Queen => self.ground_crawls(from),
            | Class::Spider => self.field.find_crawls(from, Some(3)),
        }
        .into_iter()
        .filter(|to| *to != from)
        .collect()
    }

    /// One step along the ground.
    fn ground_crawls(&self, from: Position) -> HashSet<Position>
    {
        hex::neighbours(from)
            .into_iter()
            .filter(|to| self.is_ground_movement(from, *to))
            .filter(|to| self.touches_hive(from, *to))
            .filter(|to| self.ensure_crawl(from, *to, false).is_ok())
            .collect()
    }

    /// One step in any direction, climbing on or off the hive.
    fn beetle(&self, from: Position) -> HashSet<Position>
    {
        hex::neighbours(from)
            .into_iter()
            .filter(|to| self.touches_hive(from, *to) || self.field.contains(*to))
            .filter(|to| self.ensure_crawl(from, *to, false).is_ok())
            .collect()
    }

    /// Straight jumps over at least one unit.
    fn hopper(&self, from: Position) -> HashSet<Position>
    {
        Direction::all()
            .into_iter()
            .filter(|direction| self.field.contains(from + *direction))
            .map(|direction| {
                let mut to = from + direction;
                while self.field.contains(to)
                {
                    to = to + direction;
                }
                to
            })
            .collect()
    }

    /// Two steps on top of the hive, then one down.
    fn ladybug(&self, from: Position) -> HashSet<Position>
    {
        self.field
            .neighbours(from)
            .into_iter()
            // Climb onto the hive.
            .filter(|onto| self.ensure_crawl(from, *onto, false).is_ok())
            .flat_map(|onto| self.field.neighbours(onto).into_iter().map(move |ontop| (onto, ontop)))
            // Walk across it without doubling back.
            .filter(|(_, ontop)| *ontop != from)
            .filter(|(onto, ontop)| self.ensure_crawl(*onto, *ontop, true).is_ok())
            .flat_map(|(onto, ontop)| hex::neighbours(ontop).into_iter().map(move |to| (onto, ontop, to)))
            // Drop down into an empty cell.
            .filter(|(onto, _, to)| *to != from && *to != *onto && !self.field.contains(*to))
            .filter(|(_, ontop, to)| self.ensure_crawl(*ontop, *to, true).is_ok())
            .map(|(.., to)| to)
            .collect()
    }

    /// Moves as any neighbouring class, or as a beetle while on top of the hive.
    fn mosquito(&self, from: Position) -> HashSet<Position>
    {
        if self.field.height(from).unwrap_or(0) > 1
        {
            return self.beetle(from);
        }

        self.classes_neighbouring(from)
            .into_iter()
            .filter(|class| *class != Class::Mosquito)
            .flat_map(|class| self.destinations_as(class, from))
            .collect()
    }
}
