use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use arrayvec::ArrayVec;

use crate::prelude::*;

mod generate;
mod history;
mod snapshot;
mod state;
mod zobrist;

pub use history::{Entry, History};
pub use snapshot::{GameSnapshot, Placement};
pub use state::GameStatus;
pub use zobrist::{ZobristKey, ZobristTable};

/// The units in one cell, bottom first.
pub type Stack = ArrayVec<Unit, { piece::consts::MAX_HEIGHT }>;

#[derive(Clone, Debug)]
/// The board and its rules: the position the search explores.
pub struct GameState
{
    /// Occupancy heights, kept alongside the stacks for graph computations.
    field: Field,

    /// Every movement played since the state was created.
    history: History,

    /// The unit moved or placed last, which the pillbug may not lift on the next turn.
    immune: Option<Unit>,

    /// The fingerprint of this position.
    key: ZobristKey,

    /// Where each unit stands, indexed by [`Unit::slot`].
    locations: [Option<Position>; piece::consts::COUNT],

    /// The options that apply to this game, such as its expansions and tournament settings.
    options: GameOptions,

    /// Ground-level positions whose unit cannot lift without splitting the hive.
    pinned: HashSet<Position>,

    /// The units that have not yet been placed.
    reserve: Reserve,

    stacks: HashMap<Position, Stack>,

    /// The ply at which this state was created, for states built from snapshots.
    start: u16,

    /// The unit lifted by a pillbug last turn, which may not act on this one.
    stunned: Option<Unit>,
}

impl PartialEq for GameState
{
    fn eq(&self, other: &Self) -> bool
    {
        self.ply() == other.ply()
            && self.options == other.options
            && self.immune == other.immune
            && self.stunned == other.stunned
            && self.stacks == other.stacks
    }
}

impl Eq for GameState {}

impl Default for GameState
{
    fn default() -> Self
    {
        GameState::new(GameOptions::default(), Arc::new(ZobristTable::default()))
    }
}

impl std::fmt::Display for GameState
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        write!(f, "GameState (ply {}, {} to move)", self.ply(), self.current_player())?;
        let mut positions = self.stacks.keys().copied().collect::<Vec<Position>>();
        positions.sort();
        for position in positions
        {
            let units = self.stacks[&position].iter().map(|u| u.to_string()).collect::<Vec<String>>();
            write!(f, "\n\t{}: {}", position, units.join(" "))?;
        }
        Ok(())
    }
}

impl GameState
{
    /// Creates an empty board whose fingerprints come from the given tables.
    pub fn new(options: GameOptions, hasher: Arc<ZobristTable>) -> GameState
    {
        GameState {
            field: Field::default(),
            history: History::default(),
            immune: None,
            key: ZobristKey::new(hasher, Player::White),
            locations: [None; piece::consts::COUNT],
            options,
            pinned: HashSet::new(),
            reserve: Reserve::new(options),
            stacks: HashMap::new(),
            start: 0,
            stunned: None,
        }
    }

    /// Plays a movement if it is legal, leaving the state untouched otherwise.
    pub fn apply(&mut self, movement: &Movement) -> Result<()>
    {
        self.check(movement)?;
        self.play_unchecked(movement);
        Ok(())
    }

    /// Ensures a movement is legal in the current position.
    pub fn check(&self, movement: &Movement) -> Result<()>
    {
        let available = self.available_moves();
        let legal = match movement
        {
            | Movement::Pass => available.is_empty(),
            | _ => available.contains(movement),
        };

        if legal
        {
            Ok(())
        }
        else
        {
            Err(Error::new(
                Kind::InvalidMove,
                format!("Movement '{}' is not legal for {} at ply {}.", movement, self.current_player(), self.ply()),
            ))
        }
    }

    /// The player who makes the next movement.
    pub fn current_player(&self) -> Player
    {
        if self.ply() % 2 == 0
        {
            Player::White
        }
        else
        {
            Player::Black
        }
    }

    /// Counts the unoccupied cells around a unit. Units off the board are fully exposed.
    pub fn exposed_faces(&self, unit: &Unit) -> u8
    {
        match self.location(unit)
        {
            | Some(at) => 6 - self.field.neighbours(at).len() as u8,
            | None => 6,
        }
    }

    pub fn field(&self) -> &Field
    {
        &self.field
    }

    /// The fingerprint of this position.
    pub fn fingerprint(&self) -> u64
    {
        self.key.get()
    }

    /// The tables behind this state's fingerprint.
    pub fn hasher(&self) -> &Arc<ZobristTable>
    {
        self.key.table()
    }

    pub fn history(&self) -> &History
    {
        &self.history
    }

    /// Whether the unit can move at all, judged as if its owner were to move.
    pub fn is_mobile(&self, unit: &Unit) -> bool
    {
        !self.moves_for(unit).is_empty()
    }

    /// Finds the queen of the given player, whether in play or still in reserve.
    pub fn locate_queen(&self, player: Player) -> Option<Unit>
    {
        let queen = Unit::queen(player);
        (self.location(&queen).is_some() || self.reserve.contains(&queen)).then_some(queen)
    }

    /// Returns the position the unit is on, if any.
    pub fn location(&self, unit: &Unit) -> Option<Position>
    {
        self.locations[unit.slot()]
    }

    /// The legal movements, with `Pass` standing in when nothing else is possible.
    pub fn legal_moves(&self) -> Vec<Movement>
    {
        let moves = self.available_moves();
        if moves.is_empty()
        {
            vec![Movement::Pass]
        }
        else
        {
            moves
        }
    }

    pub fn options(&self) -> GameOptions
    {
        self.options
    }

    /// The number of movements made since the start of the game.
    pub fn ply(&self) -> u16
    {
        self.start + self.history.len() as u16
    }

    pub fn reserve(&self) -> &Reserve
    {
        &self.reserve
    }

    /// The units stacked at a position, bottom first.
    pub fn stack(&self, at: Position) -> &[Unit]
    {
        self.stacks.get(&at).map(|stack| stack.as_slice()).unwrap_or(&[])
    }

    pub fn status(&self) -> GameStatus
    {
        if self.ply() == 0 && self.field.is_empty()
        {
            return GameStatus::NotStarted;
        }

        let surrounded = |player| {
            let queen = Unit::queen(player);
            self.location(&queen).is_some() && self.exposed_faces(&queen) == 0
        };

        match (surrounded(Player::White), surrounded(Player::Black))
        {
            | (false, false) => GameStatus::InProgress,
            | (false, true) => GameStatus::WhiteWins,
            | (true, false) => GameStatus::BlackWins,
            | (true, true) => GameStatus::Draw,
        }
    }

    /// Gets the unit visible at the top of the given stack.
    pub fn top(&self, at: Position) -> Option<Unit>
    {
        self.stacks.get(&at).and_then(|stack| stack.last()).copied()
    }

    /// Takes back the last movement.
    pub fn undo(&mut self) -> Result<()>
    {
        let Some(entry) = self.history.undo()
        else
        {
            return Err(Error::new(Kind::TooManyUndos, "No movement has been played on this state.".into()));
        };

        match (entry.movement, entry.from)
        {
            | (Movement::Place { unit, .. }, _) =>
            {
                self.remove_unchecked(&unit);
                self.reserve.put(unit);
            }
            | (Movement::Move { unit, .. }, Some(from)) | (Movement::Yoink { unit, .. }, Some(from)) =>
            {
                self.remove_unchecked(&unit);
                self.insert_unchecked(&unit, from);
            }
            | (Movement::Pass, _) =>
            {}
            | (movement, None) =>
            {
                return Err(Error::new(
                    Kind::InternalError,
                    format!("History entry for '{}' has no origin.", movement),
                ));
            }
        }

        self.immune = entry.prev_immune;
        self.stunned = entry.prev_stunned;
        self.pinned = self.field.find_pins();

        let current = self.current_player();
        self.key.pass(current.flip(), current);
        Ok(())
    }

    /// Gets all units of a player currently in play.
    pub fn units_in_play(&self, player: Player) -> Vec<Unit>
    {
        Unit::all()
            .filter(|unit| unit.owner == player && self.location(unit).is_some())
            .collect()
    }

    /// Plays a movement without checking it. Callers must only pass generated movements.
    pub fn play_unchecked(&mut self, movement: &Movement)
    {
        let mover = self.current_player();
        let mut entry = Entry {
            movement:     *movement,
            from:         None,
            prev_immune:  self.immune,
            prev_stunned: self.stunned,
        };

        match *movement
        {
            | Movement::Place { unit, at } =>
            {
                self.reserve.take(unit.owner, unit.class);
                self.insert_unchecked(&unit, at);
                self.immune = Some(unit);
                self.stunned = None;
            }
            | Movement::Move { unit, to } =>
            {
                entry.from = self.remove_unchecked(&unit);
                self.insert_unchecked(&unit, to);
                self.immune = Some(unit);
                self.stunned = None;
            }
            | Movement::Yoink { unit, to, .. } =>
            {
                entry.from = self.remove_unchecked(&unit);
                self.insert_unchecked(&unit, to);
                self.immune = Some(unit);
                self.stunned = Some(unit);
            }
            | Movement::Pass =>
            {
                self.immune = None;
                self.stunned = None;
            }
        }

        self.pinned = self.field.find_pins();
        self.history.play(entry);
        self.key.pass(mover, mover.flip());
    }
}

/// Private implementation for this board.
impl GameState
{
    /// Puts a unit on top of a stack and hashes it in.
    fn insert_unchecked(&mut self, unit: &Unit, at: Position)
    {
        let stack = self.stacks.entry(at).or_default();
        if stack.try_push(*unit).is_err()
        {
            log::error!("Stack at {} is full; dropping {}.", at, unit);
            return;
        }
        let height = stack.len() as u8;

        self.locations[unit.slot()] = Some(at);
        self.field.push(at);
        self.key.toggle(unit, at, height);
    }

    /// Lifts a unit off the top of its stack and hashes it out, returning where it stood.
    fn remove_unchecked(&mut self, unit: &Unit) -> Option<Position>
    {
        let at = self.locations[unit.slot()]?;
        let stack = self.stacks.get_mut(&at)?;
        let height = stack.len() as u8;
        stack.pop();
        if stack.is_empty()
        {
            self.stacks.remove(&at);
        }

        self.key.toggle(unit, at, height);
        self.locations[unit.slot()] = None;
        self.field.pop(at);
        Some(at)
    }

    /// Whether lifting the unit would split the hive.
    fn is_pinned(&self, unit: &Unit) -> bool
    {
        let Some(at) = self.location(unit)
        else
        {
            return false;
        };

        match self.stack(at)
        {
            | [only] => *only == *unit && self.pinned.contains(&at),
            | stack => stack.last() != Some(unit),
        }
    }

    /// Rebuilds a state from bottom-to-top placements. Validation happens in the snapshot.
    fn from_placements(options: GameOptions, hasher: Arc<ZobristTable>, ply: u16, placements: &[Placement]) -> GameState
    {
        let mut state = GameState::new(options, hasher);
        for placement in placements
        {
            state.reserve.take(placement.unit.owner, placement.unit.class);
            state.insert_unchecked(&placement.unit, placement.at);
        }

        state.start = ply;
        state.pinned = state.field.find_pins();
        state.key.pass(Player::White, state.current_player());
        state
    }
}
