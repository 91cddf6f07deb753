use std::sync::Arc;

use hive_explorer::prelude::*;

pub const W: Player = Player::White;
pub const B: Player = Player::Black;

/// Shorthand for a position.
pub fn at(x: i32, y: i32, z: i32) -> Position
{
    Position::new(x, y, z)
}

/// Shorthand for a unit.
pub fn unit(owner: Player, class: Class, index: u8) -> Unit
{
    Unit::new(class, owner, index)
}

pub fn place(owner: Player, class: Class, index: u8, target: Position) -> Movement
{
    Movement::Place {
        unit: unit(owner, class, index),
        at:   target,
    }
}

/// Builds a validated position from `(owner, class, index, position)` tuples, bottom to top.
pub fn position(ply: u16, placements: &[(Player, Class, u8, Position)]) -> GameState
{
    let snapshot = GameSnapshot {
        options:    GameOptions::default(),
        ply,
        placements: placements
            .iter()
            .map(|(owner, class, index, at)| Placement {
                unit: unit(*owner, *class, *index),
                at:   *at,
            })
            .collect(),
    };

    match GameState::from_snapshot(&snapshot, Arc::new(ZobristTable::new(Some(11))))
    {
        | Ok(state) => state,
        | Err(err) => panic!("bad template position: {}", err),
    }
}

/// Plays each movement through the legality checks, panicking on the first illegal one.
pub fn play_all(state: &mut GameState, moves: &[Movement])
{
    for mv in moves
    {
        if let Err(err) = state.apply(mv)
        {
            panic!("{} was rejected at ply {}: {}", mv, state.ply(), err);
        }
    }
}

/// A fresh game hashed with a fixed seed.
pub fn new_game() -> GameState
{
    GameState::new(GameOptions::default(), Arc::new(ZobristTable::new(Some(11))))
}

/// White's queen at the origin with all six neighbours filled; white to move.
pub fn surrounded_white_queen() -> GameState
{
    position(12, &[
        (W, Class::Queen, 1, at(0, 0, 0)),
        (B, Class::Ant, 1, at(0, 1, -1)),
        (B, Class::Ant, 2, at(1, 0, -1)),
        (B, Class::Ant, 3, at(1, -1, 0)),
        (B, Class::Beetle, 1, at(0, -1, 1)),
        (B, Class::Hopper, 1, at(-1, 0, 1)),
        (W, Class::Ant, 1, at(-1, 1, 0)),
    ])
}

/// Black's queen at the origin with all six neighbours filled; white to move.
pub fn surrounded_black_queen() -> GameState
{
    position(12, &[
        (B, Class::Queen, 1, at(0, 0, 0)),
        (W, Class::Ant, 1, at(0, 1, -1)),
        (W, Class::Ant, 2, at(1, 0, -1)),
        (W, Class::Ant, 3, at(1, -1, 0)),
        (W, Class::Beetle, 1, at(0, -1, 1)),
        (W, Class::Hopper, 1, at(-1, 0, 1)),
        (B, Class::Ant, 1, at(-1, 1, 0)),
    ])
}

/// Both queens side by side and fully surrounded.
pub fn both_queens_surrounded(ply: u16) -> GameState
{
    position(ply, &[
        (W, Class::Queen, 1, at(0, 0, 0)),
        (B, Class::Queen, 1, at(1, -1, 0)),
        (W, Class::Ant, 1, at(0, 1, -1)),
        (W, Class::Ant, 2, at(1, 0, -1)),
        (W, Class::Ant, 3, at(0, -1, 1)),
        (W, Class::Hopper, 1, at(-1, 0, 1)),
        (B, Class::Ant, 1, at(-1, 1, 0)),
        (B, Class::Ant, 2, at(2, -1, -1)),
        (B, Class::Ant, 3, at(2, -2, 0)),
        (B, Class::Hopper, 1, at(1, -2, 1)),
    ])
}

/// A long line of queens, ants and hoppers with plenty of movements for either side; white to move.
pub fn open_midgame() -> GameState
{
    position(10, &[
        (W, Class::Queen, 1, at(0, 0, 0)),
        (B, Class::Queen, 1, at(1, -1, 0)),
        (W, Class::Ant, 1, at(-1, 1, 0)),
        (B, Class::Ant, 1, at(2, -2, 0)),
        (W, Class::Ant, 2, at(-2, 2, 0)),
        (B, Class::Ant, 2, at(3, -3, 0)),
        (W, Class::Ant, 3, at(-3, 3, 0)),
        (B, Class::Ant, 3, at(4, -4, 0)),
        (W, Class::Hopper, 1, at(-4, 4, 0)),
        (B, Class::Hopper, 1, at(5, -5, 0)),
    ])
}

/// Six placements that keep both queens in reserve.
pub fn queenless_opening() -> Vec<Movement>
{
    vec![
        place(W, Class::Ant, 1, at(0, 0, 0)),
        place(B, Class::Ant, 1, at(0, 1, -1)),
        place(W, Class::Ant, 2, at(0, -1, 1)),
        place(B, Class::Ant, 2, at(0, 2, -2)),
        place(W, Class::Ant, 3, at(0, -2, 2)),
        place(B, Class::Ant, 3, at(0, 3, -3)),
    ]
}

/// A complete game tree of fixed shape whose leaves carry pseudo-random scores.
#[derive(Clone, Debug)]
pub struct TreeGame
{
    pub branching: usize,
    pub height:    usize,
    pub path:      Vec<usize>,
    pub salt:      u64,
}

impl TreeGame
{
    pub fn new(branching: usize, height: usize, salt: u64) -> TreeGame
    {
        TreeGame {
            branching,
            height,
            path: Vec::new(),
            salt,
        }
    }
}

impl Game for TreeGame
{
    type Move = usize;

    fn available_moves(&self) -> Vec<usize>
    {
        if self.path.len() < self.height
        {
            (0 .. self.branching).collect()
        }
        else
        {
            Vec::new()
        }
    }

    fn current_player(&self) -> Player
    {
        if self.path.len() % 2 == 0
        {
            Player::White
        }
        else
        {
            Player::Black
        }
    }

    fn fingerprint(&self) -> u64
    {
        let radix = self.branching as u64 + 1;
        self.path.iter().fold(1u64, |acc, mv| acc.wrapping_mul(radix).wrapping_add(*mv as u64 + 1))
    }

    fn is_terminal(&self) -> bool
    {
        false
    }

    fn locate_queen(&self, player: Player) -> Option<Unit>
    {
        Some(Unit::queen(player))
    }

    fn play(&mut self, mv: &usize)
    {
        self.path.push(*mv);
    }

    fn unplay(&mut self)
    {
        self.path.pop();
    }
}

/// Scores tree nodes from white's point of view, flipped for the side to move.
#[derive(Clone, Copy, Debug, Default)]
pub struct TreeEvaluator;

impl TreeEvaluator
{
    /// A deterministic score in -1000..=1000 for white.
    pub fn white_score(game: &TreeGame) -> i32
    {
        let mut v = game.fingerprint() ^ game.salt.rotate_left(17);
        v = (v ^ (v >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
        v = (v ^ (v >> 27)).wrapping_mul(0x94d049bb133111eb);
        v ^= v >> 31;
        (v % 2001) as i32 - 1000
    }
}

impl Evaluator<TreeGame> for TreeEvaluator
{
    fn evaluate(&self, state: &TreeGame, _support: &GameStateSupport) -> i32
    {
        let score = TreeEvaluator::white_score(state);
        match state.current_player()
        {
            | Player::White => score,
            | Player::Black => -score,
        }
    }

    fn evaluate_move(&self, state: &TreeGame, mv: &usize) -> i32
    {
        ((state.salt as usize + *mv * 7) % 5) as i32
    }
}

/// Plain negamax without pruning, the yardstick for the pruned search.
pub fn full_width(game: &mut TreeGame, depth: u8) -> i64
{
    let moves = game.available_moves();
    if depth == 0 || moves.is_empty()
    {
        let support = GameStateSupport {
            player:      Player::White,
            white_queen: Unit::queen(Player::White),
            black_queen: Unit::queen(Player::Black),
        };
        return TreeEvaluator.evaluate(game, &support) as i64;
    }

    let mut best = i64::MIN;
    for mv in moves
    {
        game.play(&mv);
        let score = -full_width(game, depth - 1);
        game.unplay();
        best = best.max(score);
    }
    best
}
