use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

mod direction;
mod field;

pub use direction::Direction;
pub use field::{Field, Perimeter};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
/// A cell on the unbounded hexagonal grid, in cube coordinates.
///
/// Every cell reachable from the origin satisfies `x + y + z == 0`. Stacking height is not part
/// of a position; it belongs to the board that holds the stack.
pub struct Position
{
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Position
{
    /// The cell of the first placement.
    pub const ORIGIN: Position = Position { x: 0, y: 0, z: 0 };

    pub const fn new(x: i32, y: i32, z: i32) -> Position
    {
        Position { x, y, z }
    }

    /// Whether this position lies on the cube plane.
    pub fn is_valid(&self) -> bool
    {
        self.x as i64 + self.y as i64 + self.z as i64 == 0
    }

    /// The largest absolute coordinate on any axis.
    pub fn magnitude(&self) -> u32
    {
        self.x.unsigned_abs().max(self.y.unsigned_abs()).max(self.z.unsigned_abs())
    }

    /// Whether the two positions share an edge.
    pub fn adjacent(&self, other: Position) -> bool
    {
        Direction::to(*self, other).is_some()
    }
}

impl std::fmt::Display for Position
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[inline]
/// Returns the two common neighbours between two adjacent positions, provided they are actually adjacent.
pub fn common_neighbours(a: Position, b: Position) -> Option<(Position, Position)>
{
    Direction::to(a, b).map(|direction| (a + direction.clockwise(), a + direction.counterclockwise()))
}

#[inline]
/// Gets the six neighbours of this position in clockwise order.
pub fn neighbours(p: Position) -> [Position; 6]
{
    Direction::all().map(|d| p + d)
}

impl Add<Direction> for Position
{
    type Output = Position;

    fn add(self, rhs: Direction) -> Self::Output
    {
        let (dx, dy, dz) = rhs.offset();
        Position::new(self.x + dx, self.y + dy, self.z + dz)
    }
}

impl Sub<Direction> for Position
{
    type Output = Position;

    fn sub(self, rhs: Direction) -> Self::Output
    {
        self + rhs.inverse()
    }
}
