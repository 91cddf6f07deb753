use super::Position;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// A direction on a hexagonal grid.
pub enum Direction
{
    North,
    Northeast,
    Southeast,
    South,
    Southwest,
    Northwest,
}

impl Direction
{
    #[inline]
    /// Returns a list of all directions in clockwise order.
    pub const fn all() -> [Direction; 6]
    {
        [Self::North, Self::Northeast, Self::Southeast, Self::South, Self::Southwest, Self::Northwest]
    }

    /// Returns the direction clockwise of this one.
    pub fn clockwise(&self) -> Direction
    {
        match self
        {
            | Self::North => Self::Northeast,
            | Self::Northeast => Self::Southeast,
            | Self::Southeast => Self::South,
            | Self::South => Self::Southwest,
            | Self::Southwest => Self::Northwest,
            | Self::Northwest => Self::North,
        }
    }

    /// Returns the direction counterclockwise to this one.
    pub fn counterclockwise(&self) -> Direction
    {
        match self
        {
            | Self::North => Self::Northwest,
            | Self::Northwest => Self::Southwest,
            | Self::Southwest => Self::South,
            | Self::South => Self::Southeast,
            | Self::Southeast => Self::Northeast,
            | Self::Northeast => Self::North,
        }
    }

    /// Returns the inverse of this direction.
    pub fn inverse(&self) -> Direction
    {
        match self
        {
            | Self::North => Self::South,
            | Self::Northeast => Self::Southwest,
            | Self::Southeast => Self::Northwest,
            | Self::South => Self::North,
            | Self::Southwest => Self::Northeast,
            | Self::Northwest => Self::Southeast,
        }
    }

    /// The cube offset of a single step in this direction.
    pub const fn offset(&self) -> (i32, i32, i32)
    {
        match self
        {
            | Self::North => (0, 1, -1),
            | Self::Northeast => (1, 0, -1),
            | Self::Southeast => (1, -1, 0),
            | Self::South => (0, -1, 1),
            | Self::Southwest => (-1, 0, 1),
            | Self::Northwest => (-1, 1, 0),
        }
    }

    #[inline]
    /// If the two positions are neighbours, returns the direction to the target.
    pub fn to(from: Position, to: Position) -> Option<Direction>
    {
        Direction::all().into_iter().find(|direction| (from + *direction) == to)
    }
}

impl std::fmt::Display for Direction
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        let name = match self
        {
            | Self::North => "north",
            | Self::Northeast => "northeast",
            | Self::Southeast => "southeast",
            | Self::South => "south",
            | Self::Southwest => "southwest",
            | Self::Northwest => "northwest",
        };
        write!(f, "{name}")
    }
}
