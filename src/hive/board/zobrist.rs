use std::{
    collections::BTreeMap,
    fmt::Write as _,
    fs,
    path::Path,
    sync::Arc,
};

use parking_lot::RwLock;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::prelude::*;

/// Stack heights are 1-based; anything above this cannot occur.
const HEIGHTS: u8 = piece::consts::MAX_HEIGHT as u8;

/// The first coordinate limit when the tables start out empty.
const INITIAL_LIMIT: i32 = 4;

/// Random tables behind every fingerprint.
///
/// Each axis value, class and player owns one random number. The number for a
/// `(position, height, unit)` triple mixes the contributions of its coordinates, class,
/// owner and height, so the board can grow without bound while only the axes are stored.
pub struct ZobristTable
{
    tables: RwLock<Tables>,
}

struct Tables
{
    /// Axis values strictly inside `(-limit, limit)` are covered.
    limit:   i32,
    x:       BTreeMap<i32, u64>,
    y:       BTreeMap<i32, u64>,
    z:       BTreeMap<i32, u64>,
    classes: [u64; 8],
    players: [u64; 2],
    rng:     StdRng,
}

impl Default for ZobristTable
{
    fn default() -> Self
    {
        ZobristTable::new(None)
    }
}

impl std::fmt::Debug for ZobristTable
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        write!(f, "ZobristTable(limit = {})", self.limit())
    }
}

impl ZobristTable
{
    /// Creates fresh tables, reproducible when seeded.
    pub fn new(seed: Option<u64>) -> ZobristTable
    {
        let mut rng = match seed
        {
            | Some(seed) => StdRng::seed_from_u64(seed),
            | None => StdRng::from_entropy(),
        };

        let classes = [(); 8].map(|_| rng.gen::<u64>());
        let players = [(); 2].map(|_| rng.gen::<u64>());

        let mut tables = Tables {
            limit: 0,
            x: BTreeMap::new(),
            y: BTreeMap::new(),
            z: BTreeMap::new(),
            classes,
            players,
            rng,
        };
        tables.extend();

        ZobristTable {
            tables: RwLock::new(tables),
        }
    }

    /// The current coordinate limit.
    pub fn limit(&self) -> i32
    {
        self.tables.read().limit
    }

    /// The random number for a player to move.
    pub fn player(&self, player: Player) -> u64
    {
        self.tables.read().players[player as usize]
    }

    /// The random number for a unit standing at a position and height, growing the tables when needed.
    pub fn unit(&self, unit: &Unit, at: Position, height: u8) -> u64
    {
        loop
        {
            let found = self.tables.read().lookup(unit, at, height);
            if let Some(value) = found
            {
                return value;
            }

            let mut tables = self.tables.write();
            while !tables.covers(at)
            {
                tables.extend();
            }
        }
    }

    /// Reads tables previously written by [`ZobristTable::save`].
    pub fn load(path: &Path, seed: Option<u64>) -> Result<ZobristTable>
    {
        let base = Error::new(Kind::CacheIoError, format!("Could not load hash tables from {}.", path.display()));
        let contents = fs::read_to_string(path).map_err(|err| Error::from(err).chain(base.clone()))?;
        let tables = Tables::parse(&contents, seed).map_err(|err| err.chain(base))?;

        log::debug!("Loaded hash tables with coordinate limit {}.", tables.limit);
        Ok(ZobristTable {
            tables: RwLock::new(tables),
        })
    }

    /// Writes the tables so fingerprints stay meaningful across restarts.
    pub fn save(&self, path: &Path) -> Result<()>
    {
        let base = Error::new(Kind::CacheIoError, format!("Could not save hash tables to {}.", path.display()));
        let contents = self.tables.read().render();

        let temporary = path.with_extension("tmp");
        fs::write(&temporary, contents)
            .and_then(|_| fs::rename(&temporary, path))
            .map_err(|err| Error::from(err).chain(base))
    }
}

impl Tables
{
    fn covers(&self, at: Position) -> bool
    {
        at.magnitude() < self.limit as u32
    }

    /// Doubles the covered range, keeping every value already assigned.
    fn extend(&mut self)
    {
        let original = self.limit;
        self.limit = if self.limit == 0 { INITIAL_LIMIT } else { self.limit } * 2;

        let limit = self.limit;
        let rng = &mut self.rng;
        for axis in [&mut self.x, &mut self.y, &mut self.z]
        {
            for value in (1 - limit) .. limit
            {
                axis.entry(value).or_insert_with(|| rng.gen::<u64>());
            }
        }

        log::trace!("Extended hash tables from limit {} to {}.", original, self.limit);
    }

    fn lookup(&self, unit: &Unit, at: Position, height: u8) -> Option<u64>
    {
        let x = self.x.get(&at.x)?;
        let y = self.y.get(&at.y)?;
        let z = self.z.get(&at.z)?;

        let height = height.min(HEIGHTS) as u64;
        let seed = x
            ^ y.rotate_left(21)
            ^ z.rotate_left(42)
            ^ self.classes[unit.class as usize]
            ^ self.players[unit.owner as usize].rotate_left(13)
            ^ height.wrapping_mul(0x9E37_79B9_7F4A_7C15);

        Some(mix(seed))
    }

    fn render(&self) -> String
    {
        let mut out = format!("{}\n", self.limit);
        for (tag, axis) in [("x", &self.x), ("y", &self.y), ("z", &self.z)]
        {
            for (value, random) in axis
            {
                let _ = writeln!(out, "{}={} {}", tag, value, random);
            }
        }
        for class in Class::all()
        {
            let _ = writeln!(out, "u={} {}", class.long(), self.classes[class as usize]);
        }
        for player in Player::all()
        {
            let _ = writeln!(out, "p={} {}", player, self.players[player as usize]);
        }
        out
    }

    fn parse(contents: &str, seed: Option<u64>) -> Result<Tables>
    {
        let mut lines = contents.lines().filter(|line| !line.trim().is_empty());

        let header = lines.next().unwrap_or_default();
        let limit = header
            .trim()
            .parse::<i32>()
            .ok()
            .filter(|limit| *limit > 0)
            .ok_or_else(|| Error::new(Kind::ParseError, format!("'{}' is not a coordinate limit.", header)))?;

        let mut x = BTreeMap::new();
        let mut y = BTreeMap::new();
        let mut z = BTreeMap::new();
        let mut classes: [Option<u64>; 8] = [None; 8];
        let mut players: [Option<u64>; 2] = [None; 2];

        for line in lines
        {
            let malformed = || Error::new(Kind::ParseError, format!("Malformed hash table line '{}'.", line));

            let (tag, rest) = line.split_once('=').ok_or_else(malformed)?;
            let (name, random) = rest.trim().split_once(' ').ok_or_else(malformed)?;
            let random = random.trim().parse::<u64>().map_err(|_| malformed())?;

            match tag
            {
                | "x" | "y" | "z" =>
                {
                    let value = name.parse::<i32>().map_err(|_| malformed())?;
                    let axis = match tag
                    {
                        | "x" => &mut x,
                        | "y" => &mut y,
                        | _ => &mut z,
                    };
                    axis.insert(value, random);
                }
                | "u" => classes[name.parse::<Class>()? as usize] = Some(random),
                | "p" => players[name.parse::<Player>()? as usize] = Some(random),
                | _ => return Err(malformed()),
            }
        }

        let incomplete = |what: &str| Error::new(Kind::ParseError, format!("Hash tables are missing {}.", what));

        for (tag, axis) in [("x", &x), ("y", &y), ("z", &z)]
        {
            if ((1 - limit) .. limit).any(|value| !axis.contains_key(&value))
            {
                return Err(incomplete(&format!("values on the {} axis", tag)));
            }
        }

        let Some(classes) = classes.into_iter().collect::<Option<Vec<u64>>>()
        else
        {
            return Err(incomplete("class values"));
        };
        let Some(players) = players.into_iter().collect::<Option<Vec<u64>>>()
        else
        {
            return Err(incomplete("player values"));
        };

        let rng = match seed
        {
            | Some(seed) => StdRng::seed_from_u64(seed ^ limit as u64),
            | None => StdRng::from_entropy(),
        };

        Ok(Tables {
            limit,
            x,
            y,
            z,
            classes: std::array::from_fn(|i| classes[i]),
            players: [players[0], players[1]],
            rng,
        })
    }
}

/// A 64-bit finalizer that spreads every input bit over the output.
fn mix(mut v: u64) -> u64
{
    v ^= v >> 30;
    v = v.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    v ^= v >> 27;
    v = v.wrapping_mul(0x94D0_49BB_1331_11EB);
    v ^ (v >> 31)
}

#[derive(Clone)]
/// The incrementally maintained fingerprint of one game state.
pub struct ZobristKey
{
    value: u64,
    table: Arc<ZobristTable>,
}

impl std::fmt::Debug for ZobristKey
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
    {
        write!(f, "ZobristKey({:#018x})", self.value)
    }
}

impl ZobristKey
{
    /// The key of an empty board with the given player to move.
    pub fn new(table: Arc<ZobristTable>, to_move: Player) -> ZobristKey
    {
        let value = table.player(to_move);
        ZobristKey { value, table }
    }

    pub fn get(&self) -> u64
    {
        self.value
    }

    pub fn table(&self) -> &Arc<ZobristTable>
    {
        &self.table
    }

    /// Hashes a unit into or out of a position at a height. The operation is its own inverse.
    pub fn toggle(&mut self, unit: &Unit, at: Position, height: u8) -> &mut Self
    {
        self.value ^= self.table.unit(unit, at, height);
        self
    }

    /// Hands the move from one player to another. The operation is its own inverse.
    pub fn pass(&mut self, from: Player, to: Player) -> &mut Self
    {
        self.value ^= self.table.player(from) ^ self.table.player(to);
        self
    }
}
