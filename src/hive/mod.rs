pub mod board;
pub mod hex;
pub mod movement;
pub mod piece;

pub use board::{GameSnapshot, GameState, GameStatus, Placement, ZobristKey, ZobristTable};
pub use hex::{Direction, Field, Perimeter, Position};
pub use movement::Movement;
pub use piece::{Class, Player, Reserve, Unit};
