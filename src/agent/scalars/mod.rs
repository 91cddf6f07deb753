pub mod scores;

pub use scores::consts::*;

/// The deepest the search will ever go, and the longest line it will ever report.
pub const MAXIMUM_PLY: usize = 64;
