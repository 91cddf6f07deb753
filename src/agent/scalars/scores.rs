use crate::prelude::*;

pub mod consts
{
    use super::*;

    /// Larger than any score, so that it can bound a window.
    pub const INF: i64 = i32::MAX as i64 + 1;

    /// The score of a win on the current ply.
    pub const WIN: i64 = i32::MAX as i64;

    /// Every win found within the search horizon scores at least this much.
    pub const MINIMUM_WIN: i64 = WIN - scalars::MAXIMUM_PLY as i64;

    /// The score of being left without a move, just above a loss at any depth.
    pub const SHUT_OUT: i64 = -(MINIMUM_WIN - 1);
}

pub use consts::*;

/// Lifts an evaluator score into the search's score space, embedding the ply into wins and losses.
///
/// Faster wins score higher than slower ones, and slower losses higher than faster ones.
pub fn normalize(score: i32, ply: usize) -> i64
{
    let ply = ply.min(scalars::MAXIMUM_PLY) as i64;
    match score
    {
        | i32::MAX => WIN - ply,
        | i32::MIN => -(WIN - ply),
        | s if s == i32::MIN + 1 => SHUT_OUT,
        | s => s as i64,
    }
}

/// Brings a search score back to the evaluator's scale, dropping the ply.
pub fn reconstruct(score: i64) -> i32
{
    if score >= MINIMUM_WIN
    {
        i32::MAX
    }
    else if score <= -MINIMUM_WIN
    {
        i32::MIN
    }
    else if score == SHUT_OUT
    {
        i32::MIN + 1
    }
    else
    {
        score.clamp(i32::MIN as i64 + 2, i32::MAX as i64 - 1) as i32
    }
}
