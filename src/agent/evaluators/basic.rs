use crate::prelude::*;

#[derive(Clone, Copy, Debug, Default)]
/// Material evaluation weighted by how surrounded the opponent's queen is.
pub struct BasicEvaluator;

impl BasicEvaluator
{
    /// The worth of a unit in play: nothing for a queen during the first two plies, half when it cannot move.
    pub fn contextual_value(state: &GameState, unit: &Unit) -> i32
    {
        if unit.class == Class::Queen && state.ply() <= 1
        {
            return 0;
        }

        let value = unit.class.base_value();
        if state.is_mobile(unit)
        {
            value
        }
        else
        {
            value / 2
        }
    }
}

impl Evaluator<GameState> for BasicEvaluator
{
    fn evaluate(&self, state: &GameState, support: &GameStateSupport) -> i32
    {
        let player = state.current_player();
        let opponent = player.flip();

        // Losing is checked before winning, so a position with both queens surrounded is a loss.
        if state.exposed_faces(&support.queen(player)) == 0
        {
            return i32::MIN;
        }

        let opponent_exposed = state.exposed_faces(&support.queen(opponent));
        if opponent_exposed == 0
        {
            return i32::MAX;
        }

        // Don't let the opponent shut us out.
        if state.available_moves().is_empty()
        {
            return i32::MIN + 1;
        }

        let ours: i32 = state.units_in_play(player).iter().map(|u| Self::contextual_value(state, u)).sum();
        let theirs: i32 = state.units_in_play(opponent).iter().map(|u| Self::contextual_value(state, u)).sum();

        (ours - theirs) * (6 - opponent_exposed as i32)
    }

    fn evaluate_move(&self, _state: &GameState, mv: &Movement) -> i32
    {
        mv.unit().map(|unit| unit.class.base_value()).unwrap_or(0)
    }
}
