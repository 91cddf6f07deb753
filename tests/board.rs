mod common;
use common::*;

#[cfg(test)]
mod board
{
    use std::collections::HashSet;

    use hive_explorer::prelude::*;

    use super::{templates::*, *};

    fn targets(moves: &[Movement]) -> HashSet<Position>
    {
        moves.iter().filter_map(Movement::target).collect()
    }

    #[test]
    fn first_ply_places_anything_but_the_queen_at_the_origin()
    {
        let _setup = setup::setup();
        let state = new_game();
        let moves = state.available_moves();

        assert_eq!(state.status(), GameStatus::NotStarted);
        assert!(!moves.is_empty());
        assert!(moves.iter().all(|mv| matches!(mv, Movement::Place { at, .. } if *at == Position::ORIGIN)));
        assert!(moves.iter().all(|mv| !mv.places_queen()));
    }

    #[test]
    fn queen_is_forced_by_the_fourth_turn()
    {
        let _setup = setup::setup();
        let mut state = new_game();
        play_all(&mut state, &queenless_opening());

        let moves = state.available_moves();
        assert!(!moves.is_empty());
        assert!(moves.iter().all(Movement::places_queen));
    }

    #[test]
    fn placements_avoid_enemy_units()
    {
        let _setup = setup::setup();
        let mut state = new_game();
        play_all(&mut state, &queenless_opening()[.. 2]);

        let enemy = at(0, 1, -1);
        for to in targets(&state.available_moves())
        {
            assert!(!to.adjacent(enemy), "{} touches the black ant", to);
        }
    }

    #[test]
    fn illegal_movements_are_rejected_without_changes()
    {
        let _setup = setup::setup();
        let mut state = new_game();
        play_all(&mut state, &queenless_opening()[.. 2]);
        let before = state.clone();

        let detached = place(W, Class::Spider, 1, at(5, -5, 0));
        assert_eq!(state.apply(&detached).map_err(|err| err.kind), Err(Kind::InvalidMove));
        assert_eq!(state.apply(&Movement::Pass).map_err(|err| err.kind), Err(Kind::InvalidMove));

        assert_eq!(state, before);
        assert_eq!(state.fingerprint(), before.fingerprint());
        assert_eq!(state.history().len(), 2);
    }

    #[test]
    fn undo_walks_back_through_history()
    {
        let _setup = setup::setup();
        let mut state = new_game();
        let empty = state.clone();
        play_all(&mut state, &queenless_opening());

        for _ in 0 .. 6
        {
            state.undo().expect("history to undo");
        }
        assert_eq!(state, empty);
        assert_eq!(state.fingerprint(), empty.fingerprint());
        assert_eq!(state.undo().map_err(|err| err.kind), Err(Kind::TooManyUndos));
    }

    #[test]
    fn queens_take_single_steps()
    {
        let _setup = setup::setup();
        let state = position(2, &[(W, Class::Queen, 1, at(0, 0, 0)), (B, Class::Queen, 1, at(1, -1, 0))]);

        let moves = state.moves_for(&Unit::queen(Player::White));
        assert_eq!(targets(&moves), HashSet::from([at(1, 0, -1), at(0, -1, 1)]));
    }

    #[test]
    fn spiders_walk_exactly_three_steps()
    {
        let _setup = setup::setup();
        let state = position(4, &[
            (W, Class::Queen, 1, at(0, 0, 0)),
            (B, Class::Queen, 1, at(1, -1, 0)),
            (W, Class::Spider, 1, at(-1, 1, 0)),
        ]);

        let moves = state.moves_for(&unit(W, Class::Spider, 1));
        assert_eq!(targets(&moves), HashSet::from([at(2, -1, -1), at(1, -2, 1)]));
    }

    #[test]
    fn beetles_climb()
    {
        let _setup = setup::setup();
        let state = position(4, &[
            (W, Class::Queen, 1, at(0, 0, 0)),
            (B, Class::Queen, 1, at(1, -1, 0)),
            (W, Class::Beetle, 1, at(-1, 1, 0)),
        ]);

        let moves = state.moves_for(&unit(W, Class::Beetle, 1));
        assert!(targets(&moves).contains(&at(0, 0, 0)));
    }

    #[test]
    fn hoppers_jump_the_whole_line_and_pinned_units_stay()
    {
        let _setup = setup::setup();
        let state = open_midgame();

        let jumps = state.moves_for(&unit(W, Class::Hopper, 1));
        assert_eq!(targets(&jumps), HashSet::from([at(6, -6, 0)]));

        assert!(state.moves_for(&unit(W, Class::Ant, 2)).is_empty());
        assert!(!state.is_mobile(&Unit::queen(Player::White)));
    }

    #[test]
    fn units_wait_for_their_queen()
    {
        let _setup = setup::setup();
        let mut state = new_game();
        play_all(&mut state, &queenless_opening()[.. 4]);

        assert!(state.moves_for(&unit(W, Class::Ant, 1)).is_empty());
        assert!(state.available_moves().iter().all(|mv| matches!(mv, Movement::Place { .. })));
    }

    #[test]
    fn surrounded_queens_end_the_game()
    {
        let _setup = setup::setup();
        assert_eq!(surrounded_white_queen().status(), GameStatus::BlackWins);
        assert_eq!(surrounded_black_queen().status(), GameStatus::WhiteWins);
        assert_eq!(both_queens_surrounded(10).status(), GameStatus::Draw);
        assert_eq!(open_midgame().status(), GameStatus::InProgress);
    }

    #[test]
    fn movements_read_and_write_json()
    {
        let _setup = setup::setup();

        let raw = r#"{"movementType":"place","unit":{"class":"ant","owner":"white","index":1},"at":{"x":0,"y":0,"z":0}}"#;
        let movement = raw.parse::<Movement>().expect("valid movement");
        assert_eq!(movement, place(W, Class::Ant, 1, at(0, 0, 0)));

        let yoink = Movement::Yoink {
            pill_bug: unit(B, Class::PillBug, 1),
            unit:     unit(W, Class::Queen, 1),
            to:       at(2, -1, -1),
        };
        let encoded = serde_json::to_string(&yoink).expect("encodes");
        assert!(encoded.contains(r#""movementType":"yoink""#));
        assert!(encoded.contains(r#""pillBug""#));
        assert_eq!(encoded.parse::<Movement>().ok(), Some(yoink));

        let pass = serde_json::to_string(&Movement::Pass).expect("encodes");
        assert_eq!(pass, r#"{"movementType":"pass"}"#);
    }

    #[test]
    fn malformed_movements_are_rejected()
    {
        let _setup = setup::setup();
        for raw in [r#"{"movementType":"teleport"}"#, "{", r#"{"movementType":"place","unit":{"class":"ant"}}"#, ""]
        {
            let parsed = raw.parse::<Movement>();
            assert_eq!(parsed.map_err(|err| err.kind), Err(Kind::MalformedInput), "{}", raw);
        }
    }

    #[test]
    fn snapshots_are_validated()
    {
        let _setup = setup::setup();
        let hasher = std::sync::Arc::new(ZobristTable::new(Some(1)));
        let check = |placements: Vec<(Player, Class, u8, Position)>| {
            let snapshot = GameSnapshot {
                options: GameOptions::default(),
                ply: 4,
                placements: placements
                    .into_iter()
                    .map(|(owner, class, index, at)| Placement { unit: unit(owner, class, index), at })
                    .collect(),
            };
            GameState::from_snapshot(&snapshot, hasher.clone()).map(|_| ()).map_err(|err| err.kind)
        };

        assert_eq!(check(vec![(W, Class::Queen, 1, at(0, 0, 0)), (B, Class::Queen, 1, at(0, 1, -1))]), Ok(()));
        assert_eq!(check(vec![(W, Class::Queen, 1, at(0, 0, 1))]), Err(Kind::MalformedInput));
        assert_eq!(
            check(vec![(W, Class::Queen, 1, at(0, 0, 0)), (W, Class::Queen, 1, at(0, 1, -1))]),
            Err(Kind::MalformedInput)
        );
        assert_eq!(check(vec![(W, Class::Ant, 4, at(0, 0, 0))]), Err(Kind::MalformedInput));
        assert_eq!(check(vec![(W, Class::Ant, 2, at(0, 0, 0))]), Err(Kind::MalformedInput));
        assert_eq!(
            check(vec![(W, Class::Queen, 1, at(0, 0, 0)), (B, Class::Queen, 1, at(3, -3, 0))]),
            Err(Kind::MalformedInput)
        );

        let tower = vec![
            (W, Class::Queen, 1, at(0, 0, 0)),
            (W, Class::Beetle, 1, at(0, 0, 0)),
            (W, Class::Beetle, 2, at(0, 0, 0)),
            (B, Class::Beetle, 1, at(0, 0, 0)),
            (B, Class::Beetle, 2, at(0, 0, 0)),
            (W, Class::Mosquito, 1, at(0, 0, 0)),
            (B, Class::Mosquito, 1, at(0, 0, 0)),
            (W, Class::Ant, 1, at(0, 0, 0)),
        ];
        assert_eq!(check(tower), Err(Kind::MalformedInput));
    }

    #[test]
    fn snapshots_read_json_without_options()
    {
        let _setup = setup::setup();
        let raw = r#"{"ply":1,"placements":[{"unit":{"class":"spider","owner":"white","index":1},"at":{"x":0,"y":0,"z":0}}]}"#;
        let snapshot: GameSnapshot = serde_json::from_str(raw).expect("valid snapshot");
        let state = GameState::try_from(snapshot).expect("valid position");

        assert_eq!(state.current_player(), Player::Black);
        assert_eq!(state.top(Position::ORIGIN), Some(unit(W, Class::Spider, 1)));
        assert_eq!(state.reserve().peek(Player::White, Class::Spider), Some(2));
    }
}
