mod common;
use common::*;

#[cfg(test)]
mod cli
{
    use std::io::Cursor;

    use hive_explorer::{cli::replies, prelude::*};

    use super::{templates::*, *};

    fn reply(cli: &mut CommandLine, line: &str) -> String
    {
        match cli.handle(line)
        {
            | Ok(Some(reply)) => reply,
            | Ok(None) => String::new(),
            | Err(err) => panic!("fatal error for '{}': {}", line, err),
        }
    }

    #[test]
    fn basic_commands_answer()
    {
        let _setup = setup::setup();
        let mut cli = CommandLine::new(setup::engine_options(10.0, Some(1)));

        assert_eq!(reply(&mut cli, "ready"), replies::SUCCESS);
        assert_eq!(reply(&mut cli, "   "), "");
        assert_eq!(reply(&mut cli, "dance"), replies::INVALID);
        assert_eq!(reply(&mut cli, "new maybe"), replies::INVALID);
        assert_eq!(reply(&mut cli, "new false 0"), replies::INVALID);
    }

    #[test]
    fn a_short_game_round_trips_through_json()
    {
        let _setup = setup::setup();
        let mut cli = CommandLine::new(setup::engine_options(10.0, Some(1)));

        assert_eq!(reply(&mut cli, "new false 5"), replies::SUCCESS);
        assert_eq!(cli.engine().player(), Player::Black);

        let opening = serde_json::to_string(&place(W, Class::Spider, 1, at(0, 0, 0))).expect("encodes");
        assert_eq!(reply(&mut cli, &format!("move {}", opening)), replies::SUCCESS);
        assert_eq!(reply(&mut cli, &format!("m {}", opening)), replies::FAILED);
        assert_eq!(reply(&mut cli, "move {\"movementType\":"), replies::INVALID);
        assert_eq!(reply(&mut cli, "move"), replies::INVALID);

        let answer = reply(&mut cli, "play depth 1");
        let movement = answer.parse::<Movement>().expect("play answers with a movement");
        assert!(matches!(movement, Movement::Place { unit, .. } if unit.owner == Player::Black));
        assert_eq!(cli.engine().state().ply(), 2);

        assert_eq!(reply(&mut cli, "play depth 99"), replies::INVALID);
        assert_eq!(reply(&mut cli, "play time 5s"), replies::INVALID);
    }

    #[test]
    fn positions_replace_the_game()
    {
        let _setup = setup::setup();
        let mut cli = CommandLine::new(setup::engine_options(10.0, Some(1)));

        let snapshot = GameSnapshot::from(&open_midgame());
        let json = serde_json::to_string(&snapshot).expect("encodes");
        assert_eq!(reply(&mut cli, &format!("position {}", json)), replies::SUCCESS);
        assert_eq!(*cli.engine().state(), open_midgame());

        assert_eq!(reply(&mut cli, "position {\"ply\":"), replies::INVALID);

        let split = r#"position {"ply":2,"placements":[{"unit":{"class":"queen","owner":"white","index":1},"at":{"x":0,"y":0,"z":0}},{"unit":{"class":"queen","owner":"black","index":1},"at":{"x":4,"y":-4,"z":0}}]}"#;
        assert_eq!(reply(&mut cli, split), replies::INVALID);
        assert_eq!(*cli.engine().state(), open_midgame());

        assert_eq!(reply(&mut cli, "quit"), replies::SUCCESS);
        assert_eq!(cli.engine().state().ply(), 0);
    }

    #[test]
    fn finished_games_fail_to_play()
    {
        let _setup = setup::setup();
        let mut cli = CommandLine::new(setup::engine_options(10.0, Some(1)));

        let json = serde_json::to_string(&GameSnapshot::from(&surrounded_white_queen())).expect("encodes");
        assert_eq!(reply(&mut cli, &format!("position {}", json)), replies::SUCCESS);
        assert_eq!(reply(&mut cli, "play"), replies::FAILED);
    }

    #[test]
    fn run_stops_at_exit()
    {
        let _setup = setup::setup();
        let mut cli = CommandLine::new(setup::engine_options(10.0, Some(1)));

        let input = Cursor::new("ready\nnew true 1\n\nplay depth 1\nexit\nready\n");
        let mut output = Vec::new();
        cli.run(input, &mut output).expect("clean exit");

        let output = String::from_utf8(output).expect("utf-8 output");
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], replies::SUCCESS);
        assert_eq!(lines[1], replies::SUCCESS);
        assert!(lines[2].parse::<Movement>().is_ok());
        assert_eq!(lines[3], replies::SUCCESS);
    }
}
