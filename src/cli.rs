use std::io::{BufRead, Write};

use crate::prelude::*;

/// Replies understood by whoever drives the engine.
pub mod replies
{
    pub const SUCCESS: &str = "SUCCESS";
    pub const FAILED: &str = "FAILED";
    pub const INVALID: &str = "INVALID";
}

/// A line-oriented command loop in front of an [`Engine`].
pub struct CommandLine
{
    engine:  Engine,
    running: bool,
}

impl CommandLine
{
    pub fn new(options: EngineOptions) -> Self
    {
        CommandLine {
            engine:  Engine::new(options),
            running: false,
        }
    }

    pub fn engine(&self) -> &Engine
    {
        &self.engine
    }

    /// Reads commands until `exit` or the end of the input, answering each on the output.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()>
    {
        self.running = true;

        for line in input.lines()
        {
            let line = line?;
            if let Some(reply) = self.handle(&line)?
            {
                writeln!(output, "{}", reply)?;
                output.flush()?;
            }

            if !self.running
            {
                break;
            }
        }

        Ok(())
    }

    /// Runs one command, returning the reply to send back if there is one.
    ///
    /// Only fatal errors escape; everything else becomes a reply.
    pub fn handle(&mut self, line: &str) -> Result<Option<String>>
    {
        let args: Vec<&str> = line.split_whitespace().collect();
        let Some((cmd, args)) = args.split_first()
        else
        {
            return Ok(None);
        };

        let result = match *cmd
        {
            | "exit" => self.exit(),
            | "m" | "move" => self.apply(args),
            | "new" => self.new_game(args),
            | "play" => self.play(args),
            | "position" => self.position(args),
            | "quit" => self.quit(),
            | "ready" => Ok(replies::SUCCESS.into()),
            | _ => Err(Error::new(Kind::UnrecognizedCommand, (*cmd).into())),
        };

        match result
        {
            | Ok(reply) =>
            {
                log::debug!("Command completed: {} {}", cmd, args.join(" "));
                Ok(Some(reply))
            }
            | Err(err) if err.fatal() =>
            {
                log::error!("{}", err);
                Err(err)
            }
            | Err(err) =>
            {
                log::warn!("Recoverable error:\n{}", err);
                Ok(Some(Self::reply_for(&err).into()))
            }
        }
    }

    /// Maps a recoverable error onto a reply token.
    fn reply_for(err: &Error) -> &'static str
    {
        match err.kind
        {
            | Kind::MalformedInput | Kind::ParseError | Kind::InvalidTime | Kind::UnrecognizedCommand => replies::INVALID,
            | _ => replies::FAILED,
        }
    }

    /// Applies a JSON movement to the tracked game.
    fn apply(&mut self, args: &[&str]) -> Result<String>
    {
        if args.is_empty()
        {
            return Err(Error::new(Kind::MalformedInput, "A movement is required.".into()));
        }

        let movement = args.join(" ").parse::<Movement>()?;
        self.engine.apply(movement)?;
        Ok(replies::SUCCESS.into())
    }

    fn exit(&mut self) -> Result<String>
    {
        self.running = false;
        Ok(replies::SUCCESS.into())
    }

    /// Starts a new game: `new [isFirst] [seconds]`.
    fn new_game(&mut self, args: &[&str]) -> Result<String>
    {
        let is_first = match args.first()
        {
            | Some(value) => value.parse::<bool>().map_err(|_| Error::for_parse::<bool>(value.to_string()))?,
            | None => true,
        };

        if let Some(value) = args.get(1)
        {
            let seconds = value
                .parse::<f64>()
                .ok()
                .filter(|seconds| seconds.is_finite() && *seconds > 0.0)
                .ok_or_else(|| Error::new(Kind::InvalidTime, format!("'{}' is not a positive number of seconds.", value)))?;
            self.engine.set_time(seconds);
        }

        let player = if is_first { Player::White } else { Player::Black };
        self.engine.new_game(player, GameOptions::default())?;
        Ok(replies::SUCCESS.into())
    }

    /// Plays the engine's movement: `play [time hh:mm:ss | depth n]`.
    fn play(&mut self, args: &[&str]) -> Result<String>
    {
        let movement = if args.is_empty()
        {
            let budget = self.engine.options().budget();
            self.engine.play_for(budget)?
        }
        else
        {
            let search_args = SearchArgs::parse(args)?;
            self.engine.explore(search_args.into())?
        };

        Ok(serde_json::to_string(&movement)?)
    }

    /// Replaces the tracked game with a JSON snapshot and starts exploring it.
    fn position(&mut self, args: &[&str]) -> Result<String>
    {
        let snapshot: GameSnapshot = serde_json::from_str(&args.join(" "))?;
        let state = GameState::from_snapshot(&snapshot, self.engine.hasher().clone())?;
        self.engine.begin(state)?;
        Ok(replies::SUCCESS.into())
    }

    /// Abandons the current game for a fresh one on the same side.
    fn quit(&mut self) -> Result<String>
    {
        let player = self.engine.player();
        self.engine.new_game(player, GameOptions::default())?;
        Ok(replies::SUCCESS.into())
    }
}
