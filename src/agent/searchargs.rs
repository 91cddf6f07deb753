use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;

use crate::prelude::*;

lazy_static! {
    static ref CLOCK: Option<Regex> = Regex::new(r"^(?<h>[0-9]{2,3}):(?<m>[0-9]{2}):(?<s>[0-9]{2})$").ok();
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Options with which the user can bound a single search.
pub enum SearchArgs
{
    Time(Duration),
    Depth(u8),
}

impl SearchArgs
{
    /// The deepest the search may go under these arguments.
    pub fn depth(&self) -> Option<u8>
    {
        match self
        {
            | Self::Depth(d) => Some(*d),
            | Self::Time(_) => None,
        }
    }

    /// The time the search may take under these arguments.
    pub fn time(&self) -> Option<Duration>
    {
        match self
        {
            | Self::Time(t) => Some(*t),
            | Self::Depth(_) => None,
        }
    }

    /// Tries to parse `time hh:mm:ss` or `depth n`.
    pub fn parse(args: &[&str]) -> Result<SearchArgs>
    {
        let base = Error::for_parse::<Self>(args.join(" "));

        let [mode, value] = args
        else
        {
            let err = Error::new(
                Kind::ParseError,
                "Search options require a mode (time or depth) and a corresponding value.".into(),
            );
            return Err(err.chain(base));
        };

        match *mode
        {
            | "time" =>
            {
                let time = SearchArgs::parse_clock(value).map_err(|err| err.chain(base))?;
                Ok(SearchArgs::Time(time))
            }
            | "depth" =>
            {
                let Ok(depth) = value.parse::<u8>()
                else
                {
                    let err = Error::for_parse::<u8>(value.to_string());
                    return Err(err.chain(base));
                };

                if depth == 0 || depth as usize > scalars::MAXIMUM_PLY
                {
                    let err = Error::new(
                        Kind::ParseError,
                        format!("Depth must be between 1 and {}.", scalars::MAXIMUM_PLY),
                    );
                    return Err(err.chain(base));
                }
                Ok(SearchArgs::Depth(depth))
            }
            | _ => Err(base),
        }
    }

    fn parse_clock(value: &str) -> Result<Duration>
    {
        let Some(re) = CLOCK.as_ref()
        else
        {
            return Err(Error::new(Kind::InternalError, "The clock pattern failed to compile.".into()));
        };

        let Some(caps) = re.captures(value)
        else
        {
            return Err(Error::new(Kind::InvalidTime, "Expected duration in the form of hh:mm:ss".into()));
        };

        let field = |name: &str| {
            caps.name(name)
                .and_then(|m| m.as_str().parse::<u64>().ok())
                .ok_or_else(|| Error::new(Kind::InvalidTime, format!("Invalid {} in '{}'.", name, value)))
        };

        let (hrs, mins, secs) = (field("h")?, field("m")?, field("s")?);
        Ok(Duration::from_secs(secs + 60 * mins + 3600 * hrs))
    }
}
