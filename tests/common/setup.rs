use hive_explorer::prelude::*;

pub fn setup() -> Result<()>
{
    env_logger::try_init().map_err(|_| Error::new(Kind::InternalError, "Could not initialize logger.".into()))
}

/// Engine options that never touch the disk and hash deterministically.
pub fn engine_options(time: f64, max_depth: Option<u8>) -> EngineOptions
{
    EngineOptions {
        time,
        max_depth,
        no_cache: true,
        seed: Some(0x5eed),
        ..EngineOptions::default()
    }
}
