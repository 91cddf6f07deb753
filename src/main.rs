use clap::Parser;
use flexi_logger::{AdaptiveFormat, Logger, WriteMode};
use hive_explorer::prelude::*;

fn main() -> Result<()>
{
    // Read the dotenv file.
    dotenvy::dotenv().ok();

    // Parse the cli options.
    let options = EngineOptions::parse();

    // Set the logger to write-and-flush so that it doesn't compete with worker threads.
    let _logger = Logger::try_with_env_or_str(options.log_level.clone())?
        .write_mode(WriteMode::BufferAndFlush)
        .log_to_stderr()
        .adaptive_format_for_stderr(AdaptiveFormat::WithThread)
        .set_palette("b196;208;195;111;67".to_owned())
        .start()?;

    log::info!("🐝 starting {} v{} 🐝", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    // Run the command loop until exit or end of input.
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    if let Err(err) = CommandLine::new(options).run(stdin.lock(), stdout.lock())
    {
        log::error!("fatal error: {}", err);
        return Err(err);
    }

    Ok(())
}
