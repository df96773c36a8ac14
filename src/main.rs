//! Blockwars command line runner.
//!
//! Generates match-free boards and checks color matrices for runs. Logging
//! goes through `env_logger`; set `RUST_LOG=debug` to see engine activity.

use anyhow::Result;

use blockwars::adapter::GridConfig;
use blockwars::cli::{self, Command, USAGE};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let output = match cli::parse_args(&args, GridConfig::from_env())? {
        Command::Generate(config) => cli::generate(&config),
        Command::Check => cli::check(&cli::read_stdin()?)?,
        Command::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
