//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `investigator_core` linkage with a deterministic ping/version probe.
//! - With a JSON config path argument, open the configured store and report
//!   how many characters it holds.

use investigator_core::{
    init_logging_from_config, open_db, CharacterRepository, EngineConfig,
    SqliteCharacterRepository,
};
use log::info;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("investigator_core ping={}", investigator_core::ping());
    println!(
        "investigator_core version={}",
        investigator_core::core_version()
    );

    let Some(config_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    match run(&config_path) {
        Ok(count) => {
            println!("characters={count}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(config_path: &str) -> Result<usize, String> {
    let config = EngineConfig::from_json_file(config_path).map_err(|err| err.to_string())?;
    init_logging_from_config(&config)?;

    let mut conn = open_db(&config.database_path).map_err(|err| err.to_string())?;
    let repo = SqliteCharacterRepository::try_new(&mut conn).map_err(|err| err.to_string())?;
    let count = repo
        .list_all_characters()
        .map_err(|err| err.to_string())?
        .len();
    info!(
        "event=cli_probe module=cli status=ok characters={}",
        count
    );
    Ok(count)
}
