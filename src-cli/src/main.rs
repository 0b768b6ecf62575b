use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use breakboard_lib::config::Config;
use breakboard_lib::logging::init_logging;
use breakboard_lib::{run_command, AppContext, COMMANDS};
use brk_core::dates::today_utc;
use serde_json::Value;
use tracing::info;

fn main() -> Result<ExitCode> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load().context("failed to load configuration")?;
    init_logging(&config.logging);

    let mut argv = std::env::args().skip(1);
    let Some(command) = argv.next() else {
        bail!(
            "usage: breakboard <command> [json-args]\ncommands: {}",
            COMMANDS.join(", ")
        );
    };
    let args: Value = match argv.next() {
        Some(raw) => serde_json::from_str(&raw).context("command arguments must be JSON")?,
        None => Value::Null,
    };

    info!(command = %command, version = env!("CARGO_PKG_VERSION"), "breakboard");
    let ctx = AppContext::from_config(&config, today_utc());

    match run_command(&ctx, &command, args) {
        Ok(out) => {
            println!("{}", serde_json::to_string_pretty(&out)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("{}", serde_json::to_string_pretty(&err)?);
            Ok(ExitCode::FAILURE)
        }
    }
}
