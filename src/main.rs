use anyhow::Result;
use clap::Parser;

use blockboard::cli::{commands, Cli};
use blockboard::{init_telemetry, BoardConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // A broken .env should not stop the board from opening
    if let Err(e) = BoardConfig::load_env_file() {
        eprintln!("⚠️  Ignoring .env: {e}");
    }

    let config = BoardConfig::load(cli.config.as_deref())?;
    init_telemetry(&config.logging)?;

    match commands::run(cli, &config) {
        Err(e) if commands::is_rejection(&e) => {
            eprintln!("❌ Rejected: {e}");
            std::process::exit(commands::REJECTED_EXIT_CODE);
        }
        result => result,
    }
}
