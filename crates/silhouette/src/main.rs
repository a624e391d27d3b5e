mod bindings;
mod cli;
mod paths;
mod run;

use anyhow::Result;
use cli::{Command, ConfigAction};

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    match cli.command {
        Some(Command::Config(config_cmd)) => match config_cmd.action {
            ConfigAction::Print => run::print_config(&cli.run),
            ConfigAction::Where => run::print_config_paths(&cli.run),
        },
        None => run::run(cli.run),
    }
}
