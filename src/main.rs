use anyhow::Result;

use pool_club_engine::cli::Command;
use pool_club_engine::{handle_handicap, handle_serve, handle_setup, handle_simulate, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Serve { port } => handle_serve(*port),
        Command::Setup => handle_setup(),
        Command::Simulate => handle_simulate(),
        Command::Handicap { rank_a, rank_b, stake } => handle_handicap(rank_a, rank_b, *stake),
    }
}
