use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "pool club tournament and rating engine")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Start the backend server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, default_value_t = 3000)]
        port: u16,
    },
    /// Drop and recreate the database schema
    Setup,
    /// Play a full demo tournament in memory and print the standings
    Simulate,
    /// Preview the handicap between two ranks at a stake
    Handicap {
        /// Rank of the first player, e.g. K+ or H
        rank_a: String,
        /// Rank of the second player
        rank_b: String,
        /// Stake in PLN
        #[arg(default_value_t = 0)]
        stake: i64,
    },
}
