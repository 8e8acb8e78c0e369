//! Command line interface
//!
//! - `serve`: run the HTTP API

pub mod serve;

use clap::{Parser, Subcommand};

/// TaskFlow - team and task management API
#[derive(Parser)]
#[command(name = "taskflow")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server (default)
    Serve,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["taskflow", "serve"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Serve)));
    }

    #[test]
    fn test_no_subcommand_defaults_to_none() {
        let cli = Cli::try_parse_from(["taskflow"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_unknown_subcommand_rejected() {
        assert!(Cli::try_parse_from(["taskflow", "ui"]).is_err());
    }
}
