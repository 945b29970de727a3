//! Command-line interface for the recipe book server.

use clap::{Parser, Subcommand};

/// Recipe book - recipe administration and remote posts proxy
#[derive(Parser, Debug)]
#[command(name = "recipebook")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the web server (default)
    #[command(alias = "daemon")]
    Serve {
        /// Override the configured listening port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Create default config file
    Init,

    /// Apply pending database migrations and exit
    Migrate,
}

impl Cli {
    /// Subcommand to run, `serve` when none was given.
    #[must_use]
    pub fn command(self) -> Commands {
        self.command.unwrap_or(Commands::Serve { port: None })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_serve() {
        let cli = Cli::try_parse_from(["recipebook"]).unwrap();
        assert_eq!(cli.command(), Commands::Serve { port: None });
    }

    #[test]
    fn test_serve_port_override() {
        let cli = Cli::try_parse_from(["recipebook", "serve", "--port", "9000"]).unwrap();
        assert_eq!(cli.command(), Commands::Serve { port: Some(9000) });
    }

    #[test]
    fn test_init_and_migrate() {
        let cli = Cli::try_parse_from(["recipebook", "init"]).unwrap();
        assert_eq!(cli.command(), Commands::Init);

        let cli = Cli::try_parse_from(["recipebook", "migrate"]).unwrap();
        assert_eq!(cli.command(), Commands::Migrate);
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        assert!(Cli::try_parse_from(["recipebook", "frobnicate"]).is_err());
    }
}
