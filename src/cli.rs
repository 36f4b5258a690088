use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Whitelist dApp CLI (library-facing definitions)
#[derive(Debug, Parser)]
#[command(name = "whitelist-dapp", about = "Join the Crypto Devs whitelist", version)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print the session snapshot as JSON instead of the rendered page
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Connect the wallet and show the page (default)
    Status,
    /// Connect the wallet and report whether it succeeded
    Connect,
    /// Print how many addresses have joined
    Count,
    /// Join the whitelist with the connected account
    Join,
}

impl Cli {
    pub fn command(&self) -> Commands {
        self.command.unwrap_or(Commands::Status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_status() {
        let cli = Cli::try_parse_from(["whitelist-dapp"]).unwrap();
        assert_eq!(cli.command(), Commands::Status);
        assert!(!cli.json);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["whitelist-dapp", "join", "--json", "--config", "dapp.toml"]).unwrap();
        assert_eq!(cli.command(), Commands::Join);
        assert!(cli.json);
        assert_eq!(cli.config, Some(PathBuf::from("dapp.toml")));
    }

    #[test]
    fn unknown_subcommand_is_rejected() {
        assert!(Cli::try_parse_from(["whitelist-dapp", "transfer"]).is_err());
    }
}
