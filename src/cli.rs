use crate::config::constants;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand)]
#[command(version, about, long_about = None)]
pub enum Commands {
    /// Tag new batches against the reference dataset and write the verified ones
    Run {
        /// Profile name
        #[clap(short, long)]
        profile: String,
        /// Print the run summary as JSON
        #[clap(long)]
        json: bool,
    },

    /// List batches the next run would process
    Pending {
        /// Profile name
        #[clap(short, long)]
        profile: String,
        /// Print as JSON
        #[clap(long)]
        json: bool,
    },
}

/// Reconciler Command
#[derive(Parser)]
#[command(about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
    /// Profile file
    #[clap(short, long, global = true, default_value = constants::CONFIG_FILE)]
    pub config: PathBuf,
    /// Directory for per-run log files
    #[clap(long, global = true, default_value = constants::LOG_DIR)]
    pub log_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from(["reconciler", "run", "--profile", "prod"]).unwrap();
        assert_eq!(cli.config, PathBuf::from(constants::CONFIG_FILE));
        assert!(matches!(cli.cmd, Commands::Run { ref profile, json: false } if profile == "prod"));
    }

    #[test]
    fn test_parse_pending_with_globals() {
        let cli = Cli::try_parse_from([
            "reconciler",
            "pending",
            "-p",
            "test",
            "--json",
            "--config",
            "other.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("other.toml"));
        assert!(matches!(cli.cmd, Commands::Pending { json: true, .. }));
    }

    #[test]
    fn test_profile_required() {
        assert!(Cli::try_parse_from(["reconciler", "run"]).is_err());
    }
}
