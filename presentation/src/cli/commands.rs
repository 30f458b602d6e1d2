//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for convene
#[derive(Parser, Debug)]
#[command(name = "convene")]
#[command(author, version, about = "Breakout rooms and phase timing for structured dialogue sessions")]
#[command(long_about = r#"
Convene hosts a structured dialogue session: participants move through the
Connect, Explore, Discover and Closing phases, alternating between the
shared community room and small breakout rooms (dyads, triads, quads,
kivas).

Without --plan or --stats, convene opens the interactive host console for
the session and walks it through its phases.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./convene.toml      Project-level config
3. ~/.config/convene/config.toml   Global config

Example:
  convene --duration 90 --participants "Hana,Ana,Ben,Cam,Dee"
  convene WXYZ --duration 120 -r triad
  convene --plan --duration 120
"#)]
pub struct Cli {
    /// Join code of the session (a fresh one is generated when omitted)
    pub session: Option<String>,

    /// Total session duration in minutes
    #[arg(short, long, value_name = "MINUTES")]
    pub duration: Option<u32>,

    /// Default breakout room type (dyad, triad, quad, kiva)
    #[arg(short = 'r', long, value_name = "TYPE")]
    pub room_type: Option<String>,

    /// Comma-separated participant names; the first one hosts
    #[arg(short, long, value_name = "NAMES")]
    pub participants: Option<String>,

    /// Print the computed phase schedule and exit
    #[arg(long)]
    pub plan: bool,

    /// Print room pool statistics and exit
    #[arg(long)]
    pub stats: bool,

    /// Observe the session read-only, as a participant process would
    #[arg(long)]
    pub watch: bool,

    /// Path to a config file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory the shared session records live in
    #[arg(long, value_name = "DIR")]
    pub store_dir: Option<PathBuf>,

    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress the banner and informational output
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::parse_from(["convene"]);
        assert!(cli.session.is_none());
        assert!(!cli.plan);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_parse_full() {
        let cli = Cli::parse_from([
            "convene",
            "WXYZ",
            "--duration",
            "120",
            "-r",
            "triad",
            "--participants",
            "Hana,Ana",
            "--plan",
            "-vv",
        ]);
        assert_eq!(cli.session.as_deref(), Some("WXYZ"));
        assert_eq!(cli.duration, Some(120));
        assert_eq!(cli.room_type.as_deref(), Some("triad"));
        assert!(cli.plan);
        assert_eq!(cli.verbose, 2);
    }
}
