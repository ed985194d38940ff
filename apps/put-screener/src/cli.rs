use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::screening::RankingView;

/// Screens out-of-the-money puts for premium selling and pushes the best
/// strikes to notification channels.
#[derive(Debug, Parser)]
#[command(name = "put-screener", version, about)]
pub struct Cli {
    /// Path to the YAML configuration file
    #[arg(long, short = 'c', global = true, env = "PUT_SCREENER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Analyze once and print the reports
    Analyze {
        /// Symbols to analyze, comma separated (default: from config)
        #[arg(long, value_delimiter = ',')]
        symbols: Vec<String>,

        /// Ordering of strikes within a week
        #[arg(long, value_enum)]
        view: Option<RankingView>,

        /// Number of expirations to analyze
        #[arg(long)]
        weeks: Option<usize>,

        /// Print the compact mobile layout instead of the full report
        #[arg(long)]
        compact: bool,

        /// Also send the reports to the enabled notification channels
        #[arg(long)]
        notify: bool,
    },

    /// Run on the configured schedule until interrupted
    Run,

    /// Validate the configuration and print a summary
    CheckConfig,
}

impl Cli {
    /// Config path as a string, when one was given.
    #[must_use]
    pub fn config_path(&self) -> Option<String> {
        self.config.as_ref().map(|p| p.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_analyze_flags() {
        let cli = Cli::parse_from([
            "put-screener",
            "analyze",
            "--symbols",
            "AAPL,nvda",
            "--view",
            "quality",
            "--compact",
            "--config",
            "alt.yaml",
        ]);

        assert_eq!(cli.config_path().as_deref(), Some("alt.yaml"));
        let Command::Analyze {
            symbols,
            view,
            compact,
            notify,
            weeks,
        } = cli.command
        else {
            panic!("expected analyze");
        };
        assert_eq!(symbols, vec!["AAPL", "nvda"]);
        assert_eq!(view, Some(RankingView::Quality));
        assert!(compact);
        assert!(!notify);
        assert!(weeks.is_none());
    }

    #[test]
    fn parses_run_and_check_config() {
        assert!(matches!(
            Cli::parse_from(["put-screener", "run"]).command,
            Command::Run
        ));
        assert!(matches!(
            Cli::parse_from(["put-screener", "check-config"]).command,
            Command::CheckConfig
        ));
    }
}
