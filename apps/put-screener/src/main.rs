//! Put Screener Binary
//!
//! # Usage
//!
//! ```bash
//! put-screener analyze --symbols AAPL,NVDA          # print reports once
//! put-screener analyze --compact --notify           # print and send once
//! put-screener run --config config.yaml             # scheduled mode
//! put-screener check-config                         # validate configuration
//! ```
//!
//! # Environment Variables
//!
//! - `PUT_SCREENER_CONFIG`: Config file path (default: config.yaml)
//! - `RUST_LOG`: Log filter (overrides `observability.logging.level`)
//! - Any `${VAR}` referenced from the config file, e.g. SMTP credentials

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tokio_util::sync::CancellationToken;

use put_screener::application::services::NotificationDispatcher;
use put_screener::application::use_cases::{AnalyzeSymbolUseCase, CycleSummary, RunCycleUseCase};
use put_screener::cli::{Cli, Command};
use put_screener::config::{
    Config, ConfigError, StartupMode, load_config, validate_config, validate_startup,
};
use put_screener::infrastructure::marketdata::YahooMarketDataAdapter;
use put_screener::infrastructure::notify::build_channels;
use put_screener::observability::{init_metrics, init_tracing};
use put_screener::report::{ReportFormatter, ReportOptions};
use put_screener::scheduler::{CycleOutcome, Runner};

type Cycle = RunCycleUseCase<YahooMarketDataAdapter>;

#[tokio::main]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    // Install rustls crypto provider before any TLS operations
    let _ = rustls::crypto::ring::default_provider().install_default();

    load_dotenv();

    let mode = startup_mode(&cli.command);
    let allow_defaults = matches!(cli.command, Command::Analyze { notify: false, .. });
    let (mut config, defaults_reason) = load(&cli, allow_defaults)?;
    init_tracing(&config.observability.logging).context("Failed to initialize logging")?;

    if let Some(reason) = defaults_reason {
        tracing::warn!(reason = %reason, "No usable config file, using defaults");
    }

    if let Command::Analyze {
        symbols,
        view,
        weeks,
        ..
    } = &cli.command
    {
        apply_overrides(&mut config, symbols, *view, *weeks)?;
    }

    let validation = validate_startup(&config, mode)?;
    for warning in &validation.warnings {
        tracing::warn!("{warning}");
    }
    log_config(&config, mode);

    match cli.command {
        Command::CheckConfig => {
            print_config_summary(&config);
            Ok(ExitCode::SUCCESS)
        }
        Command::Analyze {
            compact, notify, ..
        } => analyze_once(&config, compact, notify).await,
        Command::Run => {
            run_scheduled(&config).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

const fn startup_mode(command: &Command) -> StartupMode {
    match command {
        Command::Analyze { notify: true, .. } => StartupMode::Notify,
        Command::Analyze { .. } | Command::CheckConfig => StartupMode::AnalyzeOnly,
        Command::Run => StartupMode::Scheduled,
    }
}

/// Load the config file. Plain console analysis falls back to defaults
/// when the file is missing; every other command requires it.
fn load(cli: &Cli, allow_defaults: bool) -> anyhow::Result<(Config, Option<String>)> {
    let path = cli.config_path();
    match load_config(path.as_deref()) {
        Ok(config) => Ok((config, None)),
        Err(e @ ConfigError::ReadError { .. })
            if allow_defaults && e.is_not_found() =>
        {
            Ok((Config::default(), Some(e.to_string())))
        }
        Err(e) => Err(e).context("Failed to load configuration"),
    }
}

fn apply_overrides(
    config: &mut Config,
    symbols: &[String],
    view: Option<put_screener::RankingView>,
    weeks: Option<usize>,
) -> anyhow::Result<()> {
    if !symbols.is_empty() {
        config.analysis.symbols = symbols
            .iter()
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
    }
    if let Some(view) = view {
        config.analysis.view = view;
    }
    if let Some(weeks) = weeks {
        config.analysis.weeks = weeks;
    }
    validate_config(config).context("Invalid command-line overrides")?;
    Ok(())
}

/// Log the effective configuration.
fn log_config(config: &Config, mode: StartupMode) {
    tracing::info!(
        mode = ?mode,
        symbols = ?config.analysis.symbols,
        weeks = config.analysis.weeks,
        view = ?config.analysis.view,
        channels = ?config.notifications.enabled_channels(),
        "Configuration loaded"
    );
}

fn print_config_summary(config: &Config) {
    println!("Configuration OK");
    println!("  symbols:        {}", config.analysis.symbols.join(", "));
    println!("  weeks:          {}", config.analysis.weeks);
    println!("  view:           {:?}", config.analysis.view);
    println!("  max pick risk:  {:.1}%", config.screening.max_pick_risk);
    println!(
        "  channels:       {}",
        if config.notifications.any_enabled() {
            config.notifications.enabled_channels().join(", ")
        } else {
            "none".to_string()
        }
    );
    println!(
        "  schedule:       every {} min, market hours {}",
        config.schedule.interval_minutes,
        if config.schedule.enforces_market_hours() {
            "only"
        } else {
            "ignored"
        }
    );
}

/// Wire the market data adapter, use cases and (optionally) the dispatcher.
fn build_cycle(config: &Config, notify: bool) -> anyhow::Result<Cycle> {
    let market_data = Arc::new(
        YahooMarketDataAdapter::new(&config.market_data)
            .context("Failed to create market data adapter")?,
    );
    let analyze = AnalyzeSymbolUseCase::new(market_data, config);
    let cycle = RunCycleUseCase::new(analyze, config.analysis.symbols.clone());

    if !notify {
        return Ok(cycle);
    }

    let channels =
        build_channels(&config.notifications).context("Failed to create notification channels")?;
    let dispatcher = NotificationDispatcher::new(
        channels,
        ReportFormatter::new(ReportOptions::from_config(config)),
        &config.notifications,
    );
    tracing::info!(
        channels = dispatcher.channel_count(),
        "Notification dispatcher ready"
    );

    Ok(cycle.with_dispatcher(Arc::new(dispatcher), config.schedule.symbol_delay()))
}

/// Run one cycle under the same budget as scheduled cycles.
async fn analyze_once(config: &Config, compact: bool, notify: bool) -> anyhow::Result<ExitCode> {
    let cycle = build_cycle(config, notify)?;
    let runner = Runner::new(Arc::new(cycle), config.schedule.clone());

    let outcome = runner.run_once().await;
    match &outcome {
        CycleOutcome::Completed(summary) => print_reports(config, summary, compact),
        CycleOutcome::TimedOut => eprintln!(
            "❌ Analysis did not finish within {} minutes",
            config.schedule.max_cycle_minutes
        ),
        CycleOutcome::Panicked(message) => eprintln!("❌ Analysis aborted: {message}"),
        CycleOutcome::Skipped => {}
    }

    Ok(if outcome.succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_reports(config: &Config, summary: &CycleSummary, compact: bool) {
    let formatter = ReportFormatter::new(ReportOptions::from_config(config));
    for report in &summary.reports {
        let text = if compact {
            formatter.compact(report)
        } else {
            formatter.full(report)
        };
        println!("{text}\n");
    }
    for failure in &summary.failures {
        eprintln!("❌ {}: {}", failure.symbol, failure.error);
    }
}

async fn run_scheduled(config: &Config) -> anyhow::Result<()> {
    let port = config.observability.metrics_port;
    if port != 0 {
        init_metrics(port).context("Failed to start metrics exporter")?;
    }

    let cycle = build_cycle(config, true)?;
    let runner = Runner::new(Arc::new(cycle), config.schedule.clone());

    let shutdown_token = CancellationToken::new();
    tokio::spawn(shutdown_signal(shutdown_token.clone()));

    runner.run(shutdown_token).await;
    Ok(())
}

/// Load .env file from current directory or any ancestor directory.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT) and cancel the scheduler.
///
/// # Panics
///
/// Panics if signal handlers cannot be installed; a scheduler that cannot be
/// stopped should not start.
#[allow(clippy::expect_used)]
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }

    shutdown.cancel();
}
