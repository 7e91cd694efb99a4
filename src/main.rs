use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use qpace::cli;
use qpace::core::config::AppConfig;

#[derive(Parser)]
#[command(name = "qpace", about = "Weekly usage quota pace calculator", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text|json)
    #[arg(short, long, global = true)]
    format: Option<String>,

    /// Shorthand for --format json
    #[arg(short = 'j', long = "json", global = true)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    /// Verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare weekly usage so far against what is left until the reset
    Pace {
        /// Percent of the weekly quota left
        #[arg(long, conflicts_with = "remaining_text")]
        remaining: Option<f64>,

        /// Scraped percentage text, e.g. "56% left" or "44% used"
        #[arg(long)]
        remaining_text: Option<String>,

        /// Reset date (YYYY-MM-DD)
        #[arg(long, conflicts_with = "reset_text")]
        reset: Option<NaiveDate>,

        /// Scraped reset text, e.g. "Resets Jan 4, 3:18 PM"
        #[arg(long)]
        reset_text: Option<String>,

        /// Reference date (YYYY-MM-DD, default: today)
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Standard daily quota in percent (default: 100/7)
        #[arg(long)]
        quota_per_day: Option<f64>,
    },
    /// Poll a file until it exists or a line matches a pattern
    Wait {
        /// File to watch
        #[arg(long)]
        file: PathBuf,

        /// Regex a line must match
        #[arg(long)]
        pattern: Option<String>,

        /// Delay between checks in milliseconds
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Give up after this many milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Generate default config file
    Init,
    /// Validate config file
    Check,
    /// Print the effective config
    Show,
}

fn setup_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("qpace=debug")
        } else {
            EnvFilter::new("qpace=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!("{}; using defaults", e);
        AppConfig::default()
    });

    let output_opts = cli::output::OutputOptions {
        format: cli::output::OutputFormat::resolve(
            cli.json,
            cli.format.as_deref(),
            &config.settings.default_format,
        ),
        pretty: cli.pretty,
        use_color: cli::output::detect_color(!cli.no_color, &config.settings.color),
    };

    match cli.command {
        Commands::Pace {
            remaining,
            remaining_text,
            reset,
            reset_text,
            today,
            quota_per_day,
        } => {
            let args = cli::pace_cmd::PaceArgs {
                remaining,
                remaining_text,
                reset,
                reset_text,
                today,
                quota_per_day,
            };
            cli::pace_cmd::run(args, &config, &output_opts)?;
        }
        Commands::Wait {
            file,
            pattern,
            interval_ms,
            timeout_ms,
        } => {
            let mut settings = config.poll.settings();
            if let Some(ms) = interval_ms {
                settings.interval = Duration::from_millis(ms);
            }
            if let Some(ms) = timeout_ms {
                settings.timeout = Duration::from_millis(ms);
            }
            cli::wait_cmd::run(file, pattern, settings, &output_opts).await?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Init => cli::config_cmd::init(&output_opts)?,
            ConfigAction::Check => cli::config_cmd::check(&output_opts)?,
            ConfigAction::Show => cli::config_cmd::show(&output_opts)?,
        },
    }

    Ok(())
}
