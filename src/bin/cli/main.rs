mod app;
mod commands;
mod render;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use collocation_srs::Day;

#[derive(Parser)]
#[command(
    name = "srs-cli",
    about = "Collocation scheduler with usage-verified feedback",
    version
)]
struct Cli {
    /// Config file (default: <data dir>/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory holding the schedule, stories and analyses
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    /// Only enforce the denylist when adding phrases
    #[arg(long, global = true)]
    permissive: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Add phrases presented on a day (use "-" to read one per line from stdin)
    Add {
        phrases: Vec<String>,
        /// Day the phrases were presented (default: the day after the current day)
        #[arg(long)]
        day: Option<Day>,
        /// Strategy used for stability growth (balanced, wider, deeper)
        #[arg(long)]
        strategy: Option<String>,
    },

    /// List phrases due for review
    Due {
        /// Day to check (default: current day)
        #[arg(long)]
        day: Option<Day>,
        #[arg(long)]
        min: Option<usize>,
        #[arg(long)]
        max: Option<usize>,
        /// Strategy whose bounds replace --min/--max
        #[arg(long)]
        strategy: Option<String>,
    },

    /// Show the learning state of one phrase, or of every phrase
    Status {
        phrase: Option<String>,
        #[arg(long)]
        day: Option<Day>,
    },

    /// Schedule summary
    Stats {
        #[arg(long)]
        day: Option<Day>,
    },

    /// Extract phrases from a story file
    Extract {
        file: PathBuf,
        /// Use the manual one-phrase-per-line format
        #[arg(long)]
        manual: bool,
    },

    /// Compare provided phrases with those used in a day's story
    Validate {
        /// Day to validate (default: current day)
        #[arg(long)]
        day: Option<Day>,
        /// Validate the last N days instead of a single day
        #[arg(long, conflicts_with_all = ["day", "artifact", "provided"])]
        recent: Option<u32>,
        /// Story file (default: located by day in the stories directory)
        #[arg(long)]
        artifact: Option<PathBuf>,
        /// Comma-separated phrases that were provided (default: the day's due list)
        #[arg(long)]
        provided: Option<String>,
        /// Write the analysis to the analysis directory
        #[arg(long)]
        save: bool,
    },

    /// Credit used phrases and apply the miss policy for a day
    Feedback {
        day: Day,
        #[arg(long)]
        artifact: Option<PathBuf>,
        /// Comma-separated phrases that were provided (default: the day's due list)
        #[arg(long)]
        provided: Option<String>,
        #[arg(long)]
        strategy: Option<String>,
    },

    /// Usage report over recent days
    Report {
        #[arg(long, default_value = "7")]
        days: u32,
    },
}

/// Split a comma-separated list, dropping blanks
fn split_list(list: Option<&str>) -> Option<Vec<String>> {
    list.map(|l| {
        l.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}

/// Phrases from arguments, or one per line from stdin for "-"
fn resolve_phrases(phrases: Vec<String>) -> anyhow::Result<Vec<String>> {
    if phrases.len() == 1 && phrases[0] == "-" {
        let mut buf = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut buf)?;
        return Ok(buf
            .lines()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect());
    }
    Ok(phrases)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && atty_check();

    let mut app = app::App::new(cli.config.as_deref(), cli.data_dir.clone(), cli.permissive)?;

    match cli.command {
        Command::Add { phrases, day, strategy } => {
            let phrases = resolve_phrases(phrases)?;
            commands::add::run(&mut app, &phrases, day, strategy.as_deref(), &cli.format, use_color)?;
        }
        Command::Due { day, min, max, strategy } => {
            commands::due::run(&app, day, min, max, strategy.as_deref(), &cli.format, use_color)?;
        }
        Command::Status { phrase, day } => {
            commands::status::run_status(&app, phrase.as_deref(), day, &cli.format, use_color)?;
        }
        Command::Stats { day } => {
            commands::status::run_stats(&app, day, &cli.format, use_color)?;
        }
        Command::Extract { file, manual } => {
            commands::extract::run(&file, manual, &cli.format, use_color)?;
        }
        Command::Validate { day, recent, artifact, provided, save } => {
            let provided = split_list(provided.as_deref());
            match recent {
                Some(days) => {
                    commands::validate::run_recent(&app, days, save, &cli.format, use_color)?;
                }
                None => {
                    commands::validate::run(
                        &app,
                        day,
                        artifact.as_deref(),
                        provided,
                        save,
                        &cli.format,
                        use_color,
                    )?;
                }
            }
        }
        Command::Feedback { day, artifact, provided, strategy } => {
            let provided = split_list(provided.as_deref());
            commands::feedback::run(
                &mut app,
                day,
                artifact.as_deref(),
                provided,
                strategy.as_deref(),
                &cli.format,
                use_color,
            )?;
        }
        Command::Report { days } => {
            commands::feedback::run_report(&app, days, &cli.format, use_color)?;
        }
    }

    Ok(())
}

/// Check if stdout is a terminal (for color support)
fn atty_check() -> bool {
    std::io::stdout().is_terminal()
}
