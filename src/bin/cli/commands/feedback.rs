use std::path::Path;

use anyhow::Result;

use collocation_srs::feedback::{Effectiveness, EFFECTIVENESS_THRESHOLD};
use collocation_srs::srs::Day;

use crate::app::App;
use crate::render::terminal::{bullet_list, heading, paint, rate, rule, Color};
use crate::OutputFormat;

pub fn run(
    app: &mut App,
    day: Day,
    artifact: Option<&Path>,
    provided: Option<Vec<String>>,
    strategy: Option<&str>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let params = app.strategy(strategy);
    let result = app.applier.apply_for_day(
        &app.engine,
        &mut app.store,
        day,
        artifact,
        provided.as_deref(),
        params.as_ref(),
    )?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Plain => {
            println!("{}", heading(&format!("Feedback for day {}", day), use_color));
            if let Some(artifact) = &result.artifact {
                println!("  Story: {}", artifact.display());
            }
            println!(
                "  Usage rate: {}",
                rate(result.usage_rate, EFFECTIVENESS_THRESHOLD, use_color)
            );
            for (label, items) in [
                ("Reviewed", &result.marked_as_reviewed),
                ("Kept for retry", &result.kept_for_retry),
                ("Penalised", &result.penalty_applied),
                ("Not scheduled", &result.ignored),
                ("Unexpected", &result.unexpected),
            ] {
                for line in bullet_list(label, items, use_color) {
                    println!("  {}", line);
                }
            }
        }
    }

    Ok(())
}

pub fn run_report(app: &App, days: u32, format: &OutputFormat, use_color: bool) -> Result<()> {
    let report = app.applier.feedback_report(&app.engine, &app.store, days);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Plain => {
            let Some(effectiveness) = report.effectiveness else {
                println!("No stories found in the last {} days.", days);
                return Ok(());
            };

            println!("{:>5} {:>8} {:>6} {:>7} {:>8}", "Day", "Provided", "Used", "Usage", "Match");
            println!("{} {} {} {} {}", rule(5), rule(8), rule(6), rule(7), rule(8));
            for daily in &report.daily {
                println!(
                    "{:>5} {:>8} {:>6} {:>7} {:>8}",
                    daily.day,
                    daily.provided_count,
                    daily.used_count,
                    format!("{:.1}%", daily.usage_rate * 100.0),
                    format!("{:.1}%", daily.match_rate * 100.0),
                );
            }
            println!();

            let summary = &report.summary;
            println!(
                "Overall usage: {} ({}/{}), average daily: {:.1}%",
                rate(summary.overall_usage_rate, EFFECTIVENESS_THRESHOLD, use_color),
                summary.used,
                summary.provided,
                summary.average_usage_rate * 100.0
            );
            let verdict = match effectiveness {
                Effectiveness::Good => paint("good", Color::GREEN, use_color),
                Effectiveness::NeedsImprovement => {
                    paint("needs improvement", Color::YELLOW, use_color)
                }
            };
            println!("Feedback loop: {}", verdict);
        }
    }

    Ok(())
}
