use std::path::Path;

use anyhow::Result;

use collocation_srs::feedback::EFFECTIVENESS_THRESHOLD;
use collocation_srs::srs::Day;
use collocation_srs::usage::{provided_for_day, save_analysis, usage_report, UsageAnalysis};

use crate::app::App;
use crate::render::terminal::{bullet_list, heading, rate};
use crate::OutputFormat;

fn print_analysis(analysis: &UsageAnalysis, use_color: bool) {
    let c = &analysis.comparison;
    println!(
        "{}",
        heading(
            &format!("Day {}: {}", analysis.day, analysis.artifact.display()),
            use_color
        )
    );
    println!(
        "  Usage rate: {}   Match rate: {}",
        rate(c.usage_rate, EFFECTIVENESS_THRESHOLD, use_color),
        rate(c.match_rate, 0.0, use_color)
    );
    for (label, items) in [
        ("Used", &c.used),
        ("Unused", &c.unused),
        ("Unexpected", &c.unexpected),
    ] {
        for line in bullet_list(label, items, use_color) {
            println!("  {}", line);
        }
    }
}

fn save(app: &App, analysis: &UsageAnalysis) -> Result<()> {
    let path = save_analysis(analysis, &app.config.analysis_dir()?)?;
    eprintln!("Saved analysis to {}", path.display());
    Ok(())
}

pub fn run(
    app: &App,
    day: Option<Day>,
    artifact: Option<&Path>,
    provided: Option<Vec<String>>,
    save_result: bool,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let day = app.day_or_current(day);
    let provided = provided.unwrap_or_else(|| provided_for_day(&app.engine, &app.store, day));

    let analysis = app.applier.validator().validate_day(day, artifact, &provided)?;
    if save_result {
        save(app, &analysis)?;
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&analysis)?),
        OutputFormat::Plain => print_analysis(&analysis, use_color),
    }

    Ok(())
}

pub fn run_recent(
    app: &App,
    days: u32,
    save_result: bool,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let analyses = app
        .applier
        .validator()
        .validate_recent_days(&app.engine, &app.store, days);
    if save_result {
        for analysis in &analyses {
            save(app, analysis)?;
        }
    }
    let report = usage_report(&analyses);

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "analyses": analyses,
                    "summary": report,
                }))?
            );
        }
        OutputFormat::Plain => {
            if analyses.is_empty() {
                println!("No stories found in the last {} days.", days);
                return Ok(());
            }
            for analysis in &analyses {
                print_analysis(analysis, use_color);
                println!();
            }
            println!(
                "{} {} days, {}/{} provided phrases used ({})",
                heading("Summary:", use_color),
                report.days_analyzed,
                report.used,
                report.provided,
                rate(report.overall_usage_rate, EFFECTIVENESS_THRESHOLD, use_color)
            );
        }
    }

    Ok(())
}
