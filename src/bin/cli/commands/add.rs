use anyhow::Result;

use collocation_srs::srs::{Day, UpdateOutcome};

use crate::app::App;
use crate::render::terminal::{paint, Color};
use crate::OutputFormat;

pub fn run(
    app: &mut App,
    phrases: &[String],
    day: Option<Day>,
    strategy: Option<&str>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let params = app.strategy(strategy);
    let outcomes = app
        .engine
        .add_collocations(&mut app.store, phrases, day, params.as_ref())?;
    let day = app.store.current_day();

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = outcomes
                .iter()
                .map(|(phrase, outcome)| match outcome {
                    UpdateOutcome::Added => serde_json::json!({
                        "phrase": phrase,
                        "outcome": "added",
                    }),
                    UpdateOutcome::Reviewed(review) => serde_json::json!({
                        "phrase": phrase,
                        "outcome": "reviewed",
                        "interval": review.interval,
                        "nextReviewDay": review.next_review_day,
                        "stability": review.stability,
                    }),
                    UpdateOutcome::Rejected(reason) => serde_json::json!({
                        "phrase": phrase,
                        "outcome": "rejected",
                        "reason": reason.to_string(),
                    }),
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "day": day,
                    "results": output,
                }))?
            );
        }
        OutputFormat::Plain => {
            if outcomes.is_empty() {
                println!("No phrases given.");
                return Ok(());
            }
            println!("Day {}:", day);
            for (phrase, outcome) in &outcomes {
                match outcome {
                    UpdateOutcome::Added => {
                        println!("  {} {}", paint("+", Color::GREEN, use_color), phrase);
                    }
                    UpdateOutcome::Reviewed(review) => {
                        println!(
                            "  {} {} (next review day {}, stability {:.2})",
                            paint("~", Color::CYAN, use_color),
                            phrase,
                            review.next_review_day,
                            review.stability
                        );
                    }
                    UpdateOutcome::Rejected(reason) => {
                        println!(
                            "  {} {} {}",
                            paint("x", Color::RED, use_color),
                            phrase,
                            paint(&format!("({})", reason), Color::DIM, use_color)
                        );
                    }
                }
            }
        }
    }

    Ok(())
}
