use anyhow::{Context, Result};

use collocation_srs::quality::normalize_phrase;
use collocation_srs::srs::{Day, PhraseRecord};

use crate::app::App;
use crate::render::terminal::{heading, rule, state_label, truncate};
use crate::OutputFormat;

fn record_json(record: &PhraseRecord, day: Day) -> serde_json::Value {
    serde_json::json!({
        "phrase": record.text,
        "state": record.state(day),
        "firstSeenDay": record.first_seen_day,
        "lastSeenDay": record.last_seen_day,
        "appearances": record.appearances,
        "reviewCount": record.review_count,
        "nextReviewDay": record.next_review_day,
        "stability": record.stability,
    })
}

pub fn run_status(
    app: &App,
    phrase: Option<&str>,
    day: Option<Day>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let day = app.day_or_current(day);

    if let Some(phrase) = phrase {
        let state = app.engine.state_of(&app.store, phrase, day)?;
        let record = app
            .store
            .get(&normalize_phrase(phrase))
            .with_context(|| format!("Collocation '{}' not found", phrase.trim()))?;

        match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&record_json(record, day))?);
            }
            OutputFormat::Plain => {
                println!("{}", heading(&record.text, use_color));
                println!("  State:        {}", state_label(state, use_color));
                println!("  Appearances:  {:?}", record.appearances);
                println!("  Reviews:      {}", record.review_count);
                println!("  Next review:  day {}", record.next_review_day);
                println!("  Stability:    {:.2}", record.stability);
            }
        }
        return Ok(());
    }

    let records: Vec<&PhraseRecord> = app.store.records().collect();

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> =
                records.iter().map(|r| record_json(r, day)).collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if records.is_empty() {
                println!("No collocations scheduled.");
                return Ok(());
            }

            let phrase_width = records
                .iter()
                .map(|r| r.text.chars().count())
                .max()
                .unwrap_or(6)
                .clamp(6, 40);
            let state_width = 9;

            println!(
                "{:<pw$} {:<sw$} {:>7} {:>9}",
                "Phrase",
                "State",
                "Reviews",
                "Next day",
                pw = phrase_width,
                sw = state_width
            );
            println!(
                "{} {} {} {}",
                rule(phrase_width),
                rule(state_width),
                rule(7),
                rule(9)
            );
            for record in &records {
                let state = record.state(day);
                // pad before coloring so escape codes don't skew the columns
                let padded = format!("{:<sw$}", state.to_string(), sw = state_width);
                let label = if use_color {
                    state_label(state, true).replace(&state.to_string(), &padded)
                } else {
                    padded
                };
                println!(
                    "{:<pw$} {} {:>7} {:>9}",
                    truncate(&record.text, phrase_width),
                    label,
                    record.review_count,
                    record.next_review_day,
                    pw = phrase_width
                );
            }
        }
    }

    Ok(())
}

pub fn run_stats(app: &App, day: Option<Day>, format: &OutputFormat, use_color: bool) -> Result<()> {
    let day = app.day_or_current(day);
    let stats = app.engine.stats(&app.store, day);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        OutputFormat::Plain => {
            println!("{}", heading(&format!("Schedule on day {}", day), use_color));
            println!("  Current day:  {}", stats.current_day);
            println!("  Total:        {}", stats.total);
            println!("  New:          {}", stats.new);
            println!("  Learning:     {}", stats.learning);
            println!("  Reviewing:    {}", stats.reviewing);
            println!("  Mastered:     {}", stats.mastered);
            println!("  Due:          {}", stats.due);
        }
    }

    Ok(())
}
