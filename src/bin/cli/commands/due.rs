use anyhow::Result;

use collocation_srs::srs::Day;

use crate::app::App;
use crate::render::terminal::{heading, paint, Color};
use crate::OutputFormat;

pub fn run(
    app: &App,
    day: Option<Day>,
    min: Option<usize>,
    max: Option<usize>,
    strategy: Option<&str>,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let day = app.day_or_current(day);
    let params = app.strategy(strategy);
    let min = min.unwrap_or(app.config.due.min_items);
    let max = max.unwrap_or(app.config.due.max_items);

    let due = app
        .engine
        .due_collocations(&app.store, day, min, max, params.as_ref());

    match format {
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = due
                .iter()
                .filter_map(|phrase| app.store.get(phrase))
                .map(|record| {
                    serde_json::json!({
                        "phrase": record.text,
                        "daysOverdue": record.days_overdue(day),
                        "stability": record.stability,
                        "state": record.state(day),
                    })
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "day": day,
                    "due": output,
                }))?
            );
        }
        OutputFormat::Plain => {
            if due.is_empty() {
                println!("Nothing due on day {}.", day);
                return Ok(());
            }
            println!("{}", heading(&format!("Due on day {}", day), use_color));
            for phrase in &due {
                let overdue = app
                    .store
                    .get(phrase)
                    .map(|r| r.days_overdue(day))
                    .unwrap_or(0);
                let note = if overdue > 0 {
                    paint(&format!(" ({} days overdue)", overdue), Color::YELLOW, use_color)
                } else {
                    String::new()
                };
                println!("  {}{}", phrase, note);
            }
        }
    }

    Ok(())
}
