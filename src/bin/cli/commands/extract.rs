use std::path::Path;

use anyhow::{Context, Result};

use collocation_srs::usage::{ManualLogExtractor, PhraseExtractor, StoryCollocations};

use crate::render::terminal::bullet_list;
use crate::OutputFormat;

pub fn run(file: &Path, manual: bool, format: &OutputFormat, use_color: bool) -> Result<()> {
    if manual {
        let content = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let phrases = ManualLogExtractor.extract(&content);

        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&phrases)?),
            OutputFormat::Plain => {
                for line in bullet_list("Phrases", &phrases, use_color) {
                    println!("{}", line);
                }
            }
        }
        return Ok(());
    }

    let story = StoryCollocations::from_file(file)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&story)?),
        OutputFormat::Plain => {
            println!("Day {}: {}", story.day, story.story_file.display());
            for (label, phrases) in [
                ("Key phrases", &story.key_phrases),
                ("Dialogue phrases", &story.dialogue_phrases),
                ("All phrases", &story.all_phrases),
            ] {
                for line in bullet_list(label, phrases, use_color) {
                    println!("{}", line);
                }
            }
        }
    }

    Ok(())
}
