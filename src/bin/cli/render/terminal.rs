use collocation_srs::srs::PhraseState;

/// ANSI color codes
pub struct Color;

impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
}

/// Wrap `text` in `color` when colors are on
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

pub fn heading(text: &str, use_color: bool) -> String {
    paint(text, Color::BOLD, use_color)
}

/// Learning state, colored by how far along the phrase is
pub fn state_label(state: PhraseState, use_color: bool) -> String {
    let color = match state {
        PhraseState::New => Color::CYAN,
        PhraseState::Learning => Color::YELLOW,
        PhraseState::Reviewing => Color::DIM,
        PhraseState::Mastered => Color::GREEN,
    };
    paint(&state.to_string(), color, use_color)
}

/// Usage rate as a percentage; red below `warn_below`
pub fn rate(value: f64, warn_below: f64, use_color: bool) -> String {
    let text = format!("{:.1}%", value * 100.0);
    if value < warn_below {
        paint(&text, Color::RED, use_color)
    } else {
        paint(&text, Color::GREEN, use_color)
    }
}

/// Table rule of `width` box-drawing characters
pub fn rule(width: usize) -> String {
    "\u{2500}".repeat(width)
}

/// Cut `text` to `width` characters, marking the cut with "..."
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Bulleted list, or a placeholder when empty
pub fn bullet_list(label: &str, items: &[String], use_color: bool) -> Vec<String> {
    let mut lines = vec![format!("{} ({}):", heading(label, use_color), items.len())];
    if items.is_empty() {
        lines.push(format!("  {}", paint("(none)", Color::DIM, use_color)));
    } else {
        lines.extend(items.iter().map(|item| format!("  - {}", item)));
    }
    lines
}
