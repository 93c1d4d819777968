//! Terminal rendering for calfeed types.
//!
//! Extension traits that add colored output to calfeed-core types using
//! owo_colors.

use std::collections::BTreeMap;

use calfeed_core::{FeedSource, SourceOutcome};
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for FeedSource {
    fn render(&self) -> String {
        format!("📅 {}", self.display_name())
    }
}

impl Render for SourceOutcome {
    fn render(&self) -> String {
        match &self.result {
            Ok(count) => {
                let label = format!("{} {}", count, pluralize("event", *count));
                format!("   {}", label.green())
            }
            Err(e) => format!("   {}", e.to_string().red()),
        }
    }
}

/// One line per category, aligned, e.g. `   arts       12`.
pub fn render_category_counts(counts: &BTreeMap<&str, usize>) -> String {
    if counts.is_empty() {
        return "   No events".dimmed().to_string();
    }

    let width = counts.keys().map(|c| c.len()).max().unwrap_or(0);
    counts
        .iter()
        .map(|(category, count)| format!("   {:<width$}  {}", category, count))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}
