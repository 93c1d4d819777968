use std::path::PathBuf;

use anyhow::{Context, Result};
use calfeed_core::aggregate::{self, RunObserver, category_counts};
use calfeed_core::config::AggregatorConfig;
use calfeed_core::fetch::HttpFetcher;
use calfeed_core::output::write_events;
use calfeed_core::{FeedSource, SourceOutcome};
use chrono::{DateTime, Utc};
use indicatif::ProgressBar;
use owo_colors::OwoColorize;

use crate::render::{Render, pluralize, render_category_counts};
use crate::utils::tui::create_spinner;

pub struct BuildOptions {
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub now: Option<DateTime<Utc>>,
    pub past_days: Option<i64>,
    pub future_days: Option<i64>,
}

/// Prints one block per source as the run progresses.
struct ConsoleProgress {
    spinner: Option<ProgressBar>,
    printed: usize,
}

impl RunObserver for ConsoleProgress {
    fn source_started(&mut self, source: &FeedSource) {
        if self.printed > 0 {
            println!();
        }
        self.spinner = Some(create_spinner(source.render()));
    }

    fn source_finished(&mut self, outcome: &SourceOutcome) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
        println!("{}", outcome.source.render());
        println!("{}", outcome.render());
        self.printed += 1;
    }
}

pub async fn run(options: BuildOptions) -> Result<()> {
    let mut config = AggregatorConfig::load(options.config.as_deref())?;

    if let Some(output) = options.output {
        config.output = output;
    }
    if let Some(days) = options.past_days {
        config.past_days = days;
    }
    if let Some(days) = options.future_days {
        config.future_days = days;
    }
    config.validate()?;

    let settings = config.calendar_settings()?;
    let fetcher = HttpFetcher::new(&config.fetch_settings())?;
    let now = options.now.unwrap_or_else(Utc::now);

    let window = settings.window(now)?;
    log::debug!("Keeping events starting {} to {}", window.from, window.to);

    let mut progress = ConsoleProgress {
        spinner: None,
        printed: 0,
    };
    let result =
        aggregate::run_observed(&fetcher, &config.sources, &settings, now, &mut progress).await?;

    let path = config.output_path();
    write_events(&path, &result.events)
        .with_context(|| format!("Could not write {}", path.display()))?;

    let failed = result.failed().count();
    println!(
        "\nWrote {} {} to {}",
        result.events.len(),
        pluralize("event", result.events.len()),
        path.display()
    );
    if failed > 0 {
        println!(
            "{}",
            format!(
                "{} of {} {} failed",
                failed,
                result.outcomes.len(),
                pluralize("source", result.outcomes.len())
            )
            .yellow()
        );
    }

    println!("{}", render_category_counts(&category_counts(&result.events)));

    Ok(())
}
