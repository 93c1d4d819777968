use std::path::Path;

use anyhow::Result;
use calfeed_core::config::AggregatorConfig;
use owo_colors::OwoColorize;

use crate::render::Render;

pub fn run(config: Option<&Path>) -> Result<()> {
    let config = AggregatorConfig::load(config)?;

    for (i, source) in config.sources.iter().enumerate() {
        println!("{}", source.render());
        println!("   {}", source.url.dimmed());
        println!("   {}", source.categories.join(", "));

        if i < config.sources.len() - 1 {
            println!();
        }
    }

    Ok(())
}
