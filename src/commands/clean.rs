use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use hh_harvest::config::Config;
use hh_harvest::parser::{TextNormalizer, Vocabulary};
use hh_harvest::storage::Table;
use hh_harvest::utils::cleaned_path;

pub fn clean(config: &Config, input: &Path, output: Option<PathBuf>) -> Result<()> {
    let table = Table::load(input)
        .with_context(|| format!("Failed to read table: {}", input.display()))?;
    println!("Loaded {} rows from {}", table.len(), input.display());

    let normalizer = TextNormalizer::from_config(&config.normalizer);
    let (table, report) = normalizer.normalize(table);

    for column in &report.treated {
        println!("  cleaned: {column}");
    }
    for column in &report.missing {
        println!("  missing: {column}");
    }

    let output = output.unwrap_or_else(|| cleaned_path(input));
    table.save(&output, false)?;

    println!("Saved {} rows to {}", table.len(), output.display());
    Ok(())
}

pub fn vocabulary(output: Option<PathBuf>) -> Result<()> {
    let content = Vocabulary::default().to_toml()?;

    match output {
        Some(path) => {
            std::fs::write(&path, content)
                .with_context(|| format!("Failed to write vocabulary: {}", path.display()))?;
            println!("Vocabulary written to {}", path.display());
        }
        None => print!("{content}"),
    }

    Ok(())
}
