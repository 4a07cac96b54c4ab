use anyhow::{Context, Result};
use std::path::PathBuf;

use hh_harvest::config::{Config, SearchQuery};
use hh_harvest::crawler::{DatasetBuilder, RateLimitedFetcher, VacancyCollector};
use hh_harvest::parser::{FieldExtractor, Vocabulary};
use hh_harvest::storage::DatasetWriter;

pub async fn collect(
    mut config: Config,
    queries: Vec<String>,
    output: Option<PathBuf>,
    vocabulary: Option<PathBuf>,
) -> Result<()> {
    if !queries.is_empty() {
        config.collector.queries = queries.into_iter().map(SearchQuery::new).collect();
    }
    if let Some(output) = output {
        config.output.dir = output;
    }
    if let Some(vocabulary) = vocabulary {
        config.collector.vocabulary_path = Some(vocabulary);
    }
    config.validate()?;

    let vocabulary = match &config.collector.vocabulary_path {
        Some(path) => Vocabulary::from_file(path)
            .with_context(|| format!("Failed to load vocabulary: {}", path.display()))?,
        None => Vocabulary::default(),
    };

    println!("Starting vacancy collection");
    println!("===========================");
    for query in &config.collector.queries {
        println!("  {} -> {}", query.text, query.file_stem());
    }

    let fetcher = RateLimitedFetcher::new(&config.api, config.fetcher.clone())
        .context("Failed to create fetcher")?;
    let mut collector = VacancyCollector::new(fetcher, config.api.clone(), &config.collector);
    let mut builder = DatasetBuilder::new(FieldExtractor::new(vocabulary));

    let texts: Vec<&str> = config
        .collector
        .queries
        .iter()
        .map(|q| q.text.as_str())
        .collect();
    let dataset = builder.build(&mut collector, &texts).await;
    let stats = builder.stats();

    println!("\nCollection Summary");
    println!("==================");
    println!("Search results: {}", stats.summaries);
    println!("Rows: {}", stats.records);
    println!("Skipped (no detail): {}", stats.skipped_details);
    println!("Requests: {}", collector.fetcher().request_count());

    if dataset.is_empty() {
        tracing::warn!("No vacancies collected, nothing written");
        println!("\nNo vacancies collected; no files written.");
        return Ok(());
    }

    let today = chrono::Local::now().date_naive();
    let writer = DatasetWriter::new(&config.output.dir, today)?;
    let written = writer.write(&dataset, &config.collector.queries)?;

    println!("\nFiles");
    println!("-----");
    for file in &written {
        println!("{} ({} rows)", file.path.display(), file.rows);
    }

    Ok(())
}
