//! List command - print a collection's chapters in order

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use folio_collector::{Collection, ContentCollector};
use folio_core::config::DEFAULT_COLLECTION;

/// Run the list command.
pub fn run(config_path: &Path, collection: Option<&str>) -> Result<()> {
    let config = crate::load_config(config_path)?;
    let collector = ContentCollector::from_config(&config);

    let name = collection.unwrap_or(DEFAULT_COLLECTION);
    tracing::info!(collection = name, "Listing collection");

    let collection = collector
        .collect(name)
        .wrap_err_with(|| format!("Failed to load collection `{name}`"))?;

    for line in render(&collection)? {
        println!("{line}");
    }

    Ok(())
}

/// One line per chapter: number, id and title, ordered by chapter number.
fn render(collection: &Collection) -> Result<Vec<String>> {
    let chapters = collection
        .chapters()
        .wrap_err("Collection entries are not chapters")?;

    Ok(chapters
        .into_iter()
        .map(|(id, ch)| format!("{:>3}  {:<24} {}", ch.chapter_number, id, ch.title))
        .collect())
}
