//! Check command - validate every document against its collection schema

use std::path::Path;

use color_eyre::eyre::{Result, bail};
use folio_collector::{CollectorError, ContentCollector, DocumentReport};

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Documents checked.
    pub checked: usize,
    /// Rejected documents with every problem found.
    pub rejected: Vec<DocumentReport>,
    /// Collection-level errors (missing directory, duplicate ids...).
    pub errors: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty() || !self.rejected.is_empty()
    }
}

/// Run the check command.
///
/// Validates every document of the selected collection (or all collections)
/// and reports every failing field, not just the first.
pub fn run(config_path: &Path, collection: Option<&str>) -> Result<()> {
    tracing::info!(?config_path, ?collection, "Checking content collections");

    let config = crate::load_config(config_path)?;
    let collector = ContentCollector::from_config(&config);
    let result = check(&collector, collection);

    println!();
    println!("Summary:");
    println!("  Documents: {}", result.checked);
    println!("  Rejected:  {}", result.rejected.len());

    if !result.rejected.is_empty() {
        println!();
        println!("Rejected documents:");
        for report in &result.rejected {
            println!("  ✗ {} ({})", report.id, report.path.display());
            for error in &report.errors {
                println!("      - {error}");
            }
        }
    }

    if !result.errors.is_empty() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_errors() {
        bail!(
            "Validation failed: {} rejected document(s), {} error(s)",
            result.rejected.len(),
            result.errors.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

/// Validate the named collection, or every registered collection.
pub fn check(collector: &ContentCollector, collection: Option<&str>) -> ValidationResult {
    let mut result = ValidationResult::default();

    let names: Vec<String> = match collection {
        Some(name) => vec![name.to_string()],
        None => collector.registry().names().map(str::to_string).collect(),
    };

    for name in names {
        println!("Checking collection `{name}`...");
        match collector.diagnose(&name) {
            Ok(reports) => {
                let total = reports.len();
                let mut failed = 0;
                for report in reports {
                    result.checked += 1;
                    if !report.is_valid() {
                        failed += 1;
                        result.rejected.push(report);
                    }
                }

                if failed == 0 {
                    println!("  ✓ All {total} documents valid");
                } else {
                    println!("  ✗ {failed}/{total} documents rejected");
                }
            }
            Err(e @ CollectorError::UnknownCollection(_)) => {
                result.add_error(e.to_string());
                println!("  ✗ {e}");
            }
            Err(e) => {
                result.add_error(format!("{name}: {e}"));
                println!("  ✗ {e}");
            }
        }
    }

    result
}
