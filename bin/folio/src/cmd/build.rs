//! Build command - validate collections and write the manifest

use std::{path::Path, time::Instant};

use color_eyre::eyre::{Result, WrapErr};
use folio_collector::{CollectorError, ContentCollector, write_manifest};
use folio_core::InvalidPolicy;

/// Run the build command.
///
/// Loads every configured collection, applies the invalid-document policy and
/// writes the validated manifest for the rendering stage.
pub fn run(config_path: &Path, output: Option<&Path>, skip_invalid: bool) -> Result<()> {
    let start = Instant::now();
    tracing::info!(?config_path, ?output, skip_invalid, "Starting build");

    let mut config = crate::load_config(config_path)?;

    if let Some(out) = output {
        config.build.output = out.to_path_buf();
    }

    if skip_invalid {
        tracing::info!("Skipping invalid documents instead of failing");
        config.build.on_invalid = InvalidPolicy::Skip;
    }

    let collector = ContentCollector::from_config(&config);
    let collections = match collector.collect_all() {
        Ok(c) => c,
        Err(CollectorError::Invalid {
            collection,
            rejected,
        }) => {
            eprintln!();
            eprintln!("  Collection `{collection}` has invalid documents:");
            for r in &rejected {
                eprintln!("  ✗ {}: {}", r.path.display(), r.error);
            }
            eprintln!();
            return Err(CollectorError::Invalid {
                collection,
                rejected,
            })
            .wrap_err("Build failed");
        }
        Err(e) => return Err(e).wrap_err("Build failed"),
    };

    let output = &config.build.output;
    let manifest = write_manifest(&collections, output)
        .wrap_err_with(|| format!("Failed to write manifest: {}", output.display()))?;

    let duration = start.elapsed();
    let skipped: usize = collections.iter().map(|c| c.stats.skipped).sum();

    println!();
    println!("  Build completed successfully!");
    println!();
    println!("  Collections: {}", collections.len());
    println!("  Entries:     {}", manifest.entry_count());
    println!("  Skipped:     {skipped}");
    println!();
    println!("  Duration:    {:.2}s", duration.as_secs_f64());
    println!("  Output:      {}", output.display());
    println!();

    tracing::info!(?duration, entries = manifest.entry_count(), "Build completed successfully");

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn site(dir: &Path, bad: bool) -> std::path::PathBuf {
        let chapters = dir.join("content/js-proxy");
        fs::create_dir_all(&chapters).expect("mkdir");
        fs::write(
            chapters.join("intro.md"),
            "---\ntitle: \"Intro\"\ndescription: \"d\"\nchapterNumber: 1\n---\nBody\n",
        )
        .expect("write");
        if bad {
            fs::write(chapters.join("bad.md"), "---\ntitle: \"Bad\"\n---\n").expect("write");
        }

        let config = dir.join("folio.toml");
        fs::write(
            &config,
            format!(
                "[build]\ncontent_dir = \"{}\"\noutput = \"{}\"\n",
                dir.join("content").display(),
                dir.join("dist/collections.json").display()
            ),
        )
        .expect("write");
        config
    }

    #[test]
    fn test_build_writes_manifest() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = site(dir.path(), false);

        run(&config, None, false).expect("build");

        let manifest =
            folio_collector::read_manifest(&dir.path().join("dist/collections.json"))
                .expect("manifest");
        assert_eq!(manifest.entry_count(), 1);
    }

    #[test]
    fn test_build_fails_on_invalid_document() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = site(dir.path(), true);

        assert!(run(&config, None, false).is_err());
        assert!(!dir.path().join("dist/collections.json").exists());
    }

    #[test]
    fn test_build_skip_invalid_with_output_override() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = site(dir.path(), true);
        let out = dir.path().join("elsewhere.json");

        run(&config, Some(&out), true).expect("build");

        let manifest = folio_collector::read_manifest(&out).expect("manifest");
        assert_eq!(manifest.entry_count(), 1);
        assert_eq!(manifest.collections["js-proxy"].stats.skipped, 1);
    }
}
