//! New command - scaffold a chapter with valid front matter

use std::{
    fs,
    path::{Path, PathBuf},
};

use color_eyre::eyre::{Result, WrapErr, bail, eyre};
use folio_core::{ChapterFrontmatter, ContentType, config::DEFAULT_COLLECTION};

/// Run the new command.
///
/// Creates a chapter file under the collection directory. Without `--number`
/// the chapter is numbered after the highest existing one.
pub fn run(
    config_path: &Path,
    path: &Path,
    collection: Option<&str>,
    number: Option<i64>,
) -> Result<()> {
    tracing::info!(?path, ?collection, ?number, "Creating new chapter");

    let config = crate::load_config(config_path)?;
    let registry = config.registry();
    let name = collection.unwrap_or(DEFAULT_COLLECTION);
    let def = registry
        .get(name)
        .ok_or_else(|| eyre!("Unknown collection `{name}`"))?;

    let file_path = def.directory.join(path);
    let file_path = if ContentType::from_path(&file_path).is_some() {
        file_path
    } else {
        let mut name = file_path.into_os_string();
        name.push(".md");
        PathBuf::from(name)
    };

    if file_path.exists() {
        bail!("Refusing to overwrite {}", file_path.display());
    }

    let number = match number {
        Some(n) => n,
        None => next_chapter_number(&def.directory)?,
    };

    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).wrap_err("Failed to create directories")?;
    }

    fs::write(&file_path, generate_chapter(path, number)?).wrap_err("Failed to write file")?;

    tracing::info!(?file_path, "Created new chapter");
    println!("Created: {}", file_path.display());

    Ok(())
}

/// One past the highest `chapterNumber` among top-level chapters that parse.
fn next_chapter_number(dir: &Path) -> Result<i64> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Ok(1);
    };

    let highest = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| ContentType::from_path(p).is_some())
        .filter_map(|p| {
            let content = fs::read_to_string(&p).ok()?;
            let (meta, _) = folio_core::parse_frontmatter(&content, &p).ok()?;
            meta.get(folio_core::schema::chapter_fields::CHAPTER_NUMBER)?
                .as_integer()
        })
        .max();

    match highest {
        None => Ok(1),
        Some(n) => n
            .checked_add(1)
            .ok_or_else(|| eyre!("Chapter number {n} has no successor, pass --number")),
    }
}

/// Front matter is serialized rather than templated so any title stays valid YAML.
fn generate_chapter(path: &Path, number: i64) -> Result<String> {
    let name = if ContentType::from_path(path).is_some() {
        path.file_stem()
    } else {
        path.file_name()
    };
    let title = name
        .and_then(|s| s.to_str())
        .unwrap_or("Untitled")
        .replace('-', " ");

    let frontmatter = ChapterFrontmatter {
        description: format!("About {title}"),
        title,
        chapter_number: number,
    };
    let yaml = serde_yaml::to_string(&frontmatter).wrap_err("Failed to serialize front matter")?;

    Ok(format!("---\n{yaml}---\n\nWrite your chapter here.\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_chapter(content: &str) -> ChapterFrontmatter {
        let (meta, _) =
            folio_core::parse_frontmatter(content, Path::new("chapter.md")).expect("parse");
        ChapterFrontmatter::from_metadata(&meta, "chapter.md").expect("valid")
    }

    fn site() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = dir.path().join("folio.toml");
        fs::write(
            &config,
            format!("[build]\ncontent_dir = \"{}\"\n", dir.path().display()),
        )
        .expect("write");
        (dir, config)
    }

    #[test]
    fn test_generated_chapter_is_valid() {
        let content = generate_chapter(Path::new("using-reflect"), 4).expect("generate");
        let (meta, body) =
            folio_core::parse_frontmatter(&content, Path::new("using-reflect.md")).expect("parse");
        let chapter = ChapterFrontmatter::from_metadata(&meta, "using-reflect").expect("valid");

        assert_eq!(chapter.title, "using reflect");
        assert_eq!(chapter.chapter_number, 4);
        assert_eq!(body, "Write your chapter here.\n");
    }

    #[test]
    fn test_next_chapter_number() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(next_chapter_number(dir.path()).expect("next"), 1);

        assert_eq!(next_chapter_number(dir.path()).expect("next"), 1);

        let a = generate_chapter(Path::new("a"), 3).expect("generate");
        let b = generate_chapter(Path::new("b"), 7).expect("generate");
        fs::write(dir.path().join("a.md"), a).expect("write");
        fs::write(dir.path().join("b.md"), b).expect("write");
        fs::write(dir.path().join("c.md"), "no front matter").expect("write");

        assert_eq!(next_chapter_number(dir.path()).expect("next"), 8);
    }

    #[test]
    fn test_next_chapter_number_at_limit() {
        let dir = tempfile::tempdir().expect("tempdir");
        let last = generate_chapter(Path::new("last"), i64::MAX).expect("generate");
        fs::write(dir.path().join("last.md"), last).expect("write");

        let err = next_chapter_number(dir.path()).unwrap_err();
        assert!(err.to_string().contains("--number"));
    }

    #[test]
    fn test_generated_chapter_escapes_title() {
        for name in ["the \"get\" trap", "back\\slash", "key: value", "# not a comment"] {
            let content = generate_chapter(Path::new(name), 3).expect("generate");
            let chapter = parse_chapter(&content);
            assert_eq!(chapter.title, name.replace('-', " "));
            assert_eq!(chapter.description, format!("About {}", chapter.title));
            assert_eq!(chapter.chapter_number, 3);
        }
    }

    #[test]
    fn test_new_appends_extension_to_dotted_name() {
        let (dir, config) = site();

        run(&config, Path::new("v1.2"), None, Some(1)).expect("create");

        let created = dir.path().join("js-proxy/v1.2.md");
        let content = fs::read_to_string(&created).expect("read");
        assert_eq!(parse_chapter(&content).title, "v1.2");
        assert!(!dir.path().join("js-proxy/v1.2").exists());
    }

    #[test]
    fn test_new_refuses_overwrite() {
        let (dir, config) = site();

        run(&config, Path::new("traps"), None, None).expect("create");
        let created = dir.path().join("js-proxy/traps.md");
        assert!(created.exists());

        assert!(run(&config, Path::new("traps"), None, Some(2)).is_err());
    }
}
