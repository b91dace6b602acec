//! Front matter extraction for content files.

use std::path::Path;

use crate::{
    error::{CoreError, Result},
    value::{Metadata, RawValue, yaml_key},
};

/// Delimiter types for front matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterFormat {
    /// YAML front matter delimited by `---`.
    Yaml,
    /// TOML front matter delimited by `+++`.
    Toml,
}

impl FrontmatterFormat {
    /// Get the delimiter string for this format.
    pub fn delimiter(&self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }
}

/// Split content into front matter and body.
///
/// Both delimiters must sit on a line of their own. Returns `None` when the
/// content does not open with a delimiter line or the block is never closed.
pub fn split_frontmatter(content: &str) -> Option<(FrontmatterFormat, &str, &str)> {
    let content = content.trim_start_matches('\u{feff}').trim_start();

    let format = if content.starts_with("---") {
        FrontmatterFormat::Yaml
    } else if content.starts_with("+++") {
        FrontmatterFormat::Toml
    } else {
        return None;
    };
    let delimiter = format.delimiter();

    let (opening, rest) = content.split_once('\n')?;
    if opening.trim_end() != delimiter {
        return None;
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == delimiter {
            let frontmatter = &rest[..offset];
            let body = skip_blank_lines(&rest[offset + line.len()..]);
            return Some((format, frontmatter, body));
        }
        offset += line.len();
    }

    None
}

fn skip_blank_lines(mut body: &str) -> &str {
    while let Some((line, rest)) = body.split_once('\n') {
        if !line.trim().is_empty() {
            break;
        }
        body = rest;
    }
    body
}

/// Parse the front matter of a document into raw metadata plus its body.
///
/// A document without a front matter block yields empty metadata and the
/// full content as body; schema validation decides what that means.
pub fn parse_frontmatter(content: &str, path: &Path) -> Result<(Metadata, String)> {
    let Some((format, fm_str, body)) = split_frontmatter(content) else {
        return Ok((Metadata::new(), content.to_string()));
    };

    let metadata = match format {
        FrontmatterFormat::Yaml => parse_yaml(fm_str, path)?,
        FrontmatterFormat::Toml => {
            let table: toml::Table =
                toml::from_str(fm_str).map_err(|e| CoreError::frontmatter(path, e.to_string()))?;
            table
                .into_iter()
                .map(|(k, v)| (k, RawValue::from(v)))
                .collect()
        }
    };

    Ok((metadata, body.to_string()))
}

fn parse_yaml(fm_str: &str, path: &Path) -> Result<Metadata> {
    let value: serde_yaml::Value =
        serde_yaml::from_str(fm_str).map_err(|e| CoreError::frontmatter(path, e.to_string()))?;

    match value {
        serde_yaml::Value::Null => Ok(Metadata::new()),
        serde_yaml::Value::Mapping(map) => Ok(map
            .into_iter()
            .map(|(k, v)| (yaml_key(k), RawValue::from(v)))
            .collect()),
        other => Err(CoreError::frontmatter(
            path,
            format!(
                "front matter must be a mapping, found {}",
                RawValue::from(other).kind()
            ),
        )),
    }
}
