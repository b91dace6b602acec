//! Collection schemas and the front matter validator.
//!
//! A [`Schema`] is a fixed list of fields. Validating a document's
//! [`Metadata`] against it either admits the document as a [`Record`]
//! holding exactly the declared fields, or rejects it with a
//! [`SchemaError`]. Validation is pure: no I/O, no logging.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::{
    error::SchemaError,
    value::{Metadata, RawValue},
};

/// Type a schema field must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Integer,
    Float,
    Boolean,
    List,
}

impl FieldType {
    /// Whether a raw value satisfies this type. No coercion is applied.
    pub fn accepts(&self, value: &RawValue) -> bool {
        matches!(
            (self, value),
            (Self::Text, RawValue::Text(_))
                | (Self::Integer, RawValue::Integer(_))
                | (Self::Float, RawValue::Float(_) | RawValue::Integer(_))
                | (Self::Boolean, RawValue::Bool(_))
                | (Self::List, RawValue::List(_))
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::List => "list",
        };
        f.write_str(name)
    }
}

/// A single declared field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// Front matter key.
    pub name: String,

    /// Required type.
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Whether the field must be present.
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

impl FieldSchema {
    pub fn required(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: true,
        }
    }

    pub fn optional(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
        }
    }

    /// Check one field of a metadata record.
    fn check(&self, metadata: &Metadata, source_id: &str) -> Result<Option<RawValue>, SchemaError> {
        match metadata.get(&self.name) {
            None | Some(RawValue::Null) if self.required => {
                Err(SchemaError::missing(source_id, &self.name))
            }
            None | Some(RawValue::Null) => Ok(None),
            Some(value) if self.field_type.accepts(value) => Ok(Some(value.clone())),
            Some(value) => Err(SchemaError::mismatch(
                source_id,
                &self.name,
                self.field_type.to_string(),
                value.kind(),
            )),
        }
    }
}

/// Fixed field shape every document in a collection must satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub fields: Vec<FieldSchema>,
}

/// Front matter keys of the chapter schema.
pub mod chapter_fields {
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const CHAPTER_NUMBER: &str = "chapterNumber";
}

impl Default for Schema {
    fn default() -> Self {
        Self::chapters()
    }
}

impl Schema {
    pub fn new(fields: Vec<FieldSchema>) -> Self {
        Self { fields }
    }

    /// The tutorial chapter schema: `title`, `description`, `chapterNumber`.
    pub fn chapters() -> Self {
        Self::new(vec![
            FieldSchema::required(chapter_fields::TITLE, FieldType::Text),
            FieldSchema::required(chapter_fields::DESCRIPTION, FieldType::Text),
            FieldSchema::required(chapter_fields::CHAPTER_NUMBER, FieldType::Integer),
        ])
    }

    /// Look up a declared field.
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validate metadata, stopping at the first failing field in declaration order.
    ///
    /// Keys not declared by the schema are dropped from the returned record.
    pub fn validate(&self, metadata: &Metadata, source_id: &str) -> Result<Record, SchemaError> {
        let mut fields = BTreeMap::new();
        for field in &self.fields {
            if let Some(value) = field.check(metadata, source_id)? {
                fields.insert(field.name.clone(), value);
            }
        }
        Ok(Record { fields })
    }

    /// Collect every failing field, in declaration order.
    pub fn diagnose(&self, metadata: &Metadata, source_id: &str) -> Vec<SchemaError> {
        self.fields
            .iter()
            .filter_map(|field| field.check(metadata, source_id).err())
            .collect()
    }
}

/// Metadata that passed schema validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, RawValue>,
}

impl Record {
    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.fields.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(RawValue::as_text)
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(RawValue::as_integer)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn take(&mut self, name: &str) -> Option<RawValue> {
        self.fields.remove(name)
    }
}

/// Typed front matter of a tutorial chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterFrontmatter {
    pub title: String,
    pub description: String,
    pub chapter_number: i64,
}

impl ChapterFrontmatter {
    /// Validate raw metadata against [`Schema::chapters`].
    pub fn from_metadata(metadata: &Metadata, source_id: &str) -> Result<Self, SchemaError> {
        let record = Schema::chapters().validate(metadata, source_id)?;
        Self::from_record(record, source_id)
    }

    /// Convert a record validated by a schema compatible with the chapter schema.
    pub fn from_record(mut record: Record, source_id: &str) -> Result<Self, SchemaError> {
        use crate::schema::chapter_fields::{CHAPTER_NUMBER, DESCRIPTION, TITLE};

        let mut text = |name: &str| match record.take(name) {
            Some(RawValue::Text(s)) => Ok(s),
            Some(other) => Err(SchemaError::mismatch(source_id, name, "text", other.kind())),
            None => Err(SchemaError::missing(source_id, name)),
        };
        let title = text(TITLE)?;
        let description = text(DESCRIPTION)?;

        let chapter_number = match record.take(CHAPTER_NUMBER) {
            Some(RawValue::Integer(n)) => n,
            Some(other) => {
                return Err(SchemaError::mismatch(
                    source_id,
                    CHAPTER_NUMBER,
                    "integer",
                    other.kind(),
                ));
            }
            None => return Err(SchemaError::missing(source_id, CHAPTER_NUMBER)),
        };

        Ok(Self {
            title,
            description,
            chapter_number,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueKind;

    fn meta(entries: &[(&str, RawValue)]) -> Metadata {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    fn text(s: &str) -> RawValue {
        RawValue::Text(s.to_string())
    }

    #[test]
    fn test_valid_chapter_accepted_unchanged() {
        let m = meta(&[
            ("title", text("Using Reflect")),
            ("description", text("Use Reflect API...")),
            ("chapterNumber", RawValue::Integer(4)),
        ]);

        let chapter = ChapterFrontmatter::from_metadata(&m, "reflect").expect("valid");
        assert_eq!(
            chapter,
            ChapterFrontmatter {
                title: "Using Reflect".to_string(),
                description: "Use Reflect API...".to_string(),
                chapter_number: 4,
            }
        );
    }

    #[test]
    fn test_values_not_trimmed() {
        let m = meta(&[
            ("title", text("  padded  ")),
            ("description", text("d\n")),
            ("chapterNumber", RawValue::Integer(-1)),
        ]);
        let chapter = ChapterFrontmatter::from_metadata(&m, "padded").expect("valid");
        assert_eq!(chapter.title, "  padded  ");
        assert_eq!(chapter.description, "d\n");
        assert_eq!(chapter.chapter_number, -1);
    }

    #[test]
    fn test_missing_description() {
        let m = meta(&[
            ("title", text("Using Reflect")),
            ("chapterNumber", RawValue::Integer(4)),
        ]);
        let err = ChapterFrontmatter::from_metadata(&m, "reflect").unwrap_err();
        assert_eq!(err, SchemaError::missing("reflect", "description"));
    }

    #[test]
    fn test_each_missing_field_is_named() {
        let full = [
            ("title", text("t")),
            ("description", text("d")),
            ("chapterNumber", RawValue::Integer(1)),
        ];
        for skip in 0..full.len() {
            let entries: Vec<_> = full
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != skip)
                .map(|(_, e)| e.clone())
                .collect();
            let err = Schema::chapters()
                .validate(&meta(&entries), "doc")
                .unwrap_err();
            assert!(err.is_missing());
            assert_eq!(err.field(), full[skip].0);
        }
    }

    #[test]
    fn test_chapter_number_as_text() {
        let m = meta(&[
            ("title", text("Chapter")),
            ("description", text("desc")),
            ("chapterNumber", text("four")),
        ]);
        let err = ChapterFrontmatter::from_metadata(&m, "four").unwrap_err();
        assert_eq!(
            err,
            SchemaError::mismatch("four", "chapterNumber", "integer", ValueKind::Text)
        );
    }

    #[test]
    fn test_chapter_number_rejects_float_bool_and_numeric_text() {
        for bad in [
            RawValue::Float(4.0),
            RawValue::Float(4.5),
            RawValue::Bool(true),
            text("4"),
            RawValue::List(vec![RawValue::Integer(4)]),
        ] {
            let m = meta(&[
                ("title", text("t")),
                ("description", text("d")),
                ("chapterNumber", bad.clone()),
            ]);
            let err = Schema::chapters().validate(&m, "doc").unwrap_err();
            assert!(err.is_mismatch(), "{bad:?} should be a mismatch");
            assert_eq!(err.field(), "chapterNumber");
        }
    }

    #[test]
    fn test_title_as_number_is_mismatch() {
        let m = meta(&[
            ("title", RawValue::Integer(7)),
            ("description", text("d")),
            ("chapterNumber", RawValue::Integer(7)),
        ]);
        let err = Schema::chapters().validate(&m, "doc").unwrap_err();
        assert_eq!(
            err,
            SchemaError::mismatch("doc", "title", "text", ValueKind::Integer)
        );
    }

    #[test]
    fn test_empty_text_is_accepted() {
        let m = meta(&[
            ("title", text("")),
            ("description", text("desc")),
            ("chapterNumber", RawValue::Integer(1)),
        ]);
        let chapter = ChapterFrontmatter::from_metadata(&m, "empty").expect("valid");
        assert_eq!(chapter.title, "");
    }

    #[test]
    fn test_null_counts_as_missing() {
        let m = meta(&[
            ("title", RawValue::Null),
            ("description", text("d")),
            ("chapterNumber", RawValue::Integer(1)),
        ]);
        let err = Schema::chapters().validate(&m, "doc").unwrap_err();
        assert_eq!(err, SchemaError::missing("doc", "title"));
    }

    #[test]
    fn test_unknown_keys_are_stripped() {
        let m = meta(&[
            ("title", text("t")),
            ("description", text("d")),
            ("chapterNumber", RawValue::Integer(2)),
            ("draft", RawValue::Bool(true)),
        ]);
        let record = Schema::chapters().validate(&m, "doc").expect("valid");
        assert_eq!(record.len(), 3);
        assert!(record.get("draft").is_none());
        assert_eq!(record.integer("chapterNumber"), Some(2));
    }

    #[test]
    fn test_first_error_in_declaration_order() {
        let m = meta(&[("chapterNumber", text("x"))]);
        let err = Schema::chapters().validate(&m, "doc").unwrap_err();
        assert_eq!(err.field(), "title");
    }

    #[test]
    fn test_diagnose_reports_every_issue() {
        let m = meta(&[("description", RawValue::Integer(3)), ("chapterNumber", text("x"))]);
        let issues = Schema::chapters().diagnose(&m, "doc");
        let fields: Vec<_> = issues.iter().map(SchemaError::field).collect();
        assert_eq!(fields, vec!["title", "description", "chapterNumber"]);
        assert!(issues[0].is_missing());
        assert!(issues[1].is_mismatch());
        assert!(issues[2].is_mismatch());
    }

    #[test]
    fn test_diagnose_empty_for_valid() {
        let m = meta(&[
            ("title", text("t")),
            ("description", text("d")),
            ("chapterNumber", RawValue::Integer(1)),
        ]);
        assert!(Schema::chapters().diagnose(&m, "doc").is_empty());
    }

    #[test]
    fn test_validation_is_idempotent() {
        let m = meta(&[
            ("title", text("t")),
            ("description", text("d")),
            ("chapterNumber", RawValue::Integer(9)),
        ]);
        let schema = Schema::chapters();
        assert_eq!(schema.validate(&m, "doc"), schema.validate(&m, "doc"));

        let bad = meta(&[("title", text("t"))]);
        assert_eq!(schema.validate(&bad, "doc"), schema.validate(&bad, "doc"));
    }

    #[test]
    fn test_optional_field() {
        let schema = Schema::new(vec![
            FieldSchema::required("title", FieldType::Text),
            FieldSchema::optional("weight", FieldType::Float),
        ]);

        let record = schema
            .validate(&meta(&[("title", text("t"))]), "doc")
            .expect("valid");
        assert!(record.get("weight").is_none());

        let record = schema
            .validate(
                &meta(&[("title", text("t")), ("weight", RawValue::Integer(2))]),
                "doc",
            )
            .expect("integer satisfies float");
        assert_eq!(record.get("weight"), Some(&RawValue::Integer(2)));

        let err = schema
            .validate(&meta(&[("title", text("t")), ("weight", text("2"))]), "doc")
            .unwrap_err();
        assert!(err.is_mismatch());
    }

    #[test]
    fn test_from_record_requires_chapter_shape() {
        let schema = Schema::new(vec![FieldSchema::required("title", FieldType::Text)]);
        let record = schema
            .validate(&meta(&[("title", text("t"))]), "doc")
            .expect("valid");
        let err = ChapterFrontmatter::from_record(record, "doc").unwrap_err();
        assert_eq!(err, SchemaError::missing("doc", "description"));
    }

    #[test]
    fn test_field_schema_deserialize_defaults_required() {
        let field: FieldSchema =
            toml::from_str("name = \"title\"\ntype = \"text\"").expect("toml");
        assert!(field.required);
        assert_eq!(field.field_type, FieldType::Text);
    }

    #[test]
    fn test_chapter_serializes_camel_case() {
        let chapter = ChapterFrontmatter {
            title: "t".to_string(),
            description: "d".to_string(),
            chapter_number: 3,
        };
        let yaml = serde_yaml::to_string(&chapter).expect("yaml");
        assert!(yaml.contains("chapterNumber: 3"));
    }
}
