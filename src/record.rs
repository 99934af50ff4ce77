//! Documentation records and the generator payload they are loaded from.
//!
//! A documentation generator ships its search data as a script assigning a
//! JSON object to a global, e.g.
//!
//! ```text
//! var documenterSearchIndex = {"docs": [{"location": "...", "page": "...", ...}]}
//! ```
//!
//! [`parse_payload`] accepts that form, the bare object, or a bare record array.

use crate::error::LoadError;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::{path::Path, sync::LazyLock};

/// Matches a leading `var name =` (or `let`/`const`) JS assignment.
static ASSIGNMENT_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:var|let|const)\s+[A-Za-z_$][A-Za-z0-9_$]*\s*=\s*").expect("valid regex")
});

/// Kind of documentation unit a record describes. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Page,
    Section,
    Module,
    Macro,
    Type,
    #[default]
    #[serde(other)]
    Other,
}

/// One indexed documentation unit (a page or a page section).
///
/// Deserialization is lenient: `null` string fields read as empty and an
/// unrecognized `category` of any JSON type reads as [`Category::Other`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocRecord {
    /// Position of the record in the input array
    #[serde(skip_deserializing)]
    pub id: u32,
    /// Deep link to the page section, e.g. `howto/parallel/#In-place-mutation`.
    /// An empty string is the site root; `None` means the payload omitted it.
    #[serde(default)]
    pub location: Option<String>,
    /// Title of the containing page
    #[serde(default, deserialize_with = "null_as_default")]
    pub page: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
    #[serde(default, deserialize_with = "any_category")]
    pub category: Category,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn any_category<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Category, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(Category::deserialize(value).unwrap_or_default())
}

impl DocRecord {
    /// Creates a record with an empty page name and [`Category::Page`].
    pub fn new(
        id: u32,
        location: impl Into<String>,
        title: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id,
            location: Some(location.into()),
            page: String::new(),
            title: title.into(),
            text: text.into(),
            category: Category::Page,
        }
    }

    /// Sets the containing page title.
    #[must_use]
    pub fn with_page(mut self, page: impl Into<String>) -> Self {
        self.page = page.into();
        self
    }

    /// Sets the record category.
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Returns why this record cannot be indexed, if it cannot.
    pub fn defect(&self) -> Option<&'static str> {
        if self.location.is_none() {
            Some("missing location")
        } else if self.title.trim().is_empty() && self.text.trim().is_empty() {
            Some("empty title and text")
        } else {
            None
        }
    }
}

/// Parses a generator payload into records, assigning ids by position.
///
/// An array element that is not a record object (or has a non-string title,
/// text, page or location) still takes its position but loads without a
/// location, so the index builder skips it like any other malformed record.
pub fn parse_payload(source: &str) -> Result<Vec<DocRecord>, LoadError> {
    let body = ASSIGNMENT_PREFIX.replace(source, "");
    let body = body.trim_end().trim_end_matches(';');

    let value: Value = serde_json::from_str(body)?;
    let docs = match value {
        array @ Value::Array(_) => array,
        Value::Object(mut object) => object
            .remove("docs")
            .ok_or_else(|| LoadError::Shape("object has no `docs` field".to_string()))?,
        other => {
            return Err(LoadError::Shape(format!(
                "expected an object or array, found {}",
                json_kind(&other)
            )));
        }
    };

    let elements = match docs {
        Value::Array(elements) => elements,
        other => {
            return Err(LoadError::Shape(format!(
                "`docs` must be an array, found {}",
                json_kind(&other)
            )));
        }
    };

    let records = elements
        .into_iter()
        .enumerate()
        .map(|(position, element)| {
            let id = u32::try_from(position)
                .map_err(|_| LoadError::Shape(format!("too many records ({})", position)))?;
            let record = DocRecord::deserialize(element).unwrap_or_else(|e| {
                tracing::debug!("Record {} is unreadable: {}", position, e);
                DocRecord::default()
            });
            Ok(DocRecord { id, ..record })
        })
        .collect::<Result<Vec<_>, LoadError>>()?;

    tracing::debug!("Parsed {} records from search payload", records.len());
    Ok(records)
}

/// Reads and parses a payload file.
pub fn load_records(path: &Path) -> Result<Vec<DocRecord>, LoadError> {
    let source = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_payload(&source)
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use rstest::rstest;

    const PAYLOAD: &str = r#"var documenterSearchIndex = {"docs":
[{"location":"howto/parallel/","page":"How to do X in parallel?","title":"How to do X in parallel?","text":"using FLoops","category":"page"},{"location":"howto/parallel/#In-place-mutation","page":"How to do X in parallel?","title":"In-place mutation","text":"","category":"section"},{"location":"reference/api/#FLoops.@floop","page":"API","title":"FLoops.@floop","text":"@floop begin ... end","category":"macro"}]
}
"#;

    #[test]
    fn test_parse_js_assignment() {
        let records = parse_payload(PAYLOAD).unwrap();
        check!(records.len() == 3);
        check!(records[0].id == 0);
        check!(records[2].id == 2);
        check!(records[1].location.as_deref() == Some("howto/parallel/#In-place-mutation"));
        check!(records[1].category == Category::Section);
        check!(records[2].category == Category::Macro);
        check!(records[0].page == "How to do X in parallel?");
    }

    #[rstest]
    #[case(r#"{"docs": [{"location": "a/", "title": "A"}]}"#)]
    #[case(r#"[{"location": "a/", "title": "A"}]"#)]
    #[case(r#"const idx = [{"location": "a/", "title": "A"}];"#)]
    fn test_accepted_shapes(#[case] source: &str) {
        let records = parse_payload(source).unwrap();
        check!(records.len() == 1);
        check!(records[0].title == "A");
        check!(records[0].text.is_empty());
        check!(records[0].category == Category::Other);
    }

    #[test]
    fn test_missing_and_null_location() {
        let records = parse_payload(
            r#"[{"title": "A"}, {"location": null, "title": "B"}, {"location": "", "title": "C"}]"#,
        )
        .unwrap();
        check!(records[0].location.is_none());
        check!(records[1].location.is_none());
        check!(records[2].location.as_deref() == Some(""));
    }

    #[test]
    fn test_unknown_category_is_other() {
        let records =
            parse_payload(r#"[{"location": "a/", "title": "A", "category": "constant"}]"#).unwrap();
        check!(records[0].category == Category::Other);
    }

    #[test]
    fn test_null_fields_read_as_empty() {
        let records = parse_payload(
            r#"[{"location": "a/", "page": null, "title": "A", "text": null, "category": null}]"#,
        )
        .unwrap();
        check!(records[0].page.is_empty());
        check!(records[0].text.is_empty());
        check!(records[0].category == Category::Other);
        check!(records[0].defect().is_none());
    }

    #[test]
    fn test_non_string_category_is_other() {
        let records = parse_payload(r#"[{"location": "a/", "title": "A", "category": 7}]"#).unwrap();
        check!(records[0].category == Category::Other);
    }

    #[test]
    fn test_unreadable_elements_keep_their_position() {
        let records = parse_payload(
            r#"[{"location": "a/", "title": "A"}, 42, {"location": "b/", "title": 3}, {"location": "c/", "title": "C"}]"#,
        )
        .unwrap();
        check!(records.len() == 4);
        check!(records.iter().map(|r| r.id).collect::<Vec<_>>() == vec![0, 1, 2, 3]);
        check!(records[1].defect() == Some("missing location"));
        check!(records[2].defect() == Some("missing location"));
        check!(records[3].title == "C");
    }

    #[rstest]
    #[case(r#"{"pages": []}"#)]
    #[case(r#"{"docs": 3}"#)]
    #[case("42")]
    fn test_wrong_shape(#[case] source: &str) {
        let_assert!(Err(LoadError::Shape(_)) = parse_payload(source));
    }

    #[test]
    fn test_invalid_json() {
        let_assert!(Err(LoadError::Parse(_)) = parse_payload("var x = {\"docs\": [}"));
    }

    #[rstest]
    #[case(DocRecord { location: None, ..DocRecord::new(0, "", "Title", "text") }, Some("missing location"))]
    #[case(DocRecord::new(0, "", "FLoops.jl", "CurrentModule = FLoops"), None)]
    #[case(DocRecord::new(0, "a/", "", " \n"), Some("empty title and text"))]
    #[case(DocRecord::new(0, "a/", "Title", ""), None)]
    #[case(DocRecord::new(0, "a/", "", "text"), None)]
    fn test_defect(#[case] record: DocRecord, #[case] expected: Option<&str>) {
        check!(record.defect() == expected);
    }
}
