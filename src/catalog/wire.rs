//! Wire formats of the Open Library endpoints and their normalization.
//!
//! Every list field is decoded leniently: a missing field, a `null`, or a value
//! of the wrong shape becomes an empty list, and individual malformed entries
//! are skipped rather than failing the whole response.

use crate::domain::{AuthorWork, BookDetail, BookSummary, FirstPublished};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Text shown when a work has no usable description.
pub const NO_DESCRIPTION: &str = "No description available.";

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// `GET /search.json` response.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default, deserialize_with = "lenient_list")]
    pub docs: Vec<RawDoc>,
}

/// One search document.
#[derive(Debug, Deserialize)]
pub struct RawDoc {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub author_name: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub author_key: Vec<String>,
    #[serde(default)]
    pub cover_i: Option<i64>,
    #[serde(default)]
    pub first_publish_year: Option<i32>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub publish_year: Vec<i32>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub language: Vec<String>,
}

impl From<RawDoc> for BookSummary {
    fn from(doc: RawDoc) -> Self {
        let first_publish_year = doc
            .first_publish_year
            .or_else(|| doc.publish_year.first().copied());
        Self {
            key: doc.key,
            title: doc.title,
            author_names: doc.author_name,
            author_ids: doc.author_key,
            cover_id: doc.cover_i,
            first_publish_year,
            languages: doc.language,
        }
    }
}

/// `GET /subjects/{name}.json` response.
#[derive(Debug, Deserialize)]
pub struct SubjectResponse {
    #[serde(default, deserialize_with = "lenient_list")]
    pub works: Vec<RawWork>,
}

/// One work listed under a subject.
#[derive(Debug, Deserialize)]
pub struct RawWork {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub authors: Vec<RawAuthorRef>,
    #[serde(default)]
    pub cover_id: Option<i64>,
    #[serde(default)]
    pub first_publish_year: Option<i32>,
}

/// Author reference embedded in a subject work (`{ key: "/authors/OL1A", name }`).
#[derive(Debug, Deserialize)]
pub struct RawAuthorRef {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub name: String,
}

impl From<RawWork> for BookSummary {
    fn from(work: RawWork) -> Self {
        let (author_names, author_ids): (Vec<String>, Vec<String>) = work
            .authors
            .into_iter()
            .map(|author| {
                let id = author.key.rsplit('/').next().unwrap_or_default().to_string();
                (author.name, id)
            })
            .unzip();
        Self {
            key: work.key,
            title: work.title,
            author_names,
            author_ids,
            cover_id: work.cover_id,
            first_publish_year: work.first_publish_year,
            languages: Vec::new(),
        }
    }
}

/// `GET /works/{id}.json` response, reduced to the consumed fields.
#[derive(Debug, Deserialize)]
pub struct RawWorkDetail {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default)]
    pub first_publish_date: Option<String>,
    #[serde(default)]
    pub first_publish_year: Option<i32>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub subjects: Vec<String>,
}

impl From<RawWorkDetail> for BookDetail {
    fn from(raw: RawWorkDetail) -> Self {
        Self {
            title: raw.title.unwrap_or_default(),
            description: normalize_description(raw.description.as_ref()),
            first_published: first_published(raw.first_publish_date, raw.first_publish_year),
            subjects: raw.subjects,
        }
    }
}

/// `GET /authors/{id}.json` response.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAuthor {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bio: Option<Value>,
}

/// `GET /authors/{id}/works.json` response.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorWorksResponse {
    #[serde(default, deserialize_with = "lenient_list")]
    pub entries: Vec<RawAuthorWork>,
}

/// One entry of an author's works listing.
#[derive(Debug, Clone, Deserialize)]
pub struct RawAuthorWork {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub first_publish_date: Option<String>,
    #[serde(default)]
    pub first_publish_year: Option<i32>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub covers: Vec<i64>,
}

impl From<RawAuthorWork> for AuthorWork {
    fn from(raw: RawAuthorWork) -> Self {
        Self {
            key: raw.key,
            title: raw.title,
            first_published: first_published(raw.first_publish_date, raw.first_publish_year),
            cover_id: raw.covers.first().copied(),
        }
    }
}

/// Date text wins over the bare year; blank text counts as missing.
fn first_published(date: Option<String>, year: Option<i32>) -> Option<FirstPublished> {
    date.filter(|d| !d.trim().is_empty())
        .map(FirstPublished::Date)
        .or_else(|| year.map(FirstPublished::Year))
}

/// Extracts text from a description-like field.
///
/// Accepts a plain string or an object carrying a string `value`
/// (`{"type": "/type/text", "value": "..."}`). Empty text counts as missing.
#[must_use]
pub fn description_text(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.as_str(),
        Value::Object(map) => map.get("value")?.as_str()?,
        _ => return None,
    };
    (!text.is_empty()).then(|| text.to_string())
}

/// Normalizes a work description, never returning an empty string.
///
/// # Examples
///
/// ```
/// use bookfinder::catalog::wire::{normalize_description, NO_DESCRIPTION};
/// use serde_json::json;
///
/// assert_eq!(normalize_description(Some(&json!({"value": "x"}))), "x");
/// assert_eq!(normalize_description(Some(&json!("plain"))), "plain");
/// assert_eq!(normalize_description(Some(&json!(null))), NO_DESCRIPTION);
/// assert_eq!(normalize_description(None), NO_DESCRIPTION);
/// ```
#[must_use]
pub fn normalize_description(value: Option<&Value>) -> String {
    description_text(value).unwrap_or_else(|| NO_DESCRIPTION.to_string())
}
