//! Notion API request and response models.
//!
//! These structs map to the Notion REST API JSON payloads used by the
//! adapter. They are internal to the adapter and not part of the domain
//! model.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::domain::models::{PropertyValue, RecordProperties};

/// Maximum length of a single Notion text object's `content`.
pub const MAX_TEXT_CONTENT: usize = 2000;

/// Body of `POST /v1/databases/{id}/query`.
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseQueryRequest {
    /// Filter applied to the database rows.
    pub filter: PropertyFilter,
}

impl DatabaseQueryRequest {
    /// Exact-match filter on a `url` property.
    pub fn url_equals(property: &str, url: &str) -> Self {
        Self {
            filter: PropertyFilter {
                property: property.to_string(),
                url: UrlCondition {
                    equals: url.to_string(),
                },
            },
        }
    }
}

/// A single-property filter.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyFilter {
    /// Name of the filtered property.
    pub property: String,
    /// Condition for `url` properties.
    pub url: UrlCondition,
}

/// Condition on a `url` property.
#[derive(Debug, Clone, Serialize)]
pub struct UrlCondition {
    /// Value the property must equal.
    pub equals: String,
}

/// Response of a database query.
///
/// Only the first page of results is read; `has_more` is kept for logging.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    /// Matching pages.
    #[serde(default)]
    pub results: Vec<PageObject>,
    /// Whether more results are available.
    #[serde(default)]
    pub has_more: bool,
}

/// A page object; only the id is used.
#[derive(Debug, Clone, Deserialize)]
pub struct PageObject {
    /// Page id.
    pub id: String,
}

/// Body of `POST /v1/pages`.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePageRequest {
    /// Database the page is created in.
    pub parent: DatabaseParent,
    /// Property values keyed by property name.
    pub properties: Map<String, Value>,
}

/// Parent reference for a database row.
#[derive(Debug, Clone, Serialize)]
pub struct DatabaseParent {
    /// Target database id.
    pub database_id: String,
}

/// Body of `PATCH /v1/pages/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdatePageRequest {
    /// Property values to overwrite.
    pub properties: Map<String, Value>,
}

/// Error body returned by the Notion API.
#[derive(Debug, Clone, Deserialize)]
pub struct NotionErrorBody {
    /// Machine-readable error code, e.g. `validation_error`.
    #[serde(default)]
    pub code: Option<String>,
    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,
}

impl NotionErrorBody {
    /// `"code: message"`, falling back to whichever part is present.
    pub fn describe(&self) -> Option<String> {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => Some(format!("{code}: {message}")),
            (None, Some(message)) => Some(message.clone()),
            (Some(code), None) => Some(code.clone()),
            (None, None) => None,
        }
    }
}

/// Render a record's properties as Notion property values.
pub fn properties_json(properties: &RecordProperties) -> Map<String, Value> {
    properties
        .iter()
        .map(|(name, value)| (name.to_string(), property_json(value)))
        .collect()
}

/// Render one property value.
pub fn property_json(value: &PropertyValue) -> Value {
    match value {
        PropertyValue::Title(text) => json!({ "title": text_objects(text) }),
        PropertyValue::Url(url) => json!({ "url": url }),
        PropertyValue::RichText(text) => json!({ "rich_text": text_objects(text) }),
        PropertyValue::Relation(ids) => json!({
            "relation": ids.iter().map(|id| json!({ "id": id })).collect::<Vec<_>>()
        }),
    }
}

/// Split text into consecutive text objects of at most [`MAX_TEXT_CONTENT`] characters.
fn text_objects(text: &str) -> Vec<Value> {
    if text.is_empty() {
        return vec![json!({ "text": { "content": "" } })];
    }
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(MAX_TEXT_CONTENT)
        .map(|chunk| {
            let content: String = chunk.iter().collect();
            json!({ "text": { "content": content } })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{property, PageId};

    #[test]
    fn test_query_request_serialization() {
        let req = DatabaseQueryRequest::url_equals("URL", "https://github.com/alice");
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({ "filter": { "property": "URL", "url": { "equals": "https://github.com/alice" } } })
        );
    }

    #[test]
    fn test_issue_properties_rendering() {
        let props = RecordProperties::new()
            .with(property::NAME, PropertyValue::Title("Bug X".to_string()))
            .with(property::URL, PropertyValue::Url("https://github.com/o/r/issues/1".to_string()))
            .with(property::USER, PropertyValue::Relation(vec![PageId::new("u1")]));
        let rendered = properties_json(&props);

        assert_eq!(
            rendered["Name"],
            json!({ "title": [{ "text": { "content": "Bug X" } }] })
        );
        assert_eq!(rendered["URL"], json!({ "url": "https://github.com/o/r/issues/1" }));
        assert_eq!(rendered["User"], json!({ "relation": [{ "id": "u1" }] }));
    }

    #[test]
    fn test_long_rich_text_is_chunked() {
        let body = "é".repeat(MAX_TEXT_CONTENT * 2 + 5);
        let value = property_json(&PropertyValue::RichText(body));
        let parts = value["rich_text"].as_array().unwrap();
        assert_eq!(parts.len(), 3);
        assert_eq!(
            parts[0]["text"]["content"].as_str().unwrap().chars().count(),
            MAX_TEXT_CONTENT
        );
        assert_eq!(parts[2]["text"]["content"].as_str().unwrap().chars().count(), 5);
    }

    #[test]
    fn test_empty_title_still_has_text_object() {
        let value = property_json(&PropertyValue::Title(String::new()));
        assert_eq!(value, json!({ "title": [{ "text": { "content": "" } }] }));
    }

    #[test]
    fn test_error_body_description() {
        let body: NotionErrorBody = serde_json::from_str(
            r#"{"object":"error","status":400,"code":"validation_error","message":"URL is not a property that exists."}"#,
        )
        .unwrap();
        assert_eq!(
            body.describe().unwrap(),
            "validation_error: URL is not a property that exists."
        );

        let empty: NotionErrorBody = serde_json::from_str("{}").unwrap();
        assert!(empty.describe().is_none());
    }

    #[test]
    fn test_query_response_deserialization() {
        let resp: QueryResponse = serde_json::from_str(
            r#"{"object":"list","results":[{"object":"page","id":"p-1","properties":{}}],"has_more":false,"next_cursor":null}"#,
        )
        .unwrap();
        assert_eq!(resp.results.len(), 1);
        assert_eq!(resp.results[0].id, "p-1");
        assert!(!resp.has_more);
    }
}
