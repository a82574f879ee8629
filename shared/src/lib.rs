use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

pub mod pagination;

pub use pagination::{LoaderState, PageAdvance, SkipReason};

/// Path of the paginated JSON search endpoint
pub const SEARCH_ENDPOINT: &str = "/api/search";
/// Page size used when the trigger does not declare one
pub const DEFAULT_PER_PAGE: u32 = 12;
/// The server renders page 1, so the first page the client can load is 2
pub const FIRST_LOADABLE_PAGE: u32 = 2;
/// Link target used for results that arrive without any link
pub const FALLBACK_LINK: &str = "#";

/// Query parameters for a single `/api/search` page request.
///
/// Field order matches the query string the server expects:
/// `termo=..&page=..&per_page=..&source=..`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchQuery {
    /// Search term, never empty
    #[serde(rename = "termo")]
    pub term: String,
    /// 1-based page index
    pub page: u32,
    /// Number of results per page
    pub per_page: u32,
    /// Optional source filter (empty string means "all sources")
    pub source: String,
}

impl SearchQuery {
    /// Build a query, rejecting blank terms and zero page/page-size values
    pub fn new(term: &str, source: &str, page: u32, per_page: u32) -> Result<Self, QueryError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(QueryError::EmptyTerm);
        }
        if page == 0 {
            return Err(QueryError::InvalidPage);
        }
        if per_page == 0 {
            return Err(QueryError::InvalidPageSize);
        }

        Ok(Self {
            term: term.to_string(),
            page,
            per_page,
            source: source.trim().to_string(),
        })
    }

    /// Form-urlencoded query string (without the leading `?`)
    pub fn to_query_string(&self) -> Result<String, QueryError> {
        serde_html_form::to_string(self).map_err(|e| QueryError::Encode(e.to_string()))
    }

    /// Endpoint path plus query string, relative to the site origin
    pub fn endpoint_path(&self) -> Result<String, QueryError> {
        Ok(format!("{}?{}", SEARCH_ENDPOINT, self.to_query_string()?))
    }
}

/// Reasons a `SearchQuery` cannot be built or encoded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("search term is empty")]
    EmptyTerm,
    #[error("page index must be at least 1")]
    InvalidPage,
    #[error("page size must be at least 1")]
    InvalidPageSize,
    #[error("could not encode search query: {0}")]
    Encode(String),
}

/// Failures of one page request. Every variant leaves the loader retryable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadError {
    #[error("network error: {0}")]
    Network(String),
    #[error("search endpoint responded with status {0}")]
    Status(u16),
    #[error("malformed search response: {0}")]
    Decode(String),
    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Sentiment classification attached to a result by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sentiment {
    Positivo,
    Negativo,
    Neutro,
    /// Any other label the server sends, kept verbatim
    Other(String),
}

impl Sentiment {
    /// Parse a server label. Blank labels mean "unset".
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        match label {
            "" => None,
            "positivo" => Some(Sentiment::Positivo),
            "negativo" => Some(Sentiment::Negativo),
            "neutro" => Some(Sentiment::Neutro),
            other => Some(Sentiment::Other(other.to_string())),
        }
    }

    /// Category label used as a CSS class on the rendered article
    pub fn css_class(&self) -> &str {
        match self {
            Sentiment::Positivo => "positivo",
            Sentiment::Negativo => "negativo",
            Sentiment::Neutro => "neutro",
            Sentiment::Other(label) => label,
        }
    }

    /// Label shown to the user: first character upper-cased
    pub fn display_label(&self) -> String {
        let class = self.css_class();
        let mut chars = class.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.css_class())
    }
}

/// Item fields that may be missing from a search result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Title,
    Source,
    Link,
}

impl fmt::Display for ItemField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemField::Title => write!(f, "title"),
            ItemField::Source => write!(f, "source"),
            ItemField::Link => write!(f, "link"),
        }
    }
}

/// A result that was rendered with fallback values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("result #{index} is missing {}", format_fields(.missing))]
pub struct DataShapeError {
    /// Position of the item within its page
    pub index: usize,
    pub missing: Vec<ItemField>,
}

fn format_fields(fields: &[ItemField]) -> String {
    fields
        .iter()
        .map(|field| field.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A single news result as displayed on the page
#[derive(Debug, Clone, PartialEq)]
pub struct ResultItem {
    pub title: String,
    /// Name of the outlet that published the article (rendered as a badge)
    pub source_label: String,
    pub sentiment: Option<Sentiment>,
    /// Link to the full article, `FALLBACK_LINK` when the server sent none
    pub link: String,
}

impl ResultItem {
    /// Decode one entry of the `results` array.
    ///
    /// Never fails: absent or non-string fields fall back to blank values and
    /// are reported in the returned list of missing fields.
    pub fn from_value(value: &Value) -> (Self, Vec<ItemField>) {
        let empty = Map::new();
        let fields = value.as_object().unwrap_or(&empty);
        let mut missing = Vec::new();

        let title = first_text(fields, &["titulo", "title"]);
        if title.is_none() {
            missing.push(ItemField::Title);
        }
        let source_label = first_text(fields, &["fonte"]);
        if source_label.is_none() {
            missing.push(ItemField::Source);
        }
        let link = first_text(fields, &["orig_link", "link"]);
        if link.is_none() {
            missing.push(ItemField::Link);
        }
        let sentiment = first_text(fields, &["sentimento"]).and_then(Sentiment::from_label);

        let item = Self {
            title: title.unwrap_or_default().to_string(),
            source_label: source_label.unwrap_or_default().to_string(),
            sentiment,
            link: link.unwrap_or(FALLBACK_LINK).to_string(),
        };
        (item, missing)
    }

    /// Class list of the rendered `<article>`
    pub fn article_class(&self) -> String {
        match &self.sentiment {
            Some(sentiment) => format!("noticia {}", sentiment.css_class()),
            None => "noticia".to_string(),
        }
    }
}

/// First non-empty string value among `keys`
fn first_text<'a>(fields: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|key| fields.get(*key).and_then(Value::as_str))
        .find(|text| !text.is_empty())
}

/// One page of results returned by `/api/search`
#[derive(Debug, Clone, PartialEq)]
pub struct PageResponse {
    /// Results in server order
    pub results: Vec<ResultItem>,
    /// Authoritative number of pages, at least 1
    pub total_pages: u32,
    /// Page index the server actually served
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    /// Total number of matching results across all pages
    pub total: Option<u64>,
    /// Search term echoed back by the server
    pub term: Option<String>,
    /// Items that were rendered with fallback values
    pub shape_warnings: Vec<DataShapeError>,
}

impl PageResponse {
    /// Decode a response body.
    ///
    /// Only a body that is not a JSON object, or whose `results` is present
    /// but not an array, is rejected. Individual malformed items are kept.
    pub fn from_json_str(body: &str) -> Result<Self, LoadError> {
        let value: Value =
            serde_json::from_str(body).map_err(|e| LoadError::Decode(e.to_string()))?;
        let object = value
            .as_object()
            .ok_or_else(|| LoadError::Decode("expected a JSON object".to_string()))?;

        let raw_results: &[Value] = match object.get("results") {
            None | Some(Value::Null) => &[],
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(LoadError::Decode(format!(
                    "`results` must be an array, got {}",
                    json_kind(other)
                )))
            }
        };

        let mut results = Vec::with_capacity(raw_results.len());
        let mut shape_warnings = Vec::new();
        for (index, raw) in raw_results.iter().enumerate() {
            let (item, missing) = ResultItem::from_value(raw);
            if !missing.is_empty() {
                shape_warnings.push(DataShapeError { index, missing });
            }
            results.push(item);
        }

        Ok(Self {
            results,
            total_pages: object
                .get("total_pages")
                .and_then(as_count)
                .and_then(|n| u32::try_from(n).ok())
                .filter(|n| *n >= 1)
                .unwrap_or(1),
            page: object.get("page").and_then(as_count).and_then(|n| u32::try_from(n).ok()),
            per_page: object.get("per_page").and_then(as_count).and_then(|n| u32::try_from(n).ok()),
            total: object.get("total").and_then(as_count),
            term: object.get("termo").and_then(Value::as_str).map(str::to_string),
            shape_warnings,
        })
    }
}

/// Non-negative integer from a JSON number or numeric string
fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
