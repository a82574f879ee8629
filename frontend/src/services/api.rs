use async_trait::async_trait;
use gloo::net::http::Request;
use shared::{LoadError, PageResponse, SearchQuery};

/// Source of result pages for the incremental loader
#[async_trait(?Send)]
pub trait SearchApi {
    /// Fetch one page. Any error leaves the caller free to retry the same query.
    async fn search(&self, query: &SearchQuery) -> Result<PageResponse, LoadError>;
}

/// API client for the paginated `/api/search` endpoint
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    /// Create a client that talks to the page's own origin
    pub fn new() -> Self {
        Self {
            base_url: String::new(),
        }
    }

    /// Create a new API client with a custom base URL
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Full request URL for a query
    pub fn search_url(&self, query: &SearchQuery) -> Result<String, LoadError> {
        Ok(format!("{}{}", self.base_url, query.endpoint_path()?))
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl SearchApi for ApiClient {
    async fn search(&self, query: &SearchQuery) -> Result<PageResponse, LoadError> {
        let url = self.search_url(query)?;

        match Request::get(&url).send().await {
            Ok(response) => {
                if !response.ok() {
                    return Err(LoadError::Status(response.status()));
                }
                match response.text().await {
                    Ok(body) => PageResponse::from_json_str(&body),
                    Err(e) => Err(LoadError::Network(format!("Failed to read search response: {}", e))),
                }
            }
            Err(e) => Err(LoadError::Network(format!("Failed to fetch search results: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_origin_url() {
        let client = ApiClient::new();
        let query = SearchQuery::new("eleições", "", 2, 12).unwrap();
        assert_eq!(
            client.search_url(&query).unwrap(),
            "/api/search?termo=elei%C3%A7%C3%B5es&page=2&per_page=12&source="
        );
    }

    #[test]
    fn test_default_page_config_targets_same_origin() {
        let config = crate::config::PageConfig::default();
        let client = ApiClient::with_base_url(config.api_base_url.clone());
        let query = SearchQuery::new("copa", "", 2, 12).unwrap();
        assert_eq!(
            client.search_url(&query).unwrap(),
            ApiClient::new().search_url(&query).unwrap()
        );
    }

    #[test]
    fn test_custom_base_url_drops_trailing_slash() {
        let client = ApiClient::with_base_url("http://localhost:5000/".to_string());
        let query = SearchQuery::new("copa", "g1", 3, 6).unwrap();
        assert_eq!(
            client.search_url(&query).unwrap(),
            "http://localhost:5000/api/search?termo=copa&page=3&per_page=6&source=g1"
        );
    }
}
