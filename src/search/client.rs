use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::SearchConfig;
use crate::error::{BlogError, Result};
use crate::utils::truncate_chars;

/// Response arrays tried in order; the API has used each name.
const RESULT_KEYS: [&str; 3] = ["organic", "results", "organic_results"];
const ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub snippet: String,
    pub link: String,
}

impl SearchResult {
    pub fn render(&self) -> String {
        format!(
            "Title: {}\nSummary: {}\nSource: {}\n",
            self.title, self.snippet, self.link
        )
    }
}

pub struct SearchClient {
    client: reqwest::Client,
    api_key: String,
    config: SearchConfig,
}

impl SearchClient {
    pub fn new(api_key: impl Into<String>, config: SearchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(BlogError::Search("no search query provided".into()));
        }
        debug!(query, endpoint = %self.config.endpoint, "Web search");

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("X-API-KEY", &self.api_key)
            .json(&serde_json::json!({ "q": query, "num": self.config.max_results }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BlogError::Search(format!(
                "status {} - {}",
                status.as_u16(),
                truncate_chars(&body, ERROR_BODY_CHARS)
            )));
        }

        let data: Value = response.json().await?;
        debug!(keys = ?response_keys(&data), "Search response");
        Ok(extract_results(&data, self.config.max_results))
    }
}

fn response_keys(data: &Value) -> Vec<String> {
    data.as_object()
        .map(|o| o.keys().cloned().collect())
        .unwrap_or_default()
}

fn extract_results(data: &Value, limit: usize) -> Vec<SearchResult> {
    let hits = RESULT_KEYS
        .iter()
        .filter_map(|key| data.get(*key).and_then(Value::as_array))
        .find(|hits| !hits.is_empty());

    let Some(hits) = hits else {
        return Vec::new();
    };

    hits.iter()
        .take(limit)
        .filter_map(|hit| {
            let text = |key: &str| {
                hit.get(key)
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            };
            let title = text("title").unwrap_or_else(|| "No title".to_string());
            let snippet = text("snippet").or_else(|| text("description"))?;
            Some(SearchResult {
                title,
                snippet,
                link: text("link").unwrap_or_default(),
            })
        })
        .collect()
}

pub fn format_results(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return String::from("No results found.");
    }
    results
        .iter()
        .map(SearchResult::render)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_organic_results() {
        let data = json!({
            "searchParameters": {"q": "rag"},
            "organic": [
                {"title": "A", "snippet": "first", "link": "https://a"},
                {"title": "B", "description": "second", "link": "https://b"},
                {"title": "C", "link": "https://c"},
                {"title": "D", "snippet": "fourth", "link": "https://d"}
            ]
        });

        let results = extract_results(&data, 3);
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].snippet, "second");
    }

    #[test]
    fn test_falls_back_to_alternate_keys() {
        let data = json!({
            "organic": [],
            "organic_results": [{"title": "X", "snippet": "s", "link": "l"}]
        });
        assert_eq!(extract_results(&data, 3).len(), 1);
        assert!(extract_results(&json!({"answerBox": {}}), 3).is_empty());
    }

    #[test]
    fn test_format_results() {
        let results = vec![SearchResult {
            title: "Agentes".into(),
            snippet: "Resumen".into(),
            link: "https://x".into(),
        }];
        assert_eq!(
            format_results(&results),
            "Title: Agentes\nSummary: Resumen\nSource: https://x\n"
        );
        assert_eq!(format_results(&[]), "No results found.");
    }

    #[tokio::test]
    async fn test_empty_query_is_rejected_before_request() {
        let client = SearchClient::new("key", SearchConfig::default()).unwrap();
        let err = client.search("   ").await.unwrap_err();
        assert!(matches!(err, BlogError::Search(_)));
    }
}
