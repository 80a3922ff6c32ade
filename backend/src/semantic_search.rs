use std::env;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use serde_json::json;

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the embedding and vector-store collaborators.
#[derive(Debug, Clone)]
pub struct SemanticSearchConfig {
    pub qdrant_url: String,
    pub ollama_url: String,
    pub collection: String,
    pub model: String,
    pub api_key: Option<String>,
}

impl SemanticSearchConfig {
    pub fn from_env() -> Self {
        SemanticSearchConfig {
            qdrant_url: env::var("QDRANT_URL")
                .unwrap_or_else(|_| "http://localhost:6333".to_string()),
            ollama_url: env::var("OLLAMA_URL")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            collection: env::var("SEMANTIC_COLLECTION")
                .unwrap_or_else(|_| "biblia_verses".to_string()),
            model: env::var("EMBEDDING_MODEL")
                .unwrap_or_else(|_| "mxbai-embed-large".to_string()),
            api_key: env::var("QDRANT_API_KEY").ok(),
        }
    }
}

/// One scored verse returned by the vector store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticHit {
    pub score: f32,
    pub text: String,
    pub book_abbrev: Option<String>,
    pub chapter: Option<i32>,
    pub verse: Option<i32>,
    pub version_abbrev: Option<String>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct QdrantSearchResponse {
    result: Vec<QdrantScoredPoint>,
}

#[derive(Deserialize)]
struct QdrantScoredPoint {
    score: f32,
    payload: Option<serde_json::Value>,
}

/// Read-only client for the semantic-search collaborators: an
/// Ollama-compatible embeddings endpoint and a Qdrant-compatible vector
/// store. Index building and maintenance happen outside this repository.
pub struct SemanticSearchClient {
    config: SemanticSearchConfig,
    http: reqwest::blocking::Client,
}

impl SemanticSearchClient {
    pub fn new(config: SemanticSearchConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(SemanticSearchClient { config, http })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(SemanticSearchConfig::from_env())
    }

    /// Embed a query string.
    pub fn get_embedding(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.config.ollama_url);

        let response = self
            .http
            .post(&url)
            .json(&json!({ "model": self.config.model, "prompt": text }))
            .send()
            .map_err(|e| anyhow!("Embedding request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(anyhow!("Embedding service returned status {}", response.status()));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .context("Failed to parse embedding response")?;
        if parsed.embedding.is_empty() {
            return Err(anyhow!("Embedding service returned an empty vector"));
        }

        Ok(parsed.embedding)
    }

    /// Verses semantically similar to the query, optionally filtered by
    /// version and book payload fields.
    pub fn search(
        &self,
        query: &str,
        limit: usize,
        version_abbrev: Option<&str>,
        book_abbrev: Option<&str>,
    ) -> Result<Vec<SemanticHit>> {
        let vector = self.get_embedding(query)?;

        let mut must = Vec::new();
        if let Some(v) = version_abbrev {
            must.push(json!({ "key": "version_abbrev", "match": { "value": v } }));
        }
        if let Some(b) = book_abbrev {
            must.push(json!({ "key": "book_abbrev", "match": { "value": b } }));
        }

        let mut body = json!({
            "vector": vector,
            "limit": limit,
            "with_payload": true,
        });
        if !must.is_empty() {
            body["filter"] = json!({ "must": must });
        }

        let url = format!(
            "{}/collections/{}/points/search",
            self.config.qdrant_url, self.config.collection
        );

        let mut request = self.http.post(&url).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.header("api-key", key);
        }

        let response = request
            .send()
            .map_err(|e| anyhow!("Vector search request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(anyhow!("Vector store returned status {}", response.status()));
        }

        let parsed: QdrantSearchResponse = response
            .json()
            .context("Failed to parse vector search response")?;

        Ok(parsed.result.into_iter().map(hit_from_point).collect())
    }
}

fn hit_from_point(point: QdrantScoredPoint) -> SemanticHit {
    let payload = point.payload.unwrap_or_else(|| json!({}));

    SemanticHit {
        score: point.score,
        text: payload
            .get("text")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string(),
        book_abbrev: payload
            .get("book_abbrev")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        chapter: payload.get("chapter").and_then(|v| v.as_i64()).map(|n| n as i32),
        verse: payload.get("verse").and_then(|v| v.as_i64()).map(|n| n as i32),
        version_abbrev: payload
            .get("version_abbrev")
            .and_then(|v| v.as_str())
            .map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_from_point_with_payload() {
        let point = QdrantScoredPoint {
            score: 0.87,
            payload: Some(json!({
                "text": "No princípio criou Deus os céus e a terra.",
                "book_abbrev": "Gn",
                "chapter": 1,
                "verse": 1,
                "version_abbrev": "ARA",
            })),
        };

        let hit = hit_from_point(point);
        assert_eq!(hit.book_abbrev.as_deref(), Some("Gn"));
        assert_eq!(hit.chapter, Some(1));
        assert_eq!(hit.verse, Some(1));
        assert_eq!(hit.version_abbrev.as_deref(), Some("ARA"));
        assert!(!hit.text.is_empty());
    }

    #[test]
    fn test_hit_from_point_without_payload() {
        let point = QdrantScoredPoint { score: 0.1, payload: None };
        let hit = hit_from_point(point);
        assert_eq!(hit.text, "");
        assert_eq!(hit.book_abbrev, None);
    }

    #[test]
    fn test_config_defaults() {
        let config = SemanticSearchConfig {
            qdrant_url: "http://localhost:6333".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            collection: "biblia_verses".to_string(),
            model: "mxbai-embed-large".to_string(),
            api_key: None,
        };
        let client = SemanticSearchClient::new(config);
        assert!(client.is_ok());
    }
}
