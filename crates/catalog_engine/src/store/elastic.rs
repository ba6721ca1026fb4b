use std::time::Duration;

use catalog_core::{ProductRecord, SearchHit, SearchHits};
use catalog_logging::{catalog_debug, catalog_trace};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use url::Url;

use super::{DocumentStore, FieldKind, Fuzziness, IndexSchema, SearchRequest, StoreError};

#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9200".to_string(),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// [`DocumentStore`] over the Elasticsearch REST API.
#[derive(Debug, Clone)]
pub struct ElasticsearchStore {
    base_url: Url,
    client: reqwest::Client,
}

impl ElasticsearchStore {
    pub fn new(settings: &StoreSettings) -> Result<Self, StoreError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|err| StoreError::InvalidUrl(format!("{}: {err}", settings.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::InvalidUrl(settings.base_url.clone()));
        }
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| StoreError::Transport(err.to_string()))?;
        Ok(Self { base_url, client })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&Value>,
    ) -> Result<(StatusCode, Vec<u8>), StoreError> {
        let url = self.endpoint(segments)?;
        catalog_trace!("{} {}", method, url);
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(body.to_string());
        }
        let response = request
            .send()
            .await
            .map_err(|err| StoreError::Transport(err.to_string()))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|err| StoreError::Transport(err.to_string()))?;
        Ok((status, bytes.to_vec()))
    }
}

#[async_trait::async_trait]
impl DocumentStore for ElasticsearchStore {
    async fn index_exists(&self, index: &str) -> Result<bool, StoreError> {
        let (status, body) = self.send(Method::HEAD, &[index], None).await?;
        match status {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            other => Err(status_error(other, &body)),
        }
    }

    async fn create_index(&self, index: &str, schema: &IndexSchema) -> Result<(), StoreError> {
        let body = index_body(schema);
        let (status, response) = self.send(Method::PUT, &[index], Some(&body)).await?;
        if status.is_success() {
            catalog_debug!("Created index {}", index);
            return Ok(());
        }
        // Another writer won the race; the index is there either way.
        if error_type(&response).as_deref() == Some("resource_already_exists_exception") {
            return Ok(());
        }
        Err(status_error(status, &response))
    }

    async fn upsert(&self, index: &str, record: &ProductRecord) -> Result<(), StoreError> {
        let body =
            serde_json::to_value(record).map_err(|err| StoreError::Decode(err.to_string()))?;
        let (status, response) = self
            .send(Method::POST, &[index, "_doc"], Some(&body))
            .await?;
        if status.is_success() {
            Ok(())
        } else {
            Err(status_error(status, &response))
        }
    }

    async fn query(
        &self,
        index: &str,
        request: &SearchRequest,
    ) -> Result<SearchHits, StoreError> {
        let body = search_body(request);
        let (status, response) = self
            .send(Method::POST, &[index, "_search"], Some(&body))
            .await?;
        if !status.is_success() {
            return Err(status_error(status, &response));
        }
        parse_search_response(&response)
    }
}

fn index_body(schema: &IndexSchema) -> Value {
    let properties: Map<String, Value> = schema
        .fields
        .iter()
        .map(|field| {
            let mapping = match field.kind {
                FieldKind::Text => json!({
                    "type": "text",
                    "fields": { "keyword": { "type": "keyword", "ignore_above": 256 } }
                }),
            };
            (field.name.to_string(), mapping)
        })
        .collect();
    json!({ "mappings": { "properties": properties } })
}

fn search_body(request: &SearchRequest) -> Value {
    let fields: Vec<String> = request
        .fields
        .iter()
        .map(|weight| format!("{}^{}", weight.field, weight.boost))
        .collect();
    let fuzziness = match request.fuzziness {
        Fuzziness::Auto => json!("AUTO"),
        Fuzziness::Edits(edits) => json!(edits),
    };
    json!({
        "query": {
            "multi_match": {
                "query": request.text,
                "fields": fields,
                "fuzziness": fuzziness
            }
        },
        "sort": [ { "_score": { "order": "desc" } } ],
        "size": request.size,
        "track_total_hits": true
    })
}

#[derive(Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Deserialize)]
struct HitsEnvelope {
    total: Option<TotalHits>,
    #[serde(default)]
    hits: Vec<RawHit>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TotalHits {
    Object { value: u64 },
    Count(u64),
}

#[derive(Deserialize)]
struct RawHit {
    #[serde(rename = "_score")]
    score: Option<f64>,
    #[serde(rename = "_source")]
    source: ProductRecord,
}

fn parse_search_response(body: &[u8]) -> Result<SearchHits, StoreError> {
    let response: SearchResponse =
        serde_json::from_slice(body).map_err(|err| StoreError::Decode(err.to_string()))?;
    let hits: Vec<SearchHit> = response
        .hits
        .hits
        .into_iter()
        .map(|hit| SearchHit {
            record: hit.source,
            score: hit.score,
        })
        .collect();
    let total = match response.hits.total {
        Some(TotalHits::Object { value }) | Some(TotalHits::Count(value)) => value,
        None => hits.len() as u64,
    };
    Ok(SearchHits { hits, total })
}

fn error_field(body: &[u8], key: &str) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    match value.get("error")? {
        Value::String(message) if key == "reason" => Some(message.clone()),
        error => error.get(key)?.as_str().map(str::to_string),
    }
}

fn error_type(body: &[u8]) -> Option<String> {
    error_field(body, "type")
}

fn status_error(status: StatusCode, body: &[u8]) -> StoreError {
    let reason = error_field(body, "reason")
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());
    StoreError::Status {
        status: status.as_u16(),
        reason,
    }
}
