use std::collections::HashMap;
use std::sync::Mutex;

use catalog_core::{ProductRecord, SearchHit, SearchHits};

use super::{DocumentStore, IndexSchema, SearchRequest, StoreError};

#[derive(Debug, Default)]
struct MemoryIndex {
    schema: Option<IndexSchema>,
    documents: Vec<ProductRecord>,
}

/// In-process store with Elasticsearch-like fuzzy matching.
///
/// Terms are compared case-insensitively against the tokens of each weighted
/// field. A term matches a token within its fuzziness budget (optimal string
/// alignment distance, so a transposition counts as one edit). Scores are
/// boosted per field, shorter fields score higher, and ties keep insertion
/// order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    indices: Mutex<HashMap<String, MemoryIndex>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document_count(&self, index: &str) -> usize {
        self.indices
            .lock()
            .map(|indices| indices.get(index).map_or(0, |i| i.documents.len()))
            .unwrap_or(0)
    }

    pub fn schema(&self, index: &str) -> Option<IndexSchema> {
        self.indices
            .lock()
            .ok()
            .and_then(|indices| indices.get(index).and_then(|i| i.schema.clone()))
    }

    fn with_indices<T>(
        &self,
        f: impl FnOnce(&mut HashMap<String, MemoryIndex>) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self
            .indices
            .lock()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".into()))?;
        f(&mut guard)
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn index_exists(&self, index: &str) -> Result<bool, StoreError> {
        self.with_indices(|indices| Ok(indices.contains_key(index)))
    }

    async fn create_index(&self, index: &str, schema: &IndexSchema) -> Result<(), StoreError> {
        self.with_indices(|indices| {
            indices.entry(index.to_string()).or_default().schema = Some(schema.clone());
            Ok(())
        })
    }

    async fn upsert(&self, index: &str, record: &ProductRecord) -> Result<(), StoreError> {
        self.with_indices(|indices| {
            let target = indices
                .get_mut(index)
                .ok_or_else(|| StoreError::IndexNotFound(index.to_string()))?;
            target.documents.push(record.clone());
            Ok(())
        })
    }

    async fn query(
        &self,
        index: &str,
        request: &SearchRequest,
    ) -> Result<SearchHits, StoreError> {
        self.with_indices(|indices| {
            let target = indices
                .get(index)
                .ok_or_else(|| StoreError::IndexNotFound(index.to_string()))?;

            let terms = tokenize(&request.text);
            let mut scored: Vec<(f64, &ProductRecord)> = target
                .documents
                .iter()
                .filter_map(|record| {
                    let score = score_record(record, &terms, request);
                    (score > 0.0).then_some((score, record))
                })
                .collect();
            // Stable sort keeps insertion order among equal scores.
            scored.sort_by(|a, b| b.0.total_cmp(&a.0));

            let total = scored.len() as u64;
            let hits = scored
                .into_iter()
                .take(request.size)
                .map(|(score, record)| SearchHit {
                    record: record.clone(),
                    score: Some(score),
                })
                .collect();
            Ok(SearchHits { hits, total })
        })
    }
}

fn field_values<'r>(record: &'r ProductRecord, field: &str) -> Vec<&'r str> {
    match field {
        "name" => record.name.as_deref().into_iter().collect(),
        "prices" => record.prices.iter().map(String::as_str).collect(),
        "quantities" => record.quantities.iter().map(String::as_str).collect(),
        _ => Vec::new(),
    }
}

// Best field wins, as with a `best_fields` multi-match.
fn score_record(record: &ProductRecord, terms: &[String], request: &SearchRequest) -> f64 {
    request
        .fields
        .iter()
        .map(|weight| {
            let tokens: Vec<String> = field_values(record, &weight.field)
                .into_iter()
                .flat_map(tokenize)
                .collect();
            f64::from(weight.boost) * score_field(&tokens, terms, request)
        })
        .fold(0.0, f64::max)
}

fn score_field(tokens: &[String], terms: &[String], request: &SearchRequest) -> f64 {
    if tokens.is_empty() {
        return 0.0;
    }
    let matched: f64 = terms
        .iter()
        .filter_map(|term| {
            let budget = request.fuzziness.max_edits(term);
            tokens
                .iter()
                .map(|token| edit_distance(term, token))
                .filter(|distance| *distance <= budget)
                .min()
                .map(|distance| 1.0 / (1.0 + distance as f64))
        })
        .sum();
    matched / (tokens.len() as f64).sqrt()
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Optimal string alignment distance over chars.
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (n, m) = (a.len(), b.len());
    let mut d = vec![vec![0usize; m + 1]; n + 1];
    for (i, row) in d.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in d[0].iter_mut().enumerate() {
        *cell = j;
    }
    for i in 1..=n {
        for j in 1..=m {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            let mut best = (d[i - 1][j] + 1)
                .min(d[i][j - 1] + 1)
                .min(d[i - 1][j - 1] + cost);
            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                best = best.min(d[i - 2][j - 2] + 1);
            }
            d[i][j] = best;
        }
    }
    d[n][m]
}
