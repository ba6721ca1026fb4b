use crate::ProductRecord;

/// Number of entries rendered from a result set.
pub const DISPLAY_LIMIT: usize = 10;

/// One ranked record as returned by the document store.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub record: ProductRecord,
    pub score: Option<f64>,
}

/// Ordered hits plus the store-reported total match count.
///
/// `total` may exceed `hits.len()` when the store only returned a page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchHits {
    pub hits: Vec<SearchHit>,
    pub total: u64,
}

impl SearchHits {
    pub fn records(&self) -> impl Iterator<Item = &ProductRecord> {
        self.hits.iter().map(|hit| &hit.record)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub name: String,
    pub prices: Vec<String>,
    pub quantities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResultsView {
    pub rows: Vec<ResultRow>,
    pub total: u64,
}

impl ResultsView {
    /// Keeps the first `limit` hits in rank order; `total` is carried over
    /// untouched so the footer reports the full match count.
    pub fn from_hits(hits: &SearchHits, limit: usize) -> Self {
        let rows = hits
            .records()
            .take(limit)
            .map(|record| ResultRow {
                name: record.name.clone().unwrap_or_default(),
                prices: record.prices.clone(),
                quantities: record.quantities.clone(),
            })
            .collect();
        Self {
            rows,
            total: hits.total,
        }
    }
}
