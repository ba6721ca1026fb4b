use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use catalog_core::{LoadOutcome, ProductRecord, SearchHits};
use catalog_engine::{
    CompletionMarker, DocumentStore, FileMarker, IndexSchema, LoadController, LoadError,
    MarkerError, MarkerSettings, MemoryStore, SearchRequest, StoreError,
};
use tempfile::TempDir;

const INDEX: &str = "cumbakuruyemish";

fn record(name: &str) -> ProductRecord {
    ProductRecord {
        name: Some(name.to_string()),
        prices: vec!["10.00".to_string()],
        quantities: vec!["100 g".to_string()],
    }
}

fn marker(temp: &TempDir) -> FileMarker {
    FileMarker::new(MarkerSettings {
        dir: temp.path().to_path_buf(),
        ..MarkerSettings::default()
    })
}

/// Wraps a [`MemoryStore`], failing selected operations and counting writes.
#[derive(Default)]
struct ScriptedStore {
    inner: MemoryStore,
    fail_create: bool,
    fail_names: Vec<String>,
    writes: AtomicUsize,
}

#[async_trait::async_trait]
impl DocumentStore for ScriptedStore {
    async fn index_exists(&self, index: &str) -> Result<bool, StoreError> {
        self.inner.index_exists(index).await
    }

    async fn create_index(&self, index: &str, schema: &IndexSchema) -> Result<(), StoreError> {
        if self.fail_create {
            return Err(StoreError::Status {
                status: 400,
                reason: "mapper_parsing_exception".to_string(),
            });
        }
        self.inner.create_index(index, schema).await
    }

    async fn upsert(&self, index: &str, record: &ProductRecord) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if let Some(name) = &record.name {
            if self.fail_names.contains(name) {
                return Err(StoreError::Transport("connection reset".to_string()));
            }
        }
        self.inner.upsert(index, record).await
    }

    async fn query(
        &self,
        index: &str,
        request: &SearchRequest,
    ) -> Result<SearchHits, StoreError> {
        self.inner.query(index, request).await
    }
}

struct BrokenMarker {
    sets: Mutex<usize>,
}

impl CompletionMarker for BrokenMarker {
    fn exists(&self) -> Result<bool, MarkerError> {
        Err(MarkerError::Directory("permission denied".to_string()))
    }

    fn set(&self) -> Result<(), MarkerError> {
        *self.sets.lock().unwrap() += 1;
        Ok(())
    }
}

#[tokio::test]
async fn first_load_creates_index_and_writes_everything() {
    catalog_logging::initialize_for_tests();
    let temp = TempDir::new().unwrap();
    let store = MemoryStore::new();
    let marker = marker(&temp);
    let loader = LoadController::new(&store, &marker, INDEX);

    let outcome = loader
        .ensure_indexed(&[record("Badem"), record("Fındık"), ProductRecord::default()])
        .await
        .unwrap();

    assert_eq!(outcome, LoadOutcome::Loaded(3));
    assert_eq!(store.document_count(INDEX), 3);
    assert_eq!(store.schema(INDEX), Some(IndexSchema::for_product_record()));
    assert!(marker.exists().unwrap());
}

#[tokio::test]
async fn second_load_performs_no_writes() {
    let temp = TempDir::new().unwrap();
    let store = ScriptedStore::default();
    let marker = marker(&temp);
    let loader = LoadController::new(&store, &marker, INDEX);
    let records = [record("Badem"), record("Kaju")];

    assert_eq!(
        loader.ensure_indexed(&records).await.unwrap(),
        LoadOutcome::Loaded(2)
    );
    let writes_after_first = store.writes.load(Ordering::SeqCst);

    assert_eq!(
        loader.ensure_indexed(&records).await.unwrap(),
        LoadOutcome::Skipped
    );
    assert_eq!(store.writes.load(Ordering::SeqCst), writes_after_first);
    assert_eq!(store.inner.document_count(INDEX), 2);
}

#[tokio::test]
async fn failed_writes_do_not_stop_the_pass_and_still_mark_done() {
    let temp = TempDir::new().unwrap();
    let store = ScriptedStore {
        fail_names: vec!["Fındık".to_string(), "Ceviz".to_string()],
        ..ScriptedStore::default()
    };
    let marker = marker(&temp);
    let loader = LoadController::new(&store, &marker, INDEX);

    let records = [
        record("Badem"),
        record("Fındık"),
        record("Ceviz"),
        record("Kaju"),
    ];
    let outcome = loader.ensure_indexed(&records).await.unwrap();

    assert_eq!(outcome, LoadOutcome::PartialFailure(2));
    assert_eq!(store.writes.load(Ordering::SeqCst), 4);
    assert_eq!(store.inner.document_count(INDEX), 2);
    // Known limitation: the lost records are never retried.
    assert!(marker.exists().unwrap());
    assert_eq!(
        loader.ensure_indexed(&records).await.unwrap(),
        LoadOutcome::Skipped
    );
}

#[tokio::test]
async fn index_creation_failure_aborts_before_any_write() {
    let temp = TempDir::new().unwrap();
    let store = ScriptedStore {
        fail_create: true,
        ..ScriptedStore::default()
    };
    let marker = marker(&temp);
    let loader = LoadController::new(&store, &marker, INDEX);

    let err = loader.ensure_indexed(&[record("Badem")]).await.unwrap_err();

    assert!(matches!(err, LoadError::IndexCreation { ref index, .. } if index == INDEX));
    assert_eq!(store.writes.load(Ordering::SeqCst), 0);
    assert!(!marker.exists().unwrap());
}

#[tokio::test]
async fn existing_index_is_left_alone() {
    let temp = TempDir::new().unwrap();
    let store = MemoryStore::new();
    store
        .create_index(INDEX, &IndexSchema { fields: vec![] })
        .await
        .unwrap();
    let marker = marker(&temp);
    let loader = LoadController::new(&store, &marker, INDEX);

    assert!(!loader.ensure_index().await.unwrap());
    assert_eq!(store.schema(INDEX), Some(IndexSchema { fields: vec![] }));
}

#[tokio::test]
async fn unreadable_marker_aborts_the_load() {
    let store = ScriptedStore::default();
    let marker = BrokenMarker {
        sets: Mutex::new(0),
    };
    let loader = LoadController::new(&store, &marker, INDEX);

    let err = loader.ensure_indexed(&[record("Badem")]).await.unwrap_err();

    assert!(matches!(err, LoadError::Marker(_)));
    assert_eq!(store.writes.load(Ordering::SeqCst), 0);
    assert_eq!(*marker.sets.lock().unwrap(), 0);
}

#[tokio::test]
async fn empty_catalog_still_completes_the_pass() {
    let temp = TempDir::new().unwrap();
    let store = MemoryStore::new();
    let marker = marker(&temp);
    let loader = LoadController::new(&store, &marker, INDEX);

    assert_eq!(loader.ensure_indexed(&[]).await.unwrap(), LoadOutcome::Loaded(0));
    assert!(store.index_exists(INDEX).await.unwrap());
    assert!(marker.exists().unwrap());
}

/// Reads as unset and refuses to be set.
struct ReadOnlyMarker;

impl CompletionMarker for ReadOnlyMarker {
    fn exists(&self) -> Result<bool, MarkerError> {
        Ok(false)
    }

    fn set(&self) -> Result<(), MarkerError> {
        Err(MarkerError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only filesystem",
        )))
    }
}

#[tokio::test]
async fn marker_set_failure_keeps_the_outcome_and_allows_reload() {
    let store = ScriptedStore::default();
    let marker = ReadOnlyMarker;
    let loader = LoadController::new(&store, &marker, INDEX);
    let records = [record("Badem"), record("Kaju")];

    assert_eq!(
        loader.ensure_indexed(&records).await.unwrap(),
        LoadOutcome::Loaded(2)
    );
    assert_eq!(store.writes.load(Ordering::SeqCst), 2);

    assert_eq!(
        loader.ensure_indexed(&records).await.unwrap(),
        LoadOutcome::Loaded(2)
    );
    assert_eq!(store.writes.load(Ordering::SeqCst), 4);
    assert_eq!(store.inner.document_count(INDEX), 4);
}
