//! End-to-end pipeline tests with deterministic mock collaborators

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tempfile::TempDir;

use nrt_rag::{
    ArticleFetcher, Chunk, Document, EmbeddedChunk, EmbeddingProvider, Error, GeneratedAnswer,
    IndexStore, IngestPipeline, LlmProvider, NullProgress, Result, RetrievedChunk, QueryEngine,
    VectorIndex,
};

const DIMENSION: usize = 16;

/// Fetcher backed by a fixed page map; unknown URLs fail.
struct MockFetcher {
    pages: HashMap<String, String>,
}

impl MockFetcher {
    fn new(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(url, text)| (url.to_string(), text.to_string()))
                .collect(),
        }
    }
}

#[async_trait]
impl ArticleFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<Document> {
        match self.pages.get(url) {
            Some(text) => Ok(Document::new(url, text.clone())),
            None => Err(Error::Fetch {
                url: url.to_string(),
                message: "simulated network failure".to_string(),
            }),
        }
    }
}

/// Deterministic embedder: word-hash features, normalized, with optional
/// per-text overrides for tests that need exact vectors. Counts calls so
/// tests can assert retrieval was never attempted.
struct MockEmbedder {
    overrides: HashMap<String, Vec<f32>>,
    calls: AtomicUsize,
}

impl MockEmbedder {
    fn new() -> Self {
        Self {
            overrides: HashMap::new(),
            calls: AtomicUsize::new(0),
        }
    }

    fn with_override(mut self, text: &str, vector: Vec<f32>) -> Self {
        self.overrides.insert(text.to_string(), vector);
        self
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn vector_for(&self, text: &str) -> Vec<f32> {
        if let Some(vector) = self.overrides.get(text) {
            return vector.clone();
        }

        let mut embedding = vec![0.0f32; DIMENSION];
        for (pos, word) in text.to_lowercase().split_whitespace().enumerate() {
            let mut hasher = DefaultHasher::new();
            word.hash(&mut hasher);
            let hash = hasher.finish();
            let idx = (hash % DIMENSION as u64) as usize;
            embedding[idx] += 1.0 / (pos as f32 + 1.0);
        }

        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for value in embedding.iter_mut() {
                *value /= magnitude;
            }
        }
        embedding
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.vector_for(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| self.vector_for(t)).collect())
    }
}

/// Language model returning a fixed answer and citation list.
struct MockLlm {
    answer: String,
    sources: Option<Vec<String>>,
}

impl MockLlm {
    fn new(answer: &str, sources: Option<Vec<&str>>) -> Self {
        Self {
            answer: answer.to_string(),
            sources: sources.map(|urls| urls.into_iter().map(String::from).collect()),
        }
    }
}

#[async_trait]
impl LlmProvider for MockLlm {
    async fn generate(&self, _question: &str, _context: &[RetrievedChunk]) -> Result<GeneratedAnswer> {
        Ok(GeneratedAnswer {
            answer: self.answer.clone(),
            sources: self.sources.clone(),
        })
    }
}

fn article(paragraphs: &[&str]) -> String {
    paragraphs.join("\n\n")
}

#[tokio::test]
async fn ingestion_indexes_chunks_from_every_url() {
    let fetcher = MockFetcher::new(&[
        (
            "https://a.example/1",
            &article(&["Stocks rallied on Monday.", "Tech led the gains."]),
        ),
        (
            "https://a.example/2",
            &article(&["Bond yields fell sharply.", "The dollar weakened."]),
        ),
    ]);
    let embedder = Arc::new(MockEmbedder::new());
    let pipeline = IngestPipeline::new(fetcher, embedder);

    let urls = vec![
        "https://a.example/1".to_string(),
        "https://a.example/2".to_string(),
    ];
    let index = pipeline.build_index(&urls, &NullProgress).await.unwrap();

    assert!(index.len() >= 2);
    for embedded in index.chunks() {
        assert!(urls.contains(&embedded.chunk.source_url));
        assert_eq!(embedded.embedding.len(), DIMENSION);
    }
}

#[tokio::test]
async fn whitespace_only_page_fails_as_a_fetch_error() {
    let fetcher = MockFetcher::new(&[("https://a.example/1", "   \n\n  ")]);
    let pipeline = IngestPipeline::new(fetcher, Arc::new(MockEmbedder::new()));

    let result = pipeline
        .build_index(&["https://a.example/1".to_string()], &NullProgress)
        .await;

    assert!(matches!(result, Err(Error::Fetch { .. })));
}

#[tokio::test]
async fn persisted_index_round_trips_bit_identically() {
    let fetcher = MockFetcher::new(&[(
        "https://a.example/1",
        &article(&["Stocks rallied on Monday.", "Tech led the gains."]),
    )]);
    let embedder = Arc::new(MockEmbedder::new());
    let pipeline = IngestPipeline::new(fetcher, embedder);

    let urls = vec!["https://a.example/1".to_string()];
    let index = pipeline.build_index(&urls, &NullProgress).await.unwrap();

    let dir = TempDir::new().unwrap();
    let store = IndexStore::new(dir.path().join("index.json"));
    store.save(&index).unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded, index);
}

#[tokio::test]
async fn querying_without_an_index_never_attempts_retrieval() {
    let dir = TempDir::new().unwrap();
    let store = IndexStore::new(dir.path().join("missing.json"));

    let embedder = Arc::new(MockEmbedder::new());
    let llm = Arc::new(MockLlm::new("unused", None));
    let engine = QueryEngine::new(embedder.clone(), llm);

    let result = engine.answer(&store, "What happened?").await;

    assert!(matches!(result, Err(Error::IndexNotFound(_))));
    assert_eq!(embedder.call_count(), 0);
}

#[tokio::test]
async fn failed_ingestion_leaves_previous_index_intact() {
    let dir = TempDir::new().unwrap();
    let store = IndexStore::new(dir.path().join("index.json"));

    // First, a successful run persists an index.
    let fetcher = MockFetcher::new(&[("https://a.example/1", "An original article body.")]);
    let pipeline = IngestPipeline::new(fetcher, Arc::new(MockEmbedder::new()));
    let index = pipeline
        .build_index(&["https://a.example/1".to_string()], &NullProgress)
        .await
        .unwrap();
    store.save(&index).unwrap();

    let before = std::fs::read(store.path()).unwrap();

    // Second run: URL 2 of 3 fails to fetch, the whole ingestion aborts.
    let fetcher = MockFetcher::new(&[
        ("https://a.example/1", "An original article body."),
        ("https://a.example/3", "A third article body."),
    ]);
    let pipeline = IngestPipeline::new(fetcher, Arc::new(MockEmbedder::new()));
    let result = pipeline
        .build_index(
            &[
                "https://a.example/1".to_string(),
                "https://a.example/2".to_string(),
                "https://a.example/3".to_string(),
            ],
            &NullProgress,
        )
        .await;

    assert!(matches!(result, Err(Error::Fetch { .. })));

    let after = std::fs::read(store.path()).unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn end_to_end_answer_with_cited_source() {
    let fetcher = MockFetcher::new(&[
        (
            "https://a.example/1",
            &article(&["Something important happened today.", "Officials confirmed it."]),
        ),
        (
            "https://a.example/2",
            &article(&["An unrelated market update.", "Stocks were flat."]),
        ),
    ]);
    let embedder = Arc::new(MockEmbedder::new());
    let pipeline = IngestPipeline::new(fetcher, embedder.clone());

    let urls = vec![
        "https://a.example/1".to_string(),
        "https://a.example/2".to_string(),
    ];
    let index = pipeline.build_index(&urls, &NullProgress).await.unwrap();

    let dir = TempDir::new().unwrap();
    let store = IndexStore::new(dir.path().join("index.json"));
    store.save(&index).unwrap();

    let llm = Arc::new(MockLlm::new(
        "X happened.",
        Some(vec!["https://a.example/1"]),
    ));
    let engine = QueryEngine::new(embedder, llm);

    let result = engine.answer(&store, "What happened?").await.unwrap();

    assert_eq!(result.answer, "X happened.");
    assert_eq!(result.sources, vec!["https://a.example/1".to_string()]);
}

#[tokio::test]
async fn same_question_twice_yields_identical_results() {
    let fetcher = MockFetcher::new(&[
        (
            "https://a.example/1",
            &article(&["Something important happened today.", "Officials confirmed it."]),
        ),
        ("https://a.example/2", "An unrelated market update."),
    ]);
    let embedder = Arc::new(MockEmbedder::new());
    let pipeline = IngestPipeline::new(fetcher, embedder.clone());

    let urls = vec![
        "https://a.example/1".to_string(),
        "https://a.example/2".to_string(),
    ];
    let index = pipeline.build_index(&urls, &NullProgress).await.unwrap();

    let dir = TempDir::new().unwrap();
    let store = IndexStore::new(dir.path().join("index.json"));
    store.save(&index).unwrap();

    let llm = Arc::new(MockLlm::new("X happened.", None));
    let engine = QueryEngine::new(embedder, llm);

    let first = engine.answer(&store, "What happened?").await.unwrap();
    let second = engine.answer(&store, "What happened?").await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn sources_are_deduplicated_in_first_seen_order() {
    // Hand-built index: two chunks from URL 1, one from URL 2, with
    // embeddings arranged so retrieval returns them in that order.
    let chunk = |id: &str, url: &str, embedding: Vec<f32>| EmbeddedChunk {
        chunk: Chunk {
            id: id.to_string(),
            text: format!("chunk {}", id),
            source_url: url.to_string(),
        },
        embedding,
    };

    let index = VectorIndex::new(vec![
        chunk("a", "https://a.example/1", vec![1.0, 0.0]),
        chunk("b", "https://a.example/1", vec![0.9, 0.1]),
        chunk("c", "https://a.example/2", vec![0.8, 0.2]),
    ])
    .unwrap();

    let dir = TempDir::new().unwrap();
    let store = IndexStore::new(dir.path().join("index.json"));
    store.save(&index).unwrap();

    let embedder = Arc::new(MockEmbedder::new().with_override("What happened?", vec![1.0, 0.0]));
    let llm = Arc::new(MockLlm::new("X happened.", None));
    let engine = QueryEngine::new(embedder, llm).with_top_k(3);

    let result = engine.answer(&store, "What happened?").await.unwrap();

    assert_eq!(
        result.sources,
        vec![
            "https://a.example/1".to_string(),
            "https://a.example/2".to_string(),
        ]
    );
}
