//! Generation pipeline orchestration.
//!
//! Indexing runs extract → chunk → embed → build + persist. Generation
//! runs segment → filter → extract conditions → categorise → transform over
//! a context blob, then deduplicates and applies the baseline fallback.
//! Query mode builds the blob from retrieved chunks; batch mode walks every
//! chunk directly.

use std::path::Path;

use anyhow::{bail, Context};

use crate::category::{CategoryContext, CategoryResolver};
use crate::chunk::chunk_text;
use crate::conditions::ConditionExtractor;
use crate::config::Config;
use crate::dedupe::{dedupe, ensure_nonempty};
use crate::embedding::{embed_chunks, embed_query, EmbeddingProvider};
use crate::error::Result;
use crate::extract::extract_file;
use crate::index::EmbeddingIndex;
use crate::models::{Chunk, TestCase};
use crate::rules::{RuleTable, RuleTransformer};
use crate::segment::candidate_sentences;

/// Separator placed between retrieved chunk texts in query mode.
pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// Extract, chunk, and embed `path`, then build and persist the index into
/// `config.index.dir`.
pub fn index_document(
    config: &Config,
    path: &Path,
    provider: &dyn EmbeddingProvider,
) -> anyhow::Result<EmbeddingIndex> {
    let text = extract_file(path)
        .with_context(|| format!("Failed to extract text from {}", path.display()))?;
    let chunks = chunk_text(
        &text,
        path,
        config.chunking.chunk_size,
        config.chunking.chunk_overlap,
    );
    if chunks.is_empty() {
        bail!("No text could be extracted from {}", path.display());
    }
    tracing::info!(
        path = %path.display(),
        chunks = chunks.len(),
        model = provider.model_name(),
        "chunked document"
    );

    let chunks = embed_chunks(provider, chunks, config.embedding.batch_size)
        .with_context(|| format!("Failed to embed chunks of {}", path.display()))?;
    let index = EmbeddingIndex::build_and_persist(&chunks, &config.index.dir)
        .with_context(|| format!("Failed to build index in {}", config.index.dir.display()))?;
    Ok(index)
}

/// Sentence-level test-case generator.
///
/// Holds the extractor, category rules, and rule table; all read-only, so
/// one generator serves any number of contexts.
pub struct Generator<'a> {
    extractor: ConditionExtractor,
    resolver: CategoryResolver,
    transformer: RuleTransformer<'a>,
}

impl<'a> Generator<'a> {
    pub fn new(rules: &'a RuleTable) -> Self {
        Self::with_parts(rules, ConditionExtractor::default(), CategoryResolver::default())
    }

    pub fn with_parts(
        rules: &'a RuleTable,
        extractor: ConditionExtractor,
        resolver: CategoryResolver,
    ) -> Self {
        Self {
            extractor,
            resolver,
            transformer: RuleTransformer::new(rules),
        }
    }

    /// Test cases for every substantive sentence of `context`, in sentence
    /// order. Not deduplicated; may be empty.
    pub fn generate_from_context(&self, context: &str) -> Vec<TestCase> {
        let mut categories = CategoryContext::seed(context);
        let mut testcases = Vec::new();

        for (position, sentence) in candidate_sentences(context) {
            let category = categories.observe(position, &sentence);
            let conditions = self.extractor.filter_and_extract(&sentence);
            if conditions.is_empty() {
                continue;
            }
            let category = self.resolver.refine(&category, &sentence);
            testcases.push(self.transformer.transform(&conditions, &sentence, &category));
        }

        tracing::debug!(
            chars = context.chars().count(),
            testcases = testcases.len(),
            "generated from context"
        );
        testcases
    }

    /// Retrieve the `k` chunks nearest to `query` and generate from them.
    pub fn query_mode(
        &self,
        index: &EmbeddingIndex,
        provider: &dyn EmbeddingProvider,
        query: &str,
        k: i64,
    ) -> Result<Vec<TestCase>> {
        let vector = embed_query(provider, query)?;
        let hits = index.search(&vector, k)?;
        let context = hits
            .iter()
            .map(|hit| hit.text.as_str())
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR);

        let testcases = ensure_nonempty(dedupe(self.generate_from_context(&context)));
        tracing::info!(
            query,
            hits = hits.len(),
            testcases = testcases.len(),
            "query mode complete"
        );
        Ok(testcases)
    }

    /// Generate from every chunk, deduplicating across the whole document.
    pub fn batch_mode<I>(&self, chunks: I) -> Vec<TestCase>
    where
        I: IntoIterator<Item = Chunk>,
    {
        let mut all = Vec::new();
        let mut seen_chunks = 0usize;
        for chunk in chunks {
            seen_chunks += 1;
            all.extend(self.generate_from_context(&chunk.text));
        }
        let generated = all.len();
        let testcases = ensure_nonempty(dedupe(all));
        tracing::info!(
            chunks = seen_chunks,
            generated,
            unique = testcases.len(),
            "batch mode complete"
        );
        testcases
    }
}
