//! # tcgen
//!
//! Turns a design document into structured QA test-case records.
//!
//! The document is chunked and embedded into a flat vector index. Test
//! cases are then synthesised from either the chunks nearest to a query or
//! every chunk of the document, using lexical condition extraction, a rule
//! table of check templates, and keyword-driven categorisation.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────────┐   ┌─────────────────┐
//! │ Document │──▶│ Chunk+Embed  │──▶│ EmbeddingIndex  │
//! │ txt/pdf/ │   │              │   │ vectors.bin +   │
//! │ docx     │   └──────────────┘   │ metadata.json   │
//! └──────────┘                      └───────┬─────────┘
//!                                           │ query mode / batch mode
//!                                           ▼
//!   segment ─▶ filter ─▶ conditions ─▶ category + rules ─▶ dedupe ─▶ [TestCase]
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! tcgen index ./docs/skill_system.docx
//! tcgen query "아이템 장착" --k 5
//! tcgen generate
//! tcgen custom --major "스킬 시스템" --medium "세트 효과"
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`logging`] | tracing subscriber setup |
//! | [`error`] | Engine error taxonomy |
//! | [`models`] | Core data types |
//! | [`extract`] | Text extraction from txt/md, PDF, DOCX |
//! | [`chunk`] | Text chunking |
//! | [`embedding`] | Embedding provider abstraction |
//! | [`index`] | Flat L2 embedding index |
//! | [`segment`] | Sentence segmentation and noise filter |
//! | [`conditions`] | `FIELD=VALUE` condition extraction |
//! | [`category`] | Major/medium/minor category resolution |
//! | [`rules`] | Rule table and rule transformer |
//! | [`dedupe`] | Deduplication and baseline fallback |
//! | [`templates`] | Hand-authored template sets |
//! | [`pipeline`] | Indexing, query mode, batch mode |
//! | [`validate`] | Heuristic test-case scoring |
//! | [`export`] | JSON report export |

pub mod category;
pub mod chunk;
pub mod conditions;
pub mod config;
pub mod dedupe;
pub mod embedding;
pub mod error;
pub mod export;
pub mod extract;
pub mod index;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod rules;
pub mod segment;
pub mod templates;
pub mod validate;
