//! # tcgen CLI
//!
//! Indexes design documents and generates QA test-case reports from them.
//!
//! ## Usage
//!
//! ```bash
//! tcgen --config ./config/tcgen.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `tcgen index <file>` | Extract, chunk, embed, and persist the index |
//! | `tcgen query "<text>"` | Generate from the chunks nearest to a query |
//! | `tcgen generate` | Generate from every indexed chunk |
//! | `tcgen custom --major M --medium M` | Emit a hand-authored template set |
//! | `tcgen validate <report.json> --source <file>` | Score a report against its source |

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use tcgen::config::{self, Config};
use tcgen::embedding::create_provider;
use tcgen::export::{print_table, read_report, write_report};
use tcgen::extract::extract_file;
use tcgen::index::EmbeddingIndex;
use tcgen::logging::init_logging;
use tcgen::models::TestCase;
use tcgen::pipeline::{index_document, Generator};
use tcgen::rules::RuleTable;
use tcgen::templates::custom_testcases;
use tcgen::validate::validate_testcases;

/// tcgen: design document to QA test cases.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. Missing files fall back to built-in defaults.
#[derive(Parser)]
#[command(
    name = "tcgen",
    about = "Generate QA test cases from design documents",
    version,
    long_about = "tcgen indexes a design document (txt, md, pdf, docx) into a flat vector index \
    and synthesises structured QA test cases from it using condition extraction, a rule table \
    of check templates, and keyword-driven categorisation."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/tcgen.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from a document.
    ///
    /// Replaces any index already stored in `index.dir`.
    Index {
        /// Document to index (.txt, .md, .pdf, .docx).
        file: PathBuf,
    },

    /// Generate test cases from the chunks most relevant to a query.
    Query {
        /// Query text.
        text: String,

        /// Number of chunks to retrieve (defaults to `retrieval.top_k`).
        #[arg(long)]
        k: Option<i64>,

        /// Report directory (defaults to `output.dir`).
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Generate test cases from every indexed chunk.
    Generate {
        /// Report directory (defaults to `output.dir`).
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Emit the template set for a category pair.
    Custom {
        /// Major category, e.g. "스킬 시스템".
        #[arg(long)]
        major: String,

        /// Medium category, e.g. "아이템 장착".
        #[arg(long)]
        medium: String,

        /// Extra description appended to every note.
        #[arg(long)]
        desc: Option<String>,

        /// Report directory (defaults to `output.dir`).
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Score a saved report against its source document.
    Validate {
        /// Report JSON written by `query`, `generate`, or `custom`.
        report: PathBuf,

        /// Source document the report was generated from.
        #[arg(long)]
        source: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_or_default(&cli.config)?;
    init_logging(&cfg.logging)?;

    match cli.command {
        Commands::Index { file } => {
            let provider = create_provider(&cfg.embedding)?;
            let index = index_document(&cfg, &file, provider.as_ref())?;
            println!(
                "Indexed {} chunks (dimension {}) into {}",
                index.len(),
                index.dimension(),
                cfg.index.dir.display()
            );
        }
        Commands::Query { text, k, output } => {
            let rules = load_rules(&cfg)?;
            let index = load_index(&cfg)?;
            let provider = create_provider(&cfg.embedding)?;
            let k = k.unwrap_or(cfg.retrieval.top_k);
            let testcases =
                Generator::new(&rules).query_mode(&index, provider.as_ref(), &text, k)?;
            report(&cfg, &testcases, output.as_deref())?;
        }
        Commands::Generate { output } => {
            let rules = load_rules(&cfg)?;
            let index = load_index(&cfg)?;
            let testcases = Generator::new(&rules).batch_mode(index.chunks());
            report(&cfg, &testcases, output.as_deref())?;
        }
        Commands::Custom {
            major,
            medium,
            desc,
            output,
        } => {
            let testcases = custom_testcases(&major, &medium, desc.as_deref());
            report(&cfg, &testcases, output.as_deref())?;
        }
        Commands::Validate { report, source } => {
            let report = read_report(&report)?;
            let source_text = extract_file(&source)
                .with_context(|| format!("Failed to extract text from {}", source.display()))?;
            let results = validate_testcases(&report.testcases, &source_text);

            let mut passed = 0;
            for (i, (tc, result)) in report.testcases.iter().zip(&results).enumerate() {
                if result.passed {
                    passed += 1;
                }
                println!(
                    "{}. [{:.1}] {} {}",
                    i + 1,
                    result.total,
                    if result.passed { "PASS" } else { "FAIL" },
                    tc.content
                );
                println!(
                    "    accuracy {} / completeness {} / clarity {} / platform {}",
                    result.scores.accuracy,
                    result.scores.completeness,
                    result.scores.clarity,
                    result.scores.platform
                );
                println!("    suggestions: {}", result.suggestions.join(" "));
            }
            println!();
            println!("{}/{} test cases passed", passed, results.len());
        }
    }

    Ok(())
}

fn load_rules(cfg: &Config) -> anyhow::Result<RuleTable> {
    RuleTable::load_or_builtin(cfg.rules.path.as_deref())
}

fn load_index(cfg: &Config) -> anyhow::Result<EmbeddingIndex> {
    EmbeddingIndex::load(&cfg.index.dir).with_context(|| {
        format!(
            "Failed to load index from {} (run `tcgen index <file>` first)",
            cfg.index.dir.display()
        )
    })
}

fn report(cfg: &Config, testcases: &[TestCase], output: Option<&Path>) -> anyhow::Result<()> {
    print_table(testcases);
    let dir = output.unwrap_or(cfg.output.dir.as_path());
    let path = write_report(testcases, dir)?;
    println!("Report written to {}", path.display());
    Ok(())
}
