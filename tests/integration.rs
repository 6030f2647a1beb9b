//! End-to-end library tests: document → index → generation, with the
//! offline hash embedding provider.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use tcgen::config::{Config, EmbeddingConfig};
use tcgen::dedupe::{baseline, dedupe};
use tcgen::embedding::{create_provider, embed_chunks, HashProvider};
use tcgen::error::EngineError;
use tcgen::index::{EmbeddingIndex, SharedIndex};
use tcgen::models::{Chunk, ChunkMetadata};
use tcgen::pipeline::{index_document, Generator};
use tcgen::rules::RuleTable;

const DESIGN_DOC: &str = "스킬 시스템 > 아이템 장착: 개요\n\
GRADE=RARE 아이템 장착 시 색상이 표시된다.\n\
SLOT_TYPE=WEAPON 인 아이템은 무기 슬롯에 장착된다.\n\
장착 버튼을 누르면 장비가 교체된다.\n\
본 문서는 작성자 정보를 담고 있습니다.\n\
상점 구매: PRICE=500 골드가 필요하다.\n";

fn config_in(root: &Path) -> Config {
    let mut config = Config::default();
    config.index.dir = root.join("index");
    config.output.dir = root.join("output");
    config.chunking.chunk_size = 120;
    config.chunking.chunk_overlap = 20;
    config.embedding = EmbeddingConfig {
        dims: 32,
        ..EmbeddingConfig::default()
    };
    config
}

fn write_doc(root: &Path) -> std::path::PathBuf {
    let path = root.join("design.md");
    fs::write(&path, DESIGN_DOC).unwrap();
    path
}

#[test]
fn index_then_batch_generate() {
    let tmp = TempDir::new().unwrap();
    let config = config_in(tmp.path());
    let doc = write_doc(tmp.path());
    let provider = create_provider(&config.embedding).unwrap();

    let built = index_document(&config, &doc, provider.as_ref()).unwrap();
    assert!(built.len() >= 2, "expected several chunks, got {}", built.len());
    assert_eq!(built.dimension(), 32);

    let loaded = EmbeddingIndex::load(&config.index.dir).unwrap();
    assert_eq!(loaded, built);

    let rules = RuleTable::builtin();
    let testcases = Generator::new(&rules).batch_mode(loaded.chunks());
    let contents: Vec<&str> = testcases.iter().map(|tc| tc.content.as_str()).collect();

    assert!(contents.contains(&"아이템 색상이 파란색으로 표시되는지 확인"));
    assert!(contents.contains(&"무기 슬롯에만 장착되는지 확인"));
    assert!(contents.contains(&"구매 시 500 재화가 정확히 차감되는지 확인"));
    // chunk overlap repeats lines; content stays unique
    assert_eq!(dedupe(testcases.clone()), testcases);
    assert!(testcases.iter().all(|tc| tc.result.is_empty() && tc.jira.is_empty()));
}

#[test]
fn shop_sentence_is_categorised_by_keyword() {
    let rules = RuleTable::builtin();
    let testcases = Generator::new(&rules).generate_from_context("상점 구매: PRICE=500 골드가 필요하다.");
    assert_eq!(testcases.len(), 1);
    assert_eq!(testcases[0].major, "상점 시스템");
    assert_eq!(testcases[0].minor, "PRICE");
    assert_eq!(testcases[0].note, "PRICE=500");
}

#[test]
fn query_mode_round_trip_matches_in_memory() {
    let tmp = TempDir::new().unwrap();
    let config = config_in(tmp.path());
    let doc = write_doc(tmp.path());
    let provider = HashProvider::new(32);

    let built = index_document(&config, &doc, &provider).unwrap();
    let loaded = EmbeddingIndex::load(&config.index.dir).unwrap();

    let rules = RuleTable::builtin();
    let generator = Generator::new(&rules);
    for query in ["아이템 장착 색상", "상점 구매 골드", "무기 슬롯"] {
        assert_eq!(
            generator.query_mode(&built, &provider, query, 2).unwrap(),
            generator.query_mode(&loaded, &provider, query, 2).unwrap()
        );
    }
}

#[test]
fn missing_index_is_not_found() {
    let tmp = TempDir::new().unwrap();
    assert!(matches!(
        EmbeddingIndex::load(&tmp.path().join("nothing")),
        Err(EngineError::NotFound { .. })
    ));
}

#[test]
fn document_without_conditions_yields_baseline() {
    let tmp = TempDir::new().unwrap();
    let config = config_in(tmp.path());
    let doc = tmp.path().join("notes.txt");
    fs::write(&doc, "본 문서는 작성자 정보를 담고 있습니다.\n개정 이력은 별도로 관리합니다.").unwrap();
    let provider = HashProvider::new(32);

    let index = index_document(&config, &doc, &provider).unwrap();
    let rules = RuleTable::builtin();
    assert_eq!(Generator::new(&rules).batch_mode(index.chunks()), baseline());
}

#[test]
fn empty_document_cannot_be_indexed() {
    let tmp = TempDir::new().unwrap();
    let config = config_in(tmp.path());
    let doc = tmp.path().join("blank.txt");
    fs::write(&doc, "\n\n   \n").unwrap();
    let provider = HashProvider::new(32);
    assert!(index_document(&config, &doc, &provider).is_err());
    assert!(!config.index.dir.join("vectors.bin").exists());
}

#[test]
fn shared_index_serves_searches_across_rebuild() {
    let tmp = TempDir::new().unwrap();
    let provider = HashProvider::new(32);
    let embed = |texts: &[&str]| -> Vec<Chunk> {
        let chunks = texts
            .iter()
            .enumerate()
            .map(|(chunk_id, text)| {
                Chunk::new(
                    *text,
                    ChunkMetadata {
                        file_name: "doc.md".into(),
                        chunk_id,
                        source: "doc.md".into(),
                    },
                )
            })
            .collect();
        embed_chunks(&provider, chunks, 4).unwrap()
    };

    let shared = SharedIndex::new(EmbeddingIndex::build(&embed(&["첫 번째 버전 문서"])).unwrap());
    let query = tcgen::embedding::embed_query(&provider, "두 번째").unwrap();
    assert_eq!(shared.search(&query, 5).unwrap().len(), 1);

    shared
        .rebuild(
            &embed(&["두 번째 버전 문서 첫 줄입니다", "두 번째 버전 문서 둘째 줄입니다"]),
            &tmp.path().join("index"),
        )
        .unwrap();
    assert_eq!(shared.search(&query, 5).unwrap().len(), 2);
    assert_eq!(shared.read().len(), 2);
}
