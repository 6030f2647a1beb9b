//! Line-boundary text chunker.
//!
//! Splits extracted document text into [`Chunk`]s of at most `chunk_size`
//! characters. Splitting occurs on line boundaries so headings stay with
//! their paragraphs; the last line of each flushed chunk is carried into the
//! next one as overlap. A single line longer than `chunk_size` is split
//! into word windows instead.

use std::path::Path;

use crate::models::{Chunk, ChunkMetadata};

/// Approximate characters per word, used to turn a character overlap into
/// a word count for oversized lines.
const CHARS_PER_WORD: usize = 5;

/// Split text into chunks. Returns chunks with contiguous ids starting at 0;
/// empty or blank text yields no chunks.
pub fn chunk_text(text: &str, source: &Path, chunk_size: usize, chunk_overlap: usize) -> Vec<Chunk> {
    let pieces = split_text(text, chunk_size, chunk_overlap);
    let file_name = source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let source = source.display().to_string();

    pieces
        .into_iter()
        .enumerate()
        .map(|(chunk_id, piece)| {
            Chunk::new(
                piece,
                ChunkMetadata {
                    file_name: file_name.clone(),
                    chunk_id,
                    source: source.clone(),
                },
            )
        })
        .collect()
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Split into raw text pieces, without metadata.
pub fn split_text(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    let chunk_size = chunk_size.max(1);
    let mut chunks: Vec<String> = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut current_size = 0usize;

    for line in text.lines().filter(|line| !line.trim().is_empty()) {
        let line_len = char_len(line);

        if line_len > chunk_size {
            if !current.is_empty() {
                chunks.push(current.join("\n"));
                current = carry_last(&current);
                current_size = current.iter().map(|l| char_len(l)).sum();
            }
            let (mut windows, tail) = split_long_line(line, chunk_size, chunk_overlap);
            chunks.append(&mut windows);
            if let Some(tail) = tail {
                current_size += char_len(&tail);
                current.push(tail);
            }
        } else if current_size + line_len > chunk_size {
            if !current.is_empty() {
                chunks.push(current.join("\n"));
            }
            current = carry_last(&current);
            current_size = current.iter().map(|l| char_len(l)).sum();
            current.push(line.to_string());
            current_size += line_len;
        } else {
            current.push(line.to_string());
            current_size += line_len;
        }
    }

    if !current.is_empty() {
        chunks.push(current.join("\n"));
    }

    chunks
}

fn carry_last(lines: &[String]) -> Vec<String> {
    lines.last().cloned().into_iter().collect()
}

/// Split an oversized line into word windows. Returns the full windows and
/// the trailing partial window, which the caller keeps accumulating.
fn split_long_line(
    line: &str,
    chunk_size: usize,
    chunk_overlap: usize,
) -> (Vec<String>, Option<String>) {
    let overlap_words = chunk_overlap / CHARS_PER_WORD;
    let mut windows = Vec::new();
    let mut window: Vec<&str> = Vec::new();
    let mut window_size = 0usize;

    for word in line.split_whitespace() {
        let word_len = char_len(word) + 1;
        if window_size + word_len > chunk_size && !window.is_empty() {
            windows.push(window.join(" "));
            let keep_from = window.len().saturating_sub(overlap_words);
            window.drain(..keep_from);
            window_size = window.iter().map(|w| char_len(w) + 1).sum();
            // The carried overlap must leave room for progress.
            if window_size + word_len > chunk_size {
                window.clear();
                window_size = 0;
            }
        }
        window.push(word);
        window_size += word_len;
    }

    let tail = (!window.is_empty()).then(|| window.join(" "));
    (windows, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_text_single_chunk() {
        let chunks = chunk_text("Hello, world!", Path::new("/docs/a.txt"), 1000, 200);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].metadata.chunk_id, 0);
        assert_eq!(chunks[0].metadata.file_name, "a.txt");
        assert_eq!(chunks[0].metadata.source, "/docs/a.txt");
        assert_eq!(chunks[0].text, "Hello, world!");
        assert!(chunks[0].embedding.is_none());
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(chunk_text("", Path::new("a.txt"), 1000, 200).is_empty());
        assert!(chunk_text("\n  \n", Path::new("a.txt"), 1000, 200).is_empty());
    }

    #[test]
    fn blank_lines_are_dropped() {
        let chunks = split_text("first line\n\n\nsecond line", 1000, 0);
        assert_eq!(chunks, vec!["first line\nsecond line".to_string()]);
    }

    #[test]
    fn last_line_carries_over_as_overlap() {
        let text = "aaaaaaaaaa\nbbbbbbbbbb\ncccccccccc";
        let chunks = split_text(text, 20, 5);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], "aaaaaaaaaa\nbbbbbbbbbb");
        assert_eq!(chunks[1], "bbbbbbbbbb\ncccccccccc");
    }

    #[test]
    fn oversized_line_split_into_word_windows() {
        let line = (0..40).map(|i| format!("w{:02}", i)).collect::<Vec<_>>().join(" ");
        let chunks = split_text(&line, 40, 10);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(char_len(chunk) <= 40, "chunk too long: {}", chunk);
        }
        assert!(chunks.last().unwrap().ends_with("w39"));
    }

    #[test]
    fn chunk_ids_contiguous() {
        let text = (0..50)
            .map(|i| format!("Paragraph number {}.", i))
            .collect::<Vec<_>>()
            .join("\n");
        let chunks = chunk_text(&text, Path::new("doc.md"), 60, 10);
        for (i, c) in chunks.iter().enumerate() {
            assert_eq!(c.metadata.chunk_id, i, "Index mismatch at position {}", i);
        }
    }

    #[test]
    fn sizes_count_characters_not_bytes() {
        // 10 Hangul characters are 30 bytes.
        let line = "가나다라마바사아자차";
        let chunks = split_text(&format!("{line}\n{line}"), 20, 0);
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn deterministic() {
        let text = "Alpha\nBeta\nGamma\nDelta";
        assert_eq!(split_text(text, 8, 2), split_text(text, 8, 2));
    }
}
