//! Sentence segmentation and structural-noise filtering.
//!
//! `segment` cuts a context blob into candidate sentences; `should_skip`
//! rejects the ones that carry no testable content (headings, captions,
//! rules, version stamps, reference lines, and anything too short).

use std::sync::LazyLock;

use regex::RegexSet;

/// Sentences shorter than this many characters are never extracted.
pub const MIN_SENTENCE_CHARS: usize = 10;

static BLACKLIST: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        // table of contents
        r"(?i)^(목차|차례|table of contents|contents)\b",
        // numbered headings: "1.2 개요", "제3장 스킬", "IV. 부록"
        r"^\d+(\.\d+)+\.?\s+[^.!?]{1,40}$",
        r"^제?\s*\d+\s*(장|절|항)(\s|$)",
        r"^[IVX]+\.\s+[^.!?]{1,40}$",
        // figure / table captions
        r"(?i)^\[?(그림|표|figure|fig\.|table)\s*\d+",
        // markdown headings and whole-line emphasis
        r"^#{1,6}\s",
        r"^\*\*[^*]+\*\*[.:]?$",
        r"^__[^_]+__[.:]?$",
        // horizontal rules
        r"^([-*_=~]\s*){3,}$",
        // bare version strings
        r"(?i)^(v|ver\.?|version)?\s*\d+(\.\d+)+\s*$",
        // email addresses and reference lines
        r"[\w.+-]+@[\w-]+\.[\w.-]+",
        r"(?i)^(참고|참조|출처|문의|references?|see also|source)\s*[:：]",
        r"(?i)^https?://\S+$",
    ])
    .expect("blacklist patterns are valid")
});

/// Split `text` into trimmed, non-empty sentences.
///
/// A boundary is a whitespace run that follows `.`, `!` or `?`. Numbered
/// list markers ("1. ", "2. ") end in a period, so they are cut off by the
/// same rule. Each call re-derives the sequence from scratch.
pub fn segment(text: &str) -> Vec<String> {
    let mut pieces: Vec<&str> = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c.is_whitespace() && matches!(prev, Some('.' | '!' | '?')) {
            pieces.push(&text[start..i]);
            while chars.next_if(|&(_, next)| next.is_whitespace()).is_some() {}
            start = chars.peek().map(|&(j, _)| j).unwrap_or(text.len());
            prev = None;
            continue;
        }
        prev = Some(c);
    }
    pieces.push(&text[start..]);

    pieces
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// True when `sentence` is too short or looks like document structure.
pub fn should_skip(sentence: &str) -> bool {
    let sentence = sentence.trim();
    sentence.chars().count() < MIN_SENTENCE_CHARS || BLACKLIST.is_match(sentence)
}

/// `segment` followed by `should_skip`, keeping each sentence's position
/// in the unfiltered sequence.
pub fn candidate_sentences(text: &str) -> Vec<(usize, String)> {
    segment(text)
        .into_iter()
        .enumerate()
        .filter(|(_, s)| !should_skip(s))
        .collect()
}
