//! Content-keyed deduplication and the non-empty fallback.

use std::collections::HashSet;

use crate::category::{DEFAULT_MAJOR, DEFAULT_MEDIUM};
use crate::models::TestCase;
use crate::templates::{instantiate, EQUIPMENT};

/// Drop test cases whose `content` was already seen, keeping first
/// occurrences in order.
pub fn dedupe(testcases: Vec<TestCase>) -> Vec<TestCase> {
    let mut seen = HashSet::new();
    testcases
        .into_iter()
        .filter(|tc| seen.insert(tc.content.clone()))
        .collect()
}

/// The fixed set returned when generation produced nothing: equip and
/// unequip, visual feedback, stat application, set effects, level and
/// class restrictions.
pub fn baseline() -> Vec<TestCase> {
    instantiate(EQUIPMENT, DEFAULT_MAJOR, DEFAULT_MEDIUM)
}

pub fn ensure_nonempty(testcases: Vec<TestCase>) -> Vec<TestCase> {
    if testcases.is_empty() {
        tracing::warn!("no test cases extracted; using the baseline set");
        return baseline();
    }
    testcases
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn tc(content: &str, minor: &str) -> TestCase {
        TestCase::new(&Category::new("시스템", "기능", minor), content, "")
    }

    #[test]
    fn keeps_first_occurrence_in_order() {
        let out = dedupe(vec![
            tc("A 확인", "first"),
            tc("B 확인", "b"),
            tc("A 확인", "second"),
            tc("C 확인", "c"),
        ]);
        let contents: Vec<&str> = out.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["A 확인", "B 확인", "C 확인"]);
        assert_eq!(out[0].minor, "first");
    }

    #[test]
    fn idempotent() {
        let input = vec![tc("x", "1"), tc("y", "2"), tc("x", "3"), tc("y", "4")];
        let once = dedupe(input);
        assert_eq!(dedupe(once.clone()), once);
    }

    #[test]
    fn empty_input_gets_baseline() {
        let out = ensure_nonempty(Vec::new());
        assert_eq!(out.len(), EQUIPMENT.len());
        assert!(out.iter().any(|t| t.minor == "장착 해제"));
        assert!(out.iter().any(|t| t.minor == "클래스 제한"));
        assert!(out.iter().all(|t| t.major == DEFAULT_MAJOR));
    }

    #[test]
    fn nonempty_input_is_untouched() {
        let input = vec![tc("only", "x")];
        assert_eq!(ensure_nonempty(input.clone()), input);
    }
}
