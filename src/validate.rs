//! Heuristic quality scoring of generated test cases against their source
//! document.
//!
//! Four scores, each clamped to `1..=10`:
//!
//! | score        | signals                                                     |
//! |--------------|-------------------------------------------------------------|
//! | accuracy     | minor/medium found in the source; QA-style vs. bare wording |
//! | completeness | which of major/medium/minor/content are filled              |
//! | clarity      | word count; verification verbs; UI vocabulary               |
//! | platform     | filled platform columns; UI and network vocabulary          |
//!
//! A case passes when the mean of the four is at least 7.0.

use std::sync::LazyLock;

use regex::RegexSet;
use serde::Serialize;

use crate::models::TestCase;

pub const PASS_THRESHOLD: f64 = 7.0;
const SUGGESTION_THRESHOLD: u8 = 7;

/// Content phrased from the tester's point of view.
static GOOD_CONTENT: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"버튼이.*노출",
        r"버튼이.*비활성화",
        r"표시.*확인",
        r"정상.*동작",
        r"적용.*확인",
        r"오류.*메시지",
        r"알림.*표시",
        r"UI.*표시",
        r"경고.*노출",
        r"팝업.*표시",
    ])
    .expect("good content patterns are valid")
});

/// Content that only restates a technical condition.
static POOR_CONTENT: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"이.*동작",
        r"가.*동작",
        r".*값.*확인",
        r"TRUE|FALSE",
        r"설정.*확인",
        r"^조건.*확인$",
    ])
    .expect("poor content patterns are valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scores {
    pub accuracy: u8,
    pub completeness: u8,
    pub clarity: u8,
    pub platform: u8,
}

impl Scores {
    fn mean(&self) -> f64 {
        f64::from(
            u16::from(self.accuracy)
                + u16::from(self.completeness)
                + u16::from(self.clarity)
                + u16::from(self.platform),
        ) / 4.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub scores: Scores,
    /// Mean score, rounded to one decimal.
    pub total: f64,
    pub passed: bool,
    pub suggestions: Vec<String>,
}

fn clamp_score(raw: u32) -> u8 {
    raw.clamp(1, 10) as u8
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn accuracy(tc: &TestCase, source: &str) -> u32 {
    let mut score = 0;
    if !tc.minor.is_empty() && contains_ignore_case(source, &tc.minor) {
        score += 5;
    } else if !tc.medium.is_empty() && contains_ignore_case(source, &tc.medium) {
        score += 3;
    }
    if !tc.content.is_empty() {
        score += if GOOD_CONTENT.is_match(&tc.content) {
            5
        } else if POOR_CONTENT.is_match(&tc.content) {
            2
        } else {
            3
        };
    }
    score
}

fn completeness(tc: &TestCase) -> u32 {
    [(&tc.major, 2), (&tc.medium, 2), (&tc.minor, 2), (&tc.content, 4)]
        .iter()
        .filter(|(field, _)| !field.is_empty())
        .map(|(_, points)| points)
        .sum()
}

fn clarity(content: &str) -> u32 {
    if content.is_empty() {
        return 0;
    }
    let mut score = match content.split_whitespace().count() {
        n if n >= 6 => 5,
        n if n >= 4 => 3,
        _ => 1,
    };
    if ["확인", "검증", "테스트"].iter().any(|w| content.contains(w)) {
        score += 3;
    }
    if ["UI", "버튼", "표시", "화면"].iter().any(|w| content.contains(w)) {
        score += 2;
    }
    score
}

fn platform(tc: &TestCase) -> u32 {
    let mut score = match tc.platform_results.filled() {
        3 => 5,
        0 => 0,
        _ => 3,
    };
    if ["버튼", "UI", "화면"].iter().any(|w| tc.content.contains(w)) {
        score += 3;
    }
    if ["네트워크", "연결"].iter().any(|w| tc.content.contains(w)) {
        score += 2;
    }
    score
}

/// Score one test case against the source document text.
pub fn validate_testcase(tc: &TestCase, source: &str) -> ValidationReport {
    let scores = Scores {
        accuracy: clamp_score(accuracy(tc, source)),
        completeness: clamp_score(completeness(tc)),
        clarity: clamp_score(clarity(&tc.content)),
        platform: clamp_score(platform(tc)),
    };
    let mean = scores.mean();

    let mut suggestions: Vec<String> = [
        (scores.accuracy, "기획서 내용을 더 정확히 반영할 필요가 있습니다."),
        (scores.completeness, "테스트케이스에 더 많은 정보를 포함해야 합니다."),
        (scores.clarity, "확인내용을 더 명확하고 구체적으로 작성해야 합니다."),
        (scores.platform, "플랫폼별 특성을 더 고려한 테스트케이스가 필요합니다."),
    ]
    .iter()
    .filter(|(score, _)| *score < SUGGESTION_THRESHOLD)
    .map(|(_, text)| text.to_string())
    .collect();
    if suggestions.is_empty() {
        suggestions.push("테스트케이스가 잘 작성되었습니다.".to_string());
    }

    ValidationReport {
        scores,
        total: (mean * 10.0).round() / 10.0,
        passed: mean >= PASS_THRESHOLD,
        suggestions,
    }
}

pub fn validate_testcases(testcases: &[TestCase], source: &str) -> Vec<ValidationReport> {
    testcases
        .iter()
        .map(|tc| validate_testcase(tc, source))
        .collect()
}
