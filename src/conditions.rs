//! Lexical condition extraction.
//!
//! A condition is an upper-case field token paired with a value, written
//! as `FIELD=VALUE`, `FIELD: VALUE`, or with a Korean subject marker
//! (`FIELD가 VALUE`). Every pattern runs over the whole sentence and every
//! match is kept, so one fact written two ways yields two conditions.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::Condition;

/// Field name of the synthetic condition emitted for keyword-only sentences.
pub const GENERAL_FEATURE: &str = "GENERAL_FEATURE";
pub const DESCRIBED: &str = "DESCRIBED";

static PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\b([A-Z][A-Z_]+)\s*=\s*([^\s,;()]+)",
        r"\b([A-Z][A-Z_]+)\s*[:：]\s*([^\s,;()]+)",
        r"\b([A-Z][A-Z_]+)(?:이|가|은|는)\s+([^\s,;()]+)",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("condition pattern is valid"))
    .collect()
});

/// UI and game-domain terms that make an unstructured sentence worth a case.
pub const DEFAULT_VOCABULARY: &[&str] = &[
    "버튼", "ui", "팝업", "아이템", "장착", "장비", "스킬", "퀘스트", "보상", "상점",
    "구매", "전투", "화면", "표시", "노출", "클릭", "터치", "인벤토리", "레벨", "알림",
    "메시지", "슬롯", "세트", "능력치", "캐릭터",
];

#[derive(Debug, Clone)]
pub struct ConditionExtractor {
    vocabulary: Vec<String>,
}

impl Default for ConditionExtractor {
    fn default() -> Self {
        Self::with_vocabulary(DEFAULT_VOCABULARY.iter().copied())
    }
}

impl ConditionExtractor {
    pub fn with_vocabulary<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            vocabulary: words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// All pattern matches in pattern order, duplicates included.
    pub fn extract(&self, sentence: &str) -> Vec<Condition> {
        let mut conditions = Vec::new();
        for pattern in PATTERNS.iter() {
            for caps in pattern.captures_iter(sentence) {
                let (Some(whole), Some(field), Some(value)) = (caps.get(0), caps.get(1), caps.get(2))
                else {
                    continue;
                };
                let value = strip_terminal(value.as_str());
                if value.is_empty() {
                    continue;
                }
                conditions.push(Condition {
                    field: field.as_str().to_string(),
                    value: normalize_value(value),
                    original: strip_terminal(whole.as_str().trim()).to_string(),
                });
            }
        }
        conditions
    }

    /// `extract`, falling back to one synthetic `GENERAL_FEATURE` condition
    /// when the sentence mentions a vocabulary term. Empty otherwise.
    pub fn filter_and_extract(&self, sentence: &str) -> Vec<Condition> {
        let conditions = self.extract(sentence);
        if !conditions.is_empty() {
            return conditions;
        }
        if self.mentions_vocabulary(sentence) {
            return vec![Condition {
                field: GENERAL_FEATURE.to_string(),
                value: DESCRIBED.to_string(),
                original: sentence.to_string(),
            }];
        }
        Vec::new()
    }

    fn mentions_vocabulary(&self, sentence: &str) -> bool {
        let lowered = sentence.to_lowercase();
        self.vocabulary.iter().any(|word| lowered.contains(word.as_str()))
    }
}

/// Sentence-final punctuation that `segment` leaves on the last token.
fn strip_terminal(token: &str) -> &str {
    token.trim_end_matches(['.', '!', '?', '。'])
}

fn normalize_value(value: &str) -> String {
    if value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false") {
        value.to_ascii_uppercase()
    } else {
        value.to_string()
    }
}

impl Condition {
    pub fn is_synthetic(&self) -> bool {
        self.field == GENERAL_FEATURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(conditions: &[Condition]) -> Vec<(&str, &str)> {
        conditions
            .iter()
            .map(|c| (c.field.as_str(), c.value.as_str()))
            .collect()
    }

    #[test]
    fn extracts_equality_condition() {
        let extractor = ConditionExtractor::default();
        let conditions = extractor.extract("GRADE=RARE 아이템 장착 시 색상이 표시된다");
        assert_eq!(pairs(&conditions), vec![("GRADE", "RARE")]);
        assert_eq!(conditions[0].original, "GRADE=RARE");
    }

    #[test]
    fn colon_and_subject_marker_forms() {
        let extractor = ConditionExtractor::default();
        assert_eq!(
            pairs(&extractor.extract("SLOT_TYPE: WEAPON 인 경우 무기 슬롯에 장착")),
            vec![("SLOT_TYPE", "WEAPON")]
        );
        assert_eq!(
            pairs(&extractor.extract("ENABLED가 true 이면 버튼이 노출된다")),
            vec![("ENABLED", "TRUE")]
        );
    }

    #[test]
    fn duplicates_across_patterns_are_preserved() {
        let extractor = ConditionExtractor::default();
        let conditions = extractor.extract("HP=100 이고 HP: 100 이다");
        assert_eq!(pairs(&conditions), vec![("HP", "100"), ("HP", "100")]);
        assert_ne!(conditions[0].original, conditions[1].original);
    }

    #[test]
    fn boolean_values_are_uppercased() {
        let extractor = ConditionExtractor::default();
        let conditions = extractor.extract("AUTO_EQUIP=false, LOCKED=True");
        assert_eq!(
            pairs(&conditions),
            vec![("AUTO_EQUIP", "FALSE"), ("LOCKED", "TRUE")]
        );
    }

    #[test]
    fn sentence_final_punctuation_is_not_part_of_the_value() {
        let extractor = ConditionExtractor::default();
        let conditions = extractor.extract("장착 버튼은 ENABLED=false.");
        assert_eq!(pairs(&conditions), vec![("ENABLED", "FALSE")]);
        assert_eq!(conditions[0].original, "ENABLED=false");

        assert_eq!(
            pairs(&extractor.extract("아이템 등급은 GRADE=RARE.")),
            vec![("GRADE", "RARE")]
        );
        assert_eq!(
            pairs(&extractor.extract("배율은 RATE: 1.5! 잠금 LOCKED가 true?")),
            vec![("RATE", "1.5"), ("LOCKED", "TRUE")]
        );
        assert!(extractor.extract("값이 비어 있다 EMPTY=.").is_empty());
    }

    #[test]
    fn single_letter_and_lowercase_fields_are_ignored() {
        let extractor = ConditionExtractor::default();
        assert!(extractor.extract("x=1 그리고 A=2 그리고 grade=rare").is_empty());
    }

    #[test]
    fn extraction_is_deterministic() {
        let extractor = ConditionExtractor::default();
        let sentence = "GRADE=EPIC, LEVEL: 30, CLASS가 WARRIOR 이면 장착 가능";
        assert_eq!(extractor.extract(sentence), extractor.extract(sentence));
        assert_eq!(extractor.extract(sentence).len(), 3);
    }

    #[test]
    fn keyword_sentence_yields_general_feature() {
        let extractor = ConditionExtractor::default();
        let sentence = "장착 버튼을 누르면 확인 팝업이 노출된다";
        let conditions = extractor.filter_and_extract(sentence);
        assert_eq!(pairs(&conditions), vec![(GENERAL_FEATURE, DESCRIBED)]);
        assert_eq!(conditions[0].original, sentence);
        assert!(conditions[0].is_synthetic());
    }

    #[test]
    fn no_field_and_no_keyword_yields_nothing() {
        let extractor = ConditionExtractor::default();
        assert!(extractor
            .filter_and_extract("본 문서는 개정 이력과 작성자 정보를 담고 있습니다")
            .is_empty());
    }

    #[test]
    fn vocabulary_match_ignores_ascii_case() {
        let extractor = ConditionExtractor::with_vocabulary(["UI"]);
        assert_eq!(extractor.filter_and_extract("새 ui 레이아웃을 적용한다").len(), 1);
    }
}
