//! Rule table and rule transformer.
//!
//! The [`RuleTable`] maps `FIELD -> VALUE -> check text`, with an optional
//! `DEFAULT` template per field whose `{value}` placeholder receives the
//! extracted value. Two ordered keyword tables add UI-interaction and
//! exception checks. The table is built once and handed to
//! [`RuleTransformer`]; nothing mutates it afterwards.
//!
//! A rule file replaces the built-in table:
//!
//! ```toml
//! [fields.GRADE]
//! RARE = "아이템 색상이 파란색으로 표시되는지 확인"
//! DEFAULT = "{value} 등급 아이템의 색상이 등급에 맞게 표시되는지 확인"
//!
//! [[ui_rules]]
//! keywords = ["팝업"]
//! description = "팝업이 정상적으로 표시되고 닫기 동작이 정상 작동하는지 확인"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::{Category, Condition, TestCase};

/// Per-field key whose template applies to values without their own entry.
pub const DEFAULT_KEY: &str = "DEFAULT";

/// Content used when a sentence produces no candidate at all.
pub const FALLBACK_CONTENT: &str = "verify behavior matches specification";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PatternRule {
    pub keywords: Vec<String>,
    pub description: String,
}

impl PatternRule {
    fn new(keywords: &[&str], description: &str) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RuleTable {
    #[serde(default)]
    pub fields: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(default)]
    pub ui_rules: Vec<PatternRule>,
    #[serde(default)]
    pub exception_rules: Vec<PatternRule>,
}

impl RuleTable {
    /// Load a rule file, replacing the built-in table entirely.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read rule file: {}", path.display()))?;
        let table: RuleTable = toml::from_str(&content)
            .with_context(|| format!("Failed to parse rule file: {}", path.display()))?;

        for (field, values) in &table.fields {
            if let Some((value, _)) = values.iter().find(|(_, t)| t.trim().is_empty()) {
                anyhow::bail!("rule {}.{} has an empty template", field, value);
            }
        }
        for rule in table.ui_rules.iter().chain(&table.exception_rules) {
            if rule.keywords.is_empty() || rule.description.trim().is_empty() {
                anyhow::bail!("keyword rule needs keywords and a description: {:?}", rule);
            }
        }
        Ok(table)
    }

    /// The configured rule file, or the built-in table when none is set.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::builtin()),
        }
    }

    pub fn knows(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Check text for `field = value`: the exact entry, else the field's
    /// `DEFAULT` template with `{value}` substituted.
    pub fn render(&self, field: &str, value: &str) -> Option<String> {
        let values = self.fields.get(field)?;
        values
            .get(value)
            .cloned()
            .or_else(|| values.get(DEFAULT_KEY).map(|t| t.replace("{value}", value)))
    }

    pub fn builtin() -> Self {
        let mut fields: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        let mut field = |name: &str, entries: &[(&str, &str)]| {
            fields.insert(
                name.to_string(),
                entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            );
        };

        field(
            "GRADE",
            &[
                ("COMMON", "아이템 색상이 흰색으로 표시되는지 확인"),
                ("UNCOMMON", "아이템 색상이 초록색으로 표시되는지 확인"),
                ("RARE", "아이템 색상이 파란색으로 표시되는지 확인"),
                ("EPIC", "아이템 색상이 보라색으로 표시되는지 확인"),
                ("LEGENDARY", "아이템 색상이 주황색으로 표시되는지 확인"),
                (DEFAULT_KEY, "{value} 등급 아이템의 색상이 등급에 맞게 표시되는지 확인"),
            ],
        );
        field(
            "SLOT_TYPE",
            &[
                ("WEAPON", "무기 슬롯에만 장착되는지 확인"),
                ("ARMOR", "방어구 슬롯에만 장착되는지 확인"),
                ("ACCESSORY", "장신구 슬롯에만 장착되는지 확인"),
                (DEFAULT_KEY, "{value} 슬롯에 정상적으로 장착되는지 확인"),
            ],
        );
        field(
            "REQUIRED_LEVEL",
            &[(
                DEFAULT_KEY,
                "캐릭터 레벨이 {value} 미만일 때 장착이 제한되고 안내 메시지가 표시되는지 확인",
            )],
        );
        field(
            "CLASS",
            &[(
                DEFAULT_KEY,
                "{value} 클래스만 장착할 수 있고 다른 클래스는 제한되는지 확인",
            )],
        );
        field(
            "SET_COUNT",
            &[
                ("2", "동일 세트 아이템 2개 장착 시 2세트 효과가 활성화되는지 확인"),
                ("4", "동일 세트 아이템 4개 장착 시 2세트 및 4세트 효과가 함께 활성화되는지 확인"),
                (DEFAULT_KEY, "세트 아이템 {value}개 장착 시 세트 효과가 활성화되는지 확인"),
            ],
        );
        field(
            "ENABLED",
            &[
                ("TRUE", "기능이 활성화 상태로 정상 동작하는지 확인"),
                ("FALSE", "기능이 비활성화되어 버튼이 비활성 상태로 표시되는지 확인"),
            ],
        );
        field(
            "VISIBLE",
            &[
                ("TRUE", "UI 요소가 화면에 노출되는지 확인"),
                ("FALSE", "UI 요소가 화면에 노출되지 않는지 확인"),
            ],
        );
        field(
            "COOLDOWN",
            &[(
                DEFAULT_KEY,
                "스킬 사용 후 {value}초 동안 재사용이 제한되고 쿨타임이 표시되는지 확인",
            )],
        );
        field(
            "MAX_LEVEL",
            &[(
                DEFAULT_KEY,
                "레벨 {value} 도달 시 더 이상 강화되지 않고 최대 레벨 안내가 표시되는지 확인",
            )],
        );
        field(
            "PRICE",
            &[(DEFAULT_KEY, "구매 시 {value} 재화가 정확히 차감되는지 확인")],
        );

        let ui_rules = vec![
            PatternRule::new(
                &["팝업", "popup"],
                "팝업이 정상적으로 표시되고 닫기 동작이 정상 작동하는지 확인",
            ),
            PatternRule::new(
                &["버튼", "button"],
                "버튼 클릭 시 정상적으로 반응하고 상태가 갱신되는지 확인",
            ),
            PatternRule::new(&["아이콘", "icon"], "아이콘이 올바른 위치와 크기로 표시되는지 확인"),
            PatternRule::new(
                &["툴팁", "tooltip"],
                "툴팁에 표시되는 정보가 실제 수치와 일치하는지 확인",
            ),
            PatternRule::new(&["알림", "메시지"], "알림 메시지가 올바른 문구로 표시되는지 확인"),
            PatternRule::new(&["드래그", "drag"], "드래그 앤 드롭으로 정상적으로 이동되는지 확인"),
        ];
        let exception_rules = vec![
            PatternRule::new(
                &["부족", "insufficient"],
                "조건 부족 시 동작이 제한되고 안내 메시지가 표시되는지 확인",
            ),
            PatternRule::new(&["초과", "최대"], "최대치 초과 시 동작이 제한되는지 확인"),
            PatternRule::new(
                &["실패", "오류", "에러", "error"],
                "실패 시 오류 메시지가 표시되고 기존 상태가 유지되는지 확인",
            ),
            PatternRule::new(
                &["불가", "제한", "금지"],
                "제한 조건에서 동작이 차단되고 안내가 표시되는지 확인",
            ),
            PatternRule::new(
                &["네트워크", "연결", "끊김"],
                "네트워크 연결 끊김 시 재연결 안내가 표시되는지 확인",
            ),
        ];

        Self {
            fields,
            ui_rules,
            exception_rules,
        }
    }
}

/// How specific a candidate description is. Longer text is assumed to say
/// more.
pub fn specificity(candidate: &str) -> usize {
    candidate.chars().count()
}

/// The highest-[`specificity`] candidate; the earliest one wins ties.
pub fn pick_most_specific(candidates: &[String]) -> Option<&str> {
    let mut best: Option<&str> = None;
    for candidate in candidates {
        if best.map_or(true, |b| specificity(candidate) > specificity(b)) {
            best = Some(candidate.as_str());
        }
    }
    best
}

/// Turn a free-form sentence into a check statement.
pub fn check_text(sentence: &str) -> String {
    let sentence = sentence
        .trim_start_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '•' | '*'))
        .trim();

    if sentence.ends_with(['?', '？'])
        || ["확인", "테스트", "체크"].iter().any(|s| sentence.ends_with(s))
    {
        sentence.to_string()
    } else if ["여부", "가능", "동작", "작동", "확인", "체크"]
        .iter()
        .any(|k| sentence.contains(k))
    {
        format!("{sentence} 정상 작동 확인")
    } else {
        format!("{sentence}에 대한 기능 동작 확인")
    }
}

fn first_rule<'a>(rules: &'a [PatternRule], lowered: &str) -> Option<&'a str> {
    rules
        .iter()
        .find(|rule| {
            rule.keywords
                .iter()
                .any(|k| lowered.contains(k.to_lowercase().as_str()))
        })
        .map(|rule| rule.description.as_str())
}

pub struct RuleTransformer<'a> {
    table: &'a RuleTable,
}

impl<'a> RuleTransformer<'a> {
    pub fn new(table: &'a RuleTable) -> Self {
        Self { table }
    }

    /// Candidate descriptions for one sentence, in generation order.
    pub fn candidates(&self, conditions: &[Condition], sentence: &str) -> Vec<String> {
        let mut candidates: Vec<String> = conditions
            .iter()
            .map(|c| {
                if c.is_synthetic() {
                    check_text(&c.original)
                } else {
                    self.table
                        .render(&c.field, &c.value)
                        .unwrap_or_else(|| format!("{} is {}: verify behavior", c.field, c.value))
                }
            })
            .collect();

        let lowered = sentence.to_lowercase();
        for rules in [&self.table.ui_rules, &self.table.exception_rules] {
            if let Some(description) = first_rule(rules, &lowered) {
                candidates.push(description.to_string());
            }
        }
        candidates
    }

    /// Build one test case from a sentence's conditions.
    pub fn transform(&self, conditions: &[Condition], sentence: &str, category: &Category) -> TestCase {
        let candidates = self.candidates(conditions, sentence);
        let content = pick_most_specific(&candidates).unwrap_or(FALLBACK_CONTENT);

        let mut category = category.clone();
        if let Some(matched) = conditions.iter().find(|c| self.table.knows(&c.field)) {
            category.minor = matched.field.clone();
        }

        let note = conditions
            .iter()
            .filter(|c| !c.is_synthetic())
            .map(|c| c.original.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        TestCase::new(&category, content, note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::ConditionExtractor;
    use tempfile::TempDir;

    fn condition(field: &str, value: &str) -> Condition {
        Condition {
            field: field.into(),
            value: value.into(),
            original: format!("{field}={value}"),
        }
    }

    #[test]
    fn grade_rare_renders_table_text() {
        let table = RuleTable::builtin();
        let sentence = "GRADE=RARE 아이템 장착 시 색상이 표시된다";
        let conditions = ConditionExtractor::default().filter_and_extract(sentence);
        let tc = RuleTransformer::new(&table).transform(&conditions, sentence, &Category::default());
        assert_eq!(tc.content, "아이템 색상이 파란색으로 표시되는지 확인");
        assert_eq!(tc.minor, "GRADE");
        assert_eq!(tc.note, "GRADE=RARE");
        assert_eq!(tc.major, "시스템");
    }

    #[test]
    fn sentence_ending_in_a_condition_renders_table_text() {
        let table = RuleTable::builtin();
        let transformer = RuleTransformer::new(&table);
        let extractor = ConditionExtractor::default();

        let sentence = "아이템 등급은 GRADE=RARE.";
        let tc = transformer.transform(&extractor.filter_and_extract(sentence), sentence, &Category::default());
        assert_eq!(tc.content, "아이템 색상이 파란색으로 표시되는지 확인");
        assert_eq!(tc.note, "GRADE=RARE");

        let sentence = "퀘스트 자동 진행은 ENABLED=false.";
        let conditions = extractor.filter_and_extract(sentence);
        let tc = transformer.transform(&conditions, sentence, &Category::default());
        assert_eq!(tc.content, "기능이 비활성화되어 버튼이 비활성 상태로 표시되는지 확인");
        assert_eq!(tc.minor, "ENABLED");
    }

    #[test]
    fn default_template_substitutes_value() {
        let table = RuleTable::builtin();
        assert_eq!(
            table.render("GRADE", "MYTHIC").as_deref(),
            Some("MYTHIC 등급 아이템의 색상이 등급에 맞게 표시되는지 확인")
        );
        assert_eq!(table.render("ENABLED", "MAYBE"), None);
        assert_eq!(table.render("UNKNOWN", "X"), None);
    }

    #[test]
    fn unknown_field_gets_generic_sentence() {
        let table = RuleTable::default();
        let transformer = RuleTransformer::new(&table);
        let tc = transformer.transform(
            &[condition("SPEED", "FAST")],
            "SPEED=FAST",
            &Category::default(),
        );
        assert_eq!(tc.content, "SPEED is FAST: verify behavior");
        assert_eq!(tc.minor, "세부 기능");
    }

    #[test]
    fn no_candidates_falls_back() {
        let table = RuleTable::default();
        let tc = RuleTransformer::new(&table).transform(&[], "아무 내용", &Category::default());
        assert_eq!(tc.content, FALLBACK_CONTENT);
        assert!(tc.note.is_empty());
    }

    #[test]
    fn longest_candidate_wins() {
        let table = RuleTable::builtin();
        let transformer = RuleTransformer::new(&table);
        // The exception rule is longer than the VISIBLE template.
        let sentence = "VISIBLE=TRUE 이고 레벨 부족 시";
        let tc = transformer.transform(
            &[condition("VISIBLE", "TRUE")],
            sentence,
            &Category::default(),
        );
        assert_eq!(
            tc.content,
            "조건 부족 시 동작이 제한되고 안내 메시지가 표시되는지 확인"
        );
        assert_eq!(tc.minor, "VISIBLE");
    }

    #[test]
    fn each_keyword_table_contributes_at_most_once() {
        let table = RuleTable::builtin();
        let candidates = RuleTransformer::new(&table).candidates(&[], "팝업 버튼 아이콘 오류 제한");
        assert_eq!(candidates.len(), 2);
        assert!(candidates[0].starts_with("팝업"));
        assert!(candidates[1].starts_with("실패"));
    }

    #[test]
    fn specificity_ties_keep_first() {
        let candidates = vec!["abcd".to_string(), "wxyz".to_string(), "ab".to_string()];
        assert_eq!(pick_most_specific(&candidates), Some("abcd"));
        assert_eq!(pick_most_specific(&[]), None);
    }

    #[test]
    fn minor_comes_from_first_known_field() {
        let table = RuleTable::builtin();
        let tc = RuleTransformer::new(&table).transform(
            &[condition("SPEED", "FAST"), condition("CLASS", "MAGE"), condition("GRADE", "RARE")],
            "",
            &Category::default(),
        );
        assert_eq!(tc.minor, "CLASS");
        assert_eq!(tc.note, "SPEED=FAST, CLASS=MAGE, GRADE=RARE");
    }

    #[test]
    fn general_feature_uses_check_text() {
        let table = RuleTable::default();
        let sentence = "- 장착 버튼을 누르면 장비가 교체된다";
        let conditions = ConditionExtractor::default().filter_and_extract(sentence);
        let tc = RuleTransformer::new(&table).transform(&conditions, sentence, &Category::default());
        assert_eq!(tc.content, "장착 버튼을 누르면 장비가 교체된다에 대한 기능 동작 확인");
        assert!(tc.note.is_empty());
    }

    #[test]
    fn check_text_forms() {
        assert_eq!(check_text("스킬 사용 가능 여부"), "스킬 사용 가능 여부 정상 작동 확인");
        assert_eq!(check_text("* 장착 상태 확인"), "장착 상태 확인");
        assert_eq!(check_text("장착이 되는가?"), "장착이 되는가?");
        assert_eq!(check_text("보상 지급"), "보상 지급에 대한 기능 동작 확인");
    }

    #[test]
    fn rule_file_replaces_builtin() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("rules.toml");
        std::fs::write(
            &path,
            r#"
[fields.MODE]
HARD = "어려움 모드에서 몬스터 체력이 두 배로 적용되는지 확인"
DEFAULT = "{value} 모드가 정상 적용되는지 확인"

[[ui_rules]]
keywords = ["창"]
description = "창이 열리는지 확인"
"#,
        )
        .unwrap();
        let table = RuleTable::load(&path).unwrap();
        assert!(table.knows("MODE"));
        assert!(!table.knows("GRADE"));
        assert_eq!(table.render("MODE", "EASY").as_deref(), Some("EASY 모드가 정상 적용되는지 확인"));
        assert_eq!(table.ui_rules.len(), 1);
        assert!(table.exception_rules.is_empty());
    }

    #[test]
    fn rule_file_rejects_empty_template() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("rules.toml");
        std::fs::write(&path, "[fields.MODE]\nHARD = \"  \"\n").unwrap();
        assert!(RuleTable::load(&path).is_err());
    }
}
