//! Three-level category resolution.
//!
//! Categories come from three places, applied in this order for every
//! sentence:
//!
//! 1. the document structure (`label: ...` heading lines), which seeds and
//!    switches the running [`CategoryContext`];
//! 2. phrases inside the sentence itself ([`sentence_categories`]), which
//!    update the running context;
//! 3. ordered keyword rules ([`CategoryResolver`]), which override the
//!    major/medium of a single test case without touching the context.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::Category;

pub const DEFAULT_MAJOR: &str = "시스템";
pub const DEFAULT_MEDIUM: &str = "기능";
pub const DEFAULT_MINOR: &str = "세부 기능";
pub const BASIC_MINOR: &str = "기본 기능";

/// Words that mark a short sentence as a section label.
const SECTION_MARKERS: &[&str] = &["시스템", "기능", "모듈", "설정"];

static SYSTEM_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[가-힣A-Za-z]+\s*(?:시스템|기능|모듈)").expect("system phrase pattern is valid")
});

/// One `(keywords, label)` pair. Matches when the text contains any keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRule {
    pub keywords: Vec<String>,
    pub label: String,
}

impl KeywordRule {
    pub fn new(keywords: &[&str], label: &str) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            label: label.to_string(),
        }
    }

    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }
}

/// Ordered first-match-wins keyword rules for the major and medium levels.
#[derive(Debug, Clone)]
pub struct CategoryResolver {
    major_rules: Vec<KeywordRule>,
    medium_rules: Vec<KeywordRule>,
}

impl Default for CategoryResolver {
    fn default() -> Self {
        Self::new(
            vec![
                KeywordRule::new(&["퀘스트", "미션", "quest", "mission"], "퀘스트 시스템"),
                KeywordRule::new(
                    &["상점", "구매", "판매", "결제", "shop", "purchase", "store"],
                    "상점 시스템",
                ),
                KeywordRule::new(&["전투", "몬스터", "보스", "combat", "battle"], "전투 시스템"),
            ],
            vec![
                KeywordRule::new(&["장착", "장비", "equip"], "아이템 장착"),
                KeywordRule::new(&["세트", "set effect"], "세트 효과"),
                KeywordRule::new(&["스킬 강화", "강화", "레벨업"], "스킬 강화"),
                KeywordRule::new(&["해금", "잠금 해제", "unlock"], "스킬 해금"),
                KeywordRule::new(&["스킬", "쿨타임", "skill"], "스킬 사용"),
                KeywordRule::new(&["능력치", "스탯", "공격력", "방어력", "stat"], "능력치"),
            ],
        )
    }
}

impl CategoryResolver {
    pub fn new(major_rules: Vec<KeywordRule>, medium_rules: Vec<KeywordRule>) -> Self {
        Self {
            major_rules,
            medium_rules,
        }
    }

    pub fn resolve_major(&self, context: &str) -> String {
        first_match(&self.major_rules, context).unwrap_or(DEFAULT_MAJOR).to_string()
    }

    pub fn resolve_medium(&self, context: &str) -> String {
        first_match(&self.medium_rules, context).unwrap_or(DEFAULT_MEDIUM).to_string()
    }

    /// Apply keyword hits in `sentence` on top of `category`. Levels with
    /// no hit are left as they are.
    pub fn refine(&self, category: &Category, sentence: &str) -> Category {
        let mut refined = category.clone();
        if let Some(major) = first_match(&self.major_rules, sentence) {
            refined.major = major.to_string();
        }
        if let Some(medium) = first_match(&self.medium_rules, sentence) {
            refined.medium = medium.to_string();
        }
        refined
    }
}

fn first_match<'a>(rules: &'a [KeywordRule], text: &str) -> Option<&'a str> {
    let lowered = text.to_lowercase();
    rules
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map(|rule| rule.label.as_str())
}

/// Recover categories from heading-like lines.
///
/// A line qualifies when it contains `:`, `：` or `.` and the text before the
/// first one is non-empty and shorter than 50 characters. That label is
/// split on `>` / `-` into up to three levels; a single-level label becomes
/// the major when it names a 시스템, otherwise the medium.
pub fn extract_document_structure(text: &str) -> Vec<Category> {
    text.lines()
        .filter_map(|line| {
            let (label, _) = line.split_once([':', '：', '.'])?;
            let label = label.trim();
            if label.is_empty() || label.chars().count() >= 50 {
                return None;
            }
            let levels: Vec<&str> = label.split(['>', '-']).map(str::trim).collect();
            Some(match levels.as_slice() {
                [major, medium, minor, ..] => Category::new(*major, *medium, *minor),
                [major, medium] => Category::new(*major, *medium, BASIC_MINOR),
                _ if label.contains("시스템") => Category::new(label, DEFAULT_MEDIUM, DEFAULT_MINOR),
                _ => Category::new(DEFAULT_MAJOR, label, DEFAULT_MINOR),
            })
        })
        .collect()
}

/// Categories suggested by the sentence itself, falling back to `current`.
///
/// A `<word> 시스템|기능|모듈` phrase suggests the major; a short `label:`
/// prefix suggests the medium, or medium and minor when it is split by
/// `>` / `-`.
pub fn sentence_categories(sentence: &str, current: &Category) -> Category {
    let mut suggested = current.clone();

    if let Some(phrase) = SYSTEM_PHRASE.find(sentence) {
        suggested.major = phrase.as_str().to_string();
    }

    if let Some((label, _)) = sentence.split_once(':') {
        let label = label.trim();
        if label.chars().count() < 30 {
            if label.contains(['>', '-']) {
                let parts: Vec<&str> = label.split(['>', '-']).collect();
                if let [medium, minor, ..] = parts.as_slice() {
                    suggested.medium = medium.trim().to_string();
                    suggested.minor = minor.trim().to_string();
                }
            } else {
                suggested.medium = label.to_string();
            }
        }
    }

    suggested
}

/// Running category state across the sentences of one context blob.
#[derive(Debug, Clone)]
pub struct CategoryContext {
    structure: Vec<Category>,
    current: Category,
}

impl CategoryContext {
    /// Seed from the first heading of `context`, or the defaults.
    pub fn seed(context: &str) -> Self {
        let structure = extract_document_structure(context);
        let current = structure.first().cloned().unwrap_or_default();
        Self { structure, current }
    }

    pub fn current(&self) -> &Category {
        &self.current
    }

    pub fn structure(&self) -> &[Category] {
        &self.structure
    }

    /// Advance over the sentence at `position` in the segmented context and
    /// return the category it belongs to.
    pub fn observe(&mut self, position: usize, sentence: &str) -> Category {
        if position > 0 && sentence.trim().chars().count() < 50 && is_section_label(sentence) {
            // Later headings take precedence over earlier ones.
            if let Some(entry) = self
                .structure
                .iter()
                .rev()
                .find(|entry| mentions_any_level(sentence, entry))
            {
                self.current = entry.clone();
            }
        }

        let suggested = sentence_categories(sentence, &self.current);
        adopt(&mut self.current.major, suggested.major);
        adopt(&mut self.current.medium, suggested.medium);
        adopt(&mut self.current.minor, suggested.minor);
        self.current.clone()
    }
}

fn is_section_label(sentence: &str) -> bool {
    let lowered = sentence.to_lowercase();
    SECTION_MARKERS.iter().any(|m| lowered.contains(m))
}

fn mentions_any_level(sentence: &str, entry: &Category) -> bool {
    [&entry.major, &entry.medium, &entry.minor]
        .iter()
        .any(|label| !label.is_empty() && sentence.contains(label.as_str()))
}

fn adopt(slot: &mut String, candidate: String) {
    if *slot != candidate && candidate.trim().chars().count() > 2 {
        *slot = candidate;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn major_rules_are_ordered() {
        let resolver = CategoryResolver::default();
        assert_eq!(resolver.resolve_major("퀘스트 완료 후 상점이 열린다"), "퀘스트 시스템");
        assert_eq!(resolver.resolve_major("상점에서 몬스터 소환권 구매"), "상점 시스템");
        assert_eq!(resolver.resolve_major("보스 전투 진입"), "전투 시스템");
        assert_eq!(resolver.resolve_major("로그인 화면"), DEFAULT_MAJOR);
    }

    #[test]
    fn medium_rules_are_ordered() {
        let resolver = CategoryResolver::default();
        assert_eq!(resolver.resolve_medium("세트 아이템 장착"), "아이템 장착");
        assert_eq!(resolver.resolve_medium("세트 효과 발동"), "세트 효과");
        assert_eq!(resolver.resolve_medium("스킬 강화 비용"), "스킬 강화");
        assert_eq!(resolver.resolve_medium("스킬 해금 조건"), "스킬 해금");
        assert_eq!(resolver.resolve_medium("스킬 쿨타임 표시"), "스킬 사용");
        assert_eq!(resolver.resolve_medium("공격력 수치"), "능력치");
        assert_eq!(resolver.resolve_medium("로그인 화면"), DEFAULT_MEDIUM);
    }

    #[test]
    fn ascii_keywords_match_case_insensitively() {
        let resolver = CategoryResolver::default();
        assert_eq!(resolver.resolve_major("Daily QUEST reset"), "퀘스트 시스템");
    }

    #[test]
    fn refine_only_overrides_levels_with_hits() {
        let resolver = CategoryResolver::default();
        let base = Category::new("인벤토리 시스템", "정렬", "세부 기능");
        let refined = resolver.refine(&base, "장비 정렬 버튼");
        assert_eq!(refined, Category::new("인벤토리 시스템", "아이템 장착", "세부 기능"));
    }

    #[test]
    fn structure_levels_from_headings() {
        let text = "스킬 시스템 > 아이템 장착 > 슬롯: 개요\n\
                    인벤토리-정렬: 설명\n\
                    전투 시스템: 소개\n\
                    장비 슬롯: 무기와 방어구\n\
                    구분선 없는 줄";
        let structure = extract_document_structure(text);
        assert_eq!(
            structure,
            vec![
                Category::new("스킬 시스템", "아이템 장착", "슬롯"),
                Category::new("인벤토리", "정렬", BASIC_MINOR),
                Category::new("전투 시스템", DEFAULT_MEDIUM, DEFAULT_MINOR),
                Category::new(DEFAULT_MAJOR, "장비 슬롯", DEFAULT_MINOR),
            ]
        );
    }

    #[test]
    fn long_labels_are_not_headings() {
        let label = "가".repeat(50);
        assert!(extract_document_structure(&format!("{label}: 본문")).is_empty());
    }

    #[test]
    fn sentence_phrase_and_label_suggestions() {
        let current = Category::default();
        let suggested = sentence_categories("장비 슬롯: 스킬 시스템에서 관리한다", &current);
        assert_eq!(suggested.major, "스킬 시스템");
        assert_eq!(suggested.medium, "장비 슬롯");
        assert_eq!(suggested.minor, DEFAULT_MINOR);

        let split = sentence_categories("장착 > 무기: 한손검만 가능", &current);
        assert_eq!(split.medium, "장착");
        assert_eq!(split.minor, "무기");
    }

    #[test]
    fn context_seeds_from_first_heading() {
        let context = CategoryContext::seed("스킬 시스템 > 아이템 장착: 개요\n본문");
        assert_eq!(
            context.current(),
            &Category::new("스킬 시스템", "아이템 장착", BASIC_MINOR)
        );
        assert_eq!(CategoryContext::seed("heading 없음").current(), &Category::default());
    }

    #[test]
    fn short_section_sentence_switches_context() {
        let text = "스킬 시스템 > 스킬 사용: 개요\n전투 시스템 > 보스전: 개요";
        let mut context = CategoryContext::seed(text);
        let category = context.observe(3, "보스전 설정 안내");
        assert_eq!(category.major, "전투 시스템");
        assert_eq!(category.medium, "보스전");
    }

    #[test]
    fn first_sentence_never_switches_context() {
        let text = "스킬 시스템 > 스킬 사용: 개요\n전투 시스템 > 보스전: 개요";
        let mut context = CategoryContext::seed(text);
        let category = context.observe(0, "보스전 설정 안내");
        assert_eq!(category.major, "스킬 시스템");
    }

    #[test]
    fn short_overrides_are_not_adopted() {
        let mut context = CategoryContext::seed("");
        let category = context.observe(1, "UI: 버튼 색상이 바뀐다");
        assert_eq!(category.medium, DEFAULT_MEDIUM);
    }
}
