//! Hand-authored test-case sets for well-known feature areas.

use crate::category::BASIC_MINOR;
use crate::models::{Category, TestCase};

pub const SKILL_SYSTEM: &str = "스킬 시스템";

/// One templated case: minor category, check text, note.
pub type Template = (&'static str, &'static str, &'static str);

pub const EQUIPMENT: &[Template] = &[
    (
        "장착 기능",
        "인벤토리에서 장비 슬롯으로 아이템을 드래그 앤 드롭하여 정상적으로 장착되는지 확인",
        "모든 장비 슬롯 유형 검증 (무기, 방어구, 장신구)",
    ),
    (
        "장착 기능",
        "장비 아이콘 더블 클릭으로 해당 슬롯에 자동 장착되는지 확인",
        "모바일에서는 탭 동작 확인",
    ),
    (
        "장착 해제",
        "장착된 장비 슬롯을 클릭하여 아이템이 정상적으로 해제되는지 확인",
        "해제된 아이템이 인벤토리로 이동됨",
    ),
    (
        "캐릭터 외형",
        "무기 장착 시 캐릭터 모델에 해당 무기가 올바르게 표시되는지 확인",
        "무기 위치, 크기, 각도 검증",
    ),
    (
        "캐릭터 외형",
        "방어구 장착 시 캐릭터 외형이 해당 방어구 모델로 변경되는지 확인",
        "여러 부위 동시 장착 시 모든 부위 검증",
    ),
    (
        "UI 피드백",
        "장착 가능 아이템이 인벤토리에서 녹색 테두리로 표시되는지 확인",
        "요구 레벨, 클래스 조건 충족 시",
    ),
    (
        "능력치 증가",
        "공격력 증가 효과가 있는 아이템 장착 시 캐릭터 정보창에 공격력이 정확히 증가하는지 확인",
        "기본 공격력 + 아이템 효과 = 최종 공격력",
    ),
    (
        "능력치 증가",
        "방어력 증가 효과가 있는 아이템 장착 시 캐릭터 정보창에 방어력이 정확히 증가하는지 확인",
        "기본 방어력 + 아이템 효과 = 최종 방어력",
    ),
    (
        "스킬 강화",
        "특정 스킬 데미지 증가 효과가 있는 아이템 장착 시 해당 스킬의 데미지가 증가하는지 확인",
        "스킬 툴팁 및 실제 데미지 모두 확인",
    ),
    (
        "스킬 강화",
        "스킬 쿨타임 감소 효과가 있는 아이템 장착 시 해당 스킬의 재사용 대기시간이 감소하는지 확인",
        "스킬 툴팁 및 실제 쿨타임 모두 확인",
    ),
    (
        "세트 효과",
        "동일 세트의 아이템 2개 장착 시 2세트 효과가 캐릭터에 적용되는지 확인",
        "세트 효과 툴팁 및 실제 능력치 증가 확인",
    ),
    (
        "레벨 제한",
        "캐릭터 레벨이 아이템 요구 레벨보다 낮을 때 장착이 제한되고 적절한 안내 메시지가 표시되는지 확인",
        "정확한 요구 레벨 표시 확인",
    ),
    (
        "클래스 제한",
        "다른 클래스 전용 아이템 장착 시도 시 제한되고 적절한 안내 메시지가 표시되는지 확인",
        "요구 클래스 정보 표시 확인",
    ),
];

const SKILL_USE: &[Template] = &[
    (
        "기본 사용",
        "스킬 버튼 클릭 시 스킬이 정상적으로 발동되는지 확인",
        "공격, 방어, 버프 등 다양한 스킬 유형 검증",
    ),
    ("단축키", "스킬 단축키로 스킬이 정상적으로 발동되는지 확인", "PC 전용 기능"),
    (
        "쿨타임 표시",
        "스킬 사용 후 쿨타임이 UI에 정확하게 표시되는지 확인",
        "숫자 카운트다운 및 시각적 표시 확인",
    ),
    (
        "쿨타임 중 사용",
        "쿨타임 중인 스킬 사용 시도 시 적절한 안내 메시지가 표시되는지 확인",
        "버튼 비활성화 상태 확인",
    ),
    (
        "공격 데미지",
        "공격 스킬 사용 시 공식에 따라 정확한 데미지가 적용되는지 확인",
        "캐릭터 스탯, 아이템 효과 반영 확인",
    ),
    (
        "버프 효과",
        "버프 스킬 사용 시 효과가 캐릭터에 정확히 적용되고 지속시간이 표시되는지 확인",
        "버프 아이콘 및 지속시간 UI 확인",
    ),
    (
        "마나 소모",
        "스킬 사용 시 설정된 마나가 정확히 소모되는지 확인",
        "마나 부족 시 사용 제한 확인",
    ),
    (
        "리소스 부족",
        "필요 리소스(마나, 체력 등) 부족 시 스킬 사용이 제한되고 안내 메시지가 표시되는지 확인",
        "시스템별 리소스 유형에 맞게 확인",
    ),
];

const SKILL_ENHANCE: &[Template] = &[
    (
        "레벨업",
        "스킬 강화 버튼 클릭 시 스킬 레벨이 증가하고 능력치가 향상되는지 확인",
        "스킬 레벨별 능력치 증가율 확인",
    ),
    (
        "리소스 소모",
        "스킬 강화 시 필요한 포인트/재화가 정확히 소모되는지 확인",
        "강화 비용 증가율 확인",
    ),
    (
        "강화 효과 표시",
        "스킬 강화 전후 효과 비교가 UI에 정확히 표시되는지 확인",
        "변경되는 수치 하이라이트 확인",
    ),
    (
        "강화 성공 알림",
        "스킬 강화 성공 시 적절한 이펙트와 알림이 표시되는지 확인",
        "사운드 및 시각적 피드백 확인",
    ),
    (
        "최대 레벨",
        "스킬이 최대 레벨에 도달했을 때 더 이상 강화되지 않고 안내 메시지가 표시되는지 확인",
        "최대 레벨 UI 표시 확인",
    ),
    (
        "선행 조건",
        "선행 스킬 레벨 조건이 있는 경우, 조건 미달 시 강화가 제한되는지 확인",
        "필요 조건 안내 확인",
    ),
];

const SET_EFFECT: &[Template] = &[
    (
        "2세트 효과",
        "동일 세트 아이템 2개 장착 시 2세트 효과가 활성화되는지 확인",
        "세트 효과 및 스탯 증가 확인",
    ),
    (
        "4세트 효과",
        "동일 세트 아이템 4개 장착 시 2세트 및 4세트 효과가 함께 활성화되는지 확인",
        "누적 효과 확인",
    ),
    (
        "완성 세트",
        "세트 아이템을 모두 장착하여 완성 시 모든 단계 세트 효과와 특수 이펙트가 적용되는지 확인",
        "캐릭터 외형 변화 확인",
    ),
    (
        "세트 정보",
        "세트 아이템 정보창에 현재 장착 중인 세트 아이템 개수와 효과가 정확히 표시되는지 확인",
        "활성/비활성 효과 구분 확인",
    ),
    (
        "아이템 표시",
        "인벤토리에서 세트 아이템이 특별한 표시(아이콘, 색상 등)로 구분되는지 확인",
        "세트명 및 소속 세트 표시 확인",
    ),
    (
        "스킬 강화",
        "세트 효과로 인한 스킬 강화(데미지, 쿨타임 등)가 정확히 적용되는지 확인",
        "스킬 정보창에 세트 효과 반영 확인",
    ),
    (
        "특수 스킬",
        "세트 완성 시 해금되는 특수 스킬이 스킬창에 추가되고 사용 가능한지 확인",
        "세트 미완성 시 스킬 잠금 상태 확인",
    ),
];

/// Template set for a (major, medium) pair, matched case-insensitively.
pub fn template_set(major: &str, medium: &str) -> Option<&'static [Template]> {
    if major.to_lowercase() != SKILL_SYSTEM {
        return None;
    }
    match medium.to_lowercase().as_str() {
        "아이템 장착" | "장비 장착" | "장비" => Some(EQUIPMENT),
        "스킬 사용" | "스킬" => Some(SKILL_USE),
        "스킬 강화" | "레벨업" => Some(SKILL_ENHANCE),
        "세트 효과" | "세트" => Some(SET_EFFECT),
        _ => None,
    }
}

/// Instantiate `templates` under `major` / `medium`.
pub fn instantiate(templates: &[Template], major: &str, medium: &str) -> Vec<TestCase> {
    templates
        .iter()
        .map(|(minor, content, note)| TestCase::new(&Category::new(major, medium, *minor), *content, *note))
        .collect()
}

/// Test cases for a user-chosen category pair.
///
/// Unknown pairs get a single generic case. `description`, when given, is
/// appended to every note.
pub fn custom_testcases(major: &str, medium: &str, description: Option<&str>) -> Vec<TestCase> {
    let mut testcases = match template_set(major, medium) {
        Some(templates) => {
            tracing::info!(major, medium, count = templates.len(), "using template set");
            instantiate(templates, major, medium)
        }
        None => {
            tracing::warn!(major, medium, "no template set; emitting a generic case");
            vec![TestCase::new(
                &Category::new(major, medium, BASIC_MINOR),
                format!("{medium} 기능이 정상적으로 동작하는지 확인"),
                "기본 테스트케이스",
            )]
        }
    };

    if let Some(description) = description.filter(|d| !d.is_empty()) {
        for tc in &mut testcases {
            if tc.note.is_empty() {
                tc.note = description.to_string();
            } else {
                tc.note = format!("{} | {}", tc.note, description);
            }
        }
    }
    testcases
}
