//! Tests for lean color classification and plan tasks

use std::sync::Arc;

use rstest::rstest;

use assetree::application::services::PlanService;
use assetree::config::{Settings, StandardsConfig};
use assetree::domain::{classify, lean_color, LeanColor, Level};

use Level::{High, Low, Medium};

#[rstest]
// Criticality high
#[case(High, Low, High, LeanColor::Red)]
#[case(High, High, Medium, LeanColor::Red)]
#[case(High, High, Low, LeanColor::Yellow)]
#[case(High, Low, Low, LeanColor::Yellow)]
// Criticality medium
#[case(Medium, Low, High, LeanColor::Yellow)]
#[case(Medium, High, Low, LeanColor::Yellow)]
#[case(Medium, Medium, Medium, LeanColor::Green)]
#[case(Medium, Low, Low, LeanColor::Green)]
// Criticality low
#[case(Low, Low, High, LeanColor::Yellow)]
#[case(Low, High, Medium, LeanColor::Green)]
#[case(Low, High, Low, LeanColor::Green)]
fn given_levels_when_classifying_then_returns_lean_color(
    #[case] criticality: Level,
    #[case] frequency: Level,
    #[case] complexity: Level,
    #[case] expected: LeanColor,
) {
    assert_eq!(lean_color(criticality, frequency, complexity), expected);
}

#[test]
fn given_red_task_when_classifying_then_only_standard_required() {
    let result = classify(High, Medium, High);

    assert_eq!(result.color, LeanColor::Red);
    assert!(result.standard_required);
    assert!(!result.checklist_required);
}

#[test]
fn given_yellow_task_when_classifying_then_only_checklist_required() {
    let result = classify(Medium, High, Low);

    assert!(!result.standard_required);
    assert!(result.checklist_required);
}

#[rstest]
#[case("alta", High)]
#[case("Média", Medium)]
#[case("LOW", Low)]
#[case("m", Medium)]
fn given_label_when_parsing_level_then_accepts_legacy_and_short_forms(
    #[case] input: &str,
    #[case] expected: Level,
) {
    assert_eq!(input.parse::<Level>().unwrap(), expected);
}

#[test]
fn given_unknown_label_when_parsing_level_then_errors() {
    assert!("extreme".parse::<Level>().is_err());
}

// ============================================================
// PlanService
// ============================================================

fn plan_service(area: &str, service: &str) -> PlanService {
    let settings = Settings {
        standards: StandardsConfig {
            area_code: area.to_string(),
            service_code: service.to_string(),
        },
        ..Settings::default()
    };
    PlanService::new(Arc::new(settings))
}

#[test]
fn given_standards_config_when_generating_code_then_uses_area_and_service() {
    let service = plan_service("PCM", "E");

    let code = service.standard_code();

    assert_eq!(code.area, "PCM");
    assert_eq!(code.service, "E");
    assert!((1000..=9999).contains(&code.sequence));
    assert!(code.to_string().starts_with("PCM-E-"));
    assert_eq!(code.to_string().len(), "PCM-E-".len() + 4);
}

#[test]
fn given_red_combination_when_building_task_then_attaches_standard_code() {
    let service = plan_service("GMAN", "M");

    let task = service
        .build_task(3, "Replace hydraulic seals", High, Low, High)
        .unwrap();

    assert_eq!(task.id, "TASK-0003");
    assert_eq!(task.lean_color, LeanColor::Red);
    let code = task.standard_code.expect("red task needs a standard");
    assert!(code.starts_with("GMAN-M-"));
    assert!(!task.checklist_required);
}

#[test]
fn given_green_combination_when_building_task_then_no_standard_and_no_checklist() {
    let service = plan_service("GMAN", "M");

    let task = service.build_task(1, "Visual inspection", Low, Low, Low).unwrap();

    assert_eq!(task.lean_color, LeanColor::Green);
    assert_eq!(task.standard_code, None);
    assert!(!task.checklist_required);
}

#[test]
fn given_blank_description_when_building_task_then_errors() {
    let service = plan_service("GMAN", "M");

    assert!(service.build_task(1, "  ", Low, Low, Low).is_err());
}
