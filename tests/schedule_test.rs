//! Tests for the preventive schedule and ScheduleService

use std::collections::BTreeMap;
use std::sync::Arc;

use rstest::{fixture, rstest};
use tempfile::TempDir;

use assetree::application::services::ScheduleService;
use assetree::domain::{Frequency, Month, PreventiveStatus, PreventiveTask, Sector};
use assetree::infrastructure::traits::RealFileSystem;

#[fixture]
fn service() -> ScheduleService {
    ScheduleService::new(Arc::new(RealFileSystem))
}

fn task(id: &str, machine: &str, sector: Sector) -> PreventiveTask {
    PreventiveTask {
        id: id.to_string(),
        machine: machine.to_string(),
        component: "Hydraulic oil filter".to_string(),
        task: "Replace filter element".to_string(),
        frequency: Frequency::Semiannual,
        sector,
        schedule: BTreeMap::from([(Month::Jan, PreventiveStatus::Done)]),
        responsible: "Mechanics".to_string(),
    }
}

#[rstest]
#[case(PreventiveStatus::NotApplicable, PreventiveStatus::Programmed)]
#[case(PreventiveStatus::Programmed, PreventiveStatus::Done)]
#[case(PreventiveStatus::Done, PreventiveStatus::Late)]
#[case(PreventiveStatus::Late, PreventiveStatus::Rescheduled)]
#[case(PreventiveStatus::Rescheduled, PreventiveStatus::NotApplicable)]
fn given_status_when_cycling_then_steps_in_order(
    #[case] current: PreventiveStatus,
    #[case] expected: PreventiveStatus,
) {
    assert_eq!(current.next(), expected);
}

#[rstest]
#[case("Jan", Month::Jan)]
#[case("fev", Month::Feb)]
#[case("September", Month::Sep)]
#[case("Dez", Month::Dec)]
#[case("4", Month::Apr)]
fn given_month_text_when_parsing_then_accepts_names_and_numbers(
    #[case] input: &str,
    #[case] expected: Month,
) {
    assert_eq!(input.parse::<Month>().unwrap(), expected);
}

#[rstest]
#[case("0")]
#[case("13")]
#[case("xyz")]
fn given_bad_month_when_parsing_then_errors(#[case] input: &str) {
    assert!(input.parse::<Month>().is_err());
}

#[rstest]
fn given_task_when_setting_month_then_only_that_cell_changes(service: ScheduleService) {
    let tasks = vec![
        task("PV-001", "Injector 01", Sector::Injection),
        task("PV-002", "Printer 03", Sector::Printing),
    ];

    let updated = service
        .set_status(&tasks, "PV-001", Month::Jun, PreventiveStatus::Late)
        .unwrap();

    assert_eq!(updated[0].status_in(Month::Jun), PreventiveStatus::Late);
    assert_eq!(updated[0].status_in(Month::Jan), PreventiveStatus::Done);
    assert_eq!(updated[1], tasks[1]);
    assert_eq!(tasks[0].status_in(Month::Jun), PreventiveStatus::NotApplicable);
}

#[rstest]
fn given_unknown_task_when_setting_then_errors(service: ScheduleService) {
    let tasks = vec![task("PV-001", "Injector 01", Sector::Injection)];

    assert!(service
        .set_status(&tasks, "PV-999", Month::Jun, PreventiveStatus::Done)
        .is_err());
    assert!(service.cycle_status(&tasks, "PV-999", Month::Jun).is_err());
}

#[rstest]
fn given_done_month_when_cycling_then_becomes_late(service: ScheduleService) {
    let tasks = vec![task("PV-001", "Injector 01", Sector::Injection)];

    let (updated, status) = service.cycle_status(&tasks, "PV-001", Month::Jan).unwrap();

    assert_eq!(status, PreventiveStatus::Late);
    assert_eq!(updated[0].status_in(Month::Jan), PreventiveStatus::Late);
    assert_eq!(updated[0].count(PreventiveStatus::Late), 1);
}

#[rstest]
fn given_sector_and_term_when_viewing_then_filters_both(service: ScheduleService) {
    let tasks = vec![
        task("PV-001", "Injector 01", Sector::Injection),
        task("PV-002", "Injector 02", Sector::Injection),
        task("PV-003", "Printer 03", Sector::Printing),
    ];
    let ids = |list: Vec<PreventiveTask>| list.into_iter().map(|t| t.id).collect::<Vec<_>>();

    assert_eq!(ids(service.view(&tasks, None, None)).len(), 3);
    assert_eq!(
        ids(service.view(&tasks, Some(Sector::Injection), Some("02"))),
        vec!["PV-002"]
    );
    assert_eq!(ids(service.view(&tasks, None, Some("FILTER"))).len(), 3);
    assert!(service.view(&tasks, Some(Sector::Printing), Some("injector")).is_empty());
}

#[rstest]
fn given_legacy_export_when_loading_then_maps_months_and_statuses(service: ScheduleService) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("schedule.json");
    std::fs::write(
        &path,
        r#"[{
            "id": "PV-001",
            "machine": "Injetora Engel 01",
            "component": "Filtro de Óleo Hidráulico",
            "task": "Substituição do Elemento Filtrante",
            "frequency": "Semestral",
            "sector": "Injeção",
            "responsible": "Mecânica",
            "schedule": {
                "Jan": "Realizado", "Fev": "N/A", "Jun": "Atrasado", "Dez": "Programado"
            }
        }]"#,
    )
    .unwrap();

    let tasks = service.load(&path).unwrap();

    let pv = &tasks[0];
    assert_eq!(pv.frequency, Frequency::Semiannual);
    assert_eq!(pv.status_in(Month::Jan), PreventiveStatus::Done);
    assert_eq!(pv.status_in(Month::Jun), PreventiveStatus::Late);
    assert_eq!(pv.status_in(Month::Dec), PreventiveStatus::Programmed);
    assert_eq!(pv.status_in(Month::Mar), PreventiveStatus::NotApplicable);

    service.save(&path, &tasks).unwrap();
    assert_eq!(service.load(&path).unwrap(), tasks);
}
