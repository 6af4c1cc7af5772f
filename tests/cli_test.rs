//! End-to-end tests for command dispatch against files in a temp project dir

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use clap::Parser;
use tempfile::TempDir;

use assetree::cli::commands::run_command;
use assetree::cli::{Cli, CliResult};
use assetree::config::Settings;
use assetree::domain::{
    BreakdownRecord, Forest, Month, PreventiveStatus, PreventiveTask, WorkOrder,
};
use assetree::exitcode;
use assetree::infrastructure::di::ServiceContainer;
use assetree::infrastructure::traits::{Confirmer, RealCommandRunner, RealFileSystem};

const FOREST: &str = r#"[
  {
    "id": "INJ-01",
    "name": "Injector 01",
    "kind": "machine",
    "sector": "injection",
    "status": "running",
    "children": [
      {"id": "INJ-01-HYD", "name": "Hydraulic unit", "kind": "subassembly",
       "sector": "injection", "status": "running"}
    ]
  },
  {"id": "DEC-01", "name": "Pad printer", "kind": "machine", "sector": "decoration",
   "status": "alert"}
]
"#;

const BREAKDOWNS: &str = r#"[
  {"code": "BD-1", "sector": "injection", "machine": "Injector 01", "reason": "Mechanical",
   "startedAt": "01/12/2025 08:00", "endedAt": "01/12/2025 09:30", "durationMin": 90,
   "requestedService": "Belt broke"}
]
"#;

const LIFESPAN: &str = r#"[
  {"id": "LS-01", "machine": "Injector 01", "component": "Screw", "sector": "injection",
   "installDate": "01/01/2025", "maxLife": 1000, "current": 100,
   "lastReadingDate": "01/06/2025", "unit": "hours"}
]
"#;

const SCHEDULE: &str = r#"[
  {"id": "PV-001", "machine": "Injector 01", "component": "Oil filter",
   "task": "Replace element", "frequency": "semiannual", "sector": "injection",
   "schedule": {"Jan": "done"}, "responsible": "Mechanics"}
]
"#;

/// Always answers the same and counts how often it was asked.
struct CountingConfirmer {
    answer: bool,
    asked: AtomicUsize,
}

impl CountingConfirmer {
    fn new(answer: bool) -> Arc<Self> {
        Arc::new(Self {
            answer,
            asked: AtomicUsize::new(0),
        })
    }

    fn asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

impl Confirmer for CountingConfirmer {
    fn confirm(&self, _question: &str) -> io::Result<bool> {
        self.asked.fetch_add(1, Ordering::SeqCst);
        Ok(self.answer)
    }
}

struct Project {
    dir: TempDir,
    confirmer: Arc<CountingConfirmer>,
}

impl Project {
    fn new() -> Self {
        Self::answering(true)
    }

    fn answering(answer: bool) -> Self {
        Self {
            dir: TempDir::new().unwrap(),
            confirmer: CountingConfirmer::new(answer),
        }
    }

    fn file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn run(&self, args: &[&str]) -> CliResult<()> {
        let cli = Cli::try_parse_from(std::iter::once("assetree").chain(args.iter().copied()))
            .unwrap();
        let settings = Settings::load(Some(self.dir.path())).unwrap();
        let container = ServiceContainer::with_deps(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(RealCommandRunner),
            self.confirmer.clone(),
        );
        run_command(cli.command.as_ref().unwrap(), &container, self.dir.path())
    }
}

fn arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn read_forest(path: &Path) -> Forest {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

// ============================================================
// emit: stdout vs --in-place
// ============================================================

#[test]
fn given_no_in_place_when_adding_node_then_file_untouched() {
    let project = Project::new();
    let forest = project.file("forest.json", FOREST);

    project
        .run(&["tree", "add", arg(&forest), "--parent", "INJ-01", "--name", "Pump"])
        .unwrap();

    assert_eq!(fs::read_to_string(&forest).unwrap(), FOREST);
}

#[test]
fn given_in_place_when_adding_node_then_file_rewritten() {
    let project = Project::new();
    let forest = project.file("forest.json", FOREST);

    project
        .run(&[
            "tree", "add", arg(&forest), "--parent", "INJ-01", "--name", "Pump", "--id",
            "INJ-01-PUMP", "-i",
        ])
        .unwrap();

    let saved = read_forest(&forest);
    let pump = saved.find("INJ-01-PUMP").expect("pump saved");
    assert_eq!(pump.name, "Pump");
    assert_eq!(saved.node_count(), 4);
}

#[test]
fn given_missing_forest_file_when_showing_then_noinput() {
    let project = Project::new();
    let missing = project.path("missing.json");

    let err = project.run(&["tree", "show", arg(&missing)]).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::NOINPUT);
}

// ============================================================
// tree check / delete
// ============================================================

#[test]
fn given_duplicate_ids_when_checking_then_dataerr() {
    let project = Project::new();
    let duplicated = FOREST.replace("DEC-01", "INJ-01-HYD");
    let forest = project.file("forest.json", &duplicated);

    let err = project.run(&["tree", "check", arg(&forest)]).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::DATAERR);
    assert!(err.to_string().contains("INJ-01-HYD"));
}

#[test]
fn given_unique_ids_when_checking_then_ok() {
    let project = Project::new();
    let forest = project.file("forest.json", FOREST);

    assert!(project.run(&["tree", "check", arg(&forest)]).is_ok());
}

#[test]
fn given_declined_confirmation_when_deleting_then_file_untouched() {
    let project = Project::answering(false);
    let forest = project.file("forest.json", FOREST);

    project
        .run(&["tree", "delete", arg(&forest), "INJ-01", "-i"])
        .unwrap();

    assert_eq!(project.confirmer.asked(), 1);
    assert_eq!(fs::read_to_string(&forest).unwrap(), FOREST);
}

#[test]
fn given_accepted_confirmation_when_deleting_then_subtree_removed() {
    let project = Project::answering(true);
    let forest = project.file("forest.json", FOREST);

    project
        .run(&["tree", "delete", arg(&forest), "INJ-01", "-i"])
        .unwrap();

    assert_eq!(project.confirmer.asked(), 1);
    let saved = read_forest(&forest);
    assert_eq!(saved.node_count(), 1);
    assert!(saved.find("INJ-01-HYD").is_none());
}

#[test]
fn given_yes_flag_when_deleting_then_not_asked() {
    let project = Project::answering(false);
    let forest = project.file("forest.json", FOREST);

    project
        .run(&["tree", "delete", arg(&forest), "DEC-01", "--yes", "-i"])
        .unwrap();

    assert_eq!(project.confirmer.asked(), 0);
    assert!(read_forest(&forest).find("DEC-01").is_none());
}

// ============================================================
// breakdown
// ============================================================

#[test]
fn given_unknown_code_when_deleting_breakdown_then_ok_and_records_kept() {
    let project = Project::new();
    let file = project.file("breakdowns.json", BREAKDOWNS);
    let before: Vec<BreakdownRecord> = serde_json::from_str(BREAKDOWNS).unwrap();

    project
        .run(&["breakdown", "delete", arg(&file), "BD-9", "-i"])
        .unwrap();

    let after: Vec<BreakdownRecord> =
        serde_json::from_str(&fs::read_to_string(&file).unwrap()).unwrap();
    assert_eq!(after, before);
}

#[test]
fn given_all_fields_when_adding_breakdown_then_prepended() {
    let project = Project::new();
    let file = project.file("breakdowns.json", BREAKDOWNS);

    project
        .run(&[
            "breakdown", "add", arg(&file), "BD-2", "--sector", "printing", "--machine",
            "Printer 03", "--reason", "Electrical", "--started-at", "02/12/2025 10:00",
            "--ended-at", "02/12/2025 10:40", "--duration-min", "40", "--requested-service",
            "PLC error", "-i",
        ])
        .unwrap();

    let after: Vec<BreakdownRecord> =
        serde_json::from_str(&fs::read_to_string(&file).unwrap()).unwrap();
    assert_eq!(after.len(), 2);
    assert_eq!(after[0].code, "BD-2");
    assert_eq!(after[0].duration_min, 40);
}

#[test]
fn given_missing_required_field_when_adding_breakdown_then_usage_error() {
    let project = Project::new();
    let file = project.file("breakdowns.json", BREAKDOWNS);

    let err = project
        .run(&["breakdown", "add", arg(&file), "BD-2", "--machine", "Printer 03", "-i"])
        .unwrap_err();

    assert_eq!(err.exit_code(), exitcode::USAGE);
    assert_eq!(fs::read_to_string(&file).unwrap(), BREAKDOWNS);
}

#[test]
fn given_field_option_when_editing_breakdown_then_saved() {
    let project = Project::new();
    let file = project.file("breakdowns.json", BREAKDOWNS);

    project
        .run(&["breakdown", "edit", arg(&file), "BD-1", "--technician", "J. Silva", "-i"])
        .unwrap();

    let after: Vec<BreakdownRecord> =
        serde_json::from_str(&fs::read_to_string(&file).unwrap()).unwrap();
    assert_eq!(after[0].technician, "J. Silva");
}

// ============================================================
// lifespan / order / schedule
// ============================================================

#[test]
fn given_nan_reading_when_recording_in_place_then_dataerr_and_file_untouched() {
    let project = Project::new();
    let file = project.file("lifespan.json", LIFESPAN);

    let err = project
        .run(&["lifespan", "record", arg(&file), "LS-01", "NaN", "-i"])
        .unwrap_err();

    assert_eq!(err.exit_code(), exitcode::DATAERR);
    assert_eq!(fs::read_to_string(&file).unwrap(), LIFESPAN);
}

#[test]
fn given_tree_node_when_creating_order_then_request_saved() {
    let project = Project::new();
    let forest = project.file("forest.json", FOREST);
    let orders = project.file("orders.json", "[]");

    project
        .run(&[
            "order", "create", arg(&orders), "--tree", arg(&forest), "--node", "DEC-01",
            "--title", "Head misaligned", "-i",
        ])
        .unwrap();

    let saved: Vec<WorkOrder> =
        serde_json::from_str(&fs::read_to_string(&orders).unwrap()).unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].machine_name, "Pad printer");
    assert_eq!(saved[0].title, "Head misaligned");
}

#[test]
fn given_unknown_node_when_creating_order_then_dataerr() {
    let project = Project::new();
    let forest = project.file("forest.json", FOREST);
    let orders = project.file("orders.json", "[]");

    let err = project
        .run(&["order", "create", arg(&orders), "--tree", arg(&forest), "--node", "NOPE"])
        .unwrap_err();

    assert_eq!(err.exit_code(), exitcode::DATAERR);
}

#[test]
fn given_month_when_cycling_schedule_in_place_then_saved() {
    let project = Project::new();
    let file = project.file("schedule.json", SCHEDULE);

    project
        .run(&["schedule", "cycle", arg(&file), "PV-001", "jan", "-i"])
        .unwrap();

    let saved: Vec<PreventiveTask> =
        serde_json::from_str(&fs::read_to_string(&file).unwrap()).unwrap();
    assert_eq!(saved[0].status_in(Month::Jan), PreventiveStatus::Late);
}
