//! Command dispatch: load settings, wire services, run one command.

use std::io;
use std::path::Path;

use clap::CommandFactory;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::application::services::DeleteOutcome;
use crate::application::store::to_pretty_json;
use crate::application::{ApplicationError, ApplicationResult};
use crate::cli::args::{
    BreakdownCommands, BreakdownFields, Cli, Commands, ConfigCommands, LifespanCommands,
    OrderCommands, PlanCommands, ScheduleCommands, TreeCommands,
};
use crate::cli::output;
use crate::cli::render::render_forest;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{
    AnalysisRequest, AnalysisStatus, BreakdownRecord, BreakdownUpdate, DomainError, Month,
    NodeDraft, NodeUpdate, RootCauseReport, WorkOrderUpdate,
};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::{Confirmer, FixedConfirmer};
use crate::infrastructure::InfraError;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        Cli::command()
            .print_help()
            .map_err(|e| InfraError::io("print help", e))?;
        return Ok(());
    };

    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let project_dir = match &cli.project_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().map_err(|e| InfraError::io("current dir", e))?,
    };
    let settings = Settings::load(Some(&project_dir))?;
    debug!("settings: {:?}", settings);
    let container = ServiceContainer::new(settings);

    run_command(command, &container, &project_dir)
}

/// Run one command against an already wired container.
pub fn run_command(
    command: &Commands,
    container: &ServiceContainer,
    project_dir: &Path,
) -> CliResult<()> {
    match command {
        Commands::Tree { command } => run_tree(container, command),
        Commands::Plan { command } => run_plan(container, command),
        Commands::Lifespan { command } => run_lifespan(container, command),
        Commands::Breakdown { command } => run_breakdown(container, command),
        Commands::Order { command } => run_order(container, command),
        Commands::Schedule { command } => run_schedule(container, command),
        Commands::Analyze {
            machine,
            description,
            context,
        } => {
            let report = container
                .analysis
                .analyze(&AnalysisRequest::new(machine, description, context));
            print_report(&report);
            Ok(())
        }
        Commands::Config { command } => run_config(container, project_dir, command),
        Commands::Completion { .. } => Ok(()),
    }
}

/// Print the new snapshot, or write it back when `in_place`.
fn emit<T: Serialize + ?Sized>(
    file: &Path,
    in_place: bool,
    value: &T,
    save: impl FnOnce() -> ApplicationResult<()>,
) -> CliResult<()> {
    if in_place {
        save()?;
        output::action("Saved", &file.display());
    } else {
        print!("{}", to_pretty_json(value)?);
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn run_tree(container: &ServiceContainer, command: &TreeCommands) -> CliResult<()> {
    let service = &container.forest;
    match command {
        TreeCommands::Show {
            file,
            sector,
            search,
            json,
        } => {
            let forest = service.load(file)?;
            let view = service.view(&forest, *sector, search.as_deref());
            if *json {
                print!("{}", to_pretty_json(&view)?);
            } else if view.is_empty() {
                output::warning("no equipment matches");
            } else {
                for tree in render_forest(&view) {
                    output::info(&tree);
                }
            }
            Ok(())
        }
        TreeCommands::Add {
            file,
            parent,
            name,
            id,
            kind,
            sector,
            status,
            model,
            serial,
            criticality,
            in_place,
        } => {
            let forest = service.load(file)?;
            let draft = NodeDraft {
                id: id.clone(),
                name: name.clone(),
                kind: *kind,
                sector: *sector,
                status: *status,
                model: model.clone(),
                serial: serial.clone(),
                criticality_class: *criticality,
            };
            let (updated, node) = service.add(&forest, parent.as_deref(), draft)?;
            if *in_place {
                output::success(&format!("added {}", node));
            }
            emit(file, *in_place, &updated, || service.save(file, &updated))
        }
        TreeCommands::Edit {
            file,
            target,
            id,
            name,
            kind,
            sector,
            status,
            model,
            serial,
            criticality,
            in_place,
        } => {
            let update = NodeUpdate {
                id: id.clone(),
                name: name.clone(),
                kind: *kind,
                sector: *sector,
                status: *status,
                model: model.clone(),
                serial: serial.clone(),
                criticality_class: *criticality,
            };
            if update.is_empty() {
                return Err(CliError::Usage(
                    "nothing to change: pass at least one field option".into(),
                ));
            }
            let forest = service.load(file)?;
            let (updated, node) = service.edit(&forest, target, &update)?;
            if *in_place {
                output::success(&format!("edited {}", node));
            }
            emit(file, *in_place, &updated, || service.save(file, &updated))
        }
        TreeCommands::Delete {
            file,
            id,
            yes,
            in_place,
        } => {
            let forest = service.load(file)?;
            let assume_yes = FixedConfirmer(true);
            let confirmer: &dyn Confirmer = if *yes {
                &assume_yes
            } else {
                container.confirmer.as_ref()
            };
            match service.delete(&forest, id, confirmer)? {
                DeleteOutcome::Deleted { forest, removed } => {
                    if *in_place {
                        output::success(&format!("deleted {} node(s)", removed));
                    }
                    emit(file, *in_place, &forest, || service.save(file, &forest))
                }
                DeleteOutcome::Cancelled => {
                    output::info("Cancelled.");
                    Ok(())
                }
                DeleteOutcome::NotFound => {
                    output::warning(&format!("no node with id {}", id));
                    Ok(())
                }
            }
        }
        TreeCommands::Flatten { file } => {
            let forest = service.load(file)?;
            for entry in forest.flatten() {
                let class = entry
                    .criticality_class
                    .map(|c| format!(" ({c})"))
                    .unwrap_or_default();
                output::info(&format!(
                    "{}{} [{}]{}",
                    "  ".repeat(entry.depth),
                    entry.name,
                    entry.id,
                    class
                ));
            }
            Ok(())
        }
        TreeCommands::Check { file } => {
            let forest = service.load(file)?;
            let report = service.check(&forest);
            output::header("Forest");
            output::detail(&format!("roots:  {}", report.roots));
            output::detail(&format!("nodes:  {}", report.nodes));
            output::detail(&format!("depth:  {}", report.depth));
            output::detail(&format!("leaves: {}", report.leaves));
            if report.is_consistent() {
                output::success("ids are unique");
                Ok(())
            } else {
                for id in &report.duplicate_ids {
                    output::failure(&format!("duplicate id {}", id));
                }
                Err(ApplicationError::from(DomainError::DuplicateId(
                    report.duplicate_ids.join(", "),
                ))
                .into())
            }
        }
    }
}

fn run_plan(container: &ServiceContainer, command: &PlanCommands) -> CliResult<()> {
    match command {
        PlanCommands::Classify {
            criticality,
            frequency,
            complexity,
            description,
            sequence,
        } => {
            if let Some(description) = description {
                let task = container.plan.build_task(
                    *sequence,
                    description,
                    *criticality,
                    *frequency,
                    *complexity,
                )?;
                print!("{}", to_pretty_json(&task)?);
                return Ok(());
            }

            let classification = container.plan.classify(*criticality, *frequency, *complexity);
            output::action("Color", &output::lean_color(classification.color));
            if classification.standard_required {
                output::detail(&format!(
                    "written standard required (e.g. {})",
                    container.plan.standard_code()
                ));
            }
            if classification.checklist_required {
                output::detail("checklist required");
            }
            Ok(())
        }
    }
}

fn run_lifespan(container: &ServiceContainer, command: &LifespanCommands) -> CliResult<()> {
    let service = &container.lifespan;
    match command {
        LifespanCommands::List { file } => {
            let records = service.load(file)?;
            for view in service.list(&records) {
                let c = &view.component;
                output::info(&format!(
                    "{:<10} {:<24} {:<20} {:>6.1}% {:>10.0} {} left  {}",
                    c.id,
                    c.machine,
                    c.component,
                    view.usage_percent,
                    view.remaining,
                    c.unit,
                    output::lifespan_status(view.status)
                ));
            }
            let summary = service.summary(&records);
            if summary.alerts() > 0 {
                output::warning(&format!(
                    "{} critical, {} exceeded",
                    summary.critical, summary.exceeded
                ));
            }
            Ok(())
        }
        LifespanCommands::Record {
            file,
            id,
            value,
            in_place,
        } => {
            let records = service.load(file)?;
            let updated = service.record_reading(&records, id, *value)?;
            emit(file, *in_place, &updated, || service.save(file, &updated))
        }
    }
}

fn run_breakdown(container: &ServiceContainer, command: &BreakdownCommands) -> CliResult<()> {
    let service = &container.breakdown;
    match command {
        BreakdownCommands::Analyze {
            file,
            code,
            in_place,
        } => {
            let records = service.load(file)?;
            let (updated, report) = service.analyze(&records, code)?;
            if *in_place {
                print_report(&report);
            }
            emit(file, *in_place, &updated, || service.save(file, &updated))
        }
        BreakdownCommands::List { file } => {
            let records = service.load(file)?;
            if records.is_empty() {
                output::warning("no breakdowns recorded");
            }
            for record in &records {
                let status = match record.analysis_status {
                    AnalysisStatus::Pending => "analysis pending",
                    AnalysisStatus::Completed => "analyzed",
                };
                output::info(&format!(
                    "{:<10} {:<24} {:<20} {:>5} min  {}",
                    record.code, record.machine, record.reason, record.duration_min, status
                ));
            }
            Ok(())
        }
        BreakdownCommands::Add {
            file,
            code,
            fields,
            in_place,
        } => {
            let records = service.load(file)?;
            let record = new_breakdown(code, fields)?;
            let updated = service.add(&records, record)?;
            if *in_place {
                output::success(&format!("added breakdown {}", code));
            }
            emit(file, *in_place, &updated, || service.save(file, &updated))
        }
        BreakdownCommands::Edit {
            file,
            code,
            fields,
            in_place,
        } => {
            let update = breakdown_update(fields);
            if update.is_empty() {
                return Err(CliError::Usage(
                    "nothing to change: pass at least one field option".into(),
                ));
            }
            let records = service.load(file)?;
            let (updated, _) = service.update(&records, code, &update)?;
            if *in_place {
                output::success(&format!("edited breakdown {}", code));
            }
            emit(file, *in_place, &updated, || service.save(file, &updated))
        }
        BreakdownCommands::Delete {
            file,
            code,
            in_place,
        } => {
            let records = service.load(file)?;
            let updated = service.delete(&records, code);
            if updated.len() == records.len() {
                output::warning(&format!("no breakdown with code {}", code));
            }
            emit(file, *in_place, &updated, || service.save(file, &updated))
        }
    }
}

fn breakdown_update(fields: &BreakdownFields) -> BreakdownUpdate {
    BreakdownUpdate {
        sector: fields.sector,
        machine: fields.machine.clone(),
        reason: fields.reason.clone(),
        started_at: fields.started_at.clone(),
        ended_at: fields.ended_at.clone(),
        duration_min: fields.duration_min,
        requested_service: fields.requested_service.clone(),
        executed_service: fields.executed_service.clone(),
        assembly: fields.assembly.clone(),
        technician: fields.technician.clone(),
    }
}

fn required<T: Clone>(value: &Option<T>, flag: &str) -> CliResult<T> {
    value
        .clone()
        .ok_or_else(|| CliError::Usage(format!("--{flag} is required when adding a breakdown")))
}

fn new_breakdown(code: &str, fields: &BreakdownFields) -> CliResult<BreakdownRecord> {
    let code = code.trim();
    if code.is_empty() {
        return Err(ApplicationError::from(DomainError::EmptyId).into());
    }
    let record = BreakdownRecord {
        code: code.to_string(),
        sector: required(&fields.sector, "sector")?,
        machine: required(&fields.machine, "machine")?,
        reason: required(&fields.reason, "reason")?,
        started_at: required(&fields.started_at, "started-at")?,
        ended_at: required(&fields.ended_at, "ended-at")?,
        duration_min: required(&fields.duration_min, "duration-min")?,
        requested_service: required(&fields.requested_service, "requested-service")?,
        executed_service: fields.executed_service.clone().unwrap_or_default(),
        assembly: fields.assembly.clone().unwrap_or_default(),
        technician: fields.technician.clone().unwrap_or_default(),
        analysis: None,
        analysis_status: AnalysisStatus::Pending,
    };
    if record.machine.trim().is_empty() {
        return Err(ApplicationError::from(DomainError::EmptyName).into());
    }
    Ok(record)
}

#[instrument(level = "debug", skip(container))]
fn run_order(container: &ServiceContainer, command: &OrderCommands) -> CliResult<()> {
    let service = &container.work_orders;
    match command {
        OrderCommands::List {
            file,
            status,
            sector,
        } => {
            let orders = service.list(&service.load(file)?, *status, *sector);
            if orders.is_empty() {
                output::warning("no work orders match");
            }
            for order in &orders {
                output::info(&format!(
                    "{:<14} {:<8} {:<24} {:<24} {} | {}",
                    order.id,
                    order.service_request_id,
                    order.title,
                    order.machine_name,
                    order.priority,
                    order.status
                ));
            }
            Ok(())
        }
        OrderCommands::Create {
            file,
            tree,
            node,
            title,
            description,
            in_place,
        } => {
            let forest = container.forest.load(tree)?;
            let target = forest
                .find(node)
                .ok_or_else(|| ApplicationError::from(DomainError::NotFound(node.clone())))?;
            let orders = service.load(file)?;
            let (updated, order) = service.create(&orders, target, title, description)?;
            if *in_place {
                output::success(&format!("created {} ({})", order, order.service_request_id));
            }
            emit(file, *in_place, &updated, || service.save(file, &updated))
        }
        OrderCommands::Update {
            file,
            id,
            title,
            work_center,
            kind,
            category,
            priority,
            status,
            base_date,
            limit_date,
            description,
            assigned_to,
            in_place,
        } => {
            let update = WorkOrderUpdate {
                title: title.clone(),
                work_center: work_center.clone(),
                kind: *kind,
                category: *category,
                priority: *priority,
                status: *status,
                base_date: base_date.clone(),
                limit_date: limit_date.clone(),
                description: description.clone(),
                assigned_to: assigned_to.clone(),
            };
            if update.is_empty() {
                return Err(CliError::Usage(
                    "nothing to change: pass at least one field option".into(),
                ));
            }
            let orders = service.load(file)?;
            let (updated, order) = service.update(&orders, id, &update)?;
            if *in_place {
                output::success(&format!("updated {}", order));
            }
            emit(file, *in_place, &updated, || service.save(file, &updated))
        }
    }
}

#[instrument(level = "debug", skip(container))]
fn run_schedule(container: &ServiceContainer, command: &ScheduleCommands) -> CliResult<()> {
    let service = &container.schedule;
    match command {
        ScheduleCommands::Show {
            file,
            sector,
            search,
        } => {
            let tasks = service.view(&service.load(file)?, *sector, search.as_deref());
            if tasks.is_empty() {
                output::warning("no preventive tasks match");
                return Ok(());
            }
            let months: String = Month::ALL.iter().map(|m| format!("{m:<4}")).collect();
            output::header(&format!(
                "{:<8} {:<24} {:<28} {}",
                "Id", "Machine", "Task", months
            ));
            for task in &tasks {
                // Pad outside the color codes so the grid stays aligned
                let cells: String = Month::ALL
                    .iter()
                    .map(|m| format!("{}   ", output::preventive_status(task.status_in(*m))))
                    .collect();
                output::info(&format!(
                    "{:<8} {:<24} {:<28} {}",
                    task.id, task.machine, task.task, cells
                ));
            }
            Ok(())
        }
        ScheduleCommands::Set {
            file,
            id,
            month,
            status,
            in_place,
        } => {
            let tasks = service.load(file)?;
            let updated = service.set_status(&tasks, id, *month, *status)?;
            emit(file, *in_place, &updated, || service.save(file, &updated))
        }
        ScheduleCommands::Cycle {
            file,
            id,
            month,
            in_place,
        } => {
            let tasks = service.load(file)?;
            let (updated, status) = service.cycle_status(&tasks, id, *month)?;
            if *in_place {
                output::action(&month.to_string(), &status);
            }
            emit(file, *in_place, &updated, || service.save(file, &updated))
        }
    }
}

fn run_config(
    container: &ServiceContainer,
    project_dir: &Path,
    command: &ConfigCommands,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            print!("{}", container.settings.to_toml()?);
        }
        ConfigCommands::Template => {
            print!("{}", Settings::template());
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("global", &path.display()),
                None => output::warning("no global config directory on this platform"),
            }
            output::action("local", &local_config_path(project_dir).display());
        }
    }
    Ok(())
}

fn print_report(report: &RootCauseReport) {
    output::header("Fishbone");
    let fishbone = &report.fishbone;
    output::detail(&format!("Method:      {}", fishbone.method));
    output::detail(&format!("Material:    {}", fishbone.material));
    output::detail(&format!("Manpower:    {}", fishbone.manpower));
    output::detail(&format!("Environment: {}", fishbone.environment));
    output::detail(&format!("Machine:     {}", fishbone.machine));

    output::header("5 Whys");
    for path in report.why_analysis.paths() {
        output::info(&path.title);
        for (idx, why) in path.whys.iter().enumerate() {
            output::detail(&format!("{}. {}", idx + 1, why));
        }
        output::detail(&format!("Root cause: {}", path.root_cause));
    }

    output::header("Conclusion");
    output::info(&report.conclusion);

    if !report.action_plan.is_empty() {
        output::header("Action plan");
        for item in &report.action_plan {
            output::detail(&format!(
                "{} | {} | {} | {}",
                item.what, item.who, item.when, item.status
            ));
        }
    }
}
