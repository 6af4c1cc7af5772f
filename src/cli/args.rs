//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::domain::{
    CriticalityClass, Level, Month, NodeKind, NodeStatus, PreventiveStatus, Priority, Sector,
    WorkOrderCategory, WorkOrderStatus, WorkOrderType,
};

/// Equipment hierarchy manager for maintenance planning
#[derive(Parser, Debug)]
#[command(name = "assetree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Project directory for the local config (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show and change the equipment hierarchy
    Tree {
        #[command(subcommand)]
        command: TreeCommands,
    },

    /// Maintenance plan tasks
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },

    /// Component lifespan tracking
    Lifespan {
        #[command(subcommand)]
        command: LifespanCommands,
    },

    /// Breakdown records and root-cause analysis
    Breakdown {
        #[command(subcommand)]
        command: BreakdownCommands,
    },

    /// Work orders raised from equipment
    Order {
        #[command(subcommand)]
        command: OrderCommands,
    },

    /// Annual preventive maintenance schedule
    Schedule {
        #[command(subcommand)]
        command: ScheduleCommands,
    },

    /// Root-cause analysis for a free-text incident
    Analyze {
        /// Machine name
        #[arg(long)]
        machine: String,
        /// What happened
        #[arg(long)]
        description: String,
        /// Additional details
        #[arg(long, default_value = "")]
        context: String,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum TreeCommands {
    /// Print the hierarchy as a tree
    Show {
        /// Forest JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Only roots in this sector
        #[arg(long)]
        sector: Option<Sector>,
        /// Keep nodes whose name or id contain TERM, with their ancestors
        #[arg(short, long)]
        search: Option<String>,
        /// Print JSON instead of a tree
        #[arg(long)]
        json: bool,
    },

    /// Add a node below a parent, or as a new root
    Add {
        /// Forest JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Parent node id (omit for a new root machine)
        #[arg(short, long)]
        parent: Option<String>,
        /// Node name
        #[arg(short, long)]
        name: String,
        /// Explicit id (generated when omitted)
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        kind: Option<NodeKind>,
        /// Sector of a new root (children inherit the parent's)
        #[arg(long)]
        sector: Option<Sector>,
        #[arg(long)]
        status: Option<NodeStatus>,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        serial: Option<String>,
        #[arg(long)]
        criticality: Option<CriticalityClass>,
        /// Write the result back to FILE
        #[arg(short, long)]
        in_place: bool,
    },

    /// Change fields of a node, keeping its children
    Edit {
        /// Forest JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Node to edit
        #[arg(value_name = "ID")]
        target: String,
        /// New id
        #[arg(long)]
        id: Option<String>,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(long)]
        kind: Option<NodeKind>,
        #[arg(long)]
        sector: Option<Sector>,
        #[arg(long)]
        status: Option<NodeStatus>,
        /// Empty string clears the model
        #[arg(long)]
        model: Option<String>,
        /// Empty string clears the serial
        #[arg(long)]
        serial: Option<String>,
        #[arg(long)]
        criticality: Option<CriticalityClass>,
        /// Write the result back to FILE
        #[arg(short, long)]
        in_place: bool,
    },

    /// Delete a node and all its descendants
    Delete {
        /// Forest JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Node to delete
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
        /// Write the result back to FILE
        #[arg(short, long)]
        in_place: bool,
    },

    /// List all nodes with their depth
    Flatten {
        /// Forest JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Report structure and duplicate ids
    Check {
        /// Forest JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
pub enum PlanCommands {
    /// Lean color of a task
    Classify {
        #[arg(long)]
        criticality: Level,
        #[arg(long)]
        frequency: Level,
        #[arg(long)]
        complexity: Level,
        /// Build the full task record with this description
        #[arg(long)]
        description: Option<String>,
        /// Position of the task in its plan
        #[arg(long, default_value_t = 1, requires = "description")]
        sequence: u32,
    },
}

#[derive(Subcommand, Debug)]
pub enum LifespanCommands {
    /// Show components with usage and status
    List {
        /// Lifespan JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Record a new reading (dated today)
    Record {
        /// Lifespan JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Component id
        id: String,
        /// Current hours or cycles
        value: f64,
        /// Write the result back to FILE
        #[arg(short, long)]
        in_place: bool,
    },
}

/// Breakdown fields shared by `add` and `edit`.
#[derive(Args, Debug, Default)]
pub struct BreakdownFields {
    #[arg(long)]
    pub sector: Option<Sector>,
    #[arg(long)]
    pub machine: Option<String>,
    /// Failure type or macro reason
    #[arg(long)]
    pub reason: Option<String>,
    #[arg(long)]
    pub started_at: Option<String>,
    #[arg(long)]
    pub ended_at: Option<String>,
    /// Downtime in minutes
    #[arg(long)]
    pub duration_min: Option<u32>,
    #[arg(long)]
    pub requested_service: Option<String>,
    #[arg(long)]
    pub executed_service: Option<String>,
    #[arg(long)]
    pub assembly: Option<String>,
    #[arg(long)]
    pub technician: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum BreakdownCommands {
    /// Show records, newest first
    List {
        /// Breakdown JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Record a new breakdown
    Add {
        /// Breakdown JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Breakdown code (must be unique)
        code: String,
        #[command(flatten)]
        fields: BreakdownFields,
        /// Write the result back to FILE
        #[arg(short, long)]
        in_place: bool,
    },

    /// Correct fields of a record
    Edit {
        /// Breakdown JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Breakdown code
        code: String,
        #[command(flatten)]
        fields: BreakdownFields,
        /// Write the result back to FILE
        #[arg(short, long)]
        in_place: bool,
    },

    /// Run root-cause analysis for a record and attach the report
    Analyze {
        /// Breakdown JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Breakdown code
        code: String,
        /// Write the result back to FILE
        #[arg(short, long)]
        in_place: bool,
    },

    /// Remove a record
    Delete {
        /// Breakdown JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Breakdown code
        code: String,
        /// Write the result back to FILE
        #[arg(short, long)]
        in_place: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum OrderCommands {
    /// Show work orders
    List {
        /// Work order JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[arg(long)]
        status: Option<WorkOrderStatus>,
        #[arg(long)]
        sector: Option<Sector>,
    },

    /// Raise a service request for an equipment node
    Create {
        /// Work order JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Forest JSON file holding the node
        #[arg(long, value_hint = ValueHint::FilePath)]
        tree: PathBuf,
        /// Equipment node id
        #[arg(long)]
        node: String,
        #[arg(short, long, default_value = "")]
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Write the result back to FILE
        #[arg(short, long)]
        in_place: bool,
    },

    /// Plan an order: change its classification, status or dates
    Update {
        /// Work order JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Work order id
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(long)]
        work_center: Option<String>,
        #[arg(long = "type")]
        kind: Option<WorkOrderType>,
        #[arg(long)]
        category: Option<WorkOrderCategory>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        status: Option<WorkOrderStatus>,
        #[arg(long)]
        base_date: Option<String>,
        /// Empty string clears the limit date
        #[arg(long)]
        limit_date: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        /// Responsible planner (empty string clears)
        #[arg(long)]
        assigned_to: Option<String>,
        /// Write the result back to FILE
        #[arg(short, long)]
        in_place: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ScheduleCommands {
    /// Show the year grid
    Show {
        /// Schedule JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[arg(long)]
        sector: Option<Sector>,
        /// Keep tasks whose machine or task text contain TERM
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Set the status of a task in one month
    Set {
        /// Schedule JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Task id
        id: String,
        /// Month name or number
        month: Month,
        status: PreventiveStatus,
        /// Write the result back to FILE
        #[arg(short, long)]
        in_place: bool,
    },

    /// Step a month to its next status
    Cycle {
        /// Schedule JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Task id
        id: String,
        /// Month name or number
        month: Month,
        /// Write the result back to FILE
        #[arg(short, long)]
        in_place: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Print a commented config template
    Template,

    /// Show config paths
    Path,
}
